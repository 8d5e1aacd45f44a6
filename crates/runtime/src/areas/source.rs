use std::collections::HashMap;
use std::path::PathBuf;

use tile_core::{Area, TransitionError};

use super::{AreaLoader, AreaSource};

/// Serves prebuilt areas. Each load hands out a fresh copy.
#[derive(Clone, Debug, Default)]
pub struct StaticAreaSource {
    areas: HashMap<String, Area>,
}

impl StaticAreaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_area(mut self, area: Area) -> Self {
        self.insert(area);
        self
    }

    pub fn insert(&mut self, area: Area) {
        self.areas.insert(area.name().to_owned(), area);
    }
}

impl AreaSource for StaticAreaSource {
    fn load(&self, name: &str) -> Result<Area, TransitionError> {
        self.areas
            .get(name)
            .cloned()
            .ok_or_else(|| TransitionError::AreaNotFound {
                area: name.to_owned(),
            })
    }
}

/// Reads `<root>/<name>.ron` through [`AreaLoader`].
#[derive(Clone, Debug)]
pub struct FileAreaSource {
    root: PathBuf,
}

impl FileAreaSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.ron"))
    }
}

impl AreaSource for FileAreaSource {
    fn load(&self, name: &str) -> Result<Area, TransitionError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(TransitionError::AreaNotFound {
                area: name.to_owned(),
            });
        }
        AreaLoader::load(name, &path).map_err(|err| TransitionError::AreaLoad {
            area: name.to_owned(),
            reason: format!("{err:#}"),
        })
    }
}
