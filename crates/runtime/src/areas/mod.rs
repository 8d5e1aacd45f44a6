//! Area storage and lazy loading.
//!
//! [`AreaRegistry`] keeps every area that has been loaded so far and asks an
//! [`AreaSource`] for the rest on first use. Occupancy lives inside the
//! loaded [`Area`], so an area is loaded once and then kept.
mod loader;
mod source;

use std::collections::HashMap;
use std::path::Path;

use tile_core::{Area, TransitionError};

pub use loader::AreaLoader;
pub use source::{FileAreaSource, StaticAreaSource};

/// Common result type for file loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Capability that produces areas by name.
pub trait AreaSource {
    /// # Errors
    ///
    /// [`TransitionError::AreaNotFound`] for unknown names,
    /// [`TransitionError::AreaLoad`] for areas that exist but are broken.
    fn load(&self, name: &str) -> Result<Area, TransitionError>;
}

/// Loaded areas keyed by name.
pub struct AreaRegistry {
    source: Box<dyn AreaSource>,
    loaded: HashMap<String, Area>,
}

impl AreaRegistry {
    pub fn new(source: impl AreaSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            loaded: HashMap::new(),
        }
    }

    /// Loads `name` unless it is already present.
    pub fn ensure_loaded(&mut self, name: &str) -> Result<(), TransitionError> {
        if self.loaded.contains_key(name) {
            return Ok(());
        }
        let area = self.source.load(name)?;
        tracing::info!(area = name, "area loaded");
        self.loaded.insert(name.to_owned(), area);
        Ok(())
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Area> {
        self.loaded.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Area> {
        self.loaded.get_mut(name)
    }

    pub fn loaded_names(&self) -> impl Iterator<Item = &str> {
        self.loaded.keys().map(String::as_str)
    }

    /// Removes an area for exclusive use; pair with [`AreaRegistry::restore`].
    pub(crate) fn take(&mut self, name: &str) -> Option<Area> {
        self.loaded.remove(name)
    }

    pub(crate) fn restore(&mut self, area: Area) {
        self.loaded.insert(area.name().to_owned(), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tile_core::{Geometry, TileDimensions};

    struct CountingSource(Rc<Cell<u32>>);

    impl AreaSource for CountingSource {
        fn load(&self, name: &str) -> Result<Area, TransitionError> {
            self.0.set(self.0.get() + 1);
            if name == "void" {
                return Err(TransitionError::AreaNotFound {
                    area: name.to_owned(),
                });
            }
            Ok(Area::new(name, Geometry::flat(2, 2, TileDimensions::default())))
        }
    }

    #[test]
    fn areas_load_once() {
        let loads = Rc::new(Cell::new(0));
        let mut registry = AreaRegistry::new(CountingSource(Rc::clone(&loads)));

        registry.ensure_loaded("town").unwrap();
        registry.ensure_loaded("town").unwrap();
        assert_eq!(loads.get(), 1);
        assert!(registry.is_loaded("town"));
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let loads = Rc::new(Cell::new(0));
        let mut registry = AreaRegistry::new(CountingSource(Rc::clone(&loads)));

        assert!(registry.ensure_loaded("void").is_err());
        assert!(registry.ensure_loaded("void").is_err());
        assert_eq!(loads.get(), 2);
        assert_eq!(registry.loaded_names().count(), 0);
    }
}
