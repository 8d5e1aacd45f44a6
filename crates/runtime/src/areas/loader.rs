//! Area data loader.
//!
//! Area files are RON documents describing the grid, its layers, shared tile
//! types and every tile that differs from the default walkable tile.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;
use tile_core::{
    Area, Exit, ExitKind, Geometry, Layer, Tile, TileDimensions, TileFlags, TileType, VirtCoord,
};

use super::{LoadResult, read_file};

/// Area data structure for RON files.
#[derive(Debug, Deserialize)]
struct AreaRon {
    width: u32,
    height: u32,
    #[serde(default = "default_tile_size")]
    tile_size: (u32, u32),
    #[serde(default = "default_layers")]
    layers: Vec<(String, f64)>,
    #[serde(default)]
    tile_types: Vec<TileTypeRon>,
    #[serde(default)]
    tiles: Vec<TileRon>,
}

#[derive(Debug, Deserialize)]
struct TileTypeRon {
    name: String,
    #[serde(default)]
    flags: TileFlags,
}

#[derive(Debug, Deserialize)]
struct TileRon {
    x: i32,
    y: i32,
    #[serde(default = "default_layer")]
    layer: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    flags: TileFlags,
    #[serde(default)]
    exits: Vec<ExitRon>,
    #[serde(default)]
    layermods: Vec<LayermodRon>,
}

#[derive(Debug, Deserialize)]
struct ExitRon {
    slot: ExitKind,
    area: String,
    to: VirtCoord,
}

#[derive(Debug, Deserialize)]
struct LayermodRon {
    slot: ExitKind,
    depth: f64,
}

fn default_tile_size() -> (u32, u32) {
    let tile = TileDimensions::default();
    (tile.width, tile.height)
}

fn default_layers() -> Vec<(String, f64)> {
    vec![(default_layer(), 0.0)]
}

fn default_layer() -> String {
    "ground".to_owned()
}

/// Loader for areas from RON files.
pub struct AreaLoader;

impl AreaLoader {
    /// Load the area called `name` from a RON file.
    pub fn load(name: &str, path: &Path) -> LoadResult<Area> {
        let content = read_file(path)?;
        Self::parse(name, &content).with_context(|| format!("area file {}", path.display()))
    }

    pub fn parse(name: &str, content: &str) -> LoadResult<Area> {
        let data: AreaRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse area RON: {}", e))?;
        data.build(name)
    }
}

impl AreaRon {
    fn build(self, name: &str) -> LoadResult<Area> {
        let layers = self
            .layers
            .into_iter()
            .map(|(layer, depth)| Layer::new(layer, depth))
            .collect();
        let tile_size = TileDimensions::new(self.tile_size.0, self.tile_size.1);
        let geometry = Geometry::new(self.width, self.height, tile_size, layers)?;

        let types: HashMap<String, Arc<TileType>> = self
            .tile_types
            .into_iter()
            .map(|spec| {
                let kind = Arc::new(TileType::new(spec.name.clone(), spec.flags));
                (spec.name, kind)
            })
            .collect();

        let mut area = Area::new(name, geometry);
        for spec in self.tiles {
            let (x, y) = (spec.x, spec.y);
            let virt = area
                .geometry()
                .virt_on_layer(x, y, &spec.layer)
                .with_context(|| format!("tile ({x}, {y})"))?;
            let coord = area.geometry().virt_to_phys(virt);

            let mut tile = Tile::new().with_flags(spec.flags);
            if let Some(kind) = &spec.kind {
                let shared = types
                    .get(kind)
                    .ok_or_else(|| anyhow::anyhow!("tile ({x}, {y}) uses unknown type '{kind}'"))?;
                tile = tile.with_type(Arc::clone(shared));
            }
            for exit in spec.exits {
                tile = tile.with_exit(exit.slot, Exit::new(exit.area, exit.to));
            }
            for layermod in spec.layermods {
                tile = tile.with_layermod(layermod.slot, layermod.depth);
            }

            area.set_tile(coord, tile)
                .with_context(|| format!("tile ({x}, {y})"))?;
        }

        Ok(area)
    }
}
