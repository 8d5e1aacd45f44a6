use crate::state::{PixelCoord, TileCoord, TileDimensions, VirtCoord};

use super::CoordError;

/// Named layer at a given virtual depth. A layer's physical index is its
/// position in the area's layer list.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layer {
    pub name: String,
    pub depth: f64,
}

impl Layer {
    pub fn new(name: impl Into<String>, depth: f64) -> Self {
        Self {
            name: name.into(),
            depth,
        }
    }
}

/// Grid size of an area in tiles and layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaDimensions {
    pub width: u32,
    pub height: u32,
    pub layers: u32,
}

impl AreaDimensions {
    pub const fn new(width: u32, height: u32, layers: u32) -> Self {
        Self {
            width,
            height,
            layers,
        }
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.width
            && (coord.y as u32) < self.height
            && (coord.z as u32) < self.layers
    }

    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize * self.layers as usize
    }
}

/// Coordinate converter for one area.
///
/// Converts between pixel space, layer-relative virtual space and physical
/// tile indices. Every conversion is total; only looking a layer up by name
/// can fail. For any in-area tile `p`, `virt_to_phys(phys_to_virt(p)) == p`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    width: u32,
    height: u32,
    tile: TileDimensions,
    layers: Vec<Layer>,
}

impl Geometry {
    /// # Errors
    ///
    /// Fails if any extent is zero, if there are no layers, or if two layers
    /// share a name or a depth.
    pub fn new(
        width: u32,
        height: u32,
        tile: TileDimensions,
        layers: Vec<Layer>,
    ) -> Result<Self, CoordError> {
        if width == 0 || height == 0 || tile.width == 0 || tile.height == 0 {
            return Err(CoordError::EmptyGrid {
                width,
                height,
                tile_width: tile.width,
                tile_height: tile.height,
            });
        }
        if layers.is_empty() {
            return Err(CoordError::NoLayers);
        }
        for (index, layer) in layers.iter().enumerate() {
            for other in &layers[..index] {
                if other.name == layer.name {
                    return Err(CoordError::DuplicateLayer {
                        name: layer.name.clone(),
                    });
                }
                if other.depth == layer.depth {
                    return Err(CoordError::DuplicateDepth { depth: layer.depth });
                }
            }
        }

        Ok(Self {
            width,
            height,
            tile,
            layers,
        })
    }

    /// Single-layer geometry with the layer named `"ground"` at depth 0.
    pub fn flat(width: u32, height: u32, tile: TileDimensions) -> Self {
        Self {
            width,
            height,
            tile,
            layers: vec![Layer::new("ground", 0.0)],
        }
    }

    pub fn dimensions(&self) -> AreaDimensions {
        AreaDimensions::new(self.width, self.height, self.layers.len() as u32)
    }

    pub fn tile_dimensions(&self) -> TileDimensions {
        self.tile
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        self.dimensions().contains(coord)
    }

    /// # Errors
    ///
    /// Returns [`CoordError::LayerNotFound`] for an undefined layer name.
    pub fn layer_depth(&self, name: &str) -> Result<f64, CoordError> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .map(|layer| layer.depth)
            .ok_or_else(|| CoordError::LayerNotFound {
                name: name.to_owned(),
            })
    }

    /// Virtual coordinate of column `x`, row `y` on the named layer.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::LayerNotFound`] for an undefined layer name.
    pub fn virt_on_layer(&self, x: i32, y: i32, layer: &str) -> Result<VirtCoord, CoordError> {
        Ok(VirtCoord::new(x, y, self.layer_depth(layer)?))
    }

    /// Depth of physical layer `z`. Indices without a defined layer map to
    /// their own value so the conversion stays total.
    pub fn depth_of(&self, z: i32) -> f64 {
        usize::try_from(z)
            .ok()
            .and_then(|index| self.layers.get(index))
            .map_or(f64::from(z), |layer| layer.depth)
    }

    /// Physical layer nearest to `depth`; ties go to the lower index.
    pub fn layer_at(&self, depth: f64) -> i32 {
        let mut best: Option<(usize, f64)> = None;
        for (index, layer) in self.layers.iter().enumerate() {
            let gap = (layer.depth - depth).abs();
            if best.is_none_or(|(_, best_gap)| gap < best_gap) {
                best = Some((index, gap));
            }
        }
        match best {
            Some((index, _)) => index as i32,
            None => depth.round() as i32,
        }
    }

    pub fn phys_to_virt(&self, coord: TileCoord) -> VirtCoord {
        VirtCoord::new(coord.x, coord.y, self.depth_of(coord.z))
    }

    pub fn virt_to_phys(&self, coord: VirtCoord) -> TileCoord {
        TileCoord::new(coord.x, coord.y, self.layer_at(coord.z))
    }

    /// Top-left pixel of the tile; depth passes through.
    pub fn virt_to_pixel(&self, coord: VirtCoord) -> PixelCoord {
        PixelCoord::new(
            f64::from(coord.x) * f64::from(self.tile.width),
            f64::from(coord.y) * f64::from(self.tile.height),
            coord.z,
        )
    }

    /// Tile containing the pixel; depth passes through.
    pub fn pixel_to_virt(&self, coord: PixelCoord) -> VirtCoord {
        VirtCoord::new(
            (coord.x / f64::from(self.tile.width)).floor() as i32,
            (coord.y / f64::from(self.tile.height)).floor() as i32,
            coord.z,
        )
    }

    pub fn phys_to_pixel(&self, coord: TileCoord) -> PixelCoord {
        self.virt_to_pixel(self.phys_to_virt(coord))
    }

    pub fn pixel_to_phys(&self, coord: PixelCoord) -> TileCoord {
        self.virt_to_phys(self.pixel_to_virt(coord))
    }
}
