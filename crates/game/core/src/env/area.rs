use crate::state::TileCoord;

use super::{CoordError, Geometry, OccupancyError, Tile};

/// A named grid of tiles plus the coordinate converter describing it.
///
/// Tiles are static for the area's lifetime except for their occupancy
/// counters and runtime layermod/exit edits made through [`Area::tile_mut`].
#[derive(Clone, Debug)]
pub struct Area {
    name: String,
    geometry: Geometry,
    tiles: Vec<Tile>,
}

impl Area {
    /// Creates an area filled with default (walkable, exit-less) tiles.
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        let count = geometry.dimensions().tile_count();
        Self {
            name: name.into(),
            geometry,
            tiles: vec![Tile::default(); count],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        self.geometry.contains(coord)
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let dims = self.geometry.dimensions();
        let (w, h) = (dims.width as usize, dims.height as usize);
        Some((coord.z as usize * h + coord.y as usize) * w + coord.x as usize)
    }

    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.index(coord).map(|index| &self.tiles[index])
    }

    pub fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        self.index(coord).map(|index| &mut self.tiles[index])
    }

    /// Replaces the static data of a tile, keeping its live occupancy count.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::OutOfBounds`] if `coord` is outside the grid.
    pub fn set_tile(&mut self, coord: TileCoord, tile: Tile) -> Result<(), CoordError> {
        self.tile_mut(coord)
            .ok_or(CoordError::OutOfBounds(coord))?
            .replace_static(tile);
        Ok(())
    }

    /// Builder form of [`Area::set_tile`].
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::OutOfBounds`] if `coord` is outside the grid.
    pub fn with_tile(mut self, coord: TileCoord, tile: Tile) -> Result<Self, CoordError> {
        self.set_tile(coord, tile)?;
        Ok(self)
    }

    /// Occupancy of `coord`; zero outside the grid.
    pub fn occupancy(&self, coord: TileCoord) -> u32 {
        self.tile(coord).map_or(0, Tile::occupancy)
    }

    /// Sum of every tile's occupancy.
    pub fn total_occupancy(&self) -> u64 {
        self.tiles.iter().map(|tile| u64::from(tile.occupancy())).sum()
    }

    /// # Errors
    ///
    /// Returns [`OccupancyError::NoSuchTile`] if `coord` is outside the grid.
    pub fn enter(&mut self, coord: TileCoord) -> Result<(), OccupancyError> {
        let tile = self
            .tile_mut(coord)
            .ok_or(OccupancyError::NoSuchTile { tile: coord })?;
        tile.enter();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`OccupancyError::Underflow`] if the tile's count is already
    /// zero and [`OccupancyError::NoSuchTile`] if `coord` is outside the grid.
    pub fn leave(&mut self, coord: TileCoord) -> Result<(), OccupancyError> {
        let tile = self
            .tile_mut(coord)
            .ok_or(OccupancyError::NoSuchTile { tile: coord })?;
        if tile.leave() {
            Ok(())
        } else {
            Err(OccupancyError::Underflow { tile: coord })
        }
    }
}
