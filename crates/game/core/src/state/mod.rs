//! Plain value types shared by every layer of the core.
//!
//! Entity identifiers, facings and the three coordinate spaces the engine
//! works in: [`PixelCoord`] (display space, where positions are stored),
//! [`VirtCoord`] (layer-relative "virtual" space with a continuous depth) and
//! [`TileCoord`] (absolute physical tile indices into an area grid).
mod common;
mod coords;
mod direction;

pub use common::EntityId;
pub use coords::{PixelCoord, TileCoord, TileDimensions, VirtCoord};
pub use direction::Facing;
