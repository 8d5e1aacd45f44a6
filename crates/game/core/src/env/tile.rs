use std::sync::Arc;

use bitflags::bitflags;
use strum::EnumCount;

use crate::script::ScriptRef;
use crate::state::{Facing, VirtCoord};

bitflags! {
    /// Walkability flags. Each bit names a class of actor that may not enter
    /// the tile; an entity's exemption mask uses the same bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct TileFlags: u8 {
        /// Nobody may enter.
        const NOWALK            = 1 << 0;
        /// Player-controlled entities may not enter.
        const NOWALK_PLAYER     = 1 << 1;
        /// Non-player entities may not enter.
        const NOWALK_NPC        = 1 << 2;
        /// Exits on this tile are disabled.
        const NOWALK_EXIT       = 1 << 3;
        /// Implied for every coordinate outside the area grid.
        const NOWALK_AREA_BOUND = 1 << 4;
    }
}

/// Exit slots on a tile. `Normal` fires on arrival; the directional slots
/// fire when leaving the tile in that direction.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumCount,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitKind {
    Normal,
    Up,
    Down,
    Left,
    Right,
}

impl ExitKind {
    /// Directional slot for a cardinal facing. Diagonals and stance have none.
    pub fn from_facing(facing: Facing) -> Option<Self> {
        match (facing.x(), facing.y()) {
            (0, -1) => Some(Self::Up),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Destination of an exit: an area name and a coordinate inside it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exit {
    pub area: String,
    pub coord: VirtCoord,
}

impl Exit {
    pub fn new(area: impl Into<String>, coord: VirtCoord) -> Self {
        Self {
            area: area.into(),
            coord,
        }
    }
}

/// Properties shared by every tile of one type (e.g. all water tiles).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileType {
    pub name: String,
    pub flags: TileFlags,
}

impl TileType {
    pub fn new(name: impl Into<String>, flags: TileFlags) -> Self {
        Self {
            name: name.into(),
            flags,
        }
    }
}

/// One cell of an area: static walkability and exits plus the live count of
/// entities resolved to it.
#[derive(Clone, Debug, Default)]
pub struct Tile {
    flags: TileFlags,
    kind: Option<Arc<TileType>>,
    exits: [Option<Exit>; ExitKind::COUNT],
    layermods: [Option<f64>; ExitKind::COUNT],
    on_enter: Option<ScriptRef>,
    on_leave: Option<ScriptRef>,
    entities: u32,
}

impl Tile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(mut self, flags: TileFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_type(mut self, kind: Arc<TileType>) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_exit(mut self, kind: ExitKind, exit: Exit) -> Self {
        self.exits[kind.slot()] = Some(exit);
        self
    }

    pub fn with_layermod(mut self, kind: ExitKind, depth: f64) -> Self {
        self.layermods[kind.slot()] = Some(depth);
        self
    }

    pub fn with_enter_script(mut self, script: ScriptRef) -> Self {
        self.on_enter = Some(script);
        self
    }

    pub fn with_leave_script(mut self, script: ScriptRef) -> Self {
        self.on_leave = Some(script);
        self
    }

    /// Own flags combined with the flags inherited from the tile type.
    pub fn flags(&self) -> TileFlags {
        match &self.kind {
            Some(kind) => self.flags | kind.flags,
            None => self.flags,
        }
    }

    /// True if any bit of `mask` is set on the tile or its type.
    pub fn has_flag(&self, mask: TileFlags) -> bool {
        self.flags().intersects(mask)
    }

    pub fn tile_type(&self) -> Option<&TileType> {
        self.kind.as_deref()
    }

    pub fn exit(&self, kind: ExitKind) -> Option<&Exit> {
        self.exits[kind.slot()].as_ref()
    }

    /// Exit taken when leaving this tile toward `facing`.
    pub fn exit_at(&self, facing: Facing) -> Option<&Exit> {
        ExitKind::from_facing(facing).and_then(|kind| self.exit(kind))
    }

    pub fn set_exit(&mut self, kind: ExitKind, exit: Option<Exit>) {
        self.exits[kind.slot()] = exit;
    }

    pub fn layermod(&self, kind: ExitKind) -> Option<f64> {
        self.layermods[kind.slot()]
    }

    pub fn set_layermod(&mut self, kind: ExitKind, depth: Option<f64>) {
        self.layermods[kind.slot()] = depth;
    }

    pub fn enter_script(&self) -> Option<&ScriptRef> {
        self.on_enter.as_ref()
    }

    pub fn leave_script(&self) -> Option<&ScriptRef> {
        self.on_leave.as_ref()
    }

    /// Number of entities currently resolved to this tile.
    pub fn occupancy(&self) -> u32 {
        self.entities
    }

    pub fn is_occupied(&self) -> bool {
        self.entities > 0
    }

    /// Swaps in new static data; the live count stays with this tile.
    pub(crate) fn replace_static(&mut self, tile: Tile) {
        let entities = self.entities;
        *self = Self { entities, ..tile };
    }

    pub(crate) fn enter(&mut self) {
        self.entities += 1;
    }

    /// Returns false, leaving the count untouched, if nobody was here.
    pub(crate) fn leave(&mut self) -> bool {
        match self.entities.checked_sub(1) {
            Some(count) => {
                self.entities = count;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_flags_are_inherited() {
        let water = Arc::new(TileType::new("water", TileFlags::NOWALK));
        let tile = Tile::new()
            .with_flags(TileFlags::NOWALK_NPC)
            .with_type(water);

        assert!(tile.has_flag(TileFlags::NOWALK));
        assert!(tile.has_flag(TileFlags::NOWALK_NPC));
        assert!(!tile.has_flag(TileFlags::NOWALK_PLAYER));
        assert!(!tile.has_flag(TileFlags::empty()));
    }

    #[test]
    fn missing_exit_is_not_an_error() {
        let tile = Tile::new().with_exit(
            ExitKind::Right,
            Exit::new("cave", VirtCoord::new(0, 0, 0.0)),
        );

        assert!(tile.exit(ExitKind::Normal).is_none());
        assert_eq!(tile.exit_at(Facing::RIGHT).map(|e| e.area.as_str()), Some("cave"));
        assert!(tile.exit_at(Facing::LEFT).is_none());
        assert!(tile.exit_at(Facing::new(1, 1)).is_none());
    }

    #[test]
    fn leave_on_empty_tile_is_refused() {
        let mut tile = Tile::new();
        assert!(!tile.leave());
        assert_eq!(tile.occupancy(), 0);

        tile.enter();
        tile.enter();
        assert!(tile.leave());
        assert_eq!(tile.occupancy(), 1);
        assert!(tile.is_occupied());
    }

    #[test]
    fn cardinal_facings_map_to_directional_slots() {
        assert_eq!(ExitKind::from_facing(Facing::UP), Some(ExitKind::Up));
        assert_eq!(ExitKind::from_facing(Facing::DOWN), Some(ExitKind::Down));
        assert_eq!(ExitKind::from_facing(Facing::STANCE), None);
        assert_eq!(ExitKind::from_facing(Facing::new(-1, 1)), None);
    }
}
