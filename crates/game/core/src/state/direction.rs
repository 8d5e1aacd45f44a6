use std::fmt;

/// Symbolic direction names indexed by `[y + 1][x + 1]`. Screen space: `y`
/// grows downward.
const DIRECTIONS: [[&str; 3]; 3] = [
    ["up-left", "up", "up-right"],
    ["left", "stance", "right"],
    ["down-left", "down", "down-right"],
];

/// Facing vector with each component clamped to `{-1, 0, 1}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facing {
    x: i8,
    y: i8,
}

impl Facing {
    pub const STANCE: Self = Self { x: 0, y: 0 };
    pub const UP: Self = Self { x: 0, y: -1 };
    pub const DOWN: Self = Self { x: 0, y: 1 };
    pub const LEFT: Self = Self { x: -1, y: 0 };
    pub const RIGHT: Self = Self { x: 1, y: 0 };

    /// Builds a facing from an arbitrary delta; only the sign of each
    /// component is kept.
    pub fn new(dx: i32, dy: i32) -> Self {
        Self {
            x: dx.signum() as i8,
            y: dy.signum() as i8,
        }
    }

    pub const fn x(self) -> i32 {
        self.x as i32
    }

    pub const fn y(self) -> i32 {
        self.y as i32
    }

    pub const fn is_stance(self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Direction name used to build phase names, e.g. `"down-left"`.
    pub fn name(self) -> &'static str {
        DIRECTIONS[(self.y + 1) as usize][(self.x + 1) as usize]
    }
}

impl Default for Facing {
    fn default() -> Self {
        Self::DOWN
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
