use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// Single coordinate axis used for grid width, height, and positions.
pub type Coord = u8;

/// Count type used for demon counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Number of distinct summonable rune types.
pub const RUNE_KINDS: u8 = 6;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Direction of a row or column shift.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Shift along x, the index names a row.
    Horizontal,
    /// Shift along y, the index names a column.
    Vertical,
}

impl Axis {
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }
}

/// One of the summonable rune types, always in `1..=RUNE_KINDS`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rune(u8);

impl Rune {
    pub fn new(kind: u8) -> Result<Self> {
        if (1..=RUNE_KINDS).contains(&kind) {
            Ok(Self(kind))
        } else {
            Err(GameError::InvalidRune)
        }
    }

    pub(crate) const fn new_unchecked(kind: u8) -> Self {
        Self(kind)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Rune> {
        (1..=RUNE_KINDS).map(Rune)
    }
}

impl TryFrom<u8> for Rune {
    type Error = GameError;

    fn try_from(kind: u8) -> Result<Self> {
        Self::new(kind)
    }
}

impl From<Rune> for u8 {
    fn from(rune: Rune) -> u8 {
        rune.0
    }
}

impl fmt::Display for Rune {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical cell state stored in the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Demon,
    Rune(Rune),
}

impl Cell {
    /// Numeric code matching the sprite sheet frame, demons are `0`.
    pub const fn code(self) -> u8 {
        match self {
            Self::Demon => 0,
            Self::Rune(rune) => rune.get(),
        }
    }

    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Demon),
            kind => Rune::new(kind)
                .map(Self::Rune)
                .map_err(|_| GameError::InvalidCellCode),
        }
    }

    pub const fn is_demon(self) -> bool {
        matches!(self, Self::Demon)
    }
}

/// Player-visible state of a cell in a filtered projection of the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Hidden,
    Demon,
    Rune(Rune),
}

impl Tile {
    pub const HIDDEN_CODE: u8 = RUNE_KINDS + 1;

    pub const fn code(self) -> u8 {
        match self {
            Self::Hidden => Self::HIDDEN_CODE,
            Self::Demon => 0,
            Self::Rune(rune) => rune.get(),
        }
    }

    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::Hidden
    }
}

impl From<Cell> for Tile {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Demon => Tile::Demon,
            Cell::Rune(rune) => Tile::Rune(rune),
        }
    }
}

/// Position in viewport pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}
