use serde::{Deserialize, Serialize};

use crate::*;

/// Pointer input over the grid viewport. For one gesture a `Down` always precedes its `Move`s, which precede its `Up`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
}

/// A completed drag, already applied to the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridChanged {
    pub axis: Axis,
    /// Row for horizontal shifts, column for vertical ones.
    pub index: Coord,
    pub delta_cells: i32,
}

/// Everything the game asks of its front-end, in the order it must happen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GridChanged(GridChanged),
    Render(GridView),
    PhaseChanged(Phase),
    /// A demon was converted during a summon; front-ends pause between these for effect.
    SummonMatch(Coord2),
    LevelResult { level: u32, won: bool },
}
