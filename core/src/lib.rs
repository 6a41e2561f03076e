//! Game logic for a rune summoning puzzle played on a small toroidal grid.
//!
//! A level hides a few demons among runes. The player memorizes the grid, drags rows and columns around (they wrap),
//! then summons one rune type: every demon sitting between two runes of that type is converted. Clearing all demons
//! wins the level.

pub use config::*;
pub use drag::*;
pub use error::*;
pub use events::*;
pub use game::*;
pub use generator::*;
pub use grid::*;
pub use session::*;
pub use summon::*;
pub use types::*;

mod config;
mod drag;
mod error;
mod events;
mod game;
mod generator;
mod grid;
mod session;
mod summon;
mod types;
