use crate::*;
pub use seeded::*;

mod seeded;

pub trait LevelGenerator {
    fn generate(&self, level: u32) -> Grid;
}

/// How many demons hide in a level: one more every five levels, capped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DemonPolicy {
    pub max_demons: CellCount,
}

impl DemonPolicy {
    pub const LEVELS_PER_DEMON: u32 = 5;

    pub const fn new(max_demons: CellCount) -> Self {
        Self { max_demons }
    }

    pub fn demons_for_level(&self, level: u32, total_cells: CellCount) -> CellCount {
        let level = level.max(1);
        let wanted = level.saturating_add(Self::LEVELS_PER_DEMON - 1) / Self::LEVELS_PER_DEMON;
        let wanted = CellCount::try_from(wanted).unwrap_or(CellCount::MAX);
        let count = wanted.min(self.max_demons);
        if count > total_cells {
            log::warn!(
                "Grid too small for {} demons, placing {} instead",
                count,
                total_cells
            );
        }
        count.min(total_cells)
    }
}

impl Default for DemonPolicy {
    fn default() -> Self {
        Self::new(GameConfig::DEFAULT_MAX_DEMONS)
    }
}
