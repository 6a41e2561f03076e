use serde::{Deserialize, Serialize};

/// Progress shared between the menu and the game: the level being played and the furthest level unlocked.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    level: u32,
    max_level_reached: u32,
}

impl Session {
    pub fn new(level: u32) -> Self {
        let level = level.max(1);
        Self {
            level,
            max_level_reached: level,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level_reached(&self) -> u32 {
        self.max_level_reached
    }

    /// Unlocks the level after the current one.
    pub fn record_win(&mut self) {
        self.max_level_reached = self.max_level_reached.max(self.level.saturating_add(1));
    }

    pub fn advance(&mut self) {
        self.jump_to(self.level.saturating_add(1));
    }

    pub fn jump_to(&mut self, level: u32) {
        self.level = level.max(1);
        self.max_level_reached = self.max_level_reached.max(self.level);
    }

    /// Back to the first level, keeping the unlock record.
    pub fn reset(&mut self) {
        self.level = 1;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(1)
    }
}
