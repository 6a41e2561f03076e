use serde::{Deserialize, Serialize};

use crate::*;

/// Tunables for a play session. Every field has a default so partial config files are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    /// Side of a grid cell in viewport pixels.
    pub cell_size: f32,
    /// Pointer travel in pixels before a drag commits to an axis.
    pub dead_zone: f32,
    pub max_demons: CellCount,
    pub seed_prefix: String,
    pub reveal_secs_start: u32,
    pub reveal_secs_step: u32,
    pub reveal_secs_min: u32,
}

impl GameConfig {
    pub const DEFAULT_SIZE: Coord2 = (6, 6);
    pub const DEFAULT_CELL_SIZE: f32 = 82.0;
    pub const DEFAULT_DEAD_ZONE: f32 = 8.0;
    pub const DEFAULT_MAX_DEMONS: CellCount = 4;

    pub fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::InvalidConfig("grid dimensions must be positive"));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(GameError::InvalidConfig("cell size must be positive"));
        }
        if !(self.dead_zone.is_finite() && self.dead_zone >= 0.0) {
            return Err(GameError::InvalidConfig("dead zone must not be negative"));
        }
        Ok(())
    }

    /// Seconds the full grid stays visible before hiding, shrinking with the level.
    pub fn reveal_secs(&self, level: u32) -> u32 {
        self.reveal_secs_start
            .saturating_sub(level.saturating_mul(self.reveal_secs_step))
            .max(self.reveal_secs_min)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let (width, height) = Self::DEFAULT_SIZE;
        Self {
            width,
            height,
            cell_size: Self::DEFAULT_CELL_SIZE,
            dead_zone: Self::DEFAULT_DEAD_ZONE,
            max_demons: Self::DEFAULT_MAX_DEMONS,
            seed_prefix: "ABC".to_string(),
            reveal_secs_start: 62,
            reveal_secs_step: 2,
            reveal_secs_min: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.total_cells(), 36);
    }

    #[test]
    fn reveal_time_shrinks_to_floor() {
        let config = GameConfig::default();
        assert_eq!(config.reveal_secs(1), 60);
        assert_eq!(config.reveal_secs(10), 42);
        assert_eq!(config.reveal_secs(21), 20);
        assert_eq!(config.reveal_secs(500), 20);
    }

    #[test]
    fn rejects_degenerate_values() {
        let config = GameConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let config = GameConfig {
            cell_size: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            dead_zone: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"max_demons": 2}"#).unwrap();
        assert_eq!(config.max_demons, 2);
        assert_eq!(config.size(), (6, 6));
        assert_eq!(config.seed_prefix, "ABC");
    }
}
