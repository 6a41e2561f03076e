use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use runes_core::{GameConfig, Session};

/// Reads a TOML game config, any missing key keeps its default.
pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read config {}", path.display()))?;
    let config = parse_config(&text).with_context(|| format!("bad config {}", path.display()))?;
    log::debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

fn parse_config(text: &str) -> anyhow::Result<GameConfig> {
    let config: GameConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// JSON file remembering the current level and the highest level unlocked.
#[derive(Clone, Debug)]
pub(crate) struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing file is a fresh start, an unreadable one is an error.
    pub(crate) fn load(&self) -> anyhow::Result<Session> {
        if !self.path.exists() {
            log::debug!("No progress at {}, starting fresh", self.path.display());
            return Ok(Session::default());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("could not read progress {}", self.path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("corrupt progress {}", self.path.display()))
    }

    pub(crate) fn save(&self, session: &Session) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, text)
            .with_context(|| format!("could not write progress {}", self.path.display()))?;
        log::debug!("Saved progress to {}", self.path.display());
        Ok(())
    }
}
