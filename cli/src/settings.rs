use std::path::Path;

use anyhow::Context;
use geomerge_core::{GameConfig, OriginScheme};

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Scheme {
    /// Cells anchored at the classroom
    Local,
    /// Cells anchored at 0,0, shared by everyone
    Global,
}

impl From<Scheme> for OriginScheme {
    fn from(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Local => Self::Local,
            Scheme::Global => Self::Global,
        }
    }
}

/// Loads the game config from an optional TOML file, then applies command line overrides.
pub(crate) fn load(path: Option<&Path>, scheme: Option<Scheme>) -> anyhow::Result<GameConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            parse(&text).with_context(|| format!("loading config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if let Some(scheme) = scheme {
        config.origin = scheme.into();
    }
    config.validate().context("invalid game config")?;
    log::debug!("config: {:?}", config);
    Ok(config)
}

fn parse(text: &str) -> anyhow::Result<GameConfig> {
    Ok(toml::from_str(text)?)
}
