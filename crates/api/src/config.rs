use std::path::PathBuf;

use anyhow::Context;
use generator::GeneratorConfig;

const PREFIX: &str = "TIMETABLE__";

/// Process settings, read from `TIMETABLE__*` environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    /// JSON snapshot to seed the store with; empty store otherwise.
    pub catalog_path: Option<PathBuf>,
    pub generator: GeneratorConfig,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| var(&format!("{PREFIX}{key}")).filter(|v| !v.trim().is_empty());

        let port = match get("SERVER__PORT") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("invalid {PREFIX}SERVER__PORT {v:?}"))?,
            None => 8080,
        };
        let mut generator = GeneratorConfig::default();
        if let Some(v) = get("GENERATOR__ACADEMIC_MINUTES") {
            generator.academic_minutes = v
                .trim()
                .parse()
                .with_context(|| format!("invalid {PREFIX}GENERATOR__ACADEMIC_MINUTES {v:?}"))?;
            anyhow::ensure!(generator.academic_minutes > 0, "academic minutes must be positive");
        }
        if let Some(v) = get("GENERATOR__REMOTE_PLATFORM") {
            generator.remote_platform = v;
        }

        Ok(Self {
            port,
            catalog_path: get("CATALOG__PATH").map(PathBuf::from),
            generator,
        })
    }
}
