use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::engine::EngineConfig;
use crate::matcher::MatcherConfig;
use crate::optimizer::OptimizerConfig;

/// Process configuration for the evaluation binary. Library callers build
/// `EngineConfig` directly; this layer only exists for the CLI harness.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub inputs: InputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub catalog_path: String,
    pub project_path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            catalog_path: "catalog.json".into(),
            project_path: "project.json".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("ISE__").split("__"));
        Ok(figment.extract()?)
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            matcher: self.matcher,
            optimizer: self.optimizer,
        }
    }
}
