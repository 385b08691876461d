//! Load configuration (scene.toml)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, ResultExt};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Threads for the mesh stage. `None` uses rayon's global pool.
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Weld identical vertices after assembly.
    #[serde(default = "default_true")]
    pub deduplicate: bool,
    /// Scene to instantiate. Defaults to the document's choice.
    #[serde(default)]
    pub scene: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            deduplicate: true,
            scene: None,
        }
    }
}

impl LoadConfig {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).with_context(|| format!("parsing {}", path.display()))
    }
}
