use crate::engine::{Order, Role};
use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "gsolver.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: Option<PathBuf>,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub role: Role,
    pub order: Order,
    /// Bound on outer steps. Derived from the input when absent.
    pub max_iterations: Option<usize>,
    pub seed: Option<u64>,
    /// Run both roles with both orders instead of `role` and `order` only.
    pub scenarios: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            role: Role::default(),
            order: Order::default(),
            max_iterations: None,
            seed: None,
            scenarios: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub assignments: Option<PathBuf>,
    pub events: Option<PathBuf>,
}

impl Config {
    pub fn load(file_name: &Path) -> Result<Config> {
        let content = fs::read_to_string(file_name).wrap_err("cannot load configuration file")?;
        toml::from_str(&content)
            .wrap_err_with(|| format!("cannot parse configuration file {}", file_name.display()))
    }

    /// Load `file_name` if given, the default configuration file if it
    /// exists, or the built-in defaults otherwise.
    pub fn load_or_default(file_name: Option<&Path>) -> Result<Config> {
        match file_name {
            Some(file_name) => Config::load(file_name),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Config::load(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Config::default()),
        }
    }
}
