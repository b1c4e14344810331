//! Configuration loading from quill.toml and the environment.

use policy::{ConfirmRules, Policy};
use serde::Deserialize;
use std::path::Path;

/// Config file read from the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "quill.toml";

const DEFAULT_TOOLKIT: &str = "NotionToolkit";
const DEFAULT_LIMIT: usize = 30;

/// Notion tools that write to the workspace.
const DEFAULT_CONFIRMED_TOOLS: [&str; 2] = [
    "NotionToolkit_CreatePage",
    "NotionToolkit_AppendContentToEndOfPage",
];

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Model backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Tool service configuration.
    #[serde(default)]
    pub arcade: ArcadeConfig,

    /// Tools requiring confirmation. Absent means the Notion write tools.
    #[serde(default)]
    pub confirm: Option<ConfirmRules>,
}

/// Model backend configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Model to use. `OPENAI_MODEL` takes precedence.
    pub model: Option<String>,

    /// Chat-completions endpoint. `OPENAI_BASE_URL` takes precedence.
    pub base_url: Option<String>,

    pub max_tokens: Option<u32>,
}

/// Tool service configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArcadeConfig {
    /// API endpoint. `ARCADE_BASE_URL` takes precedence.
    pub base_url: Option<String>,

    /// Toolkits whose tools are all loaded.
    #[serde(default = "default_toolkits")]
    pub toolkits: Vec<String>,

    /// Individual tools loaded in addition to the toolkits.
    #[serde(default)]
    pub tools: Vec<String>,

    /// Most tools taken from each toolkit.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            toolkits: default_toolkits(),
            tools: Vec::new(),
            limit: default_limit(),
        }
    }
}

fn default_toolkits() -> Vec<String> {
    vec![DEFAULT_TOOLKIT.to_string()]
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load `path` if given, else `quill.toml` if present, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load(CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// The confirmation policy, validated.
    pub fn policy(&self) -> Result<Policy, ConfigError> {
        match &self.confirm {
            Some(rules) => Ok(Policy::from_rules(rules.clone())?),
            None => Ok(Policy::new(DEFAULT_CONFIRMED_TOOLS)),
        }
    }
}

/// Everything needed to reach the tool service.
#[derive(Debug)]
pub struct ArcadeSettings {
    pub api_key: String,
    pub base_url: String,
    pub toolkits: Vec<String>,
    pub tools: Vec<String>,
    pub limit: usize,
    pub policy: Policy,
}

impl ArcadeSettings {
    /// Combine the tool service part of `config` with `env`.
    pub fn resolve<F>(config: Config, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let policy = config.policy()?;
        Ok(Self {
            api_key: required(&env, "ARCADE_API_KEY")?,
            base_url: var(&env, "ARCADE_BASE_URL")
                .or(config.arcade.base_url)
                .unwrap_or_else(|| arcade::DEFAULT_BASE_URL.to_string()),
            toolkits: config.arcade.toolkits,
            tools: config.arcade.tools,
            limit: config.arcade.limit,
            policy,
        })
    }

    /// Resolve against the process environment.
    pub fn from_env(config: Config) -> Result<Self, ConfigError> {
        Self::resolve(config, |name| std::env::var(name).ok())
    }
}

/// Everything needed to start the agent, from the config and environment.
#[derive(Debug)]
pub struct Settings {
    pub user_id: String,
    pub model: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub max_tokens: Option<u32>,
    pub arcade: ArcadeSettings,
}

impl Settings {
    /// Combine `config` with variables looked up through `env`.
    ///
    /// Environment values win over the file. Blank values count as unset.
    pub fn resolve<F>(mut config: Config, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = std::mem::take(&mut config.backend);
        let arcade = ArcadeSettings::resolve(config, &env)?;
        let model = var(&env, "OPENAI_MODEL")
            .or(backend.model)
            .ok_or(ConfigError::MissingEnv("OPENAI_MODEL"))?;

        Ok(Self {
            user_id: required(&env, "ARCADE_USER_ID")?,
            model,
            openai_api_key: required(&env, "OPENAI_API_KEY")?,
            openai_base_url: var(&env, "OPENAI_BASE_URL")
                .or(backend.base_url)
                .unwrap_or_else(|| runtime::OPENAI_BASE_URL.to_string()),
            max_tokens: backend.max_tokens,
            arcade,
        })
    }

    /// Resolve against the process environment.
    pub fn from_env(config: Config) -> Result<Self, ConfigError> {
        Self::resolve(config, |name| std::env::var(name).ok())
    }
}

fn var<F>(env: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(name).filter(|v| !v.trim().is_empty())
}

fn required<F>(env: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    var(env, name).ok_or(ConfigError::MissingEnv(name))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("{0} not set")]
    MissingEnv(&'static str),

    #[error("invalid confirmation policy: {0}")]
    Policy(#[from] policy::Error),
}
