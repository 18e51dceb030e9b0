
use {
    log::LevelFilter,
    serde::Deserialize,
    std::{io, path::Path},
    thiserror::Error,
};

pub const DEFAULT_MAX_SUBSURFACE_DEPTH: u32 = 100;
pub const DEFAULT_MAX_OBJECTS_PER_CLIENT: usize = 1 << 16;
pub const MAX_XDG_WM_BASE_VERSION: u32 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {0}")]
    Read(String, #[source] io::Error),
    #[error("Could not parse the configuration")]
    Parse(#[source] Box<toml::de::Error>),
    #[error("xdg-wm-base-version must be between 1 and 3, got {0}")]
    XdgWmBaseVersion(u32),
    #[error("max-objects-per-client must not be 0")]
    NoObjects,
}
efrom!(ConfigError, Parse, toml::de::Error);

/// When a configure must be acknowledged before the next commit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AckPolicy {
    /// Only the first configure of a surface gates its commits.
    #[default]
    FirstConfigure,
    /// Every configure gates commits until it has been acked.
    EveryConfigure,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ShellConfig {
    pub xdg_wm_base_version: u32,
    pub max_subsurface_depth: u32,
    pub max_objects_per_client: usize,
    pub ack_policy: AckPolicy,
    pub log_level: LevelFilter,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            xdg_wm_base_version: MAX_XDG_WM_BASE_VERSION,
            max_subsurface_depth: DEFAULT_MAX_SUBSURFACE_DEPTH,
            max_objects_per_client: DEFAULT_MAX_OBJECTS_PER_CLIENT,
            ack_policy: AckPolicy::default(),
            log_level: LevelFilter::Info,
        }
    }
}

impl ShellConfig {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => return Err(ConfigError::Read(path.display().to_string(), e)),
        };
        Self::parse(&s)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.xdg_wm_base_version == 0 || self.xdg_wm_base_version > MAX_XDG_WM_BASE_VERSION {
            return Err(ConfigError::XdgWmBaseVersion(self.xdg_wm_base_version));
        }
        if self.max_objects_per_client == 0 {
            return Err(ConfigError::NoObjects);
        }
        Ok(())
    }
}
