//! Process-wide generator configuration (ambient; spec §10, supplemented
//! from the original `config.py`).

use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;

/// Optional knobs read from a sidecar TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReflectConfig {
    /// Name of a default factory function the emitter may reference when
    /// constructing a metaclass instance. `None` means "use `new`".
    #[serde(default)]
    pub default_factory: Option<String>,
}

impl ReflectConfig {
    pub fn load(path: &Path) -> Result<Self, crate::error::ReflectError> {
        let text =
            std::fs::read_to_string(path).map_err(|source| crate::error::ReflectError::Io {
                path: path.display().to_string(),
                source,
            })?;
        toml::from_str(&text).map_err(|e| crate::error::ReflectError::MetadataParse {
            location: crate::error::SourceLocation {
                file: path.display().to_string(),
                line: 0,
                column: 0,
            },
            message: e.to_string(),
        })
    }
}

static GLOBAL_CONFIG: OnceLock<ReflectConfig> = OnceLock::new();

/// Installs the process-wide config. Invocations that never call this see
/// `ReflectConfig::default()` from [`global_config`].
pub fn set_global_config(config: ReflectConfig) {
    let _ = GLOBAL_CONFIG.set(config);
}

pub fn global_config() -> &'static ReflectConfig {
    GLOBAL_CONFIG.get_or_init(ReflectConfig::default)
}
