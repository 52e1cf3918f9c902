use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

pub const DATA_DIR_ENV: &str = "PERIOP_DATA_DIR";

const UNKNOWN_OPERATOR: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriopConfig {
    /// Schema version. A file without one is read as the current version.
    #[serde(default = "current_version")]
    pub config_version: u32,
    pub data_dir: PathBuf,
    /// Recorded as the actor on audit events. Blank means "unknown".
    #[serde(default)]
    pub operator: String,
    pub created_at: jiff::Timestamp,
}

impl PeriopConfig {
    pub fn new(data_dir: PathBuf, operator: impl Into<String>) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            data_dir,
            operator: operator.into(),
            created_at: jiff::Timestamp::now(),
        }
    }

    pub fn actor(&self) -> &str {
        match self.operator.trim() {
            "" => UNKNOWN_OPERATOR,
            operator => operator,
        }
    }
}

fn current_version() -> u32 {
    CURRENT_VERSION
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("periop"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub fn default_data_dir() -> eyre::Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| eyre::eyre!("no data directory found"))?;
    Ok(base.join("periop"))
}

/// Load the config from its platform location, `None` if there is none yet.
pub fn load_config() -> eyre::Result<Option<PeriopConfig>> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> eyre::Result<Option<PeriopConfig>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(eyre::eyre!(
                "failed to read config at {}: {e}",
                path.display()
            ));
        }
    };

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(u64::from(CURRENT_VERSION));
    let on_disk_version = u32::try_from(on_disk_version)
        .map_err(|_| eyre::eyre!("config_version {on_disk_version} is out of range"))?;

    let migrated = migrate(json, on_disk_version)?;
    Ok(Some(serde_json::from_value(migrated)?))
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value. v1 is the
/// first released shape, so the chain is still empty.
pub fn migrate(json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update periop."
        ));
    }

    if !json.is_object() {
        return Err(eyre::eyre!("config is not a JSON object"));
    }
    if from_version < CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} predates the first release ({CURRENT_VERSION})"
        ));
    }

    Ok(json)
}

/// Save to the platform location. Returns the path written.
pub fn save_config(config: &PeriopConfig) -> eyre::Result<PathBuf> {
    let path = config_path()?;
    save_config_to(&path, config)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, config: &PeriopConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    std::fs::write(&tmp_path, json.as_bytes())?;

    // Set restrictive permissions on Unix before renaming
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

/// Pick the record directory: `--data-dir` beats `PERIOP_DATA_DIR`, which
/// beats the config file, which beats the platform default.
pub fn resolve_data_dir(
    flag: Option<&Path>,
    env: Option<PathBuf>,
    config: Option<&PeriopConfig>,
) -> eyre::Result<PathBuf> {
    if let Some(flag) = flag {
        return Ok(flag.to_path_buf());
    }
    if let Some(env) = env.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(env);
    }
    match config {
        Some(config) => Ok(config.data_dir.clone()),
        None => default_data_dir(),
    }
}
