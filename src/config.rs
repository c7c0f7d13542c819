use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use toml;

/// Defaults shipped with the binary; also used as the blueprint for the user config.
pub const DEFAULT_CONFIG: &str = r#"# todotab settings
# data_dir = "~/.local/share/todotab"
# repo_path = "."
autosave_file = "autosave.json"
export_file = "todo-export.json"
git_log_limit = 200
restore_autosave = true
log_level = "info"
"#;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub data_dir: Option<String>,
    pub repo_path: Option<String>,
    pub autosave_file: String,
    pub export_file: String,
    pub git_log_limit: Option<usize>,
    pub restore_autosave: bool,
    pub log_level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let user_config_path = get_user_config_path();

        let mut builder = Config::builder()
            // 1. Built-in defaults.
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
        // 2. User's global config.
        if let Some(path) = user_config_path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let s = builder
            // 3. Local todotab.toml from CWD. Optional override.
            .add_source(File::with_name("todotab").format(FileFormat::Toml).required(false))
            // 4. TODOTAB_* environment variables.
            .add_source(Environment::with_prefix("TODOTAB").try_parsing(true))
            .build()?;

        s.try_deserialize()
    }

    /// Directory holding autosave, UI state and the log file.
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).into_owned()),
            None => dirs::data_dir()
                .map(|d| d.join("todotab"))
                .unwrap_or_else(|| PathBuf::from(".todotab")),
        }
    }

    pub fn repo_path(&self) -> PathBuf {
        match &self.repo_path {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).into_owned()),
            None => PathBuf::from("."),
        }
    }

    pub fn autosave_path(&self) -> PathBuf {
        self.data_dir().join(&self.autosave_file)
    }

    pub fn export_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.export_file).into_owned())
    }
}

pub fn get_user_config_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".config");
    path.push("todotab");
    path.push("todotab.toml");
    Some(path)
}

/// Writes the default config to `path` on first run. Returns whether a file was created.
pub fn seed_user_config(path: &Path) -> io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_CONFIG)?;
    Ok(true)
}

/// Sets one top-level key in the user config file, keeping the others.
pub fn save_setting(key: &str, value: toml::Value) -> Result<(), anyhow::Error> {
    let user_config_path = get_user_config_path()
        .ok_or_else(|| anyhow::anyhow!("No home directory to store settings in"))?;

    let config_str = fs::read_to_string(&user_config_path).unwrap_or_else(|_| "".to_string());
    let mut doc = config_str.parse::<toml::Table>()?;

    doc.insert(key.to_string(), value);

    if let Some(parent) = user_config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&user_config_path, doc.to_string())?;

    Ok(())
}
