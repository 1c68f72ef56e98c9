use crate::logging;
use crate::settings::{Keymaps, Settings};
use eyre::Result;
use serde::de::DeserializeOwned;
use std::{fs, path::PathBuf};

pub const APP_DIR_NAME: &str = "quick-reader";
pub const CONFIG_FILE_NAME: &str = "configuration.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub keymaps: Keymaps,
    // `None` for a config that is never written back
    filepath: Option<PathBuf>,
}

impl Config {
    /// Load the configuration from the app data directory, writing a default
    /// file on first run.
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        let filepath = prefix.join(CONFIG_FILE_NAME);

        if filepath.exists() {
            return Self::load_from(filepath);
        }

        let config = Self {
            settings: Settings::default(),
            keymaps: Keymaps::default(),
            filepath: Some(filepath),
        };
        config.save()?;
        Ok(config)
    }

    /// Get the configuration file path
    pub fn filepath(&self) -> Option<&PathBuf> {
        self.filepath.as_ref()
    }

    /// Create a config that saves to `filepath` without reading it.
    pub fn with_settings(settings: Settings, keymaps: Keymaps, filepath: PathBuf) -> Self {
        Self {
            settings,
            keymaps,
            filepath: Some(filepath),
        }
    }

    /// Defaults that live only for this run. `save` refuses to write them.
    pub fn in_memory() -> Self {
        Self {
            settings: Settings::default(),
            keymaps: Keymaps::default(),
            filepath: None,
        }
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<()> {
        let Some(filepath) = &self.filepath else {
            return Err(eyre::eyre!(
                "no configuration file, changes last until exit"
            ));
        };

        let config_json = serde_json::json!({
            "Setting": self.settings,
            "Keymap": self.keymaps,
        });

        let config_str = serde_json::to_string_pretty(&config_json)?;

        // Ensure directory exists before writing
        if let Some(parent) = filepath.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(filepath, config_str)?;
        logging::debug(format!("configuration saved to {}", filepath.display()));
        Ok(())
    }

    /// Load configuration from a custom path. A missing or unreadable file
    /// yields defaults; each section falls back to defaults on its own.
    pub fn load_from(filepath: PathBuf) -> Result<Self> {
        let mut settings = Settings::default();
        let mut keymaps = Keymaps::default();

        if filepath.exists() {
            let config_str = fs::read_to_string(&filepath)?;
            match serde_json::from_str::<serde_json::Value>(&config_str) {
                Ok(user_config) => {
                    if let Some(section) = section(&user_config, "Setting") {
                        settings = section;
                    }
                    if let Some(section) = section(&user_config, "Keymap") {
                        keymaps = section;
                    }
                }
                Err(err) => logging::warn(format!(
                    "ignoring unreadable configuration {}: {}",
                    filepath.display(),
                    err
                )),
            }
        }

        Ok(Self {
            settings,
            keymaps,
            filepath: Some(filepath),
        })
    }
}

fn section<T: DeserializeOwned>(config: &serde_json::Value, name: &str) -> Option<T> {
    let value = config.get(name)?;
    match serde_json::from_value(value.clone()) {
        Ok(section) => Some(section),
        Err(err) => {
            logging::warn(format!("ignoring invalid \"{}\" section: {}", name, err));
            None
        }
    }
}

pub fn get_app_data_prefix() -> Result<PathBuf> {
    if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(config_home).join(APP_DIR_NAME);
        return Ok(path);
    } else if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home.clone()).join(".config").join(APP_DIR_NAME);
        if path.exists() {
            return Ok(path);
        } else {
            return Ok(PathBuf::from(home).join(format!(".{}", APP_DIR_NAME)));
        }
    } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
        return Ok(PathBuf::from(user_profile).join(format!(".{}", APP_DIR_NAME)));
    }

    Err(eyre::eyre!(
        "Could not determine application data directory"
    ))
}
