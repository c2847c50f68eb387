use serde::{Deserialize, Serialize};
use std::fs;

/// Last-used GUI inputs, persisted next to the executable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_config_path")]
    pub config_path: String,
    #[serde(default)]
    pub process_name: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            process_name: String::new(),
        }
    }
}

fn default_config_path() -> String {
    "clicker_config.json".to_string()
}

impl AppSettings {
    const SETTINGS_FILE: &'static str = "autoclicker_settings.json";

    /// Load settings from file, or fall back to defaults
    pub fn load() -> Self {
        match fs::read_to_string(Self::SETTINGS_FILE) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        fs::write(Self::SETTINGS_FILE, json)
            .map_err(|e| format!("Failed to write settings: {}", e))?;
        Ok(())
    }

    /// Auto-save (ignores errors)
    pub fn auto_save(&self) {
        let _ = self.save();
    }
}
