use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl Default for MouseButton {
    fn default() -> Self {
        MouseButton::Left
    }
}

/// One step of a task's action sequence. Offsets are signed pixel deltas
/// applied to the resolved match location.
///
/// The set is closed: a config naming any other action kind is rejected
/// when the file is parsed, not when the action would run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Action {
    Move {
        offset_x: i32,
        offset_y: i32,
    },
    Click {
        offset_x: i32,
        offset_y: i32,
        #[serde(default)]
        button: MouseButton,
    },
    Delay {
        milliseconds: u64,
    },
}

/// One automation rule: alternative icon groups and the actions to run when
/// one of them fully matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Alternative sets of template file names. Every icon of a set must
    /// match the same capture for the set to fire; earlier sets have
    /// priority over later ones.
    pub icon_groups: Vec<Vec<String>>,
    pub actions: Vec<Action>,
    /// Pause after this task, matched or not.
    #[serde(default)]
    pub delay_ms: u64,
}

/// Automation bundle for one target process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessProfile {
    pub process_name: String,
    /// Template directory, relative to the config file.
    #[serde(default = "default_resource_path")]
    pub resource_path: String,
    /// Minimum confidence for a template to count as found, in (0, 1].
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,
    pub tasks: Vec<Task>,
}

fn default_resource_path() -> String {
    "resources".to_string()
}

fn default_match_threshold() -> f32 {
    0.8
}

/// Top-level config file: one profile per supported process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickerConfig {
    pub processes: Vec<ProcessProfile>,
}

impl ClickerConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        let config: ClickerConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
        config.validate()?;
        log::info!(
            "Loaded config from {} ({} profiles)",
            path.display(),
            config.processes.len()
        );
        Ok(config)
    }

    /// Reject configs that would otherwise only fail later, deep inside the
    /// task loop.
    pub fn validate(&self) -> Result<(), String> {
        if self.processes.is_empty() {
            return Err("Config contains no process profiles".to_string());
        }
        for profile in &self.processes {
            if profile.process_name.trim().is_empty() {
                return Err("Profile with empty process_name".to_string());
            }
            if !(profile.match_threshold > 0.0 && profile.match_threshold <= 1.0) {
                return Err(format!(
                    "Profile {}: match_threshold {} outside (0, 1]",
                    profile.process_name, profile.match_threshold
                ));
            }
            for (task_idx, task) in profile.tasks.iter().enumerate() {
                if task.icon_groups.is_empty() {
                    return Err(format!(
                        "Profile {}, task {}: no icon groups",
                        profile.process_name, task_idx
                    ));
                }
                if task.icon_groups.iter().any(|group| group.is_empty()) {
                    return Err(format!(
                        "Profile {}, task {}: empty icon group",
                        profile.process_name, task_idx
                    ));
                }
            }
        }
        Ok(())
    }

    /// Profile lookup by process name, case-insensitive.
    pub fn find_profile(&self, process_name: &str) -> Option<&ProcessProfile> {
        let wanted = process_name.to_lowercase();
        self.processes
            .iter()
            .find(|p| p.process_name.to_lowercase() == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "processes": [
            {
                "process_name": "game",
                "resource_path": "icons",
                "match_threshold": 0.9,
                "tasks": [
                    {
                        "icon_groups": [["popup.png", "ok.png"], ["ok.png"]],
                        "actions": [
                            { "Move": { "offset_x": 5, "offset_y": 5 } },
                            { "Click": { "offset_x": 5, "offset_y": 5, "button": "Left" } },
                            { "Delay": { "milliseconds": 50 } }
                        ],
                        "delay_ms": 100
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_a_full_config() {
        let config: ClickerConfig = serde_json::from_str(SAMPLE).unwrap();
        config.validate().unwrap();
        let profile = &config.processes[0];
        assert_eq!(profile.process_name, "game");
        assert_eq!(profile.resource_path, "icons");
        assert_eq!(profile.match_threshold, 0.9);
        assert_eq!(profile.tasks[0].icon_groups.len(), 2);
        assert_eq!(profile.tasks[0].actions.len(), 3);
        assert_eq!(profile.tasks[0].delay_ms, 100);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let json = r#"{
            "processes": [
                {
                    "process_name": "game",
                    "tasks": [
                        {
                            "icon_groups": [["ok.png"]],
                            "actions": [{ "Click": { "offset_x": 0, "offset_y": 0 } }]
                        }
                    ]
                }
            ]
        }"#;
        let config: ClickerConfig = serde_json::from_str(json).unwrap();
        let profile = &config.processes[0];
        assert_eq!(profile.resource_path, "resources");
        assert_eq!(profile.match_threshold, 0.8);
        assert_eq!(profile.tasks[0].delay_ms, 0);
        assert_eq!(
            profile.tasks[0].actions[0],
            Action::Click {
                offset_x: 0,
                offset_y: 0,
                button: MouseButton::Left
            }
        );
    }

    #[test]
    fn unknown_action_kind_is_rejected_at_parse_time() {
        let json = r#"{
            "processes": [
                {
                    "process_name": "game",
                    "tasks": [
                        {
                            "icon_groups": [["ok.png"]],
                            "actions": [{ "Scroll": { "amount": 3 } }]
                        }
                    ]
                }
            ]
        }"#;
        let err = serde_json::from_str::<ClickerConfig>(json).unwrap_err();
        assert!(err.to_string().contains("unknown variant"));
    }

    #[test]
    fn out_of_range_threshold_fails_validation() {
        let mut config: ClickerConfig = serde_json::from_str(SAMPLE).unwrap();
        config.processes[0].match_threshold = 0.0;
        assert!(config.validate().is_err());
        config.processes[0].match_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_icon_group_fails_validation() {
        let mut config: ClickerConfig = serde_json::from_str(SAMPLE).unwrap();
        config.processes[0].tasks[0].icon_groups.push(Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn profile_lookup_ignores_case() {
        let config: ClickerConfig = serde_json::from_str(SAMPLE).unwrap();
        assert!(config.find_profile("GAME").is_some());
        assert!(config.find_profile("other").is_none());
    }
}
