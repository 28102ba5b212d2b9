use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    ai::api::DEFAULT_MODEL,
    core::{
        LanguageConfig,
        LexineError,
    },
    persistence::{
        load_json_or_default,
        save_json,
    },
    scheduler::SchedulerConfig,
};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsData {
    pub api_key: Option<String>,
    pub model: String,
    pub languages: LanguageConfig,
    pub scheduler: SchedulerConfig,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            languages: LanguageConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl SettingsData {
    pub fn load() -> Self {
        load_json_or_default(SETTINGS_FILE)
    }

    pub fn save(&self) -> Result<(), LexineError> {
        save_json(self, SETTINGS_FILE)
    }

    /// The access credential, from the settings file or the environment.
    /// Absence is an expected condition, not an error.
    pub fn credential(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok().filter(|key| !key.is_empty()))
    }
}
