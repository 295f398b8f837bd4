// Application state module
// Shared, read-only state handed to every connection

use super::types::Config;
use crate::skills::SkillStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: SkillStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = SkillStore::new(
            config.storage.skills_dir.clone(),
            config.storage.skill_file.clone(),
        );
        Self { config, store }
    }
}
