#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::csv_store::RosterColumns;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

pub const DEFAULT_ROSTER_PATH: &str = "students.csv";
pub const DEFAULT_OUTBOX_PATH: &str = "./outbox";
pub const DEFAULT_GROUP_SIZE: usize = 6;
pub const DEFAULT_SUBJECT: &str = "Small Group Dinner Invite";
pub const DEFAULT_REQUEST_SUBJECT: &str = "Weekly Dinner Bot: Details Request";

/// Effective settings for one run: built-in defaults, then the TOML file,
/// then command-line overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub roster_path: String,
    pub columns: RosterColumns,
    pub group_size: usize,
    pub use_sections: bool,
    pub seed: Option<u64>,
    pub outbox_path: String,
    pub sender: Option<String>,
    pub subject: String,
    pub request_subject: String,
    pub organizer: Option<String>,
    pub location_notes: Option<String>,
    pub topics: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            roster_path: DEFAULT_ROSTER_PATH.to_string(),
            columns: RosterColumns::default(),
            group_size: DEFAULT_GROUP_SIZE,
            use_sections: false,
            seed: None,
            outbox_path: DEFAULT_OUTBOX_PATH.to_string(),
            sender: None,
            subject: DEFAULT_SUBJECT.to_string(),
            request_subject: DEFAULT_REQUEST_SUBJECT.to_string(),
            organizer: None,
            location_notes: None,
            topics: Vec::new(),
        }
    }
}

impl From<TomlConfig> for Settings {
    fn from(config: TomlConfig) -> Self {
        let defaults = Settings::default();
        Self {
            roster_path: config.roster.path.unwrap_or(defaults.roster_path),
            columns: config.roster.columns,
            group_size: config.draw.group_size.unwrap_or(defaults.group_size),
            use_sections: config.draw.use_sections.unwrap_or(defaults.use_sections),
            seed: config.draw.seed,
            outbox_path: config.outbox.path.unwrap_or(defaults.outbox_path),
            sender: config.outbox.sender,
            subject: config.outbox.subject.unwrap_or(defaults.subject),
            request_subject: config
                .outbox
                .request_subject
                .unwrap_or(defaults.request_subject),
            organizer: config.outbox.organizer,
            location_notes: config.invite.location_notes,
            topics: config.invite.topics,
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("roster_path", &self.roster_path)?;
        validation::validate_file_extension("roster_path", &self.roster_path, &["csv"])?;
        validation::validate_positive_number("group_size", self.group_size, 1)?;
        validation::validate_path("outbox_path", &self.outbox_path)?;
        validation::validate_non_empty_string("subject", &self.subject)?;
        for (field, value) in [("sender", &self.sender), ("organizer", &self.organizer)] {
            if let Some(value) = value {
                validation::validate_resolved_env(field, value)?;
            }
        }
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn roster_path(&self) -> &str {
        &self.roster_path
    }

    fn group_size(&self) -> usize {
        self.group_size
    }

    fn use_sections(&self) -> bool {
        self.use_sections
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn outbox_path(&self) -> &str {
        &self.outbox_path
    }
}
