use crate::adapters::csv_store::RosterColumns;
use crate::utils::error::{Result, RosterError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub roster: RosterSection,
    pub draw: DrawSection,
    pub outbox: OutboxSection,
    pub invite: InviteSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterSection {
    pub path: Option<String>,
    pub columns: RosterColumns,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawSection {
    pub group_size: Option<usize>,
    pub use_sections: Option<bool>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutboxSection {
    pub path: Option<String>,
    pub sender: Option<String>,
    pub subject: Option<String>,
    pub request_subject: Option<String>,
    pub organizer: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InviteSection {
    pub location_notes: Option<String>,
    pub topics: Vec<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RosterError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RosterError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BOT_EMAIL})，未設定者保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::{Captures, Regex};
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern")
        });

        re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證配置的合理性 (只檢查有填的欄位)
    pub fn validate_config(&self) -> Result<()> {
        if let Some(path) = &self.roster.path {
            crate::utils::validation::validate_path("roster.path", path)?;
            crate::utils::validation::validate_file_extension("roster.path", path, &["csv"])?;
        }

        if let Some(size) = self.draw.group_size {
            crate::utils::validation::validate_positive_number("draw.group_size", size, 1)?;
        }

        if let Some(path) = &self.outbox.path {
            crate::utils::validation::validate_path("outbox.path", path)?;
        }

        for (field, value) in [
            ("outbox.sender", &self.outbox.sender),
            ("outbox.organizer", &self.outbox.organizer),
        ] {
            if let Some(value) = value {
                crate::utils::validation::validate_resolved_env(field, value)?;
            }
        }

        let columns = &self.roster.columns;
        for (field, value) in [
            ("roster.columns.identity", &columns.identity),
            ("roster.columns.name", &columns.name),
            ("roster.columns.section", &columns.section),
            ("roster.columns.selection_count", &columns.selection_count),
        ] {
            crate::utils::validation::validate_non_empty_string(field, value)?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
