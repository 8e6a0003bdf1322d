use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 名單中的一筆學生資料，以 identity (email) 為主鍵
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub identity: String,
    pub display_name: String,
    pub section: Option<String>,
    #[serde(default)]
    pub selection_count: u32,
    /// 未知欄位的值，依 `Roster::extra_columns` 的位置對齊，存檔時原樣寫回
    #[serde(default)]
    pub extra: Vec<String>,
}

impl StudentRecord {
    pub fn new(identity: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            display_name: display_name.into(),
            section: None,
            selection_count: 0,
            extra: Vec::new(),
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_selection_count(mut self, count: u32) -> Self {
        self.selection_count = count;
        self
    }

    /// Records with a blank identity are never selectable.
    pub fn is_valid(&self) -> bool {
        !self.identity.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub records: Vec<StudentRecord>,
    /// Column order of the unknown columns as they appeared in the source file.
    #[serde(default)]
    pub extra_columns: Vec<String>,
}

impl Roster {
    pub fn new(records: Vec<StudentRecord>) -> Self {
        Self {
            records,
            extra_columns: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn valid_records(&self) -> impl Iterator<Item = &StudentRecord> {
        self.records.iter().filter(|r| r.is_valid())
    }

    pub fn find(&self, identity: &str) -> Option<&StudentRecord> {
        self.records.iter().find(|r| r.is_valid() && r.identity == identity)
    }

    /// 檢查 identity 是否重複 (空白 identity 不列入)
    pub fn first_duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.valid_records()
            .map(|r| r.identity.as_str())
            .find(|identity| !seen.insert(*identity))
    }

    /// Value of the `position`-th unknown column for `record`; blank when the
    /// row was short.
    pub fn extra_value<'a>(&self, record: &'a StudentRecord, position: usize) -> &'a str {
        record.extra.get(position).map(String::as_str).unwrap_or("")
    }

    /// Display names for the members of `group`, in group order.
    pub fn display_names(&self, group: &Group) -> Vec<(String, String)> {
        group
            .iter()
            .map(|identity| {
                let name = self
                    .find(identity)
                    .map(|r| r.display_name.clone())
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| identity.to_string());
                (identity.to_string(), name)
            })
            .collect()
    }
}

/// 一次抽籤的結果：不重複的 identity 清單
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    members: Vec<String>,
}

impl Group {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.members.iter().any(|m| m == identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub(crate) fn push(&mut self, identity: String) {
        debug_assert!(!self.contains(&identity));
        self.members.push(identity);
    }
}

impl From<Group> for Vec<String> {
    fn from(group: Group) -> Self {
        group.members
    }
}

/// `[min, max)` of selection counts across the valid records of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityWindow {
    pub min_selection_count: u32,
    pub max_selection_count: u32,
}

impl EligibilityWindow {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a StudentRecord>) -> Option<Self> {
        records
            .into_iter()
            .map(|r| r.selection_count)
            .fold(None, |window, count| match window {
                None => Some(Self {
                    min_selection_count: count,
                    max_selection_count: count,
                }),
                Some(w) => Some(Self {
                    min_selection_count: w.min_selection_count.min(count),
                    max_selection_count: w.max_selection_count.max(count),
                }),
            })
    }

    /// 所有人次數相同時全員可選，否則只選次數低於最大值者
    pub fn admits(&self, selection_count: u32) -> bool {
        self.min_selection_count == self.max_selection_count
            || selection_count < self.max_selection_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRequest {
    pub group_size: usize,
    pub use_sections: bool,
    pub seed: Option<u64>,
}

impl DrawRequest {
    pub fn new(group_size: usize) -> Self {
        Self {
            group_size,
            use_sections: false,
            seed: None,
        }
    }

    pub fn stratified(mut self, use_sections: bool) -> Self {
        self.use_sections = use_sections;
        self
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_admits_everyone_when_counts_equal() {
        let records = vec![
            StudentRecord::new("a@x.com", "A").with_selection_count(2),
            StudentRecord::new("b@x.com", "B").with_selection_count(2),
        ];
        let window = EligibilityWindow::from_records(&records).unwrap();
        assert!(window.admits(2));
    }

    #[test]
    fn test_window_excludes_current_maximum() {
        let records = vec![
            StudentRecord::new("a@x.com", "A").with_selection_count(0),
            StudentRecord::new("b@x.com", "B").with_selection_count(3),
        ];
        let window = EligibilityWindow::from_records(&records).unwrap();
        assert_eq!(window.min_selection_count, 0);
        assert_eq!(window.max_selection_count, 3);
        assert!(window.admits(2));
        assert!(!window.admits(3));
    }

    #[test]
    fn test_first_duplicate_ignores_blank_identities() {
        let roster = Roster::new(vec![
            StudentRecord::new("", "Nobody"),
            StudentRecord::new("  ", "Nobody Else"),
            StudentRecord::new("a@x.com", "A"),
        ]);
        assert_eq!(roster.first_duplicate(), None);

        let roster = Roster::new(vec![
            StudentRecord::new("a@x.com", "A"),
            StudentRecord::new("a@x.com", "A again"),
        ]);
        assert_eq!(roster.first_duplicate(), Some("a@x.com"));
    }

    #[test]
    fn test_display_names_fall_back_to_identity() {
        let roster = Roster::new(vec![
            StudentRecord::new("a@x.com", "Alice"),
            StudentRecord::new("b@x.com", ""),
        ]);
        let mut group = Group::default();
        group.push("a@x.com".to_string());
        group.push("b@x.com".to_string());

        let names = roster.display_names(&group);
        assert_eq!(names[0].1, "Alice");
        assert_eq!(names[1].1, "b@x.com");
    }
}
