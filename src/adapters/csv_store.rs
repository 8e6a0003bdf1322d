use crate::domain::model::{Roster, StudentRecord};
use crate::domain::ports::RosterStore;
use crate::utils::error::{Result, RosterError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Header names of the roster spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterColumns {
    pub identity: String,
    pub name: String,
    pub section: String,
    pub selection_count: String,
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            identity: "Student Email".to_string(),
            name: "Student Name".to_string(),
            section: "Section".to_string(),
            selection_count: "Number of Selections".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsvRosterStore {
    path: PathBuf,
    columns: RosterColumns,
}

impl CsvRosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_columns(path, RosterColumns::default())
    }

    pub fn with_columns(path: impl Into<PathBuf>, columns: RosterColumns) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse(&self, data: &[u8]) -> Result<Roster> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(data);

        let headers = reader.headers()?.clone();
        let position = |name: &str| headers.iter().position(|h| h == name);

        let identity_idx =
            position(self.columns.identity.as_str()).ok_or_else(|| RosterError::MissingColumn {
                column: self.columns.identity.clone(),
            })?;
        let name_idx = position(self.columns.name.as_str());
        let section_idx = position(self.columns.section.as_str());
        let count_idx = position(self.columns.selection_count.as_str());

        let known = [Some(identity_idx), name_idx, section_idx, count_idx];
        let extra_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !known.contains(&Some(*i)))
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        let mut records = Vec::new();
        for (i, row) in reader.records().enumerate() {
            let row = row?;
            // 第 1 行是標題
            let row_number = i + 2;
            let field = |idx: Option<usize>| idx.and_then(|idx| row.get(idx)).unwrap_or("");

            let identity = field(Some(identity_idx));
            let section = field(section_idx);
            // 空白 identity 的列永遠不會被抽中，次數讀不懂就當 0
            let selection_count = match parse_selection_count(field(count_idx), row_number) {
                Err(err) if identity.is_empty() => {
                    tracing::warn!("Row {row_number} has no identity, ignoring count: {err}");
                    0
                }
                other => other?,
            };
            // 以欄位位置保存，重複的標題名稱也不會互相覆蓋
            let extra: Vec<String> = extra_columns
                .iter()
                .map(|(idx, _)| field(Some(*idx)).to_string())
                .collect();

            records.push(StudentRecord {
                identity: identity.to_string(),
                display_name: field(name_idx).to_string(),
                section: (!section.is_empty()).then(|| section.to_string()),
                selection_count,
                extra,
            });
        }

        Ok(Roster {
            records,
            extra_columns: extra_columns.into_iter().map(|(_, name)| name).collect(),
        })
    }

    pub fn render(&self, roster: &Roster) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec![
            self.columns.identity.as_str(),
            self.columns.name.as_str(),
            self.columns.section.as_str(),
            self.columns.selection_count.as_str(),
        ];
        header.extend(roster.extra_columns.iter().map(String::as_str));
        writer.write_record(&header)?;

        for record in &roster.records {
            let count = record.selection_count.to_string();
            let mut row = vec![
                record.identity.as_str(),
                record.display_name.as_str(),
                record.section.as_deref().unwrap_or(""),
                count.as_str(),
            ];
            row.extend((0..roster.extra_columns.len()).map(|i| roster.extra_value(record, i)));
            writer.write_record(&row)?;
        }

        writer
            .into_inner()
            .map_err(|e| RosterError::IoError(e.into_error()))
    }
}

/// Blank means never selected. Spreadsheet tools sometimes re-save whole
/// numbers as `2.0`, which is accepted.
fn parse_selection_count(raw: &str, row: usize) -> Result<u32> {
    if raw.is_empty() {
        return Ok(0);
    }
    if let Ok(count) = raw.parse::<u32>() {
        return Ok(count);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) => {
            Ok(v as u32)
        }
        _ => Err(RosterError::InvalidSelectionCount {
            row,
            value: raw.to_string(),
        }),
    }
}

impl RosterStore for CsvRosterStore {
    async fn load(&self) -> Result<Roster> {
        tracing::debug!("Reading roster from {}", self.path.display());
        let data = fs::read(&self.path)?;
        self.parse(&data)
    }

    async fn save(&self, roster: &Roster) -> Result<()> {
        let data = self.render(roster)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // 先寫暫存檔再改名，避免寫到一半留下殘缺名單
        let tmp_path = self.path.with_extension("csv.tmp");
        fs::write(&tmp_path, &data)?;
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }
}
