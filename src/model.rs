use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::Error;

/// Severity of a missing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    Low,
    Medium,
    High,
    Critical,
}

impl Criticality {
    pub const ALL: [Criticality; 4] = [
        Criticality::Low,
        Criticality::Medium,
        Criticality::High,
        Criticality::Critical,
    ];

    /// High and critical misses are what raise the alert banner.
    pub fn is_severe(self) -> bool {
        matches!(self, Criticality::High | Criticality::Critical)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Criticality::Low => "low",
            Criticality::Medium => "medium",
            Criticality::High => "high",
            Criticality::Critical => "critical",
        }
    }
}

impl FromStr for Criticality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "baixa" => Ok(Criticality::Low),
            "medium" | "media" | "média" => Ok(Criticality::Medium),
            "high" | "alta" => Ok(Criticality::High),
            "critical" | "critica" | "crítica" => Ok(Criticality::Critical),
            other => Err(Error::MalformedReport(format!(
                "unknown criticality '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business grouping of a reconciliation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Profitability,
    Taxes,
    Other,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Profitability, Category::Taxes, Category::Other];

    /// Unknown labels fall into `Other` instead of rejecting the report.
    pub fn from_label(label: &str) -> Category {
        match label.trim().to_lowercase().as_str() {
            "profitability" | "rentabilidade" => Category::Profitability,
            "taxes" | "impostos" => Category::Taxes,
            "other" | "outras" => Category::Other,
            unknown => {
                warn!("Unknown category '{}', displaying under 'other'", unknown);
                Category::Other
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Profitability => "profitability",
            Category::Taxes => "taxes",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of checking one expected file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileCheckResult {
    pub file_name: String,
    pub full_path: String,
    pub exists: bool,
    pub criticality: Criticality,
    pub category: Category,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// A validated report snapshot. Counts are always derived from `items`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport {
    generated_at: DateTime<Local>,
    total_files: usize,
    found_count: usize,
    missing_count: usize,
    items: Vec<FileCheckResult>,
}

impl ReconciliationReport {
    pub fn new(generated_at: DateTime<Local>, items: Vec<FileCheckResult>) -> Self {
        let found_count = items.iter().filter(|item| item.exists).count();
        Self {
            generated_at,
            total_files: items.len(),
            found_count,
            missing_count: items.len() - found_count,
            items,
        }
    }

    pub fn generated_at(&self) -> DateTime<Local> {
        self.generated_at
    }

    pub fn total_files(&self) -> usize {
        self.total_files
    }

    pub fn found_count(&self) -> usize {
        self.found_count
    }

    pub fn missing_count(&self) -> usize {
        self.missing_count
    }

    pub fn items(&self) -> &[FileCheckResult] {
        &self.items
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let raw: RawReport = serde_json::from_str(json)
            .map_err(|e| Error::MalformedReport(format!("invalid report JSON: {}", e)))?;
        raw.validate()
    }
}

/// Report as written by the upstream checker, before validation.
#[derive(Debug, Deserialize)]
pub struct RawReport {
    #[serde(alias = "timestamp_execucao")]
    pub generated_at: String,
    #[serde(default, alias = "total_arquivos")]
    pub total_files: Option<i64>,
    #[serde(default, alias = "arquivos_encontrados")]
    pub found_count: Option<i64>,
    #[serde(default, alias = "arquivos_faltando")]
    pub missing_count: Option<i64>,
    #[serde(default, alias = "resultados")]
    pub items: Vec<RawFileCheck>,
}

#[derive(Debug, Deserialize)]
pub struct RawFileCheck {
    #[serde(alias = "nome_arquivo")]
    pub file_name: String,
    #[serde(default, alias = "caminho_completo")]
    pub full_path: String,
    #[serde(alias = "existe")]
    pub exists: bool,
    #[serde(alias = "criticidade")]
    pub criticality: String,
    #[serde(default, alias = "categoria")]
    pub category: Option<String>,
    #[serde(default, alias = "descricao")]
    pub description: String,
    #[serde(default, alias = "data_modificacao")]
    pub modified_at: Option<String>,
    #[serde(default, alias = "tamanho_arquivo")]
    pub size_bytes: Option<u64>,
}

impl RawReport {
    pub fn validate(self) -> Result<ReconciliationReport, Error> {
        let generated_at = parse_timestamp(&self.generated_at)?;

        let items = self
            .items
            .into_iter()
            .map(RawFileCheck::validate)
            .collect::<Result<Vec<_>, _>>()?;

        let report = ReconciliationReport::new(generated_at, items);

        let supplied = [
            ("total_files", self.total_files, report.total_files()),
            ("found_count", self.found_count, report.found_count()),
            ("missing_count", self.missing_count, report.missing_count()),
        ];
        for (name, supplied, derived) in supplied {
            if let Some(value) = supplied {
                if value < 0 || value as usize != derived {
                    warn!(
                        "Report {} is {} but items give {}, using {}",
                        name, value, derived, derived
                    );
                }
            }
        }

        Ok(report)
    }
}

impl RawFileCheck {
    fn validate(self) -> Result<FileCheckResult, Error> {
        let criticality = self.criticality.parse::<Criticality>().map_err(|e| match e {
            Error::MalformedReport(msg) => {
                Error::MalformedReport(format!("{} (file '{}')", msg, self.file_name))
            }
            other => other,
        })?;
        let modified_at = match self.modified_at.as_deref() {
            Some(ts) if !ts.trim().is_empty() => Some(parse_timestamp(ts)?),
            _ => None,
        };

        Ok(FileCheckResult {
            criticality,
            category: match self.category.as_deref() {
                Some(label) => Category::from_label(label),
                None => {
                    warn!("File '{}' has no category, displaying under 'other'", self.file_name);
                    Category::Other
                }
            },
            file_name: self.file_name,
            full_path: self.full_path,
            exists: self.exists,
            description: self.description,
            modified_at,
            size_bytes: self.size_bytes,
        })
    }
}

/// Accepts RFC 3339 and offset-less ISO timestamps (taken as local time).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Local>, Error> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|_| Error::MalformedReport(format!("invalid timestamp '{}'", value)))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| Error::MalformedReport(format!("nonexistent local time '{}'", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, exists: bool) -> FileCheckResult {
        FileCheckResult {
            file_name: name.to_string(),
            full_path: format!("/recon/{}", name),
            exists,
            criticality: Criticality::High,
            category: Category::Taxes,
            description: String::new(),
            modified_at: None,
            size_bytes: None,
        }
    }

    #[test]
    fn test_counts_derived_from_items() {
        let report = ReconciliationReport::new(
            Local::now(),
            vec![item("a", true), item("b", false), item("c", false)],
        );
        assert_eq!(report.total_files(), 3);
        assert_eq!(report.found_count(), 1);
        assert_eq!(report.missing_count(), 2);
    }

    #[test]
    fn test_parse_upstream_artifact() {
        let json = r#"{
            "timestamp_execucao": "2025-06-06T08:15:00.123456",
            "total_arquivos": 2,
            "arquivos_encontrados": 0,
            "arquivos_faltando": 2,
            "resultados": [
                {
                    "nome_arquivo": "IR_Retido_Fonte_20250606.xlsx",
                    "caminho_completo": "C:\\Conciliacoes\\Impostos\\IR\\IR_Retido_Fonte_20250606.xlsx",
                    "existe": true,
                    "data_modificacao": "2025-06-06T07:00:00",
                    "tamanho_arquivo": 20480,
                    "criticidade": "alta",
                    "categoria": "impostos",
                    "descricao": "Conciliação de IR retido na fonte"
                },
                {
                    "nome_arquivo": "Fechamento_Dia_20250606.xlsx",
                    "caminho_completo": "C:\\Conciliacoes\\Fechamento\\Fechamento_Dia_20250606.xlsx",
                    "existe": false,
                    "data_modificacao": null,
                    "tamanho_arquivo": null,
                    "criticidade": "critica",
                    "categoria": "outras",
                    "descricao": "Conciliação de fechamento do dia"
                }
            ]
        }"#;

        let report = ReconciliationReport::from_json(json).unwrap();
        assert_eq!(report.total_files(), 2);
        // supplied found count (0) disagrees with items; items win
        assert_eq!(report.found_count(), 1);
        assert_eq!(report.missing_count(), 1);
        assert_eq!(report.items()[0].category, Category::Taxes);
        assert_eq!(report.items()[0].criticality, Criticality::High);
        assert_eq!(report.items()[0].size_bytes, Some(20480));
        assert!(report.items()[0].modified_at.is_some());
        assert_eq!(report.items()[1].criticality, Criticality::Critical);
        assert_eq!(report.items()[1].category, Category::Other);
    }

    #[test]
    fn test_unknown_category_maps_to_other() {
        assert_eq!(Category::from_label("custody"), Category::Other);
        assert_eq!(Category::from_label("Rentabilidade"), Category::Profitability);
    }

    #[test]
    fn test_absent_or_null_category_is_other() {
        let json = r#"{
            "generated_at": "2025-06-06T08:15:00Z",
            "items": [
                { "file_name": "a.xlsx", "exists": false, "criticality": "high" },
                { "file_name": "b.xlsx", "exists": true, "criticality": "low", "category": null },
                { "nome_arquivo": "c.xlsx", "existe": true, "criticidade": "baixa", "categoria": "impostos" }
            ]
        }"#;
        let report = ReconciliationReport::from_json(json).unwrap();
        assert_eq!(report.total_files(), 3);
        assert_eq!(report.items()[0].category, Category::Other);
        assert_eq!(report.items()[1].category, Category::Other);
        assert_eq!(report.items()[2].category, Category::Taxes);
    }

    #[test]
    fn test_unknown_criticality_is_malformed() {
        let json = r#"{
            "generated_at": "2025-06-06T08:15:00Z",
            "items": [
                { "file_name": "x", "exists": false, "criticality": "urgent", "category": "taxes" }
            ]
        }"#;
        let err = ReconciliationReport::from_json(json).unwrap_err();
        assert!(matches!(err, Error::MalformedReport(_)));
    }

    #[test]
    fn test_negative_counts_are_replaced() {
        let json = r#"{
            "generated_at": "2025-06-06T08:15:00+00:00",
            "total_files": -4,
            "found_count": -1,
            "items": []
        }"#;
        let report = ReconciliationReport::from_json(json).unwrap();
        assert_eq!(report.total_files(), 0);
        assert_eq!(report.found_count(), 0);
    }

    #[test]
    fn test_invalid_timestamp_is_malformed() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(matches!(err, Error::MalformedReport(_)));
    }
}
