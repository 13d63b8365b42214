//! JSON export of finished runs
//!
//! The canonical document mirrors `RunResult` keyed by run ID; the
//! flattened per-pair record list is additive and only included when
//! asked for, so existing consumers of the nested shape keep working.

use crate::{
    error::{AppError, Result},
    models::{BenchConfig, PairRecord, PairStatistics, RunResult},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Serialized shape of one exported run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Correlation ID of the run
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When this document was produced
    pub generated_at: DateTime<Utc>,

    /// Samples taken per (provider, method) pair
    pub num_tests: u32,

    /// method name -> provider name -> statistics
    pub methods: HashMap<String, HashMap<String, PairStatistics>>,

    /// provider name -> reachability statistics
    pub network: HashMap<String, PairStatistics>,

    /// Flattened per-pair rows, present only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<PairRecord>>,
}

impl ExportDocument {
    /// Build the export document for a finished run
    pub fn from_result(config: &BenchConfig, result: &RunResult) -> Self {
        let records = if config.export_records {
            let methods: Vec<String> = config.methods.iter().map(|m| m.method.clone()).collect();
            Some(result.flatten_records(&methods, &config.provider_order()))
        } else {
            None
        };

        Self {
            run_id: result.run_id,
            started_at: result.started_at,
            generated_at: Utc::now(),
            num_tests: config.num_tests,
            methods: result.methods.clone(),
            network: result.network.clone(),
            records,
        }
    }

    /// Write the document as pretty-printed JSON
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| {
            AppError::io(format!(
                "failed to write export file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// Timestamped default export path in the working directory
pub fn default_export_path(started_at: DateTime<Utc>) -> PathBuf {
    PathBuf::from(format!(
        "rpc-latency-{}.json",
        started_at.format("%Y%m%d-%H%M%S")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Endpoint, MethodSpec};

    fn stats(median: f64) -> PairStatistics {
        PairStatistics {
            min: Some(median),
            max: Some(median),
            avg: Some(median),
            median: Some(median),
            stdev: Some(0.0),
            success_count: 5,
            failure_count: 0,
            raw_samples: vec![median; 5],
        }
    }

    fn test_config() -> BenchConfig {
        let mut config = BenchConfig::default();
        config.endpoints = vec![
            Endpoint::new("P1", "https://one.example.com"),
            Endpoint::new("P2", "https://two.example.com"),
        ];
        config.methods = vec![MethodSpec::new("getSlot")];
        config
    }

    fn test_result() -> RunResult {
        let mut result = RunResult::new();
        result.record_network("P1", stats(10.0));
        result.record_pair("getSlot", "P1", stats(50.0));
        result.record_pair("getSlot", "P2", stats(100.0));
        result
    }

    #[test]
    fn test_document_omits_records_by_default() {
        let config = test_config();
        let result = test_result();
        let document = ExportDocument::from_result(&config, &result);

        assert!(document.records.is_none());
        let json = serde_json::to_string(&document).unwrap();
        assert!(!json.contains("\"records\""));
    }

    #[test]
    fn test_document_includes_records_when_requested() {
        let mut config = test_config();
        config.export_records = true;
        let result = test_result();
        let document = ExportDocument::from_result(&config, &result);

        let records = document.records.as_ref().unwrap();
        // 1 network row + 2 rpc rows
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.run_id == result.run_id));
    }

    #[test]
    fn test_write_and_read_back() {
        let config = test_config();
        let result = test_result();
        let document = ExportDocument::from_result(&config, &result);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        document.write_to(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: ExportDocument = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.run_id, result.run_id);
        assert_eq!(parsed.methods["getSlot"]["P1"].median, Some(50.0));
        assert_eq!(parsed.network["P1"].success_count, 5);
    }

    #[test]
    fn test_write_to_unwritable_path_is_io_error() {
        let config = test_config();
        let result = test_result();
        let document = ExportDocument::from_result(&config, &result);

        let err = document
            .write_to(Path::new("/nonexistent-dir/export.json"))
            .unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_default_export_path_is_timestamped() {
        let ts = DateTime::parse_from_rfc3339("2026-08-30T12:34:56Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            default_export_path(ts),
            PathBuf::from("rpc-latency-20260830-123456.json")
        );
    }
}
