//! Analysis request JSON loading
//!
//! A match directory holds one `{match_id}.json` file per match, each an
//! `AnalysisRequest`.

use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::models::{AnalysisReport, AnalysisRequest};

/// Load an analysis request from a JSON file
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<AnalysisRequest, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the request for a match id from a match directory
pub fn load_match<P: AsRef<Path>>(match_dir: P, match_id: &str) -> Result<AnalysisRequest, LoadError> {
    load_request(match_dir.as_ref().join(format!("{}.json", match_id)))
}

/// Write a report as pretty-printed JSON
pub fn save_report<P: AsRef<Path>>(path: P, report: &AnalysisReport) -> Result<(), LoadError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(report).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, json).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// List match ids available in a directory, sorted
pub fn list_matches<P: AsRef<Path>>(match_dir: P) -> Vec<String> {
    let mut results = Vec::new();

    if let Ok(entries) = fs::read_dir(match_dir) {
        for entry in entries.flatten() {
            if let Some(filename) = entry.file_name().to_str() {
                if let Some(match_id) = parse_match_filename(filename) {
                    results.push(match_id.to_string());
                }
            }
        }
    }

    results.sort();
    results
}

/// Parse "BRA-ARG.json" to "BRA-ARG"
fn parse_match_filename(filename: &str) -> Option<&str> {
    let id = filename.strip_suffix(".json")?;
    if id.is_empty() || id.starts_with('.') {
        return None;
    }
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Side;

    #[test]
    fn test_parse_match_filename() {
        assert_eq!(parse_match_filename("BRA-ARG.json"), Some("BRA-ARG"));
        assert_eq!(parse_match_filename("notes.txt"), None);
        assert_eq!(parse_match_filename(".json"), None);
        assert_eq!(parse_match_filename(".hidden.json"), None);
    }

    #[test]
    fn test_request_from_json_string() {
        let json = r#"{
            "match_id": "BRA-ARG",
            "home_team": "Brasil",
            "away_team": "Argentina",
            "factors": [
                { "name": "Recent form", "weight": 5 },
                { "name": "Injuries", "weight": 4, "adverse": true },
                { "name": "Rotation", "weight": 2, "polarity": "home" }
            ],
            "answers": [
                { "factor": "Recent form", "side": "home" },
                { "factor": "Rotation", "side": "neither" }
            ],
            "quote": { "home": 1.80, "draw": 3.20, "away": 4.00 },
            "bankroll": 100.0
        }"#;

        let request: AnalysisRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.match_id, "BRA-ARG");
        assert_eq!(request.factors.len(), 3);
        assert!(request.factors[1].adverse);
        assert_eq!(request.answers[1].side, Side::Draw);
        assert!((request.quote.draw() - 3.20).abs() < 0.001);
    }

    #[test]
    fn test_request_rejects_bad_quote() {
        let json = r#"{
            "match_id": "X",
            "factors": [],
            "quote": { "home": 1.0, "draw": 3.20, "away": 4.00 },
            "bankroll": 100.0
        }"#;
        assert!(serde_json::from_str::<AnalysisRequest>(json).is_err());
    }

    #[test]
    fn test_load_sample_match() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/matches");
        assert!(list_matches(&dir).contains(&"BRA-ARG".to_string()));

        let request = load_match(&dir, "BRA-ARG").unwrap();
        assert_eq!(request.home_team, "Brasil");
        assert_eq!(request.answers.len(), request.factors.len());
    }

    #[test]
    fn test_load_missing_request() {
        let err = load_request("/nonexistent/match.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(list_matches("/nonexistent").is_empty());
    }
}
