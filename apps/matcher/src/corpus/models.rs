use serde::{Deserialize, Serialize};

/// One job posting in the serving corpus.
///
/// `row` is the record's index into the dense and sparse matrices. It is
/// derived from table position on load and never read from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: i64,
    #[serde(default)]
    pub company_id: Option<i64>,
    #[serde(default)]
    pub company_name: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(skip)]
    pub row: usize,
}

/// A job record paired with its hybrid similarity to a resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredJob {
    pub job: JobRecord,
    /// Weighted sum of two cosines; not clamped to [0, 1].
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_is_not_serialized() {
        let job = JobRecord {
            job_id: 7,
            company_id: None,
            company_name: Some("Acme".to_string()),
            title: "Engineer".to_string(),
            description: "Builds things".to_string(),
            location: None,
            row: 12,
        };
        let json = serde_json::to_value(&job).unwrap();
        assert!(json.get("row").is_none());
        let back: JobRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.row, 0);
    }

    #[test]
    fn test_optional_fields_default_when_absent() {
        let job: JobRecord = serde_json::from_str(
            r#"{"job_id": 1, "title": "Analyst", "description": "Numbers"}"#,
        )
        .unwrap();
        assert_eq!(job.company_name, None);
        assert_eq!(job.location, None);
    }
}
