//! Fuzzy Search Engine: location substring filter, title partial-ratio
//! scoring, and fixed-size pagination.

use serde::Serialize;
use thiserror::Error;

use crate::corpus::JobRecord;
use crate::search::partial_ratio::partial_ratio;

#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("a title query or a location is required")]
    MissingCriteria,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Titles must score strictly above this partial ratio.
    pub threshold: u8,
    pub page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: 70,
            page_size: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub results: Vec<JobRecord>,
    pub total_results: usize,
    pub total_pages: usize,
    /// The requested page, echoed back unclamped.
    pub current_page: i64,
}

fn non_blank(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

/// Searches `corpus` by title and/or location and returns one page.
///
/// Pages are 1-indexed. A page outside `1..=total_pages` yields an empty slice
/// with accurate totals.
pub fn search(
    corpus: &[JobRecord],
    title_query: Option<&str>,
    location_query: Option<&str>,
    page: i64,
    config: SearchConfig,
) -> Result<SearchResults, SearchError> {
    let title = non_blank(title_query);
    let location = non_blank(location_query);
    if title.is_none() && location.is_none() {
        return Err(SearchError::MissingCriteria);
    }

    let mut candidates: Vec<&JobRecord> = match &location {
        Some(loc) => corpus
            .iter()
            .filter(|job| {
                job.location
                    .as_deref()
                    .is_some_and(|l| l.to_lowercase().contains(loc.as_str()))
            })
            .collect(),
        None => corpus.iter().collect(),
    };

    if let Some(query) = &title {
        let mut scored: Vec<(u8, &JobRecord)> = candidates
            .into_iter()
            .map(|job| (partial_ratio(query, &job.title.to_lowercase()), job))
            .filter(|(score, _)| *score > config.threshold)
            .collect();
        // Stable: equal scores keep corpus order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        candidates = scored.into_iter().map(|(_, job)| job).collect();
    }

    Ok(paginate(&candidates, page, config.page_size))
}

fn paginate(matches: &[&JobRecord], page: i64, page_size: usize) -> SearchResults {
    let page_size = page_size.max(1);
    let total_results = matches.len();
    let total_pages = total_results.div_ceil(page_size);

    let results = usize::try_from(page)
        .ok()
        .filter(|&p| p >= 1)
        .and_then(|p| (p - 1).checked_mul(page_size))
        .filter(|&start| start < total_results)
        .map(|start| {
            let end = (start + page_size).min(total_results);
            matches[start..end].iter().map(|job| (*job).clone()).collect()
        })
        .unwrap_or_default();

    SearchResults {
        results,
        total_results,
        total_pages,
        current_page: page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(job_id: i64, title: &str, location: Option<&str>) -> JobRecord {
        JobRecord {
            job_id,
            company_id: Some(1),
            company_name: Some("Acme".to_string()),
            title: title.to_string(),
            description: format!("{title} role"),
            location: location.map(str::to_string),
            row: job_id as usize,
        }
    }

    fn corpus() -> Vec<JobRecord> {
        vec![
            job(1, "Senior Python Developer", Some("Bengaluru")),
            job(2, "Registered Nurse", Some("Pune")),
            job(3, "Python Developer", Some("Pune")),
            job(4, "Backend Engineer (Python)", None),
            job(5, "Data Analyst", Some("Delhi NCR")),
        ]
    }

    fn ids(results: &SearchResults) -> Vec<i64> {
        results.results.iter().map(|j| j.job_id).collect()
    }

    #[test]
    fn test_requires_some_criteria() {
        let err = search(&corpus(), None, Some("   "), 1, SearchConfig::default()).unwrap_err();
        assert_eq!(err, SearchError::MissingCriteria);
    }

    #[test]
    fn test_title_query_matches_partial_titles() {
        let r = search(&corpus(), Some("python dev"), None, 1, SearchConfig::default()).unwrap();
        // "backend engineer (python)" aligns at 71, just over the cut-off.
        assert_eq!(ids(&r), vec![1, 3, 4]);
    }

    #[test]
    fn test_nonsense_title_is_excluded() {
        let r = search(&corpus(), Some("zzz"), None, 1, SearchConfig::default()).unwrap();
        assert!(r.results.is_empty());
        assert_eq!(r.total_results, 0);
        assert_eq!(r.total_pages, 0);
    }

    #[test]
    fn test_location_filter_is_case_insensitive_and_skips_missing() {
        let r = search(&corpus(), None, Some("PUNE"), 1, SearchConfig::default()).unwrap();
        assert_eq!(ids(&r), vec![2, 3]);
        let r = search(&corpus(), None, Some("e"), 1, SearchConfig::default()).unwrap();
        assert!(!ids(&r).contains(&4));
    }

    #[test]
    fn test_title_and_location_combine() {
        let r = search(&corpus(), Some("python"), Some("pune"), 1, SearchConfig::default()).unwrap();
        assert_eq!(ids(&r), vec![3]);
    }

    #[test]
    fn test_results_sorted_by_score_then_corpus_order() {
        let jobs = vec![
            job(1, "Analyst", Some("Pune")),
            job(2, "Data Analyst", Some("Pune")),
            job(3, "Data Analytics Lead", Some("Pune")),
            job(4, "Data Analyst", Some("Pune")),
        ];
        let r = search(&jobs, Some("data analyst"), None, 1, SearchConfig::default()).unwrap();
        assert_eq!(ids(&r), vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_pagination_totals_and_out_of_range() {
        let jobs: Vec<JobRecord> = (0..23)
            .map(|i| job(i, &format!("Role {i}"), Some("Pune")))
            .collect();
        let config = SearchConfig::default();

        let page3 = search(&jobs, None, Some("pune"), 3, config).unwrap();
        assert_eq!(page3.total_results, 23);
        assert_eq!(page3.total_pages, 3);
        assert_eq!(page3.results.len(), 3);
        assert_eq!(page3.current_page, 3);
        assert_eq!(ids(&page3), vec![20, 21, 22]);

        let page4 = search(&jobs, None, Some("pune"), 4, config).unwrap();
        assert!(page4.results.is_empty());
        assert_eq!(page4.total_results, 23);
        assert_eq!(page4.current_page, 4);

        let page0 = search(&jobs, None, Some("pune"), 0, config).unwrap();
        assert!(page0.results.is_empty());
        assert_eq!(page0.current_page, 0);
    }

    #[test]
    fn test_threshold_is_strict_and_tunable() {
        let strict = SearchConfig {
            threshold: 100,
            ..SearchConfig::default()
        };
        let r = search(&corpus(), Some("python dev"), None, 1, strict).unwrap();
        assert!(r.results.is_empty());
    }

    #[test]
    fn test_results_serialize_camel_case() {
        let r = search(&corpus(), None, Some("pune"), 1, SearchConfig::default()).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["totalResults"], 2);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["results"][0]["job_id"], 2);
    }
}
