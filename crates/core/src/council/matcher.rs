//! Fuzzy council lookup over the static reference list.

use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::debug;

use super::similarity;
use super::types::{CouncilRecord, MatchResult};
use super::ReferenceDataError;
use crate::metrics::COUNCIL_MATCH_SCORE;

/// Embedded reference dataset.
const BUILTIN_COUNCILS: &str = include_str!("../../data/councils.toml");

#[derive(Debug, Deserialize)]
struct ReferenceFile {
    version: u32,
    #[serde(default)]
    councils: Vec<CouncilRecord>,
}

/// Resolves free-text council names against a fixed list.
///
/// The list is loaded once and never mutated, so a matcher can be shared
/// across tasks without synchronization.
#[derive(Debug, Clone)]
pub struct CouncilMatcher {
    version: u32,
    councils: Vec<CouncilRecord>,
}

impl CouncilMatcher {
    /// Build a matcher over an explicit list of councils.
    pub fn new(councils: Vec<CouncilRecord>) -> Self {
        Self {
            version: 0,
            councils,
        }
    }

    /// Build a matcher from the reference list compiled into the crate.
    pub fn builtin() -> Result<Self, ReferenceDataError> {
        Self::from_toml(BUILTIN_COUNCILS)
    }

    /// Parse a reference list in the `[[councils]]` TOML format.
    pub fn from_toml(source: &str) -> Result<Self, ReferenceDataError> {
        let file: ReferenceFile =
            toml::from_str(source).map_err(|e| ReferenceDataError::Parse(e.to_string()))?;

        for (index, council) in file.councils.iter().enumerate() {
            if council.name.trim().is_empty() {
                return Err(ReferenceDataError::InvalidEntry {
                    index,
                    reason: "empty name".to_string(),
                });
            }
            if reqwest::Url::parse(&council.url).is_err() {
                return Err(ReferenceDataError::InvalidEntry {
                    index,
                    reason: format!("invalid url '{}'", council.url),
                });
            }
        }

        debug!(
            version = file.version,
            councils = file.councils.len(),
            "Loaded council reference data"
        );

        Ok(Self {
            version: file.version,
            councils: file.councils,
        })
    }

    /// Version of the loaded reference list (0 for ad-hoc lists).
    pub fn dataset_version(&self) -> u32 {
        self.version
    }

    pub fn all(&self) -> &[CouncilRecord] {
        &self.councils
    }

    /// Highest-scoring council for `query`.
    ///
    /// Ties keep the first council in list order. Blank queries match nothing.
    pub fn find_best_match(&self, query: &str) -> Option<MatchResult> {
        if query.trim().is_empty() {
            return None;
        }

        let mut best: Option<(&CouncilRecord, f64)> = None;
        for council in &self.councils {
            let score = similarity::score(query, &council.name);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((council, score)),
            }
        }

        best.map(|(council, score)| {
            COUNCIL_MATCH_SCORE.with_label_values(&[]).observe(score);
            MatchResult::new(council.clone(), score)
        })
    }

    /// Every council scoring at least `min_score`, best first.
    ///
    /// Equal scores keep list order.
    pub fn find_matches(&self, query: &str, min_score: f64) -> Vec<MatchResult> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<MatchResult> = self
            .councils
            .iter()
            .map(|council| (council, similarity::score(query, &council.name)))
            .filter(|(_, score)| *score >= min_score)
            .map(|(council, score)| MatchResult::new(council.clone(), score))
            .collect();

        // sort_by is stable, so ties stay in list order
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches
    }

    /// Councils whose region contains, or is contained in, `region`.
    pub fn find_by_region(&self, region: &str) -> Vec<CouncilRecord> {
        self.filter_field(region, |c| &c.region)
    }

    /// Councils whose type contains, or is contained in, `council_type`.
    pub fn find_by_type(&self, council_type: &str) -> Vec<CouncilRecord> {
        self.filter_field(council_type, |c| &c.council_type)
    }

    /// Distinct regions, sorted.
    pub fn regions(&self) -> Vec<String> {
        self.councils
            .iter()
            .map(|c| c.region.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct council types, sorted.
    pub fn types(&self) -> Vec<String> {
        self.councils
            .iter()
            .map(|c| c.council_type.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn filter_field<F>(&self, query: &str, field: F) -> Vec<CouncilRecord>
    where
        F: Fn(&CouncilRecord) -> &String,
    {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.councils
            .iter()
            .filter(|council| {
                let value = field(council).to_lowercase();
                value.contains(&query) || query.contains(&value)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::council::MatchConfidence;

    fn council(name: &str, region: &str, council_type: &str) -> CouncilRecord {
        CouncilRecord {
            name: name.to_string(),
            url: format!(
                "https://{}.moderngov.co.uk",
                name.split_whitespace().next().unwrap().to_lowercase()
            ),
            region: region.to_string(),
            council_type: council_type.to_string(),
        }
    }

    fn sample_matcher() -> CouncilMatcher {
        CouncilMatcher::new(vec![
            council("Leeds City Council", "Yorkshire and Humber", "Metropolitan"),
            council("Manchester City Council", "North West", "Metropolitan"),
            council("Kent County Council", "South East", "County"),
            council("Cardiff Council", "Wales", "Welsh Unitary"),
            council("Bristol City Council", "South West", "Unitary"),
        ])
    }

    #[test]
    fn test_best_match_substring_is_high() {
        let matcher = sample_matcher();
        let result = matcher.find_best_match("Leeds").unwrap();
        assert_eq!(result.council.name, "Leeds City Council");
        assert_eq!(result.score, 0.9);
        assert_eq!(result.confidence, MatchConfidence::High);
    }

    #[test]
    fn test_best_match_exact() {
        let matcher = sample_matcher();
        let result = matcher.find_best_match("kent county council").unwrap();
        assert_eq!(result.council.name, "Kent County Council");
        assert_eq!(result.confidence, MatchConfidence::Exact);
    }

    #[test]
    fn test_best_match_blank_query() {
        let matcher = sample_matcher();
        assert!(matcher.find_best_match("").is_none());
        assert!(matcher.find_best_match("   ").is_none());
    }

    #[test]
    fn test_best_match_ties_keep_list_order() {
        let matcher = CouncilMatcher::new(vec![
            council("Alpha Council", "A", "District"),
            council("Beta Council", "B", "District"),
        ]);
        // "council" is contained in both names
        let result = matcher.find_best_match("council").unwrap();
        assert_eq!(result.council.name, "Alpha Council");
    }

    #[test]
    fn test_find_matches_sorted_and_filtered() {
        let matcher = sample_matcher();
        let matches = matcher.find_matches("City Council", 0.3);
        assert!(!matches.is_empty());
        for pair in matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for m in &matches {
            assert!(m.score >= 0.3);
        }
    }

    #[test]
    fn test_find_matches_blank_query() {
        let matcher = sample_matcher();
        assert!(matcher.find_matches("   ", 0.0).is_empty());
        assert!(matcher.find_matches("", 0.9).is_empty());
    }

    #[test]
    fn test_find_matches_high_floor_excludes_weak() {
        let matcher = sample_matcher();
        let matches = matcher.find_matches("Manchester", MatchConfidence::High.min_score());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].council.name, "Manchester City Council");
    }

    #[test]
    fn test_find_by_region_bidirectional() {
        let matcher = sample_matcher();
        let yorkshire = matcher.find_by_region("yorkshire");
        assert_eq!(yorkshire.len(), 1);
        assert_eq!(yorkshire[0].name, "Leeds City Council");

        // stored region contained in the query
        let wales = matcher.find_by_region("Wales and the borders");
        assert_eq!(wales.len(), 1);
        assert_eq!(wales[0].name, "Cardiff Council");

        assert!(matcher.find_by_region("").is_empty());
    }

    #[test]
    fn test_find_by_type() {
        let matcher = sample_matcher();
        let unitary = matcher.find_by_type("unitary");
        let names: Vec<_> = unitary.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Cardiff Council", "Bristol City Council"]);
    }

    #[test]
    fn test_regions_and_types_distinct() {
        let matcher = sample_matcher();
        assert_eq!(matcher.regions().len(), 5);
        assert_eq!(
            matcher.types(),
            vec!["County", "Metropolitan", "Unitary", "Welsh Unitary"]
        );
    }

    #[test]
    fn test_builtin_dataset_loads() {
        let matcher = CouncilMatcher::builtin().unwrap();
        assert!(matcher.dataset_version() > 0);
        assert!(!matcher.all().is_empty());

        let leeds = matcher.find_best_match("Leeds").unwrap();
        assert_eq!(leeds.council.name, "Leeds City Council");
        assert_eq!(leeds.council.region, "Yorkshire and Humber");
        assert!(matches!(
            leeds.confidence,
            MatchConfidence::High | MatchConfidence::Exact
        ));
    }

    #[test]
    fn test_from_toml_rejects_bad_url() {
        let err = CouncilMatcher::from_toml(
            r#"
version = 1

[[councils]]
name = "Broken"
url = "not a url"
region = "Nowhere"
type = "District"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ReferenceDataError::InvalidEntry { index: 0, .. }));
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        let err = CouncilMatcher::from_toml("councils = 3").unwrap_err();
        assert!(matches!(err, ReferenceDataError::Parse(_)));
    }
}
