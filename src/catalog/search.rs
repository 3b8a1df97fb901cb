//! Free-text filtering over the injury catalog

use super::data::{InjuryCatalog, InjuryRecord};

impl InjuryCatalog {
    /// Filter the catalog by a free-text query.
    ///
    /// A blank query returns the full catalog. Otherwise a record matches
    /// when the query is a case-insensitive substring of its description or
    /// its category. The filter is stable: catalog order is preserved and an
    /// empty result is a normal outcome.
    pub fn search(&self, query: &str) -> Vec<&InjuryRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.records().iter().collect();
        }

        self.records()
            .iter()
            .filter(|record| {
                record.description.to_lowercase().contains(&needle)
                    || record.category.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_returns_full_catalog() {
        let catalog = InjuryCatalog::builtin();

        let all = catalog.search("");
        assert_eq!(all.len(), catalog.len());
        let ids: Vec<u32> = all.iter().map(|r| r.id).collect();
        let expected: Vec<u32> = catalog.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, expected);

        // Whitespace-only counts as blank
        assert_eq!(catalog.search("   ").len(), catalog.len());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = InjuryCatalog::builtin();

        let upper = catalog.search("TRAUMA");
        let lower = catalog.search("trauma");
        assert!(!upper.is_empty());
        let upper_ids: Vec<u32> = upper.iter().map(|r| r.id).collect();
        let lower_ids: Vec<u32> = lower.iter().map(|r| r.id).collect();
        assert_eq!(upper_ids, lower_ids);
    }

    #[test]
    fn test_search_matches_category_or_description() {
        let catalog = InjuryCatalog::builtin();

        // "Trauma cranico" matches by category even where the description
        // does not contain the word (id 8: "Frattura della volta cranica")
        let hits = catalog.search("trauma cranico");
        assert!(hits.iter().any(|r| r.id == 8));

        // "timpano" matches by description only
        let hits = catalog.search("timpano");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 22);
    }

    #[test]
    fn test_search_preserves_catalog_order() {
        let catalog = InjuryCatalog::builtin();

        let hits = catalog.search("frattura");
        let ids: Vec<u32> = hits.iter().map(|r| r.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted, "filtered results must keep catalog order");
        assert!(ids.contains(&8), "matches in description count too");
    }

    #[test]
    fn test_no_match_is_an_empty_result() {
        let catalog = InjuryCatalog::builtin();
        assert!(catalog.search("zzzz-nessuna-corrispondenza").is_empty());
    }
}
