use serde::Deserialize;

/// Attribute filters shared by clusters and drill-down. All conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HeatmapFilters {
    pub affiliation_id: Option<String>,
    pub graduation_year: Option<i64>,
    pub country_code: Option<String>,
    /// Case-insensitive substring of the major.
    pub major: Option<String>,
}

impl HeatmapFilters {
    /// Drops blank strings so `?major=` behaves like an absent filter.
    pub fn normalized(&self) -> Self {
        fn clean(v: &Option<String>) -> Option<String> {
            v.as_ref()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        }
        Self {
            affiliation_id: clean(&self.affiliation_id),
            graduation_year: self.graduation_year,
            country_code: clean(&self.country_code).map(|s| s.to_uppercase()),
            major: clean(&self.major).map(|s| s.to_lowercase()),
        }
    }

    /// Major substring test on a normalized filter, Unicode case-folded on
    /// both sides. The SQL scope never applies the major filter; callers run
    /// this on the scanned rows.
    pub fn matches_major(&self, major: Option<&str>) -> bool {
        match &self.major {
            None => true,
            Some(needle) => major
                .map(|m| m.to_lowercase().contains(needle.as_str()))
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_drops_blanks() {
        let f = HeatmapFilters {
            affiliation_id: Some("  ".to_string()),
            graduation_year: Some(2015),
            country_code: Some(" us".to_string()),
            major: Some("Computer ".to_string()),
        }
        .normalized();
        assert_eq!(f.affiliation_id, None);
        assert_eq!(f.country_code.as_deref(), Some("US"));
        assert_eq!(f.major.as_deref(), Some("computer"));
        assert_eq!(f.graduation_year, Some(2015));
    }

    #[test]
    fn major_folds_non_ascii_case() {
        let f = HeatmapFilters {
            major: Some("ÉCONOMIE".to_string()),
            ..Default::default()
        }
        .normalized();
        assert!(f.matches_major(Some("Économie")));
        assert!(f.matches_major(Some("Sciences économiques et économie")));
        assert!(!f.matches_major(Some("Economie")));
        assert!(!f.matches_major(None));

        let none = HeatmapFilters::default();
        assert!(none.matches_major(None));
        assert!(none.matches_major(Some("History")));
    }
}
