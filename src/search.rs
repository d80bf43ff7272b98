// 🔍 Keyword matching for doctors and patients

/// A record that can be found by a free-text keyword.
pub trait Searchable {
    /// Text fields the keyword is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Text an exact match compares against (usually the name).
    fn display_key(&self) -> &str;

    /// Case-insensitive substring match on any search field.
    /// Blank keywords match nothing.
    fn matches(&self, keyword: &str) -> bool {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Trimmed, case-insensitive equality with the display key.
    fn is_exact_match(&self, keyword: &str) -> bool {
        keyword.trim().to_lowercase() == self.display_key().trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str, &'static str);

    impl Searchable for Named {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.0, self.1]
        }

        fn display_key(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_matches_any_field_case_insensitive() {
        let rec = Named("Gregory House", "Diagnostics");
        assert!(rec.matches("house"));
        assert!(rec.matches("DIAG"));
        assert!(!rec.matches("wilson"));
    }

    #[test]
    fn test_blank_keyword_matches_nothing() {
        let rec = Named("Gregory House", "Diagnostics");
        assert!(!rec.matches(""));
        assert!(!rec.matches("   "));
    }

    #[test]
    fn test_exact_match_uses_display_key() {
        let rec = Named("Gregory House", "Diagnostics");
        assert!(rec.is_exact_match("  gregory house "));
        assert!(!rec.is_exact_match("Gregory"));
        assert!(!rec.is_exact_match("Diagnostics"));
    }
}
