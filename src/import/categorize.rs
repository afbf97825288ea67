use std::collections::BTreeMap;

/// The built-in title to category table.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[("Bilet IC", "transport"), ("Pieczywo", "spożywcze")];

pub fn default_categories() -> BTreeMap<String, String> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(title, category)| (title.to_string(), category.to_string()))
        .collect()
}

/// Looks up the category of an exact (already rewritten) title. Unknown titles have an empty
/// category.
pub fn categorize(title: &str, table: &BTreeMap<String, String>) -> String {
    table.get(title).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_known_title() {
        let table = default_categories();
        assert_eq!(categorize("Bilet IC", &table), "transport");
        assert_eq!(categorize("Pieczywo", &table), "spożywcze");
    }

    #[test]
    fn test_categorize_is_exact() {
        let table = default_categories();
        assert_eq!(categorize("Bilet IC Warszawa", &table), "");
        assert_eq!(categorize("bilet ic", &table), "");
    }

    #[test]
    fn test_categorize_unknown_title() {
        assert_eq!(categorize("Biedronka", &default_categories()), "");

        let mut table = default_categories();
        table.insert("Biedronka".to_string(), "spożywcze".to_string());
        assert_eq!(categorize("Biedronka", &table), "spożywcze");
    }
}
