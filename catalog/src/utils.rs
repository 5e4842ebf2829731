use regex::Regex;

/// Trims and collapses runs of whitespace before a term reaches the search
/// endpoint. An all-whitespace input normalizes to the empty string.
pub fn normalize_query(input: &str) -> String {
    let collapse = Regex::new(r"\s+").unwrap();
    collapse.replace_all(input.trim(), " ").into_owned()
}

/// Human-readable form of a category tag: the language prefix goes, dashes
/// become spaces ("en:plant-based-foods" -> "plant based foods").
pub fn category_label(tag: &str) -> String {
    let prefix = Regex::new(r"^[a-z]{2}:").unwrap();
    prefix.replace(tag, "").replace('-', " ")
}

#[cfg(test)]
mod tests {
    use super::{category_label, normalize_query};

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(normalize_query("  peanut   butter "), "peanut butter");
        assert_eq!(normalize_query("granola"), "granola");
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(normalize_query(""), "");
        assert_eq!(normalize_query("   \t "), "");
    }

    #[test]
    fn test_category_label() {
        assert_eq!(category_label("en:plant-based-foods"), "plant based foods");
        assert_eq!(category_label("fr:boissons"), "boissons");
    }

    #[test]
    fn test_category_label_without_prefix() {
        assert_eq!(category_label("snacks"), "snacks");
    }
}
