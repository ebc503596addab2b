use regex::Regex;
use std::sync::OnceLock;

static WIDTH_PATTERN: OnceLock<Regex> = OnceLock::new();

/// parses an OSM width value into meters rounded to 0.1 m. unit suffixes
/// (`m`, `meter`, `metres`, ...) are stripped, semicolon-separated lists
/// take their first entry, decimal commas are accepted. unparseable input
/// yields `None`.
pub fn parse_width(value: &str) -> Option<f64> {
    let first = value.trim().to_lowercase();
    let first = first.split(';').next()?.trim().to_string();
    if first.is_empty() {
        return None;
    }
    let pattern = WIDTH_PATTERN.get_or_init(|| {
        Regex::new(r"^(-?\d+(?:[.,]\d+)?)\s*(?:m|meter|meters|metre|metres)?$")
            .expect("width pattern is valid")
    });
    let caps = pattern.captures(&first)?;
    let number = caps.get(1)?.as_str().replace(',', ".");
    let parsed: f64 = number.parse().ok()?;
    Some((parsed * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_number() {
        assert_eq!(parse_width("2.5"), Some(2.5));
        assert_eq!(parse_width("3"), Some(3.0));
    }

    #[test]
    fn test_unit_suffixes() {
        assert_eq!(parse_width("2.5 m"), Some(2.5));
        assert_eq!(parse_width("2.5m"), Some(2.5));
        assert_eq!(parse_width("1,80 meter"), Some(1.8));
    }

    #[test]
    fn test_semicolon_list_takes_first() {
        assert_eq!(parse_width("2.5;1.5"), Some(2.5));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(parse_width("2.44"), Some(2.4));
        assert_eq!(parse_width("2.45"), Some(2.5));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_width("wide"), None);
        assert_eq!(parse_width(""), None);
        assert_eq!(parse_width("ca. 2"), None);
    }
}
