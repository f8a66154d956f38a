//! Text patterns used by the extraction rules
//!
//! Compiled once per process and exposed as plain functions over already
//! extracted text (never over markup).

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static COORDINATES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.\d+").expect("coordinate pattern compiles"));

static LEVEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("level pattern compiles"));

static GATHER_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{1,2}:\d{2}\s?(?:am|pm)\b").expect("gather time pattern compiles")
});

static SECTION_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)patch|tree|logging|quarry|harvest|mining")
        .expect("section keyword pattern compiles")
});

static ALTERNATE_LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-\s+(.+)\s+\(").expect("alternate location pattern compiles")
});

// Numeric character references that survived decoding, plus no-break spaces
static DECORATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#(?:[0-9]+|[xX][0-9a-fA-F]+);|\u{a0}").expect("decoration pattern compiles")
});

/// All decimal numbers in `text`, in order
pub fn coordinates(text: &str) -> Vec<&str> {
    COORDINATES.find_iter(text).map(|m| m.as_str()).collect()
}

/// `(x,y)` when the text holds exactly two decimal numbers
pub fn flag_position(text: &str) -> Option<String> {
    match coordinates(text).as_slice() {
        [x, y] => Some(format!("({x},{y})")),
        _ => None,
    }
}

/// First integer run
pub fn level(text: &str) -> Option<&str> {
    LEVEL.find(text).map(|m| m.as_str())
}

/// First `H:MM am/pm` clock time
pub fn gather_time(text: &str) -> Option<&str> {
    GATHER_TIME.find(text).map(|m| m.as_str())
}

/// True when the text is a gathering-method label (e.g. "Mature Tree", "Quarrying")
/// rather than a place name
pub fn is_gathering_label(text: &str) -> bool {
    SECTION_KEYWORD.is_match(text)
}

/// Text between a leading dash and the last open parenthesis: `" - Upper Paths ("` -> `"Upper Paths"`
pub fn alternate_location(text: &str) -> Option<&str> {
    ALTERNATE_LOCATION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Drops stray numeric character references; no-break spaces become plain spaces
pub fn strip_decorations(text: &str) -> Cow<'_, str> {
    DECORATION.replace_all(text, |caps: &regex::Captures<'_>| {
        if &caps[0] == "\u{a0}" { " " } else { "" }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_position_requires_exactly_two_numbers() {
        assert_eq!(flag_position("Thanalan (10.0, 20.0)").as_deref(), Some("(10.0,20.0)"));
        assert_eq!(flag_position("(x:12.5, y:8.25)").as_deref(), Some("(12.5,8.25)"));
        assert_eq!(flag_position("Somewhere (10.0)"), None);
        assert_eq!(flag_position("(1.0, 2.0, 3.0)"), None);
        assert_eq!(flag_position(""), None);
    }

    #[test]
    fn test_clock_times_are_not_coordinates() {
        assert_eq!(flag_position("(x:20.2, y:30.1) 2:00 am"), Some("(20.2,30.1)".to_string()));
    }

    #[test]
    fn test_level() {
        assert_eq!(level("Lv. 50 "), Some("50"));
        assert_eq!(level("Level 15-20"), Some("15"));
        assert_eq!(level("none"), None);
    }

    #[test]
    fn test_gather_time() {
        assert_eq!(gather_time("Available 2:00 AM - 4:00 AM"), Some("2:00 AM"));
        assert_eq!(gather_time("at 10:00 pm"), Some("10:00 pm"));
        assert_eq!(gather_time("(x:20.2, y:30.1)"), None);
    }

    #[test]
    fn test_gathering_labels() {
        for label in ["Mature Tree", "Lush Vegetation Patch", "Logging", "Quarrying", "Harvesting", "Mining"] {
            assert!(is_gathering_label(label), "{label}");
        }
        assert!(!is_gathering_label("Central Thanalan"));
    }

    #[test]
    fn test_alternate_location() {
        assert_eq!(alternate_location(" - Upper Paths ("), Some("Upper Paths"));
        assert_eq!(
            alternate_location(" - Upper Paths (Mining) ("),
            Some("Upper Paths (Mining)")
        );
        assert_eq!(alternate_location("no dash here"), None);
    }

    #[test]
    fn test_strip_decorations() {
        assert_eq!(strip_decorations("1,000&#160;"), "1,000");
        assert_eq!(strip_decorations("Sastasha&#xA0;(Hard)"), "Sastasha(Hard)");
        assert_eq!(strip_decorations("a\u{a0}b"), "a b");
        assert_eq!(strip_decorations("plain"), "plain");
    }
}
