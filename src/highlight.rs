// Locate the JSON key that made a value look like a timestamp, so a host can
// highlight it next to the value itself
use crate::context::{lookback_range, JSON_WINDOW};
use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

lazy_static! {
    static ref KEY_NODE_REGEX: Regex = Regex::new(r#""([^"]+)"\s*:"#).unwrap();
}

/// Byte range (quotes included) of the nearest `"key":` before `offset`,
/// searched within the same window the JSON classifier uses.
pub fn key_span(text: &str, offset: usize) -> Option<Range<usize>> {
    let window = lookback_range(text, offset, JSON_WINDOW);
    let base = window.start;

    KEY_NODE_REGEX
        .captures_iter(&text[window])
        .last()
        .and_then(|caps| caps.get(1))
        // widen the capture to take in both quotes
        .map(|key| base + key.start() - 1..base + key.end() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_nearest_key() {
        let text = r#"{"id": 1, "createdAt": 1704067200}"#;
        let offset = text.find("1704067200").unwrap();
        let span = key_span(text, offset).unwrap();
        assert_eq!(&text[span], "\"createdAt\"");
    }

    #[test]
    fn test_no_key_in_window() {
        let text = "plain 1704067200";
        assert_eq!(key_span(text, text.find('1').unwrap()), None);

        let far = format!(r#""ts": {} 1704067200"#, " ".repeat(JSON_WINDOW));
        assert_eq!(key_span(&far, far.find('1').unwrap()), None);
    }
}
