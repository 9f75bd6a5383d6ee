// Context classification - decide what kind of text surrounds a candidate
use crate::json_path::infer_json_path;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Characters inspected for a quoted JSON time key
pub const JSON_WINDOW: usize = 50;
/// Characters inspected for SQL/log keywords
pub const KEYWORD_WINDOW: usize = 40;

// Word classes and boundaries are ASCII-only so that CJK or accented text
// directly before a number does not hide it.
lazy_static! {
    static ref CAMEL_TIME_KEY: Regex =
        Regex::new(r#"(?i)"(?:[A-Za-z0-9_]+(?:At|Time|Timestamp)|ts)"\s*:\s*"#).unwrap();
    static ref SNAKE_TIME_KEY: Regex =
        Regex::new(r#"(?i)"[A-Za-z0-9_]+_(?:at|time|timestamp|ts)"\s*:\s*"#).unwrap();
    // The keyword must touch the end of the window, which the scanner's own
    // boundary rule never allows for digit runs; only direct callers hit it.
    static ref SQL_REGEX: Regex =
        Regex::new(r"(?i)(?-u:\b)(?:created_at|updated_at|timestamp|time)(?-u:\b)$").unwrap();
    static ref LOG_REGEX: Regex =
        Regex::new(r"(?i)(?-u:\b)(?:ts|timestamp|time)=?$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Json,
    Log,
    Sql,
    Raw,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Log => "log",
            Self::Sql => "sql",
            Self::Raw => "raw",
        }
    }

    /// Upper-case label shown to humans
    pub fn label(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Log => "LOG",
            Self::Sql => "SQL",
            Self::Raw => "RAW",
        }
    }

    pub fn is_structured(&self) -> bool {
        !matches!(self, Self::Raw)
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one candidate. Only JSON contexts ever carry a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextInfo {
    kind: ContextKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    json_path: Option<String>,
}

impl ContextInfo {
    pub fn json(json_path: Option<String>) -> Self {
        Self {
            kind: ContextKind::Json,
            json_path,
        }
    }

    /// Non-JSON context; never carries a path
    pub fn plain(kind: ContextKind) -> Self {
        match kind {
            ContextKind::Json => Self::json(None),
            other => Self {
                kind: other,
                json_path: None,
            },
        }
    }

    pub fn raw() -> Self {
        Self::plain(ContextKind::Raw)
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    pub fn json_path(&self) -> Option<&str> {
        self.json_path.as_deref()
    }

    pub fn has_path(&self) -> bool {
        self.json_path.is_some()
    }
}

/// Byte range of up to `chars` characters immediately preceding byte `offset`
pub(crate) fn lookback_range(text: &str, offset: usize, chars: usize) -> Range<usize> {
    let mut end = offset.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let start = text[..end]
        .char_indices()
        .rev()
        .take(chars)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(end);
    start..end
}

pub(crate) fn lookback(text: &str, offset: usize, chars: usize) -> &str {
    &text[lookback_range(text, offset, chars)]
}

fn is_time_key(window: &str) -> bool {
    CAMEL_TIME_KEY.is_match(window) || SNAKE_TIME_KEY.is_match(window)
}

/// Classify the text preceding byte `offset`. JSON wins over SQL, SQL over log.
pub fn detect_context(text: &str, offset: usize) -> ContextInfo {
    if is_time_key(lookback(text, offset, JSON_WINDOW)) {
        return ContextInfo::json(infer_json_path(text, offset));
    }

    let window = lookback(text, offset, KEYWORD_WINDOW);
    if SQL_REGEX.is_match(window) {
        return ContextInfo::plain(ContextKind::Sql);
    }
    if LOG_REGEX.is_match(window) {
        return ContextInfo::plain(ContextKind::Log);
    }

    ContextInfo::raw()
}
