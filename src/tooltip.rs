// Tooltip rows - the labeled explanation bundle for one accepted timestamp
use crate::confidence::{compute_confidence, render_bar};
use crate::context::ContextInfo;
use crate::explain::explain_context;
use crate::path_formats::{to_jq, to_js, DEFAULT_JS_ROOT};
use crate::settings::Settings;
use crate::timestamp::{
    format_date, format_iso8601, interpret, relative_time_from, unix_millis, unix_seconds, Zone,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const LABEL_WHY: &str = "Why";
pub const LABEL_CONFIDENCE: &str = "Confidence";
pub const LABEL_CONTEXT: &str = "Context";
pub const LABEL_JSON_PATH: &str = "JSON Path";
pub const LABEL_JQ: &str = "jq";
pub const LABEL_JS: &str = "JS";
pub const LABEL_UNIX_SECONDS: &str = "Unix (s)";
pub const LABEL_UNIX_MILLIS: &str = "Unix (ms)";
pub const LABEL_UTC: &str = "DateTime (UTC)";
pub const LABEL_LOCAL: &str = "DateTime (Local)";
pub const LABEL_ISO8601: &str = "ISO8601";
pub const LABEL_RELATIVE: &str = "Relative";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipRow {
    pub label: String,
    pub display: String,
    /// What a click copies; empty for the relative row
    pub copy: String,
}

impl TooltipRow {
    fn new(label: &str, display: impl Into<String>, copy: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            display: display.into(),
            copy: copy.into(),
        }
    }

    fn same(label: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        Self::new(label, value.clone(), value)
    }
}

/// Build the rows for `value` using the current wall clock
pub fn tooltip_for_now(
    value: u64,
    settings: &Settings,
    context: &ContextInfo,
) -> Option<Vec<TooltipRow>> {
    tooltip_for(value, settings, context, &Utc::now())
}

/// Rows for `value`, or `None` when it is not a 10/13 digit epoch in 2000..=2100
pub fn tooltip_for(
    value: u64,
    settings: &Settings,
    context: &ContextInfo,
    now: &DateTime<Utc>,
) -> Option<Vec<TooltipRow>> {
    let instant = interpret(value)?;
    let rows = rows_for_instant(value, &instant, settings, context, now);
    (!rows.is_empty()).then_some(rows)
}

pub(crate) fn rows_for_instant(
    value: u64,
    instant: &DateTime<Utc>,
    settings: &Settings,
    context: &ContextInfo,
    now: &DateTime<Utc>,
) -> Vec<TooltipRow> {
    let mut rows = Vec::new();

    rows.push(TooltipRow::same(LABEL_WHY, explain_context(value, context)));

    let confidence = compute_confidence(value, context, settings);
    rows.push(TooltipRow::new(
        LABEL_CONFIDENCE,
        render_bar(confidence.percent),
        format!("{}%", confidence.percent),
    ));

    rows.push(TooltipRow::new(
        LABEL_CONTEXT,
        context.kind().label(),
        context.kind().as_str(),
    ));

    if let Some(path) = context.json_path() {
        rows.push(TooltipRow::same(LABEL_JSON_PATH, path));
        rows.push(TooltipRow::same(LABEL_JQ, to_jq(path)));
        rows.push(TooltipRow::same(LABEL_JS, to_js(path, DEFAULT_JS_ROOT)));
    }

    rows.push(TooltipRow::same(LABEL_UNIX_SECONDS, unix_seconds(instant).to_string()));
    rows.push(TooltipRow::same(LABEL_UNIX_MILLIS, unix_millis(instant).to_string()));

    if settings.show_human_readable {
        rows.push(TooltipRow::same(LABEL_UTC, format_date(instant, Zone::Utc)));
        rows.push(TooltipRow::same(LABEL_LOCAL, format_date(instant, Zone::Local)));
    }

    if settings.show_iso8601 {
        rows.push(TooltipRow::same(LABEL_ISO8601, format_iso8601(instant)));
    }

    if settings.show_relative {
        rows.push(TooltipRow::new(
            LABEL_RELATIVE,
            relative_time_from(now, instant),
            "",
        ));
    }

    rows
}

/// Re-derive the Relative row against a new `now`. Returns true if a row was updated.
pub fn refresh_relative(rows: &mut [TooltipRow], instant: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
    match rows.iter_mut().find(|r| r.label == LABEL_RELATIVE) {
        Some(row) => {
            row.display = relative_time_from(now, instant);
            true
        }
        None => false,
    }
}

/// Keyboard-style cursor over a row list; movement wraps at both ends
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    index: usize,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self, rows: &[TooltipRow]) {
        if !rows.is_empty() {
            self.index = (self.index + 1) % rows.len();
        }
    }

    pub fn prev(&mut self, rows: &[TooltipRow]) {
        if !rows.is_empty() {
            self.index = (self.index + rows.len() - 1) % rows.len();
        }
    }

    pub fn selected<'a>(&self, rows: &'a [TooltipRow]) -> Option<&'a TooltipRow> {
        rows.get(self.index)
    }

    pub fn copy_value<'a>(&self, rows: &'a [TooltipRow]) -> Option<&'a str> {
        self.selected(rows).map(|r| r.copy.as_str())
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}
