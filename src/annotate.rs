// Annotation pipeline - scan, classify, score, gate and format every candidate
// in a text blob
use crate::confidence::{compute_confidence, Confidence};
use crate::context::{detect_context, ContextInfo, ContextKind};
use crate::highlight::key_span;
use crate::scanner::{scan_candidates, Candidate};
use crate::settings::Settings;
use crate::timestamp::interpret;
use crate::tooltip::{refresh_relative, rows_for_instant, TooltipRow};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::ops::Range;
use tracing::{debug, trace};

/// Outcome for one candidate in the scanned text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub id: u64,
    /// Byte offset of the digit run
    pub offset: usize,
    /// Byte length of the digit run
    pub len: usize,
    pub raw: String,
    pub value: u64,
    pub context: ContextInfo,
    pub confidence: Confidence,
    pub instant: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_span: Option<Range<usize>>,
    /// `None` means leave this text alone
    pub rows: Option<Vec<TooltipRow>>,
}

impl Annotation {
    pub fn is_surfaced(&self) -> bool {
        self.rows.is_some()
    }

    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    /// Re-derive the Relative row against `now`
    pub fn refresh(&mut self, now: &DateTime<Utc>) -> bool {
        match (self.rows.as_mut(), self.instant.as_ref()) {
            (Some(rows), Some(instant)) => refresh_relative(rows, instant, now),
            _ => false,
        }
    }
}

const FIRST_ID: u64 = 1;

/// Caller-owned id counter and collection of annotations across text fragments
#[derive(Debug)]
pub struct AnnotationRegistry {
    next_id: u64,
    collected: Vec<Annotation>,
}

impl Default for AnnotationRegistry {
    fn default() -> Self {
        Self {
            next_id: FIRST_ID,
            collected: Vec::new(),
        }
    }
}

impl AnnotationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.collected
    }

    pub fn surfaced(&self) -> impl Iterator<Item = &Annotation> {
        self.collected.iter().filter(|a| a.is_surfaced())
    }

    pub fn get(&self, id: u64) -> Option<&Annotation> {
        self.collected.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Annotation> {
        self.collected.iter_mut().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.collected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collected.is_empty()
    }

    /// Refresh every Relative row; returns how many were updated
    pub fn refresh_all(&mut self, now: &DateTime<Utc>) -> usize {
        self.collected
            .iter_mut()
            .map(|a| a.refresh(now))
            .filter(|updated| *updated)
            .count()
    }

    /// Drop collected annotations and restart ids at 1
    pub fn clear(&mut self) {
        self.collected.clear();
        self.next_id = FIRST_ID;
    }
}

/// Rows for a classified value, or `None` if it is rejected or below the gate
pub fn explain_value(
    value: u64,
    settings: &Settings,
    context: &ContextInfo,
    now: &DateTime<Utc>,
) -> Option<Vec<TooltipRow>> {
    let confidence = compute_confidence(value, context, settings);
    if !confidence.passes(settings.min_confidence) {
        return None;
    }
    let instant = interpret(value)?;
    let rows = rows_for_instant(value, &instant, settings, context, now);
    (!rows.is_empty()).then_some(rows)
}

fn annotate_candidate(
    id: u64,
    text: &str,
    candidate: &Candidate<'_>,
    settings: &Settings,
    now: &DateTime<Utc>,
) -> Annotation {
    let context = detect_context(text, candidate.offset);
    let confidence = compute_confidence(candidate.value, &context, settings);
    let instant = interpret(candidate.value);

    let rows = match instant {
        Some(ref instant) if confidence.passes(settings.min_confidence) => {
            let rows = rows_for_instant(candidate.value, instant, settings, &context, now);
            (!rows.is_empty()).then_some(rows)
        }
        Some(_) => {
            trace!(
                "{} below gate: {}% < {}%",
                candidate.raw,
                confidence.percent,
                settings.min_confidence
            );
            None
        }
        None => {
            trace!("{} rejected: not a 10/13 digit epoch in range", candidate.raw);
            None
        }
    };

    let key_span = match context.kind() {
        ContextKind::Json => key_span(text, candidate.offset),
        ContextKind::Log | ContextKind::Sql | ContextKind::Raw => None,
    };

    Annotation {
        id,
        offset: candidate.offset,
        len: candidate.len(),
        raw: candidate.raw.to_string(),
        value: candidate.value,
        context,
        confidence,
        instant,
        key_span,
        rows,
    }
}

/// Annotate `text` into `registry`, returning the ids assigned to this fragment
pub fn annotate_into(
    registry: &mut AnnotationRegistry,
    text: &str,
    settings: &Settings,
    now: &DateTime<Utc>,
) -> Vec<u64> {
    let mut ids = Vec::new();
    for candidate in scan_candidates(text) {
        let id = registry.allocate_id();
        let annotation = annotate_candidate(id, text, &candidate, settings, now);
        ids.push(id);
        registry.collected.push(annotation);
    }

    debug!(
        "Annotated {} candidates ({} surfaced)",
        ids.len(),
        ids.iter()
            .filter_map(|id| registry.get(*id))
            .filter(|a| a.is_surfaced())
            .count()
    );
    ids
}

/// One-shot annotation with ids starting at 1
pub fn annotate(text: &str, settings: &Settings, now: &DateTime<Utc>) -> Vec<Annotation> {
    let mut registry = AnnotationRegistry::new();
    annotate_into(&mut registry, text, settings, now);
    registry.collected
}
