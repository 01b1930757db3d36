//! Clinical dictation extraction and safety alerting.
//!
//! `parse` turns free text into a [`ClinicalRecord`]; `evaluate` derives the
//! ordered [`Alert`] list from a record. Both are pure functions: nothing is
//! cached or shared between calls, so repeated calls on the same input return
//! structurally equal results.

pub mod alerts;
pub mod extract;
pub mod patterns;
pub mod templates;

use scribe_core::{Alert, AlertConfig, ClinicalRecord};
use serde::Serialize;

pub use alerts::{evaluate, evaluate_with};
pub use extract::parse;

/// Output of one pass over a dictation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NoteAnalysis {
    pub record: Option<ClinicalRecord>,
    pub alerts: Vec<Alert>,
}

/// Parse and evaluate in one call. Empty input yields no record and no alerts.
pub fn analyze_note(text: &str, config: &AlertConfig) -> NoteAnalysis {
    let record = parse(text);
    let alerts = record
        .as_ref()
        .map(|record| evaluate_with(record, config))
        .unwrap_or_default();

    NoteAnalysis { record, alerts }
}

/// Join dictation turns with a single space, skipping blank turns.
///
/// Callers that accumulate a conversation re-parse the joined history; the
/// engine itself never merges records.
pub fn join_turns<S: AsRef<str>>(turns: &[S]) -> String {
    turns
        .iter()
        .map(|turn| turn.as_ref().trim())
        .filter(|turn| !turn.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
