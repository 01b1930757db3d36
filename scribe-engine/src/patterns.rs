//! Ordered extraction rules for each record field.
//!
//! Every field owns a list of candidates sorted by priority. Extraction walks
//! the list and stops at the first candidate whose regex matches; capture group
//! 1 always holds the raw value. Patterns are compiled once and never mutated.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use scribe_core::Gender;

/// Sentence end: a period followed by whitespace or end of line, or a bare
/// line end. A period between digits ("101.5") does not end a sentence.
const SENTENCE_END: &str = r"(?:\.\s|\.$|$)";

/// Section headings recognized in labelled notes.
const SOAP_LABELS: &str = r"(?:Subjective:|Objective:|Assessment:|Impression:|Plan:|$)";

/// Lab names recognized anywhere in the text, in emission order.
pub const LAB_VOCABULARY: [&str; 9] = [
    "CBC",
    "CMP",
    "Lipid Panel",
    "HbA1c",
    "Urinalysis",
    "TSH",
    "Vitamin D",
    "Iron Panel",
    "Coagulation",
];

/// A compiled pattern with a short label for diagnostics.
pub struct Candidate {
    regex: Regex,
    pub description: &'static str,
}

impl Candidate {
    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.regex.captures(text)
    }

    pub fn find_span(&self, text: &str) -> Option<(usize, usize)> {
        self.regex.find(text).map(|m| (m.start(), m.end()))
    }
}

/// All field rules, grouped by the record field they fill.
pub struct PatternLibrary {
    pub name: Vec<Candidate>,
    pub age: Vec<Candidate>,
    pub gender: Vec<Candidate>,
    pub complaint: Vec<Candidate>,
    pub bp: Vec<Candidate>,
    pub heart_rate: Vec<Candidate>,
    pub temp: Vec<Candidate>,
    pub resp_rate: Vec<Candidate>,
    pub o2_sat: Vec<Candidate>,
    pub prescription: Vec<Candidate>,
    pub subjective: Vec<Candidate>,
    pub objective: Vec<Candidate>,
    pub assessment: Vec<Candidate>,
    pub plan: Vec<Candidate>,
    pub plan_cue: Candidate,
}

static LIBRARY: LazyLock<PatternLibrary> = LazyLock::new(|| PatternLibrary {
    name: vec![
        candidate(
            r"(?i)(?:patient|pt|name is)\s+([a-zA-Z\s]+?)(?:,|\.|versus|[0-9])",
            "name after patient cue",
        ),
        candidate(r"^([a-zA-Z\s]+?),", "leading tokens before first comma"),
    ],
    age: vec![candidate(
        r"(?i)([0-9]+)\s*(?:yo|y/o|years old|years)",
        "number before age cue",
    )],
    gender: vec![candidate(
        r"(?i)\b(male|female|man|woman|boy|girl|m|f)\b",
        "gender token",
    )],
    complaint: vec![candidate(
        &format!(r"(?im)(?:c/o|complains of|presenting with|came in for)\s+(.+?){SENTENCE_END}"),
        "text after complaint cue",
    )],
    bp: vec![
        candidate(r"(?i)BP\s*:?\s*([0-9]{2,3}/[0-9]{2,3})", "BP cue"),
        candidate(r"([0-9]{2,3}/[0-9]{2,3})", "bare systolic/diastolic"),
    ],
    heart_rate: vec![candidate(
        r"(?i)(?:HR|heart rate|pulse)\s*:?\s*([0-9]{2,3})",
        "HR cue",
    )],
    temp: vec![candidate(
        r"(?i)(?:Temp|Temperature)\s*:?\s*([0-9]{2,3}(?:\.[0-9])?)",
        "Temp cue",
    )],
    resp_rate: vec![candidate(
        r"(?i)(?:RR|Resp|respiratory rate)\s*:?\s*([0-9]{1,2})",
        "RR cue",
    )],
    o2_sat: vec![candidate(
        r"(?i)(?:O2|O2 sat|SpO2)\s*:?\s*([0-9]{2,3})%?",
        "O2 cue",
    )],
    prescription: vec![candidate(
        &format!(
            r"(?im)(?:prescribe|start|medication|rx)\s+([a-zA-Z]+)\s+([0-9]+(?:mg|g|ml|mcg))\s+(.+?){SENTENCE_END}"
        ),
        "cue, drug, dose and frequency",
    )],
    subjective: vec![section("Subjective:")],
    objective: vec![section("Objective:")],
    assessment: vec![section("(?:Assessment|Impression):")],
    plan: vec![section("Plan:")],
    plan_cue: candidate(r"(?i)\b(?:prescribe|order|refer)\s+", "plan cue"),
});

fn candidate(pattern: &str, description: &'static str) -> Candidate {
    Candidate {
        regex: Regex::new(pattern).expect("Invalid extraction pattern"),
        description,
    }
}

fn section(label: &str) -> Candidate {
    candidate(
        &format!(r"(?is){label}\s*(.+?){SOAP_LABELS}"),
        "labelled SOAP section",
    )
}

/// Shared, read-only pattern library.
pub fn library() -> &'static PatternLibrary {
    &LIBRARY
}

/// Walk candidates in priority order and return the first match.
pub fn first_match<'t>(
    candidates: &[Candidate],
    text: &'t str,
) -> Option<(Captures<'t>, &'static str)> {
    candidates
        .iter()
        .find_map(|c| c.captures(text).map(|caps| (caps, c.description)))
}

/// Map a matched gender token; "m", "man" and "boy" are male, the rest female.
pub fn gender_from_token(token: &str) -> Gender {
    match token.to_lowercase().as_str() {
        "m" | "male" | "man" | "boy" => Gender::Male,
        _ => Gender::Female,
    }
}

/// Vocabulary terms present anywhere in the text, case-insensitive.
pub fn scan_lab_orders(text: &str) -> Vec<String> {
    let haystack = text.to_lowercase();
    LAB_VOCABULARY
        .iter()
        .filter(|lab| haystack.contains(&lab.to_lowercase()))
        .map(|lab| lab.to_string())
        .collect()
}
