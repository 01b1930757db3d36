//! Dictation text to `ClinicalRecord`.

use std::str::FromStr;

use scribe_core::{ClinicalRecord, PatientInfo, Prescription, SoapNote, Vitals};
use tracing::debug;

use crate::patterns::{self, first_match, Candidate, PatternLibrary};

/// Build a fresh record from free-text dictation.
///
/// Returns `None` for empty or whitespace-only input. Any other string yields a
/// record; fields whose patterns do not match stay unset.
pub fn parse(text: &str) -> Option<ClinicalRecord> {
    if text.trim().is_empty() {
        debug!("empty dictation, nothing to extract");
        return None;
    }

    let library = patterns::library();

    let patient_info = extract_patient_info(text, library);
    let vitals = extract_vitals(text, library);
    let prescription = extract_prescription(text, library);
    let lab_orders = patterns::scan_lab_orders(text);
    let soap = extract_soap(text, library, &patient_info, &vitals);

    debug!(
        has_patient = !patient_info.is_empty(),
        has_vitals = !vitals.is_empty(),
        has_prescription = !prescription.is_empty(),
        lab_orders = lab_orders.len(),
        "dictation parsed"
    );

    Some(ClinicalRecord {
        patient_info,
        vitals,
        prescription,
        lab_orders,
        soap,
    })
}

fn extract_patient_info(text: &str, library: &PatternLibrary) -> PatientInfo {
    PatientInfo {
        name: capture_field("name", &library.name, text),
        age: parse_field("age", &library.age, text),
        gender: capture_field("gender", &library.gender, text)
            .map(|token| patterns::gender_from_token(&token)),
        complaint: capture_field("complaint", &library.complaint, text),
    }
}

fn extract_vitals(text: &str, library: &PatternLibrary) -> Vitals {
    Vitals {
        bp: capture_field("bp", &library.bp, text),
        heart_rate: parse_field("heart_rate", &library.heart_rate, text),
        temp: parse_field::<f64>("temp", &library.temp, text).filter(|t| t.is_finite()),
        resp_rate: parse_field("resp_rate", &library.resp_rate, text),
        o2_sat: parse_field::<u8>("o2_sat", &library.o2_sat, text).filter(|v| *v <= 100),
    }
}

fn extract_prescription(text: &str, library: &PatternLibrary) -> Prescription {
    let Some((caps, description)) = first_match(&library.prescription, text) else {
        return Prescription::default();
    };
    debug!(field = "prescription", pattern = description, "field matched");

    let group = |index: usize| {
        caps.get(index)
            .map(|m| m.as_str().trim().to_string())
            .filter(|value| !value.is_empty())
    };

    Prescription {
        medication: group(1),
        dosage: group(2),
        frequency: group(3),
        duration: Some(Prescription::DEFAULT_DURATION.to_string()),
        instructions: Some(Prescription::DEFAULT_INSTRUCTIONS.to_string()),
    }
}

fn extract_soap(
    text: &str,
    library: &PatternLibrary,
    patient_info: &PatientInfo,
    vitals: &Vitals,
) -> SoapNote {
    let subjective = capture_field("subjective", &library.subjective, text)
        .unwrap_or_else(|| text.to_string());

    let objective =
        capture_field("objective", &library.objective, text).unwrap_or_else(|| vitals_summary(vitals));

    let assessment = capture_field("assessment", &library.assessment, text)
        .or_else(|| {
            patient_info
                .complaint
                .as_ref()
                .map(|complaint| format!("Evaluation for {complaint}"))
        })
        .unwrap_or_default();

    let plan = capture_field("plan", &library.plan, text)
        .or_else(|| plan_sentence(text, library))
        .unwrap_or_default();

    SoapNote {
        subjective,
        objective,
        assessment,
        plan,
    }
}

/// Fixed objective line, only when at least one vital was captured.
fn vitals_summary(vitals: &Vitals) -> String {
    if vitals.is_empty() {
        return String::new();
    }

    let or_na = |value: Option<String>| value.unwrap_or_else(|| "N/A".to_string());

    format!(
        "Vitals: BP {}, HR {}, Temp {}",
        or_na(vitals.bp.clone()),
        or_na(vitals.heart_rate.map(|hr| hr.to_string())),
        or_na(vitals.temp.map(|t| format!("{t:.1}"))),
    )
}

/// First sentence holding a prescribe/order/refer cue.
fn plan_sentence(text: &str, library: &PatternLibrary) -> Option<String> {
    let (start, _) = library.plan_cue.find_span(text)?;
    debug!(field = "plan", pattern = library.plan_cue.description, "field matched");

    let sentence = sentence_containing(text, start);
    if sentence.is_empty() {
        None
    } else {
        Some(sentence.to_string())
    }
}

fn sentence_containing(text: &str, at: usize) -> &str {
    let begin = text[..at]
        .char_indices()
        .rfind(|&(index, c)| is_sentence_boundary(text, index, c))
        .map(|(index, c)| index + c.len_utf8())
        .unwrap_or(0);

    let finish = text[at..]
        .char_indices()
        .find(|&(offset, c)| is_sentence_boundary(text, at + offset, c))
        .map(|(offset, _)| at + offset)
        .unwrap_or(text.len());

    text[begin..finish].trim()
}

fn is_sentence_boundary(text: &str, index: usize, c: char) -> bool {
    match c {
        '\n' => true,
        '.' => text[index + 1..]
            .chars()
            .next()
            .map_or(true, char::is_whitespace),
        _ => false,
    }
}

fn capture_field(field: &'static str, candidates: &[Candidate], text: &str) -> Option<String> {
    let (caps, description) = first_match(candidates, text)?;
    debug!(field, pattern = description, "field matched");

    let value = caps.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_field<T: FromStr>(field: &'static str, candidates: &[Candidate], text: &str) -> Option<T> {
    let raw = capture_field(field, candidates, text)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!(field, "captured value out of range, field left unset");
            None
        }
    }
}
