//! Plain-text clinical report for terminal output.

use std::fmt;

use chrono::NaiveDate;
use scribe_core::{ClinicalRecord, Severity};
use scribe_engine::NoteAnalysis;

const RULE: &str = "----------------------------------------";

pub fn render(analysis: &NoteAnalysis, generated_on: NaiveDate) -> String {
    Report {
        analysis,
        generated_on,
    }
    .to_string()
}

/// `Note_<Name>_<YYYY-MM-DD>.txt`, whitespace in the name replaced by `_`.
pub fn suggested_file_name(record: Option<&ClinicalRecord>, date: NaiveDate) -> String {
    let name = record
        .and_then(|record| record.patient_info.name.as_deref())
        .map(|name| name.replace(char::is_whitespace, "_"))
        .unwrap_or_else(|| "Patient".to_string());
    format!("Note_{name}_{}.txt", date.format("%Y-%m-%d"))
}

struct Report<'a> {
    analysis: &'a NoteAnalysis,
    generated_on: NaiveDate,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.analysis.record.as_ref();

        writeln!(out, "MEDICAL DOCUMENTATION")?;
        writeln!(out, "Generated: {}", self.generated_on.format("%Y-%m-%d"))?;
        writeln!(out, "File: {}", suggested_file_name(record, self.generated_on))?;

        match record {
            Some(record) => render_record(out, record)?,
            None => writeln!(out, "\nNo clinical content extracted.")?,
        }

        if !self.analysis.alerts.is_empty() {
            section(out, "Alerts")?;
            for alert in &self.analysis.alerts {
                writeln!(
                    out,
                    "[{}] {}: {}",
                    severity_tag(alert.severity),
                    alert.title,
                    alert.message
                )?;
            }
        }

        writeln!(out, "\n{RULE}\nConfidential - Generated by HealthScribe")
    }
}

fn render_record(out: &mut fmt::Formatter<'_>, record: &ClinicalRecord) -> fmt::Result {
    let info = &record.patient_info;
    if let Some(name) = &info.name {
        section(out, "Patient Demographics")?;
        writeln!(out, "Name:      {name}")?;
        writeln!(
            out,
            "Gender:    {}",
            info.gender.map(|g| g.as_str()).unwrap_or("N/A")
        )?;
        writeln!(
            out,
            "Age:       {}",
            info.age
                .map(|age| format!("{age} yrs"))
                .unwrap_or_else(|| "N/A".to_string())
        )?;
        writeln!(
            out,
            "Complaint: {}",
            info.complaint.as_deref().unwrap_or("N/A")
        )?;
    }

    let readings = record.vitals.readings();
    if !readings.is_empty() {
        section(out, "Vital Signs")?;
        for reading in readings {
            writeln!(
                out,
                "{:<16} {:>10}   (ref {} {})",
                reading.label,
                format!("{} {}", reading.value, reading.unit),
                reading.reference_range,
                reading.unit
            )?;
        }
    }

    let soap = &record.soap;
    let notes = [
        ("Subjective", &soap.subjective),
        ("Objective", &soap.objective),
        ("Assessment", &soap.assessment),
        ("Plan", &soap.plan),
    ];
    if notes.iter().any(|(_, text)| !text.trim().is_empty()) {
        section(out, "Clinical Documentation")?;
        for (label, text) in notes {
            if !text.trim().is_empty() {
                writeln!(out, "{label}:\n  {}", text.trim())?;
            }
        }
    }

    let rx = &record.prescription;
    if let Some(medication) = &rx.medication {
        section(out, "Medication Orders")?;
        let dash = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{medication} | {} | {} | {}",
            dash(&rx.dosage),
            dash(&rx.frequency),
            dash(&rx.duration)
        )?;
        if let Some(instructions) = &rx.instructions {
            writeln!(out, "Instructions: {instructions}")?;
        }
    }

    if !record.lab_orders.is_empty() {
        section(out, "Laboratory Orders")?;
        for lab in &record.lab_orders {
            writeln!(out, "  * {lab}")?;
        }
    }

    Ok(())
}

fn section(out: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(out, "\n{}\n{RULE}", title.to_uppercase())
}

fn severity_tag(severity: Severity) -> String {
    severity.as_str().to_uppercase()
}
