//! Quick dictation templates offered to the clinician.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct NoteTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub text: &'static str,
}

const TEMPLATES: [NoteTemplate; 4] = [
    NoteTemplate {
        id: "annual-checkup",
        name: "Annual Checkup",
        description: "Routine preventive care visit",
        text: "Patient for Annual physical. Reports feeling well. No acute concerns. Vitals within normal limits. Labs: order CBC, CMP, lipid panel. Continue current medications. Return in 1 year.",
    },
    NoteTemplate {
        id: "acute-uri",
        name: "URI / Cold",
        description: "Common cold/flu symptoms",
        text: "Patient presents with cough, congestion, sore throat for 3 days. No fever. Lungs clear. Assessment: Viral URI. Plan: Symptomatic treatment, rest, fluids. Return if worsening.",
    },
    NoteTemplate {
        id: "hypertension",
        name: "HTN Follow-up",
        description: "Blood pressure management",
        text: "Follow-up for hypertension. BP 135/85 today. Reports compliance with meds. No side effects. Continue current regimen. Lifestyle counseling provided. Recheck in 3 months.",
    },
    NoteTemplate {
        id: "diabetes",
        name: "Diabetes Mgmt",
        description: "Type 2 diabetes check",
        text: "Diabetes follow-up. Blood sugars stable. HbA1c 7.2%. Feet exam normal. Continue metformin 1000mg BID. Order HbA1c, lipid panel.",
    },
];

pub fn all() -> &'static [NoteTemplate] {
    &TEMPLATES
}

pub fn find(id: &str) -> Option<&'static NoteTemplate> {
    TEMPLATES
        .iter()
        .find(|template| template.id.eq_ignore_ascii_case(id))
}
