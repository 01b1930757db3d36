use scribe_core::{ClinicalRecord, Prescription, Severity};
use scribe_engine::{evaluate, parse};

fn alerts_for(text: &str) -> Vec<scribe_core::Alert> {
    parse(text).map(|record| evaluate(&record)).unwrap_or_default()
}

fn titles_for(text: &str) -> Vec<String> {
    alerts_for(text).into_iter().map(|alert| alert.title).collect()
}

fn medication_record(medication: &str) -> ClinicalRecord {
    ClinicalRecord {
        prescription: Prescription {
            medication: Some(medication.to_string()),
            ..Prescription::default()
        },
        ..ClinicalRecord::default()
    }
}

#[test]
fn empty_input_yields_nothing() {
    for text in ["", "   ", "\n\t\r\n"] {
        assert!(parse(text).is_none(), "input {text:?}");
        assert!(alerts_for(text).is_empty());
    }
}

#[test]
fn non_clinical_text_never_fails() {
    let inputs = [
        "who won the game last night?",
        "%%%///...,,,:::",
        "Plan:",
        "Objective:",
        "BP 999999/1",
        "rx 1 2 3 . . .",
        "ñandú 温度 102.5 °F — café",
    ];
    for text in inputs {
        let record = parse(text).expect("non-blank input always yields a record");
        let _ = evaluate(&record);
    }
}

#[test]
fn parse_and_evaluate_are_idempotent() {
    let text = "Pt Ana Ruiz, 33 y/o F presenting with headache. BP 165/95. Temp 102.4. Order TSH.";
    let first = parse(text).unwrap();
    let second = parse(text).unwrap();
    assert_eq!(first, second);
    assert_eq!(evaluate(&first), evaluate(&second));
}

#[test]
fn blood_pressure_thresholds() {
    assert_eq!(titles_for("BP 160/90"), ["Hypertension Warning"]);
    assert!(titles_for("BP 159/90").is_empty());
    assert_eq!(titles_for("BP 150/100"), ["Hypertension Warning"]);
    assert!(titles_for("BP 150/99").is_empty());

    let alerts = alerts_for("BP 160/90");
    assert_eq!(alerts[0].severity, Severity::Critical);
}

#[test]
fn fever_threshold_is_exclusive() {
    assert!(titles_for("Temp 102.0").is_empty());

    let alerts = alerts_for("Temp 102.1");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Warning);
    assert_eq!(alerts[0].title, "High Fever");
}

#[test]
fn hypoxia_threshold_is_exclusive() {
    assert!(titles_for("SpO2 92%").is_empty());

    let alerts = alerts_for("SpO2 91%");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Critical);
    assert_eq!(alerts[0].title, "Hypoxia Alert");
}

#[test]
fn interaction_requires_both_terms() {
    let alerts = evaluate(&medication_record("ASPIRIN with Warfarin"));
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Critical);
    assert_eq!(alerts[0].title, "Interaction Alert");

    assert!(evaluate(&medication_record("warfarin")).is_empty());
    assert!(evaluate(&medication_record("aspirin")).is_empty());
}

#[test]
fn single_token_medication_cannot_pair() {
    let record = parse("Rx warfarin 5mg daily with aspirin").unwrap();
    assert_eq!(record.prescription.medication.as_deref(), Some("warfarin"));
    assert!(evaluate(&record).is_empty());
}

#[test]
fn lab_orders_follow_vocabulary() {
    let record = parse("Order CBC and Lipid Panel please").unwrap();
    assert_eq!(record.lab_orders, ["CBC", "Lipid Panel"]);

    let record = parse("lipid panel today, cbc now and CBC again").unwrap();
    assert_eq!(record.lab_orders, ["CBC", "Lipid Panel"]);
}

#[test]
fn objective_prefers_label_over_vitals_template() {
    let record = parse("BP 120/80, HR 72").unwrap();
    assert_eq!(record.soap.objective, "Vitals: BP 120/80, HR 72, Temp N/A");

    let record = parse("HR 72. Objective: clear lungs").unwrap();
    assert_eq!(record.soap.objective, "clear lungs");
}

#[test]
fn prescription_defaults_only_on_match() {
    let record = parse("No new medications today.").unwrap();
    assert!(record.prescription.duration.is_none());
    assert!(record.prescription.instructions.is_none());

    let record = parse("Start metformin 500mg twice daily").unwrap();
    assert_eq!(record.prescription.duration.as_deref(), Some("7 days"));
    assert_eq!(
        record.prescription.instructions.as_deref(),
        Some("Take as directed")
    );
}

#[test]
fn record_from_collaborator_survives_a_bad_vital() {
    let record: ClinicalRecord = serde_json::from_str(
        r#"{ "vitals": { "bp": "170/110", "temp": "abc", "o2Sat": "89" } }"#,
    )
    .expect("record should still deserialize");
    let titles: Vec<_> = evaluate(&record).into_iter().map(|a| a.title).collect();
    assert_eq!(titles, ["Hypertension Warning", "Hypoxia Alert"]);

    let record: ClinicalRecord =
        serde_json::from_str(r#"{ "vitals": { "o2Sat": 250 } }"#).expect("deserialize");
    assert_eq!(record.vitals.o2_sat, None);
    assert!(evaluate(&record).is_empty());
}
