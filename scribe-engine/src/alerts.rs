//! Safety rules evaluated against a `ClinicalRecord`.

use scribe_core::{Alert, AlertConfig, ClinicalRecord, Severity};
use tracing::{debug, trace};

type RuleCheck = fn(&ClinicalRecord, &AlertConfig) -> Vec<Alert>;

struct AlertRule {
    name: &'static str,
    check: RuleCheck,
}

/// Evaluation order is the display order.
const RULES: [AlertRule; 4] = [
    AlertRule {
        name: "hypertension",
        check: hypertension,
    },
    AlertRule {
        name: "high_fever",
        check: high_fever,
    },
    AlertRule {
        name: "hypoxia",
        check: hypoxia,
    },
    AlertRule {
        name: "drug_interaction",
        check: drug_interaction,
    },
];

/// Evaluate with the default thresholds and interaction table.
pub fn evaluate(record: &ClinicalRecord) -> Vec<Alert> {
    evaluate_with(record, &AlertConfig::default())
}

/// Recompute the full alert list for a record. Pure: same input, same output.
pub fn evaluate_with(record: &ClinicalRecord, config: &AlertConfig) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for rule in &RULES {
        let raised = (rule.check)(record, config);
        if raised.is_empty() {
            trace!(rule = rule.name, "rule not triggered");
        } else {
            debug!(rule = rule.name, count = raised.len(), "rule triggered");
        }
        alerts.extend(raised);
    }

    alerts
}

fn hypertension(record: &ClinicalRecord, config: &AlertConfig) -> Vec<Alert> {
    let Some((systolic, diastolic)) = record.vitals.blood_pressure() else {
        return Vec::new();
    };

    if systolic >= config.hypertension_systolic || diastolic >= config.hypertension_diastolic {
        let bp = record.vitals.bp.as_deref().unwrap_or_default();
        vec![Alert::new(
            Severity::Critical,
            "Hypertension Warning",
            format!("BP {bp} is significantly elevated."),
        )]
    } else {
        Vec::new()
    }
}

fn high_fever(record: &ClinicalRecord, config: &AlertConfig) -> Vec<Alert> {
    match record.vitals.temp {
        Some(temp) if temp.is_finite() && temp > config.fever_threshold_f => vec![Alert::new(
            Severity::Warning,
            "High Fever",
            "Detailed fever workup recommended.",
        )],
        _ => Vec::new(),
    }
}

fn hypoxia(record: &ClinicalRecord, config: &AlertConfig) -> Vec<Alert> {
    match record.vitals.o2_sat {
        Some(o2) if o2 < config.hypoxia_threshold => vec![Alert::new(
            Severity::Critical,
            "Hypoxia Alert",
            "Consider immediate O2 therapy.",
        )],
        _ => Vec::new(),
    }
}

fn drug_interaction(record: &ClinicalRecord, config: &AlertConfig) -> Vec<Alert> {
    let Some(medication) = record.prescription.medication.as_deref() else {
        return Vec::new();
    };

    config
        .interactions
        .iter()
        .filter(|rule| rule.matches(medication))
        .map(|rule| Alert::new(Severity::Critical, "Interaction Alert", rule.message.clone()))
        .collect()
}
