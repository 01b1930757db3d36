//! Mô hình dữ liệu lâm sàng dùng chung cho bước trích xuất và bước cảnh báo.

use serde::{Deserialize, Serialize};

/// Mức độ nghiêm trọng của cảnh báo, theo thứ tự giảm dần.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// Giới tính suy ra từ một token trong bản ghi âm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Thông tin hành chính và lý do khám.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientInfo {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub complaint: Option<String>,
}

impl PatientInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.complaint.is_none()
    }
}

/// Các chỉ số sống được đọc trong lời đọc.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Vitals {
    /// Huyết áp dạng "SYS/DIA" đúng như được đọc.
    #[serde(deserialize_with = "lenient::text")]
    pub bp: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub heart_rate: Option<u32>,
    /// Nhiệt độ (°F).
    #[serde(deserialize_with = "lenient::decimal")]
    pub temp: Option<f64>,
    #[serde(deserialize_with = "lenient::count")]
    pub resp_rate: Option<u32>,
    /// SpO2 (%), luôn trong khoảng 0..=100.
    #[serde(deserialize_with = "lenient::percent")]
    pub o2_sat: Option<u8>,
}

/// Đọc chỉ số sống từ bản ghi do bên ngoài gửi vào: nhận số hoặc chuỗi số,
/// giá trị không đọc được trở thành `None` thay vì làm hỏng cả bản ghi.
mod lenient {
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Reading {
        Number(f64),
        Text(String),
        Other(#[allow(dead_code)] IgnoredAny),
    }

    fn reading<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let value = match Reading::deserialize(deserializer)? {
            Reading::Number(value) => Some(value),
            Reading::Text(text) => text.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
            Reading::Other(_) => None,
        };
        Ok(value.filter(|v| v.is_finite()))
    }

    fn whole(value: f64, max: f64) -> Option<f64> {
        (value.fract() == 0.0 && (0.0..=max).contains(&value)).then_some(value)
    }

    pub fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        reading(deserializer)
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        Ok(reading(deserializer)?
            .and_then(|v| whole(v, f64::from(u32::MAX)))
            .map(|v| v as u32))
    }

    pub fn percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
        Ok(reading(deserializer)?
            .and_then(|v| whole(v, 100.0))
            .map(|v| v as u8))
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Reading::deserialize(deserializer)? {
            Reading::Text(text) => Some(text),
            _ => None,
        })
    }
}

impl Vitals {
    pub fn is_empty(&self) -> bool {
        self.bp.is_none()
            && self.heart_rate.is_none()
            && self.temp.is_none()
            && self.resp_rate.is_none()
            && self.o2_sat.is_none()
    }

    /// Tách huyết áp thành (tâm thu, tâm trương); `None` nếu chuỗi không hợp lệ.
    pub fn blood_pressure(&self) -> Option<(u32, u32)> {
        let (sys, dia) = self.bp.as_deref()?.split_once('/')?;
        let sys = sys.trim().parse::<u32>().ok()?;
        let dia = dia.trim().parse::<u32>().ok()?;
        Some((sys, dia))
    }

    /// Danh sách các chỉ số đã ghi nhận kèm khoảng tham chiếu người lớn.
    pub fn readings(&self) -> Vec<VitalReading> {
        let mut readings = Vec::new();

        if let Some(bp) = &self.bp {
            readings.push(VitalReading::new(
                "Blood Pressure",
                bp.clone(),
                "mmHg",
                "90/60 - 120/80",
            ));
        }
        if let Some(hr) = self.heart_rate {
            readings.push(VitalReading::new("Heart Rate", hr.to_string(), "bpm", "60 - 100"));
        }
        if let Some(temp) = self.temp {
            readings.push(VitalReading::new("Temperature", format!("{temp:.1}"), "°F", "97 - 99"));
        }
        if let Some(rr) = self.resp_rate {
            readings.push(VitalReading::new("Resp. Rate", rr.to_string(), "/min", "12 - 20"));
        }
        if let Some(o2) = self.o2_sat {
            readings.push(VitalReading::new("O2 Saturation", o2.to_string(), "%", "> 95"));
        }

        readings
    }
}

/// Một dòng chỉ số sống để hiển thị.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VitalReading {
    pub label: String,
    pub value: String,
    pub unit: String,
    pub reference_range: String,
}

impl VitalReading {
    fn new(label: &str, value: String, unit: &str, reference_range: &str) -> Self {
        Self {
            label: label.to_string(),
            value,
            unit: unit.to_string(),
            reference_range: reference_range.to_string(),
        }
    }
}

/// Đơn thuốc trích từ một câu kê đơn duy nhất.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Prescription {
    pub medication: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub instructions: Option<String>,
}

impl Prescription {
    pub const DEFAULT_DURATION: &'static str = "7 days";
    pub const DEFAULT_INSTRUCTIONS: &'static str = "Take as directed";

    pub fn is_empty(&self) -> bool {
        self.medication.is_none()
            && self.dosage.is_none()
            && self.frequency.is_none()
            && self.duration.is_none()
            && self.instructions.is_none()
    }
}

/// Ghi chú SOAP.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SoapNote {
    pub subjective: String,
    pub objective: String,
    pub assessment: String,
    pub plan: String,
}

impl SoapNote {
    pub fn is_empty(&self) -> bool {
        self.subjective.is_empty()
            && self.objective.is_empty()
            && self.assessment.is_empty()
            && self.plan.is_empty()
    }
}

/// Bản ghi lâm sàng tạo mới cho mỗi lần trích xuất.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClinicalRecord {
    pub patient_info: PatientInfo,
    pub vitals: Vitals,
    pub prescription: Prescription,
    pub lab_orders: Vec<String>,
    pub soap: SoapNote,
}

impl ClinicalRecord {
    pub fn is_empty(&self) -> bool {
        self.patient_info.is_empty()
            && self.vitals.is_empty()
            && self.prescription.is_empty()
            && self.lab_orders.is_empty()
            && self.soap.is_empty()
    }
}

/// Cảnh báo an toàn sinh ra từ bản ghi.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(severity: Severity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Cặp hoạt chất tương tác và thông điệp hiển thị.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InteractionRule {
    pub first: String,
    pub second: String,
    pub message: String,
}

impl InteractionRule {
    pub fn new(first: &str, second: &str, message: &str) -> Self {
        Self {
            first: first.to_string(),
            second: second.to_string(),
            message: message.to_string(),
        }
    }

    /// Cả hai hoạt chất đều xuất hiện (không phân biệt hoa thường).
    pub fn matches(&self, medication: &str) -> bool {
        let haystack = medication.to_lowercase();
        haystack.contains(&self.first.to_lowercase())
            && haystack.contains(&self.second.to_lowercase())
    }
}

/// Ngưỡng cảnh báo và bảng tương tác thuốc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertConfig {
    /// Huyết áp tâm thu (mmHg) từ mức này trở lên là nguy hiểm.
    pub hypertension_systolic: u32,
    /// Huyết áp tâm trương (mmHg) từ mức này trở lên là nguy hiểm.
    pub hypertension_diastolic: u32,
    /// Sốt cao khi nhiệt độ (°F) vượt quá ngưỡng này.
    pub fever_threshold_f: f64,
    /// Thiếu oxy khi SpO2 thấp hơn ngưỡng này.
    pub hypoxia_threshold: u8,
    pub interactions: Vec<InteractionRule>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            hypertension_systolic: 160,
            hypertension_diastolic: 100,
            fever_threshold_f: 102.0,
            hypoxia_threshold: 92,
            interactions: vec![InteractionRule::new(
                "warfarin",
                "aspirin",
                "Warfarin + Aspirin increases bleeding risk.",
            )],
        }
    }
}

impl AlertConfig {
    /// Đọc cấu hình từ JSON; các khoá bị thiếu giữ giá trị mặc định.
    pub fn from_json_str(json: &str) -> Result<Self, ScribeError> {
        let config: AlertConfig =
            serde_json::from_str(json).map_err(|err| ScribeError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScribeError> {
        if !self.fever_threshold_f.is_finite() {
            return Err(ScribeError::InvalidConfig(
                "fever_threshold_f phải là số hữu hạn".to_string(),
            ));
        }

        for (index, rule) in self.interactions.iter().enumerate() {
            if rule.first.trim().is_empty() || rule.second.trim().is_empty() {
                return Err(ScribeError::InvalidConfig(format!(
                    "interactions[{index}] có hoạt chất rỗng"
                )));
            }
        }

        Ok(())
    }
}

/// Lỗi chung ở ranh giới cấu hình và giải mã JSON.
#[derive(Debug, thiserror::Error)]
pub enum ScribeError {
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Cấu hình không hợp lệ: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blood_pressure_splits_on_slash() {
        let vitals = Vitals {
            bp: Some("160/90".to_string()),
            ..Vitals::default()
        };
        assert_eq!(vitals.blood_pressure(), Some((160, 90)));
    }

    #[test]
    fn malformed_blood_pressure_is_none() {
        for raw in ["160", "abc/90", "160/", "/90", ""] {
            let vitals = Vitals {
                bp: Some(raw.to_string()),
                ..Vitals::default()
            };
            assert_eq!(vitals.blood_pressure(), None, "bp {raw:?}");
        }
    }

    #[test]
    fn malformed_vital_only_clears_its_own_field() {
        let record: ClinicalRecord = serde_json::from_str(
            r#"{ "vitals": { "bp": "170/110", "temp": "abc", "o2Sat": "89", "heartRate": "110" } }"#,
        )
        .expect("bản ghi vẫn phải đọc được");
        assert_eq!(record.vitals.bp.as_deref(), Some("170/110"));
        assert_eq!(record.vitals.temp, None);
        assert_eq!(record.vitals.o2_sat, Some(89));
        assert_eq!(record.vitals.heart_rate, Some(110));
    }

    #[test]
    fn o2_sat_above_hundred_is_dropped_on_read() {
        let vitals: Vitals =
            serde_json::from_str(r#"{ "o2Sat": 250, "respRate": 18.5, "temp": "101.2" }"#)
                .expect("deserialize");
        assert_eq!(vitals.o2_sat, None);
        assert_eq!(vitals.resp_rate, None);
        assert_eq!(vitals.temp, Some(101.2));

        let vitals: Vitals = serde_json::from_str(r#"{ "o2Sat": "94%", "bp": 120, "heartRate": null }"#)
            .expect("deserialize");
        assert_eq!(vitals.o2_sat, Some(94));
        assert_eq!(vitals.bp, None);
        assert_eq!(vitals.heart_rate, None);
    }

    #[test]
    fn temperature_reading_keeps_one_decimal() {
        let vitals = Vitals {
            temp: Some(102.0),
            ..Vitals::default()
        };
        assert_eq!(vitals.readings()[0].value, "102.0");
    }

    #[test]
    fn readings_follow_declared_order() {
        let vitals = Vitals {
            bp: Some("120/80".to_string()),
            temp: Some(98.6),
            o2_sat: Some(97),
            ..Vitals::default()
        };
        let labels: Vec<_> = vitals.readings().into_iter().map(|r| r.label).collect();
        assert_eq!(labels, ["Blood Pressure", "Temperature", "O2 Saturation"]);
    }

    #[test]
    fn interaction_rule_ignores_case_and_order() {
        let rule = InteractionRule::new("warfarin", "aspirin", "bleeding");
        assert!(rule.matches("Aspirin and WARFARIN"));
        assert!(!rule.matches("warfarin"));
    }

    #[test]
    fn config_json_keeps_defaults_for_missing_keys() {
        let config = AlertConfig::from_json_str(r#"{ "hypoxia_threshold": 90 }"#)
            .expect("Không đọc được cấu hình");
        assert_eq!(config.hypoxia_threshold, 90);
        assert_eq!(config.hypertension_systolic, 160);
        assert_eq!(config.interactions.len(), 1);
    }

    #[test]
    fn config_rejects_blank_interaction_term() {
        let json = r#"{ "interactions": [{ "first": " ", "second": "aspirin", "message": "x" }] }"#;
        let err = AlertConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, ScribeError::InvalidConfig(_)));
    }

    #[test]
    fn record_serializes_in_camel_case() {
        let record = ClinicalRecord {
            vitals: Vitals {
                heart_rate: Some(88),
                ..Vitals::default()
            },
            ..ClinicalRecord::default()
        };
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["vitals"]["heartRate"], 88);
        assert!(value.get("labOrders").is_some());
        assert!(value["patientInfo"]["name"].is_null());
    }
}
