//! Bridge WASM <-> JavaScript trung lập framework.

use scribe_core::{AlertConfig, ClinicalRecord, InteractionRule, ScribeError};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsAlertConfig {
    #[serde(default)]
    hypertension_systolic: Option<u32>,
    #[serde(default)]
    hypertension_diastolic: Option<u32>,
    #[serde(default)]
    fever_threshold_f: Option<f64>,
    #[serde(default)]
    hypoxia_threshold: Option<u8>,
    #[serde(default)]
    interactions: Option<Vec<InteractionRule>>,
}

impl From<JsAlertConfig> for AlertConfig {
    fn from(cfg: JsAlertConfig) -> Self {
        let mut base = AlertConfig::default();
        if let Some(value) = cfg.hypertension_systolic {
            base.hypertension_systolic = value;
        }
        if let Some(value) = cfg.hypertension_diastolic {
            base.hypertension_diastolic = value;
        }
        if let Some(value) = cfg.fever_threshold_f {
            base.fever_threshold_f = value;
        }
        if let Some(value) = cfg.hypoxia_threshold {
            base.hypoxia_threshold = value;
        }
        if let Some(rules) = cfg.interactions {
            base.interactions = rules;
        }
        base
    }
}

fn read_config(config: Option<JsValue>) -> Result<AlertConfig, JsValue> {
    let cfg = match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsAlertConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            AlertConfig::from(cfg)
        }
        _ => AlertConfig::default(),
    };
    cfg.validate()
        .map_err(|err| JsValue::from_str(&format_scribe_error(err)))?;
    Ok(cfg)
}

/// Trích xuất bản ghi lâm sàng; trả về `null` khi văn bản rỗng.
#[wasm_bindgen(js_name = parseNote)]
pub fn parse_note(text: &str) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    to_value(&scribe_engine::parse(text))
        .map_err(|err| JsValue::from_str(&format!("Không serialize bản ghi: {err}")))
}

/// Tính lại toàn bộ danh sách cảnh báo cho một bản ghi đã có.
#[wasm_bindgen(js_name = evaluateRecord)]
pub fn evaluate_record(record: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let record: ClinicalRecord = from_value(record).map_err(|err| {
        JsValue::from_str(&format_scribe_error(ScribeError::Parse(err.to_string())))
    })?;
    let cfg = read_config(config)?;

    to_value(&scribe_engine::evaluate_with(&record, &cfg))
        .map_err(|err| JsValue::from_str(&format!("Không serialize cảnh báo: {err}")))
}

/// Trích xuất và đánh giá trong một lần gọi.
#[wasm_bindgen(js_name = analyzeNote)]
pub fn analyze_note(text: &str, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = read_config(config)?;
    to_value(&scribe_engine::analyze_note(text, &cfg))
        .map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

/// Ghép các lượt đọc của người dùng rồi phân tích lại toàn bộ lịch sử.
#[wasm_bindgen(js_name = analyzeTurns)]
pub fn analyze_turns(turns: Vec<String>, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = read_config(config)?;
    let history = scribe_engine::join_turns(&turns);
    to_value(&scribe_engine::analyze_note(&history, &cfg))
        .map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

/// Danh sách mẫu ghi chú nhanh.
#[wasm_bindgen(js_name = listTemplates)]
pub fn list_templates() -> Result<JsValue, JsValue> {
    to_value(scribe_engine::templates::all())
        .map_err(|err| JsValue::from_str(&format!("Không serialize mẫu: {err}")))
}

fn format_scribe_error(err: ScribeError) -> String {
    format!("Scribe error: {err}")
}
