use std::fs;

use scribe_core::AlertConfig;
use scribe_engine::analyze_note;
use serde_json::Value;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn emergency_dictation_matches_golden() {
    let note = fs::read_to_string(fixture_path("ed_dictation.txt"))
        .expect("Không đọc được bản ghi âm mẫu");

    let analysis = analyze_note(note.trim_end(), &AlertConfig::default());
    let actual = serde_json::to_value(&analysis).expect("Không serialize kết quả");

    let expected = fs::read_to_string(fixture_path("ed_dictation_analysis.json"))
        .expect("Không đọc được golden snapshot");
    let expected: Value = serde_json::from_str(&expected).expect("Golden không hợp lệ");

    assert_eq!(actual, expected);
}

#[test]
fn golden_analysis_is_stable_across_calls() {
    let note = fs::read_to_string(fixture_path("ed_dictation.txt"))
        .expect("Không đọc được bản ghi âm mẫu");
    let config = AlertConfig::default();

    let first = analyze_note(note.trim_end(), &config);
    let second = analyze_note(note.trim_end(), &config);
    assert_eq!(first, second);
}
