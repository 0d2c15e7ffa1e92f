//! Vital-sign alert classification.
//!
//! A pure range check over one sample; nothing here is persisted. Heart-rate
//! branches are mutually exclusive (first match wins), temperature and
//! oxygen findings are appended independently.

/// Message reported when no range check fires
pub const HEALTHY_MESSAGE: &str = "Vitals are within normal ranges";

const TACHYCARDIA_MESSAGE: &str = "Elevated heart rate (possible tachycardia)";
const BRADYCARDIA_MESSAGE: &str = "Low heart rate (possible bradycardia)";
const FEVER_MESSAGE: &str = "Elevated temperature (fever)";
const HYPOTHERMIA_MESSAGE: &str = "Low temperature (possible hypothermia)";
const HYPOXEMIA_MESSAGE: &str = "Low blood oxygen (possible hypoxemia)";

/// Classify one vital-sign sample into a textual alert.
///
/// Thresholds: heart rate above 90 bpm or below 60 bpm, temperature above
/// 38 °C or at/below 35.1 °C, spo2 below 90 %.
pub fn classify_vitals(spo2: f64, heart_rate: i64, temp: f64) -> String {
    let mut findings = Vec::new();

    if heart_rate > 90 {
        findings.push(TACHYCARDIA_MESSAGE);
    } else if heart_rate < 60 {
        findings.push(BRADYCARDIA_MESSAGE);
    }

    if temp > 38.0 {
        findings.push(FEVER_MESSAGE);
    }
    if temp <= 35.1 {
        findings.push(HYPOTHERMIA_MESSAGE);
    }

    if spo2 < 90.0 {
        findings.push(HYPOXEMIA_MESSAGE);
    }

    if findings.is_empty() {
        HEALTHY_MESSAGE.to_string()
    } else {
        findings.join("; ")
    }
}
