use serde::{Deserialize, Serialize};

/// One inbound device sample, before estimation and persistence
#[derive(Debug, Clone, Deserialize)]
pub struct DevicePush {
    /// Identifier of the reporting device, when the firmware sends one
    pub device_id: Option<String>,

    /// Blood oxygen saturation in percent
    pub spo2: f64,

    /// Heart rate in beats per minute
    pub heart_rate: i64,

    /// Body temperature in °C
    pub temp: f64,

    /// Opaque raw ECG waveform payload
    pub ecg_sensor_frame: Option<String>,

    /// Per-user age context; demographic defaults apply when absent
    pub age: Option<u32>,

    /// Per-user gender context; demographic defaults apply when absent
    pub gender: Option<String>,
}

/// The most recent vitals for a profile, with a freshness judgement
#[derive(Debug, Clone, Serialize)]
pub struct VitalsSnapshot {
    /// Body temperature in °C
    pub temp: Option<f64>,

    /// Heart rate in beats per minute
    pub heart_rate: Option<i64>,

    /// Blood oxygen saturation in percent
    pub blood_oxygen: Option<f64>,

    /// Derived systolic blood pressure
    pub sbp: Option<i64>,

    /// Derived diastolic blood pressure
    pub dbp: Option<i64>,

    /// Opaque raw ECG waveform payload
    pub ecg_sensor_frame: Option<String>,

    /// Age of the sample in seconds
    pub time_diff_seconds: i64,

    /// Whether the sample is younger than the freshness threshold
    pub online: bool,

    /// Informational alert classification for the sample
    pub alert: String,
}
