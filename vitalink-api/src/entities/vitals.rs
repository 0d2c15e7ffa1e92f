use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters carried by one device sample
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DevicePushParams {
    /// Identifier of the reporting device
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

/// Reply when no sample has been recorded yet
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoVitalsResponse {
    /// Always false; distinguishes "no data yet" from an error
    pub has_vitals: bool,
}

/// The most recent vitals for a profile
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VitalsResponse {
    /// Body temperature in °C
    pub temp: Option<f64>,

    /// Heart rate in beats per minute
    pub heart_rate: Option<i64>,

    /// Blood oxygen saturation in percent
    pub blood_oxygen: Option<f64>,

    /// Derived systolic blood pressure in mmHg
    pub sbp: Option<i64>,

    /// Derived diastolic blood pressure in mmHg
    pub dbp: Option<i64>,

    /// Opaque raw ECG waveform payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecg_sensor_frame: Option<String>,

    /// Age of the sample in seconds
    pub time_diff_seconds: i64,

    /// Whether the sample is younger than the freshness threshold
    pub online: bool,

    /// Informational alert classification for the sample
    pub alert: String,
}
