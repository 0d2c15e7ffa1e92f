use serde::{Deserialize, Serialize};

/// Storage model for one immutable vital-sign sample. Records are only ever
/// inserted; nothing mutates or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Unique identifier for the sample
    pub id: String,

    /// Identifier of the device that produced the sample, when reported
    pub device_id: Option<String>,

    /// Server-clock insertion time, RFC 3339
    pub timestamp: String,

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
}
