//! The reading bundle appended to the sheet, one per loop iteration.

use chrono::{DateTime, Local};
use serde_json::Value;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One timestamped reading bundle. Never persisted outside the sheet row it
/// produces; a failed append drops it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Captured when the sample is built, immediately before append.
    pub taken_at: DateTime<Local>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub full_spectrum: Option<u16>,
    pub infrared: Option<u16>,
    pub visible: Option<i32>,
}

impl Sample {
    /// Cell values in sheet column order: timestamp, temperature, humidity,
    /// full-spectrum, infrared, visible. Missing readings become null cells.
    pub fn row(&self) -> Vec<Value> {
        vec![
            Value::from(self.taken_at.format(TIMESTAMP_FORMAT).to_string()),
            cell(self.temperature),
            cell(self.humidity),
            cell(self.full_spectrum),
            cell(self.infrared),
            cell(self.visible),
        ]
    }
}

fn cell<T: Into<Value>>(value: Option<T>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}
