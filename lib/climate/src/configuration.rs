use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorConfiguration {
    pub id: u32,
    #[serde(rename = "logicdescription", default)]
    pub logic_description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FanConfiguration {
    pub id: u32,
    #[serde(rename = "delayseconds")]
    pub delay_seconds: u32,
}

impl fmt::Display for SensorConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Sensor {}: Adjustment Logic - {}",
            self.id,
            self.logic_description.as_deref().unwrap_or_default()
        )
    }
}

impl fmt::Display for FanConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Fan {}: Delay - {} seconds", self.id, self.delay_seconds)
    }
}
