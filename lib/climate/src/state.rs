use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SystemState {
    #[serde(default)]
    pub heaters: Vec<Heater>,
    #[serde(default)]
    pub fans: Vec<Fan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Heater {
    #[serde(rename = "heaterid")]
    pub id: u32,
    pub level: HeaterLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Fan {
    #[serde(rename = "fanid")]
    pub id: u32,
    #[serde(rename = "ison")]
    pub is_on: bool,
}

/// Heater power step accepted by the API, `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeaterLevel(u8);

impl HeaterLevel {
    pub const OFF: HeaterLevel = HeaterLevel(0);
    pub const MAX: HeaterLevel = HeaterLevel(5);

    pub fn new(level: u8) -> Option<HeaterLevel> {
        if level <= Self::MAX.0 {
            Some(HeaterLevel(level))
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeaterLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        HeaterLevel::new(level).ok_or_else(|| {
            format!(
                "heater level {level} is out of range 0..={}",
                HeaterLevel::MAX.0
            )
        })
    }
}

impl From<HeaterLevel> for u8 {
    fn from(level: HeaterLevel) -> Self {
        level.0
    }
}

impl fmt::Display for HeaterLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Heater {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Heater {}: Level {}", self.id, self.level)
    }
}

impl fmt::Display for Fan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Fan {}: {}",
            self.id,
            if self.is_on { "On" } else { "Off" }
        )
    }
}
