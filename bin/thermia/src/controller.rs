use std::fmt;

use climate::HeaterLevel;
use log::info;

use crate::api::ClimateApi;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Heating,
    Cooling,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::Heating => write!(f, "heating"),
            Mode::Cooling => write!(f, "cooling"),
        }
    }
}

/// Hysteresis band, `low < high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    low: f64,
    high: f64,
}

impl Thresholds {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() {
            return Err(Error::Config(format!(
                "thresholds must be finite, got low {low} and high {high}"
            )));
        }

        if high <= low {
            return Err(Error::Config(format!(
                "target high {high} must exceed target low {low}"
            )));
        }

        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    HeatUp,
    StopHeating,
    CoolDown,
    StopCooling,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::HeatUp => write!(f, "Heating up..."),
            Action::StopHeating => write!(f, "Target temperature reached. Turning off heater."),
            Action::CoolDown => write!(f, "Cooling down..."),
            Action::StopCooling => write!(f, "Minimum temperature reached. Turning off fans."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub next_mode: Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetHeaterLevel { heater_id: u32, level: HeaterLevel },
    SetFanState { fan_id: u32, is_on: bool },
}

impl Command {
    pub async fn send<A>(self, api: &A) -> climate::Result<()>
    where
        A: ClimateApi + ?Sized,
    {
        match self {
            Command::SetHeaterLevel { heater_id, level } => {
                api.set_heater_level(heater_id, level).await
            }
            Command::SetFanState { fan_id, is_on } => api.set_fan_state(fan_id, is_on).await,
        }
    }
}

/// Two-point hysteresis controller. Starts in [`Mode::Heating`].
#[derive(Debug, Clone, PartialEq)]
pub struct Controller {
    thresholds: Thresholds,
    mode: Mode,
    heater_ids: Vec<u32>,
    fan_ids: Vec<u32>,
}

impl Controller {
    pub fn new(thresholds: Thresholds, heater_ids: Vec<u32>, fan_ids: Vec<u32>) -> Self {
        Self {
            thresholds,
            mode: Mode::Heating,
            heater_ids,
            fan_ids,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// At exactly a threshold the switching branch is taken.
    pub fn decide(&self, temperature: f64) -> Decision {
        match self.mode {
            Mode::Heating if temperature < self.thresholds.high => Decision {
                action: Action::HeatUp,
                next_mode: Mode::Heating,
            },
            Mode::Heating => Decision {
                action: Action::StopHeating,
                next_mode: Mode::Cooling,
            },
            Mode::Cooling if temperature > self.thresholds.low => Decision {
                action: Action::CoolDown,
                next_mode: Mode::Cooling,
            },
            Mode::Cooling => Decision {
                action: Action::StopCooling,
                next_mode: Mode::Heating,
            },
        }
    }

    /// Actuator commands carrying out `decision`, in issue order.
    pub fn commands(&self, decision: &Decision) -> Vec<Command> {
        match decision.action {
            Action::HeatUp => self.heater_commands(HeaterLevel::MAX),
            Action::StopHeating => self.heater_commands(HeaterLevel::OFF),
            Action::CoolDown => self.fan_commands(true),
            Action::StopCooling => self.fan_commands(false),
        }
    }

    /// Called once every command of `decision` has been accepted.
    pub fn commit(&mut self, decision: Decision) {
        if decision.next_mode != self.mode {
            info!("switching from {} to {}", self.mode, decision.next_mode);
            self.mode = decision.next_mode;
        }
    }

    fn heater_commands(&self, level: HeaterLevel) -> Vec<Command> {
        self.heater_ids
            .iter()
            .map(|&heater_id| Command::SetHeaterLevel { heater_id, level })
            .collect()
    }

    fn fan_commands(&self, is_on: bool) -> Vec<Command> {
        self.fan_ids
            .iter()
            .map(|&fan_id| Command::SetFanState { fan_id, is_on })
            .collect()
    }
}
