mod client;
mod configuration;
mod state;

pub use client::{Client, Error, ErrorKind};
pub use configuration::{FanConfiguration, SensorConfiguration};
pub use state::{Fan, Heater, HeaterLevel, SystemState};

pub type Result<T> = std::result::Result<T, Error>;
