pub mod api;
pub mod config;
pub mod controller;
pub mod runner;

mod error;
pub use error::{policy_for, Error, FailureAction, FailureKind};

pub use api::ClimateApi;
pub use config::Config;
pub use controller::{Action, Command, Controller, Decision, Mode, Thresholds};
pub use runner::Runner;

pub type Result<T> = std::result::Result<T, Error>;
