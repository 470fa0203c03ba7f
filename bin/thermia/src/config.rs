use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::controller::Thresholds;
use crate::{Error, Result};

const DEFAULT_API_URL: &str = "https://localhost:7021/";
const DEFAULT_TARGET_HIGH: f64 = 19.0;
const DEFAULT_TARGET_LOW: f64 = 18.0;
const DEFAULT_SENSOR_ID: u32 = 1;
const DEFAULT_ACTUATOR_IDS: [u32; 3] = [1, 2, 3];
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: Url,
    pub api_key: String,
    pub thresholds: Thresholds,
    pub sensor_id: u32,
    pub heater_ids: Vec<u32>,
    pub fan_ids: Vec<u32>,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("THERMIA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&api_url)
            .map_err(|err| Error::Config(format!("THERMIA_API_URL {api_url:?}: {err}")))?;

        let api_key = lookup("THERMIA_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("set ENV variable THERMIA_API_KEY".to_string()))?;

        let target_high = parse_var(&lookup, "THERMIA_TARGET_HIGH")?.unwrap_or(DEFAULT_TARGET_HIGH);
        let target_low = parse_var(&lookup, "THERMIA_TARGET_LOW")?.unwrap_or(DEFAULT_TARGET_LOW);
        let thresholds = Thresholds::new(target_low, target_high)?;

        let sensor_id = parse_var(&lookup, "THERMIA_SENSOR_ID")?.unwrap_or(DEFAULT_SENSOR_ID);
        let heater_ids = parse_ids(&lookup, "THERMIA_HEATER_IDS")?;
        let fan_ids = parse_ids(&lookup, "THERMIA_FAN_IDS")?;

        let poll_interval =
            parse_millis(&lookup, "THERMIA_POLL_INTERVAL_MS")?.unwrap_or(DEFAULT_POLL_INTERVAL);
        let request_timeout =
            parse_millis(&lookup, "THERMIA_REQUEST_TIMEOUT_MS")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Ok(Config {
            api_url,
            api_key,
            thresholds,
            sensor_id,
            heater_ids,
            fan_ids,
            poll_interval,
            request_timeout,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|err| Error::Config(format!("{name} {value:?}: {err}"))),
        None => Ok(None),
    }
}

fn parse_millis<F>(lookup: &F, name: &str) -> Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_var::<F, u64>(lookup, name)? {
        Some(0) => Err(Error::Config(format!("{name} must be greater than zero"))),
        Some(millis) => Ok(Some(Duration::from_millis(millis))),
        None => Ok(None),
    }
}

fn parse_ids<F>(lookup: &F, name: &str) -> Result<Vec<u32>>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match lookup(name) {
        Some(value) => value,
        None => return Ok(DEFAULT_ACTUATOR_IDS.to_vec()),
    };

    let ids = value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<u32>()
                .map_err(|err| Error::Config(format!("{name} {id:?}: {err}")))
        })
        .collect::<Result<Vec<_>>>()?;

    if ids.is_empty() {
        return Err(Error::Config(format!("{name} must list at least one id")));
    }

    Ok(ids)
}
