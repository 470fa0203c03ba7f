use async_trait::async_trait;
use climate::{Client, FanConfiguration, HeaterLevel, SensorConfiguration, SystemState};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClimateApi: Send + Sync {
    async fn temperature(&self, sensor_id: u32) -> climate::Result<f64>;
    async fn system_state(&self) -> climate::Result<SystemState>;
    async fn sensor_configurations(&self) -> climate::Result<Vec<SensorConfiguration>>;
    async fn fan_configurations(&self) -> climate::Result<Vec<FanConfiguration>>;
    async fn set_heater_level(&self, heater_id: u32, level: HeaterLevel) -> climate::Result<()>;
    async fn set_fan_state(&self, fan_id: u32, is_on: bool) -> climate::Result<()>;
}

#[async_trait]
impl ClimateApi for Client {
    async fn temperature(&self, sensor_id: u32) -> climate::Result<f64> {
        Client::temperature(self, sensor_id).await
    }

    async fn system_state(&self) -> climate::Result<SystemState> {
        Client::system_state(self).await
    }

    async fn sensor_configurations(&self) -> climate::Result<Vec<SensorConfiguration>> {
        Client::sensor_configurations(self).await
    }

    async fn fan_configurations(&self) -> climate::Result<Vec<FanConfiguration>> {
        Client::fan_configurations(self).await
    }

    async fn set_heater_level(&self, heater_id: u32, level: HeaterLevel) -> climate::Result<()> {
        Client::set_heater_level(self, heater_id, level).await
    }

    async fn set_fan_state(&self, fan_id: u32, is_on: bool) -> climate::Result<()> {
        Client::set_fan_state(self, fan_id, is_on).await
    }
}
