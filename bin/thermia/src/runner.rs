use std::future::Future;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::api::ClimateApi;
use crate::controller::{Controller, Decision};
use crate::error::{policy_for, FailureAction};
use crate::{Error, Result};

/// Drives poll cycles against `api` until `cancel` fires. Cancellation is
/// checked before every wait and every request.
pub struct Runner<'a, A: ?Sized> {
    api: &'a A,
    sensor_id: u32,
    poll_interval: Duration,
    request_timeout: Duration,
    cancel: CancellationToken,
}

impl<'a, A> Runner<'a, A>
where
    A: ClimateApi + ?Sized,
{
    pub fn new(
        api: &'a A,
        sensor_id: u32,
        poll_interval: Duration,
        request_timeout: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            api,
            sensor_id,
            poll_interval,
            request_timeout,
            cancel,
        }
    }

    pub async fn run(&self, controller: &mut Controller) {
        info!("Starting temperature control simulation...");

        loop {
            if self.wait().await.is_err() {
                break;
            }

            match self.poll_cycle(controller).await {
                Ok(decision) => debug!("cycle done: {decision:?}"),
                Err(Error::Cancelled) => break,
                Err(err) => {
                    if self.handle_failure(&err) == FailureAction::Abort {
                        break;
                    }
                }
            }
        }

        info!("temperature control stopped in {} mode", controller.mode());
    }

    /// One fetch-decide-act pass. The configuration lists only feed the report.
    pub async fn poll_cycle(&self, controller: &mut Controller) -> Result<Decision> {
        let temperature = self.call(|| self.api.temperature(self.sensor_id)).await?;
        info!("Current Temperature: {temperature:.1}°C");

        let state = self.call(|| self.api.system_state()).await?;
        info!("System State:");
        if state.heaters.is_empty() && state.fans.is_empty() {
            warn!("  no heaters or fans reported");
        }
        for heater in &state.heaters {
            info!("  {heater}");
        }
        for fan in &state.fans {
            info!("  {fan}");
        }

        let sensors = self.call(|| self.api.sensor_configurations()).await?;
        info!("Sensor Configurations:");
        for sensor in &sensors {
            info!("  {sensor}");
        }

        let fans = self.call(|| self.api.fan_configurations()).await?;
        info!("Fan Configurations:");
        for fan in &fans {
            info!("  {fan}");
        }

        let decision = controller.decide(temperature);
        info!("{}", decision.action);

        for command in controller.commands(&decision) {
            debug!("sending {command:?}");
            self.call(move || command.send(self.api)).await?;
        }

        controller.commit(decision);

        Ok(decision)
    }

    fn handle_failure(&self, err: &Error) -> FailureAction {
        let action = err
            .failure_kind()
            .map(policy_for)
            .unwrap_or(FailureAction::Abort);

        match action {
            FailureAction::LogAndContinue => error!("Error: {err}"),
            FailureAction::Abort => error!("Error: {err}, stopping"),
        }

        action
    }

    async fn wait(&self) -> Result<()> {
        self.ensure_running()?;

        tokio::select! {
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            _ = time::sleep(self.poll_interval) => Ok(()),
        }
    }

    /// `request` is only invoked once the cancellation check has passed.
    async fn call<T, F, Fut>(&self, request: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = climate::Result<T>>,
    {
        self.ensure_running()?;
        let value = time::timeout(self.request_timeout, request()).await??;
        Ok(value)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}
