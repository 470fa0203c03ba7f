use thermia::{Config, Controller, Runner};

use climate::Client;
use log::{error, info, LevelFilter};
use tokio::signal::unix::{signal, SignalKind};
use tokio::task;
use tokio_util::sync::CancellationToken;

const VERSION: &str = env!("CARGO_PKG_VERSION");

type ErasedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), ErasedError> {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("thermia version {VERSION}");

    let config = Config::from_env().inspect_err(|err| error!("{err}"))?;

    info!(
        "polling {} every {:?}, band {}..{}",
        config.api_url,
        config.poll_interval,
        config.thresholds.low(),
        config.thresholds.high()
    );

    let client = Client::new(
        config.api_url.as_str(),
        &config.api_key,
        config.request_timeout,
    )?;

    let cancel = CancellationToken::new();
    task::spawn(cancel_on_signal(cancel.clone()));

    let mut controller = Controller::new(config.thresholds, config.heater_ids, config.fan_ids);
    let runner = Runner::new(
        &client,
        config.sensor_id,
        config.poll_interval,
        config.request_timeout,
        cancel,
    );

    runner.run(&mut controller).await;

    Ok(())
}

async fn cancel_on_signal(cancel: CancellationToken) {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(err) => {
            error!("unable to listen for SIGTERM: {err}");
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => info!("got SIGTERM, exiting..."),
        _ = tokio::signal::ctrl_c() => info!("got SIGINT, exiting..."),
    };

    cancel.cancel();
}
