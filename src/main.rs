use clap::Parser;
use std::sync::Arc;
use wuwatch::{
    refresh_once, run_refresh_loop, FixtureApi, FixtureGeocoder, Geocoder, GoogleGeocoder,
    JsonSettingsStore, LogPresenter, Presenter, SettingsStore, StationIdentity, WeatherApi,
    WundergroundApi, Wuwatch, WuwatchError, REFRESH_PERIOD,
};

/// Watch a weather station from the command line: periodic current-conditions
/// refresh, or a one-shot address search for nearby stations.
#[derive(Parser, Debug)]
#[command(name = "wuwatch", version, about)]
struct Cli {
    /// Station to watch, overriding the persisted one for this run.
    station: Option<String>,

    /// Search for stations near this address instead of watching.
    #[arg(long)]
    search: Option<String>,

    /// Use canned fixture data instead of live network access.
    #[arg(long)]
    offline: bool,

    /// Refresh once and exit instead of looping.
    #[arg(long)]
    once: bool,

    /// Path to the settings file (defaults to the platform config dir).
    #[arg(long)]
    settings: Option<std::path::PathBuf>,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), WuwatchError> {
    let cli = Cli::parse();

    let env = env_logger::Env::default().default_filter_or(cli.log_level.clone());
    env_logger::init_from_env(env);

    let store: Box<dyn SettingsStore> = match &cli.settings {
        Some(path) => Box::new(JsonSettingsStore::new(path)),
        None => Box::new(JsonSettingsStore::at_default_path()?),
    };
    let api_key = store.load()?.api_key;

    let (api, geocoder): (Arc<dyn WeatherApi>, Arc<dyn Geocoder>) = if cli.offline {
        (Arc::new(FixtureApi), Arc::new(FixtureGeocoder))
    } else {
        (
            Arc::new(WundergroundApi::new(api_key.clone())),
            Arc::new(GoogleGeocoder::new(api_key)),
        )
    };

    let mut watcher = Wuwatch::builder()
        .api(api)
        .geocoder(geocoder)
        .store(store)
        .build()?;

    if let Some(station) = cli.station {
        watcher.set_station(StationIdentity::new(station))?;
    }

    let presenter = LogPresenter;

    if let Some(address) = cli.search {
        let outcome = watcher.search(&address).await?;
        presenter.show_candidates(&outcome.candidates, &outcome.map_url);
        return Ok(());
    }

    if cli.once {
        return refresh_once(&mut watcher, &presenter).await;
    }

    tokio::select! {
        result = run_refresh_loop(&mut watcher, &presenter, REFRESH_PERIOD) => result,
        _ = tokio::signal::ctrl_c() => {
            log::info!("Shutting down");
            Ok(())
        }
    }
}
