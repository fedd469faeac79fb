use std::str::FromStr;

use tracing::{error, info, Level};

use kasmetrics::{
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    handler::cache_sweeper,
    server,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let config = match init() {
        Ok(config) => config,
        Err(e) => return Err(Error::ConfigurationError(e.to_string())),
    };

    let level = Level::from_str(&config.log_level).map_err(|e| {
        Error::ConfigurationError(format!("LOG_LEVEL: {}", e))
    })?;

    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        "Starting kasmetrics {} on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.server_host,
        config.port
    );

    let state = State::new(config)?;
    let app_state = AppState::new(state);

    let (_, _) = tokio::try_join!(
        server::server_task(&app_state),
        cache_sweeper::cache_sweep_task(app_state.clone()),
    )?;

    Ok(())
}

fn init() -> Result<Config, Error> {
    set_configuration()?;
    let config = get_configuration()?;
    Ok(config)
}
