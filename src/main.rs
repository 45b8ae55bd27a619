use tokio::sync::watch;
use tracing::{error, Level};

use dlend_etl::{
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    provider::{synchronization, ChainClient, DatabasePool},
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
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(Level::INFO)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let (config, database) = match init().await {
        Ok((config, database)) => (config, database),
        Err(e) => return Err(Error::ConfigurationError(e.to_string())),
    };

    let chain = ChainClient::new(&config)?;
    let state = State::new(config, database, chain).await?;
    let app_state = AppState::new(state);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sync_handle = tokio::spawn(synchronization::sync_task(
        app_state.clone(),
        shutdown_rx,
    ));

    let server = server::init_server(app_state)?;
    server.await?;

    // the server observed a stop signal; let the synchronizer finish its
    // in-flight window and checkpoint before the process exits
    shutdown_tx.send(true).ok();
    sync_handle.await??;

    Ok(())
}

async fn init() -> Result<(Config, DatabasePool), Error> {
    set_configuration()?;
    let config = get_configuration()?;
    let database = DatabasePool::new(&config).await?;
    Ok((config, database))
}
