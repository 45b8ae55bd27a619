use std::{env, fs, ops::Deref, sync::Arc};

use alloy::primitives::Address;

use crate::{
    dao::get_path,
    error::Error,
    helpers::parse_address,
    provider::{ChainClient, DatabasePool},
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub database: DatabasePool,
    pub chain: ChainClient,
}

impl State {
    pub async fn new(
        config: Config,
        database: DatabasePool,
        chain: ChainClient,
    ) -> Result<State, Error> {
        Self::init_migrations(&database).await?;
        Ok(Self {
            config,
            database,
            chain,
        })
    }

    async fn init_migrations(database: &DatabasePool) -> Result<(), Error> {
        let files = vec!["state.sql", "events.sql"];

        let dir = env!("CARGO_MANIFEST_DIR");

        for file in files {
            let data = fs::read_to_string(get_path(dir, file))?;
            sqlx::query(data.as_str()).execute(&database.pool).await?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub database_url: String,
    pub poll_interval: u64,
    pub batch_size: i64,
    pub market_contracts: Vec<Address>,
    pub comptroller_contract: Option<Address>,
    pub price_oracle_contract: Option<Address>,
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub enable_sync: bool,
}

pub fn get_configuration() -> Result<Config, Error> {
    let rpc_url = env::var("RPC_URL")?;
    let database_url = env::var("DATABASE_URL")?;
    let poll_interval = env_or("POLL_INTERVAL", "5").parse()?;
    let batch_size = env_or("BATCH_SIZE", "1000").parse()?;
    let enable_sync = env_or("ENABLE_SYNC", "true").parse()?;

    let market_contracts = parse_market_contracts(&env::var("MARKET_CONTRACTS")?)?;
    let comptroller_contract = optional_address("COMPTROLLER_CONTRACT")?;
    let price_oracle_contract = optional_address("PRICE_ORACLE_CONTRACT")?;

    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let allowed_origins = env_or("ALLOWED_ORIGINS", "*")
        .split(',')
        .map(|item| item.to_owned())
        .collect::<Vec<String>>();

    let config = Config {
        rpc_url,
        database_url,
        poll_interval,
        batch_size,
        market_contracts,
        comptroller_contract,
        price_oracle_contract,
        server_host,
        port,
        allowed_origins,
        enable_sync,
    };

    Ok(config)
}

pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    if let Ok(config_string) = fs::read_to_string(path) {
        parse_config_string(config_string)?;
    }

    Ok(())
}

fn parse_config_string(config: String) -> Result<(), Error> {
    for line in config.lines() {
        if let Some(index) = line.find('=') {
            let (key, value) = line.split_at(index);
            // environment set by the deployment wins over the file
            if env::var(key).is_err() {
                env::set_var(key, &value[1..]);
            }
        }
    }

    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_market_contracts(raw: &str) -> Result<Vec<Address>, Error> {
    let mut addresses = Vec::new();

    for item in raw.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let address = parse_address(item).ok_or_else(|| {
            Error::ConfigurationError(format!(
                "invalid market address: {}",
                item
            ))
        })?;
        addresses.push(address);
    }

    Ok(addresses)
}

fn optional_address(key: &str) -> Result<Option<Address>, Error> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => {
            let address = parse_address(value.trim()).ok_or_else(|| {
                Error::ConfigurationError(format!(
                    "invalid address in {}: {}",
                    key, value
                ))
            })?;
            Ok(Some(address))
        },
        _ => Ok(None),
    }
}
