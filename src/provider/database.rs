use crate::{
    configuration::Config,
    dao::{PoolOption, PoolType},
    error::Error,
    model::{ChainEvent, SyncState, Table},
};

#[derive(Debug)]
pub struct DatabasePool {
    pub state: Table<SyncState>,
    pub events: Table<ChainEvent>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let pool = PoolOption::new()
            .max_connections(20)
            .connect(config.database_url.as_str())
            .await?;

        Ok(DatabasePool {
            state: Table::new(pool.clone()),
            events: Table::new(pool.clone()),
            pool,
        })
    }
}
