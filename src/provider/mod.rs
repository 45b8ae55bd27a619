pub use self::{
    chain::ChainClient, database::DatabasePool,
    synchronization::Synchronization,
};

mod chain;
mod database;
pub mod synchronization;
