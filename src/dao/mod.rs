#[cfg(feature = "postgres")]
mod postgre;

#[cfg(feature = "postgres")]
pub use postgre::{get_path, DBRow, DataBase, PoolOption, PoolType, QueryResult};
