pub use self::{
    path::get_path,
    types::{DBRow, DataBase, PoolOption, PoolType, QueryResult},
};
mod chain_event;
mod path;
mod state;
mod types;
