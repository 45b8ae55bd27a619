use alloy::{
    eips::BlockNumberOrTag,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{Filter, Log},
};
use anyhow::Context;
use url::Url;

use crate::{configuration::Config, error::Error, types::TrackedEvent};

/// Read-only JSON-RPC capability shared by the synchronizer and the query
/// handlers. Stateless per call; cloning shares the underlying transport.
#[derive(Debug, Clone)]
pub struct ChainClient {
    provider: DynProvider,
}

impl ChainClient {
    pub fn new(config: &Config) -> Result<ChainClient, Error> {
        let url = Url::parse(config.rpc_url.as_str())
            .context("Invalid rpc url")?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(ChainClient { provider })
    }

    pub fn provider(&self) -> DynProvider {
        self.provider.clone()
    }

    pub async fn latest_block(&self) -> Result<i64, Error> {
        let number = self.provider.get_block_number().await?;
        Ok(i64::try_from(number)?)
    }

    pub async fn chain_id(&self) -> Result<u64, Error> {
        Ok(self.provider.get_chain_id().await?)
    }

    pub async fn block_timestamp(&self, number: i64) -> Result<i64, Error> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(u64::try_from(
                number,
            )?))
            .await?
            .ok_or(Error::MissingBlock(number))?;

        Ok(i64::try_from(block.header.timestamp)?)
    }

    pub async fn logs(
        &self,
        contract: Address,
        event: TrackedEvent,
        from_block: i64,
        to_block: i64,
    ) -> Result<Vec<Log>, Error> {
        let filter = Filter::new()
            .address(contract)
            .event_signature(event.signature_hash())
            .from_block(u64::try_from(from_block)?)
            .to_block(u64::try_from(to_block)?);

        Ok(self.provider.get_logs(&filter).await?)
    }
}
