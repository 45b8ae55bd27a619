use std::collections::HashMap;
use std::time::Duration;

use alloy::rpc::types::Log;
use tokio::{sync::watch, time};
use tracing::{error, info, warn};

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::ChainEvent,
    types::TrackedEvent,
};

pub const LAST_PROCESSED_BLOCK: &str = "lastProcessedBlock";

/// Blocks covered by the first cycle when the store has never been synced.
pub const DEFAULT_LOOKBACK: i64 = 2000;

/// Incremental log ingestion. Each cycle walks inclusive windows of at most
/// `batch_size` blocks from the persisted checkpoint up to the node's latest
/// block, persisting the checkpoint once per completed window so a crash
/// loses at most the in-flight window.
#[derive(Debug)]
pub struct Synchronization {
    app_state: AppState<State>,
    shutdown: watch::Receiver<bool>,
}

impl Synchronization {
    pub fn new(
        app_state: AppState<State>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Synchronization {
            app_state,
            shutdown,
        }
    }

    pub async fn run(mut self) -> Result<(), Error> {
        let mut interval = time::interval(Duration::from_secs(
            self.app_state.config.poll_interval,
        ));
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {},
                changed = self.shutdown.changed() => {
                    // a closed channel means the caller is gone; stop too
                    if changed.is_err() {
                        info!("Synchronization stopped");
                        return Ok(());
                    }
                },
            }

            if *self.shutdown.borrow() {
                info!("Synchronization stopped");
                return Ok(());
            }

            if let Err(e) = self.run_cycle().await {
                error!("Synchronization cycle error {}", e);
            }
        }
    }

    async fn run_cycle(&self) -> Result<(), Error> {
        let state = &self.app_state;

        let latest_block = state.chain.latest_block().await?;
        let checkpoint = state
            .database
            .state
            .get(LAST_PROCESSED_BLOCK)
            .await?
            .map(|value| value.parse::<i64>())
            .transpose()?;

        let Some(start_block) = next_start_block(checkpoint, latest_block)
        else {
            return Ok(());
        };

        // lives for one cycle only; bounded by the cycle's block span
        let mut timestamps: HashMap<i64, i64> = HashMap::new();
        let mut from_block = start_block;

        while from_block <= latest_block {
            let to_block =
                window_end(from_block, latest_block, state.config.batch_size);

            let inserted = self
                .process_window(from_block, to_block, &mut timestamps)
                .await?;
            state
                .database
                .state
                .set(LAST_PROCESSED_BLOCK, &to_block.to_string())
                .await?;

            info!(
                "Indexed blocks {}..={} ({} logs)",
                from_block, to_block, inserted
            );
            from_block = to_block + 1;

            if *self.shutdown.borrow() {
                info!("Synchronization halting after block {}", to_block);
                break;
            }
        }

        Ok(())
    }

    async fn process_window(
        &self,
        from_block: i64,
        to_block: i64,
        timestamps: &mut HashMap<i64, i64>,
    ) -> Result<u64, Error> {
        let state = &self.app_state;
        let mut inserted = 0;

        for contract in &state.config.market_contracts {
            for event in TrackedEvent::ALL {
                let logs = match state
                    .chain
                    .logs(*contract, event, from_block, to_block)
                    .await
                {
                    Ok(logs) => logs,
                    Err(e) => {
                        warn!(
                            "Skipping {} logs for {} in {}..={}: {}",
                            event.name(),
                            contract,
                            from_block,
                            to_block,
                            e
                        );
                        continue;
                    },
                };

                for log in logs {
                    let record =
                        self.build_record(event, &log, timestamps).await?;
                    state.database.events.insert_if_absent(&record).await?;
                    inserted += 1;
                }
            }
        }

        Ok(inserted)
    }

    async fn build_record(
        &self,
        event: TrackedEvent,
        log: &Log,
        timestamps: &mut HashMap<i64, i64>,
    ) -> Result<ChainEvent, Error> {
        let block_number = log.block_number.ok_or_else(|| {
            Error::ParseMessage(String::from("log without block number"))
        })?;
        let block_number = i64::try_from(block_number)?;
        let tx_hash = log.transaction_hash.ok_or_else(|| {
            Error::ParseMessage(String::from("log without transaction hash"))
        })?;
        let log_index = log.log_index.ok_or_else(|| {
            Error::ParseMessage(String::from("log without log index"))
        })?;

        let args = event.decode_args(log)?;
        let timestamp = self.block_timestamp(block_number, timestamps).await?;

        Ok(ChainEvent {
            block_number,
            tx_hash: tx_hash.to_string(),
            log_index: i64::try_from(log_index)?,
            contract: log.address().to_checksum(None),
            event_name: event.name().to_owned(),
            args_json: args.to_string(),
            timestamp,
        })
    }

    /// A failure here is fatal to the whole window: the timestamp is part of
    /// the event's permanent record and must never be fabricated.
    async fn block_timestamp(
        &self,
        block_number: i64,
        timestamps: &mut HashMap<i64, i64>,
    ) -> Result<i64, Error> {
        if let Some(timestamp) = timestamps.get(&block_number) {
            return Ok(*timestamp);
        }

        let timestamp =
            self.app_state.chain.block_timestamp(block_number).await?;
        timestamps.insert(block_number, timestamp);

        Ok(timestamp)
    }
}

pub async fn sync_task(
    app_state: AppState<State>,
    shutdown: watch::Receiver<bool>,
) -> Result<(), Error> {
    if !app_state.config.enable_sync {
        return Ok(());
    }

    Synchronization::new(app_state, shutdown).run().await
}

/// First block of the next cycle, or None when the store is caught up.
/// An absent checkpoint seeds the backfill to the trailing
/// `DEFAULT_LOOKBACK` blocks.
pub fn next_start_block(
    checkpoint: Option<i64>,
    latest_block: i64,
) -> Option<i64> {
    let last_processed = checkpoint
        .unwrap_or_else(|| (latest_block - DEFAULT_LOOKBACK).max(0) - 1);

    if last_processed >= latest_block {
        return None;
    }

    Some(last_processed + 1)
}

pub fn window_end(from_block: i64, latest_block: i64, batch_size: i64) -> i64 {
    (from_block + batch_size - 1).min(latest_block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_initial_backfill() {
        // empty store, latest 5000 -> backfill starts at 3000
        assert_eq!(next_start_block(None, 5000), Some(3000));
    }

    #[test]
    fn seeds_short_chain_from_genesis() {
        assert_eq!(next_start_block(None, 100), Some(0));
        assert_eq!(next_start_block(None, 0), Some(0));
    }

    #[test]
    fn resumes_after_checkpoint() {
        assert_eq!(next_start_block(Some(4200), 5000), Some(4201));
    }

    #[test]
    fn caught_up_cycle_is_a_no_op() {
        assert_eq!(next_start_block(Some(5000), 5000), None);
        assert_eq!(next_start_block(Some(5001), 5000), None);
    }

    #[test]
    fn window_end_respects_batch_and_latest() {
        assert_eq!(window_end(3000, 5000, 1000), 3999);
        assert_eq!(window_end(4900, 5000, 1000), 5000);
        assert_eq!(window_end(5000, 5000, 1000), 5000);
    }

    #[test]
    fn cycle_walk_covers_range_one_window_at_a_time() {
        let latest_block = 5000;
        let batch_size = 1000;

        let mut windows = Vec::new();
        let mut checkpoint = None;

        let mut from_block =
            next_start_block(checkpoint, latest_block).unwrap();
        while from_block <= latest_block {
            let to_block = window_end(from_block, latest_block, batch_size);
            windows.push((from_block, to_block));
            checkpoint = Some(to_block);
            from_block = to_block + 1;
        }

        assert_eq!(
            windows,
            vec![(3000, 3999), (4000, 4999), (5000, 5000)]
        );
        assert_eq!(checkpoint, Some(latest_block));
        // next cycle with no new blocks does nothing
        assert_eq!(next_start_block(checkpoint, latest_block), None);
    }
}
