use sqlx::{Error, QueryBuilder};

use crate::model::{ChainEvent, EventFilter, EventStats, Table};

use super::{DataBase, QueryResult};

impl Table<ChainEvent> {
    /// Inserts a log record unless its (tx_hash, log_index) pair is already
    /// present. Re-ingesting the same log is a no-op, not an error.
    pub async fn insert_if_absent(
        &self,
        event: &ChainEvent,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "events" (
                "block_number",
                "tx_hash",
                "log_index",
                "contract",
                "event_name",
                "args_json",
                "timestamp"
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT ("tx_hash", "log_index") DO NOTHING
            "#,
        )
        .bind(event.block_number)
        .bind(&event.tx_hash)
        .bind(event.log_index)
        .bind(&event.contract)
        .bind(&event.event_name)
        .bind(&event.args_json)
        .bind(event.timestamp)
        .persistent(true)
        .execute(&self.pool)
        .await
    }

    pub async fn get_filtered(
        &self,
        filter: &EventFilter,
        limit: i64,
    ) -> Result<Vec<ChainEvent>, Error> {
        let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
            r#"
            SELECT
                "block_number",
                "tx_hash",
                "log_index",
                "contract",
                "event_name",
                "args_json",
                "timestamp"
            FROM "events"
            WHERE TRUE
            "#,
        );

        Self::push_filter(&mut query_builder, filter);
        query_builder
            .push(r#" ORDER BY "block_number" ASC, "log_index" ASC LIMIT "#);
        query_builder.push_bind(limit);

        query_builder.build_query_as().fetch_all(&self.pool).await
    }

    pub async fn stats(
        &self,
        filter: &EventFilter,
    ) -> Result<Vec<EventStats>, Error> {
        let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
            r#"
            SELECT "contract", "event_name", COUNT(*) AS "count"
            FROM "events"
            WHERE TRUE
            "#,
        );

        Self::push_filter(&mut query_builder, filter);
        query_builder
            .push(r#" GROUP BY "contract", "event_name" ORDER BY "count" DESC"#);

        query_builder.build_query_as().fetch_all(&self.pool).await
    }

    fn push_filter(
        query_builder: &mut QueryBuilder<'_, DataBase>,
        filter: &EventFilter,
    ) {
        if let Some(contract) = &filter.contract {
            query_builder.push(r#" AND "contract" = "#);
            query_builder.push_bind(contract.to_owned());
        }
        if let Some(event) = &filter.event {
            query_builder.push(r#" AND "event_name" = "#);
            query_builder.push_bind(event.to_owned());
        }
        if let Some(from_block) = filter.from_block {
            query_builder.push(r#" AND "block_number" >= "#);
            query_builder.push_bind(from_block);
        }
        if let Some(to_block) = filter.to_block {
            query_builder.push(r#" AND "block_number" <= "#);
            query_builder.push_bind(to_block);
        }
    }
}
