use sqlx::Error;

use crate::model::{SyncState, Table};

use super::QueryResult;

impl Table<SyncState> {
    pub async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT "value" FROM "state" WHERE "key" = $1
            "#,
        )
        .bind(key)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(value,)| value))
    }

    pub async fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO "state" ("key", "value")
            VALUES ($1, $2)
            ON CONFLICT ("key") DO UPDATE SET "value" = EXCLUDED."value"
            "#,
        )
        .bind(key)
        .bind(value)
        .persistent(true)
        .execute(&self.pool)
        .await
    }
}
