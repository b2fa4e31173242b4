use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::db::Db;

impl Db {
    pub async fn server_time(&self) -> sqlx::Result<DateTime<Utc>> {
        sqlx::query("SELECT now() AS server_time")
            .fetch_one(self.pool())
            .await?
            .try_get("server_time")
    }
}
