use std::{sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::sync::OnceCell;

use crate::{
    config::DbSettings,
    error::{DbError, DbResult},
};

/// The shared database handle.
///
/// Backed by a pool capped at a single connection that is kept open for the
/// life of the process, so callers on different tasks queue for it instead of
/// sharing one socket.
#[derive(Clone, Debug)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    pub fn init(pool: PgPool) -> Self {
        Db { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ping(&self) -> sqlx::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Opens the database connection on first use and hands out that same
/// connection afterwards.
///
/// A failed attempt caches nothing; the next call to [`connection`] tries again.
///
/// [`connection`]: ConnectionProvider::connection
pub struct ConnectionProvider {
    settings: DbSettings,
    acquire_timeout: Option<Duration>,
    db: OnceCell<Arc<Db>>,
}

impl ConnectionProvider {
    pub fn new(settings: DbSettings) -> Self {
        ConnectionProvider {
            settings,
            acquire_timeout: None,
            db: OnceCell::new(),
        }
    }

    /// Bounds how long a connect attempt may wait. Without it the driver default applies.
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = Some(timeout);
        self
    }

    pub fn settings(&self) -> &DbSettings {
        &self.settings
    }

    pub async fn connection(&self) -> DbResult<Arc<Db>> {
        self.db.get_or_try_init(|| self.connect()).await.cloned()
    }

    /// Returns the handle only if a previous [`connection`](Self::connection) call succeeded.
    pub fn try_connection(&self) -> DbResult<Arc<Db>> {
        self.db.get().cloned().ok_or(DbError::NotConnected)
    }

    pub fn is_connected(&self) -> bool {
        self.db.initialized()
    }

    async fn connect(&self) -> DbResult<Arc<Db>> {
        let options = self.settings.connect_options()?;

        tracing::info!(
            host = %self.settings.host,
            port = %self.settings.port,
            database = %self.settings.database,
            "connecting to database"
        );

        let mut pool_options = PgPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
        if let Some(timeout) = self.acquire_timeout {
            pool_options = pool_options.acquire_timeout(timeout);
        }

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            tracing::error!("database connection failed: {e}");
            DbError::Connect(e)
        })?;

        Ok(Arc::new(Db::init(pool)))
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::config::Config;

    fn unreachable_settings() -> DbSettings {
        DbSettings {
            host: "127.0.0.1".into(),
            port: "1".into(),
            database: "postgres".into(),
            username: "postgres".into(),
            password: Some(SecretString::new("unused".into())),
        }
    }

    fn unreachable_provider() -> ConnectionProvider {
        ConnectionProvider::new(unreachable_settings())
            .with_acquire_timeout(Duration::from_millis(300))
    }

    #[test]
    fn no_handle_before_first_connection() {
        let provider = unreachable_provider();

        assert!(!provider.is_connected());
        assert!(matches!(
            provider.try_connection(),
            Err(DbError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn failed_connect_is_reported_and_not_cached() {
        let provider = unreachable_provider();

        let err = provider.connection().await.unwrap_err();
        assert!(matches!(err, DbError::Connect(_)));
        assert!(err
            .to_string()
            .starts_with("failed to connect to the database: "));
        assert!(!provider.is_connected());

        // The next request attempts construction again.
        let err = provider.connection().await.unwrap_err();
        assert!(matches!(err, DbError::Connect(_)));
        assert!(matches!(
            provider.try_connection(),
            Err(DbError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn invalid_port_fails_before_connecting() {
        let mut settings = unreachable_settings();
        settings.port = "65536".into();
        let provider = ConnectionProvider::new(settings);

        let err = provider.connection().await.unwrap_err();
        assert!(matches!(err, DbError::InvalidPort(ref p) if p == "65536"));
        assert!(!provider.is_connected());
    }

    #[tokio::test]
    #[ignore = "requires a reachable PostgreSQL configured through SUPABASE_DB_*"]
    async fn repeated_requests_share_one_handle() {
        let config = Config::load_default().unwrap();
        let provider = ConnectionProvider::new(config.database);

        let first = provider.connection().await.unwrap();
        let second = provider.connection().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &provider.try_connection().unwrap()));
        first.ping().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a reachable PostgreSQL configured through SUPABASE_DB_*"]
    async fn concurrent_first_requests_connect_once() {
        let config = Config::load_default().unwrap();
        let provider = Arc::new(ConnectionProvider::new(config.database));

        let (a, b) = tokio::join!(provider.connection(), provider.connection());
        let (a, b) = (a.unwrap(), b.unwrap());

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.pool().size(), 1);
    }
}
