use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;

use crate::{
    env::EnvMap,
    error::{DbError, EnvError},
};

pub const DEFAULT_ENV_FILE: &str = ".env";

pub const DB_HOST: &str = "SUPABASE_DB_HOST";
pub const DB_PORT: &str = "SUPABASE_DB_PORT";
pub const DB_NAME: &str = "SUPABASE_DB_NAME";
pub const DB_USER: &str = "SUPABASE_DB_USER";
pub const DB_PASSWORD: &str = "SUPABASE_DB_PASSWORD";
pub const BIND_ADDR: &str = "APP_BIND_ADDR";

pub const DEFAULT_DB_HOST: &str = "aws-0-eu-central-1.pooler.supabase.com";
pub const DEFAULT_DB_PORT: &str = "6543";
pub const DEFAULT_DB_NAME: &str = "postgres";
pub const DEFAULT_DB_USER: &str = "postgres";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:80";

/// Connection parameters. The password has no default and is only sent when set.
#[derive(Debug)]
pub struct DbSettings {
    pub host: String,
    pub port: String,
    pub database: String,
    pub username: String,
    pub password: Option<SecretString>,
}

impl DbSettings {
    pub fn from_env(env: &EnvMap) -> Self {
        DbSettings {
            host: env.get_or(DB_HOST, DEFAULT_DB_HOST),
            port: env.get_or(DB_PORT, DEFAULT_DB_PORT),
            database: env.get_or(DB_NAME, DEFAULT_DB_NAME),
            username: env.get_or(DB_USER, DEFAULT_DB_USER),
            password: env
                .get(DB_PASSWORD)
                .map(|p| SecretString::new(p.into())),
        }
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, DbError> {
        let port: u16 = self
            .port
            .parse()
            .map_err(|_| DbError::InvalidPort(self.port.clone()))?;

        let options = PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .port(port)
            .database(&self.database)
            .username(&self.username);

        Ok(match &self.password {
            Some(password) => options.password(password.expose_secret()),
            None => options,
        })
    }
}

#[derive(Debug)]
pub struct Config {
    pub database: DbSettings,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env(env: &EnvMap) -> Self {
        Config {
            database: DbSettings::from_env(env),
            bind_addr: env.get_or(BIND_ADDR, DEFAULT_BIND_ADDR),
        }
    }

    /// Process environment first, then `path`; the first value seen for a key wins.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EnvError> {
        let mut env = EnvMap::from_process();
        env.load_file(path)?;
        Ok(Self::from_env(&env))
    }

    pub fn load_default() -> Result<Self, EnvError> {
        Self::load(DEFAULT_ENV_FILE)
    }
}
