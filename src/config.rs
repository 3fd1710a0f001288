use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::auth::{Credentials, Secret};
use crate::errors::AppError;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_ADMIN_PASSWORD: &str = "305071";
const DEFAULT_USER_PASSWORD: &str = "1";

#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Memory,
    File(PathBuf),
    Postgres(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub storage: StorageBackend,
    pub credentials: Credentials,
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Reads the process environment; call after `dotenvy::dotenv()`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| {
                    AppError::Config(format!("PORT must be a port number, got {:?}", raw))
                })?,
            None => DEFAULT_PORT,
        };
        let addr = format!("{}:{}", host, port)
            .parse::<SocketAddr>()
            .map_err(|e| {
                AppError::Config(format!("invalid bind address {}:{}: {}", host, port, e))
            })?;

        let storage = match get("STORAGE_BACKEND").as_deref().unwrap_or("file") {
            "memory" => StorageBackend::Memory,
            "file" => StorageBackend::File(
                get("DATA_DIR")
                    .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
                    .into(),
            ),
            "postgres" => StorageBackend::Postgres(get("DATABASE_URL").ok_or_else(|| {
                AppError::Config("DATABASE_URL must be set for the postgres backend".to_string())
            })?),
            other => {
                return Err(AppError::Config(format!(
                    "unknown STORAGE_BACKEND {:?} (expected memory, file or postgres)",
                    other
                )))
            }
        };

        let secret = |plain: &str, hashed: &str, default: &str| match get(hashed) {
            Some(hash) => Secret::Hashed(hash),
            None => Secret::Plain(get(plain).unwrap_or_else(|| default.to_string())),
        };
        let credentials = Credentials::new(
            secret("ADMIN_PASSWORD", "ADMIN_PASSWORD_HASH", DEFAULT_ADMIN_PASSWORD),
            secret("USER_PASSWORD", "USER_PASSWORD_HASH", DEFAULT_USER_PASSWORD),
        );

        Ok(Self {
            addr,
            storage,
            credentials,
            static_dir: get("STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string())
                .into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_use_file_storage_and_fixed_secrets() {
        let config = config(&[]).unwrap();
        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.storage, StorageBackend::File("data".into()));
        assert_eq!(config.credentials.resolve("305071"), Some(Role::Admin));
        assert_eq!(config.credentials.resolve("1"), Some(Role::User));
    }

    #[test]
    fn postgres_backend_needs_database_url() {
        assert!(matches!(
            config(&[("STORAGE_BACKEND", "postgres")]),
            Err(AppError::Config(_))
        ));
        let config = config(&[
            ("STORAGE_BACKEND", "postgres"),
            ("DATABASE_URL", "postgres://localhost/tqm"),
        ])
        .unwrap();
        assert_eq!(
            config.storage,
            StorageBackend::Postgres("postgres://localhost/tqm".into())
        );
    }

    #[test]
    fn rejects_bad_port_and_unknown_backend() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("STORAGE_BACKEND", "redis")]).is_err());
    }

    #[test]
    fn overridden_passwords_replace_defaults() {
        let config = config(&[("ADMIN_PASSWORD", "s3cret"), ("USER_PASSWORD", "guest")]).unwrap();
        assert_eq!(config.credentials.resolve("s3cret"), Some(Role::Admin));
        assert_eq!(config.credentials.resolve("guest"), Some(Role::User));
        assert_eq!(config.credentials.resolve("305071"), None);
    }
}
