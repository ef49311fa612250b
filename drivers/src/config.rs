//! Service configuration.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The file path
//! defaults to `config.yaml` but can be specified via `-f` flag or `DRIVERS_CONFIG`.
//!
//! ## Loading Priority
//!
//! Sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `DRIVERS_` override YAML values
//! 3. **DATABASE_URL** - Special case: overrides `database.url` if set
//!
//! For nested values, use double underscores: `DRIVERS_AUTH__SECURITY__JWT_EXPIRY=12h`.
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use drivers::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//! println!("Tokens are valid for {:?}", config.auth.security.jwt_expiry);
//! # Ok(())
//! # }
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::password::Argon2Params;
use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "DRIVERS_CONFIG", default_value = "config.yaml")]
    pub config: String,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Deprecated spelling of `database.url`, filled from `DATABASE_URL`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// PostgreSQL connection settings
    pub database: DatabaseConfig,
    /// Secret key for JWT signing (required)
    pub secret_key: Option<String>,
    /// Token and password hashing settings
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool: PoolSettings,
}

/// Individual pool configuration with the SQLx parameters we expose.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSettings {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections to maintain
    pub min_connections: u32,
    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,
    /// Time before idle connections are closed (seconds, 0 = never)
    pub idle_timeout_secs: u64,
    /// Maximum lifetime of a connection (seconds, 0 = never)
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub security: SecurityConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityConfig {
    /// How long an issued session token stays valid
    #[serde(with = "humantime_serde")]
    pub jwt_expiry: Duration,
}

/// Password hashing cost. Fixed for the lifetime of the process.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordConfig {
    /// Argon2 memory cost in KiB (default: 19456 KiB = 19 MB)
    pub argon2_memory_kib: u32,
    /// Argon2 iterations (default: 2)
    pub argon2_iterations: u32,
    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

impl PasswordConfig {
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/drivers".to_string(),
            pool: PoolSettings::default(),
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 0,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,  // 10 minutes
            max_lifetime_secs: 1800, // 30 minutes
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_expiry: Duration::from_secs(7 * 24 * 60 * 60), // 7 days
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let params = Argon2Params::default();
        Self {
            argon2_memory_kib: params.memory_kib,
            argon2_iterations: params.iterations,
            argon2_parallelism: params.parallelism,
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        if let Some(url) = config.database_url.take() {
            config.database.url = url;
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.secret_key.as_deref().is_none_or(str::is_empty) {
            return Err(Error::Internal {
                operation: "Config validation: secret_key is not configured. \
                     Please set DRIVERS_SECRET_KEY environment variable or add secret_key to config file."
                    .to_string(),
            });
        }

        if self.auth.security.jwt_expiry.as_secs() < 300 {
            return Err(Error::Internal {
                operation: "Config validation: JWT expiry duration is too short (minimum 5 minutes)".to_string(),
            });
        }

        if self.auth.security.jwt_expiry.as_secs() > 86400 * 30 {
            return Err(Error::Internal {
                operation: "Config validation: JWT expiry duration is too long (maximum 30 days)".to_string(),
            });
        }

        let password = &self.auth.password;
        if password.argon2_memory_kib == 0 || password.argon2_iterations == 0 || password.argon2_parallelism == 0 {
            return Err(Error::Internal {
                operation: "Config validation: Argon2 memory, iterations and parallelism must all be greater than zero".to_string(),
            });
        }

        if self.database.pool.min_connections > self.database.pool.max_connections {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: database pool min_connections ({}) cannot be greater than max_connections ({})",
                    self.database.pool.min_connections, self.database.pool.max_connections
                ),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("DRIVERS_").split("__").ignore(&["config"]))
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn args(path: &str) -> Args {
        Args { config: path.to_string() }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.auth.security.jwt_expiry, Duration::from_secs(604_800));
        assert_eq!(config.auth.password.argon2_iterations, 2);
        assert_eq!(config.database.pool.max_connections, 10);
        assert!(config.secret_key.is_none());
    }

    #[test]
    fn test_load_yaml_with_humantime_expiry() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "test.yaml",
                r#"
secret_key: "test-secret-key"
database:
  url: postgres://db.internal/drivers
  pool:
    max_connections: 4
auth:
  security:
    jwt_expiry: "2h"
  password:
    argon2_memory_kib: 4096
"#,
            )?;

            let config = Config::load(&args("test.yaml"))?;

            assert_eq!(config.secret_key.as_deref(), Some("test-secret-key"));
            assert_eq!(config.database.url, "postgres://db.internal/drivers");
            assert_eq!(config.database.pool.max_connections, 4);
            assert_eq!(config.database.pool.acquire_timeout_secs, 30); // still default
            assert_eq!(config.auth.security.jwt_expiry, Duration::from_secs(2 * 60 * 60));
            assert_eq!(config.auth.password.argon2_memory_kib, 4096);
            assert_eq!(config.auth.password.argon2_iterations, 2); // still default

            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("test.yaml", "secret_key: from-file\n")?;

            jail.set_env("DRIVERS_SECRET_KEY", "from-env");
            jail.set_env("DRIVERS_AUTH__SECURITY__JWT_EXPIRY", "1d");
            jail.set_env("DATABASE_URL", "postgres://env-host/drivers");

            let config = Config::load(&args("test.yaml"))?;

            assert_eq!(config.secret_key.as_deref(), Some("from-env"));
            assert_eq!(config.auth.security.jwt_expiry, Duration::from_secs(86400));
            assert_eq!(config.database.url, "postgres://env-host/drivers");
            assert!(config.database_url.is_none());

            Ok(())
        });
    }

    #[test]
    fn test_unknown_fields_rejected() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("test.yaml", "secret_key: hello\nsecrt: typo\n")?;

            assert!(Config::load(&args("test.yaml")).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_config_validation_missing_secret() {
        let config = Config::default();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("secret_key is not configured"));

        let config = Config {
            secret_key: Some(String::new()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_jwt_expiry_bounds() {
        let mut config = Config {
            secret_key: Some("test-key".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.auth.security.jwt_expiry = Duration::from_secs(60);
        assert!(config.validate().unwrap_err().to_string().contains("too short"));

        config.auth.security.jwt_expiry = Duration::from_secs(86400 * 31);
        assert!(config.validate().unwrap_err().to_string().contains("too long"));
    }

    #[test]
    fn test_config_validation_argon2_and_pool() {
        let mut config = Config {
            secret_key: Some("test-key".to_string()),
            ..Default::default()
        };
        config.auth.password.argon2_iterations = 0;
        assert!(config.validate().unwrap_err().to_string().contains("Argon2"));

        config.auth.password.argon2_iterations = 2;
        config.database.pool.min_connections = 20;
        assert!(config.validate().unwrap_err().to_string().contains("min_connections"));
    }
}
