//! Settings of the long-lived process.
//!
//! Read from `settings.toml` (optional) and then from `FISCALFIT_*`
//! environment variables, nested keys separated by `__`
//! (`FISCALFIT_LEDGER__OWNER_NAME=Priya`). Every section has defaults, so
//! an empty configuration serves an on-disk ledger on `127.0.0.1:3000`.

use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `database = "memory"` or `database = { sqlite = "./fiscalfit.db" }`.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("./fiscalfit.db".to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Ledger {
    pub owner_name: String,
    pub allow_self_obligations: bool,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            owner_name: engine::DEFAULT_OWNER_NAME.to_string(),
            allow_self_obligations: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    pub server: Server,
    pub ledger: Ledger,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder().add_source(File::with_name("settings").required(false)),
        )
    }

    fn from_builder(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(
                Environment::with_prefix("FISCALFIT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Settings {
        Settings::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
            .unwrap()
    }

    #[test]
    fn empty_configuration_uses_defaults() {
        let settings = from_toml("");
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.database, Database::Sqlite("./fiscalfit.db".to_string()));
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.ledger.owner_name, "Me");
        assert!(settings.ledger.allow_self_obligations);
    }

    #[test]
    fn sections_override_defaults() {
        let settings = from_toml(
            r#"
            database = "memory"

            [server]
            port = 8080

            [ledger]
            owner_name = "Priya"
            allow_self_obligations = false
            "#,
        );
        assert_eq!(settings.database, Database::Memory);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert_eq!(settings.ledger.owner_name, "Priya");
        assert!(!settings.ledger.allow_self_obligations);
    }

    #[test]
    fn sqlite_path_is_read() {
        let settings = from_toml(
            r#"
            [database]
            sqlite = "/var/lib/fiscalfit/ledger.db"
            "#,
        );
        assert_eq!(
            settings.database,
            Database::Sqlite("/var/lib/fiscalfit/ledger.db".to_string())
        );
    }
}
