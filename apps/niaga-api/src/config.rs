//! Service configuration.
//!
//! Layered, later layers win:
//! 1. Defaults in code
//! 2. `config/{environment}.toml` next to this crate's manifest (optional)
//! 3. `config/{environment}.toml` under the working directory (optional)
//! 4. Environment variables with the `NIAGA_` prefix, `__` between sections
//!    (`NIAGA_SERVER__PORT=9090`, `NIAGA_ORDERS__SALES_TAX_RATE_BPS=1100`)

use config::{ConfigError, Environment, File};
use niaga_core::{OrderKind, Percentage, StatusPolicy, DEFAULT_TAX_RATE_BPS};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// `development`, `production`, ...
    pub environment: String,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub orders: OrderSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    /// SQLite file path, or `:memory:`.
    pub path: String,
    pub max_connections: u32,
}

/// Tax rates and edit rules for orders.
#[derive(Debug, Deserialize, Clone)]
pub struct OrderSettings {
    pub purchase_tax_rate_bps: u32,
    pub sales_tax_rate_bps: u32,
    pub pos_tax_rate_bps: u32,
    /// Whether purchase orders awaiting approval may still be edited.
    pub purchase_editable_in_pending_approval: bool,
}

impl OrderSettings {
    pub fn tax_rate(&self, kind: OrderKind) -> Percentage {
        match kind {
            OrderKind::Purchase => Percentage::from_bps(self.purchase_tax_rate_bps),
            OrderKind::Sales => Percentage::from_bps(self.sales_tax_rate_bps),
        }
    }

    pub fn pos_tax_rate(&self) -> Percentage {
        Percentage::from_bps(self.pos_tax_rate_bps)
    }

    pub fn policy(&self) -> StatusPolicy {
        StatusPolicy::new(self.purchase_editable_in_pending_approval)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, bps) in [
            ("orders.purchase_tax_rate_bps", self.purchase_tax_rate_bps),
            ("orders.sales_tax_rate_bps", self.sales_tax_rate_bps),
            ("orders.pos_tax_rate_bps", self.pos_tax_rate_bps),
        ] {
            if bps > Percentage::FULL_BPS {
                return Err(ConfigError::Message(format!(
                    "{} must be at most {} basis points, got {}",
                    key,
                    Percentage::FULL_BPS,
                    bps
                )));
            }
        }
        Ok(())
    }
}

impl Settings {
    /// Loads settings from files and environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("NIAGA_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        Self::load_from(&environment, environment_variables())
    }

    fn load_from(environment: &str, variables: Environment) -> Result<Self, ConfigError> {
        let bundled = format!("{}/config/{}", env!("CARGO_MANIFEST_DIR"), environment);

        let settings: Settings = Self::defaults(environment)?
            .add_source(File::with_name(&bundled).required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(variables)
            .build()?
            .try_deserialize()?;

        settings.orders.validate()?;
        Ok(settings)
    }

    /// Defaults only, on an in-memory database.
    pub fn for_tests() -> Result<Self, ConfigError> {
        let settings: Settings = Self::defaults("test")?
            .set_override("database.path", ":memory:")?
            .build()?
            .try_deserialize()?;

        settings.orders.validate()?;
        Ok(settings)
    }

    fn defaults(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.path", "./niaga.db")?
            .set_default("database.max_connections", 5)?
            .set_default("orders.purchase_tax_rate_bps", DEFAULT_TAX_RATE_BPS as i64)?
            .set_default("orders.sales_tax_rate_bps", DEFAULT_TAX_RATE_BPS as i64)?
            .set_default("orders.pos_tax_rate_bps", 0)?
            .set_default("orders.purchase_editable_in_pending_approval", false)
    }
}

/// `NIAGA_SERVER__PORT` maps to `server.port`.
fn environment_variables() -> Environment {
    Environment::with_prefix("NIAGA")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::for_tests().unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.path, ":memory:");
        assert_eq!(settings.orders.tax_rate(OrderKind::Sales), Percentage::from_percent(10));
        assert!(settings.orders.pos_tax_rate().is_zero());
        assert!(!settings.orders.purchase_editable_in_pending_approval);
    }

    #[test]
    fn test_environment_overrides() {
        let mut vars = config::Map::new();
        vars.insert("NIAGA_SERVER__PORT".to_string(), "9191".to_string());
        vars.insert("NIAGA_ORDERS__SALES_TAX_RATE_BPS".to_string(), "1100".to_string());
        vars.insert("NIAGA_DATABASE__PATH".to_string(), ":memory:".to_string());

        let variables = environment_variables().source(Some(vars));
        let settings = Settings::load_from("test", variables).unwrap();

        assert_eq!(settings.server.port, 9191);
        assert_eq!(settings.database.path, ":memory:");
        assert_eq!(settings.orders.tax_rate(OrderKind::Sales), Percentage::from_bps(1100));
        assert_eq!(settings.orders.tax_rate(OrderKind::Purchase), Percentage::from_percent(10));
    }

    #[test]
    fn test_bundled_development_file() {
        let variables = environment_variables().source(Some(config::Map::new()));
        let settings = Settings::load_from("development", variables).unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
    }

    #[test]
    fn test_tax_rate_above_full_rejected() {
        let orders = OrderSettings {
            purchase_tax_rate_bps: 12_000,
            sales_tax_rate_bps: 1000,
            pos_tax_rate_bps: 0,
            purchase_editable_in_pending_approval: false,
        };
        assert!(orders.validate().is_err());
    }
}
