use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;
use tracing::info;

use crate::error::BalanceError;
use crate::scheduler::DailySchedule;

/// How the set of reported assets is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetDiscovery {
    /// Exactly the listed assets, plus the quote currency.
    Explicit { assets: Vec<String> },
    /// Base and quote assets of open orders whose client order id
    /// contains `order_id_pattern`.
    AutoFromOpenOrders { order_id_pattern: String },
}

/// Everything the balance computation needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    pub discovery: AssetDiscovery,
    pub quote_currency: String,
    pub include_savings: bool,
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), BalanceError> {
        if self.quote_currency.trim().is_empty() {
            return Err(BalanceError::configuration("quote_currency must not be empty"));
        }
        match &self.discovery {
            AssetDiscovery::Explicit { assets } => {
                if assets.is_empty() {
                    return Err(BalanceError::configuration(
                        "asset_symbols is required in explicit discovery mode",
                    ));
                }
                if assets.iter().any(|asset| asset.trim().is_empty()) {
                    return Err(BalanceError::configuration(
                        "asset_symbols must not contain empty symbols",
                    ));
                }
            }
            AssetDiscovery::AutoFromOpenOrders { order_id_pattern } => {
                if order_id_pattern.is_empty() {
                    return Err(BalanceError::configuration(
                        "order_id_pattern must not be empty",
                    ));
                }
            }
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssetDiscoveryMode {
    #[default]
    Explicit,
    AutoFromOpenOrders,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct BinanceConfig {
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    #[serde(default = "default_quote_currency")]
    pub quote_currency: String,
    #[serde(default)]
    pub asset_discovery_mode: AssetDiscoveryMode,
    pub asset_symbols: Option<Vec<String>>,
    #[serde(default = "default_order_id_pattern")]
    pub order_id_pattern: String,
    #[serde(default)]
    pub use_flexible_savings: bool,
}

fn default_quote_currency() -> String {
    "USDT".to_string()
}

fn default_order_id_pattern() -> String {
    "deal".to_string()
}

impl BinanceConfig {
    pub fn report_config(&self) -> Result<ReportConfig, BalanceError> {
        let discovery = match (self.asset_discovery_mode, &self.asset_symbols) {
            (AssetDiscoveryMode::Explicit, Some(assets)) => AssetDiscovery::Explicit {
                assets: assets.iter().map(|asset| asset.trim().to_uppercase()).collect(),
            },
            (AssetDiscoveryMode::Explicit, None) => {
                return Err(BalanceError::configuration(
                    "asset_symbols is required in explicit discovery mode",
                ))
            }
            (AssetDiscoveryMode::AutoFromOpenOrders, None) => AssetDiscovery::AutoFromOpenOrders {
                order_id_pattern: self.order_id_pattern.clone(),
            },
            (AssetDiscoveryMode::AutoFromOpenOrders, Some(_)) => {
                return Err(BalanceError::configuration(
                    "asset_symbols cannot be combined with auto_from_open_orders discovery",
                ))
            }
        };

        let config = ReportConfig {
            discovery,
            quote_currency: self.quote_currency.trim().to_uppercase(),
            include_savings: self.use_flexible_savings,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DailyJobConfig {
    pub hour: u32,
    pub minute: u32,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_days")]
    pub days: Vec<u8>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_days() -> Vec<u8> {
    (0..7).collect()
}

impl DailyJobConfig {
    pub fn schedule(&self) -> Result<DailySchedule, BalanceError> {
        if self.hour > 23 {
            return Err(BalanceError::configuration(format!(
                "daily_job.hour must be within 0..=23, got {}",
                self.hour
            )));
        }
        if self.minute > 59 {
            return Err(BalanceError::configuration(format!(
                "daily_job.minute must be within 0..=59, got {}",
                self.minute
            )));
        }
        if self.days.is_empty() {
            return Err(BalanceError::configuration("daily_job.days must not be empty"));
        }
        if let Some(day) = self.days.iter().find(|day| **day > 6) {
            return Err(BalanceError::configuration(format!(
                "daily_job.days must be within 0..=6 (0 = Monday), got {}",
                day
            )));
        }
        let timezone: Tz = self.timezone.parse().map_err(|err| {
            BalanceError::configuration(format!(
                "Invalid daily_job.timezone {} : {}",
                self.timezone, err
            ))
        })?;

        Ok(DailySchedule {
            hour: self.hour,
            minute: self.minute,
            timezone,
            days: self.days.clone(),
        })
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    pub api_key: Option<String>,
    pub chat_id: i64,
    pub daily_job: DailyJobConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub binance: BinanceConfig,
    pub telegram: TelegramConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, BalanceError> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            BalanceError::configuration(format!("Cannot read {} : {}", path.display(), err))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, BalanceError> {
        let config: Config = toml::from_str(content)
            .map_err(|err| BalanceError::configuration(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BalanceError> {
        self.binance.report_config()?;
        self.telegram.daily_job.schedule()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPLICIT: &str = r#"
        [binance]
        quote_currency = "usdt"
        asset_symbols = ["BTC", "eth"]

        [telegram]
        chat_id = 123456

        [telegram.daily_job]
        hour = 9
        minute = 30
        timezone = "Europe/London"
        days = [0, 2, 4]
    "#;

    #[test]
    fn test_explicit_config() {
        let config = Config::from_toml_str(EXPLICIT).unwrap();
        let report = config.binance.report_config().unwrap();
        assert_eq!(
            report,
            ReportConfig {
                discovery: AssetDiscovery::Explicit {
                    assets: vec!["BTC".to_string(), "ETH".to_string()]
                },
                quote_currency: "USDT".to_string(),
                include_savings: false,
            }
        );

        let schedule = config.telegram.daily_job.schedule().unwrap();
        assert_eq!(schedule.hour, 9);
        assert_eq!(schedule.minute, 30);
        assert_eq!(schedule.timezone, chrono_tz::Europe::London);
        assert_eq!(schedule.days, vec![0, 2, 4]);
        assert_eq!(config.telegram.chat_id, 123456);
    }

    #[test]
    fn test_auto_config_defaults() {
        let config = Config::from_toml_str(
            r#"
            [binance]
            asset_discovery_mode = "auto_from_open_orders"
            use_flexible_savings = true

            [telegram]
            chat_id = -1001
            daily_job = { hour = 0, minute = 0 }
            "#,
        )
        .unwrap();
        let report = config.binance.report_config().unwrap();
        assert_eq!(
            report.discovery,
            AssetDiscovery::AutoFromOpenOrders {
                order_id_pattern: "deal".to_string()
            }
        );
        assert_eq!(report.quote_currency, "USDT");
        assert!(report.include_savings);

        let schedule = config.telegram.daily_job.schedule().unwrap();
        assert_eq!(schedule.timezone, Tz::UTC);
        assert_eq!(schedule.days.len(), 7);
    }

    #[test]
    fn test_explicit_mode_requires_assets() {
        let res = Config::from_toml_str(
            r#"
            [binance]
            [telegram]
            chat_id = 1
            daily_job = { hour = 0, minute = 0 }
            "#,
        );
        assert!(matches!(res, Err(BalanceError::Configuration(_))));
    }

    #[test]
    fn test_modes_are_exclusive() {
        let res = Config::from_toml_str(
            r#"
            [binance]
            asset_discovery_mode = "auto_from_open_orders"
            asset_symbols = ["BTC"]
            [telegram]
            chat_id = 1
            daily_job = { hour = 0, minute = 0 }
            "#,
        );
        assert!(matches!(res, Err(BalanceError::Configuration(_))));
    }

    #[test]
    fn test_invalid_schedule() {
        for daily_job in [
            r#"{ hour = 24, minute = 0 }"#,
            r#"{ hour = 1, minute = 60 }"#,
            r#"{ hour = 1, minute = 0, days = [7] }"#,
            r#"{ hour = 1, minute = 0, days = [] }"#,
            r#"{ hour = 1, minute = 0, timezone = "Mars/Olympus" }"#,
        ] {
            let res = Config::from_toml_str(&format!(
                "[binance]\nasset_symbols = [\"BTC\"]\n[telegram]\nchat_id = 1\ndaily_job = {daily_job}\n"
            ));
            assert!(
                matches!(res, Err(BalanceError::Configuration(_))),
                "{daily_job} should be rejected"
            );
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        let res = Config::from_toml_str(
            r#"
            [binance]
            asset_symbols = ["BTC"]
            auto_detect = true
            [telegram]
            chat_id = 1
            daily_job = { hour = 0, minute = 0 }
            "#,
        );
        assert!(matches!(res, Err(BalanceError::Configuration(_))));
    }

    #[test]
    fn test_missing_file() {
        let res = Config::load(Path::new("/nonexistent/balance-bot.toml"));
        assert!(matches!(res, Err(BalanceError::Configuration(_))));
    }
}
