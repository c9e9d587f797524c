//! AppConfig - 環境変数からの設定読み込み
//!
//! | 変数 | 既定値 |
//! |------|--------|
//! | `CROWDFUND_EXCHANGE` | `campaign-events` |
//! | `CROWDFUND_COMPLETION_AT` | `00:00`（UTC, `HH:MM`） |
//! | `CROWDFUND_COMPLETION_INTERVAL_SECS` | なし（指定時は DailyAt より優先） |
//! | `CROWDFUND_LOG_FORMAT` | `text`（`json` も可） |
//!
//! `from_env()` はカレントディレクトリの `.env` を先に読み込みます（既存の環境変数が優先）。
//! 読み込みは lookup 関数経由なので、テストでプロセス環境を書き換える必要はありません。

use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveTime;

use crate::app::completion_loop::Schedule;
use crate::impls::BrokerConfig;

pub const ENV_EXCHANGE: &str = "CROWDFUND_EXCHANGE";
pub const ENV_COMPLETION_AT: &str = "CROWDFUND_COMPLETION_AT";
pub const ENV_COMPLETION_INTERVAL_SECS: &str = "CROWDFUND_COMPLETION_INTERVAL_SECS";
pub const ENV_LOG_FORMAT: &str = "CROWDFUND_LOG_FORMAT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::Invalid {
                var: ENV_LOG_FORMAT,
                value: s.to_string(),
                reason: "expected `text` or `json`",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub broker: BrokerConfig,
    pub schedule: Schedule,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(exchange) = lookup(ENV_EXCHANGE)
            && !exchange.trim().is_empty()
        {
            config.broker.exchange = exchange.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_COMPLETION_AT) {
            let at = NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| {
                ConfigError::Invalid {
                    var: ENV_COMPLETION_AT,
                    value: raw.clone(),
                    reason: "expected HH:MM",
                }
            })?;
            config.schedule = Schedule::DailyAt(at);
        }

        // interval wins over time of day
        if let Some(raw) = lookup(ENV_COMPLETION_INTERVAL_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    var: ENV_COMPLETION_INTERVAL_SECS,
                    value: raw.clone(),
                    reason: "expected a positive number of seconds",
                })?;
            config.schedule = Schedule::Every(Duration::from_secs(secs));
        }

        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            config.log_format = raw.parse()?;
        }

        Ok(config)
    }
}
