//! Environment configuration.
//!
//! | variable                        | default        |
//! |---------------------------------|----------------|
//! | `DATABASE_URL`                  | unset: demo in-memory source |
//! | `POSDASH_BIND`                  | `0.0.0.0:8080` |
//! | `POSDASH_REFRESH_SECS`          | `180`          |
//! | `POSDASH_DAILY_TARGET`          | `5000`         |
//! | `POSDASH_UTC_OFFSET_MINUTES`    | `0`            |
//! | `POSDASH_API_KEY`               | unset: no auth |
//! | `POSDASH_ALERT_THRESHOLDS`      | JSON object, partial allowed |
//! | `POSDASH_REFUND_RATE_LIMIT`     | `10`           |
//! | `POSDASH_EXPENSE_RATIO_LIMIT`   | `80`           |
//! | `POSDASH_MAX_LOW_STOCK_ALERTS`  | `5`            |
//!
//! The three single-threshold variables override the JSON table.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use chrono::FixedOffset;
use thiserror::Error;
use tracing::warn;

use posdash_alerts::AlertThresholds;
use posdash_core::DomainError;

use crate::refresh::RefreshSettings;

const RECOMMENDED_REFRESH_SECS: std::ops::RangeInclusive<u64> = 120..=300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("invalid alert thresholds: {0}")]
    Thresholds(#[from] DomainError),
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// `None` runs against the seeded in-memory source.
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub refresh_interval: Duration,
    pub settings: RefreshSettings,
    /// When set, every route except `/health` requires `Authorization: Bearer <key>`.
    pub api_key: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            refresh_interval: Duration::from_secs(180),
            settings: RefreshSettings::default(),
            api_key: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.database_url = get("DATABASE_URL");
        config.api_key = get("POSDASH_API_KEY");

        if let Some(bind) = parse::<SocketAddr>(&get, "POSDASH_BIND")? {
            config.bind_addr = bind;
        }

        if let Some(secs) = parse::<u64>(&get, "POSDASH_REFRESH_SECS")? {
            if secs == 0 {
                return Err(ConfigError::invalid("POSDASH_REFRESH_SECS", "must be positive"));
            }
            if !RECOMMENDED_REFRESH_SECS.contains(&secs) {
                warn!(secs, "refresh interval outside the recommended 120-300s range");
            }
            config.refresh_interval = Duration::from_secs(secs);
        }

        if let Some(target) = parse::<f64>(&get, "POSDASH_DAILY_TARGET")? {
            if !target.is_finite() || target < 0.0 {
                return Err(ConfigError::invalid(
                    "POSDASH_DAILY_TARGET",
                    "must be a non-negative amount",
                ));
            }
            config.settings.daily_target = target;
        }

        if let Some(minutes) = parse::<i32>(&get, "POSDASH_UTC_OFFSET_MINUTES")? {
            config.settings.utc_offset = minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| {
                    ConfigError::invalid("POSDASH_UTC_OFFSET_MINUTES", "must be within +/-1439")
                })?;
        }

        let mut thresholds = match get("POSDASH_ALERT_THRESHOLDS") {
            Some(json) => serde_json::from_str::<AlertThresholds>(&json)
                .map_err(|e| ConfigError::invalid("POSDASH_ALERT_THRESHOLDS", e.to_string()))?,
            None => AlertThresholds::default(),
        };
        if let Some(v) = parse::<f64>(&get, "POSDASH_REFUND_RATE_LIMIT")? {
            thresholds.refund_rate_limit = v;
        }
        if let Some(v) = parse::<f64>(&get, "POSDASH_EXPENSE_RATIO_LIMIT")? {
            thresholds.expense_ratio_limit = v;
        }
        if let Some(v) = parse::<usize>(&get, "POSDASH_MAX_LOW_STOCK_ALERTS")? {
            thresholds.max_low_stock_alerts = v;
        }
        thresholds.validate()?;
        config.settings.thresholds = thresholds;

        Ok(config)
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::invalid(key, format!("{raw:?}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<DashboardConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let c = config(&[]).unwrap();
        assert!(c.database_url.is_none());
        assert!(c.api_key.is_none());
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(c.refresh_interval, Duration::from_secs(180));
        assert_eq!(c.settings.daily_target, 5_000.0);
        assert_eq!(c.settings.utc_offset.local_minus_utc(), 0);
        assert_eq!(c.settings.thresholds, AlertThresholds::default());
    }

    #[test]
    fn reads_every_variable() {
        let c = config(&[
            ("DATABASE_URL", "postgres://localhost/pos"),
            ("POSDASH_BIND", "127.0.0.1:9000"),
            ("POSDASH_REFRESH_SECS", "240"),
            ("POSDASH_DAILY_TARGET", "1200.5"),
            ("POSDASH_UTC_OFFSET_MINUTES", "-300"),
            ("POSDASH_API_KEY", "k"),
            ("POSDASH_REFUND_RATE_LIMIT", "7.5"),
            ("POSDASH_EXPENSE_RATIO_LIMIT", "65"),
            ("POSDASH_MAX_LOW_STOCK_ALERTS", "3"),
        ])
        .unwrap();
        assert_eq!(c.database_url.as_deref(), Some("postgres://localhost/pos"));
        assert_eq!(c.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(c.refresh_interval, Duration::from_secs(240));
        assert_eq!(c.settings.daily_target, 1200.5);
        assert_eq!(c.settings.utc_offset.local_minus_utc(), -300 * 60);
        assert_eq!(c.api_key.as_deref(), Some("k"));
        assert_eq!(c.settings.thresholds.refund_rate_limit, 7.5);
        assert_eq!(c.settings.thresholds.expense_ratio_limit, 65.0);
        assert_eq!(c.settings.thresholds.max_low_stock_alerts, 3);
    }

    #[test]
    fn single_overrides_win_over_json_table() {
        let c = config(&[
            ("POSDASH_ALERT_THRESHOLDS", r#"{"refund_rate_limit": 4, "low_margin": 25}"#),
            ("POSDASH_REFUND_RATE_LIMIT", "6"),
        ])
        .unwrap();
        assert_eq!(c.settings.thresholds.refund_rate_limit, 6.0);
        assert_eq!(c.settings.thresholds.low_margin, 25.0);
        assert_eq!(c.settings.thresholds.pending_sales_limit, 10);
    }

    #[test]
    fn invalid_values_are_errors() {
        for (key, value) in [
            ("POSDASH_REFRESH_SECS", "0"),
            ("POSDASH_REFRESH_SECS", "soon"),
            ("POSDASH_BIND", "nowhere"),
            ("POSDASH_DAILY_TARGET", "-1"),
            ("POSDASH_UTC_OFFSET_MINUTES", "1440"),
            ("POSDASH_MAX_LOW_STOCK_ALERTS", "-2"),
            ("POSDASH_ALERT_THRESHOLDS", "{not json"),
        ] {
            let err = config(&[(key, value)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { key: k, .. } if k == key),
                "{key}={value} gave {err}"
            );
        }
    }

    #[test]
    fn out_of_range_thresholds_fail_validation() {
        let err = config(&[("POSDASH_ALERT_THRESHOLDS", r#"{"no_sales_from_hour": 30}"#)]).unwrap_err();
        assert!(matches!(err, ConfigError::Thresholds(_)));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let c = config(&[("DATABASE_URL", "  "), ("POSDASH_REFRESH_SECS", "")]).unwrap();
        assert!(c.database_url.is_none());
        assert_eq!(c.refresh_interval, Duration::from_secs(180));
    }

    #[test]
    fn short_interval_is_allowed() {
        let c = config(&[("POSDASH_REFRESH_SECS", "30")]).unwrap();
        assert_eq!(c.refresh_interval, Duration::from_secs(30));
    }
}
