//! Store configuration

use std::time::Duration;

use crate::cache::MAX_LIFETIME;
use crate::error::{Error, Result};

/// Default time-to-live for tenant entries
pub const DEFAULT_TTL: Duration = Duration::from_secs(15);

/// Default ratio between the sweep interval and the TTL
pub const DEFAULT_SWEEP_FACTOR: u32 = 10;

/// Default per-tenant notification buffer
pub const DEFAULT_CHANNEL_CAPACITY: usize = 10;

/// Environment variable holding the TTL in whole seconds
pub const ENV_TTL: &str = "GSI_TTL";

/// Environment variable holding the sweep factor
pub const ENV_SWEEP_FACTOR: &str = "GSI_SWEEP_FACTOR";

/// Environment variable holding the channel capacity
pub const ENV_CHANNEL_CAPACITY: &str = "GSI_CHANNEL_CAPACITY";

/// Tenant store configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Time after the last put before an entry is stale
    pub ttl: Duration,

    /// Housekeeping runs every `ttl * sweep_factor`
    pub sweep_factor: u32,

    /// Buffered events per tenant before slow subscribers start lagging
    ///
    /// The channel rounds this up to the next power of two, so the default
    /// of 10 buffers 16 events.
    pub channel_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            sweep_factor: DEFAULT_SWEEP_FACTOR,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl StoreConfig {
    /// Create a new config with a custom TTL (capped at [`MAX_LIFETIME`])
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::default().ttl(ttl)
    }

    /// Read the configuration from `GSI_*` environment variables
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    ///
    /// Fails if a value does not parse, is zero, or makes the sweep interval
    /// exceed [`MAX_LIFETIME`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let ttl_secs = parse_positive::<u64>(&lookup, ENV_TTL)?;
        if let Some(secs) = ttl_secs {
            config.ttl = Duration::from_secs(secs);
        }
        if let Some(factor) = parse_positive::<u32>(&lookup, ENV_SWEEP_FACTOR)? {
            config.sweep_factor = factor;
        }
        if config.checked_sweep_interval().is_none() {
            let (key, value) = match ttl_secs {
                Some(secs) => (ENV_TTL, secs.to_string()),
                None => (ENV_SWEEP_FACTOR, config.sweep_factor.to_string()),
            };
            return Err(Error::InvalidConfig {
                key: key.to_string(),
                value,
            });
        }
        if let Some(capacity) = parse_positive::<usize>(&lookup, ENV_CHANNEL_CAPACITY)? {
            config.channel_capacity = capacity;
        }

        Ok(config)
    }

    /// Set the TTL (capped at [`MAX_LIFETIME`])
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl.min(MAX_LIFETIME);
        self
    }

    /// Set the sweep factor (minimum 1)
    pub fn sweep_factor(mut self, factor: u32) -> Self {
        self.sweep_factor = factor.max(1);
        self
    }

    /// Set the channel capacity (minimum 1, rounded up to a power of two by
    /// the channel)
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Interval between housekeeping sweeps
    ///
    /// Saturates at [`MAX_LIFETIME`].
    pub fn sweep_interval(&self) -> Duration {
        self.checked_sweep_interval().unwrap_or(MAX_LIFETIME)
    }

    fn checked_sweep_interval(&self) -> Option<Duration> {
        self.ttl
            .checked_mul(self.sweep_factor.max(1))
            .filter(|interval| *interval <= MAX_LIFETIME)
    }
}

fn parse_positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr + PartialEq + Default,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => Ok(Some(value)),
        _ => Err(Error::InvalidConfig {
            key: key.to_string(),
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();

        assert_eq!(config.ttl, Duration::from_secs(15));
        assert_eq!(config.sweep_factor, 10);
        assert_eq!(config.channel_capacity, 10);
        assert_eq!(config.sweep_interval(), Duration::from_secs(150));
    }

    #[test]
    fn test_with_ttl() {
        let config = StoreConfig::with_ttl(Duration::from_millis(15));

        assert_eq!(config.ttl, Duration::from_millis(15));
        assert_eq!(config.sweep_interval(), Duration::from_millis(150));
    }

    #[test]
    fn test_builder_clamps_to_one() {
        let config = StoreConfig::default().sweep_factor(0).channel_capacity(0);

        assert_eq!(config.sweep_factor, 1);
        assert_eq!(config.channel_capacity, 1);
        assert_eq!(config.sweep_interval(), config.ttl);
    }

    #[test]
    fn test_builder_chaining() {
        let config = StoreConfig::default()
            .ttl(Duration::from_secs(30))
            .sweep_factor(4)
            .channel_capacity(32);

        assert_eq!(config.ttl, Duration::from_secs(30));
        assert_eq!(config.sweep_interval(), Duration::from_secs(120));
        assert_eq!(config.channel_capacity, 32);
    }

    #[test]
    fn test_builder_caps_lifetime() {
        let config = StoreConfig::default()
            .ttl(Duration::MAX)
            .sweep_factor(u32::MAX);

        assert_eq!(config.ttl, MAX_LIFETIME);
        assert_eq!(config.sweep_interval(), MAX_LIFETIME);

        // Fields are public, so the product must saturate on its own
        let config = StoreConfig {
            ttl: Duration::MAX,
            ..Default::default()
        };
        assert_eq!(config.sweep_interval(), MAX_LIFETIME);
    }

    #[test]
    fn test_from_lookup_empty_keeps_defaults() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = StoreConfig::from_lookup(lookup(&[
            (ENV_TTL, "30"),
            (ENV_SWEEP_FACTOR, " 5 "),
            (ENV_CHANNEL_CAPACITY, "64"),
        ]))
        .unwrap();

        assert_eq!(config.ttl, Duration::from_secs(30));
        assert_eq!(config.sweep_factor, 5);
        assert_eq!(config.channel_capacity, 64);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = StoreConfig::from_lookup(lookup(&[(ENV_TTL, "fifteen")])).unwrap_err();

        assert_eq!(
            err,
            Error::InvalidConfig {
                key: ENV_TTL.to_string(),
                value: "fifteen".to_string(),
            }
        );
    }

    #[test]
    fn test_from_lookup_rejects_overflowing_ttl() {
        let err = StoreConfig::from_lookup(lookup(&[(ENV_TTL, "18446744073709551615")]))
            .unwrap_err();

        assert_eq!(
            err,
            Error::InvalidConfig {
                key: ENV_TTL.to_string(),
                value: "18446744073709551615".to_string(),
            }
        );
    }

    #[test]
    fn test_from_lookup_rejects_overflowing_factor() {
        let result = StoreConfig::from_lookup(lookup(&[(ENV_SWEEP_FACTOR, "4294967295")]));

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidConfig {
                key: ENV_SWEEP_FACTOR.to_string(),
                value: "4294967295".to_string(),
            }
        );
    }

    #[test]
    fn test_from_lookup_accepts_long_interval() {
        let config = StoreConfig::from_lookup(lookup(&[
            (ENV_TTL, "3600"),
            (ENV_SWEEP_FACTOR, "24"),
        ]))
        .unwrap();

        assert_eq!(config.sweep_interval(), Duration::from_secs(24 * 3600));
    }

    #[test]
    fn test_from_lookup_rejects_zero() {
        let result = StoreConfig::from_lookup(lookup(&[(ENV_CHANNEL_CAPACITY, "0")]));

        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }
}
