use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_BCRYPT_COST: u32 = 10;
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub password: PasswordConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set")?;
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {v}"))?,
            None => 10,
        };
        let cost = match lookup("BCRYPT_COST") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("BCRYPT_COST is not a number: {v}"))?,
            None => DEFAULT_BCRYPT_COST,
        };
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            anyhow::bail!(
                "BCRYPT_COST must be between {} and {}, got {}",
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST,
                cost
            );
        }

        Ok(Self {
            database_url,
            max_connections,
            password: PasswordConfig { cost },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/accounts",
        )]))
        .expect("config should load");
        assert_eq!(cfg.database_url, "postgres://localhost/accounts");
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.password.cost, DEFAULT_BCRYPT_COST);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn bcrypt_cost_out_of_range_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/accounts"),
            ("BCRYPT_COST", "3"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("BCRYPT_COST"));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/accounts"),
            ("DATABASE_MAX_CONNECTIONS", "3"),
            ("BCRYPT_COST", "12"),
        ]))
        .expect("config should load");
        assert_eq!(cfg.max_connections, 3);
        assert_eq!(cfg.password.cost, 12);
    }
}
