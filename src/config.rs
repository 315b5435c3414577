use anyhow::Context;

const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment group this instance belongs to (`blue`, `green`, ...).
    pub pool: String,
    pub release_id: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Ok(Self {
            pool: get("APP_POOL").unwrap_or_else(|| UNKNOWN.to_string()),
            release_id: get("RELEASE_ID").unwrap_or_else(|| UNKNOWN.to_string()),
            host: "0.0.0.0".to_string(),
            port: get("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.pool, "unknown");
        assert_eq!(cfg.release_id, "unknown");
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 3000);
    }

    #[test]
    fn reads_identity_and_port() {
        let cfg = Config::from_lookup(lookup(&[
            ("APP_POOL", "blue"),
            ("RELEASE_ID", "blue-v1.2.0"),
            ("PORT", "8081"),
        ]))
        .unwrap();
        assert_eq!(cfg.pool, "blue");
        assert_eq!(cfg.release_id, "blue-v1.2.0");
        assert_eq!(cfg.port, 8081);
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let cfg = Config::from_lookup(lookup(&[("APP_POOL", ""), ("PORT", "")])).unwrap();
        assert_eq!(cfg.pool, "unknown");
        assert_eq!(cfg.port, 3000);
    }

    #[test]
    fn rejects_non_numeric_port() {
        let err = Config::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PORT must be a valid number"));
    }
}
