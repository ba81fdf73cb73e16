//! Runtime configuration (environment variables with dev defaults).

use chrono::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SESSION_COOKIE: &str = "cart_session";
pub const DEFAULT_SUMMARY_PATH: &str = "/cart";
pub const DEFAULT_CART_TTL_SECONDS: i64 = 3 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub session_cookie: String,
    /// Where the cart summary lives; clear redirects here.
    pub summary_path: String,
    /// How long an untouched cart survives.
    pub cart_ttl: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            summary_path: DEFAULT_SUMMARY_PATH.to_string(),
            cart_ttl: Duration::seconds(DEFAULT_CART_TTL_SECONDS),
        }
    }
}

impl ApiConfig {
    /// Read `BIND_ADDR`, `CART_SESSION_COOKIE`, `CART_SUMMARY_PATH`, `CART_TTL_SECONDS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let summary_path = lookup("CART_SUMMARY_PATH")
            .map(|p| normalize_path(&p))
            .unwrap_or(defaults.summary_path);

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            session_cookie: lookup("CART_SESSION_COOKIE").unwrap_or(defaults.session_cookie),
            summary_path,
            cart_ttl: parse_ttl(lookup("CART_TTL_SECONDS").as_deref()).unwrap_or(defaults.cart_ttl),
        }
    }
}

fn parse_ttl(raw: Option<&str>) -> Option<Duration> {
    let raw = raw?;
    match raw.trim().parse::<i64>() {
        Ok(secs) if secs > 0 => Some(Duration::seconds(secs)),
        _ => {
            tracing::warn!("CART_TTL_SECONDS={raw:?} is not a positive integer; using default");
            None
        }
    }
}

fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_SUMMARY_PATH.to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(pairs: &[(&str, &str)]) -> ApiConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        assert_eq!(from_map(&[]), ApiConfig::default());
    }

    #[test]
    fn overrides_are_read() {
        let cfg = from_map(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("CART_SESSION_COOKIE", "sid"),
            ("CART_SUMMARY_PATH", "shop/cart/"),
            ("CART_TTL_SECONDS", "60"),
        ]);

        assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
        assert_eq!(cfg.session_cookie, "sid");
        assert_eq!(cfg.summary_path, "/shop/cart");
        assert_eq!(cfg.cart_ttl, Duration::seconds(60));
    }

    #[test]
    fn bad_ttl_falls_back_to_default() {
        assert_eq!(from_map(&[("CART_TTL_SECONDS", "soon")]).cart_ttl, ApiConfig::default().cart_ttl);
        assert_eq!(from_map(&[("CART_TTL_SECONDS", "-5")]).cart_ttl, ApiConfig::default().cart_ttl);
    }
}
