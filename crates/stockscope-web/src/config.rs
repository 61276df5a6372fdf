use std::{net::SocketAddr, time::Duration};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cache_capacity: usize,
    pub request_timeout: Duration,
    pub cors_allow: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let listen_addr: SocketAddr = std::env::var("SS_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid SS_LISTEN_ADDR");
        let cache_capacity: usize = std::env::var("SS_CACHE_CAPACITY")
            .unwrap_or_else(|_| "128".into())
            .parse()
            .unwrap_or(128);
        let timeout_ms: u64 = std::env::var("SS_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let cors_allow = std::env::var("SS_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            listen_addr,
            cache_capacity,
            request_timeout: Duration::from_millis(timeout_ms),
            cors_allow,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".parse().expect("static addr is valid"),
            cache_capacity: 128,
            request_timeout: Duration::from_millis(30000),
            cors_allow: vec!["*".into()],
        }
    }
}
