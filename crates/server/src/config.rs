use std::net::SocketAddr;

pub const DEV_JWT_SECRET: &[u8] = b"change-me-in-production";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub rest_addr: SocketAddr,
    pub jwt_secret: Vec<u8>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            rest_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: DEV_JWT_SECRET.to_vec(),
        }
    }
}

impl ServerConfig {
    /// Reads `REST_ADDR` and `JWT_SECRET`; absent or unparsable values keep
    /// their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let rest_addr = match lookup("REST_ADDR") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(value = %raw, error = %e, "invalid REST_ADDR, using default");
                defaults.rest_addr
            }),
            None => defaults.rest_addr,
        };

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .map(String::into_bytes)
            .unwrap_or(defaults.jwt_secret);

        Self {
            rest_addr,
            jwt_secret,
        }
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}
