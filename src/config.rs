use crate::Chips;

/// Server configuration, read once from the environment at startup.
///
/// The database and cache URLs locate external collaborators (metadata store,
/// key-value cache); the core engine does not touch them itself.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub cache_url: String,
    pub cors_origins: String,
    pub buy_in: Chips,
    pub sb_size: Chips,
    pub bb_size: Chips,
    pub max_players: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:///./app.db".to_string(),
            cache_url: "redis://localhost:6379/0".to_string(),
            cors_origins: "*".to_string(),
            buy_in: crate::BUY_IN,
            sb_size: crate::S_BLIND,
            bb_size: crate::B_BLIND,
            max_players: crate::MAX_PLAYERS,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: var("BIND_ADDR", defaults.bind_addr),
            database_url: var("DATABASE_URL", defaults.database_url),
            cache_url: var("CACHE_URL", defaults.cache_url),
            cors_origins: var("CORS_ORIGINS", defaults.cors_origins),
            buy_in: parsed("BUY_IN", defaults.buy_in),
            sb_size: parsed("SB_SIZE", defaults.sb_size),
            bb_size: parsed("BB_SIZE", defaults.bb_size),
            max_players: parsed("MAX_PLAYERS", defaults.max_players),
        }
    }
}

fn var(name: &str, fallback: String) -> String {
    std::env::var(name).unwrap_or(fallback)
}

fn parsed<T: std::str::FromStr>(name: &str, fallback: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}
