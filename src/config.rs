use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_OUTBOX_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory the board assets are served from
    pub asset_dir: PathBuf,
    /// Per-connection outbound queue depth; a full queue drops events for that client
    pub outbox_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            asset_dir: PathBuf::from("."),
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            asset_dir: env::var("ASSET_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.asset_dir),
            outbox_capacity: env::var("OUTBOX_CAPACITY")
                .ok()
                .and_then(|c| c.parse().ok())
                .filter(|c: &usize| *c > 0)
                .unwrap_or(defaults.outbox_capacity),
        }
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
