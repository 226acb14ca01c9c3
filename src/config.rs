use std::{env, net::SocketAddr, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/users.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
}

impl Config {
    /// `PORT` and `APP_DATA_PATH`, falling back to defaults when unset or
    /// unparsable.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            data_path: resolve_data_path(),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

pub fn resolve_data_path() -> PathBuf {
    match env::var("APP_DATA_PATH") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_DATA_PATH),
    }
}
