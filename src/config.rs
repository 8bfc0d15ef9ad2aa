use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
}

impl Config {
    /// Read configuration from the environment, falling back to local-dev
    /// defaults. Unparseable ports fall back rather than abort.
    pub fn from_env() -> anyhow::Result<Config> {
        let host =
            std::env::var("GRADEBOOKD_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("GRADEBOOKD_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let data_dir = std::env::var("GRADEBOOKD_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let bind_addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        Ok(Config {
            bind_addr,
            data_dir,
        })
    }
}
