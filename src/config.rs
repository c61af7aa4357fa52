use std::env;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("need to set {0}")]
    Missing(&'static str),
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote message API.
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Optional printer character device (e.g. `/dev/usb/lp0`). When unset
    /// the daemon opens the USB printer directly.
    pub device: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Config {
            base_url: require("TODO_URL")?,
            username: require("TODO_USERNAME")?,
            password: require("TODO_PASSWORD")?,
            device: env::var("TODO_DEVICE").ok(),
        })
    }
}

fn require(name: &'static str) -> Result<String, Error> {
    env::var(name).map_err(|_| Error::Missing(name))
}
