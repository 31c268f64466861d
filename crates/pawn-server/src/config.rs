//! Server Configuration

use assistant_core::ModelId;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// Model used when a chat request names none or an unknown one
    pub default_model: ModelId,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            default_model: ModelId::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
        let default_model = std::env::var("DEFAULT_MODEL")
            .ok()
            .and_then(|raw| ModelId::parse(&raw))
            .unwrap_or_default();

        Self {
            bind_addr,
            default_model,
        }
    }
}
