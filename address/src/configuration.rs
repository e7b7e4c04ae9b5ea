//! Network identity read from process configuration

use config::{Config, ConfigError};
use tracing::{debug, warn};

use crate::network::{AddressNetwork, NetworkId};

pub const CONFIG_KEY_NETWORK_ID: &str = "network.id";
pub const CONFIG_KEY_NETWORK_MAGIC: &str = "network.magic";

/// Network settings needed to build and check addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Configured network
    pub id: NetworkId,

    /// Protocol magic - defaults to the magic of `id`
    pub magic: u32,
}

impl NetworkConfig {
    pub fn from_config(config: &Config) -> Self {
        let id = NetworkId::from_config(config);
        let magic = config.get::<u32>(CONFIG_KEY_NETWORK_MAGIC).unwrap_or(id.magic());
        debug!("Using network {id} with magic {magic}");
        Self { id, magic }
    }

    pub fn address_network(&self) -> AddressNetwork {
        self.id.address_network()
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            id: NetworkId::Mainnet,
            magic: NetworkId::Mainnet.magic(),
        }
    }
}

impl NetworkId {
    pub fn from_config(config: &Config) -> Self {
        match config.get::<NetworkId>(CONFIG_KEY_NETWORK_ID) {
            Ok(id) => id,
            Err(ConfigError::NotFound(_)) => NetworkId::Mainnet,
            Err(e) => {
                warn!("Bad {CONFIG_KEY_NETWORK_ID} in config, using mainnet: {e}");
                NetworkId::Mainnet
            }
        }
    }
}
