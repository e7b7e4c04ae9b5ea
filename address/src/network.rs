//! Network identities and the address network discriminant

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Address network identifier, as carried in the low nibble of the header byte
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressNetwork {
    /// Mainnet
    #[default]
    Main,

    /// Any test network
    Test,
}

impl AddressNetwork {
    /// Header nibble for this network
    pub fn header_bits(self) -> u8 {
        match self {
            AddressNetwork::Main => 0b0001,
            AddressNetwork::Test => 0b0000,
        }
    }

    /// Network from a header nibble - other values are not valid addresses
    pub fn from_header_bits(bits: u8) -> Option<Self> {
        match bits {
            0b0001 => Some(AddressNetwork::Main),
            0b0000 => Some(AddressNetwork::Test),
            _ => None,
        }
    }
}

/// A configured network
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    #[default]
    Mainnet,
    Preprod,
    Preview,
    Sanchonet,
}

impl NetworkId {
    /// Protocol magic, used in Byron address attributes
    pub fn magic(self) -> u32 {
        match self {
            NetworkId::Mainnet => 764824073,
            NetworkId::Preprod => 1,
            NetworkId::Preview => 2,
            NetworkId::Sanchonet => 4,
        }
    }

    /// The discriminant Shelley and stake addresses carry for this network
    pub fn address_network(self) -> AddressNetwork {
        match self {
            NetworkId::Mainnet => AddressNetwork::Main,
            _ => AddressNetwork::Test,
        }
    }
}

impl From<NetworkId> for AddressNetwork {
    fn from(network: NetworkId) -> Self {
        network.address_network()
    }
}

impl Display for NetworkId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkId::Mainnet => write!(f, "mainnet"),
            NetworkId::Preprod => write!(f, "preprod"),
            NetworkId::Preview => write!(f, "preview"),
            NetworkId::Sanchonet => write!(f, "sanchonet"),
        }
    }
}
