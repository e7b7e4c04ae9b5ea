//! Address codec errors

use thiserror::Error;

use crate::era::{AddressKind, Era, ShelleyBasedEra};
use crate::network::AddressNetwork;

/// A Shelley address was cast into an era that predates Shelley addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Shelley address in era {current} cannot be used in era {target}")]
pub struct EraMismatch {
    /// Era evidence the address carried before the cast
    pub current: ShelleyBasedEra,

    /// The rejected era
    pub target: Era,
}

/// Address codec error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Raw bytes don't match any recognised header and length combination
    #[error("Invalid address bytes: {0}")]
    Decode(String),

    /// Address could not be produced
    #[error("Cannot encode address: {0}")]
    Encode(String),

    /// Human-readable part is not one permitted for the target type
    #[error("Unexpected address prefix '{found}', expected one of {expected:?}")]
    PrefixMismatch {
        found: String,
        expected: Vec<&'static str>,
    },

    /// Text payload checksum does not validate
    #[error("Bad address checksum: {0}")]
    Checksum(String),

    /// Encoded network differs from the one required
    #[error("Address is for {found:?} network, expected {expected:?}")]
    NetworkMismatch {
        found: AddressNetwork,
        expected: AddressNetwork,
    },

    #[error(transparent)]
    EraMismatch(#[from] EraMismatch),

    /// Address kind is not accepted in the requested era
    #[error("{kind} address is not accepted in era {era}")]
    NotInEra { kind: AddressKind, era: Era },

    /// No plausible address token in the input text
    #[error("No address found in '{0}'")]
    Lex(String),
}

impl AddressError {
    pub(crate) fn decode(message: impl Into<String>) -> Self {
        AddressError::Decode(message.into())
    }
}
