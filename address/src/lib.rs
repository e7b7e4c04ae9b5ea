// Acropolis address library - main library exports

pub mod address;
pub mod cip19;
pub mod configuration;
pub mod credential;
pub mod crypto;
pub mod era;
pub mod error;
pub mod hash;
pub mod in_era;
pub mod legacy;
pub mod network;
pub mod text;

// Flattened re-exports
pub use self::address::*;
pub use self::configuration::NetworkConfig;
pub use self::credential::*;
pub use self::era::*;
pub use self::error::*;
pub use self::hash::*;
pub use self::in_era::*;
pub use self::legacy::{ByronCodec, LegacyAddressCodec};
pub use self::network::*;
pub use self::text::lex_address_token;
