//! Text forms of addresses: bech32 (CIP-5 prefixes) for Shelley and stake
//! addresses, base58 for Byron, and a lexer to pick an address out of free text

use bech32::primitives::decode::{CheckedHrpstring, CheckedHrpstringError};
use bech32::{Bech32, Hrp};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::address::{AnyAddress, ByronAddress, ShelleyAddress, StakeAddress};
use crate::error::AddressError;
use crate::network::AddressNetwork;

/// Human-readable prefixes for payment addresses
pub const PAYMENT_PREFIXES: [(AddressNetwork, &str); 2] =
    [(AddressNetwork::Main, "addr"), (AddressNetwork::Test, "addr_test")];

/// Human-readable prefixes for stake addresses
pub const STAKE_PREFIXES: [(AddressNetwork, &str); 2] =
    [(AddressNetwork::Main, "stake"), (AddressNetwork::Test, "stake_test")];

type PrefixTable = [(AddressNetwork, &'static str); 2];

fn prefix_for(table: &PrefixTable, network: AddressNetwork) -> &'static str {
    table.iter().find(|(n, _)| *n == network).map(|(_, prefix)| *prefix).unwrap_or(table[0].1)
}

pub(crate) fn encode_bech32(hrp: &str, data: &[u8]) -> Result<String, AddressError> {
    let hrp = Hrp::parse(hrp).map_err(|e| AddressError::Encode(e.to_string()))?;
    bech32::encode::<Bech32>(hrp, data).map_err(|e| AddressError::Encode(e.to_string()))
}

/// Decode bech32 whose prefix must be in `table` - the prefix is checked before
/// the checksum, so a foreign prefix is always reported as such. Only the
/// original Bech32 checksum is valid, never Bech32m.
fn decode_bech32(
    text: &str,
    table: &PrefixTable,
) -> Result<(AddressNetwork, Vec<u8>), AddressError> {
    let separator = text
        .rfind('1')
        .ok_or_else(|| AddressError::decode(format!("No bech32 separator in '{text}'")))?;
    let hrp = text[..separator].to_ascii_lowercase();

    let network = table
        .iter()
        .find(|(_, prefix)| *prefix == hrp)
        .map(|(network, _)| *network)
        .ok_or_else(|| AddressError::PrefixMismatch {
            found: hrp.clone(),
            expected: table.iter().map(|(_, prefix)| *prefix).collect(),
        })?;

    let checked = CheckedHrpstring::new::<Bech32>(text).map_err(|e| match e {
        CheckedHrpstringError::Checksum(e) => AddressError::Checksum(e.to_string()),
        e => AddressError::decode(e.to_string()),
    })?;
    Ok((network, checked.byte_iter().collect()))
}

impl ShelleyAddress {
    /// Convert to addr1xxx / addr_test1xxx form
    pub fn to_bech32(&self) -> Result<String, AddressError> {
        encode_bech32(prefix_for(&PAYMENT_PREFIXES, self.network), &self.to_binary())
    }

    /// Read from addr1xxx / addr_test1xxx form - the prefix must agree with the header network
    pub fn from_bech32(text: &str) -> Result<Self, AddressError> {
        let (network, data) = decode_bech32(text, &PAYMENT_PREFIXES)?;
        let address = Self::from_binary(&data)?;
        if address.network != network {
            return Err(AddressError::NetworkMismatch {
                found: address.network,
                expected: network,
            });
        }
        Ok(address)
    }
}

impl StakeAddress {
    /// Convert to string stake1xxx format
    pub fn to_bech32(&self) -> Result<String, AddressError> {
        encode_bech32(prefix_for(&STAKE_PREFIXES, self.network), &self.to_binary())
    }

    /// Read from a string format ("stake1xxx...")
    pub fn from_bech32(text: &str) -> Result<Self, AddressError> {
        let (network, data) = decode_bech32(text, &STAKE_PREFIXES)?;
        let address = Self::from_binary(&data)?;
        if address.network != network {
            return Err(AddressError::NetworkMismatch {
                found: address.network,
                expected: network,
            });
        }
        Ok(address)
    }
}

impl ByronAddress {
    pub fn to_base58(&self) -> String {
        bs58::encode(self.as_bytes()).into_string()
    }

    /// Read base58 text - the payload must be a valid Byron address
    pub fn from_base58(text: &str) -> Result<Self, AddressError> {
        let bytes = bs58::decode(text)
            .into_vec()
            .map_err(|e| AddressError::decode(format!("Invalid base58: {e}")))?;
        Self::from_binary(&bytes)
    }
}

impl AnyAddress {
    /// Standard string representation - bech32 or base58 by kind
    pub fn to_text(&self) -> Result<String, AddressError> {
        match self {
            AnyAddress::Byron(byron) => Ok(byron.to_base58()),
            AnyAddress::Shelley(shelley) => shelley.to_bech32(),
        }
    }

    /// Read from string format - anything with a bech32-style prefix is read as a
    /// Shelley address, the rest as base58
    pub fn from_text(text: &str) -> Result<Self, AddressError> {
        if has_bech32_prefix(text) {
            Ok(AnyAddress::Shelley(ShelleyAddress::from_bech32(text)?))
        } else {
            Ok(AnyAddress::Byron(ByronAddress::from_base58(text)?))
        }
    }

    /// Find an address token in free text and read it
    pub fn from_free_text(text: &str) -> Result<Self, AddressError> {
        Self::from_text(lex_address_token(text)?)
    }
}

/// Does `text` start with a lowercase bech32 prefix and separator, or with
/// `addr` in any case? Byron base58 text starts with an upper case letter.
fn has_bech32_prefix(text: &str) -> bool {
    if text.get(..4).is_some_and(|start| start.eq_ignore_ascii_case("addr")) {
        return true;
    }
    match text.rfind('1') {
        Some(separator) if separator > 0 => text[..separator]
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '_'),
        _ => false,
    }
}

/// Longest run of `[A-Za-z0-9_]` in `text` (the first, if several tie)
pub fn lex_address_token(text: &str) -> Result<&str, AddressError> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .reduce(|best, token| if token.len() > best.len() { token } else { best })
        .ok_or_else(|| AddressError::Lex(text.to_string()))
}

impl Display for ShelleyAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_bech32().map_err(|_| std::fmt::Error)?)
    }
}

impl FromStr for ShelleyAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl Display for StakeAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_bech32().map_err(|_| std::fmt::Error)?)
    }
}

impl FromStr for StakeAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl Display for ByronAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for ByronAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl Display for AnyAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text().map_err(|_| std::fmt::Error)?)
    }
}

impl FromStr for AnyAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}
