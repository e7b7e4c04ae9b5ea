//! Credentials and stake references - the parts a Shelley address is built from

use serde::{Deserialize, Serialize};

use crate::cip19::{read_varint, write_varint};
use crate::crypto::keyhash_224;
use crate::error::AddressError;
use crate::hash::{Hash, KeyHash, ScriptHash};
use crate::text;

/// Right to spend or to stake: either a key or a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Credential {
    /// Key hash - requires a key witness
    AddrKeyHash(KeyHash),

    /// Script hash - requires the script to validate
    ScriptHash(ScriptHash),
}

/// A credential used for staking rights
pub type StakeCredential = Credential;

/// What a bare credential is used for, which selects its bech32 prefix (CIP-5)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialPurpose {
    Payment,
    Stake,
}

impl Credential {
    /// Key credential for a verification key
    pub fn from_verification_key(key: &[u8]) -> Self {
        Credential::AddrKeyHash(keyhash_224(key))
    }

    pub fn hash(&self) -> &Hash<28> {
        match self {
            Credential::AddrKeyHash(hash) => hash,
            Credential::ScriptHash(hash) => hash,
        }
    }

    pub fn is_key(&self) -> bool {
        matches!(self, Credential::AddrKeyHash(_))
    }

    pub fn is_script(&self) -> bool {
        matches!(self, Credential::ScriptHash(_))
    }

    /// Header bit: 0 for key, 1 for script
    pub(crate) fn header_bit(&self) -> u8 {
        match self {
            Credential::AddrKeyHash(_) => 0,
            Credential::ScriptHash(_) => 1,
        }
    }

    pub(crate) fn from_header_bit(bit: u8, hash: &[u8]) -> Result<Self, AddressError> {
        let hash = Hash::try_from(hash)
            .map_err(|_| AddressError::decode(format!("Bad credential length {}", hash.len())))?;
        Ok(match bit {
            0 => Credential::AddrKeyHash(hash),
            _ => Credential::ScriptHash(hash),
        })
    }

    /// Bech32 form of the bare credential - addr_vkh / stake_vkh / script
    pub fn to_bech32(&self, purpose: CredentialPurpose) -> Result<String, AddressError> {
        let hrp = match (self, purpose) {
            (Credential::AddrKeyHash(_), CredentialPurpose::Payment) => "addr_vkh",
            (Credential::AddrKeyHash(_), CredentialPurpose::Stake) => "stake_vkh",
            (Credential::ScriptHash(_), _) => "script",
        };
        text::encode_bech32(hrp, self.hash().as_ref())
    }
}

/// Delegation pointer - ledger position of a stake registration certificate
#[derive(
    Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ShelleyAddressPointer {
    /// Slot number
    pub slot: u64,

    /// Transaction index within the slot
    pub tx_index: u64,

    /// Certificate index within the transaction
    pub cert_index: u64,
}

impl ShelleyAddressPointer {
    pub fn new(slot: u64, tx_index: u64, cert_index: u64) -> Self {
        Self {
            slot,
            tx_index,
            cert_index,
        }
    }

    /// Three CIP-19 varints
    pub fn to_binary(&self) -> Vec<u8> {
        let mut data = Vec::new();
        write_varint(&mut data, self.slot);
        write_varint(&mut data, self.tx_index);
        write_varint(&mut data, self.cert_index);
        data
    }

    /// Read a pointer which must use up all of `data`
    pub fn from_binary(data: &[u8]) -> Result<Self, AddressError> {
        let (slot, rest) = read_varint(data)?;
        let (tx_index, rest) = read_varint(rest)?;
        let (cert_index, rest) = read_varint(rest)?;

        if !rest.is_empty() {
            return Err(AddressError::decode(format!(
                "{} trailing bytes after pointer",
                rest.len()
            )));
        }

        Ok(Self {
            slot,
            tx_index,
            cert_index,
        })
    }
}

/// How a Shelley address names its staking right
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StakeReference {
    /// No staking right (enterprise addresses)
    #[default]
    None,

    /// Inline stake credential (base addresses)
    ByValue(StakeCredential),

    /// Pointer to a stake registration
    ByPointer(ShelleyAddressPointer),
}

impl StakeReference {
    /// Header bits 6-5: 0/1 value key/script, 2 pointer, 3 none
    pub(crate) fn header_bits(&self) -> u8 {
        match self {
            StakeReference::ByValue(credential) => credential.header_bit(),
            StakeReference::ByPointer(_) => 0b10,
            StakeReference::None => 0b11,
        }
    }

    pub fn credential(&self) -> Option<&StakeCredential> {
        match self {
            StakeReference::ByValue(credential) => Some(credential),
            _ => None,
        }
    }

    pub fn pointer(&self) -> Option<&ShelleyAddressPointer> {
        match self {
            StakeReference::ByPointer(pointer) => Some(pointer),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_binary_round_trip() {
        let pointer = ShelleyAddressPointer::new(1, 2, 3);
        assert_eq!(pointer.to_binary(), vec![1, 2, 3]);
        assert_eq!(ShelleyAddressPointer::from_binary(&[1, 2, 3]).unwrap(), pointer);
    }

    #[test]
    fn pointer_large_values() {
        let pointer = ShelleyAddressPointer::new(2498243, 27, 3);
        assert_eq!(pointer.to_binary(), vec![0x81, 0x98, 0xbd, 0x43, 0x1b, 0x03]);
        assert_eq!(ShelleyAddressPointer::from_binary(&pointer.to_binary()).unwrap(), pointer);
    }

    #[test]
    fn pointer_rejects_trailing_and_missing() {
        assert!(ShelleyAddressPointer::from_binary(&[1, 2, 3, 4]).is_err());
        assert!(ShelleyAddressPointer::from_binary(&[1, 2]).is_err());
        assert!(ShelleyAddressPointer::from_binary(&[1, 2, 0x83]).is_err());
    }

    #[test]
    fn pointer_rejects_padded_values() {
        assert!(matches!(
            ShelleyAddressPointer::from_binary(&[0x80, 0x80, 1, 2, 3]),
            Err(AddressError::Decode(_))
        ));
        assert!(ShelleyAddressPointer::from_binary(&[1, 0x80, 2, 3]).is_err());
    }

    #[test]
    fn credential_kinds() {
        let key = Credential::AddrKeyHash(KeyHash::new([1; 28]));
        let script = Credential::ScriptHash(ScriptHash::new([1; 28]));
        assert!(key.is_key() && !key.is_script());
        assert!(script.is_script() && !script.is_key());
        assert_eq!(key.hash(), script.hash());
        assert_ne!(key, script);
    }

    #[test]
    fn credential_bech32_prefixes() {
        let key = Credential::AddrKeyHash(KeyHash::new([0; 28]));
        let script = Credential::ScriptHash(ScriptHash::new([0; 28]));
        assert!(key.to_bech32(CredentialPurpose::Payment).unwrap().starts_with("addr_vkh1"));
        assert!(key.to_bech32(CredentialPurpose::Stake).unwrap().starts_with("stake_vkh1"));
        assert!(script.to_bech32(CredentialPurpose::Stake).unwrap().starts_with("script1"));
    }

    #[test]
    fn stake_reference_header_bits() {
        let key = Credential::AddrKeyHash(KeyHash::default());
        let script = Credential::ScriptHash(ScriptHash::default());
        assert_eq!(StakeReference::ByValue(key).header_bits(), 0);
        assert_eq!(StakeReference::ByValue(script).header_bits(), 1);
        assert_eq!(StakeReference::ByPointer(Default::default()).header_bits(), 2);
        assert_eq!(StakeReference::None.header_bits(), 3);
    }
}
