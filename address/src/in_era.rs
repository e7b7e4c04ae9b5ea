//! Addresses tagged with the era they are used in
//!
//! An [`AddressInEra`] is what the rest of the ledger exchanges. Each variant
//! pairs one address kind with the only kind of era evidence it can have, so a
//! Shelley address in the Byron era cannot be expressed at all.

use serde::de::{DeserializeSeed, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::address::{AnyAddress, ByronAddress, ShelleyAddress};
use crate::era::{AddressKind, Era, ShelleyBasedEra};
use crate::error::{AddressError, EraMismatch};

/// Evidence that an address kind may be used in an era
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EraWitness {
    /// Byron addresses are accepted in every era; carries the era in use
    ByronInAnyEra(Era),

    /// Shelley addresses are accepted in Shelley-based eras only
    ShelleyInEra(ShelleyBasedEra),
}

impl EraWitness {
    pub fn era(self) -> Era {
        match self {
            EraWitness::ByronInAnyEra(era) => era,
            EraWitness::ShelleyInEra(era) => era.era(),
        }
    }

    pub fn kind(self) -> AddressKind {
        match self {
            EraWitness::ByronInAnyEra(_) => AddressKind::Byron,
            EraWitness::ShelleyInEra(_) => AddressKind::Shelley,
        }
    }
}

/// An address together with evidence that its era accepts it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddressInEra {
    Byron {
        era: Era,
        address: ByronAddress,
    },
    Shelley {
        era: ShelleyBasedEra,
        address: ShelleyAddress,
    },
}

impl AnyAddress {
    /// Tag with `era`, if that era accepts this kind of address
    pub fn into_era(self, era: Era) -> Option<AddressInEra> {
        match self {
            AnyAddress::Byron(address) => Some(AddressInEra::Byron { era, address }),
            AnyAddress::Shelley(address) => era
                .shelley_based()
                .map(|era| AddressInEra::Shelley { era, address }),
        }
    }
}

impl AddressInEra {
    pub fn witness(&self) -> EraWitness {
        match self {
            AddressInEra::Byron { era, .. } => EraWitness::ByronInAnyEra(*era),
            AddressInEra::Shelley { era, .. } => EraWitness::ShelleyInEra(*era),
        }
    }

    pub fn era(&self) -> Era {
        self.witness().era()
    }

    pub fn kind(&self) -> AddressKind {
        self.witness().kind()
    }

    /// Move to another era - Byron addresses always can, Shelley ones only
    /// into Shelley-based eras
    pub fn migrate_era(self, target: Era) -> Result<AddressInEra, EraMismatch> {
        match self {
            AddressInEra::Byron { address, .. } => Ok(AddressInEra::Byron {
                era: target,
                address,
            }),
            AddressInEra::Shelley { era, address } => match target.shelley_based() {
                Some(era) => Ok(AddressInEra::Shelley { era, address }),
                None => Err(EraMismatch {
                    current: era,
                    target,
                }),
            },
        }
    }

    /// Does spending need a key witness (rather than a script)?
    pub fn is_key_address(&self) -> bool {
        match self {
            AddressInEra::Byron { .. } => true,
            AddressInEra::Shelley { address, .. } => address.payment.is_key(),
        }
    }

    pub fn to_any(&self) -> AnyAddress {
        match self {
            AddressInEra::Byron { address, .. } => AnyAddress::Byron(address.clone()),
            AddressInEra::Shelley { address, .. } => AnyAddress::Shelley(address.clone()),
        }
    }

    pub fn to_binary(&self) -> Vec<u8> {
        match self {
            AddressInEra::Byron { address, .. } => address.to_binary(),
            AddressInEra::Shelley { address, .. } => address.to_binary(),
        }
    }

    pub fn to_text(&self) -> Result<String, AddressError> {
        match self {
            AddressInEra::Byron { address, .. } => Ok(address.to_base58()),
            AddressInEra::Shelley { address, .. } => address.to_bech32(),
        }
    }

    /// Read an address of either kind from raw bytes, for use in `era`
    pub fn from_binary_in_era(era: Era, data: &[u8]) -> Result<Self, AddressError> {
        Self::tag(era, AnyAddress::from_binary(data)?)
    }

    /// Read an address of either kind from text, for use in `era`
    pub fn from_text_in_era(era: Era, text: &str) -> Result<Self, AddressError> {
        Self::tag(era, AnyAddress::from_text(text)?)
    }

    fn tag(era: Era, address: AnyAddress) -> Result<Self, AddressError> {
        let kind = address.kind();
        address.into_era(era).ok_or(AddressError::NotInEra { kind, era })
    }
}

impl From<AddressInEra> for AnyAddress {
    fn from(address: AddressInEra) -> Self {
        match address {
            AddressInEra::Byron { address, .. } => AnyAddress::Byron(address),
            AddressInEra::Shelley { address, .. } => AnyAddress::Shelley(address),
        }
    }
}

/// JSON form is the address text alone - the era comes from context
impl Serialize for AddressInEra {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = self.to_text().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

/// Deserialize an [`AddressInEra`] from its text, failing if `era` does not accept it
#[derive(Debug, Clone, Copy)]
pub struct InEra(pub Era);

impl<'de> DeserializeSeed<'de> for InEra {
    type Value = AddressInEra;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        AddressInEra::from_text_in_era(self.0, &text).map_err(serde::de::Error::custom)
    }
}
