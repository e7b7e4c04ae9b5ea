//! Protocol eras and which address kinds each of them accepts

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::RangeFrom;
use std::str::FromStr;

/// Protocol era, in chain order
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Era {
    #[default]
    Byron,
    Shelley,
    Allegra,
    Mary,
    Alonzo,
    Babbage,
    Conway,
}

impl Era {
    /// Every era, oldest first
    pub const ALL: [Era; 7] = [
        Era::Byron,
        Era::Shelley,
        Era::Allegra,
        Era::Mary,
        Era::Alonzo,
        Era::Babbage,
        Era::Conway,
    ];

    /// Evidence that this era is Shelley-capable, if it is
    pub fn shelley_based(self) -> Option<ShelleyBasedEra> {
        match self {
            Era::Byron => None,
            Era::Shelley => Some(ShelleyBasedEra::Shelley),
            Era::Allegra => Some(ShelleyBasedEra::Allegra),
            Era::Mary => Some(ShelleyBasedEra::Mary),
            Era::Alonzo => Some(ShelleyBasedEra::Alonzo),
            Era::Babbage => Some(ShelleyBasedEra::Babbage),
            Era::Conway => Some(ShelleyBasedEra::Conway),
        }
    }

    pub fn is_shelley_based(self) -> bool {
        self.shelley_based().is_some()
    }
}

impl Display for Era {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Era::Byron => "byron",
            Era::Shelley => "shelley",
            Era::Allegra => "allegra",
            Era::Mary => "mary",
            Era::Alonzo => "alonzo",
            Era::Babbage => "babbage",
            Era::Conway => "conway",
        };
        f.write_str(name)
    }
}

impl FromStr for Era {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Era::ALL
            .into_iter()
            .find(|era| era.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown era '{s}'"))
    }
}

/// An era from Shelley onwards - the evidence a Shelley address needs to be used in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShelleyBasedEra {
    Shelley,
    Allegra,
    Mary,
    Alonzo,
    Babbage,
    Conway,
}

impl ShelleyBasedEra {
    pub fn era(self) -> Era {
        match self {
            ShelleyBasedEra::Shelley => Era::Shelley,
            ShelleyBasedEra::Allegra => Era::Allegra,
            ShelleyBasedEra::Mary => Era::Mary,
            ShelleyBasedEra::Alonzo => Era::Alonzo,
            ShelleyBasedEra::Babbage => Era::Babbage,
            ShelleyBasedEra::Conway => Era::Conway,
        }
    }
}

impl From<ShelleyBasedEra> for Era {
    fn from(era: ShelleyBasedEra) -> Self {
        era.era()
    }
}

impl Display for ShelleyBasedEra {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.era().fmt(f)
    }
}

/// The two address kinds, without their payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    /// Bootstrap addresses, valid in every era
    Byron,

    /// Delegation-capable addresses, valid from Shelley onwards
    Shelley,
}

impl AddressKind {
    /// First era in which this kind of address may appear
    pub fn first_era(self) -> Era {
        match self {
            AddressKind::Byron => Era::Byron,
            AddressKind::Shelley => Era::Shelley,
        }
    }

    /// Does `era` accept this kind of address?
    pub fn accepts(self, era: Era) -> bool {
        eras_accepting(self).contains(&era)
    }
}

impl Display for AddressKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressKind::Byron => write!(f, "byron"),
            AddressKind::Shelley => write!(f, "shelley"),
        }
    }
}

/// The eras accepting an address kind - always an open range from its first era
pub fn eras_accepting(kind: AddressKind) -> RangeFrom<Era> {
    kind.first_era()..
}
