//! JSON description of an address, as printed by the inspector

use acropolis_address::{
    AddressInEra, AddressKind, AddressNetwork, AnyAddress, Credential, Era, StakeAddress,
    StakeReference,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressReport {
    /// Text form of the address
    pub address: AnyAddress,

    pub kind: AddressKind,

    /// Raw bytes as hex
    pub bytes: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<AddressNetwork>,

    pub is_key_address: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Credential>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegation: Option<StakeReference>,

    /// Reward address of an inline stake credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stake_address: Option<StakeAddress>,

    /// First era that accepts the address
    pub first_era: Era,

    /// Era the address was checked against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era: Option<Era>,
}

impl AddressReport {
    pub fn new(address: &AnyAddress) -> Self {
        let shelley = match address {
            AnyAddress::Shelley(shelley) => Some(shelley),
            AnyAddress::Byron(_) => None,
        };

        Self {
            address: address.clone(),
            kind: address.kind(),
            bytes: hex::encode(address.to_binary()),
            network: address.network(),
            is_key_address: address.is_key_address(),
            payment: shelley.map(|s| s.payment),
            delegation: shelley.map(|s| s.delegation),
            stake_address: shelley.and_then(|s| s.stake_address()),
            first_era: address.kind().first_era(),
            era: None,
        }
    }

    pub fn in_era(address: &AddressInEra) -> Self {
        Self {
            era: Some(address.era()),
            ..Self::new(&address.to_any())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acropolis_address::{ByronAddress, KeyHash, ShelleyAddress};

    fn base_address() -> AnyAddress {
        AnyAddress::Shelley(ShelleyAddress::new(
            AddressNetwork::Test,
            Credential::AddrKeyHash(KeyHash::new([1; 28])),
            StakeReference::ByValue(Credential::AddrKeyHash(KeyHash::new([2; 28]))),
        ))
    }

    #[test]
    fn shelley_report() {
        let report = AddressReport::new(&base_address());
        assert_eq!(report.kind, AddressKind::Shelley);
        assert_eq!(report.network, Some(AddressNetwork::Test));
        assert_eq!(report.first_era, Era::Shelley);
        assert!(report.is_key_address);
        assert!(report.stake_address.unwrap().to_string().starts_with("stake_test1"));
        assert!(report.bytes.starts_with("00"));
    }

    #[test]
    fn byron_report_omits_shelley_parts() {
        let byron: ByronAddress =
            "Ae2tdPwUPEZFRbyhz3cpfC2CumGzNkFBN2L42rcUc2yjQpEkxDbkPodpMAi".parse().unwrap();
        let address = AnyAddress::Byron(byron).into_era(Era::Babbage).unwrap();
        let report = AddressReport::in_era(&address);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "byron");
        assert_eq!(json["era"], "babbage");
        assert_eq!(json["first_era"], "byron");
        assert!(json.get("payment").is_none());
        assert!(json.get("network").is_none());
    }

    #[test]
    fn address_serialized_as_text() {
        let address = base_address();
        let json = serde_json::to_value(AddressReport::new(&address)).unwrap();
        assert_eq!(json["address"], address.to_string());
    }
}
