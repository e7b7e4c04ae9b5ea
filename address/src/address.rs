//! Cardano address definitions and their raw-byte (CIP-19) layout
//!
//! Each address kind is its own type, so a Byron address can never be passed
//! where a Shelley one is expected. [`AnyAddress`] erases the kind when the
//! caller does not know or care which one it holds.

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::credential::{Credential, ShelleyAddressPointer, StakeCredential, StakeReference};
use crate::era::AddressKind;
use crate::error::AddressError;
use crate::legacy::{ByronCodec, LegacyAddressCodec};
use crate::network::AddressNetwork;

/// Length of every credential hash in an address
const HASH_LENGTH: usize = 28;

/// Header type nibbles for stake addresses
const STAKE_HEADER_KEY: u8 = 0b1110;
const STAKE_HEADER_SCRIPT: u8 = 0b1111;

/// A Byron-era address - an opaque blob recognised by a [`LegacyAddressCodec`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct ByronAddress {
    /// Raw payload
    payload: Vec<u8>,
}

impl ByronAddress {
    /// Accept raw bytes the Byron codec recognises
    pub fn from_binary(data: &[u8]) -> Result<Self, AddressError> {
        Self::from_binary_with(&ByronCodec, data)
    }

    /// Accept raw bytes a given legacy codec recognises
    pub fn from_binary_with(
        codec: &impl LegacyAddressCodec,
        data: &[u8],
    ) -> Result<Self, AddressError> {
        codec.decode(data)?;
        Ok(Self {
            payload: data.to_vec(),
        })
    }

    /// Derive the bootstrap address of an extended verification key
    pub fn from_verification_key(
        codec: &impl LegacyAddressCodec,
        network_magic: u32,
        verification_key: &[u8],
    ) -> Result<Self, AddressError> {
        let payload = codec.derive(network_magic, verification_key)?;
        Ok(Self { payload })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    pub fn to_binary(&self) -> Vec<u8> {
        self.payload.clone()
    }
}

/// A Shelley-era payment address
#[derive(Debug, Clone, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct ShelleyAddress {
    /// Network id
    pub network: AddressNetwork,

    /// Payment part
    pub payment: Credential,

    /// Delegation part
    pub delegation: StakeReference,
}

impl ShelleyAddress {
    pub fn new(network: AddressNetwork, payment: Credential, delegation: StakeReference) -> Self {
        Self {
            network,
            payment,
            delegation,
        }
    }

    /// Get the stake pointer if there is one
    pub fn pointer(&self) -> Option<&ShelleyAddressPointer> {
        self.delegation.pointer()
    }

    /// Reward address for the inline stake credential, if there is one
    pub fn stake_address(&self) -> Option<StakeAddress> {
        self.delegation.credential().map(|credential| StakeAddress::new(*credential, self.network))
    }

    /// Header byte: delegation bits 6-5, payment bit 4, network bits 3-0
    pub fn header(&self) -> u8 {
        self.network.header_bits()
            | (self.payment.header_bit() << 4)
            | (self.delegation.header_bits() << 5)
    }

    /// Convert to binary format
    pub fn to_binary(&self) -> Vec<u8> {
        let mut data = vec![self.header()];
        data.extend_from_slice(self.payment.hash().as_ref());
        match &self.delegation {
            StakeReference::None => {}
            StakeReference::ByValue(credential) => {
                data.extend_from_slice(credential.hash().as_ref())
            }
            StakeReference::ByPointer(pointer) => data.extend(pointer.to_binary()),
        }
        data
    }

    /// Read from binary format - the length must be exactly what the header calls for
    pub fn from_binary(data: &[u8]) -> Result<Self, AddressError> {
        let (&header, rest) =
            data.split_first().ok_or_else(|| AddressError::decode("Empty address data"))?;

        let address_type = header >> 4;
        if address_type > 0b0111 {
            return Err(AddressError::decode(format!(
                "Header {header:02x} is not a Shelley payment address"
            )));
        }
        let network = network_from_header(header)?;

        if rest.len() < HASH_LENGTH {
            return Err(AddressError::decode(format!(
                "Shelley address too short: {} bytes",
                data.len()
            )));
        }
        let (payment_hash, rest) = rest.split_at(HASH_LENGTH);
        let payment = Credential::from_header_bit(address_type & 0x01, payment_hash)?;

        let delegation = match (address_type >> 1) & 0x03 {
            bit @ (0b00 | 0b01) => {
                expect_length(address_type, rest, HASH_LENGTH)?;
                StakeReference::ByValue(Credential::from_header_bit(bit, rest)?)
            }
            0b10 => StakeReference::ByPointer(ShelleyAddressPointer::from_binary(rest)?),
            _ => {
                expect_length(address_type, rest, 0)?;
                StakeReference::None
            }
        };

        Ok(Self {
            network,
            payment,
            delegation,
        })
    }

    /// Fail unless the address is for `network`
    pub fn expect_network(self, network: AddressNetwork) -> Result<Self, AddressError> {
        if self.network != network {
            return Err(AddressError::NetworkMismatch {
                found: self.network,
                expected: network,
            });
        }
        Ok(self)
    }
}

fn network_from_header(header: u8) -> Result<AddressNetwork, AddressError> {
    AddressNetwork::from_header_bits(header & 0x0f)
        .ok_or_else(|| AddressError::decode(format!("Unknown network in header {header:02x}")))
}

fn expect_length(address_type: u8, rest: &[u8], expected: usize) -> Result<(), AddressError> {
    if rest.len() != expected {
        return Err(AddressError::decode(format!(
            "Shelley address type {address_type} needs {expected} bytes after payment part, got {}",
            rest.len()
        )));
    }
    Ok(())
}

/// A stake (reward) address
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct StakeAddress {
    /// Network id
    pub network: AddressNetwork,

    /// Stake credential
    pub credential: StakeCredential,
}

impl StakeAddress {
    pub fn new(credential: StakeCredential, network: AddressNetwork) -> Self {
        StakeAddress {
            network,
            credential,
        }
    }

    pub fn get_hash(&self) -> &[u8] {
        self.credential.hash().as_ref()
    }

    /// Convert to binary format (29 bytes)
    pub fn to_binary(&self) -> Vec<u8> {
        let stake_bits = match &self.credential {
            Credential::AddrKeyHash(_) => STAKE_HEADER_KEY,
            Credential::ScriptHash(_) => STAKE_HEADER_SCRIPT,
        };

        let mut data = vec![self.network.header_bits() | (stake_bits << 4)];
        data.extend_from_slice(self.credential.hash().as_ref());
        data
    }

    /// Read from binary format (29 bytes)
    pub fn from_binary(data: &[u8]) -> Result<Self, AddressError> {
        if data.len() != HASH_LENGTH + 1 {
            return Err(AddressError::decode(format!(
                "Bad stake address length: {}",
                data.len()
            )));
        }

        let network = network_from_header(data[0])?;
        let credential = match data[0] >> 4 {
            STAKE_HEADER_KEY => Credential::from_header_bit(0, &data[1..])?,
            STAKE_HEADER_SCRIPT => Credential::from_header_bit(1, &data[1..])?,
            _ => {
                return Err(AddressError::decode(format!(
                    "Unknown header byte {:02x} in stake address",
                    data[0]
                )))
            }
        };

        Ok(StakeAddress {
            network,
            credential,
        })
    }
}

/// Address of either kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum AnyAddress {
    Byron(ByronAddress),
    Shelley(ShelleyAddress),
}

impl From<ByronAddress> for AnyAddress {
    fn from(address: ByronAddress) -> Self {
        AnyAddress::Byron(address)
    }
}

impl From<ShelleyAddress> for AnyAddress {
    fn from(address: ShelleyAddress) -> Self {
        AnyAddress::Shelley(address)
    }
}

impl AnyAddress {
    pub fn kind(&self) -> AddressKind {
        match self {
            AnyAddress::Byron(_) => AddressKind::Byron,
            AnyAddress::Shelley(_) => AddressKind::Shelley,
        }
    }

    /// Network discriminant - Byron addresses carry a magic instead, so have none
    pub fn network(&self) -> Option<AddressNetwork> {
        match self {
            AnyAddress::Byron(_) => None,
            AnyAddress::Shelley(shelley) => Some(shelley.network),
        }
    }

    /// Does spending from this address need a key witness (rather than a script)?
    pub fn is_key_address(&self) -> bool {
        match self {
            AnyAddress::Byron(_) => true,
            AnyAddress::Shelley(shelley) => shelley.payment.is_key(),
        }
    }

    pub fn to_binary(&self) -> Vec<u8> {
        match self {
            AnyAddress::Byron(byron) => byron.to_binary(),
            AnyAddress::Shelley(shelley) => shelley.to_binary(),
        }
    }

    /// Read raw bytes of either kind, using the Byron codec for legacy bytes
    pub fn from_binary(data: &[u8]) -> Result<Self, AddressError> {
        Self::from_binary_with(&ByronCodec, data)
    }

    /// Read raw bytes of either kind - the legacy codec always gets the first
    /// look, and only bytes it rejects are read as a Shelley address
    pub fn from_binary_with(
        codec: &impl LegacyAddressCodec,
        data: &[u8],
    ) -> Result<Self, AddressError> {
        let legacy_error = match ByronAddress::from_binary_with(codec, data) {
            Ok(byron) => return Ok(AnyAddress::Byron(byron)),
            Err(e) => e,
        };

        match ShelleyAddress::from_binary(data) {
            Ok(shelley) => Ok(AnyAddress::Shelley(shelley)),
            Err(_) if matches!(legacy_error, AddressError::Checksum(_)) => Err(legacy_error),
            Err(shelley_error) => Err(AddressError::decode(format!(
                "neither Byron ({legacy_error}) nor Shelley ({shelley_error})"
            ))),
        }
    }
}

/// Build a Byron address from a verification key via a legacy codec
pub fn make_byron_address(
    codec: &impl LegacyAddressCodec,
    network_magic: u32,
    verification_key: &[u8],
) -> Result<ByronAddress, AddressError> {
    ByronAddress::from_verification_key(codec, network_magic, verification_key)
}

/// Build a Shelley address
pub fn make_shelley_address(
    network: AddressNetwork,
    payment: Credential,
    delegation: StakeReference,
) -> ShelleyAddress {
    ShelleyAddress::new(network, payment, delegation)
}

macro_rules! impl_cbor_as_bytes {
    ($name:ty) => {
        impl<C> minicbor::Encode<C> for $name {
            fn encode<W: minicbor::encode::Write>(
                &self,
                e: &mut minicbor::Encoder<W>,
                _ctx: &mut C,
            ) -> Result<(), minicbor::encode::Error<W::Error>> {
                e.bytes(&self.to_binary())?;
                Ok(())
            }
        }

        impl<'b, C> minicbor::Decode<'b, C> for $name {
            fn decode(
                d: &mut minicbor::Decoder<'b>,
                _ctx: &mut C,
            ) -> Result<Self, minicbor::decode::Error> {
                let bytes = d.bytes()?;
                <$name>::from_binary(bytes).map_err(|e| {
                    minicbor::decode::Error::message(format!(
                        "invalid {}: {e}",
                        stringify!($name)
                    ))
                })
            }
        }
    };
}

impl_cbor_as_bytes!(ShelleyAddress);
impl_cbor_as_bytes!(StakeAddress);
impl_cbor_as_bytes!(AnyAddress);

// -- Tests --
#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{KeyHash, ScriptHash};
    use minicbor::{Decode, Encode};

    fn key(byte: u8) -> Credential {
        Credential::AddrKeyHash(KeyHash::new([byte; 28]))
    }

    fn script(byte: u8) -> Credential {
        Credential::ScriptHash(ScriptHash::new([byte; 28]))
    }

    #[test]
    fn shelley_headers() {
        let pointer = StakeReference::ByPointer(ShelleyAddressPointer::new(1, 2, 3));
        let cases = [
            (key(1), StakeReference::ByValue(key(2)), 0x01),
            (script(1), StakeReference::ByValue(key(2)), 0x11),
            (key(1), StakeReference::ByValue(script(2)), 0x21),
            (script(1), StakeReference::ByValue(script(2)), 0x31),
            (key(1), pointer, 0x41),
            (script(1), pointer, 0x51),
            (key(1), StakeReference::None, 0x61),
            (script(1), StakeReference::None, 0x71),
        ];
        for (payment, delegation, header) in cases {
            let address = ShelleyAddress::new(AddressNetwork::Main, payment, delegation);
            assert_eq!(address.header(), header);
            assert_eq!(address.to_binary()[0], header);
            assert_eq!(ShelleyAddress::from_binary(&address.to_binary()).unwrap(), address);
        }
    }

    #[test]
    fn testnet_header_nibble() {
        let address = ShelleyAddress::new(AddressNetwork::Test, key(1), StakeReference::None);
        assert_eq!(address.to_binary()[0], 0x60);
    }

    #[test]
    fn stake_reference_variants_recovered() {
        let references = [
            StakeReference::None,
            StakeReference::ByValue(key(9)),
            StakeReference::ByValue(script(9)),
            StakeReference::ByPointer(ShelleyAddressPointer::new(1, 2, 3)),
            StakeReference::ByPointer(ShelleyAddressPointer::new(u64::MAX, 0, 1 << 40)),
        ];
        for delegation in references {
            let address = ShelleyAddress::new(AddressNetwork::Test, key(5), delegation);
            let decoded = ShelleyAddress::from_binary(&address.to_binary()).unwrap();
            assert_eq!(decoded.delegation, delegation);
        }
    }

    #[test]
    fn pointer_address_layout() {
        let address = ShelleyAddress::new(
            AddressNetwork::Main,
            key(1),
            StakeReference::ByPointer(ShelleyAddressPointer::new(1, 2, 3)),
        );
        let binary = address.to_binary();
        assert_eq!(binary.len(), 1 + 28 + 3);
        assert_eq!(&binary[29..], &[1, 2, 3]);
    }

    #[test]
    fn shelley_rejects_bad_lengths() {
        let base =
            ShelleyAddress::new(AddressNetwork::Main, key(1), StakeReference::ByValue(key(2)));
        let mut binary = base.to_binary();

        binary.push(0);
        assert!(matches!(ShelleyAddress::from_binary(&binary), Err(AddressError::Decode(_))));

        binary.truncate(56);
        assert!(matches!(ShelleyAddress::from_binary(&binary), Err(AddressError::Decode(_))));

        let enterprise = ShelleyAddress::new(AddressNetwork::Main, key(1), StakeReference::None);
        let mut binary = enterprise.to_binary();
        binary.push(0);
        assert!(ShelleyAddress::from_binary(&binary).is_err());
        assert!(ShelleyAddress::from_binary(&binary[..20]).is_err());
        assert!(ShelleyAddress::from_binary(&[]).is_err());
    }

    #[test]
    fn shelley_rejects_other_headers() {
        let mut binary = vec![0x81];
        binary.extend([0u8; 28]);
        assert!(ShelleyAddress::from_binary(&binary).is_err());

        // Stake address header
        binary[0] = 0xe1;
        assert!(ShelleyAddress::from_binary(&binary).is_err());

        // Unknown network nibble
        binary[0] = 0x62;
        assert!(ShelleyAddress::from_binary(&binary).is_err());
    }

    #[test]
    fn expect_network() {
        let address = ShelleyAddress::new(AddressNetwork::Main, key(1), StakeReference::None);
        assert!(address.clone().expect_network(AddressNetwork::Main).is_ok());
        assert_eq!(
            address.expect_network(AddressNetwork::Test),
            Err(AddressError::NetworkMismatch {
                found: AddressNetwork::Main,
                expected: AddressNetwork::Test,
            })
        );
    }

    #[test]
    fn stake_address_from_base_address() {
        let address = ShelleyAddress::new(
            AddressNetwork::Test,
            key(1),
            StakeReference::ByValue(script(2)),
        );
        let stake = address.stake_address().unwrap();
        assert_eq!(stake.network, AddressNetwork::Test);
        assert_eq!(stake.credential, script(2));

        let enterprise = ShelleyAddress::new(AddressNetwork::Test, key(1), StakeReference::None);
        assert!(enterprise.stake_address().is_none());
    }

    #[test]
    fn stake_address_from_binary_mainnet_stake() {
        // First withdrawal on Mainnet
        let binary =
            hex::decode("e1558f3ee09b26d88fac2eddc772a9eda94cce6dbadbe9fee439bd6001").unwrap();
        let sa = StakeAddress::from_binary(&binary).unwrap();
        assert_eq!(sa.network, AddressNetwork::Main);
        assert!(sa.credential.is_key());
        assert_eq!(
            hex::encode(sa.get_hash()),
            "558f3ee09b26d88fac2eddc772a9eda94cce6dbadbe9fee439bd6001"
        );
        assert_eq!(sa.to_binary(), binary);
    }

    #[test]
    fn stake_address_from_binary_testnet_script() {
        let binary =
            hex::decode("f0558f3ee09b26d88fac2eddc772a9eda94cce6dbadbe9fee439bd6001").unwrap();
        let sa = StakeAddress::from_binary(&binary).unwrap();
        assert_eq!(sa.network, AddressNetwork::Test);
        assert!(sa.credential.is_script());
        assert_eq!(sa.to_binary(), binary);
    }

    #[test]
    fn stake_address_rejects_bad_input() {
        assert!(StakeAddress::from_binary(&[0xe1, 0x00, 0x01, 0x02, 0x03]).is_err());

        let mut binary =
            hex::decode("e1558f3ee09b26d88fac2eddc772a9eda94cce6dbadbe9fee439bd6001").unwrap();
        binary[0] = 0x61;
        assert!(StakeAddress::from_binary(&binary).is_err());
    }

    #[test]
    fn stake_addresses_cbor_round_trip() {
        let binary =
            hex::decode("e1558f3ee09b26d88fac2eddc772a9eda94cce6dbadbe9fee439bd6001").unwrap();
        let address = StakeAddress::from_binary(&binary).unwrap();

        // Byte string header 0x58 0x1d, then the 29 raw bytes
        let expected = [[0x58, 0x1d].as_slice(), &binary].concat();

        let mut actual = Vec::new();
        let mut encoder = minicbor::Encoder::new(&mut actual);
        address.encode(&mut encoder, &mut ()).unwrap();
        assert_eq!(actual, expected);

        let mut decoder = minicbor::Decoder::new(&actual);
        assert_eq!(StakeAddress::decode(&mut decoder, &mut ()).unwrap(), address);
    }

    #[test]
    fn any_address_cbor_rejects_garbage() {
        let mut encoded = Vec::new();
        minicbor::Encoder::new(&mut encoded).bytes(&[0xff, 0x00]).unwrap();
        let mut decoder = minicbor::Decoder::new(&encoded);
        assert!(AnyAddress::decode(&mut decoder, &mut ()).is_err());
    }

    #[test]
    fn any_address_falls_back_to_shelley() {
        let shelley = ShelleyAddress::new(AddressNetwork::Main, script(3), StakeReference::None);
        let any = AnyAddress::from_binary(&shelley.to_binary()).unwrap();
        assert_eq!(any, AnyAddress::Shelley(shelley));
        assert_eq!(any.kind(), AddressKind::Shelley);
        assert!(!any.is_key_address());
    }

    /// Legacy codec that claims every blob
    struct GreedyCodec;

    impl LegacyAddressCodec for GreedyCodec {
        fn decode(&self, _bytes: &[u8]) -> Result<(), AddressError> {
            Ok(())
        }

        fn derive(&self, _magic: u32, key: &[u8]) -> Result<Vec<u8>, AddressError> {
            Ok(key.to_vec())
        }
    }

    #[test]
    fn legacy_decode_wins_tie_break() {
        let shelley = ShelleyAddress::new(AddressNetwork::Main, key(3), StakeReference::None);
        let binary = shelley.to_binary();

        let any = AnyAddress::from_binary_with(&GreedyCodec, &binary).unwrap();
        assert_eq!(any.kind(), AddressKind::Byron);
        assert_eq!(any.to_binary(), binary);
    }

    #[test]
    fn neither_kind_is_decode_failure() {
        assert!(matches!(AnyAddress::from_binary(&[0x82, 0x00]), Err(AddressError::Decode(_))));
    }

    #[test]
    fn byron_from_verification_key() {
        let key: Vec<u8> = (0u8..64).collect();
        let byron = make_byron_address(&ByronCodec, 764824073, &key).unwrap();
        let any = AnyAddress::from_binary(byron.as_bytes()).unwrap();
        assert_eq!(any, AnyAddress::Byron(byron));
        assert!(any.is_key_address());
        assert_eq!(any.network(), None);
    }
}
