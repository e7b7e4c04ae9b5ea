//! Byron (bootstrap) address blobs
//!
//! The address layer treats a Byron address as an opaque blob. A
//! [`LegacyAddressCodec`] decides whether bytes are such a blob, and builds one
//! from a verification key.

use crc::{Crc, CRC_32_ISO_HDLC};
use minicbor::data::{Tag, Type};
use minicbor::encode::Write;
use minicbor::{Decoder, Encoder};

use crate::crypto::sha3_then_blake2b_224;
use crate::error::AddressError;
use crate::network::NetworkId;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// CBOR tag for embedded CBOR data
const TAG_ENCODED_CBOR: Tag = Tag::new(24);

/// Attribute key holding the protocol magic of a non-mainnet address
const ATTRIBUTE_NETWORK_MAGIC: u8 = 2;

/// Extended verification key: public key and chain code
const EXTENDED_KEY_LENGTH: usize = 64;

/// Recognises and derives legacy address blobs
pub trait LegacyAddressCodec {
    /// Accept `bytes` as a legacy address, or say why not
    fn decode(&self, bytes: &[u8]) -> Result<(), AddressError>;

    /// Build the legacy address blob for a verification key on a network
    fn derive(&self, network_magic: u32, verification_key: &[u8])
        -> Result<Vec<u8>, AddressError>;
}

/// The Byron address format: `[#6.24(payload), crc32(payload)]`
#[derive(Debug, Default, Clone, Copy)]
pub struct ByronCodec;

fn cbor_error(e: minicbor::decode::Error) -> AddressError {
    AddressError::decode(format!("Byron address: {e}"))
}

fn encode_error<E: std::fmt::Display>(e: minicbor::encode::Error<E>) -> AddressError {
    AddressError::Encode(format!("Byron address: {e}"))
}

/// Attributes map - only non-mainnet addresses carry the network magic
fn encode_attributes<W: Write>(
    e: &mut Encoder<W>,
    network_magic: u32,
) -> Result<(), minicbor::encode::Error<W::Error>> {
    if network_magic == NetworkId::Mainnet.magic() {
        e.map(0)?;
    } else {
        let mut magic = Vec::new();
        Encoder::new(&mut magic).u32(network_magic).map_err(|_| {
            minicbor::encode::Error::message("cannot encode network magic")
        })?;
        e.map(1)?.u8(ATTRIBUTE_NETWORK_MAGIC)?.bytes(&magic)?;
    }
    Ok(())
}

impl ByronCodec {
    /// Check the inner payload is `[root, attributes, type]`
    fn check_payload(payload: &[u8]) -> Result<(), AddressError> {
        let mut d = Decoder::new(payload);
        if d.array().map_err(cbor_error)? != Some(3) {
            return Err(AddressError::decode("Byron payload is not a 3-element array"));
        }

        let root = d.bytes().map_err(cbor_error)?;
        if root.len() != 28 {
            return Err(AddressError::decode(format!("Bad Byron root length {}", root.len())));
        }

        match d.datatype().map_err(cbor_error)? {
            Type::Map | Type::MapIndef => d.skip().map_err(cbor_error)?,
            other => {
                return Err(AddressError::decode(format!(
                    "Byron attributes must be a map, found {other:?}"
                )))
            }
        }

        d.u8().map_err(cbor_error)?;
        if d.position() != payload.len() {
            return Err(AddressError::decode("Trailing bytes in Byron payload"));
        }
        Ok(())
    }
}

impl LegacyAddressCodec for ByronCodec {
    fn decode(&self, bytes: &[u8]) -> Result<(), AddressError> {
        let mut d = Decoder::new(bytes);
        if d.array().map_err(cbor_error)? != Some(2) {
            return Err(AddressError::decode("Byron address is not a 2-element array"));
        }

        if d.tag().map_err(cbor_error)? != TAG_ENCODED_CBOR {
            return Err(AddressError::decode("Byron payload is not tagged as CBOR"));
        }
        let payload = d.bytes().map_err(cbor_error)?;
        let crc = d.u32().map_err(cbor_error)?;

        if d.position() != bytes.len() {
            return Err(AddressError::decode("Trailing bytes after Byron address"));
        }

        let expected = CRC32.checksum(payload);
        if crc != expected {
            return Err(AddressError::Checksum(format!(
                "Byron CRC32 is {crc:08x}, payload gives {expected:08x}"
            )));
        }

        Self::check_payload(payload)
    }

    fn derive(
        &self,
        network_magic: u32,
        verification_key: &[u8],
    ) -> Result<Vec<u8>, AddressError> {
        if verification_key.len() != EXTENDED_KEY_LENGTH {
            return Err(AddressError::Encode(format!(
                "Byron verification key must be {EXTENDED_KEY_LENGTH} bytes, got {}",
                verification_key.len()
            )));
        }

        // Root is the hash of [type, spending data, attributes]
        let mut root_input = Vec::new();
        let mut e = Encoder::new(&mut root_input);
        e.array(3)?.u8(0)?;
        e.array(2)?.u8(0)?.bytes(verification_key)?;
        encode_attributes(&mut e, network_magic).map_err(encode_error)?;
        let root = sha3_then_blake2b_224(&root_input);

        let mut payload = Vec::new();
        let mut e = Encoder::new(&mut payload);
        e.array(3)?.bytes(root.as_ref())?;
        encode_attributes(&mut e, network_magic).map_err(encode_error)?;
        e.u8(0)?;

        let mut address = Vec::new();
        Encoder::new(&mut address)
            .array(2)?
            .tag(TAG_ENCODED_CBOR)?
            .bytes(&payload)?
            .u32(CRC32.checksum(&payload))?;
        Ok(address)
    }
}

impl From<minicbor::encode::Error<std::convert::Infallible>> for AddressError {
    fn from(e: minicbor::encode::Error<std::convert::Infallible>) -> Self {
        encode_error(e)
    }
}
