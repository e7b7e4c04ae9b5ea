//! Hashing helpers for deriving credentials and Byron address roots

use crate::hash::{Hash, KeyHash};
use blake2::{digest::consts::U28, Blake2b, Digest};
use sha3::Sha3_256;

/// Get a Blake2b-224 hash of a key
pub fn keyhash_224(key: &[u8]) -> KeyHash {
    let mut hasher = Blake2b::<U28>::new();
    hasher.update(key);
    let mut hash = [0u8; 28];
    hash.copy_from_slice(&hasher.finalize());
    KeyHash::new(hash)
}

/// SHA3-256 followed by Blake2b-224, as used for Byron address roots
pub fn sha3_then_blake2b_224(data: &[u8]) -> Hash<28> {
    keyhash_224(&Sha3_256::digest(data))
}
