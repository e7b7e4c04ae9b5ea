//! CIP-19 variable-length naturals, as used in stake pointers
//!
//! Big-endian groups of 7 bits; every byte but the last has its top bit set.

use crate::error::AddressError;

/// Largest encoding of a `u64`
const MAX_VARINT_LENGTH: usize = 10;

/// Append `value` to `out`
pub fn write_varint(out: &mut Vec<u8>, value: u64) {
    let mut groups = [0u8; MAX_VARINT_LENGTH];
    let mut count = 0;
    let mut rest = value;
    loop {
        groups[count] = (rest & 0x7f) as u8;
        count += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }

    for i in (1..count).rev() {
        out.push(groups[i] | 0x80);
    }
    out.push(groups[0]);
}

/// Read one value from the front of `data`, returning it and what follows.
/// Only the shortest encoding is accepted, so a leading `0x80` group is an error.
pub fn read_varint(data: &[u8]) -> Result<(u64, &[u8]), AddressError> {
    if data.first() == Some(&0x80) {
        return Err(AddressError::decode("Pointer value has a leading zero group"));
    }

    let mut value: u64 = 0;
    for (i, byte) in data.iter().enumerate() {
        if value.leading_zeros() < 7 {
            return Err(AddressError::decode("Pointer value overflows 64 bits"));
        }
        value = (value << 7) | u64::from(byte & 0x7f);
        if byte & 0x80 == 0 {
            return Ok((value, &data[i + 1..]));
        }
    }
    Err(AddressError::decode("Pointer value ran out of data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        write_varint(&mut out, value);
        out
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encode(0), vec![0]);
        assert_eq!(encode(1), vec![1]);
        assert_eq!(encode(0x7f), vec![0x7f]);
        assert_eq!(encode(0x80), vec![0x81, 0]);
        assert_eq!(encode(0x400), vec![0x88, 0]);
        assert_eq!(encode(0x4000), vec![0x81, 0x80, 0]);
        assert_eq!(encode(2498243), vec![0x81, 0x98, 0xbd, 0x43]);
    }

    #[test]
    fn powers_of_two() {
        for shift in 7..64 {
            let encoded = encode(1 << shift);
            assert_eq!(encoded.len(), shift / 7 + 1);
            assert_eq!(encoded[0], 0x80 | (1 << (shift % 7)));
            assert_eq!(read_varint(&encoded).unwrap(), (1 << shift, &[][..]));
        }
    }

    #[test]
    fn reads_in_sequence() {
        let data = [0, 0x7f, 0x81, 0, 0x88, 0, 0xaa];
        let (a, rest) = read_varint(&data).unwrap();
        let (b, rest) = read_varint(rest).unwrap();
        let (c, rest) = read_varint(rest).unwrap();
        let (d, rest) = read_varint(rest).unwrap();
        assert_eq!((a, b, c, d), (0, 0x7f, 0x80, 0x400));
        assert_eq!(rest, &[0xaa]);
    }

    #[test]
    fn max_value() {
        let encoded = encode(u64::MAX);
        assert_eq!(encoded.len(), MAX_VARINT_LENGTH);
        assert_eq!(read_varint(&encoded).unwrap().0, u64::MAX);
    }

    #[test]
    fn truncated() {
        assert!(read_varint(&[0x81, 0x80]).is_err());
        assert!(read_varint(&[]).is_err());
    }

    #[test]
    fn leading_zero_group_rejected() {
        assert!(matches!(read_varint(&[0x80, 0x01]), Err(AddressError::Decode(_))));
        assert!(matches!(read_varint(&[0x80, 0x80, 0x01]), Err(AddressError::Decode(_))));
        assert_eq!(read_varint(&[0x81, 0x00]).unwrap().0, 0x80);
    }

    #[test]
    fn overflow() {
        assert!(read_varint(&[0xff; 11]).is_err());
    }
}
