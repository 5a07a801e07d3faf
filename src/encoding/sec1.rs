//! SEC1 public key encodings.

use crypto_bigint::subtle::Choice;

use crate::{
    arithmetic::{AffinePoint, FieldElement},
    error::Error,
};

pub(crate) const COMPRESSED_LEN: usize = 33;
pub(crate) const UNCOMPRESSED_LEN: usize = 65;

const TAG_EVEN: u8 = 0x02;
const TAG_ODD: u8 = 0x03;
const TAG_UNCOMPRESSED: u8 = 0x04;

fn field_element(bytes: &[u8]) -> Result<FieldElement, Error> {
    let bytes: &[u8; 32] = bytes.try_into().map_err(|_| Error::InvalidPublicKey)?;
    Option::from(FieldElement::from_bytes(bytes)).ok_or(Error::InvalidPublicKey)
}

/// Decodes a compressed or uncompressed point.
///
/// The tag and length are checked before any field arithmetic takes place.
/// Hybrid encodings (`0x06`/`0x07`) are not accepted.
pub(crate) fn decode_point(bytes: &[u8]) -> Result<AffinePoint, Error> {
    let (&tag, body) = bytes.split_first().ok_or(Error::InvalidPublicKey)?;
    let point = match (tag, bytes.len()) {
        (TAG_EVEN | TAG_ODD, COMPRESSED_LEN) => {
            let x = field_element(body)?;
            AffinePoint::decompress(x, Choice::from(tag & 1))
        }
        (TAG_UNCOMPRESSED, UNCOMPRESSED_LEN) => {
            let (x, y) = body.split_at(32);
            AffinePoint::from_coordinates(field_element(x)?, field_element(y)?)
        }
        _ => return Err(Error::InvalidPublicKey),
    };
    Option::from(point).ok_or(Error::InvalidPublicKey)
}

pub(crate) fn encode_compressed(point: &AffinePoint) -> [u8; COMPRESSED_LEN] {
    let mut bytes = [0u8; COMPRESSED_LEN];
    bytes[0] = TAG_EVEN | point.y().is_odd().unwrap_u8();
    bytes[1..].copy_from_slice(&point.x().to_bytes());
    bytes
}

pub(crate) fn encode_uncompressed(point: &AffinePoint) -> [u8; UNCOMPRESSED_LEN] {
    let mut bytes = [0u8; UNCOMPRESSED_LEN];
    bytes[0] = TAG_UNCOMPRESSED;
    bytes[1..33].copy_from_slice(&point.x().to_bytes());
    bytes[33..].copy_from_slice(&point.y().to_bytes());
    bytes
}

#[cfg(test)]
mod tests {
    use super::{decode_point, encode_compressed, encode_uncompressed};
    use crate::{arithmetic::AffinePoint, error::Error};

    #[test]
    fn generator_encodings() {
        let g = AffinePoint::GENERATOR;
        let compressed = encode_compressed(&g);
        assert_eq!(
            hex::encode(compressed),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert_eq!(decode_point(&compressed).unwrap(), g);
        assert_eq!(decode_point(&encode_uncompressed(&g)).unwrap(), g);
    }

    #[test]
    fn malformed_encodings() {
        let mut compressed = encode_compressed(&AffinePoint::GENERATOR);
        compressed[0] = 0x05;
        assert_eq!(decode_point(&compressed), Err(Error::InvalidPublicKey));

        let mut hybrid = encode_uncompressed(&AffinePoint::GENERATOR);
        hybrid[0] = 0x06;
        assert_eq!(decode_point(&hybrid), Err(Error::InvalidPublicKey));

        let compressed = encode_compressed(&AffinePoint::GENERATOR);
        assert_eq!(decode_point(&compressed[..32]), Err(Error::InvalidPublicKey));
        assert_eq!(decode_point(&[]), Err(Error::InvalidPublicKey));

        // Not on the curve
        let mut uncompressed = encode_uncompressed(&AffinePoint::GENERATOR);
        uncompressed[64] ^= 1;
        assert_eq!(decode_point(&uncompressed), Err(Error::InvalidPublicKey));

        // x = 5 has no curve point (5^3 + 7 = 132 is not a square mod p)
        let mut no_point = [0u8; 33];
        no_point[0] = 0x02;
        no_point[32] = 5;
        assert_eq!(decode_point(&no_point), Err(Error::InvalidPublicKey));

        // x >= p
        let mut too_large = [0xFFu8; 33];
        too_large[0] = 0x02;
        assert_eq!(decode_point(&too_large), Err(Error::InvalidPublicKey));
    }
}
