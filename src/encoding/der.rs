//! Strict DER encoding of ECDSA signatures:
//! `SEQUENCE { INTEGER r, INTEGER s }`.
//!
//! Only the canonical form is accepted: short-form lengths, minimal non-negative
//! integers, and no trailing data. Range checks on `r` and `s` are left to the caller.

use alloc::vec::Vec;

use crate::error::Error;

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;

/// Maximum encoded size: two 33-byte integers with their headers, plus the sequence header.
pub(crate) const MAX_SIGNATURE_LEN: usize = 72;

/// Reads one DER integer, returning it left-padded to 32 bytes and the remaining input.
fn parse_integer(input: &[u8]) -> Result<([u8; 32], &[u8]), Error> {
    let (&tag, rest) = input.split_first().ok_or(Error::InvalidSignatureEncoding)?;
    if tag != TAG_INTEGER {
        return Err(Error::InvalidSignatureEncoding);
    }
    let (&len, rest) = rest.split_first().ok_or(Error::InvalidSignatureEncoding)?;
    let len = len as usize;
    // Rules out long-form lengths too, since those have the top bit set.
    if len == 0 || len > 33 || len > rest.len() {
        return Err(Error::InvalidSignatureEncoding);
    }
    let (value, rest) = rest.split_at(len);

    let first = value.first().copied().ok_or(Error::InvalidSignatureEncoding)?;
    if first & 0x80 != 0 {
        // negative
        return Err(Error::InvalidSignatureEncoding);
    }
    let value = if first == 0 && len > 1 {
        let (_, tail) = value.split_at(1);
        // A leading zero is only allowed to keep the next byte from reading as negative.
        if tail.first().is_some_and(|b| b & 0x80 == 0) {
            return Err(Error::InvalidSignatureEncoding);
        }
        tail
    } else {
        value
    };
    if value.len() > 32 {
        return Err(Error::InvalidSignatureEncoding);
    }

    let mut padded = [0u8; 32];
    let (_, dest) = padded.split_at_mut(32 - value.len());
    dest.copy_from_slice(value);
    Ok((padded, rest))
}

/// Parses a strict DER signature into big-endian `r` and `s`.
pub(crate) fn decode_signature(bytes: &[u8]) -> Result<([u8; 32], [u8; 32]), Error> {
    let (&tag, rest) = bytes.split_first().ok_or(Error::InvalidSignatureEncoding)?;
    if tag != TAG_SEQUENCE {
        return Err(Error::InvalidSignatureEncoding);
    }
    let (&len, body) = rest.split_first().ok_or(Error::InvalidSignatureEncoding)?;
    // Short form only, and it must cover exactly the remaining bytes.
    if len & 0x80 != 0 || len as usize != body.len() {
        return Err(Error::InvalidSignatureEncoding);
    }

    let (r, rest) = parse_integer(body)?;
    let (s, rest) = parse_integer(rest)?;
    if !rest.is_empty() {
        return Err(Error::InvalidSignatureEncoding);
    }
    Ok((r, s))
}

fn push_integer(out: &mut Vec<u8>, value: &[u8; 32]) {
    let start = value.iter().position(|b| *b != 0).unwrap_or(31);
    let (_, minimal) = value.split_at(start);
    let needs_padding = minimal.first().is_some_and(|b| b & 0x80 != 0);

    out.push(TAG_INTEGER);
    out.push((minimal.len() + usize::from(needs_padding)) as u8);
    if needs_padding {
        out.push(0);
    }
    out.extend_from_slice(minimal);
}

/// Encodes big-endian `r` and `s` as a minimal DER signature.
pub(crate) fn encode_signature(r: &[u8; 32], s: &[u8; 32]) -> Vec<u8> {
    let mut body = Vec::with_capacity(MAX_SIGNATURE_LEN - 2);
    push_integer(&mut body, r);
    push_integer(&mut body, s);

    let mut out = Vec::with_capacity(body.len() + 2);
    out.push(TAG_SEQUENCE);
    out.push(body.len() as u8);
    out.extend_from_slice(&body);
    out
}

#[cfg(test)]
mod tests {
    use super::{decode_signature, encode_signature};
    use crate::error::Error;

    fn one_and_high() -> ([u8; 32], [u8; 32]) {
        let mut r = [0u8; 32];
        r[31] = 1;
        let mut s = [0u8; 32];
        s[0] = 0x80;
        (r, s)
    }

    #[test]
    fn minimal_encoding() {
        let (r, s) = one_and_high();
        let der = encode_signature(&r, &s);
        assert_eq!(der.len(), 2 + 3 + 35);
        assert_eq!(&der[..5], &[0x30, 38, 0x02, 0x01, 0x01]);
        assert_eq!(&der[5..8], &[0x02, 33, 0x00]);
        assert_eq!(decode_signature(&der), Ok((r, s)));
    }

    #[test]
    fn rejects_non_canonical() {
        let (r, s) = one_and_high();
        let der = encode_signature(&r, &s);

        // trailing byte
        let mut trailing = der.clone();
        trailing.push(0);
        assert_eq!(decode_signature(&trailing), Err(Error::InvalidSignatureEncoding));

        // long-form sequence length
        let mut long_form = vec![0x30, 0x81, der[1]];
        long_form.extend_from_slice(&der[2..]);
        assert_eq!(decode_signature(&long_form), Err(Error::InvalidSignatureEncoding));

        // superfluous leading zero in r
        let mut padded = vec![0x30, der[1] + 1, 0x02, 0x02, 0x00, 0x01];
        padded.extend_from_slice(&der[5..]);
        assert_eq!(decode_signature(&padded), Err(Error::InvalidSignatureEncoding));

        // negative s (padding byte removed)
        let mut negative = vec![0x30, der[1] - 1];
        negative.extend_from_slice(&der[2..5]);
        negative.extend_from_slice(&[0x02, 32]);
        negative.extend_from_slice(&der[8..]);
        assert_eq!(decode_signature(&negative), Err(Error::InvalidSignatureEncoding));

        // wrong sequence tag and truncated input
        let mut wrong_tag = der.clone();
        wrong_tag[0] = 0x31;
        assert_eq!(decode_signature(&wrong_tag), Err(Error::InvalidSignatureEncoding));
        assert_eq!(decode_signature(&der[..der.len() - 1]), Err(Error::InvalidSignatureEncoding));
        assert_eq!(decode_signature(&[]), Err(Error::InvalidSignatureEncoding));

        // zero-length integer
        assert_eq!(
            decode_signature(&[0x30, 0x05, 0x02, 0x00, 0x02, 0x01, 0x01]),
            Err(Error::InvalidSignatureEncoding)
        );
    }

    #[test]
    fn zero_is_well_formed() {
        // Range checks happen later; the encoding itself is canonical.
        assert_eq!(
            decode_signature(&[0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00]),
            Ok(([0u8; 32], [0u8; 32]))
        );
    }
}
