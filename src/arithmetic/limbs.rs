//! 4x64-bit limb helpers shared by the field and scalar implementations.
//!
//! Limbs are little-endian: `limbs[0]` holds the least significant word.
//! Nothing in here branches on the values being processed.

use crypto_bigint::subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

pub(crate) type Limbs = [u64; 4];
pub(crate) type WideLimbs = [u64; 8];

/// `a + b + carry`, returning the sum and the carry-out (0 or 1).
#[inline(always)]
const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// `a - b - borrow`, returning the difference and the borrow-out (0 or 1).
#[inline(always)]
const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let ret = (a as u128).wrapping_sub((b as u128) + (borrow as u128));
    (ret as u64, ((ret >> 64) as u64) & 1)
}

/// `a + b * c + carry`, returning the low word and the high word.
#[inline(always)]
const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) * (c as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

fn choice_from_bit(bit: u64) -> Choice {
    Choice::from((bit & 1) as u8)
}

pub(crate) fn add(a: &Limbs, b: &Limbs) -> (Limbs, u64) {
    let (r0, c) = adc(a[0], b[0], 0);
    let (r1, c) = adc(a[1], b[1], c);
    let (r2, c) = adc(a[2], b[2], c);
    let (r3, c) = adc(a[3], b[3], c);
    ([r0, r1, r2, r3], c)
}

pub(crate) fn sub(a: &Limbs, b: &Limbs) -> (Limbs, u64) {
    let (r0, b0) = sbb(a[0], b[0], 0);
    let (r1, b1) = sbb(a[1], b[1], b0);
    let (r2, b2) = sbb(a[2], b[2], b1);
    let (r3, b3) = sbb(a[3], b[3], b2);
    ([r0, r1, r2, r3], b3)
}

pub(crate) fn select(a: &Limbs, b: &Limbs, choice: Choice) -> Limbs {
    [
        u64::conditional_select(&a[0], &b[0], choice),
        u64::conditional_select(&a[1], &b[1], choice),
        u64::conditional_select(&a[2], &b[2], choice),
        u64::conditional_select(&a[3], &b[3], choice),
    ]
}

pub(crate) fn ct_eq(a: &Limbs, b: &Limbs) -> Choice {
    a[0].ct_eq(&b[0]) & a[1].ct_eq(&b[1]) & a[2].ct_eq(&b[2]) & a[3].ct_eq(&b[3])
}

pub(crate) fn is_zero(a: &Limbs) -> Choice {
    (a[0] | a[1] | a[2] | a[3]).ct_eq(&0)
}

/// Returns `a < b`.
pub(crate) fn ct_lt(a: &Limbs, b: &Limbs) -> Choice {
    let (_, borrow) = sub(a, b);
    choice_from_bit(borrow)
}

/// Full 256x256 -> 512 bit schoolbook multiplication.
#[allow(clippy::indexing_slicing)] // all indices are bounded by the fixed loop ranges
pub(crate) fn mul_wide(a: &Limbs, b: &Limbs) -> WideLimbs {
    let mut res = [0u64; 8];
    for i in 0..4 {
        let mut carry = 0;
        for j in 0..4 {
            let (lo, hi) = mac(res[i + j], a[i], b[j], carry);
            res[i + j] = lo;
            carry = hi;
        }
        res[i + 4] = carry;
    }
    res
}

/// Reduces a 512-bit value modulo `modulus`, where `complement == 2^256 - modulus`.
///
/// Uses `2^256 = complement (mod modulus)` to fold the high half into the low half.
/// Three folds suffice for any modulus whose complement is below `2^130`,
/// which covers both the field prime and the group order.
#[allow(clippy::indexing_slicing)] // all indices are bounded by the fixed loop ranges
pub(crate) fn reduce_wide(wide: &WideLimbs, modulus: &Limbs, complement: &Limbs) -> Limbs {
    let mut acc = *wide;
    for _ in 0..3 {
        let hi = [acc[4], acc[5], acc[6], acc[7]];
        let mut next = mul_wide(&hi, complement);
        let mut carry = 0;
        for i in 0..4 {
            let (sum, c) = adc(next[i], acc[i], carry);
            next[i] = sum;
            carry = c;
        }
        for limb in next.iter_mut().skip(4) {
            let (sum, c) = adc(*limb, 0, carry);
            *limb = sum;
            carry = c;
        }
        acc = next;
    }

    // At this point the high half is at most 1.
    let lo = [acc[0], acc[1], acc[2], acc[3]];
    final_reduce(&lo, acc[4], modulus, complement)
}

/// Reduces `top * 2^256 + lo`, known to be below `2^256 + 2^134`, to the canonical range.
fn final_reduce(lo: &Limbs, top: u64, modulus: &Limbs, complement: &Limbs) -> Limbs {
    // If `top` is set, `lo` is small and adding the complement cannot overflow.
    let (folded, _) = add(lo, complement);
    let r = select(lo, &folded, choice_from_bit(top));
    let (reduced, borrow) = sub(&r, modulus);
    select(&reduced, &r, choice_from_bit(borrow))
}

/// Reduces a value below `2^256` with a single conditional subtraction.
///
/// Only correct when `modulus > 2^255`.
pub(crate) fn reduce_once(a: &Limbs, modulus: &Limbs) -> Limbs {
    let (reduced, borrow) = sub(a, modulus);
    select(&reduced, a, choice_from_bit(borrow))
}

/// `(a + b) mod modulus` for canonical `a` and `b`.
pub(crate) fn add_mod(a: &Limbs, b: &Limbs, modulus: &Limbs) -> Limbs {
    let (sum, carry) = add(a, b);
    let (reduced, borrow) = sub(&sum, modulus);
    // Keep the unreduced sum only if it neither overflowed nor reached the modulus.
    let keep_sum = !choice_from_bit(carry) & choice_from_bit(borrow);
    select(&reduced, &sum, keep_sum)
}

/// `(a - b) mod modulus` for canonical `a` and `b`.
pub(crate) fn sub_mod(a: &Limbs, b: &Limbs, modulus: &Limbs) -> Limbs {
    let (diff, borrow) = sub(a, b);
    let (wrapped, _) = add(&diff, modulus);
    select(&diff, &wrapped, choice_from_bit(borrow))
}

pub(crate) fn mul_mod(a: &Limbs, b: &Limbs, modulus: &Limbs, complement: &Limbs) -> Limbs {
    reduce_wide(&mul_wide(a, b), modulus, complement)
}

/// Square-and-multiply with a public exponent.
///
/// The control flow depends on `exponent` only, which is always a curve constant.
pub(crate) fn pow_public(base: &Limbs, exponent: &Limbs, modulus: &Limbs, complement: &Limbs) -> Limbs {
    let mut res = [1, 0, 0, 0];
    for limb in exponent.iter().rev() {
        for bit in (0..64).rev() {
            res = mul_mod(&res, &res, modulus, complement);
            if (limb >> bit) & 1 == 1 {
                res = mul_mod(&res, base, modulus, complement);
            }
        }
    }
    res
}

pub(crate) fn from_be_bytes(bytes: &[u8; 32]) -> Limbs {
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().rev().zip(bytes.chunks_exact(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *limb = u64::from_be_bytes(word);
    }
    limbs
}

pub(crate) fn to_be_bytes(limbs: &Limbs) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for (chunk, limb) in bytes.chunks_exact_mut(8).zip(limbs.iter().rev()) {
        chunk.copy_from_slice(&limb.to_be_bytes());
    }
    bytes
}

/// Returns `count` bits of `limbs` starting at bit `offset`; bits past 255 read as zero.
///
/// Variable-time in `offset` and `count`; only used for public scalars.
pub(crate) fn get_bits_vartime(limbs: &Limbs, offset: usize, count: usize) -> u32 {
    debug_assert!(count > 0 && count <= 31);
    let mut res = 0u32;
    for i in 0..count {
        let bit = offset + i;
        if bit >= 256 {
            break;
        }
        let word = limbs.get(bit / 64).copied().unwrap_or(0);
        res |= (((word >> (bit % 64)) & 1) as u32) << i;
    }
    res
}
