//! Scalar multiplication.
//!
//! The `*_secret` functions run in constant time and must be used whenever the scalar
//! or the point is secret. The `*_vartime` functions use wNAF recoding and are only
//! suitable for public inputs (signature verification, key recovery).

use alloc::vec::Vec;

use crypto_bigint::subtle::{ConditionallySelectable, ConstantTimeEq};

use super::{
    limbs,
    point::{batch_normalize, AffinePoint, ProjectivePoint},
    scalar::Scalar,
};

/// Number of 4-bit windows in a 256-bit scalar.
pub(crate) const WINDOWS: usize = 64;

/// Non-identity entries in each window table (multiples 1 to 15).
pub(crate) const WINDOW_ENTRIES: usize = 15;

/// wNAF width used for the variable base.
const WNAF_WIDTH_POINT: usize = 5;

/// wNAF width used for the generator; the odd multiples table in [`Context`](crate::Context)
/// holds `2^(WNAF_WIDTH_GENERATOR - 2)` points.
const WNAF_WIDTH_GENERATOR: usize = 8;

// One extra digit for the final carry.
const WNAF_LEN: usize = 257;

/// Computes `k * point` in constant time using a fixed 4-bit window.
pub(crate) fn mul_secret(point: &ProjectivePoint, k: &Scalar) -> ProjectivePoint {
    let mut table = [ProjectivePoint::IDENTITY; 16];
    let mut acc = ProjectivePoint::IDENTITY;
    for entry in table.iter_mut().skip(1) {
        acc = acc.add(point);
        *entry = acc;
    }

    let mut res = ProjectivePoint::IDENTITY;
    for window in (0..WINDOWS).rev() {
        for _ in 0..4 {
            res = res.double();
        }
        let digit = k.nibble(window);
        let mut selected = ProjectivePoint::IDENTITY;
        for (j, entry) in table.iter().enumerate() {
            selected.conditional_assign(entry, (j as u8).ct_eq(&digit));
        }
        res = res.add(&selected);
    }
    res
}

/// Builds the comb table for the generator: entry `[i][j - 1]` is `j * 16^i * G`.
pub(crate) fn generator_comb_table() -> Vec<[AffinePoint; WINDOW_ENTRIES]> {
    let mut projective = Vec::with_capacity(WINDOWS * WINDOW_ENTRIES);
    let mut base = ProjectivePoint::GENERATOR;
    for _ in 0..WINDOWS {
        let mut multiple = base;
        for _ in 0..WINDOW_ENTRIES {
            projective.push(multiple);
            multiple = multiple.add_vartime(&base);
        }
        // `multiple` is now 16 * base
        base = multiple;
    }

    batch_normalize_chunks(&projective)
}

fn batch_normalize_chunks(projective: &[ProjectivePoint]) -> Vec<[AffinePoint; WINDOW_ENTRIES]> {
    let affine = batch_normalize(projective);
    affine
        .chunks_exact(WINDOW_ENTRIES)
        .map(|chunk| {
            let mut row = [AffinePoint::IDENTITY; WINDOW_ENTRIES];
            row.copy_from_slice(chunk);
            row
        })
        .collect()
}

/// Computes `k * G` in constant time using the precomputed comb table.
///
/// Every window performs one full table scan and one complete mixed addition,
/// regardless of the digit value.
pub(crate) fn mul_generator_secret(comb: &[[AffinePoint; WINDOW_ENTRIES]], k: &Scalar) -> ProjectivePoint {
    debug_assert_eq!(comb.len(), WINDOWS);
    let mut res = ProjectivePoint::IDENTITY;
    for (window, row) in comb.iter().enumerate() {
        let digit = k.nibble(window);
        let mut selected = AffinePoint::IDENTITY;
        for (j, entry) in row.iter().enumerate() {
            selected.conditional_assign(entry, ((j + 1) as u8).ct_eq(&digit));
        }
        res = res.add_mixed(&selected);
    }
    res
}

/// Builds the table of odd multiples `G, 3G, ..., (2^(w-1) - 1)G` for the generator wNAF.
pub(crate) fn generator_odd_multiples() -> Vec<AffinePoint> {
    batch_normalize(&odd_multiples(&ProjectivePoint::GENERATOR, WNAF_WIDTH_GENERATOR))
}

fn odd_multiples(point: &ProjectivePoint, width: usize) -> Vec<ProjectivePoint> {
    let count = 1 << (width - 2);
    let double = point.double();
    let mut res = Vec::with_capacity(count);
    let mut current = *point;
    for _ in 0..count {
        res.push(current);
        current = current.add_vartime(&double);
    }
    res
}

/// Width-`w` non-adjacent form: every non-zero digit is odd and below `2^(w-1)` in absolute value,
/// and any `w` consecutive digits contain at most one non-zero one.
fn wnaf(k: &Scalar, width: usize) -> [i32; WNAF_LEN] {
    let mut digits = [0i32; WNAF_LEN];
    let limbs = k.limbs();
    let mut carry = 0u32;
    let mut bit = 0;
    while bit < WNAF_LEN {
        if limbs::get_bits_vartime(limbs, bit, 1) == carry {
            bit += 1;
            continue;
        }
        let now = width.min(WNAF_LEN - bit);
        let mut word = limbs::get_bits_vartime(limbs, bit, now) as i32 + carry as i32;
        carry = ((word >> (width - 1)) & 1) as u32;
        word -= (carry << width) as i32;
        if let Some(digit) = digits.get_mut(bit) {
            *digit = word;
        }
        bit += now;
    }
    digits
}

/// Looks up `digit * P` from a table of odd multiples.
fn lookup_odd<T: Copy>(table: &[T], digit: i32, negate: impl Fn(&T) -> T) -> T {
    let index = (digit.unsigned_abs() as usize - 1) / 2;
    let entry = *table
        .get(index)
        .expect("wNAF digits are bounded by the table width");
    if digit < 0 {
        negate(&entry)
    } else {
        entry
    }
}

/// Computes `a * point + b * G` in variable time (Strauss-Shamir with wNAF digits).
pub(crate) fn mul_add_generator_vartime(
    generator_odd: &[AffinePoint],
    a: &Scalar,
    point: &ProjectivePoint,
    b: &Scalar,
) -> ProjectivePoint {
    let point_table = odd_multiples(point, WNAF_WIDTH_POINT);
    let point_digits = wnaf(a, WNAF_WIDTH_POINT);
    let generator_digits = wnaf(b, WNAF_WIDTH_GENERATOR);

    let top = (0..WNAF_LEN)
        .rev()
        .find(|&i| point_digits.get(i) != Some(&0) || generator_digits.get(i) != Some(&0));
    let top = match top {
        Some(top) => top,
        None => return ProjectivePoint::IDENTITY,
    };

    let mut res = ProjectivePoint::IDENTITY;
    for i in (0..=top).rev() {
        res = res.double();
        let point_digit = point_digits.get(i).copied().unwrap_or(0);
        if point_digit != 0 {
            res = res.add_vartime(&lookup_odd(&point_table, point_digit, ProjectivePoint::negate));
        }
        let generator_digit = generator_digits.get(i).copied().unwrap_or(0);
        if generator_digit != 0 {
            res = res.add_mixed_vartime(&lookup_odd(generator_odd, generator_digit, AffinePoint::negate));
        }
    }
    res
}

/// Computes `k * point` in variable time.
pub(crate) fn mul_vartime(point: &ProjectivePoint, k: &Scalar) -> ProjectivePoint {
    mul_add_generator_vartime(&[], k, point, &Scalar::ZERO)
}
