//! Constant-time condition kit.
//!
//! Branch-free select, compare, conditional move and conditional swap over
//! limbs and byte slices. These helpers are used wherever a secret-dependent
//! branch would otherwise exist: Montgomery-ladder steps, final reduction
//! subtractions, OAEP padding checks and Fujisaki–Okamoto re-encryption
//! comparisons.
//!
//! All functions process their entire input regardless of the outcome; no
//! early exits, no secret-indexed table lookups.

use crate::core::limb::Limb;

/// Expands a boolean condition (0 or 1) into an all-zeros / all-ones mask.
#[inline(always)]
pub fn mask<L: Limb>(condition: L) -> L {
    condition.wrapping_neg()
}

/// Constant-time select: returns `a` if `condition == 1`, `b` otherwise.
#[inline(always)]
pub fn select<L: Limb>(condition: L, a: L, b: L) -> L {
    let m = mask(condition);
    (a & m) | (b & !m)
}

/// Constant-time equality of two limbs, returning 1 on equality.
#[inline(always)]
pub fn eq<L: Limb>(a: L, b: L) -> L {
    let x = (a ^ b).to_u64();
    // Folds any non-zero value down to the top bit, then extracts it.
    let folded = x | x.wrapping_neg();
    L::from_u64((folded >> 63) ^ 1)
}

/// Constant-time `a < b` over limbs, returning 1 when true.
#[inline(always)]
pub fn lt<L: Limb>(a: L, b: L) -> L {
    let a = a.to_u64();
    let b = b.to_u64();
    L::from_u64((a ^ ((a ^ b) | (a.wrapping_sub(b) ^ b))) >> 63)
}

/// Constant-time conditional move: overwrites `dst` with `src` when
/// `condition == 1`, leaves it untouched otherwise.
pub fn cmov<L: Limb>(condition: L, dst: &mut [L], src: &[L]) {
    debug_assert_eq!(dst.len(), src.len());
    let m = mask(condition);

    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d = (*d & !m) | (*s & m);
    }
}

/// Constant-time conditional swap of two equal-length limb slices.
pub fn cswap<L: Limb>(condition: L, a: &mut [L], b: &mut [L]) {
    debug_assert_eq!(a.len(), b.len());
    let m = mask(condition);

    for (x, y) in a.iter_mut().zip(b.iter_mut()) {
        let t = (*x ^ *y) & m;
        *x = *x ^ t;
        *y = *y ^ t;
    }
}

/// Constant-time byte-slice equality, returning 1 when equal.
///
/// Both slices are read in full; the running difference is OR-accumulated
/// and collapsed only at the end.
pub fn bytes_eq(a: &[u8], b: &[u8]) -> u8 {
    if a.len() != b.len() {
        return 0;
    }

    let acc = a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    eq::<u8>(acc, 0)
}

/// Constant-time conditional byte-buffer replacement.
///
/// Copies `src` over `dst` when `condition == 1`. Used by the KEM
/// decapsulation paths to substitute the rejection key without branching.
pub fn bytes_cmov(condition: u8, dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len());
    let m = condition.wrapping_neg();

    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d = (*d & !m) | (*s & m);
    }
}

/// Wipes a byte buffer.
///
/// The write is routed through a volatile pointer so the compiler cannot
/// elide it when the buffer is about to be dropped.
pub fn scrub(buf: &mut [u8]) {
    for b in buf.iter_mut() {
        unsafe { core::ptr::write_volatile(b, 0) };
    }
}

/// Wipes a limb buffer through a volatile pointer.
pub fn scrub_limbs<L: Limb>(buf: &mut [L]) {
    for l in buf.iter_mut() {
        unsafe { core::ptr::write_volatile(l, L::ZERO) };
    }
}
