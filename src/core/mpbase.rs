//! Unsigned multiple-precision arithmetic on limb vectors.
//!
//! Numbers are magnitudes stored little-endian by limb: a slice
//! `[l0, l1, .., lk]` represents `Σ li · 2^(B·i)` where `B` is the limb
//! width. The canonical form carries no trailing zero limb; the empty slice
//! is zero. Callers of the in-place primitives guarantee output capacity.
//!
//! Multiplication switches from the schoolbook routine to Karatsuba above
//! [`KARATSUBA_THRESHOLD`] limbs; division is Knuth's Algorithm D with
//! divisor normalisation; GCD is the binary algorithm whose iteration count
//! is bounded by the operands' bit lengths.

use core::cmp::Ordering;

use crate::core::limb::Limb;

/// Operand size, in limbs, above which multiplication uses Karatsuba.
///
/// Any monotone cut-over is acceptable; this one keeps the recursion out of
/// the small operands produced by the EC and lattice layers.
pub const KARATSUBA_THRESHOLD: usize = 24;

/// Strips trailing zero limbs, restoring the canonical form.
pub fn normalize<L: Limb>(v: &mut Vec<L>) {
    while let Some(&last) = v.last() {
        if last != L::ZERO {
            break;
        }
        v.pop();
    }
}

/// Returns true when the magnitude is zero.
#[inline]
pub fn is_zero<L: Limb>(v: &[L]) -> bool {
    v.is_empty()
}

/// Compares two canonical magnitudes.
pub fn cmp<L: Limb>(a: &[L], b: &[L]) -> Ordering {
    if a.len() != b.len() {
        return a.len().cmp(&b.len());
    }

    for (x, y) in a.iter().rev().zip(b.iter().rev()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    Ordering::Equal
}

/// Bit length of a canonical magnitude (zero has length 0).
pub fn bit_length<L: Limb>(a: &[L]) -> usize {
    match a.last() {
        None => 0,
        Some(&top) => a.len() * L::BITS as usize - top.leading_zeros() as usize,
    }
}

/// Reads bit `i` of the magnitude.
pub fn get_bit<L: Limb>(a: &[L], i: usize) -> u8 {
    let limb = i / L::BITS as usize;
    if limb >= a.len() {
        return 0;
    }
    ((a[limb] >> (i as u32 % L::BITS)) & L::ONE).to_u8()
}

/// Sets bit `i` of the magnitude, growing the vector as required.
pub fn set_bit<L: Limb>(a: &mut Vec<L>, i: usize) {
    let limb = i / L::BITS as usize;
    if limb >= a.len() {
        a.resize(limb + 1, L::ZERO);
    }
    a[limb] = a[limb] | (L::ONE << (i as u32 % L::BITS));
}

/// Adds two magnitudes.
pub fn add<L: Limb>(a: &[L], b: &[L]) -> Vec<L> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = Vec::with_capacity(long.len() + 1);
    let mut carry = L::ZERO;

    for i in 0..long.len() {
        let rhs = if i < short.len() { short[i] } else { L::ZERO };
        let (s, c) = long[i].adc(rhs, carry);
        out.push(s);
        carry = c;
    }

    if carry != L::ZERO {
        out.push(carry);
    }

    out
}

/// In-place addition `r += a`, returning the outgoing carry.
///
/// `r` must be at least as long as `a`.
pub fn add_into<L: Limb>(r: &mut [L], a: &[L]) -> L {
    debug_assert!(r.len() >= a.len());
    let mut carry = L::ZERO;

    for (i, ri) in r.iter_mut().enumerate() {
        let rhs = if i < a.len() { a[i] } else { L::ZERO };
        let (s, c) = ri.adc(rhs, carry);
        *ri = s;
        carry = c;
        if i >= a.len() && carry == L::ZERO {
            break;
        }
    }

    carry
}

/// Subtracts `b` from `a`, requiring `a >= b`. Returns the canonical
/// difference.
pub fn sub<L: Limb>(a: &[L], b: &[L]) -> Vec<L> {
    debug_assert!(cmp(a, b) != Ordering::Less);
    let mut out = Vec::with_capacity(a.len());
    let mut borrow = L::ZERO;

    for i in 0..a.len() {
        let rhs = if i < b.len() { b[i] } else { L::ZERO };
        let (d, br) = a[i].sbb(rhs, borrow);
        out.push(d);
        borrow = br;
    }

    debug_assert_eq!(borrow, L::ZERO);
    normalize(&mut out);
    out
}

/// In-place subtraction `r -= a`, returning the outgoing borrow.
pub fn sub_into<L: Limb>(r: &mut [L], a: &[L]) -> L {
    debug_assert!(r.len() >= a.len());
    let mut borrow = L::ZERO;

    for (i, ri) in r.iter_mut().enumerate() {
        let rhs = if i < a.len() { a[i] } else { L::ZERO };
        let (d, br) = ri.sbb(rhs, borrow);
        *ri = d;
        borrow = br;
        if i >= a.len() && borrow == L::ZERO {
            break;
        }
    }

    borrow
}

/// Schoolbook product of two magnitudes.
fn mul_schoolbook<L: Limb>(a: &[L], b: &[L]) -> Vec<L> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let mut out = vec![L::ZERO; a.len() + b.len()];

    for (i, &ai) in a.iter().enumerate() {
        let mut carry = L::ZERO;
        for (j, &bj) in b.iter().enumerate() {
            let (hi, lo) = ai.mac(bj, out[i + j], carry);
            out[i + j] = lo;
            carry = hi;
        }
        out[i + b.len()] = carry;
    }

    normalize(&mut out);
    out
}

/// Karatsuba product, splitting at half the shorter operand.
fn mul_karatsuba<L: Limb>(a: &[L], b: &[L]) -> Vec<L> {
    let split = a.len().min(b.len()) / 2;
    let (a0, a1) = a.split_at(split);
    let (b0, b1) = b.split_at(split);

    let mut a0 = a0.to_vec();
    let mut b0 = b0.to_vec();
    normalize(&mut a0);
    normalize(&mut b0);

    let z0 = mul(&a0, &b0);
    let z2 = mul(a1, b1);

    // z1 = (a0 + a1)(b0 + b1) - z0 - z2
    let sa = add(&a0, a1);
    let sb = add(&b0, b1);
    let mut z1 = mul(&sa, &sb);
    z1 = sub(&z1, &z0);
    z1 = sub(&z1, &z2);

    let mut out = vec![L::ZERO; a.len() + b.len()];
    out[..z0.len()].copy_from_slice(&z0);
    let carry = add_into(&mut out[split..], &z1);
    debug_assert_eq!(carry, L::ZERO);
    let carry = add_into(&mut out[2 * split..], &z2);
    debug_assert_eq!(carry, L::ZERO);

    normalize(&mut out);
    out
}

/// Product of two magnitudes, selecting schoolbook or Karatsuba by size.
pub fn mul<L: Limb>(a: &[L], b: &[L]) -> Vec<L> {
    if a.len().min(b.len()) < KARATSUBA_THRESHOLD {
        mul_schoolbook(a, b)
    } else {
        mul_karatsuba(a, b)
    }
}

/// Squares a magnitude using doubled cross products.
///
/// The off-diagonal products `a[i]·a[j]` for `i < j` are computed once and
/// doubled, then the diagonal `a[i]²` terms are accumulated.
pub fn sqr<L: Limb>(a: &[L]) -> Vec<L> {
    if a.is_empty() {
        return Vec::new();
    }
    if a.len() >= KARATSUBA_THRESHOLD {
        return mul_karatsuba(a, a);
    }

    let n = a.len();
    let mut out = vec![L::ZERO; 2 * n];

    // Off-diagonal cross products.
    for i in 0..n {
        let mut carry = L::ZERO;
        for j in (i + 1)..n {
            let (hi, lo) = a[i].mac(a[j], out[i + j], carry);
            out[i + j] = lo;
            carry = hi;
        }
        out[i + n] = carry;
    }

    // Double, then add the diagonal terms.
    let mut carry = L::ZERO;
    for limb in out.iter_mut() {
        let top = *limb >> (L::BITS - 1);
        *limb = (*limb << 1) | carry;
        carry = top;
    }

    let mut carry = L::ZERO;
    for i in 0..n {
        let (hi, lo) = a[i].mul_wide(a[i]);
        let (s, c1) = out[2 * i].adc(lo, carry);
        out[2 * i] = s;
        let (s, c2) = out[2 * i + 1].adc(hi, c1);
        out[2 * i + 1] = s;
        carry = c2;
    }
    debug_assert_eq!(carry, L::ZERO);

    normalize(&mut out);
    out
}

/// Left shift by an arbitrary non-negative bit count.
pub fn shl<L: Limb>(a: &[L], bits: usize) -> Vec<L> {
    if a.is_empty() {
        return Vec::new();
    }

    let limb_shift = bits / L::BITS as usize;
    let bit_shift = (bits % L::BITS as usize) as u32;
    let mut out = vec![L::ZERO; a.len() + limb_shift + 1];

    if bit_shift == 0 {
        out[limb_shift..limb_shift + a.len()].copy_from_slice(a);
    } else {
        let mut carry = L::ZERO;
        for (i, &limb) in a.iter().enumerate() {
            out[limb_shift + i] = (limb << bit_shift) | carry;
            carry = limb >> (L::BITS - bit_shift);
        }
        out[limb_shift + a.len()] = carry;
    }

    normalize(&mut out);
    out
}

/// Right shift by an arbitrary non-negative bit count.
pub fn shr<L: Limb>(a: &[L], bits: usize) -> Vec<L> {
    let limb_shift = bits / L::BITS as usize;
    if limb_shift >= a.len() {
        return Vec::new();
    }

    let bit_shift = (bits % L::BITS as usize) as u32;
    let src = &a[limb_shift..];
    let mut out = vec![L::ZERO; src.len()];

    if bit_shift == 0 {
        out.copy_from_slice(src);
    } else {
        for i in 0..src.len() {
            let hi = if i + 1 < src.len() {
                src[i + 1] << (L::BITS - bit_shift)
            } else {
                L::ZERO
            };
            out[i] = (src[i] >> bit_shift) | hi;
        }
    }

    normalize(&mut out);
    out
}

/// Quotient and remainder with `q·d + r = n` and `0 <= r < d`.
///
/// Knuth Algorithm D: the divisor is normalised so its top bit is set, the
/// quotient digits are estimated from the top two dividend limbs and
/// corrected at most twice, and the remainder is denormalised on the way
/// out. Single-limb divisors take a short path.
pub fn divrem<L: Limb>(n: &[L], d: &[L]) -> (Vec<L>, Vec<L>) {
    assert!(!d.is_empty(), "division by zero magnitude");

    if cmp(n, d) == Ordering::Less {
        return (Vec::new(), n.to_vec());
    }

    if d.len() == 1 {
        let mut q = vec![L::ZERO; n.len()];
        let mut rem = L::ZERO;
        for i in (0..n.len()).rev() {
            let (qi, r) = L::div_wide(rem, n[i], d[0]);
            q[i] = qi;
            rem = r;
        }
        normalize(&mut q);
        let r = if rem == L::ZERO { Vec::new() } else { vec![rem] };
        return (q, r);
    }

    // Normalise so the divisor's most significant bit is set.
    let shift = d.last().unwrap().leading_zeros() as usize;
    let mut u = shl(n, shift);
    let v = shl(d, shift);
    let m = u.len();
    let t = v.len();
    u.push(L::ZERO);

    let mut q = vec![L::ZERO; m - t + 1];
    let v_top = v[t - 1];
    let v_next = v[t - 2];

    for j in (0..=(m - t)).rev() {
        // Estimate the quotient digit from the top two dividend limbs.
        // When the top limbs are equal the digit saturates and the
        // estimated remainder is u[j+t-1] + v_top, which may already
        // overflow a limb.
        let (mut qhat, mut rhat, mut rhat_in_range) = if u[j + t] >= v_top {
            let (r, c) = u[j + t - 1].adc(v_top, L::ZERO);
            (L::MAX, r, c == L::ZERO)
        } else {
            let (q, r) = L::div_wide(u[j + t], u[j + t - 1], v_top);
            (q, r, true)
        };

        // At most two corrections bring qhat within one of the true digit.
        while rhat_in_range {
            let (hi, lo) = qhat.mul_wide(v_next);
            if (hi, lo) > (rhat, u[j + t - 2]) {
                qhat = qhat.wrapping_sub(L::ONE);
                let (nr, c) = rhat.adc(v_top, L::ZERO);
                rhat = nr;
                rhat_in_range = c == L::ZERO;
            } else {
                break;
            }
        }

        // u[j..j+t+1] -= qhat * v
        let mut borrow = L::ZERO;
        let mut mul_carry = L::ZERO;
        for i in 0..t {
            let (hi, lo) = qhat.mac(v[i], mul_carry, L::ZERO);
            mul_carry = hi;
            let (diff, br) = u[j + i].sbb(lo, borrow);
            u[j + i] = diff;
            borrow = br;
        }
        let (diff, br) = u[j + t].sbb(mul_carry, borrow);
        u[j + t] = diff;

        if br != L::ZERO {
            // Estimate was one too large: add the divisor back.
            qhat = qhat.wrapping_sub(L::ONE);
            let mut carry = L::ZERO;
            for i in 0..t {
                let (s, c) = u[j + i].adc(v[i], carry);
                u[j + i] = s;
                carry = c;
            }
            u[j + t] = u[j + t].wrapping_add(carry);
        }

        q[j] = qhat;
    }

    u.truncate(t);
    normalize(&mut u);
    let r = shr(&u, shift);
    normalize(&mut q);
    (q, r)
}

/// Binary GCD of two magnitudes.
///
/// Runs in time bounded by the combined bit length of the inputs; the loop
/// structure depends only on bit lengths, not on the values' factorisation.
pub fn gcd<L: Limb>(a: &[L], b: &[L]) -> Vec<L> {
    if is_zero(a) {
        return b.to_vec();
    }
    if is_zero(b) {
        return a.to_vec();
    }

    let mut u = a.to_vec();
    let mut v = b.to_vec();

    let tz = |x: &[L]| -> usize {
        let mut n = 0;
        for &limb in x.iter() {
            if limb == L::ZERO {
                n += L::BITS as usize;
            } else {
                n += limb.trailing_zeros() as usize;
                break;
            }
        }
        n
    };

    let shift = tz(&u).min(tz(&v));
    u = shr(&u, tz(&u));
    v = shr(&v, tz(&v));

    while !is_zero(&v) {
        if cmp(&u, &v) == Ordering::Greater {
            core::mem::swap(&mut u, &mut v);
        }
        v = sub(&v, &u);
        if !is_zero(&v) {
            v = shr(&v, tz(&v));
        }
    }

    shl(&u, shift)
}
