//! Binary-field arithmetic over GF(2^n).
//!
//! Field elements are multiple-precision magnitudes interpreted as
//! polynomials with coefficients in {0, 1}; addition is XOR. The field
//! modulus is carried in sparse "modulus-bits" form: the descending list of
//! non-zero bit positions, which is three entries for a trinomial and five
//! for a pentanomial — the only shapes the supported curves use.
//!
//! Multiplication composes a 2×2-word Karatsuba step from a primitive
//! 1×1-word multiplier built on a masked shift-and-XOR accumulator;
//! squaring spreads each byte through a Morton bit-interleave table;
//! reduction folds the upper words back through the sparse modulus.
//! All three run a fixed schedule of word operations for a given operand
//! size. Inversion is the extended binary Euclidean algorithm and operates
//! on public curve data only.

use crate::core::limb::Limb;
use crate::core::mpz::Mpz;
use crate::error::{Error, Result};

/// Morton bit-interleave table: byte `b` maps to the 16-bit value with the
/// bits of `b` spread to even positions (bit i → bit 2i).
const MORTON: [u16; 256] = build_morton();

const fn build_morton() -> [u16; 256] {
    let mut lut = [0u16; 256];
    let mut i = 0usize;
    while i < 256 {
        let mut v = 0u16;
        let mut bit = 0u32;
        while bit < 8 {
            v |= (((i >> bit) & 1) as u16) << (2 * bit);
            bit += 1;
        }
        lut[i] = v;
        i += 1;
    }
    lut
}

/// A binary-field modulus in sparse form.
#[derive(Debug, Clone)]
pub struct Gf2nContext {
    /// Non-zero bit positions, strictly descending; `bits[0]` is the field
    /// degree and the final entry is 0.
    bits: Vec<usize>,
}

impl Gf2nContext {
    /// Builds a context from the descending list of modulus bit positions.
    ///
    /// The list must contain at least the leading and trailing terms
    /// (`x^n + … + 1`).
    pub fn new(bits: &[usize]) -> Result<Self> {
        if bits.len() < 2 || bits.windows(2).any(|w| w[0] <= w[1]) || bits.last() != Some(&0) {
            return Err(Error::InvalidParameterSet);
        }
        Ok(Self { bits: bits.to_vec() })
    }

    /// The field degree `n`.
    pub fn degree(&self) -> usize {
        self.bits[0]
    }

    /// The sparse modulus-bit positions.
    pub fn modulus_bits(&self) -> &[usize] {
        &self.bits
    }

    /// The modulus as a dense polynomial.
    pub fn modulus<L: Limb>(&self) -> Mpz<L> {
        let mut m = Mpz::new();
        for &p in &self.bits {
            m.set_bit(p);
        }
        m
    }

    /// Field addition (polynomial XOR).
    pub fn add<L: Limb>(&self, a: &Mpz<L>, b: &Mpz<L>) -> Mpz<L> {
        let (long, short) = if a.limbs().len() >= b.limbs().len() {
            (a.limbs(), b.limbs())
        } else {
            (b.limbs(), a.limbs())
        };

        let mut out = long.to_vec();
        for (o, &s) in out.iter_mut().zip(short.iter()) {
            *o = *o ^ s;
        }
        Mpz::from_limbs(out, false)
    }

    /// Field multiplication with reduction.
    pub fn mul<L: Limb>(&self, a: &Mpz<L>, b: &Mpz<L>) -> Mpz<L> {
        let words = self
            .degree()
            .div_ceil(L::BITS as usize)
            .max(a.limbs().len())
            .max(b.limbs().len());
        let prod = mul_poly(a.limbs(), b.limbs(), words);
        self.reduce_words(prod)
    }

    /// Field squaring via the Morton interleave table.
    pub fn sqr<L: Limb>(&self, a: &Mpz<L>) -> Mpz<L> {
        let mut out = Vec::with_capacity(2 * a.limbs().len());
        for &w in a.limbs() {
            let (lo, hi) = square_word(w);
            out.push(lo);
            out.push(hi);
        }
        self.reduce_words(out)
    }

    /// Reduces an arbitrary polynomial to degree `< n`.
    pub fn reduce<L: Limb>(&self, a: &Mpz<L>) -> Mpz<L> {
        self.reduce_words(a.limbs().to_vec())
    }

    /// Sparse-modulus folding.
    ///
    /// Every bit position from the top of the buffer down to the field
    /// degree is visited in a fixed order; the fold of each bit is applied
    /// through an all-or-nothing mask so the word-operation schedule does
    /// not depend on the polynomial's value.
    fn reduce_words<L: Limb>(&self, mut a: Vec<L>) -> Mpz<L> {
        let deg = self.degree();
        let top = a.len() * L::BITS as usize;

        for j in (deg..top).rev() {
            let word = j / L::BITS as usize;
            let shift = j as u32 % L::BITS;
            let bit = (a[word] >> shift) & L::ONE;
            let m = bit.wrapping_neg();

            // Clear bit j and fold it onto j - n + p for every modulus term.
            a[word] = a[word] ^ (bit << shift);
            for &p in &self.bits[1..] {
                let dst = j - deg + p;
                let dw = dst / L::BITS as usize;
                let ds = dst as u32 % L::BITS;
                a[dw] = a[dw] ^ ((m & L::ONE) << ds);
            }
        }

        a.truncate(deg.div_ceil(L::BITS as usize));
        Mpz::from_limbs(a, false)
    }

    /// Field inversion by the extended binary Euclidean algorithm.
    ///
    /// Maintains `(u, v, g1, g2)` with `u·g1 ≡ a` and `v·g2 ≡ a` modulo the
    /// field polynomial, shrinking `deg(u) + deg(v)` each step. Fails with
    /// [`Error::NonInvertible`] when the gcd is not 1 (only possible for
    /// the zero element in a field).
    pub fn invert<L: Limb>(&self, a: &Mpz<L>) -> Result<Mpz<L>> {
        if a.is_zero() {
            return Err(Error::NonInvertible);
        }

        let mut u = self.reduce(a);
        let mut v = self.modulus::<L>();
        let mut g1 = Mpz::from_u64(1);
        let mut g2 = Mpz::new();

        while !u.is_one() {
            if u.is_zero() {
                return Err(Error::NonInvertible);
            }

            let mut j = u.bit_length() as isize - v.bit_length() as isize;
            if j < 0 {
                core::mem::swap(&mut u, &mut v);
                core::mem::swap(&mut g1, &mut g2);
                j = -j;
            }

            u = self.add(&u, &v.shl_bits(j as usize));
            g1 = self.add(&g1, &g2.shl_bits(j as usize));
        }

        Ok(self.reduce(&g1))
    }
}

/// Interleaves one word into its square's two output words.
fn square_word<L: Limb>(w: L) -> (L, L) {
    let half_bytes = L::byte_len() / 2;
    let mut lo = L::ZERO;
    let mut hi = L::ZERO;

    if L::BITS == 8 {
        // A byte squares into 16 bits split across two bytes.
        let spread = MORTON[w.to_u8() as usize];
        return (L::from_u64(spread as u64 & 0xff), L::from_u64((spread >> 8) as u64));
    }

    for i in 0..half_bytes {
        let b = (w >> (8 * i as u32)).to_u8();
        lo = lo | (L::from_u64(MORTON[b as usize] as u64) << (16 * i as u32));
    }
    for i in 0..half_bytes {
        let b = (w >> (8 * (half_bytes + i) as u32)).to_u8();
        hi = hi | (L::from_u64(MORTON[b as usize] as u64) << (16 * i as u32));
    }
    (lo, hi)
}

/// Primitive 1×1-word carry-less multiplier.
///
/// Classical right-to-left shift-and-XOR accumulation: for each bit of `b`
/// the shifted copy of `a` is folded in under an all-or-nothing mask, so
/// the operation sequence is identical for all inputs.
fn mul_1x1<L: Limb>(a: L, b: L) -> (L, L) {
    let mut lo = L::ZERO;
    let mut hi = L::ZERO;

    for i in 0..L::BITS {
        let m = ((b >> i) & L::ONE).wrapping_neg();
        lo = lo ^ ((a << i) & m);
        if i != 0 {
            hi = hi ^ ((a >> (L::BITS - i)) & m);
        }
    }

    (lo, hi)
}

/// 2×2-word Karatsuba step over the 1×1 multiplier.
///
/// Three word products replace four; the middle term is recovered from
/// `(a0 ⊕ a1)(b0 ⊕ b1)` by cancelling the outer products.
fn mul_2x2<L: Limb>(a0: L, a1: L, b0: L, b1: L) -> [L; 4] {
    let (l0, h0) = mul_1x1(a0, b0);
    let (l2, h2) = mul_1x1(a1, b1);
    let (lm, hm) = mul_1x1(a0 ^ a1, b0 ^ b1);

    let mid_lo = lm ^ l0 ^ l2;
    let mid_hi = hm ^ h0 ^ h2;

    [l0, h0 ^ mid_lo, l2 ^ mid_hi, h2]
}

/// Carry-less polynomial product of two operands padded to `words` limbs.
fn mul_poly<L: Limb>(a: &[L], b: &[L], words: usize) -> Vec<L> {
    // Round up to a whole number of 2-word blocks.
    let blocks = words.div_ceil(2);
    let padded = blocks * 2;

    let mut av = a.to_vec();
    let mut bv = b.to_vec();
    av.resize(padded, L::ZERO);
    bv.resize(padded, L::ZERO);

    let mut out = vec![L::ZERO; 2 * padded];
    for i in 0..blocks {
        for j in 0..blocks {
            let part = mul_2x2(av[2 * i], av[2 * i + 1], bv[2 * j], bv[2 * j + 1]);
            let base = 2 * (i + j);
            for (k, &p) in part.iter().enumerate() {
                out[base + k] = out[base + k] ^ p;
            }
        }
    }

    out
}
