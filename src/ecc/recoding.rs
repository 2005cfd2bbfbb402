//! Scalar recoding for scalar multiplication.
//!
//! Consumes a big-endian byte string representing a non-negative integer
//! and produces one symbol per step under the chosen encoding. The step
//! count is known before the first pull so the consumer can size its
//! accumulator and precomputation table.
//!
//! - **Binary**: bits MSB-first starting at the leading one.
//! - **NAF-w** (w ∈ 2..=7): signed odd digits, average density 1/(w+1).
//! - **Windowed-w** (w ∈ 2..=8): unsigned base-2^w digits, MSB first.
//! - **Ladder**: the raw bit stream over the full byte length, leading
//!   zeros included, for the Montgomery ladder.

use crate::core::mpz::Mpz;
use crate::error::{Error, Result};

/// Recoding selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recoding {
    /// Plain double-and-add bits.
    Binary,
    /// Width-w non-adjacent form.
    NafW(u32),
    /// Width-w unsigned windows.
    WindowW(u32),
    /// Raw bits for the Montgomery ladder.
    Ladder,
}

/// One recoded step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    /// Digit magnitude.
    pub digit: u32,
    /// True when no accumulation happens this step.
    pub is_zero: bool,
    /// True when the precomputed multiple is subtracted.
    pub is_subtract: bool,
}

/// Symbol producer over a recoded scalar.
#[derive(Debug, Clone)]
pub struct Recoder {
    symbols: Vec<Symbol>,
    next: usize,
}

impl Recoder {
    /// Recodes a big-endian scalar under the chosen encoding.
    ///
    /// Binary, NAF and windowed encodings require a non-zero scalar whose
    /// leading symbol is non-zero; a zero scalar fails with
    /// [`Error::RecodingError`].
    pub fn new(coding: Recoding, scalar_be: &[u8]) -> Result<Self> {
        let symbols = match coding {
            Recoding::Binary => Self::recode_binary(scalar_be)?,
            Recoding::NafW(w) => Self::recode_naf(scalar_be, w)?,
            Recoding::WindowW(w) => Self::recode_window(scalar_be, w)?,
            Recoding::Ladder => Self::recode_ladder(scalar_be),
        };
        Ok(Self { symbols, next: 0 })
    }

    /// Number of steps, available before the first pull.
    pub fn steps(&self) -> usize {
        self.symbols.len()
    }

    /// Pulls the next symbol.
    pub fn pull(&mut self) -> Option<Symbol> {
        let s = self.symbols.get(self.next).copied();
        self.next += 1;
        s
    }

    fn recode_binary(scalar_be: &[u8]) -> Result<Vec<Symbol>> {
        let n: Mpz<u64> = Mpz::from_bytes(scalar_be, crate::core::mpz::ByteOrder::BigEndian);
        let bits = n.bit_length();
        if bits == 0 {
            return Err(Error::RecodingError);
        }

        // MSB first, starting from the single leading one.
        Ok((0..bits)
            .rev()
            .map(|i| {
                let b = n.get_bit(i);
                Symbol { digit: b as u32, is_zero: b == 0, is_subtract: false }
            })
            .collect())
    }

    fn recode_naf(scalar_be: &[u8], w: u32) -> Result<Vec<Symbol>> {
        if !(2..=7).contains(&w) {
            return Err(Error::RecodingError);
        }

        let mut n: Mpz<u64> = Mpz::from_bytes(scalar_be, crate::core::mpz::ByteOrder::BigEndian);
        if n.is_zero() {
            return Err(Error::RecodingError);
        }

        let modulus = 1u64 << w;
        let half = 1i64 << (w - 1);

        // Right-to-left signed-digit extraction, reversed at the end.
        let mut digits: Vec<i64> = Vec::new();
        while !n.is_zero() {
            if n.is_odd() {
                let low = (n.to_u64() % modulus) as i64;
                let d = if low >= half { low - modulus as i64 } else { low };
                digits.push(d);

                if d >= 0 {
                    n = n.sub_ref(&Mpz::from_u64(d as u64));
                } else {
                    n = n.add_ref(&Mpz::from_u64((-d) as u64));
                }
            } else {
                digits.push(0);
            }
            n = n.shr_bits(1);
        }

        Ok(digits
            .into_iter()
            .rev()
            .map(|d| Symbol {
                digit: d.unsigned_abs() as u32,
                is_zero: d == 0,
                is_subtract: d < 0,
            })
            .collect())
    }

    fn recode_window(scalar_be: &[u8], w: u32) -> Result<Vec<Symbol>> {
        if !(2..=8).contains(&w) {
            return Err(Error::RecodingError);
        }

        let n: Mpz<u64> = Mpz::from_bytes(scalar_be, crate::core::mpz::ByteOrder::BigEndian);
        let bits = n.bit_length();
        if bits == 0 {
            return Err(Error::RecodingError);
        }

        let steps = bits.div_ceil(w as usize);
        let mut symbols = Vec::with_capacity(steps);
        for s in (0..steps).rev() {
            let mut d = 0u32;
            for bit in (0..w as usize).rev() {
                let i = s * w as usize + bit;
                d = (d << 1) | n.get_bit(i) as u32;
            }
            symbols.push(Symbol { digit: d, is_zero: d == 0, is_subtract: false });
        }

        Ok(symbols)
    }

    fn recode_ladder(scalar_be: &[u8]) -> Vec<Symbol> {
        scalar_be
            .iter()
            .flat_map(|&byte| {
                (0..8).rev().map(move |i| {
                    let b = (byte >> i) & 1;
                    Symbol { digit: b as u32, is_zero: b == 0, is_subtract: false }
                })
            })
            .collect()
    }
}

impl Iterator for Recoder {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        self.pull()
    }
}

/// Precomputed multiples required by an encoding: the number of odd
/// multiples for NAF-w, the full table size for windowed-w.
pub fn table_size(coding: Recoding) -> usize {
    match coding {
        Recoding::Binary | Recoding::Ladder => 1,
        Recoding::NafW(w) => 1 << (w - 2),
        Recoding::WindowW(w) => 1 << w,
    }
}
