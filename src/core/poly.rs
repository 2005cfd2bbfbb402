//! Fixed-length polynomial rings with small coefficients.
//!
//! Two coefficient domains serve the lattice schemes:
//!
//! - `i32` coefficients modulo an odd prime `q` (Kyber, Dilithium), with
//!   coefficient-wise helpers, centering and norms. Products in this domain
//!   go through the NTT engine.
//! - `u16` coefficients modulo a power of two (Saber), where products use
//!   the Toom-Cook 4-way evaluation at {0, ±1, ±2, ±1/2, ∞} with Karatsuba
//!   at quarter length. The interpolation divides by 3, 9 and 15 by
//!   multiplying with their precomputed inverses modulo 2^16, so the result
//!   is exact modulo 2^13 — sufficient for every Saber modulus.
//!
//! Negacyclic reduction modulo `x^N + 1` folds the upper half of the
//! double-length product into the lower half by subtraction.

/// 3⁻¹ mod 2^16.
const INV3: u16 = 43691;
/// 9⁻¹ mod 2^16.
const INV9: u16 = 36409;
/// 15⁻¹ mod 2^16.
const INV15: u16 = 61167;

/// Coefficient-wise wrapping addition, `r[i] += a[i]`.
pub fn add(r: &mut [i32], a: &[i32]) {
    for (x, &y) in r.iter_mut().zip(a.iter()) {
        *x = x.wrapping_add(y);
    }
}

/// Coefficient-wise wrapping subtraction, `r[i] -= a[i]`.
pub fn sub(r: &mut [i32], a: &[i32]) {
    for (x, &y) in r.iter_mut().zip(a.iter()) {
        *x = x.wrapping_sub(y);
    }
}

/// Coefficient-wise negation.
pub fn neg(r: &mut [i32]) {
    for x in r.iter_mut() {
        *x = x.wrapping_neg();
    }
}

/// Coefficient-wise scalar multiplication.
pub fn scalar_mul(r: &mut [i32], s: i32) {
    for x in r.iter_mut() {
        *x = x.wrapping_mul(s);
    }
}

/// Canonical residue of a single coefficient in `[0, q)`.
#[inline]
pub fn coeff_mod(a: i32, q: i32) -> i32 {
    let r = a % q;
    r + ((r >> 31) & q)
}

/// Maps every coefficient into `[0, q)`.
pub fn reduce_mod(r: &mut [i32], q: i32) {
    for x in r.iter_mut() {
        *x = coeff_mod(*x, q);
    }
}

/// Modular addition into `[0, q)`.
pub fn add_mod(r: &mut [i32], a: &[i32], q: i32) {
    for (x, &y) in r.iter_mut().zip(a.iter()) {
        *x = coeff_mod(x.wrapping_add(y), q);
    }
}

/// Modular subtraction into `[0, q)`.
pub fn sub_mod(r: &mut [i32], a: &[i32], q: i32) {
    for (x, &y) in r.iter_mut().zip(a.iter()) {
        *x = coeff_mod(x.wrapping_sub(y), q);
    }
}

/// Centers a canonical coefficient into `(-q/2, q/2]`.
#[inline]
pub fn center_coeff(a: i32, q: i32) -> i32 {
    let a = coeff_mod(a, q);
    // Subtract q when a > q/2, branch-free.
    a - (q & (((q / 2).wrapping_sub(a)) >> 31))
}

/// Centers every coefficient into `(-q/2, q/2]`.
pub fn center(r: &mut [i32], q: i32) {
    for x in r.iter_mut() {
        *x = center_coeff(*x, q);
    }
}

/// Infinity norm of a centered polynomial (or polynomial vector).
pub fn inf_norm(a: &[i32]) -> i32 {
    a.iter().map(|&x| x.unsigned_abs() as i32).max().unwrap_or(0)
}

/// Squared Euclidean norm.
pub fn l2_norm_sq(a: &[i32]) -> i64 {
    a.iter().map(|&x| x as i64 * x as i64).sum()
}

/// Scalar product of two coefficient vectors.
pub fn dot(a: &[i32], b: &[i32]) -> i64 {
    a.iter().zip(b.iter()).map(|(&x, &y)| x as i64 * y as i64).sum()
}

/// Schoolbook product of two `u16` polynomials, length `2n - 1`.
fn schoolbook(a: &[u16], b: &[u16], out: &mut [u16]) {
    for x in out.iter_mut() {
        *x = 0;
    }
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] = out[i + j].wrapping_add(ai.wrapping_mul(bj));
        }
    }
}

/// Recursive Karatsuba product over `u16`, length `2n - 1`.
///
/// Splits at the midpoint down to a schoolbook base case. Used both as the
/// quarter-length multiplier inside Toom-Cook and directly for short
/// operands.
pub fn karatsuba(a: &[u16], b: &[u16], out: &mut [u16]) {
    let n = a.len();
    debug_assert_eq!(b.len(), n);
    debug_assert_eq!(out.len(), 2 * n - 1);

    if n <= 16 || n % 2 != 0 {
        schoolbook(a, b, out);
        return;
    }

    let half = n / 2;
    let (a0, a1) = a.split_at(half);
    let (b0, b1) = b.split_at(half);

    let mut z0 = vec![0u16; 2 * half - 1];
    let mut z2 = vec![0u16; 2 * half - 1];
    let mut z1 = vec![0u16; 2 * half - 1];

    karatsuba(a0, b0, &mut z0);
    karatsuba(a1, b1, &mut z2);

    let sa: Vec<u16> = a0.iter().zip(a1.iter()).map(|(&x, &y)| x.wrapping_add(y)).collect();
    let sb: Vec<u16> = b0.iter().zip(b1.iter()).map(|(&x, &y)| x.wrapping_add(y)).collect();
    karatsuba(&sa, &sb, &mut z1);

    for i in 0..z1.len() {
        z1[i] = z1[i].wrapping_sub(z0[i]).wrapping_sub(z2[i]);
    }

    for x in out.iter_mut() {
        *x = 0;
    }
    for (i, &v) in z0.iter().enumerate() {
        out[i] = out[i].wrapping_add(v);
    }
    for (i, &v) in z1.iter().enumerate() {
        out[half + i] = out[half + i].wrapping_add(v);
    }
    for (i, &v) in z2.iter().enumerate() {
        out[n + i] = out[n + i].wrapping_add(v);
    }
}

/// Toom-Cook 4-way product over `u16`, producing the full `2n - 1`
/// coefficient result (caller folds negacyclically).
///
/// `n` must be a multiple of four. Both operands are evaluated at the seven
/// points {0, ±1, ±2, ±1/2, ∞} (the 1/2 evaluations carry a factor of 8 to
/// stay integral), multiplied pairwise by Karatsuba at length `n/4`, and
/// interpolated with the fixed inverse matrix whose constant divisions are
/// multiplications by `INV3`, `INV9` and `INV15`.
pub fn toom_cook_4way(a: &[u16], b: &[u16], out: &mut [u16]) {
    let n = a.len();
    debug_assert_eq!(b.len(), n);
    debug_assert_eq!(n % 4, 0);
    debug_assert!(out.len() >= 2 * n - 1);

    let sb = n / 4;
    let res_len = 2 * sb - 1;

    let mut aw = vec![vec![0u16; sb]; 7];
    let mut bw = vec![vec![0u16; sb]; 7];

    let eval = |src: &[u16], w: &mut [Vec<u16>]| {
        for i in 0..sb {
            let r0 = src[i];
            let r1 = src[i + sb];
            let r2 = src[i + 2 * sb];
            let r3 = src[i + 3 * sb];

            let even = r0.wrapping_add(r2);
            let odd = r1.wrapping_add(r3);

            // A(1), A(-1)
            w[2][i] = even.wrapping_add(odd);
            w[3][i] = even.wrapping_sub(odd);

            // 8·A(1/2) = 8r0 + 4r1 + 2r2 + r3, and the odd-negated twin.
            let e2 = (r0 << 2).wrapping_add(r2) << 1;
            let o2 = (r1 << 2).wrapping_add(r3);
            w[4][i] = e2.wrapping_add(o2);
            w[5][i] = e2.wrapping_sub(o2);

            // A(2)
            w[1][i] = (r3 << 3)
                .wrapping_add(r2 << 2)
                .wrapping_add(r1 << 1)
                .wrapping_add(r0);

            // A(0) and A(∞)
            w[6][i] = r0;
            w[0][i] = r3;
        }
    };

    eval(a, &mut aw);
    eval(b, &mut bw);

    let mut w = vec![vec![0u16; res_len]; 7];
    for k in 0..7 {
        karatsuba(&aw[k], &bw[k], &mut w[k]);
    }

    for x in out.iter_mut() {
        *x = 0;
    }

    for i in 0..res_len {
        let r0 = w[0][i];
        let mut r1 = w[1][i];
        let mut r2 = w[2][i];
        let mut r3 = w[3][i];
        let mut r4 = w[4][i];
        let mut r5 = w[5][i];
        let r6 = w[6][i];

        r1 = r1.wrapping_add(r4);
        r5 = r5.wrapping_sub(r4);
        r3 = r3.wrapping_sub(r2) >> 1;
        r4 = r4.wrapping_sub(r0);
        r4 = r4.wrapping_sub(r6 << 6);
        r4 = (r4 << 1).wrapping_add(r5);
        r2 = r2.wrapping_add(r3);
        r1 = r1.wrapping_sub(r2 << 6).wrapping_sub(r2);
        r2 = r2.wrapping_sub(r6);
        r2 = r2.wrapping_sub(r0);
        r1 = r1.wrapping_add(r2.wrapping_mul(45));
        r4 = r4.wrapping_sub(r2 << 3).wrapping_mul(INV3) >> 3;
        r5 = r5.wrapping_add(r1);
        r1 = r1.wrapping_add(r3 << 4).wrapping_mul(INV9) >> 1;
        r3 = r3.wrapping_add(r1).wrapping_neg();
        r5 = r1.wrapping_mul(30).wrapping_sub(r5).wrapping_mul(INV15) >> 2;
        r2 = r2.wrapping_sub(r4);
        r1 = r1.wrapping_sub(r5);

        out[i] = out[i].wrapping_add(r6);
        out[i + sb] = out[i + sb].wrapping_add(r5);
        out[i + 2 * sb] = out[i + 2 * sb].wrapping_add(r4);
        out[i + 3 * sb] = out[i + 3 * sb].wrapping_add(r3);
        out[i + 4 * sb] = out[i + 4 * sb].wrapping_add(r2);
        out[i + 5 * sb] = out[i + 5 * sb].wrapping_add(r1);
        out[i + 6 * sb] = out[i + 6 * sb].wrapping_add(r0);
    }
}

/// Negacyclic product modulo `x^n + 1` over `u16` via Toom-Cook.
///
/// The double-length product is folded by subtracting the upper half from
/// the lower half.
pub fn mul_negacyclic(a: &[u16], b: &[u16]) -> Vec<u16> {
    let n = a.len();
    let mut full = vec![0u16; 2 * n - 1];
    toom_cook_4way(a, b, &mut full);

    let mut out = vec![0u16; n];
    out.copy_from_slice(&full[..n]);
    for i in n..full.len() {
        out[i - n] = out[i - n].wrapping_sub(full[i]);
    }
    out
}
