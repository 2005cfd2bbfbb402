//! Number-theoretic transform engine.
//!
//! Parametric in `(n, q, root)`: `n` a power of two, `q` an NTT-friendly
//! prime and `root` a primitive root of unity of the largest two-power
//! order `q` supports. When `q ≡ 1 (mod 2n)` the negacyclic transform
//! splits completely and element-wise multiplication is per-coefficient;
//! when only `q ≡ 1 (mod n)` holds the last layer is skipped and
//! multiplication happens on degree-one pairs modulo `(x² − ζ)` via
//! [`NttContext::basemul`].
//!
//! Twiddle factors are precomputed at construction in Montgomery form with
//! R = 2^32 and stored in bit-reversed order. The forward transform is
//! Cooley–Tukey, the inverse Gentleman–Sande; the inverse's final pass
//! multiplies by `R²·2^(−levels)` so coefficients come back with the
//! Montgomery factor their producers expect.

/// Transform tables and constants for one `(n, q)` pair.
#[derive(Debug, Clone)]
pub struct NttContext {
    /// Ring degree (power of two).
    n: usize,
    /// Coefficient modulus.
    q: i32,
    /// `q⁻¹ mod 2^32`.
    qinv: u32,
    /// `R² mod q` with `R = 2^32`.
    mont_r2: i32,
    /// Inverse-transform scale `R²·2^(−levels) mod q`.
    f: i32,
    /// Twiddles in Montgomery form, bit-reversed order.
    zetas: Vec<i32>,
    /// Number of butterfly layers.
    levels: u32,
    /// Whether the negacyclic transform splits down to single
    /// coefficients.
    complete: bool,
}

fn bit_reverse(mut v: usize, bits: u32) -> usize {
    let mut out = 0;
    for _ in 0..bits {
        out = (out << 1) | (v & 1);
        v >>= 1;
    }
    out
}

fn pow_mod_u64(base: u64, mut exp: u64, q: u64) -> u64 {
    let mut acc = 1u64;
    let mut base = base % q;
    while exp != 0 {
        if exp & 1 == 1 {
            acc = acc * base % q;
        }
        base = base * base % q;
        exp >>= 1;
    }
    acc
}

impl NttContext {
    /// Builds the twiddle tables for `(n, q, root)`.
    ///
    /// `root` must be a primitive `2n`-th root of unity when
    /// `q ≡ 1 (mod 2n)`, otherwise a primitive `n`-th root.
    pub fn new(n: usize, q: i32, root: u32) -> Self {
        debug_assert!(n.is_power_of_two());

        let complete = (q as u64 - 1) % (2 * n as u64) == 0;
        let levels = n.trailing_zeros() - if complete { 0 } else { 1 };
        let count = 1usize << levels;

        // q^{-1} mod 2^32 by Newton iteration.
        let mut qinv = q as u32;
        for _ in 0..5 {
            qinv = qinv.wrapping_mul(2u32.wrapping_sub((q as u32).wrapping_mul(qinv)));
        }

        let qu = q as u64;
        let mont_r = ((1u64 << 32) % qu) as u64;
        let mont_r2 = mont_r * mont_r % qu;

        let mut zetas = vec![0i32; count];
        for (k, z) in zetas.iter_mut().enumerate() {
            let e = bit_reverse(k, levels) as u64;
            let plain = pow_mod_u64(root as u64, e, qu);
            *z = (plain * mont_r % qu) as i32;
        }

        // Inverse-transform scale: R² · 2^(−levels).
        let inv_scale = pow_mod_u64(pow_mod_u64(2, levels as u64, qu), qu - 2, qu);
        let f = (mont_r2 % qu * inv_scale % qu) as i32;

        Self {
            n,
            q,
            qinv,
            mont_r2: mont_r2 as i32,
            f,
            zetas,
            levels,
            complete,
        }
    }

    /// Ring degree.
    pub fn degree(&self) -> usize {
        self.n
    }

    /// Coefficient modulus.
    pub fn modulus(&self) -> i32 {
        self.q
    }

    /// Montgomery reduction of `a` to `a·R⁻¹ mod q`, in `(-q, q)`.
    ///
    /// Valid for `|a| < 2^31·q`.
    #[inline(always)]
    pub fn montgomery_reduce(&self, a: i64) -> i32 {
        let t = (a as i32).wrapping_mul(self.qinv as i32);
        ((a - t as i64 * self.q as i64) >> 32) as i32
    }

    /// Montgomery product `a·b·R⁻¹ mod q`.
    #[inline(always)]
    pub fn mont_mul(&self, a: i32, b: i32) -> i32 {
        self.montgomery_reduce(a as i64 * b as i64)
    }

    /// Centered Barrett-style reduction of a single coefficient.
    #[inline(always)]
    pub fn barrett_reduce(&self, a: i32) -> i32 {
        // v = round(2^37 / q); q < 2^23 keeps every product in range.
        let v = (((1i64 << 37) + self.q as i64 / 2) / self.q as i64) as i64;
        let t = ((a as i64 * v + (1i64 << 36)) >> 37) as i32;
        a - t.wrapping_mul(self.q)
    }

    /// Maps every coefficient into the Montgomery domain (`a·R mod q`).
    pub fn to_mont(&self, r: &mut [i32]) {
        for x in r.iter_mut() {
            *x = self.mont_mul(*x, self.mont_r2);
        }
    }

    /// Strips the Montgomery factor (`a·R⁻¹ mod q`) from every
    /// coefficient.
    pub fn from_mont(&self, r: &mut [i32]) {
        for x in r.iter_mut() {
            *x = self.montgomery_reduce(*x as i64);
        }
    }

    /// Forward Cooley–Tukey transform, in place, bit-reversed-to-natural
    /// ordering.
    pub fn forward(&self, r: &mut [i32]) {
        debug_assert_eq!(r.len(), self.n);
        let low = if self.complete { 1 } else { 2 };

        let mut k = 0usize;
        let mut len = self.n / 2;
        while len >= low {
            let mut start = 0;
            while start < self.n {
                k += 1;
                let zeta = self.zetas[k];
                for j in start..start + len {
                    let t = self.mont_mul(zeta, r[j + len]);
                    r[j + len] = r[j] - t;
                    r[j] += t;
                }
                start += 2 * len;
            }
            len >>= 1;
        }
    }

    /// Inverse Gentleman–Sande transform, in place.
    ///
    /// The final pass multiplies by `R²·2^(−levels)`, restoring
    /// Montgomery-form coefficients with the `2^(−levels)` factor baked in.
    pub fn inverse(&self, r: &mut [i32]) {
        debug_assert_eq!(r.len(), self.n);
        let low = if self.complete { 1 } else { 2 };

        let mut k = 1usize << self.levels;
        let mut len = low;
        while len <= self.n / 2 {
            let mut start = 0;
            while start < self.n {
                k -= 1;
                let zeta = -self.zetas[k];
                for j in start..start + len {
                    let t = r[j];
                    r[j] = self.barrett_reduce(t + r[j + len]);
                    r[j + len] = t - r[j + len];
                    r[j + len] = self.mont_mul(zeta, r[j + len]);
                }
                start += 2 * len;
            }
            len <<= 1;
        }

        for x in r.iter_mut() {
            *x = self.mont_mul(*x, self.f);
        }
    }

    /// Product of two degree-one polynomials modulo `(x² − ζ)`.
    fn basemul(&self, r: &mut [i32], a: &[i32], b: &[i32], zeta: i32) {
        r[0] = self.mont_mul(a[1], b[1]);
        r[0] = self.mont_mul(r[0], zeta);
        r[0] += self.mont_mul(a[0], b[0]);
        r[1] = self.mont_mul(a[0], b[1]);
        r[1] += self.mont_mul(a[1], b[0]);
    }

    /// Element-wise product of two NTT-domain ring elements.
    ///
    /// Complete transforms multiply per coefficient; incomplete ones
    /// multiply degree-one pairs against the per-pair twiddles, which is
    /// the element-wise multiplication realising negacyclic length-`n`
    /// convolution.
    pub fn mul_montgomery(&self, r: &mut [i32], a: &[i32], b: &[i32]) {
        if self.complete {
            for i in 0..self.n {
                r[i] = self.mont_mul(a[i], b[i]);
            }
            return;
        }

        let half = self.zetas.len() / 2;
        for i in 0..self.n / 4 {
            let zeta = self.zetas[half + i];
            self.basemul(
                &mut r[4 * i..4 * i + 2],
                &a[4 * i..4 * i + 2],
                &b[4 * i..4 * i + 2],
                zeta,
            );
            self.basemul(
                &mut r[4 * i + 2..4 * i + 4],
                &a[4 * i + 2..4 * i + 4],
                &b[4 * i + 2..4 * i + 4],
                -zeta,
            );
        }
    }

    /// Matrix–vector product in the NTT domain, Montgomery form.
    ///
    /// `a` is a `rows × cols` matrix of ring elements (row-major, flat),
    /// `b` a `cols`-vector; `r` receives the `rows`-vector `a·b` using the
    /// element-wise multiplier and coefficient-wise accumulation.
    pub fn mul_acc_mont(&self, r: &mut [i32], rows: usize, cols: usize, a: &[i32], b: &[i32]) {
        let n = self.n;
        debug_assert_eq!(a.len(), rows * cols * n);
        debug_assert_eq!(b.len(), cols * n);
        debug_assert_eq!(r.len(), rows * n);

        let mut tmp = vec![0i32; n];
        for i in 0..rows {
            let row = &mut r[i * n..(i + 1) * n];
            self.mul_montgomery(row, &a[(i * cols) * n..(i * cols + 1) * n], &b[..n]);
            for j in 1..cols {
                self.mul_montgomery(
                    &mut tmp,
                    &a[(i * cols + j) * n..(i * cols + j + 1) * n],
                    &b[j * n..(j + 1) * n],
                );
                for (x, &t) in row.iter_mut().zip(tmp.iter()) {
                    *x += t;
                }
            }
            for x in row.iter_mut() {
                *x = self.barrett_reduce(*x);
            }
        }
    }
}
