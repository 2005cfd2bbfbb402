use phantom::core::ntt::NttContext;
use phantom::core::poly;

fn kyber_ctx() -> NttContext {
    NttContext::new(256, 3329, 17)
}

fn dilithium_ctx() -> NttContext {
    NttContext::new(256, 8380417, 1753)
}

fn sample_poly(q: i32, seed: u64) -> Vec<i32> {
    // Small xorshift keeps the fixtures deterministic.
    let mut state = seed | 1;
    (0..256)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % q as u64) as i32
        })
        .collect()
}

/// Reference negacyclic convolution mod q.
fn negacyclic_mul(a: &[i32], b: &[i32], q: i64) -> Vec<i32> {
    let n = a.len();
    let mut out = vec![0i64; n];
    for i in 0..n {
        for j in 0..n {
            let prod = a[i] as i64 * b[j] as i64 % q;
            if i + j < n {
                out[i + j] = (out[i + j] + prod) % q;
            } else {
                out[i + j - n] = (out[i + j - n] - prod).rem_euclid(q);
            }
        }
    }
    out.iter().map(|&c| c.rem_euclid(q) as i32).collect()
}

fn round_trip(ctx: &NttContext) {
    let q = ctx.modulus();
    let p = sample_poly(q, 0x1234_5678);

    let mut work = p.clone();
    ctx.forward(&mut work);
    ctx.inverse(&mut work);
    // The inverse restores Montgomery-form coefficients.
    ctx.from_mont(&mut work);
    poly::reduce_mod(&mut work, q);

    assert_eq!(work, p);
}

#[test]
fn kyber_round_trip() {
    round_trip(&kyber_ctx());
}

#[test]
fn dilithium_round_trip() {
    round_trip(&dilithium_ctx());
}

fn convolution(ctx: &NttContext) {
    let q = ctx.modulus();
    let a = sample_poly(q, 0xdead_beef);
    let b = sample_poly(q, 0xcafe_f00d);

    let mut a_hat = a.clone();
    let mut b_hat = b.clone();
    ctx.forward(&mut a_hat);
    ctx.forward(&mut b_hat);

    let mut c = vec![0i32; 256];
    ctx.mul_montgomery(&mut c, &a_hat, &b_hat);
    ctx.inverse(&mut c);
    poly::reduce_mod(&mut c, q);

    assert_eq!(c, negacyclic_mul(&a, &b, q as i64));
}

#[test]
fn kyber_convolution() {
    convolution(&kyber_ctx());
}

#[test]
fn dilithium_convolution() {
    convolution(&dilithium_ctx());
}

#[test]
fn toom_cook_matches_schoolbook() {
    // Saber's ring: u16 coefficients, result exact mod 2^13.
    let n = 256;
    let a: Vec<u16> = (0..n).map(|i| ((i * 31 + 7) % 8192) as u16).collect();
    let b: Vec<u16> = (0..n).map(|i| ((i * 17 + 3) % 8192) as u16).collect();

    let fast = poly::mul_negacyclic(&a, &b);

    let mut slow = vec![0i64; n];
    for i in 0..n {
        for j in 0..n {
            let prod = a[i] as i64 * b[j] as i64;
            if i + j < n {
                slow[i + j] += prod;
            } else {
                slow[i + j - n] -= prod;
            }
        }
    }

    for i in 0..n {
        assert_eq!(
            fast[i] & 0x1fff,
            (slow[i].rem_euclid(8192)) as u16,
            "coefficient {i}"
        );
    }
}

#[test]
fn karatsuba_matches_schoolbook() {
    let n = 64;
    let a: Vec<u16> = (0..n).map(|i| (i * 123 + 45) as u16).collect();
    let b: Vec<u16> = (0..n).map(|i| (i * 67 + 89) as u16).collect();

    let mut fast = vec![0u16; 2 * n - 1];
    poly::karatsuba(&a, &b, &mut fast);

    let mut slow = vec![0u16; 2 * n - 1];
    for i in 0..n {
        for j in 0..n {
            slow[i + j] = slow[i + j].wrapping_add(a[i].wrapping_mul(b[j]));
        }
    }

    assert_eq!(fast, slow);
}
