use phantom::core::mpz::{ByteOrder, Mpz};
use phantom::ecc::config::{by_name, p256};
use phantom::ecc::point::EcPoint;
use phantom::ecc::recoding::{Recoder, Recoding};
use phantom::ecc::{montgomery, scalar_mul};
use phantom::error::Error;

type Z = Mpz<u64>;

fn be(k: u64) -> Vec<u8> {
    k.to_be_bytes().to_vec()
}

#[test]
fn doubling_matches_addition() {
    let cfg = p256::<u64>().unwrap();

    let mut dbl = EcPoint::convert_to(&cfg, &cfg.gx, &cfg.gy).unwrap();
    dbl.doubling(&cfg, 1).unwrap();

    let g = EcPoint::convert_to(&cfg, &cfg.gx, &cfg.gy).unwrap();
    let mut sum = g.clone();
    sum.addition(&cfg, &g).unwrap();

    assert_eq!(dbl.convert_from(&cfg).unwrap(), sum.convert_from(&cfg).unwrap());
}

#[test]
fn p256_small_multiples_are_consistent() {
    let cfg = p256::<u64>().unwrap();

    // 5G via repeated addition.
    let g = EcPoint::convert_to(&cfg, &cfg.gx, &cfg.gy).unwrap();
    let mut acc = g.clone();
    for _ in 0..4 {
        acc.addition(&cfg, &g).unwrap();
    }
    let by_additions = acc.convert_from(&cfg).unwrap();

    // 5G via the public NAF driver and the secret ladder.
    let naf = scalar_mul(&cfg, &be(5), &cfg.gx, &cfg.gy, false).unwrap();
    let ladder = scalar_mul(&cfg, &be(5), &cfg.gx, &cfg.gy, true).unwrap();

    assert_eq!(naf.convert_from(&cfg).unwrap(), by_additions);
    assert_eq!(ladder.convert_from(&cfg).unwrap(), by_additions);
}

#[test]
fn adding_inverse_gives_infinity() {
    let cfg = p256::<u64>().unwrap();

    let g = EcPoint::convert_to(&cfg, &cfg.gx, &cfg.gy).unwrap();
    let mut neg = g.clone();
    neg.negate(&cfg).unwrap();

    let mut sum = g;
    sum.addition(&cfg, &neg).unwrap();
    assert!(sum.is_infinity());
    assert_eq!(sum.convert_from(&cfg), Err(Error::PointAtInfinity));
}

#[test]
fn order_times_generator_is_infinity() {
    let cfg = p256::<u64>().unwrap();
    let n = cfg.order.modulus().to_bytes(ByteOrder::BigEndian, 32).unwrap();

    let p = scalar_mul(&cfg, &n, &cfg.gx, &cfg.gy, false).unwrap();
    assert!(p.is_infinity());
}

#[test]
fn generator_satisfies_binary_curve_equation() {
    // y² + xy = x³ + ax² + b over GF(2^233).
    let cfg = by_name::<u64>("sect233r1").unwrap();
    let f = cfg.gf.as_ref().unwrap();

    let x = &cfg.gx;
    let y = &cfg.gy;

    let lhs = f.add(&f.sqr(y), &f.mul(x, y));
    let x2 = f.sqr(x);
    let rhs = f.add(&f.add(&f.mul(&x2, x), &f.mul(&cfg.a, &x2)), &cfg.b);
    assert_eq!(lhs, rhs);
}

#[test]
fn binary_curve_scalar_mul_is_consistent() {
    let cfg = by_name::<u64>("sect233r1").unwrap();

    // 7G by additions in affine coordinates.
    let g = EcPoint::convert_to(&cfg, &cfg.gx, &cfg.gy).unwrap();
    let mut acc = g.clone();
    for _ in 0..6 {
        acc.addition(&cfg, &g).unwrap();
    }
    let expect = acc.convert_from(&cfg).unwrap();

    let naf = scalar_mul(&cfg, &be(7), &cfg.gx, &cfg.gy, false).unwrap();
    let ladder = scalar_mul(&cfg, &be(7), &cfg.gx, &cfg.gy, true).unwrap();

    assert_eq!(naf.convert_from(&cfg).unwrap(), expect);
    assert_eq!(ladder.convert_from(&cfg).unwrap(), expect);
}

#[test]
fn edwards_scalar_mul_is_consistent() {
    let cfg = by_name::<u64>("edwards25519").unwrap();

    let g = EcPoint::convert_to(&cfg, &cfg.gx, &cfg.gy).unwrap();
    let mut acc = g.clone();
    for _ in 0..8 {
        acc.addition(&cfg, &g).unwrap();
    }
    let expect = acc.convert_from(&cfg).unwrap();

    let naf = scalar_mul(&cfg, &be(9), &cfg.gx, &cfg.gy, false).unwrap();
    let ladder = scalar_mul(&cfg, &be(9), &cfg.gx, &cfg.gy, true).unwrap();

    assert_eq!(naf.convert_from(&cfg).unwrap(), expect);
    assert_eq!(ladder.convert_from(&cfg).unwrap(), expect);
}

#[test]
fn x25519_rfc7748_vector() {
    let cfg = by_name::<u64>("curve25519").unwrap();

    let k = hex::decode("a546e36bf0527c9d3b16154b82465edd62144c0ac1fc5a18506a2244ba449ac4")
        .unwrap();
    let u = hex::decode("e6db6867583030db3594c1a424b15f7c726624ec26b3353b10a903a6d0ab1c4c")
        .unwrap();

    // RFC 7748 scalar decoding: clamp, then feed the ladder big-endian.
    let mut scalar = k.clone();
    scalar[0] &= 248;
    scalar[31] &= 127;
    scalar[31] |= 64;
    let scalar_be: Vec<u8> = scalar.iter().rev().copied().collect();

    // u-coordinate decoding masks the top bit.
    let mut u_bytes = u.clone();
    u_bytes[31] &= 127;
    let x1: Z = Mpz::from_bytes(&u_bytes, ByteOrder::LittleEndian);

    let out = montgomery::ladder(&cfg, &scalar_be, &x1).unwrap();
    let out_le = out.to_bytes(ByteOrder::LittleEndian, 32).unwrap();

    assert_eq!(
        hex::encode(out_le),
        "c3da55379de9c6908e94ea4df28d084f32eccf03491c71f754b4075577a28552"
    );
}

#[test]
fn recoder_exposes_steps_and_digits() {
    // 0b110101 = 53.
    let mut r = Recoder::new(Recoding::Binary, &[53]).unwrap();
    assert_eq!(r.steps(), 6);
    let bits: Vec<u32> = (&mut r).map(|s| s.digit).collect();
    assert_eq!(bits, vec![1, 1, 0, 1, 0, 1]);

    // NAF-3: digits odd, reconstruction matches.
    let r = Recoder::new(Recoding::NafW(3), &[0xb7, 0x21]).unwrap();
    let mut value = 0i64;
    for s in r {
        value *= 2;
        if !s.is_zero {
            assert_eq!(s.digit % 2, 1);
            value += if s.is_subtract { -(s.digit as i64) } else { s.digit as i64 };
        }
    }
    assert_eq!(value, 0xb721);

    // Windowed-4: plain radix-16 digits.
    let r = Recoder::new(Recoding::WindowW(4), &[0xb7, 0x21]).unwrap();
    let mut value = 0u64;
    for s in r {
        value = value * 16 + s.digit as u64;
    }
    assert_eq!(value, 0xb721);

    // Ladder mode covers every bit including leading zeros.
    let r = Recoder::new(Recoding::Ladder, &[0x01, 0x00]).unwrap();
    assert_eq!(r.steps(), 16);
}

#[test]
fn zero_scalar_is_a_recoding_error() {
    assert_eq!(
        Recoder::new(Recoding::Binary, &[0, 0]).err(),
        Some(Error::RecodingError)
    );
    assert_eq!(
        Recoder::new(Recoding::NafW(4), &[0]).err(),
        Some(Error::RecodingError)
    );
}
