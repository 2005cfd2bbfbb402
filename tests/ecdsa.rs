use phantom::core::mpz::{ByteOrder, Mpz};
use phantom::ecc::config::by_name;
use phantom::error::Error;
use phantom::hash::{HashAlg, digest};
use phantom::rng::Csprng;
use phantom::schemes::ecdsa::{NonceSource, rfc6979_nonce, sign, verify};

type Z = Mpz<u64>;

fn hex(s: &str) -> Z {
    Mpz::from_str_radix(s, 16).unwrap()
}

#[test]
fn rfc6979_p256_sample_vector() {
    let cfg = by_name::<u64>("secp256r1").unwrap();
    let d = hex("c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721");
    let h = digest(HashAlg::Sha2_256, b"sample");

    // The deterministic nonce itself is pinned by RFC 6979.
    let k = rfc6979_nonce(&cfg, HashAlg::Sha2_256, &d, &h).unwrap();
    assert_eq!(
        k,
        hex("a6e3c57dd01abe90086538398355dd4c3b17aa873382b0f24d6129493d8aad60")
    );

    let (r, s) = sign(&cfg, &d, &h, NonceSource::Deterministic(HashAlg::Sha2_256)).unwrap();
    assert_eq!(
        r,
        hex("efd48b2aacb6a8fd1140dd9cd45e81d69d2c877b56aaf991c34d0ea84eaf3716")
    );
    assert_eq!(
        s,
        hex("f7cb1c942d657c41d436c7a1b6e29f65f3e900dbb9aff4064dc4ab2f843acda8")
    );
}

#[test]
fn p256_sign_verify_round_trip() {
    let cfg = by_name::<u64>("secp256r1").unwrap();
    let d = hex("c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721");

    // Public key Q = d·G.
    let k = d.to_bytes(ByteOrder::BigEndian, 32).unwrap();
    let q = phantom::ecc::scalar_mul(&cfg, &k, &cfg.gx, &cfg.gy, true).unwrap();
    let (qx, qy) = q.convert_from(&cfg).unwrap();

    let h = digest(HashAlg::Sha2_256, b"sample");
    let (r, s) = sign(&cfg, &d, &h, NonceSource::Deterministic(HashAlg::Sha2_256)).unwrap();

    assert!(verify(&cfg, &qx, &qy, &h, &r, &s).is_ok());

    // A different message must not verify.
    let h2 = digest(HashAlg::Sha2_256, b"tampered");
    assert_eq!(verify(&cfg, &qx, &qy, &h2, &r, &s), Err(Error::InvalidSignature));

    // Any bit flip in the signature must not verify.
    let r_flip = r.add_ref(&Mpz::from_u64(1));
    assert_eq!(verify(&cfg, &qx, &qy, &h, &r_flip, &s), Err(Error::InvalidSignature));
}

#[test]
fn randomized_signatures_verify_and_differ() {
    let cfg = by_name::<u64>("secp256r1").unwrap();
    let d = hex("7a1b6e29f65f3e900dbb9aff4064dc4ab2f843acda8efd48b2aacb6a8fd1140d");

    let k = d.to_bytes(ByteOrder::BigEndian, 32).unwrap();
    let q = phantom::ecc::scalar_mul(&cfg, &k, &cfg.gx, &cfg.gy, true).unwrap();
    let (qx, qy) = q.convert_from(&cfg).unwrap();

    let h = digest(HashAlg::Sha2_256, b"randomized");
    let mut rng = Csprng::from_seed([3u8; 32]);
    let sig1 = sign(&cfg, &d, &h, NonceSource::Random(&mut rng)).unwrap();
    let sig2 = sign(&cfg, &d, &h, NonceSource::Random(&mut rng)).unwrap();

    assert!(verify(&cfg, &qx, &qy, &h, &sig1.0, &sig1.1).is_ok());
    assert!(verify(&cfg, &qx, &qy, &h, &sig2.0, &sig2.1).is_ok());
    assert_ne!(sig1, sig2);
}

#[test]
fn out_of_range_signature_values_rejected() {
    let cfg = by_name::<u64>("secp256r1").unwrap();
    let d = hex("c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721");

    let k = d.to_bytes(ByteOrder::BigEndian, 32).unwrap();
    let q = phantom::ecc::scalar_mul(&cfg, &k, &cfg.gx, &cfg.gy, true).unwrap();
    let (qx, qy) = q.convert_from(&cfg).unwrap();

    let h = digest(HashAlg::Sha2_256, b"sample");
    let zero = Mpz::new();
    let n = cfg.order.modulus().clone();

    assert_eq!(verify(&cfg, &qx, &qy, &h, &zero, &n), Err(Error::InvalidSignature));
    assert_eq!(verify(&cfg, &qx, &qy, &h, &n, &zero), Err(Error::InvalidSignature));
}

#[test]
fn binary_curve_sign_verify_round_trip() {
    let cfg = by_name::<u64>("sect233r1").unwrap();
    let d = hex("5a8b3c0f6e2d4a1b7c9d0e8f5a6b4c2d1e0f9a8b7c6d5e4f3a2b1c0d");

    let ob = cfg.order_bytes();
    let k = d.to_bytes(ByteOrder::BigEndian, ob).unwrap();
    let q = phantom::ecc::scalar_mul(&cfg, &k, &cfg.gx, &cfg.gy, true).unwrap();
    let (qx, qy) = q.convert_from(&cfg).unwrap();

    let h = digest(HashAlg::Sha2_256, b"binary field message");
    let (r, s) = sign(&cfg, &d, &h, NonceSource::Deterministic(HashAlg::Sha2_256)).unwrap();

    assert!(verify(&cfg, &qx, &qy, &h, &r, &s).is_ok());

    let s_flip = s.add_ref(&Mpz::from_u64(1));
    assert_eq!(verify(&cfg, &qx, &qy, &h, &r, &s_flip), Err(Error::InvalidSignature));
}
