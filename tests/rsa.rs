use phantom::core::mpz::Mpz;
use phantom::error::Error;
use phantom::hash::HashAlg;
use phantom::rng::Csprng;
use phantom::schemes::rsa::{self, oaep, pss};

type Z = Mpz<u64>;

/// Key generation is the expensive part of this suite; one freshly
/// generated 2048-bit key is shared by every test.
fn test_key(_rng: &mut Csprng) -> rsa::RsaPrivateKey<u64> {
    use std::sync::OnceLock;
    static KEY: OnceLock<rsa::RsaPrivateKey<u64>> = OnceLock::new();

    KEY.get_or_init(|| {
        let mut rng = Csprng::from_seed([0xaau8; 32]);
        rsa::keygen(&mut rng, 2048, Mpz::from_u64(65537)).unwrap()
    })
    .clone()
}

#[test]
fn oaep_2048_round_trip() {
    let mut rng = Csprng::from_seed([1u8; 32]);
    let key = test_key(&mut rng);

    let pt = b"hello";
    let ct = oaep::encrypt(&mut rng, &key.public, HashAlg::Sha2_256, b"", pt).unwrap();
    assert_eq!(ct.len(), key.public.byte_len());

    let out = oaep::decrypt(&key, HashAlg::Sha2_256, b"", &ct).unwrap();
    assert_eq!(out, pt);
}

#[test]
fn oaep_rejects_tampered_ciphertext() {
    let mut rng = Csprng::from_seed([2u8; 32]);
    let key = test_key(&mut rng);

    let mut ct = oaep::encrypt(&mut rng, &key.public, HashAlg::Sha2_256, b"", b"secret").unwrap();
    ct[10] ^= 0x40;
    assert_eq!(
        oaep::decrypt(&key, HashAlg::Sha2_256, b"", &ct),
        Err(Error::DecryptionFailure)
    );
}

#[test]
fn oaep_rejects_wrong_label() {
    let mut rng = Csprng::from_seed([3u8; 32]);
    let key = test_key(&mut rng);

    let ct = oaep::encrypt(&mut rng, &key.public, HashAlg::Sha2_256, b"label-a", b"m").unwrap();
    assert_eq!(
        oaep::decrypt(&key, HashAlg::Sha2_256, b"label-b", &ct),
        Err(Error::DecryptionFailure)
    );
}

#[test]
fn oaep_enforces_message_bound() {
    let mut rng = Csprng::from_seed([4u8; 32]);
    let key = test_key(&mut rng);

    let max = oaep::max_msg_len(key.public.byte_len(), HashAlg::Sha2_256);
    let too_long = vec![0u8; max + 1];
    assert_eq!(
        oaep::encrypt(&mut rng, &key.public, HashAlg::Sha2_256, b"", &too_long),
        Err(Error::InsufficientBuffer)
    );

    let exactly = vec![0x7fu8; max];
    let ct = oaep::encrypt(&mut rng, &key.public, HashAlg::Sha2_256, b"", &exactly).unwrap();
    assert_eq!(
        oaep::decrypt(&key, HashAlg::Sha2_256, b"", &ct).unwrap(),
        exactly
    );
}

#[test]
fn pss_sign_verify_round_trip() {
    let mut rng = Csprng::from_seed([5u8; 32]);
    let key = test_key(&mut rng);

    let msg = b"message to be signed";
    let sig = pss::sign(&mut rng, &key, HashAlg::Sha2_256, 32, msg).unwrap();

    assert!(pss::verify(&key.public, HashAlg::Sha2_256, 32, msg, &sig).is_ok());

    // Wrong message and flipped signature bytes must fail.
    assert_eq!(
        pss::verify(&key.public, HashAlg::Sha2_256, 32, b"other message", &sig),
        Err(Error::InvalidSignature)
    );
    let mut bad = sig.clone();
    bad[0] ^= 0x01;
    assert_eq!(
        pss::verify(&key.public, HashAlg::Sha2_256, 32, msg, &bad),
        Err(Error::InvalidSignature)
    );
}

#[test]
fn crt_and_plain_private_ops_agree() {
    let mut rng = Csprng::from_seed([6u8; 32]);
    let key = test_key(&mut rng);

    let m: Z = Mpz::from_u64(0xdead_beef_cafe_f00d);
    let c = key.public.public_op(&m).unwrap();

    assert_eq!(key.private_op(&c).unwrap(), m);
    assert_eq!(key.private_op_plain(&c).unwrap(), m);
}

#[test]
fn generated_key_has_crt_structure() {
    let mut rng = Csprng::from_seed([7u8; 32]);
    let key = test_key(&mut rng);

    assert_eq!(key.p.mul_ref(&key.q), key.public.n);
    assert_eq!(key.public.n.bit_length(), 2048);

    let one = Mpz::from_u64(1);
    let pm1 = key.p.sub_ref(&one);
    // d·e ≡ 1 (mod p − 1) follows from the dP relation.
    let de = key.dp.mul_ref(&key.public.e);
    let (_, r) = de.divrem(&pm1).unwrap();
    assert!(r.is_one());
}

#[test]
fn bad_public_exponents_rejected() {
    let mut rng = Csprng::from_seed([8u8; 32]);

    // Even exponent.
    assert!(rsa::keygen::<u64>(&mut rng, 2048, Mpz::from_u64(65536)).is_err());
    // Too small.
    assert!(rsa::keygen::<u64>(&mut rng, 2048, Mpz::from_u64(3)).is_err());
}

#[test]
fn miller_rabin_agrees_on_known_values() {
    let mut rng = Csprng::from_seed([9u8; 32]);

    let prime: Z = Mpz::from_str_radix("ffffffffffffffc5", 16).unwrap();
    assert!(rsa::check_prime(&mut rng, &prime, 8).unwrap());

    let composite: Z = Mpz::from_u64(3215031751);
    assert!(!rsa::check_prime(&mut rng, &composite, 8).unwrap());

    // Carmichael number 561 must be rejected.
    let carmichael: Z = Mpz::from_u64(561);
    assert!(!rsa::check_prime(&mut rng, &carmichael, 8).unwrap());
}
