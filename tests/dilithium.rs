use phantom::error::Error;
use phantom::rng::Csprng;
use phantom::schemes::dilithium::{DilithiumParams, keygen_from_seed, sign, verify};

#[test]
fn dilithium2_accepts_then_rejects_flipped_byte() {
    // Seed all zero, empty message.
    let params = DilithiumParams::D2;
    let keys = keygen_from_seed(&params, &[0u8; 32]).unwrap();

    let sig = sign(&params, &keys.secret, b"", None).unwrap();
    assert_eq!(sig.len(), params.signature_bytes());
    assert!(verify(&params, &keys.public, b"", &sig).is_ok());

    let mut bad = sig.clone();
    bad[0] ^= 0x01;
    assert_eq!(verify(&params, &keys.public, b"", &bad), Err(Error::InvalidSignature));
}

#[test]
fn all_levels_round_trip() {
    for set in 0..3 {
        let params = DilithiumParams::by_set(set).unwrap();
        let keys = keygen_from_seed(&params, &[set as u8 + 1; 32]).unwrap();

        let msg = b"dilithium level test";
        let sig = sign(&params, &keys.secret, msg, None).unwrap();
        assert!(verify(&params, &keys.public, msg, &sig).is_ok(), "level {set}");
    }
}

#[test]
fn wrong_message_is_rejected() {
    let params = DilithiumParams::D2;
    let keys = keygen_from_seed(&params, &[9u8; 32]).unwrap();

    let sig = sign(&params, &keys.secret, b"signed message", None).unwrap();
    assert_eq!(
        verify(&params, &keys.public, b"other message", &sig),
        Err(Error::InvalidSignature)
    );
}

#[test]
fn randomized_signatures_differ_but_verify() {
    let params = DilithiumParams::D2;
    let keys = keygen_from_seed(&params, &[13u8; 32]).unwrap();
    let mut rng = Csprng::from_seed([14u8; 32]);

    let s1 = sign(&params, &keys.secret, b"msg", Some(&mut rng)).unwrap();
    let s2 = sign(&params, &keys.secret, b"msg", Some(&mut rng)).unwrap();

    assert_ne!(s1, s2);
    assert!(verify(&params, &keys.public, b"msg", &s1).is_ok());
    assert!(verify(&params, &keys.public, b"msg", &s2).is_ok());
}

#[test]
fn deterministic_signing_is_reproducible() {
    let params = DilithiumParams::D2;
    let keys = keygen_from_seed(&params, &[17u8; 32]).unwrap();

    let s1 = sign(&params, &keys.secret, b"stable", None).unwrap();
    let s2 = sign(&params, &keys.secret, b"stable", None).unwrap();
    assert_eq!(s1, s2);
}

#[test]
fn signature_under_wrong_key_is_rejected() {
    let params = DilithiumParams::D2;
    let a = keygen_from_seed(&params, &[1u8; 32]).unwrap();
    let b = keygen_from_seed(&params, &[2u8; 32]).unwrap();

    let sig = sign(&params, &a.secret, b"cross", None).unwrap();
    assert_eq!(verify(&params, &b.public, b"cross", &sig), Err(Error::InvalidSignature));
}
