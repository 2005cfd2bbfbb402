use phantom::rng::Csprng;
use phantom::schemes::saber::{SaberParams, indcpa, kem};

#[test]
fn all_levels_round_trip() {
    for set in 0..3 {
        let params = SaberParams::by_set(set).unwrap();
        let mut rng = Csprng::from_seed([set as u8 + 11; 32]);

        let keys = kem::keygen(&params, &mut rng).unwrap();
        assert_eq!(keys.public.len(), params.public_key_bytes());

        let (ct, key_tx) = kem::encapsulate(&params, &keys.public, &mut rng).unwrap();
        assert_eq!(ct.len(), kem::ciphertext_bytes(&params));

        let key_rx = kem::decapsulate(&params, &keys.secret, &ct).unwrap();
        assert_eq!(key_tx, key_rx, "level {set}");
    }
}

#[test]
fn deterministic_round_trip() {
    let params = SaberParams::SABER;
    let seed_a = [0u8; 32];
    let seed_s = [1u8; 32];
    let z = [0u8; 32];

    let keys = kem::keygen_from_seeds(&params, &seed_a, &seed_s, &z).unwrap();

    let m = [0x33u8; 32];
    let (ct, key_tx) = kem::encapsulate_with_m(&params, &keys.public, &m).unwrap();
    let key_rx = kem::decapsulate(&params, &keys.secret, &ct).unwrap();
    assert_eq!(key_tx, key_rx);

    // Same inputs, same ciphertext.
    let (ct2, key2) = kem::encapsulate_with_m(&params, &keys.public, &m).unwrap();
    assert_eq!(ct, ct2);
    assert_eq!(key_tx, key2);
}

#[test]
fn tampered_ciphertext_yields_rejection_key() {
    let params = SaberParams::SABER;
    let mut rng = Csprng::from_seed([21u8; 32]);

    let keys = kem::keygen(&params, &mut rng).unwrap();
    let (mut ct, key_tx) = kem::encapsulate(&params, &keys.public, &mut rng).unwrap();

    let last = ct.len() - 1;
    ct[last] ^= 0x80;
    let key_rx = kem::decapsulate(&params, &keys.secret, &ct).unwrap();
    assert_ne!(key_tx, key_rx);
}

#[test]
fn indcpa_encrypt_decrypt_round_trip() {
    let params = SaberParams::LIGHT;
    let keys = indcpa::keygen(&params, &[3u8; 32], &[4u8; 32]).unwrap();

    let msg = [0x5au8; 32];
    let coins = [6u8; 32];
    let ct = indcpa::encrypt(&params, &keys.public, &msg, &coins).unwrap();
    assert_eq!(ct.len(), params.ciphertext_bytes());

    let out = indcpa::decrypt(&params, &keys.secret, &ct).unwrap();
    assert_eq!(out, msg);
}
