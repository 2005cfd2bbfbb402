//! Context-API coverage: the catalogue, key lifecycle and the uniform
//! operation surface.

use phantom::error::Error;
use phantom::{PkcScheme, create_ctx};

#[test]
fn kyber_kem_through_contexts() {
    let mut alice = create_ctx(PkcScheme::KemKyber, 1, 64, false).unwrap();
    alice.keygen().unwrap();

    // Bob only learns the public key.
    let mut bob = create_ctx(PkcScheme::KemKyber, 1, 64, false).unwrap();
    bob.set_public_key(&alice.get_public_key().unwrap()).unwrap();

    let (ct, key_bob) = bob.kem_encapsulate().unwrap();
    let key_alice = alice.kem_decapsulate(&ct).unwrap();
    assert_eq!(key_alice, key_bob);
}

#[test]
fn saber_kem_through_contexts() {
    let mut alice = create_ctx(PkcScheme::KemSaber, 1, 64, false).unwrap();
    alice.keygen().unwrap();

    let mut bob = create_ctx(PkcScheme::KemSaber, 1, 64, false).unwrap();
    bob.set_public_key(&alice.get_public_key().unwrap()).unwrap();

    let (ct, key_bob) = bob.kem_encapsulate().unwrap();
    assert_eq!(alice.kem_decapsulate(&ct).unwrap(), key_bob);
}

#[test]
fn kyber_private_key_survives_round_trip() {
    let mut a = create_ctx(PkcScheme::KemKyber, 0, 64, false).unwrap();
    a.keygen().unwrap();

    let mut b = create_ctx(PkcScheme::KemKyber, 0, 64, false).unwrap();
    b.set_public_key(&a.get_public_key().unwrap()).unwrap();
    let (ct, key) = b.kem_encapsulate().unwrap();

    // Restore the private key into a fresh context.
    let mut c = create_ctx(PkcScheme::KemKyber, 0, 64, false).unwrap();
    c.set_private_key(&a.get_private_key().unwrap()).unwrap();
    assert_eq!(c.kem_decapsulate(&ct).unwrap(), key);
}

#[test]
fn ecdsa_context_sign_verify() {
    let mut signer = create_ctx(PkcScheme::SigEcdsa, 0, 64, false).unwrap();
    signer.set_deterministic_nonces(true).unwrap();
    signer.keygen().unwrap();

    let msg = b"context layer message";
    let sig = signer.sig_sign(msg).unwrap();

    let mut verifier = create_ctx(PkcScheme::SigEcdsa, 0, 64, false).unwrap();
    verifier.set_public_key(&signer.get_public_key().unwrap()).unwrap();
    assert!(verifier.sig_verify(msg, &sig).is_ok());

    let mut bad = sig.clone();
    bad[7] ^= 1;
    assert!(verifier.sig_verify(msg, &bad).is_err());
}

#[test]
fn eddsa_context_sign_verify() {
    let mut signer = create_ctx(PkcScheme::SigEddsa, 0, 64, false).unwrap();
    signer.keygen().unwrap();

    let sig = signer.sig_sign(b"ed25519 via context").unwrap();

    let mut verifier = create_ctx(PkcScheme::SigEddsa, 0, 64, false).unwrap();
    verifier.set_public_key(&signer.get_public_key().unwrap()).unwrap();
    assert!(verifier.sig_verify(b"ed25519 via context", &sig).is_ok());
    assert!(verifier.sig_verify(b"ed25519 via contex!", &sig).is_err());
}

#[test]
fn dilithium_context_sign_verify() {
    let mut signer = create_ctx(PkcScheme::SigDilithium, 0, 64, false).unwrap();
    signer.keygen().unwrap();

    let sig = signer.sig_sign(b"dilithium via context").unwrap();

    let mut verifier = create_ctx(PkcScheme::SigDilithium, 0, 64, false).unwrap();
    verifier.set_public_key(&signer.get_public_key().unwrap()).unwrap();
    assert!(verifier.sig_verify(b"dilithium via context", &sig).is_ok());
}

#[test]
fn ecdh_exchange_through_contexts() {
    for set in [0usize, 2] {
        let mut alice = create_ctx(PkcScheme::KeyEcdh, set, 64, false).unwrap();
        let mut bob = create_ctx(PkcScheme::KeyEcdh, set, 64, false).unwrap();

        let a_pub = alice.ke_init().unwrap();
        let (b_pub, bob_secret) = bob.ke_setup(&a_pub).unwrap();
        let alice_secret = alice.ke_final(&b_pub).unwrap();

        assert_eq!(alice_secret, bob_secret, "parameter set {set}");
    }
}

#[test]
fn kyber_pke_through_contexts() {
    let mut receiver = create_ctx(PkcScheme::PkeKyber, 1, 64, false).unwrap();
    receiver.keygen().unwrap();
    assert_eq!(receiver.get_msg_len().unwrap(), 32);

    let mut sender = create_ctx(PkcScheme::PkeKyber, 1, 64, false).unwrap();
    sender.set_public_key(&receiver.get_public_key().unwrap()).unwrap();

    let pt = [0x61u8; 32];
    let ct = sender.pke_encrypt(&pt).unwrap();
    assert_eq!(receiver.pke_decrypt(&ct).unwrap(), pt);
}

#[test]
fn invalid_parameter_sets_are_rejected() {
    assert!(matches!(
        create_ctx(PkcScheme::KemKyber, 9, 64, false),
        Err(Error::InvalidParameterSet)
    ));
    assert!(matches!(
        create_ctx(PkcScheme::SigEcdsa, 0, 48, false),
        Err(Error::InvalidParameterSet)
    ));
    // The IBE catalogue entry is reserved but not constructible.
    assert!(matches!(
        create_ctx(PkcScheme::IbeDlp, 0, 64, false),
        Err(Error::InvalidParameterSet)
    ));
}

#[test]
fn operations_demand_matching_scheme() {
    let mut ctx = create_ctx(PkcScheme::KemKyber, 0, 64, false).unwrap();
    ctx.keygen().unwrap();

    assert!(matches!(ctx.sig_sign(b"x"), Err(Error::InvalidParameterSet)));
    assert!(matches!(ctx.ke_init(), Err(Error::InvalidParameterSet)));
}

#[test]
fn operations_without_keys_fail_cleanly() {
    let mut ctx = create_ctx(PkcScheme::KemKyber, 0, 64, false).unwrap();
    assert!(matches!(ctx.kem_encapsulate(), Err(Error::InvalidKey)));
    assert!(matches!(ctx.get_public_key(), Err(Error::InvalidKey)));
}
