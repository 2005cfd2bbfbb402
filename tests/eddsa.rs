use phantom::error::Error;
use phantom::schemes::eddsa::{EddsaVariant, derive_public, sign, verify};

fn h2b(s: &str) -> Vec<u8> {
    hex::decode(s).unwrap()
}

#[test]
fn ed25519_rfc8032_vector_1() {
    let variant = EddsaVariant::ed25519();
    let sk = h2b("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60");

    let pk = derive_public::<u64>(&variant, &sk).unwrap();
    assert_eq!(
        hex::encode(&pk),
        "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
    );

    let sig = sign::<u64>(&variant, &sk, b"").unwrap();
    assert_eq!(
        hex::encode(&sig),
        "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
         5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
    );

    assert!(verify::<u64>(&variant, &pk, b"", &sig).is_ok());
}

#[test]
fn ed25519_rfc8032_vector_2() {
    let variant = EddsaVariant::ed25519();
    let sk = h2b("4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb");
    let msg = [0x72u8];

    let pk = derive_public::<u64>(&variant, &sk).unwrap();
    assert_eq!(
        hex::encode(&pk),
        "3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c"
    );

    let sig = sign::<u64>(&variant, &sk, &msg).unwrap();
    assert_eq!(
        hex::encode(&sig),
        "92a009a9f0d4cab8720e820b5f642540a2b27b5416503f8fb3762223ebdb69da\
         085ac1e43e15996e458f3613d0f11d8c387b2eaeb4302aeeb00d291612bb0c00"
    );

    assert!(verify::<u64>(&variant, &pk, &msg, &sig).is_ok());
}

#[test]
fn ed25519_rejects_any_bit_flip() {
    let variant = EddsaVariant::ed25519();
    let sk = h2b("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60");
    let pk = derive_public::<u64>(&variant, &sk).unwrap();
    let sig = sign::<u64>(&variant, &sk, b"attack at dawn").unwrap();

    assert!(verify::<u64>(&variant, &pk, b"attack at dawn", &sig).is_ok());

    for pos in [0usize, 31, 32, 63] {
        let mut bad = sig.clone();
        bad[pos] ^= 0x01;
        assert_eq!(
            verify::<u64>(&variant, &pk, b"attack at dawn", &bad),
            Err(Error::InvalidSignature),
            "flip at byte {pos} accepted"
        );
    }

    assert_eq!(
        verify::<u64>(&variant, &pk, b"attack at dusk", &sig),
        Err(Error::InvalidSignature)
    );
}

#[test]
fn ed25519ph_round_trip() {
    let variant = EddsaVariant {
        prehash: true,
        ..EddsaVariant::ed25519()
    };
    let sk = h2b("833fe62409237b9d62ec77587520911e9a759cec1d19755b7da901b96dca3d42");

    let pk = derive_public::<u64>(&variant, &sk).unwrap();
    let sig = sign::<u64>(&variant, &sk, b"abc").unwrap();
    assert!(verify::<u64>(&variant, &pk, b"abc", &sig).is_ok());
    assert_eq!(
        verify::<u64>(&variant, &pk, b"abd", &sig),
        Err(Error::InvalidSignature)
    );
}

#[test]
fn ed448_round_trip() {
    let variant = EddsaVariant::ed448();
    let sk = h2b(
        "6c82a562cb808d10d632be89c8513ebf6c929f34ddfa8c9f63c9960ef6e348a3\
         528c8a3fcc2f044e39a3fc5b94492f8f032e7549a20098f95b",
    );

    let pk = derive_public::<u64>(&variant, &sk).unwrap();
    assert_eq!(
        hex::encode(&pk),
        "5fd7449b59b461fd2ce787ec616ad46a1da1342485a70e1f8a0ea75d80e96778\
         edf124769b46c7061bd6783df1e50f6cd1fa1abeafe8256180"
    );

    let sig = sign::<u64>(&variant, &sk, b"").unwrap();
    assert_eq!(sig.len(), 114);
    assert!(verify::<u64>(&variant, &pk, b"", &sig).is_ok());

    let mut bad = sig.clone();
    bad[0] ^= 0x80;
    assert_eq!(verify::<u64>(&variant, &pk, b"", &bad), Err(Error::InvalidSignature));
}

#[test]
fn ed448_context_variant_round_trip() {
    let variant = EddsaVariant {
        context: b"phantom-test".to_vec(),
        ..EddsaVariant::ed448()
    };
    let sk = vec![0x42u8; 57];

    let pk = derive_public::<u64>(&variant, &sk).unwrap();
    let sig = sign::<u64>(&variant, &sk, b"ctx message").unwrap();
    assert!(verify::<u64>(&variant, &pk, b"ctx message", &sig).is_ok());

    // The same signature under a different context must fail.
    let other = EddsaVariant {
        context: b"other-context".to_vec(),
        ..EddsaVariant::ed448()
    };
    assert_eq!(
        verify::<u64>(&other, &pk, b"ctx message", &sig),
        Err(Error::InvalidSignature)
    );
}
