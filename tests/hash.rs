use phantom::hash::hmac::Hmac;
use phantom::hash::sha3::{shake128, shake256};
use phantom::hash::{Hash, HashAlg, Xof, digest, hash_new, xof_new, XofAlg};

use sha2::Digest;

fn hex(b: &[u8]) -> String {
    hex::encode(b)
}

#[test]
fn sha256_matches_independent_implementation() {
    let inputs: [&[u8]; 4] = [
        b"",
        b"abc",
        b"The quick brown fox jumps over the lazy dog",
        &[0xa5u8; 1000],
    ];

    for input in inputs {
        let ours = digest(HashAlg::Sha2_256, input);
        let theirs = sha2::Sha256::digest(input);
        assert_eq!(ours.as_slice(), theirs.as_slice());
    }
}

#[test]
fn sha256_streaming_matches_oneshot() {
    let data = vec![0x42u8; 300];
    let mut h = hash_new(HashAlg::Sha2_256);
    for chunk in data.chunks(7) {
        h.update(chunk);
    }
    assert_eq!(h.finalize(), digest(HashAlg::Sha2_256, &data));
}

#[test]
fn sha2_known_vectors() {
    assert_eq!(
        hex(&digest(HashAlg::Sha2_224, b"abc")),
        "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
    );
    assert_eq!(
        hex(&digest(HashAlg::Sha2_256, b"abc")),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(
        hex(&digest(HashAlg::Sha2_384, b"abc")),
        "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
         8086072ba1e7cc2358baeca134c825a7"
    );
    assert_eq!(
        hex(&digest(HashAlg::Sha2_512, b"abc")),
        "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
         2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
    );
    assert_eq!(
        hex(&digest(HashAlg::Sha2_512_224, b"abc")),
        "4634270f707b6a54daae7530460842e20e37ed265ceee9a43e8924aa"
    );
    assert_eq!(
        hex(&digest(HashAlg::Sha2_512_256, b"abc")),
        "53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23"
    );
}

#[test]
fn sha3_known_vectors() {
    assert_eq!(
        hex(&digest(HashAlg::Sha3_224, b"abc")),
        "e642824c3f8cf24ad09234ee7d3c766fc9a3a5168d0c94ad73b46fdf"
    );
    assert_eq!(
        hex(&digest(HashAlg::Sha3_256, b"abc")),
        "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
    );
    assert_eq!(
        hex(&digest(HashAlg::Sha3_384, b"abc")),
        "ec01498288516fc926459f58e2c6ad8df9b473cb0fc08c2596da7cf0e49be4b2\
         98d88cea927ac7f539f1edf228376d25"
    );
    assert_eq!(
        hex(&digest(HashAlg::Sha3_512, b"abc")),
        "b751850b1a57168a5693cd924b6b096e08f621827444f70d884f5d0240d2712e\
         10e116e9192af3c91a7ec57647e3934057340b4cf408d5a56592f8274eec53f0"
    );
    assert_eq!(
        hex(&digest(HashAlg::Sha3_256, b"")),
        "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
    );
}

#[test]
fn shake_known_vectors() {
    let mut out16 = [0u8; 16];
    shake128(b"", &mut out16);
    assert_eq!(hex(&out16), "7f9c2ba4e88f827d616045507605853e");

    let mut out = [0u8; 32];
    shake256(b"", &mut out);
    assert_eq!(
        hex(&out),
        "46b9dd2b0ba88d13233b3feb743eeb243fcd52ea62b81b82b50c27646ed5762f"
    );
}

#[test]
fn shake_streaming_squeeze_is_consistent() {
    let mut x = xof_new(XofAlg::Shake256);
    x.absorb(b"phantom");
    let mut a = [0u8; 64];
    x.squeeze(&mut a);

    let mut y = xof_new(XofAlg::Shake256);
    y.absorb(b"phantom");
    let mut b = [0u8; 64];
    for chunk in b.chunks_mut(5) {
        y.squeeze(chunk);
    }

    assert_eq!(a, b);
}

#[test]
fn state_copy_enables_rewind() {
    let mut h = hash_new(HashAlg::Sha2_256);
    h.update(b"common prefix");

    let mut fork = h.get_copy();
    h.update(b" left");
    fork.update(b" right");

    assert_eq!(h.finalize(), digest(HashAlg::Sha2_256, b"common prefix left"));
    assert_eq!(fork.finalize(), digest(HashAlg::Sha2_256, b"common prefix right"));
}

#[test]
fn hmac_rfc4231_case_1() {
    let key = [0x0bu8; 20];
    let tag = Hmac::mac(HashAlg::Sha2_256, &key, b"Hi There");
    assert_eq!(
        hex(&tag),
        "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
    );
}

#[test]
fn hmac_long_key_is_hashed() {
    let key = [0xaau8; 131];
    let tag = Hmac::mac(
        HashAlg::Sha2_256,
        &key,
        b"Test Using Larger Than Block-Size Key - Hash Key First",
    );
    assert_eq!(
        hex(&tag),
        "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54"
    );
}
