//! ChaCha20 block function for the deterministic random bit generator.
//!
//! A single-block keystream primitive (RFC 8439 quarter-round network).
//! The generator in [`super::Csprng`] expands its internal key through this
//! function and rekeys from its own output for forward secrecy.

/// ChaCha20 constant words: `"expand 32-byte k"` as little-endian `u32`s.
const CONSTANTS: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];

/// One ChaCha20 quarter round. Branchless, constant-time.
#[inline(always)]
fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(16);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(12);

    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(8);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(7);
}

/// Generates one 64-byte keystream block from (key, counter, nonce).
pub(crate) fn chacha20_block(key: &[u8; 32], counter: u32, nonce: &[u8; 12]) -> [u8; 64] {
    let mut state = [0u32; 16];

    state[0..4].copy_from_slice(&CONSTANTS);

    for (s, k) in state[4..12].iter_mut().zip(key.chunks_exact(4)) {
        *s = u32::from_le_bytes(k.try_into().unwrap());
    }

    state[12] = counter;

    for (s, n) in state[13..16].iter_mut().zip(nonce.chunks_exact(4)) {
        *s = u32::from_le_bytes(n.try_into().unwrap());
    }

    let original = state;

    // 10 double rounds: columns then diagonals.
    for _ in 0..10 {
        quarter_round(&mut state, 0, 4, 8, 12);
        quarter_round(&mut state, 1, 5, 9, 13);
        quarter_round(&mut state, 2, 6, 10, 14);
        quarter_round(&mut state, 3, 7, 11, 15);

        quarter_round(&mut state, 0, 5, 10, 15);
        quarter_round(&mut state, 1, 6, 11, 12);
        quarter_round(&mut state, 2, 7, 8, 13);
        quarter_round(&mut state, 3, 4, 9, 14);
    }

    for (s, o) in state.iter_mut().zip(&original) {
        *s = s.wrapping_add(*o);
    }

    let mut out = [0u8; 64];
    for (chunk, word) in out.chunks_exact_mut(4).zip(&state) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }

    out
}
