//! Keccak-f[1600] permutation.
//!
//! The 24-round permutation underlying SHA-3 and SHAKE, over a 5×5 state
//! of 64-bit lanes. Lanes are exchanged with the byte-oriented sponge
//! little-endian, so the absorb/squeeze layer byte-swaps on big-endian
//! hosts.

/// Round constants for the ι step.
const ROUND_CONSTANTS: [u64; 24] = [
    0x0000000000000001, 0x0000000000008082, 0x800000000000808a, 0x8000000080008000,
    0x000000000000808b, 0x0000000080000001, 0x8000000080008081, 0x8000000000008009,
    0x000000000000008a, 0x0000000000000088, 0x0000000080008009, 0x000000008000000a,
    0x000000008000808b, 0x800000000000008b, 0x8000000000008089, 0x8000000000008003,
    0x8000000000008002, 0x8000000000000080, 0x000000000000800a, 0x800000008000000a,
    0x8000000080008081, 0x8000000000008080, 0x0000000080000001, 0x8000000080008008,
];

/// Rotation offsets for the ρ step, in the π traversal order.
const RHO: [u32; 24] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];

/// Lane traversal order for the π step.
const PI: [usize; 24] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];

/// Applies the full 24-round Keccak-f[1600] permutation in place.
pub fn keccak_f1600(state: &mut [u64; 25]) {
    for &rc in ROUND_CONSTANTS.iter() {
        // θ: column parities and their rotated combination.
        let mut c = [0u64; 5];
        for (x, cx) in c.iter_mut().enumerate() {
            *cx = state[x] ^ state[x + 5] ^ state[x + 10] ^ state[x + 15] ^ state[x + 20];
        }
        for x in 0..5 {
            let d = c[(x + 4) % 5] ^ c[(x + 1) % 5].rotate_left(1);
            for y in 0..5 {
                state[x + 5 * y] ^= d;
            }
        }

        // ρ and π: rotate each lane and move it along the traversal.
        let mut last = state[1];
        for (i, &dst) in PI.iter().enumerate() {
            let tmp = state[dst];
            state[dst] = last.rotate_left(RHO[i]);
            last = tmp;
        }

        // χ: non-linear row mixing.
        for y in 0..5 {
            let row: [u64; 5] = core::array::from_fn(|x| state[5 * y + x]);
            for x in 0..5 {
                state[5 * y + x] = row[x] ^ (!row[(x + 1) % 5] & row[(x + 2) % 5]);
            }
        }

        // ι: round constant into lane (0, 0).
        state[0] ^= rc;
    }
}

/// Copies `rate` bytes of the state into the output buffer, little-endian
/// lanes.
pub fn squeeze_block(state: &[u64; 25], out: &mut [u8]) {
    for (chunk, lane) in out.chunks_mut(8).zip(state.iter()) {
        let bytes = lane.to_le_bytes();
        chunk.copy_from_slice(&bytes[..chunk.len()]);
    }
}
