//! SHA-2 family (FIPS 180-4).
//!
//! Two compression cores cover the whole family: a 64-round core on 32-bit
//! words (SHA-224/256) and an 80-round core on 64-bit words (SHA-384/512
//! and the 512/224, 512/256 truncations). The variants differ only in
//! their initial values and output truncation.
//!
//! On x86-64 hosts advertising the SHA extensions the 32-bit core
//! dispatches to a vector-intrinsic path with bit-identical output. The
//! probe result is the one process-wide global in the crate; it is
//! compute-once-read-many and safe to initialise from any thread.

use super::Hash;

/// SHA-256 round constants.
const K256: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// SHA-512 round constants.
const K512: [u64; 80] = [
    0x428a2f98d728ae22, 0x7137449123ef65cd, 0xb5c0fbcfec4d3b2f, 0xe9b5dba58189dbbc,
    0x3956c25bf348b538, 0x59f111f1b605d019, 0x923f82a4af194f9b, 0xab1c5ed5da6d8118,
    0xd807aa98a3030242, 0x12835b0145706fbe, 0x243185be4ee4b28c, 0x550c7dc3d5ffb4e2,
    0x72be5d74f27b896f, 0x80deb1fe3b1696b1, 0x9bdc06a725c71235, 0xc19bf174cf692694,
    0xe49b69c19ef14ad2, 0xefbe4786384f25e3, 0x0fc19dc68b8cd5b5, 0x240ca1cc77ac9c65,
    0x2de92c6f592b0275, 0x4a7484aa6ea6e483, 0x5cb0a9dcbd41fbd4, 0x76f988da831153b5,
    0x983e5152ee66dfab, 0xa831c66d2db43210, 0xb00327c898fb213f, 0xbf597fc7beef0ee4,
    0xc6e00bf33da88fc2, 0xd5a79147930aa725, 0x06ca6351e003826f, 0x142929670a0e6e70,
    0x27b70a8546d22ffc, 0x2e1b21385c26c926, 0x4d2c6dfc5ac42aed, 0x53380d139d95b3df,
    0x650a73548baf63de, 0x766a0abb3c77b2a8, 0x81c2c92e47edaee6, 0x92722c851482353b,
    0xa2bfe8a14cf10364, 0xa81a664bbc423001, 0xc24b8b70d0f89791, 0xc76c51a30654be30,
    0xd192e819d6ef5218, 0xd69906245565a910, 0xf40e35855771202a, 0x106aa07032bbd1b8,
    0x19a4c116b8d2d0c8, 0x1e376c085141ab53, 0x2748774cdf8eeb99, 0x34b0bcb5e19b48a8,
    0x391c0cb3c5c95a63, 0x4ed8aa4ae3418acb, 0x5b9cca4f7763e373, 0x682e6ff3d6b2b8a3,
    0x748f82ee5defb2fc, 0x78a5636f43172f60, 0x84c87814a1f0ab72, 0x8cc702081a6439ec,
    0x90befffa23631e28, 0xa4506cebde82bde9, 0xbef9a3f7b2c67915, 0xc67178f2e372532b,
    0xca273eceea26619c, 0xd186b8c721c0c207, 0xeada7dd6cde0eb1e, 0xf57d4f7fee6ed178,
    0x06f067aa72176fba, 0x0a637dc5a2c898a6, 0x113f9804bef90dae, 0x1b710b35131c471b,
    0x28db77f523047d84, 0x32caab7b40c72493, 0x3c9ebe0a15c9bebc, 0x431d67c49c100d4c,
    0x4cc5d4becb3e42b6, 0x597f299cfc657e2a, 0x5fcb6fab3ad6faec, 0x6c44198c4a475817,
];

const H224: [u32; 8] = [
    0xc1059ed8, 0x367cd507, 0x3070dd17, 0xf70e5939, 0xffc00b31, 0x68581511, 0x64f98fa7, 0xbefa4fa4,
];

const H256: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

const H384: [u64; 8] = [
    0xcbbb9d5dc1059ed8, 0x629a292a367cd507, 0x9159015a3070dd17, 0x152fecd8f70e5939,
    0x67332667ffc00b31, 0x8eb44a8768581511, 0xdb0c2e0d64f98fa7, 0x47b5481dbefa4fa4,
];

const H512: [u64; 8] = [
    0x6a09e667f3bcc908, 0xbb67ae8584caa73b, 0x3c6ef372fe94f82b, 0xa54ff53a5f1d36f1,
    0x510e527fade682d1, 0x9b05688c2b3e6c1f, 0x1f83d9abfb41bd6b, 0x5be0cd19137e2179,
];

const H512_224: [u64; 8] = [
    0x8c3d37c819544da2, 0x73e1996689dcd4d6, 0x1dfab7ae32ff9c82, 0x679dd514582f9fcf,
    0x0f6d2b697bd44da8, 0x77e36f7304c48942, 0x3f9d85a86a1d36c8, 0x1112e6ad91d692a1,
];

const H512_256: [u64; 8] = [
    0x22312194fc2bf72c, 0x9f555fa3c84c64c2, 0x2393b86b6f53b151, 0x963877195940eabd,
    0x96283ee2a88effe3, 0xbe5e1e2553863992, 0x2b0199fc2c85b8aa, 0x0eb72ddc81c52ca2,
];

/// Generic 64-round SHA-256 block compression.
fn compress256_generic(state: &mut [u32; 8], block: &[u8; 64]) {
    let mut w = [0u32; 64];
    for (slot, chunk) in w.iter_mut().zip(block.chunks_exact(4)) {
        *slot = u32::from_be_bytes(chunk.try_into().unwrap());
    }
    for t in 16..64 {
        let s0 = w[t - 15].rotate_right(7) ^ w[t - 15].rotate_right(18) ^ (w[t - 15] >> 3);
        let s1 = w[t - 2].rotate_right(17) ^ w[t - 2].rotate_right(19) ^ (w[t - 2] >> 10);
        w[t] = w[t - 16]
            .wrapping_add(s0)
            .wrapping_add(w[t - 7])
            .wrapping_add(s1);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

    for t in 0..64 {
        let s1 = e.rotate_right(6) ^ e.rotate_right(11) ^ e.rotate_right(25);
        let ch = (e & f) ^ (!e & g);
        let t1 = h
            .wrapping_add(s1)
            .wrapping_add(ch)
            .wrapping_add(K256[t])
            .wrapping_add(w[t]);
        let s0 = a.rotate_right(2) ^ a.rotate_right(13) ^ a.rotate_right(22);
        let maj = (a & b) ^ (a & c) ^ (b & c);
        let t2 = s0.wrapping_add(maj);

        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    for (s, v) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *s = s.wrapping_add(v);
    }
}

/// Returns whether the SHA-NI path is available on this host.
#[cfg(target_arch = "x86_64")]
fn sha_ni_available() -> bool {
    use std::sync::OnceLock;
    static PROBE: OnceLock<bool> = OnceLock::new();
    *PROBE.get_or_init(|| std::arch::is_x86_feature_detected!("sha"))
}

#[cfg(not(target_arch = "x86_64"))]
fn sha_ni_available() -> bool {
    false
}

/// SHA-256 block compression with hardware dispatch.
fn compress256(state: &mut [u32; 8], block: &[u8; 64]) {
    #[cfg(target_arch = "x86_64")]
    if sha_ni_available() {
        unsafe { ni::compress256(state, block) };
        return;
    }

    compress256_generic(state, block);
}

#[cfg(target_arch = "x86_64")]
mod ni {
    //! SHA-NI accelerated SHA-256 compression.
    //!
    //! The state is carried in the (ABEF, CDGH) register split the
    //! `sha256rnds2` instruction expects; message quads flow through the
    //! `sha256msg1`/`sha256msg2` schedule helpers. Output is bit-identical
    //! to the generic core.

    use core::arch::x86_64::*;

    use super::K256;

    #[target_feature(enable = "sha", enable = "sse2", enable = "ssse3", enable = "sse4.1")]
    pub unsafe fn compress256(state: &mut [u32; 8], block: &[u8; 64]) {
        unsafe {
            let shuf = _mm_set_epi64x(0x0c0d_0e0f_0809_0a0b, 0x0405_0607_0001_0203);

            // Load (a,b,c,d),(e,f,g,h) and repack as ABEF / CDGH.
            let mut tmp = _mm_loadu_si128(state.as_ptr() as *const __m128i);
            let mut s1 = _mm_loadu_si128(state.as_ptr().add(4) as *const __m128i);
            tmp = _mm_shuffle_epi32(tmp, 0xb1);
            s1 = _mm_shuffle_epi32(s1, 0x1b);
            let mut s0 = _mm_alignr_epi8(tmp, s1, 8);
            s1 = _mm_blend_epi16(s1, tmp, 0xf0);

            let abef_save = s0;
            let cdgh_save = s1;

            let k = |i: usize| {
                _mm_set_epi32(
                    K256[4 * i + 3] as i32,
                    K256[4 * i + 2] as i32,
                    K256[4 * i + 1] as i32,
                    K256[4 * i] as i32,
                )
            };

            let mut msg0 =
                _mm_shuffle_epi8(_mm_loadu_si128(block.as_ptr() as *const __m128i), shuf);
            let mut msg1 =
                _mm_shuffle_epi8(_mm_loadu_si128(block.as_ptr().add(16) as *const __m128i), shuf);
            let mut msg2 =
                _mm_shuffle_epi8(_mm_loadu_si128(block.as_ptr().add(32) as *const __m128i), shuf);
            let mut msg3 =
                _mm_shuffle_epi8(_mm_loadu_si128(block.as_ptr().add(48) as *const __m128i), shuf);

            let mut m;
            let mut t;

            // Middle quads: four rounds, one msg2 schedule fold and one
            // msg1 prefold, with the message registers rotating roles.
            macro_rules! quad {
                ($i:expr, $cur:ident, $prev:ident, $next:ident) => {
                    m = _mm_add_epi32($cur, k($i));
                    s1 = _mm_sha256rnds2_epu32(s1, s0, m);
                    t = _mm_alignr_epi8($cur, $prev, 4);
                    $next = _mm_add_epi32($next, t);
                    $next = _mm_sha256msg2_epu32($next, $cur);
                    m = _mm_shuffle_epi32(m, 0x0e);
                    s0 = _mm_sha256rnds2_epu32(s0, s1, m);
                    $prev = _mm_sha256msg1_epu32($prev, $cur);
                };
            }

            // Rounds 0..16: straight message words.
            m = _mm_add_epi32(msg0, k(0));
            s1 = _mm_sha256rnds2_epu32(s1, s0, m);
            m = _mm_shuffle_epi32(m, 0x0e);
            s0 = _mm_sha256rnds2_epu32(s0, s1, m);

            m = _mm_add_epi32(msg1, k(1));
            s1 = _mm_sha256rnds2_epu32(s1, s0, m);
            m = _mm_shuffle_epi32(m, 0x0e);
            s0 = _mm_sha256rnds2_epu32(s0, s1, m);
            msg0 = _mm_sha256msg1_epu32(msg0, msg1);

            m = _mm_add_epi32(msg2, k(2));
            s1 = _mm_sha256rnds2_epu32(s1, s0, m);
            m = _mm_shuffle_epi32(m, 0x0e);
            s0 = _mm_sha256rnds2_epu32(s0, s1, m);
            msg1 = _mm_sha256msg1_epu32(msg1, msg2);

            m = _mm_add_epi32(msg3, k(3));
            s1 = _mm_sha256rnds2_epu32(s1, s0, m);
            t = _mm_alignr_epi8(msg3, msg2, 4);
            msg0 = _mm_add_epi32(msg0, t);
            msg0 = _mm_sha256msg2_epu32(msg0, msg3);
            m = _mm_shuffle_epi32(m, 0x0e);
            s0 = _mm_sha256rnds2_epu32(s0, s1, m);
            msg2 = _mm_sha256msg1_epu32(msg2, msg3);

            quad!(4, msg0, msg3, msg1);
            quad!(5, msg1, msg0, msg2);
            quad!(6, msg2, msg1, msg3);
            quad!(7, msg3, msg2, msg0);
            quad!(8, msg0, msg3, msg1);
            quad!(9, msg1, msg0, msg2);
            quad!(10, msg2, msg1, msg3);
            quad!(11, msg3, msg2, msg0);

            // Tail quads: the schedule is complete, only rounds remain.
            m = _mm_add_epi32(msg0, k(12));
            s1 = _mm_sha256rnds2_epu32(s1, s0, m);
            t = _mm_alignr_epi8(msg0, msg3, 4);
            msg1 = _mm_add_epi32(msg1, t);
            msg1 = _mm_sha256msg2_epu32(msg1, msg0);
            m = _mm_shuffle_epi32(m, 0x0e);
            s0 = _mm_sha256rnds2_epu32(s0, s1, m);

            m = _mm_add_epi32(msg1, k(13));
            s1 = _mm_sha256rnds2_epu32(s1, s0, m);
            t = _mm_alignr_epi8(msg1, msg0, 4);
            msg2 = _mm_add_epi32(msg2, t);
            msg2 = _mm_sha256msg2_epu32(msg2, msg1);
            m = _mm_shuffle_epi32(m, 0x0e);
            s0 = _mm_sha256rnds2_epu32(s0, s1, m);

            m = _mm_add_epi32(msg2, k(14));
            s1 = _mm_sha256rnds2_epu32(s1, s0, m);
            t = _mm_alignr_epi8(msg2, msg1, 4);
            msg3 = _mm_add_epi32(msg3, t);
            msg3 = _mm_sha256msg2_epu32(msg3, msg2);
            m = _mm_shuffle_epi32(m, 0x0e);
            s0 = _mm_sha256rnds2_epu32(s0, s1, m);

            m = _mm_add_epi32(msg3, k(15));
            s1 = _mm_sha256rnds2_epu32(s1, s0, m);
            m = _mm_shuffle_epi32(m, 0x0e);
            s0 = _mm_sha256rnds2_epu32(s0, s1, m);

            s0 = _mm_add_epi32(s0, abef_save);
            s1 = _mm_add_epi32(s1, cdgh_save);

            // Repack ABEF/CDGH back to (a..d),(e..h).
            tmp = _mm_shuffle_epi32(s0, 0x1b);
            s1 = _mm_shuffle_epi32(s1, 0xb1);
            let out0 = _mm_blend_epi16(tmp, s1, 0xf0);
            let out1 = _mm_alignr_epi8(s1, tmp, 8);

            _mm_storeu_si128(state.as_mut_ptr() as *mut __m128i, out0);
            _mm_storeu_si128(state.as_mut_ptr().add(4) as *mut __m128i, out1);
        }
    }
}

/// Generic 80-round SHA-512 block compression.
fn compress512(state: &mut [u64; 8], block: &[u8; 128]) {
    let mut w = [0u64; 80];
    for (slot, chunk) in w.iter_mut().zip(block.chunks_exact(8)) {
        *slot = u64::from_be_bytes(chunk.try_into().unwrap());
    }
    for t in 16..80 {
        let s0 = w[t - 15].rotate_right(1) ^ w[t - 15].rotate_right(8) ^ (w[t - 15] >> 7);
        let s1 = w[t - 2].rotate_right(19) ^ w[t - 2].rotate_right(61) ^ (w[t - 2] >> 6);
        w[t] = w[t - 16]
            .wrapping_add(s0)
            .wrapping_add(w[t - 7])
            .wrapping_add(s1);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

    for t in 0..80 {
        let s1 = e.rotate_right(14) ^ e.rotate_right(18) ^ e.rotate_right(41);
        let ch = (e & f) ^ (!e & g);
        let t1 = h
            .wrapping_add(s1)
            .wrapping_add(ch)
            .wrapping_add(K512[t])
            .wrapping_add(w[t]);
        let s0 = a.rotate_right(28) ^ a.rotate_right(34) ^ a.rotate_right(39);
        let maj = (a & b) ^ (a & c) ^ (b & c);
        let t2 = s0.wrapping_add(maj);

        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    for (s, v) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *s = s.wrapping_add(v);
    }
}

/// Streaming engine for the 32-bit core.
#[derive(Clone)]
struct Engine256 {
    iv: [u32; 8],
    state: [u32; 8],
    buffer: [u8; 64],
    buffered: usize,
    total: u64,
}

impl Engine256 {
    fn new(iv: [u32; 8]) -> Self {
        Self { iv, state: iv, buffer: [0; 64], buffered: 0, total: 0 }
    }

    fn update(&mut self, mut data: &[u8]) {
        self.total = self.total.wrapping_add(data.len() as u64);

        if self.buffered > 0 {
            let take = (64 - self.buffered).min(data.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];
            if self.buffered == 64 {
                let block = self.buffer;
                compress256(&mut self.state, &block);
                self.buffered = 0;
            }
        }

        while data.len() >= 64 {
            compress256(&mut self.state, data[..64].try_into().unwrap());
            data = &data[64..];
        }

        self.buffer[..data.len()].copy_from_slice(data);
        self.buffered = data.len();
    }

    fn finalize(&mut self) -> [u32; 8] {
        let mut block = [0u8; 64];
        block[..self.buffered].copy_from_slice(&self.buffer[..self.buffered]);
        block[self.buffered] = 0x80;

        if self.buffered > 55 {
            compress256(&mut self.state, &block);
            block = [0; 64];
        }
        block[56..].copy_from_slice(&(self.total << 3).to_be_bytes());
        compress256(&mut self.state, &block);

        let out = self.state;
        self.reset();
        out
    }

    fn reset(&mut self) {
        self.state = self.iv;
        self.buffer = [0; 64];
        self.buffered = 0;
        self.total = 0;
    }
}

/// Streaming engine for the 64-bit core.
#[derive(Clone)]
struct Engine512 {
    iv: [u64; 8],
    state: [u64; 8],
    buffer: [u8; 128],
    buffered: usize,
    total: u128,
}

impl Engine512 {
    fn new(iv: [u64; 8]) -> Self {
        Self { iv, state: iv, buffer: [0; 128], buffered: 0, total: 0 }
    }

    fn update(&mut self, mut data: &[u8]) {
        self.total = self.total.wrapping_add(data.len() as u128);

        if self.buffered > 0 {
            let take = (128 - self.buffered).min(data.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];
            if self.buffered == 128 {
                let block = self.buffer;
                compress512(&mut self.state, &block);
                self.buffered = 0;
            }
        }

        while data.len() >= 128 {
            compress512(&mut self.state, data[..128].try_into().unwrap());
            data = &data[128..];
        }

        self.buffer[..data.len()].copy_from_slice(data);
        self.buffered = data.len();
    }

    fn finalize(&mut self) -> [u64; 8] {
        let mut block = [0u8; 128];
        block[..self.buffered].copy_from_slice(&self.buffer[..self.buffered]);
        block[self.buffered] = 0x80;

        if self.buffered > 111 {
            compress512(&mut self.state, &block);
            block = [0; 128];
        }
        block[112..].copy_from_slice(&(self.total << 3).to_be_bytes());
        compress512(&mut self.state, &block);

        let out = self.state;
        self.reset();
        out
    }

    fn reset(&mut self) {
        self.state = self.iv;
        self.buffer = [0; 128];
        self.buffered = 0;
        self.total = 0;
    }
}

macro_rules! sha2_variant_32 {
    ($name:ident, $iv:expr, $out:expr) => {
        /// SHA-2 digest over the 32-bit core.
        #[derive(Clone)]
        pub struct $name(Engine256);

        impl $name {
            /// Fresh state.
            pub fn new() -> Self {
                Self(Engine256::new($iv))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Hash for $name {
            fn output_len(&self) -> usize {
                $out
            }

            fn block_len(&self) -> usize {
                64
            }

            fn update(&mut self, data: &[u8]) {
                self.0.update(data);
            }

            fn finalize(&mut self) -> Vec<u8> {
                let state = self.0.finalize();
                state
                    .iter()
                    .flat_map(|w| w.to_be_bytes())
                    .take($out)
                    .collect()
            }

            fn get_copy(&self) -> Box<dyn Hash> {
                Box::new(self.clone())
            }

            fn reset(&mut self) {
                self.0.reset();
            }
        }
    };
}

macro_rules! sha2_variant_64 {
    ($name:ident, $iv:expr, $out:expr) => {
        /// SHA-2 digest over the 64-bit core.
        #[derive(Clone)]
        pub struct $name(Engine512);

        impl $name {
            /// Fresh state.
            pub fn new() -> Self {
                Self(Engine512::new($iv))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Hash for $name {
            fn output_len(&self) -> usize {
                $out
            }

            fn block_len(&self) -> usize {
                128
            }

            fn update(&mut self, data: &[u8]) {
                self.0.update(data);
            }

            fn finalize(&mut self) -> Vec<u8> {
                let state = self.0.finalize();
                state
                    .iter()
                    .flat_map(|w| w.to_be_bytes())
                    .take($out)
                    .collect()
            }

            fn get_copy(&self) -> Box<dyn Hash> {
                Box::new(self.clone())
            }

            fn reset(&mut self) {
                self.0.reset();
            }
        }
    };
}

sha2_variant_32!(Sha224, H224, 28);
sha2_variant_32!(Sha256, H256, 32);
sha2_variant_64!(Sha384, H384, 48);
sha2_variant_64!(Sha512, H512, 64);
sha2_variant_64!(Sha512_224, H512_224, 28);
sha2_variant_64!(Sha512_256, H512_256, 32);
