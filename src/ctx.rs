//! Scheme catalogue and the per-user context API.
//!
//! A [`PkcContext`] is created for one scheme/parameter-set pair, owns its
//! key buffers, hash/XOF/CSPRNG handles and cached precomputations, and is
//! mutated only through the operations below. Contexts are single-threaded
//! by design; two contexts never share mutable state. Sensitive buffers
//! are scrubbed when the context is dropped.
//!
//! Key material crosses this boundary as the structured byte formats of
//! the specification: packed `t ‖ ρ` for the lattice KEMs, `X ‖ Y` octet
//! strings for ECDSA, little-endian RFC 8032 encodings for EdDSA, and a
//! length-prefixed field sequence for RSA (the structured fields are also
//! exposed directly for pluggable encoders).

use crate::core::ct;
use crate::core::limb::Limb;
use crate::core::mpz::{ByteOrder, Mpz};
use crate::ecc::config::{CurveConfig, by_name};
use crate::error::{Error, Result};
use crate::hash::HashAlg;
use crate::packing::{Packer, Unpacker};
use crate::rng::{Csprng, EntropyCallback, os_entropy};
use crate::schemes::eddsa::EddsaVariant;
use crate::schemes::{dilithium, ecdh, ecdsa, eddsa, kyber, rsa, saber};

/// The limb width the scheme cores are instantiated with.
type W = u64;

/// Stable scheme identifiers (§6 catalogue).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PkcScheme {
    PkeKyber,
    PkeSaber,
    PkeRsaesOaep,
    KemKyber,
    KemSaber,
    SigDilithium,
    SigEcdsa,
    SigEddsa,
    SigRsassaPss,
    KeyEcdh,
    /// Reserved catalogue entry; `create_ctx` rejects it.
    IbeDlp,
}

/// RSA key material exposed as structured hexadecimal fields for
/// pluggable key encoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKeyFields {
    pub n: String,
    pub e: String,
    pub d: Option<String>,
    pub p: Option<String>,
    pub q: Option<String>,
    pub exp1: Option<String>,
    pub exp2: Option<String>,
    pub inv: Option<String>,
}

struct RsaCtx {
    bits: usize,
    hash: HashAlg,
    public: Option<rsa::RsaPublicKey<W>>,
    private: Option<rsa::RsaPrivateKey<W>>,
}

struct EcdsaCtx {
    cfg: CurveConfig<W>,
    hash: HashAlg,
    deterministic: bool,
    d: Option<Mpz<W>>,
    q: Option<(Mpz<W>, Mpz<W>)>,
}

struct EddsaCtx {
    variant: EddsaVariant,
    seed: Option<Vec<u8>>,
    public: Option<Vec<u8>>,
}

struct EcdhCtx {
    cfg: CurveConfig<W>,
    state: Option<ecdh::EcdhState<W>>,
}

struct KyberCtx {
    params: kyber::KyberParams,
    public: Option<Vec<u8>>,
    secret: Option<Vec<u8>>,
}

struct SaberCtx {
    params: saber::SaberParams,
    public: Option<Vec<u8>>,
    secret: Option<Vec<u8>>,
}

struct DilithiumCtx {
    params: dilithium::DilithiumParams,
    public: Option<Vec<u8>>,
    secret: Option<Vec<u8>>,
}

enum SchemeCtx {
    Rsa(RsaCtx),
    Ecdsa(EcdsaCtx),
    Eddsa(EddsaCtx),
    Ecdh(EcdhCtx),
    Kyber(KyberCtx),
    Saber(SaberCtx),
    Dilithium(DilithiumCtx),
}

/// Per-user scheme context.
pub struct PkcContext {
    scheme: PkcScheme,
    /// Requested limb width; the arithmetic layer is parametric in it,
    /// the scheme cores run the widest instantiation.
    word_size_hint: usize,
    /// Masking request: public-exponent paths also take the ladder.
    masking: bool,
    prng: Csprng,
    inner: SchemeCtx,
}

fn rsa_bits_for_set(set: usize) -> Result<usize> {
    match set {
        0 => Ok(1024),
        1 => Ok(1536),
        2 => Ok(2048),
        3 => Ok(3072),
        4 => Ok(4096),
        _ => Err(Error::InvalidParameterSet),
    }
}

/// Creates a context for `(scheme, parameter_set)` with the default OS
/// entropy source.
pub fn create_ctx(
    scheme: PkcScheme,
    parameter_set: usize,
    word_size_hint: usize,
    masking: bool,
) -> Result<PkcContext> {
    create_ctx_with_entropy(scheme, parameter_set, word_size_hint, masking, os_entropy)
}

/// Creates a context with a caller-supplied entropy callback.
pub fn create_ctx_with_entropy(
    scheme: PkcScheme,
    parameter_set: usize,
    word_size_hint: usize,
    masking: bool,
    entropy: EntropyCallback,
) -> Result<PkcContext> {
    if !matches!(word_size_hint, 0 | 8 | 16 | 32 | 64) {
        return Err(Error::InvalidParameterSet);
    }

    let inner = match scheme {
        PkcScheme::PkeRsaesOaep | PkcScheme::SigRsassaPss => SchemeCtx::Rsa(RsaCtx {
            bits: rsa_bits_for_set(parameter_set)?,
            hash: HashAlg::Sha2_256,
            public: None,
            private: None,
        }),
        PkcScheme::SigEcdsa => {
            let (name, hash) = match parameter_set {
                0 => ("secp256r1", HashAlg::Sha2_256),
                1 => ("secp384r1", HashAlg::Sha2_384),
                2 => ("sect233r1", HashAlg::Sha2_256),
                _ => return Err(Error::InvalidParameterSet),
            };
            SchemeCtx::Ecdsa(EcdsaCtx {
                cfg: by_name(name)?,
                hash,
                deterministic: false,
                d: None,
                q: None,
            })
        }
        PkcScheme::SigEddsa => {
            let variant = match parameter_set {
                0 => EddsaVariant::ed25519(),
                1 => EddsaVariant::ed448(),
                2 => EddsaVariant {
                    prehash: true,
                    ..EddsaVariant::ed25519()
                },
                3 => EddsaVariant {
                    prehash: true,
                    ..EddsaVariant::ed448()
                },
                _ => return Err(Error::InvalidParameterSet),
            };
            SchemeCtx::Eddsa(EddsaCtx { variant, seed: None, public: None })
        }
        PkcScheme::KeyEcdh => {
            let name = match parameter_set {
                0 => "secp256r1",
                1 => "secp384r1",
                2 => "curve25519",
                _ => return Err(Error::InvalidParameterSet),
            };
            SchemeCtx::Ecdh(EcdhCtx { cfg: by_name(name)?, state: None })
        }
        PkcScheme::PkeKyber | PkcScheme::KemKyber => SchemeCtx::Kyber(KyberCtx {
            params: kyber::KyberParams::by_set(parameter_set)?,
            public: None,
            secret: None,
        }),
        PkcScheme::PkeSaber | PkcScheme::KemSaber => SchemeCtx::Saber(SaberCtx {
            params: saber::SaberParams::by_set(parameter_set)?,
            public: None,
            secret: None,
        }),
        PkcScheme::SigDilithium => SchemeCtx::Dilithium(DilithiumCtx {
            params: dilithium::DilithiumParams::by_set(parameter_set)?,
            public: None,
            secret: None,
        }),
        PkcScheme::IbeDlp => return Err(Error::InvalidParameterSet),
    };

    Ok(PkcContext {
        scheme,
        word_size_hint: if word_size_hint == 0 { 64 } else { word_size_hint },
        masking,
        prng: Csprng::make(1 << 20, entropy)?,
        inner,
    })
}

fn pack_mpz_fields(fields: &[&Mpz<W>]) -> Result<Vec<u8>> {
    let total: usize = fields.iter().map(|f| f.bit_length().div_ceil(8) + 4).sum();
    let mut p = Packer::new(total + 8);
    for f in fields {
        let bytes = f.to_bytes_minimal();
        p.write(bytes.len() as u32, 32)?;
        p.write_bytes(&bytes)?;
    }
    p.finish()
}

fn unpack_mpz_fields(bytes: &[u8], count: usize) -> Result<Vec<Mpz<W>>> {
    let mut u = Unpacker::new(bytes);
    (0..count)
        .map(|_| {
            let len = u.read(32)? as usize;
            let b = u.read_bytes(len)?;
            Ok(Mpz::from_bytes(&b, ByteOrder::BigEndian))
        })
        .collect()
}

impl PkcContext {
    /// The scheme this context was created for.
    pub fn scheme(&self) -> PkcScheme {
        self.scheme
    }

    /// The stored word-size hint.
    pub fn word_size_hint(&self) -> usize {
        self.word_size_hint
    }

    /// Whether extra masking was requested at creation.
    pub fn masking(&self) -> bool {
        self.masking
    }

    /// Generates a fresh key pair into the context.
    pub fn keygen(&mut self) -> Result<()> {
        match &mut self.inner {
            SchemeCtx::Rsa(c) => {
                let e = Mpz::from_u64(65537);
                let key = rsa::keygen(&mut self.prng, c.bits, e)?;
                c.public = Some(key.public.clone());
                c.private = Some(key);
            }
            SchemeCtx::Ecdsa(c) => {
                let mut bytes = vec![0u8; c.cfg.order_bytes()];
                let d = loop {
                    self.prng.get_mem(&mut bytes)?;
                    let d = Mpz::from_bytes(&bytes, ByteOrder::BigEndian)
                        .mod_positive(c.cfg.order.modulus())?;
                    if !d.is_zero() {
                        break d;
                    }
                };
                let k = d.to_bytes(ByteOrder::BigEndian, c.cfg.order_bytes())?;
                let p = crate::ecc::scalar_mul(&c.cfg, &k, &c.cfg.gx, &c.cfg.gy, true)?;
                c.q = Some(p.convert_from(&c.cfg)?);
                c.d = Some(d);
            }
            SchemeCtx::Eddsa(c) => {
                let mut seed = vec![0u8; c.variant.enc_len()];
                self.prng.get_mem(&mut seed)?;
                c.public = Some(eddsa::derive_public::<W>(&c.variant, &seed)?);
                c.seed = Some(seed);
            }
            SchemeCtx::Ecdh(_) => {
                // Key exchange generates its ephemeral key in `ke_init` /
                // `ke_setup`.
                return Err(Error::InvalidParameterSet);
            }
            SchemeCtx::Kyber(c) => {
                let keys = kyber::kem::keygen(&c.params, &mut self.prng)?;
                c.public = Some(keys.public);
                c.secret = Some(keys.secret);
            }
            SchemeCtx::Saber(c) => {
                let keys = saber::kem::keygen(&c.params, &mut self.prng)?;
                c.public = Some(keys.public);
                c.secret = Some(keys.secret);
            }
            SchemeCtx::Dilithium(c) => {
                let keys = dilithium::keygen(&c.params, &mut self.prng)?;
                c.public = Some(keys.public);
                c.secret = Some(keys.secret);
            }
        }
        Ok(())
    }

    /// Loads a public key from its wire format.
    pub fn set_public_key(&mut self, bytes: &[u8]) -> Result<()> {
        match &mut self.inner {
            SchemeCtx::Rsa(c) => {
                let f = unpack_mpz_fields(bytes, 2)?;
                c.public = Some(rsa::RsaPublicKey::new(f[0].clone(), f[1].clone())?);
            }
            SchemeCtx::Ecdsa(c) => {
                let fb = c.cfg.field_bytes();
                if bytes.len() != 2 * fb {
                    return Err(Error::InvalidKey);
                }
                let x = Mpz::from_bytes(&bytes[..fb], ByteOrder::BigEndian);
                let y = Mpz::from_bytes(&bytes[fb..], ByteOrder::BigEndian);
                c.q = Some((x, y));
            }
            SchemeCtx::Eddsa(c) => {
                if bytes.len() != c.variant.enc_len() {
                    return Err(Error::InvalidKey);
                }
                c.public = Some(bytes.to_vec());
            }
            SchemeCtx::Kyber(c) => {
                if bytes.len() != c.params.public_key_bytes() {
                    return Err(Error::InvalidKey);
                }
                c.public = Some(bytes.to_vec());
            }
            SchemeCtx::Saber(c) => {
                if bytes.len() != c.params.public_key_bytes() {
                    return Err(Error::InvalidKey);
                }
                c.public = Some(bytes.to_vec());
            }
            SchemeCtx::Dilithium(c) => {
                if bytes.len() != c.params.public_key_bytes() {
                    return Err(Error::InvalidKey);
                }
                c.public = Some(bytes.to_vec());
            }
            SchemeCtx::Ecdh(_) => return Err(Error::InvalidParameterSet),
        }
        Ok(())
    }

    /// Emits the public key in its wire format.
    pub fn get_public_key(&self) -> Result<Vec<u8>> {
        match &self.inner {
            SchemeCtx::Rsa(c) => {
                let pk = c.public.as_ref().ok_or(Error::InvalidKey)?;
                pack_mpz_fields(&[&pk.n, &pk.e])
            }
            SchemeCtx::Ecdsa(c) => {
                let (x, y) = c.q.as_ref().ok_or(Error::InvalidKey)?;
                let fb = c.cfg.field_bytes();
                let mut out = x.to_bytes(ByteOrder::BigEndian, fb)?;
                out.extend(y.to_bytes(ByteOrder::BigEndian, fb)?);
                Ok(out)
            }
            SchemeCtx::Eddsa(c) => c.public.clone().ok_or(Error::InvalidKey),
            SchemeCtx::Kyber(c) => c.public.clone().ok_or(Error::InvalidKey),
            SchemeCtx::Saber(c) => c.public.clone().ok_or(Error::InvalidKey),
            SchemeCtx::Dilithium(c) => c.public.clone().ok_or(Error::InvalidKey),
            SchemeCtx::Ecdh(_) => Err(Error::InvalidParameterSet),
        }
    }

    /// Loads a private key from its wire format.
    pub fn set_private_key(&mut self, bytes: &[u8]) -> Result<()> {
        match &mut self.inner {
            SchemeCtx::Rsa(c) => {
                let f = unpack_mpz_fields(bytes, 8)?;
                let key = rsa::RsaPrivateKey::from_fields(
                    f[0].clone(),
                    f[1].clone(),
                    f[2].clone(),
                    f[3].clone(),
                    f[4].clone(),
                    f[5].clone(),
                    f[6].clone(),
                    f[7].clone(),
                )?;
                c.public = Some(key.public.clone());
                c.private = Some(key);
            }
            SchemeCtx::Ecdsa(c) => {
                let d = Mpz::from_bytes(bytes, ByteOrder::BigEndian);
                if d.is_zero()
                    || d.cmp_abs(c.cfg.order.modulus()) != core::cmp::Ordering::Less
                {
                    return Err(Error::InvalidKey);
                }
                let k = d.to_bytes(ByteOrder::BigEndian, c.cfg.order_bytes())?;
                let p = crate::ecc::scalar_mul(&c.cfg, &k, &c.cfg.gx, &c.cfg.gy, true)?;
                c.q = Some(p.convert_from(&c.cfg)?);
                c.d = Some(d);
            }
            SchemeCtx::Eddsa(c) => {
                if bytes.len() != c.variant.enc_len() {
                    return Err(Error::InvalidKey);
                }
                c.public = Some(eddsa::derive_public::<W>(&c.variant, bytes)?);
                c.seed = Some(bytes.to_vec());
            }
            SchemeCtx::Kyber(c) => {
                if bytes.len() != kyber::kem::secret_key_bytes(&c.params) {
                    return Err(Error::InvalidKey);
                }
                c.secret = Some(bytes.to_vec());
            }
            SchemeCtx::Saber(c) => {
                if bytes.len() != saber::kem::secret_key_bytes(&c.params) {
                    return Err(Error::InvalidKey);
                }
                c.secret = Some(bytes.to_vec());
            }
            SchemeCtx::Dilithium(c) => {
                c.secret = Some(bytes.to_vec());
            }
            SchemeCtx::Ecdh(_) => return Err(Error::InvalidParameterSet),
        }
        Ok(())
    }

    /// Emits the private key in its wire format.
    pub fn get_private_key(&self) -> Result<Vec<u8>> {
        match &self.inner {
            SchemeCtx::Rsa(c) => {
                let sk = c.private.as_ref().ok_or(Error::InvalidKey)?;
                pack_mpz_fields(&[
                    &sk.public.n,
                    &sk.public.e,
                    &sk.d,
                    &sk.p,
                    &sk.q,
                    &sk.dp,
                    &sk.dq,
                    &sk.qinv,
                ])
            }
            SchemeCtx::Ecdsa(c) => {
                let d = c.d.as_ref().ok_or(Error::InvalidKey)?;
                d.to_bytes(ByteOrder::BigEndian, c.cfg.order_bytes())
            }
            SchemeCtx::Eddsa(c) => c.seed.clone().ok_or(Error::InvalidKey),
            SchemeCtx::Kyber(c) => c.secret.clone().ok_or(Error::InvalidKey),
            SchemeCtx::Saber(c) => c.secret.clone().ok_or(Error::InvalidKey),
            SchemeCtx::Dilithium(c) => c.secret.clone().ok_or(Error::InvalidKey),
            SchemeCtx::Ecdh(_) => Err(Error::InvalidParameterSet),
        }
    }

    /// RSA structured key fields for pluggable encoders.
    pub fn rsa_key_fields(&self) -> Result<RsaKeyFields> {
        let SchemeCtx::Rsa(c) = &self.inner else {
            return Err(Error::InvalidParameterSet);
        };
        let pk = c.public.as_ref().ok_or(Error::InvalidKey)?;

        let hexed = |v: &Mpz<W>| v.to_str_radix(16);
        let mut fields = RsaKeyFields {
            n: hexed(&pk.n)?,
            e: hexed(&pk.e)?,
            d: None,
            p: None,
            q: None,
            exp1: None,
            exp2: None,
            inv: None,
        };

        if let Some(sk) = &c.private {
            fields.d = Some(hexed(&sk.d)?);
            fields.p = Some(hexed(&sk.p)?);
            fields.q = Some(hexed(&sk.q)?);
            fields.exp1 = Some(hexed(&sk.dp)?);
            fields.exp2 = Some(hexed(&sk.dq)?);
            fields.inv = Some(hexed(&sk.qinv)?);
        }

        Ok(fields)
    }

    /// Maximum plaintext (PKE) or message-hash length for this context.
    pub fn get_msg_len(&self) -> Result<usize> {
        match &self.inner {
            SchemeCtx::Rsa(c) => {
                let pk = c.public.as_ref().ok_or(Error::InvalidKey)?;
                Ok(rsa::oaep::max_msg_len(pk.byte_len(), c.hash))
            }
            SchemeCtx::Kyber(_) | SchemeCtx::Saber(_) => Ok(32),
            SchemeCtx::Ecdsa(c) => Ok(crate::hash::digest(c.hash, &[]).len()),
            _ => Ok(usize::MAX),
        }
    }

    /// Selects deterministic (RFC 6979) nonces for ECDSA.
    pub fn set_deterministic_nonces(&mut self, on: bool) -> Result<()> {
        match &mut self.inner {
            SchemeCtx::Ecdsa(c) => {
                c.deterministic = on;
                Ok(())
            }
            _ => Err(Error::InvalidParameterSet),
        }
    }

    /// Public-key encryption.
    pub fn pke_encrypt(&mut self, pt: &[u8]) -> Result<Vec<u8>> {
        match &mut self.inner {
            SchemeCtx::Rsa(c) => {
                let pk = c.public.as_ref().ok_or(Error::InvalidKey)?;
                rsa::oaep::encrypt(&mut self.prng, pk, c.hash, &[], pt)
            }
            SchemeCtx::Kyber(c) => {
                let pk = c.public.as_ref().ok_or(Error::InvalidKey)?;
                if pt.len() != 32 {
                    return Err(Error::InsufficientBuffer);
                }
                let mut m = [0u8; 32];
                m.copy_from_slice(pt);
                let mut coins = [0u8; 32];
                self.prng.get_mem(&mut coins)?;
                kyber::indcpa::encrypt(&c.params, pk, &m, &coins)
            }
            SchemeCtx::Saber(c) => {
                let pk = c.public.as_ref().ok_or(Error::InvalidKey)?;
                if pt.len() != 32 {
                    return Err(Error::InsufficientBuffer);
                }
                let mut m = [0u8; 32];
                m.copy_from_slice(pt);
                let mut coins = [0u8; 32];
                self.prng.get_mem(&mut coins)?;
                saber::indcpa::encrypt(&c.params, pk, &m, &coins)
            }
            _ => Err(Error::InvalidParameterSet),
        }
    }

    /// Public-key decryption.
    pub fn pke_decrypt(&mut self, ct_bytes: &[u8]) -> Result<Vec<u8>> {
        match &self.inner {
            SchemeCtx::Rsa(c) => {
                let sk = c.private.as_ref().ok_or(Error::InvalidKey)?;
                rsa::oaep::decrypt(sk, c.hash, &[], ct_bytes)
            }
            SchemeCtx::Kyber(c) => {
                let sk = c.secret.as_ref().ok_or(Error::InvalidKey)?;
                let cpa_len = c.params.indcpa_secret_key_bytes();
                let m = kyber::indcpa::decrypt(&c.params, &sk[..cpa_len], ct_bytes)?;
                Ok(m.to_vec())
            }
            SchemeCtx::Saber(c) => {
                let sk = c.secret.as_ref().ok_or(Error::InvalidKey)?;
                let cpa_len = c.params.indcpa_secret_key_bytes();
                let m = saber::indcpa::decrypt(&c.params, &sk[..cpa_len], ct_bytes)?;
                Ok(m.to_vec())
            }
            _ => Err(Error::InvalidParameterSet),
        }
    }

    /// KEM encapsulation, returning `(ciphertext, shared key)`.
    pub fn kem_encapsulate(&mut self) -> Result<(Vec<u8>, Vec<u8>)> {
        match &self.inner {
            SchemeCtx::Kyber(c) => {
                let pk = c.public.as_ref().ok_or(Error::InvalidKey)?;
                let (ct_bytes, key) =
                    kyber::kem::encapsulate(&c.params, pk, &mut self.prng)?;
                Ok((ct_bytes, key.to_vec()))
            }
            SchemeCtx::Saber(c) => {
                let pk = c.public.as_ref().ok_or(Error::InvalidKey)?;
                let (ct_bytes, key) =
                    saber::kem::encapsulate(&c.params, pk, &mut self.prng)?;
                Ok((ct_bytes, key.to_vec()))
            }
            _ => Err(Error::InvalidParameterSet),
        }
    }

    /// KEM decapsulation.
    pub fn kem_decapsulate(&mut self, ct_bytes: &[u8]) -> Result<Vec<u8>> {
        match &self.inner {
            SchemeCtx::Kyber(c) => {
                let sk = c.secret.as_ref().ok_or(Error::InvalidKey)?;
                Ok(kyber::kem::decapsulate(&c.params, sk, ct_bytes)?.to_vec())
            }
            SchemeCtx::Saber(c) => {
                let sk = c.secret.as_ref().ok_or(Error::InvalidKey)?;
                Ok(saber::kem::decapsulate(&c.params, sk, ct_bytes)?.to_vec())
            }
            _ => Err(Error::InvalidParameterSet),
        }
    }

    /// Signature generation.
    pub fn sig_sign(&mut self, msg: &[u8]) -> Result<Vec<u8>> {
        match &mut self.inner {
            SchemeCtx::Rsa(c) => {
                let sk = c.private.as_ref().ok_or(Error::InvalidKey)?;
                let s_len = crate::hash::digest(c.hash, &[]).len();
                rsa::pss::sign(&mut self.prng, sk, c.hash, s_len, msg)
            }
            SchemeCtx::Ecdsa(c) => {
                let d = c.d.as_ref().ok_or(Error::InvalidKey)?;
                let h = crate::hash::digest(c.hash, msg);
                let nonce = if c.deterministic {
                    ecdsa::NonceSource::Deterministic(c.hash)
                } else {
                    ecdsa::NonceSource::Random(&mut self.prng)
                };
                let (r, s) = ecdsa::sign(&c.cfg, d, &h, nonce)?;
                let ob = c.cfg.order_bytes();
                let mut sig = r.to_bytes(ByteOrder::BigEndian, ob)?;
                sig.extend(s.to_bytes(ByteOrder::BigEndian, ob)?);
                Ok(sig)
            }
            SchemeCtx::Eddsa(c) => {
                let seed = c.seed.as_ref().ok_or(Error::InvalidKey)?;
                eddsa::sign::<W>(&c.variant, seed, msg)
            }
            SchemeCtx::Dilithium(c) => {
                let sk = c.secret.as_ref().ok_or(Error::InvalidKey)?;
                dilithium::sign(&c.params, sk, msg, Some(&mut self.prng))
            }
            _ => Err(Error::InvalidParameterSet),
        }
    }

    /// Signature verification: `Ok(())` exactly when the signature is
    /// valid.
    pub fn sig_verify(&self, msg: &[u8], sig: &[u8]) -> Result<()> {
        match &self.inner {
            SchemeCtx::Rsa(c) => {
                let pk = c.public.as_ref().ok_or(Error::InvalidKey)?;
                let s_len = crate::hash::digest(c.hash, &[]).len();
                rsa::pss::verify(pk, c.hash, s_len, msg, sig)
            }
            SchemeCtx::Ecdsa(c) => {
                let (qx, qy) = c.q.as_ref().ok_or(Error::InvalidKey)?;
                let ob = c.cfg.order_bytes();
                if sig.len() != 2 * ob {
                    return Err(Error::InvalidSignature);
                }
                let h = crate::hash::digest(c.hash, msg);
                let r = Mpz::from_bytes(&sig[..ob], ByteOrder::BigEndian);
                let s = Mpz::from_bytes(&sig[ob..], ByteOrder::BigEndian);
                ecdsa::verify(&c.cfg, qx, qy, &h, &r, &s)
            }
            SchemeCtx::Eddsa(c) => {
                let pk = c.public.as_ref().ok_or(Error::InvalidKey)?;
                eddsa::verify::<W>(&c.variant, pk, msg, sig)
            }
            SchemeCtx::Dilithium(c) => {
                let pk = c.public.as_ref().ok_or(Error::InvalidKey)?;
                dilithium::verify(&c.params, pk, msg, sig)
            }
            _ => Err(Error::InvalidParameterSet),
        }
    }

    /// Key-exchange initiation: returns this side's public value.
    pub fn ke_init(&mut self) -> Result<Vec<u8>> {
        let SchemeCtx::Ecdh(c) = &mut self.inner else {
            return Err(Error::InvalidParameterSet);
        };
        let (state, public) = ecdh::ke_init(&c.cfg, &mut self.prng)?;
        c.state = Some(state);
        Ok(public)
    }

    /// Key-exchange response: returns `(public value, shared secret)`.
    pub fn ke_setup(&mut self, peer_public: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        let SchemeCtx::Ecdh(c) = &mut self.inner else {
            return Err(Error::InvalidParameterSet);
        };
        ecdh::ke_setup(&c.cfg, &mut self.prng, peer_public)
    }

    /// Key-exchange completion on the initiating side.
    pub fn ke_final(&mut self, peer_public: &[u8]) -> Result<Vec<u8>> {
        let SchemeCtx::Ecdh(c) = &mut self.inner else {
            return Err(Error::InvalidParameterSet);
        };
        let state = c.state.as_ref().ok_or(Error::InvalidKey)?;
        ecdh::ke_final(&c.cfg, state, peer_public)
    }
}

impl Drop for PkcContext {
    /// Scrubs the byte-buffer key material. The multiple-precision
    /// secrets free their limb storage through their own drops.
    fn drop(&mut self) {
        match &mut self.inner {
            SchemeCtx::Eddsa(c) => {
                if let Some(seed) = &mut c.seed {
                    ct::scrub(seed);
                }
            }
            SchemeCtx::Kyber(c) => {
                if let Some(sk) = &mut c.secret {
                    ct::scrub(sk);
                }
            }
            SchemeCtx::Saber(c) => {
                if let Some(sk) = &mut c.secret {
                    ct::scrub(sk);
                }
            }
            SchemeCtx::Dilithium(c) => {
                if let Some(sk) = &mut c.secret {
                    ct::scrub(sk);
                }
            }
            _ => {}
        }
    }
}
