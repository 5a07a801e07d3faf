//! BIP-340 Schnorr signatures over x-only public keys.

use core::fmt;

use crypto_bigint::subtle::Choice;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

use crate::{
    arithmetic::{mul_vartime, AffinePoint, FieldElement, ProjectivePoint, Scalar},
    context::Context,
    error::Error,
    keys::{Keypair, XOnlyPublicKey},
    tools::{
        hashing::TaggedHasher,
        serde::{self as serde_bytes, TryFromBytes},
        Secret,
    },
};

const TAG_AUX: &[u8] = b"BIP0340/aux";
const TAG_NONCE: &[u8] = b"BIP0340/nonce";
const TAG_CHALLENGE: &[u8] = b"BIP0340/challenge";

/// A BIP-340 signature: the x coordinate of the nonce point followed by `s`.
///
/// Parsing only checks the length; the range checks happen during verification.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SchnorrSignature([u8; 64]);

impl SchnorrSignature {
    /// Wraps the 64-byte encoding.
    pub fn from_bytes(bytes: &[u8; 64]) -> Self {
        Self(*bytes)
    }

    /// Same as [`SchnorrSignature::from_bytes`], for a slice that must be exactly 64 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; 64] = bytes.try_into().map_err(|_| Error::InvalidSignatureEncoding)?;
        Ok(Self::from_bytes(bytes))
    }

    /// Returns the 64-byte encoding.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0
    }

    fn split(&self) -> (&[u8; 32], &[u8; 32]) {
        let (r, s) = self.0.split_at(32);
        (
            r.try_into().expect("the signature is 64 bytes long"),
            s.try_into().expect("the signature is 64 bytes long"),
        )
    }
}

fn challenge(r: &[u8; 32], public_key: &[u8; 32], message: &[u8]) -> Scalar {
    let hash = TaggedHasher::new_with_tag(TAG_CHALLENGE)
        .chain_bytes(r)
        .chain_bytes(public_key)
        .chain_bytes(message)
        .finalize();
    Scalar::reduce_bytes(&hash)
}

/// Signs a message of any length with fresh auxiliary randomness `aux`.
///
/// The nonce depends on the secret key, the message and `aux`;
/// reusing `aux` is safe but gives up the protection against fault and side-channel attacks.
/// Fails with [`Error::InvalidNonce`] if the derived nonce is zero.
pub fn sign(ctx: &Context, message: &[u8], keypair: &Keypair, aux: &[u8; 32]) -> Result<SchnorrSignature, Error> {
    let (public_key, _) = keypair.x_only_public_key();
    let public_key = public_key.to_bytes();
    let d = keypair.even_secret_key();

    // t = d XOR hash_aux(aux)
    let mut t = d.to_bytes();
    let mask = TaggedHasher::new_with_tag(TAG_AUX).chain_bytes(aux).finalize();
    t.iter_mut().zip(mask.iter()).for_each(|(t, m)| *t ^= m);

    let nonce_hash = Zeroizing::new(
        TaggedHasher::new_with_tag(TAG_NONCE)
            .chain_bytes(&*t)
            .chain_bytes(&public_key)
            .chain_bytes(message)
            .finalize(),
    );
    let k = Secret::init_with(|| Scalar::reduce_bytes(&nonce_hash));
    if bool::from(k.expose_secret().is_zero()) {
        tracing::warn!("BIP-340 nonce reduced to zero");
        return Err(Error::InvalidNonce);
    }

    let big_r = k.mul_by_generator(ctx).to_affine();
    let k = Secret::conditional_select(&k, &-&k, big_r.y().is_odd());
    let r = big_r.x().to_bytes();

    let e = challenge(&r, &public_key, message);
    let s = &(d.as_secret() * &e) + &k;

    let mut bytes = [0u8; 64];
    let (r_dest, s_dest) = bytes.split_at_mut(32);
    r_dest.copy_from_slice(&r);
    s_dest.copy_from_slice(&s.expose_secret().to_bytes());
    Ok(SchnorrSignature(bytes))
}

/// The parts of a signature after range checks: `R`, `s` and the challenge `e`.
struct Parsed {
    big_r: AffinePoint,
    s: Scalar,
    e: Scalar,
}

fn parse(message: &[u8], signature: &SchnorrSignature, public_key: &XOnlyPublicKey) -> Option<Parsed> {
    let (r_bytes, s_bytes) = signature.split();
    let s = Option::<Scalar>::from(Scalar::from_bytes(s_bytes))?;
    let r = Option::<FieldElement>::from(FieldElement::from_bytes(r_bytes))?;
    let big_r = Option::<AffinePoint>::from(AffinePoint::decompress(r, Choice::from(0)))?;
    let e = challenge(r_bytes, &public_key.to_bytes(), message);
    Some(Parsed { big_r, s, e })
}

/// Verifies a signature over a message of any length.
pub fn verify(ctx: &Context, message: &[u8], signature: &SchnorrSignature, public_key: &XOnlyPublicKey) -> bool {
    let (r_bytes, s_bytes) = signature.split();
    let s = match Option::<Scalar>::from(Scalar::from_bytes(s_bytes)) {
        Some(s) => s,
        None => return false,
    };
    if !bool::from(FieldElement::from_bytes(r_bytes).is_some()) {
        return false;
    }
    let e = challenge(r_bytes, &public_key.to_bytes(), message);

    // R = s G - e P
    let big_r = ctx.mul_add_generator_vartime(&-e, &public_key.as_affine().to_projective(), &s);
    if bool::from(big_r.is_identity()) {
        return false;
    }
    let big_r = big_r.to_affine();
    !bool::from(big_r.y().is_odd()) && big_r.x().to_bytes() == *r_bytes
}

/// Verifies several signatures at once using a random linear combination.
///
/// Returns `true` only if every signature is valid (up to a failure probability of about `2^-128`
/// for the random coefficients). An empty batch is valid.
/// This does not say which signature failed; fall back to [`verify`] for that.
pub fn verify_batch(
    ctx: &Context,
    items: &[(&[u8], &SchnorrSignature, &XOnlyPublicKey)],
    rng: &mut impl CryptoRngCore,
) -> bool {
    let mut sum = ProjectivePoint::IDENTITY;
    for (index, (message, signature, public_key)) in items.iter().enumerate() {
        let parsed = match parse(message, signature, public_key) {
            Some(parsed) => parsed,
            None => return false,
        };
        // The first coefficient can be fixed to 1 without loss of soundness.
        let a = if index == 0 { Scalar::ONE } else { Scalar::random(rng) };

        // a (R + e P - s G)
        let term = ctx.mul_add_generator_vartime(
            &(a * parsed.e),
            &public_key.as_affine().to_projective(),
            &-(a * parsed.s),
        );
        sum = sum.add_vartime(&term);
        sum = sum.add_vartime(&mul_vartime(&parsed.big_r.to_projective(), &a));
    }
    let valid = bool::from(sum.is_identity());
    if !valid {
        tracing::debug!("Schnorr batch of {} signatures failed verification", items.len());
    }
    valid
}

impl fmt::Debug for SchnorrSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchnorrSignature({})", hex::encode(self.0))
    }
}

impl TryFromBytes for SchnorrSignature {
    type Error = Error;
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl Serialize for SchnorrSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_bytes::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for SchnorrSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_bytes::deserialize(deserializer)
    }
}

#[cfg(feature = "std")]
mod traits {
    use rand_core::CryptoRngCore;
    use signature::{Error, RandomizedSigner, Verifier};

    use super::SchnorrSignature;
    use crate::{
        context::Context,
        error::Error as LocalError,
        keys::{Keypair, XOnlyPublicKey},
    };

    impl RandomizedSigner<SchnorrSignature> for Keypair {
        fn try_sign_with_rng(&self, rng: &mut impl CryptoRngCore, msg: &[u8]) -> Result<SchnorrSignature, Error> {
            let mut aux = [0u8; 32];
            rng.try_fill_bytes(&mut aux).map_err(|_| LocalError::EntropyFailure)?;
            Ok(super::sign(Context::global(), msg, self, &aux)?)
        }
    }

    impl Verifier<SchnorrSignature> for XOnlyPublicKey {
        fn verify(&self, msg: &[u8], signature: &SchnorrSignature) -> Result<(), Error> {
            if super::verify(Context::global(), msg, signature, self) {
                Ok(())
            } else {
                Err(Error::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha20Rng;
    use rand_core::{OsRng, SeedableRng};

    use super::{sign, verify, verify_batch, SchnorrSignature};
    use crate::{
        arithmetic::Scalar,
        context::Context,
        error::Error,
        keys::{Keypair, XOnlyPublicKey},
    };

    fn decode<const N: usize>(hex_str: &str) -> [u8; N] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    struct Vector {
        secret_key: &'static str,
        public_key: &'static str,
        aux: &'static str,
        message: &'static str,
        signature: &'static str,
    }

    // The signing vectors from the BIP-340 test suite.
    const VECTORS: [Vector; 4] = [
        Vector {
            secret_key: "0000000000000000000000000000000000000000000000000000000000000003",
            public_key: "F9308A019258C31049344F85F89D5229B531C845836F99B08601F113BCE036F9",
            aux: "0000000000000000000000000000000000000000000000000000000000000000",
            message: "0000000000000000000000000000000000000000000000000000000000000000",
            signature: "E907831F80848D1069A5371B402410364BDF1C5F8307B0084C55F1CE2DCA8215\
                        25F66A4A85EA8B71E482A74F382D2CE5EBEEE8FDB2172F477DF4900D310536C0",
        },
        Vector {
            secret_key: "B7E151628AED2A6ABF7158809CF4F3C762E7160F38B4DA56A784D9045190CFEF",
            public_key: "DFF1D77F2A671C5F36183726DB2341BE58FEAE1DA2DECED843240F7B502BA659",
            aux: "0000000000000000000000000000000000000000000000000000000000000001",
            message: "243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89",
            signature: "6896BD60EEAE296DB48A229FF71DFE071BDE413E6D43F917DC8DCF8C78DE3341\
                        8906D11AC976ABCCB20B091292BFF4EA897EFCB639EA871CFA95F6DE339E4B0A",
        },
        Vector {
            secret_key: "C90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74020BBEA63B14E5C9",
            public_key: "DD308AFEC5777E13121FA72B9CC1B7CC0139715309B086C960E18FD969774EB8",
            aux: "C87AA53824B4D7AE2EB035A2B5BBBCCC080E76CDC6D1692C4B0B62D798E6D906",
            message: "7E2D58D8B3BCDF1ABADEC7829054F90DDA9805AAB56C77333024B9D0A508B75C",
            signature: "5831AAEED7B44BB74E5EAB94BA9D4294C49BCF2A60728D8B4C200F50DD313C1B\
                        AB745879A5AD954A72C45A91C3A51D3C7ADEA98D82F8481E0E1E03674A6F3FB7",
        },
        Vector {
            secret_key: "0B432B2677937381AEF05BB02A66ECD012773062CF3FA2549E44F58ED2401710",
            public_key: "25D1DFF95105F5253C4022F628A996AD3A0D95FBF21D468A1B33F8C160D8F517",
            aux: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
            message: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
            signature: "7EB0509757E246F19449885651611CB965ECC1A187DD51B64FDA1EDC9637D5EC\
                        97582B9CB13DB3933705B32BA982AF5AF25FD78881EBB32771FC5922EFC66EA3",
        },
    ];

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Outcome {
        Valid,
        Invalid,
        BadPublicKey,
    }

    struct VerificationVector {
        index: usize,
        public_key: &'static str,
        message: &'static str,
        signature: &'static str,
        outcome: Outcome,
    }

    const KEY_1: &str = "DFF1D77F2A671C5F36183726DB2341BE58FEAE1DA2DECED843240F7B502BA659";
    const MESSAGE_1: &str = "243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89";

    // The verification-only vectors from the BIP-340 test suite.
    const VERIFICATION_VECTORS: [VerificationVector; 11] = [
        // R.x with leading zero bytes
        VerificationVector {
            index: 4,
            public_key: "D69C3509BB99E412E68B0FE8544E72837DFA30746D8BE2AA65975F29D22DC7B9",
            message: "4DF3C3F68FCC83B27E9D42C90431A72499F17875C81A599B566C9889B9696703",
            signature: "00000000000000000000003B78CE563F89A0ED9414F5AA28AD0D96D6795F9C63\
                        76AFB1548AF603B3EB45C9F8207DEE1060CB71C04E80F593060B07D28308D7F4",
            outcome: Outcome::Valid,
        },
        // public key not on the curve
        VerificationVector {
            index: 5,
            public_key: "EEFDEA4CDB677750A420FEE807EACF21EB9898AE79B9768766E4FAA04A2D4A34",
            message: MESSAGE_1,
            signature: "6CFF5C3BA86C69EA4B7376F31A9BCB4F74C1976089B2D9963DA2E5543E177769\
                        69E89B4C5564D00349106B8497785DD7D1D713A8AE82B32FA79D5F7FC407D39B",
            outcome: Outcome::BadPublicKey,
        },
        // R has odd y
        VerificationVector {
            index: 6,
            public_key: KEY_1,
            message: MESSAGE_1,
            signature: "FFF97BD5755EEEA420453A14355235D382F6472F8568A18B2F057A1460297556\
                        3CC27944640AC607CD107AE10923D9EF7A73C643E166BE5EBEAFA34B1AC553E2",
            outcome: Outcome::Invalid,
        },
        // negated message
        VerificationVector {
            index: 7,
            public_key: KEY_1,
            message: MESSAGE_1,
            signature: "1FA62E331EDBC21C394792D2AB1100A7B432B013DF3F6FF4F99FCB33E0E1515F\
                        28890B3EDB6E7189B630448B515CE4F8622A954CFE545735AAEA5134FCCDB2BD",
            outcome: Outcome::Invalid,
        },
        // negated s
        VerificationVector {
            index: 8,
            public_key: KEY_1,
            message: MESSAGE_1,
            signature: "6CFF5C3BA86C69EA4B7376F31A9BCB4F74C1976089B2D9963DA2E5543E177769\
                        961764B3AA9B2FFCB6EF947B6887A226E8D7C93E00C5ED0C1834FF0D0C2E6DA6",
            outcome: Outcome::Invalid,
        },
        // sG - eP is the point at infinity, r = 0
        VerificationVector {
            index: 9,
            public_key: KEY_1,
            message: MESSAGE_1,
            signature: "0000000000000000000000000000000000000000000000000000000000000000\
                        123DDA8328AF9C23A94C1FEECFD123BA4FB73476F0D594DCB65C6425BD186051",
            outcome: Outcome::Invalid,
        },
        // sG - eP is the point at infinity, r = 1
        VerificationVector {
            index: 10,
            public_key: KEY_1,
            message: MESSAGE_1,
            signature: "0000000000000000000000000000000000000000000000000000000000000001\
                        7615FBAF5AE28864013C099742DEADB4DBA87F11AC6754F93780D5A1837CF197",
            outcome: Outcome::Invalid,
        },
        // r is not the x coordinate of a curve point
        VerificationVector {
            index: 11,
            public_key: KEY_1,
            message: MESSAGE_1,
            signature: "4A298DACAE57395A15D0795DDBFD1DCB564DA82B0F269BC70A74F8220429BA1D\
                        69E89B4C5564D00349106B8497785DD7D1D713A8AE82B32FA79D5F7FC407D39B",
            outcome: Outcome::Invalid,
        },
        // r = p
        VerificationVector {
            index: 12,
            public_key: KEY_1,
            message: MESSAGE_1,
            signature: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F\
                        69E89B4C5564D00349106B8497785DD7D1D713A8AE82B32FA79D5F7FC407D39B",
            outcome: Outcome::Invalid,
        },
        // s = n
        VerificationVector {
            index: 13,
            public_key: KEY_1,
            message: MESSAGE_1,
            signature: "6CFF5C3BA86C69EA4B7376F31A9BCB4F74C1976089B2D9963DA2E5543E177769\
                        FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
            outcome: Outcome::Invalid,
        },
        // public key x coordinate above p
        VerificationVector {
            index: 14,
            public_key: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC30",
            message: MESSAGE_1,
            signature: "6CFF5C3BA86C69EA4B7376F31A9BCB4F74C1976089B2D9963DA2E5543E177769\
                        69E89B4C5564D00349106B8497785DD7D1D713A8AE82B32FA79D5F7FC407D39B",
            outcome: Outcome::BadPublicKey,
        },
    ];

    #[test_log::test]
    fn bip340_signing_vectors() {
        let ctx = Context::new();
        for vector in VECTORS.iter() {
            let keypair = Keypair::from_secret_bytes(&ctx, &decode(vector.secret_key)).unwrap();
            let (public_key, _) = keypair.x_only_public_key();
            assert_eq!(public_key.to_bytes(), decode::<32>(vector.public_key));

            let message: [u8; 32] = decode(vector.message);
            let signature = sign(&ctx, &message, &keypair, &decode(vector.aux)).unwrap();
            assert_eq!(signature.to_bytes(), decode::<64>(vector.signature));
            assert!(verify(&ctx, &message, &signature, &public_key));
        }
    }

    #[test_log::test]
    fn bip340_verification_vectors() {
        let ctx = Context::new();
        for vector in VERIFICATION_VECTORS.iter() {
            let public_key = match XOnlyPublicKey::from_bytes(&decode(vector.public_key)) {
                Ok(public_key) => public_key,
                Err(err) => {
                    assert_eq!(vector.outcome, Outcome::BadPublicKey, "vector {}", vector.index);
                    assert_eq!(err, Error::InvalidPublicKey);
                    continue;
                }
            };
            let message: [u8; 32] = decode(vector.message);
            let signature = SchnorrSignature::from_bytes(&decode(vector.signature));
            let expected = vector.outcome == Outcome::Valid;
            assert_eq!(
                verify(&ctx, &message, &signature, &public_key),
                expected,
                "vector {}",
                vector.index
            );
        }
    }

    #[test]
    fn rejects_tampered_signatures() {
        let ctx = Context::new();
        let vector = &VECTORS[1];
        let public_key = XOnlyPublicKey::from_bytes(&decode(vector.public_key)).unwrap();
        let message: [u8; 32] = decode(vector.message);
        let signature: [u8; 64] = decode(vector.signature);
        assert!(verify(&ctx, &message, &SchnorrSignature::from_bytes(&signature), &public_key));

        let mut wrong_message = message;
        wrong_message[0] ^= 1;
        assert!(!verify(&ctx, &wrong_message, &SchnorrSignature::from_bytes(&signature), &public_key));

        // s replaced by n
        let mut bad_s = signature;
        bad_s[32..].copy_from_slice(&Scalar::order_bytes());
        assert!(!verify(&ctx, &message, &SchnorrSignature::from_bytes(&bad_s), &public_key));

        // r replaced by a value above p
        let mut bad_r = signature;
        bad_r[..32].copy_from_slice(&[0xFF; 32]);
        assert!(!verify(&ctx, &message, &SchnorrSignature::from_bytes(&bad_r), &public_key));

        // s negated: R' = -R has odd y
        let mut negated = signature;
        let s = Scalar::from_bytes(&signature[32..].try_into().unwrap()).unwrap();
        negated[32..].copy_from_slice(&(-s).to_bytes());
        assert!(!verify(&ctx, &message, &SchnorrSignature::from_bytes(&negated), &public_key));

        assert!(SchnorrSignature::from_slice(&signature[..63]).is_err());
    }

    #[test]
    fn variable_length_messages() {
        let ctx = Context::new();
        let keypair = Keypair::random(&ctx, &mut OsRng).unwrap();
        let (public_key, _) = keypair.x_only_public_key();

        for message in [&b""[..], &b"short"[..], &[0xABu8; 100][..]] {
            let signature = sign(&ctx, message, &keypair, &[7u8; 32]).unwrap();
            assert!(verify(&ctx, message, &signature, &public_key));
            assert_eq!(sign(&ctx, message, &keypair, &[7u8; 32]).unwrap(), signature);
        }
    }

    #[test]
    fn batch_verification() {
        let ctx = Context::new();
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        let keypairs = (0..4)
            .map(|_| Keypair::random(&ctx, &mut rng).unwrap())
            .collect::<Vec<_>>();
        let messages = (0..4u8).map(|i| vec![i; usize::from(i) * 10]).collect::<Vec<_>>();
        let signatures = keypairs
            .iter()
            .zip(messages.iter())
            .map(|(keypair, message)| sign(&ctx, message, keypair, &[1u8; 32]).unwrap())
            .collect::<Vec<_>>();
        let public_keys = keypairs.iter().map(|kp| kp.x_only_public_key().0).collect::<Vec<_>>();

        let items = messages
            .iter()
            .zip(signatures.iter())
            .zip(public_keys.iter())
            .map(|((m, s), p)| (m.as_slice(), s, p))
            .collect::<Vec<_>>();
        assert!(verify_batch(&ctx, &items, &mut rng));
        assert!(verify_batch(&ctx, &[], &mut rng));

        // Swap two public keys
        let mut swapped = items.clone();
        swapped[0].2 = &public_keys[1];
        swapped[1].2 = &public_keys[0];
        assert!(!verify_batch(&ctx, &swapped, &mut rng));
    }

    #[test]
    fn serde_round_trip() {
        let signature = SchnorrSignature::from_bytes(&decode(VECTORS[0].signature));
        let json = serde_json::to_string(&signature).unwrap();
        assert_eq!(serde_json::from_str::<SchnorrSignature>(&json).unwrap(), signature);
    }

    #[cfg(feature = "std")]
    #[test]
    fn signature_traits() {
        use signature::{RandomizedSigner, Verifier};

        let keypair = Keypair::random(Context::global(), &mut OsRng).unwrap();
        let (public_key, _) = keypair.x_only_public_key();
        let signature: SchnorrSignature = keypair.sign_with_rng(&mut OsRng, b"message");
        assert!(public_key.verify(b"message", &signature).is_ok());
        assert!(public_key.verify(b"massage", &signature).is_err());
    }
}
