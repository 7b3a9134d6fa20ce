use keyshard::curve::CurveOps;
use rand_core::{CryptoRng, RngCore};

/// Message signed by an independent implementation of a curve's signature
/// scheme, in the signed-message layout `keyshard` opens: 64-byte
/// signature followed by the message.
pub struct ExternallySigned {
    /// Public key in the curve's point encoding
    pub public_key: Vec<u8>,
    /// Signature followed by the message
    pub signed_message: Vec<u8>,
}

pub trait ExternalSigner: CurveOps {
    /// Signs `msg` under a fresh key using an external implementation of
    /// the curve's signature scheme
    fn external_sign(rng: &mut (impl RngCore + CryptoRng), msg: &[u8]) -> ExternallySigned;
}

impl ExternalSigner for keyshard::curve::Ed25519 {
    fn external_sign(rng: &mut (impl RngCore + CryptoRng), msg: &[u8]) -> ExternallySigned {
        use ed25519::Signer;

        let mut key_bytes = [0u8; 32];
        rng.fill_bytes(&mut key_bytes);
        let signing_key = ed25519::SigningKey::from_bytes(&key_bytes);

        let mut signed_message = signing_key.sign(msg).to_bytes().to_vec();
        signed_message.extend_from_slice(msg);

        ExternallySigned {
            public_key: signing_key.verifying_key().to_bytes().to_vec(),
            signed_message,
        }
    }
}

impl ExternalSigner for keyshard::curve::Secp256k1 {
    fn external_sign(rng: &mut (impl RngCore + CryptoRng), msg: &[u8]) -> ExternallySigned {
        use sha2::Digest;

        let secret_key = loop {
            let mut key_bytes = [0u8; 32];
            rng.fill_bytes(&mut key_bytes);
            if let Ok(secret_key) = secp256k1::SecretKey::from_slice(&key_bytes) {
                break secret_key;
            }
        };

        let digest: [u8; 32] = sha2::Sha256::digest(msg).into();
        let signature =
            secp256k1::SECP256K1.sign_ecdsa(&secp256k1::Message::from_digest(digest), &secret_key);

        let mut signed_message = signature.serialize_compact().to_vec();
        signed_message.extend_from_slice(msg);

        ExternallySigned {
            public_key: secret_key
                .public_key(secp256k1::SECP256K1)
                .serialize()
                .to_vec(),
            signed_message,
        }
    }
}
