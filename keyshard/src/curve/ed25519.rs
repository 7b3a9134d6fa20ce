use digest::Digest;

use generic_ec::{Point, Scalar};

use crate::curve::{CurveOps, InvalidSignature, SIGNATURE_SIZE};

/// Ed25519 curve: EdDSA signatures, little-endian scalars, 32-byte
/// compressed points
#[derive(Debug, Clone, Copy)]
pub struct Ed25519;

impl CurveOps for Ed25519 {
    const NAME: &'static str = "ed25519";

    type Curve = generic_ec::curves::Ed25519;

    const SCALAR_SIZE: usize = 32;
    const POINT_SIZE: usize = 32;

    const PRIVATE_KEY_PREFIX: &'static str = "eprv";
    const PUBLIC_KEY_PREFIX: &'static str = "epub";

    const SEED_SALT: &'static [u8] = b"ed25519 seed";

    type PointBytes = generic_ec::EncodedPoint<Self::Curve>;
    fn serialize_point(point: &Point<Self::Curve>) -> Self::PointBytes {
        point.to_bytes(true)
    }
    fn deserialize_point(
        bytes: &[u8],
    ) -> Result<Point<Self::Curve>, generic_ec::errors::InvalidPoint> {
        Point::from_bytes(bytes)
    }

    type ScalarBytes = generic_ec::EncodedScalar<Self::Curve>;
    fn serialize_scalar(scalar: &Scalar<Self::Curve>) -> Self::ScalarBytes {
        scalar.to_le_bytes()
    }
    fn deserialize_scalar(
        bytes: &[u8],
    ) -> Result<Scalar<Self::Curve>, generic_ec::errors::InvalidScalar> {
        Scalar::from_le_bytes(bytes)
    }

    fn verify<'m>(
        public_key: &Point<Self::Curve>,
        signed_message: &'m [u8],
    ) -> Result<&'m [u8], InvalidSignature> {
        if signed_message.len() < SIGNATURE_SIZE {
            return Err(InvalidSignature);
        }
        let (signature, msg) = signed_message.split_at(SIGNATURE_SIZE);

        let r = Point::from_bytes(&signature[..32]).map_err(|_| InvalidSignature)?;
        let s = Scalar::from_le_bytes(&signature[32..]).map_err(|_| InvalidSignature)?;

        let challenge = Scalar::<Self::Curve>::from_le_bytes_mod_order(
            sha2::Sha512::new()
                .chain_update(&signature[..32])
                .chain_update(Self::serialize_point(public_key))
                .chain_update(msg)
                .finalize(),
        );

        if Point::generator() * s == r + *public_key * challenge {
            Ok(msg)
        } else {
            Err(InvalidSignature)
        }
    }
}
