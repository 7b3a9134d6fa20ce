use digest::Digest;

use generic_ec::{NonZero, Point, Scalar};

use crate::curve::{CurveOps, InvalidSignature, SIGNATURE_SIZE};

/// secp256k1 curve: ECDSA signatures over SHA-256, big-endian scalars,
/// 33-byte compressed points
#[derive(Debug, Clone, Copy)]
pub struct Secp256k1;

impl CurveOps for Secp256k1 {
    const NAME: &'static str = "secp256k1";

    type Curve = generic_ec::curves::Secp256k1;

    const SCALAR_SIZE: usize = 32;
    const POINT_SIZE: usize = 33;

    const PRIVATE_KEY_PREFIX: &'static str = "kprv";
    const PUBLIC_KEY_PREFIX: &'static str = "kpub";

    const SEED_SALT: &'static [u8] = b"Bitcoin seed";

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
        scalar.to_be_bytes()
    }
    fn deserialize_scalar(
        bytes: &[u8],
    ) -> Result<Scalar<Self::Curve>, generic_ec::errors::InvalidScalar> {
        Scalar::from_be_bytes(bytes)
    }

    fn verify<'m>(
        public_key: &Point<Self::Curve>,
        signed_message: &'m [u8],
    ) -> Result<&'m [u8], InvalidSignature> {
        if signed_message.len() < SIGNATURE_SIZE {
            return Err(InvalidSignature);
        }
        let (signature, msg) = signed_message.split_at(SIGNATURE_SIZE);

        // Compact signature: both components must be canonical and nonzero
        let r = Scalar::from_be_bytes(&signature[..32]).map_err(|_| InvalidSignature)?;
        let s = Scalar::from_be_bytes(&signature[32..]).map_err(|_| InvalidSignature)?;
        if NonZero::from_scalar(r).is_none() {
            return Err(InvalidSignature);
        }
        let Some(s) = NonZero::from_scalar(s) else {
            return Err(InvalidSignature);
        };

        let z = Scalar::<Self::Curve>::from_be_bytes_mod_order(sha2::Sha256::digest(msg));

        let s_inv = s.invert();
        let point = Point::generator() * (z * s_inv) + *public_key * (r * s_inv);
        if point.is_zero() {
            return Err(InvalidSignature);
        }

        // x-coordinate of the recomputed point, read out of its compressed
        // encoding (1-byte parity tag followed by 32 bytes of x)
        let x = Scalar::<Self::Curve>::from_be_bytes_mod_order(
            &Self::serialize_point(&point).as_ref()[1..],
        );
        if x == r {
            Ok(msg)
        } else {
            Err(InvalidSignature)
        }
    }
}
