#[generic_tests::define]
mod generic {
    use keyshard::curve::CurveOps;
    use keyshard_tests::ExternalSigner;

    #[test]
    fn opens_externally_signed_messages<C: ExternalSigner>() {
        let mut rng = rand_dev::DevRng::new();
        let msg = b"message to be signed";

        let signed = C::external_sign(&mut rng, msg);
        let public_key = C::deserialize_point(&signed.public_key).unwrap();

        let opened = C::verify(&public_key, &signed.signed_message).unwrap();
        assert_eq!(opened, msg);
    }

    #[test]
    fn rejects_tampering<C: ExternalSigner>() {
        let mut rng = rand_dev::DevRng::new();
        let msg = b"message to be signed";

        let signed = C::external_sign(&mut rng, msg);
        let public_key = C::deserialize_point(&signed.public_key).unwrap();

        // tampered message
        let mut tampered = signed.signed_message.clone();
        let last = tampered.len() - 1;
        tampered[last] ^= 0x01;
        C::verify(&public_key, &tampered).unwrap_err();

        // tampered signature
        let mut tampered = signed.signed_message.clone();
        tampered[0] ^= 0x01;
        C::verify(&public_key, &tampered).unwrap_err();

        // input shorter than a signature
        C::verify(&public_key, &signed.signed_message[..63]).unwrap_err();

        // wrong public key
        let other = C::external_sign(&mut rng, msg);
        let other_key = C::deserialize_point(&other.public_key).unwrap();
        let err = C::verify(&other_key, &signed.signed_message).unwrap_err();
        assert_eq!(err.to_string(), "invalid signature");
    }

    #[instantiate_tests(<keyshard::curve::Ed25519>)]
    mod ed25519 {}
    #[instantiate_tests(<keyshard::curve::Secp256k1>)]
    mod secp256k1 {}
}
