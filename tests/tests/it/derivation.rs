#[generic_tests::define]
mod generic {
    use keyshard::{
        curve::{CurveOps, CHAIN_CODE_SIZE},
        derive_key_with_seed,
        generic_ec::Point,
        hd, keys,
    };

    #[test]
    fn public_derivation_matches_private_derivation<C: CurveOps>() -> anyhow::Result<()> {
        let mut rng = rand_dev::DevRng::new();
        let pair = keys::generate_root_key::<C>(&mut rng);
        let (root_prv, root_pub) = keys::encode_root_keys::<C>(&pair);

        for seed in ["seed123", "", "deposit wallet #7", "\u{1f511}"] {
            let from_prv = derive_key_with_seed::<C>(&root_prv, seed)?;
            let from_pub = derive_key_with_seed::<C>(&root_pub, seed)?;

            assert_eq!(from_prv.derivation_path, from_pub.derivation_path);
            assert_eq!(from_prv.key.len(), 2 * (C::SCALAR_SIZE + CHAIN_CODE_SIZE));
            assert_eq!(from_pub.key.len(), 2 * C::POINT_SIZE);

            // the public half of the private derivation must equal the
            // public derivation, bit for bit
            let scalar_hex = &from_prv.key[..2 * C::SCALAR_SIZE];
            let scalar = C::deserialize_scalar(&hex::decode(scalar_hex)?)
                .map_err(|_| anyhow::anyhow!("derived scalar does not parse"))?;
            let public = Point::<C::Curve>::generator() * scalar;
            assert_eq!(hex::encode(C::serialize_point(&public)), from_pub.key);
        }
        Ok(())
    }

    #[test]
    fn derivation_is_deterministic<C: CurveOps>() -> anyhow::Result<()> {
        let mut rng = rand_dev::DevRng::new();
        let pair = keys::generate_root_key::<C>(&mut rng);
        let (root_prv, root_pub) = keys::encode_root_keys::<C>(&pair);

        for root in [&root_prv, &root_pub] {
            let first = derive_key_with_seed::<C>(root, "seed123")?;
            let second = derive_key_with_seed::<C>(root, "seed123")?;
            assert_eq!(first, second);

            let other = derive_key_with_seed::<C>(root, "seed124")?;
            assert_ne!(first.key, other.key);
        }
        Ok(())
    }

    #[test]
    fn derivation_path_matches_reference_vector<C: CurveOps>() -> anyhow::Result<()> {
        let mut rng = rand_dev::DevRng::new();
        let pair = keys::generate_root_key::<C>(&mut rng);
        let (root_prv, root_pub) = keys::encode_root_keys::<C>(&pair);

        let from_prv = derive_key_with_seed::<C>(&root_prv, "seed123")?;
        let from_pub = derive_key_with_seed::<C>(&root_pub, "seed123")?;
        assert_eq!(from_prv.derivation_path, "m/999999/240510315/85914100");
        assert_eq!(from_pub.derivation_path, "m/999999/240510315/85914100");
        Ok(())
    }

    #[test]
    fn rejects_malformed_root_key<C: CurveOps>() {
        let err = derive_key_with_seed::<C>("invalid:key:format", "seed123").unwrap_err();
        assert_eq!(err.to_string(), "Invalid key format");
    }

    #[test]
    fn single_step_derivation_agrees<C: CurveOps>() -> anyhow::Result<()> {
        let mut rng = rand_dev::DevRng::new();
        let pair = keys::generate_root_key::<C>(&mut rng);
        let index: hd::NonHardenedIndex = 42u32.try_into()?;

        let child_pair = hd::derive_child_key_pair(&pair, index);
        let child_pub = hd::derive_child_public_key(pair.public_key(), index);

        assert_eq!(child_pair.public_key().public_key, child_pub.public_key);
        assert_eq!(child_pair.chain_code(), &child_pub.chain_code);
        // the derived secret scalar lands exactly on the derived point
        assert_eq!(
            Point::generator() * &child_pair.secret_key().secret_key,
            child_pub.public_key,
        );
        Ok(())
    }

    #[test]
    fn hardened_indexes_are_rejected<C: CurveOps>() {
        hd::NonHardenedIndex::try_from(hd::H).unwrap_err();
        hd::NonHardenedIndex::try_from(u32::MAX).unwrap_err();
        assert_eq!(*hd::NonHardenedIndex::MAX, hd::H - 1);
        "2147483648".parse::<hd::NonHardenedIndex>().unwrap_err();
        assert_eq!(*"999999".parse::<hd::NonHardenedIndex>().unwrap(), 999_999);
    }

    #[instantiate_tests(<keyshard::curve::Ed25519>)]
    mod ed25519 {}
    #[instantiate_tests(<keyshard::curve::Secp256k1>)]
    mod secp256k1 {}
}
