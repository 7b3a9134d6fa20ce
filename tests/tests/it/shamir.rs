#[generic_tests::define(attrs(test_case::case))]
mod generic {
    use std::collections::BTreeMap;

    use keyshard::{curve::CurveOps, generic_ec::SecretScalar, shamir};

    #[test_case::case(2, 2; "t2n2")]
    #[test_case::case(2, 3; "t2n3")]
    #[test_case::case(3, 5; "t3n5")]
    #[test_case::case(4, 6; "t4n6")]
    #[test_case::case(5, 5; "t5n5")]
    fn any_quorum_reconstructs_the_secret<C: CurveOps>(threshold: u16, share_count: u16) {
        let mut rng = rand_dev::DevRng::new();
        let secret = SecretScalar::<C::Curve>::random(&mut rng);

        let shares = shamir::split::<C>(&secret, threshold, share_count, &mut rng).unwrap();
        assert_eq!(shares.len(), usize::from(share_count));

        // Every subset of exactly `threshold` shares must reconstruct the
        // secret, and all of them must agree
        for subset_mask in 0u32..(1 << share_count) {
            if subset_mask.count_ones() != u32::from(threshold) {
                continue;
            }
            let subset = shares
                .iter()
                .filter(|(index, _)| subset_mask & (1 << (index.get() - 1)) != 0)
                .map(|(index, share)| (*index, share.clone()))
                .collect::<BTreeMap<_, _>>();

            let reconstructed = shamir::combine::<C>(&subset).unwrap();
            assert_eq!(reconstructed.as_ref(), secret.as_ref());
        }
    }

    #[test_case::case(3, 5; "t3n5")]
    fn all_shares_also_reconstruct_the_secret<C: CurveOps>(threshold: u16, share_count: u16) {
        let mut rng = rand_dev::DevRng::new();
        let secret = SecretScalar::<C::Curve>::random(&mut rng);

        let shares = shamir::split::<C>(&secret, threshold, share_count, &mut rng).unwrap();
        let reconstructed = shamir::combine::<C>(&shares).unwrap();
        assert_eq!(reconstructed.as_ref(), secret.as_ref());
    }

    #[test_case::case(2, 3; "t2n3")]
    fn two_splits_of_one_secret_are_unrelated<C: CurveOps>(threshold: u16, share_count: u16) {
        let mut rng = rand_dev::DevRng::new();
        let secret = SecretScalar::<C::Curve>::random(&mut rng);

        // Coefficients are drawn fresh per call, so shares of two splits of
        // the same secret must not repeat
        let first = shamir::split::<C>(&secret, threshold, share_count, &mut rng).unwrap();
        let second = shamir::split::<C>(&secret, threshold, share_count, &mut rng).unwrap();
        for (index, share) in &first {
            assert_ne!(share.as_ref(), second[index].as_ref());
        }
    }

    #[test_case::case(0, 1, "Threshold cannot be less than two"; "t0n1")]
    #[test_case::case(1, 1, "Threshold cannot be less than two"; "t1n1")]
    #[test_case::case(1, 5, "Threshold cannot be less than two"; "t1n5")]
    #[test_case::case(4, 1, "Threshold cannot be greater than the total number of shares"; "t4n1")]
    #[test_case::case(3, 2, "Threshold cannot be greater than the total number of shares"; "t3n2")]
    fn rejects_invalid_threshold<C: CurveOps>(threshold: u16, share_count: u16, message: &str) {
        let mut rng = rand_dev::DevRng::new();
        let secret = SecretScalar::<C::Curve>::random(&mut rng);

        let err = shamir::split::<C>(&secret, threshold, share_count, &mut rng).unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    #[test_case::case(0; "no shares")]
    #[test_case::case(1; "single share")]
    fn combine_rejects_too_few_shares<C: CurveOps>(share_count: u16) {
        let mut rng = rand_dev::DevRng::new();

        let shares = (1..=share_count)
            .filter_map(shamir::ShareIndex::new)
            .map(|index| (index, SecretScalar::<C::Curve>::random(&mut rng)))
            .collect::<BTreeMap<_, _>>();
        shamir::combine::<C>(&shares).unwrap_err();
    }

    #[instantiate_tests(<keyshard::curve::Ed25519>)]
    mod ed25519 {}
    #[instantiate_tests(<keyshard::curve::Secp256k1>)]
    mod secp256k1 {}
}
