use gjkr_core::tests::proptests::{group_strategy, tweak_strategy, ShareCase};
use gjkr_ristretto255::*;
use proptest::prelude::*;
use rand_chacha::ChaChaRng;
use rand_core::SeedableRng;

proptest! {

    #[test]
    fn tweak_share(
        tweaks in prop::collection::vec(tweak_strategy(), (0,5)),
        (group_size, threshold, index) in group_strategy(),
        rng_seed in prop::array::uniform32(any::<u8>()),
    ) {
        // Use a deterministic RNG so that test failures can be reproduced.
        let rng = ChaChaRng::from_seed(rng_seed);

        let mut case = ShareCase::<Ristretto255Sha512>::new(rng, group_size, threshold, index);

        for t in &tweaks {
            case.apply_tweak(t);
        }

        assert!(case.check());
    }

}
