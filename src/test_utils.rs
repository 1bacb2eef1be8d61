// SPDX-License-Identifier: Apache-2.0

/// Test-only helpers.
///
/// Keep this module lightweight so `cargo test` works out of the box.
use rand::distributions::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn config_test_logger() {
    // Intentionally a no-op.
    // Some tests call this to enable logging in downstream repos; findx doesn't
    // require a logger for correctness.
}

/// Size ladder used by the tier-agreement tests.
///
/// Crosses both dispatch thresholds (SIMD at 32, GPU at 4096) and includes
/// odd sizes so the SIMD tail path is exercised.
pub fn get_sizes() -> Vec<usize> {
    vec![
        0, 1, 2, 12, 31, 32, 63, 64, 211, 256, 1024, 4095, 4096, 4097, 8192, 34567, 65536,
    ]
}

/// Deterministic random data in `[min, max]`.
pub fn get_random_data<T>(size: usize, min: T, max: T, seed: u64) -> Vec<T>
where
    T: SampleUniform + PartialOrd + Copy,
{
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size).map(|_| rng.gen_range(min..=max)).collect()
}
