//! Seeded train/holdout split

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::{Dataset, DatasetError};

/// Shuffle rows with `seed` and hold out `ceil(n * test_size)` of them.
/// Returns `(train, test)`.
pub fn train_test_split(dataset: &Dataset, test_size: f64, seed: u64) -> Result<(Dataset, Dataset), DatasetError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(DatasetError::InvalidSplit(format!(
            "test size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n = dataset.n_samples();
    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(DatasetError::InvalidSplit(format!(
            "{} rows cannot be split with test size {}",
            n, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    log::debug!("Split {} rows: {} train, {} holdout (seed {})", n, train_idx.len(), n_test, seed);

    Ok((dataset.select(train_idx), dataset.select(test_idx)))
}
