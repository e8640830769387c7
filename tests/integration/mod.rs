//! Library-level tests against the sample Superstore file in `tests/fixtures`.

pub mod dataset_test;
pub mod pipeline_test;

use std::path::{Path, PathBuf};

/// Twelve order lines covering every region, 2014 to 2017 and three discount levels.
pub fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/superstore_sample.csv")
}
