//! Random sample of records for manual spot-checking against the source text.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::export::CaseRow;

/// Default seed, so repeated runs pick the same records.
pub const DEFAULT_SPOT_CHECK_SEED: u64 = 42;

const MIN_SAMPLE: usize = 10;

/// Sample size: 20% of the records but at least 10, capped at the total.
pub fn spot_check_size(total: usize) -> usize {
    MIN_SAMPLE.max(total / 5).min(total)
}

/// Seeded random sample of `spot_check_size(rows.len())` records.
pub fn spot_check_sample(rows: &[CaseRow], seed: u64) -> Vec<CaseRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sampled: Vec<CaseRow> = rows.to_vec();
    sampled.shuffle(&mut rng);
    sampled.truncate(spot_check_size(rows.len()));
    sampled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::extract_corpus;
    use crate::models::{SourceDocument, SourceType};

    fn rows(n: usize) -> Vec<CaseRow> {
        let docs: Vec<SourceDocument> = (0..n)
            .map(|i| {
                SourceDocument::new(
                    i.to_string(),
                    format!("abstract_{i}.txt"),
                    SourceType::Abstract,
                    format!("Case {i}."),
                )
            })
            .collect();
        extract_corpus(&docs)
    }

    #[test]
    fn test_spot_check_size() {
        assert_eq!(spot_check_size(0), 0);
        assert_eq!(spot_check_size(4), 4);
        assert_eq!(spot_check_size(30), 10);
        assert_eq!(spot_check_size(64), 12);
    }

    #[test]
    fn test_sample_is_reproducible() {
        let rows = rows(40);
        let a = spot_check_sample(&rows, DEFAULT_SPOT_CHECK_SEED);
        let b = spot_check_sample(&rows, DEFAULT_SPOT_CHECK_SEED);

        assert_eq!(a.len(), 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_has_no_repeats() {
        let rows = rows(60);
        let sample = spot_check_sample(&rows, 7);

        let mut ids: Vec<&str> = sample.iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 12);
    }
}
