// Standard Library Imports
use std::cmp::Ordering;

// Local Crate Imports
use crate::Peak;

// Public API ==========================================================================================================

impl Peak {
    #[must_use]
    pub const fn mz(&self) -> f64 {
        self.mz
    }

    #[must_use]
    pub const fn intensity(&self) -> f64 {
        self.intensity
    }
}

// Ordering Peaks by m/z ===============================================================================================

impl Ord for Peak {
    fn cmp(&self, other: &Self) -> Ordering {
        self.mz.total_cmp(&other.mz)
    }
}

impl PartialOrd for Peak {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Peak {
    fn eq(&self, other: &Self) -> bool {
        // NOTE: Only the m/z is compared, and `.total_cmp()` keeps this in agreement with `Ord`
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Peak {}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn peaks_are_keyed_by_mz() {
        assert_eq!(Peak::new(760.585, 1e6), Peak::new(760.585, 2.5e4));
        assert_ne!(Peak::new(760.585, 1e6), Peak::new(782.567, 1e6));
        assert!(Peak::new(760.585, 1e6) < Peak::new(782.567, 1.0));
    }

    #[test]
    fn peak_sets_are_sorted_and_unique() {
        let peaks: BTreeSet<_> = [
            Peak::new(782.567, 3.0e5),
            Peak::new(760.585, 1.2e6),
            Peak::new(782.567, 9.9e9),
            Peak::new(1_520.163, 4.0e4),
        ]
        .into_iter()
        .collect();

        let mzs: Vec<_> = peaks.iter().map(Peak::mz).collect();
        assert_eq!(mzs, [760.585, 782.567, 1_520.163]);
        // The first of two equal peaks is the one that's kept
        assert_eq!(peaks.iter().nth(1).map(Peak::intensity), Some(3.0e5));
    }

    #[test]
    fn negative_zero_is_distinct() {
        assert_ne!(Peak::new(0.0, 1.0), Peak::new(-0.0, 1.0));
    }
}
