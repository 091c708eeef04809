// External Crate Imports
use itertools::Itertools;
use tracing::{debug, trace};

// Local Crate Imports
use crate::{AdductCatalog, AdductTag, Annotation, CatalogEntry, Peak, ppm_increment};

/// Adduct pairs whose absolute mass shifts differ by less than this can't be told apart, so they're skipped
const MIN_SHIFT_DIFFERENCE: f64 = 1e-6;

// Public API ==========================================================================================================

impl<L> Annotation<L> {
    /// Infers and assigns the most probable adduct for this annotation, using the m/z differences between its grouped
    /// peaks
    ///
    /// The grouped peak closest in m/z to the annotation itself is taken as the base peak. The m/z difference between
    /// the base peak and every other grouped peak is compared against the difference in mass shift of every ordered
    /// pair of distinct adducts in `catalog` that share this annotation's ionization mode. Of all the comparisons
    /// within `ppm_tolerance`, the one with the smallest ppm error wins (the first one found, on ties). When the base
    /// peak is the higher-m/z peak of the winning comparison, it's assigned the adduct with the larger absolute mass
    /// shift, and otherwise the one with the smaller shift.
    ///
    /// If nothing is within tolerance, the [default adduct](crate::IonizationMode::default_adduct) of the ionization
    /// mode is assigned instead. With fewer than two grouped peaks there is no evidence to go on, and the adduct is
    /// left unset.
    ///
    /// This takes O(P × A²) time for P grouped peaks and A adducts of the matching ionization mode.
    pub fn detect_adduct(&mut self, catalog: &AdductCatalog, ppm_tolerance: u32) -> Option<&AdductTag> {
        self.adduct = self.infer_adduct(catalog, ppm_tolerance);
        self.adduct.as_ref()
    }
}

// Private Helper Functions ============================================================================================

impl<L> Annotation<L> {
    fn infer_adduct(&self, catalog: &AdductCatalog, ppm_tolerance: u32) -> Option<AdductTag> {
        let peaks: Vec<_> = self.grouped_signals.iter().collect();
        if peaks.len() < 2 {
            debug!(
                mz = self.mz,
                peaks = peaks.len(),
                "not enough grouped peaks to infer an adduct"
            );
            return None;
        }

        let (base_index, base_peak) = peaks
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| self.distance_to(a).total_cmp(&self.distance_to(b)))?;
        let adducts: Vec<_> = catalog.adducts(self.ionization_mode).collect();

        let mut best_match: Option<(u32, &CatalogEntry)> = None;
        for (_, peak) in peaks.iter().enumerate().filter(|&(i, _)| i != base_index) {
            let delta_mz = (base_peak.mz() - peak.mz()).abs();

            for (first, second) in adducts.iter().copied().cartesian_product(adducts.iter().copied()) {
                if first.tag().notation() == second.tag().notation() {
                    continue;
                }

                let first_shift = first.mass_shift().abs();
                let second_shift = second.mass_shift().abs();
                let expected_difference = (first_shift - second_shift).abs();
                if expected_difference < MIN_SHIFT_DIFFERENCE {
                    continue;
                }

                let Some(ppm) = ppm_increment(delta_mz, expected_difference) else {
                    continue;
                };
                if ppm > ppm_tolerance || best_match.is_some_and(|(best_ppm, _)| ppm >= best_ppm) {
                    continue;
                }

                // The higher-m/z peak of the pair is assumed to carry the adduct with the larger mass shift
                let base_is_heavier = base_peak.mz() > peak.mz();
                let candidate = if base_is_heavier == (first_shift > second_shift) {
                    first
                } else {
                    second
                };
                trace!(
                    peak = peak.mz(),
                    ppm,
                    candidate = candidate.tag().notation(),
                    "found a closer adduct match"
                );
                best_match = Some((ppm, candidate));
            }
        }

        let adduct = best_match.map_or_else(
            || {
                let default = self.ionization_mode.default_adduct();
                debug!(
                    mz = self.mz,
                    ppm_tolerance,
                    adduct = default.notation(),
                    "no adduct pair matched within tolerance, falling back to the default"
                );
                default
            },
            |(ppm, adduct)| {
                debug!(mz = self.mz, ppm, adduct = adduct.tag().notation(), "inferred adduct");
                adduct.tag().clone()
            },
        );
        Some(adduct)
    }

    fn distance_to(&self, peak: &Peak) -> f64 {
        (peak.mz() - self.mz).abs()
    }
}

// Module Tests ========================================================================================================
