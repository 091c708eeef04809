// Standard Library Imports
use std::{
    cmp::Ordering,
    collections::BTreeSet,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
};

// External Crate Imports
use itertools::Itertools;

// Local Crate Imports
use crate::{AdductTag, Annotation, IonizationMode, Peak};

// Public API ==========================================================================================================

impl<L> Annotation<L> {
    /// Creates an annotation with no grouped signals and no adduct
    #[must_use]
    pub const fn new(
        lipid: L,
        mz: f64,
        intensity: f64,
        retention_time: f64,
        ionization_mode: IonizationMode,
    ) -> Self {
        Self {
            lipid,
            mz,
            intensity,
            retention_time,
            ionization_mode,
            adduct: None,
            grouped_signals: BTreeSet::new(),
            score: 0,
            evaluation_count: 0,
        }
    }

    /// Adds co-eluting peaks to the annotation's group, ignoring any with an m/z that's already present
    #[must_use]
    pub fn with_grouped_signals(mut self, peaks: impl IntoIterator<Item = Peak>) -> Self {
        self.grouped_signals.extend(peaks);
        self
    }

    /// Returns `false` if a peak with the same m/z was already grouped with this annotation
    pub fn add_grouped_signal(&mut self, peak: Peak) -> bool {
        self.grouped_signals.insert(peak)
    }

    #[must_use]
    pub const fn lipid(&self) -> &L {
        &self.lipid
    }

    #[must_use]
    pub const fn mz(&self) -> f64 {
        self.mz
    }

    #[must_use]
    pub const fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Retention time, in minutes
    #[must_use]
    pub const fn retention_time(&self) -> f64 {
        self.retention_time
    }

    #[must_use]
    pub const fn ionization_mode(&self) -> IonizationMode {
        self.ionization_mode
    }

    #[must_use]
    pub const fn adduct(&self) -> Option<&AdductTag> {
        self.adduct.as_ref()
    }

    pub fn set_adduct(&mut self, adduct: Option<AdductTag>) {
        self.adduct = adduct;
    }

    /// Peaks grouped with this annotation, in ascending order of m/z
    #[must_use]
    pub const fn grouped_signals(&self) -> &BTreeSet<Peak> {
        &self.grouped_signals
    }

    /// The raw score accumulator. Only [`Annotation::normalized_score()`] is comparable between annotations!
    #[must_use]
    pub const fn score(&self) -> i32 {
        self.score
    }

    /// Overwrites the raw score, leaving the number of evaluations untouched
    pub fn set_score(&mut self, score: i32) {
        self.score = score;
    }

    #[must_use]
    pub const fn evaluation_count(&self) -> u32 {
        self.evaluation_count
    }

    /// Records the outcome of one scoring rule, adding `delta` to the score and counting the evaluation
    pub fn add_score(&mut self, delta: i32) {
        self.score = self.score.saturating_add(delta);
        self.evaluation_count = self.evaluation_count.saturating_add(1);
    }

    /// The mean score per evaluation, clamped to `-1.0..=1.0`, or `0.0` if nothing has been scored yet
    #[must_use]
    pub fn normalized_score(&self) -> f64 {
        if self.evaluation_count == 0 {
            return 0.0;
        }

        let mean = f64::from(self.score) / f64::from(self.evaluation_count);
        mean.clamp(-1.0, 1.0)
    }
}

/// Removes repeated annotations (ones sharing a lipid, m/z, and retention time), keeping the first of each
pub fn dedup_annotations<L: Clone + Eq + Hash>(
    annotations: impl IntoIterator<Item = Annotation<L>>,
) -> Vec<Annotation<L>> {
    annotations.into_iter().unique().collect()
}

// Identity Trait Implementations ======================================================================================

impl<L: PartialEq> PartialEq for Annotation<L> {
    fn eq(&self, other: &Self) -> bool {
        self.lipid == other.lipid
            && self.mz.total_cmp(&other.mz) == Ordering::Equal
            && self.retention_time.total_cmp(&other.retention_time) == Ordering::Equal
    }
}

impl<L: Eq> Eq for Annotation<L> {}

// NOTE: Equal floats under `.total_cmp()` always share the same bits, so this agrees with `PartialEq`
impl<L: Hash> Hash for Annotation<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lipid.hash(state);
        self.mz.to_bits().hash(state);
        self.retention_time.to_bits().hash(state);
    }
}

impl<L: Display> Display for Annotation<L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let adduct = self.adduct.as_ref().map_or("none", AdductTag::notation);
        write!(
            f,
            "Annotation({}, mz={:.4}, RT={:.2}, adduct={adduct}, intensity={:.1}, score={})",
            self.lipid, self.mz, self.retention_time, self.intensity, self.score
        )
    }
}

// Module Tests ========================================================================================================
