use std::sync::LazyLock;

use adducts::{AdductCatalog, AdductTag, Annotation, IonizationMode, Peak, catalog};
use divan::{AllocProfiler, Bencher, black_box};

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

const CATALOG_KDL: &str = catalog::DEFAULT_KDL;
const NOTATIONS: [&str; 6] = [
    "[M+H]+",
    "[2M+Na]+",
    "[M+2H]2+",
    "[M+H-H2O]+",
    "[M-2H]2−",
    "[M+CH3COOH-H]−",
];

static CATALOG: LazyLock<AdductCatalog> = LazyLock::new(AdductCatalog::default);

fn main() {
    LazyLock::force(&CATALOG);
    divan::main();
}

mod catalog_building {
    use super::*;

    #[divan::bench]
    fn build_adduct_catalog() -> AdductCatalog {
        AdductCatalog::new("adduct_catalog.kdl", CATALOG_KDL).unwrap()
    }

    #[divan::bench]
    fn parse_adduct_tags() {
        for notation in NOTATIONS {
            black_box(AdductTag::new(notation).unwrap());
        }
    }

    #[divan::bench]
    fn parse_counts_leniently() {
        for notation in NOTATIONS {
            black_box(adducts::parse_multimer(notation));
            black_box(adducts::parse_charge(notation));
        }
    }
}

mod arithmetic {
    use super::*;

    #[divan::bench]
    fn calculate_neutral_masses() {
        for notation in NOTATIONS {
            black_box(CATALOG.mass_from_mz(black_box(760.585_081), notation).unwrap());
        }
    }

    #[divan::bench]
    fn calculate_mzs() {
        for notation in NOTATIONS {
            black_box(CATALOG.mz_from_mass(black_box(759.577_805), notation).unwrap());
        }
    }
}

mod inference {
    use super::*;

    #[divan::bench(args = [2, 8, 32])]
    fn detect_adducts(bencher: Bencher, peaks: usize) {
        // Sodium and potassium adducts of PC 34:1, padded out with unrelated peaks
        let known_peaks = [760.585_081, 782.567_023, 798.540_963];
        let filler_peaks = (0..).map(|i| 1_000.0 + 13.7 * f64::from(i));
        let peaks = known_peaks
            .into_iter()
            .chain(filler_peaks)
            .take(peaks)
            .map(|mz| Peak::new(mz, 1e5));
        let annotation = Annotation::new("PC 34:1", 782.567_023, 1e5, 10.25, IonizationMode::Positive)
            .with_grouped_signals(peaks);

        bencher
            .with_inputs(|| annotation.clone())
            .bench_local_refs(|annotation| annotation.detect_adduct(&CATALOG, 10).cloned());
    }
}
