// Standard Library Imports
use std::{
    fmt::{self, Write},
    fs, io,
    path::{Path, PathBuf},
};

// External Crate Imports
use adducts::{AdductCatalog, Annotation, IonizationMode, Peak};
use clap::Parser;
use miette::{
    Context, Diagnostic, GraphicalReportHandler, GraphicalTheme, IntoDiagnostic, Result, miette,
};
use rustyline::DefaultEditor;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
commands:
  mass <m/z> <adduct>                         neutral monoisotopic mass of an ion
  mz <mass> <adduct>                          m/z of a molecule observed as an adduct
  detect <positive|negative> <m/z> <peak>...  infer an adduct from grouped peak m/z values
  adducts                                     list every adduct in the catalog";

/// Converts between lipid masses and m/z values, and infers adducts from groups of co-eluting peaks
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// A KDL adduct catalog to use in place of the built-in one
    #[arg(short, long)]
    catalog: Option<PathBuf>,
    /// The mass tolerance, in ppm, used when inferring adducts
    #[arg(short, long, default_value_t = 10)]
    ppm: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let catalog = load_catalog(args.catalog.as_deref())?;
    info!(adducts = catalog.len(), ppm = args.ppm, "adduct catalog ready");

    let mut rl = DefaultEditor::new().into_diagnostic()?;
    while let Ok(line) = rl.readline("Adducts: ") {
        if line.trim().is_empty() {
            continue;
        }
        rl.add_history_entry(&line).into_diagnostic()?;
        match run_command(&catalog, args.ppm, &line) {
            Ok(output) => print!("{output}"),
            Err(report) => render_error(&*report),
        }
    }

    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<AdductCatalog> {
    let Some(path) = path else {
        return Ok(AdductCatalog::default());
    };

    let kdl = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read the adduct catalog at {}", path.display()))?;
    AdductCatalog::new(path.display().to_string(), kdl)
}

fn run_command(catalog: &AdductCatalog, ppm: u32, line: &str) -> Result<String> {
    let mut words = line.split_whitespace();
    let mut buf = String::new();

    match words.next() {
        Some("mass") => {
            let mz = number(words.next(), "m/z")?;
            let adduct = required(words.next(), "adduct")?;
            let mass = catalog.mass_from_mz(mz, adduct).map_err(|e| *e)?;
            writeln!(buf, "Monoisotopic Mass: {mass:.6}")
        }
        Some("mz") => {
            let mass = number(words.next(), "mass")?;
            let adduct = required(words.next(), "adduct")?;
            let mz = catalog.mz_from_mass(mass, adduct).map_err(|e| *e)?;
            writeln!(buf, "m/z: {mz:.6}")
        }
        Some("detect") => {
            let mode = required(words.next(), "ionization mode")?
                .parse::<IonizationMode>()
                .map_err(|e| *e)?;
            let mz = number(words.next(), "m/z")?;
            let peaks = words
                .map(|word| number(Some(word), "peak m/z").map(|mz| Peak::new(mz, 0.0)))
                .collect::<Result<Vec<_>>>()?;

            let mut annotation = Annotation::new((), mz, 0.0, 0.0, mode).with_grouped_signals(peaks);
            match annotation.detect_adduct(catalog, ppm) {
                Some(adduct) => writeln!(buf, "Adduct: {adduct}"),
                None => writeln!(buf, "Adduct: none (at least two distinct peaks are needed)"),
            }
        }
        Some("adducts") => list_adducts(&mut buf, catalog),
        Some("help") => writeln!(buf, "{USAGE}"),
        Some(command) => return Err(miette!(help = USAGE, "unknown command {command:?}")),
        None => Ok(()),
    }
    .into_diagnostic()?;

    Ok(buf)
}

fn list_adducts(buf: &mut String, catalog: &AdductCatalog) -> fmt::Result {
    for mode in [IonizationMode::Positive, IonizationMode::Negative] {
        writeln!(buf, "{mode}:")?;
        for adduct in catalog.adducts(mode) {
            let tag = adduct.tag();
            writeln!(
                buf,
                "  {:<18} shift={:+.6} multimer={} charge={}",
                tag.notation(),
                adduct.mass_shift(),
                tag.multimer(),
                tag.charge()
            )?;
        }
    }
    Ok(())
}

fn required<'a>(word: Option<&'a str>, what: &str) -> Result<&'a str> {
    word.ok_or_else(|| miette!(help = USAGE, "missing the {what}"))
}

fn number(word: Option<&str>, what: &str) -> Result<f64> {
    let word = required(word, what)?;
    word.parse()
        .into_diagnostic()
        .wrap_err_with(|| format!("couldn't read {word:?} as the {what}"))
}

fn render_error(diagnostic: &dyn Diagnostic) {
    let mut buf = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode());
    if handler.render_report(&mut buf, diagnostic).is_err() {
        buf = format!("Error: {diagnostic}");
    }
    println!("{buf}");
}
