use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pdf_fixtures::generators::BYTES_PER_MB;
use pdf_fixtures::{
    check_overwrite, CorruptedGenerator, CorruptionVariant, FixtureGenerator, FixtureManifest,
    GenerationSummary, LargeBinaryGenerator, LoremGenerator, MultipageGenerator, OutputDecision,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "pdf-fixtures",
    about = "Generate PDF test fixtures: valid documents and deliberately corrupted ones",
    version,
    author
)]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalOptions {
    /// Overwrite existing files without asking
    #[arg(short, long, global = true)]
    yes: bool,

    /// Also write a JSON manifest next to the PDF
    #[arg(short, long, global = true)]
    manifest: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lorem ipsum text flowed over numbered pages
    Lorem {
        /// Output PDF filename
        #[arg(default_value = LoremGenerator::DEFAULT_FILENAME)]
        file: PathBuf,

        /// Number of words to generate
        #[arg(default_value_t = 1000, allow_negative_numbers = true)]
        words: i64,

        /// Number of words (alternative to the positional argument)
        #[arg(short = 'w', long = "words", allow_negative_numbers = true)]
        words_flag: Option<i64>,

        /// Seed for the word generator
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Title page plus pages with unique, page-identifying markers
    Multipage {
        /// Output PDF filename
        #[arg(default_value = MultipageGenerator::DEFAULT_FILENAME)]
        file: PathBuf,

        /// Number of content pages
        #[arg(default_value_t = 20, allow_negative_numbers = true)]
        pages: i64,

        /// Stamp the current time on the title page and in the metadata
        #[arg(long)]
        timestamp: bool,
    },

    /// Minimal document padded with binary data to a target size
    Large {
        /// Output PDF filename
        #[arg(default_value = LargeBinaryGenerator::DEFAULT_FILENAME)]
        file: PathBuf,

        /// Target file size in MB
        #[arg(default_value_t = 100, allow_negative_numbers = true)]
        size: i64,

        /// Target size in MB (alternative to the positional argument)
        #[arg(short = 's', long = "size", allow_negative_numbers = true)]
        size_flag: Option<i64>,
    },

    /// Document that breaks one structural rule
    Corrupted {
        /// Output PDF filename
        #[arg(default_value = CorruptedGenerator::DEFAULT_FILENAME)]
        file: PathBuf,

        /// Corruption type: truncated, invalid_header, missing_xref,
        /// corrupted_object, unsupported_encryption, malformed_stream
        #[arg(default_value = "truncated")]
        variant: String,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "pdf_fixtures=debug,pdf_fixtures_cli=debug"
    } else {
        "pdf_fixtures=info,pdf_fixtures_cli=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Negative counts are passed on as zero so the generator reports them.
fn count(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

fn size_mb(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Asks before replacing an existing file. `false` means the user declined.
fn confirm_output(path: &Path, options: &GlobalOptions) -> Result<bool> {
    let stdin = io::stdin();
    let decision = check_overwrite(path, options.yes, &mut stdin.lock(), &mut io::stdout())?;
    if decision == OutputDecision::Declined {
        println!("Aborted.");
        return Ok(false);
    }
    Ok(true)
}

fn write_fixture<G: FixtureGenerator>(
    generator: &G,
    path: &Path,
    options: &GlobalOptions,
    manifest: impl FnOnce(&GenerationSummary) -> FixtureManifest,
) -> Result<Option<GenerationSummary>> {
    if !confirm_output(path, options)? {
        return Ok(None);
    }

    let summary = generator
        .generate(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("{summary}");

    if options.manifest {
        let sidecar = manifest(&summary).write_sidecar(path)?;
        println!("Manifest: {}", sidecar.display());
    }
    Ok(Some(summary))
}

fn run(cli: Cli) -> Result<()> {
    let options = &cli.options;

    match cli.command {
        Commands::Lorem {
            file,
            words,
            words_flag,
            seed,
        } => {
            let mut generator = LoremGenerator::new(count(words_flag.unwrap_or(words)))?;
            if let Some(seed) = seed {
                generator = generator.with_seed(seed);
            }
            println!("Generating PDF with {} words...", generator.words());
            let written = write_fixture(&generator, &file, options, |summary| {
                FixtureManifest::valid("lorem", "Lorem ipsum text across numbered pages", summary)
            })?;
            if written.is_some() {
                println!("Successfully created: {}", file.display());
            }
        }

        Commands::Multipage {
            file,
            pages,
            timestamp,
        } => {
            let mut generator = MultipageGenerator::new(count(pages))?;
            if timestamp {
                generator = generator.with_creation_date(chrono::Utc::now());
            }
            let written = write_fixture(&generator, &file, options, |summary| {
                FixtureManifest::valid(
                    "multipage",
                    "Pages with unique identifiers for page-aware extraction",
                    summary,
                )
            })?;
            if written.is_some() {
                println!("Each page contains unique identifiers (PAGE-XXX) for testing");
                println!("Successfully created: {}", file.display());
            }
        }

        Commands::Large {
            file,
            size,
            size_flag,
        } => {
            let megabytes = size_mb(size_flag.unwrap_or(size));
            let generator = LargeBinaryGenerator::from_megabytes(megabytes)?;
            println!("Generating {megabytes}MB PDF with binary padding...");
            let written = write_fixture(&generator, &file, options, |summary| {
                FixtureManifest::valid("large", "Single page padded with binary data", summary)
            })?;
            if let Some(summary) = written {
                tracing::debug!(
                    target_mb = megabytes,
                    actual_mb = summary.bytes_written as f64 / BYTES_PER_MB as f64,
                    "large fixture size"
                );
                println!("Successfully created: {}", file.display());
            }
        }

        Commands::Corrupted { file, variant } => {
            let variant: CorruptionVariant = variant.parse()?;
            let generator = CorruptedGenerator::new(variant);
            println!("Generating {}...", variant.description());
            let written = write_fixture(&generator, &file, options, |summary| {
                FixtureManifest::corrupted(variant, summary)
            })?;
            if written.is_some() {
                println!("Corruption type: {variant}");
                println!("Successfully created: {}", file.display());
                println!("\nThis file should trigger a parsing error when processed.");
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.options.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
