//! vireview CLI - normalize Vietnamese customer reviews from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use vireview::text::split_lines;
use vireview::{Config, Preprocessor, VERSION};

/// vireview - Vietnamese review preprocessing for sentiment classification
#[derive(Parser, Debug)]
#[command(name = "vireview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file
    #[arg(short, long, global = true, default_value = "resources/config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Normalize a single comment
    Normalize {
        /// Comment text (read from stdin when omitted)
        #[arg(short, long)]
        text: Option<String>,

        /// Print the text after every pipeline stage
        #[arg(long)]
        explain: bool,
    },

    /// Normalize every line of a file
    Batch {
        /// Line-delimited input file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load and validate the lexical resources
    Check,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn create_progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} comments ({eta})")?
            .progress_chars("=> "),
    );
    Ok(pb)
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path).context("Failed to load config")
    } else {
        warn!("Config file {:?} not found, using defaults", path);
        Ok(Config::default())
    }
}

fn build_preprocessor(config: &Config) -> Result<Preprocessor> {
    Preprocessor::from_config(config).context("Failed to load lexical resources")
}

fn run_normalize(preprocessor: &Preprocessor, text: Option<String>, explain: bool) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read comment from stdin")?;
            buf
        }
    };

    if explain {
        let trace = preprocessor.trace(&text)?;
        println!("{}", trace.summary());
    } else {
        println!("{}", preprocessor.preprocess(&text)?);
    }
    Ok(())
}

fn run_batch(preprocessor: &Preprocessor, input: &Path, output: Option<&Path>) -> Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("Failed to read {:?}", input))?;
    let lines = split_lines(&bytes);
    info!("Normalizing {} comments from {:?}", lines.len(), input);

    let pb = create_progress_bar(lines.len() as u64)?;
    let results: Vec<_> = lines
        .par_iter()
        .map(|line| {
            let result = preprocessor.normalize_bytes(line);
            pb.inc(1);
            result
        })
        .collect();
    pb.finish_and_clear();

    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            std::fs::File::create(path).with_context(|| format!("Failed to create {:?}", path))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = BufWriter::new(sink);

    let mut failed = 0usize;
    let mut lossy = 0usize;
    for (idx, result) in results.iter().enumerate() {
        match result {
            Ok(normalized) => {
                if normalized.lossy {
                    lossy += 1;
                    warn!("line {}: invalid UTF-8 replaced", idx + 1);
                }
                writeln!(writer, "{}", normalized)?;
            }
            Err(e) => {
                failed += 1;
                warn!("line {}: {}", idx + 1, e);
                // Keep output lines aligned with input lines
                writeln!(writer)?;
            }
        }
    }
    writer.flush()?;

    info!(
        "Done: {} normalized, {} failed, {} lossy",
        results.len() - failed,
        failed,
        lossy
    );
    Ok(())
}

fn run_check(preprocessor: &Preprocessor) {
    for stats in preprocessor.lexicon().stats() {
        println!(
            "{:<28} {:>7} entries  (longest {})",
            stats.name, stats.entries, stats.longest
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    info!("vireview v{}", VERSION);

    let config = load_config(&cli.config)?;
    let preprocessor = build_preprocessor(&config)?;

    match cli.command {
        Commands::Normalize { text, explain } => run_normalize(&preprocessor, text, explain),
        Commands::Batch { input, output } => run_batch(&preprocessor, &input, output.as_deref()),
        Commands::Check => {
            run_check(&preprocessor);
            Ok(())
        }
    }
}
