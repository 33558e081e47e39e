use std::{io::Read, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use textfeat::{
    ExtractorConfig, FeatureExtractor, FeatureMatrix, ResourcePaths, Strategy, encode_labels,
    pre_processor::Vocabulary,
};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "textfeat")]
#[command(about = "Extract text features with persisted vectorizers", long_about = None)]
struct Cli {
    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit (or load) a vectorizer and transform a corpus, one document per line
    Extract(ExtractArgs),
    /// Encode labels, one per line, as integers
    Labels {
        /// Label file (reads stdin if omitted)
        #[arg(short, long, value_name = "PATH")]
        input: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct ExtractArgs {
    /// Corpus file (reads stdin if omitted)
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// JSON configuration file; command line flags override its values
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    strategy: Option<Strategy>,

    /// Where the fitted vectorizer is saved to or loaded from
    #[arg(long = "vectorizer", value_name = "PATH")]
    persistence_path: Option<PathBuf>,

    /// Load the vectorizer instead of fitting a new one
    #[arg(long)]
    infer: bool,

    /// Fixed vocabulary as a JSON object of token to column index
    #[arg(long, value_name = "PATH")]
    vocab: Option<PathBuf>,

    /// Padded length for the sequence strategy
    #[arg(long)]
    max_length: Option<usize>,

    /// Re-save the tfidf_word vectorizer in inference mode
    #[arg(long)]
    resave: bool,

    /// Newline-delimited stop-word list
    #[arg(long, value_name = "PATH")]
    stop_words: Option<PathBuf>,

    /// Newline-delimited sentence terminator list
    #[arg(long, value_name = "PATH")]
    sentence_symbols: Option<PathBuf>,

    /// Drop stop words before building word features
    #[arg(long)]
    filter_stop_words: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormat {
    /// `rows cols nnz`
    Summary,
    /// Matrix components as JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match &cli.command {
        Command::Extract(args) => run_extract(args),
        Command::Labels { input } => {
            let labels = read_lines(input.as_ref())?;
            let encoded = encode_labels(&labels);
            println!("{}", serde_json::to_string(&encoded)?);
            Ok(())
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, true) => "debug",
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads one entry per line from `path`, or from stdin when no path is given.
fn read_lines(path: Option<&PathBuf>) -> Result<Vec<String>> {
    let contents = if let Some(path) = path {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?
    } else {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    };
    Ok(contents.lines().map(String::from).collect())
}

fn build_config(args: &ExtractArgs) -> Result<ExtractorConfig> {
    let mut config = match &args.config {
        Some(path) => ExtractorConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ExtractorConfig::default(),
    };

    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(path) = &args.persistence_path {
        config.persistence_path = Some(path.clone());
    }
    if let Some(max_length) = args.max_length {
        config.max_length = max_length;
    }
    if let Some(path) = &args.vocab {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary: {}", path.display()))?;
        let vocab: Vocabulary = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse vocabulary JSON object")?;
        config.vocabulary = Some(vocab);
    }
    let resources = std::mem::take(&mut config.resources);
    config.resources = ResourcePaths {
        sentence_symbols: args
            .sentence_symbols
            .clone()
            .or(resources.sentence_symbols),
        stop_words: args.stop_words.clone().or(resources.stop_words),
    };
    config.is_inference |= args.infer;
    config.resave_on_inference |= args.resave;
    config.filter_stop_words |= args.filter_stop_words;
    Ok(config)
}

fn run_extract(args: &ExtractArgs) -> Result<()> {
    let config = build_config(args)?;
    let corpus = read_lines(args.input.as_ref())?;
    let strategy = config.strategy;

    let start = Instant::now();
    let mut extractor =
        FeatureExtractor::new(corpus, config).context("Invalid extractor configuration")?;
    let features = extractor
        .extract()
        .with_context(|| format!("Failed to extract {strategy} features"))?;
    tracing::debug!(elapsed = ?start.elapsed(), "Extraction finished");

    match args.format {
        OutputFormat::Summary => {
            let (rows, cols) = features.shape();
            let nnz = match &features {
                FeatureMatrix::Sparse(m) => m.nnz(),
                FeatureMatrix::Sequences(m) => m.iter().filter(|&&id| id != 0).count(),
            };
            println!("{rows} {cols} {nnz}");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&matrix_json(&features))?);
        }
    }
    Ok(())
}

fn matrix_json(features: &FeatureMatrix) -> serde_json::Value {
    let (rows, cols) = features.shape();
    match features {
        FeatureMatrix::Sparse(m) => serde_json::json!({
            "shape": [rows, cols],
            "indptr": m.indptr().raw_storage(),
            "indices": m.indices(),
            "data": m.data(),
        }),
        FeatureMatrix::Sequences(m) => serde_json::json!({
            "shape": [rows, cols],
            "rows": m.outer_iter().map(|row| row.to_vec()).collect::<Vec<_>>(),
        }),
    }
}
