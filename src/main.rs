//! Quantum Random Bit Service CLI
//!
//! Runs the HTTP API, generates bits once from the command line, or
//! reports entropy statistics for an existing bitstring.

use clap::{ArgGroup, Parser, Subcommand};
use qrng::{
    analysis::Statistics,
    bits::Bitstring,
    config::FileConfig,
    generator::{GenerateRequest, QuantumRandomGenerator},
    source::DefaultSourceProvider,
};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "qrng-service", version)]
#[command(about = "Quantum random bits with debiasing and entropy diagnostics", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the random bit API over HTTP
    #[cfg(feature = "server")]
    Serve {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate bits once and print them
    Generate {
        /// Number of bits (1-4096)
        #[arg(short, long)]
        bits: Option<String>,

        /// Backend: simulator or ibmq
        #[arg(short, long)]
        mode: Option<String>,

        /// Extractor: von_neumann or hash
        #[arg(short, long)]
        extractor: Option<String>,

        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the response payload as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report entropy statistics for a bitstring
    #[command(group(ArgGroup::new("input").required(true).args(["bits", "file"])))]
    Report {
        /// Bitstring to evaluate (characters other than 0/1 are ignored)
        #[arg(long)]
        bits: Option<String>,

        /// Text file containing the bits
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    // Logs go to stderr so generated output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        #[cfg(feature = "server")]
        Command::Serve { config, port } => serve(config, port),
        Command::Generate {
            bits,
            mode,
            extractor,
            config,
            json,
        } => generate(bits, mode, extractor, config, json),
        Command::Report { bits, file } => report(bits, file),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<FileConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Ok(FileConfig::from_file(path)?)
        }
        None => Ok(FileConfig::default()),
    }
}

fn build_generator(config: &FileConfig) -> Result<QuantumRandomGenerator, Box<dyn Error>> {
    let provider = DefaultSourceProvider::new(config.simulator.clone());
    Ok(QuantumRandomGenerator::new(
        Arc::new(provider),
        config.generator.clone(),
    )?)
}

#[cfg(feature = "server")]
fn serve(config: Option<PathBuf>, port: Option<u16>) -> Result<(), Box<dyn Error>> {
    use qrng::metrics::MetricsRegistry;
    use qrng::server::{ApiServer, AppState};

    info!("QRNG Service v{}", qrng::VERSION);

    let mut config = load_config(config)?;
    if let Some(port) = port {
        config.server.bind_addr.set_port(port);
    }

    let state = AppState {
        generator: build_generator(&config)?,
        metrics: MetricsRegistry::new()?,
    };
    let server = ApiServer::new(config.server, state);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.run())?;
    Ok(())
}

fn generate(
    bits: Option<String>,
    mode: Option<String>,
    extractor: Option<String>,
    config: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let config = load_config(config)?;
    let generator = build_generator(&config)?;

    let request = GenerateRequest::from_params(
        bits.as_deref(),
        mode.as_deref(),
        extractor.as_deref(),
        generator.config(),
    )?;
    let result = generator.generate(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.to_response())?);
        return Ok(());
    }

    let stats = &result.statistics;
    println!("Bits: {}", result.bits);
    println!("Hex: {}", result.hex);
    println!("Length: {}", result.bits.len());
    println!("Zeros: {}  Ones: {}", stats.zeros, stats.ones);
    println!("Entropy (per bit): {:.4}", stats.entropy_per_bit);
    println!("Estimated total entropy: {:.4}", result.entropy_estimate());
    println!("Bias: {:.6}", stats.bias);
    if result.outcome.is_degraded() {
        println!("Note: output was {} from short extractor output", result.outcome.as_str());
    }
    Ok(())
}

fn report(bits: Option<String>, file: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let text = match (bits, file) {
        (Some(bits), _) => bits,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?,
        (None, None) => return Err("provide either --bits or --file".into()),
    };

    let bits = Bitstring::from_text_lenient(&text);
    print!("{}", render_report(&bits));
    Ok(())
}

fn render_report(bits: &Bitstring) -> String {
    let stats = Statistics::estimate(bits);
    format!(
        "Length: {}\nEntropy (per bit): {:.4}\nEstimated total entropy: {:.4}\nBias: {:.6}\n",
        bits.len(),
        stats.entropy_per_bit,
        stats.total_entropy(),
        stats.bias
    )
}
