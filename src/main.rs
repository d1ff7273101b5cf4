use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use hsq::{Decoder, EncoderBuilder, HsqHeader};

#[derive(Parser)]
#[command(name = "hsq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pack and unpack Dune (1992) HSQ resources and F7 save games", long_about = None)]
struct Cli {
    /// Trace every command to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the header of HSQ files without decompressing them
    Info {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Decompress HSQ files to `<name>.bin`
    Decompress(BatchArgs),
    /// Compress files to `<name>.HSQ`
    Compress(BatchArgs),
    /// Expand F7 encoded save games to `<name>.bin`
    F7Decompress(BatchArgs),
    /// Compress save games with F7 run length encoding to `<name>.SAV`
    F7Compress(BatchArgs),
}

#[derive(Parser)]
struct BatchArgs {
    /// Input files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output file (single file mode only)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Reject HSQ headers that do not carry the 0xAB signature
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Decompress,
    Compress,
    F7Decompress,
    F7Compress,
}

impl Op {
    fn extension(self) -> &'static str {
        match self {
            Op::Decompress | Op::F7Decompress => "bin",
            Op::Compress => "HSQ",
            Op::F7Compress => "SAV",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let failures = match cli.command {
        Commands::Info { files } => files
            .iter()
            .filter(|path| report(path, show_info(path)))
            .count(),
        Commands::Decompress(args) => run_batch(Op::Decompress, &args, cli.verbose),
        Commands::Compress(args) => run_batch(Op::Compress, &args, cli.verbose),
        Commands::F7Decompress(args) => run_batch(Op::F7Decompress, &args, cli.verbose),
        Commands::F7Compress(args) => run_batch(Op::F7Compress, &args, cli.verbose),
    };

    if failures > 0 {
        eprintln!("{} file(s) failed", failures);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Print the error for a failed file. Returns `true` if the file failed.
fn report(path: &Path, result: Result<()>) -> bool {
    match result {
        Ok(()) => false,
        Err(e) => {
            eprintln!("  ERROR {}: {:#}", path.display(), e);
            true
        }
    }
}

fn show_info(path: &Path) -> Result<()> {
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let header = HsqHeader::from_bytes(&raw)?;
    let signature = if header.is_signed() { "" } else { " [no signature]" };

    println!(
        "  {}: {} bytes -> {} bytes (header says comp={}, checksum={:#04x}){}",
        path.display(),
        raw.len(),
        header.decompressed_size,
        header.compressed_size,
        header.checksum,
        signature
    );

    Ok(())
}

/// Process every file, skipping the ones that fail. Returns the number of failures.
fn run_batch(op: Op, args: &BatchArgs, verbose: bool) -> usize {
    let single = args.files.len() == 1;
    if args.output.is_some() && !single {
        eprintln!("  ignoring --output with more than one input file");
    }

    args.files
        .iter()
        .filter(|path| {
            let out = match &args.output {
                Some(out) if single => out.clone(),
                _ => path.with_extension(op.extension()),
            };
            report(path, process(op, path, &out, args.strict, verbose))
        })
        .count()
}

fn process(op: Op, path: &Path, out: &Path, strict: bool, verbose: bool) -> Result<()> {
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mut stderr = io::stderr();

    let data = match op {
        Op::Decompress => {
            let mut decoder = Decoder::for_bytes(&raw);
            decoder.strict(strict);
            if verbose {
                decoder.with_logging(&mut stderr);
            }
            decoder.decode()?
        }
        Op::Compress => {
            let mut encoder = EncoderBuilder::for_bytes(&raw);
            if verbose {
                encoder.with_logging(&mut stderr);
            }
            encoder.encode_to_vec()?
        }
        Op::F7Decompress => hsq::f7_decompress(&raw),
        Op::F7Compress => hsq::f7_compress(&raw),
    };

    fs::write(out, &data).with_context(|| format!("writing {}", out.display()))?;
    println!(
        "  {}: {} bytes -> {} bytes -> {}",
        path.display(),
        raw.len(),
        data.len(),
        out.display()
    );

    Ok(())
}
