use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use blockgz::block::{parse_block, BlockParse, Cursor};
use blockgz::{BgzfReader, BgzfWriter};

#[derive(Parser, Debug)]
#[command(name = "blockgz")]
#[command(about = "Compress to and decompress from the Blocked GZip Format (BGZF)")]
#[command(version)]
struct Args {
    /// Input file (use - for stdin)
    #[arg(short, long, default_value = "-")]
    input: PathBuf,

    /// Output file (use - for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Number of threads (0 = auto)
    #[arg(short = 't', long, default_value = "0")]
    threads: usize,

    /// Decompress instead of compress
    #[arg(short, long)]
    decompress: bool,

    /// Check whether the input is a well-formed BGZF stream and exit
    /// (0=valid, 1=invalid, 2=error)
    #[arg(long)]
    check: bool,

    /// Quiet mode - suppress the summary line
    #[arg(short, long)]
    quiet: bool,
}

/// Exit codes for --check mode
const EXIT_VALID: u8 = 0;
const EXIT_INVALID: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn open_input(path: &PathBuf) -> io::Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(File::open(path)?))
    }
}

fn open_output(path: &PathBuf) -> io::Result<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(io::stdout().lock()))
    } else {
        Ok(Box::new(File::create(path)?))
    }
}

/// Format bytes as a human-readable string
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Walk every block in the stream; valid means at least one block and a
/// clean end on a block boundary.
fn check_stream(data: &[u8]) -> bool {
    let mut cursor = Cursor::new(data);
    let mut blocks = 0u64;
    loop {
        match parse_block(&mut cursor) {
            BlockParse::Done(_) => blocks += 1,
            BlockParse::NeedMoreBytes => return cursor.remaining() == 0 && blocks > 0,
            BlockParse::Malformed(_) => return false,
        }
        if cursor.remaining() == 0 {
            return blocks > 0;
        }
    }
}

fn run_check(args: &Args) -> ExitCode {
    let mut data = Vec::new();
    let mut input = match open_input(&args.input) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("blockgz: cannot open {}: {}", args.input.display(), err);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if let Err(err) = input.read_to_end(&mut data) {
        eprintln!("blockgz: read error: {}", err);
        return ExitCode::from(EXIT_ERROR);
    }

    if check_stream(&data) {
        if !args.quiet {
            eprintln!("{}: valid BGZF", args.input.display());
        }
        ExitCode::from(EXIT_VALID)
    } else {
        if !args.quiet {
            eprintln!("{}: not BGZF", args.input.display());
        }
        ExitCode::from(EXIT_INVALID)
    }
}

fn run_compress(args: &Args) -> io::Result<(u64, u64)> {
    let mut reader = BufReader::new(open_input(&args.input)?);
    let mut writer = BgzfWriter::new(BufWriter::new(open_output(&args.output)?), args.threads);

    let mut buf = [0u8; 256 * 1024];
    let mut bytes_in: u64 = 0;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
        bytes_in += n as u64;
    }
    let mut inner = writer.finish().map_err(io::Error::from)?;
    inner.flush()?;
    Ok((bytes_in, 0))
}

fn run_decompress(args: &Args) -> io::Result<(u64, u64)> {
    let mut reader = BgzfReader::new(BufReader::new(open_input(&args.input)?), args.threads);
    let mut writer = BufWriter::new(open_output(&args.output)?);

    let mut buf = [0u8; 256 * 1024];
    let mut bytes_out: u64 = 0;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
        bytes_out += n as u64;
    }
    writer.flush()?;
    Ok((0, bytes_out))
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.check {
        return run_check(&args);
    }

    let start = Instant::now();
    let result = if args.decompress { run_decompress(&args) } else { run_compress(&args) };

    match result {
        Ok((bytes_in, bytes_out)) => {
            if !args.quiet {
                let elapsed = start.elapsed();
                let processed = if args.decompress { bytes_out } else { bytes_in };
                eprintln!(
                    "blockgz: {} {} in {:.2}s",
                    if args.decompress { "inflated" } else { "deflated" },
                    format_bytes(processed),
                    elapsed.as_secs_f64(),
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("blockgz: {}", err);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
