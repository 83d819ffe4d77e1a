// Copyright 2024 Karpeles Lab Inc.
// Touhou 12.8 replay command-line tool

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use th128rpy::{decode_batch, ReplayFile};

#[derive(Parser)]
#[command(name = "th128rpy")]
#[command(about = "Touhou 12.8 replay decoding and re-encoding tool", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Quiet mode - don't print progress
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Do not overwrite existing files
    #[arg(long, global = true)]
    safe: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Decode replay payloads, writing <file>.raw
    Decode {
        /// Replay files to decode
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Remove only the cipher layers, writing <file>.dec
    Decrypt {
        /// Replay files to decrypt
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Build a replay around raw payload data
    Encode {
        /// Raw payload, as written by `decode`
        raw: PathBuf,

        /// Replay whose header fields and user data are reused
        #[arg(long)]
        template: PathBuf,

        /// Output replay file
        #[arg(short = 'o', long)]
        output: PathBuf,
    },

    /// Decode, re-encode and decode again, checking that the data survives
    Verify {
        /// Replay files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Also write the re-encoded replay to <file>.reenc.rpy
        #[arg(long)]
        write: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let (done, failed) = match &args.command {
        Command::Decode { files } => decode_files(files, &args)?,
        Command::Decrypt { files } => for_each_file(files, &args, decrypt_file)?,
        Command::Encode {
            raw,
            template,
            output,
        } => {
            encode_file(raw, template, output, &args)?;
            (1, 0)
        }
        Command::Verify { files, write } => {
            for_each_file(files, &args, |path, args| verify_file(path, *write, args))?
        }
    };

    if !args.quiet {
        println!("All done! Processed {} replays.", done);
    }
    if failed > 0 {
        anyhow::bail!("{} of {} replays failed", failed, done + failed);
    }

    Ok(())
}

fn progress_bar(len: usize, args: &Args) -> Result<Option<ProgressBar>> {
    if args.quiet || len < 2 {
        return Ok(None);
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(Some(pb))
}

fn report(pb: Option<&ProgressBar>, line: String) {
    match pb {
        Some(pb) => pb.println(line),
        None => println!("{}", line),
    }
}

/// Run `f` on every file, reporting failures without stopping.
/// Returns `(succeeded, failed)`.
fn for_each_file<F>(files: &[PathBuf], args: &Args, mut f: F) -> Result<(usize, usize)>
where
    F: FnMut(&Path, &Args) -> Result<String>,
{
    let pb = progress_bar(files.len(), args)?;
    let (mut done, mut failed) = (0, 0);

    for path in files {
        if let Some(ref pb) = pb {
            pb.set_message(path.display().to_string());
        }
        match f(path, args) {
            Ok(line) => {
                done += 1;
                if !args.quiet {
                    report(pb.as_ref(), line);
                }
            }
            Err(e) => {
                failed += 1;
                tracing::error!("{}: {:#}", path.display(), e);
            }
        }
        if let Some(ref pb) = pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }
    Ok((done, failed))
}

/// Decode all files; the payloads are decoded in parallel
fn decode_files(files: &[PathBuf], args: &Args) -> Result<(usize, usize)> {
    let replays: Vec<Result<ReplayFile>> = files.iter().map(|path| read_replay(path)).collect();

    let items: Vec<(&[u8], usize)> = replays
        .iter()
        .filter_map(|replay| replay.as_ref().ok())
        .map(|replay| {
            (
                replay.payload.as_slice(),
                replay.header.uncompressed_size as usize,
            )
        })
        .collect();
    let mut decoded = decode_batch(&items).into_iter();

    let mut results = Vec::with_capacity(files.len());
    for replay in replays {
        results.push(match replay {
            Ok(_) => decoded
                .next()
                .context("missing batch result")?
                .map_err(anyhow::Error::from),
            Err(e) => Err(e),
        });
    }

    let mut results = results.into_iter();
    for_each_file(files, args, |path, args| {
        let data = results
            .next()
            .context("missing batch result")?
            .context("Failed to decode replay data")?;
        let output = with_suffix(path, ".raw");
        write_output(&output, &data, args)?;
        Ok(format!(
            "{} -> {} ({} bytes)",
            path.display(),
            output.display(),
            data.len()
        ))
    })
}

fn decrypt_file(path: &Path, args: &Args) -> Result<String> {
    let replay = read_replay(path)?;
    let output = with_suffix(path, ".dec");
    write_output(&output, &replay.decrypted().to_bytes(), args)?;
    Ok(format!("{} -> {}", path.display(), output.display()))
}

fn encode_file(raw: &Path, template: &Path, output: &Path, args: &Args) -> Result<()> {
    let data = fs::read(raw).with_context(|| format!("Failed to read raw data: {}", raw.display()))?;
    let replay = read_replay(template)?;

    let rebuilt = replay
        .with_payload(&data)
        .context("Failed to encode replay data")?;
    write_output(output, &rebuilt.to_bytes(), args)?;

    if !args.quiet {
        println!(
            "{} -> {} ({} bytes compressed to {})",
            raw.display(),
            output.display(),
            data.len(),
            rebuilt.payload.len()
        );
    }
    Ok(())
}

fn verify_file(path: &Path, write: bool, args: &Args) -> Result<String> {
    let replay = read_replay(path)?;
    let decoded = replay
        .decode_payload()
        .context("Failed to decode original replay data")?;

    let rebuilt = replay
        .with_payload(&decoded)
        .context("Failed to re-encode replay data")?;
    let redecoded = rebuilt
        .decode_payload()
        .context("Failed to decode re-encoded replay data")?;

    if redecoded != decoded {
        anyhow::bail!("data differs after re-encoding");
    }

    if write {
        write_output(&with_suffix(path, ".reenc.rpy"), &rebuilt.to_bytes(), args)?;
    }

    Ok(format!(
        "{}: data matches (compressed size {} -> {}{})",
        path.display(),
        replay.payload.len(),
        rebuilt.payload.len(),
        if rebuilt.payload == replay.payload {
            ", identical"
        } else {
            ""
        }
    ))
}

fn read_replay(path: &Path) -> Result<ReplayFile> {
    let data = fs::read(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    ReplayFile::parse(&data).with_context(|| format!("Not a replay file: {}", path.display()))
}

/// `file.rpy` + `.raw` -> `file.rpy.raw`
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn write_output(output: &Path, data: &[u8], args: &Args) -> Result<()> {
    if args.safe && output.exists() {
        anyhow::bail!("Output file already exists: {}", output.display());
    }
    fs::write(output, data)
        .with_context(|| format!("Failed to create output file: {}", output.display()))
}
