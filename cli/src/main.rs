use crate::cli::{Args, Command};
use anyhow::Context;
use clap::Parser;
use geodata_rdf::mapping::{DatePolicy, Emission, MappingOptions, ParcelMapping, TripleEmitter};
use geodata_rdf::{load_parcels, write_turtle, CantonMapping, OutputStyle, Vocabulary};
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use std::fs::{self, File};
use std::io::{self, stdout, BufWriter, Write};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    match args.command {
        Command::Convert {
            input,
            layer,
            output,
            endpoint,
            cantons_file,
            base_iri,
            style,
            order,
            strict_dates,
        } => {
            let vocabulary = Vocabulary::new(base_iri).context("Invalid --base-iri")?;

            // The canton mapping is resolved first so that a failing query leaves no output.
            let cantons = match cantons_file {
                Some(path) => read_cantons_file(&path)?,
                None => fetch_cantons(&endpoint).await?,
            };

            let mapping = ParcelMapping::standard(&vocabulary);
            let records = load_parcels(&input, &layer, &mapping).with_context(|| {
                format!("Could not read layer '{layer}' of {}", input.display())
            })?;

            let options = MappingOptions {
                date_policy: if strict_dates {
                    DatePolicy::Strict
                } else {
                    DatePolicy::Permissive
                },
            };
            let emission =
                TripleEmitter::new(&mapping, &cantons, options).emit(&records, order.into());

            write_output(&output, &emission, style.into(), &vocabulary, args.quiet)?;
            info!(path = %output.display(), "Done");
            Ok(())
        }
        Command::Cantons { endpoint, output } => {
            let cantons = fetch_cantons(&endpoint).await?;
            match output {
                Some(output) => {
                    let mut writer = BufWriter::new(File::create(&output)?);
                    cantons.write_csv(&mut writer)?;
                    close_file_writer(writer)?;
                }
                None => {
                    let mut writer = stdout().lock();
                    cantons.write_csv(&mut writer)?;
                    writer.flush()?;
                }
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn fetch_cantons(endpoint: &str) -> anyhow::Result<CantonMapping> {
    CantonMapping::fetch(&reqwest::Client::new(), endpoint)
        .await
        .with_context(|| format!("Error fetching SPARQL from '{endpoint}'"))
}

fn read_cantons_file(path: &Path) -> anyhow::Result<CantonMapping> {
    let file = File::open(path)
        .with_context(|| format!("Could not open canton file {}", path.display()))?;
    let cantons = CantonMapping::from_csv(file)
        .with_context(|| format!("Invalid canton file {}", path.display()))?;
    info!(cantons = cantons.len(), "Read canton data");
    Ok(cantons)
}

fn write_output(
    path: &Path,
    emission: &Emission,
    style: OutputStyle,
    vocabulary: &Vocabulary,
    quiet: bool,
) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create output directory {}", parent.display()))?;
    }

    info!(path = %path.display(), "Writing to disk");
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(u64::try_from(emission.len()).unwrap_or(u64::MAX))
    };
    progress.set_style(ProgressStyle::with_template(
        "{msg} [{bar:30}] {pos}/{len} triples",
    )?);
    progress.set_message("Writing attributes");

    let file = File::create(path)
        .with_context(|| format!("Cannot create output file {}", path.display()))?;
    let writer = write_turtle(
        BufWriter::new(file),
        emission.triples().progress_with(progress.clone()),
        style,
        vocabulary,
    )?;
    progress.finish_and_clear();
    close_file_writer(writer)?;
    Ok(())
}

fn close_file_writer(writer: BufWriter<File>) -> io::Result<()> {
    let mut file = writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    file.flush()?;
    file.sync_all()
}
