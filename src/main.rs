use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use log::info;
use sheet_grid::config::Config;
use sheet_grid::grid::Grid;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "sheet-grid",
    version,
    about = "Load a spreadsheet and emit the row data and column definitions for a data grid"
)]
struct Cli {
    /// JSON configuration file; built-in defaults when omitted.
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Spreadsheet to load, overriding the configured source.
    #[arg(long, short = 's', value_name = "FILE")]
    source: Option<String>,
    /// Where to write the payload; standard output when omitted.
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,
    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() {
    env_logger::init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(source) = cli.source {
        config.source = source;
    }

    let grid = Grid::startup(&config).with_context(|| format!("failed to load '{}'", config.source))?;
    let payload = grid.payload();

    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create '{}'", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    if cli.pretty {
        serde_json::to_writer_pretty(&mut writer, &payload)?;
    } else {
        serde_json::to_writer(&mut writer, &payload)?;
    }
    writeln!(writer)?;
    writer.flush()?;

    if let Some(path) = &cli.output {
        info!("Wrote {} record(s) to '{}'", grid.table().row_count(), path.display());
    }
    Ok(())
}
