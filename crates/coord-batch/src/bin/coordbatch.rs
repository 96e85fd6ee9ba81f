use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use coord_batch::{
    CoordinateKind, Datum, Event, HeaderMode, Hemisphere, OutputFormat, ParseWarning, Stage,
    Workflow, WriterSink, decode_input_bytes,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "coordbatch",
    version,
    about = "Batch-convert pasted coordinate tables between UTM and latitude/longitude"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert every row and write tab-separated clipboard text.
    Convert(ConvertArgs),
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Conversion kind: latlong-to-utm, utm-to-latlong or utm-datum.
    #[arg(long)]
    kind: CoordinateKind,

    /// Input text file; reads stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file; writes stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// One-based columns holding the two coordinates, e.g. 1,2 (lat,lng or x,y).
    #[arg(long, default_value = "1,2")]
    columns: String,

    /// UTM zone (1-60).
    #[arg(long, env = "COORDBATCH_ZONE")]
    zone: Option<i64>,

    /// Hemisphere, N or S.
    #[arg(long)]
    hemisphere: Option<Hemisphere>,

    #[arg(long, default_value = "WGS84")]
    source_datum: Datum,

    #[arg(long, default_value = "WGS84")]
    target_datum: Datum,

    /// Output format for latitude/longitude: decimal or dms.
    #[arg(long, default_value = "decimal")]
    format: OutputFormat,

    /// Decimal places in the output; defaults to 2 for meters and 8 for degrees.
    #[arg(long)]
    decimals: Option<usize>,

    /// Force header interpretation on the first row.
    #[arg(long, conflicts_with = "no_header")]
    has_header: bool,

    /// Disable header interpretation; keep the first row as data.
    #[arg(long, conflicts_with = "has_header")]
    no_header: bool,

    /// Print per-row errors and parse warnings.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug)]
struct RunReport {
    total: usize,
    converted: usize,
    row_errors: Vec<(usize, String)>,
    warnings: Vec<ParseWarning>,
}

fn parse_columns(value: &str) -> Result<(usize, usize)> {
    let (first, second) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("invalid --columns, expected format: A,B"))?;
    let parse_one = |raw: &str| -> Result<usize> {
        let column = raw
            .trim()
            .parse::<usize>()
            .with_context(|| format!("invalid column number '{}'", raw.trim()))?;
        column
            .checked_sub(1)
            .ok_or_else(|| anyhow!("column numbers start at 1"))
    };
    Ok((parse_one(first)?, parse_one(second)?))
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    let bytes = match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?
        }
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };
    Ok(decode_input_bytes(&bytes))
}

fn settle(workflow: &mut Workflow, event: Event, what: &str) -> Result<Stage> {
    let stage = workflow
        .dispatch(event)
        .with_context(|| format!("failed to {what}"))?;
    if stage == Stage::Error {
        let message = workflow.state().first_error().unwrap_or("unknown error");
        bail!("failed to {what}: {message}");
    }
    Ok(stage)
}

fn run_convert(args: &ConvertArgs) -> Result<RunReport> {
    let header_mode = if args.has_header {
        HeaderMode::HasHeader
    } else if args.no_header {
        HeaderMode::NoHeader
    } else {
        HeaderMode::AutoDetect
    };
    let (first, second) = parse_columns(&args.columns).context("failed to parse --columns")?;
    let raw = read_input(args.input.as_ref())?;

    let mut workflow = Workflow::new(args.kind).with_header_mode(header_mode);
    settle(&mut workflow, Event::PasteData(raw), "load input")?;
    settle(&mut workflow, Event::RequestParse, "parse input")?;
    settle(
        &mut workflow,
        Event::MapColumns { first, second },
        "map columns",
    )?;

    let mut parameters = vec![
        Event::SetSourceDatum(args.source_datum),
        Event::SetTargetDatum(args.target_datum),
        Event::SetOutputFormat(args.format),
    ];
    parameters.extend(args.zone.map(Event::SetZone));
    parameters.extend(args.hemisphere.map(Event::SetHemisphere));
    parameters.extend(args.decimals.map(Event::SetClipboardDecimals));
    for event in parameters {
        let name = event.name();
        settle(&mut workflow, event, name)?;
    }
    settle(&mut workflow, Event::RequestConvert, "convert rows")?;

    let copied = match &args.output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            workflow.copy_to(&mut WriterSink(file))?
        }
        None => workflow.copy_to(&mut WriterSink(io::stdout().lock()))?,
    };
    if !copied {
        let message = workflow.state().errors.last().map_or("", String::as_str);
        bail!("failed to write output: {message}");
    }

    let state = workflow.state();
    Ok(RunReport {
        total: state.total_rows,
        converted: state.valid_rows,
        row_errors: state
            .rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| row.error.clone().map(|error| (index + 1, error)))
            .collect(),
        warnings: state.warnings.clone(),
    })
}

fn log_report(report: &RunReport, verbose: bool) {
    if !report.warnings.is_empty() {
        eprintln!("warning: {} issue(s) detected", report.warnings.len());
        if verbose {
            for warning in &report.warnings {
                eprintln!("  - {:?} row={:?}: {}", warning.code, warning.row, warning.message);
            }
        }
    }

    if report.row_errors.is_empty() {
        return;
    }
    eprintln!(
        "warning: {} of {} row(s) failed to convert",
        report.row_errors.len(),
        report.total
    );
    if verbose {
        for (row, error) in &report.row_errors {
            eprintln!("  - row {row}: {error}");
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Commands::Convert(args) = cli.command;

    let default_filter = if args.verbose {
        "coord_batch=debug"
    } else {
        "coord_batch=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .without_time()
        .init();

    match run_convert(&args) {
        Ok(report) => {
            log_report(&report, args.verbose);
            if report.converted == report.total {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_columns;

    #[test]
    fn columns_are_one_based() {
        assert_eq!(parse_columns("1,2").expect("valid columns"), (0, 1));
        assert_eq!(parse_columns(" 3 , 1 ").expect("valid columns"), (2, 0));
        assert!(parse_columns("0,1").is_err());
        assert!(parse_columns("1").is_err());
        assert!(parse_columns("a,b").is_err());
    }
}
