//! pdfoutline CLI - PDF title and heading outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::batch::list_pdf_files;
use pdfoutline::{
    to_json, BatchJob, BatchReport, FileStatus, HeadingLevel, JsonFormat, NumberingScheme,
    OutlineExtractor, OutlineOptions, ParseOptions, PdfParser, SpanSource,
};

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(version)]
#[command(about = "Extract document titles and heading outlines from PDF files", long_about = None)]
struct Cli {
    /// Input directory of PDF files
    #[arg(value_name = "INPUT", env = "PDFOUTLINE_INPUT", default_value = "input")]
    input: PathBuf,

    /// Output directory for JSON files
    #[arg(value_name = "OUTPUT", env = "PDFOUTLINE_OUTPUT", default_value = "output")]
    output: PathBuf,

    #[command(flatten)]
    outline: OutlineArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract outlines for every PDF in a directory
    Batch {
        /// Input directory of PDF files
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory for JSON files
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Extract the outline of a single PDF
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show font statistics, title and heading counts
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the information as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

/// Options shared by every extracting command.
#[derive(Args, Clone)]
struct OutlineArgs {
    /// How section numbers map to heading levels
    #[arg(long, value_enum, default_value = "depth", global = true)]
    numbering: Numbering,

    /// Prefer the title stored in the PDF metadata
    #[arg(long, global = true)]
    prefer_metadata_title: bool,

    /// Per-document time limit in seconds (0 disables it)
    #[arg(long, value_name = "SECS", default_value_t = 120, global = true)]
    timeout: u64,

    /// Fail a document on the first unreadable page
    #[arg(long, global = true)]
    strict: bool,

    /// Process batch files one at a time
    #[arg(long, global = true)]
    sequential: bool,

    /// Output compact JSON
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum Numbering {
    /// "1." is H1, "1.1" is H2, deeper numbers are H3
    Depth,
    /// Only "1.1." style numbers, always H2
    Legacy,
    /// Ignore section numbers
    Off,
}

impl From<Numbering> for NumberingScheme {
    fn from(numbering: Numbering) -> Self {
        match numbering {
            Numbering::Depth => NumberingScheme::Depth,
            Numbering::Legacy => NumberingScheme::Legacy,
            Numbering::Off => NumberingScheme::Off,
        }
    }
}

impl OutlineArgs {
    fn parse_options(&self) -> ParseOptions {
        if self.strict {
            ParseOptions::new()
        } else {
            // Skip unreadable pages so one bad stream does not lose the document
            ParseOptions::new().lenient()
        }
    }

    fn outline_options(&self) -> OutlineOptions {
        let options = OutlineOptions::new()
            .with_numbering(self.numbering.into())
            .prefer_metadata_title(self.prefer_metadata_title);
        if self.timeout > 0 {
            options.with_deadline(Duration::from_secs(self.timeout))
        } else {
            options.without_deadline()
        }
    }

    fn format(&self) -> JsonFormat {
        if self.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Batch { input, output }) => cmd_batch(&input, &output, &cli.outline),
        Some(Commands::Extract { input, output }) => {
            cmd_extract(&input, output.as_deref(), &cli.outline)
        }
        Some(Commands::Info { input, json }) => cmd_info(&input, json, &cli.outline),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_batch(&cli.input, &cli.output, &cli.outline),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    args: &OutlineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = list_pdf_files(input)
        .map_err(|e| format!("cannot read input directory {}: {}", input.display(), e))?;

    if files.is_empty() {
        println!(
            "{} no PDF files in {}",
            "Nothing to do:".yellow(),
            input.display()
        );
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let extractor = OutlineExtractor::new(args.outline_options());
    let report = BatchJob::new(&extractor)
        .with_parse_options(args.parse_options())
        .with_format(args.format())
        .with_parallel(!args.sequential)
        .run_with_progress(input, output, |outcome| {
            pb.set_message(outcome.file_name());
            pb.inc(1);
        })?;

    pb.finish_and_clear();
    print_report(&report, output);
    Ok(())
}

fn print_report(report: &BatchReport, output: &Path) {
    println!("{}", "Batch Summary".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());

    for outcome in &report.outcomes {
        let name = outcome.file_name();
        match &outcome.status {
            FileStatus::Processed { headings } => println!(
                "  {} {:<40} {:>4} headings  {:>8.2?}",
                "✓".green(),
                name,
                headings,
                outcome.elapsed
            ),
            FileStatus::Empty => println!(
                "  {} {:<40} {}",
                "○".yellow(),
                name,
                "no text found".yellow()
            ),
            FileStatus::Failed(reason) => {
                println!("  {} {:<40} {}", "✗".red(), name, reason.red())
            }
        }
    }

    println!("{}", "─".repeat(60).dimmed());
    println!(
        "{}: {}  {}: {}  {}: {}  {}: {}",
        "Processed".bold(),
        report.processed(),
        "Empty".bold(),
        report.empty(),
        "Failed".bold(),
        report.failed(),
        "Headings".bold(),
        report.total_headings()
    );
    println!(
        "{} {} in {:.2?}",
        "Output saved to".green(),
        output.display(),
        report.elapsed
    );
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    args: &OutlineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let parser = PdfParser::open_with_options(input, args.parse_options())?;
    let extractor = OutlineExtractor::new(args.outline_options());
    let outline = extractor.extract(&parser, &file_name(input))?;

    let json = to_json(&outline, args.format())?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(
    input: &Path,
    as_json: bool,
    args: &OutlineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let parser = PdfParser::open_with_options(input, args.parse_options())?;
    let extractor = OutlineExtractor::new(args.outline_options());
    let report = extractor.extract_report(&parser, &file_name(input))?;
    let outline = &report.outline;
    let thresholds = report.profile.thresholds();

    if as_json {
        let info = serde_json::json!({
            "file": input.display().to_string(),
            "pdfVersion": parser.version(),
            "pages": parser.page_count(),
            "metadataTitle": parser.metadata_title(),
            "title": outline.title,
            "fontSizes": report.profile.sizes(),
            "averageFontSize": report.profile.average(),
            "thresholds": thresholds.map(|t| serde_json::json!({
                "h1": t.h1,
                "h2": t.h2,
                "h3": t.h3,
            })),
            "spans": report.span_count,
            "candidates": report.candidate_count,
            "headings": {
                "H1": outline.count_level(HeadingLevel::H1),
                "H2": outline.count_level(HeadingLevel::H2),
                "H3": outline.count_level(HeadingLevel::H3),
            },
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), parser.version());
    println!("{}: {}", "Pages".bold(), parser.page_count());
    if let Some(title) = parser.metadata_title() {
        println!("{}: {}", "Metadata title".bold(), title);
    }
    println!("{}: {}", "Detected title".bold(), outline.title);

    println!();
    println!("{}", "Font Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Spans".bold(), report.span_count);
    println!("{}: {:?}", "Font sizes".bold(), report.profile.sizes());
    if let Some(avg) = report.profile.average() {
        println!("{}: {:.1}", "Average size".bold(), avg);
    }
    if let Some(t) = thresholds {
        println!(
            "{}: H1 ≥ {:.1}, H2 ≥ {:.1}, H3 ≥ {:.1}",
            "Thresholds".bold(),
            t.h1,
            t.h2,
            t.h3
        );
    }

    println!();
    println!("{}", "Headings".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Candidates".bold(), report.candidate_count);
    for level in [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3] {
        println!("{}: {}", level.to_string().bold(), outline.count_level(level));
    }

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "pdfoutline".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("PDF title and heading outline extraction tool");
    println!();
    println!("License: MIT");
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
