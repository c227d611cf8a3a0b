//! Directory batch processing.
//!
//! Every `.pdf` file of an input directory becomes `<stem>.json` in the
//! output directory. A file that cannot be read is recorded as failed and the
//! batch moves on.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::detect::has_pdf_extension;
use crate::error::Result;
use crate::outline::OutlineExtractor;
use crate::parser::{ParseOptions, PdfParser};
use crate::render::{write_json, JsonFormat};

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    /// Outline written
    Processed { headings: usize },
    /// No text found; an outline with only a title was written
    Empty,
    /// The file could not be processed
    Failed(String),
}

/// Per-file result of a batch run.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub input: PathBuf,
    /// JSON file written, if any
    pub output: Option<PathBuf>,
    pub status: FileStatus,
    pub elapsed: Duration,
}

impl FileOutcome {
    /// Input file name for display.
    pub fn file_name(&self) -> String {
        self.input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Whether the file failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed(_))
    }
}

/// Summary of a batch run, outcomes in file-name order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    pub elapsed: Duration,
}

impl BatchReport {
    /// Files with at least one outline written.
    pub fn processed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FileStatus::Processed { .. }))
            .count()
    }

    /// Files without any text.
    pub fn empty(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == FileStatus::Empty)
            .count()
    }

    /// Files that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Total headings across all processed files.
    pub fn total_headings(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                FileStatus::Processed { headings } => headings,
                _ => 0,
            })
            .sum()
    }
}

/// List `.pdf` files (case-insensitive) directly inside `dir`, by file name.
pub fn list_pdf_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Output path for an input file: `<output_dir>/<stem>.json`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| crate::outline::UNTITLED.to_string());
    output_dir.join(format!("{}.json", stem))
}

/// Pair each file with a conflict message when an earlier file already
/// writes the same output. Names are compared case-insensitively, so
/// `report.pdf` and `report.PDF` cannot overwrite each other.
fn claim_outputs<'f>(
    files: &'f [PathBuf],
    output_dir: &Path,
) -> Vec<(&'f PathBuf, Option<String>)> {
    let mut claimed: HashMap<String, &PathBuf> = HashMap::new();
    files
        .iter()
        .map(|path| {
            let output = output_path_for(path, output_dir);
            let key = output.to_string_lossy().to_lowercase();
            match claimed.get(&key) {
                Some(first) => {
                    let reason = format!(
                        "output {} is already written for {}",
                        output.display(),
                        first.display()
                    );
                    (path, Some(reason))
                }
                None => {
                    claimed.insert(key, path);
                    (path, None)
                }
            }
        })
        .collect()
}

/// A configured batch run.
pub struct BatchJob<'a> {
    extractor: &'a OutlineExtractor,
    parse_options: ParseOptions,
    format: JsonFormat,
    parallel: bool,
}

impl<'a> BatchJob<'a> {
    /// Create a job using `extractor`, with pretty output on the rayon pool.
    pub fn new(extractor: &'a OutlineExtractor) -> Self {
        Self {
            extractor,
            parse_options: ParseOptions::default(),
            format: JsonFormat::Pretty,
            parallel: true,
        }
    }

    /// Set parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set the JSON format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Process a directory.
    ///
    /// Fails only if the input directory cannot be listed or the output
    /// directory cannot be created; per-file problems end up in the report.
    pub fn run<P, Q>(&self, input_dir: P, output_dir: Q) -> Result<BatchReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        self.run_with_progress(input_dir, output_dir, |_| {})
    }

    /// Like [`run`](Self::run), calling `progress` after each file.
    pub fn run_with_progress<P, Q, F>(
        &self,
        input_dir: P,
        output_dir: Q,
        progress: F,
    ) -> Result<BatchReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        F: Fn(&FileOutcome) + Sync,
    {
        let start = Instant::now();
        let output_dir = output_dir.as_ref();
        let files = list_pdf_files(input_dir.as_ref())?;
        fs::create_dir_all(output_dir)?;

        log::info!(
            "Processing {} PDF files from {}",
            files.len(),
            input_dir.as_ref().display()
        );

        let jobs = claim_outputs(&files, output_dir);
        let handle = |(path, conflict): &(&PathBuf, Option<String>)| {
            let outcome = match conflict {
                Some(reason) => {
                    log::warn!("Skipping {}: {}", path.display(), reason);
                    FileOutcome {
                        input: path.to_path_buf(),
                        output: None,
                        status: FileStatus::Failed(reason.clone()),
                        elapsed: Duration::ZERO,
                    }
                }
                None => self.process_file(path, output_dir),
            };
            progress(&outcome);
            outcome
        };

        // Both iterators preserve input order.
        let outcomes: Vec<FileOutcome> = if self.parallel {
            jobs.par_iter().map(handle).collect()
        } else {
            jobs.iter().map(handle).collect()
        };

        Ok(BatchReport {
            outcomes,
            elapsed: start.elapsed(),
        })
    }

    /// Process one file into `output_dir`.
    pub fn process_file(&self, input: &Path, output_dir: &Path) -> FileOutcome {
        let start = Instant::now();
        let output = output_path_for(input, output_dir);

        let result = self.write_outline(input, &output);
        let (output, status) = match result {
            Ok(status) => (Some(output), status),
            Err(e) => {
                log::warn!("Error processing {}: {}", input.display(), e);
                (None, FileStatus::Failed(e.to_string()))
            }
        };

        FileOutcome {
            input: input.to_path_buf(),
            output,
            status,
            elapsed: start.elapsed(),
        }
    }

    fn write_outline(&self, input: &Path, output: &Path) -> Result<FileStatus> {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let report = {
            let parser = PdfParser::open_with_options(input, self.parse_options.clone())?;
            self.extractor.extract_report(&parser, &file_name)?
        };

        write_json(&report.outline, output, self.format)?;

        if report.span_count == 0 {
            Ok(FileStatus::Empty)
        } else {
            Ok(FileStatus::Processed {
                headings: report.outline.outline.len(),
            })
        }
    }
}
