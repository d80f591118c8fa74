// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sq compress`

use crate::config::Config;
use crate::exit_error::ExitError;
use crate::output::{format_bytes, format_ratio, print_json, OutputFormat};
use crate::table::{Column, Table};
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use sq_adapters::{Codec, ImageCodec, TracedCodec};
use sq_core::{EncodeSettings, JobDescriptor, JobId, OutputFormat as ImageFormat, TranscodeOutput};
use sq_engine::{shutdown_signal, Pool, PoolError, TaskHandle};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Exit code when interrupted by a signal
const EXIT_INTERRUPTED: i32 = 130;

#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Image files to compress
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Target format: jpeg, png, webp, avif or tiff
    #[arg(short, long, default_value = "webp")]
    pub format: String,

    /// Quality 1-100 (defaults to the configured quality for the format)
    #[arg(short, long)]
    pub quality: Option<u8>,

    /// Maximum output width; aspect ratio is kept and images never grow
    #[arg(long)]
    pub width: Option<u32>,

    /// Maximum output height
    #[arg(long)]
    pub height: Option<u32>,

    /// Directory for compressed files
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Worker threads (overrides config)
    #[arg(long)]
    pub pool_size: Option<usize>,
}

/// Outcome for one input file
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub original_size: u64,
    pub status: &'static str,
    #[serde(flatten)]
    pub result: Option<TranscodeOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    fn new(input: &Path) -> Self {
        Self {
            input: input.to_path_buf(),
            output: None,
            original_size: 0,
            status: "pending",
            result: None,
            error: None,
        }
    }

    fn fail(&mut self, status: &'static str, error: impl ToString) {
        self.status = status;
        self.error = Some(error.to_string());
    }

    fn succeed(&mut self, output: PathBuf, result: TranscodeOutput) {
        self.status = "done";
        self.output = Some(output);
        self.result = Some(result);
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }

    fn status_cell(&self) -> String {
        match &self.error {
            Some(error) => format!("{}: {error}", self.status),
            None => self.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    completed: usize,
    failed: usize,
    bytes_saved: i64,
    files: &'a [FileReport],
}

/// Short status word for a pool failure
pub fn status_for(err: &PoolError) -> &'static str {
    match err {
        PoolError::WorkerCrashed { .. } => "crashed",
        PoolError::Saturated { .. } => "saturated",
        PoolError::Terminated | PoolError::NoWorkers(_) => "terminated",
        PoolError::Validation(_) | PoolError::Transcode(_) => "failed",
    }
}

/// `<out_dir>/<stem>.<ext>`
pub fn output_path(input: &Path, out_dir: &Path, format: ImageFormat) -> Option<PathBuf> {
    let stem = input.file_stem()?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(format.extension());
    Some(out_dir.join(name))
}

/// Read `path` into a job; validation failures come back as errors
pub async fn read_job(path: &Path, settings: EncodeSettings) -> Result<JobDescriptor> {
    let payload = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let size = payload.len() as u64;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let job = JobDescriptor::new(
        JobId::new(path.display().to_string()),
        payload,
        settings,
        name,
        size,
    )?;
    Ok(job)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Most jobs to keep open at once without tripping the pool's queue bound
fn window<C: Codec>(pool: &Pool<C>) -> usize {
    let config = pool.config();
    config
        .max_queue
        .map_or(usize::MAX, |cap| cap.saturating_add(config.pool_size))
        .max(1)
}

/// Feed files through the pool and report them in input order.
///
/// At most `window(pool)` files are open at a time; once `cancel` fires the
/// remaining files are reported as terminated without being submitted.
pub async fn run_jobs<C: Codec>(
    pool: &Pool<C>,
    files: &[PathBuf],
    settings: EncodeSettings,
    out_dir: &Path,
    cancel: &CancellationToken,
) -> Vec<FileReport> {
    let limit = window(pool);
    let mut open: VecDeque<(FileReport, Option<TaskHandle>)> = VecDeque::new();
    let mut reports = Vec::with_capacity(files.len());

    for path in files {
        while open.len() >= limit {
            if let Some((report, handle)) = open.pop_front() {
                reports.push(finish(report, handle, out_dir).await);
            }
        }

        let mut report = FileReport::new(path);
        if cancel.is_cancelled() {
            report.fail("terminated", "interrupted before submission");
            open.push_back((report, None));
            continue;
        }
        let handle = match read_job(path, settings).await {
            Ok(job) => {
                report.original_size = job.original_size();
                let handle = pool.enqueue(job).await;
                if cancel.is_cancelled() {
                    // The enqueue may have restarted a pool that the signal
                    // had just shut down
                    pool.terminate().await;
                }
                Some(handle)
            }
            Err(err) => {
                report.fail("failed", format!("{err:#}"));
                None
            }
        };
        open.push_back((report, handle));
    }

    for (report, handle) in open {
        reports.push(finish(report, handle, out_dir).await);
    }
    reports
}

async fn finish(mut report: FileReport, handle: Option<TaskHandle>, out_dir: &Path) -> FileReport {
    let Some(handle) = handle else {
        return report;
    };
    match handle.await {
        Ok(result) => match write_output(&report.input, out_dir, &result).await {
            Ok(path) => report.succeed(path, result),
            Err(err) => report.fail("failed", format!("{err:#}")),
        },
        Err(err) => {
            tracing::warn!(input = %report.input.display(), error = %err, "compression failed");
            report.fail(status_for(&err), err);
        }
    }
    report
}

async fn write_output(input: &Path, out_dir: &Path, result: &TranscodeOutput) -> Result<PathBuf> {
    let path = output_path(input, out_dir, result.output_format)
        .with_context(|| format!("no file name in {}", input.display()))?;
    if same_file(input, &path) {
        anyhow::bail!("refusing to overwrite input {}", input.display());
    }
    tokio::fs::write(&path, &result.output)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

pub fn fill_table(table: &mut Table, reports: &[FileReport]) {
    for report in reports {
        let name = report
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| report.input.display().to_string());
        let cells = match &report.result {
            Some(result) => vec![
                name,
                result.output_format.to_string(),
                format_bytes(report.original_size),
                format_bytes(result.compressed_size),
                format_ratio(result.compression_ratio),
                format!("{}x{}", result.width, result.height),
                result.cache_key.chars().take(12).collect(),
                report.status_cell(),
            ],
            None => vec![
                name,
                "-".to_string(),
                format_bytes(report.original_size),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                report.status_cell(),
            ],
        };
        table.row(cells);
    }
}

pub fn columns() -> Vec<Column> {
    vec![
        Column::left("FILE").with_max(40),
        Column::left("FORMAT"),
        Column::right("BEFORE"),
        Column::right("AFTER"),
        Column::right("SAVED"),
        Column::right("DIMENSIONS"),
        Column::muted("KEY"),
        Column::status("STATUS"),
    ]
}

fn bytes_saved(reports: &[FileReport]) -> i64 {
    reports
        .iter()
        .filter_map(|r| {
            let result = r.result.as_ref()?;
            Some(r.original_size as i64 - result.compressed_size as i64)
        })
        .sum()
}

pub async fn handle(args: CompressArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let target: ImageFormat = args.format.parse()?;
    let mut pool_config = config.pool_config()?;
    if let Some(size) = args.pool_size {
        pool_config = pool_config.with_pool_size(size);
    }
    let quality = args
        .quality
        .unwrap_or_else(|| pool_config.tuning.default_quality(target));
    let settings = EncodeSettings::new(target, quality).with_resize(args.width, args.height);
    settings.validate()?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let pool = Pool::new(TracedCodec::new(ImageCodec::new()), pool_config);
    let cancel = CancellationToken::new();
    let signals = tokio::spawn({
        let pool = pool.clone();
        let cancel = cancel.clone();
        async move {
            match shutdown_signal().await {
                Ok(signal) => {
                    tracing::warn!(signal, "terminating worker pool");
                    cancel.cancel();
                    pool.terminate().await;
                }
                Err(err) => tracing::warn!(error = %err, "failed to install signal handlers"),
            }
        }
    });

    let reports = run_jobs(&pool, &args.files, settings, &args.out_dir, &cancel).await;

    let interrupted = cancel.is_cancelled();
    if interrupted {
        let _ = signals.await;
    } else {
        signals.abort();
    }
    pool.terminate().await;

    let completed = reports.iter().filter(|r| r.is_ok()).count();
    let failed = reports.len() - completed;
    let saved = bytes_saved(&reports);

    match format {
        OutputFormat::Text => {
            let mut table = Table::new(columns(), crate::color::should_colorize());
            fill_table(&mut table, &reports);
            table
                .render(&mut std::io::stdout().lock())
                .context("failed to write report")?;
            let saved_text = if saved < 0 {
                format!("grew by {}", format_bytes(saved.unsigned_abs()))
            } else {
                format!("saved {}", format_bytes(saved.unsigned_abs()))
            };
            println!("\n{completed} compressed, {failed} failed, {saved_text}");
        }
        OutputFormat::Json => print_json(&Summary {
            completed,
            failed,
            bytes_saved: saved,
            files: &reports,
        })?,
    }

    if interrupted {
        return Err(ExitError::new(EXIT_INTERRUPTED, "interrupted").into());
    }
    if failed > 0 {
        return Err(ExitError::new(1, format!("{failed} of {} files failed", reports.len())).into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "compress_tests.rs"]
mod tests;
