use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use wf_logstats::{
    config_error, read_log_rows, AnalysisReport, CategoryTable, DensityEstimator, EventExtractor,
    JsonFormatter, LogRow, ProcessReconstructor, ProcessRecord, SignatureType, SortKey, SortOrder,
    TextFormatter, ViewEngine, ViewQuery,
};

#[derive(Debug, Parser)]
#[clap(
    name = "wf-logstats",
    version,
    about = "A fast workflow process log analysis tool"
)]
struct Arguments {
    /// CSV log files to analyze
    #[clap(value_name = "LOG_FILES")]
    log_files: Vec<String>,

    /// Directory containing workflow log exports (.csv)
    #[clap(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Output format for results
    #[clap(long, value_enum, default_value = "text")]
    output_format: OutputFormat,

    /// Limit analysis to first N rows of each file (for large files)
    #[clap(long, value_name = "N")]
    sample_size: Option<usize>,

    /// Restrict the analysis to one signature category by its 1-based area id
    #[clap(long, value_name = "ID", value_parser = clap::value_parser!(u8).range(1..=4))]
    area: Option<u8>,

    /// Case-insensitive username filter for the record table
    #[clap(long, default_value = "")]
    search: String,

    /// Record field to sort the table by
    #[clap(long, default_value = "start_date")]
    sort: SortKey,

    /// Sort direction
    #[clap(long, default_value = "asc")]
    order: SortOrder,

    /// 1-based page of the record table
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    page: u64,

    /// Records per page
    #[clap(long, default_value_t = 25)]
    per_page: usize,

    /// define the filename for the output. To dump output to stdout use - as filename.
    #[clap(short = 'o', long, value_name = "outfile")]
    outfile: Option<String>,

    /// don't print anything to stdout, not even a progress bar.
    #[clap(short = 'q', long, value_name = "quiet")]
    quiet: bool,
}

#[derive(Debug, ValueEnum, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Arguments::parse();
    let start_time = Instant::now();

    // Validate CLI arguments
    validate_arguments(&args)?;

    // Initialize progress bar if not in quiet mode
    let progress_bar = if !args.quiet {
        Some(create_progress_bar())
    } else {
        None
    };

    // Discover log files
    let log_files = discover_log_files(&args)?;

    if log_files.is_empty() {
        log::error!("No log files found to process");
        process::exit(1);
    }

    info!("Found {} log files to process", log_files.len());

    // Read rows from all files with progress indication
    let mut all_rows = Vec::new();

    for (index, log_file) in log_files.iter().enumerate() {
        if let Some(pb) = &progress_bar {
            pb.set_message(format!("Processing {}", log_file.display()));
            pb.set_position(index as u64);
        }

        match process_log_file(log_file, &args) {
            Ok(mut rows) => {
                info!("Read {} rows from {}", rows.len(), log_file.display());
                all_rows.append(&mut rows);
            }
            Err(e) => {
                warn!("Failed to process {}: {}", log_file.display(), e);
                continue;
            }
        }
    }

    if let Some(pb) = &progress_bar {
        pb.finish_with_message("File processing complete");
    }

    if all_rows.is_empty() {
        warn!("No log rows were successfully read");
    }

    info!("Total rows read: {}", all_rows.len());

    // Run the analysis pipeline on the raw rows
    let report = run_analytics(&all_rows, &args)?;

    // Output results in requested format
    output_results(&report, &args, &log_files, all_rows.len())?;

    let elapsed = start_time.elapsed();
    if !args.quiet {
        println!("Analysis completed in {:.2}s", elapsed.as_secs_f64());
    }

    Ok(())
}

fn validate_arguments(args: &Arguments) -> Result<()> {
    // Check if log directory exists and is readable
    if let Some(log_dir) = &args.log_dir {
        if !log_dir.exists() {
            return Err(config_error(
                &format!("Log directory does not exist: {}", log_dir.display()),
                Some("log_dir"),
            )
            .into());
        }

        if !log_dir.is_dir() {
            return Err(config_error(
                &format!("Log directory path is not a directory: {}", log_dir.display()),
                Some("log_dir"),
            )
            .into());
        }

        fs::read_dir(log_dir).with_context(|| {
            format!("Cannot read log directory {}", log_dir.display())
        })?;
    }

    // Validate sample size
    if let Some(sample_size) = args.sample_size {
        if sample_size == 0 {
            return Err(config_error(
                "Sample size must be greater than 0",
                Some("sample_size"),
            )
            .into());
        }
    }

    // Validate page size
    if args.per_page == 0 {
        return Err(config_error(
            "Page size must be greater than 0",
            Some("per_page"),
        )
        .into());
    }

    Ok(())
}

fn discover_log_files(args: &Arguments) -> Result<Vec<PathBuf>> {
    let mut log_files = Vec::new();

    // If log_dir is specified, discover files in that directory
    if let Some(log_dir) = &args.log_dir {
        discover_files_in_directory(log_dir, &mut log_files)?;
    }

    // Add explicitly specified log files
    for file_pattern in &args.log_files {
        let path = Path::new(file_pattern);
        if path.exists() && path.is_file() {
            log_files.push(path.to_path_buf());
        } else {
            warn!("Log file not found: {}", file_pattern);
        }
    }

    // Remove duplicates and sort
    log_files.sort();
    log_files.dedup();

    // Warn about empty files
    log_files.retain(|path| match fs::metadata(path) {
        Ok(metadata) => {
            if metadata.len() == 0 {
                warn!("Skipping empty log file: {}", path.display());
                false
            } else {
                true
            }
        }
        Err(e) => {
            warn!("Cannot read metadata for {}: {}", path.display(), e);
            false
        }
    });

    Ok(log_files)
}

fn discover_files_in_directory(dir: &Path, log_files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(extension) = path.extension() {
                let ext_str = extension.to_string_lossy().to_lowercase();
                if ext_str == "csv" {
                    log_files.push(path);
                }
            }
        }
    }

    Ok(())
}

fn process_log_file(log_file: &Path, args: &Arguments) -> Result<Vec<LogRow>> {
    let mut rows = read_log_rows(log_file)
        .with_context(|| format!("Failed to read {}", log_file.display()))?;

    // Apply sample size limit if specified
    if let Some(sample_size) = args.sample_size {
        if rows.len() > sample_size {
            info!(
                "Limiting analysis to first {} rows of {}",
                sample_size,
                log_file.display()
            );
            rows.truncate(sample_size);
        }
    }

    Ok(rows)
}

fn run_analytics(rows: &[LogRow], args: &Arguments) -> Result<AnalysisReport> {
    info!("Running analytics on {} rows", rows.len());

    let extractor = EventExtractor::new();
    let events = extractor.extract(rows);
    info!(
        "Extracted events: {} started, {} signatures, {} completed",
        events.started.len(),
        events.signatures.len(),
        events.completed.len()
    );

    let reconstructor = ProcessReconstructor::new();
    let records = reconstructor.reconstruct(&events);
    info!("Reconstructed {} process records", records.len());

    let selected = selected_signature(args)?;
    let scoped: Vec<ProcessRecord> = match selected {
        Some(signature) => records
            .into_iter()
            .filter(|r| r.signature == Some(signature))
            .collect(),
        None => records,
    };

    let estimator = DensityEstimator::new();
    let plot = estimator.estimate(&scoped, selected);

    let query = ViewQuery {
        search: args.search.clone(),
        sort: args.sort,
        order: args.order,
        page: args.page as usize,
    };
    let page = ViewEngine::with_page_size(args.per_page).apply(&scoped, &query);

    Ok(AnalysisReport {
        plot,
        page,
        total_records: scoped.len(),
        selected_signature: selected,
    })
}

fn selected_signature(args: &Arguments) -> Result<Option<SignatureType>> {
    let Some(area_id) = args.area else {
        return Ok(None);
    };
    let table = CategoryTable::default();
    let entry = table
        .by_area_id(area_id as usize)
        .with_context(|| format!("No signature category for area id {}", area_id))?;
    Ok(Some(entry.signature))
}

fn output_results(
    report: &AnalysisReport,
    args: &Arguments,
    log_files: &[PathBuf],
    total_rows: usize,
) -> Result<()> {
    let output = match args.output_format {
        OutputFormat::Json => {
            let files = log_files
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>();
            let formatter = JsonFormatter::new().with_pretty(true).with_metadata(
                env!("CARGO_PKG_VERSION"),
                files,
                total_rows,
            );
            formatter.format(report)?
        }
        OutputFormat::Text => {
            let formatter = TextFormatter::new();
            formatter.format(report)?
        }
    };

    if let Some(outfile) = &args.outfile {
        if outfile == "-" {
            println!("{}", output);
        } else {
            fs::write(outfile, output)?;
            info!("Results written to {}", outfile);
        }
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}
