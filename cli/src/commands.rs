//! Subcommand implementations.

use crate::SearchArgs;
use anyhow::{bail, Context, Result};
use assetq_core::{AppConfig, Provider, ResultRow};
use assetq_export::{render_table, CsvSink};
use assetq_pipeline::{
    unique_values, BatchRunner, ConsoleProgress, DedupKey, FailureMode, PaginationDriver,
};
use assetq_provider::{build_provider, QueryOptions, ReqwestTransport, RetryPolicy};
use assetq_query::QueryTranslator;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Run a provider command: one query with `-s`, or a query file with `-f`.
pub async fn search(
    provider: Provider,
    args: &SearchArgs,
    fofa_cursor: bool,
    config: &AppConfig,
) -> Result<()> {
    let key = config.api_key(provider)?;
    let codec = build_provider(provider, key, fofa_cursor);
    let transport = ReqwestTransport::new(&config.http)?;
    let retry = RetryPolicy::from_pacing(&config.pacing, provider);
    let options = QueryOptions {
        cap: args.limit,
        months: args.months,
        paginate: !args.single_page,
    };
    let sink_retry_delay = Duration::from_millis(config.pacing.sink_retry_delay_ms);

    if let Some(raw) = &args.search {
        let query = QueryTranslator::for_provider(provider).translate(raw);
        info!("Query: {}", query);

        let mut sink = match &args.output {
            Some(path) => Some(
                CsvSink::create(path, provider.csv_columns())
                    .with_context(|| format!("cannot create {}", path.display()))?,
            ),
            None => None,
        };
        let mut progress = ConsoleProgress::stderr();

        let mut driver = PaginationDriver::new(codec.as_ref(), &transport)
            .with_retry(retry)
            .with_failure_mode(FailureMode::Abort)
            .with_progress(&mut progress)
            .with_sink_retry_delay(sink_retry_delay);
        if let Some(sink) = sink.as_mut() {
            driver = driver.with_sink(sink);
        }

        let result = driver
            .run(&query, &options)
            .await
            .with_context(|| format!("{provider} query failed"))?;

        print_rows(provider, args, &result.rows);
        info!("{} unique rows ({} fetched)", result.rows.len(), result.fetched);
        if let Some(path) = &args.output {
            info!("Results written to {}", path.display());
        }
        return Ok(());
    }

    let Some(file) = &args.file else {
        bail!("either -s QUERY or -f FILE is required (see --help)");
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(provider.default_output()));
    let mut sink = CsvSink::lazy(&output, provider.csv_columns());
    let mut progress = ConsoleProgress::new(true);

    let summary = BatchRunner::new(codec.as_ref(), &transport)
        .with_retry(retry)
        .with_options(options)
        .with_delays(
            Duration::from_millis(config.pacing.query_delay_ms),
            Duration::from_millis(config.pacing.failure_delay_ms),
        )
        .with_sink_retry_delay(sink_retry_delay)
        .run_file(file, &mut sink, &mut progress)
        .await
        .with_context(|| format!("cannot read queries from {}", file.display()))?;

    info!(
        "{} of {} queries succeeded, {} rows written to {}",
        summary.succeeded,
        summary.total,
        summary.rows,
        output.display()
    );
    if summary.failed > 0 {
        warn!("{} queries failed, see the log above", summary.failed);
    }
    Ok(())
}

fn print_rows(provider: Provider, args: &SearchArgs, rows: &[ResultRow]) {
    let key = if args.url {
        Some(DedupKey::Link)
    } else if args.ip {
        Some(DedupKey::Ip)
    } else {
        None
    };

    match key {
        Some(key) => {
            for value in unique_values(rows, key) {
                println!("{value}");
            }
        }
        None => print!("{}", render_table(provider.display_columns(), rows)),
    }
}

/// Print the configuration file, writing a template first if it is missing.
pub fn show_config(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => {
            if AppConfig::ensure_default_at(path)? {
                info!("Wrote configuration template to {}", path.display());
            }
            path.to_path_buf()
        }
        None => AppConfig::ensure_default()?,
    };

    let contents =
        fs::read_to_string(&path).with_context(|| format!("cannot read {}", path.display()))?;
    println!("# {}", path.display());
    print!("{contents}");

    let config = AppConfig::load_from(&path)?;
    for provider in Provider::ALL {
        if config.api_key(provider).is_err() {
            warn!("No API key set for {}", provider);
        }
    }
    Ok(())
}
