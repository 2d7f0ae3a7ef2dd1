//! Extract command implementation.

use super::open_registry;
use super::storage_root;
use crate::cli::ExtractArgs;
use crate::error::convert_package_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use apkjoy_core::ApkExtractor;
use apkjoy_core::ApkInfo;
use apkjoy_core::ExtractConfig;
use apkjoy_core::ExtractionRequest;
use apkjoy_core::ExtractionResult;
use apkjoy_core::NoopProgress;
use apkjoy_core::inspect_apk;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter, quiet: bool) -> Result<()> {
    match run(args, quiet) {
        Ok((result, info)) => formatter.format_extraction_result(&result, info.as_ref()),
        Err(err) => {
            formatter.format_failure("extract", &err);
            Err(convert_package_error(err, &args.package))
        }
    }
}

fn run(
    args: &ExtractArgs,
    quiet: bool,
) -> apkjoy_core::Result<(ExtractionResult, Option<ApkInfo>)> {
    let registry = open_registry(&args.registry)?;
    let root = storage_root(args.storage_root.as_deref())?;
    let config = ExtractConfig::default().with_buffer_size(args.buffer_size);
    let extractor = ApkExtractor::new(registry, root).with_config(config);

    let mut request = ExtractionRequest::new(&args.package);
    if let Some(destination) = &args.destination {
        request = request.with_destination(destination);
    }

    // Use progress bar if TTY is detected (not quiet, not JSON, is terminal)
    let result = if !quiet && CliProgress::should_show() {
        let mut progress = CliProgress::new("Extracting");
        extractor.extract_with_progress(&request, &mut progress)?
    } else {
        extractor.extract_with_progress(&request, &mut NoopProgress)?
    };

    let info = if args.verify {
        Some(inspect_apk(&result.destination)?)
    } else {
        None
    };

    Ok((result, info))
}
