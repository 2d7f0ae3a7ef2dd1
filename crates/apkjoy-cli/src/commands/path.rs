//! Path command implementation.

use super::open_registry;
use crate::cli::PathArgs;
use crate::error::convert_package_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use apkjoy_core::registry::validate_package_name;
use std::path::PathBuf;

pub fn execute(args: &PathArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    match resolve(args) {
        Ok(source) => formatter.format_source_path(&args.package, &source),
        Err(err) => {
            formatter.format_failure("path", &err);
            Err(convert_package_error(err, &args.package))
        }
    }
}

fn resolve(args: &PathArgs) -> apkjoy_core::Result<PathBuf> {
    validate_package_name(&args.package)?;
    open_registry(&args.registry)?.resolve_source_path(&args.package)
}
