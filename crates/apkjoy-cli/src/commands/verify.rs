//! Verify command implementation

use crate::cli::VerifyArgs;
use crate::error::convert_inspect_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use apkjoy_core::inspect_apk;

pub fn execute(args: &VerifyArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    match inspect_apk(&args.apk) {
        Ok(info) => formatter.format_apk_info(&info),
        Err(err) => {
            formatter.format_failure("verify", &err);
            Err(convert_inspect_error(err, &args.apk))
        }
    }
}
