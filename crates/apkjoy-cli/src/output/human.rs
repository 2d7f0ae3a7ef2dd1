//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::commands::list::ExtractedApk;
use crate::progress::humanize_bytes;
use anyhow::Result;
use apkjoy_core::ApkError;
use apkjoy_core::ApkInfo;
use apkjoy_core::ExtractionResult;
use console::Term;
use console::style;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn write_line(&self, line: &str) {
        let _ = self.term.write_line(line);
    }

    fn headline(&self, message: &str) {
        if self.use_colors {
            self.write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            self.write_line(message);
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn write_apk_details(&self, info: &ApkInfo) {
        self.write_line(&format!(
            "  Entries:     {}",
            Self::format_number(info.entries)
        ));
        self.write_line(&format!("  DEX files:   {}", info.dex_files));
        let abis = if info.native_abis.is_empty() {
            "none".to_string()
        } else {
            info.native_abis.join(", ")
        };
        self.write_line(&format!("  Native ABIs: {abis}"));

        if self.verbose {
            self.write_line(&format!(
                "  Uncompressed size: {}",
                humanize_bytes(info.uncompressed_size)
            ));
            self.write_line(&format!(
                "  Compressed size:   {}",
                humanize_bytes(info.compressed_size)
            ));
            self.write_line(&format!(
                "  v1 signature:      {}",
                if info.has_v1_signature { "yes" } else { "no" }
            ));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_extraction_result(
        &self,
        result: &ExtractionResult,
        info: Option<&ApkInfo>,
    ) -> Result<()> {
        // Quiet mode still prints the destination so scripts can capture it
        if self.quiet {
            self.write_line(&result.destination.display().to_string());
            return Ok(());
        }

        let report = &result.report;
        self.headline(&format!("Extracted {}", report.package));
        self.write_line(&format!(
            "  Destination: {}",
            result.destination.display()
        ));
        self.write_line(&format!(
            "  Size:        {}",
            humanize_bytes(report.bytes_copied)
        ));

        if self.verbose {
            self.write_line(&format!("  Source:      {}", report.source.display()));
            self.write_line(&format!(
                "  Created directories: {}",
                if report.created_parent_dirs { "yes" } else { "no" }
            ));
            self.write_line(&format!("  Duration:    {:?}", report.duration));
        }

        if let Some(info) = info {
            self.write_apk_details(info);
        }

        Ok(())
    }

    fn format_source_path(&self, _package: &str, source: &Path) -> Result<()> {
        self.write_line(&source.display().to_string());
        Ok(())
    }

    fn format_apk_info(&self, info: &ApkInfo) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            self.write_line(&format!(
                "APK verification: {}",
                style("PASSED").green().bold()
            ));
        } else {
            self.write_line("APK verification: PASSED");
        }
        self.write_line(&format!("  File: {}", info.path.display()));
        self.write_apk_details(info);

        Ok(())
    }

    fn format_extracted_list(
        &self,
        dir: &Path,
        apks: &[ExtractedApk],
        human_readable: bool,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if apks.is_empty() {
            self.write_line(&format!("No extracted packages in {}", dir.display()));
            return Ok(());
        }

        let mut total: u64 = 0;
        for apk in apks {
            let size = if human_readable {
                humanize_bytes(apk.size)
            } else {
                apk.size.to_string()
            };
            self.write_line(&format!("{size:>10}  {}", apk.package));
            total = total.saturating_add(apk.size);
        }

        self.write_line("");
        self.write_line(&format!(
            "Total: {} packages, {}",
            Self::format_number(apks.len()),
            humanize_bytes(total)
        ));

        Ok(())
    }

    fn format_failure(&self, _operation: &str, _error: &ApkError) {
        // Reported on stderr by main
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_small() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(42), "42");
        assert_eq!(HumanFormatter::format_number(999), "999");
    }

    #[test]
    fn test_format_number_thousands() {
        assert_eq!(HumanFormatter::format_number(1000), "1,000");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
    }
}
