//! Progress bar implementation for CLI operations.

use apkjoy_core::ProgressCallback;
use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use std::fmt::Write;
use std::path::Path;
use std::time::Duration;

/// Byte progress for a single package copy.
///
/// The bar starts without a length and picks up the source size from
/// [`ProgressCallback::on_start`]. Dropping it clears the line.
pub struct CliProgress {
    bar: ProgressBar,
    bytes_copied: u64,
}

impl CliProgress {
    /// Bar labelled with `message`, e.g. "Extracting".
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(copy_style());
        bar.set_message(message.to_string());

        Self {
            bar,
            bytes_copied: 0,
        }
    }

    /// Only draw when stdout is a terminal.
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }
}

/// `Extracting [███▓░░] 15.2 MB/40.0 MB (5.1 MB/s, 5s)`
fn copy_style() -> ProgressStyle {
    let base = ProgressStyle::default_bar();
    let Ok(style) = base
        .clone()
        .template("{msg} [{bar:40.cyan/blue}] {copied}/{size} ({rate}, {remaining})")
    else {
        return base;
    };

    style
        .with_key("copied", |state: &ProgressState, w: &mut dyn Write| {
            let _ = w.write_str(&humanize_bytes(state.pos()));
        })
        .with_key("size", |state: &ProgressState, w: &mut dyn Write| {
            let _ = w.write_str(&humanize_bytes(state.len().unwrap_or(0)));
        })
        .with_key("rate", |state: &ProgressState, w: &mut dyn Write| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let rate = state.per_sec() as u64;
            let _ = write!(w, "{}/s", humanize_bytes(rate));
        })
        .with_key("remaining", |state: &ProgressState, w: &mut dyn Write| {
            let _ = w.write_str(&humanize_duration(state.eta()));
        })
        .progress_chars("█▓░")
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_start(&mut self, _source: &Path, total_bytes: Option<u64>) {
        if let Some(total) = total_bytes {
            self.bar.set_length(total);
        }
    }

    fn on_bytes_copied(&mut self, bytes: u64) {
        self.bytes_copied += bytes;
        self.bar.set_position(self.bytes_copied);
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// `512 B`, `1.5 KB`, `40.0 MB` and so on, in powers of 1024.
pub fn humanize_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Coarse remaining-time text: `42s`, `3m7s`, `1h5m`.
pub fn humanize_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match (secs / 3600, secs % 3600 / 60, secs % 60) {
        (0, 0, s) => format!("{s}s"),
        (0, m, s) => format!("{m}m{s}s"),
        (h, m, _) => format!("{h}h{m}m"),
    }
}
