//! Registry backed by the Android `pm` shell tool.

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use super::PackageRegistry;
use crate::ApkError;
use crate::Result;

/// Prefix `pm path` puts in front of every reported file.
const PACKAGE_PREFIX: &str = "package:";

/// File name of the base package in a split install.
const BASE_APK: &str = "base.apk";

/// Resolves packages by running `pm path <package>`.
///
/// Works from any process that can run the package manager shell tool on
/// the device (a terminal app, `adb shell`, a root daemon).
///
/// # Examples
///
/// ```no_run
/// use apkjoy_core::registry::{PackageRegistry, PmRegistry};
///
/// # fn main() -> apkjoy_core::Result<()> {
/// let registry = PmRegistry::new().with_user(0);
/// let source = registry.resolve_source_path("com.android.settings")?;
/// println!("{}", source.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PmRegistry {
    program: PathBuf,
    user: Option<u32>,
}

impl Default for PmRegistry {
    fn default() -> Self {
        Self {
            program: PathBuf::from("pm"),
            user: None,
        }
    }
}

impl PmRegistry {
    /// Creates a registry that runs `pm` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `program` instead of `pm`.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Restricts the lookup to one Android user profile (`--user <id>`).
    #[must_use]
    pub fn with_user(mut self, user: u32) -> Self {
        self.user = Some(user);
        self
    }

    /// Program this registry runs.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl PackageRegistry for PmRegistry {
    fn resolve_source_path(&self, package: &str) -> Result<PathBuf> {
        let mut command = Command::new(&self.program);
        command.arg("path");
        if let Some(user) = self.user {
            command.arg("--user").arg(user.to_string());
        }
        command.arg(package);

        tracing::debug!(program = %self.program.display(), package, "querying package manager");

        let output = command.output().map_err(|e| {
            ApkError::not_found(
                package,
                format!("failed to run {}: {e}", self.program.display()),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("{} exited with {}", self.program.display(), output.status),
                msg => msg.to_string(),
            };
            return Err(ApkError::not_found(package, reason));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_pm_path(&stdout).ok_or_else(|| ApkError::not_found(package, "not installed"))
    }
}

/// Picks the installed package file from `pm path` output.
///
/// Split installs list one line per file; the base package is preferred,
/// otherwise the first listed file is returned.
///
/// # Examples
///
/// ```
/// use apkjoy_core::registry::pm::parse_pm_path;
/// use std::path::PathBuf;
///
/// let out = "package:/data/app/~~x==/com.example-y==/base.apk\n";
/// assert_eq!(
///     parse_pm_path(out),
///     Some(PathBuf::from("/data/app/~~x==/com.example-y==/base.apk"))
/// );
/// ```
#[must_use]
pub fn parse_pm_path(output: &str) -> Option<PathBuf> {
    let paths: Vec<PathBuf> = output
        .lines()
        .filter_map(|line| line.trim().strip_prefix(PACKAGE_PREFIX))
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .collect();

    paths
        .iter()
        .find(|p| p.file_name().is_some_and(|name| name == BASE_APK))
        .or_else(|| paths.first())
        .cloned()
}
