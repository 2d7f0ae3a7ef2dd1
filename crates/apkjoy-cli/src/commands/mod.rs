//! Subcommand implementations.

pub mod completion;
pub mod extract;
pub mod list;
pub mod path;
pub mod verify;

use crate::cli::RegistryArgs;
use apkjoy_core::PackageRegistry;
use apkjoy_core::registry::StaticRegistry;
use apkjoy_core::registry::default_registry;
use std::env;
use std::path::Path;
use std::path::PathBuf;

/// Opens the registry named by `--registry-file`, or the platform registry.
pub fn open_registry(args: &RegistryArgs) -> apkjoy_core::Result<Box<dyn PackageRegistry>> {
    match &args.registry_file {
        Some(file) => {
            tracing::debug!(file = %file.display(), "loading package registry file");
            Ok(Box::new(StaticRegistry::from_json_file(file)?))
        }
        None => Ok(default_registry()),
    }
}

/// Storage root from `--storage-root`, falling back to the current directory.
pub fn storage_root(arg: Option<&Path>) -> std::io::Result<PathBuf> {
    arg.map_or_else(env::current_dir, |dir| Ok(dir.to_path_buf()))
}
