//! Structural checks on extracted package files.
//!
//! An APK is a ZIP archive with `AndroidManifest.xml` at its root. This
//! module reads the central directory only; entry contents are never
//! decompressed.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;

use crate::ApkError;
use crate::Result;

const MANIFEST: &str = "AndroidManifest.xml";
const NATIVE_LIB_PREFIX: &str = "lib/";
const SIGNATURE_DIR: &str = "META-INF/";
const SIGNATURE_EXTENSIONS: [&str; 3] = [".RSA", ".DSA", ".EC"];

/// Summary of an APK's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApkInfo {
    /// Inspected file.
    pub path: PathBuf,
    /// Number of entries in the archive.
    pub entries: usize,
    /// Sum of the uncompressed entry sizes.
    pub uncompressed_size: u64,
    /// Sum of the compressed entry sizes.
    pub compressed_size: u64,
    /// Number of `classes*.dex` files at the archive root.
    pub dex_files: usize,
    /// ABIs with native libraries under `lib/<abi>/`, sorted.
    pub native_abis: Vec<String>,
    /// Whether a JAR (v1) signature block is present under `META-INF/`.
    pub has_v1_signature: bool,
}

/// Inspects the APK at `path`.
///
/// # Errors
///
/// Returns [`ApkError::Io`] if the file cannot be opened and
/// [`ApkError::InvalidApk`] if it is not a ZIP archive or has no
/// `AndroidManifest.xml`.
///
/// # Examples
///
/// ```no_run
/// use apkjoy_core::inspect_apk;
///
/// # fn main() -> apkjoy_core::Result<()> {
/// let info = inspect_apk("ExtractedAPKs/com.example.app.apk")?;
/// println!("{} entries, {} dex files", info.entries, info.dex_files);
/// # Ok(())
/// # }
/// ```
pub fn inspect_apk<P: AsRef<Path>>(path: P) -> Result<ApkInfo> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| ApkError::InvalidApk(format!("not a ZIP archive: {e}")))?;

    let mut info = ApkInfo {
        path: path.to_path_buf(),
        entries: archive.len(),
        uncompressed_size: 0,
        compressed_size: 0,
        dex_files: 0,
        native_abis: Vec::new(),
        has_v1_signature: false,
    };
    let mut has_manifest = false;
    let mut abis = BTreeSet::new();

    for i in 0..archive.len() {
        let entry = archive
            .by_index_raw(i)
            .map_err(|e| ApkError::InvalidApk(format!("failed to read entry {i}: {e}")))?;

        info.uncompressed_size = info.uncompressed_size.saturating_add(entry.size());
        info.compressed_size = info.compressed_size.saturating_add(entry.compressed_size());

        let name = entry.name();
        if name == MANIFEST {
            has_manifest = true;
        } else if is_root_dex(name) {
            info.dex_files += 1;
        } else if let Some(abi) = native_abi(name) {
            abis.insert(abi.to_string());
        } else if is_v1_signature(name) {
            info.has_v1_signature = true;
        }
    }

    if !has_manifest {
        return Err(ApkError::InvalidApk(format!(
            "{} has no {MANIFEST}",
            path.display()
        )));
    }

    info.native_abis = abis.into_iter().collect();
    tracing::debug!(
        path = %path.display(),
        entries = info.entries,
        dex_files = info.dex_files,
        "inspected package"
    );
    Ok(info)
}

fn is_root_dex(name: &str) -> bool {
    !name.contains('/') && name.starts_with("classes") && name.ends_with(".dex")
}

fn native_abi(name: &str) -> Option<&str> {
    let rest = name.strip_prefix(NATIVE_LIB_PREFIX)?;
    let (abi, file) = rest.split_once('/')?;
    (!abi.is_empty() && !file.is_empty()).then_some(abi)
}

fn is_v1_signature(name: &str) -> bool {
    name.strip_prefix(SIGNATURE_DIR).is_some_and(|file| {
        !file.contains('/')
            && SIGNATURE_EXTENSIONS
                .iter()
                .any(|ext| file.to_ascii_uppercase().ends_with(ext))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::ApkTestBuilder;
    use crate::test_utils::minimal_apk;
    use tempfile::TempDir;

    #[test]
    fn test_inspect_minimal_apk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.apk");
        std::fs::write(&path, minimal_apk()).unwrap();

        let info = inspect_apk(&path).unwrap();
        assert_eq!(info.entries, 2);
        assert_eq!(info.dex_files, 1);
        assert_eq!(info.uncompressed_size, 18);
        assert!(info.native_abis.is_empty());
        assert!(!info.has_v1_signature);
    }

    #[test]
    fn test_inspect_full_apk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.apk");
        let apk = ApkTestBuilder::new()
            .add_file("AndroidManifest.xml", b"m")
            .add_file("classes.dex", b"d")
            .add_file("classes2.dex", b"d")
            .add_file("assets/classes.dex", b"not counted")
            .add_file("lib/arm64-v8a/libfoo.so", b"so")
            .add_file("lib/armeabi-v7a/libfoo.so", b"so")
            .add_file("lib/arm64-v8a/libbar.so", b"so")
            .add_file("META-INF/CERT.RSA", b"sig")
            .add_file("META-INF/MANIFEST.MF", b"mf")
            .build();
        std::fs::write(&path, apk).unwrap();

        let info = inspect_apk(&path).unwrap();
        assert_eq!(info.entries, 9);
        assert_eq!(info.dex_files, 2);
        assert_eq!(info.native_abis, vec!["arm64-v8a", "armeabi-v7a"]);
        assert!(info.has_v1_signature);
    }

    #[test]
    fn test_inspect_rejects_non_zip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.apk");
        std::fs::write(&path, b"definitely not a zip").unwrap();

        let err = inspect_apk(&path).unwrap_err();
        assert!(matches!(err, ApkError::InvalidApk(_)));
    }

    #[test]
    fn test_inspect_rejects_missing_manifest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.apk");
        let apk = ApkTestBuilder::new().add_file("classes.dex", b"dex").build();
        std::fs::write(&path, apk).unwrap();

        let err = inspect_apk(&path).unwrap_err();
        assert!(err.to_string().contains("AndroidManifest.xml"));
    }

    #[test]
    fn test_inspect_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = inspect_apk(temp.path().join("nope.apk")).unwrap_err();
        assert!(matches!(err, ApkError::Io(_)));
    }

    #[test]
    fn test_name_classifiers() {
        assert!(is_root_dex("classes.dex"));
        assert!(is_root_dex("classes12.dex"));
        assert!(!is_root_dex("assets/classes.dex"));
        assert_eq!(native_abi("lib/x86_64/libz.so"), Some("x86_64"));
        assert_eq!(native_abi("lib/x86_64/"), None);
        assert_eq!(native_abi("libs/x86/libz.so"), None);
        assert!(is_v1_signature("META-INF/CERT.rsa"));
        assert!(!is_v1_signature("META-INF/MANIFEST.MF"));
        assert!(!is_v1_signature("META-INF/sub/CERT.RSA"));
    }
}
