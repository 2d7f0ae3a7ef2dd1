//! Registry backed by the Android `PackageManager`, reached through JNI.
//!
//! Requires the hosting process to have initialised `ndk-context` (done by
//! `android-activity`, `ndk-glue` and friends). The lookup mirrors
//! `context.getPackageManager().getApplicationInfo(pkg, 0).sourceDir`.

#![cfg(target_os = "android")]

use std::io;
use std::path::PathBuf;

use jni::JNIEnv;
use jni::JavaVM;
use jni::objects::JObject;
use jni::objects::JString;
use jni::objects::JValue;

use super::PackageRegistry;
use crate::ApkError;
use crate::Result;

/// Runs `f` with an attached JNI environment and the hosting `Context`.
fn with_context<T>(
    f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> std::result::Result<T, String>,
) -> std::result::Result<T, String> {
    let ctx = ndk_context::android_context();

    // SAFETY: `ctx.vm()` is the `JavaVM*` registered by the NDK glue and
    // stays valid for the lifetime of the process.
    let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| format!("failed to obtain JavaVM: {e}"))?;

    let context_ptr = ctx.context();
    if context_ptr.is_null() {
        return Err("Android context is null".to_string());
    }
    // SAFETY: the NDK glue guarantees this is a global reference to the
    // hosting Context.
    let context = unsafe { JObject::from_raw(context_ptr.cast()) };

    let mut env = vm
        .attach_current_thread()
        .map_err(|e| format!("failed to attach JNI thread: {e}"))?;

    let result = f(&mut env, &context);
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_clear();
    }
    result
}

/// Reads a `java.lang.String` object into a Rust string.
fn java_string(env: &mut JNIEnv<'_>, obj: JObject<'_>) -> std::result::Result<String, String> {
    if obj.is_null() {
        return Err("unexpected null string".to_string());
    }
    let jstr = JString::from(obj);
    env.get_string(&jstr)
        .map(Into::into)
        .map_err(|e| format!("failed to read Java string: {e}"))
}

/// Looks packages up through the system `PackageManager`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidRegistry;

impl AndroidRegistry {
    /// Creates the registry. No JNI call happens until the first lookup.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns `Context.getFilesDir()`, the application-private storage root.
    pub fn files_dir(&self) -> Result<PathBuf> {
        with_context(|env, context| {
            let dir = env
                .call_method(context, "getFilesDir", "()Ljava/io/File;", &[])
                .and_then(|v| v.l())
                .map_err(|e| format!("getFilesDir: {e}"))?;
            let path = env
                .call_method(&dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
                .and_then(|v| v.l())
                .map_err(|e| format!("getAbsolutePath: {e}"))?;
            java_string(env, path).map(PathBuf::from)
        })
        .map_err(|msg| ApkError::Io(io::Error::other(msg)))
    }
}

impl PackageRegistry for AndroidRegistry {
    fn resolve_source_path(&self, package: &str) -> Result<PathBuf> {
        tracing::debug!(package, "querying PackageManager");

        with_context(|env, context| {
            let package_manager = env
                .call_method(
                    context,
                    "getPackageManager",
                    "()Landroid/content/pm/PackageManager;",
                    &[],
                )
                .and_then(|v| v.l())
                .map_err(|e| format!("getPackageManager: {e}"))?;

            let j_package = env
                .new_string(package)
                .map_err(|e| format!("new_string(package): {e}"))?;

            // Throws NameNotFoundException for packages that are not installed.
            let app_info = env
                .call_method(
                    &package_manager,
                    "getApplicationInfo",
                    "(Ljava/lang/String;I)Landroid/content/pm/ApplicationInfo;",
                    &[JValue::Object(&j_package), JValue::Int(0)],
                )
                .and_then(|v| v.l())
                .map_err(|e| format!("getApplicationInfo: {e}"))?;

            let source_dir = env
                .get_field(&app_info, "sourceDir", "Ljava/lang/String;")
                .and_then(|v| v.l())
                .map_err(|e| format!("ApplicationInfo.sourceDir: {e}"))?;

            java_string(env, source_dir).map(PathBuf::from)
        })
        .map_err(|reason| ApkError::not_found(package, reason))
    }
}
