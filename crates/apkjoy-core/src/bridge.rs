//! Host request/response boundary.
//!
//! A host UI (Flutter, a JNI activity, an IPC shim) forwards one method call
//! at a time to [`MethodHandler::handle`] and receives exactly one response
//! through its [`MethodResult`] implementation. Transport is the host's
//! concern; this module only defines the call shape and the replies.
//!
//! # Examples
//!
//! ```
//! use apkjoy_core::ApkExtractor;
//! use apkjoy_core::bridge::{EXTRACT_APK, MethodCall, MethodHandler, Reply};
//! use apkjoy_core::registry::StaticRegistry;
//!
//! let handler = MethodHandler::new(ApkExtractor::new(StaticRegistry::new(), "/tmp"));
//! let call = MethodCall::new(EXTRACT_APK).with_argument("packageName", "com.missing");
//!
//! let mut reply = Reply::default();
//! handler.handle(&call, &mut reply);
//! assert_eq!(reply.error_code(), Some("NOT_FOUND"));
//! ```

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::ApkError;
use crate::ApkExtractor;
use crate::ErrorCode;
use crate::ExtractionRequest;
use crate::registry::PackageRegistry;

/// Channel name the host registers the handler under.
pub const CHANNEL: &str = "apkjoy";

/// Method that extracts an installed package.
pub const EXTRACT_APK: &str = "extractApk";

/// Argument carrying the package identifier.
pub const ARG_PACKAGE_NAME: &str = "packageName";

/// Argument carrying the optional destination path.
pub const ARG_DESTINATION: &str = "destination";

/// One incoming method call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodCall {
    /// Method name.
    pub method: String,
    /// Named arguments.
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl MethodCall {
    /// Creates a call without arguments.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Map::new(),
        }
    }

    /// Adds an argument.
    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Returns a string argument. Missing, `null` and non-string values all
    /// read as `None`.
    pub fn argument_str(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).and_then(Value::as_str)
    }
}

/// Receiver for the single response to a [`MethodCall`].
pub trait MethodResult {
    /// The call succeeded with `value`.
    fn success(&mut self, value: Value);

    /// The call failed.
    fn error(&mut self, code: &str, message: &str);

    /// The handler does not know the method.
    fn not_implemented(&mut self);
}

/// Captured response, for hosts that prefer a value over callbacks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reply {
    /// No response was delivered yet.
    #[default]
    Pending,
    /// Successful response.
    Success {
        /// Returned value.
        value: Value,
    },
    /// Error response.
    Error {
        /// Machine-readable code.
        code: String,
        /// Human-readable message.
        message: String,
    },
    /// Unknown method.
    NotImplemented,
}

impl Reply {
    /// Error code, if this is an error reply.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Error { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Success value, if this is a success reply.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Success { value } => Some(value),
            _ => None,
        }
    }
}

impl MethodResult for Reply {
    fn success(&mut self, value: Value) {
        *self = Self::Success { value };
    }

    fn error(&mut self, code: &str, message: &str) {
        *self = Self::Error {
            code: code.to_string(),
            message: message.to_string(),
        };
    }

    fn not_implemented(&mut self) {
        *self = Self::NotImplemented;
    }
}

/// Dispatches host method calls to an [`ApkExtractor`].
#[derive(Debug, Clone)]
pub struct MethodHandler<R> {
    extractor: ApkExtractor<R>,
}

impl<R: PackageRegistry> MethodHandler<R> {
    /// Wraps an extractor.
    pub fn new(extractor: ApkExtractor<R>) -> Self {
        Self { extractor }
    }

    /// Extractor calls are forwarded to.
    pub fn extractor(&self) -> &ApkExtractor<R> {
        &self.extractor
    }

    /// Handles one call and answers it exactly once through `result`.
    pub fn handle(&self, call: &MethodCall, result: &mut dyn MethodResult) {
        tracing::debug!(method = %call.method, "handling method call");

        match call.method.as_str() {
            EXTRACT_APK => self.extract_apk(call, result),
            _ => result.not_implemented(),
        }
    }

    fn extract_apk(&self, call: &MethodCall, result: &mut dyn MethodResult) {
        let Some(package) = call.argument_str(ARG_PACKAGE_NAME).filter(|p| !p.is_empty()) else {
            result.error(ErrorCode::Invalid.as_str(), "Missing packageName");
            return;
        };

        let mut request = ExtractionRequest::new(package);
        match call.arguments.get(ARG_DESTINATION) {
            None | Some(Value::Null) => {}
            Some(Value::String(destination)) => {
                request = request.with_destination(destination);
            }
            Some(_) => {
                result.error(ErrorCode::Invalid.as_str(), "destination must be a string");
                return;
            }
        }

        match self.extractor.extract(&request) {
            Ok(done) => result.success(Value::String(
                done.destination.to_string_lossy().into_owned(),
            )),
            Err(err) => reply_error(&err, result),
        }
    }
}

fn reply_error(err: &ApkError, result: &mut dyn MethodResult) {
    result.error(err.code().as_str(), &err.to_string());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::registry::StaticRegistry;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn handler(temp: &TempDir) -> MethodHandler<StaticRegistry> {
        let source = temp.path().join("base.apk");
        fs::write(&source, b"apk").unwrap();
        let registry = StaticRegistry::new().with_package("com.example.app", source);
        MethodHandler::new(ApkExtractor::new(registry, temp.path().join("files")))
    }

    #[test]
    fn test_extract_with_destination() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("out/app.apk");
        let call = MethodCall::new(EXTRACT_APK)
            .with_argument(ARG_PACKAGE_NAME, "com.example.app")
            .with_argument(ARG_DESTINATION, destination.to_string_lossy().into_owned());

        let mut reply = Reply::default();
        handler(&temp).handle(&call, &mut reply);

        assert_eq!(
            reply.value(),
            Some(&Value::String(destination.to_string_lossy().into_owned()))
        );
        assert_eq!(fs::read(&destination).unwrap(), b"apk");
    }

    #[test]
    fn test_extract_with_default_destination() {
        let temp = TempDir::new().unwrap();
        let call = MethodCall::new(EXTRACT_APK)
            .with_argument(ARG_PACKAGE_NAME, "com.example.app")
            .with_argument(ARG_DESTINATION, Value::Null);

        let mut reply = Reply::default();
        handler(&temp).handle(&call, &mut reply);

        let expected = temp.path().join("files/ExtractedAPKs/com.example.app.apk");
        assert_eq!(
            reply.value().and_then(Value::as_str),
            Some(expected.to_string_lossy().as_ref())
        );
    }

    #[test]
    fn test_missing_package_name_is_invalid() {
        let temp = TempDir::new().unwrap();
        for call in [
            MethodCall::new(EXTRACT_APK),
            MethodCall::new(EXTRACT_APK).with_argument(ARG_PACKAGE_NAME, Value::Null),
            MethodCall::new(EXTRACT_APK).with_argument(ARG_PACKAGE_NAME, ""),
            MethodCall::new(EXTRACT_APK).with_argument(ARG_PACKAGE_NAME, 42),
        ] {
            let mut reply = Reply::default();
            handler(&temp).handle(&call, &mut reply);
            assert_eq!(
                reply,
                Reply::Error {
                    code: "INVALID".to_string(),
                    message: "Missing packageName".to_string(),
                }
            );
        }
        assert!(!temp.path().join("files").exists());
    }

    #[test]
    fn test_non_string_destination_is_invalid() {
        let temp = TempDir::new().unwrap();
        for destination in [json!(42), json!(true), json!({"path": "x.apk"})] {
            let call = MethodCall::new(EXTRACT_APK)
                .with_argument(ARG_PACKAGE_NAME, "com.example.app")
                .with_argument(ARG_DESTINATION, destination);

            let mut reply = Reply::default();
            handler(&temp).handle(&call, &mut reply);
            assert_eq!(
                reply,
                Reply::Error {
                    code: "INVALID".to_string(),
                    message: "destination must be a string".to_string(),
                }
            );
        }
        assert!(!temp.path().join("files").exists());
    }

    #[test]
    fn test_unknown_package_is_not_found() {
        let temp = TempDir::new().unwrap();
        let call = MethodCall::new(EXTRACT_APK).with_argument(ARG_PACKAGE_NAME, "com.missing");

        let mut reply = Reply::default();
        handler(&temp).handle(&call, &mut reply);
        assert_eq!(reply.error_code(), Some("NOT_FOUND"));
    }

    #[test]
    fn test_io_failure_is_error() {
        let temp = TempDir::new().unwrap();
        let registry =
            StaticRegistry::new().with_package("com.example.app", temp.path().join("gone.apk"));
        let handler = MethodHandler::new(ApkExtractor::new(registry, temp.path()));
        let call = MethodCall::new(EXTRACT_APK).with_argument(ARG_PACKAGE_NAME, "com.example.app");

        let mut reply = Reply::default();
        handler.handle(&call, &mut reply);
        assert_eq!(reply.error_code(), Some("ERROR"));
    }

    #[test]
    fn test_unknown_method_is_not_implemented() {
        let temp = TempDir::new().unwrap();
        let mut reply = Reply::default();
        handler(&temp).handle(&MethodCall::new("listApps"), &mut reply);
        assert_eq!(reply, Reply::NotImplemented);
    }

    #[test]
    fn test_call_and_reply_json_shape() {
        let call: MethodCall = serde_json::from_value(json!({
            "method": "extractApk",
            "arguments": { "packageName": "com.example.app" }
        }))
        .unwrap();
        assert_eq!(call.argument_str(ARG_PACKAGE_NAME), Some("com.example.app"));

        let call: MethodCall = serde_json::from_value(json!({ "method": "extractApk" })).unwrap();
        assert!(call.arguments.is_empty());

        let reply = Reply::Error {
            code: "INVALID".into(),
            message: "Missing packageName".into(),
        };
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"status": "error", "code": "INVALID", "message": "Missing packageName"})
        );
    }
}
