//! Component and runtime error taxonomy.
//!
//! Two enums cover every failure the runtime routes through its error
//! gate:
//!
//! - [`ModuleError`] - failures raised *by* module and behavior code
//!   inside lifecycle hooks and handlers.
//! - [`RuntimeError`] - failures raised *by the runtime* while
//!   registering, starting, stopping, or messaging components.
//!
//! All variants implement [`ErrorCode`] with stable prefixed codes and
//! derive serde so they can travel as `"error"` event payloads.
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`ModuleError::InitFailed`] | `MODULE_INIT_FAILED` | Yes |
//! | [`ModuleError::ExecutionFailed`] | `MODULE_EXECUTION_FAILED` | Yes |
//! | [`ModuleError::InvalidPayload`] | `MODULE_INVALID_PAYLOAD` | No |
//! | [`RuntimeError::DuplicateRegistration`] | `RUNTIME_DUPLICATE_REGISTRATION` | No |
//! | [`RuntimeError::UnknownType`] | `RUNTIME_UNKNOWN_TYPE` | No |
//! | [`RuntimeError::UnknownBehavior`] | `RUNTIME_UNKNOWN_BEHAVIOR` | No |
//! | [`RuntimeError::DuplicateBehavior`] | `RUNTIME_DUPLICATE_BEHAVIOR` | No |
//! | [`RuntimeError::ServiceNotFound`] | `RUNTIME_SERVICE_NOT_FOUND` | No |
//! | [`RuntimeError::CircularDependency`] | `RUNTIME_CIRCULAR_DEPENDENCY` | No |
//! | [`RuntimeError::Lifecycle`] | `RUNTIME_LIFECYCLE` | No |
//! | [`RuntimeError::MalformedConfig`] | `RUNTIME_MALFORMED_CONFIG` | No |
//! | [`RuntimeError::ComponentFailure`] | `RUNTIME_COMPONENT_FAILURE` | Yes |

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trellis_types::ErrorCode;

/// Failure raised by module or behavior code.
///
/// Hooks and handlers return this; the runtime's isolation boundary
/// converts it into a [`RuntimeError::ComponentFailure`] annotated with
/// the failing object and method.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum ModuleError {
    /// Initialization failed; the component may be partially set up.
    #[error("initialization failed: {0}")]
    InitFailed(String),

    /// A handler failed while processing an event or message.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// Event or message data did not match the expected shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl ErrorCode for ModuleError {
    fn code(&self) -> &'static str {
        match self {
            Self::InitFailed(_) => "MODULE_INIT_FAILED",
            Self::ExecutionFailed(_) => "MODULE_EXECUTION_FAILED",
            Self::InvalidPayload(_) => "MODULE_INVALID_PAYLOAD",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::InitFailed(_) => true,
            Self::ExecutionFailed(_) => true,
            Self::InvalidPayload(_) => false,
        }
    }
}

/// Which registry a duplicate registration collided in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    /// Module type registry.
    Module,
    /// Service registry.
    Service,
    /// Behavior registry.
    Behavior,
}

impl std::fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Module => "module",
            Self::Service => "service",
            Self::Behavior => "behavior",
        };
        f.write_str(name)
    }
}

/// Failure raised by the runtime itself.
///
/// Every variant flows through the single error gate: with a custom
/// handler installed the handler consumes it; in debug mode it is
/// returned to the caller; in production it becomes an `"error"` event
/// and the operation yields its null result.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum RuntimeError {
    /// A module type, service, or behavior name was registered twice.
    ///
    /// The first registration stays intact; re-registration is an
    /// error, never an overwrite.
    #[error("{kind} \"{name}\" has already been registered")]
    DuplicateRegistration {
        /// Registry the collision happened in.
        kind: RegistryKind,
        /// The colliding name.
        name: String,
    },

    /// An element declared a module type that was never registered.
    #[error("module type \"{0}\" is not defined")]
    UnknownType(String),

    /// A module declared a behavior that was never registered.
    #[error("behavior \"{0}\" not found")]
    UnknownBehavior(String),

    /// A module declared the same behavior twice.
    #[error("behavior \"{0}\" cannot be declared twice for one module")]
    DuplicateBehavior(String),

    /// A service lookup used a name that was never registered.
    #[error("service \"{0}\" not found")]
    ServiceNotFound(String),

    /// Service construction re-entered a service already being built.
    ///
    /// The path lists the full chain, e.g. `a -> b -> a`, so the cycle
    /// is diagnosable without a stack overflow ever occurring.
    #[error("circular service dependency: {}", .path.join(" -> "))]
    CircularDependency {
        /// Construction chain ending in the repeated name.
        path: Vec<String>,
    },

    /// An operation was called in a lifecycle state that forbids it
    /// (e.g. global-config mutation after initialization).
    #[error("{0}")]
    Lifecycle(String),

    /// An element's embedded config exists but is not valid JSON.
    #[error("module with id \"{element}\" has a malformed config")]
    MalformedConfig {
        /// Id of the element whose config failed to parse.
        element: String,
    },

    /// A failure captured at the component isolation boundary.
    ///
    /// The message is prefixed with the failing object and method so
    /// `"error"` event observers can attribute it.
    #[error("{object}.{method}() - {message}")]
    ComponentFailure {
        /// Name of the module or behavior that failed.
        object: String,
        /// Method that raised the failure.
        method: String,
        /// Underlying failure text.
        message: String,
    },
}

impl ErrorCode for RuntimeError {
    fn code(&self) -> &'static str {
        match self {
            Self::DuplicateRegistration { .. } => "RUNTIME_DUPLICATE_REGISTRATION",
            Self::UnknownType(_) => "RUNTIME_UNKNOWN_TYPE",
            Self::UnknownBehavior(_) => "RUNTIME_UNKNOWN_BEHAVIOR",
            Self::DuplicateBehavior(_) => "RUNTIME_DUPLICATE_BEHAVIOR",
            Self::ServiceNotFound(_) => "RUNTIME_SERVICE_NOT_FOUND",
            Self::CircularDependency { .. } => "RUNTIME_CIRCULAR_DEPENDENCY",
            Self::Lifecycle(_) => "RUNTIME_LIFECYCLE",
            Self::MalformedConfig { .. } => "RUNTIME_MALFORMED_CONFIG",
            Self::ComponentFailure { .. } => "RUNTIME_COMPONENT_FAILURE",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::ComponentFailure { .. })
    }
}

impl From<RuntimeError> for ModuleError {
    /// Lets component code forward runtime failures out of its own
    /// hooks with `?`.
    fn from(err: RuntimeError) -> Self {
        Self::ExecutionFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_types::assert_error_codes;

    fn module_variants() -> Vec<ModuleError> {
        vec![
            ModuleError::InitFailed("x".into()),
            ModuleError::ExecutionFailed("x".into()),
            ModuleError::InvalidPayload("x".into()),
        ]
    }

    fn runtime_variants() -> Vec<RuntimeError> {
        vec![
            RuntimeError::DuplicateRegistration {
                kind: RegistryKind::Module,
                name: "x".into(),
            },
            RuntimeError::UnknownType("x".into()),
            RuntimeError::UnknownBehavior("x".into()),
            RuntimeError::DuplicateBehavior("x".into()),
            RuntimeError::ServiceNotFound("x".into()),
            RuntimeError::CircularDependency {
                path: vec!["a".into(), "b".into(), "a".into()],
            },
            RuntimeError::Lifecycle("x".into()),
            RuntimeError::MalformedConfig {
                element: "mod-x-1".into(),
            },
            RuntimeError::ComponentFailure {
                object: "files".into(),
                method: "on_click".into(),
                message: "boom".into(),
            },
        ]
    }

    #[test]
    fn all_module_error_codes_valid() {
        assert_error_codes(&module_variants(), "MODULE_");
    }

    #[test]
    fn all_runtime_error_codes_valid() {
        assert_error_codes(&runtime_variants(), "RUNTIME_");
    }

    #[test]
    fn circular_dependency_lists_full_path() {
        let err = RuntimeError::CircularDependency {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(
            err.to_string(),
            "circular service dependency: a -> b -> a"
        );
    }

    #[test]
    fn component_failure_prefixes_object_and_method() {
        let err = RuntimeError::ComponentFailure {
            object: "files".into(),
            method: "on_click".into(),
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "files.on_click() - boom");
        assert!(err.is_recoverable());
    }

    #[test]
    fn duplicate_registration_names_registry() {
        let err = RuntimeError::DuplicateRegistration {
            kind: RegistryKind::Service,
            name: "heading".into(),
        };
        assert_eq!(
            err.to_string(),
            "service \"heading\" has already been registered"
        );
        assert!(!err.is_recoverable());
    }

    #[test]
    fn runtime_error_serializes_for_event_payloads() {
        let err = RuntimeError::UnknownType("navbar".into());
        let value = serde_json::to_value(&err).expect("serialize");
        let back: RuntimeError = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back.code(), "RUNTIME_UNKNOWN_TYPE");
    }

    #[test]
    fn module_error_converts_for_question_mark() {
        let err: ModuleError = RuntimeError::ServiceNotFound("heading".into()).into();
        assert!(matches!(err, ModuleError::ExecutionFailed(_)));
        assert!(err.to_string().contains("heading"));
    }
}
