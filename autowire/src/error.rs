use crate::key::ComponentKey;
use crate::lifecycle::Pass;

/// Boxed error returned by component hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors reported by the [`Registry`](crate::Registry).
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// No component is registered under the requested key.
  #[error("component '{key}' is not registered")]
  NotFound { key: ComponentKey },

  /// A lifecycle pass was started before the pass it depends on completed.
  #[error("{pass} requires {required} to have completed first")]
  Precondition { pass: Pass, required: Pass },

  /// The dependency graph has at least one cycle. No hook was invoked.
  #[error(
    "dependencies contain a cycle through [{keys}], initialize these components manually",
    keys = join_keys(.unresolved)
  )]
  CyclicDependency { unresolved: Vec<ComponentKey> },

  /// A dependency slot was read before it was wired.
  #[error("slot for '{type_name}' has not been wired")]
  Unwired { type_name: &'static str },

  /// A component hook returned an error.
  #[error("{pass} failed for component '{key}': {source}")]
  Callback {
    pass: Pass,
    key: ComponentKey,
    #[source]
    source: BoxError,
  },
}

fn join_keys(keys: &[ComponentKey]) -> String {
  keys
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join(", ")
}
