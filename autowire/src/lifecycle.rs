//! Lifecycle pass identifiers and their one-shot guards.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// The lifecycle passes driven by a [`Registry`](crate::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
  /// Components resolve handles to their dependencies.
  AutoWire,
  /// Components run setup logic, providers before consumers.
  Init,
  /// Components run shutdown logic, consumers before providers.
  DeInit,
}

impl fmt::Display for Pass {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Pass::AutoWire => f.write_str("auto_wire_all"),
      Pass::Init => f.write_str("init_all"),
      Pass::DeInit => f.write_str("de_init_all"),
    }
  }
}

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const DONE: u8 = 2;
const FAILED: u8 = 3;

/// Makes sure a pass runs at most once.
///
/// The state only leaves `IDLE` through a compare-and-set, so when several
/// callers race on the same pass exactly one of them gets to run it.
pub(crate) struct PassGuard {
  state: AtomicU8,
}

impl PassGuard {
  pub(crate) const fn new() -> Self {
    Self {
      state: AtomicU8::new(IDLE),
    }
  }

  /// Claims the pass. Returns `false` if it was already claimed.
  pub(crate) fn begin(&self) -> bool {
    self
      .state
      .compare_exchange(IDLE, RUNNING, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
  }

  pub(crate) fn finish(&self) {
    self.state.store(DONE, Ordering::Release);
  }

  /// Marks a claimed pass as failed after some hooks ran. It stays claimed.
  pub(crate) fn fail(&self) {
    self.state.store(FAILED, Ordering::Release);
  }

  /// Hands a claimed pass back when it aborted before doing any work.
  pub(crate) fn release(&self) {
    self.state.store(IDLE, Ordering::Release);
  }

  pub(crate) fn is_done(&self) -> bool {
    self.state.load(Ordering::Acquire) == DONE
  }
}
