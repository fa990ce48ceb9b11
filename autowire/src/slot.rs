//! Write-once slots that receive dependency handles during wiring.

use crate::error::{Error, Result};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// A dependency handle filled in by [`Wiring::wire`](crate::Wiring::wire).
///
/// Components keep one `Wired<T>` field per dependency. The slot is empty until
/// the wiring pass reaches the component and can only be filled once.
pub struct Wired<T: ?Sized> {
  cell: OnceCell<Arc<T>>,
}

impl<T: ?Sized> Wired<T> {
  pub const fn new() -> Self {
    Self {
      cell: OnceCell::new(),
    }
  }

  /// Returns the wired handle, or `None` if wiring has not reached this slot.
  pub fn get(&self) -> Option<&Arc<T>> {
    self.cell.get()
  }

  /// Returns the wired handle, or [`Error::Unwired`].
  pub fn try_get(&self) -> Result<&Arc<T>> {
    self.cell.get().ok_or(Error::Unwired {
      type_name: std::any::type_name::<T>(),
    })
  }

  pub fn is_wired(&self) -> bool {
    self.cell.get().is_some()
  }

  /// Stores `handle` unless the slot already holds one. Returns whether it was stored.
  pub(crate) fn fill(&self, handle: Arc<T>) -> bool {
    self.cell.set(handle).is_ok()
  }
}

impl<T: ?Sized> Default for Wired<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: ?Sized> fmt::Debug for Wired<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Wired")
      .field("type", &std::any::type_name::<T>())
      .field("wired", &self.is_wired())
      .finish()
  }
}
