//! The context handed to [`AutoWire::auto_wire`](crate::AutoWire::auto_wire).

use crate::error::{Error, Result};
use crate::key::ComponentKey;
use crate::registry::Registry;
use crate::slot::Wired;
use std::any::Any;
use std::sync::Arc;

/// Resolves dependencies on behalf of one consumer.
///
/// Inside `auto_wire_all` the context knows which component it wires, and
/// every successful lookup is recorded as a dependency of that component.
/// A context obtained from [`Registry::wiring`] has no consumer and records
/// nothing.
pub struct Wiring<'a> {
  registry: &'a Registry,
  consumer: Option<ComponentKey>,
  providers: Vec<ComponentKey>,
}

impl<'a> Wiring<'a> {
  pub(crate) fn detached(registry: &'a Registry) -> Self {
    Self {
      registry,
      consumer: None,
      providers: Vec::new(),
    }
  }

  pub(crate) fn for_consumer(registry: &'a Registry, consumer: ComponentKey) -> Self {
    Self {
      registry,
      consumer: Some(consumer),
      providers: Vec::new(),
    }
  }

  /// Fills `slot` with the unnamed `T` from the registry.
  pub fn wire<T: ?Sized + Any + Send + Sync>(&mut self, slot: &Wired<T>) -> Result<()> {
    self.wire_into(slot, None)
  }

  /// Fills `slot` with the `T` registered as `name`.
  pub fn wire_named<T: ?Sized + Any + Send + Sync>(
    &mut self,
    slot: &Wired<T>,
    name: &str,
  ) -> Result<()> {
    self.wire_into(slot, Some(name))
  }

  /// Looks up a dependency and records it, returning the handle directly.
  pub fn resolve<T: ?Sized + Any + Send + Sync>(&mut self, name: Option<&str>) -> Result<Arc<T>> {
    let key = ComponentKey::new::<T>(name);
    let handle = self
      .registry
      .lookup::<T>(&key)
      .ok_or_else(|| Error::NotFound { key: key.clone() })?;

    if self.consumer.is_some() {
      self.providers.push(key);
    }
    Ok(handle)
  }

  /// The component being wired, if any.
  pub fn consumer(&self) -> Option<&ComponentKey> {
    self.consumer.as_ref()
  }

  pub fn registry(&self) -> &'a Registry {
    self.registry
  }

  pub(crate) fn into_providers(self) -> Vec<ComponentKey> {
    self.providers
  }

  fn wire_into<T: ?Sized + Any + Send + Sync>(
    &mut self,
    slot: &Wired<T>,
    name: Option<&str>,
  ) -> Result<()> {
    let handle = self.resolve::<T>(name)?;
    if !slot.fill(handle) {
      tracing::trace!(
        registry = %self.registry.label(),
        dependency = std::any::type_name::<T>(),
        "slot already wired, keeping the existing handle"
      );
    }
    Ok(())
  }
}
