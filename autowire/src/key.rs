//! Lookup keys for registered components.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies one registered component: its type plus an optional name.
///
/// Equality and hashing only consider the `TypeId` and the name. The type name
/// is carried along for error messages and logs, since `type_name` output is
/// not guaranteed to be unique or stable.
#[derive(Clone)]
pub struct ComponentKey {
  type_id: TypeId,
  type_name: &'static str,
  name: Option<String>,
}

impl ComponentKey {
  pub(crate) fn new<T: ?Sized + Any>(name: Option<&str>) -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
      name: name.map(str::to_owned),
    }
  }

  /// The `TypeId` of the registered type.
  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  /// The human readable name of the registered type.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  /// The custom registration name, if one was given.
  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }
}

impl PartialEq for ComponentKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id && self.name == other.name
  }
}

impl Eq for ComponentKey {}

impl Hash for ComponentKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
    self.name.hash(state);
  }
}

impl fmt::Debug for ComponentKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "Key({}, Name({}))", self.type_name, name),
      None => write!(f, "Key({})", self.type_name),
    }
  }
}

impl fmt::Display for ComponentKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "{}#{}", self.type_name, name),
      None => f.write_str(self.type_name),
    }
  }
}
