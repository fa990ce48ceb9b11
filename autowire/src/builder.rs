use crate::registry::Registry;

/// Order in which a dropped [`Registry`] releases its components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeardownOrder {
  /// Consumers are released before the providers they wired.
  ///
  /// Falls back to `ReverseRegistration` when the graph has a cycle.
  #[default]
  ReverseTopological,
  /// The most recently registered component is released first.
  ReverseRegistration,
}

/// A builder for [`Registry`] instances.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
  pub(crate) label: String,
  pub(crate) teardown_order: TeardownOrder,
}

impl Default for RegistryBuilder {
  fn default() -> Self {
    Self {
      label: "default".to_owned(),
      teardown_order: TeardownOrder::default(),
    }
  }
}

impl RegistryBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the label attached to every log event of the registry.
  pub fn label(mut self, label: impl Into<String>) -> Self {
    self.label = label.into();
    self
  }

  /// Sets the order used to release components on drop.
  pub fn teardown_order(mut self, order: TeardownOrder) -> Self {
    self.teardown_order = order;
    self
  }

  pub fn build(self) -> Registry {
    Registry::from_builder(self)
  }
}
