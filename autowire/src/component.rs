//! Capability traits and the typed registration builder.

use crate::error::BoxError;
use crate::wiring::Wiring;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Components that resolve their dependencies during `auto_wire_all`.
///
/// Every dependency resolved through `wiring` becomes an edge in the
/// dependency graph, so the component is initialized after it.
pub trait AutoWire: Send + Sync + 'static {
  fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError>;
}

/// Components with setup logic that runs during `init_all`.
///
/// `init` takes `&self`; state it sets must use interior mutability.
pub trait Init: Send + Sync + 'static {
  fn init(&self) -> Result<(), BoxError>;
}

/// Components with shutdown logic that runs during `de_init_all`.
pub trait DeInit: Send + Sync + 'static {
  fn de_init(&self) -> Result<(), BoxError>;
}

/// Whether the registry created an instance or was handed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
  /// Created by the registry from `Default` or a factory.
  Owned,
  /// Supplied by the caller, who keeps its own handle to it.
  External,
}

pub(crate) type WireFn<T> = fn(&T, &mut Wiring<'_>) -> Result<(), BoxError>;
pub(crate) type LifecycleFn<T> = fn(&T) -> Result<(), BoxError>;

pub(crate) enum Source<T: ?Sized> {
  Factory(Box<dyn FnOnce() -> Arc<T> + Send>),
  External(Arc<T>),
}

/// Describes one component to [`Registry::register`](crate::Registry::register).
///
/// The capability methods are only available when `T` implements the matching
/// trait, so a registration can never claim a hook the type does not have.
///
/// ```
/// use fibre_autowire::{AutoWire, BoxError, Registration, Registry, Wired, Wiring};
///
/// #[derive(Default)]
/// struct Config;
///
/// #[derive(Default)]
/// struct Server {
///   config: Wired<Config>,
/// }
///
/// impl AutoWire for Server {
///   fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError> {
///     wiring.wire(&self.config)?;
///     Ok(())
///   }
/// }
///
/// let registry = Registry::new();
/// registry.register(Registration::<Config>::new());
/// registry.register(Registration::<Server>::new().auto_wired());
/// registry.auto_wire_all().unwrap();
/// assert!(registry.resolve::<Server>(None).unwrap().config.is_wired());
/// ```
pub struct Registration<T: ?Sized> {
  pub(crate) name: Option<String>,
  pub(crate) source: Source<T>,
  pub(crate) auto_wire: Option<WireFn<T>>,
  pub(crate) init: Option<LifecycleFn<T>>,
  pub(crate) de_init: Option<LifecycleFn<T>>,
}

impl<T: Default + Any + Send + Sync> Registration<T> {
  /// Registers a `T::default()` owned by the registry.
  pub fn new() -> Self {
    Self::from_factory(T::default)
  }
}

impl<T: Default + Any + Send + Sync> Default for Registration<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Any + Send + Sync> Registration<T> {
  /// Registers the value built by `factory`, owned by the registry.
  ///
  /// The factory only runs if the key is not registered yet.
  pub fn from_factory(factory: impl FnOnce() -> T + Send + 'static) -> Self {
    Self::with_source(Source::Factory(Box::new(move || Arc::new(factory()))))
  }
}

impl<T: ?Sized + Any + Send + Sync> Registration<T> {
  /// Registers a handle built by `factory`, typically a trait object.
  pub fn from_trait_factory(factory: impl FnOnce() -> Arc<T> + Send + 'static) -> Self {
    Self::with_source(Source::Factory(Box::new(factory)))
  }

  /// Registers an instance the caller already holds.
  ///
  /// The registry keeps a second handle and never tears the instance down.
  pub fn external(instance: Arc<T>) -> Self {
    Self::with_source(Source::External(instance))
  }

  fn with_source(source: Source<T>) -> Self {
    Self {
      name: None,
      source,
      auto_wire: None,
      init: None,
      de_init: None,
    }
  }

  /// Registers under a custom name instead of the bare type.
  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub(crate) fn ownership(&self) -> Ownership {
    match self.source {
      Source::Factory(_) => Ownership::Owned,
      Source::External(_) => Ownership::External,
    }
  }
}

impl<T: ?Sized + AutoWire> Registration<T> {
  /// Takes part in `auto_wire_all`.
  pub fn auto_wired(mut self) -> Self {
    self.auto_wire = Some(<T as AutoWire>::auto_wire);
    self
  }
}

impl<T: ?Sized + Init> Registration<T> {
  /// Takes part in `init_all`.
  pub fn needs_init(mut self) -> Self {
    self.init = Some(<T as Init>::init);
    self
  }
}

impl<T: ?Sized + DeInit> Registration<T> {
  /// Takes part in `de_init_all`.
  pub fn needs_de_init(mut self) -> Self {
    self.de_init = Some(<T as DeInit>::de_init);
    self
  }
}

impl<T: ?Sized + Any + Send + Sync> fmt::Debug for Registration<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Registration")
      .field("type", &std::any::type_name::<T>())
      .field("name", &self.name)
      .field("ownership", &self.ownership())
      .field("auto_wire", &self.auto_wire.is_some())
      .field("init", &self.init.is_some())
      .field("de_init", &self.de_init.is_some())
      .finish()
  }
}
