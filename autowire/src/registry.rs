//! The `Registry` struct and its lifecycle passes.

use crate::builder::{RegistryBuilder, TeardownOrder};
use crate::component::{Ownership, Registration, Source};
use crate::error::{BoxError, Error, Result};
use crate::graph::DependencyGraph;
use crate::key::ComponentKey;
use crate::lifecycle::{Pass, PassGuard};
use crate::wiring::Wiring;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

type WireHook = Arc<dyn Fn(&mut Wiring<'_>) -> Result<(), BoxError> + Send + Sync>;
type LifecycleHook = Arc<dyn Fn() -> Result<(), BoxError> + Send + Sync>;

fn wire_hook<F>(hook: F) -> WireHook
where
  F: Fn(&mut Wiring<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
{
  Arc::new(hook)
}

fn lifecycle_hook<F>(hook: F) -> LifecycleHook
where
  F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
{
  Arc::new(hook)
}

struct Hooks {
  auto_wire: Option<WireHook>,
  init: Option<LifecycleHook>,
  de_init: Option<LifecycleHook>,
}

struct Entry {
  seq: u64,
  ownership: Ownership,
  // Always an `Arc<T>` for the `T` named by the key.
  instance: Box<dyn Any + Send + Sync>,
  hooks: Hooks,
}

/// The component registry.
///
/// Holds at most one instance per key, records the dependencies components
/// resolve while they are wired and runs the lifecycle passes in dependency
/// order. Registration and lookup work through `&self`; the passes are meant
/// to be driven once from the application's startup code.
pub struct Registry {
  label: String,
  teardown_order: TeardownOrder,
  entries: DashMap<ComponentKey, Entry>,
  next_seq: AtomicU64,
  graph: Mutex<DependencyGraph>,
  wired: PassGuard,
  initialized: PassGuard,
  de_initialized: PassGuard,
}

impl Default for Registry {
  fn default() -> Self {
    Self::new()
  }
}

impl Registry {
  /// Creates an empty registry with the default configuration.
  pub fn new() -> Self {
    RegistryBuilder::new().build()
  }

  pub fn builder() -> RegistryBuilder {
    RegistryBuilder::new()
  }

  pub(crate) fn from_builder(builder: RegistryBuilder) -> Self {
    Self {
      label: builder.label,
      teardown_order: builder.teardown_order,
      entries: DashMap::new(),
      next_seq: AtomicU64::new(0),
      graph: Mutex::new(DependencyGraph::new()),
      wired: PassGuard::new(),
      initialized: PassGuard::new(),
      de_initialized: PassGuard::new(),
    }
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  // --- Registration ---

  /// Registers a component. Returns `false` if its key was already taken.
  ///
  /// The first registration for a key wins; a later one is ignored and its
  /// factory is never called.
  pub fn register<T: ?Sized + Any + Send + Sync>(&self, registration: Registration<T>) -> bool {
    let key = ComponentKey::new::<T>(registration.name.as_deref());
    if self.entries.contains_key(&key) {
      debug!(registry = %self.label, component = %key, "already registered, ignoring");
      return false;
    }

    let ownership = registration.ownership();
    let Registration {
      source,
      auto_wire,
      init,
      de_init,
      ..
    } = registration;

    // Built outside the map lock so a factory may read the registry.
    let instance: Arc<T> = match source {
      Source::Factory(factory) => factory(),
      Source::External(instance) => instance,
    };

    let hooks = Hooks {
      auto_wire: auto_wire.map(|hook| {
        let instance = Arc::clone(&instance);
        wire_hook(move |wiring| hook(&*instance, wiring))
      }),
      init: init.map(|hook| {
        let instance = Arc::clone(&instance);
        lifecycle_hook(move || hook(&*instance))
      }),
      de_init: de_init.map(|hook| {
        let instance = Arc::clone(&instance);
        lifecycle_hook(move || hook(&*instance))
      }),
    };

    let (wires, inits, de_inits) = (
      hooks.auto_wire.is_some(),
      hooks.init.is_some(),
      hooks.de_init.is_some(),
    );
    let entry = Entry {
      seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
      ownership,
      instance: Box::new(instance),
      hooks,
    };

    match self.entries.entry(key) {
      MapEntry::Occupied(occupied) => {
        debug!(
          registry = %self.label,
          component = %occupied.key(),
          "registered concurrently by another caller, ignoring"
        );
        false
      }
      MapEntry::Vacant(vacant) => {
        debug!(
          registry = %self.label,
          component = %vacant.key(),
          ?ownership,
          auto_wire = wires,
          init = inits,
          de_init = de_inits,
          "registered component"
        );
        vacant.insert(entry);
        true
      }
    }
  }

  // --- Resolution ---

  /// Returns the component registered for `T` and `name`, if any.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self, name: Option<&str>) -> Option<Arc<T>> {
    self.lookup::<T>(&ComponentKey::new::<T>(name))
  }

  /// Returns the component registered for `T` and `name`, or [`Error::NotFound`].
  pub fn resolve<T: ?Sized + Any + Send + Sync>(&self, name: Option<&str>) -> Result<Arc<T>> {
    let key = ComponentKey::new::<T>(name);
    self.lookup::<T>(&key).ok_or(Error::NotFound { key })
  }

  pub fn contains<T: ?Sized + Any>(&self, name: Option<&str>) -> bool {
    self.entries.contains_key(&ComponentKey::new::<T>(name))
  }

  /// Reports whether the registry created the component or was handed it.
  pub fn ownership<T: ?Sized + Any>(&self, name: Option<&str>) -> Option<Ownership> {
    self
      .entries
      .get(&ComponentKey::new::<T>(name))
      .map(|entry| entry.ownership)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// A wiring context for code that is not itself a registered component.
  ///
  /// Lookups through it fill slots as usual but record no dependencies.
  pub fn wiring(&self) -> Wiring<'_> {
    Wiring::detached(self)
  }

  pub(crate) fn lookup<T: ?Sized + Any + Send + Sync>(&self, key: &ComponentKey) -> Option<Arc<T>> {
    let entry = self.entries.get(key)?;
    entry.instance.downcast_ref::<Arc<T>>().cloned()
  }

  // --- Dependency graph ---

  /// The order `init_all` uses: every provider before its consumers.
  pub fn dependency_order(&self) -> Result<Vec<ComponentKey>> {
    let nodes = self.keys_in_registration_order();
    self
      .graph
      .lock()
      .topological_order(&nodes)
      .map_err(|unresolved| {
        warn!(
          registry = %self.label,
          unresolved = unresolved.len(),
          "dependency cycle detected"
        );
        Error::CyclicDependency { unresolved }
      })
  }

  /// Number of dependency lookups the component made while it was wired.
  pub fn dependency_count<T: ?Sized + Any>(&self, name: Option<&str>) -> usize {
    self.graph.lock().in_degree(&ComponentKey::new::<T>(name))
  }

  /// Total number of recorded provider to consumer edges.
  pub fn edge_count(&self) -> usize {
    self.graph.lock().edge_count()
  }

  fn keys_in_registration_order(&self) -> Vec<ComponentKey> {
    let mut keys: Vec<(u64, ComponentKey)> = self
      .entries
      .iter()
      .map(|entry| (entry.seq, entry.key().clone()))
      .collect();
    keys.sort_unstable_by_key(|(seq, _)| *seq);
    keys.into_iter().map(|(_, key)| key).collect()
  }

  fn record_dependencies(&self, consumer: &ComponentKey, providers: Vec<ComponentKey>) {
    if providers.is_empty() {
      return;
    }
    let mut graph = self.graph.lock();
    for provider in providers {
      trace!(registry = %self.label, %provider, %consumer, "recorded dependency");
      graph.add_edge(provider, consumer.clone());
    }
  }

  // --- Lifecycle ---

  /// Runs the wiring hook of every wiring-capable component, once.
  ///
  /// Components are wired in registration order. Wiring only resolves
  /// already-registered instances, so that order does not matter for
  /// correctness. Repeated calls return `Ok(())` without doing anything.
  ///
  /// A caller that loses a race against a concurrent first call also gets
  /// `Ok(())` immediately, while the winner may still be wiring. Check
  /// [`is_wired`](Self::is_wired) before relying on the pass having finished;
  /// until then `init_all` reports [`Error::Precondition`].
  pub fn auto_wire_all(&self) -> Result<()> {
    if !self.wired.begin() {
      debug!(registry = %self.label, pass = %Pass::AutoWire, "already run, skipping");
      return Ok(());
    }

    let mut targets: Vec<(u64, ComponentKey, WireHook)> = self
      .entries
      .iter()
      .filter_map(|entry| {
        let hook = entry.hooks.auto_wire.clone()?;
        Some((entry.seq, entry.key().clone(), hook))
      })
      .collect();
    targets.sort_unstable_by_key(|(seq, _, _)| *seq);

    debug!(registry = %self.label, components = targets.len(), "wiring components");
    for (_, key, hook) in targets {
      trace!(registry = %self.label, component = %key, "wiring");
      let mut wiring = Wiring::for_consumer(self, key.clone());
      let outcome = hook(&mut wiring);
      self.record_dependencies(&key, wiring.into_providers());

      if let Err(source) = outcome {
        warn!(registry = %self.label, component = %key, error = %source, "wiring failed");
        self.wired.fail();
        return Err(Error::Callback {
          pass: Pass::AutoWire,
          key,
          source,
        });
      }
    }

    self.wired.finish();
    debug!(registry = %self.label, edges = self.edge_count(), "wiring complete");
    Ok(())
  }

  /// Runs the init hook of every init-capable component in dependency order, once.
  ///
  /// Fails with [`Error::Precondition`] before `auto_wire_all` has completed and
  /// with [`Error::CyclicDependency`] if the graph cannot be ordered. In both
  /// cases no hook runs and the pass can still be attempted later.
  pub fn init_all(&self) -> Result<()> {
    self.run_ordered(Pass::Init, &self.initialized, false, |hooks| hooks.init.clone())
  }

  /// Runs the de-init hook of every de-init-capable component, consumers first, once.
  pub fn de_init_all(&self) -> Result<()> {
    self.run_ordered(Pass::DeInit, &self.de_initialized, true, |hooks| {
      hooks.de_init.clone()
    })
  }

  pub fn is_wired(&self) -> bool {
    self.wired.is_done()
  }

  pub fn is_initialized(&self) -> bool {
    self.initialized.is_done()
  }

  pub fn is_de_initialized(&self) -> bool {
    self.de_initialized.is_done()
  }

  fn run_ordered(
    &self,
    pass: Pass,
    guard: &PassGuard,
    reverse: bool,
    pick: impl Fn(&Hooks) -> Option<LifecycleHook>,
  ) -> Result<()> {
    if !self.wired.is_done() {
      return Err(Error::Precondition {
        pass,
        required: Pass::AutoWire,
      });
    }
    if !guard.begin() {
      debug!(registry = %self.label, %pass, "already run, skipping");
      return Ok(());
    }

    let mut order = match self.dependency_order() {
      Ok(order) => order,
      Err(err) => {
        guard.release();
        return Err(err);
      }
    };
    if reverse {
      order.reverse();
    }

    debug!(registry = %self.label, %pass, components = order.len(), "running pass");
    for key in order {
      // The map guard is dropped before the hook runs.
      let Some(hook) = self.entries.get(&key).and_then(|entry| pick(&entry.hooks)) else {
        continue;
      };
      trace!(registry = %self.label, %pass, component = %key, "invoking hook");
      if let Err(source) = hook() {
        warn!(registry = %self.label, %pass, component = %key, error = %source, "hook failed");
        guard.fail();
        return Err(Error::Callback { pass, key, source });
      }
    }

    guard.finish();
    debug!(registry = %self.label, %pass, "pass complete");
    Ok(())
  }
}

impl fmt::Debug for Registry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Registry")
      .field("label", &self.label)
      .field("components", &self.entries.len())
      .field("wired", &self.wired.is_done())
      .field("initialized", &self.initialized.is_done())
      .field("de_initialized", &self.de_initialized.is_done())
      .finish_non_exhaustive()
  }
}

impl Drop for Registry {
  fn drop(&mut self) {
    let registration_order = self.keys_in_registration_order();
    let mut order = match self.teardown_order {
      TeardownOrder::ReverseTopological => self
        .graph
        .get_mut()
        .topological_order(&registration_order)
        .unwrap_or(registration_order),
      TeardownOrder::ReverseRegistration => registration_order,
    };
    order.reverse();

    for key in order {
      if let Some((key, entry)) = self.entries.remove(&key) {
        trace!(
          registry = %self.label,
          component = %key,
          ownership = ?entry.ownership,
          "releasing component"
        );
        drop(entry);
      }
    }
  }
}
