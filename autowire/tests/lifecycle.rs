use fibre_autowire::{
  AutoWire, BoxError, DeInit, Error, Init, Pass, Registration, Registry, Wired, Wiring,
};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;

// --- Test Fixtures ---

struct A {
  value: i32,
}

impl Default for A {
  fn default() -> Self {
    Self { value: 1 }
  }
}

impl A {
  fn value(&self) -> i32 {
    self.value
  }
}

#[derive(Default)]
struct B {
  a: Wired<A>,
}

impl AutoWire for B {
  fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError> {
    wiring.wire(&self.a)?;
    Ok(())
  }
}

impl B {
  fn value(&self) -> i32 {
    self.a.get().map_or(0, |a| a.value())
  }
}

// Never registered; wires itself from outside the registry.
#[derive(Default)]
struct C {
  b: Wired<B>,
}

impl AutoWire for C {
  fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError> {
    wiring.wire(&self.b)?;
    Ok(())
  }
}

#[derive(Default)]
struct D {
  value: AtomicI32,
}

impl Init for D {
  fn init(&self) -> Result<(), BoxError> {
    self.value.store(1, Ordering::SeqCst);
    Ok(())
  }
}

#[derive(Default)]
struct E {
  d: Wired<D>,
  value: AtomicI32,
}

impl AutoWire for E {
  fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError> {
    wiring.wire(&self.d)?;
    Ok(())
  }
}

impl Init for E {
  fn init(&self) -> Result<(), BoxError> {
    let d = self.d.try_get()?;
    self
      .value
      .store(d.value.load(Ordering::SeqCst) + 1, Ordering::SeqCst);
    Ok(())
  }
}

#[derive(Default)]
struct F {
  e: Wired<E>,
  value: AtomicI32,
}

impl AutoWire for F {
  fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError> {
    wiring.wire(&self.e)?;
    Ok(())
  }
}

impl Init for F {
  fn init(&self) -> Result<(), BoxError> {
    let e = self.e.try_get()?;
    self
      .value
      .store(e.value.load(Ordering::SeqCst) + 1, Ordering::SeqCst);
    Ok(())
  }
}

fn scenario_registry() -> Registry {
  let registry = Registry::new();
  // F and E are registered before the components they depend on.
  registry.register(Registration::<F>::new().auto_wired().needs_init());
  registry.register(Registration::<E>::new().auto_wired().needs_init());
  registry.register(Registration::<A>::new());
  registry.register(Registration::<B>::new().auto_wired());
  registry.register(Registration::<D>::new().needs_init());
  registry
}

// --- End-to-end ---

#[test]
fn test_wire_then_init_in_dependency_order() {
  let registry = scenario_registry();
  registry.auto_wire_all().unwrap();
  registry.init_all().unwrap();

  let d = registry.resolve::<D>(None).unwrap();
  let e = registry.resolve::<E>(None).unwrap();
  let f = registry.resolve::<F>(None).unwrap();
  assert_eq!(d.value.load(Ordering::SeqCst), 1);
  assert_eq!(e.value.load(Ordering::SeqCst), 2);
  assert_eq!(f.value.load(Ordering::SeqCst), 3);

  let a = registry.resolve::<A>(None).unwrap();
  let b = registry.resolve::<B>(None).unwrap();
  assert!(Arc::ptr_eq(b.a.get().unwrap(), &a));
  assert_eq!(b.value(), 1);
}

#[test]
fn test_external_consumer_wires_without_recording() {
  let registry = scenario_registry();
  registry.auto_wire_all().unwrap();
  registry.init_all().unwrap();
  let edges = registry.edge_count();

  let c = C::default();
  c.auto_wire(&mut registry.wiring()).unwrap();

  assert_eq!(c.b.get().unwrap().value(), 1);
  assert_eq!(registry.edge_count(), edges);
  assert!(registry.get::<C>(None).is_none());
}

#[test]
fn test_dependency_order_puts_providers_first() {
  let registry = scenario_registry();
  registry.auto_wire_all().unwrap();

  let order: Vec<&str> = registry
    .dependency_order()
    .unwrap()
    .iter()
    .map(|key| key.type_name().rsplit("::").next().unwrap())
    .collect();
  assert_eq!(order, vec!["A", "D", "B", "E", "F"]);
  assert_eq!(registry.edge_count(), 3);
  assert_eq!(registry.dependency_count::<F>(None), 1);
  assert_eq!(registry.dependency_count::<A>(None), 0);
}

// --- Idempotence and preconditions ---

#[test]
fn test_passes_run_once() {
  static WIRES: AtomicUsize = AtomicUsize::new(0);
  static INITS: AtomicUsize = AtomicUsize::new(0);

  #[derive(Default)]
  struct Counted;
  impl AutoWire for Counted {
    fn auto_wire(&self, _: &mut Wiring<'_>) -> Result<(), BoxError> {
      WIRES.fetch_add(1, Ordering::SeqCst);
      Ok(())
    }
  }
  impl Init for Counted {
    fn init(&self) -> Result<(), BoxError> {
      INITS.fetch_add(1, Ordering::SeqCst);
      Ok(())
    }
  }

  let registry = Registry::new();
  registry.register(Registration::<Counted>::new().auto_wired().needs_init());

  registry.auto_wire_all().unwrap();
  registry.auto_wire_all().unwrap();
  registry.init_all().unwrap();
  registry.init_all().unwrap();

  assert_eq!(WIRES.load(Ordering::SeqCst), 1);
  assert_eq!(INITS.load(Ordering::SeqCst), 1);
  assert!(registry.is_wired());
  assert!(registry.is_initialized());
}

#[test]
fn test_init_before_wiring_is_a_precondition_error() {
  let registry = scenario_registry();

  let err = registry.init_all().unwrap_err();
  assert!(matches!(
    err,
    Error::Precondition {
      pass: Pass::Init,
      required: Pass::AutoWire
    }
  ));

  // The premature call does not use up the pass.
  registry.auto_wire_all().unwrap();
  registry.init_all().unwrap();
  assert_eq!(
    registry.resolve::<F>(None).unwrap().value.load(Ordering::SeqCst),
    3
  );
}

#[test]
fn test_de_init_before_wiring_is_a_precondition_error() {
  let registry = Registry::new();
  assert!(matches!(
    registry.de_init_all(),
    Err(Error::Precondition {
      pass: Pass::DeInit,
      ..
    })
  ));
}

// --- Cycles ---

static CYCLE_INITS: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
struct Ping {
  pong: Wired<Pong>,
}

#[derive(Default)]
struct Pong {
  ping: Wired<Ping>,
}

impl AutoWire for Ping {
  fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError> {
    wiring.wire(&self.pong)?;
    Ok(())
  }
}

impl AutoWire for Pong {
  fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError> {
    wiring.wire(&self.ping)?;
    Ok(())
  }
}

impl Init for Ping {
  fn init(&self) -> Result<(), BoxError> {
    CYCLE_INITS.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}

impl Init for Pong {
  fn init(&self) -> Result<(), BoxError> {
    CYCLE_INITS.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}

#[test]
fn test_cycle_fails_without_running_any_init() {
  #[derive(Default)]
  struct Standalone;
  impl Init for Standalone {
    fn init(&self) -> Result<(), BoxError> {
      CYCLE_INITS.fetch_add(1, Ordering::SeqCst);
      Ok(())
    }
  }

  let registry = Registry::new();
  registry.register(Registration::<Standalone>::new().needs_init());
  registry.register(Registration::<Ping>::new().auto_wired().needs_init());
  registry.register(Registration::<Pong>::new().auto_wired().needs_init());
  registry.auto_wire_all().unwrap();

  let err = registry.init_all().unwrap_err();
  match &err {
    Error::CyclicDependency { unresolved } => assert_eq!(unresolved.len(), 2),
    other => panic!("unexpected error: {other:?}"),
  }
  assert!(err.to_string().contains("initialize these components manually"));
  assert_eq!(CYCLE_INITS.load(Ordering::SeqCst), 0);
  assert!(!registry.is_initialized());

  // Nothing ran, so asking again reports the same cycle.
  assert!(matches!(
    registry.init_all(),
    Err(Error::CyclicDependency { .. })
  ));
}

// --- Failures ---

#[test]
fn test_missing_dependency_fails_wiring() {
  let registry = Registry::new();
  registry.register(Registration::<B>::new().auto_wired());

  let err = registry.auto_wire_all().unwrap_err();
  match &err {
    Error::Callback { pass, key, source } => {
      assert_eq!(*pass, Pass::AutoWire);
      assert!(key.type_name().ends_with("B"));
      assert!(matches!(
        source.downcast_ref::<Error>(),
        Some(Error::NotFound { .. })
      ));
    }
    other => panic!("unexpected error: {other:?}"),
  }

  assert!(!registry.is_wired());
  assert!(matches!(
    registry.init_all(),
    Err(Error::Precondition { .. })
  ));
}

#[test]
fn test_failing_init_stops_the_pass() {
  #[derive(Default)]
  struct Broken;
  impl Init for Broken {
    fn init(&self) -> Result<(), BoxError> {
      Err("disk not mounted".into())
    }
  }

  #[derive(Default)]
  struct Later {
    broken: Wired<Broken>,
    ran: OnceCell<()>,
  }
  impl AutoWire for Later {
    fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError> {
      wiring.wire(&self.broken)?;
      Ok(())
    }
  }
  impl Init for Later {
    fn init(&self) -> Result<(), BoxError> {
      let _ = self.ran.set(());
      Ok(())
    }
  }

  let registry = Registry::new();
  registry.register(Registration::<Later>::new().auto_wired().needs_init());
  registry.register(Registration::<Broken>::new().needs_init());
  registry.auto_wire_all().unwrap();

  let err = registry.init_all().unwrap_err();
  assert!(matches!(err, Error::Callback { pass: Pass::Init, .. }));
  assert!(err.to_string().contains("disk not mounted"));
  assert!(registry.resolve::<Later>(None).unwrap().ran.get().is_none());

  // A pass that failed part way is not retried.
  registry.init_all().unwrap();
  assert!(registry.resolve::<Later>(None).unwrap().ran.get().is_none());
  assert!(!registry.is_initialized());
}

#[test]
fn test_unwired_slot_reports_error() {
  let e = E::default();
  match e.d.try_get() {
    Err(Error::Unwired { type_name }) => assert!(type_name.ends_with("D")),
    other => panic!("unexpected result: {:?}", other.map(|_| ())),
  }
}

// --- De-initialization ---

type Journal = Arc<Mutex<Vec<&'static str>>>;

struct Disk {
  journal: Journal,
}

impl DeInit for Disk {
  fn de_init(&self) -> Result<(), BoxError> {
    self.journal.lock().push("disk");
    Ok(())
  }
}

struct Database {
  journal: Journal,
  disk: Wired<Disk>,
}

impl AutoWire for Database {
  fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError> {
    wiring.wire(&self.disk)?;
    Ok(())
  }
}

impl DeInit for Database {
  fn de_init(&self) -> Result<(), BoxError> {
    self.journal.lock().push("database");
    Ok(())
  }
}

#[test]
fn test_de_init_runs_consumers_first() {
  let journal: Journal = Arc::default();
  let registry = Registry::new();

  let j = Arc::clone(&journal);
  registry.register(Registration::from_factory(move || Disk { journal: j }).needs_de_init());
  let j = Arc::clone(&journal);
  registry.register(
    Registration::from_factory(move || Database {
      journal: j,
      disk: Wired::new(),
    })
    .auto_wired()
    .needs_de_init(),
  );

  registry.auto_wire_all().unwrap();
  registry.init_all().unwrap();
  registry.de_init_all().unwrap();
  registry.de_init_all().unwrap();

  assert_eq!(*journal.lock(), vec!["database", "disk"]);
  assert!(registry.is_de_initialized());
}
