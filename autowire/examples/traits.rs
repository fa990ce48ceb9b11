use fibre_autowire::{AutoWire, BoxError, Init, Registration, Registry, Wired, Wiring};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation, owned by the application
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
#[derive(Default)]
struct ReportService {
  logger: Wired<dyn Logger>,
}

impl AutoWire for ReportService {
  fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError> {
    wiring.wire(&self.logger)?;
    Ok(())
  }
}

impl Init for ReportService {
  fn init(&self) -> Result<(), BoxError> {
    self.logger.try_get()?.log("Report service ready.");
    Ok(())
  }
}

fn main() -> Result<(), fibre_autowire::Error> {
  let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger);

  let registry = Registry::new();
  // The registry shares the logger but does not own it.
  registry.register(Registration::external(Arc::clone(&logger)));
  registry.register(Registration::<ReportService>::new().auto_wired().needs_init());

  registry.auto_wire_all()?;
  registry.init_all()?;

  drop(registry);
  logger.log("Still alive after the registry is gone.");
  Ok(())
}
