use fibre_autowire::{AutoWire, BoxError, DeInit, Init, Registration, Registry, Wired, Wiring};
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

// --- Components ---

#[derive(Default)]
struct Settings {
  port: OnceCell<u16>,
}

impl Init for Settings {
  fn init(&self) -> Result<(), BoxError> {
    let port = std::env::var("PORT")
      .ok()
      .and_then(|value| value.parse().ok())
      .unwrap_or(8080);
    let _ = self.port.set(port);
    Ok(())
  }
}

#[derive(Default)]
struct Listener {
  settings: Wired<Settings>,
  address: OnceCell<String>,
}

impl AutoWire for Listener {
  fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError> {
    wiring.wire(&self.settings)?;
    Ok(())
  }
}

impl Init for Listener {
  fn init(&self) -> Result<(), BoxError> {
    // Settings is guaranteed to be initialized first.
    let port = self.settings.try_get()?.port.get().copied().unwrap_or_default();
    let _ = self.address.set(format!("0.0.0.0:{port}"));
    println!("listener bound to {}", self.address.get().map_or("?", String::as_str));
    Ok(())
  }
}

impl DeInit for Listener {
  fn de_init(&self) -> Result<(), BoxError> {
    println!("listener closed");
    Ok(())
  }
}

fn main() -> Result<(), fibre_autowire::Error> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
    .init();

  let registry = Registry::builder().label("demo").build();
  registry.register(
    Registration::<Listener>::new()
      .auto_wired()
      .needs_init()
      .needs_de_init(),
  );
  registry.register(Registration::<Settings>::new().needs_init());

  registry.auto_wire_all()?;
  registry.init_all()?;

  for (position, key) in registry.dependency_order()?.iter().enumerate() {
    println!("{position}: {key}");
  }

  registry.de_init_all()?;
  Ok(())
}
