use fibre_autowire::{wire, AutoWire, BoxError, Registration, Registry, Wired, Wiring};
use std::sync::Arc;

// --- Abstraction and Implementations ---
trait MessageSender: Send + Sync {
  fn send(&self, to: &str, message: &str) -> String;
}

struct EmailSender;
impl MessageSender for EmailSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email to {}: '{}'", to, message)
  }
}

struct SmsSender;
impl MessageSender for SmsSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending SMS to {}: '{}'", to, message)
  }
}

#[derive(Default)]
struct Notifier {
  email: Wired<dyn MessageSender>,
  sms: Wired<dyn MessageSender>,
}

impl AutoWire for Notifier {
  fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError> {
    wire!(wiring, self.email => "email", self.sms => "sms");
    Ok(())
  }
}

fn main() -> Result<(), fibre_autowire::Error> {
  let registry = Registry::new();

  // --- Registration ---
  // Register both implementations with unique names.
  registry.register(
    Registration::<dyn MessageSender>::from_trait_factory(|| Arc::new(EmailSender)).named("email"),
  );
  registry.register(
    Registration::<dyn MessageSender>::from_trait_factory(|| Arc::new(SmsSender)).named("sms"),
  );
  registry.register(Registration::<Notifier>::new().auto_wired());

  registry.auto_wire_all()?;

  // --- Resolution ---
  let notifier = registry.resolve::<Notifier>(None)?;
  let email = notifier.email.try_get()?;
  let sms = notifier.sms.try_get()?;

  let result1 = email.send("test@example.com", "Hello from Fibre!");
  let result2 = sms.send("+123456789", "Hello from Fibre!");

  println!("{}", result1);
  println!("{}", result2);

  assert!(result1.contains("email"));
  assert!(result2.contains("SMS"));
  Ok(())
}
