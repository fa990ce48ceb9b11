use fibre_autowire::{Error, Registry};

struct UnregisteredService;

fn main() {
  let registry = Registry::new();

  // --- Using the optional lookup ---
  println!("Attempting to get a service that was never registered...");
  match registry.get::<UnregisteredService>(None) {
    Some(_) => panic!("Should not have found the service!"),
    None => println!("Correctly received `None` for the missing service."),
  }

  // --- Using the required lookup ---
  println!("\nNow, attempting to resolve it...");
  match registry.resolve::<UnregisteredService>(None) {
    Err(err @ Error::NotFound { .. }) => println!("Correctly received an error: {err}"),
    Err(other) => panic!("Unexpected error: {other}"),
    Ok(_) => panic!("Should not have resolved the service!"),
  }
}
