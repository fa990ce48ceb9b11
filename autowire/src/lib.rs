//! # Fibre Autowire
//!
//! A small registry that wires components together and runs their lifecycle
//! passes in dependency order.
//!
//! Components are registered once per key (their type plus an optional name).
//! During [`Registry::auto_wire_all`] every wiring-capable component resolves the
//! handles it needs, and each of those lookups is remembered as a dependency.
//! [`Registry::init_all`] then initializes components so that every provider is
//! set up before the components that wired it, and [`Registry::de_init_all`]
//! tears them down the other way around.
//!
//! ## Core Concepts
//!
//! - **Registry**: owns the components and the dependency graph. It is an
//!   ordinary value; create one at startup and pass it where it is needed.
//! - **Registration**: describes one component and which passes it takes part
//!   in. The first registration for a key wins.
//! - **Capabilities**: the [`AutoWire`], [`Init`] and [`DeInit`] traits.
//! - **Wired slots**: [`Wired<T>`] fields receive dependency handles.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_autowire::{AutoWire, BoxError, Init, Registration, Registry, Wired, Wiring};
//! use once_cell::sync::OnceCell;
//!
//! #[derive(Default)]
//! struct Counter {
//!   start: OnceCell<u32>,
//! }
//!
//! impl Init for Counter {
//!   fn init(&self) -> Result<(), BoxError> {
//!     let _ = self.start.set(1);
//!     Ok(())
//!   }
//! }
//!
//! #[derive(Default)]
//! struct Doubler {
//!   counter: Wired<Counter>,
//!   value: OnceCell<u32>,
//! }
//!
//! impl AutoWire for Doubler {
//!   fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError> {
//!     wiring.wire(&self.counter)?;
//!     Ok(())
//!   }
//! }
//!
//! impl Init for Doubler {
//!   fn init(&self) -> Result<(), BoxError> {
//!     let start = self.counter.try_get()?.start.get().copied().unwrap_or_default();
//!     let _ = self.value.set(start * 2);
//!     Ok(())
//!   }
//! }
//!
//! let registry = Registry::new();
//! // Registration order does not matter: `Doubler` still initializes last.
//! registry.register(Registration::<Doubler>::new().auto_wired().needs_init());
//! registry.register(Registration::<Counter>::new().needs_init());
//!
//! registry.auto_wire_all()?;
//! registry.init_all()?;
//!
//! let doubler = registry.resolve::<Doubler>(None)?;
//! assert_eq!(doubler.value.get(), Some(&2));
//! # Ok::<(), fibre_autowire::Error>(())
//! ```

mod builder;
mod component;
mod error;
mod graph;
mod key;
mod lifecycle;
mod macros;
mod registry;
mod slot;
mod wiring;

pub use builder::{RegistryBuilder, TeardownOrder};
pub use component::{AutoWire, DeInit, Init, Ownership, Registration};
pub use error::{BoxError, Error, Result};
pub use key::ComponentKey;
pub use lifecycle::Pass;
pub use registry::Registry;
pub use slot::Wired;
pub use wiring::Wiring;
