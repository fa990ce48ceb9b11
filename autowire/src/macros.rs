//! Public macros for wiring several dependencies at once.

/// Wires a list of slots through a [`Wiring`](crate::Wiring) context.
///
/// Each slot may be followed by `=> name` to wire a named registration. The
/// macro uses `?`, so it must be called from a function returning a `Result`
/// whose error type accepts [`Error`](crate::Error), like a hook does.
///
/// # Examples
///
/// ```
/// use fibre_autowire::{wire, AutoWire, BoxError, Registration, Registry, Wired, Wiring};
///
/// #[derive(Default)]
/// struct Clock;
/// #[derive(Default)]
/// struct Store;
///
/// #[derive(Default)]
/// struct Service {
///   clock: Wired<Clock>,
///   primary: Wired<Store>,
///   replica: Wired<Store>,
/// }
///
/// impl AutoWire for Service {
///   fn auto_wire(&self, wiring: &mut Wiring<'_>) -> Result<(), BoxError> {
///     wire!(wiring, self.clock, self.primary, self.replica => "replica");
///     Ok(())
///   }
/// }
///
/// let registry = Registry::new();
/// registry.register(Registration::<Clock>::new());
/// registry.register(Registration::<Store>::new());
/// registry.register(Registration::<Store>::new().named("replica"));
/// registry.register(Registration::<Service>::new().auto_wired());
/// registry.auto_wire_all().unwrap();
///
/// assert_eq!(registry.dependency_count::<Service>(None), 3);
/// ```
#[macro_export]
macro_rules! wire {
    (@slot $wiring:expr, $slot:expr) => {
        $wiring.wire(&$slot)?
    };

    (@slot $wiring:expr, $slot:expr, $name:expr) => {
        $wiring.wire_named(&$slot, $name)?
    };

    ($wiring:expr, $($slot:expr $(=> $name:expr)?),+ $(,)?) => {
        $( $crate::wire!(@slot $wiring, $slot $(, $name)?); )+
    };
}
