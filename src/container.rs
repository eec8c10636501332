use alloc::{boxed::Box, collections::BTreeMap, string::String};
use parking_lot::Mutex;
use tracing::{debug, error, info_span};

use crate::{
    any::Instance,
    errors::LookupErrorKind,
    injector::Injector,
    utils::thread_safety::{SendSafety, SyncSafety, WeakThreadSafety},
    value::Value,
    Parameters,
};

/// Type name under which a lookup service asks for itself.
/// A parameter typed with it receives the injector's container.
pub const CONTAINER_TYPE: &str = "autowire::Container";

/// Type name under which [`DefaultContainer`] serves the injector it is backed by
pub const INJECTOR_TYPE: &str = "autowire::Injector";

/// Object lookup service used by the injector to realize type references
pub trait Container: SendSafety + SyncSafety {
    fn has(&self, name: &str) -> bool;

    /// # Errors
    /// - Returns [`LookupErrorKind::NotFound`] if [`Self::has`] is `false` for the name
    /// - Returns [`LookupErrorKind::Create`] if the object can't be created
    fn get(&self, name: &str) -> Result<Value, LookupErrorKind>;
}

/// Lookup service backed by an injector.
///
/// Objects are created on first request and shared afterwards.
/// Only a weak reference to the injector is kept, the injector owns its container.
/// The injector itself is available under [`INJECTOR_TYPE`] and is never cached.
pub struct DefaultContainer {
    injector: WeakThreadSafety<Injector>,
    services: Mutex<BTreeMap<String, Value>>,
}

impl DefaultContainer {
    #[inline]
    #[must_use]
    pub fn new(injector: WeakThreadSafety<Injector>) -> Self {
        Self {
            injector,
            services: Mutex::new(BTreeMap::new()),
        }
    }

    /// Registers a value under the name, replacing a previously created or registered one
    pub fn set_instance(&self, name: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.services.lock().insert(name.into(), value.into());
        self
    }
}

impl Container for DefaultContainer {
    fn has(&self, name: &str) -> bool {
        if self.services.lock().contains_key(name) {
            return true;
        }
        self.injector
            .upgrade()
            .is_some_and(|injector| name == INJECTOR_TYPE || injector.can_create(name))
    }

    fn get(&self, name: &str) -> Result<Value, LookupErrorKind> {
        let span = info_span!("get", name);
        let _guard = span.enter();

        if let Some(value) = self.services.lock().get(name) {
            debug!("Found in cache");
            return Ok(value.clone());
        }
        debug!("Not found in cache");

        if name == INJECTOR_TYPE {
            if let Some(injector) = self.injector.upgrade() {
                debug!("Injector served");
                return Ok(Value::Instance(Instance::injector(injector)));
            }
        }

        let Some(injector) = self.injector.upgrade().filter(|injector| injector.can_create(name)) else {
            let err = LookupErrorKind::NotFound { name: name.into() };
            error!("{}", err);
            return Err(err);
        };

        // Another thread may have created it while this one waited
        let _creating = injector.creating();
        if let Some(value) = self.services.lock().get(name) {
            debug!("Found in cache");
            return Ok(value.clone());
        }

        match injector.create(name, &Parameters::new()) {
            Ok(instance) => {
                let value = Value::Instance(instance);
                self.services.lock().insert(name.into(), value.clone());
                debug!("Cached");
                Ok(value)
            }
            Err(err) => {
                error!("{}", err);
                Err(LookupErrorKind::Create(Box::new(err)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{Container, DefaultContainer, INJECTOR_TYPE};
    use crate::{
        any::Instance,
        errors::{InstantiateErrorKind, LookupErrorKind},
        injector::Injector,
        instantiator::Arguments,
        registry::{Declaration, RegistryBuilder},
        utils::thread_safety::RcThreadSafety,
        value::Value,
        Config,
    };

    use core::sync::atomic::{AtomicU8, Ordering};
    use tracing_test::traced_test;
    #[allow(unused_imports)]
    use alloc::{format, string::{String, ToString}};

    struct Clock;

    #[test]
    #[traced_test]
    fn test_get_creates_once() {
        let calls = RcThreadSafety::new(AtomicU8::new(0));
        let registry = RegistryBuilder::new()
            .provide(Declaration::class("App.Clock"), {
                let calls = calls.clone();
                move |_: Arguments| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, InstantiateErrorKind>(Clock)
                }
            })
            .build();
        let injector = Injector::builder().definition(registry).config(Config::new()).build();
        let container = injector.container();

        let first = container.get("App.Clock").unwrap();
        let second = container.get("App.Clock").unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[traced_test]
    fn test_not_found() {
        let injector = Injector::builder().build();
        let container = injector.container();

        assert!(!container.has("App.Missing"));
        assert!(matches!(
            container.get("App.Missing"),
            Err(LookupErrorKind::NotFound { ref name }) if name == "App.Missing"
        ));
    }

    #[test]
    #[traced_test]
    fn test_set_instance() {
        let injector = Injector::builder().build();
        let container = DefaultContainer::new(RcThreadSafety::downgrade(&injector));
        let clock = Instance::new("App.Clock", Clock);

        container.set_instance("clock", clock.clone()).set_instance("answer", 42);

        assert!(container.has("clock"));
        assert_eq!(container.get("clock").unwrap(), Value::Instance(clock));
        assert_eq!(container.get("answer").unwrap(), Value::Int(42));
    }

    #[test]
    #[traced_test]
    fn test_injector_served() {
        let injector = Injector::builder().build();
        let container = injector.container();

        assert!(container.has(INJECTOR_TYPE));

        let served = container.get(INJECTOR_TYPE).unwrap();
        let instance = served.as_instance().unwrap();
        assert_eq!(instance.class(), INJECTOR_TYPE);
        assert!(RcThreadSafety::ptr_eq(&instance.downcast::<Injector>().unwrap(), &injector));

        drop(served);
        let weak = RcThreadSafety::downgrade(&injector);
        drop(injector);
        assert!(weak.upgrade().is_none());
        assert!(!container.has(INJECTOR_TYPE));
    }

    #[test]
    #[traced_test]
    fn test_dropped_injector() {
        let injector = Injector::builder().build();
        let container = DefaultContainer::new(RcThreadSafety::downgrade(&injector));
        drop(injector);

        assert!(!container.has("App.Clock"));
        assert!(!container.has(INJECTOR_TYPE));
        assert!(matches!(container.get("App.Clock"), Err(LookupErrorKind::NotFound { .. })));
    }
}
