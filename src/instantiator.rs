use alloc::{
    boxed::Box,
    string::{String, ToString as _},
    vec::Vec,
};
use tracing::debug;

use crate::{
    any::Instance,
    container::Container,
    errors::InstantiateErrorKind,
    injector::Injector,
    service::{service_fn, BoxCloneService},
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
    value::Value,
};

/// Constructor of a declared class.
///
/// Implemented for every `FnMut(Arguments) -> Result<T, E>` closure, so registering a class
/// is usually just passing a closure that picks its arguments by parameter name.
pub trait Instantiator: Clone + 'static {
    type Provides: SendSafety + SyncSafety + 'static;
    type Error: Into<InstantiateErrorKind>;

    fn instantiate(&mut self, arguments: Arguments) -> Result<Self::Provides, Self::Error>;
}

impl<F, Response, Err> Instantiator for F
where
    F: FnMut(Arguments) -> Result<Response, Err> + Clone + 'static,
    Response: SendSafety + SyncSafety + 'static,
    Err: Into<InstantiateErrorKind>,
{
    type Provides = Response;
    type Error = Err;

    #[inline]
    fn instantiate(&mut self, arguments: Arguments) -> Result<Self::Provides, Self::Error> {
        self(arguments)
    }
}

pub type BoxedCloneInstantiator = BoxCloneService<Arguments, Instance, InstantiateErrorKind>;

/// Boxes an instantiator, tagging everything it builds with the class name
#[must_use]
pub fn boxed_instantiator<Inst>(class: impl Into<String>, instantiator: Inst) -> BoxedCloneInstantiator
where
    Inst: Instantiator + SendSafety + SyncSafety,
{
    let class: String = class.into();
    BoxCloneService(Box::new(service_fn({
        move |arguments: Arguments| -> Result<Instance, InstantiateErrorKind> {
            let dependency = instantiator.clone().instantiate(arguments).map_err(Into::into)?;

            debug!(class = class.as_str(), "Instantiated");

            Ok(Instance::new(class.as_str(), dependency))
        }
    })))
}

/// Realized constructor arguments in declaration order, addressable by parameter name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<(String, Value)>,
}

impl Arguments {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.values.push((name.into(), value));
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// # Errors
    /// Returns [`InstantiateErrorKind::MissingArgument`] if no argument with the name was passed
    pub fn get(&self, name: &str) -> Result<&Value, InstantiateErrorKind> {
        self.values
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value))
            .ok_or_else(|| InstantiateErrorKind::MissingArgument { name: name.to_string() })
    }

    /// Takes the argument out, leaving `Value::Null` in its place
    ///
    /// # Errors
    /// Returns [`InstantiateErrorKind::MissingArgument`] if no argument with the name was passed
    pub fn take(&mut self, name: &str) -> Result<Value, InstantiateErrorKind> {
        self.values
            .iter_mut()
            .find_map(|(key, value)| (key == name).then(|| core::mem::take(value)))
            .ok_or_else(|| InstantiateErrorKind::MissingArgument { name: name.to_string() })
    }

    /// Gets an object argument by its Rust type
    ///
    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if no argument with the name was passed
    /// - Returns [`InstantiateErrorKind::IncorrectType`] if the argument isn't an instance of `T`
    pub fn instance<T: SendSafety + SyncSafety + 'static>(&self, name: &str) -> Result<RcThreadSafety<T>, InstantiateErrorKind> {
        let value = self.get(name)?;
        value
            .as_instance()
            .and_then(Instance::downcast::<T>)
            .ok_or_else(|| incorrect_type(name, core::any::type_name::<T>(), value))
    }

    /// Gets the injected lookup service.
    ///
    /// An object that keeps the container and is itself cached in it forms a reference cycle
    /// that is never freed. Such objects should keep a [`crate::utils::thread_safety::WeakThreadSafety`]
    /// made with `downgrade` instead.
    ///
    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if no argument with the name was passed
    /// - Returns [`InstantiateErrorKind::IncorrectType`] if the argument isn't a container
    pub fn container(&self, name: &str) -> Result<RcThreadSafety<dyn Container>, InstantiateErrorKind> {
        self.instance::<RcThreadSafety<dyn Container>>(name).map(|container| (*container).clone())
    }

    /// Gets the injector passed for a parameter typed [`crate::INJECTOR_TYPE`].
    /// Keeping it in an object cached by the injector's container leaks both, as with [`Self::container`].
    ///
    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if no argument with the name was passed
    /// - Returns [`InstantiateErrorKind::IncorrectType`] if the argument isn't an injector
    pub fn injector(&self, name: &str) -> Result<RcThreadSafety<Injector>, InstantiateErrorKind> {
        self.instance::<Injector>(name)
    }

    /// # Errors
    /// Returns an error if the argument is missing or isn't a string
    pub fn string(&self, name: &str) -> Result<&str, InstantiateErrorKind> {
        let value = self.get(name)?;
        value.as_str().ok_or_else(|| incorrect_type(name, "string", value))
    }

    /// # Errors
    /// Returns an error if the argument is missing or isn't an int
    pub fn int(&self, name: &str) -> Result<i64, InstantiateErrorKind> {
        let value = self.get(name)?;
        value.as_int().ok_or_else(|| incorrect_type(name, "int", value))
    }

    /// # Errors
    /// Returns an error if the argument is missing or isn't a float or an int
    pub fn float(&self, name: &str) -> Result<f64, InstantiateErrorKind> {
        let value = self.get(name)?;
        value.as_float().ok_or_else(|| incorrect_type(name, "float", value))
    }

    /// # Errors
    /// Returns an error if the argument is missing or isn't a bool
    pub fn bool(&self, name: &str) -> Result<bool, InstantiateErrorKind> {
        let value = self.get(name)?;
        value.as_bool().ok_or_else(|| incorrect_type(name, "bool", value))
    }
}

fn incorrect_type(name: &str, expected: &'static str, value: &Value) -> InstantiateErrorKind {
    let actual = match value {
        Value::Instance(instance) => instance.type_info().name.to_string(),
        value => value.kind_name().to_string(),
    };
    InstantiateErrorKind::IncorrectType {
        name: name.to_string(),
        expected,
        actual,
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{boxed_instantiator, Arguments};
    use crate::{any::Instance, errors::InstantiateErrorKind, service::Service as _, utils::thread_safety::RcThreadSafety, value::Value};

    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicU8, Ordering};
    use tracing::debug;
    use tracing_test::traced_test;
    #[allow(unused_imports)]
    use alloc::{format, string::{String, ToString}};

    struct Database(&'static str);
    struct Repository(RcThreadSafety<Database>, i64);

    #[test]
    #[traced_test]
    fn test_boxed_instantiator() {
        let call_count = Arc::new(AtomicU8::new(0));

        let mut instantiator = boxed_instantiator("App.Repository", {
            let call_count = call_count.clone();
            move |arguments: Arguments| -> Result<_, InstantiateErrorKind> {
                call_count.fetch_add(1, Ordering::SeqCst);

                debug!("Call instantiator repository");
                Ok(Repository(arguments.instance("db")?, arguments.int("limit")?))
            }
        });

        let mut arguments = Arguments::new();
        arguments.push("db", Instance::new("App.Database", Database("sqlite")).into());
        arguments.push("limit", Value::from(10));

        let first = instantiator.call(arguments.clone()).unwrap();
        let second = instantiator.clone().call(arguments).unwrap();

        assert_eq!(first.class(), "App.Repository");
        assert!(!first.ptr_eq(&second));
        let repository = first.downcast::<Repository>().unwrap();
        assert_eq!(repository.0 .0, "sqlite");
        assert_eq!(repository.1, 10);
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_arguments_errors() {
        let mut arguments = Arguments::new();
        arguments.push("name", Value::from("guest"));
        arguments.push("db", Instance::new("App.Database", Database("pg")).into());

        assert!(matches!(arguments.get("other"), Err(InstantiateErrorKind::MissingArgument { .. })));
        assert!(matches!(
            arguments.int("name"),
            Err(InstantiateErrorKind::IncorrectType { expected: "int", ref actual, .. }) if actual == "string"
        ));
        assert!(matches!(arguments.instance::<Repository>("db"), Err(InstantiateErrorKind::IncorrectType { .. })));
        assert_eq!(arguments.string("name").unwrap(), "guest");
        assert_eq!(arguments.take("name").unwrap(), Value::from("guest"));
        assert_eq!(arguments.get("name").unwrap(), &Value::Null);
    }
}
