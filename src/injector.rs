use alloc::{string::String, vec::Vec};
use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard};
use tracing::{debug, error, info_span};

use crate::{
    any::Instance,
    config::{Config, Configuration},
    container::{Container, DefaultContainer, CONTAINER_TYPE},
    definition::Definition,
    dependency_resolver::{DependencyResolver, Resolver},
    errors::{InjectorErrorKind, LookupErrorKind},
    injection::Injection,
    instantiator::Arguments,
    registry::Registry,
    service::Service as _,
    utils::thread_safety::RcThreadSafety,
    value::Value,
    Parameters,
};

/// Creates objects of declared classes, resolving their constructor parameters.
///
/// Type references are realized through the container, which by default is a
/// [`DefaultContainer`] that creates every type once through this injector.
pub struct Injector {
    definition: RcThreadSafety<dyn Definition>,
    config: RcThreadSafety<dyn Configuration>,
    resolver: RcThreadSafety<dyn DependencyResolver>,
    container: Mutex<RcThreadSafety<dyn Container>>,
    creating: ReentrantMutex<()>,
    stack: Mutex<Vec<String>>,
}

impl Injector {
    #[inline]
    #[must_use]
    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::default()
    }

    #[inline]
    #[must_use]
    pub fn definition(&self) -> &RcThreadSafety<dyn Definition> {
        &self.definition
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &RcThreadSafety<dyn Configuration> {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &RcThreadSafety<dyn DependencyResolver> {
        &self.resolver
    }

    #[inline]
    #[must_use]
    pub fn container(&self) -> RcThreadSafety<dyn Container> {
        self.container.lock().clone()
    }

    /// Replaces the container used to realize type references, the resolver gets it too
    pub fn set_container(&self, container: RcThreadSafety<dyn Container>) {
        self.resolver.set_container(container.clone());
        *self.container.lock() = container;
    }

    fn class_for(&self, name: &str) -> String {
        self.config.class_for_alias(name).unwrap_or_else(|| name.into())
    }

    /// Whether the name is an instantiable class or an alias of one
    #[must_use]
    pub fn can_create(&self, name: &str) -> bool {
        let class = self.class_for(name);
        self.definition.has_class(&class) && self.definition.instantiator(&class).is_some()
    }

    /// Creates a new object of the class or alias.
    /// Call-time parameters take precedence over everything configured.
    ///
    /// Creates are serialized per injector, nested creates of the calling thread re-enter.
    /// A constructor must not wait on another thread that creates through the same injector.
    ///
    /// # Errors
    /// - Returns [`InjectorErrorKind::CircularDependency`] if the name is already being created
    /// - Returns [`InjectorErrorKind::ClassNotFound`] or [`InjectorErrorKind::NotInstantiable`] if the class can't be created
    /// - Returns [`InjectorErrorKind::Resolve`] if constructor parameters can't be resolved
    /// - Returns [`InjectorErrorKind::UndefinedReference`] if the container doesn't know a referenced type
    /// - Returns [`InjectorErrorKind::Instantiate`] if the constructor fails
    pub fn create(&self, name: &str, parameters: &Parameters) -> Result<Instance, InjectorErrorKind> {
        let class = self.class_for(name);

        let span = info_span!("create", name, class = class.as_str());
        let _guard = span.enter();

        let _creating = self.creating();
        let _frame = self.enter(name)?;

        if !self.definition.has_class(&class) {
            let err = InjectorErrorKind::ClassNotFound {
                alias: (class != name).then(|| name.into()),
                class,
            };
            error!("{}", err);
            return Err(err);
        }

        let Some(mut instantiator) = self.definition.instantiator(&class) else {
            let err = InjectorErrorKind::NotInstantiable { class };
            error!("{}", err);
            return Err(err);
        };

        let injections = self.resolver.resolve_parameters(name, parameters).map_err(|err| {
            error!("{}", err);
            InjectorErrorKind::from(err)
        })?;
        debug!(count = injections.len(), "Parameters resolved");

        let container = self.container();
        let mut arguments = Arguments::new();
        for injection in &injections {
            let value = self.realize(injection.injection(), &container)?;
            arguments.push(injection.parameter_name(), value);
        }

        match instantiator.call(arguments) {
            Ok(instance) => {
                debug!("Created");
                Ok(instance)
            }
            Err(source) => {
                let err = InjectorErrorKind::Instantiate { class, source };
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Held for the whole of a create, the instantiation stack belongs to the holding thread
    pub(crate) fn creating(&self) -> ReentrantMutexGuard<'_, ()> {
        self.creating.lock()
    }

    fn enter(&self, name: &str) -> Result<StackFrame<'_>, InjectorErrorKind> {
        let mut stack = self.stack.lock();

        if stack.iter().any(|entry| entry == name) {
            let mut chain = stack.clone();
            chain.push(name.into());

            let err = InjectorErrorKind::CircularDependency { chain };
            error!("{}", err);
            return Err(err);
        }
        stack.push(name.into());

        Ok(StackFrame { stack: &self.stack })
    }

    fn realize(&self, injection: &Injection, container: &RcThreadSafety<dyn Container>) -> Result<Value, InjectorErrorKind> {
        if let Injection::Type(type_name) = injection {
            if type_name == CONTAINER_TYPE && !container.has(type_name) {
                debug!("Container injected");
                return Ok(Value::Instance(Instance::container(container.clone())));
            }
        }

        injection.to_value(&**container).map_err(|err| match err {
            LookupErrorKind::NotFound { .. } => {
                let err = InjectorErrorKind::UndefinedReference { source: err };
                error!("{}", err);
                err
            }
            LookupErrorKind::Create(err) => *err,
        })
    }
}

/// Pops its name from the instantiation stack when dropped
struct StackFrame<'a> {
    stack: &'a Mutex<Vec<String>>,
}

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        self.stack.lock().pop();
    }
}

#[derive(Default)]
pub struct InjectorBuilder {
    definition: Option<RcThreadSafety<dyn Definition>>,
    config: Option<RcThreadSafety<dyn Configuration>>,
    resolver: Option<RcThreadSafety<dyn DependencyResolver>>,
    container: Option<RcThreadSafety<dyn Container>>,
}

impl InjectorBuilder {
    #[inline]
    #[must_use]
    pub fn definition(mut self, definition: impl Definition + 'static) -> Self {
        self.definition = Some(RcThreadSafety::new(definition));
        self
    }

    #[inline]
    #[must_use]
    pub fn config(mut self, config: impl Configuration + 'static) -> Self {
        self.config = Some(RcThreadSafety::new(config));
        self
    }

    /// Replaces the default [`Resolver`], which is built from the definition and the config otherwise
    #[inline]
    #[must_use]
    pub fn resolver(mut self, resolver: impl DependencyResolver + 'static) -> Self {
        self.resolver = Some(RcThreadSafety::new(resolver));
        self
    }

    /// Replaces the default [`DefaultContainer`]
    #[inline]
    #[must_use]
    pub fn container(mut self, container: impl Container + 'static) -> Self {
        self.container = Some(RcThreadSafety::new(container));
        self
    }

    #[must_use]
    pub fn build(self) -> RcThreadSafety<Injector> {
        let definition: RcThreadSafety<dyn Definition> = match self.definition {
            Some(definition) => definition,
            None => RcThreadSafety::new(Registry::default()),
        };
        let config: RcThreadSafety<dyn Configuration> = match self.config {
            Some(config) => config,
            None => RcThreadSafety::new(Config::new()),
        };
        let resolver: RcThreadSafety<dyn DependencyResolver> = match self.resolver {
            Some(resolver) => resolver,
            None => RcThreadSafety::new(Resolver::new(definition.clone(), config.clone())),
        };
        let container = self.container;

        RcThreadSafety::new_cyclic(|injector| {
            let container: RcThreadSafety<dyn Container> = match container {
                Some(container) => container,
                None => RcThreadSafety::new(DefaultContainer::new(injector.clone())),
            };
            resolver.set_container(container.clone());

            Injector {
                definition,
                config,
                resolver,
                container: Mutex::new(container),
                creating: ReentrantMutex::new(()),
                stack: Mutex::new(Vec::new()),
            }
        })
    }
}
