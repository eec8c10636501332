#![no_std]

extern crate alloc;

#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod definition;
pub(crate) mod dependency_resolver;
pub(crate) mod errors;
pub(crate) mod injection;
pub(crate) mod injector;
pub(crate) mod instantiator;
pub(crate) mod registry;
pub(crate) mod service;
pub(crate) mod value;

pub mod utils;

pub use any::{Instance, TypeInfo};
pub use config::{Config, ConfigValue, Configuration, TypeConfig, AUTO};
pub use container::{Container, DefaultContainer, CONTAINER_TYPE, INJECTOR_TYPE};
pub use definition::{is_builtin_type, ClassDefinition, Definition, Parameter, BUILTIN_TYPES};
pub use dependency_resolver::{DependencyResolver, Resolver};
pub use errors::{ConfigErrorKind, ExportErrorKind, InjectorErrorKind, InstantiateErrorKind, LookupErrorKind, ResolveErrorKind};
pub use injection::{Injection, Injections, ParameterInjection};
pub use injector::{Injector, InjectorBuilder};
pub use instantiator::{boxed_instantiator, Arguments, BoxedCloneInstantiator, Instantiator};
pub use registry::{Declaration, Registry, RegistryBuilder};
pub use value::{Callable, Value};

/// Call-time constructor parameters by name
pub type Parameters = alloc::collections::BTreeMap<alloc::string::String, Value>;
