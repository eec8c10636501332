mod config;
mod container;
mod dependency_resolver;
mod injection;
mod injector;
mod instantiate;

pub use config::ConfigErrorKind;
pub use container::LookupErrorKind;
pub use dependency_resolver::ResolveErrorKind;
pub use injection::ExportErrorKind;
pub use injector::InjectorErrorKind;
pub use instantiate::InstantiateErrorKind;
