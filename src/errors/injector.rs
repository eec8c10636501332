use alloc::{string::String, vec::Vec};

use super::{container::LookupErrorKind, dependency_resolver::ResolveErrorKind, instantiate::InstantiateErrorKind};

#[derive(thiserror::Error, Debug)]
pub enum InjectorErrorKind {
    #[error("Circular dependency: {}", .chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },
    #[error(
        "Class {class}{} could not be located in provided definitions.",
        .alias.as_ref().map(|alias| alloc::format!(" (specified by alias {alias})")).unwrap_or_default()
    )]
    ClassNotFound { class: String, alias: Option<String> },
    #[error("Class or interface by name {class} can't be instantiated")]
    NotInstantiable { class: String },
    #[error("Undefined reference: {source}")]
    UndefinedReference { source: LookupErrorKind },
    #[error(transparent)]
    Resolve(#[from] ResolveErrorKind),
    #[error("Instantiation of {class} failed: {source}")]
    Instantiate { class: String, source: InstantiateErrorKind },
}
