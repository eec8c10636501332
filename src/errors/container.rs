use alloc::{boxed::Box, string::String};

use super::injector::InjectorErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum LookupErrorKind {
    #[error("Service {name} not found in container")]
    NotFound { name: String },
    #[error(transparent)]
    Create(Box<InjectorErrorKind>),
}
