use alloc::{
    string::{String, ToString as _},
    vec::{self, Vec},
};

use crate::{
    container::Container,
    errors::{ExportErrorKind, LookupErrorKind},
    value::Value,
};

/// What gets injected into a constructor parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Injection {
    /// Passed as is
    Value(Value),
    /// Looked up in the container by type name
    Type(String),
}

impl Injection {
    /// Whether the injection can be written out as a literal by a code generator
    #[must_use]
    pub fn is_exportable(&self) -> bool {
        match self {
            Self::Value(value) => value.to_json().is_some(),
            Self::Type(_) => true,
        }
    }

    /// Literal form of the injection, a JSON scalar or the quoted type name
    ///
    /// # Errors
    /// Returns [`ExportErrorKind::NotExportable`] if the value is neither a scalar nor null
    pub fn export(&self) -> Result<String, ExportErrorKind> {
        match self {
            Self::Value(value) => value
                .to_json()
                .map(|json| json.to_string())
                .ok_or(ExportErrorKind::NotExportable { kind: value.kind_name() }),
            Self::Type(type_name) => Ok(serde_json::Value::String(type_name.clone()).to_string()),
        }
    }

    /// # Errors
    /// Returns an error if the container can't provide the referenced type
    pub fn to_value(&self, container: &dyn Container) -> Result<Value, LookupErrorKind> {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Type(type_name) => container.get(type_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInjection {
    name: String,
    injection: Injection,
}

impl ParameterInjection {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, injection: Injection) -> Self {
        Self {
            name: name.into(),
            injection,
        }
    }

    #[inline]
    #[must_use]
    pub fn parameter_name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn injection(&self) -> &Injection {
        &self.injection
    }
}

/// Resolved injections in constructor order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Injections(Vec<ParameterInjection>);

impl Injections {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn push(&mut self, name: impl Into<String>, injection: Injection) {
        self.0.push(ParameterInjection::new(name, injection));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Injection> {
        self.0
            .iter()
            .find(|injection| injection.name == name)
            .map(ParameterInjection::injection)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, ParameterInjection> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(ParameterInjection::parameter_name)
    }
}

impl IntoIterator for Injections {
    type Item = ParameterInjection;
    type IntoIter = vec::IntoIter<ParameterInjection>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Injections {
    type Item = &'a ParameterInjection;
    type IntoIter = core::slice::Iter<'a, ParameterInjection>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
