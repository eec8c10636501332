use alloc::{string::String, vec::Vec};

use crate::{
    errors::ResolveErrorKind,
    instantiator::BoxedCloneInstantiator,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
    value::Value,
};

/// Parameter types that don't name a class or an interface
pub const BUILTIN_TYPES: [&str; 9] = ["string", "int", "bool", "float", "double", "array", "resource", "callable", "iterable"];

#[inline]
#[must_use]
pub fn is_builtin_type(type_name: &str) -> bool {
    BUILTIN_TYPES.contains(&type_name)
}

/// Constructor parameter metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    position: usize,
    type_name: Option<String>,
    required: bool,
    default: Value,
    builtin: bool,
}

impl Parameter {
    /// Untyped, required parameter.
    /// The position is assigned when the parameter is added to a declaration.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: 0,
            type_name: None,
            required: true,
            default: Value::Null,
            builtin: false,
        }
    }

    #[must_use]
    pub fn typed(mut self, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        self.builtin = is_builtin_type(&type_name);
        self.type_name = Some(type_name);
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.required = false;
        self.default = default.into();
        self
    }

    #[inline]
    #[must_use]
    pub(crate) fn at(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    #[must_use]
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    #[inline]
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }
}

/// Resolved metadata of a class.
///
/// ## Fields
/// - `supertypes`: parent classes, nearest first
/// - `interfaces`: every implemented interface, including inherited ones and the ones they extend
/// - `parameters`: constructor parameters sorted by position
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefinition {
    pub(crate) name: String,
    pub(crate) supertypes: Vec<String>,
    pub(crate) interfaces: Vec<String>,
    pub(crate) parameters: Vec<Parameter>,
}

impl ClassDefinition {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn supertypes(&self) -> &[String] {
        &self.supertypes
    }

    #[inline]
    #[must_use]
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Whether `type_name` is one of the supertypes or implemented interfaces
    #[must_use]
    pub fn is_subtype_of(&self, type_name: &str) -> bool {
        self.supertypes.iter().chain(&self.interfaces).any(|name| name == type_name)
    }
}

/// Class metadata provider.
///
/// The resolver and the injector only read metadata through this trait,
/// so a registry built by hand and a generated one are interchangeable.
pub trait Definition: SendSafety + SyncSafety {
    /// Names of all known classes
    fn classes(&self) -> Vec<String>;

    /// `true` if the name denotes a class, `false` for interfaces and unknown names
    fn has_class(&self, class: &str) -> bool;

    fn has_interface(&self, interface: &str) -> bool;

    /// Interfaces extended by the interface, transitively
    fn interface_parents(&self, interface: &str) -> Vec<String>;

    /// # Errors
    /// Returns [`ResolveErrorKind::ClassNotFound`] if [`Self::has_class`] is `false` for the name
    fn class_definition(&self, class: &str) -> Result<RcThreadSafety<ClassDefinition>, ResolveErrorKind>;

    /// Constructor of the class, `None` if the class can't be instantiated
    fn instantiator(&self, class: &str) -> Option<BoxedCloneInstantiator>;
}

#[cfg(test)]
mod tests {
    use super::{is_builtin_type, Parameter};
    use crate::value::Value;

    #[test]
    fn test_builtin_types() {
        assert!(is_builtin_type("string"));
        assert!(is_builtin_type("iterable"));
        assert!(!is_builtin_type("App.Logger"));
        assert!(!is_builtin_type("String"));
    }

    #[test]
    fn test_parameter_builder() {
        let parameter = Parameter::new("name");
        assert!(parameter.is_required());
        assert_eq!(parameter.type_name(), None);
        assert!(!parameter.is_builtin());

        let parameter = Parameter::new("name").typed("string").with_default("guest");
        assert!(!parameter.is_required());
        assert!(parameter.is_builtin());
        assert_eq!(parameter.default_value(), &Value::from("guest"));

        let parameter = Parameter::new("logger").typed("App.Logger");
        assert!(!parameter.is_builtin());
        assert_eq!(parameter.type_name(), Some("App.Logger"));
    }
}
