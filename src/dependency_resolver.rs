use alloc::{
    collections::BTreeMap,
    string::{String, ToString as _},
    vec::Vec,
};
use parking_lot::Mutex;
use tracing::{debug, error, info_span};

use crate::{
    config::{ConfigValue, Configuration},
    container::{Container, CONTAINER_TYPE},
    definition::{ClassDefinition, Definition},
    errors::ResolveErrorKind,
    injection::{Injection, Injections},
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
    value::Value,
    Parameters,
};

/// Decides what to inject into each constructor parameter of a type
pub trait DependencyResolver: SendSafety + SyncSafety {
    /// Resolves constructor injections of the type or alias, in constructor order
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::ClassNotFound`] if the type isn't an instantiable class
    /// - Returns [`ResolveErrorKind::UnexpectedValue`] if a configured value doesn't fit its parameter
    /// - Returns [`ResolveErrorKind::MissingProperty`] if a required parameter can't be resolved
    fn resolve_parameters(&self, requested: &str, parameters: &Parameters) -> Result<Injections, ResolveErrorKind>;

    /// Preferred implementation of the type, optionally in the context of a requesting type
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::ClassNotFound`] if the context isn't a class
    fn resolve_preference(&self, type_name: &str, context: Option<&str>) -> Result<Option<String>, ResolveErrorKind>;

    /// Sets the lookup service used to check which types are available
    fn set_container(&self, container: RcThreadSafety<dyn Container>);
}

/// Default resolver working on class metadata and configuration
pub struct Resolver {
    definition: RcThreadSafety<dyn Definition>,
    config: RcThreadSafety<dyn Configuration>,
    container: Mutex<Option<RcThreadSafety<dyn Container>>>,
}

impl Resolver {
    #[inline]
    #[must_use]
    pub fn new(definition: RcThreadSafety<dyn Definition>, config: RcThreadSafety<dyn Configuration>) -> Self {
        Self {
            definition,
            config,
            container: Mutex::new(None),
        }
    }

    #[inline]
    fn container(&self) -> Option<RcThreadSafety<dyn Container>> {
        self.container.lock().clone()
    }

    fn class_for(&self, name: &str) -> String {
        self.config.class_for_alias(name).unwrap_or_else(|| name.to_string())
    }

    /// Configured parameters of the requested type.
    /// Alias values win over class values, class values win over supertype values, nearest supertype first.
    fn configured_parameters(&self, requested: &str, definition: &ClassDefinition) -> BTreeMap<String, ConfigValue> {
        let mut parameters = self.config.parameters(definition.name());
        if requested != definition.name() {
            parameters.extend(self.config.parameters(requested));
        }

        for supertype in definition.supertypes() {
            for (name, value) in self.config.parameters(supertype) {
                parameters.entry(name).or_insert(value);
            }
        }

        parameters.retain(|_, value| !value.is_auto());
        parameters
    }

    fn is_type_of(&self, type_name: &str, required: &str) -> bool {
        let type_name = self.class_for(type_name);

        if type_name == required {
            return true;
        }
        if self.definition.has_interface(&type_name) && self.definition.has_interface(required) {
            return self.definition.interface_parents(&type_name).iter().any(|parent| parent == required);
        }
        if !self.definition.has_class(&type_name) {
            return false;
        }

        self.definition
            .class_definition(&type_name)
            .is_ok_and(|definition| definition.is_subtype_of(required))
    }

    fn is_usable_type(&self, type_name: &str, required: &str) -> bool {
        self.is_type_of(type_name, required) && self.container().map_or(true, |container| container.has(type_name))
    }

    fn is_value_of(&self, value: &Value, required: &str) -> bool {
        let is_instance_of = |value: &Value| value.as_instance().is_some_and(|instance| self.is_type_of(instance.class(), required));

        match required {
            "string" => matches!(value, Value::String(_)),
            "int" => matches!(value, Value::Int(_)),
            "bool" => matches!(value, Value::Bool(_)),
            "float" | "double" => matches!(value, Value::Float(_) | Value::Int(_)),
            "array" => matches!(value, Value::Array(_) | Value::Map(_)),
            "callable" => matches!(value, Value::Callable(_)) || is_instance_of(value),
            "iterable" => matches!(value, Value::Array(_) | Value::Map(_)) || is_instance_of(value),
            "resource" => false,
            _ => is_instance_of(value),
        }
    }

    /// Turns a configured value into an injection, `None` if it doesn't fit the required type
    fn prepare_injection(&self, value: ConfigValue, required: Option<&str>) -> Option<Injection> {
        let value = match value {
            ConfigValue::Injection(injection) => return Some(injection),
            ConfigValue::Value(value) => value,
        };

        let Some(required) = required else {
            return match value {
                Value::String(name) if self.container().is_some_and(|container| container.has(&name)) => Some(Injection::Type(name)),
                value => Some(Injection::Value(value)),
            };
        };

        match value {
            Value::String(name) if required != "string" => self.is_usable_type(&name, required).then_some(Injection::Type(name)),
            value => self.is_value_of(&value, required).then_some(Injection::Value(value)),
        }
    }

    fn usable_preference(&self, type_name: &str, context: Option<&str>) -> Option<String> {
        self.config
            .type_preference(type_name, context)
            .filter(|preference| self.is_usable_type(preference, type_name))
    }
}

impl DependencyResolver for Resolver {
    fn resolve_parameters(&self, requested: &str, parameters: &Parameters) -> Result<Injections, ResolveErrorKind> {
        let span = info_span!("resolve_parameters", requested);
        let _guard = span.enter();

        let class = self.class_for(requested);
        let definition = self.definition.class_definition(&class)?;
        let mut injections = Injections::new();

        if definition.parameters().is_empty() {
            debug!("No constructor parameters");
            return Ok(injections);
        }

        let mut configured = self.configured_parameters(requested, &definition);

        for parameter in definition.parameters() {
            let name = parameter.name();
            let type_name = parameter.type_name();

            if let Some(value) = parameters.get(name) {
                debug!(parameter = name, "Call-time value");
                injections.push(name, Injection::Value(value.clone()));
                continue;
            }

            if let Some(value) = configured.remove(name) {
                let Some(injection) = self.prepare_injection(value, type_name) else {
                    let err = ResolveErrorKind::UnexpectedValue {
                        parameter: name.into(),
                        type_name: type_name.unwrap_or_default().into(),
                    };
                    error!("{}", err);
                    return Err(err);
                };

                debug!(parameter = name, "Configured value");
                injections.push(name, injection);
                continue;
            }

            if let Some(type_name) = type_name.filter(|_| !parameter.is_builtin()) {
                if let Some(preference) = self.resolve_preference(type_name, Some(requested))? {
                    debug!(parameter = name, preference = preference.as_str(), "Type preference");
                    injections.push(name, Injection::Type(preference));
                    continue;
                }

                if type_name == CONTAINER_TYPE || self.container().map_or(true, |container| container.has(type_name)) {
                    debug!(parameter = name, "Parameter type");
                    injections.push(name, Injection::Type(type_name.into()));
                    continue;
                }
            }

            if parameter.is_required() {
                let err = ResolveErrorKind::MissingProperty {
                    parameter: name.into(),
                    type_name: type_name.unwrap_or("any").into(),
                    class: class.clone(),
                    requested: requested.into(),
                };
                error!("{}", err);
                return Err(err);
            }

            debug!(parameter = name, "Default value");
            injections.push(name, Injection::Value(parameter.default_value().clone()));
        }

        Ok(injections)
    }

    fn resolve_preference(&self, type_name: &str, context: Option<&str>) -> Result<Option<String>, ResolveErrorKind> {
        if let Some(context) = context {
            let class = self.class_for(context);
            let definition = self.definition.class_definition(&class)?;

            let mut contexts: Vec<&str> = Vec::with_capacity(2 + definition.supertypes().len() + definition.interfaces().len());
            contexts.push(context);
            if class != context {
                contexts.push(&class);
            }
            contexts.extend(definition.supertypes().iter().map(String::as_str));
            contexts.extend(definition.interfaces().iter().map(String::as_str));

            for context in contexts {
                if let Some(preference) = self.usable_preference(type_name, Some(context)) {
                    return Ok(Some(preference));
                }
            }
        }

        Ok(self.usable_preference(type_name, None))
    }

    fn set_container(&self, container: RcThreadSafety<dyn Container>) {
        *self.container.lock() = Some(container);
    }
}
