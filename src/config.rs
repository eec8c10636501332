use alloc::{collections::BTreeMap, string::String, vec::Vec};
use serde::Deserialize;

use crate::{
    errors::ConfigErrorKind,
    injection::Injection,
    utils::thread_safety::{SendSafety, SyncSafety},
    value::Value,
};

/// Configured value that forces auto resolution of a parameter
pub const AUTO: &str = "*";

/// Rules the resolver follows: aliases, parameter overrides and type preferences
pub trait Configuration: SendSafety + SyncSafety {
    fn is_alias(&self, name: &str) -> bool;

    /// Class the alias points to, `None` if the name isn't an alias
    fn class_for_alias(&self, name: &str) -> Option<String>;

    /// Configured constructor parameters of a type or an alias
    fn parameters(&self, type_name: &str) -> BTreeMap<String, ConfigValue>;

    /// Preferred implementation of the type.
    /// With a context only the preferences scoped to that type are looked at.
    fn type_preference(&self, type_name: &str, context: Option<&str>) -> Option<String>;

    fn configured_type_names(&self) -> Vec<String>;
}

/// Raw configured parameter value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum ConfigValue {
    Value(Value),
    /// Used as is, without type checks
    Injection(Injection),
}

impl ConfigValue {
    #[inline]
    #[must_use]
    pub fn auto() -> Self {
        Self::Value(Value::String(AUTO.into()))
    }

    #[inline]
    #[must_use]
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Value(Value::String(val)) if val == AUTO)
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Injection> for ConfigValue {
    fn from(injection: Injection) -> Self {
        Self::Injection(injection)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeConfig {
    /// Alias target
    pub type_of: Option<String>,
    pub parameters: BTreeMap<String, ConfigValue>,
    /// Preferences applied when this type is the requesting context
    pub preferences: BTreeMap<String, String>,
}

/// Default configuration.
///
/// Deserializes from a document like:
/// ```json
/// {
///     "preferences": { "App.Logger": "App.FileLogger" },
///     "types": {
///         "App.Mailer": { "parameters": { "host": "localhost" } },
///         "App.AdminMailer": { "typeOf": "App.Mailer", "preferences": { "App.Logger": "App.NullLogger" } }
///     }
/// }
/// ```
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    preferences: BTreeMap<String, String>,
    types: BTreeMap<String, TypeConfig>,
}

impl Config {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns [`ConfigErrorKind::Parse`] if the document isn't a valid configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigErrorKind> {
        serde_json::from_str(json).map_err(Into::into)
    }

    #[inline]
    #[must_use]
    pub fn type_config(&self, name: &str) -> Option<&TypeConfig> {
        self.types.get(name)
    }

    /// Replaces all configured parameters of the type
    pub fn set_parameters<K, V>(&mut self, type_name: impl Into<String>, parameters: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<ConfigValue>,
    {
        self.types.entry(type_name.into()).or_default().parameters = parameters
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        self
    }

    pub fn set_type_preference(
        &mut self,
        type_name: impl Into<String>,
        preference: impl Into<String>,
        context: Option<&str>,
    ) -> &mut Self {
        let preferences = match context {
            Some(context) => &mut self.types.entry(context.into()).or_default().preferences,
            None => &mut self.preferences,
        };
        preferences.insert(type_name.into(), preference.into());
        self
    }

    pub fn set_alias(&mut self, name: impl Into<String>, class: impl Into<String>) -> &mut Self {
        self.types.entry(name.into()).or_default().type_of = Some(class.into());
        self
    }
}

fn non_empty(preference: Option<&String>) -> Option<String> {
    preference.filter(|preference| !preference.is_empty()).cloned()
}

impl Configuration for Config {
    fn is_alias(&self, name: &str) -> bool {
        self.class_for_alias(name).is_some()
    }

    fn class_for_alias(&self, name: &str) -> Option<String> {
        non_empty(self.types.get(name)?.type_of.as_ref())
    }

    fn parameters(&self, type_name: &str) -> BTreeMap<String, ConfigValue> {
        self.types.get(type_name).map(|config| config.parameters.clone()).unwrap_or_default()
    }

    fn type_preference(&self, type_name: &str, context: Option<&str>) -> Option<String> {
        match context {
            Some(context) => non_empty(self.types.get(context)?.preferences.get(type_name)),
            None => non_empty(self.preferences.get(type_name)),
        }
    }

    fn configured_type_names(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }
}
