use alloc::{collections::BTreeMap, string::String, vec::Vec};
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::{
    definition::{ClassDefinition, Definition, Parameter},
    errors::ResolveErrorKind,
    instantiator::{boxed_instantiator, BoxedCloneInstantiator, Instantiator},
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Class,
    Interface,
}

/// Static description of a class or an interface
#[derive(Debug, Clone)]
pub struct Declaration {
    name: String,
    kind: Kind,
    parent: Option<String>,
    interfaces: Vec<String>,
    parameters: Vec<Parameter>,
}

impl Declaration {
    #[inline]
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name.into(), Kind::Class)
    }

    #[inline]
    #[must_use]
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name.into(), Kind::Interface)
    }

    fn new(name: String, kind: Kind) -> Self {
        Self {
            name,
            kind,
            parent: None,
            interfaces: Vec::new(),
            parameters: Vec::new(),
        }
    }

    /// Sets the parent class of a class, adds an extended interface to an interface
    #[must_use]
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        match self.kind {
            Kind::Class => self.parent = Some(parent.into()),
            Kind::Interface => self.interfaces.push(parent.into()),
        }
        self
    }

    /// Declaring `callable` or `iterable` makes instances of the class satisfy these builtin types
    #[must_use]
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Adds the next constructor parameter
    #[must_use]
    pub fn param(mut self, parameter: Parameter) -> Self {
        let position = self.parameters.len();
        self.parameters.push(parameter.at(position));
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    declarations: BTreeMap<String, Declaration>,
    instantiators: BTreeMap<String, BoxedCloneInstantiator>,
}

impl RegistryBuilder {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            declarations: BTreeMap::new(),
            instantiators: BTreeMap::new(),
        }
    }

    /// Adds an interface or a class that can't be instantiated by itself
    #[inline]
    #[must_use]
    pub fn declare(mut self, declaration: Declaration) -> Self {
        self.instantiators.remove(&declaration.name);
        self.declarations.insert(declaration.name.clone(), declaration);
        self
    }

    /// Adds an instantiable class with its constructor
    #[inline]
    #[must_use]
    pub fn provide<Inst>(mut self, declaration: Declaration, instantiator: Inst) -> Self
    where
        Inst: Instantiator + SendSafety + SyncSafety,
    {
        self.instantiators
            .insert(declaration.name.clone(), boxed_instantiator(declaration.name.clone(), instantiator));
        self.declarations.insert(declaration.name.clone(), declaration);
        self
    }

    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            declarations: self.declarations,
            instantiators: self.instantiators,
            definitions: Mutex::new(BTreeMap::new()),
        }
    }
}

/// Class metadata built from declarations.
/// Class definitions are computed on first request and cached.
pub struct Registry {
    declarations: BTreeMap<String, Declaration>,
    instantiators: BTreeMap<String, BoxedCloneInstantiator>,
    definitions: Mutex<BTreeMap<String, RcThreadSafety<ClassDefinition>>>,
}

impl Default for Registry {
    fn default() -> Self {
        RegistryBuilder::new().build()
    }
}

impl Registry {
    #[inline]
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    fn declaration(&self, name: &str, kind: Kind) -> Option<&Declaration> {
        self.declarations.get(name).filter(|declaration| declaration.kind == kind)
    }

    /// Parent classes, nearest first. Stops at an undeclared parent or a repeated one.
    fn supertypes(&self, declaration: &Declaration) -> Vec<String> {
        let mut supertypes: Vec<String> = Vec::new();
        let mut parent = declaration.parent.as_ref();

        while let Some(name) = parent {
            if *name == declaration.name || supertypes.contains(name) {
                break;
            }
            supertypes.push(name.clone());
            parent = self.declaration(name, Kind::Class).and_then(|parent| parent.parent.as_ref());
        }

        supertypes
    }

    fn push_interfaces(&self, interfaces: &mut Vec<String>, names: &[String]) {
        for name in names {
            if interfaces.contains(name) {
                continue;
            }
            interfaces.push(name.clone());

            if let Some(interface) = self.declaration(name, Kind::Interface) {
                self.push_interfaces(interfaces, &interface.interfaces);
            }
        }
    }

    fn build_definition(&self, declaration: &Declaration) -> ClassDefinition {
        let supertypes = self.supertypes(declaration);

        let mut interfaces = Vec::new();
        self.push_interfaces(&mut interfaces, &declaration.interfaces);
        for supertype in &supertypes {
            if let Some(parent) = self.declaration(supertype, Kind::Class) {
                self.push_interfaces(&mut interfaces, &parent.interfaces);
            }
        }

        let mut parameters = declaration.parameters.clone();
        parameters.sort_by_key(Parameter::position);

        ClassDefinition {
            name: declaration.name.clone(),
            supertypes,
            interfaces,
            parameters,
        }
    }
}

impl Definition for Registry {
    fn classes(&self) -> Vec<String> {
        self.declarations
            .values()
            .filter(|declaration| declaration.kind == Kind::Class)
            .map(|declaration| declaration.name.clone())
            .collect()
    }

    fn has_class(&self, class: &str) -> bool {
        self.declaration(class, Kind::Class).is_some()
    }

    fn has_interface(&self, interface: &str) -> bool {
        self.declaration(interface, Kind::Interface).is_some()
    }

    fn interface_parents(&self, interface: &str) -> Vec<String> {
        let mut parents = Vec::new();
        if let Some(declaration) = self.declaration(interface, Kind::Interface) {
            self.push_interfaces(&mut parents, &declaration.interfaces);
        }
        parents.retain(|parent| parent != interface);
        parents
    }

    fn class_definition(&self, class: &str) -> Result<RcThreadSafety<ClassDefinition>, ResolveErrorKind> {
        let Some(declaration) = self.declaration(class, Kind::Class) else {
            let err = ResolveErrorKind::ClassNotFound { class: class.into() };
            error!("{}", err);
            return Err(err);
        };

        let mut definitions = self.definitions.lock();
        if let Some(definition) = definitions.get(class) {
            return Ok(definition.clone());
        }

        let definition = RcThreadSafety::new(self.build_definition(declaration));
        definitions.insert(class.into(), definition.clone());
        debug!(class, "Class definition cached");

        Ok(definition)
    }

    fn instantiator(&self, class: &str) -> Option<BoxedCloneInstantiator> {
        if !self.has_class(class) {
            return None;
        }
        self.instantiators.get(class).cloned()
    }
}
