use alloc::string::String;
use core::{
    any::{type_name, TypeId},
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
};

use crate::{
    container::{Container, CONTAINER_TYPE, INJECTOR_TYPE},
    injector::Injector,
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit_once("::").map_or(self.name, |(_, name)| name)
    }
}

/// An object built by an instantiator or registered in a container by hand.
///
/// The class name is the name the object was declared with, which is what type checks use.
/// The payload is shared, so cloning an instance never clones the underlying object.
#[derive(Clone)]
pub struct Instance {
    class: RcThreadSafety<str>,
    type_info: TypeInfo,
    object: RcAnyThreadSafety,
}

impl Instance {
    #[inline]
    #[must_use]
    pub fn new<T: SendSafety + SyncSafety + 'static>(class: impl Into<String>, object: T) -> Self {
        Self::from_rc(class, RcThreadSafety::new(object))
    }

    #[inline]
    #[must_use]
    pub fn from_rc<T: SendSafety + SyncSafety + 'static>(class: impl Into<String>, object: RcThreadSafety<T>) -> Self {
        Self {
            class: RcThreadSafety::from(class.into()),
            type_info: TypeInfo::of::<T>(),
            object,
        }
    }

    /// Wraps a lookup service so it can be injected like any other object.
    /// Use [`crate::Arguments::container`] to take it back out in a constructor.
    #[inline]
    #[must_use]
    pub fn container(container: RcThreadSafety<dyn Container>) -> Self {
        Self::new(CONTAINER_TYPE, container)
    }

    /// Shares the injector itself, see [`crate::Arguments::injector`]
    #[inline]
    #[must_use]
    pub fn injector(injector: RcThreadSafety<Injector>) -> Self {
        Self::from_rc(INJECTOR_TYPE, injector)
    }

    #[inline]
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Type of the Rust payload, not to be confused with the declared class
    #[inline]
    #[must_use]
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[must_use]
    pub fn downcast<T: SendSafety + SyncSafety + 'static>(&self) -> Option<RcThreadSafety<T>> {
        self.object.clone().downcast().ok()
    }

    #[inline]
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_info.id == TypeId::of::<T>()
    }

    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        RcThreadSafety::ptr_eq(&self.object, &other.object)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &&*self.class)
            .field("type", &self.type_info.short_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{Instance, TypeInfo};
    use crate::utils::thread_safety::RcThreadSafety;

    struct Mailer(u8);

    #[test]
    fn test_type_info_short_name() {
        assert_eq!(TypeInfo::of::<Mailer>().short_name(), "Mailer");
        assert_eq!(TypeInfo::of::<u8>().short_name(), "u8");
    }

    #[test]
    fn test_downcast() {
        let instance = Instance::new("App.Mailer", Mailer(7));

        assert_eq!(instance.class(), "App.Mailer");
        assert!(instance.is::<Mailer>());
        assert_eq!(instance.downcast::<Mailer>().unwrap().0, 7);
        assert!(instance.downcast::<u8>().is_none());
    }

    #[test]
    fn test_clone_shares_object() {
        let object = RcThreadSafety::new(Mailer(1));
        let instance = Instance::from_rc("App.Mailer", object.clone());
        let cloned = instance.clone();

        assert!(instance.ptr_eq(&cloned));
        assert!(RcThreadSafety::ptr_eq(&object, &cloned.downcast::<Mailer>().unwrap()));
        assert_ne!(instance, Instance::new("App.Mailer", Mailer(1)));
    }
}
