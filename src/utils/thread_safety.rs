#[cfg(feature = "thread_safe")]
mod thread_safe {
    use alloc::sync::{Arc, Weak};
    use core::any::Any;

    use crate::value::Value;

    pub trait SendSafety: Send {}
    pub trait SyncSafety: Sync {}

    impl<T: Send> SendSafety for T {}
    impl<T: Sync> SyncSafety for T {}

    pub type RcThreadSafety<T> = Arc<T>;
    pub type WeakThreadSafety<T> = Weak<T>;
    pub type RcAnyThreadSafety = RcThreadSafety<dyn Any + Send + Sync>;
    pub type RcCallableThreadSafety = RcThreadSafety<dyn Fn(&[Value]) -> Value + Send + Sync>;
}

#[cfg(not(feature = "thread_safe"))]
mod thread_unsafe {
    use alloc::rc::{Rc, Weak};
    use core::any::Any;

    use crate::value::Value;

    pub trait SendSafety {}
    pub trait SyncSafety {}

    impl<T> SendSafety for T {}
    impl<T> SyncSafety for T {}

    pub type RcThreadSafety<T> = Rc<T>;
    pub type WeakThreadSafety<T> = Weak<T>;
    pub type RcAnyThreadSafety = RcThreadSafety<dyn Any>;
    pub type RcCallableThreadSafety = RcThreadSafety<dyn Fn(&[Value]) -> Value>;
}

#[cfg(feature = "thread_safe")]
pub use thread_safe::{RcThreadSafety, RcAnyThreadSafety, RcCallableThreadSafety, SendSafety, SyncSafety, WeakThreadSafety};

#[cfg(not(feature = "thread_safe"))]
pub use thread_unsafe::{RcThreadSafety, RcAnyThreadSafety, RcCallableThreadSafety, SendSafety, SyncSafety, WeakThreadSafety};
