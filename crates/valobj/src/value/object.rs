//! Shared objects stored in `Object` fields.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// An object-safe value with equality and hashing.
///
/// Blanket-implemented for every `Eq + Hash + Debug + Send + Sync` type, so
/// strings, collections, and immutable value objects can all be stored in
/// `Object` fields and compared by value.
pub trait ObjectValue: Any + fmt::Debug + Send + Sync {
    /// Value equality against another object of any type.
    fn dyn_eq(&self, other: &dyn ObjectValue) -> bool;

    /// Feed this value into `state`.
    fn dyn_hash(&self, state: &mut dyn Hasher);

    fn as_any(&self) -> &dyn Any;
}

impl<T> ObjectValue for T
where
    T: Any + fmt::Debug + Eq + Hash + Send + Sync,
{
    fn dyn_eq(&self, other: &dyn ObjectValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Strong reference to a shared object.
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn ObjectValue>);

impl ObjectRef {
    /// Share `value` as an object.
    ///
    /// An `ObjectRef` passed in is returned as is rather than nested.
    pub fn new<T: ObjectValue>(value: T) -> Self {
        let object: Arc<dyn ObjectValue> = Arc::new(value);
        if let Some(inner) = (*object).as_any().downcast_ref::<ObjectRef>() {
            return inner.clone();
        }
        ObjectRef(object)
    }

    pub fn from_arc(value: Arc<dyn ObjectValue>) -> Self {
        ObjectRef(value)
    }

    /// Borrow the object as a `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    /// Whether both references point at the same allocation.
    pub fn ptr_eq(a: &ObjectRef, b: &ObjectRef) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub fn downgrade(&self) -> WeakObject {
        WeakObject(Arc::downgrade(&self.0))
    }

    pub fn as_arc(&self) -> &Arc<dyn ObjectValue> {
        &self.0
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        ObjectRef::ptr_eq(self, other) || self.0.dyn_eq(&*other.0)
    }
}

impl Eq for ObjectRef {}

impl Hash for ObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.dyn_hash(state);
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Weak reference to a shared object.
#[derive(Clone)]
pub struct WeakObject(Weak<dyn ObjectValue>);

impl WeakObject {
    /// The object, if it is still alive.
    pub fn upgrade(&self) -> Option<ObjectRef> {
        self.0.upgrade().map(ObjectRef)
    }
}

impl fmt::Debug for WeakObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(object) => write!(f, "weak({object:?})"),
            None => f.write_str("weak(<released>)"),
        }
    }
}
