//! Type-erased value handles

mod binding;
mod display;
mod impls;
mod slot;

pub use binding::Binding;
pub use slot::Slot;

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::prototype::{Destructor, NativeBox, Prototype};
use crate::registry::Registry;

/// A block of native data and the destructor captured when it was bound.
///
/// Dropping the last `Arc` runs the destructor exactly once. Without a
/// destructor the data is dropped normally.
pub(crate) struct Allocation {
    pub(crate) data: RwLock<Option<NativeBox>>,
    destructor: Option<Destructor>,
}

impl Allocation {
    fn new(data: NativeBox, destructor: Option<Destructor>) -> Arc<Self> {
        Arc::new(Self {
            data: RwLock::new(Some(data)),
            destructor,
        })
    }
}

impl Drop for Allocation {
    fn drop(&mut self) {
        if let (Some(data), Some(destructor)) = (self.data.get_mut().take(), self.destructor.take())
        {
            destructor(data);
        }
    }
}

/// Ownership of the native data behind a value.
#[derive(Clone, Default)]
pub(crate) enum Handle {
    /// No memory
    #[default]
    Empty,

    /// Shares ownership; the last owner runs the destructor
    Owned(Arc<Allocation>),

    /// Non-owning alias; never destroys anything
    Alias(Weak<Allocation>),
}

/// A runtime handle combining native memory ownership with a prototype tag.
///
/// Values are cheap to clone: clones share the allocation and the
/// prototype. Property access walks the prototype chain through the
/// process-wide [`Registry`]; use [`Registry::lookup`] to resolve against a
/// specific registry instead.
///
/// # Example
///
/// ```
/// use protoreflect::{Property, Prototype, Registry, Value};
///
/// let registry = Registry::new();
/// registry.register(
///     Prototype::new("Counter")
///         .with_constructor(|_| Box::new(0i32))
///         .with_member_property("label", Property::data(Value::from("clicks"))),
/// );
///
/// let counter = registry.construct("Counter", &[]);
/// counter.with_mut(|n: &mut i32| *n += 1);
///
/// assert_eq!(counter.to::<i32>(), Some(1));
/// assert_eq!(counter.class_name(), Some("Counter"));
/// assert_eq!(
///     registry.resolve(&counter, "label").to::<String>().as_deref(),
///     Some("clicks")
/// );
/// ```
#[derive(Clone, Default)]
pub struct Value {
    handle: Handle,
    prototype: Option<Arc<Prototype>>,
}

impl Value {
    /// The null value: no memory and no prototype.
    pub const NULL: Value = Value {
        handle: Handle::Empty,
        prototype: None,
    };

    /// Create the null value
    pub fn null() -> Self {
        Self::NULL
    }

    /// Bind `data` as an owned allocation tagged with `prototype`.
    ///
    /// The prototype's destructor, if any, runs when the last owning
    /// handle drops.
    pub fn new(data: NativeBox, prototype: impl Into<Arc<Prototype>>) -> Self {
        let prototype = prototype.into();
        Self {
            handle: Handle::Owned(Allocation::new(data, prototype.destructor.clone())),
            prototype: Some(prototype),
        }
    }

    /// A value with no memory, tagged with `prototype`.
    pub fn from_prototype(prototype: impl Into<Arc<Prototype>>) -> Self {
        Self {
            handle: Handle::Empty,
            prototype: Some(prototype.into()),
        }
    }

    /// Rebind to new native data, keeping the prototype.
    ///
    /// Other handles to the previous allocation are unaffected.
    pub fn reset(&mut self, data: NativeBox) {
        let destructor = self.prototype.as_ref().and_then(|p| p.destructor.clone());
        self.handle = Handle::Owned(Allocation::new(data, destructor));
    }

    /// Rebind to new native data and a new prototype.
    pub fn reset_with(&mut self, data: NativeBox, prototype: impl Into<Arc<Prototype>>) {
        *self = Self::new(data, prototype);
    }

    /// A non-owning handle to the same memory and prototype.
    pub fn alias(&self) -> Self {
        let handle = match &self.handle {
            Handle::Empty => Handle::Empty,
            Handle::Owned(allocation) => Handle::Alias(Arc::downgrade(allocation)),
            Handle::Alias(weak) => Handle::Alias(weak.clone()),
        };
        Self {
            handle,
            prototype: self.prototype.clone(),
        }
    }

    /// Alias the memory of `receiver` under a different prototype.
    pub(crate) fn alias_of(receiver: &Value, prototype: Arc<Prototype>) -> Self {
        Self {
            handle: receiver.alias().handle,
            prototype: Some(prototype),
        }
    }

    pub(crate) fn allocation(&self) -> Option<Arc<Allocation>> {
        match &self.handle {
            Handle::Empty => None,
            Handle::Owned(allocation) => Some(allocation.clone()),
            Handle::Alias(weak) => weak.upgrade(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Prototype Access
    // ═══════════════════════════════════════════════════════════════════

    /// The prototype tag, if any
    pub fn prototype(&self) -> Option<&Arc<Prototype>> {
        self.prototype.as_ref()
    }

    /// Mutable access to this value's own prototype.
    ///
    /// Copies the prototype first if it is shared, so changes stay local
    /// to this handle. Stored-value slots remain shared.
    pub(crate) fn prototype_mut(&mut self) -> Option<&mut Prototype> {
        self.prototype.as_mut().map(Arc::make_mut)
    }

    pub(crate) fn set_prototype(&mut self, prototype: Arc<Prototype>) {
        self.prototype = Some(prototype);
    }

    /// The class name of the prototype
    pub fn class_name(&self) -> Option<&str> {
        self.prototype.as_deref().map(|p| p.name.as_str())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Property Access
    // ═══════════════════════════════════════════════════════════════════

    /// Resolve `path` through the process-wide registry.
    ///
    /// The returned [`Binding`] can write back into the resolved slot.
    pub fn at(&self, path: &str) -> Binding {
        Registry::global().lookup(self, path)
    }

    /// Resolve `path` and detach the result.
    ///
    /// Unresolved paths yield null.
    pub fn get(&self, path: &str) -> Value {
        self.at(path).into_value()
    }

    /// Assign through the slot at `path`.
    ///
    /// Returns false when the slot is readonly, an accessor without a
    /// setter, or unresolved.
    pub fn put(&self, path: &str, value: Value) -> bool {
        self.at(path).set(value)
    }

    /// Invoke this value.
    ///
    /// Returns null unless the prototype sets `call_as_function`.
    pub fn call(&self, args: &[Value]) -> Value {
        match self.prototype.as_ref().and_then(|p| p.call_as_function.clone()) {
            Some(call) => call(self, args),
            None => Value::NULL,
        }
    }

    /// Copy this value through the prototype's copy hook.
    ///
    /// Without a hook the copy shares memory with `self`.
    pub fn copy(&self) -> Value {
        match self.prototype.as_ref().and_then(|p| p.copy.clone()) {
            Some(copy) => copy(self, &[]),
            None => self.clone(),
        }
    }

    /// Assign `other` to this value.
    ///
    /// If the prototype declares an assign hook it receives `other` and
    /// this handle keeps its memory and prototype. Otherwise the handle is
    /// rebound to `other`.
    pub fn assign_from(&mut self, other: Value) {
        match self.prototype.as_ref().and_then(|p| p.assign.clone()) {
            Some(assign) => {
                assign(self, &[other]);
            }
            None => *self = other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counted(name: &str, drops: &Arc<AtomicUsize>) -> Prototype {
        let drops = drops.clone();
        Prototype::new(name).with_destructor(move |_| {
            drops.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_null_has_nothing() {
        let null = Value::null();
        assert!(null.is_null());
        assert!(null.prototype().is_none());
        assert!(null.allocation().is_none());
        assert!(null.call(&[]).is_null());
    }

    #[test]
    fn test_destructor_runs_once_after_last_clone() {
        let drops = Arc::new(AtomicUsize::new(0));
        let value = Value::new(Box::new(5u8), counted("Counted", &drops));
        let clone = value.clone();
        let alias = value.alias();

        drop(value);
        assert_eq!(drops.load(Ordering::SeqCst), 0);
        drop(clone);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        drop(alias);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_alias_does_not_keep_memory_alive() {
        let drops = Arc::new(AtomicUsize::new(0));
        let value = Value::new(Box::new(5u8), counted("Counted", &drops));
        let alias = value.alias();
        assert_eq!(alias.to::<u8>(), Some(5));

        drop(value);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert!(alias.is_dangling());
        assert_eq!(alias.to::<u8>(), None);
    }

    #[test]
    fn test_reset_rebinds_memory_and_uses_prototype_destructor() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut value = Value::new(Box::new(1u8), counted("Counted", &drops));
        value.reset(Box::new(2u8));
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert_eq!(value.to::<u8>(), Some(2));

        drop(value);
        assert_eq!(drops.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_reset_with_replaces_prototype() {
        let mut value = Value::new(Box::new(1u8), Prototype::new("A"));
        value.reset_with(Box::new(2u16), Prototype::new("B"));
        assert_eq!(value.class_name(), Some("B"));
        assert_eq!(value.to::<u16>(), Some(2));
    }

    #[test]
    fn test_prototype_mut_copies_on_write() {
        let shared = Arc::new(Prototype::new("Shared"));
        let mut a = Value::new(Box::new(()), shared.clone());
        let b = Value::new(Box::new(()), shared.clone());

        if let Some(proto) = a.prototype_mut() {
            proto.extensible = false;
        }
        assert!(!a.prototype().map(|p| p.extensible).unwrap_or(true));
        assert!(b.prototype().map(|p| p.extensible).unwrap_or(false));
        assert!(shared.extensible);
    }

    #[test]
    fn test_call_uses_call_as_function() {
        let proto = Prototype::new("Adder").with_call(|_, args| {
            Value::from(args.iter().filter_map(|a| a.to::<i32>()).sum::<i32>())
        });
        let adder = Value::from_prototype(proto);
        assert_eq!(
            adder.call(&[Value::from(2), Value::from(3)]).to::<i32>(),
            Some(5)
        );
    }

    #[test]
    fn test_copy_without_hook_shares_memory() {
        let value = Value::new(Box::new(1u8), Prototype::new("Plain"));
        let copy = value.copy();
        assert!(copy.same_allocation(&value));
    }

    #[test]
    fn test_copy_hook_builds_new_value() {
        let proto = Prototype::new("Deep").with_copy(|this, _| {
            let n = this.to::<u8>().unwrap_or_default();
            Value::new(Box::new(n), Prototype::new("Deep"))
        });
        let value = Value::new(Box::new(9u8), proto);
        let copy = value.copy();
        assert!(!copy.same_allocation(&value));
        assert_eq!(copy.to::<u8>(), Some(9));
    }

    #[test]
    fn test_assign_from_without_hook_rebinds() {
        let mut value = Value::new(Box::new(1u8), Prototype::new("A"));
        value.assign_from(Value::from(7));
        assert_eq!(value.class_name(), Some("int"));
        assert_eq!(value.to::<i32>(), Some(7));
    }

    #[test]
    fn test_assign_from_with_hook_keeps_handle() {
        let proto = Prototype::new("Cell").with_assign(|this, args| {
            if let Some(n) = args.first().and_then(|a| a.to::<i32>()) {
                this.with_mut(|cell: &mut i32| *cell = n);
            }
            Value::NULL
        });
        let mut cell = Value::new(Box::new(0i32), proto);
        let before = cell.clone();

        cell.assign_from(Value::from(42));
        assert_eq!(cell.class_name(), Some("Cell"));
        assert!(cell.same_allocation(&before));
        assert_eq!(before.to::<i32>(), Some(42));
    }
}
