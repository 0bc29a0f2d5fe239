//! Shared storage cells for stored-value properties

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::Value;
use crate::prototype::{function, Function};

/// A shared, mutable cell holding a [`Value`].
///
/// Data descriptors keep their value in a slot. Cloning a descriptor (or
/// the prototype that holds it) clones the `Arc`, so every copy observes
/// writes made through any other.
#[derive(Clone, Default)]
pub struct Slot {
    value: Arc<RwLock<Value>>,
}

impl Slot {
    /// Create a slot holding `value`
    pub fn new(value: Value) -> Self {
        Self {
            value: Arc::new(RwLock::new(value)),
        }
    }

    /// Read a copy of the stored value
    pub fn get(&self) -> Value {
        self.value.read().clone()
    }

    /// Overwrite the stored value
    pub fn set(&self, value: Value) {
        *self.value.write() = value;
    }

    /// Overwrite the stored value, returning the previous one
    pub fn replace(&self, value: Value) -> Value {
        std::mem::replace(&mut *self.value.write(), value)
    }

    /// Check if two slots share storage
    pub fn ptr_eq(&self, other: &Slot) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    /// A setter that overwrites this slot with its first argument.
    ///
    /// Missing arguments store null. Returns null.
    pub fn setter(&self) -> Function {
        let slot = self.clone();
        function(move |_, args| {
            slot.set(args.first().cloned().unwrap_or_default());
            Value::NULL
        })
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({:?})", self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let slot = Slot::new(Value::from(1));
        slot.set(Value::from(2));
        assert_eq!(slot.get().to::<i32>(), Some(2));
    }

    #[test]
    fn test_replace_returns_previous() {
        let slot = Slot::new(Value::from("a"));
        let old = slot.replace(Value::from("b"));
        assert_eq!(old.to::<String>().as_deref(), Some("a"));
        assert_eq!(slot.get().to::<String>().as_deref(), Some("b"));
    }

    #[test]
    fn test_setter_writes_first_argument() {
        let slot = Slot::new(Value::NULL);
        let setter = slot.setter();
        let result = setter(&Value::NULL, &[Value::from(true)]);
        assert!(result.is_null());
        assert_eq!(slot.get().to::<bool>(), Some(true));

        setter(&Value::NULL, &[]);
        assert!(slot.get().is_null());
    }

    #[test]
    fn test_clones_share_storage() {
        let slot = Slot::default();
        let other = slot.clone();
        assert!(slot.ptr_eq(&other));
        assert!(!slot.ptr_eq(&Slot::default()));
    }
}
