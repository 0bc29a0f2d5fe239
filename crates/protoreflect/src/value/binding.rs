//! Bindings: lookup results that can write back into their slot

use std::ops::Deref;

use super::{Slot, Value};
use crate::error::{ReflectError, Result};
use crate::prototype::Function;

/// The setter a binding forwards writes to, with its bound caller.
#[derive(Clone)]
struct Writer {
    setter: Function,
    caller: Value,
}

/// The result of a path lookup.
///
/// A binding pairs the value read from a slot with the setter that writes
/// back into it: the registered setter of an accessor, or a synthesized
/// "overwrite the stored value" setter for writable data properties.
/// Readonly slots, getter-only accessors, methods and unresolved paths
/// produce bindings without a writer, and writes to them are no-ops.
///
/// Bindings deref to the [`Value`] they read, so lookups and calls chain:
///
/// ```
/// use protoreflect::{Property, Prototype, Registry, Value};
///
/// let registry = Registry::new();
/// registry.register(
///     Prototype::new("Config")
///         .with_constructor(|_| Box::new(()))
///         .with_member_property("level", Property::data(Value::from(1)))
///         .with_member_property("name", Property::readonly(Value::from("cfg"))),
/// );
/// let config = registry.construct("Config", &[]);
///
/// assert!(registry.lookup(&config, "level").set(Value::from(3)));
/// assert_eq!(registry.resolve(&config, "level").to::<i32>(), Some(3));
///
/// assert!(!registry.lookup(&config, "name").set(Value::from("other")));
/// assert_eq!(registry.resolve(&config, "name").to::<String>().as_deref(), Some("cfg"));
/// ```
#[derive(Clone, Default)]
pub struct Binding {
    key: String,
    value: Value,
    writer: Option<Writer>,
}

impl Binding {
    /// A read-only binding
    pub fn detached(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
            writer: None,
        }
    }

    /// A binding whose writes call `setter` with `caller`
    pub fn with_setter(
        key: impl Into<String>,
        value: Value,
        setter: Function,
        caller: Value,
    ) -> Self {
        Self {
            key: key.into(),
            value,
            writer: Some(Writer { setter, caller }),
        }
    }

    /// A binding reading and writing a stored-value slot
    pub fn slot(key: impl Into<String>, slot: &Slot, readonly: bool) -> Self {
        let key = key.into();
        if readonly {
            Self::detached(key, slot.get())
        } else {
            Self::with_setter(key, slot.get(), slot.setter(), Value::NULL)
        }
    }

    /// The key this binding was resolved from
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value read during lookup
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Detach the value, dropping the writer
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Check if writes are forwarded anywhere
    pub fn is_writable(&self) -> bool {
        self.writer.is_some()
    }

    /// Write `value` through the setter.
    ///
    /// Returns false, without side effects, when there is no setter.
    pub fn set(&self, value: Value) -> bool {
        self.try_set(value).is_ok()
    }

    /// Write `value` through the setter, reporting why it was rejected
    pub fn try_set(&self, value: Value) -> Result<()> {
        let writer = self.writer.as_ref().ok_or_else(|| ReflectError::NotWritable {
            key: self.key.clone(),
        })?;
        (writer.setter)(&writer.caller, &[value]);
        Ok(())
    }

    /// Write `value` and hand it back, so assignments chain.
    ///
    /// ```
    /// # use protoreflect::{Property, Prototype, Registry, Value};
    /// # let registry = Registry::new();
    /// # registry.register(
    /// #     Prototype::new("Pair")
    /// #         .with_constructor(|_| Box::new(()))
    /// #         .with_member_property("a", Property::data(Value::NULL))
    /// #         .with_member_property("b", Property::data(Value::NULL)),
    /// # );
    /// # let pair = registry.construct("Pair", &[]);
    /// // a = b = 5
    /// registry
    ///     .lookup(&pair, "a")
    ///     .assign(registry.lookup(&pair, "b").assign(Value::from(5)));
    /// assert_eq!(registry.resolve(&pair, "a").to::<i32>(), Some(5));
    /// assert_eq!(registry.resolve(&pair, "b").to::<i32>(), Some(5));
    /// ```
    pub fn assign(&self, value: Value) -> Value {
        self.set(value.clone());
        value
    }
}

impl Deref for Binding {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl From<Binding> for Value {
    fn from(binding: Binding) -> Self {
        binding.into_value()
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("writable", &self.is_writable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prototype::function;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_detached_rejects_writes() {
        let binding = Binding::detached("x", Value::from(1));
        assert!(!binding.is_writable());
        assert!(!binding.set(Value::from(2)));
        assert_eq!(
            binding.try_set(Value::NULL),
            Err(ReflectError::NotWritable { key: "x".into() })
        );
        assert_eq!(binding.to::<i32>(), Some(1));
    }

    #[test]
    fn test_slot_binding_writes_back() {
        let slot = Slot::new(Value::from(1));
        let binding = Binding::slot("x", &slot, false);
        assert!(binding.set(Value::from(2)));
        assert_eq!(slot.get().to::<i32>(), Some(2));
        // The binding keeps the value read at lookup time
        assert_eq!(binding.to::<i32>(), Some(1));
    }

    #[test]
    fn test_readonly_slot_binding() {
        let slot = Slot::new(Value::from(1));
        let binding = Binding::slot("x", &slot, true);
        assert!(!binding.set(Value::from(2)));
        assert_eq!(slot.get().to::<i32>(), Some(1));
    }

    #[test]
    fn test_setter_receives_caller_and_argument() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let setter = function(move |caller, args| {
            assert_eq!(caller.to::<i32>(), Some(10));
            assert_eq!(args.len(), 1);
            seen.fetch_add(args[0].to::<i32>().unwrap_or_default() as usize, Ordering::SeqCst);
            Value::NULL
        });
        let binding = Binding::with_setter("x", Value::NULL, setter, Value::from(10));
        assert_eq!(binding.assign(Value::from(4)).to::<i32>(), Some(4));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_into_value() {
        let value: Value = Binding::detached("k", Value::from("v")).into();
        assert_eq!(value.to::<String>().as_deref(), Some("v"));
    }
}
