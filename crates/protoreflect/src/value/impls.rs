//! Value trait implementations: predicates, typed access, From traits

use std::any::{type_name, Any};
use std::sync::Arc;

use super::*;
use crate::error::{ReflectError, Result};
use crate::registry::builtins::{self, Builtin};

impl Value {
    // ═══════════════════════════════════════════════════════════════════
    // Predicates
    // ═══════════════════════════════════════════════════════════════════

    /// Check if this is the null value (no memory and no prototype)
    pub fn is_null(&self) -> bool {
        matches!(self.handle, Handle::Empty) && self.prototype.is_none()
    }

    /// Check if this value is invocable
    pub fn is_callable(&self) -> bool {
        self.prototype.as_deref().is_some_and(Prototype::is_callable)
    }

    /// Check if this handle shares ownership of its memory
    pub fn is_owned(&self) -> bool {
        matches!(self.handle, Handle::Owned(_))
    }

    /// Check if this handle is a non-owning alias
    pub fn is_alias(&self) -> bool {
        matches!(self.handle, Handle::Alias(_))
    }

    /// Check if this is an alias whose memory was already destroyed
    pub fn is_dangling(&self) -> bool {
        match &self.handle {
            Handle::Alias(weak) => weak.strong_count() == 0,
            _ => false,
        }
    }

    /// Check if two values refer to the same allocation
    pub fn same_allocation(&self, other: &Value) -> bool {
        match (self.allocation(), other.allocation()) {
            (Some(a), Some(b)) => Arc::ptr_eq(&a, &b),
            _ => false,
        }
    }

    /// The dynamic type name: `null`, `function`, `number`, `string` or `object`
    pub fn type_of(&self) -> &'static str {
        builtins::type_of(self)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Typed Access (return Option for safe access)
    // ═══════════════════════════════════════════════════════════════════

    /// Check if the native data is a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.with(|_: &T| ()).is_some()
    }

    /// Borrow the native data as `T`.
    ///
    /// Returns `None` for null values, dangling aliases and type mismatches.
    pub fn with<T: Any, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let allocation = self.allocation()?;
        let guard = allocation.data.read_recursive();
        let data = guard.as_deref()?.downcast_ref::<T>()?;
        Some(f(data))
    }

    /// Mutably borrow the native data as `T`.
    ///
    /// # Deadlocks
    ///
    /// The allocation stays write-locked while `f` runs. Reading any
    /// handle to the same allocation inside `f` blocks forever, and that
    /// includes arguments that alias the receiver. Pull values out of
    /// `args` first, then call `with_mut`.
    pub fn with_mut<T: Any, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let allocation = self.allocation()?;
        let mut guard = allocation.data.write();
        let data = guard.as_deref_mut()?.downcast_mut::<T>()?;
        Some(f(data))
    }

    /// Clone the native data out as `T`
    pub fn to<T: Any + Clone>(&self) -> Option<T> {
        self.with(T::clone)
    }

    /// Clone the native data out as `T`, reporting why it failed
    pub fn try_to<T: Any + Clone>(&self) -> Result<T> {
        if self.is_null() {
            return Err(ReflectError::NullTarget);
        }
        if self.is_dangling() {
            return Err(ReflectError::DanglingAlias);
        }
        self.to::<T>().ok_or_else(|| ReflectError::TypeMismatch {
            expected: type_name::<T>().to_string(),
            got: self.class_name().unwrap_or("<anonymous>").to_string(),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::new(Box::new(b), builtins::prototype(Builtin::Bool))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::new(Box::new(n), builtins::prototype(Builtin::Int))
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::new(Box::new(n), builtins::prototype(Builtin::Float))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::new(Box::new(n), builtins::prototype(Builtin::Double))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::new(Box::new(s), builtins::prototype(Builtin::String))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::from(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::NULL, Into::into)
    }
}
