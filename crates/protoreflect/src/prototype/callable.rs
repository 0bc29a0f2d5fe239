//! Callable types: native functions, constructors and destructors

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;

use super::Property;
use crate::value::Value;

/// Erased native data owned by a [`Value`].
pub type NativeBox = Box<dyn Any + Send + Sync>;

/// A native function: `(caller, args) -> result`.
///
/// Getters receive no arguments. Setters receive exactly one and their
/// return value is discarded, by convention they return null.
///
/// # Deadlocks
///
/// An argument may alias the caller, as in `obj.put("x", obj.clone())`.
/// Read everything needed from `args` before taking
/// [`Value::with_mut`] on the caller.
pub type Function = Arc<dyn Fn(&Value, &[Value]) -> Value + Send + Sync>;

/// Builds the native data of a new instance from constructor arguments.
pub type Constructor = Arc<dyn Fn(&[Value]) -> NativeBox + Send + Sync>;

/// Releases the native data of an owned allocation.
///
/// Runs at most once per allocation, when the last owning handle drops.
pub type Destructor = Arc<dyn Fn(NativeBox) + Send + Sync>;

/// Name-keyed function table
pub type FunctionMap = IndexMap<String, Function>;

/// Name-keyed property table
pub type PropertyMap = IndexMap<String, Property>;

/// Wrap a closure as a [`Function`].
pub fn function<F>(f: F) -> Function
where
    F: Fn(&Value, &[Value]) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`Constructor`].
pub fn constructor<F>(f: F) -> Constructor
where
    F: Fn(&[Value]) -> NativeBox + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`Destructor`].
pub fn destructor<F>(f: F) -> Destructor
where
    F: Fn(NativeBox) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A destructor that simply drops the native data.
pub fn drop_destructor() -> Destructor {
    Arc::new(|data: NativeBox| drop(data))
}
