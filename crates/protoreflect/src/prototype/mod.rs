//! Prototype records describing how to interpret and traverse a value

mod callable;
mod property;

pub use callable::{
    constructor, destructor, drop_destructor, function, Constructor, Destructor, Function,
    FunctionMap, NativeBox, PropertyMap,
};
pub use property::{Property, PropertyKind};

use std::fmt;

use crate::value::Value;

/// A named class record.
///
/// Holds the native lifecycle hooks, optional call behaviour and the
/// static/member property and function tables. `parent_name` links to
/// another prototype in the registry and is resolved lazily at lookup
/// time, so a missing parent simply ends the chain.
///
/// # Example
///
/// ```
/// use protoreflect::{Property, Prototype, Value};
///
/// let point = Prototype::new("Point")
///     .extends("Shape")
///     .with_constructor(|_| Box::new((0i32, 0i32)))
///     .with_member_property("origin", Property::readonly(Value::from(true)))
///     .with_member_function("area", |_, _| Value::from(0.0f64));
///
/// assert_eq!(point.parent_name, "Shape");
/// assert!(point.member_function_map.contains_key("area"));
/// ```
#[derive(Clone)]
pub struct Prototype {
    /// Unique catalog key
    pub name: String,

    /// Parent class name, empty for none
    pub parent_name: String,

    /// Whether new own properties may be defined
    pub extensible: bool,

    /// Makes values of this prototype invocable
    pub call_as_function: Option<Function>,

    /// Builds native data for `Registry::construct`
    pub constructor: Option<Constructor>,

    /// Releases native data of owned allocations
    pub destructor: Option<Destructor>,

    /// Customizes `Value::copy`
    pub copy: Option<Function>,

    /// Intercepts `Value::assign_from`
    pub assign: Option<Function>,

    /// Properties looked up with a null caller
    pub static_property_map: PropertyMap,

    /// Functions bound to a null caller
    pub static_function_map: FunctionMap,

    /// Properties looked up with the instance as caller
    pub member_property_map: PropertyMap,

    /// Functions bound to the instance
    pub member_function_map: FunctionMap,
}

impl Default for Prototype {
    fn default() -> Self {
        Self {
            name: String::new(),
            parent_name: String::new(),
            extensible: true,
            call_as_function: None,
            constructor: None,
            destructor: None,
            copy: None,
            assign: None,
            static_property_map: PropertyMap::new(),
            static_function_map: FunctionMap::new(),
            member_property_map: PropertyMap::new(),
            member_function_map: FunctionMap::new(),
        }
    }
}

impl Prototype {
    /// Create an empty, extensible prototype
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create an anonymous prototype that only carries call behaviour
    pub fn callable(call: Function) -> Self {
        Self {
            call_as_function: Some(call),
            ..Default::default()
        }
    }

    /// Set the parent class name (builder pattern)
    pub fn extends(mut self, parent_name: impl Into<String>) -> Self {
        self.parent_name = parent_name.into();
        self
    }

    /// Mark the prototype as non-extensible (builder pattern)
    pub fn non_extensible(mut self) -> Self {
        self.extensible = false;
        self
    }

    /// Set the constructor (builder pattern)
    pub fn with_constructor<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Value]) -> NativeBox + Send + Sync + 'static,
    {
        self.constructor = Some(constructor(f));
        self
    }

    /// Set the destructor (builder pattern)
    pub fn with_destructor<F>(mut self, f: F) -> Self
    where
        F: Fn(NativeBox) + Send + Sync + 'static,
    {
        self.destructor = Some(destructor(f));
        self
    }

    /// Make values of this prototype invocable (builder pattern)
    pub fn with_call<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.call_as_function = Some(function(f));
        self
    }

    /// Set the copy hook (builder pattern)
    pub fn with_copy<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.copy = Some(function(f));
        self
    }

    /// Set the assign hook (builder pattern)
    pub fn with_assign<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.assign = Some(function(f));
        self
    }

    /// Add a member property (builder pattern)
    pub fn with_member_property(mut self, name: impl Into<String>, property: Property) -> Self {
        self.member_property_map.insert(name.into(), property);
        self
    }

    /// Add a member function (builder pattern)
    pub fn with_member_function<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.member_function_map.insert(name.into(), function(f));
        self
    }

    /// Add a static property (builder pattern)
    pub fn with_static_property(mut self, name: impl Into<String>, property: Property) -> Self {
        self.static_property_map.insert(name.into(), property);
        self
    }

    /// Add a static function (builder pattern)
    pub fn with_static_function<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.static_function_map.insert(name.into(), function(f));
        self
    }

    /// Check if values of this prototype are invocable
    pub fn is_callable(&self) -> bool {
        self.call_as_function.is_some()
    }

    /// Check if this prototype names a parent
    pub fn has_parent(&self) -> bool {
        !self.parent_name.is_empty()
    }
}

impl fmt::Debug for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prototype")
            .field("name", &self.name)
            .field("parent_name", &self.parent_name)
            .field("extensible", &self.extensible)
            .field("callable", &self.is_callable())
            .field("constructor", &self.constructor.is_some())
            .field("destructor", &self.destructor.is_some())
            .field(
                "member_properties",
                &self.member_property_map.keys().collect::<Vec<_>>(),
            )
            .field(
                "member_functions",
                &self.member_function_map.keys().collect::<Vec<_>>(),
            )
            .field(
                "static_properties",
                &self.static_property_map.keys().collect::<Vec<_>>(),
            )
            .field(
                "static_functions",
                &self.static_function_map.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}
