//! Built-in primitive prototypes and `type_of`

use std::sync::{Arc, OnceLock};

use super::Registry;
use crate::prototype::{drop_destructor, Prototype};
use crate::value::Value;

/// The primitive classes every registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `bool`
    Bool,
    /// `i32`
    Int,
    /// `f32`
    Float,
    /// `f64`
    Double,
    /// `String`
    String,
}

impl Builtin {
    /// All built-ins, in registration order
    pub const ALL: [Builtin; 5] = [
        Builtin::Bool,
        Builtin::Int,
        Builtin::Float,
        Builtin::Double,
        Builtin::String,
    ];

    /// The catalog name
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Bool => "bool",
            Builtin::Int => "int",
            Builtin::Float => "float",
            Builtin::Double => "double",
            Builtin::String => "string",
        }
    }

    /// Look up a built-in by catalog name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Whether `type_of` reports this built-in as `"number"`
    pub fn is_numeric(self) -> bool {
        !matches!(self, Builtin::String)
    }
}

/// The shared prototype record for a built-in.
///
/// Each carries only a destructor: no constructor, no properties.
pub fn prototype(builtin: Builtin) -> Arc<Prototype> {
    static PROTOTYPES: OnceLock<Vec<Arc<Prototype>>> = OnceLock::new();
    let prototypes = PROTOTYPES.get_or_init(|| {
        Builtin::ALL
            .into_iter()
            .map(|b| {
                let mut proto = Prototype::new(b.name());
                proto.destructor = Some(drop_destructor());
                Arc::new(proto)
            })
            .collect()
    });
    prototypes[builtin as usize].clone()
}

/// The dynamic type name of a value.
///
/// `"null"` for null, `"function"` for invocable values, `"number"` for
/// the numeric built-ins (`bool` included), `"string"` for `string`, and
/// `"object"` for everything else.
pub fn type_of(value: &Value) -> &'static str {
    if value.is_null() {
        return "null";
    }
    if value.is_callable() {
        return "function";
    }
    match value.class_name().and_then(Builtin::from_name) {
        Some(Builtin::String) => "string",
        Some(_) => "number",
        None => "object",
    }
}

impl Registry {
    /// Register the built-in primitive prototypes.
    pub fn load_builtins(&self) {
        for builtin in Builtin::ALL {
            self.register(prototype(builtin));
        }
    }

    /// Wrap a `bool` under the registered `bool` prototype
    pub fn from_bool(&self, b: bool) -> Value {
        self.wrap_native(b, Builtin::Bool.name())
    }

    /// Wrap an `i32` under the registered `int` prototype
    pub fn from_int(&self, n: i32) -> Value {
        self.wrap_native(n, Builtin::Int.name())
    }

    /// Wrap an `f32` under the registered `float` prototype
    pub fn from_float(&self, n: f32) -> Value {
        self.wrap_native(n, Builtin::Float.name())
    }

    /// Wrap an `f64` under the registered `double` prototype
    pub fn from_double(&self, n: f64) -> Value {
        self.wrap_native(n, Builtin::Double.name())
    }

    /// Wrap a string under the registered `string` prototype
    pub fn from_string(&self, s: impl Into<String>) -> Value {
        self.wrap_native(s.into(), Builtin::String.name())
    }
}
