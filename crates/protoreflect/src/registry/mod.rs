//! The prototype catalog and dynamic-dispatch engine

pub(crate) mod builtins;
mod lookup;
mod reflect;

pub use builtins::{type_of, Builtin};

use std::any::Any;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use log::debug;

use crate::config::RegistryConfig;
use crate::error::{ReflectError, Result};
use crate::prototype::{Function, NativeBox, Prototype};
use crate::value::Value;

/// A catalog of named prototypes plus a `Reflect`-style API over values.
///
/// Registration is expected to happen up front; lookups afterwards are
/// read-mostly. Prototypes are cloned out of the catalog before any user
/// callback runs, so callbacks may freely call back into the registry.
///
/// # Example
///
/// ```
/// use protoreflect::{Prototype, Registry, Value};
///
/// let registry = Registry::new();
/// registry.register(
///     Prototype::new("Greeter")
///         .with_constructor(|args| {
///             let name = args.first().and_then(|a| a.to::<String>()).unwrap_or_default();
///             Box::new(name)
///         })
///         .with_member_function("greet", |this, _| {
///             Value::from(format!("hello, {}", this.to::<String>().unwrap_or_default()))
///         }),
/// );
///
/// let greeter = registry.construct("Greeter", &[Value::from("ent")]);
/// let greeting = registry.resolve(&greeter, "greet").call(&[]);
/// assert_eq!(greeting.to::<String>().as_deref(), Some("hello, ent"));
///
/// assert!(registry.construct("Missing", &[]).is_null());
/// ```
#[derive(Debug)]
pub struct Registry {
    prototypes: DashMap<String, Arc<Prototype>>,
    config: RegistryConfig,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a registry with the built-in prototypes.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with a custom configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        let registry = Self {
            prototypes: DashMap::new(),
            config,
        };
        if registry.config.builtins {
            registry.load_builtins();
        }
        registry
    }

    /// The process-wide registry, created on first access.
    ///
    /// It lives until process exit; there is no teardown ordering.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    /// The configuration this registry was built with
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ═══════════════════════════════════════════════════════════════════
    // Catalog
    // ═══════════════════════════════════════════════════════════════════

    /// Insert or replace a prototype under its name.
    ///
    /// The parent is not checked; it is resolved at lookup time.
    pub fn register(&self, prototype: impl Into<Arc<Prototype>>) -> Arc<Prototype> {
        let prototype = prototype.into();
        let name = prototype.name.clone();
        if self.prototypes.insert(name.clone(), prototype.clone()).is_some() {
            debug!("replaced prototype {}", name);
        } else {
            debug!("registered prototype {}", name);
        }
        prototype
    }

    /// Remove a prototype from the catalog.
    ///
    /// Values already tagged with it keep their copy.
    pub fn unregister(&self, name: &str) -> Option<Arc<Prototype>> {
        let removed = self.prototypes.remove(name).map(|(_, p)| p);
        if removed.is_some() {
            debug!("unregistered prototype {}", name);
        }
        removed
    }

    /// Find a prototype by name
    pub fn find_prototype(&self, name: &str) -> Option<Arc<Prototype>> {
        self.prototypes.get(name).map(|entry| entry.value().clone())
    }

    /// Check if a prototype is registered
    pub fn contains(&self, name: &str) -> bool {
        self.prototypes.contains_key(name)
    }

    /// All registered prototypes, sorted by name
    pub fn prototypes(&self) -> Vec<Arc<Prototype>> {
        let mut prototypes: Vec<_> = self
            .prototypes
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        prototypes.sort_by(|a, b| a.name.cmp(&b.name));
        prototypes
    }

    /// Number of registered prototypes
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Construction
    // ═══════════════════════════════════════════════════════════════════

    /// Run the named prototype's constructor and wrap the result.
    ///
    /// Returns null for unknown names and prototypes without a
    /// constructor.
    pub fn construct(&self, name: &str, args: &[Value]) -> Value {
        self.try_construct(name, args).unwrap_or_else(|err| {
            debug!("construct rejected: {}", err);
            Value::NULL
        })
    }

    /// Run the named prototype's constructor, reporting failures
    pub fn try_construct(&self, name: &str, args: &[Value]) -> Result<Value> {
        let prototype = self
            .find_prototype(name)
            .ok_or_else(|| ReflectError::UnknownPrototype(name.to_string()))?;
        let constructor = prototype
            .constructor
            .clone()
            .ok_or_else(|| ReflectError::NoConstructor(name.to_string()))?;
        let data = constructor(args);
        debug!("constructed {} with {} argument(s)", name, args.len());
        Ok(Value::new(data, prototype))
    }

    /// Tag existing native data with the named prototype.
    ///
    /// The constructor does not run; the destructor will. Returns null,
    /// dropping `data`, when the name is unknown.
    pub fn wrap(&self, data: NativeBox, name: &str) -> Value {
        match self.find_prototype(name) {
            Some(prototype) => Value::new(data, prototype),
            None => {
                debug!("wrap rejected: unknown prototype {}", name);
                Value::NULL
            }
        }
    }

    /// Typed convenience over [`Registry::wrap`]
    pub fn wrap_native<T: Any + Send + Sync>(&self, data: T, name: &str) -> Value {
        self.wrap(Box::new(data), name)
    }

    /// Retag a value with the named prototype.
    ///
    /// Fails when the name is unknown or the value is not extensible.
    pub fn set_prototype(&self, target: &mut Value, name: &str) -> bool {
        let Some(prototype) = self.find_prototype(name) else {
            debug!("set_prototype rejected: unknown prototype {}", name);
            return false;
        };
        self.set_prototype_of(target, prototype)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Invocation
    // ═══════════════════════════════════════════════════════════════════

    /// Invoke a callable value with an explicit caller.
    ///
    /// Bound methods keep the receiver they were looked up on. Returns
    /// null when `function` is not callable.
    pub fn apply(&self, function: &Value, caller: &Value, args: &[Value]) -> Value {
        match function
            .prototype()
            .and_then(|p| p.call_as_function.clone())
        {
            Some(call) => call(caller, args),
            None => Value::NULL,
        }
    }

    /// Invoke a native function with an explicit caller
    pub fn apply_fn(&self, function: &Function, caller: &Value, args: &[Value]) -> Value {
        function(caller, args)
    }
}
