//! Path lookup through the prototype chain

use std::collections::HashSet;
use std::sync::Arc;

use log::{trace, warn};

use super::Registry;
use crate::prototype::{function, Function, Property, PropertyKind, Prototype};
use crate::value::{Binding, Value};

impl Registry {
    /// Resolve `path` on `value`, walking the prototype chain.
    ///
    /// At each prototype the member properties are searched first, then
    /// member functions, static functions and static properties. The
    /// first match wins. When nothing matches, the parent named by
    /// `parent_name` is fetched from this registry and searched the same
    /// way. A missing parent, revisiting a prototype record, or following
    /// more than [`max_chain_depth`](crate::RegistryConfig::max_chain_depth)
    /// parents ends the walk with a null, read-only binding.
    pub fn lookup(&self, value: &Value, path: &str) -> Binding {
        let mut visited: HashSet<*const Prototype> = HashSet::new();
        let mut current = value.prototype().cloned();

        while let Some(prototype) = current {
            if visited.len() > self.config.max_chain_depth {
                warn!(
                    "lookup of {} stopped at {}: chain deeper than {}",
                    path, prototype.name, self.config.max_chain_depth
                );
                break;
            }
            if !visited.insert(Arc::as_ptr(&prototype)) {
                warn!(
                    "lookup of {} stopped: prototype chain cycle at {}",
                    path, prototype.name
                );
                break;
            }
            if self.config.trace {
                trace!("lookup {} in {}", path, prototype.name);
            }

            if let Some(binding) = resolve_own(&prototype, value, path) {
                return binding;
            }

            current = if prototype.has_parent() {
                self.find_prototype(&prototype.parent_name)
            } else {
                None
            };
        }

        Binding::detached(path, Value::NULL)
    }

    /// Resolve `path` and detach the result
    pub fn resolve(&self, value: &Value, path: &str) -> Value {
        self.lookup(value, path).into_value()
    }

    /// The prototypes a lookup on `value` would visit, own prototype first
    pub fn chain(&self, value: &Value) -> Vec<Arc<Prototype>> {
        let mut chain: Vec<Arc<Prototype>> = Vec::new();
        let mut current = value.prototype().cloned();

        while let Some(prototype) = current {
            if chain.len() > self.config.max_chain_depth
                || chain.iter().any(|p| Arc::ptr_eq(p, &prototype))
            {
                break;
            }
            current = if prototype.has_parent() {
                self.find_prototype(&prototype.parent_name)
            } else {
                None
            };
            chain.push(prototype);
        }
        chain
    }

    /// Check if `name` appears in the prototype chain of `value`
    pub fn instance_of(&self, value: &Value, name: &str) -> bool {
        self.chain(value).iter().any(|p| p.name == name)
    }
}

fn resolve_own(prototype: &Prototype, caller: &Value, key: &str) -> Option<Binding> {
    if let Some(property) = prototype.member_property_map.get(key) {
        return Some(resolve_property(key, property, caller));
    }
    if let Some(method) = prototype.member_function_map.get(key) {
        return Some(Binding::detached(key, bind_method(key, method, caller)));
    }
    if let Some(method) = prototype.static_function_map.get(key) {
        return Some(Binding::detached(key, bind_method(key, method, &Value::NULL)));
    }
    if let Some(property) = prototype.static_property_map.get(key) {
        return Some(resolve_property(key, property, &Value::NULL));
    }
    None
}

/// Read a descriptor with `caller` as receiver.
///
/// Stored values bind a setter that overwrites the slot unless readonly.
/// Accessors run `get` now and bind `set` to the caller for later writes.
pub(crate) fn resolve_property(key: &str, property: &Property, caller: &Value) -> Binding {
    match &property.kind {
        PropertyKind::Data { slot, readonly } => Binding::slot(key, slot, *readonly),
        PropertyKind::Accessor { get, set } => {
            let value = get
                .as_ref()
                .map(|get| get(caller, &[]))
                .unwrap_or_default();
            match set {
                Some(set) => Binding::with_setter(key, value, set.clone(), caller.clone()),
                None => Binding::detached(key, value),
            }
        }
    }
}

/// A callable value aliasing `receiver`'s memory.
///
/// The method always runs with the receiver it was looked up on. Once
/// that receiver is destroyed, calls return null without running it.
fn bind_method(name: &str, method: &Function, receiver: &Value) -> Value {
    let this = receiver.alias();
    let method = method.clone();
    let call = function(move |_, args| {
        if this.is_dangling() {
            return Value::NULL;
        }
        method(&this, args)
    });
    let prototype = Prototype {
        name: name.to_string(),
        ..Prototype::callable(call)
    };
    Value::alias_of(receiver, Arc::new(prototype))
}
