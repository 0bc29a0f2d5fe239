//! `Reflect`-style operations on a value's own member properties
//!
//! None of these walk the prototype chain; that is reserved for
//! [`Registry::lookup`]. Mutations apply to the target's own prototype,
//! copied on first write so other values tagged with the same class are
//! unaffected.

use std::sync::Arc;

use log::debug;

use super::lookup::resolve_property;
use super::Registry;
use crate::error::{ReflectError, Result};
use crate::prototype::{Property, PropertyKind, Prototype};
use crate::value::Value;

/// Key reported when a prototype change is rejected
const PROTOTYPE_KEY: &str = "[[Prototype]]";

fn report(operation: &str, key: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            debug!("{} {} rejected: {}", operation, key, err);
            false
        }
    }
}

impl Registry {
    /// Read an own member property. Missing keys yield null.
    pub fn get(&self, target: &Value, key: &str) -> Value {
        match target
            .prototype()
            .and_then(|p| p.member_property_map.get(key))
        {
            Some(property) => resolve_property(key, property, target).into_value(),
            None => Value::NULL,
        }
    }

    /// Write an own member property.
    ///
    /// Writable data descriptors are overwritten in place and accessor
    /// setters are invoked with `target` as caller. A missing key is
    /// created as a default data descriptor if the target is extensible.
    /// Returns false, without mutation, otherwise.
    pub fn set(&self, target: &mut Value, key: &str, value: Value) -> bool {
        report("set", key, self.try_set(target, key, value))
    }

    /// [`Registry::set`], reporting why it was rejected
    pub fn try_set(&self, target: &mut Value, key: &str, value: Value) -> Result<()> {
        let prototype = target.prototype().ok_or(ReflectError::NullTarget)?;
        let existing = prototype.member_property_map.get(key).cloned();
        let extensible = prototype.extensible;

        match existing.map(|p| p.kind) {
            Some(PropertyKind::Data { slot, readonly }) => {
                if readonly {
                    return Err(ReflectError::NotWritable {
                        key: key.to_string(),
                    });
                }
                slot.set(value);
                Ok(())
            }
            Some(PropertyKind::Accessor { set: Some(set), .. }) => {
                set(&*target, &[value]);
                Ok(())
            }
            Some(PropertyKind::Accessor { set: None, .. }) => Err(ReflectError::NotWritable {
                key: key.to_string(),
            }),
            None if !extensible => Err(ReflectError::NotExtensible {
                key: key.to_string(),
            }),
            None => {
                if let Some(prototype) = target.prototype_mut() {
                    prototype
                        .member_property_map
                        .insert(key.to_string(), Property::data(value));
                }
                Ok(())
            }
        }
    }

    /// Check for an own member property
    pub fn has(&self, target: &Value, key: &str) -> bool {
        target
            .prototype()
            .is_some_and(|p| p.member_property_map.contains_key(key))
    }

    /// Install or replace an own member property.
    ///
    /// Fails for new keys on non-extensible targets and for existing
    /// descriptors that are not configurable.
    pub fn define_property(&self, target: &mut Value, key: &str, property: Property) -> bool {
        report(
            "define_property",
            key,
            self.try_define_property(target, key, property),
        )
    }

    /// [`Registry::define_property`], reporting why it was rejected
    pub fn try_define_property(
        &self,
        target: &mut Value,
        key: &str,
        property: Property,
    ) -> Result<()> {
        let prototype = target.prototype().ok_or(ReflectError::NullTarget)?;
        match prototype.member_property_map.get(key) {
            Some(existing) if !existing.configurable => {
                return Err(ReflectError::NotConfigurable {
                    key: key.to_string(),
                });
            }
            None if !prototype.extensible => {
                return Err(ReflectError::NotExtensible {
                    key: key.to_string(),
                });
            }
            _ => {}
        }

        if let Some(prototype) = target.prototype_mut() {
            prototype
                .member_property_map
                .insert(key.to_string(), property);
        }
        Ok(())
    }

    /// Remove an own member property.
    ///
    /// Missing keys count as deleted. Non-configurable descriptors stay
    /// and the call returns false.
    pub fn delete_property(&self, target: &mut Value, key: &str) -> bool {
        report(
            "delete_property",
            key,
            self.try_delete_property(target, key),
        )
    }

    /// [`Registry::delete_property`], reporting why it was rejected
    pub fn try_delete_property(&self, target: &mut Value, key: &str) -> Result<()> {
        let prototype = target.prototype().ok_or(ReflectError::NullTarget)?;
        match prototype.member_property_map.get(key) {
            None => return Ok(()),
            Some(existing) if !existing.configurable => {
                return Err(ReflectError::NotConfigurable {
                    key: key.to_string(),
                });
            }
            Some(_) => {}
        }

        if let Some(prototype) = target.prototype_mut() {
            prototype.member_property_map.shift_remove(key);
        }
        Ok(())
    }

    /// A copy of an own member property descriptor.
    ///
    /// Data descriptors in the copy share their slot with the original.
    pub fn get_own_property_descriptor(&self, target: &Value, key: &str) -> Option<Property> {
        target
            .prototype()
            .and_then(|p| p.member_property_map.get(key).cloned())
    }

    /// Enumerable own member property keys, in definition order
    pub fn own_keys(&self, target: &Value) -> Vec<String> {
        target
            .prototype()
            .map(|p| {
                p.member_property_map
                    .iter()
                    .filter(|(_, property)| property.enumerable)
                    .map(|(key, _)| key.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The prototype `target` is tagged with
    pub fn get_prototype_of(&self, target: &Value) -> Option<Arc<Prototype>> {
        target.prototype().cloned()
    }

    /// Retag `target` with `prototype`, keeping its memory.
    ///
    /// Fails when the target is null or not extensible.
    pub fn set_prototype_of(
        &self,
        target: &mut Value,
        prototype: impl Into<Arc<Prototype>>,
    ) -> bool {
        report(
            "set_prototype_of",
            PROTOTYPE_KEY,
            self.try_set_prototype_of(target, prototype),
        )
    }

    /// [`Registry::set_prototype_of`], reporting why it was rejected
    pub fn try_set_prototype_of(
        &self,
        target: &mut Value,
        prototype: impl Into<Arc<Prototype>>,
    ) -> Result<()> {
        let current = target.prototype().ok_or(ReflectError::NullTarget)?;
        if !current.extensible {
            return Err(ReflectError::NotExtensible {
                key: PROTOTYPE_KEY.to_string(),
            });
        }
        target.set_prototype(prototype.into());
        Ok(())
    }

    /// Check if new own properties may be added to `target`
    pub fn is_extensible(&self, target: &Value) -> bool {
        target.prototype().is_some_and(|p| p.extensible)
    }

    /// Forbid new own properties on `target`.
    ///
    /// Nothing in this API restores extensibility. Returns false for null.
    pub fn prevent_extensions(&self, target: &mut Value) -> bool {
        match target.prototype_mut() {
            Some(prototype) => {
                prototype.extensible = false;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prototype::function;
    use std::sync::atomic::{AtomicI32, Ordering};

    fn point(registry: &Registry) -> Value {
        registry.register(
            Prototype::new("Point")
                .with_constructor(|_| Box::new((0i32, 0i32)))
                .with_member_property("x", Property::data(Value::from(1)))
                .with_member_property("id", Property::readonly(Value::from(7)))
                .with_member_property(
                    "locked",
                    Property::data(Value::from(0)).with_configurable(false),
                )
                .with_member_property(
                    "hidden",
                    Property::data(Value::NULL).with_enumerable(false),
                ),
        );
        registry.construct("Point", &[])
    }

    #[test]
    fn test_get_own_only() {
        let registry = Registry::new();
        registry.register(
            Prototype::new("Base")
                .with_member_property("inherited", Property::data(Value::from(1))),
        );
        registry.register(
            Prototype::new("Derived")
                .extends("Base")
                .with_constructor(|_| Box::new(())),
        );
        let derived = registry.construct("Derived", &[]);
        assert!(registry.get(&derived, "inherited").is_null());
        assert!(!registry.has(&derived, "inherited"));
        assert_eq!(registry.resolve(&derived, "inherited").to::<i32>(), Some(1));
    }

    #[test]
    fn test_set_existing_and_new() {
        let registry = Registry::new();
        let mut p = point(&registry);
        assert!(registry.set(&mut p, "x", Value::from(5)));
        assert_eq!(registry.get(&p, "x").to::<i32>(), Some(5));

        assert!(registry.set(&mut p, "z", Value::from(9)));
        assert!(registry.has(&p, "z"));
        let z = registry.get_own_property_descriptor(&p, "z").unwrap();
        assert!(z.configurable && z.enumerable && !z.is_readonly());
    }

    #[test]
    fn test_new_key_stays_instance_local() {
        let registry = Registry::new();
        let mut a = point(&registry);
        let b = registry.construct("Point", &[]);
        assert!(registry.set(&mut a, "extra", Value::from(1)));
        assert!(registry.has(&a, "extra"));
        assert!(!registry.has(&b, "extra"));
    }

    #[test]
    fn test_set_readonly_fails() {
        let registry = Registry::new();
        let mut p = point(&registry);
        assert_eq!(
            registry.try_set(&mut p, "id", Value::from(8)),
            Err(ReflectError::NotWritable { key: "id".into() })
        );
        assert_eq!(registry.get(&p, "id").to::<i32>(), Some(7));
    }

    #[test]
    fn test_set_accessor() {
        let registry = Registry::new();
        let store = Arc::new(AtomicI32::new(0));
        let read = store.clone();
        let write = store.clone();
        registry.register(
            Prototype::new("Acc")
                .with_constructor(|_| Box::new(()))
                .with_member_property(
                    "rw",
                    Property::accessor(
                        Some(function(move |_, _| Value::from(read.load(Ordering::SeqCst)))),
                        Some(function(move |_, args| {
                            let n = args.first().and_then(|a| a.to::<i32>()).unwrap_or_default();
                            write.store(n, Ordering::SeqCst);
                            Value::NULL
                        })),
                    ),
                )
                .with_member_property("ro", Property::getter(function(|_, _| Value::from(1)))),
        );
        let mut acc = registry.construct("Acc", &[]);
        assert!(registry.set(&mut acc, "rw", Value::from(11)));
        assert_eq!(registry.get(&acc, "rw").to::<i32>(), Some(11));
        assert!(!registry.set(&mut acc, "ro", Value::from(2)));
        assert_eq!(registry.get(&acc, "ro").to::<i32>(), Some(1));
    }

    #[test]
    fn test_set_on_non_extensible() {
        let registry = Registry::new();
        let mut p = point(&registry);
        assert!(registry.prevent_extensions(&mut p));
        assert_eq!(
            registry.try_set(&mut p, "new", Value::NULL),
            Err(ReflectError::NotExtensible { key: "new".into() })
        );
        // existing writable keys still accept writes
        assert!(registry.set(&mut p, "x", Value::from(2)));
    }

    #[test]
    fn test_null_target() {
        let registry = Registry::new();
        let mut null = Value::NULL;
        assert_eq!(
            registry.try_set(&mut null, "k", Value::NULL),
            Err(ReflectError::NullTarget)
        );
        assert!(!registry.define_property(&mut null, "k", Property::empty()));
        assert!(!registry.prevent_extensions(&mut null));
        assert!(!registry.is_extensible(&null));
        assert!(registry.own_keys(&null).is_empty());
        assert!(registry.get_prototype_of(&null).is_none());
    }

    #[test]
    fn test_define_property() {
        let registry = Registry::new();
        let mut p = point(&registry);
        assert!(registry.define_property(&mut p, "x", Property::readonly(Value::from(3))));
        assert!(registry.get_own_property_descriptor(&p, "x").unwrap().is_readonly());

        assert_eq!(
            registry.try_define_property(&mut p, "locked", Property::empty()),
            Err(ReflectError::NotConfigurable {
                key: "locked".into()
            })
        );
    }

    #[test]
    fn test_define_after_prevent_extensions() {
        let registry = Registry::new();
        let mut p = point(&registry);
        let keys = registry.own_keys(&p);
        registry.prevent_extensions(&mut p);

        assert!(!registry.define_property(&mut p, "newKey", Property::data(Value::NULL)));
        assert_eq!(registry.own_keys(&p), keys);
        assert!(registry.define_property(&mut p, "x", Property::data(Value::from(4))));
        assert_eq!(registry.get(&p, "x").to::<i32>(), Some(4));
    }

    #[test]
    fn test_delete_property() {
        let registry = Registry::new();
        let mut p = point(&registry);
        assert!(registry.delete_property(&mut p, "x"));
        assert!(!registry.has(&p, "x"));
        assert!(registry.delete_property(&mut p, "never"));
        assert!(!registry.delete_property(&mut p, "locked"));
        assert!(registry.has(&p, "locked"));
    }

    #[test]
    fn test_own_keys_enumerable_in_order() {
        let registry = Registry::new();
        let p = point(&registry);
        assert_eq!(registry.own_keys(&p), vec!["x", "id", "locked"]);
    }

    #[test]
    fn test_prototype_of() {
        let registry = Registry::new();
        let mut p = point(&registry);
        assert_eq!(
            registry.get_prototype_of(&p).map(|p| p.name.clone()).as_deref(),
            Some("Point")
        );
        assert!(registry.set_prototype_of(&mut p, Prototype::new("Other")));
        assert_eq!(p.class_name(), Some("Other"));
        assert_eq!(p.to::<(i32, i32)>(), Some((0, 0)));

        registry.prevent_extensions(&mut p);
        assert!(!registry.set_prototype_of(&mut p, Prototype::new("Third")));
        assert_eq!(p.class_name(), Some("Other"));
        assert!(!registry.is_extensible(&p));
    }

    #[test]
    fn test_prevent_extensions_is_instance_local() {
        let registry = Registry::new();
        let mut a = point(&registry);
        let b = registry.construct("Point", &[]);
        registry.prevent_extensions(&mut a);
        assert!(!registry.is_extensible(&a));
        assert!(registry.is_extensible(&b));
        assert!(registry.find_prototype("Point").unwrap().extensible);
    }
}
