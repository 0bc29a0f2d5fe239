//! Property descriptors: stored values and accessor pairs

use std::fmt;

use super::callable::Function;
use crate::value::{Slot, Value};

/// The active form of a property descriptor.
#[derive(Clone)]
pub enum PropertyKind {
    /// Stored value form
    Data {
        /// Shared storage cell; copies of a prototype share it
        slot: Slot,
        /// Blocks writes through bindings and `Registry::set`
        readonly: bool,
    },

    /// Accessor form
    Accessor {
        /// Invoked with the owning value as caller and no arguments
        get: Option<Function>,
        /// Invoked with the owning value as caller and one argument
        set: Option<Function>,
    },
}

/// Per-property metadata.
///
/// An accessor with neither `get` nor `set` resolves to null and
/// accepts no writes.
#[derive(Clone)]
pub struct Property {
    /// Whether the descriptor itself may be replaced or deleted
    pub configurable: bool,

    /// Whether the key appears in `own_keys`
    pub enumerable: bool,

    /// Stored value or accessor pair
    pub kind: PropertyKind,
}

impl Property {
    fn with_kind(kind: PropertyKind) -> Self {
        Self {
            configurable: true,
            enumerable: true,
            kind,
        }
    }

    /// A writable stored value
    pub fn data(value: Value) -> Self {
        Self::with_kind(PropertyKind::Data {
            slot: Slot::new(value),
            readonly: false,
        })
    }

    /// A readonly stored value
    pub fn readonly(value: Value) -> Self {
        Self::with_kind(PropertyKind::Data {
            slot: Slot::new(value),
            readonly: true,
        })
    }

    /// A getter-only accessor
    pub fn getter(get: Function) -> Self {
        Self::accessor(Some(get), None)
    }

    /// A setter-only accessor
    pub fn setter(set: Function) -> Self {
        Self::accessor(None, Some(set))
    }

    /// An accessor pair
    pub fn accessor(get: Option<Function>, set: Option<Function>) -> Self {
        Self::with_kind(PropertyKind::Accessor { get, set })
    }

    /// A descriptor with no value and no accessors
    pub fn empty() -> Self {
        Self::accessor(None, None)
    }

    /// Set the configurable flag (builder pattern)
    pub fn with_configurable(mut self, configurable: bool) -> Self {
        self.configurable = configurable;
        self
    }

    /// Set the enumerable flag (builder pattern)
    pub fn with_enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = enumerable;
        self
    }

    /// Check if this is a stored value descriptor
    pub fn is_data(&self) -> bool {
        matches!(self.kind, PropertyKind::Data { .. })
    }

    /// Check if this is an accessor descriptor
    pub fn is_accessor(&self) -> bool {
        matches!(self.kind, PropertyKind::Accessor { .. })
    }

    /// Check if this is a readonly stored value
    pub fn is_readonly(&self) -> bool {
        matches!(self.kind, PropertyKind::Data { readonly: true, .. })
    }

    /// Check if a write could succeed: writable data or an accessor with a setter
    pub fn is_writable(&self) -> bool {
        match &self.kind {
            PropertyKind::Data { readonly, .. } => !readonly,
            PropertyKind::Accessor { set, .. } => set.is_some(),
        }
    }

    /// The stored value, for data descriptors
    pub fn value(&self) -> Option<Value> {
        match &self.kind {
            PropertyKind::Data { slot, .. } => Some(slot.get()),
            PropertyKind::Accessor { .. } => None,
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Property");
        s.field("configurable", &self.configurable)
            .field("enumerable", &self.enumerable);
        match &self.kind {
            PropertyKind::Data { slot, readonly } => {
                s.field("value", &slot.get()).field("readonly", readonly);
            }
            PropertyKind::Accessor { get, set } => {
                s.field("get", &get.is_some()).field("set", &set.is_some());
            }
        }
        s.finish()
    }
}
