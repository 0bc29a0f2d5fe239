//! # Protoreflect
//!
//! A prototype-based dynamic object model for native Rust data.
//!
//! Protoreflect pairs a type-erased, reference-counted [`Value`] handle
//! with a [`Registry`] of named [`Prototype`] records. Values carry a
//! prototype tag; property and method access resolves through a
//! JavaScript-style prototype chain at runtime, and assignments route
//! back through accessor setters via [`Binding`].
//!
//! ## Architecture
//!
//! - **Value**: owned or aliased native memory plus a prototype tag,
//!   with a destructor that runs exactly once
//! - **Prototype**: constructor/destructor hooks, call behaviour, and
//!   static/member property and function tables
//! - **Registry**: the catalog, the `Reflect`-style API and the
//!   prototype-chain walk
//!
//! ## Failure policy
//!
//! Nothing here panics or throws on a failed lookup. Unresolved paths
//! yield [`Value::NULL`] and rejected mutations return `false`, so chains
//! like `obj.at("a").at("b").call(&[])` stay safe to compose. The `try_*`
//! variants report a [`ReflectError`] for callers that want the reason.
//!
//! ```
//! use protoreflect::{function, Property, Prototype, Registry, Value};
//!
//! let registry = Registry::new();
//! registry.register(
//!     Prototype::new("Text")
//!         .with_constructor(|_| Box::new(String::new()))
//!         .with_member_property(
//!             "length",
//!             Property::getter(function(|this, _| {
//!                 Value::from(this.with(|s: &String| s.len() as i32))
//!             })),
//!         ),
//! );
//!
//! let text = registry.construct("Text", &[]);
//! text.with_mut(|s: &mut String| s.push_str("Hello, World!"));
//! assert_eq!(registry.resolve(&text, "length").to::<i32>(), Some(13));
//! assert_eq!(text.type_of(), "object");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod prototype;
pub mod registry;
pub mod value;

// Re-export main types
pub use config::RegistryConfig;
pub use error::{ReflectError, Result};
pub use prototype::{
    constructor, destructor, function, Constructor, Destructor, Function, FunctionMap,
    NativeBox, Property, PropertyKind, PropertyMap, Prototype,
};
pub use registry::{type_of, Builtin, Registry};
pub use value::{Binding, Slot, Value};

/// Protoreflect version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
