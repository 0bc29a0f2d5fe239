//! Registry configuration

/// Configuration for a [`Registry`](crate::Registry).
///
/// Controls how far prototype chains are followed, whether the
/// built-in primitive prototypes are installed, and lookup tracing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Maximum number of parent prototypes followed by one path lookup.
    ///
    /// The value's own prototype is always searched, so 0 limits lookup
    /// to own properties and functions.
    pub max_chain_depth: usize,

    /// Pre-register `bool`, `int`, `float`, `double` and `string`
    pub builtins: bool,

    /// Log every chain-walk step at trace level
    pub trace: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_chain_depth: 64,
            builtins: true,
            trace: false,
        }
    }
}

impl RegistryConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with a custom chain depth limit.
    pub fn with_max_chain_depth(max_depth: usize) -> Self {
        Self {
            max_chain_depth: max_depth,
            ..Default::default()
        }
    }

    /// Enable or disable the built-in primitive prototypes.
    pub fn builtins(mut self, enabled: bool) -> Self {
        self.builtins = enabled;
        self
    }

    /// Enable or disable lookup tracing.
    pub fn trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }
}
