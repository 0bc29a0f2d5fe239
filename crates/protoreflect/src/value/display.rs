//! Display and Debug implementations for Value

use std::fmt;

use super::*;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "null");
        }
        if self.is_callable() {
            return match self.class_name() {
                Some(name) if !name.is_empty() => write!(f, "[function {}]", name),
                _ => write!(f, "[function]"),
            };
        }
        if self.is_dangling() {
            return write!(f, "[dangling {}]", self.class_name().unwrap_or_default());
        }

        // Built-in primitives print their native value
        if let Some(b) = self.to::<bool>() {
            return write!(f, "{}", b);
        }
        if let Some(n) = self.to::<i32>() {
            return write!(f, "{}", n);
        }
        if let Some(n) = self.to::<f32>() {
            return write!(f, "{}", n);
        }
        if let Some(n) = self.to::<f64>() {
            return write!(f, "{}", n);
        }
        if let Some(written) = self.with(|s: &String| write!(f, "{}", s)) {
            return written;
        }

        write!(f, "[object {}]", self.class_name().unwrap_or_default())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ownership = match &self.handle {
            Handle::Empty => "empty",
            Handle::Owned(_) => "owned",
            Handle::Alias(_) if self.is_dangling() => "dangling",
            Handle::Alias(_) => "alias",
        };
        match self.class_name() {
            Some(name) => write!(f, "Value({}, {}: {})", name, ownership, self),
            None => write!(f, "Value({}: {})", ownership, self),
        }
    }
}
