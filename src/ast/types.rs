//! file: src/ast/types.rs
//! description: source-language type descriptors.
//!
//! A `TypeDescriptor` names a Rill type as written in source. Arrays carry
//! their element type; maps carry a key type (in `element_type`) and a
//! value type. Descriptors are built once by the front end and never
//! mutated afterwards.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    name: String,
    element_type: Option<Box<TypeDescriptor>>,
    value_type: Option<Box<TypeDescriptor>>,
}

impl TypeDescriptor {
    /// A plain named type: a primitive (`int`, `float`, `bool`, `string`,
    /// `void`) or a user-defined aggregate.
    pub fn named(name: impl Into<String>) -> Self {
        TypeDescriptor {
            name: name.into(),
            element_type: None,
            value_type: None,
        }
    }

    /// An array of `element`.
    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor {
            name: "array".to_string(),
            element_type: Some(Box::new(element)),
            value_type: None,
        }
    }

    /// A map from `key` to `value`. The key type is stored in the element
    /// slot, mirroring how array element types are stored.
    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor {
            name: "map".to_string(),
            element_type: Some(Box::new(key)),
            value_type: Some(Box::new(value)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn element_type(&self) -> Option<&TypeDescriptor> {
        self.element_type.as_deref()
    }

    pub fn value_type(&self) -> Option<&TypeDescriptor> {
        self.value_type.as_deref()
    }

    pub fn is_array(&self) -> bool {
        self.name == "array"
    }

    pub fn is_map(&self) -> bool {
        self.name == "map"
    }

    /// Convenience constructors for the primitives the lowering rules
    /// special-case.
    pub fn int() -> Self {
        Self::named("int")
    }
    pub fn float() -> Self {
        Self::named("float")
    }
    pub fn bool() -> Self {
        Self::named("bool")
    }
    pub fn string() -> Self {
        Self::named("string")
    }
    pub fn void() -> Self {
        Self::named("void")
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_map() {
            let key = self.element_type().map(|t| t.to_string()).unwrap_or_default();
            let value = self.value_type().map(|t| t.to_string()).unwrap_or_default();
            return write!(f, "map<{}, {}>", key, value);
        }
        if let Some(elem) = self.element_type() {
            return write!(f, "{}<{}>", self.name, elem);
        }
        write!(f, "{}", self.name)
    }
}
