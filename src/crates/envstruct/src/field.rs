//! Field descriptors and the visitor seam between a structure and the parser
//!
//! A type becomes parseable by implementing [`EnvStruct`]. The implementation
//! is a descriptor table: it hands every mapped field to a [`FieldVisitor`]
//! together with its [`FieldMeta`], and every nested structure to
//! [`FieldVisitor::nested`]. `#[derive(EnvStruct)]` generates this table, but
//! it can also be written by hand:
//!
//! ```rust
//! use envstruct::{EnvStruct, FieldInspector, FieldMeta, FieldVisitor, Slot};
//!
//! #[derive(Default)]
//! struct Server {
//!     port: u16,
//! }
//!
//! const PORT: FieldMeta = FieldMeta::new("port", "PORT").with_default("8080");
//!
//! impl EnvStruct for Server {
//!     fn struct_name(&self) -> &'static str {
//!         "Server"
//!     }
//!
//!     fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor) {
//!         visitor.field(&PORT, Slot::new(&mut self.port));
//!     }
//!
//!     fn inspect_fields(&self, inspector: &mut dyn FieldInspector) {
//!         inspector.field(&PORT, envstruct::type_label_of(&self.port));
//!     }
//! }
//! ```

use crate::convert::{Converters, EnvValue};
use crate::error::ConvertError;
use std::any::{Any, TypeId};

/// Default separator for slice fields
pub const DEFAULT_SEPARATOR: &str = ",";

/// Static metadata of one mapped field
///
/// `required` and `expand` keep the raw flag text; it is interpreted when the
/// field is resolved so a malformed flag surfaces as a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// Field identifier, used in dotted paths
    pub name: &'static str,
    /// Environment-variable name, without prefix
    pub env: &'static str,
    pub default: Option<&'static str>,
    pub required: Option<&'static str>,
    pub separator: Option<&'static str>,
    pub expand: Option<&'static str>,
}

impl FieldMeta {
    pub const fn new(name: &'static str, env: &'static str) -> Self {
        Self {
            name,
            env,
            default: None,
            required: None,
            separator: None,
            expand: None,
        }
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the raw required flag, e.g. `"true"`
    pub const fn with_required(mut self, flag: &'static str) -> Self {
        self.required = Some(flag);
        self
    }

    pub const fn with_separator(mut self, separator: &'static str) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Set the raw expansion flag; only a case-insensitive `"true"` enables it
    pub const fn with_expand(mut self, flag: &'static str) -> Self {
        self.expand = Some(flag);
        self
    }

    /// Whether `${VAR}` expansion applies to the resolved value
    pub fn expands(&self) -> bool {
        self.expand
            .map(|flag| flag.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Separator for slice values, falling back to [`DEFAULT_SEPARATOR`]
    pub fn separator(&self) -> &'static str {
        match self.separator {
            Some(sep) if !sep.is_empty() => sep,
            _ => DEFAULT_SEPARATOR,
        }
    }

    /// Full key for this field under `prefix`
    pub fn key(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.env)
    }
}

/// A structure whose fields can be populated from environment variables
pub trait EnvStruct {
    /// Name reported as the owning structure in field errors
    fn struct_name(&self) -> &'static str;

    /// Hand every field to `visitor`, in declaration order
    fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor);

    /// Describe every field to `inspector` without modifying anything
    fn inspect_fields(&self, inspector: &mut dyn FieldInspector);
}

/// Receives the mutable fields of an [`EnvStruct`]
pub trait FieldVisitor {
    fn field(&mut self, meta: &FieldMeta, slot: Slot<'_>);

    fn nested(&mut self, name: &'static str, value: &mut dyn EnvStruct);
}

/// Receives the read-only field descriptions of an [`EnvStruct`]
pub trait FieldInspector {
    fn field(&mut self, meta: &FieldMeta, type_name: String);

    fn nested(&mut self, name: &'static str, value: &dyn EnvStruct);
}

impl<T: EnvStruct + ?Sized> EnvStruct for Box<T> {
    fn struct_name(&self) -> &'static str {
        (**self).struct_name()
    }

    fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor) {
        (**self).visit_fields(visitor)
    }

    fn inspect_fields(&self, inspector: &mut dyn FieldInspector) {
        (**self).inspect_fields(inspector)
    }
}

/// Access to a nested structure that may be absent
///
/// Implemented for every [`EnvStruct`] and for `Option` of one. A `None`
/// option is skipped by the walker.
pub trait NestedStruct {
    fn as_env_struct(&self) -> Option<&dyn EnvStruct>;

    fn as_env_struct_mut(&mut self) -> Option<&mut dyn EnvStruct>;
}

impl<T: EnvStruct> NestedStruct for T {
    fn as_env_struct(&self) -> Option<&dyn EnvStruct> {
        Some(self)
    }

    fn as_env_struct_mut(&mut self) -> Option<&mut dyn EnvStruct> {
        Some(self)
    }
}

impl<T: EnvStruct> NestedStruct for Option<T> {
    fn as_env_struct(&self) -> Option<&dyn EnvStruct> {
        self.as_ref().map(|v| v as &dyn EnvStruct)
    }

    fn as_env_struct_mut(&mut self) -> Option<&mut dyn EnvStruct> {
        self.as_mut().map(|v| v as &mut dyn EnvStruct)
    }
}

enum Conversion {
    Value(fn(&mut dyn Any, &str, &str) -> Result<(), ConvertError>),
    Unsupported,
    UnsupportedSlice,
}

/// A type-erased mutable reference to a mapped field
pub struct Slot<'a> {
    target: &'a mut dyn Any,
    type_id: TypeId,
    type_name: String,
    conversion: Conversion,
    assign: fn(&mut dyn Any, Box<dyn Any>) -> bool,
}

impl<'a> Slot<'a> {
    /// Slot for a field with a built-in or text conversion
    pub fn new<T: EnvValue>(target: &'a mut T) -> Self {
        Self::build(target, Conversion::Value(convert_into::<T>))
    }

    /// Slot for a field only a registered custom converter can fill
    pub fn custom<T: Any>(target: &'a mut T) -> Self {
        Self::build(target, Conversion::Unsupported)
    }

    /// Like [`Slot::custom`], for slice-typed fields
    pub fn custom_slice<T: Any>(target: &'a mut T) -> Self {
        Self::build(target, Conversion::UnsupportedSlice)
    }

    fn build<T: Any>(target: &'a mut T, conversion: Conversion) -> Self {
        Self {
            target,
            type_id: TypeId::of::<T>(),
            type_name: type_label::<T>(),
            conversion,
            assign: assign_boxed::<T>,
        }
    }

    /// Short name of the field's declared type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Convert `raw` and store it in the field
    ///
    /// A converter registered for the exact field type wins over the
    /// built-in conversion.
    pub fn set(
        self,
        raw: &str,
        separator: &str,
        converters: &Converters,
    ) -> Result<(), ConvertError> {
        if let Some(result) = converters.convert(self.type_id, raw) {
            let value = result.map_err(ConvertError::Custom)?;
            return if (self.assign)(self.target, value) {
                Ok(())
            } else {
                Err(ConvertError::TypeMismatch {
                    expected: self.type_name,
                })
            };
        }

        match self.conversion {
            Conversion::Value(convert) => convert(self.target, raw, separator),
            Conversion::Unsupported => Err(ConvertError::UnsupportedType {
                type_name: self.type_name,
            }),
            Conversion::UnsupportedSlice => Err(ConvertError::UnsupportedSliceType {
                type_name: self.type_name,
            }),
        }
    }
}

fn convert_into<T: EnvValue>(
    target: &mut dyn Any,
    raw: &str,
    separator: &str,
) -> Result<(), ConvertError> {
    let value = T::from_env_value(raw, separator)?;
    match target.downcast_mut::<T>() {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(ConvertError::TypeMismatch {
            expected: type_label::<T>(),
        }),
    }
}

fn assign_boxed<T: Any>(target: &mut dyn Any, value: Box<dyn Any>) -> bool {
    match (target.downcast_mut::<T>(), value.downcast::<T>()) {
        (Some(slot), Ok(value)) => {
            *slot = *value;
            true
        }
        _ => false,
    }
}

/// Short, path-free name of `T`, e.g. `Vec<String>`
pub fn type_label<T: ?Sized>() -> String {
    shorten(std::any::type_name::<T>())
}

/// [`type_label`] inferred from a value
pub fn type_label_of<T: ?Sized>(_value: &T) -> String {
    type_label::<T>()
}

fn shorten(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            segment.clear();
        } else if c.is_alphanumeric() || c == '_' {
            segment.push(c);
        } else {
            out.push_str(&segment);
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(&segment);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_type_label_strips_paths() {
        assert_eq!(type_label::<String>(), "String");
        assert_eq!(type_label::<Vec<String>>(), "Vec<String>");
        assert_eq!(type_label::<Option<Duration>>(), "Option<Duration>");
        assert_eq!(type_label::<u16>(), "u16");
        assert_eq!(type_label_of(&vec![1.5f32]), "Vec<f32>");
    }

    #[test]
    fn test_field_meta_flags() {
        let meta = FieldMeta::new("addr", "ADDR");
        assert!(!meta.expands());
        assert_eq!(meta.separator(), ",");
        assert_eq!(meta.key("APP_"), "APP_ADDR");

        let meta = meta.with_expand("TRUE").with_separator(":");
        assert!(meta.expands());
        assert_eq!(meta.separator(), ":");

        assert!(!FieldMeta::new("a", "A").with_expand("yes").expands());
        assert_eq!(FieldMeta::new("a", "A").with_separator("").separator(), ",");
    }

    #[test]
    fn test_slot_builtin_conversion() {
        let mut port: u16 = 0;
        Slot::new(&mut port)
            .set("8080", ",", &Converters::new())
            .unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_slot_custom_without_converter_is_unsupported() {
        struct Opaque;
        let mut value = Opaque;
        let err = Slot::custom(&mut value)
            .set("x", ",", &Converters::new())
            .unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedType { .. }));

        let mut values: Vec<Opaque> = Vec::new();
        let err = Slot::custom_slice(&mut values)
            .set("x,y", ",", &Converters::new())
            .unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedSliceType { .. }));
    }

    #[test]
    fn test_slot_prefers_registered_converter() {
        let mut converters = Converters::new();
        converters.register(|s: &str| Ok::<_, std::num::ParseIntError>(s.len() as u16));

        let mut port: u16 = 0;
        Slot::new(&mut port).set("abcd", ",", &converters).unwrap();
        assert_eq!(port, 4);
    }
}
