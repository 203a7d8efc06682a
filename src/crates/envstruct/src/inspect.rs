//! Non-mutating introspection of the variables a structure reads
//!
//! Useful for generating documentation, checking a deployment before
//! starting, or debugging configuration issues. Nothing here reads the
//! environment except [`validate_required`].

use crate::error::{Error, Result};
use crate::field::{EnvStruct, FieldInspector, FieldMeta};
use crate::resolve::required_flag;
use crate::source::{ProcessEnv, Source};
use crate::walk::join_path;
use serde::{Deserialize, Serialize};

/// Description of one environment variable read by a structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarInfo {
    /// Full variable name, prefix included
    pub name: String,
    pub field_name: String,
    /// Dotted path of the field from the root structure
    pub field_path: String,
    /// Whether the variable must be set; an unparseable flag counts as `false`
    pub required: bool,
    pub default: String,
    /// Short name of the field's declared type
    pub type_name: String,
    pub has_default: bool,
}

struct Collector<'a> {
    prefix: &'a str,
    path: String,
    vars: Vec<VarInfo>,
}

impl FieldInspector for Collector<'_> {
    fn field(&mut self, meta: &FieldMeta, type_name: String) {
        let default = meta.default.unwrap_or_default();
        self.vars.push(VarInfo {
            name: meta.key(self.prefix),
            field_name: meta.name.to_string(),
            field_path: join_path(&self.path, meta.name),
            required: required_flag(meta).unwrap_or(false),
            default: default.to_string(),
            type_name,
            has_default: !default.is_empty(),
        });
    }

    fn nested(&mut self, name: &'static str, value: &dyn EnvStruct) {
        let path = join_path(&self.path, name);
        let parent = std::mem::replace(&mut self.path, path);
        value.inspect_fields(self);
        self.path = parent;
    }
}

/// Every variable `target` would read, in declaration order
///
/// # Example
///
/// ```rust,ignore
/// for var in envstruct::get_all_vars(&Config::default(), "") {
///     println!("{}: {} (required: {}, default: {})",
///         var.name, var.type_name, var.required, var.default);
/// }
/// ```
pub fn get_all_vars<T: EnvStruct + ?Sized>(target: &T, prefix: &str) -> Vec<VarInfo> {
    let mut collector = Collector {
        prefix,
        path: String::new(),
        vars: Vec::new(),
    };
    target.inspect_fields(&mut collector);
    collector.vars
}

/// Names of the required variables `target` would read
pub fn get_required_vars<T: EnvStruct + ?Sized>(target: &T, prefix: &str) -> Vec<String> {
    get_all_vars(target, prefix)
        .into_iter()
        .filter(|var| var.required)
        .map(|var| var.name)
        .collect()
}

/// Check that every required variable is present in the process environment
///
/// Only presence is checked, values are not converted.
pub fn validate_required<T: EnvStruct + ?Sized>(target: &T, prefix: &str) -> Result<()> {
    validate_required_in(target, prefix, &ProcessEnv)
}

pub(crate) fn validate_required_in<T: EnvStruct + ?Sized>(
    target: &T,
    prefix: &str,
    source: &dyn Source,
) -> Result<()> {
    let missing: Vec<String> = get_required_vars(target, prefix)
        .into_iter()
        .filter(|name| source.lookup(name).is_none())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = missing.len(), "Required environment variables missing");
        Err(Error::MissingRequired(missing))
    }
}
