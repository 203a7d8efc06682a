//! Structure walker
//!
//! Drives resolution and conversion over every field of an [`EnvStruct`],
//! recursing into nested structures and collecting field failures.

use crate::convert::Converters;
use crate::error::{FieldError, FieldErrorKind, ParseErrors};
use crate::field::{EnvStruct, FieldMeta, FieldVisitor, Slot};
use crate::hooks;
use crate::resolve::resolve;
use crate::source::Source;

pub(crate) struct Walker<'a> {
    prefix: &'a str,
    source: &'a dyn Source,
    converters: &'a Converters,
    path: String,
    struct_name: &'static str,
    errors: ParseErrors,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(prefix: &'a str, source: &'a dyn Source, converters: &'a Converters) -> Self {
        Self {
            prefix,
            source,
            converters,
            path: String::new(),
            struct_name: "",
            errors: ParseErrors::default(),
        }
    }

    /// Walk `target` and return every failure, in declaration order
    pub(crate) fn run<T: EnvStruct + ?Sized>(mut self, target: &mut T) -> ParseErrors {
        self.struct_name = target.struct_name();
        target.visit_fields(&mut self);
        self.errors
    }

    fn record(&mut self, path: String, kind: FieldErrorKind) {
        self.errors.push(FieldError {
            path,
            struct_name: self.struct_name,
            kind,
        });
    }
}

pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

impl FieldVisitor for Walker<'_> {
    fn field(&mut self, meta: &FieldMeta, slot: Slot<'_>) {
        let path = join_path(&self.path, meta.name);

        let value = match resolve(meta, self.prefix, self.source) {
            Ok(value) => value,
            Err(kind) => return self.record(path, kind),
        };
        if value.is_empty() {
            return;
        }

        if let Err(err) = slot.set(&value, meta.separator(), self.converters) {
            return self.record(path, err.into());
        }

        hooks::field_set(meta, &meta.key(self.prefix), &value, self.struct_name, &path);
    }

    fn nested(&mut self, name: &'static str, value: &mut dyn EnvStruct) {
        let path = join_path(&self.path, name);
        let parent_path = std::mem::replace(&mut self.path, path);
        let parent_struct = std::mem::replace(&mut self.struct_name, value.struct_name());

        value.visit_fields(self);

        self.path = parent_path;
        self.struct_name = parent_struct;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldInspector;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Database {
        host: String,
        port: u16,
    }

    const DB_HOST: FieldMeta = FieldMeta::new("host", "DB_HOST").with_required("true");
    const DB_PORT: FieldMeta = FieldMeta::new("port", "DB_PORT").with_default("5432");

    impl EnvStruct for Database {
        fn struct_name(&self) -> &'static str {
            "Database"
        }

        fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor) {
            visitor.field(&DB_HOST, Slot::new(&mut self.host));
            visitor.field(&DB_PORT, Slot::new(&mut self.port));
        }

        fn inspect_fields(&self, _inspector: &mut dyn FieldInspector) {}
    }

    #[derive(Default)]
    struct App {
        name: String,
        db: Database,
        replica: Option<Database>,
    }

    const NAME: FieldMeta = FieldMeta::new("name", "NAME");

    impl EnvStruct for App {
        fn struct_name(&self) -> &'static str {
            "App"
        }

        fn visit_fields(&mut self, visitor: &mut dyn FieldVisitor) {
            visitor.field(&NAME, Slot::new(&mut self.name));
            visitor.nested("db", &mut self.db);
            if let Some(replica) = self.replica.as_mut() {
                visitor.nested("replica", replica);
            }
        }

        fn inspect_fields(&self, _inspector: &mut dyn FieldInspector) {}
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "db"), "db");
        assert_eq!(join_path("app.db", "port"), "app.db.port");
    }

    #[test]
    fn test_walks_nested_and_skips_absent_option() {
        let source = env(&[("NAME", "svc"), ("DB_HOST", "pg")]);
        let converters = Converters::new();
        let mut app = App::default();

        let errors = Walker::new("", &source, &converters).run(&mut app);

        assert!(errors.is_empty());
        assert_eq!(app.name, "svc");
        assert_eq!(app.db.host, "pg");
        assert_eq!(app.db.port, 5432);
        assert!(app.replica.is_none());
    }

    #[test]
    fn test_errors_carry_nested_path_and_owner() {
        let source = env(&[("DB_PORT", "many")]);
        let converters = Converters::new();
        let mut app = App {
            replica: Some(Database::default()),
            ..Default::default()
        };

        let errors = Walker::new("", &source, &converters).run(&mut app);

        assert_eq!(
            errors.paths(),
            vec!["db.host", "db.port", "replica.host", "replica.port"]
        );
        assert!(errors.iter().all(|e| e.struct_name == "Database"));
    }

    #[test]
    fn test_empty_value_leaves_field_untouched() {
        let source = env(&[("NAME", ""), ("DB_HOST", "pg")]);
        let converters = Converters::new();
        let mut app = App {
            name: "keep".to_string(),
            ..Default::default()
        };

        let errors = Walker::new("", &source, &converters).run(&mut app);

        assert!(errors.is_empty());
        assert_eq!(app.name, "keep");
    }

    #[test]
    fn test_partial_population_on_error() {
        let source = env(&[("NAME", "svc"), ("DB_PORT", "x")]);
        let converters = Converters::new();
        let mut app = App::default();

        let errors = Walker::new("", &source, &converters).run(&mut app);

        assert_eq!(errors.len(), 2);
        assert_eq!(app.name, "svc");
    }
}
