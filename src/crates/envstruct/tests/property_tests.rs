//! Property tests for parsing invariants

use envstruct::{get_all_vars, EnvParser, EnvStruct};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Default, PartialEq, EnvStruct)]
struct Untagged {
    host: String,
    port: u16,
    peers: Vec<String>,
}

#[derive(Debug, Default, EnvStruct)]
struct Tagged {
    #[env(name = "PORT", default = "8080")]
    port: u16,

    #[env(name = "LIST", separator = ":")]
    list: Vec<String>,

    #[env(name = "NAME")]
    name: String,
}

fn env_map() -> impl Strategy<Value = HashMap<String, String>> {
    prop::collection::hash_map("[A-Z_]{1,8}", ".{0,16}", 0..8)
}

proptest! {
    #[test]
    fn test_untagged_struct_never_fails(source in env_map()) {
        let mut target = Untagged::default();
        prop_assert!(EnvParser::new().with_source(source).parse(&mut target).is_ok());
        prop_assert_eq!(target, Untagged::default());
    }

    #[test]
    fn test_valid_ports_round_trip(port in any::<u16>()) {
        let source = HashMap::from([("APP_PORT".to_string(), port.to_string())]);
        let mut target = Tagged::default();
        EnvParser::new()
            .with_prefix("APP_")
            .with_source(source)
            .parse(&mut target)
            .unwrap();
        prop_assert_eq!(target.port, port);
    }

    #[test]
    fn test_out_of_range_ports_fail(port in 65_536u32..u32::MAX) {
        let source = HashMap::from([("PORT".to_string(), port.to_string())]);
        let mut target = Tagged::default();
        let err = EnvParser::new().with_source(source).parse(&mut target).unwrap_err();
        prop_assert_eq!(err.field_errors().len(), 1);
        prop_assert_eq!(target.port, 0);
    }

    #[test]
    fn test_separator_split_preserves_items(items in prop::collection::vec("[a-z0-9]{1,6}", 1..6)) {
        let source = HashMap::from([("LIST".to_string(), items.join(":"))]);
        let mut target = Tagged::default();
        EnvParser::new().with_source(source).parse(&mut target).unwrap();
        prop_assert_eq!(target.list, items);
    }

    #[test]
    fn test_prefix_without_separator_is_rejected(prefix in "[A-Z]{1,6}") {
        let mut target = Tagged::default();
        let err = EnvParser::new()
            .with_prefix(prefix.as_str())
            .with_source(HashMap::<String, String>::new())
            .parse(&mut target)
            .unwrap_err();
        prop_assert_eq!(err.error_code(), "E_INVALID_PREFIX");
        prop_assert_eq!(target.port, 0);
    }

    #[test]
    fn test_var_names_carry_prefix(prefix in "[A-Z]{0,6}") {
        let prefix = if prefix.is_empty() { prefix } else { format!("{}_", prefix) };
        let vars = get_all_vars(&Tagged::default(), &prefix);
        prop_assert_eq!(vars.len(), 3);
        for var in &vars {
            prop_assert!(var.name.starts_with(&prefix));
        }
    }

    #[test]
    fn test_non_empty_strings_are_stored_verbatim(value in ".{1,32}") {
        let source = HashMap::from([("NAME".to_string(), value.clone())]);
        let mut target = Tagged::default();
        EnvParser::new().with_source(source).parse(&mut target).unwrap();
        prop_assert_eq!(target.name, value);
    }
}
