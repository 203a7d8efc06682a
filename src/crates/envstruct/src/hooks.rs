//! Process-wide parse hooks
//!
//! Two optional extension points, both configured before parsing starts:
//!
//! - an on-set callback, called once per successfully set field
//! - a debug sink receiving one line per set field, including the value
//!
//! Independently of these, every set field emits a `tracing` debug event
//! without the value.

use crate::field::FieldMeta;
use parking_lot::{const_rwlock, RwLock};
use std::sync::Arc;

/// Callback invoked after a field was set from the given raw value
pub type OnVarSet = Arc<dyn Fn(&FieldMeta, &str) + Send + Sync>;

/// Sink for debug lines such as `env: APP_PORT = 8080 (field: Config.port)`
pub type DebugSink = Arc<dyn Fn(&str) + Send + Sync>;

struct Hooks {
    on_set: Option<OnVarSet>,
    debug: Option<DebugSink>,
}

static HOOKS: RwLock<Hooks> = const_rwlock(Hooks {
    on_set: None,
    debug: None,
});

/// Install or clear the on-set callback
pub fn set_on_var_set(hook: Option<OnVarSet>) {
    HOOKS.write().on_set = hook;
}

/// Install or clear the debug sink
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// envstruct::enable_debug_logging(Some(Arc::new(|line: &str| eprintln!("{}", line))));
/// // ... parse ...
/// envstruct::enable_debug_logging(None);
/// ```
pub fn enable_debug_logging(sink: Option<DebugSink>) {
    HOOKS.write().debug = sink;
}

/// Report a successfully set field to tracing and the installed hooks
pub(crate) fn field_set(meta: &FieldMeta, key: &str, value: &str, struct_name: &str, path: &str) {
    tracing::debug!(key = %key, field = %path, r#struct = %struct_name, "Set field from environment");

    // Clone out of the lock so hooks may reconfigure hooks
    let (on_set, debug) = {
        let hooks = HOOKS.read();
        (hooks.on_set.clone(), hooks.debug.clone())
    };

    if let Some(debug) = debug {
        debug(&format!(
            "env: {} = {} (field: {}.{})",
            key, value, struct_name, path
        ));
    }
    if let Some(on_set) = on_set {
        on_set(meta, value);
    }
}
