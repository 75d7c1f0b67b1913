//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `relay_core::defaults`.

use relay_core::defaults;

/// Generate default value functions that forward to relay_core::defaults constants.
macro_rules! default_fns {
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_snapshot_retention => DEFAULT_SNAPSHOT_RETENTION: usize,
}

default_string_fns! {
    default_records_path  => DEFAULT_RECORDS_PATH,
    default_snapshot_dir  => DEFAULT_SNAPSHOT_DIR,
    default_output_format => DEFAULT_OUTPUT_FORMAT,
    default_log_level     => DEFAULT_LOG_LEVEL,
}
