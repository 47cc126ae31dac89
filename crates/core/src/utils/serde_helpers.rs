//! Serde utility helpers for lenient, case-insensitive deserialization

/// Macro to implement lenient deserialization for policy-like enums
///
/// Strings are matched after trimming and lowercasing, booleans map to the given
/// variants, and anything unrecognized (including `null`) falls back to the
/// default variant instead of failing.
///
/// Usage:
/// ```ignore
/// impl_lenient_deserialize!(
///     MyPolicy,
///     default = Smart,
///     true => Yes,
///     false => No,
///     Yes => "yes",
///     No => "no",
/// );
/// ```
#[macro_export]
macro_rules! impl_lenient_deserialize {
    (
        $enum_type:ty,
        default = $default:ident,
        true => $on_true:ident,
        false => $on_false:ident,
        $($variant:ident => $str_val:literal),+ $(,)?
    ) => {
        impl<'de> serde::Deserialize<'de> for $enum_type {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                Ok(match value {
                    serde_json::Value::Bool(true) => Self::$on_true,
                    serde_json::Value::Bool(false) => Self::$on_false,
                    serde_json::Value::String(s) => match s.trim().to_lowercase().as_str() {
                        $(
                            $str_val => Self::$variant,
                        )+
                        _ => Self::$default,
                    },
                    _ => Self::$default,
                })
            }
        }
    };
}
