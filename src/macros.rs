//! Macros to reduce boilerplate in the codebase

/// Macro to generate Display and FromStr implementations for enums
///
/// # Usage
///
/// ```rust,ignore
/// enum_display_fromstr!(
///     Urgency,
///     DeskError::invalid_severity,
///     {
///         Normal => "normal",
///         High => "high",
///         Critical => "critical",
///     }
/// );
///
/// assert_eq!(" HIGH ".parse::<Urgency>()?, Urgency::High);
/// ```
///
/// Parsing trims and lowercases its input; anything else is passed to the
/// error constructor.
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        $error_ctor:path,
        { $($variant:ident => $str:literal),+ $(,)? }
    ) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($enum_name::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::DeskError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok($enum_name::$variant),)+
                    _ => Err($error_ctor(s.to_string())),
                }
            }
        }
    };
}

/// Macro to generate only Display implementation for enums
#[macro_export]
macro_rules! enum_display {
    (
        $enum_name:ident,
        { $($variant:ident => $str:expr),+ $(,)? }
    ) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($enum_name::$variant => write!(f, $str),)+
                }
            }
        }
    };
}
