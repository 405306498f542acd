//! Command arguments with typed coercions.
//!
//! A [`CommandArg`] wraps one token of an input line. The `as_*` views never
//! fail: a token that does not parse records a type error into the running
//! command's [`ErrorSlot`] and yields a default, so command bodies can keep
//! going. The `try_*` views return the error instead.

use std::cell::RefCell;
use std::fmt;

use bevy::log::debug;
use thiserror::Error;

const TRUE_STRINGS: [&str; 4] = ["true", "yes", "y", "on"];
const FALSE_STRINGS: [&str; 4] = ["false", "no", "n", "off"];

/// Coercion failure for a single argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    /// The token does not parse as the expected type.
    #[error("Incorrect type for {token}, expected <{expected}>")]
    Type {
        token: String,
        expected: &'static str,
    },
    /// The token does not name any variant of the enumeration.
    #[error("value {token} not found in enumerated type {type_name}")]
    UnknownEnumerant {
        token: String,
        type_name: &'static str,
    },
}

/// First error issued while a command runs.
///
/// Created fresh for every dispatch and shared by all of its arguments.
#[derive(Debug, Default)]
pub struct ErrorSlot(RefCell<Option<String>>);

impl ErrorSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error. Later errors are ignored once one is set.
    pub fn issue(&self, message: impl Into<String>) {
        let mut slot = self.0.borrow_mut();
        if slot.is_none() {
            *slot = Some(message.into());
        }
    }

    /// Check if an error has been recorded.
    pub fn is_set(&self) -> bool {
        self.0.borrow().is_some()
    }

    /// Take the recorded error, leaving the slot empty.
    pub fn take(&self) -> Option<String> {
        self.0.borrow_mut().take()
    }
}

/// An enumeration whose variants can be named from the terminal.
///
/// Variant names are matched case-insensitively.
///
/// # Examples
///
/// ```
/// use bevy_command_terminal::core::EnumValue;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Difficulty { Easy, Hard }
///
/// impl EnumValue for Difficulty {
///     const TYPE_NAME: &'static str = "Difficulty";
///     const VARIANTS: &'static [(&'static str, Self)] =
///         &[("Easy", Difficulty::Easy), ("Hard", Difficulty::Hard)];
/// }
///
/// assert_eq!(Difficulty::parse_name("hard"), Some(Difficulty::Hard));
/// assert_eq!(Difficulty::Easy.variant_name(), "Easy");
/// ```
pub trait EnumValue: Copy + PartialEq + Send + Sync + 'static {
    /// Type name used in error messages.
    const TYPE_NAME: &'static str;

    /// Every nameable variant with its display name.
    const VARIANTS: &'static [(&'static str, Self)];

    /// Look up a variant by name, ignoring ASCII case.
    fn parse_name(s: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, value)| *value)
    }

    /// The display name of this variant.
    fn variant_name(&self) -> &'static str {
        Self::VARIANTS
            .iter()
            .find(|(_, value)| value == self)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }
}

/// One token of a command line.
#[derive(Debug, Clone, Copy)]
pub struct CommandArg<'a> {
    string: &'a str,
    errors: Option<&'a ErrorSlot>,
}

impl<'a> CommandArg<'a> {
    /// Create a detached argument.
    ///
    /// Soft coercion failures on a detached argument are only logged.
    pub fn new(string: &'a str) -> Self {
        Self { string, errors: None }
    }

    /// Create an argument that reports soft coercion failures into `errors`.
    pub fn with_errors(string: &'a str, errors: &'a ErrorSlot) -> Self {
        Self {
            string,
            errors: Some(errors),
        }
    }

    /// The raw token.
    #[inline]
    pub fn as_str(&self) -> &'a str {
        self.string
    }

    /// Parse as an integer.
    pub fn try_int(&self) -> Result<i32, ArgError> {
        self.string.parse().map_err(|_| self.type_error("int"))
    }

    /// Parse as a float.
    pub fn try_float(&self) -> Result<f32, ArgError> {
        self.string.parse().map_err(|_| self.type_error("float"))
    }

    /// Parse as a boolean (`true/yes/y/on`, `false/no/n/off`).
    pub fn try_bool(&self) -> Result<bool, ArgError> {
        let lower = self.string.to_lowercase();
        if TRUE_STRINGS.contains(&lower.as_str()) {
            Ok(true)
        } else if FALSE_STRINGS.contains(&lower.as_str()) {
            Ok(false)
        } else {
            Err(self.type_error("bool"))
        }
    }

    /// Parse as a variant of `T`.
    pub fn try_enum<T: EnumValue>(&self) -> Result<T, ArgError> {
        T::parse_name(self.string).ok_or_else(|| ArgError::UnknownEnumerant {
            token: self.string.to_string(),
            type_name: T::TYPE_NAME,
        })
    }

    /// Integer view, `0` on failure.
    pub fn as_int(&self) -> i32 {
        self.try_int().unwrap_or_else(|err| {
            self.report(err);
            0
        })
    }

    /// Float view, `0.0` on failure.
    pub fn as_float(&self) -> f32 {
        self.try_float().unwrap_or_else(|err| {
            self.report(err);
            0.0
        })
    }

    /// Boolean view, `false` on failure.
    pub fn as_bool(&self) -> bool {
        self.try_bool().unwrap_or_else(|err| {
            self.report(err);
            false
        })
    }

    /// Enumeration view, `None` on failure.
    pub fn as_enum<T: EnumValue>(&self) -> Option<T> {
        self.try_enum().map_err(|err| self.report(err)).ok()
    }

    fn type_error(&self, expected: &'static str) -> ArgError {
        ArgError::Type {
            token: self.string.to_string(),
            expected,
        }
    }

    fn report(&self, err: ArgError) {
        match self.errors {
            Some(slot) => slot.issue(err.to_string()),
            None => debug!("Terminal: {}", err),
        }
    }
}

impl fmt::Display for CommandArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.string)
    }
}
