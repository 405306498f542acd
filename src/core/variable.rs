//! Terminal variables bound to getter and setter endpoints.
//!
//! A variable does not store its value. It reads and writes whatever state the
//! endpoints point at, usually a resource in the `World`.

use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;
use thiserror::Error;

use super::{ArgError, CommandArg, CommandError, CommandResult, EnumValue};

/// Declared type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    String,
    Int,
    Float,
    Bool,
    /// An enumeration, with its type name.
    Enum(&'static str),
}

/// A value read from a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    String(String),
    Int(i32),
    Float(f32),
    Bool(bool),
    Enum(&'static str),
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Enum(name) => f.write_str(name),
        }
    }
}

/// Failure to read or write a variable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariableError {
    #[error("no variable registered with name {0}")]
    Unknown(String),
    #[error(transparent)]
    Coercion(#[from] ArgError),
    #[error(transparent)]
    Rejected(#[from] CommandError),
}

impl From<VariableError> for CommandError {
    fn from(err: VariableError) -> Self {
        match err {
            VariableError::Rejected(err) => err,
            other => CommandError(other.to_string()),
        }
    }
}

/// Types a variable can be declared with.
///
/// Implemented for `String`, `i32`, `f32` and `bool`. Enumerations go through
/// [`TerminalVariable::enumeration`].
pub trait VariableType: Sized + Send + Sync + 'static {
    const KIND: VariableKind;

    /// Coerce an argument with the strict views.
    fn from_arg(arg: &CommandArg<'_>) -> Result<Self, ArgError>;

    fn into_value(self) -> VariableValue;
}

impl VariableType for String {
    const KIND: VariableKind = VariableKind::String;

    fn from_arg(arg: &CommandArg<'_>) -> Result<Self, ArgError> {
        Ok(arg.as_str().to_string())
    }

    fn into_value(self) -> VariableValue {
        VariableValue::String(self)
    }
}

impl VariableType for i32 {
    const KIND: VariableKind = VariableKind::Int;

    fn from_arg(arg: &CommandArg<'_>) -> Result<Self, ArgError> {
        arg.try_int()
    }

    fn into_value(self) -> VariableValue {
        VariableValue::Int(self)
    }
}

impl VariableType for f32 {
    const KIND: VariableKind = VariableKind::Float;

    fn from_arg(arg: &CommandArg<'_>) -> Result<Self, ArgError> {
        arg.try_float()
    }

    fn into_value(self) -> VariableValue {
        VariableValue::Float(self)
    }
}

impl VariableType for bool {
    const KIND: VariableKind = VariableKind::Bool;

    fn from_arg(arg: &CommandArg<'_>) -> Result<Self, ArgError> {
        arg.try_bool()
    }

    fn into_value(self) -> VariableValue {
        VariableValue::Bool(self)
    }
}

type Getter = Arc<dyn Fn(&World) -> VariableValue + Send + Sync>;
type Setter = Arc<dyn Fn(&CommandArg<'_>, &mut World) -> Result<(), VariableError> + Send + Sync>;

/// A named variable exposed to the terminal.
///
/// # Examples
///
/// ```ignore
/// #[derive(Resource)]
/// struct Gravity(f32);
///
/// let gravity = TerminalVariable::new(
///     "Gravity",
///     |world: &World| world.resource::<Gravity>().0,
///     |value: f32, world: &mut World| {
///         world.resource_mut::<Gravity>().0 = value;
///         Ok(())
///     },
/// );
/// ```
#[derive(Clone)]
pub struct TerminalVariable {
    name: String,
    kind: VariableKind,
    getter: Getter,
    setter: Setter,
}

impl TerminalVariable {
    /// Create a variable of a basic type.
    pub fn new<T, G, S>(name: impl Into<String>, getter: G, setter: S) -> Self
    where
        T: VariableType,
        G: Fn(&World) -> T + Send + Sync + 'static,
        S: Fn(T, &mut World) -> CommandResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: T::KIND,
            getter: Arc::new(move |world: &World| getter(world).into_value()),
            setter: Arc::new(move |arg: &CommandArg<'_>, world: &mut World| {
                let value = T::from_arg(arg)?;
                setter(value, world)?;
                Ok(())
            }),
        }
    }

    /// Create a variable of an enumeration type.
    pub fn enumeration<T, G, S>(name: impl Into<String>, getter: G, setter: S) -> Self
    where
        T: EnumValue,
        G: Fn(&World) -> T + Send + Sync + 'static,
        S: Fn(T, &mut World) -> CommandResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: VariableKind::Enum(T::TYPE_NAME),
            getter: Arc::new(move |world: &World| VariableValue::Enum(getter(world).variant_name())),
            setter: Arc::new(move |arg: &CommandArg<'_>, world: &mut World| {
                let value = arg.try_enum::<T>()?;
                setter(value, world)?;
                Ok(())
            }),
        }
    }

    /// The name as registered.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared kind.
    #[inline]
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// Read the current value.
    pub fn get(&self, world: &World) -> VariableValue {
        (self.getter)(world)
    }

    /// Coerce `arg` to the declared kind and write it.
    pub fn set(&self, arg: &CommandArg<'_>, world: &mut World) -> Result<(), VariableError> {
        (self.setter)(arg, world)
    }
}

impl fmt::Debug for TerminalVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalVariable")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
