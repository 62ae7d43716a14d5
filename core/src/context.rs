//! Typed, precedence-aware access to resolved values during one handler
//! invocation.
//!
//! An [`ExecutionContext`] binds the resolved command, the tree, and an
//! opaque shared-state reference for the duration of one handler call.
//! Values it hands out are only guaranteed for that call; a handler copies
//! anything it needs to retain.

use std::any::Any;

use crate::command::{Cli, Command, CommandId};
use crate::error::ParseError;
use crate::value::Value;

mod sealed {
    pub trait Sealed {}
}

/// The closed set of representations a resolved value can be read as.
///
/// Implemented for exactly `bool`, `String`, the signed and unsigned
/// integer widths, `f32`, and `f64`. Each tagged [`Value`] kind maps onto
/// one family: `Bool` to `bool`, `Str` to `String`, `Int` to the integers,
/// and `Float` to the floats. Narrowing within a family is range-checked;
/// crossing families is a caller bug and panics.
pub trait FlagValue: sealed::Sealed + Sized {
    #[doc(hidden)]
    fn from_value(value: &Value, name: &str) -> Result<Self, ParseError>;
}

impl sealed::Sealed for bool {}
impl FlagValue for bool {
    fn from_value(value: &Value, name: &str) -> Result<Self, ParseError> {
        match value {
            Value::Bool(v) => Ok(*v),
            other => panic!("'{name}' is {} but was requested as bool", other.kind()),
        }
    }
}

impl sealed::Sealed for String {}
impl FlagValue for String {
    fn from_value(value: &Value, name: &str) -> Result<Self, ParseError> {
        match value {
            Value::Str(v) => Ok(v.clone()),
            other => panic!("'{name}' is {} but was requested as String", other.kind()),
        }
    }
}

macro_rules! integer_flag_value {
    ($($ty:ty),*) => {$(
        impl sealed::Sealed for $ty {}
        impl FlagValue for $ty {
            fn from_value(value: &Value, name: &str) -> Result<Self, ParseError> {
                match value {
                    Value::Int(v) => <$ty>::try_from(*v)
                        .map_err(|_| ParseError::IntegerValueOutOfRange(v.to_string())),
                    other => panic!(
                        "'{name}' is {} but was requested as an integer",
                        other.kind()
                    ),
                }
            }
        }
    )*};
}

integer_flag_value!(i8, i16, i32, i64, u8, u16, u32, u64);

impl sealed::Sealed for f64 {}
impl FlagValue for f64 {
    fn from_value(value: &Value, name: &str) -> Result<Self, ParseError> {
        match value {
            Value::Float(v) => Ok(*v),
            other => panic!("'{name}' is {} but was requested as a float", other.kind()),
        }
    }
}

impl sealed::Sealed for f32 {}
impl FlagValue for f32 {
    fn from_value(value: &Value, name: &str) -> Result<Self, ParseError> {
        match value {
            Value::Float(v) => {
                if v.is_finite() && (*v > f64::from(f32::MAX) || *v < f64::from(f32::MIN)) {
                    Err(ParseError::FloatValueOutOfRange(v.to_string()))
                } else {
                    Ok(*v as f32)
                }
            }
            other => panic!("'{name}' is {} but was requested as a float", other.kind()),
        }
    }
}

/// Read view over one resolved invocation, passed to the handler.
///
/// Flag resolution follows the precedence chain: a value parsed this pass
/// wins, then the flag's environment variable if one is declared and set,
/// then the declared default.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Cli, CommandSpec, FlagDef, PositionalDef, ValueKind};
///
/// let mut cli = Cli::new(
///     CommandSpec::new("greet", "Print a greeting").with_handler(|ctx| {
///         let name: String = ctx.arg("name")?;
///         let shout: bool = ctx.flag("shout")?;
///         assert_eq!(name, "world");
///         assert!(shout);
///         Ok(())
///     }),
/// )
/// .unwrap();
/// let root = cli.root();
/// cli.add_flag(root, FlagDef::bool("shout", "Uppercase output", false)).unwrap();
/// cli.add_positional(root, PositionalDef::required("name", "Who to greet", ValueKind::Str))
///     .unwrap();
///
/// let argv = vec!["--shout".to_string(), "world".to_string()];
/// cli.execute(&argv, None).unwrap();
/// ```
pub struct ExecutionContext<'a> {
    cli: &'a Cli,
    command: CommandId,
    state: Option<&'a dyn Any>,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn new(cli: &'a Cli, command: CommandId, state: Option<&'a dyn Any>) -> Self {
        Self {
            cli,
            command,
            state,
        }
    }

    /// Resolves a flag value as `T`.
    ///
    /// Resolution order: the latest occurrence recorded this pass, then the
    /// flag's environment variable (converted through the shared routine),
    /// then the declared default. Conversion and range failures surface as
    /// [`ParseError`]s.
    ///
    /// # Panics
    ///
    /// Panics if the flag is not defined on this command or an ancestor, or
    /// if `T` cannot represent the flag's declared kind. Both are bugs in
    /// the tree definition, not user input.
    pub fn flag<T: FlagValue>(&self, name: &str) -> Result<T, ParseError> {
        let Some(def) = self.cli.find_flag(self.command, name) else {
            panic!(
                "flag '{name}' is not defined on '{}' or its ancestors",
                self.path()
            );
        };
        if let Some(parsed) = self
            .node()
            .parsed_flags
            .iter()
            .rev()
            .find(|flag| flag.name == def.name)
        {
            return T::from_value(&parsed.value, name);
        }
        if let Some(var) = &def.env_var {
            if let Ok(text) = std::env::var(var) {
                let value = Value::parse(def.kind, &text)?;
                return T::from_value(&value, name);
            }
        }
        T::from_value(&def.default, name)
    }

    /// Resolves a positional argument as `T`.
    ///
    /// Uses the parsed token at the definition's ordinal position if
    /// present, else the definition's default.
    ///
    /// # Panics
    ///
    /// Panics if no positional with this name is defined, or if the
    /// definition is variadic (use [`args`](ExecutionContext::args)).
    pub fn arg<T: FlagValue>(&self, name: &str) -> Result<T, ParseError> {
        let node = self.node();
        let Some(index) = node.positionals.iter().position(|def| def.name == name) else {
            panic!(
                "positional '{name}' is not defined on '{}'",
                self.path()
            );
        };
        let def = &node.positionals[index];
        if def.variadic {
            panic!("positional '{name}' is variadic, use args()");
        }
        if let Some(raw) = node.parsed_args.get(index) {
            let value = Value::parse(def.kind, raw)?;
            return T::from_value(&value, name);
        }
        match &def.default {
            Some(default) => T::from_value(default, name),
            None => panic!("positional '{name}' has no value; the pass was not validated"),
        }
    }

    /// Raw tokens captured by the variadic definition, possibly empty.
    ///
    /// No per-element conversion is applied.
    ///
    /// # Panics
    ///
    /// Panics if no positional with this name is defined, or if the
    /// definition is not variadic.
    pub fn args(&self, name: &str) -> &[String] {
        let node = self.node();
        let Some(index) = node.positionals.iter().position(|def| def.name == name) else {
            panic!(
                "positional '{name}' is not defined on '{}'",
                self.path()
            );
        };
        if !node.positionals[index].variadic {
            panic!("positional '{name}' is not variadic, use arg()");
        }
        if index >= node.parsed_args.len() {
            &[]
        } else {
            &node.parsed_args[index..]
        }
    }

    /// Downcasts the opaque shared state, `None` if absent or of another
    /// type.
    pub fn state<T: 'static>(&self) -> Option<&'a T> {
        self.state.and_then(|state| state.downcast_ref::<T>())
    }

    /// Name of the resolved command.
    pub fn name(&self) -> &str {
        &self.node().name
    }

    /// Space-joined path of the resolved command from the root.
    pub fn path(&self) -> String {
        self.cli.path(self.command)
    }

    fn node(&self) -> &Command {
        self.cli.node(self.command)
    }
}
