//! Declarative engine for hierarchical command-line applications.
//!
//! This crate models a CLI as a tree of named commands, each with typed
//! flags and positional parameters. An argument vector is resolved down the
//! tree to the deepest matching command, parsed and validated against its
//! definitions, and dispatched to the bound handler:
//!
//! - [`Value`]/[`ValueKind`] — the tagged value model and the single
//!   text-to-value conversion routine.
//! - [`Scanner`] — forward-only cursor over the token vector.
//! - [`Cli`]/[`Command`] — the command tree arena, with flag and positional
//!   definitions and upward flag lookup (persistent flags).
//! - [`ExecutionContext`] — typed access to resolved values with the
//!   CLI > environment > default precedence chain.
//! - [`execute`](Cli::execute)/[`run`](Cli::run) — dispatch, built-in
//!   `--help`/`--version` interception, and diagnostics.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::{Cli, CommandSpec, FlagDef, PositionalDef, ValueKind};
//!
//! let mut cli = Cli::new(
//!     CommandSpec::new("demo", "Demo application").with_version("1.0.0"),
//! )
//! .unwrap();
//! let root = cli.root();
//! cli.add_flag(root, FlagDef::bool("verbose", "Verbose output", false).with_shortcut('v'))
//!     .unwrap();
//!
//! let greet = cli
//!     .add_command(CommandSpec::new("greet", "Print a greeting").with_handler(|ctx| {
//!         let name: String = ctx.arg("name")?;
//!         let verbose: bool = ctx.flag("verbose")?;
//!         if verbose {
//!             println!("greeting requested for {name}");
//!         }
//!         println!("hello {name}");
//!         Ok(())
//!     }))
//!     .unwrap();
//! cli.add_positional(greet, PositionalDef::required("name", "Who to greet", ValueKind::Str))
//!     .unwrap();
//! cli.add_child(root, greet).unwrap();
//!
//! let argv = vec!["greet".to_string(), "world".to_string(), "-v".to_string()];
//! assert!(cli.execute(&argv, None).is_ok());
//! ```

mod command;
mod context;
mod dispatch;
mod error;
mod help;
mod parser;
mod scanner;
mod validate;
mod value;

pub use command::{
    Cli, Command, CommandId, CommandSpec, FlagDef, Handler, ParsedFlag, PositionalDef,
};
pub use context::{ExecutionContext, FlagValue};
pub use dispatch::{ConsoleReporter, Reporter};
pub use error::{BuildError, ExecuteError, HandlerError, ParseError};
pub use scanner::Scanner;
pub use value::{Value, ValueKind};
