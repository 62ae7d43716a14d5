//! Dispatch: resolve, parse, validate, built-in interception, handler call.
//!
//! [`execute`](Cli::execute) is the run-time entry point for one pass over
//! an argument vector; [`run`](Cli::run) wraps it with process argv
//! retrieval and turns failures into diagnostics and an exit status. All
//! output flows through the injectable [`Reporter`], keeping the parsing
//! and validation core free of process-global effects.

use std::any::Any;
use std::io::Write;
use std::process::ExitCode;

use cmdtree_render::{ColorMode, Styler};
use tracing::debug;

use crate::command::{Cli, CommandId, FlagDef};
use crate::context::ExecutionContext;
use crate::error::{ExecuteError, ParseError};
use crate::help;
use crate::parser;
use crate::scanner::Scanner;
use crate::validate::validate_positionals;
use crate::value::Value;

/// Output sink for help text and diagnostics.
///
/// Embedders and tests substitute their own implementation to capture or
/// redirect output.
pub trait Reporter {
    /// Writes informational output (help text, the version string).
    fn print(&mut self, text: &str);
    /// Writes a diagnostic.
    fn error(&mut self, text: &str);
}

/// Reporter writing to stdout/stderr.
///
/// Write failures, including a broken pipe, are swallowed.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn print(&mut self, text: &str) {
        let _ = writeln!(std::io::stdout(), "{text}");
    }

    fn error(&mut self, text: &str) {
        let _ = writeln!(std::io::stderr(), "{text}");
    }
}

impl Cli {
    /// Resolves, parses, and dispatches one argument vector.
    ///
    /// `argv` excludes the program name. The resolved command's transient
    /// parsed state is cleared first, so the same tree executes repeatedly
    /// without leaking state between passes; a failed pass leaves it
    /// cleared too. If `--help` resolves true the command's help is printed
    /// and the handler is skipped; likewise `--version` on a configured
    /// root prints the version string. A command with no bound handler
    /// prints its own help.
    pub fn execute(&mut self, argv: &[String], state: Option<&dyn Any>) -> Result<(), ExecuteError> {
        let mut reporter = ConsoleReporter;
        self.execute_with(argv, state, &mut reporter)
    }

    /// [`execute`](Cli::execute) with an explicit output sink.
    pub fn execute_with(
        &mut self,
        argv: &[String],
        state: Option<&dyn Any>,
        reporter: &mut dyn Reporter,
    ) -> Result<(), ExecuteError> {
        self.register_version_flag();

        let mut scanner = Scanner::new(argv);
        let target = parser::resolve(self, &mut scanner);
        self.clear_parsed(target);

        let parsed = parser::parse(self, target, &mut scanner)
            .map_err(|source| self.parse_failure(target, source))?;
        validate_positionals(self.node(target).positionals(), parsed.positionals.len())
            .map_err(|source| self.parse_failure(target, source))?;
        self.set_parsed(target, parsed.flags, parsed.positionals);

        let styler = Styler::new(ColorMode::Auto);
        let ctx = ExecutionContext::new(self, target, state);
        let help_requested = match ctx.flag::<bool>("help") {
            Ok(requested) => requested,
            Err(source) => return Err(self.parse_failure(target, source)),
        };
        if help_requested {
            reporter.print(&help::render(self, target, &styler));
            return Ok(());
        }
        if self.version_requested(target) {
            let root = self.node(self.root());
            let version = root.version().unwrap_or_default();
            reporter.print(&format!("{} {version}", root.name()));
            return Ok(());
        }

        match &self.node(target).handler {
            Some(handler) => {
                debug!(command = %self.path(target), "invoking handler");
                handler(&ctx).map_err(ExecuteError::Handler)
            }
            None => {
                // group command: no behavior of its own, show its help
                reporter.print(&help::render(self, target, &styler));
                Ok(())
            }
        }
    }

    /// Entry point for binaries: reads process argv (program name
    /// excluded), reports failures through the console, and returns the
    /// exit status.
    pub fn run(&mut self, state: Option<&dyn Any>) -> ExitCode {
        let argv: Vec<String> = std::env::args().skip(1).collect();
        let mut reporter = ConsoleReporter;
        self.run_with(&argv, state, &mut reporter)
    }

    /// [`run`](Cli::run) with explicit argv and output sink.
    pub fn run_with(
        &mut self,
        argv: &[String],
        state: Option<&dyn Any>,
        reporter: &mut dyn Reporter,
    ) -> ExitCode {
        match self.execute_with(argv, state, reporter) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                let styler = Styler::new(ColorMode::Auto);
                reporter.error(&diagnostic(&err, &styler));
                ExitCode::FAILURE
            }
        }
    }

    /// Adds the root `--version` flag on first dispatch, only when a
    /// version string was configured and the name is still free.
    fn register_version_flag(&mut self) {
        if self.version_flag_registered {
            return;
        }
        self.version_flag_registered = true;
        let root = self.root();
        if self.node(root).version().is_none() {
            return;
        }
        if self.node(root).flags().iter().any(|flag| flag.name() == "version") {
            return;
        }
        let _ = self.add_flag(root, FlagDef::bool("version", "Print version", false));
    }

    fn version_requested(&self, target: CommandId) -> bool {
        self.node(self.root()).version().is_some()
            && self
                .node(target)
                .parsed_flags()
                .iter()
                .rev()
                .find(|flag| flag.name == "version")
                .is_some_and(|flag| flag.value == Value::Bool(true))
    }

    fn parse_failure(&mut self, target: CommandId, source: ParseError) -> ExecuteError {
        // the next pass starts clean
        self.clear_parsed(target);
        ExecuteError::Parse {
            command: self.path(target),
            source,
        }
    }
}

fn diagnostic(err: &ExecuteError, styler: &Styler) -> String {
    match err {
        ExecuteError::Parse { command, source } => format!(
            "{} {source}\n{}",
            styler.error("error:"),
            styler.dim(&format!("run '{command} --help' for usage"))
        ),
        ExecuteError::Handler(source) => format!("{} {source}", styler.error("error:")),
    }
}
