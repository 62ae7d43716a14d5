//! Subcommand resolution and the flag/positional parser.
//!
//! Resolution and parsing are pure over the tree: both read definitions and
//! return owned results, and the dispatcher stores the parsed state on the
//! target node afterwards.

use tracing::debug;

use crate::command::{Cli, CommandId, ParsedFlag};
use crate::error::ParseError;
use crate::scanner::Scanner;
use crate::value::{Value, ValueKind};

/// Tokens recorded against the target command by one parse pass.
#[derive(Debug, Default)]
pub(crate) struct ParsedInvocation {
    pub flags: Vec<ParsedFlag>,
    pub positionals: Vec<String>,
}

/// Descends from the root while leading tokens name a child command.
///
/// Stops at the first flag-like or non-matching token. A token that matches
/// no child is not an error; it is left for the last matched command to
/// parse as a positional or flag.
pub(crate) fn resolve(cli: &Cli, scanner: &mut Scanner<'_>) -> CommandId {
    let mut current = cli.root();
    while let Some(token) = scanner.peek() {
        if token.starts_with('-') {
            break;
        }
        match cli.find_child(current, token) {
            Some(child) => {
                scanner.advance();
                current = child;
                debug!(command = %cli.path(current), "resolved subcommand");
            }
            None => break,
        }
    }
    current
}

/// Consumes the remaining tokens against the resolved command.
///
/// Single pass with one state bit: a literal `--` permanently stops flag
/// parsing, after which everything is positional, even flag-shaped text.
pub(crate) fn parse(
    cli: &Cli,
    target: CommandId,
    scanner: &mut Scanner<'_>,
) -> Result<ParsedInvocation, ParseError> {
    let mut parsed = ParsedInvocation::default();
    let mut parsing_flags = true;

    while let Some(token) = scanner.advance() {
        if parsing_flags && token == "--" {
            parsing_flags = false;
            continue;
        }
        if parsing_flags && token.starts_with("--") {
            parse_long_flag(cli, target, &token[2..], scanner, &mut parsed)?;
        } else if parsing_flags && token.starts_with('-') && token.len() > 1 {
            parse_shortcut_group(cli, target, &token[1..], scanner, &mut parsed)?;
        } else {
            // everything else, including a lone "-", is positional
            parsed.positionals.push(token.to_string());
        }
    }

    debug!(
        command = %cli.path(target),
        flags = parsed.flags.len(),
        positionals = parsed.positionals.len(),
        "parse pass complete"
    );
    Ok(parsed)
}

/// Handles `--name` and `--name=value`.
fn parse_long_flag(
    cli: &Cli,
    target: CommandId,
    body: &str,
    scanner: &mut Scanner<'_>,
    parsed: &mut ParsedInvocation,
) -> Result<(), ParseError> {
    let (name, inline) = match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };
    let def = cli
        .find_flag(target, name)
        .ok_or_else(|| ParseError::UnknownFlag(format!("--{name}")))?;

    let value = match inline {
        Some(raw) => Value::parse(def.kind(), raw)?,
        None if def.kind() == ValueKind::Bool => Value::Bool(true),
        None => {
            let next = scanner
                .advance()
                .ok_or_else(|| ParseError::MissingFlagValue(format!("--{name}")))?;
            Value::parse(def.kind(), next)?
        }
    };
    parsed.flags.push(ParsedFlag {
        name: def.name().to_string(),
        value,
    });
    Ok(())
}

/// Handles a single-dash shortcut run such as `-v`, `-vf`, `-ovalue`, or
/// `-o=value`.
///
/// Bool shortcuts record `true` and the scan continues to the next
/// character. The first value-taking shortcut ends the run: leading the run
/// it absorbs the remainder as its value, at the end of the run it consumes
/// the next token, and mid-run with trailing characters it is a grouping
/// error.
fn parse_shortcut_group(
    cli: &Cli,
    target: CommandId,
    run: &str,
    scanner: &mut Scanner<'_>,
    parsed: &mut ParsedInvocation,
) -> Result<(), ParseError> {
    let chars: Vec<char> = run.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        let def = cli
            .find_flag_by_shortcut(target, ch)
            .ok_or_else(|| ParseError::UnknownFlag(format!("-{ch}")))?;

        // -x=value binds the remainder explicitly, whatever the kind
        if chars.get(i + 1) == Some(&'=') {
            let raw: String = chars[i + 2..].iter().collect();
            let value = Value::parse(def.kind(), &raw)?;
            parsed.flags.push(ParsedFlag {
                name: def.name().to_string(),
                value,
            });
            return Ok(());
        }

        if def.kind() == ValueKind::Bool {
            parsed.flags.push(ParsedFlag {
                name: def.name().to_string(),
                value: Value::Bool(true),
            });
            i += 1;
            continue;
        }

        let rest: String = chars[i + 1..].iter().collect();
        let value = if rest.is_empty() {
            let next = scanner
                .advance()
                .ok_or_else(|| ParseError::MissingFlagValue(format!("-{ch}")))?;
            Value::parse(def.kind(), next)?
        } else if i == 0 {
            // attached value: -ovalue
            Value::parse(def.kind(), &rest)?
        } else {
            return Err(ParseError::InvalidFlagGrouping {
                group: run.to_string(),
                shortcut: ch,
            });
        };
        parsed.flags.push(ParsedFlag {
            name: def.name().to_string(),
            value,
        });
        return Ok(());
    }
    Ok(())
}
