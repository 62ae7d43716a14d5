//! End-to-end tests over a git-like command tree.
//!
//! Builds `vgit` with nested subcommands, persistent flags, typed
//! positionals, and handlers that record what they resolved, then drives
//! whole argument vectors through `execute`.

use std::cell::RefCell;
use std::rc::Rc;

use cmdtree_core::{
    Cli, CommandSpec, ExecuteError, FlagDef, ParseError, PositionalDef, Reporter, Value, ValueKind,
};

type Log = Rc<RefCell<Vec<String>>>;

#[derive(Default)]
struct MemoryReporter {
    out: Vec<String>,
    err: Vec<String>,
}

impl Reporter for MemoryReporter {
    fn print(&mut self, text: &str) {
        self.out.push(text.to_string());
    }

    fn error(&mut self, text: &str) {
        self.err.push(text.to_string());
    }
}

fn tokens(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

/// vgit
/// ├── remote (group, alias "rem", section "Repository")
/// │   └── add (alias "a"): <name> [url] [track...]
/// └── commit (shortcut 'c'): -m/--message
fn build_tree(log: &Log) -> Cli {
    let root_log = log.clone();
    let mut cli = Cli::new(
        CommandSpec::new("vgit", "Fictional version control")
            .with_version("0.3.1")
            .with_handler(move |ctx| {
                root_log
                    .borrow_mut()
                    .push(format!("root verbose={}", ctx.flag::<bool>("verbose")?));
                Ok(())
            }),
    )
    .unwrap();
    let root = cli.root();
    cli.add_flag(root, FlagDef::bool("verbose", "Verbose diagnostics", false).with_shortcut('v'))
        .unwrap();
    cli.add_flag(root, FlagDef::bool("quiet", "Suppress chatter", false).with_shortcut('q'))
        .unwrap();

    let remote = cli
        .add_command(
            CommandSpec::new("remote", "Manage remotes")
                .with_aliases(&["rem"])
                .with_section("Repository"),
        )
        .unwrap();
    cli.add_child(root, remote).unwrap();

    let add_log = log.clone();
    let add = cli
        .add_command(
            CommandSpec::new("add", "Add a remote")
                .with_aliases(&["a"])
                .with_handler(move |ctx| {
                    add_log.borrow_mut().push(format!(
                        "add name={} url={} track={} transport={} verbose={}",
                        ctx.arg::<String>("name")?,
                        ctx.arg::<String>("url")?,
                        ctx.args("track").join("+"),
                        ctx.flag::<String>("transport")?,
                        ctx.flag::<bool>("verbose")?,
                    ));
                    Ok(())
                }),
        )
        .unwrap();
    cli.add_flag(
        add,
        FlagDef::string("transport", "Transfer protocol", "ssh").with_shortcut('t'),
    )
    .unwrap();
    cli.add_positional(add, PositionalDef::required("name", "Remote name", ValueKind::Str))
        .unwrap();
    cli.add_positional(
        add,
        PositionalDef::optional("url", "Remote URL", Value::Str("unset".to_string())),
    )
    .unwrap();
    cli.add_positional(add, PositionalDef::variadic("track", "Branches to track"))
        .unwrap();
    cli.add_child(remote, add).unwrap();

    let commit_log = log.clone();
    let commit = cli
        .add_command(
            CommandSpec::new("commit", "Record changes")
                .with_shortcut('c')
                .with_handler(move |ctx| {
                    commit_log
                        .borrow_mut()
                        .push(format!("commit message={}", ctx.flag::<String>("message")?));
                    Ok(())
                }),
        )
        .unwrap();
    cli.add_flag(commit, FlagDef::string("message", "Commit message", "").with_shortcut('m'))
        .unwrap();
    cli.add_child(root, commit).unwrap();

    cli
}

#[test]
fn test_empty_argv_never_fails() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    cli.execute(&tokens(&[]), None).unwrap();
    assert_eq!(log.borrow().as_slice(), ["root verbose=false"]);
}

#[test]
fn test_resolution_descends_to_deepest_match() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    cli.execute(&tokens(&["remote", "add", "origin"]), None)
        .unwrap();
    assert_eq!(
        log.borrow().as_slice(),
        ["add name=origin url=unset track= transport=ssh verbose=false"]
    );
}

#[test]
fn test_alias_and_shortcut_resolution() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    cli.execute(&tokens(&["rem", "a", "origin"]), None).unwrap();
    cli.execute(&tokens(&["c", "-m", "initial"]), None).unwrap();
    let log = log.borrow();
    assert!(log[0].starts_with("add name=origin"));
    assert_eq!(log[1], "commit message=initial");
}

#[test]
fn test_mistyped_subcommand_falls_through_to_positionals() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    // "addd" matches no child of remote; remote defines no positionals
    let err = cli
        .execute(&tokens(&["remote", "addd"]), None)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "too many arguments: expected at most 0, got 1 (in 'vgit remote')"
    );
    assert!(log.borrow().is_empty());
}

#[test]
fn test_persistent_flag_parsed_at_leaf() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    cli.execute(&tokens(&["remote", "add", "origin", "-v"]), None)
        .unwrap();
    assert!(log.borrow()[0].ends_with("verbose=true"));
}

#[test]
fn test_flag_value_forms_agree() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    for argv in [
        &["c", "-m=fix"][..],
        &["c", "-mfix"][..],
        &["c", "-m", "fix"][..],
        &["commit", "--message=fix"][..],
        &["commit", "--message", "fix"][..],
    ] {
        cli.execute(&tokens(argv), None).unwrap();
    }
    let log = log.borrow();
    assert_eq!(log.len(), 5);
    assert!(log.iter().all(|entry| entry == "commit message=fix"));
}

#[test]
fn test_grouped_bool_shortcuts() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    cli.execute(&tokens(&["-vq"]), None).unwrap();
    assert_eq!(log.borrow().as_slice(), ["root verbose=true"]);
    let root = cli.root();
    let parsed = cli.command(root).parsed_flags();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].name, "verbose");
    assert_eq!(parsed[1].name, "quiet");
}

#[test]
fn test_double_dash_makes_everything_positional() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    cli.execute(
        &tokens(&["remote", "add", "--", "--verbose", "-m"]),
        None,
    )
    .unwrap();
    assert_eq!(
        log.borrow().as_slice(),
        ["add name=--verbose url=-m track= transport=ssh verbose=false"]
    );
}

#[test]
fn test_variadic_captures_tail() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    cli.execute(
        &tokens(&["remote", "add", "origin", "git://x", "main", "dev"]),
        None,
    )
    .unwrap();
    assert_eq!(
        log.borrow().as_slice(),
        ["add name=origin url=git://x track=main+dev transport=ssh verbose=false"]
    );
}

#[test]
fn test_value_precedence_cli_env_default() {
    // own tree and env var so parallel tests cannot observe the variable
    let log: Log = Log::default();
    let seen = log.clone();
    let mut cli = Cli::new(CommandSpec::new("fetch", "").with_handler(move |ctx| {
        seen.borrow_mut()
            .push(format!("transport={}", ctx.flag::<String>("transport")?));
        Ok(())
    }))
    .unwrap();
    cli.add_flag(
        cli.root(),
        FlagDef::string("transport", "Transfer protocol", "ssh")
            .with_shortcut('t')
            .with_env("CMDTREE_IT_TRANSPORT"),
    )
    .unwrap();

    unsafe { std::env::set_var("CMDTREE_IT_TRANSPORT", "https") };
    cli.execute(&tokens(&["-t", "git"]), None).unwrap();
    cli.execute(&tokens(&[]), None).unwrap();
    unsafe { std::env::remove_var("CMDTREE_IT_TRANSPORT") };
    cli.execute(&tokens(&[]), None).unwrap();

    let log = log.borrow();
    assert_eq!(log[0], "transport=git", "parsed value wins");
    assert_eq!(log[1], "transport=https", "env wins");
    assert_eq!(log[2], "transport=ssh", "default wins");
}

#[test]
fn test_sequential_executes_do_not_leak_state() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    cli.execute(
        &tokens(&["remote", "add", "origin", "git://x", "-t", "git", "-v"]),
        None,
    )
    .unwrap();
    cli.execute(&tokens(&["remote", "add", "backup"]), None)
        .unwrap();
    let log = log.borrow();
    assert_eq!(
        log[1],
        "add name=backup url=unset track= transport=ssh verbose=false"
    );
}

#[test]
fn test_help_renders_without_invoking_handler() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    let mut reporter = MemoryReporter::default();
    cli.execute_with(&tokens(&["remote", "add", "--help"]), None, &mut reporter)
        .unwrap();
    assert!(log.borrow().is_empty());
    assert!(reporter.out[0].contains("Usage: vgit remote add"));
    assert!(reporter.out[0].contains("--transport"));
}

#[test]
fn test_group_command_without_handler_shows_help() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    let mut reporter = MemoryReporter::default();
    cli.execute_with(&tokens(&["remote"]), None, &mut reporter)
        .unwrap();
    assert!(reporter.out[0].contains("Usage: vgit remote"));
    assert!(reporter.out[0].contains("add, a"));
}

#[test]
fn test_version_prints_and_skips_handler() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    let mut reporter = MemoryReporter::default();
    cli.execute_with(&tokens(&["--version"]), None, &mut reporter)
        .unwrap();
    assert_eq!(reporter.out.as_slice(), ["vgit 0.3.1"]);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_unknown_flag_reports_failing_command_path() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    let err = cli
        .execute(&tokens(&["remote", "add", "origin", "--frob"]), None)
        .unwrap_err();
    match err {
        ExecuteError::Parse { command, source } => {
            assert_eq!(command, "vgit remote add");
            assert_eq!(source, ParseError::UnknownFlag("--frob".to_string()));
        }
        other => panic!("expected parse failure, got {other:?}"),
    }
}

#[test]
fn test_missing_required_argument() {
    let log: Log = Log::default();
    let mut cli = build_tree(&log);
    let err = cli.execute(&tokens(&["remote", "add"]), None).unwrap_err();
    assert!(matches!(
        err,
        ExecuteError::Parse {
            source: ParseError::MissingRequiredArgument(_),
            ..
        }
    ));
}

#[test]
fn test_handler_error_becomes_failure_exit() {
    let mut cli = Cli::new(CommandSpec::new("app", "").with_handler(|_| {
        Err("no repository found".into())
    }))
    .unwrap();
    let mut reporter = MemoryReporter::default();
    let code = cli.run_with(&tokens(&[]), None, &mut reporter);
    assert_eq!(
        format!("{code:?}"),
        format!("{:?}", std::process::ExitCode::FAILURE)
    );
    assert!(reporter.err[0].contains("no repository found"));
}

#[test]
fn test_shared_state_reaches_handler() {
    struct Session {
        user: String,
    }

    let log: Log = Log::default();
    let seen = log.clone();
    let mut cli = Cli::new(CommandSpec::new("app", "").with_handler(move |ctx| {
        let session = ctx.state::<Session>().expect("session state");
        seen.borrow_mut().push(format!("user={}", session.user));
        Ok(())
    }))
    .unwrap();

    let session = Session {
        user: "alice".to_string(),
    };
    cli.execute(&tokens(&[]), Some(&session)).unwrap();
    assert_eq!(log.borrow().as_slice(), ["user=alice"]);
}

#[test]
fn test_typed_flag_and_arg_conversions() {
    let log: Log = Log::default();
    let seen = log.clone();
    let mut cli = Cli::new(CommandSpec::new("bench", "").with_handler(move |ctx| {
        let jobs: u8 = ctx.flag("jobs")?;
        let scale: f32 = ctx.flag("scale")?;
        let rounds: i64 = ctx.arg("rounds")?;
        seen.borrow_mut()
            .push(format!("jobs={jobs} scale={scale} rounds={rounds}"));
        Ok(())
    }))
    .unwrap();
    let root = cli.root();
    cli.add_flag(root, FlagDef::int("jobs", "Worker count", 1).with_shortcut('j'))
        .unwrap();
    cli.add_flag(root, FlagDef::float("scale", "Load factor", 1.0))
        .unwrap();
    cli.add_positional(root, PositionalDef::optional("rounds", "Iterations", Value::Int(10)))
        .unwrap();

    cli.execute(&tokens(&["-j", "4", "--scale", "0.5", "100"]), None)
        .unwrap();
    assert_eq!(log.borrow().as_slice(), ["jobs=4 scale=0.5 rounds=100"]);

    // narrowing failure surfaces as an error, not a panic
    let err = cli.execute(&tokens(&["--jobs", "300"]), None).unwrap_err();
    assert!(matches!(err, ExecuteError::Handler(_)));
    assert_eq!(
        err.to_string(),
        "integer value 300 is out of range for the requested type"
    );
}
