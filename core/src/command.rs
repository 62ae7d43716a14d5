//! Command tree arena: nodes, flag and positional definitions, lookup.
//!
//! The tree is an arena of [`Command`] nodes owned by [`Cli`] and addressed
//! through stable [`CommandId`] handles. Each node stores an index-based
//! parent reference instead of an owning back-pointer, so dropping the
//! arena tears down the whole tree at once; there are no recursive per-node
//! destructors and no double-free hazard if a handle is misused.

use std::fmt;

use crate::context::ExecutionContext;
use crate::error::{BuildError, HandlerError};
use crate::value::{Value, ValueKind};

/// A command's bound behavior, invoked with the per-pass [`ExecutionContext`].
pub type Handler = Box<dyn Fn(&ExecutionContext<'_>) -> Result<(), HandlerError>>;

/// Stable handle to a command in a [`Cli`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(pub(crate) usize);

/// Definition of a typed flag with a kind-matched default.
///
/// The kind is derived from the default, so the two cannot disagree. Use the
/// kind-specific constructors, then chain the `with_*` builders.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{FlagDef, Value, ValueKind};
///
/// let format = FlagDef::string("format", "Output format", "json")
///     .with_shortcut('f')
///     .with_env("APP_FORMAT");
/// assert_eq!(format.kind(), ValueKind::Str);
/// assert_eq!(format.default(), &Value::Str("json".into()));
/// assert_eq!(format.shortcut(), Some('f'));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FlagDef {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) kind: ValueKind,
    pub(crate) shortcut: Option<char>,
    pub(crate) default: Value,
    pub(crate) env_var: Option<String>,
    pub(crate) hidden: bool,
}

impl FlagDef {
    /// Creates a boolean flag.
    pub fn bool(name: &str, description: &str, default: bool) -> Self {
        Self::with_default(name, description, Value::Bool(default))
    }

    /// Creates a signed 64-bit integer flag.
    pub fn int(name: &str, description: &str, default: i64) -> Self {
        Self::with_default(name, description, Value::Int(default))
    }

    /// Creates a floating-point flag.
    pub fn float(name: &str, description: &str, default: f64) -> Self {
        Self::with_default(name, description, Value::Float(default))
    }

    /// Creates a string flag.
    pub fn string(name: &str, description: &str, default: &str) -> Self {
        Self::with_default(name, description, Value::Str(default.to_string()))
    }

    fn with_default(name: &str, description: &str, default: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind: default.kind(),
            shortcut: None,
            default,
            env_var: None,
            hidden: false,
        }
    }

    /// Adds a single-character shortcut (e.g. `-v`).
    pub fn with_shortcut(mut self, shortcut: char) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Names an environment variable consulted when the flag is not passed.
    pub fn with_env(mut self, var: &str) -> Self {
        self.env_var = Some(var.to_string());
        self
    }

    /// Excludes the flag from help output.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn shortcut(&self) -> Option<char> {
        self.shortcut
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    pub fn env_var(&self) -> Option<&str> {
        self.env_var.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

/// Definition of a positional argument.
///
/// Optional non-variadic definitions carry a default, enforced by the
/// [`optional`](PositionalDef::optional) constructor, which also derives the
/// kind from it. Variadic definitions capture every remaining token as raw
/// strings.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{PositionalDef, Value, ValueKind};
///
/// let name = PositionalDef::required("name", "Remote name", ValueKind::Str);
/// assert!(name.is_required());
///
/// let depth = PositionalDef::optional("depth", "Clone depth", Value::Int(1));
/// assert_eq!(depth.kind(), ValueKind::Int);
///
/// let paths = PositionalDef::variadic("paths", "Files to add").at_least_one();
/// assert!(paths.is_variadic() && paths.is_required());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalDef {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) kind: ValueKind,
    pub(crate) required: bool,
    pub(crate) default: Option<Value>,
    pub(crate) variadic: bool,
}

impl PositionalDef {
    /// Creates a required positional argument.
    pub fn required(name: &str, description: &str, kind: ValueKind) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            required: true,
            default: None,
            variadic: false,
        }
    }

    /// Creates an optional positional argument; the kind is derived from the
    /// mandatory default.
    pub fn optional(name: &str, description: &str, default: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind: default.kind(),
            required: false,
            default: Some(default),
            variadic: false,
        }
    }

    /// Creates a variadic positional capturing all remaining tokens.
    pub fn variadic(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind: ValueKind::Str,
            required: false,
            default: None,
            variadic: true,
        }
    }

    /// Requires at least one captured token (for variadic definitions).
    pub fn at_least_one(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }
}

/// A flag occurrence recorded during one parse pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFlag {
    /// Canonical name of the matched definition.
    pub name: String,
    /// The converted value.
    pub value: Value,
}

/// Build-time description of a command, consumed by [`Cli::new`] and
/// [`Cli::add_command`].
///
/// # Examples
///
/// ```
/// use cmdtree_core::CommandSpec;
///
/// let spec = CommandSpec::new("remote", "Manage tracked remotes")
///     .with_aliases(&["rem"])
///     .with_shortcut('r')
///     .with_section("Repository");
/// # let _ = spec;
/// ```
pub struct CommandSpec {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) handler: Option<Handler>,
    pub(crate) aliases: Vec<String>,
    pub(crate) shortcut: Option<char>,
    pub(crate) version: Option<String>,
    pub(crate) section: String,
}

impl CommandSpec {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            handler: None,
            aliases: Vec::new(),
            shortcut: None,
            version: None,
            section: "Commands".to_string(),
        }
    }

    /// Binds the behavior invoked when this command is dispatched.
    ///
    /// A command without a handler acts as a group: dispatching to it
    /// renders its help.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ExecutionContext<'_>) -> Result<(), HandlerError> + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Adds alternate names the resolver accepts for this command.
    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(ToString::to_string).collect();
        self
    }

    /// Adds a single-character shortcut the resolver accepts.
    pub fn with_shortcut(mut self, shortcut: char) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Sets the version string (meaningful on the root; enables `--version`).
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Sets the help section label under which a parent lists this command.
    pub fn with_section(mut self, section: &str) -> Self {
        self.section = section.to_string();
        self
    }
}

/// A node in the command tree.
///
/// Owned by the [`Cli`] arena; read it through [`Cli::command`]. The two
/// `parsed_*` lists are transient per-invocation state, rebuilt on every
/// pass.
pub struct Command {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) handler: Option<Handler>,
    pub(crate) aliases: Vec<String>,
    pub(crate) shortcut: Option<char>,
    pub(crate) version: Option<String>,
    pub(crate) section: String,
    pub(crate) flags: Vec<FlagDef>,
    pub(crate) positionals: Vec<PositionalDef>,
    pub(crate) children: Vec<CommandId>,
    pub(crate) parent: Option<CommandId>,
    pub(crate) parsed_flags: Vec<ParsedFlag>,
    pub(crate) parsed_args: Vec<String>,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn shortcut(&self) -> Option<char> {
        self.shortcut
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn flags(&self) -> &[FlagDef] {
        &self.flags
    }

    pub fn positionals(&self) -> &[PositionalDef] {
        &self.positionals
    }

    pub fn children(&self) -> &[CommandId] {
        &self.children
    }

    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    /// Flag occurrences recorded by the most recent parse pass, in order.
    pub fn parsed_flags(&self) -> &[ParsedFlag] {
        &self.parsed_flags
    }

    /// Positional tokens recorded by the most recent parse pass.
    pub fn parsed_args(&self) -> &[String] {
        &self.parsed_args
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("shortcut", &self.shortcut)
            .field("flags", &self.flags)
            .field("positionals", &self.positionals)
            .field("children", &self.children)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// The command tree: an arena of [`Command`] nodes plus build and lookup
/// operations.
///
/// Build the tree once (single-threaded), then dispatch against it
/// repeatedly with [`execute`](Cli::execute) or [`run`](Cli::run); each pass
/// rebuilds only the transient parsed state of the resolved command.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Cli, CommandSpec, FlagDef};
///
/// let mut cli = Cli::new(CommandSpec::new("app", "Demo application")).unwrap();
/// let root = cli.root();
/// cli.add_flag(root, FlagDef::bool("verbose", "Verbose output", false).with_shortcut('v'))
///     .unwrap();
///
/// let status = cli
///     .add_command(CommandSpec::new("status", "Show status").with_aliases(&["st"]))
///     .unwrap();
/// cli.add_child(root, status).unwrap();
///
/// assert_eq!(cli.find_child(root, "st"), Some(status));
/// // Flags resolve upward: `status` sees the root's --verbose.
/// assert!(cli.find_flag(status, "verbose").is_some());
/// ```
#[derive(Debug)]
pub struct Cli {
    pub(crate) nodes: Vec<Command>,
    pub(crate) root: CommandId,
    pub(crate) version_flag_registered: bool,
}

impl Cli {
    /// Creates a tree with the given root command.
    pub fn new(spec: CommandSpec) -> Result<Self, BuildError> {
        let mut cli = Self {
            nodes: Vec::new(),
            root: CommandId(0),
            version_flag_registered: false,
        };
        cli.root = cli.add_command(spec)?;
        Ok(cli)
    }

    /// Creates a detached command; attach it with [`Cli::add_child`].
    ///
    /// Every command answers `--help`/`-h`, registered here at creation.
    pub fn add_command(&mut self, spec: CommandSpec) -> Result<CommandId, BuildError> {
        if spec.name.is_empty() {
            return Err(BuildError::EmptyCommandName);
        }
        let id = CommandId(self.nodes.len());
        self.nodes.push(Command {
            name: spec.name,
            description: spec.description,
            handler: spec.handler,
            aliases: spec.aliases,
            shortcut: spec.shortcut,
            version: spec.version,
            section: spec.section,
            flags: Vec::new(),
            positionals: Vec::new(),
            children: Vec::new(),
            parent: None,
            parsed_flags: Vec::new(),
            parsed_args: Vec::new(),
        });
        self.add_flag(id, FlagDef::bool("help", "Print help", false).with_shortcut('h'))?;
        Ok(id)
    }

    /// Attaches `child` under `parent`. A command is attached exactly once.
    pub fn add_child(&mut self, parent: CommandId, child: CommandId) -> Result<(), BuildError> {
        self.check_id(parent)?;
        self.check_id(child)?;
        let node = &self.nodes[child.0];
        if node.parent.is_some() {
            return Err(BuildError::CommandAlreadyHasParent(node.name.clone()));
        }
        if node.aliases.iter().any(String::is_empty) {
            return Err(BuildError::EmptyAlias(node.name.clone()));
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Adds a flag to `cmd`.
    ///
    /// Name and shortcut collisions are rejected within `cmd` only;
    /// colliding with an ancestor's flag is legal and shadows it.
    pub fn add_flag(&mut self, cmd: CommandId, def: FlagDef) -> Result<(), BuildError> {
        self.check_id(cmd)?;
        let node = &self.nodes[cmd.0];
        for existing in &node.flags {
            let shortcut_clash = def.shortcut.is_some() && existing.shortcut == def.shortcut;
            if existing.name == def.name || shortcut_clash {
                return Err(BuildError::DuplicateFlag {
                    command: node.name.clone(),
                    flag: def.name,
                });
            }
        }
        self.nodes[cmd.0].flags.push(def);
        Ok(())
    }

    /// Appends a positional definition to `cmd`.
    ///
    /// Definitions keep required-before-optional ordering, and a variadic
    /// definition must be last.
    pub fn add_positional(&mut self, cmd: CommandId, def: PositionalDef) -> Result<(), BuildError> {
        self.check_id(cmd)?;
        let node = &self.nodes[cmd.0];
        if node.positionals.last().is_some_and(|last| last.variadic) {
            return Err(BuildError::VariadicArgumentNotLast(node.name.clone()));
        }
        if def.required && node.positionals.iter().any(|p| !p.required) {
            return Err(BuildError::RequiredArgumentAfterOptional(node.name.clone()));
        }
        self.nodes[cmd.0].positionals.push(def);
        Ok(())
    }

    /// Handle of the root command.
    pub fn root(&self) -> CommandId {
        self.root
    }

    /// Reads a command node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not address a node in this arena.
    pub fn command(&self, id: CommandId) -> &Command {
        &self.nodes[id.0]
    }

    /// Finds a direct child of `cmd` by name, then single-character
    /// shortcut, then any alias; first match in that precedence wins.
    pub fn find_child(&self, cmd: CommandId, token: &str) -> Option<CommandId> {
        let node = &self.nodes[cmd.0];
        for &child in &node.children {
            if self.nodes[child.0].name == token {
                return Some(child);
            }
        }
        let mut chars = token.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            for &child in &node.children {
                if self.nodes[child.0].shortcut == Some(ch) {
                    return Some(child);
                }
            }
        }
        for &child in &node.children {
            if self.nodes[child.0].aliases.iter().any(|alias| alias == token) {
                return Some(child);
            }
        }
        None
    }

    /// Finds a flag by name on `cmd` or the closest ancestor that defines
    /// it. Upward lookup is what makes ancestor flags persistent.
    pub fn find_flag(&self, cmd: CommandId, name: &str) -> Option<&FlagDef> {
        let mut current = Some(cmd);
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            if let Some(def) = node.flags.iter().find(|flag| flag.name == name) {
                return Some(def);
            }
            current = node.parent;
        }
        None
    }

    /// Like [`find_flag`](Cli::find_flag), keyed by shortcut character.
    pub fn find_flag_by_shortcut(&self, cmd: CommandId, shortcut: char) -> Option<&FlagDef> {
        let mut current = Some(cmd);
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            if let Some(def) = node.flags.iter().find(|flag| flag.shortcut == Some(shortcut)) {
                return Some(def);
            }
            current = node.parent;
        }
        None
    }

    /// Space-joined command path from the root, e.g. `"app remote add"`.
    pub fn path(&self, id: CommandId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(i) = current {
            let node = &self.nodes[i.0];
            segments.push(node.name.as_str());
            current = node.parent;
        }
        segments.reverse();
        segments.join(" ")
    }

    pub(crate) fn node(&self, id: CommandId) -> &Command {
        &self.nodes[id.0]
    }

    pub(crate) fn clear_parsed(&mut self, id: CommandId) {
        let node = &mut self.nodes[id.0];
        node.parsed_flags.clear();
        node.parsed_args.clear();
    }

    pub(crate) fn set_parsed(
        &mut self,
        id: CommandId,
        flags: Vec<ParsedFlag>,
        args: Vec<String>,
    ) {
        let node = &mut self.nodes[id.0];
        node.parsed_flags = flags;
        node.parsed_args = args;
    }

    fn check_id(&self, id: CommandId) -> Result<(), BuildError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(BuildError::UnknownCommandId(id.0))
        }
    }
}
