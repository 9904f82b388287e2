//! Declarative, type-aware command-line option matching and help rendering.
//!
//! This crate is intentionally small and dependency-free so it can be reused by:
//! - the `dev` binary (top-level option handling and command dispatch)
//! - subcommands that parse their own argv (e.g. `panel-command`)
//!
//! The caller declares a registry of [`OptionSpec`]s inside a [`Config`] and
//! hands it to [`run`] (pure, returns a [`ParseOutcome`]) or [`parse`] (prints
//! diagnostics and optionally exits). The engine never mutates the caller's
//! `Config`; match bookkeeping and the implicit `--help` option live in
//! per-call scratch state, so one `Config` is safe to reuse across parses.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::IsTerminal;
use std::process;

/// Name of the implicitly injected help option. A caller-supplied option with
/// this name suppresses the injection and is parsed like any other option.
const BUILTIN_HELP: &str = "help";

/// Column at which option descriptions start in the usage block.
const DESCRIPTION_COLUMN: usize = 40;

/// Value shape of an option. Drives coercion and usage rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionKind {
    /// The following token is stored verbatim. This is the default.
    #[default]
    Text,
    /// The following token is parsed as a floating-point number.
    Number,
    /// Presence alone sets `true`; no value token is consumed.
    Bool,
    /// The following token is split on commas; numeric-looking elements are
    /// auto-converted, everything else stays a string.
    List,
}

impl OptionKind {
    fn placeholder(self) -> &'static str {
        match self {
            Self::Text => " <string>",
            Self::Number => " <number>",
            Self::Bool => "",
            Self::List => " <string,string,...>",
        }
    }
}

/// Static definition of one recognized option.
///
/// `name` doubles as the long flag (`--name`) and must be unique within a
/// registry; `alias` is the short form (`-alias`).
#[derive(Debug, Clone, Default)]
pub struct OptionSpec {
    pub name: String,
    pub alias: Option<String>,
    /// Help text. Embedded newlines are re-indented to the description column
    /// when the usage block is rendered.
    pub description: Option<String>,
    /// If set, absence after a full parse is a terminal error.
    pub mandatory: bool,
    pub kind: OptionKind,
}

impl OptionSpec {
    pub fn new(name: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }
}

/// Parser configuration for one entry point.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Shown after `Usage:` in the help block.
    pub prefix: String,
    /// Reject any leftover tokens once matching reaches its fixed point.
    pub strict: bool,
    /// Make [`parse`] exit the process (status 1) on failure instead of
    /// returning the errored result.
    pub exit_on_error: bool,
    /// Options to match, in declaration order. Order sets priority between
    /// still-unmatched options, not the consumption order of tokens.
    pub options: Vec<OptionSpec>,
}

/// A coerced option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Elements are only ever `Text` or `Number`.
    List(Vec<Value>),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Self::Bool(true))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => {
                let rendered: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", rendered.join(","))
            }
        }
    }
}

/// Parsed options plus the unconsumed remainder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    /// Set to the error message when parsing failed.
    pub error: Option<String>,
    /// Coerced values for the options actually found. An absent key means
    /// "not supplied", never a typed default.
    pub options: HashMap<String, Value>,
    /// Remaining tokens after parsing, in their original order.
    pub argv: Vec<String>,
}

impl ParseResult {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Text value of `name`, if it was supplied and is text-shaped.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    /// Whether a boolean option was supplied.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_true)
    }
}

/// Discriminant for the four terminal failure modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A `Number` option's value has no numeric prefix.
    InvalidNumber,
    /// A mandatory option was never matched.
    MissingMandatory,
    /// The leftover sequence starts with an unconsumed `--` token.
    UnknownOption,
    /// Strict mode with any tokens left over.
    UnparsedRemainder,
}

/// Terminal parse failure carrying the partially built result.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ErrorKind,
    message: String,
    /// Options parsed before the failure, plus the not-yet-consumed remainder.
    pub partial: ParseResult,
}

impl ParseError {
    fn new(kind: ErrorKind, message: String, partial: ParseResult) -> Self {
        Self {
            kind,
            message,
            partial,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Stamp the message into the partial result and return it.
    pub fn into_result(self) -> ParseResult {
        let mut result = self.partial;
        result.error = Some(self.message);
        result
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Outcome of the pure parsing core. The call site decides whether to print,
/// exit, or propagate.
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    /// Normal completion.
    Matches(ParseResult),
    /// The implicit `--help`/`-h` flag short-circuited the parse before any
    /// mandatory-option validation. Payload is the rendered usage block.
    Help(String),
}

/// Parse the longest numeric prefix of `s` as an `f64`.
///
/// Grammar (longest match, no surrounding whitespace):
///
/// ```text
/// [+-]? ( digits ( "." digits* )? | "." digits ) ( ("e"|"E") [+-]? digits )?
/// ```
///
/// `"3abc"` parses to `3`, `"-.5x"` to `-0.5`; a token with no numeric prefix
/// at all (including `""`, `"+"`, `"Infinity"`) yields `None`.
pub fn numeric_prefix(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while matches!(bytes.get(i), Some(b'0'..=b'9')) {
        i += 1;
    }
    let int_len = i - int_start;

    let mut frac_len = 0;
    if bytes.get(i) == Some(&b'.')
        && (int_len > 0 || matches!(bytes.get(i + 1), Some(b'0'..=b'9')))
    {
        i += 1;
        let frac_start = i;
        while matches!(bytes.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        frac_len = i - frac_start;
    }

    if int_len == 0 && frac_len == 0 {
        return None;
    }

    // An exponent marker only counts if at least one digit follows it.
    let mut end = i;
    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_start = j;
        while matches!(bytes.get(j), Some(b'0'..=b'9')) {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    s[..end].parse().ok()
}

fn builtin_help_spec() -> OptionSpec {
    OptionSpec {
        name: BUILTIN_HELP.to_string(),
        alias: Some("h".to_string()),
        description: Some("Show this help".to_string()),
        mandatory: false,
        kind: OptionKind::Bool,
    }
}

/// Find `spec`'s flag within the leading run of flag-shaped tokens.
///
/// The search window ends at the first token that does not begin with `-`;
/// trailing plain arguments are never treated as flags even if one matches a
/// name. A match anywhere inside the window counts, not just at its front.
fn index_of(argv: &[String], spec: &OptionSpec) -> Option<usize> {
    for (idx, arg) in argv.iter().enumerate() {
        if !arg.starts_with('-') {
            return None;
        }
        if arg.strip_prefix("--").is_some_and(|rest| rest == spec.name) {
            return Some(idx);
        }
        if let Some(alias) = &spec.alias {
            if arg.strip_prefix('-').is_some_and(|rest| rest == alias.as_str()) {
                return Some(idx);
            }
        }
    }
    None
}

/// Remove the flag token at `idx` and its value token. A flag sitting at the
/// very end of argv has no value token; it coerces from the empty string.
fn take_value(argv: &mut Vec<String>, idx: usize) -> String {
    argv.remove(idx);
    if idx < argv.len() {
        argv.remove(idx)
    } else {
        String::new()
    }
}

fn render_option(spec: &OptionSpec) -> String {
    let mut left = match &spec.alias {
        Some(alias) => format!("   -{alias}, "),
        None => " ".repeat(7),
    };
    left.push_str("--");
    left.push_str(&spec.name);
    left.push_str(spec.kind.placeholder());

    let Some(description) = spec.description.as_deref() else {
        return left;
    };

    let column = " ".repeat(DESCRIPTION_COLUMN);
    let description = description.replace('\n', &format!("\n{column}"));
    let mut out = left;
    let needed = match DESCRIPTION_COLUMN.checked_sub(out.len()) {
        Some(n) => n,
        // The flag prefix overruns the column; push the description down a line.
        None => {
            out.push('\n');
            DESCRIPTION_COLUMN
        }
    };
    out.push_str(&" ".repeat(needed));
    out.push_str(&description);
    out
}

fn render_usage(prefix: &str, specs: &[&OptionSpec]) -> String {
    let mut out = format!("Usage: {prefix}\n");

    out.push_str("\n Mandatory options:\n");
    let mut count = 0;
    for spec in specs {
        if !spec.mandatory {
            continue;
        }
        out.push_str(&render_option(spec));
        out.push('\n');
        count += 1;
    }
    if count == 0 {
        out.push_str("   (none)\n");
    }

    out.push_str("\n Optional options:\n");
    count = 0;
    for spec in specs {
        if spec.mandatory {
            continue;
        }
        out.push_str(&render_option(spec));
        out.push('\n');
        count += 1;
    }
    if count == 0 {
        out.push_str("   (none)\n");
    }

    out.push('\n');
    out
}

/// Render the full usage block for `config`, including the implicit help
/// option when the caller does not define one.
pub fn usage(config: &Config) -> String {
    let builtin_help = builtin_help_spec();
    let mut specs: Vec<&OptionSpec> = config.options.iter().collect();
    if !config.options.iter().any(|o| o.name == BUILTIN_HELP) {
        specs.push(&builtin_help);
    }
    render_usage(&config.prefix, &specs)
}

/// Parse `argv` against `config` without printing or exiting.
///
/// Matching repeatedly rescans the remaining tokens from the front: each scan
/// walks the still-unmatched options in declaration order, consumes the first
/// one whose flag appears in the leading run of flag-shaped tokens, and starts
/// over. The loop stops when a whole scan matches nothing. Declaration order
/// therefore sets priority between options that could match at the same scan,
/// not the final left-to-right consumption order; each successful match
/// strictly shrinks the unmatched set, which bounds the loop. This rescan
/// policy is deliberate and kept for compatibility with existing callers.
///
/// Failures carry the [`ParseResult`] as it stood at the moment of failure so
/// the call site can recover partial information.
pub fn run(argv: &[String], config: &Config) -> Result<ParseOutcome, ParseError> {
    let builtin_help = builtin_help_spec();
    let use_builtin_help = !config.options.iter().any(|o| o.name == BUILTIN_HELP);
    let mut specs: Vec<&OptionSpec> = config.options.iter().collect();
    if use_builtin_help {
        specs.push(&builtin_help);
    }

    let mut result = ParseResult {
        error: None,
        options: HashMap::new(),
        argv: argv.to_vec(),
    };
    // Scratch match-state keyed by option name; never written onto the
    // caller's specs, so a Config is reusable across parses.
    let mut matched: HashSet<&str> = HashSet::new();

    loop {
        let mut done = true;

        for spec in &specs {
            if matched.contains(spec.name.as_str()) {
                continue;
            }
            let Some(idx) = index_of(&result.argv, spec) else {
                continue;
            };

            if use_builtin_help && spec.name == BUILTIN_HELP {
                return Ok(ParseOutcome::Help(render_usage(&config.prefix, &specs)));
            }

            done = false;
            matched.insert(spec.name.as_str());

            match spec.kind {
                OptionKind::Bool => {
                    result.options.insert(spec.name.clone(), Value::Bool(true));
                    result.argv.remove(idx);
                }
                OptionKind::Number => {
                    let raw = take_value(&mut result.argv, idx);
                    let Some(number) = numeric_prefix(&raw) else {
                        return Err(ParseError::new(
                            ErrorKind::InvalidNumber,
                            format!("Option \"{}\" should be a number", spec.name),
                            result,
                        ));
                    };
                    result.options.insert(spec.name.clone(), Value::Number(number));
                }
                OptionKind::List => {
                    let raw = take_value(&mut result.argv, idx);
                    let items = raw
                        .split(',')
                        .map(|part| match numeric_prefix(part) {
                            Some(n) => Value::Number(n),
                            None => Value::Text(part.to_string()),
                        })
                        .collect();
                    result.options.insert(spec.name.clone(), Value::List(items));
                }
                OptionKind::Text => {
                    let raw = take_value(&mut result.argv, idx);
                    result.options.insert(spec.name.clone(), Value::Text(raw));
                }
            }

            // One match per scan; rescan from the first option.
            break;
        }

        if done {
            break;
        }
    }

    for spec in &specs {
        if matched.contains(spec.name.as_str()) || !spec.mandatory {
            continue;
        }
        return Err(ParseError::new(
            ErrorKind::MissingMandatory,
            format!("Missing mandatory option \"--{}\"", spec.name),
            result,
        ));
    }

    if let Some(first) = result.argv.first() {
        if first.starts_with("--") {
            let message = format!("Unknown option \"{first}\"");
            return Err(ParseError::new(ErrorKind::UnknownOption, message, result));
        }
    }

    if config.strict && !result.argv.is_empty() {
        let message = format!("Unparsed options remain \"{}\"", result.argv.join(" "));
        return Err(ParseError::new(
            ErrorKind::UnparsedRemainder,
            message,
            result,
        ));
    }

    Ok(ParseOutcome::Matches(result))
}

fn error_prefix() -> &'static str {
    if std::io::stderr().is_terminal() {
        "\x1b[31mERROR\x1b[0m"
    } else {
        "ERROR"
    }
}

/// Parse `argv`, printing diagnostics where [`run`] returns outcomes.
///
/// For the implicit help flag this prints the usage block and returns a
/// result whose `options` contain `help = true` (the caller checks
/// [`ParseResult::flag`] to stop further processing). On failure the message
/// and usage block go to stderr; with `exit_on_error` set the process then
/// exits with status 1, otherwise the partial result comes back with `error`
/// stamped.
pub fn parse(argv: &[String], config: &Config) -> ParseResult {
    match run(argv, config) {
        Ok(ParseOutcome::Matches(result)) => result,
        Ok(ParseOutcome::Help(text)) => {
            print!("{text}");
            let mut result = ParseResult::default();
            result
                .options
                .insert(BUILTIN_HELP.to_string(), Value::Bool(true));
            result
        }
        Err(err) => {
            eprintln!("[{}] {}\n", error_prefix(), err.message());
            eprint!("{}", usage(config));
            if config.exit_on_error {
                process::exit(1);
            }
            err.into_result()
        }
    }
}
