//! The headless event language.
//!
//! A script is a list of events separated by commas or newlines, such as
//! `type:SELECT * FROM orders,key:f5,settle,assert:state:row_count>=1`.
//! A literal comma is written `\,`. Inside `type:` a `\n` becomes a
//! newline. Script lines starting with `#` are ignored.

use super::HeadlessState;
use crate::error::{PlaygroundError, Result};
use crate::tui::app::Focus;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use regex::Regex;
use std::fmt;
use std::time::Duration;

/// Key names accepted after `key:`. The first name of a code is the one
/// printed back.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("enter", KeyCode::Enter),
    ("return", KeyCode::Enter),
    ("esc", KeyCode::Esc),
    ("escape", KeyCode::Esc),
    ("tab", KeyCode::Tab),
    ("backspace", KeyCode::Backspace),
    ("bs", KeyCode::Backspace),
    ("delete", KeyCode::Delete),
    ("del", KeyCode::Delete),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pgup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("pgdn", KeyCode::PageDown),
    ("space", KeyCode::Char(' ')),
];

const MODIFIERS: &[(&str, KeyModifiers)] = &[
    ("ctrl", KeyModifiers::CONTROL),
    ("control", KeyModifiers::CONTROL),
    ("alt", KeyModifiers::ALT),
    ("shift", KeyModifiers::SHIFT),
    ("super", KeyModifiers::SUPER),
    ("cmd", KeyModifiers::SUPER),
    ("meta", KeyModifiers::SUPER),
];

/// How a state field is compared in `assert:state:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ge,
    Le,
    Gt,
    Lt,
}

impl Comparison {
    /// Longest operators first so `>=` is not read as `>`.
    const ALL: [(&'static str, Comparison); 5] = [
        (">=", Comparison::Ge),
        ("<=", Comparison::Le),
        (">", Comparison::Gt),
        ("<", Comparison::Lt),
        ("=", Comparison::Eq),
    ];

    fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }

    /// Numbers compare numerically; anything else only supports equality.
    fn holds(self, actual: &str, expected: &str) -> bool {
        match (actual.parse::<i64>(), expected.parse::<i64>()) {
            (Ok(a), Ok(e)) => match self {
                Self::Eq => a == e,
                Self::Ge => a >= e,
                Self::Le => a <= e,
                Self::Gt => a > e,
                Self::Lt => a < e,
            },
            _ => self == Self::Eq && actual == expected,
        }
    }
}

/// A check against the rendered screen or the state snapshot.
#[derive(Debug, Clone)]
pub enum Assertion {
    /// Screen contains the text, ignoring case.
    Contains(String),
    /// Screen contains the text exactly.
    ContainsExact(String),
    /// Screen does not contain the text, ignoring case.
    NotContains(String),
    /// Screen matches the pattern.
    Matches(Regex),
    /// A state field compares against a value.
    State {
        field: String,
        cmp: Comparison,
        value: String,
    },
}

impl Assertion {
    pub fn check(&self, screen: &str, state: &HeadlessState) -> bool {
        match self {
            Self::Contains(text) => screen.to_lowercase().contains(&text.to_lowercase()),
            Self::ContainsExact(text) => screen.contains(text.as_str()),
            Self::NotContains(text) => !screen.to_lowercase().contains(&text.to_lowercase()),
            Self::Matches(re) => re.is_match(screen),
            Self::State { field, cmp, value } => state
                .field(field)
                .is_some_and(|actual| cmp.holds(&actual, value)),
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(text) => write!(f, "contains:{text}"),
            Self::ContainsExact(text) => write!(f, "contains-exact:{text}"),
            Self::NotContains(text) => write!(f, "not-contains:{text}"),
            Self::Matches(re) => write!(f, "matches:{}", re.as_str()),
            Self::State { field, cmp, value } => {
                write!(f, "state:{field}{}{value}", cmp.symbol())
            }
        }
    }
}

/// One step of a headless script.
#[derive(Debug, Clone)]
pub enum Event {
    /// Press a key.
    Key(KeyEvent),
    /// Type text into the focused control.
    Type(String),
    /// Sleep.
    Wait(Duration),
    /// Resize the virtual screen.
    Resize(u16, u16),
    /// Capture a frame under a name.
    Snapshot(String),
    /// Load a query template by name.
    Template(String),
    /// Replace the search term.
    Search(String),
    /// Move focus.
    Focus(Focus),
    /// Wait for every started execution to land.
    Settle,
    /// Export the filtered rows.
    Export,
    /// Check the screen or state.
    Assert(Assertion),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "key:{}", describe_key(key)),
            Self::Type(text) => write!(f, "type:{}", text.replace('\n', "\\n")),
            Self::Wait(d) => write!(f, "wait:{}ms", d.as_millis()),
            Self::Resize(w, h) => write!(f, "resize:{w}x{h}"),
            Self::Snapshot(name) => write!(f, "snapshot:{name}"),
            Self::Template(name) => write!(f, "template:{name}"),
            Self::Search(term) => write!(f, "search:{term}"),
            Self::Focus(focus) => write!(f, "focus:{}", focus.as_str()),
            Self::Settle => f.write_str("settle"),
            Self::Export => f.write_str("export"),
            Self::Assert(assertion) => write!(f, "assert:{assertion}"),
        }
    }
}

fn describe_key(key: &KeyEvent) -> String {
    let mut parts: Vec<String> = [
        (KeyModifiers::CONTROL, "ctrl"),
        (KeyModifiers::ALT, "alt"),
        (KeyModifiers::SHIFT, "shift"),
        (KeyModifiers::SUPER, "super"),
    ]
    .into_iter()
    .filter(|(modifier, _)| key.modifiers.contains(*modifier))
    .map(|(_, name)| name.to_string())
    .collect();

    let name = match NAMED_KEYS.iter().find(|(_, code)| *code == key.code) {
        Some((name, _)) => name.to_string(),
        None => match key.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::F(n) => format!("f{n}"),
            _ => "unknown".to_string(),
        },
    };
    parts.push(name);
    parts.join("+")
}

/// Splits a line on commas that are not escaped as `\,`.
fn split_events(line: &str) -> Vec<String> {
    let pieces: Vec<&str> = line.split(',').collect();
    let mut parts: Vec<String> = Vec::new();
    let mut joining = false;

    for (i, piece) in pieces.iter().enumerate() {
        let escaped = i + 1 < pieces.len() && piece.ends_with('\\');
        let text = if escaped {
            &piece[..piece.len() - 1]
        } else {
            piece
        };

        match parts.last_mut() {
            Some(last) if joining => {
                last.push(',');
                last.push_str(text);
            }
            _ => parts.push(text.to_string()),
        }
        joining = escaped;
    }

    parts
}

fn syntax_error(message: String) -> PlaygroundError {
    PlaygroundError::config(message)
}

/// Parses scripts and single events.
#[derive(Debug, Default)]
pub struct EventParser;

impl EventParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses a whole script.
    pub fn parse_all(&self, input: &str) -> Result<Vec<Event>> {
        input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .flat_map(split_events)
            .filter(|part| !part.trim().is_empty())
            .map(|part| self.parse_one(&part))
            .collect()
    }

    /// Parses one `kind:value` event or a bare `settle`/`export`.
    pub fn parse_one(&self, input: &str) -> Result<Event> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("settle") {
            return Ok(Event::Settle);
        }
        if input.eq_ignore_ascii_case("export") {
            return Ok(Event::Export);
        }

        let (kind, value) = input.split_once(':').ok_or_else(|| {
            syntax_error(format!(
                "Invalid event syntax: '{input}'. Expected kind:value"
            ))
        })?;

        match kind.trim().to_lowercase().as_str() {
            "key" => parse_key(value.trim()).map(Event::Key),
            "type" => Ok(Event::Type(value.replace("\\n", "\n"))),
            "wait" => parse_wait(value.trim()).map(Event::Wait),
            "resize" => {
                let (w, h) = parse_size(value.trim())?;
                Ok(Event::Resize(w, h))
            }
            "snapshot" => Ok(Event::Snapshot(value.trim().to_string())),
            "template" => Ok(Event::Template(value.trim().to_string())),
            "search" => Ok(Event::Search(value.to_string())),
            "focus" => parse_focus(value.trim()).map(Event::Focus),
            "assert" => parse_assertion(value.trim()).map(Event::Assert),
            other => Err(syntax_error(format!(
                "Unknown event type: '{other}'. Valid types: key, type, wait, resize, \
                 snapshot, template, search, focus, settle, export, assert"
            ))),
        }
    }
}

/// Parses `ctrl+enter`, `alt+f`, `f5`, `ctrl+/` and the like.
fn parse_key(value: &str) -> Result<KeyEvent> {
    let (mods, key) = match value.rsplit_once('+') {
        // A trailing "+" names the plus key itself.
        Some((mods, "")) => (mods.strip_suffix('+').unwrap_or(mods), "+"),
        Some(split) => split,
        None => ("", value),
    };

    let mut modifiers = KeyModifiers::empty();
    for part in mods.split('+').filter(|part| !part.is_empty()) {
        let lowered = part.to_lowercase();
        let (_, modifier) = MODIFIERS
            .iter()
            .find(|(name, _)| *name == lowered)
            .ok_or_else(|| {
                syntax_error(format!(
                    "Unknown modifier: '{part}'. Valid modifiers: ctrl, alt, shift, super"
                ))
            })?;
        modifiers |= *modifier;
    }

    Ok(KeyEvent::new(parse_key_code(key)?, modifiers))
}

fn parse_key_code(name: &str) -> Result<KeyCode> {
    let lowered = name.to_lowercase();

    if let Some(n) = lowered
        .strip_prefix('f')
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| (1..=12).contains(n))
    {
        return Ok(KeyCode::F(n));
    }

    if lowered == "slash" {
        return Ok(KeyCode::Char('/'));
    }
    if let Some((_, code)) = NAMED_KEYS.iter().find(|(key, _)| *key == lowered) {
        return Ok(*code);
    }

    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(KeyCode::Char(c)),
        _ => Err(syntax_error(format!(
            "Unknown key: '{name}'. Use a single character or a named key like enter, esc, tab"
        ))),
    }
}

/// `100ms`, `2s`, or a bare number of milliseconds.
fn parse_wait(value: &str) -> Result<Duration> {
    let lowered = value.to_lowercase();

    let parsed = if let Some(ms) = lowered.strip_suffix("ms") {
        ms.trim().parse().map(Duration::from_millis)
    } else if let Some(secs) = lowered.strip_suffix('s') {
        secs.trim().parse().map(Duration::from_secs)
    } else {
        lowered.parse().map(Duration::from_millis)
    };

    parsed.map_err(|_| syntax_error(format!("Invalid duration: '{value}'")))
}

fn parse_size(value: &str) -> Result<(u16, u16)> {
    let (w, h) = value.split_once('x').ok_or_else(|| {
        syntax_error(format!(
            "Invalid resize format: '{value}'. Expected WIDTHxHEIGHT"
        ))
    })?;
    let width = w
        .parse::<u16>()
        .map_err(|_| syntax_error(format!("Invalid width: '{w}'")))?;
    let height = h
        .parse::<u16>()
        .map_err(|_| syntax_error(format!("Invalid height: '{h}'")))?;
    Ok((width, height))
}

fn parse_focus(value: &str) -> Result<Focus> {
    match value.to_lowercase().as_str() {
        "editor" => Ok(Focus::Editor),
        "search" => Ok(Focus::Search),
        "run" | "button" => Ok(Focus::RunButton),
        _ => Err(syntax_error(format!(
            "Unknown focus target: '{value}'. Valid targets: editor, search, run"
        ))),
    }
}

/// Parses `contains:Alfreds`, `matches:\d+ rows`, `state:phase=failed`.
fn parse_assertion(value: &str) -> Result<Assertion> {
    let (kind, rest) = value.split_once(':').ok_or_else(|| {
        syntax_error(format!(
            "Invalid assertion syntax: '{value}'. Expected assert:kind:value"
        ))
    })?;
    let rest = rest.trim();

    match kind.trim().to_lowercase().as_str() {
        "contains" => Ok(Assertion::Contains(rest.to_string())),
        "contains-exact" => Ok(Assertion::ContainsExact(rest.to_string())),
        "not-contains" => Ok(Assertion::NotContains(rest.to_string())),
        "matches" => Regex::new(rest)
            .map(Assertion::Matches)
            .map_err(|e| syntax_error(format!("Invalid pattern '{rest}': {e}"))),
        "state" => parse_state_assertion(rest),
        other => Err(syntax_error(format!(
            "Unknown assertion type: '{other}'. Valid types: contains, contains-exact, \
             not-contains, matches, state"
        ))),
    }
}

fn parse_state_assertion(value: &str) -> Result<Assertion> {
    Comparison::ALL
        .iter()
        .find_map(|&(symbol, cmp)| {
            value
                .split_once(symbol)
                .map(|(field, expected)| Assertion::State {
                    field: field.trim().to_string(),
                    cmp,
                    value: expected.trim().to_string(),
                })
        })
        .ok_or_else(|| {
            syntax_error(format!(
                "Invalid state assertion: '{value}'. Expected field=value or field>=value"
            ))
        })
}
