//! Declarative window grammars
//!
//! A [`Pattern`] is a small composable value (sequence, alternative,
//! optional, skip-until, any-order group, lookahead) matched against a
//! materialized window string. Whitespace before every terminal element is
//! skipped, so grammars can be written token by token without caring how the
//! window was joined.
//!
//! Matching never panics and never has side effects outside the returned
//! [`ParseResults`]: a mismatch is an ordinary [`ParseFailure`] value.

use std::fmt;
use thiserror::Error;

/// A set of characters accepted by a [`Pattern::Word`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharClass {
    letters: bool,
    uppercase: bool,
    digits: bool,
    extra: String,
}

impl CharClass {
    /// ASCII letters
    pub fn letters() -> Self {
        Self {
            letters: true,
            ..Self::default()
        }
    }

    /// ASCII uppercase letters only
    pub fn uppercase() -> Self {
        Self {
            uppercase: true,
            ..Self::default()
        }
    }

    /// ASCII letters and digits
    pub fn alphanumeric() -> Self {
        Self {
            letters: true,
            digits: true,
            ..Self::default()
        }
    }

    /// Exactly the given characters
    pub fn chars(chars: &str) -> Self {
        Self {
            extra: chars.to_string(),
            ..Self::default()
        }
    }

    /// Extend the class with additional characters
    pub fn with(mut self, chars: &str) -> Self {
        self.extra.push_str(chars);
        self
    }

    pub fn contains(&self, ch: char) -> bool {
        (self.letters && ch.is_ascii_alphabetic())
            || (self.uppercase && ch.is_ascii_uppercase())
            || (self.digits && ch.is_ascii_digit())
            || self.extra.contains(ch)
    }
}

/// A composable matching rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Exact text not followed by an identifier character
    Keyword(String),
    /// Exact text
    Literal(String),
    /// One `init` character followed by any number of `body` characters
    Word { init: CharClass, body: CharClass },
    /// Every element in order
    Seq(Vec<Pattern>),
    /// The alternative with the longest match
    Or(Vec<Pattern>),
    /// The first alternative that matches
    First(Vec<Pattern>),
    /// The inner pattern or nothing
    Optional(Box<Pattern>),
    /// The inner pattern repeated zero or more times
    ZeroOrMore(Box<Pattern>),
    /// Every element exactly once, in any order; `Optional` members may be absent
    Each(Vec<Pattern>),
    /// Skip characters until the target matches
    SkipTo(Box<Pattern>),
    /// Positive lookahead
    FollowedBy(Box<Pattern>),
    /// Negative lookahead
    NotAny(Box<Pattern>),
    /// End of the window (after trailing whitespace)
    StringEnd,
    /// Match the inner pattern but drop its captures
    Suppress(Box<Pattern>),
    /// Capture the text matched by the inner pattern under a name
    Named(String, Box<Pattern>),
}

pub fn keyword(text: &str) -> Pattern {
    Pattern::Keyword(text.to_string())
}

pub fn literal(text: &str) -> Pattern {
    Pattern::Literal(text.to_string())
}

pub fn word(init: CharClass, body: CharClass) -> Pattern {
    Pattern::Word { init, body }
}

/// The inner pattern between a pair of `"` tokens
pub fn quoted(inner: Pattern) -> Pattern {
    seq(vec![suppress(literal("\"")), inner, suppress(literal("\""))])
}

pub fn seq(items: Vec<Pattern>) -> Pattern {
    Pattern::Seq(items)
}

pub fn or(alternatives: Vec<Pattern>) -> Pattern {
    Pattern::Or(alternatives)
}

pub fn first(alternatives: Vec<Pattern>) -> Pattern {
    Pattern::First(alternatives)
}

pub fn optional(inner: Pattern) -> Pattern {
    Pattern::Optional(Box::new(inner))
}

pub fn zero_or_more(inner: Pattern) -> Pattern {
    Pattern::ZeroOrMore(Box::new(inner))
}

pub fn each(items: Vec<Pattern>) -> Pattern {
    Pattern::Each(items)
}

/// Skip up to, but not over, the target
pub fn skip_to(target: Pattern) -> Pattern {
    Pattern::SkipTo(Box::new(target))
}

pub fn followed_by(inner: Pattern) -> Pattern {
    Pattern::FollowedBy(Box::new(inner))
}

pub fn not_any(inner: Pattern) -> Pattern {
    Pattern::NotAny(Box::new(inner))
}

pub fn string_end() -> Pattern {
    Pattern::StringEnd
}

pub fn suppress(inner: Pattern) -> Pattern {
    Pattern::Suppress(Box::new(inner))
}

pub fn named(name: &str, inner: Pattern) -> Pattern {
    Pattern::Named(name.to_string(), Box::new(inner))
}

/// Why a grammar did not match
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} at position {position}")]
pub struct ParseFailure {
    /// Byte offset into the window where matching failed
    pub position: usize,
    /// Description of the element that could not be matched
    pub expected: String,
}

impl ParseFailure {
    fn new(position: usize, expected: impl Into<String>) -> Self {
        Self {
            position,
            expected: expected.into(),
        }
    }

    fn furthest(current: Option<ParseFailure>, candidate: ParseFailure) -> Option<ParseFailure> {
        match current {
            Some(existing) if existing.position >= candidate.position => Some(existing),
            _ => Some(candidate),
        }
    }
}

/// Named captures of a successful match, in capture order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResults {
    captures: Vec<(String, String)>,
    end: usize,
}

impl ParseResults {
    /// First value captured under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.captures
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value captured under `name`
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.captures
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.captures.iter().any(|(key, _)| key == name)
    }

    /// Byte offset just past the matched text
    pub fn end(&self) -> usize {
        self.end
    }
}

/// A named pattern with an optional window terminal token
#[derive(Debug, Clone)]
pub struct Grammar {
    name: String,
    pattern: Pattern,
    terminal: Option<String>,
}

impl Grammar {
    pub fn new(name: &str, pattern: Pattern) -> Self {
        Self {
            name: name.to_string(),
            pattern,
            terminal: None,
        }
    }

    /// Declare the token that closes the look-ahead window for this grammar
    pub fn with_terminal(mut self, terminal: &str) -> Self {
        self.terminal = Some(terminal.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn terminal(&self) -> Option<&str> {
        self.terminal.as_deref()
    }

    /// Match the grammar at the start of `window`
    ///
    /// Trailing text after the match is allowed unless the pattern itself
    /// ends with [`string_end`].
    pub fn parse(&self, window: &str) -> Result<ParseResults, ParseFailure> {
        let mut captures = Vec::new();
        let end = self.pattern.match_at(window, 0, &mut captures)?;
        Ok(ParseResults { captures, end })
    }
}

type Captures = Vec<(String, String)>;

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn skip_whitespace(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|(_, ch)| !ch.is_whitespace())
        .map(|(offset, _)| pos + offset)
        .unwrap_or(text.len())
}

impl Pattern {
    fn match_at(&self, text: &str, pos: usize, captures: &mut Captures) -> Result<usize, ParseFailure> {
        match self {
            Pattern::Keyword(expected) => {
                let start = skip_whitespace(text, pos);
                if text[start..].starts_with(expected.as_str()) {
                    let end = start + expected.len();
                    let boundary = text[end..].chars().next().map_or(true, |ch| !is_identifier_char(ch));
                    if boundary {
                        return Ok(end);
                    }
                }
                Err(ParseFailure::new(start, self.to_string()))
            }

            Pattern::Literal(expected) => {
                let start = skip_whitespace(text, pos);
                if text[start..].starts_with(expected.as_str()) {
                    Ok(start + expected.len())
                } else {
                    Err(ParseFailure::new(start, self.to_string()))
                }
            }

            Pattern::Word { init, body } => {
                let start = skip_whitespace(text, pos);
                let mut chars = text[start..].chars();
                match chars.next() {
                    Some(ch) if init.contains(ch) => {
                        let rest: usize = chars
                            .take_while(|ch| body.contains(*ch))
                            .map(char::len_utf8)
                            .sum();
                        Ok(start + ch.len_utf8() + rest)
                    }
                    _ => Err(ParseFailure::new(start, self.to_string())),
                }
            }

            Pattern::Seq(items) => {
                let mut current = pos;
                for item in items {
                    current = item.match_at(text, current, captures)?;
                }
                Ok(current)
            }

            Pattern::Or(alternatives) => {
                let mut best: Option<(usize, Captures)> = None;
                let mut failure = None;
                for alternative in alternatives {
                    let mut trial = captures.clone();
                    match alternative.match_at(text, pos, &mut trial) {
                        Ok(end) => {
                            if best.as_ref().map_or(true, |(best_end, _)| end > *best_end) {
                                best = Some((end, trial));
                            }
                        }
                        Err(err) => failure = ParseFailure::furthest(failure, err),
                    }
                }
                match best {
                    Some((end, trial)) => {
                        *captures = trial;
                        Ok(end)
                    }
                    None => Err(failure.unwrap_or_else(|| ParseFailure::new(pos, self.to_string()))),
                }
            }

            Pattern::First(alternatives) => {
                let mark = captures.len();
                let mut failure = None;
                for alternative in alternatives {
                    match alternative.match_at(text, pos, captures) {
                        Ok(end) => return Ok(end),
                        Err(err) => {
                            captures.truncate(mark);
                            failure = ParseFailure::furthest(failure, err);
                        }
                    }
                }
                Err(failure.unwrap_or_else(|| ParseFailure::new(pos, self.to_string())))
            }

            Pattern::Optional(inner) => {
                let mark = captures.len();
                match inner.match_at(text, pos, captures) {
                    Ok(end) => Ok(end),
                    Err(_) => {
                        captures.truncate(mark);
                        Ok(pos)
                    }
                }
            }

            Pattern::ZeroOrMore(inner) => {
                let mut current = pos;
                loop {
                    let mark = captures.len();
                    match inner.match_at(text, current, captures) {
                        Ok(end) if end > current => current = end,
                        Ok(_) => break,
                        Err(_) => {
                            captures.truncate(mark);
                            break;
                        }
                    }
                }
                Ok(current)
            }

            Pattern::Each(items) => {
                let mut remaining: Vec<&Pattern> = items.iter().collect();
                let mut current = pos;
                loop {
                    let mut matched = None;
                    for (index, item) in remaining.iter().enumerate() {
                        let candidate = match item {
                            Pattern::Optional(inner) => inner.as_ref(),
                            other => *other,
                        };
                        let mark = captures.len();
                        match candidate.match_at(text, current, captures) {
                            Ok(end) => {
                                matched = Some((index, end));
                                break;
                            }
                            Err(_) => captures.truncate(mark),
                        }
                    }
                    match matched {
                        Some((index, end)) => {
                            remaining.remove(index);
                            current = end;
                        }
                        None => break,
                    }
                }

                // Every required member must have been consumed
                match remaining.iter().find(|item| !matches!(item, Pattern::Optional(_))) {
                    Some(missing) => Err(ParseFailure::new(
                        skip_whitespace(text, current),
                        missing.to_string(),
                    )),
                    None => Ok(current),
                }
            }

            Pattern::SkipTo(target) => {
                let mut current = pos;
                loop {
                    let mut trial = Vec::new();
                    if target.match_at(text, current, &mut trial).is_ok() {
                        return Ok(skip_whitespace(text, current));
                    }
                    match text[current..].chars().next() {
                        Some(ch) => current += ch.len_utf8(),
                        None => return Err(ParseFailure::new(pos, self.to_string())),
                    }
                }
            }

            Pattern::FollowedBy(inner) => {
                let mut discarded = Vec::new();
                inner.match_at(text, pos, &mut discarded)?;
                Ok(pos)
            }

            Pattern::NotAny(inner) => {
                let mut discarded = Vec::new();
                match inner.match_at(text, pos, &mut discarded) {
                    Ok(_) => Err(ParseFailure::new(skip_whitespace(text, pos), self.to_string())),
                    Err(_) => Ok(pos),
                }
            }

            Pattern::StringEnd => {
                let end = skip_whitespace(text, pos);
                if end == text.len() {
                    Ok(end)
                } else {
                    Err(ParseFailure::new(end, self.to_string()))
                }
            }

            Pattern::Suppress(inner) => {
                let mut discarded = Vec::new();
                inner.match_at(text, pos, &mut discarded)
            }

            Pattern::Named(name, inner) => {
                let start = skip_whitespace(text, pos);
                let end = inner.match_at(text, pos, captures).map_err(|err| {
                    if err.position <= start {
                        ParseFailure::new(err.position, name.clone())
                    } else {
                        err
                    }
                })?;
                let value = text[start.min(end)..end].trim().to_string();
                captures.push((name.clone(), value));
                Ok(end)
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Keyword(text) => write!(f, "keyword '{}'", text),
            Pattern::Literal(text) => write!(f, "'{}'", text),
            Pattern::Word { .. } => write!(f, "word"),
            Pattern::Seq(items) => match items.first() {
                Some(head) => write!(f, "{}", head),
                None => write!(f, "empty sequence"),
            },
            Pattern::Or(_) | Pattern::First(_) => write!(f, "one of several alternatives"),
            Pattern::Optional(inner) | Pattern::ZeroOrMore(inner) => write!(f, "{}", inner),
            Pattern::Each(_) => write!(f, "group of fields"),
            Pattern::SkipTo(target) => write!(f, "{} somewhere ahead", target),
            Pattern::FollowedBy(inner) => write!(f, "lookahead {}", inner),
            Pattern::NotAny(inner) => write!(f, "anything but {}", inner),
            Pattern::StringEnd => write!(f, "end of window"),
            Pattern::Suppress(inner) => write!(f, "{}", inner),
            Pattern::Named(name, _) => write!(f, "{}", name),
        }
    }
}
