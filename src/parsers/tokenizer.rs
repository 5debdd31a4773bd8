//! Token preprocessing and read-ahead traversal
//!
//! Source text is normalized into a flat token stream by padding a fixed set
//! of punctuation characters with spaces and splitting on whitespace.
//! Newlines survive as their own `"\n"` tokens so that line-oriented
//! heuristics still work on the stream.
//!
//! The [`read_ahead`] cursor walks a stream and hands out, for every token,
//! the suffix of tokens that follow it as a borrowed slice.

/// The newline token kept in every token stream
pub const NEWLINE: &str = "\n";

/// Mapping of punctuation characters to their padded replacement
#[derive(Debug, Clone, Default)]
pub struct TokenMappings {
    entries: Vec<(char, String)>,
}

impl TokenMappings {
    /// Create an empty mapping (plain whitespace splitting)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the padding for a single character
    pub fn with(mut self, ch: char, replacement: impl Into<String>) -> Self {
        let replacement = replacement.into();
        match self.entries.iter_mut().find(|(key, _)| *key == ch) {
            Some(entry) => entry.1 = replacement,
            None => self.entries.push((ch, replacement)),
        }
        self
    }

    /// Mapping shared by the GDScript and scene-format parsers
    pub fn godot() -> Self {
        [':', ';', '{', '}', '(', ')', '[', ']', '?', '!', ',', '<', '>', '"']
            .into_iter()
            .fold(Self::new(), |mappings, ch| mappings.with(ch, format!(" {} ", ch)))
    }

    /// Replacement string for `ch`, if it is mapped
    pub fn replacement(&self, ch: char) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == ch)
            .map(|(_, replacement)| replacement.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize raw text into a token stream
///
/// Every mapped character is replaced by its padding, then the text is split
/// on whitespace. Each `\n` becomes a token of its own; other whitespace
/// (including `\r`) only separates tokens.
pub fn preprocess(content: &str, mappings: &TokenMappings) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    let mut push_char = |ch: char, tokens: &mut Vec<String>, current: &mut String| {
        if ch == '\n' {
            if !current.is_empty() {
                tokens.push(std::mem::take(current));
            }
            tokens.push(NEWLINE.to_string());
        } else if ch.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(current));
            }
        } else {
            current.push(ch);
        }
    };

    for ch in content.chars() {
        match mappings.replacement(ch) {
            Some(padded) => {
                for padded_ch in padded.chars() {
                    push_char(padded_ch, &mut tokens, &mut current);
                }
            }
            None => push_char(ch, &mut tokens, &mut current),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// One step of the read-ahead cursor
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    /// Position of the anchor token in the stream
    pub index: usize,
    /// The anchor token itself
    pub anchor: &'a str,
    /// Every token after the anchor, in stream order
    pub following: &'a [String],
}

impl<'a> Window<'a> {
    /// The `n`-th token after the anchor
    pub fn peek(&self, n: usize) -> Option<&'a str> {
        self.following.get(n).map(String::as_str)
    }

    /// Join anchor and look-ahead into a string a grammar can parse
    pub fn materialize(&self, terminal: Option<&str>) -> String {
        materialize_window(self.anchor, self.following, terminal)
    }

    /// Short rendering of the window for diagnostics
    pub fn truncated(&self, limit: usize) -> String {
        let shown: Vec<&str> = self
            .following
            .iter()
            .take(limit)
            .map(|token| if token == NEWLINE { "\\n" } else { token.as_str() })
            .collect();
        format!("{} {:?}", self.anchor, shown)
    }
}

/// Iterator produced by [`read_ahead`]
#[derive(Debug, Clone)]
pub struct ReadAhead<'a> {
    tokens: &'a [String],
    index: usize,
}

impl<'a> Iterator for ReadAhead<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let anchor = self.tokens.get(self.index)?;
        let window = Window {
            index: self.index,
            anchor: anchor.as_str(),
            following: &self.tokens[self.index + 1..],
        };
        self.index += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tokens.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

/// Walk a token stream, yielding each token with the suffix that follows it
pub fn read_ahead(tokens: &[String]) -> ReadAhead<'_> {
    ReadAhead { tokens, index: 0 }
}

/// Join an anchor and a prefix of its suffix with single spaces
///
/// With a `terminal`, the prefix stops after the first token equal to it.
/// Without one, or when the terminal never occurs, the whole suffix is used
/// and the grammar has to find its own stopping point.
pub fn materialize_window(anchor: &str, following: &[String], terminal: Option<&str>) -> String {
    let end = terminal
        .and_then(|terminal| following.iter().position(|token| token == terminal))
        .map(|position| position + 1)
        .unwrap_or(following.len());

    let mut window = String::with_capacity(anchor.len() + end * 8);
    window.push_str(anchor);
    for token in &following[..end] {
        window.push(' ');
        window.push_str(token);
    }
    window
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_preprocess_pads_punctuation() {
        let result = preprocess("func _ready():", &TokenMappings::godot());
        assert_eq!(result, tokens(&["func", "_ready", "(", ")", ":"]));
    }

    #[test]
    fn test_preprocess_keeps_newlines() {
        let result = preprocess("extends Node\r\n\nvar a", &TokenMappings::godot());
        assert_eq!(result, tokens(&["extends", "Node", "\n", "\n", "var", "a"]));
    }

    #[test]
    fn test_preprocess_splits_quoted_resource_paths() {
        let result = preprocess(r#"preload("res://ui/hud.gd")"#, &TokenMappings::godot());
        assert_eq!(
            result,
            tokens(&["preload", "(", "\"", "res", ":", "//ui/hud.gd", "\"", ")"])
        );
    }

    #[test]
    fn test_preprocess_without_mappings() {
        let result = preprocess("a:b  c", &TokenMappings::new());
        assert_eq!(result, tokens(&["a:b", "c"]));
    }

    #[test]
    fn test_read_ahead_yields_suffix_views() {
        let stream = tokens(&["class_name", "Foo", "extends", "Bar"]);
        let windows: Vec<_> = read_ahead(&stream).collect();

        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0].index, 0);
        assert_eq!(windows[0].anchor, "class_name");
        assert_eq!(windows[0].following.len(), 3);
        assert_eq!(windows[2].peek(0), Some("Bar"));
        assert!(windows[3].following.is_empty());
    }

    #[test]
    fn test_materialize_window_stops_at_terminal() {
        let stream = tokens(&["Player", "extends", "Node", ":", "var", "x"]);
        assert_eq!(
            materialize_window("class", &stream, Some(":")),
            "class Player extends Node :"
        );
        assert_eq!(
            materialize_window("class", &stream, None),
            "class Player extends Node : var x"
        );
        assert_eq!(
            materialize_window("class", &stream, Some("]")),
            "class Player extends Node : var x"
        );
    }

    #[test]
    fn test_truncated_view() {
        let stream = tokens(&["class", "\n", "a", "b", "c"]);
        let window = read_ahead(&stream).next().unwrap();
        assert_eq!(window.truncated(2), r#"class ["\\n", "a"]"#);
    }
}
