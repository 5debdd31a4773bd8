//! Entity scope detection
//!
//! Splits a source file into one token sub-stream per declared entity.
//! Indentation-scoped languages (GDScript) work on raw lines so the indent
//! survives; brace-scoped languages work on the token stream directly.

use std::ops::Range;

use tracing::debug;

use super::godot_grammars::NAME;
use super::grammar::Grammar;
use super::tokenizer::{materialize_window, preprocess, TokenMappings};

/// Width of a tab when measuring indentation
const TAB_WIDTH: usize = 4;

/// Comment delimiters of a language; empty strings mean unsupported
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentMarkers {
    pub line: String,
    pub block_start: String,
    pub block_stop: String,
}

impl CommentMarkers {
    pub fn line_only(line: &str) -> Self {
        Self {
            line: line.to_string(),
            ..Self::default()
        }
    }
}

/// How an entity body is delimited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopingMode {
    Indentation,
    Braces,
}

/// One detected entity body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub name: String,
    pub tokens: Vec<String>,
}

/// Result of splitting one source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSplit {
    pub scopes: Vec<Scope>,
    /// Token streams of anchors whose header yielded no name and that do
    /// not sit inside a named scope
    pub rejected: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct ScopeSplitter {
    anchors: Vec<String>,
    header: Grammar,
    comments: CommentMarkers,
    mode: ScopingMode,
    mappings: TokenMappings,
}

impl ScopeSplitter {
    pub fn new(
        anchors: &[&str],
        header: Grammar,
        comments: CommentMarkers,
        mode: ScopingMode,
        mappings: TokenMappings,
    ) -> Self {
        Self {
            anchors: anchors.iter().map(|anchor| anchor.to_string()).collect(),
            header,
            comments,
            mode,
            mappings,
        }
    }

    /// Return one scope per entity declared in `source`
    pub fn split(&self, source: &str) -> ScopeSplit {
        let source = self.strip_block_comments(source);
        match self.mode {
            ScopingMode::Indentation => self.split_indented(&source),
            ScopingMode::Braces => self.split_braced(&source),
        }
    }

    fn is_anchor(&self, token: &str) -> bool {
        self.anchors.iter().any(|anchor| anchor == token)
    }

    /// Name of the entity declared by the scope's leading tokens
    fn entity_name(&self, tokens: &[String]) -> Option<String> {
        let (anchor, following) = tokens.split_first()?;
        let window = materialize_window(anchor, following, self.header.terminal());
        match self.header.parse(&window) {
            Ok(results) => results.get(NAME).map(str::to_string),
            Err(failure) => {
                debug!("skipping scope without a usable header: {}", failure);
                None
            }
        }
    }

    fn split_indented(&self, source: &str) -> ScopeSplit {
        let lines: Vec<&str> = source
            .lines()
            .map(|line| strip_line_comment(line, &self.comments.line))
            .collect();

        let mut split = ScopeSplit::default();
        let mut named_ranges = Vec::new();
        for (start, line) in lines.iter().enumerate() {
            let starts_entity = line
                .split_whitespace()
                .next()
                .map(|first| preprocess(first, &self.mappings))
                .and_then(|tokens| tokens.into_iter().next())
                .is_some_and(|first| self.is_anchor(&first));
            if !starts_entity {
                continue;
            }

            // The body runs until the next non-blank line indented no deeper than the header
            let header_indent = indentation(line);
            let end = lines[start + 1..]
                .iter()
                .position(|next| !next.trim().is_empty() && indentation(next) <= header_indent)
                .map(|offset| start + 1 + offset)
                .unwrap_or(lines.len());

            let body = lines[start..end].join("\n");
            let tokens = preprocess(&body, &self.mappings);
            match self.entity_name(&tokens) {
                Some(name) => {
                    named_ranges.push(start..end);
                    split.scopes.push(Scope { name, tokens });
                }
                None if !inside_any(&named_ranges, start) => split.rejected.push(tokens),
                None => {}
            }
        }
        split
    }

    fn split_braced(&self, source: &str) -> ScopeSplit {
        let stripped: Vec<&str> = source
            .lines()
            .map(|line| strip_line_comment(line, &self.comments.line))
            .collect();
        let tokens = preprocess(&stripped.join("\n"), &self.mappings);

        let mut split = ScopeSplit::default();
        let mut named_ranges = Vec::new();
        for (start, token) in tokens.iter().enumerate() {
            if !self.is_anchor(token) {
                continue;
            }
            let Some(open) = tokens[start..].iter().position(|t| t == "{").map(|p| start + p) else {
                continue;
            };

            let mut depth = 0usize;
            let mut close = None;
            for (index, token) in tokens.iter().enumerate().skip(open) {
                match token.as_str() {
                    "{" => depth += 1,
                    "}" => {
                        depth -= 1;
                        if depth == 0 {
                            close = Some(index);
                            break;
                        }
                    }
                    _ => {}
                }
            }

            let end = close.map(|index| index + 1).unwrap_or(tokens.len());
            let scope_tokens = tokens[start..end].to_vec();
            match self.entity_name(&scope_tokens) {
                Some(name) => {
                    named_ranges.push(start..end);
                    split.scopes.push(Scope {
                        name,
                        tokens: scope_tokens,
                    });
                }
                None if !inside_any(&named_ranges, start) => split.rejected.push(scope_tokens),
                None => {}
            }
        }
        split
    }

    fn strip_block_comments(&self, source: &str) -> String {
        let (start, stop) = (&self.comments.block_start, &self.comments.block_stop);
        if start.is_empty() || stop.is_empty() {
            return source.to_string();
        }

        let mut result = String::with_capacity(source.len());
        let mut rest = source;
        while let Some(open) = rest.find(start.as_str()) {
            result.push_str(&rest[..open]);
            match rest[open + start.len()..].find(stop.as_str()) {
                Some(close) => {
                    // Keep line structure intact for indentation scoping
                    let comment = &rest[open..open + start.len() + close + stop.len()];
                    result.extend(comment.chars().filter(|ch| *ch == '\n'));
                    rest = &rest[open + start.len() + close + stop.len()..];
                }
                None => {
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }
}

/// Cut a line at its comment marker, ignoring markers inside `"` strings
fn strip_line_comment<'a>(line: &'a str, marker: &str) -> &'a str {
    if marker.is_empty() {
        return line;
    }
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        if ch == '"' {
            in_string = !in_string;
        } else if !in_string && line[index..].starts_with(marker) {
            return &line[..index];
        }
    }
    line
}

fn inside_any(ranges: &[Range<usize>], index: usize) -> bool {
    ranges.iter().any(|range| range.contains(&index))
}

fn indentation(line: &str) -> usize {
    line.chars()
        .take_while(|ch| ch.is_whitespace())
        .map(|ch| if ch == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}
