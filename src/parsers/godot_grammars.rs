//! Grammars for GDScript sources and Godot text scenes
//!
//! Every grammar here runs against a window materialized from the padded
//! token stream, so punctuation arrives space separated: `res://x.gd` is
//! seen as `res : //x.gd` and `"Script"` as `" Script "`.

use crate::parsers::grammar::{
    each, first, keyword, literal, named, not_any, optional, quoted, seq, skip_to, string_end,
    word, zero_or_more, CharClass, Grammar, Pattern,
};
use crate::parsers::tokenizer::NEWLINE;

/// Keywords that open a GDScript body and end the file preamble
pub const BODY_START_KEYWORDS: [&str; 5] = ["enum", "func", "var", "const", "class"];

pub const CLASS_KEYWORD: &str = "class";
pub const CLASS_NAME_KEYWORD: &str = "class_name";
pub const EXTENDS_KEYWORD: &str = "extends";
pub const LOAD_KEYWORDS: [&str; 2] = ["load", "preload"];
pub const EXT_RESOURCE_KEYWORD: &str = "ext_resource";
pub const SCOPE_OPEN: &str = ":";

// Capture names
pub const NAME: &str = "name";
pub const PARENT: &str = "parent";
pub const ROOT: &str = "root";
pub const PATH: &str = "path";
pub const RESOURCE_TYPE: &str = "type";
pub const UID: &str = "uid";
pub const ID: &str = "id";
pub const SEGMENT: &str = "segment";

/// Root marker of project-rooted resource paths
pub const PROJECT_SCHEME: &str = "res";
/// Schemes that never name a project file
pub const FOREIGN_SCHEMES: [&str; 2] = ["uid", "user"];

fn reserved_word() -> Pattern {
    let mut reserved: Vec<Pattern> = BODY_START_KEYWORDS.iter().map(|kw| keyword(kw)).collect();
    reserved.push(keyword(EXTENDS_KEYWORD));
    reserved.push(keyword(CLASS_NAME_KEYWORD));
    first(reserved)
}

/// An identifier that is not one of the structural keywords
fn identifier() -> Pattern {
    seq(vec![
        not_any(reserved_word()),
        word(CharClass::letters().with("_"), CharClass::alphanumeric().with("_")),
    ])
}

fn path_word() -> Pattern {
    word(
        CharClass::alphanumeric().with("-_/."),
        CharClass::alphanumeric().with("-_/."),
    )
}

fn value_word() -> Pattern {
    word(
        CharClass::alphanumeric().with("_"),
        CharClass::alphanumeric().with("_-."),
    )
}

fn scheme(name: &str) -> Pattern {
    seq(vec![literal(name), literal(":"), literal("//")])
}

fn inheritance_clause() -> Pattern {
    seq(vec![keyword(EXTENDS_KEYWORD), named(PARENT, identifier())])
}

/// `class_name <identifier>`
pub fn class_identity() -> Grammar {
    Grammar::new(
        "class identity",
        seq(vec![keyword(CLASS_NAME_KEYWORD), named(NAME, identifier())]),
    )
    .with_terminal(NEWLINE)
}

/// `extends <identifier>`
pub fn inheritance() -> Grammar {
    Grammar::new("inheritance", inheritance_clause()).with_terminal(NEWLINE)
}

/// `class <identifier> [extends <identifier>] ... :` with the two clauses in either order
pub fn class_header() -> Grammar {
    Grammar::new(
        "class header",
        seq(vec![
            keyword(CLASS_KEYWORD),
            each(vec![named(NAME, identifier()), optional(inheritance_clause())]),
            skip_to(literal(SCOPE_OPEN)),
        ]),
    )
    .with_terminal(SCOPE_OPEN)
}

/// `class <identifier>`, used to name the scopes the splitter detects
pub fn entity_header() -> Grammar {
    Grammar::new(
        "entity header",
        seq(vec![keyword(CLASS_KEYWORD), named(NAME, identifier())]),
    )
    .with_terminal(SCOPE_OPEN)
}

/// `load("...")` or `preload("...")`, rejecting `user://` paths
pub fn load_reference() -> Grammar {
    Grammar::new(
        "load reference",
        seq(vec![
            first(LOAD_KEYWORDS.iter().map(|kw| keyword(kw)).collect()),
            literal("("),
            literal("\""),
            not_any(scheme("user")),
            optional(seq(vec![
                named(ROOT, literal(PROJECT_SCHEME)),
                literal(":"),
                literal("//"),
            ])),
            named(PATH, path_word()),
            literal("\""),
            literal(")"),
        ]),
    )
    .with_terminal(")")
}

fn field(key: &str, value: Pattern) -> Pattern {
    seq(vec![
        keyword(key),
        literal("="),
        first(vec![quoted(value.clone()), value]),
    ])
}

/// `[ext_resource type=... uid=... path=... id=...]` with fields in any order
pub fn ext_resource() -> Grammar {
    let resource_path = seq(vec![
        optional(seq(vec![
            named(
                ROOT,
                first(vec![
                    literal(PROJECT_SCHEME),
                    literal(FOREIGN_SCHEMES[0]),
                    literal(FOREIGN_SCHEMES[1]),
                ]),
            ),
            literal(":"),
            literal("//"),
        ])),
        named(PATH, path_word()),
    ]);

    let uid_value = named(UID, seq(vec![scheme("uid"), value_word()]));

    Grammar::new(
        "external resource",
        seq(vec![
            literal("["),
            keyword(EXT_RESOURCE_KEYWORD),
            each(vec![
                field("type", named(RESOURCE_TYPE, value_word())),
                optional(field("uid", uid_value)),
                field("path", resource_path),
                field("id", named(ID, value_word())),
            ]),
            literal("]"),
        ]),
    )
    .with_terminal("]")
}

/// Dotted identifier chain, stopping before a trailing `.UPPER_CASE` value
///
/// Separators are captured as segments too, so joining every `segment`
/// capture reproduces the dotted name.
pub fn type_chain() -> Grammar {
    let segment = word(CharClass::letters().with("_"), CharClass::alphanumeric().with("_"));
    let enum_value = seq(vec![
        word(CharClass::chars("."), CharClass::uppercase().with("_0123456789")),
        string_end(),
    ]);

    Grammar::new(
        "type chain",
        seq(vec![
            named(SEGMENT, segment.clone()),
            zero_or_more(seq(vec![
                not_any(enum_value),
                named(SEGMENT, word(CharClass::chars("."), CharClass::chars("."))),
                named(SEGMENT, segment),
            ])),
        ]),
    )
}
