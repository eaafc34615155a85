//! Text patterns for the C# recognizers.
//!
//! Each pattern describes the surface shape of one construct. None of them
//! understand comments or string literals.

use regex::Regex;
use std::sync::LazyLock;

/// A type reference: dotted name, optional generic argument list, array
/// ranks, nullable marker. Non-capturing so it can be embedded anywhere.
pub const TYPE: &str = r"[\w.]+(?:\s*<[\w\s,.<>\[\]?()]*>)?(?:\[[,\s]*\])*\??";

const ACCESS: &str = r"(?:\b(public|protected|internal|private)\s+)?";

pub static USING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\busing\s+(?:static\s+)?([\w.]+)\s*;").unwrap());

/// Group 2 is `{` for a block namespace, `;` for a file-scoped one.
pub static NAMESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnamespace\s+([\w.]+)\s*(\{|;)").unwrap());

pub static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{ACCESS}((?:(?:abstract|sealed|static|partial|unsafe|new)\s+)*)\bclass\s+(\w+)(?:\s*<[^<>{{;]*>)?(?:\s*:\s*([^{{;]+?))?\s*\{{"
    ))
    .unwrap()
});

pub static INTERFACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{ACCESS}((?:(?:partial|unsafe|new)\s+)*)\binterface\s+(\w+)(?:\s*<[^<>{{;]*>)?(?:\s*:\s*([^{{;]+?))?\s*\{{"
    ))
    .unwrap()
});

pub static STRUCT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{ACCESS}((?:(?:readonly|partial|ref|unsafe|new)\s+)*)\bstruct\s+(\w+)(?:\s*<[^<>{{;]*>)?(?:\s*:\s*([^{{;]+?))?\s*\{{"
    ))
    .unwrap()
});

/// The member list is captured directly: enum bodies hold no nested braces.
pub static ENUM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{ACCESS}(?:new\s+)?\benum\s+(\w+)(?:\s*:\s*[\w.]+)?\s*\{{([^}}]*)\}}"
    ))
    .unwrap()
});

/// Method definitions with a body.
pub static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{ACCESS}((?:(?:static|virtual|override|abstract|async|sealed|new|extern|unsafe|partial)\s+)*)({TYPE})\s+(\w+)(?:\s*<[^<>(]*>)?\s*\(([^)]*)\)\s*\{{"
    ))
    .unwrap()
});

/// Bodiless method signatures inside interfaces.
pub static INTERFACE_METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"({TYPE})\s+(\w+)(?:\s*<[^<>(]*>)?\s*\(([^)]*)\)\s*;"
    ))
    .unwrap()
});

/// Auto-properties only; accessor bodies are not recognised. Accessors may
/// carry their own access keyword (`{ get; private set; }`).
pub static PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{ACCESS}((?:(?:static|virtual|override|abstract|sealed|new|extern|required)\s+)*)({TYPE})\s+(\w+)\s*\{{\s*((?:(?:(?:public|protected|internal|private)\s+)*(?:get|set|init)\s*;\s*){{1,2}})\}}"
    ))
    .unwrap()
});

pub static EVENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{ACCESS}((?:(?:static|virtual|override|abstract|sealed|new|extern)\s+)*)\bevent\s+({TYPE})\s+(\w+)\s*;"
    ))
    .unwrap()
});

/// The initializer never crosses an unbalanced `(`, `)`, `{` or `}`, so a
/// defaulted parameter cannot run on into the next member's `;`.
pub static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{ACCESS}((?:(?:static|readonly|const|volatile|new)\s+)*)({TYPE})\s+(\w+)\s*(?:=\s*((?:[^;{{}}()]|\((?:[^()]|\([^()]*\))*\)|\{{[^{{}}]*\}})+))?;"
    ))
    .unwrap()
});

/// Start of a generic constraint clause trailing an inheritance list.
pub static WHERE_CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bwhere\b").unwrap());

/// A single entry of an inheritance list.
pub static BASE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{TYPE}$")).unwrap());

/// Words that can sit where a return type or member name is expected in a
/// statement but never name a member.
const STATEMENT_KEYWORDS: &[&str] = &[
    "if", "else", "for", "foreach", "while", "do", "switch", "case", "catch", "finally", "try",
    "using", "lock", "fixed", "return", "throw", "new", "yield", "await", "goto", "break",
    "continue", "nameof", "typeof", "sizeof", "default", "when", "checked", "unchecked",
    "delegate", "operator", "event", "namespace", "class", "struct", "interface", "enum",
];

/// Access and modifier keywords captured as a return type mean the match is a
/// constructor, which is not recorded.
const DECLARATION_KEYWORDS: &[&str] = &[
    "public", "protected", "internal", "private", "static", "virtual", "override", "abstract",
    "async", "sealed", "extern", "unsafe", "partial", "readonly", "const", "volatile", "required",
];

pub fn is_reserved_word(word: &str) -> bool {
    STATEMENT_KEYWORDS.contains(&word) || DECLARATION_KEYWORDS.contains(&word)
}

/// Split a captured modifier run (`"static readonly "`) into tokens.
pub fn modifier_tokens(run: Option<&str>) -> Vec<String> {
    run.map(|r| r.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Collapse internal whitespace: `"get;   set;"` → `"get; set;"`.
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
