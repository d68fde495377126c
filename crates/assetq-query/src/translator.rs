//! Query translation into provider-native syntax.
//!
//! The grammar is deliberately light: a fragment is a disjunction of
//! conjunctions of leaf operands. Disjunction binds loosest, so it is split
//! first. Parentheses carry no meaning here and stay part of whatever operand
//! they land in. Connectives inside a quoted value are not split points.

use assetq_core::Provider;

/// Connective spelling used by a provider's query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `&&` and `||` (FOFA, Hunter)
    Symbolic,
    /// Whitespace-delimited `and` and `or` (Quake)
    Keyword,
}

impl Dialect {
    /// Dialect spoken by a provider.
    #[must_use]
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::Fofa | Provider::Hunter => Dialect::Symbolic,
            Provider::Quake => Dialect::Keyword,
        }
    }

    fn conjunction(self) -> &'static str {
        match self {
            Dialect::Symbolic => "&&",
            Dialect::Keyword => "and",
        }
    }

    fn disjunction(self) -> &'static str {
        match self {
            Dialect::Symbolic => "||",
            Dialect::Keyword => "or",
        }
    }
}

/// Parsed query fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A single operand, whitespace-trimmed
    Leaf(String),
    /// Operands joined by the conjunction
    And(Vec<Expr>),
    /// Conjunctions joined by the disjunction
    Or(Vec<Expr>),
}

impl Expr {
    /// Render the expression with every leaf quoted and connectives joined by
    /// single spaces.
    #[must_use]
    pub fn render(&self, dialect: Dialect) -> String {
        match self {
            Expr::Leaf(operand) => quote_operand(operand),
            Expr::And(parts) => join(parts, dialect, dialect.conjunction()),
            Expr::Or(parts) => join(parts, dialect, dialect.disjunction()),
        }
    }
}

fn join(parts: &[Expr], dialect: Dialect, connective: &str) -> String {
    parts
        .iter()
        .map(|part| part.render(dialect))
        .collect::<Vec<_>>()
        .join(&format!(" {connective} "))
}

/// Parse a fragment: disjunction first, then conjunction within each
/// disjunct.
#[must_use]
pub fn parse(fragment: &str, dialect: Dialect) -> Expr {
    let disjuncts = split_top_level(fragment, dialect.disjunction(), dialect);
    if disjuncts.len() == 1 {
        return parse_conjunction(fragment, dialect);
    }
    Expr::Or(
        disjuncts
            .into_iter()
            .map(|disjunct| parse_conjunction(disjunct, dialect))
            .collect(),
    )
}

fn parse_conjunction(fragment: &str, dialect: Dialect) -> Expr {
    let operands = split_top_level(fragment, dialect.conjunction(), dialect);
    if operands.len() == 1 {
        return Expr::Leaf(fragment.trim().to_string());
    }
    Expr::And(
        operands
            .into_iter()
            .map(|operand| Expr::Leaf(operand.trim().to_string()))
            .collect(),
    )
}

/// Split on `connective` wherever it appears outside a quoted value.
fn split_top_level<'a>(fragment: &'a str, connective: &str, dialect: Dialect) -> Vec<&'a str> {
    let bytes = fragment.as_bytes();
    let needle = connective.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(open) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == open {
                quote = None;
            }
        } else if (b == b'"' || b == b'\'') && opens_quote(bytes, i) {
            quote = Some(b);
        } else if bytes[i..].starts_with(needle) && is_connective_at(bytes, i, needle.len(), dialect)
        {
            parts.push(&fragment[start..i]);
            i += needle.len();
            start = i;
            continue;
        }
        i += 1;
    }

    parts.push(&fragment[start..]);
    parts
}

/// A quote opens a value only where a value can begin; an apostrophe in the
/// middle of a bare word does not.
fn opens_quote(bytes: &[u8], i: usize) -> bool {
    i == 0
        || bytes[i - 1].is_ascii_whitespace()
        || matches!(bytes[i - 1], b'=' | b':' | b'(' | b'!' | b'*' | b'<' | b'>' | b',')
}

fn is_connective_at(bytes: &[u8], i: usize, len: usize, dialect: Dialect) -> bool {
    match dialect {
        Dialect::Symbolic => true,
        Dialect::Keyword => {
            i > 0
                && bytes[i - 1].is_ascii_whitespace()
                && bytes.get(i + len).is_some_and(u8::is_ascii_whitespace)
        }
    }
}

/// Quote the value of a single `key=value` operand.
///
/// The split happens at the first `=`; a doubled `==` stays with the
/// operator, and anything before it (`!`, `*`) stays with the key.
fn quote_operand(operand: &str) -> String {
    let Some(eq) = operand.find('=') else {
        return operand.to_string();
    };
    let mut value_start = eq + 1;
    while operand[value_start..].starts_with('=') {
        value_start += 1;
    }
    let (head, value) = operand.split_at(value_start);
    if value.starts_with(['"', '\'']) || value.ends_with(['"', '\'']) {
        return operand.to_string();
    }
    format!("{head}\"{value}\"")
}

/// Rewrites query fragments into one provider's literal syntax.
#[derive(Debug, Clone, Copy)]
pub struct QueryTranslator {
    dialect: Dialect,
}

impl QueryTranslator {
    /// Create a translator for a dialect.
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Create a translator for a provider's dialect.
    #[must_use]
    pub fn for_provider(provider: Provider) -> Self {
        Self::new(Dialect::for_provider(provider))
    }

    /// Translate a fragment.
    ///
    /// A fragment without connectives keeps its exact spacing; only its value
    /// gains quotes. With connectives, operands are trimmed and rejoined with
    /// single spaces.
    #[must_use]
    pub fn translate(&self, fragment: &str) -> String {
        match parse(fragment, self.dialect) {
            Expr::Leaf(_) => quote_operand(fragment),
            expr => expr.render(self.dialect),
        }
    }
}
