//! Transducer labels: text symbols plus the reserved epsilon, unknown and
//! disambiguation markers.
//!
//! Arbitrary text is encoded as a label by [`escape`], which guarantees the
//! result never starts with `<` or `#`. Every name beginning with one of
//! those characters is therefore free for reserved markers.

use std::borrow::Cow;
use std::fmt;

/// Label id of epsilon in every symbol table.
pub const EPS_ID: u32 = 0;
/// Label id of the unknown symbol in every symbol table.
pub const UNK_ID: u32 = 1;
/// `Disambig(n)` lives at `DISAMBIG_OFFSET + n`, above every ordinary id.
pub const DISAMBIG_OFFSET: u32 = 10_000_000;
/// Largest `n` whose id `DISAMBIG_OFFSET + n` fits in a `u32`.
pub const MAX_DISAMBIG: u32 = u32::MAX - DISAMBIG_OFFSET;

pub const EPS_SYM: &str = "<eps>";
pub const UNK_SYM: &str = "<unk>";

/// Output marker: emit the literal input text captured by an `<unk>` arc.
pub const CAP_SYM: &str = "<capture>";
/// Output marker: consume the captured text without emitting anything.
pub const CAP_EPS_SYM: &str = "<capture_eps>";
/// Output marker separating segments.
pub const BRK_SYM: &str = "<break>";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SymbolError {
    #[error("empty symbol is not allowed, use Symbol::Eps instead")]
    Empty,

    #[error("disambiguation symbol {0} out of range (max #4284967295)")]
    DisambigRange(String),

    #[error("{0} is a reserved symbol name, escape it or use the reserved variant")]
    Reserved(String),
}

/// A transducer label, compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// An ordinary label, already escaped by the caller's convention.
    Text(String),
    Eps,
    Unk,
    /// Structural marker appended by the lexicon compiler.
    Disambig(u32),
}

impl Symbol {
    /// Build a text symbol. The empty string and names that parse as a
    /// reserved variant (`<eps>`, `<unk>`, `#n`) are rejected.
    pub fn text(s: impl Into<String>) -> Result<Self, SymbolError> {
        let s = s.into();
        match Symbol::from_encoded(&s)? {
            Symbol::Text(_) => Ok(Symbol::Text(s)),
            _ => Err(SymbolError::Reserved(s)),
        }
    }

    /// Parse a symbol from its encoded name as found in symbol tables,
    /// lexicon dumps and arc keys.
    pub fn from_encoded(name: &str) -> Result<Self, SymbolError> {
        match name {
            "" => Err(SymbolError::Empty),
            EPS_SYM => Ok(Symbol::Eps),
            UNK_SYM => Ok(Symbol::Unk),
            _ => match name
                .strip_prefix('#')
                .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            {
                Some(digits) => digits
                    .parse::<u32>()
                    .ok()
                    .filter(|&n| n <= MAX_DISAMBIG)
                    .map(Symbol::Disambig)
                    .ok_or_else(|| SymbolError::DisambigRange(name.to_string())),
                None => Ok(Symbol::Text(name.to_string())),
            },
        }
    }

    /// Canonical label used for arc lookup and serialization.
    pub fn encoded(&self) -> Cow<'_, str> {
        match self {
            Symbol::Text(s) => Cow::Borrowed(s),
            Symbol::Eps => Cow::Borrowed(EPS_SYM),
            Symbol::Unk => Cow::Borrowed(UNK_SYM),
            Symbol::Disambig(n) => Cow::Owned(format!("#{n}")),
        }
    }

    /// Fixed id for reserved variants, `None` for text symbols and for
    /// `Disambig(n)` with `n > MAX_DISAMBIG`.
    pub fn reserved_id(&self) -> Option<u32> {
        match self {
            Symbol::Text(_) => None,
            Symbol::Eps => Some(EPS_ID),
            Symbol::Unk => Some(UNK_ID),
            Symbol::Disambig(n) => DISAMBIG_OFFSET.checked_add(*n),
        }
    }

    pub fn is_disambig(&self) -> bool {
        matches!(self, Symbol::Disambig(_))
    }

    /// True for reserved variants and for text markers such as `<capture>`.
    pub fn is_special(&self) -> bool {
        match self {
            Symbol::Text(s) => is_special(s),
            _ => true,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded())
    }
}

/// Encode arbitrary text as a label.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '<' => out.push_str("\\<"),
            '>' => out.push_str("\\>"),
            '#' => out.push_str("\\#"),
            ' ' => out.push_str("\\s"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Exact inverse of [`escape`]. Unrecognised escapes are kept verbatim.
pub fn unescape(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('<') => out.push('<'),
            Some('>') => out.push('>'),
            Some('#') => out.push('#'),
            Some('s') => out.push(' '),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// True if the label names a reserved marker (`<...>` or `#...`).
pub fn is_special(label: &str) -> bool {
    matches!(label.chars().next(), Some('<') | Some('#'))
}
