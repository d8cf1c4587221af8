#![forbid(unsafe_code)]

//! A typed subset of CSS selectors.
//!
//! The page behaviors locate their structural inputs with selectors. In the
//! browser the selector is rendered back to CSS and handed to
//! `querySelectorAll`; in tests the in-memory DOM evaluates it structurally
//! through [`SelectorSubject`]. Both paths must agree, so the supported grammar
//! is deliberately small:
//!
//! | Form | Example |
//! |------|---------|
//! | Type | `section` |
//! | Class | `.nav-toggle` |
//! | Id | `#nav-overlay` |
//! | Attribute present | `[id]` |
//! | Attribute equals | `[data-role="card"]` |
//! | Attribute prefix | `[href^="#"]` |
//! | Descendant | `.nav-list a` |
//! | List | `a, button` |
//!
//! Child (`>`), sibling (`+`, `~`) combinators and pseudo-classes are rejected
//! with a [`SelectorError`] rather than silently mis-matched.
//!
//! # Invariants
//!
//! 1. A parsed selector has at least one alternative, and every alternative
//!    has at least one compound.
//! 2. Rendering with [`Display`](fmt::Display) and parsing again yields an
//!    equal selector.

use std::fmt;
use std::str::FromStr;

/// Errors from selector parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The input (or one alternative of a list) was empty.
    Empty,
    /// A character that is not part of the supported grammar.
    UnexpectedChar { ch: char, pos: usize },
    /// An attribute block was opened but never closed.
    UnterminatedAttribute { pos: usize },
    /// A quoted attribute value was never closed.
    UnterminatedString { pos: usize },
    /// A combinator other than descendant (whitespace).
    UnsupportedCombinator { ch: char, pos: usize },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty selector"),
            Self::UnexpectedChar { ch, pos } => {
                write!(f, "unexpected character '{ch}' at offset {pos}")
            }
            Self::UnterminatedAttribute { pos } => {
                write!(f, "unterminated attribute selector starting at offset {pos}")
            }
            Self::UnterminatedString { pos } => {
                write!(f, "unterminated quoted value starting at offset {pos}")
            }
            Self::UnsupportedCombinator { ch, pos } => {
                write!(f, "unsupported combinator '{ch}' at offset {pos}")
            }
        }
    }
}

impl std::error::Error for SelectorError {}

/// How an attribute condition is tested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrOp {
    /// `[name]`
    Exists,
    /// `[name="value"]`
    Equals(String),
    /// `[name^="value"]`
    Prefix(String),
}

/// A single attribute condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrMatch {
    pub name: String,
    pub op: AttrOp,
}

impl AttrMatch {
    fn matches(&self, value: Option<&str>) -> bool {
        match (&self.op, value) {
            (_, None) => false,
            (AttrOp::Exists, Some(_)) => true,
            (AttrOp::Equals(expected), Some(v)) => v == expected,
            (AttrOp::Prefix(prefix), Some(v)) => v.starts_with(prefix.as_str()),
        }
    }
}

/// A compound selector: conditions that all apply to one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttrMatch>,
}

impl Compound {
    /// A compound matching a tag name.
    #[must_use]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into().to_ascii_lowercase()),
            ..Self::default()
        }
    }

    /// A compound matching a single class.
    #[must_use]
    pub fn class(class: impl Into<String>) -> Self {
        Self::default().with_class(class)
    }

    /// Add a required class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Require an attribute condition.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, op: AttrOp) -> Self {
        self.attributes.push(AttrMatch {
            name: name.into(),
            op,
        });
        self
    }

    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
    }

    fn matches<S: SelectorSubject>(&self, subject: &S) -> bool {
        if let Some(tag) = &self.tag
            && !subject.tag_name().eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && subject.attribute("id").as_deref() != Some(id.as_str())
        {
            return false;
        }
        self.classes.iter().all(|c| subject.has_class(c))
            && self
                .attributes
                .iter()
                .all(|a| a.matches(subject.attribute(&a.name).as_deref()))
    }
}

/// A chain of compounds joined by the descendant combinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    compounds: Vec<Compound>,
}

impl ComplexSelector {
    fn matches<S: SelectorSubject>(&self, subject: &S) -> bool {
        let Some((last, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(subject) {
            return false;
        }
        // Right-to-left, greedy: the nearest matching ancestor satisfies each
        // remaining compound.
        let mut remaining = ancestors.iter().rev().peekable();
        let mut cursor = subject.parent();
        while let Some(&compound) = remaining.peek() {
            let Some(node) = cursor else {
                return false;
            };
            if compound.matches(&node) {
                remaining.next();
            }
            cursor = node.parent();
        }
        true
    }
}

/// Element view used for structural selector matching.
///
/// Implemented by in-memory DOMs; a browser backend never needs it.
pub trait SelectorSubject: Sized {
    /// Lower- or upper-case tag name; compared case-insensitively.
    fn tag_name(&self) -> String;
    /// Attribute value, if present.
    fn attribute(&self, name: &str) -> Option<String>;
    /// Whether the element carries `class`.
    fn has_class(&self, class: &str) -> bool;
    /// The parent element, if any.
    fn parent(&self) -> Option<Self>;
}

/// A selector list (`a, button`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<ComplexSelector>,
}

impl Selector {
    /// Parse a selector string.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] when the input is empty or uses syntax
    /// outside the supported subset.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse()
    }

    /// A selector matching one compound.
    #[must_use]
    pub fn compound(compound: Compound) -> Self {
        Self {
            alternatives: vec![ComplexSelector {
                compounds: vec![compound],
            }],
        }
    }

    /// `tag`
    #[must_use]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::compound(Compound::tag(tag))
    }

    /// `.class`
    #[must_use]
    pub fn class(class: impl Into<String>) -> Self {
        Self::compound(Compound::class(class))
    }

    /// `ancestor descendant`
    #[must_use]
    pub fn descendant(ancestor: Compound, descendant: Compound) -> Self {
        Self {
            alternatives: vec![ComplexSelector {
                compounds: vec![ancestor, descendant],
            }],
        }
    }

    /// Join selectors into a list, preserving order.
    #[must_use]
    pub fn any_of(selectors: impl IntoIterator<Item = Selector>) -> Self {
        Self {
            alternatives: selectors
                .into_iter()
                .flat_map(|s| s.alternatives)
                .collect(),
        }
    }

    /// Whether `subject` matches any alternative.
    #[must_use]
    pub fn matches<S: SelectorSubject>(&self, subject: &S) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(subject))
    }

    /// Number of comma-separated alternatives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    /// Always false for a parsed selector; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, alt) in self.alternatives.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            for (j, compound) in alt.compounds.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write_compound(f, compound)?;
            }
        }
        Ok(())
    }
}

fn write_compound(f: &mut fmt::Formatter<'_>, c: &Compound) -> fmt::Result {
    if let Some(tag) = &c.tag {
        f.write_str(tag)?;
    }
    if let Some(id) = &c.id {
        write!(f, "#{id}")?;
    }
    for class in &c.classes {
        write!(f, ".{class}")?;
    }
    for attr in &c.attributes {
        match &attr.op {
            AttrOp::Exists => write!(f, "[{}]", attr.name)?,
            AttrOp::Equals(v) => write!(f, "[{}=\"{}\"]", attr.name, escape_quoted(v))?,
            AttrOp::Prefix(v) => write!(f, "[{}^=\"{}\"]", attr.name, escape_quoted(v))?,
        }
    }
    Ok(())
}

fn escape_quoted(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(feature = "config")]
impl serde::Serialize for Selector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "config")]
impl<'de> serde::Deserialize<'de> for Selector {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Selector::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.char_indices().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map_or_else(|| self.chars.last().map_or(0, |&(i, c)| i + c.len_utf8()), |&(i, _)| i)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse(mut self) -> Result<Selector, SelectorError> {
        let mut alternatives = Vec::new();
        loop {
            alternatives.push(self.parse_complex()?);
            match self.peek() {
                Some(',') => self.pos += 1,
                None => break,
                Some(ch) => {
                    return Err(SelectorError::UnexpectedChar {
                        ch,
                        pos: self.offset(),
                    });
                }
            }
        }
        Ok(Selector { alternatives })
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        self.skip_whitespace();
        let mut compounds = Vec::new();
        loop {
            let compound = self.parse_compound()?;
            if compound.is_empty() {
                break;
            }
            compounds.push(compound);
            let had_space = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some(ch @ ('>' | '+' | '~')) => {
                    return Err(SelectorError::UnsupportedCombinator {
                        ch,
                        pos: self.offset(),
                    });
                }
                Some(ch) if !had_space => {
                    return Err(SelectorError::UnexpectedChar {
                        ch,
                        pos: self.offset(),
                    });
                }
                Some(_) => {}
            }
        }
        if compounds.is_empty() {
            return match self.peek() {
                None | Some(',') => Err(SelectorError::Empty),
                Some(ch @ ('>' | '+' | '~')) => Err(SelectorError::UnsupportedCombinator {
                    ch,
                    pos: self.offset(),
                }),
                Some(ch) => Err(SelectorError::UnexpectedChar {
                    ch,
                    pos: self.offset(),
                }),
            };
        }
        Ok(ComplexSelector { compounds })
    }

    fn parse_ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek().filter(|&c| is_ident_char(c)) {
            out.push(c);
            self.pos += 1;
        }
        out
    }

    fn expect_ident(&mut self) -> Result<String, SelectorError> {
        let ident = self.parse_ident();
        if ident.is_empty() {
            return Err(match self.peek() {
                Some(ch) => SelectorError::UnexpectedChar {
                    ch,
                    pos: self.offset(),
                },
                None => SelectorError::Empty,
            });
        }
        Ok(ident)
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let tag = self.parse_ident();
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        loop {
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    let class = self.expect_ident()?;
                    compound.classes.push(class);
                }
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.expect_ident()?);
                }
                Some('[') => {
                    let attr = self.parse_attribute()?;
                    compound.attributes.push(attr);
                }
                _ => break,
            }
        }
        Ok(compound)
    }

    fn parse_attribute(&mut self) -> Result<AttrMatch, SelectorError> {
        let open = self.offset();
        self.pos += 1;
        self.skip_whitespace();
        let name = self.expect_ident().map_err(|e| match e {
            SelectorError::Empty => SelectorError::UnterminatedAttribute { pos: open },
            other => other,
        })?;
        self.skip_whitespace();
        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttrMatch {
                    name,
                    op: AttrOp::Exists,
                });
            }
            Some('=') => {
                self.pos += 1;
                AttrOp::Equals(self.parse_value(open)?)
            }
            Some('^') => {
                self.pos += 1;
                if self.peek() != Some('=') {
                    return Err(self.unexpected_or_unterminated(open));
                }
                self.pos += 1;
                AttrOp::Prefix(self.parse_value(open)?)
            }
            _ => return Err(self.unexpected_or_unterminated(open)),
        };
        self.skip_whitespace();
        if self.peek() != Some(']') {
            return Err(self.unexpected_or_unterminated(open));
        }
        self.pos += 1;
        Ok(AttrMatch { name, op })
    }

    fn parse_value(&mut self, open: usize) -> Result<String, SelectorError> {
        self.skip_whitespace();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let start = self.offset();
                self.pos += 1;
                let mut out = String::new();
                loop {
                    match self.peek() {
                        None => return Err(SelectorError::UnterminatedString { pos: start }),
                        Some('\\') => {
                            self.pos += 1;
                            match self.peek() {
                                Some(c) => {
                                    out.push(c);
                                    self.pos += 1;
                                }
                                None => {
                                    return Err(SelectorError::UnterminatedString { pos: start });
                                }
                            }
                        }
                        Some(c) if c == quote => {
                            self.pos += 1;
                            return Ok(out);
                        }
                        Some(c) => {
                            out.push(c);
                            self.pos += 1;
                        }
                    }
                }
            }
            _ => {
                let ident = self.parse_ident();
                if ident.is_empty() {
                    return Err(self.unexpected_or_unterminated(open));
                }
                Ok(ident)
            }
        }
    }

    fn unexpected_or_unterminated(&self, open: usize) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::UnexpectedChar {
                ch,
                pos: self.offset(),
            },
            None => SelectorError::UnterminatedAttribute { pos: open },
        }
    }
}
