//! For parsing the Clarity textual representation of contract return values.
//!
//! The indexing service reports a transaction result as repr text such as:
//!
//! `(ok (tuple (price u251000000) (expo -8) ...))`
//!
//! The grammar is a small s-expression language: parenthesized lists,
//! double-quoted strings and bare atoms. Parsing produces a [`Sexp`] tree,
//! from which the tuple body is located (either directly under the `(ok ...)`
//! response wrapper, or as the first tuple inside a `(list ...)` payload) and
//! read as a field name -> value map.
//!
//! Field values are decoded independently of each other and of their order in
//! the tuple. A field that is absent or malformed simply does not populate;
//! only the caller decides which fields are mandatory.

use thiserror::Error;

/// An error with the repr text of a contract return value.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum TupleError {
    #[error("Repr text is empty")]
    Empty,
    #[error("String literal starting at byte {0} is unterminated")]
    UnterminatedString(usize),
    #[error("Closing parenthesis at byte {0} has no matching opener")]
    UnbalancedClose(usize),
    #[error("Repr text ended before the expression was closed")]
    UnexpectedEnd,
    #[error("Unexpected trailing text after the first expression")]
    TrailingText,
    #[error("Expression is not wrapped in a response (ok ...) form")]
    NotOkResponse,
    #[error("Response payload contains no tuple")]
    NoTuple,
    #[error("Mandatory field {0} is missing or malformed")]
    MissingField(&'static str),
}

/// A parsed expression from repr text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Sexp {
    /// Bare token: numerals (`u100`, `-8`), hex (`0x1234`), symbols.
    Atom(String),
    /// Double-quoted string with escapes resolved.
    Str(String),
    /// Parenthesized group.
    List(Vec<Sexp>),
}

impl Sexp {
    /// True for a list whose first element is the given atom, e.g. `(tuple ...)`.
    fn is_form(&self, head: &str) -> bool {
        match self {
            Sexp::List(items) => matches!(items.first(), Some(Sexp::Atom(h)) if h == head),
            _ => false,
        }
    }
}

enum Token {
    Open,
    Close(usize),
    Str(String),
    Atom(String),
}

fn tokenize(text: &str) -> Result<Vec<Token>, TupleError> {
    let mut tokens = vec![];
    let mut chars = text.char_indices().peekable();
    while let Some((position, character)) = chars.next() {
        match character {
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close(position)),
            '"' => {
                let mut string = String::new();
                loop {
                    match chars.next() {
                        None => return Err(TupleError::UnterminatedString(position)),
                        Some((_, '"')) => break,
                        Some((_, '\\')) => match chars.next() {
                            None => return Err(TupleError::UnterminatedString(position)),
                            Some((_, escaped)) => string.push(escaped),
                        },
                        Some((_, c)) => string.push(c),
                    }
                }
                tokens.push(Token::Str(string));
            }
            c if c.is_whitespace() => {}
            c => {
                let mut atom = String::from(c);
                while let Some((_, next)) = chars.peek() {
                    if next.is_whitespace() || matches!(*next, '(' | ')' | '"') {
                        break;
                    }
                    atom.push(*next);
                    chars.next();
                }
                tokens.push(Token::Atom(atom));
            }
        }
    }
    if tokens.is_empty() {
        return Err(TupleError::Empty);
    }
    Ok(tokens)
}

/// Parses repr text into a single expression.
pub fn parse(text: &str) -> Result<Sexp, TupleError> {
    let tokens = tokenize(text)?;
    let mut iter = tokens.into_iter().peekable();
    let expression = parse_value(&mut iter)?;
    if iter.next().is_some() {
        return Err(TupleError::TrailingText);
    }
    Ok(expression)
}

fn parse_value(
    iter: &mut std::iter::Peekable<std::vec::IntoIter<Token>>,
) -> Result<Sexp, TupleError> {
    match iter.next().ok_or(TupleError::UnexpectedEnd)? {
        Token::Open => {
            let mut items = vec![];
            loop {
                match iter.peek() {
                    None => return Err(TupleError::UnexpectedEnd),
                    Some(Token::Close(_)) => {
                        iter.next();
                        break;
                    }
                    Some(_) => items.push(parse_value(iter)?),
                }
            }
            Ok(Sexp::List(items))
        }
        Token::Close(position) => Err(TupleError::UnbalancedClose(position)),
        Token::Str(string) => Ok(Sexp::Str(string)),
        Token::Atom(atom) => Ok(Sexp::Atom(atom)),
    }
}

/// Field name -> value pairs read from a `(tuple (name value) ...)` form.
///
/// Lookup is by name, so the order fields were printed in does not matter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldMap(Vec<(String, Sexp)>);

impl FieldMap {
    /// Reads the entries of a tuple expression. Entries that are not a
    /// `(name value)` pair are skipped.
    pub fn from_tuple(sexp: &Sexp) -> Option<FieldMap> {
        if !sexp.is_form("tuple") {
            return None;
        }
        let Sexp::List(items) = sexp else { return None };
        let mut fields = vec![];
        for item in &items[1..] {
            if let Sexp::List(entry) = item {
                if let [Sexp::Atom(name), value] = entry.as_slice() {
                    fields.push((name.clone(), value.clone()));
                }
            }
        }
        Some(FieldMap(fields))
    }

    pub fn get(&self, name: &str) -> Option<&Sexp> {
        self.0
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Base-10 unsigned field. Tolerates the `u` unsigned-integer marker
    /// (`u1759136578` parses the same as `1759136578`).
    pub fn unsigned(&self, name: &str) -> Option<u64> {
        match self.get(name)? {
            Sexp::Atom(atom) => parse_unsigned(atom),
            _ => None,
        }
    }

    /// Base-10 signed field, tolerating a leading `-`.
    pub fn signed(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            Sexp::Atom(atom) => parse_signed(atom),
            _ => None,
        }
    }

    /// Hex-prefixed token, kept verbatim (not decoded).
    pub fn hex_token(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Sexp::Atom(atom) if is_hex_token(atom) => Some(atom.as_str()),
            _ => None,
        }
    }

    /// String literal field.
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Sexp::Str(string) => Some(string.as_str()),
            _ => None,
        }
    }
}

/// Locates the tuple body of a successful response and returns its fields.
///
/// Accepts `(ok (tuple ...))` and `(ok (list ... (tuple ...) ...))` (first
/// tuple wins). Anything else fails here, before any field is read.
pub fn response_fields(text: &str) -> Result<FieldMap, TupleError> {
    let expression = parse(text)?;
    let Sexp::List(items) = &expression else {
        return Err(TupleError::NotOkResponse);
    };
    let payload = match items.as_slice() {
        [Sexp::Atom(head), payload] if head == "ok" => payload,
        _ => return Err(TupleError::NotOkResponse),
    };
    if let Some(fields) = FieldMap::from_tuple(payload) {
        return Ok(fields);
    }
    if payload.is_form("list") {
        let Sexp::List(elements) = payload else {
            return Err(TupleError::NoTuple);
        };
        for element in &elements[1..] {
            if let Some(fields) = FieldMap::from_tuple(element) {
                return Ok(fields);
            }
        }
    }
    Err(TupleError::NoTuple)
}

fn parse_unsigned(atom: &str) -> Option<u64> {
    let digits = atom.strip_prefix('u').unwrap_or(atom);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn parse_signed(atom: &str) -> Option<i64> {
    let digits = atom.strip_prefix('-').unwrap_or(atom);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    atom.parse().ok()
}

fn is_hex_token(atom: &str) -> bool {
    match atom.strip_prefix("0x") {
        Some(body) => !body.is_empty() && body.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}
