//! ABI-like value type tokens such as `uint128`, `bytes4` or `(bytes4,uint128)[]`.
//!
//! A [ValueType] is the parsed form of the `valueType` field of an ERC725Y
//! JSON schema. It decides how [crate::codec] lays a value out in bytes.

use core::fmt;
use std::str::FromStr;

use crate::align::Alignment;

/// Maximum width of a single word (and of `uintN`, `intN`, `bytesN`).
pub const WORD_LEN: usize = 32;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A closed set of value types.
///
/// Widths are stored in the unit used by the token: bits for `uintN` /
/// `intN`, bytes for `bytesN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    String,
    Bytes,
    Address,
    Uint(u16),
    Int(u16),
    FixedBytes(u8),
    /// Members in declared order. At most one member has a variable width and
    /// it is always the last one.
    Tuple(Vec<ValueType>),
    Array(Box<ValueType>),
}

/// Error raised for type tokens this crate does not understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedValueType {
    pub token: String,
    pub reason: &'static str,
}

impl UnsupportedValueType {
    pub(crate) fn new(token: &str, reason: &'static str) -> Self {
        Self {
            token: token.to_owned(),
            reason,
        }
    }
}

impl fmt::Display for UnsupportedValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported value type {:?}: {}", self.token, self.reason)
    }
}

impl std::error::Error for UnsupportedValueType {}

impl ValueType {
    /// Width in bytes if every value of this type has the same encoded size.
    ///
    /// ```
    /// use lsp2_schema::valuetype::ValueType;
    ///
    /// let ty: ValueType = "(bytes4,uint128)".parse().unwrap();
    /// assert_eq!(ty.fixed_width(), Some(20));
    /// assert_eq!("string".parse::<ValueType>().unwrap().fixed_width(), None);
    /// ```
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            ValueType::Bool => Some(1),
            ValueType::Address => Some(ADDRESS_LEN),
            ValueType::Uint(bits) | ValueType::Int(bits) => Some(*bits as usize / 8),
            ValueType::FixedBytes(len) => Some(*len as usize),
            ValueType::Tuple(members) => members.iter().map(ValueType::fixed_width).sum(),
            ValueType::String | ValueType::Bytes | ValueType::Array(_) => None,
        }
    }

    /// How a single scalar is anchored when it has to fill a wider slot or
    /// be cut to a narrower one. `None` for composite and variable-width types.
    pub fn alignment(&self) -> Option<Alignment> {
        match self {
            ValueType::Bool | ValueType::Uint(_) | ValueType::Int(_) => Some(Alignment::Left),
            ValueType::Address | ValueType::FixedBytes(_) => Some(Alignment::Right),
            _ => None,
        }
    }

    /// Whether this is a fixed-width scalar usable as a dynamic key parameter.
    pub fn is_scalar(&self) -> bool {
        self.alignment().is_some()
    }

    /// Minimal number of 32-byte words an array element of this type occupies.
    pub(crate) fn min_words(&self) -> usize {
        match self {
            ValueType::Tuple(members) => members.iter().map(ValueType::min_words).sum(),
            _ => 1,
        }
    }

    fn tuple(token: &str, members: Vec<ValueType>) -> Result<Self, UnsupportedValueType> {
        if members.is_empty() {
            return Err(UnsupportedValueType::new(token, "empty tuple"));
        }
        let variable = members.iter().filter(|m| m.fixed_width().is_none()).count();
        if variable > 1 {
            return Err(UnsupportedValueType::new(
                token,
                "tuple has more than one variable-width member",
            ));
        }
        if variable == 1 && members.last().and_then(ValueType::fixed_width).is_some() {
            return Err(UnsupportedValueType::new(
                token,
                "variable-width tuple member must be last",
            ));
        }
        Ok(ValueType::Tuple(members))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Bool => write!(f, "bool"),
            ValueType::String => write!(f, "string"),
            ValueType::Bytes => write!(f, "bytes"),
            ValueType::Address => write!(f, "address"),
            ValueType::Uint(bits) => write!(f, "uint{bits}"),
            ValueType::Int(bits) => write!(f, "int{bits}"),
            ValueType::FixedBytes(len) => write!(f, "bytes{len}"),
            ValueType::Tuple(members) => {
                write!(f, "(")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{member}")?;
                }
                write!(f, ")")
            }
            ValueType::Array(element) => write!(f, "{element}[]"),
        }
    }
}

impl FromStr for ValueType {
    type Err = UnsupportedValueType;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(token);
        let ty = parser.parse_type()?;
        parser.skip_whitespace();
        if !parser.at_end() {
            return Err(UnsupportedValueType::new(token, "unexpected trailing characters"));
        }
        Ok(ty)
    }
}

impl TryFrom<&str> for ValueType {
    type Error = UnsupportedValueType;

    fn try_from(token: &str) -> Result<Self, Self::Error> {
        token.parse()
    }
}

/// Deepest nesting of tuples and arrays a type token may have.
pub const MAX_NESTING: usize = 32;

/// Recursive descent over the characters of a single type token.
struct Parser<'a> {
    token: &'a str,
    chars: Vec<char>,
    index: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(token: &'a str) -> Self {
        Parser {
            token,
            chars: token.chars().collect(),
            index: 0,
            depth: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.index >= self.chars.len()
    }

    fn view(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.view().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn error(&self, reason: &'static str) -> UnsupportedValueType {
        UnsupportedValueType::new(self.token, reason)
    }

    fn parse_type(&mut self) -> Result<ValueType, UnsupportedValueType> {
        self.skip_whitespace();
        self.enter()?;
        let mut ty = match self.view() {
            Some('(') => self.parse_tuple()?,
            Some(c) if c.is_ascii_alphabetic() => self.parse_elementary()?,
            Some(_) => return Err(self.error("expected a type name or '('")),
            None => return Err(self.error("empty type")),
        };
        let mut arrays = 0;
        while self.view() == Some('[') {
            self.advance();
            match self.view() {
                Some(']') => self.advance(),
                Some(c) if c.is_ascii_digit() => {
                    return Err(self.error("fixed-size arrays are not supported"))
                }
                _ => return Err(self.error("unterminated array suffix")),
            }
            arrays += 1;
            if self.depth + arrays > MAX_NESTING {
                return Err(self.error("type nesting too deep"));
            }
            ty = ValueType::Array(Box::new(ty));
        }
        self.depth -= 1;
        Ok(ty)
    }

    /// Counts one level of nesting; tuples and array suffixes share the limit.
    fn enter(&mut self) -> Result<(), UnsupportedValueType> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.error("type nesting too deep"));
        }
        Ok(())
    }

    fn parse_tuple(&mut self) -> Result<ValueType, UnsupportedValueType> {
        // Opening parenthesis.
        self.advance();
        let mut members = Vec::new();
        loop {
            self.skip_whitespace();
            if self.view() == Some(')') && members.is_empty() {
                self.advance();
                break;
            }
            members.push(self.parse_type()?);
            self.skip_whitespace();
            match self.view() {
                Some(',') => self.advance(),
                Some(')') => {
                    self.advance();
                    break;
                }
                Some(_) => return Err(self.error("expected ',' or ')' in tuple")),
                None => return Err(self.error("unterminated tuple")),
            }
        }
        ValueType::tuple(self.token, members)
    }

    fn parse_elementary(&mut self) -> Result<ValueType, UnsupportedValueType> {
        let start = self.index;
        while self.view().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.advance();
        }
        let word: String = self.chars[start..self.index].iter().collect();
        let split = word
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(word.len());
        let (name, digits) = word.split_at(split);
        let width = if digits.is_empty() {
            None
        } else if digits.starts_with('0') {
            return Err(self.error("width has a leading zero"));
        } else {
            Some(
                digits
                    .parse::<u16>()
                    .map_err(|_| self.error("width is not a number"))?,
            )
        };

        match (name, width) {
            ("bool", None) => Ok(ValueType::Bool),
            ("string", None) => Ok(ValueType::String),
            ("bytes", None) => Ok(ValueType::Bytes),
            ("address", None) => Ok(ValueType::Address),
            ("uint", None) => Ok(ValueType::Uint(256)),
            ("int", None) => Ok(ValueType::Int(256)),
            ("uint", Some(bits)) if Self::valid_bits(bits) => Ok(ValueType::Uint(bits)),
            ("int", Some(bits)) if Self::valid_bits(bits) => Ok(ValueType::Int(bits)),
            ("uint" | "int", Some(_)) => {
                Err(self.error("integer width must be a multiple of 8 between 8 and 256"))
            }
            ("bytes", Some(len)) if (1..=WORD_LEN as u16).contains(&len) => {
                Ok(ValueType::FixedBytes(len as u8))
            }
            ("bytes", Some(_)) => Err(self.error("bytesN width must be between 1 and 32")),
            _ => Err(self.error("unknown type name")),
        }
    }

    fn valid_bits(bits: u16) -> bool {
        bits % 8 == 0 && (8..=256).contains(&bits)
    }
}
