//! Predicates over a selection, with a small text form.
//!
//! ```text
//! wheels = "Fat Bike Wheels" and (rimColor = Black or rimColor = Blue)
//! not frameType is set
//! chain != "8-Speed Chain"
//! always
//! ```
//!
//! `and` binds tighter than `or`. Option values may be bare words when they
//! contain no spaces. Nesting of `not` and parentheses is capped at
//! [`MAX_DEPTH`] levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use velo_catalog::{Attribute, AttributeSelection, Choice, SelectionError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    #[error("Unexpected {found} at offset {offset}")]
    Unexpected { found: String, offset: usize },

    #[error("Unexpected end of condition")]
    UnexpectedEnd,

    #[error("Unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    #[error("Condition nested deeper than {max} levels at offset {offset}", max = MAX_DEPTH)]
    TooDeep { offset: usize },

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RuleCondition {
    Always,
    Is(Choice),
    IsNot(Choice),
    IsSet(Attribute),
    Not(Box<RuleCondition>),
    All(Vec<RuleCondition>),
    Any(Vec<RuleCondition>),
}

impl RuleCondition {
    pub fn is(choice: impl Into<Choice>) -> Self {
        RuleCondition::Is(choice.into())
    }

    pub fn is_not(choice: impl Into<Choice>) -> Self {
        RuleCondition::IsNot(choice.into())
    }

    pub fn matches(&self, selection: &AttributeSelection) -> bool {
        match self {
            RuleCondition::Always => true,
            RuleCondition::Is(choice) => selection.get(choice.attribute()) == Some(*choice),
            RuleCondition::IsNot(choice) => selection.get(choice.attribute()) != Some(*choice),
            RuleCondition::IsSet(attribute) => selection.get(*attribute).is_some(),
            RuleCondition::Not(inner) => !inner.matches(selection),
            RuleCondition::All(conditions) => conditions.iter().all(|c| c.matches(selection)),
            RuleCondition::Any(conditions) => conditions.iter().any(|c| c.matches(selection)),
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, wrap: bool) -> fmt::Result {
        if wrap {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl std::ops::Not for RuleCondition {
    type Output = RuleCondition;

    fn not(self) -> Self::Output {
        RuleCondition::Not(Box::new(self))
    }
}

impl fmt::Display for RuleCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCondition::Always => f.write_str("always"),
            RuleCondition::Is(choice) => write!(f, "{}", choice),
            RuleCondition::IsNot(choice) => write!(f, "{} != {:?}", choice.attribute(), choice.label()),
            RuleCondition::IsSet(attribute) => write!(f, "{} is set", attribute),
            RuleCondition::Not(inner) => {
                f.write_str("not ")?;
                inner.fmt_operand(f, matches!(**inner, RuleCondition::All(_) | RuleCondition::Any(_)))
            }
            // Empty lists have no infix form.
            RuleCondition::All(conditions) if conditions.is_empty() => f.write_str("always"),
            RuleCondition::Any(conditions) if conditions.is_empty() => f.write_str("not always"),
            RuleCondition::All(conditions) => {
                for (i, condition) in conditions.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" and ")?;
                    }
                    condition.fmt_operand(
                        f,
                        matches!(condition, RuleCondition::All(_) | RuleCondition::Any(_)),
                    )?;
                }
                Ok(())
            }
            RuleCondition::Any(conditions) => {
                for (i, condition) in conditions.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" or ")?;
                    }
                    condition.fmt_operand(f, matches!(condition, RuleCondition::Any(_)))?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for RuleCondition {
    type Err = ConditionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            tokens: tokenize(text)?,
            position: 0,
            depth: 0,
        };
        let condition = parser.parse_or()?;
        match parser.tokens.get(parser.position) {
            None => Ok(condition),
            Some(token) => Err(token.unexpected()),
        }
    }
}

impl TryFrom<String> for RuleCondition {
    type Error = ConditionError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<RuleCondition> for String {
    fn from(condition: RuleCondition) -> Self {
        condition.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Word(String),
    Quoted(String),
    Eq,
    NotEq,
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

impl Token {
    fn unexpected(&self) -> ConditionError {
        let found = match &self.kind {
            TokenKind::Word(word) => format!("'{}'", word),
            TokenKind::Quoted(text) => format!("{:?}", text),
            TokenKind::Eq => "'='".to_string(),
            TokenKind::NotEq => "'!='".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
        };
        ConditionError::Unexpected {
            found,
            offset: self.offset,
        }
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.kind, TokenKind::Word(word) if word == keyword)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn tokenize(text: &str) -> Result<Vec<Token>, ConditionError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let kind = match c {
            c if c.is_whitespace() => continue,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '=' => TokenKind::Eq,
            '!' => match chars.next() {
                Some((_, '=')) => TokenKind::NotEq,
                _ => {
                    return Err(ConditionError::Unexpected {
                        found: "'!'".to_string(),
                        offset,
                    })
                }
            },
            '"' => {
                let start = offset + 1;
                let mut end = None;
                for (i, c) in chars.by_ref() {
                    if c == '"' {
                        end = Some(i);
                        break;
                    }
                }
                let end = end.ok_or(ConditionError::UnterminatedString(offset))?;
                TokenKind::Quoted(text[start..end].to_string())
            }
            c if is_word_char(c) => {
                let mut end = offset + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if !is_word_char(next) {
                        break;
                    }
                    end = i + next.len_utf8();
                    chars.next();
                }
                TokenKind::Word(text[offset..end].to_string())
            }
            other => {
                return Err(ConditionError::Unexpected {
                    found: format!("'{}'", other),
                    offset,
                })
            }
        };
        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Result<Token, ConditionError> {
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or(ConditionError::UnexpectedEnd)?;
        self.position += 1;
        Ok(token)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek().is_some_and(|token| token.is_keyword(keyword)) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn enter(&mut self, offset: usize) -> Result<(), ConditionError> {
        if self.depth >= MAX_DEPTH {
            return Err(ConditionError::TooDeep { offset });
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_or(&mut self) -> Result<RuleCondition, ConditionError> {
        let mut terms = vec![self.parse_and()?];
        while self.eat_keyword("or") {
            terms.push(self.parse_and()?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            RuleCondition::Any(terms)
        })
    }

    fn parse_and(&mut self) -> Result<RuleCondition, ConditionError> {
        let mut factors = vec![self.parse_unary()?];
        while self.eat_keyword("and") {
            factors.push(self.parse_unary()?);
        }
        Ok(if factors.len() == 1 {
            factors.remove(0)
        } else {
            RuleCondition::All(factors)
        })
    }

    fn parse_unary(&mut self) -> Result<RuleCondition, ConditionError> {
        if let Some(offset) = self.peek().filter(|t| t.is_keyword("not")).map(|t| t.offset) {
            self.position += 1;
            self.enter(offset)?;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(!inner);
        }
        if self.eat_keyword("always") {
            return Ok(RuleCondition::Always);
        }

        let token = self.next()?;
        match &token.kind {
            TokenKind::LParen => {
                self.enter(token.offset)?;
                let inner = self.parse_or()?;
                let close = self.next()?;
                if close.kind != TokenKind::RParen {
                    return Err(close.unexpected());
                }
                self.depth -= 1;
                Ok(inner)
            }
            TokenKind::Word(key) => {
                let attribute: Attribute = key.parse()?;
                self.parse_comparison(attribute)
            }
            _ => Err(token.unexpected()),
        }
    }

    fn parse_comparison(&mut self, attribute: Attribute) -> Result<RuleCondition, ConditionError> {
        let operator = self.next()?;
        match &operator.kind {
            TokenKind::Eq => Ok(RuleCondition::Is(self.parse_value(attribute)?)),
            TokenKind::NotEq => Ok(RuleCondition::IsNot(self.parse_value(attribute)?)),
            TokenKind::Word(word) if word == "is" => {
                let set = self.next()?;
                if !set.is_keyword("set") {
                    return Err(set.unexpected());
                }
                Ok(RuleCondition::IsSet(attribute))
            }
            _ => Err(operator.unexpected()),
        }
    }

    fn parse_value(&mut self, attribute: Attribute) -> Result<Choice, ConditionError> {
        let token = self.next()?;
        match &token.kind {
            TokenKind::Word(value) | TokenKind::Quoted(value) => Ok(Choice::parse(attribute, value)?),
            _ => Err(token.unexpected()),
        }
    }
}
