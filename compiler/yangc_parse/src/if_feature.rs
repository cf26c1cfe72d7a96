//! `if-feature` arguments.
//!
//! Version 1 takes a single feature name. Version 1.1 takes a boolean
//! expression:
//!
//! ```text
//! expr   = term   ("or"  term)*
//! term   = factor ("and" factor)*
//! factor = "not" factor | "(" expr ")" | node-identifier
//! ```

use std::fmt;

use yangc_ir::{QName, QNameInterner, YangVersion};

use crate::identifier::node_identifier_at;
use crate::{ArgumentError, BindingContext, Production};

/// A bound `if-feature` condition.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum IfFeatureExpr {
    Feature(QName),
    Not(Box<IfFeatureExpr>),
    And(Box<IfFeatureExpr>, Box<IfFeatureExpr>),
    Or(Box<IfFeatureExpr>, Box<IfFeatureExpr>),
}

impl IfFeatureExpr {
    /// Evaluate against a feature predicate.
    pub fn evaluate(&self, supported: &impl Fn(QName) -> bool) -> bool {
        match self {
            IfFeatureExpr::Feature(f) => supported(*f),
            IfFeatureExpr::Not(e) => !e.evaluate(supported),
            IfFeatureExpr::And(a, b) => a.evaluate(supported) && b.evaluate(supported),
            IfFeatureExpr::Or(a, b) => a.evaluate(supported) || b.evaluate(supported),
        }
    }

    /// Every feature referenced, left to right.
    pub fn features(&self) -> Vec<QName> {
        let mut out = Vec::new();
        self.collect_features(&mut out);
        out
    }

    fn collect_features(&self, out: &mut Vec<QName>) {
        match self {
            IfFeatureExpr::Feature(f) => out.push(*f),
            IfFeatureExpr::Not(e) => e.collect_features(out),
            IfFeatureExpr::And(a, b) | IfFeatureExpr::Or(a, b) => {
                a.collect_features(out);
                b.collect_features(out);
            }
        }
    }

    /// Fully parenthesized rendering, for diagnostics and tests.
    pub fn display<'a>(&'a self, interner: &'a QNameInterner) -> impl fmt::Display + 'a {
        DisplayExpr {
            expr: self,
            interner,
        }
    }
}

struct DisplayExpr<'a> {
    expr: &'a IfFeatureExpr,
    interner: &'a QNameInterner,
}

impl<'a> DisplayExpr<'a> {
    fn sub(&self, expr: &'a IfFeatureExpr) -> DisplayExpr<'a> {
        DisplayExpr {
            expr,
            interner: self.interner,
        }
    }
}

impl fmt::Display for DisplayExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expr {
            IfFeatureExpr::Feature(q) => f.write_str(self.interner.local_name(*q)),
            IfFeatureExpr::Not(e) => write!(f, "not {}", self.sub(e)),
            IfFeatureExpr::And(a, b) => write!(f, "({} and {})", self.sub(a), self.sub(b)),
            IfFeatureExpr::Or(a, b) => write!(f, "({} or {})", self.sub(a), self.sub(b)),
        }
    }
}

/// Parse an `if-feature` argument declared in a source of `version`.
pub fn parse_if_feature<C: BindingContext + ?Sized>(
    ctx: &C,
    text: &str,
    version: YangVersion,
) -> Result<IfFeatureExpr, ArgumentError> {
    if version == YangVersion::V1 {
        return node_identifier_at(ctx, text, 1, Production::IfFeatureExpr)
            .map(IfFeatureExpr::Feature);
    }

    let tokens = tokenize(text);
    let mut parser = ExprParser {
        ctx,
        tokens: &tokens,
        pos: 0,
        end: text.chars().count() + 1,
    };
    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(tok) => Err(tok.unexpected()),
    }
}

#[derive(Clone, Copy, Debug)]
enum TokenKind<'s> {
    LParen,
    RParen,
    Word(&'s str),
}

#[derive(Clone, Copy, Debug)]
struct Token<'s> {
    kind: TokenKind<'s>,
    /// 1-based character offset.
    offset: usize,
}

impl Token<'_> {
    fn unexpected(&self) -> ArgumentError {
        let found = match self.kind {
            TokenKind::LParen => '(',
            TokenKind::RParen => ')',
            TokenKind::Word(w) => w.chars().next().unwrap_or(' '),
        };
        ArgumentError::UnexpectedChar {
            production: Production::IfFeatureExpr,
            found,
            offset: self.offset,
        }
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut word_start: Option<(usize, usize)> = None;
    let mut offset = 0;

    for (byte, c) in text.char_indices() {
        offset += 1;
        let delimiter = c.is_whitespace() || c == '(' || c == ')';
        if delimiter {
            if let Some((start_byte, start_offset)) = word_start.take() {
                tokens.push(Token {
                    kind: TokenKind::Word(&text[start_byte..byte]),
                    offset: start_offset,
                });
            }
            match c {
                '(' => tokens.push(Token {
                    kind: TokenKind::LParen,
                    offset,
                }),
                ')' => tokens.push(Token {
                    kind: TokenKind::RParen,
                    offset,
                }),
                _ => {}
            }
        } else if word_start.is_none() {
            word_start = Some((byte, offset));
        }
    }
    if let Some((start_byte, start_offset)) = word_start {
        tokens.push(Token {
            kind: TokenKind::Word(&text[start_byte..]),
            offset: start_offset,
        });
    }
    tokens
}

struct ExprParser<'a, 's, C: ?Sized> {
    ctx: &'a C,
    tokens: &'a [Token<'s>],
    pos: usize,
    /// Offset just past the end of the argument.
    end: usize,
}

impl<'s, C: BindingContext + ?Sized> ExprParser<'_, 's, C> {
    fn peek(&self) -> Option<Token<'s>> {
        self.tokens.get(self.pos).copied()
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token { kind: TokenKind::Word(w), .. }) if w == keyword)
    }

    fn expr(&mut self) -> Result<IfFeatureExpr, ArgumentError> {
        let mut lhs = self.term()?;
        while self.at_keyword("or") {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = IfFeatureExpr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<IfFeatureExpr, ArgumentError> {
        let mut lhs = self.factor()?;
        while self.at_keyword("and") {
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = IfFeatureExpr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<IfFeatureExpr, ArgumentError> {
        let Some(tok) = self.peek() else {
            return Err(ArgumentError::UnexpectedEnd {
                production: Production::IfFeatureExpr,
                offset: self.end,
            });
        };
        self.pos += 1;
        match tok.kind {
            TokenKind::Word("not") => Ok(IfFeatureExpr::Not(Box::new(self.factor()?))),
            TokenKind::Word("and" | "or") | TokenKind::RParen => Err(tok.unexpected()),
            TokenKind::LParen => {
                let inner = self.expr()?;
                match self.peek() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    Some(other) => Err(other.unexpected()),
                    None => Err(ArgumentError::UnexpectedEnd {
                        production: Production::IfFeatureExpr,
                        offset: self.end,
                    }),
                }
            }
            TokenKind::Word(word) => {
                node_identifier_at(self.ctx, word, tok.offset, Production::IfFeatureExpr)
                    .map(IfFeatureExpr::Feature)
            }
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
