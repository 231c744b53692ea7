use tracing::debug;

use super::entry_factory::create_entry;
use super::filter_node::FilterNode;
use super::term::parse_term;
use crate::filter::FilterOptions;
use crate::registry::{self, TestEntryRegistry};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    And,
    Or,
    Not,
    Open,
    Close,
    /// `key(`: opens a child filter
    Child(String),
    /// Raw term text, quotes and escapes still in place
    Term(String),
}

/// Parses a query into a filter tree
///
/// Never fails: malformed input yields the best-effort tree, and a query with
/// no usable term yields `Const(options.empty_matches_all)`.
pub fn parse_filter(query: &str, options: &FilterOptions) -> FilterNode {
    let registry = match &options.registry {
        Some(registry) => registry.clone(),
        None => registry::global(),
    };

    let tokens = tokenize(query);
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        options,
        registry: &registry,
    };
    let node = parser
        .parse_all()
        .unwrap_or(FilterNode::Const(options.empty_matches_all));

    debug!(query, tree = %node, "Parsed filter");
    node
}

/// Groups nested deeper than this are flattened into the enclosing group
const MAX_NESTING: usize = 128;

fn is_separator(ch: char) -> bool {
    matches!(ch, '&' | '|' | ',' | '(' | ')')
}

/// A comma between two digits is a decimal separator (`1,5mb`), not an OR
fn is_decimal_comma(chars: &[char], i: usize) -> bool {
    chars[i] == ','
        && i > 0
        && chars[i - 1].is_ascii_digit()
        && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
}

fn is_identifier(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.'))
}

/// Splits a query into tokens, dropping `)` that close nothing
fn tokenize(query: &str) -> Vec<Token> {
    let chars: Vec<char> = query.chars().collect();
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            c if c.is_whitespace() => {
                i += 1;
            }
            '&' => {
                tokens.push(Token::And);
                i += 1;
            }
            '|' | ',' => {
                tokens.push(Token::Or);
                i += 1;
            }
            '!' => {
                tokens.push(Token::Not);
                i += 1;
            }
            '(' => {
                tokens.push(Token::Open);
                depth += 1;
                i += 1;
            }
            ')' => {
                if depth > 0 {
                    tokens.push(Token::Close);
                    depth -= 1;
                }
                i += 1;
            }
            _ => {
                let start = i;
                let mut in_quotes = false;
                while i < chars.len() {
                    let c = chars[i];
                    if c == '\\' {
                        i += 2;
                        continue;
                    }
                    if c == '"' {
                        in_quotes = !in_quotes;
                    } else if !in_quotes && is_separator(c) && !is_decimal_comma(&chars, i) {
                        break;
                    }
                    i += 1;
                }
                let end = i.min(chars.len());
                let raw: String = chars[start..end].iter().collect();

                if i < chars.len() && chars[i] == '(' && is_identifier(&raw) {
                    tokens.push(Token::Child(raw));
                    depth += 1;
                    i += 1;
                } else {
                    tokens.push(Token::Term(raw.trim_end().to_string()));
                }
            }
        }
    }
    tokens
}

/// Recursive descent over the token list
///
/// Each level returns `None` for an empty operand, which the level above
/// simply drops. Only groups recurse; their depth is capped at
/// [`MAX_NESTING`], and operator chains are joined into balanced trees, so
/// neither parsing nor walking the result can exhaust the stack.
struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    options: &'a FilterOptions,
    registry: &'a TestEntryRegistry,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn parse_all(&mut self) -> Option<FilterNode> {
        let mut operands = vec![self.parse_expr()];
        // only reachable on unbalanced input; skip the offending token
        while self.pos < self.tokens.len() {
            self.pos += 1;
            operands.push(self.parse_expr());
        }
        join_balanced(operands.into_iter().flatten().collect(), FilterNode::and)
    }

    fn parse_expr(&mut self) -> Option<FilterNode> {
        let mut operands = vec![self.parse_and()];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            operands.push(self.parse_and());
        }
        join_balanced(operands.into_iter().flatten().collect(), FilterNode::or)
    }

    fn parse_and(&mut self) -> Option<FilterNode> {
        let mut operands = vec![self.parse_unary()];
        loop {
            match self.peek() {
                Some(Token::And) => {
                    self.pos += 1;
                }
                // adjacent operands are joined with AND
                Some(Token::Not | Token::Open | Token::Child(_) | Token::Term(_)) => {}
                _ => break,
            }
            operands.push(self.parse_unary());
        }
        join_balanced(operands.into_iter().flatten().collect(), FilterNode::and)
    }

    /// A run of `!` negates once when odd and cancels out when even
    fn parse_unary(&mut self) -> Option<FilterNode> {
        let mut negations = 0usize;
        while self.peek() == Some(&Token::Not) {
            self.pos += 1;
            negations += 1;
        }
        let node = self.parse_primary()?;
        Some(if negations % 2 == 1 {
            FilterNode::negate(node)
        } else {
            node
        })
    }

    fn parse_primary(&mut self) -> Option<FilterNode> {
        if self.depth >= MAX_NESTING {
            while matches!(self.peek(), Some(Token::Open | Token::Child(_))) {
                self.pos += 1;
            }
        }

        match self.peek()? {
            Token::Open => {
                self.pos += 1;
                self.parse_group()
            }
            Token::Child(_) => {
                let Some(Token::Child(key)) = self.advance() else {
                    return None;
                };
                self.parse_group().map(|filter| FilterNode::Child {
                    key,
                    filter: Box::new(filter),
                })
            }
            Token::Term(_) => {
                let Some(Token::Term(raw)) = self.advance() else {
                    return None;
                };
                let term = parse_term(&raw);
                let entry = create_entry(&term, self.options, self.registry);
                Some(FilterNode::leaf(term.key, entry))
            }
            Token::And | Token::Or | Token::Not | Token::Close => None,
        }
    }

    /// Body of a group whose `(` is consumed; a missing `)` closes at the end
    fn parse_group(&mut self) -> Option<FilterNode> {
        self.depth += 1;
        let inner = self.parse_expr();
        self.depth -= 1;
        if self.peek() == Some(&Token::Close) {
            self.pos += 1;
        }
        inner
    }
}

/// Joins operands left to right into a tree of logarithmic depth
fn join_balanced(
    mut operands: Vec<FilterNode>,
    join: fn(FilterNode, FilterNode) -> FilterNode,
) -> Option<FilterNode> {
    if operands.len() <= 1 {
        return operands.pop();
    }
    let right = operands.split_off(operands.len() / 2);
    match (join_balanced(operands, join), join_balanced(right, join)) {
        (Some(l), Some(r)) => Some(join(l, r)),
        (l, r) => l.or(r),
    }
}
