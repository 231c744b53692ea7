use crate::entry::Operator;

/// One `[key][:][op]value` term, split but not yet typed
#[derive(Debug, Clone, PartialEq)]
pub struct TermSpec {
    pub key: Option<String>,
    pub operator: Operator,
    /// `=`/`==` was written out, as opposed to the implied equality of `key:value`
    pub explicit_operator: bool,
    /// `~`: the value is a regular expression
    pub regex: bool,
    /// Unquoted, unescaped value
    pub value: String,
}

/// Splits a raw term into key, operator and value
///
/// A key is an identifier (letters, digits, `_`, `.`, starting with a letter
/// or `_`) directly followed by `:` or an operator. Anything else is a keyless
/// value, so `1:30` stays a value.
pub fn parse_term(raw: &str) -> TermSpec {
    let trimmed = raw.trim();
    let (key, rest) = split_key(trimmed);
    let rest = rest.trim_start();

    let (operator, explicit_operator, regex, value) = match read_operator(rest) {
        Some((Some(op), explicit, len)) => (op, explicit, false, &rest[len..]),
        Some((None, _, len)) => (Operator::Equal, false, true, &rest[len..]),
        None => (Operator::Equal, false, false, rest),
    };

    TermSpec {
        key: key.map(str::to_string),
        operator,
        explicit_operator,
        regex,
        value: unescape(value.trim()),
    }
}

fn split_key(term: &str) -> (Option<&str>, &str) {
    let starts_like_key = term
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if !starts_like_key {
        return (None, term);
    }

    let end = term
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || matches!(c, '_' | '.')))
        .map(|(i, _)| i)
        .unwrap_or(term.len());

    let rest = term[end..].trim_start();
    if let Some(after_colon) = rest.strip_prefix(':') {
        (Some(&term[..end]), after_colon)
    } else if read_operator(rest).is_some() {
        (Some(&term[..end]), rest)
    } else {
        (None, term)
    }
}

/// Operator at the start of `text`: `(operator, explicit, byte length)`,
/// with `None` as operator for the regex marker `~`
fn read_operator(text: &str) -> Option<(Option<Operator>, bool, usize)> {
    const TWO_CHAR: [(&str, Operator); 3] = [
        ("<=", Operator::LessEqual),
        (">=", Operator::MoreEqual),
        ("==", Operator::Equal),
    ];
    for (token, op) in TWO_CHAR {
        if text.starts_with(token) {
            return Some((Some(op), op == Operator::Equal, token.len()));
        }
    }

    let ch = text.chars().next()?;
    if ch == '~' {
        return Some((None, false, ch.len_utf8()));
    }
    Operator::from_char(ch).map(|op| (Some(op), op == Operator::Equal, ch.len_utf8()))
}

/// Drops quotes and resolves escapes
///
/// Outside quotes `\x` yields `x`. Inside quotes only `\"` and `\\` are
/// escapes, so quoted regexes keep their backslashes.
pub fn unescape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut in_quotes = false;
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '\\' if in_quotes => match chars.peek() {
                Some(&next) if next == '"' || next == '\\' => {
                    result.push(next);
                    chars.next();
                }
                _ => result.push('\\'),
            },
            '\\' => {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            _ => result.push(ch),
        }
    }
    result
}
