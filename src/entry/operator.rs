use std::cmp::Ordering;
use std::fmt;

/// Absolute tolerance for numeric equality
pub const EPSILON: f64 = 1e-4;

/// Relative tolerance of the `≈` operator for numeric domains
pub const SIMILAR_RATIO: f64 = 0.1;

/// Comparison kind of a leaf predicate, serialized as a single character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    Less,
    LessEqual,
    More,
    MoreEqual,
    #[default]
    Equal,
    SimilarTo,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Less,
        Operator::LessEqual,
        Operator::More,
        Operator::MoreEqual,
        Operator::Equal,
        Operator::SimilarTo,
    ];

    pub fn as_char(self) -> char {
        match self {
            Operator::Less => '<',
            Operator::LessEqual => '≤',
            Operator::More => '>',
            Operator::MoreEqual => '≥',
            Operator::Equal => '=',
            Operator::SimilarTo => '≈',
        }
    }

    pub fn from_char(ch: char) -> Option<Operator> {
        match ch {
            '<' => Some(Operator::Less),
            '≤' => Some(Operator::LessEqual),
            '>' => Some(Operator::More),
            '≥' => Some(Operator::MoreEqual),
            '=' => Some(Operator::Equal),
            '≈' => Some(Operator::SimilarTo),
            _ => None,
        }
    }

    /// `<`, `≤`, `>` and `≥`
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            Operator::Less | Operator::LessEqual | Operator::More | Operator::MoreEqual
        )
    }

    /// Compares `actual` against `reference`; equality is an epsilon band
    pub fn test_f64(self, actual: f64, reference: f64) -> bool {
        if actual.is_nan() || reference.is_nan() {
            return false;
        }

        let equal = (actual - reference).abs() < EPSILON;
        match self {
            Operator::Less => actual < reference && !equal,
            Operator::LessEqual => actual < reference || equal,
            Operator::More => actual > reference && !equal,
            Operator::MoreEqual => actual > reference || equal,
            Operator::Equal => equal,
            Operator::SimilarTo => {
                (actual - reference).abs() <= (reference.abs() * SIMILAR_RATIO).max(EPSILON)
            }
        }
    }

    /// Interprets an ordering of `actual` relative to the reference;
    /// `≈` is treated as equality here, domains with a looser reading handle it first
    pub fn test_ordering(self, ordering: Ordering) -> bool {
        match self {
            Operator::Less => ordering == Ordering::Less,
            Operator::LessEqual => ordering != Ordering::Greater,
            Operator::More => ordering == Ordering::Greater,
            Operator::MoreEqual => ordering != Ordering::Less,
            Operator::Equal | Operator::SimilarTo => ordering == Ordering::Equal,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Operator {
    type Error = char;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        Operator::from_char(ch).ok_or(ch)
    }
}
