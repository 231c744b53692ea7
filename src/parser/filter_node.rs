use std::fmt;

use crate::entry::TestEntry;
use crate::filter::Tester;

/// Parsed query tree
///
/// Immutable once built; evaluation is a side-effect-free walk that delegates
/// leaves to a [`Tester`].
#[derive(Debug)]
pub enum FilterNode {
    /// `key:value`, or a bare `value` tested against the tester's default field
    Leaf {
        key: Option<String>,
        entry: Box<dyn TestEntry>,
    },
    /// `key(expression)`: the sub-filter applies to a nested object
    Child { key: String, filter: Box<FilterNode> },
    And(Box<FilterNode>, Box<FilterNode>),
    Or(Box<FilterNode>, Box<FilterNode>),
    Not(Box<FilterNode>),
    Const(bool),
}

impl FilterNode {
    pub fn leaf(key: Option<String>, entry: Box<dyn TestEntry>) -> Self {
        FilterNode::Leaf { key, entry }
    }

    pub fn and(left: FilterNode, right: FilterNode) -> Self {
        FilterNode::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: FilterNode, right: FilterNode) -> Self {
        FilterNode::Or(Box::new(left), Box::new(right))
    }

    pub fn negate(inner: FilterNode) -> Self {
        FilterNode::Not(Box::new(inner))
    }

    /// Evaluates the tree against one object; AND and OR short-circuit
    pub fn test<T, R>(&self, tester: &R, obj: &T) -> bool
    where
        T: ?Sized,
        R: Tester<T> + ?Sized,
    {
        match self {
            FilterNode::Leaf { key, entry } => tester.test(obj, key.as_deref(), entry.as_ref()),
            FilterNode::Child { key, filter } => tester.test_child(obj, key, filter),
            FilterNode::And(left, right) => left.test(tester, obj) && right.test(tester, obj),
            FilterNode::Or(left, right) => left.test(tester, obj) || right.test(tester, obj),
            FilterNode::Not(inner) => !inner.test(tester, obj),
            FilterNode::Const(value) => *value,
        }
    }

    /// Whether a change of `key` could change the outcome
    ///
    /// Keyless leaves test the default field, which only the tester knows,
    /// so they count as affected by any key.
    pub fn is_affected_by(&self, key: &str) -> bool {
        match self {
            FilterNode::Leaf { key: None, .. } => true,
            FilterNode::Leaf { key: Some(k), .. } | FilterNode::Child { key: k, .. } => {
                k.eq_ignore_ascii_case(key)
            }
            FilterNode::And(left, right) | FilterNode::Or(left, right) => {
                left.is_affected_by(key) || right.is_affected_by(key)
            }
            FilterNode::Not(inner) => inner.is_affected_by(key),
            FilterNode::Const(_) => false,
        }
    }

    /// Number of leaf and child nodes
    pub fn leaf_count(&self) -> usize {
        match self {
            FilterNode::Leaf { .. } | FilterNode::Child { .. } => 1,
            FilterNode::And(left, right) | FilterNode::Or(left, right) => {
                left.leaf_count() + right.leaf_count()
            }
            FilterNode::Not(inner) => inner.leaf_count(),
            FilterNode::Const(_) => 0,
        }
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterNode::Leaf { key: Some(key), entry } => write!(f, "{}:{}", key, entry),
            FilterNode::Leaf { key: None, entry } => write!(f, "{}", entry),
            FilterNode::Child { key, filter } => write!(f, "{}({})", key, filter),
            FilterNode::And(left, right) => write!(f, "({} & {})", left, right),
            FilterNode::Or(left, right) => write!(f, "({} | {})", left, right),
            FilterNode::Not(inner) => write!(f, "!{}", inner),
            FilterNode::Const(value) => write!(f, "{}", value),
        }
    }
}
