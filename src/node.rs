//! Expression tree nodes.

use crate::leaf::AlgorithmNumber;
use crate::leaf::ExplicitNumber;
use crate::leaf::RationalNumber;

use std::sync::Arc;

/// Operator tag of an operation node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    Add,
    Sub,
    Mul,
    Div,
    IntPow,
    Exp,
    Log,
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
}

/// A node of an expression tree. Subtrees are shared immutably, so reusing
/// a value in several expressions builds a DAG without copying; all
/// refinement state lives in the iterators, never in the tree.
#[derive(Debug)]
pub(crate) enum Term {
    Explicit(ExplicitNumber),
    Algorithm(AlgorithmNumber),
    Rational(RationalNumber),
    Operation {
        op: Op,
        lhs: Arc<Term>,
        rhs: Option<Arc<Term>>,
    },
}
