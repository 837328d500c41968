//! Lazy refinement of enclosures over an expression tree.

use crate::common::consts::ONE;
use crate::common::util::div_int_by_digit;
use crate::defs::Digit;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::interval::Interval;
use crate::node::Op;
use crate::node::Term;
use crate::num::DigitNumber;
use crate::ops;

use std::collections::HashMap;
use std::sync::Arc;

/// Produces a nested chain of enclosures for an expression tree, one
/// cursor per distinct node.
///
/// Construction walks the tree once and deduplicates nodes by identity, so
/// a subtree shared inside one expression is refined by a single cursor.
/// Distinct iterators over the same tree never share state.
///
/// Every interval the iterator has emitted contains the true value of the
/// expression, and each emitted interval is contained in the previous one.
/// A refinement error (for example a divisor interval that still contains
/// zero at the precision cap) latches: all further calls return the same
/// error.
#[derive(Debug)]
pub struct PrecisionIterator {
    nodes: Vec<IterNode>,
    root: usize,
    max_precision: usize,
    failed: Option<Error>,
}

#[derive(Debug)]
struct IterNode {
    kind: IterKind,
    precision: usize,
    interval: Interval,
}

#[derive(Debug)]
enum IterKind {
    Leaf(Arc<Term>),
    Operation {
        op: Op,
        lhs: usize,
        rhs: Option<usize>,
    },
}

impl PrecisionIterator {
    /// Builds the cursor arena and computes the first enclosure of every
    /// node at precision 1.
    pub(crate) fn new(term: &Arc<Term>, max_precision: usize) -> Result<Self, Error> {
        let mut nodes = Vec::new();
        let mut memo = HashMap::new();
        let root = build(term, &mut nodes, &mut memo);
        let mut it = PrecisionIterator {
            nodes,
            root,
            max_precision: max_precision.max(1),
            failed: None,
        };
        it.init()?;
        Ok(it)
    }

    /// The current working precision in digits.
    pub fn precision(&self) -> usize {
        self.nodes[self.root].precision
    }

    /// The current enclosure.
    pub fn interval(&self) -> &Interval {
        &self.nodes[self.root].interval
    }

    /// Advances the precision by one and recomputes the enclosure.
    pub fn advance(&mut self) -> Result<(), Error> {
        self.advance_n(1)
    }

    /// Advances the precision by `n` and recomputes the enclosure.
    pub fn advance_n(&mut self, n: usize) -> Result<(), Error> {
        if let Some(e) = self.failed {
            return Err(e);
        }
        let ret = if n == 1 {
            self.advance_node(self.root)
        } else {
            self.advance_node_n(self.root, n)
        };
        if let Err(e) = ret {
            self.failed = Some(e);
        }
        ret
    }

    fn init(&mut self) -> Result<(), Error> {
        // children precede parents in the arena, so one forward pass
        // populates every enclosure
        for i in 0..self.nodes.len() {
            if self.children(i).is_none() {
                let iv = self.leaf_enclosure(i, 1)?;
                self.nodes[i].interval = iv;
            } else {
                self.update_bounds(i)?;
            }
        }
        Ok(())
    }

    fn children(&self, i: usize) -> Option<(usize, Option<usize>)> {
        match &self.nodes[i].kind {
            IterKind::Leaf(_) => None,
            IterKind::Operation { lhs, rhs, .. } => Some((*lhs, *rhs)),
        }
    }

    // Precision beyond which a leaf cannot be driven.
    fn leaf_cap(&self, i: usize) -> usize {
        match &self.nodes[i].kind {
            IterKind::Leaf(t) => match &**t {
                Term::Algorithm(a) => a.max_precision(),
                _ => usize::MAX,
            },
            IterKind::Operation { .. } => usize::MAX,
        }
    }

    fn leaf_enclosure(&self, i: usize, p: usize) -> Result<Interval, Error> {
        match &self.nodes[i].kind {
            IterKind::Leaf(t) => match &**t {
                Term::Explicit(x) => Ok(x.enclosure(p)),
                Term::Algorithm(x) => Ok(x.enclosure(p)),
                Term::Rational(x) => x.enclosure(p),
                Term::Operation { .. } => Err(Error::NoOperation),
            },
            IterKind::Operation { .. } => Err(Error::NoOperation),
        }
    }

    // One refinement step. A child is advanced only when its precision
    // equals this node's, so a subtree shared elsewhere in the expression
    // is not advanced twice, and a leaf stuck at its own cap is left
    // behind.
    fn advance_node(&mut self, i: usize) -> Result<(), Error> {
        match self.children(i) {
            None => {
                let p = self.nodes[i].precision;
                if p < self.leaf_cap(i) {
                    self.nodes[i].precision = p + 1;
                    self.nodes[i].interval = self.leaf_enclosure(i, p + 1)?;
                }
                Ok(())
            }
            Some((l, r)) => {
                let p = self.nodes[i].precision;
                if self.nodes[l].precision == p {
                    self.advance_node(l)?;
                }
                if let Some(r) = r {
                    if self.nodes[r].precision == p {
                        self.advance_node(r)?;
                    }
                }
                self.nodes[i].precision = p + 1;
                self.update_bounds(i)
            }
        }
    }

    fn advance_node_n(&mut self, i: usize, n: usize) -> Result<(), Error> {
        if n == 0 {
            return Ok(());
        }
        match self.children(i) {
            None => {
                let p = self.nodes[i].precision;
                let target = p.saturating_add(n).min(self.leaf_cap(i));
                if target > p {
                    self.nodes[i].precision = target;
                    self.nodes[i].interval = self.leaf_enclosure(i, target)?;
                }
                Ok(())
            }
            Some((l, r)) => {
                let p = self.nodes[i].precision;
                if self.nodes[l].precision < p + n {
                    self.advance_node_n(l, n)?;
                }
                if let Some(r) = r {
                    if self.nodes[r].precision < p + n {
                        self.advance_node_n(r, n)?;
                    }
                }
                self.nodes[i].precision = p + n;
                self.update_bounds(i)
            }
        }
    }

    // Operand endpoints truncated outward to precision `p`; the widened
    // interval encloses the operand, so combining widened endpoints
    // exactly still encloses the true result.
    fn widened(&self, c: usize, p: usize) -> (DigitNumber, DigitNumber) {
        let iv = &self.nodes[c].interval;
        (
            iv.lower.truncate(p, RoundingMode::Down),
            iv.upper.truncate(p, RoundingMode::Up),
        )
    }

    fn update_bounds(&mut self, i: usize) -> Result<(), Error> {
        let (op, lhs, rhs) = match &self.nodes[i].kind {
            IterKind::Operation { op, lhs, rhs } => (*op, *lhs, *rhs),
            IterKind::Leaf(_) => return Ok(()),
        };
        let p = self.nodes[i].precision;

        let interval = match op {
            Op::Add => {
                let r = rhs.ok_or(Error::NoOperation)?;
                let (ll, lh) = self.widened(lhs, p);
                let (rl, rh) = self.widened(r, p);
                Interval {
                    lower: ll.add(&rl),
                    upper: lh.add(&rh),
                }
            }
            Op::Sub => {
                let r = rhs.ok_or(Error::NoOperation)?;
                let (ll, lh) = self.widened(lhs, p);
                let (rl, rh) = self.widened(r, p);
                Interval {
                    lower: ll.sub(&rh),
                    upper: lh.sub(&rl),
                }
            }
            Op::Mul => self.mul_bounds(i, lhs, rhs.ok_or(Error::NoOperation)?),
            Op::Div => self.div_bounds(i, lhs, rhs.ok_or(Error::NoOperation)?)?,
            Op::IntPow => self.ipow_bounds(i, lhs, rhs.ok_or(Error::NoOperation)?)?,
            Op::Exp => {
                let (ll, lh) = self.widened(lhs, p);
                Interval {
                    lower: ops::exp(&ll, p, RoundingMode::Down)?,
                    upper: ops::exp(&lh, p, RoundingMode::Up)?,
                }
            }
            Op::Log => self.log_bounds(i, lhs)?,
            Op::Sin => self.sin_bounds(i, lhs)?,
            Op::Cos => self.cos_bounds(i, lhs)?,
            Op::Tan | Op::Cot => self.tan_cot_bounds(i, lhs, op)?,
            Op::Sec | Op::Csc => self.sec_csc_bounds(i, lhs, op)?,
        };

        self.nodes[i].interval = interval;
        Ok(())
    }

    fn mul_bounds(&self, i: usize, l: usize, r: usize) -> Interval {
        let p = self.nodes[i].precision;
        let (ll, lh) = self.widened(l, p);
        let (rl, rh) = self.widened(r, p);
        let li = &self.nodes[l].interval;
        let ri = &self.nodes[r].interval;

        let (lower, upper) = if li.is_positive() && ri.is_positive() {
            (ll.mul(&rl), lh.mul(&rh))
        } else if li.is_negative() && ri.is_negative() {
            (lh.mul(&rh), ll.mul(&rl))
        } else if li.is_negative() && ri.is_positive() {
            (ll.mul(&rh), lh.mul(&rl))
        } else if li.is_positive() && ri.is_negative() {
            (lh.mul(&rl), ll.mul(&rh))
        } else {
            // a factor straddles zero: all endpoint products, outermost
            // pair wins
            let cands = [ll.mul(&rl), ll.mul(&rh), lh.mul(&rl), lh.mul(&rh)];
            let lower = cands.iter().min().unwrap().clone();
            let upper = cands.iter().max().unwrap().clone();
            (lower, upper)
        };
        Interval { lower, upper }
    }

    fn div_bounds(&mut self, i: usize, l: usize, r: usize) -> Result<Interval, Error> {
        // drive the divisor interval away from zero, or give up at the cap
        loop {
            let danger = self.nodes[r].interval.contains_zero();
            if !danger || self.nodes[i].precision > self.max_precision {
                break;
            }
            let p = self.nodes[i].precision;
            if self.nodes[l].precision == p {
                self.advance_node(l)?;
            }
            if self.nodes[r].precision == p {
                self.advance_node(r)?;
            }
            self.nodes[i].precision = p + 1;
        }
        if self.nodes[r].interval.contains_zero() {
            return Err(Error::DivergentDivisionResult);
        }

        let p = self.nodes[i].precision;
        let li = self.nodes[l].interval.clone();
        let ri = self.nodes[r].interval.clone();
        let r_pos = ri.is_positive();

        let (un, ud) = if li.is_positive() {
            if r_pos {
                (&li.upper, &ri.lower)
            } else {
                (&li.lower, &ri.lower)
            }
        } else if li.is_negative() {
            if r_pos {
                (&li.upper, &ri.upper)
            } else {
                (&li.lower, &ri.upper)
            }
        } else if r_pos {
            (&li.upper, &ri.lower)
        } else {
            (&li.lower, &ri.upper)
        };
        let upper = un.divide(ud, p, RoundingMode::Up)?;

        let (ln, ld) = if li.is_positive() {
            if r_pos {
                (&li.lower, &ri.upper)
            } else {
                (&li.upper, &ri.upper)
            }
        } else if li.is_negative() {
            if r_pos {
                (&li.lower, &ri.lower)
            } else {
                (&li.upper, &ri.lower)
            }
        } else if r_pos {
            (&li.lower, &ri.lower)
        } else {
            (&li.upper, &ri.upper)
        };
        let lower = ln.divide(ld, p, RoundingMode::Down)?;

        Ok(Interval { lower, upper })
    }

    fn ipow_bounds(&mut self, i: usize, l: usize, r: usize) -> Result<Interval, Error> {
        // the exponent must resolve to a single integer value, so its
        // operand is refined all the way to the cap first
        let rp = self.nodes[r].precision;
        if rp < self.max_precision {
            self.advance_node_n(r, self.max_precision - rp)?;
        }
        let ri = &self.nodes[r].interval;
        if ri.lower != ri.upper || !ri.lower.is_integer() {
            return Err(Error::NonIntegralExponent);
        }
        if ri.upper.sign().is_negative() && !ri.upper.is_zero() {
            return Err(Error::NegativeIntegerExponent);
        }
        let exp = ri.upper.clone();

        let mut ed: Vec<Digit> = exp.digits().to_vec();
        ed.resize(exp.exponent().max(ed.len() as Exponent) as usize, 0);
        let even = div_int_by_digit(&ed, 2).1 == 0;

        let li = self.nodes[l].interval.clone();
        let (lower, upper) = if li.is_positive() {
            (li.lower.int_pow(&exp), li.upper.int_pow(&exp))
        } else if li.is_negative() {
            if even {
                (li.upper.int_pow(&exp), li.lower.int_pow(&exp))
            } else {
                (li.lower.int_pow(&exp), li.upper.int_pow(&exp))
            }
        } else if even {
            let m = if li.upper.abs_cmp(&li.lower) == core::cmp::Ordering::Greater {
                &li.upper
            } else {
                &li.lower
            };
            (DigitNumber::zero(), m.int_pow(&exp))
        } else {
            (li.lower.int_pow(&exp), li.upper.int_pow(&exp))
        };
        Ok(Interval { lower, upper })
    }

    fn log_bounds(&mut self, i: usize, l: usize) -> Result<Interval, Error> {
        {
            let up = &self.nodes[l].interval.upper;
            if up.is_zero() || up.sign().is_negative() {
                return Err(Error::LogDomain);
            }
        }
        // a lower bound at or below zero may only be a too-coarse
        // enclosure; refine until it rises above zero or the cap is hit
        loop {
            let lo = &self.nodes[l].interval.lower;
            if lo.sign().is_positive() && !lo.is_zero() {
                break;
            }
            if self.nodes[i].precision >= self.max_precision {
                return Err(Error::LogDomain);
            }
            self.advance_node(l)?;
            self.nodes[i].precision += 1;
        }

        let p = self.nodes[i].precision;
        let (ll, lh) = self.widened(l, p);
        Ok(Interval {
            lower: ops::log(&ll, p, RoundingMode::Down)?,
            upper: ops::log(&lh, p, RoundingMode::Up)?,
        })
    }

    fn sin_bounds(&self, i: usize, l: usize) -> Result<Interval, Error> {
        let p = self.nodes[i].precision;
        let (ll, lh) = self.widened(l, p);
        let (sin_lo, cos_lo) = ops::sin_cos(&ll, p, RoundingMode::Down)?;
        let (sin_hi, cos_hi) = ops::sin_cos(&lh, p, RoundingMode::Up)?;

        Ok(if cos_lo.sign() == cos_hi.sign() {
            // the derivative keeps its sign: monotone over the interval
            sorted(sin_lo, sin_hi)
        } else if cos_lo.sign().is_positive() {
            // rising into a local maximum
            Interval {
                lower: sin_lo.min(sin_hi),
                upper: ONE.clone(),
            }
        } else {
            Interval {
                lower: ONE.neg(),
                upper: sin_lo.max(sin_hi),
            }
        })
    }

    fn cos_bounds(&self, i: usize, l: usize) -> Result<Interval, Error> {
        let p = self.nodes[i].precision;
        let (ll, lh) = self.widened(l, p);
        let (sin_lo, cos_lo) = ops::sin_cos(&ll, p, RoundingMode::Down)?;
        let (sin_hi, cos_hi) = ops::sin_cos(&lh, p, RoundingMode::Up)?;

        Ok(if sin_lo.sign() == sin_hi.sign() {
            sorted(cos_lo, cos_hi)
        } else if sin_lo.sign().is_negative() {
            // the derivative -sin rises through a local maximum
            Interval {
                lower: cos_lo.min(cos_hi),
                upper: ONE.clone(),
            }
        } else {
            Interval {
                lower: ONE.neg(),
                upper: cos_lo.max(cos_hi),
            }
        })
    }

    fn tan_cot_bounds(&mut self, i: usize, l: usize, op: Op) -> Result<Interval, Error> {
        loop {
            let p = self.nodes[i].precision;
            let (ll, lh) = self.widened(l, p);
            let (sl, cl) = ops::sin_cos(&ll, p, RoundingMode::Down)?;
            let (sh, ch) = ops::sin_cos(&lh, p, RoundingMode::Up)?;

            let (dl, dh) = if op == Op::Tan { (&cl, &ch) } else { (&sl, &sh) };
            if dl.sign() != dh.sign() || dl.is_zero() || dh.is_zero() {
                // a pole or extremum may hide in the interval
                if self.nodes[i].precision >= self.max_precision {
                    return Err(Error::MaxPrecisionTrig);
                }
                self.advance_node(l)?;
                self.nodes[i].precision += 1;
                continue;
            }

            return Ok(if op == Op::Tan {
                // tangent is increasing wherever it is defined
                Interval {
                    lower: sl.divide(&cl, p, RoundingMode::Down)?,
                    upper: sh.divide(&ch, p, RoundingMode::Up)?,
                }
            } else {
                // cotangent is decreasing
                Interval {
                    lower: ch.divide(&sh, p, RoundingMode::Down)?,
                    upper: cl.divide(&sl, p, RoundingMode::Up)?,
                }
            });
        }
    }

    fn sec_csc_bounds(&mut self, i: usize, l: usize, op: Op) -> Result<Interval, Error> {
        loop {
            let p = self.nodes[i].precision;
            let (ll, lh) = self.widened(l, p);
            let (sl, cl) = ops::sin_cos(&ll, p, RoundingMode::Down)?;
            let (sh, ch) = ops::sin_cos(&lh, p, RoundingMode::Up)?;

            let (dl, dh) = if op == Op::Sec { (&cl, &ch) } else { (&sl, &sh) };
            if dl.sign() != dh.sign() || dl.is_zero() || dh.is_zero() {
                if self.nodes[i].precision >= self.max_precision {
                    return Err(Error::MaxPrecisionTrig);
                }
                self.advance_node(l)?;
                self.nodes[i].precision += 1;
                continue;
            }

            // reciprocal of the nonzero endpoint values; a derivative sign
            // change pins the enclosure to the extremum +-1 instead
            let (na, nb, extremum_sign_pos, deriv_a, deriv_b) = if op == Op::Sec {
                (&cl, &ch, cl.sign().is_positive(), sl.sign(), sh.sign())
            } else {
                (&sl, &sh, sl.sign().is_positive(), cl.sign(), ch.sign())
            };

            return Ok(if deriv_a == deriv_b {
                let a_lo = ONE.divide(na, p, RoundingMode::Down)?;
                let a_hi = ONE.divide(na, p, RoundingMode::Up)?;
                let b_lo = ONE.divide(nb, p, RoundingMode::Down)?;
                let b_hi = ONE.divide(nb, p, RoundingMode::Up)?;
                Interval {
                    lower: a_lo.min(b_lo),
                    upper: a_hi.max(b_hi),
                }
            } else if extremum_sign_pos {
                let a = ONE.divide(na, p, RoundingMode::Up)?;
                let b = ONE.divide(nb, p, RoundingMode::Up)?;
                Interval {
                    lower: ONE.clone(),
                    upper: a.max(b),
                }
            } else {
                let a = ONE.divide(na, p, RoundingMode::Down)?;
                let b = ONE.divide(nb, p, RoundingMode::Down)?;
                Interval {
                    lower: a.min(b),
                    upper: ONE.neg(),
                }
            });
        }
    }
}

fn sorted(a: DigitNumber, b: DigitNumber) -> Interval {
    if a <= b {
        Interval { lower: a, upper: b }
    } else {
        Interval { lower: b, upper: a }
    }
}

fn build(
    term: &Arc<Term>,
    nodes: &mut Vec<IterNode>,
    memo: &mut HashMap<*const Term, usize>,
) -> usize {
    let ptr = Arc::as_ptr(term);
    if let Some(&i) = memo.get(&ptr) {
        return i;
    }
    let kind = match &**term {
        Term::Operation { op, lhs, rhs } => {
            let l = build(lhs, nodes, memo);
            let r = rhs.as_ref().map(|t| build(t, nodes, memo));
            IterKind::Operation {
                op: *op,
                lhs: l,
                rhs: r,
            }
        }
        _ => IterKind::Leaf(term.clone()),
    };
    let idx = nodes.len();
    nodes.push(IterNode {
        kind,
        precision: 1,
        interval: Interval::point(DigitNumber::zero()),
    });
    memo.insert(ptr, idx);
    idx
}
