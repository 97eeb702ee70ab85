//! Operator catalog
//!
//! Every operator the builder may choose, tagged with its arity, selection
//! weight, and declared input/output domain contracts. The registry is
//! constructed once at startup and shared read-only by all synthesis
//! requests.

use std::f32::consts::FRAC_PI_2;
use std::f32::consts::PI;

use crate::domain::Interval;
use crate::error::{Result, SynthError};
use crate::expression::BuildConfig;

/// Operator identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Random constant baked at build time.
    Const,
    /// X coordinate of the sample point.
    X,
    /// Y coordinate of the sample point.
    Y,
    Sin,
    Cos,
    Asin,
    Acos,
    Add,
    Sub,
    Mul,
    Pow,
}

/// A single operator in the catalog.
///
/// The two executable forms (array evaluation and GLSL emission) live in
/// the backends, indexed by `kind`; this struct only declares the shape.
#[derive(Debug, Clone)]
pub struct OperatorSpec {
    pub kind: OpKind,
    pub name: &'static str,
    pub arity: usize,
    /// Relative selection weight; 1 everywhere means uniform choice.
    /// Weight-0 operators are never chosen.
    pub weight: u32,
    /// Declared input contract per argument slot. Bounded intervals are
    /// enforced by rescaling the argument before the operator runs.
    pub inputs: &'static [Interval],
    /// Declared output contract, verified after the operator runs.
    pub output: Interval,
}

/// Arguments sine and cosine accept: a few periods either side of zero.
const TRIG_SPAN: Interval = Interval::new(-5.0, 5.0);
/// Inverse-trig domain.
const UNIT_SYM: Interval = Interval::new(-1.0, 1.0);
/// Strictly positive band for pow, clear of zero.
const POSITIVE: Interval = Interval::new(1e-3, 1.0);

const NO_INPUTS: &[Interval] = &[];
const TRIG_IN: &[Interval] = &[TRIG_SPAN];
const ARC_IN: &[Interval] = &[UNIT_SYM];
const ANY2: &[Interval] = &[Interval::ANY, Interval::ANY];
const POS2: &[Interval] = &[POSITIVE, POSITIVE];

/// Catalog of available operators.
#[derive(Debug, Clone)]
pub struct Registry {
    ops: Vec<OperatorSpec>,
}

impl Registry {
    /// The standard catalog: three terminals, four unary transcendentals,
    /// four binary arithmetic operators, uniformly weighted.
    pub fn standard() -> Self {
        Self::with_ops(vec![
            OperatorSpec {
                kind: OpKind::Const,
                name: "const",
                arity: 0,
                weight: 1,
                inputs: NO_INPUTS,
                output: Interval::UNIT,
            },
            OperatorSpec {
                kind: OpKind::X,
                name: "x",
                arity: 0,
                weight: 1,
                inputs: NO_INPUTS,
                output: Interval::ANY,
            },
            OperatorSpec {
                kind: OpKind::Y,
                name: "y",
                arity: 0,
                weight: 1,
                inputs: NO_INPUTS,
                output: Interval::ANY,
            },
            OperatorSpec {
                kind: OpKind::Sin,
                name: "sin",
                arity: 1,
                weight: 1,
                inputs: TRIG_IN,
                output: UNIT_SYM,
            },
            OperatorSpec {
                kind: OpKind::Cos,
                name: "cos",
                arity: 1,
                weight: 1,
                inputs: TRIG_IN,
                output: UNIT_SYM,
            },
            OperatorSpec {
                kind: OpKind::Asin,
                name: "asin",
                arity: 1,
                weight: 1,
                inputs: ARC_IN,
                output: Interval::new(-FRAC_PI_2, FRAC_PI_2),
            },
            OperatorSpec {
                kind: OpKind::Acos,
                name: "acos",
                arity: 1,
                weight: 1,
                inputs: ARC_IN,
                output: Interval::new(0.0, PI),
            },
            OperatorSpec {
                kind: OpKind::Add,
                name: "add",
                arity: 2,
                weight: 1,
                inputs: ANY2,
                output: Interval::ANY,
            },
            OperatorSpec {
                kind: OpKind::Sub,
                name: "sub",
                arity: 2,
                weight: 1,
                inputs: ANY2,
                output: Interval::ANY,
            },
            OperatorSpec {
                kind: OpKind::Mul,
                name: "mul",
                arity: 2,
                weight: 1,
                inputs: ANY2,
                output: Interval::ANY,
            },
            OperatorSpec {
                kind: OpKind::Pow,
                name: "pow",
                arity: 2,
                weight: 1,
                inputs: POS2,
                output: Interval::UNIT,
            },
        ])
    }

    /// Build a registry from an explicit operator list.
    pub fn with_ops(ops: Vec<OperatorSpec>) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> &[OperatorSpec] {
        &self.ops
    }

    /// Look up the spec for an operator kind.
    pub fn spec(&self, kind: OpKind) -> Result<&OperatorSpec> {
        self.ops
            .iter()
            .find(|s| s.kind == kind)
            .ok_or(SynthError::UnknownOperator(kind_name(kind)))
    }

    /// Operators choosable at `depth` under `config`: terminals once
    /// `depth >= depth_min`, non-terminals while `depth < depth_max`.
    ///
    /// An empty result is a registry/config mismatch and fails fast rather
    /// than returning an empty set.
    pub fn eligible(&self, depth: u32, config: &BuildConfig) -> Result<Vec<&OperatorSpec>> {
        let out: Vec<&OperatorSpec> = self
            .ops
            .iter()
            .filter(|s| s.weight > 0)
            .filter(|s| {
                (s.arity == 0 && depth >= config.depth_min)
                    || (s.arity > 0 && depth < config.depth_max)
            })
            .collect();
        if out.is_empty() {
            return Err(SynthError::NoEligibleOperator {
                depth,
                depth_min: config.depth_min,
                depth_max: config.depth_max,
            });
        }
        Ok(out)
    }

    /// Check that every depth the builder can reach has at least one
    /// eligible operator. A failure here is a static configuration mistake,
    /// surfaced before any tree is built.
    pub fn validate(&self, config: &BuildConfig) -> Result<()> {
        for depth in 0..=config.depth_max {
            self.eligible(depth, config)?;
        }
        tracing::trace!(
            ops = self.ops.len(),
            depth_min = config.depth_min,
            depth_max = config.depth_max,
            "registry validated"
        );
        Ok(())
    }
}

fn kind_name(kind: OpKind) -> &'static str {
    match kind {
        OpKind::Const => "const",
        OpKind::X => "x",
        OpKind::Y => "y",
        OpKind::Sin => "sin",
        OpKind::Cos => "cos",
        OpKind::Asin => "asin",
        OpKind::Acos => "acos",
        OpKind::Add => "add",
        OpKind::Sub => "sub",
        OpKind::Mul => "mul",
        OpKind::Pow => "pow",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_arities() {
        let reg = Registry::standard();
        for spec in reg.ops() {
            assert_eq!(spec.inputs.len(), spec.arity, "op {}", spec.name);
        }
    }

    #[test]
    fn test_eligible_below_depth_min_excludes_terminals() {
        let reg = Registry::standard();
        let config = BuildConfig::new(2, 4).unwrap();
        let ops = reg.eligible(0, &config).unwrap();
        assert!(ops.iter().all(|s| s.arity > 0));
    }

    #[test]
    fn test_eligible_at_depth_max_is_terminal_only() {
        let reg = Registry::standard();
        let config = BuildConfig::new(2, 4).unwrap();
        let ops = reg.eligible(4, &config).unwrap();
        assert!(ops.iter().all(|s| s.arity == 0));
    }

    #[test]
    fn test_validate_rejects_terminal_free_registry() {
        let reg = Registry::with_ops(vec![OperatorSpec {
            kind: OpKind::Add,
            name: "add",
            arity: 2,
            weight: 1,
            inputs: ANY2,
            output: Interval::ANY,
        }]);
        let config = BuildConfig::new(0, 3).unwrap();
        match reg.validate(&config) {
            Err(SynthError::NoEligibleOperator { depth, .. }) => assert_eq!(depth, 3),
            other => panic!("expected NoEligibleOperator, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_weight_is_never_eligible() {
        let reg = Registry::with_ops(vec![
            OperatorSpec {
                kind: OpKind::Const,
                name: "const",
                arity: 0,
                weight: 1,
                inputs: NO_INPUTS,
                output: Interval::UNIT,
            },
            OperatorSpec {
                kind: OpKind::Add,
                name: "add",
                arity: 2,
                weight: 0,
                inputs: ANY2,
                output: Interval::ANY,
            },
        ]);
        let config = BuildConfig::new(0, 3).unwrap();
        let ops = reg.eligible(0, &config).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].kind, OpKind::Const);
    }
}
