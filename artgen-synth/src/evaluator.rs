//! Field evaluation backend
//!
//! Executes a tree over a coordinate grid, producing one scalar per cell.
//! Arguments to every bounded-domain operator are rescaled into the
//! operator's declared input interval first, and each operator's output is
//! verified against its declared contract, so a randomly assembled tree
//! cannot diverge (log of zero, arcsin out of domain, overflow). A contract
//! violation here means the guard logic itself is wrong and aborts the
//! whole attempt.

use rand::Rng;

use crate::domain::rescale;
use crate::error::{Result, SynthError};
use crate::expression::{build, BuildConfig, ExecBackend, ExprNode};
use crate::grid::{Field, Grid};
use crate::registry::{OpKind, Registry};

/// Slack for verifying outputs against declared intervals.
const CONTRACT_TOLERANCE: f32 = 1e-4;

/// Array-execution backend over a fixed grid.
pub struct FieldBackend<'a> {
    registry: &'a Registry,
    grid: &'a Grid,
}

impl<'a> FieldBackend<'a> {
    pub fn new(registry: &'a Registry, grid: &'a Grid) -> Self {
        Self { registry, grid }
    }

    fn check_contract(&self, kind: OpKind, values: &[f32]) -> Result<()> {
        let spec = self.registry.spec(kind)?;
        for &v in values {
            if !v.is_finite() {
                return Err(SynthError::NumericContract {
                    op: spec.name,
                    detail: format!("produced non-finite value {v}"),
                });
            }
            if spec.output.is_bounded() && !spec.output.contains(v, CONTRACT_TOLERANCE) {
                return Err(SynthError::NumericContract {
                    op: spec.name,
                    detail: format!(
                        "value {v} outside declared output [{}, {}]",
                        spec.output.lo, spec.output.hi
                    ),
                });
            }
        }
        Ok(())
    }
}

impl ExecBackend for FieldBackend<'_> {
    type Value = Vec<f32>;

    fn apply(&mut self, node: &ExprNode, args: Vec<Vec<f32>>) -> Result<Vec<f32>> {
        let kind = node.kind();
        let out = match kind {
            OpKind::Const => vec![node.literal(); self.grid.len()],
            OpKind::X => self.grid.xs().to_vec(),
            OpKind::Y => self.grid.ys().to_vec(),
            _ => {
                let spec = self.registry.spec(kind)?;
                debug_assert_eq!(args.len(), spec.arity);
                // Pre-rescale each argument into its declared interval.
                let mut scaled = Vec::with_capacity(args.len());
                for (arg, &contract) in args.into_iter().zip(spec.inputs) {
                    scaled.push(if contract.is_bounded() {
                        rescale(&arg, contract)
                    } else {
                        arg
                    });
                }
                match kind {
                    OpKind::Sin => unary(&scaled[0], f32::sin),
                    OpKind::Cos => unary(&scaled[0], f32::cos),
                    OpKind::Asin => unary(&scaled[0], f32::asin),
                    OpKind::Acos => unary(&scaled[0], f32::acos),
                    OpKind::Add => binary(&scaled[0], &scaled[1], |a, b| a + b),
                    OpKind::Sub => binary(&scaled[0], &scaled[1], |a, b| a - b),
                    OpKind::Mul => binary(&scaled[0], &scaled[1], |a, b| a * b),
                    OpKind::Pow => binary(&scaled[0], &scaled[1], f32::powf),
                    OpKind::Const | OpKind::X | OpKind::Y => unreachable!(),
                }
            }
        };
        self.check_contract(kind, &out)?;
        Ok(out)
    }
}

fn unary(a: &[f32], f: fn(f32) -> f32) -> Vec<f32> {
    a.iter().map(|&v| f(v)).collect()
}

fn binary(a: &[f32], b: &[f32], f: fn(f32, f32) -> f32) -> Vec<f32> {
    a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
}

/// Evaluate an already-built tree over a grid.
pub fn evaluate(registry: &Registry, node: &ExprNode, grid: &Grid) -> Result<Field> {
    let mut backend = FieldBackend::new(registry, grid);
    let values = node.execute(&mut backend)?;
    Ok(Field::new(grid.width(), grid.height(), values))
}

/// Build a random tree and evaluate it over `grid` in one call.
///
/// The returned field is raw (not yet normalized for display); a numeric
/// contract violation fails the whole attempt and the caller may retry
/// with a new seed.
pub fn synthesize_field<R: Rng + ?Sized>(
    registry: &Registry,
    config: &BuildConfig,
    grid: &Grid,
    rng: &mut R,
) -> Result<Field> {
    let tree = build(registry, config, rng)?;
    evaluate(registry, &tree, grid)
}
