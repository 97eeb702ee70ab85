//! Expression trees and the random builder
//!
//! A tree is assembled by repeatedly choosing an eligible operator for the
//! current depth, then recursing for each argument slot. Construction is
//! pure: given the same registry, config, and seeded rng, two builds
//! produce structurally identical trees.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::RescalePolicy;
use crate::error::{Result, SynthError};
use crate::registry::{OpKind, OperatorSpec, Registry};

/// Depth bounds and normalization policy for one synthesis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// No terminal may be chosen before this depth.
    pub depth_min: u32,
    /// No non-terminal may be chosen at or beyond this depth.
    pub depth_max: u32,
    /// How the final field is normalized for display.
    #[serde(default)]
    pub rescale_policy: RescalePolicy,
}

impl BuildConfig {
    pub fn new(depth_min: u32, depth_max: u32) -> Result<Self> {
        if depth_min > depth_max {
            return Err(SynthError::InvalidDepthBounds {
                depth_min,
                depth_max,
            });
        }
        Ok(Self {
            depth_min,
            depth_max,
            rescale_policy: RescalePolicy::default(),
        })
    }

    pub fn with_rescale_policy(mut self, policy: RescalePolicy) -> Self {
        self.rescale_policy = policy;
        self
    }
}

/// A node in a synthesized expression tree.
///
/// Owns exactly `arity` children; the tree is pure (no sharing, no back
/// references). `Const` nodes carry the literal drawn at build time so one
/// seed fixes the artifact for both backends.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    kind: OpKind,
    literal: f32,
    children: Vec<ExprNode>,
}

impl ExprNode {
    /// A `Const` terminal with its baked literal.
    pub fn constant(value: f32) -> Self {
        Self {
            kind: OpKind::Const,
            literal: value,
            children: Vec::new(),
        }
    }

    /// A payload-free terminal (`X`, `Y`).
    pub fn terminal(kind: OpKind) -> Self {
        Self {
            kind,
            literal: 0.0,
            children: Vec::new(),
        }
    }

    /// A non-terminal with its argument subtrees.
    pub fn op(kind: OpKind, children: Vec<ExprNode>) -> Self {
        Self {
            kind,
            literal: 0.0,
            children,
        }
    }

    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// Baked literal of a `Const` node; 0.0 for every other kind.
    pub fn literal(&self) -> f32 {
        self.literal
    }

    pub fn children(&self) -> &[ExprNode] {
        &self.children
    }

    /// Total node count.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ExprNode::count).sum::<usize>()
    }

    /// Depth of the deepest leaf, root at 0.
    pub fn max_depth(&self) -> u32 {
        self.children
            .iter()
            .map(|c| c.max_depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Depth of the shallowest leaf, root at 0.
    pub fn min_leaf_depth(&self) -> u32 {
        self.children
            .iter()
            .map(|c| c.min_leaf_depth() + 1)
            .min()
            .unwrap_or(0)
    }

    pub fn contains(&self, kind: OpKind) -> bool {
        self.kind == kind || self.children.iter().any(|c| c.contains(kind))
    }

    /// Post-order execution against a backend: children first, then this
    /// node's operator over their results.
    pub fn execute<B: ExecBackend>(&self, backend: &mut B) -> Result<B::Value> {
        let args = self
            .children
            .iter()
            .map(|c| c.execute(backend))
            .collect::<Result<Vec<_>>>()?;
        backend.apply(self, args)
    }
}

/// One execution medium for a synthesized tree.
///
/// The field evaluator and the program emitter are parallel interpretations
/// of the same grammar; each implements this over its own value type
/// (scalar arrays or GLSL sub-expressions).
pub trait ExecBackend {
    type Value;

    /// Execute one operator over its already-executed argument values.
    fn apply(&mut self, node: &ExprNode, args: Vec<Self::Value>) -> Result<Self::Value>;
}

/// Build a random expression tree honoring the config's depth bounds.
///
/// The registry is validated for every reachable depth first, so a
/// misconfigured catalog fails before any node is constructed.
pub fn build<R: Rng + ?Sized>(
    registry: &Registry,
    config: &BuildConfig,
    rng: &mut R,
) -> Result<ExprNode> {
    registry.validate(config)?;
    let root = build_at(registry, config, 0, rng)?;
    tracing::debug!(
        nodes = root.count(),
        depth = root.max_depth(),
        "built expression tree"
    );
    Ok(root)
}

fn build_at<R: Rng + ?Sized>(
    registry: &Registry,
    config: &BuildConfig,
    depth: u32,
    rng: &mut R,
) -> Result<ExprNode> {
    let eligible = registry.eligible(depth, config)?;
    let spec = pick_weighted(&eligible, rng);

    if spec.arity == 0 {
        return Ok(match spec.kind {
            OpKind::Const => ExprNode::constant(rng.random::<f32>()),
            kind => ExprNode::terminal(kind),
        });
    }

    let children = (0..spec.arity)
        .map(|_| build_at(registry, config, depth + 1, rng))
        .collect::<Result<Vec<_>>>()?;
    Ok(ExprNode::op(spec.kind, children))
}

/// Cumulative-weight choice. `eligible` filters out weight-0 specs, so the
/// total is always positive here.
fn pick_weighted<'a, R: Rng + ?Sized>(
    specs: &[&'a OperatorSpec],
    rng: &mut R,
) -> &'a OperatorSpec {
    let total: u32 = specs.iter().map(|s| s.weight).sum();
    let mut roll = rng.random_range(0..total);
    for spec in specs {
        if roll < spec.weight {
            return spec;
        }
        roll -= spec.weight;
    }
    specs[specs.len() - 1]
}
