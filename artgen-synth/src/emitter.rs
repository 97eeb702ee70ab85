//! GLSL program emission backend
//!
//! The same post-order traversal as field evaluation, but each operator
//! interpolates its children's already-emitted strings into an expression
//! template instead of applying math to arrays. The root expression is then
//! wrapped in a complete fragment shader (coordinate varying, time uniform,
//! cosine palette, entry point) alongside a fixed vertex shader.
//!
//! A fragment shader evaluates pointwise and cannot observe the field's
//! min/max, so the emitted forms guard their domains with `clamp` and
//! period wrapping rather than observed-range rescaling; the declared
//! output contract per operator is the same as the field form's.

use std::fmt::Write;

use rand::Rng;

use crate::error::{Result, SynthError};
use crate::expression::{build, BuildConfig, ExecBackend, ExprNode};
use crate::registry::{OpKind, Registry};

/// Fixed vertex shader paired with every emitted fragment program.
pub const VERTEX_SHADER: &str = "\
varying vec2 vUv;
void main() {
    vUv = uv;
    gl_Position = projectionMatrix * modelViewMatrix * vec4(position, 1.0);
}
";

/// A complete emitted shader pair.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    /// The synthesized root expression, before palette mapping.
    pub expression: String,
    /// Full fragment shader source.
    pub fragment: String,
    /// Fixed vertex shader source.
    pub vertex: String,
}

/// Text-execution backend: one GLSL sub-expression per node.
pub struct GlslBackend;

impl ExecBackend for GlslBackend {
    type Value = String;

    fn apply(&mut self, node: &ExprNode, args: Vec<String>) -> Result<String> {
        Ok(match node.kind() {
            OpKind::Const => {
                let v = node.literal();
                if !v.is_finite() {
                    return Err(SynthError::NumericContract {
                        op: "const",
                        detail: format!("cannot emit non-finite literal {v}"),
                    });
                }
                format!("{v:.3}")
            }
            OpKind::X => "(vUv.x * 2.0 - 1.0)".to_string(),
            OpKind::Y => "(vUv.y * 2.0 - 1.0)".to_string(),
            // Total in GLSL; mod bounds the argument to one period so large
            // subtree values keep their precision.
            OpKind::Sin => format!("sin(mod({}, TWO_PI))", args[0]),
            OpKind::Cos => format!("cos(mod({}, TWO_PI))", args[0]),
            OpKind::Asin => format!("asin(clamp({}, -1.0, 1.0))", args[0]),
            OpKind::Acos => format!("acos(clamp({}, -1.0, 1.0))", args[0]),
            OpKind::Add => format!("({} + {})", args[0], args[1]),
            OpKind::Sub => format!("({} - {})", args[0], args[1]),
            OpKind::Mul => format!("({} * {})", args[0], args[1]),
            OpKind::Pow => format!(
                "pow(clamp(abs({}), 0.001, 1.0), clamp(abs({}), 0.001, 1.0))",
                args[0], args[1]
            ),
        })
    }
}

/// Emit the nested GLSL expression for a tree.
///
/// The result references `vUv` and the `TWO_PI` constant declared by the
/// surrounding program template; use [`emit_program`] for a standalone
/// shader.
pub fn emit(node: &ExprNode) -> Result<String> {
    node.execute(&mut GlslBackend)
}

/// Emit a tree as a complete fragment/vertex shader pair.
///
/// The twelve cosine-palette coefficients are drawn here and baked into the
/// source, so the program is fully fixed at emission time; only `u_time`
/// varies per frame on the renderer's side.
pub fn emit_program<R: Rng + ?Sized>(node: &ExprNode, rng: &mut R) -> Result<ShaderProgram> {
    let expression = emit(node)?;

    let mut coeffs = [0.0f32; 12];
    for c in &mut coeffs {
        *c = rng.random::<f32>();
    }
    let vec3 = |i: usize| {
        format!(
            "vec3({:.3}, {:.3}, {:.3})",
            coeffs[i],
            coeffs[i + 1],
            coeffs[i + 2]
        )
    };

    let mut fragment = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        fragment,
        "\
const float PI = 3.14159265359;
const float TWO_PI = PI * 2.0;
const float HALF_PI = PI * 0.5;

varying vec2 vUv;
uniform float u_time;

vec3 palette(in float t, in vec3 a, in vec3 b, in vec3 c, in vec3 d) {{
    return a + b * cos(6.283185 * (c * t + d));
}}

void main() {{
    float result = clamp({expr}, -1.0, 1.0) * 0.5 + 0.5;
    vec3 a = {a};
    vec3 b = {b};
    vec3 c = {c};
    vec3 d = {d};
    vec3 color = palette(result, a, b, c, d);
    gl_FragColor = vec4(color, 1.0);
}}
",
        expr = expression,
        a = vec3(0),
        b = vec3(3),
        c = vec3(6),
        d = vec3(9),
    );

    tracing::debug!(
        expression_len = expression.len(),
        "emitted shader program"
    );

    Ok(ShaderProgram {
        expression,
        fragment,
        vertex: VERTEX_SHADER.to_string(),
    })
}

/// Build a random tree and emit it as a complete shader pair in one call.
pub fn synthesize_program<R: Rng + ?Sized>(
    registry: &Registry,
    config: &BuildConfig,
    rng: &mut R,
) -> Result<ShaderProgram> {
    let tree = build(registry, config, rng)?;
    emit_program(&tree, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn emit_one(node: ExprNode) -> String {
        emit(&node).unwrap()
    }

    fn x() -> ExprNode {
        ExprNode::terminal(OpKind::X)
    }

    fn y() -> ExprNode {
        ExprNode::terminal(OpKind::Y)
    }

    #[test]
    fn test_terminal_templates() {
        assert_eq!(emit_one(x()), "(vUv.x * 2.0 - 1.0)");
        assert_eq!(emit_one(y()), "(vUv.y * 2.0 - 1.0)");
        assert_eq!(emit_one(ExprNode::constant(0.5)), "0.500");
    }

    #[test]
    fn test_unary_templates() {
        let cases = [
            (OpKind::Sin, "sin(mod("),
            (OpKind::Cos, "cos(mod("),
            (OpKind::Asin, "asin(clamp("),
            (OpKind::Acos, "acos(clamp("),
        ];
        for (kind, prefix) in cases {
            let out = emit_one(ExprNode::op(kind, vec![x()]));
            assert!(out.starts_with(prefix), "{kind:?}: {out}");
            assert!(balanced(&out), "{kind:?}: {out}");
        }
    }

    #[test]
    fn test_binary_templates() {
        let cases = [
            (OpKind::Add, " + "),
            (OpKind::Sub, " - "),
            (OpKind::Mul, " * "),
        ];
        for (kind, token) in cases {
            let out = emit_one(ExprNode::op(kind, vec![x(), y()]));
            assert!(out.contains(token), "{kind:?}: {out}");
            assert!(out.starts_with('(') && out.ends_with(')'), "{kind:?}: {out}");
            assert!(balanced(&out), "{kind:?}: {out}");
        }
    }

    #[test]
    fn test_pow_template_guards_both_arguments() {
        let out = emit_one(ExprNode::op(OpKind::Pow, vec![x(), y()]));
        assert!(out.starts_with("pow(clamp(abs("));
        assert_eq!(out.matches("clamp(abs(").count(), 2);
        assert!(balanced(&out));
    }

    #[test]
    fn test_non_finite_literal_is_rejected() {
        let err = emit(&ExprNode::constant(f32::NAN)).unwrap_err();
        assert!(matches!(err, SynthError::NumericContract { .. }));
    }

    #[test]
    fn test_every_operator_in_one_tree() {
        // sin(asin(x) + acos(y)) * pow(c, x) - cos(y) ... assembled so each
        // operator appears at least once, then checked for syntactic shape.
        let tree = ExprNode::op(
            OpKind::Sub,
            vec![
                ExprNode::op(
                    OpKind::Mul,
                    vec![
                        ExprNode::op(
                            OpKind::Sin,
                            vec![ExprNode::op(
                                OpKind::Add,
                                vec![
                                    ExprNode::op(OpKind::Asin, vec![x()]),
                                    ExprNode::op(OpKind::Acos, vec![y()]),
                                ],
                            )],
                        ),
                        ExprNode::op(OpKind::Pow, vec![ExprNode::constant(0.25), x()]),
                    ],
                ),
                ExprNode::op(OpKind::Cos, vec![y()]),
            ],
        );
        let out = emit(&tree).unwrap();
        assert!(balanced(&out));
        for token in ["sin(", "cos(", "asin(", "acos(", "pow(", "vUv.x", "vUv.y", "0.250"] {
            assert!(out.contains(token), "missing {token} in {out}");
        }
        for token in ["NaN", "inf"] {
            assert!(!out.contains(token));
        }
    }

    #[test]
    fn test_program_template() {
        let mut rng = Pcg32::seed_from_u64(3);
        let program = emit_program(&ExprNode::op(OpKind::Sin, vec![x()]), &mut rng).unwrap();
        for token in [
            "varying vec2 vUv;",
            "uniform float u_time;",
            "vec3 palette(",
            "const float TWO_PI",
            "gl_FragColor",
        ] {
            assert!(program.fragment.contains(token), "missing {token}");
        }
        assert!(program.fragment.contains(&program.expression));
        assert!(program.vertex.contains("gl_Position"));
        assert!(balanced(&program.fragment));
    }

    #[test]
    fn test_emission_is_pure() {
        let tree = ExprNode::op(OpKind::Add, vec![x(), ExprNode::constant(0.125)]);
        assert_eq!(emit(&tree).unwrap(), emit(&tree).unwrap());
    }

    fn balanced(s: &str) -> bool {
        let mut depth = 0i32;
        for c in s.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return false;
            }
        }
        depth == 0
    }
}
