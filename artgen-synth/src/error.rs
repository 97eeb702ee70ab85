#[derive(Debug, Clone, thiserror::Error)]
pub enum SynthError {
    #[error("invalid depth bounds: depth_min {depth_min} exceeds depth_max {depth_max}")]
    InvalidDepthBounds { depth_min: u32, depth_max: u32 },

    #[error("no eligible operator at depth {depth} (bounds {depth_min}..={depth_max})")]
    NoEligibleOperator {
        depth: u32,
        depth_min: u32,
        depth_max: u32,
    },

    #[error("operator {0} is not in the registry")]
    UnknownOperator(&'static str),

    #[error("numeric contract violation in {op}: {detail}")]
    NumericContract { op: &'static str, detail: String },
}

pub type Result<T> = std::result::Result<T, SynthError>;
