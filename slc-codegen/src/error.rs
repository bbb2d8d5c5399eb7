use thiserror::Error;

/// Host-level codegen failures: invariant violations against tables the
/// analyzer was supposed to have already populated. Never raised for
/// properties of the *input program* — those are semantic errors and stop
/// the pipeline before codegen ever runs (SPEC_FULL §7).
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("codegen: no registered class info for `{0}`")]
    UnknownClass(String),
    #[error("codegen: node {0:?} has no recorded type")]
    MissingNodeType(slc_ast::NodeId),
    #[error("codegen: internal invariant violated: {0}")]
    Internal(String),
}
