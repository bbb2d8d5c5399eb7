//! Semantic analysis: two passes over a [`slc_ast::Program`] that build
//! symbol tables, resolve types, enforce access control, validate `self`
//! usage, collect generic instantiations for monomorphization, and check
//! return-exhaustiveness/unreachable-code/loop-nesting (SPEC_FULL §4.3).
//!
//! Semantic findings accumulate in a [`slc_diagnostics::DiagnosticEngine`]
//! rather than aborting on the first one; only a genuine host-level failure
//! (there currently are none) would produce an [`AnalyzeError`].

mod analyzer;
mod class_table;
mod generics;
mod infer;
mod scope;

pub use class_table::{ClassInfo, FunctionInfo};
pub use scope::SymbolInfo;

use slc_ast::{Program, TypeExpr, TypeMap};
use slc_diagnostics::DiagnosticEngine;
use std::collections::HashMap;
use thiserror::Error;

/// The sole host-level failure this crate can produce. Semantic findings
/// about the *input program* are never represented this way — they live in
/// `AnalyzedProgram::diagnostics` regardless of how many there are.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("internal analyzer invariant violated: {0}")]
    Internal(String),
}

/// The result of analysis: the (possibly AST-mutated) program, side tables
/// codegen reads, and the accumulated diagnostics engine. Callers check
/// `diagnostics.has_errors()` before proceeding to codegen (SPEC_FULL §7).
pub struct AnalyzedProgram {
    pub program: Program,
    pub class_table: HashMap<String, ClassInfo>,
    pub function_table: HashMap<String, FunctionInfo>,
    pub generic_instances: HashMap<String, Vec<Vec<TypeExpr>>>,
    pub node_types: TypeMap,
    pub diagnostics: DiagnosticEngine,
}

pub fn analyze(program: Program) -> Result<AnalyzedProgram, AnalyzeError> {
    analyzer::Analyzer::new().analyze(program)
}
