/// One embeddable C runtime helper: its source text and the names of the
/// other helpers it references (SPEC_FULL §4.4 phase 4, §10).
///
/// `depends_on` entries are resolved transitively by [`crate::HelperRegistry::resolve`]
/// so codegen only has to ask for the helpers it calls directly.
#[derive(Debug, Clone, Copy)]
pub struct HelperDef {
    pub c_source: &'static str,
    pub depends_on: &'static [&'static str],
}

impl HelperDef {
    pub const fn new(c_source: &'static str) -> Self {
        HelperDef { c_source, depends_on: &[] }
    }

    pub const fn with_deps(c_source: &'static str, depends_on: &'static [&'static str]) -> Self {
        HelperDef { c_source, depends_on }
    }
}
