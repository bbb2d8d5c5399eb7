use slc_ast::{TypeExpr, TypeMap};
use slc_analyzer::{ClassInfo, FunctionInfo};
use slc_runtime::HelperRegistry;
use std::collections::{HashMap, HashSet};

/// Side tables plus the growing output buffer, threaded through every
/// emission phase (SPEC_FULL §4.4; grounded on the teacher's single
/// big-context-struct `codegen_ast/core/structs.rs::ASTCodeGen`).
pub struct CCodeGen {
    pub class_table: HashMap<String, ClassInfo>,
    pub class_names: HashSet<String>,
    pub function_table: HashMap<String, FunctionInfo>,
    pub generic_instances: HashMap<String, Vec<Vec<TypeExpr>>>,
    pub node_types: TypeMap,
    pub output: Vec<String>,
    pub indent: usize,
    pub debug: bool,
    pub source_file: String,
    pub current_class: Option<String>,
    pub in_constructor: bool,
    pub lambda_defs: Vec<String>,
    pub lambda_counter: u32,
    pub registry: HelperRegistry,
    pub emitted_helpers: HashSet<&'static str>,
    pub user_includes: HashSet<String>,
    pub tmp_counter: u32,
}

impl CCodeGen {
    pub fn new(
        class_table: HashMap<String, ClassInfo>,
        function_table: HashMap<String, FunctionInfo>,
        generic_instances: HashMap<String, Vec<Vec<TypeExpr>>>,
        node_types: TypeMap,
        debug: bool,
        source_file: String,
    ) -> Self {
        let class_names = class_table.keys().cloned().collect();
        CCodeGen {
            class_table,
            class_names,
            function_table,
            generic_instances,
            node_types,
            output: Vec::new(),
            indent: 0,
            debug,
            source_file,
            current_class: None,
            in_constructor: false,
            lambda_defs: Vec::new(),
            lambda_counter: 0,
            registry: HelperRegistry::new(),
            emitted_helpers: HashSet::new(),
            user_includes: HashSet::new(),
            tmp_counter: 0,
        }
    }

    pub fn emit(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        if line.is_empty() {
            self.output.push(String::new());
        } else {
            self.output.push(format!("{}{}", "    ".repeat(self.indent), line));
        }
    }

    pub fn emit_blank(&mut self) {
        self.output.push(String::new());
    }

    pub fn emit_raw(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    pub fn emit_line_directive(&mut self, line: usize) {
        if self.debug && line > 0 {
            self.emit_raw(format!("#line {line} \"{}\"", self.source_file));
        }
    }

    pub fn finish(self) -> String {
        let mut text = self.output.join("\n");
        text.push('\n');
        text
    }

    pub fn type_to_c(&self, ty: &TypeExpr) -> String {
        crate::mangle::type_to_c(ty, &self.class_names)
    }

    /// Like [`Self::type_to_c`], but appends the pointer star every
    /// `List`/`Map`/`Set` instance needs once it is actually stored
    /// somewhere (a variable, a struct field, a parameter, a return type) —
    /// every container-family helper (`_new`, `_push`, `_put`, ...) takes
    /// and returns a pointer to the struct, never the struct by value.
    /// `type_to_c` itself must stay bare because it doubles as the
    /// `{c_type}_new`/`{c_type}_push` name prefix; this wrapper is for call
    /// sites that declare storage rather than build a helper name. `Array`
    /// and `Tuple` are excluded: neither has a `_new` helper, both are
    /// plain value types (an `Array` is indexed with raw `.data[i]`, never
    /// through a helper call).
    pub fn c_storage_type(&self, ty: &TypeExpr) -> String {
        let c_type = self.type_to_c(ty);
        if matches!(ty.base.as_str(), "List" | "Map" | "Set") {
            format!("{c_type}*")
        } else {
            c_type
        }
    }

    pub fn mangle(&self, ty: &TypeExpr) -> String {
        crate::mangle::mangle_type(ty)
    }

    /// `->` if a value of this type is reached through a C pointer, `.`
    /// otherwise. Class instances carry `pointer_depth > 0` straight from
    /// the AST; `List`/`Map`/`Set` never do (their `pointer_depth` only
    /// tracks explicit `T*` syntax) even though [`Self::c_storage_type`]
    /// always declares their storage as a pointer, so those three bases are
    /// checked directly alongside the pointer_depth check. `Array` is a
    /// value type and deliberately excluded.
    pub fn member_sep(&self, ty: &TypeExpr) -> &'static str {
        if ty.pointer_depth > 0 || matches!(ty.base.as_str(), "List" | "Map" | "Set") {
            "->"
        } else {
            "."
        }
    }

    /// Emits a runtime helper's C source exactly once, pulling in its
    /// transitive dependencies first (SPEC_FULL §4.4 "every runtime helper
    /// is emitted at most once; helper dependencies are respected").
    pub fn emit_helper(&mut self, name: &str) {
        for resolved in self.registry.resolve(&[name]) {
            if self.emitted_helpers.insert(resolved) {
                if let Some(def) = self.registry.get(resolved) {
                    for line in def.c_source.lines() {
                        self.emit_raw(line.to_string());
                    }
                    self.emit_blank();
                }
            }
        }
    }
}
