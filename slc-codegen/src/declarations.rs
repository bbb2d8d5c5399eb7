use crate::context::CCodeGen;
use slc_ast::{
    Access, ClassDecl, ClassMember, Declaration, EnumDecl, FunctionDecl, MethodDecl, Param,
    PropertyDecl, Program, StructDecl, TypedefDecl,
};
use slc_analyzer::ClassInfo;

fn param_to_c(gen: &CCodeGen, p: &Param) -> String {
    let c_type = gen.c_storage_type(&p.ty);
    let suffix = if p.ty.array_size.is_some() {
        "[]".to_string()
    } else if p.ty.is_array && p.ty.generic_args.is_empty() {
        "[]".to_string()
    } else {
        String::new()
    };
    format!("{c_type} {}{suffix}", p.name)
}

impl CCodeGen {
    /// Phase 10: globals and enums, emitted before lambda splicing so
    /// lambdas (and everything after) can reference them.
    pub fn emit_globals_and_enums(&mut self, program: &Program) {
        for decl in &program.declarations {
            match decl {
                Declaration::TopLevelVar(_) | Declaration::Enum(_) => self.emit_decl(decl),
                _ => {}
            }
        }
    }

    /// Phase 11: forward-declare top-level functions so mutual recursion
    /// across free functions works without manual ordering.
    pub fn emit_function_forward_declarations(&mut self, program: &Program) {
        let mut any = false;
        for decl in &program.declarations {
            if let Declaration::Function(f) = decl {
                if f.body.is_none() || f.name == "main" {
                    continue;
                }
                let uses_struct = f.params.iter().any(|p| p.ty.base.starts_with("struct "))
                    || f.return_type.base.starts_with("struct ");
                if uses_struct {
                    continue;
                }
                let ret_type = self.c_storage_type(&f.return_type);
                let params: Vec<String> = f.params.iter().map(|p| param_to_c(self, p)).collect();
                let params_str = if params.is_empty() { "void".to_string() } else { params.join(", ") };
                self.emit(format!("{ret_type} {}({params_str});", f.name));
                any = true;
            }
        }
        if any {
            self.emit_blank();
        }
    }

    /// Phase 13: everything else — classes, free functions, GPU stubs,
    /// and raw struct/enum/typedef passthrough. Skips anything already
    /// emitted as a phase-10 global/enum.
    pub fn emit_declarations(&mut self, program: &Program) {
        for decl in &program.declarations {
            if matches!(decl, Declaration::TopLevelVar(_) | Declaration::Enum(_)) {
                continue;
            }
            self.emit_decl(decl);
        }
    }

    fn emit_decl(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Preprocessor(p) => self.emit_raw(p.text.clone()),
            Declaration::Class(c) => self.emit_class(c),
            Declaration::Function(f) if f.is_gpu => self.emit_gpu_function(f),
            Declaration::Function(f) => self.emit_function(f),
            Declaration::TopLevelVar(v) => self.emit_var_decl_top(v),
            Declaration::Struct(s) => self.emit_struct_decl(s),
            Declaration::Enum(e) => self.emit_enum_decl(e),
            Declaration::Typedef(t) => self.emit_typedef_decl(t),
        }
    }

    fn emit_var_decl_top(&mut self, v: &slc_ast::VarDeclStmt) {
        self.emit_stmt(&slc_ast::Statement::VarDecl(v.clone()));
    }

    fn emit_class(&mut self, decl: &ClassDecl) {
        if !decl.generic_params.is_empty() {
            return;
        }
        let Some(cls) = self.class_table.get(&decl.name).cloned() else {
            return;
        };
        self.current_class = Some(decl.name.clone());

        let child_method_names: std::collections::HashSet<&str> = decl
            .members
            .iter()
            .filter_map(|m| match m {
                ClassMember::Method(m) => Some(m.name.as_str()),
                _ => None,
            })
            .collect();

        let mut methods_to_emit: Vec<MethodDecl> = Vec::new();
        if let Some(parent_name) = &decl.parent {
            if let Some(parent) = self.class_table.get(parent_name).cloned() {
                let mut names: Vec<&String> = parent.methods.keys().collect();
                names.sort();
                for mname in names {
                    if !child_method_names.contains(mname.as_str()) && mname != parent_name {
                        methods_to_emit.push(parent.methods[mname].clone());
                    }
                }
            }
        }
        for member in &decl.members {
            if let ClassMember::Method(m) = member {
                methods_to_emit.push(m.clone());
            }
        }

        for method in &methods_to_emit {
            self.emit_method_forward_decl(&decl.name, method);
        }
        for method in &methods_to_emit {
            self.emit_method(&decl.name, method, &cls);
        }

        for member in &decl.members {
            if let ClassMember::Property(p) = member {
                self.emit_property_accessors(&decl.name, p);
            }
        }

        // A class with no explicit constructor still needs a `{name}_new`
        // to exist for `new {name}()` call sites, whether or not it has any
        // fields to default-initialize.
        let has_explicit_constructor = cls.constructor.is_some();
        if !has_explicit_constructor {
            self.emit_default_constructor(&decl.name, decl, &cls);
        }

        self.emit_destroy_function(&decl.name, &cls);
        self.current_class = None;
    }

    fn emit_method_forward_decl(&mut self, class_name: &str, method: &MethodDecl) {
        let is_constructor = method.is_constructor(class_name);
        let is_static = method.access == Access::Class;
        let (ret_type, func_name) = if is_constructor {
            (format!("{class_name}*"), format!("{class_name}_new"))
        } else {
            (self.c_storage_type(&method.return_type), format!("{class_name}_{}", method.name))
        };
        let mut params = Vec::new();
        if !is_static && !is_constructor {
            params.push(format!("{class_name}* self"));
        }
        for p in &method.params {
            params.push(param_to_c(self, p));
        }
        let params_str = if params.is_empty() { "void".to_string() } else { params.join(", ") };
        self.emit(format!("{ret_type} {func_name}({params_str});"));
    }

    fn emit_method(&mut self, class_name: &str, method: &MethodDecl, cls: &ClassInfo) {
        let is_constructor = method.is_constructor(class_name);
        let is_static = method.access == Access::Class;
        let (ret_type, func_name) = if is_constructor {
            (format!("{class_name}*"), format!("{class_name}_new"))
        } else {
            (self.c_storage_type(&method.return_type), format!("{class_name}_{}", method.name))
        };
        let mut params = Vec::new();
        if !is_static && !is_constructor {
            params.push(format!("{class_name}* self"));
        }
        for p in &method.params {
            params.push(param_to_c(self, p));
        }
        let params_str = if params.is_empty() { "void".to_string() } else { params.join(", ") };

        self.in_constructor = is_constructor;
        self.emit(format!("{ret_type} {func_name}({params_str}) {{"));
        self.indent += 1;
        if is_constructor {
            self.emit(format!("{class_name}* self = ({class_name}*)malloc(sizeof({class_name}));"));
            self.emit(format!("memset(self, 0, sizeof({class_name}));"));
            let mut names: Vec<&String> = cls.fields.keys().collect();
            names.sort();
            for fname in names {
                if let Some(init) = &cls.fields[fname].initializer {
                    let c = self.expr_to_c(init);
                    self.emit(format!("self->{fname} = {c};"));
                }
            }
            self.emit_block_contents(&method.body);
            self.emit("return self;");
        } else {
            self.emit_block_contents(&method.body);
        }
        self.indent -= 1;
        self.emit("}");
        self.emit_blank();
        self.in_constructor = false;
    }

    fn emit_default_constructor(&mut self, class_name: &str, decl: &ClassDecl, cls: &ClassInfo) {
        self.emit(format!("{class_name}* {class_name}_new(void) {{"));
        self.indent += 1;
        self.emit(format!("{class_name}* self = ({class_name}*)malloc(sizeof({class_name}));"));
        self.emit(format!("memset(self, 0, sizeof({class_name}));"));

        if let Some(parent_name) = &decl.parent {
            if let Some(parent) = self.class_table.get(parent_name).cloned() {
                let child_field_names: std::collections::HashSet<&str> = decl
                    .members
                    .iter()
                    .filter_map(|m| match m {
                        ClassMember::Field(f) => Some(f.name.as_str()),
                        _ => None,
                    })
                    .collect();
                let mut names: Vec<&String> = parent.fields.keys().collect();
                names.sort();
                for fname in names {
                    if child_field_names.contains(fname.as_str()) {
                        continue;
                    }
                    if let Some(init) = parent.fields[fname].initializer.clone() {
                        self.emit_field_init(fname, &init, &parent.fields[fname].ty);
                    }
                }
            }
        }

        for member in &decl.members {
            if let ClassMember::Field(f) = member {
                if let Some(init) = f.initializer.clone() {
                    self.emit_field_init(&f.name, &init, &f.ty);
                }
            }
        }
        let _ = cls;

        self.emit("return self;");
        self.indent -= 1;
        self.emit("}");
        self.emit_blank();
    }

    fn emit_field_init(&mut self, field_name: &str, init: &slc_ast::Expression, ty: &slc_ast::TypeExpr) {
        use slc_ast::Expression;
        let is_collection_init = matches!(init, Expression::ListLiteral { .. } | Expression::MapLiteral { .. });
        let is_empty_brace = matches!(init, Expression::BraceInitializer { elements, .. } if elements.is_empty());
        if (is_collection_init || is_empty_brace) && matches!(ty.base.as_str(), "Map" | "List" | "Set") {
            let c_type = self.type_to_c(ty);
            self.emit(format!("self->{field_name} = {c_type}_new();"));
            match init {
                Expression::ListLiteral { elements, .. } => {
                    for el in elements {
                        let ev = self.expr_to_c(el);
                        let method = if ty.base == "Set" { "add" } else { "push" };
                        self.emit(format!("{c_type}_{method}(self->{field_name}, {ev});"));
                    }
                }
                Expression::MapLiteral { entries, .. } => {
                    for (k, v) in entries {
                        let kc = self.expr_to_c(k);
                        let vc = self.expr_to_c(v);
                        self.emit(format!("{c_type}_put(self->{field_name}, {kc}, {vc});"));
                    }
                }
                _ => {}
            }
        } else {
            let c = self.expr_to_c(init);
            self.emit(format!("self->{field_name} = {c};"));
        }
    }

    fn emit_property_accessors(&mut self, class_name: &str, prop: &PropertyDecl) {
        let c_type = self.c_storage_type(&prop.ty);
        let is_auto_getter = matches!(&prop.getter, Some(None));
        let is_auto_setter = matches!(&prop.setter, Some(None));

        if let Some(getter) = &prop.getter {
            self.emit(format!("{c_type} {class_name}_get_{}({class_name}* self) {{", prop.name));
            self.indent += 1;
            if is_auto_getter {
                self.emit(format!("return self->_{};", prop.name));
            } else if let Some(body) = getter {
                self.emit_block_contents(body);
            }
            self.indent -= 1;
            self.emit("}");
            self.emit_blank();
        }

        if let Some(setter) = &prop.setter {
            self.emit(format!("void {class_name}_set_{}({class_name}* self, {c_type} value) {{", prop.name));
            self.indent += 1;
            if is_auto_setter {
                self.emit(format!("self->_{} = value;", prop.name));
            } else if let Some(body) = setter {
                self.emit_block_contents(body);
            }
            self.indent -= 1;
            self.emit("}");
            self.emit_blank();
        }
    }

    fn emit_destroy_function(&mut self, class_name: &str, cls: &ClassInfo) {
        self.emit(format!("void {class_name}_destroy({class_name}* self) {{"));
        self.indent += 1;
        self.emit("if (self == NULL) return;");
        if cls.methods.contains_key("__del__") {
            self.emit(format!("{class_name}___del__(self);"));
        }
        let mut names: Vec<&String> = cls.fields.keys().collect();
        names.sort();
        for fname in names {
            let fld = &cls.fields[fname];
            if fld.ty.pointer_depth > 0 && self.class_table.contains_key(&fld.ty.base) {
                let base = fld.ty.base.clone();
                self.emit(format!("{base}_destroy(self->{fname});"));
            } else if matches!(fld.ty.base.as_str(), "List" | "Set") && !fld.ty.generic_args.is_empty() {
                let c_type = self.type_to_c(&fld.ty);
                self.emit(format!("{c_type}_free(self->{fname});"));
            } else if fld.ty.base == "Map" && fld.ty.generic_args.len() == 2 {
                let c_type = self.type_to_c(&fld.ty);
                self.emit(format!("{c_type}_free(self->{fname});"));
            }
        }
        self.emit("free(self);");
        self.indent -= 1;
        self.emit("}");
        self.emit_blank();
    }

    fn emit_function(&mut self, decl: &FunctionDecl) {
        let Some(body) = &decl.body else { return };
        let ret_type = self.c_storage_type(&decl.return_type);
        let params: Vec<String> = decl.params.iter().map(|p| param_to_c(self, p)).collect();
        let params_str = if params.is_empty() { "void".to_string() } else { params.join(", ") };
        self.emit(format!("{ret_type} {}({params_str}) {{", decl.name));
        self.indent += 1;
        self.emit_block_contents(body);
        self.indent -= 1;
        self.emit("}");
        self.emit_blank();
    }

    fn emit_gpu_function(&mut self, decl: &FunctionDecl) {
        let glsl = self.generate_glsl(decl);
        let shader_name = format!("__sl_gpu_shader_{}", decl.name);
        self.emit(format!("static const char* {shader_name} ="));
        for line in glsl.lines() {
            self.emit(format!("    \"{line}\\n\""));
        }
        self.emit(";");
        self.emit_blank();

        let mut params: Vec<String> = decl.params.iter().map(|p| format!("{} {}", self.c_storage_type(&p.ty), p.name)).collect();
        params.push("int __sl_n".to_string());
        let params_str = params.join(", ");
        self.emit(format!("void {}({params_str}) {{", decl.name));
        self.indent += 1;
        self.emit(format!("/* TODO: dispatch compute shader {shader_name} via the host's GPU backend */"));
        self.emit("/* buffer setup, shader compilation, and dispatch */");
        self.indent -= 1;
        self.emit("}");
        self.emit_blank();
    }

    fn generate_glsl(&self, decl: &FunctionDecl) -> String {
        let mut lines = vec![
            "#version 430".to_string(),
            "layout(local_size_x = 256) in;".to_string(),
        ];
        for (i, p) in decl.params.iter().enumerate() {
            lines.push(format!("layout(std430, binding = {i}) buffer buf{i} {{ float {}[]; }};", p.name));
        }
        lines.push("void main() {".to_string());
        lines.push("    uint i = gl_GlobalInvocationID.x;".to_string());
        lines.push("    /* kernel body */".to_string());
        lines.push("}".to_string());
        lines.join("\n")
    }

    fn emit_struct_decl(&mut self, decl: &StructDecl) {
        if decl.fields.is_empty() {
            self.emit(format!("struct {};", decl.name));
        } else {
            self.emit(format!("typedef struct {} {{", decl.name));
            self.indent += 1;
            for (ty, name) in &decl.fields {
                let c_type = self.c_storage_type(ty);
                let suffix = if ty.array_size.is_some() || (ty.is_array && ty.generic_args.is_empty()) {
                    "[]"
                } else {
                    ""
                };
                self.emit(format!("{c_type} {name}{suffix};"));
            }
            self.indent -= 1;
            self.emit(format!("}} {};", decl.name));
        }
        self.emit_blank();
    }

    fn emit_enum_decl(&mut self, decl: &EnumDecl) {
        self.emit("typedef enum {");
        self.indent += 1;
        let n = decl.values.len();
        for (i, (name, val)) in decl.values.iter().enumerate() {
            let suffix = if i < n - 1 { "," } else { "" };
            match val {
                Some(v) => {
                    let c = self.expr_to_c(v);
                    self.emit(format!("{name} = {c}{suffix}"));
                }
                None => self.emit(format!("{name}{suffix}")),
            }
        }
        self.indent -= 1;
        self.emit(format!("}} {};", decl.name));
        self.emit_blank();
    }

    fn emit_typedef_decl(&mut self, decl: &TypedefDecl) {
        let c_type = self.c_storage_type(&decl.original);
        self.emit(format!("typedef {c_type} {};", decl.alias));
        self.emit_blank();
    }
}
