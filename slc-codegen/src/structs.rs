use crate::context::CCodeGen;
use slc_ast::{ClassDecl, ClassMember, Declaration, Program, TypeExpr};
use slc_analyzer::ClassInfo;
use std::collections::HashMap;

/// Phases 5, 7 and 8 (SPEC_FULL §4.4): forward `typedef struct X X;`
/// declarations, full struct bodies (inherited fields first, then the
/// class's own), and `void X_destroy(X*);` forward declarations. Ported
/// from the original's `_emit_forward_declarations`/`_emit_class_struct`/
/// `_emit_destroy_forward_declarations`.
impl CCodeGen {
    pub fn emit_forward_declarations(&mut self) {
        let mut any = false;
        for (name, cls) in &self.class_table {
            if cls.generic_params.is_empty() {
                self.emit(format!("typedef struct {name} {name};"));
                any = true;
            }
        }
        if any {
            self.emit_blank();
        }
    }

    pub fn emit_struct_definitions(&mut self, program: &Program) {
        for decl in &program.declarations {
            if let Declaration::Class(class) = decl {
                if class.generic_params.is_empty() {
                    self.emit_class_struct(class);
                }
            }
        }
    }

    fn emit_class_struct(&mut self, decl: &ClassDecl) {
        let child_field_names: std::collections::HashSet<&str> = decl
            .members
            .iter()
            .filter_map(|m| match m {
                ClassMember::Field(f) => Some(f.name.as_str()),
                _ => None,
            })
            .collect();

        self.emit(format!("struct {} {{", decl.name));
        self.indent += 1;
        let mut field_count = 0;

        if let Some(parent_name) = &decl.parent {
            if let Some(parent) = self.class_table.get(parent_name).cloned() {
                let mut names: Vec<&String> = parent.fields.keys().collect();
                names.sort();
                for fname in names {
                    if !child_field_names.contains(fname.as_str()) {
                        let fld = &parent.fields[fname];
                        let c_type = self.c_storage_type(&fld.ty);
                        self.emit(format!("{c_type} {fname};"));
                        field_count += 1;
                    }
                }
            }
        }

        for member in &decl.members {
            match member {
                ClassMember::Field(f) => {
                    let c_type = self.c_storage_type(&f.ty);
                    self.emit(format!("{c_type} {};", f.name));
                    field_count += 1;
                }
                ClassMember::Property(p) => {
                    let is_auto_getter = matches!(&p.getter, Some(None));
                    let is_auto_setter = matches!(&p.setter, Some(None));
                    if is_auto_getter || is_auto_setter {
                        let c_type = self.c_storage_type(&p.ty);
                        self.emit(format!("{c_type} _{};", p.name));
                        field_count += 1;
                    }
                }
                ClassMember::Method(_) => {}
            }
        }

        if field_count == 0 {
            self.emit("char _dummy;");
        }
        self.indent -= 1;
        self.emit("};");
        self.emit_blank();
    }

    pub fn emit_destroy_forward_declarations(&mut self) {
        let mut any = false;
        let mut names: Vec<&String> = self.class_table.keys().collect();
        names.sort();
        for name in names {
            if self.class_table[name].generic_params.is_empty() {
                self.emit(format!("void {name}_destroy({name}* self);"));
                any = true;
            }
        }
        if any {
            self.emit_blank();
        }
    }

    /// Part of phase 6: struct bodies for monomorphized user generic
    /// classes (`sl_Box_int { int value; }` for `Box<int>`).
    pub fn emit_monomorphized_class_structs(&mut self) {
        let mut emitted = std::collections::HashSet::new();
        let mut base_names: Vec<String> = self.generic_instances.keys().cloned().collect();
        base_names.sort();
        for base_name in base_names {
            if matches!(base_name.as_str(), "Tuple" | "List" | "Array" | "Map" | "Set") {
                continue;
            }
            let Some(cls) = self.class_table.get(&base_name).cloned() else {
                continue;
            };
            let instances = self.generic_instances[&base_name].clone();
            for args in instances {
                let mangled_args: Vec<String> = args.iter().map(|a| self.mangle(a)).collect();
                let key = format!("{base_name}_{}", mangled_args.join("_"));
                if !emitted.insert(key) {
                    continue;
                }
                self.emit_monomorphized_class(&cls, &args, &mangled_args);
            }
        }
    }

    fn emit_monomorphized_class(&mut self, cls: &ClassInfo, args: &[TypeExpr], mangled_args: &[String]) {
        let subs: HashMap<String, TypeExpr> = cls
            .generic_params
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect();
        let mono_name = format!("sl_{}_{}", cls.name, mangled_args.join("_"));

        self.emit("typedef struct {");
        self.indent += 1;
        if cls.fields.is_empty() {
            self.emit("char _dummy;");
        }
        let mut names: Vec<&String> = cls.fields.keys().collect();
        names.sort();
        for fname in names {
            let field = &cls.fields[fname];
            let ftype = crate::mangle::substitute_type(&field.ty, &subs);
            let c_type = self.c_storage_type(&ftype);
            self.emit(format!("{c_type} {fname};"));
        }
        self.indent -= 1;
        self.emit(format!("}} {mono_name};"));
        self.emit_blank();
    }
}
