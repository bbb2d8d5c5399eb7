use crate::class_table::{ClassInfo, FunctionInfo};
use crate::scope::Scope;
use slc_ast::{BinaryOp, Expression, Pos, TypeExpr};
use std::collections::HashMap;

/// Best-effort, bottom-up type inference with no unification (SPEC_FULL
/// §4.3 "Type inference"). Borrows the tables pass 2 has already built.
pub struct TypeInferer<'a> {
    pub classes: &'a HashMap<String, ClassInfo>,
    pub functions: &'a HashMap<String, FunctionInfo>,
    pub scope: &'a Scope,
    pub current_class: Option<&'a str>,
}

impl<'a> TypeInferer<'a> {
    pub fn infer(&self, expr: &Expression) -> Option<TypeExpr> {
        match expr {
            Expression::IntLiteral { pos, .. } => Some(TypeExpr::simple("int", *pos)),
            Expression::FloatLiteral { pos, .. } => Some(TypeExpr::simple("float", *pos)),
            Expression::StringLiteral { pos, .. } => Some(TypeExpr::simple("string", *pos)),
            Expression::CharLiteral { pos, .. } => Some(TypeExpr::simple("char", *pos)),
            Expression::BoolLiteral { pos, .. } => Some(TypeExpr::simple("bool", *pos)),
            Expression::NullLiteral { pos, .. } => Some(pointer_to("void", *pos)),
            Expression::FString { pos, .. } => Some(TypeExpr::simple("string", *pos)),
            Expression::Identifier { name, .. } => self.scope.lookup(name).map(|s| s.ty.clone()),
            Expression::SelfExpr { pos, .. } => self.current_class.map(|c| pointer_to(c, *pos)),
            Expression::Binary { left, op, right, pos, .. } => self.infer_binary(left, op, right, *pos),
            Expression::Unary { operand, .. } => self.infer(operand),
            Expression::Ternary { then_expr, .. } => self.infer(then_expr),
            Expression::Assign { target, .. } => self.infer(target),
            Expression::Cast { target_type, .. } => Some(target_type.clone()),
            Expression::Call { .. } => self.infer_call(expr),
            Expression::Index { object, pos, .. } => self.infer_index(object, *pos),
            Expression::FieldAccess { .. } => self.infer_field_access(expr),
            Expression::New { ty, pos, .. } => {
                let mut t = ty.clone();
                t.pointer_depth = t.pointer_depth.max(1);
                t.pos = *pos;
                Some(t)
            }
            Expression::TupleLiteral { elements, pos, .. } => {
                let elem_types = elements.iter().map(|e| self.infer_or_int(e, *pos)).collect();
                let mut t = TypeExpr::simple("Tuple", *pos);
                t.generic_args = elem_types;
                Some(t)
            }
            Expression::ListLiteral { elements, pos, .. } => {
                let elem = elements.first().and_then(|e| self.infer(e)).unwrap_or_else(|| TypeExpr::simple("int", *pos));
                let mut t = TypeExpr::simple("List", *pos);
                t.generic_args = vec![elem];
                Some(t)
            }
            Expression::MapLiteral { entries, pos, .. } => {
                let (k, v) = match entries.first() {
                    Some((k, v)) => (
                        self.infer(k).unwrap_or_else(|| TypeExpr::simple("string", *pos)),
                        self.infer(v).unwrap_or_else(|| TypeExpr::simple("int", *pos)),
                    ),
                    None => (TypeExpr::simple("string", *pos), TypeExpr::simple("int", *pos)),
                };
                let mut t = TypeExpr::simple("Map", *pos);
                t.generic_args = vec![k, v];
                Some(t)
            }
            _ => None,
        }
    }

    fn infer_or_int(&self, expr: &Expression, pos: Pos) -> TypeExpr {
        self.infer(expr).unwrap_or_else(|| TypeExpr::simple("int", pos))
    }

    fn infer_binary(&self, left: &Expression, op: &BinaryOp, right: &Expression, pos: Pos) -> Option<TypeExpr> {
        use BinaryOp::*;
        if matches!(op, Eq | NotEq | Lt | LtEq | Gt | GtEq | And | Or) {
            return Some(TypeExpr::simple("bool", pos));
        }
        let left_ty = self.infer(left);
        let right_ty = self.infer(right);
        if let (Some(l), Some(r)) = (&left_ty, &right_ty) {
            if l.base == "float" || l.base == "double" || r.base == "float" || r.base == "double" {
                return Some(TypeExpr::simple("float", pos));
            }
            if l.base == "int" && r.base == "int" {
                return Some(TypeExpr::simple("int", pos));
            }
        }
        left_ty
    }

    fn infer_call(&self, expr: &Expression) -> Option<TypeExpr> {
        let Expression::Call { callee, pos, .. } = expr else { return None };
        match callee.as_ref() {
            Expression::Identifier { name, .. } => {
                if self.classes.contains_key(name) {
                    return Some(pointer_to(name, *pos));
                }
                if let Some(info) = self.functions.get(name) {
                    return Some(info.decl.return_type.clone());
                }
                None
            }
            Expression::FieldAccess { object, field, .. } => {
                let obj_type = self.infer(object);
                if let Some(obj_type) = &obj_type {
                    if obj_type.base == "string" || (obj_type.base == "char" && obj_type.pointer_depth >= 1) {
                        if let Some(ty) = string_method_return_type(field, *pos) {
                            return Some(ty);
                        }
                    }
                    if let Some(cls) = self.classes.get(&obj_type.base) {
                        if let Some(method) = cls.methods.get(field) {
                            return Some(method.return_type.clone());
                        }
                    }
                }
                if let Expression::Identifier { name, .. } = object.as_ref() {
                    if let Some(cls) = self.classes.get(name) {
                        if let Some(method) = cls.methods.get(field) {
                            return Some(method.return_type.clone());
                        }
                    }
                }
                None
            }
            _ => None,
        }
    }

    fn infer_index(&self, object: &Expression, _pos: Pos) -> Option<TypeExpr> {
        let obj_type = self.infer(object)?;
        if matches!(obj_type.base.as_str(), "List" | "Array") {
            return obj_type.generic_args.first().cloned();
        }
        None
    }

    fn infer_field_access(&self, expr: &Expression) -> Option<TypeExpr> {
        let Expression::FieldAccess { object, field, .. } = expr else { return None };
        let obj_type = self.infer(object)?;
        let cls = self.classes.get(&obj_type.base)?;
        if let Some(prop) = cls.properties.get(field) {
            return Some(prop.ty.clone());
        }
        cls.fields.get(field).map(|f| f.ty.clone())
    }

    pub fn is_range_call(&self, expr: &Expression) -> bool {
        matches!(
            expr,
            Expression::Call { callee, .. }
                if matches!(callee.as_ref(), Expression::Identifier { name, .. } if name == "range")
        )
    }
}

fn pointer_to(base: &str, pos: Pos) -> TypeExpr {
    let mut t = TypeExpr::simple(base, pos);
    t.pointer_depth = 1;
    t
}

fn string_method_return_type(method: &str, pos: Pos) -> Option<TypeExpr> {
    let base = match method {
        "len" | "byteLen" | "charLen" | "indexOf" => "int",
        "contains" | "startsWith" | "endsWith" | "equals" => "bool",
        "charAt" => "char",
        "substring" | "trim" | "toUpper" | "toLower" => "string",
        "split" => return Some(pointer_to("string", pos)),
        _ => return None,
    };
    Some(TypeExpr::simple(base, pos))
}

/// The best-effort type-compatibility lattice (SPEC_FULL §4.3): identical
/// bases are compatible; numeric bases are mutually compatible; `string`
/// and `char*` are compatible; `null`/`void*` is compatible with any
/// pointer or `string`; class-to-class requires a transitive subclass
/// relationship; container bases must match exactly; unknown bases (from
/// C headers) are permissively compatible.
pub fn is_compatible(target: &TypeExpr, source: &TypeExpr, classes: &HashMap<String, ClassInfo>) -> bool {
    const NUMERIC: &[&str] = &["int", "float", "double", "char", "short", "long", "unsigned", "signed"];

    if target.base == source.base {
        return true;
    }
    if NUMERIC.contains(&target.base.as_str()) && NUMERIC.contains(&source.base.as_str()) {
        return true;
    }
    if target.base == "string" && source.base == "char" && source.pointer_depth >= 1 {
        return true;
    }
    if source.base == "void" && source.pointer_depth >= 1 && (target.pointer_depth >= 1 || target.base == "string") {
        return true;
    }
    if classes.contains_key(&target.base) && classes.contains_key(&source.base) {
        return is_subclass(&source.base, &target.base, classes);
    }
    if slc_ast::TypeExpr::is_container_base(&target.base) || slc_ast::TypeExpr::is_container_base(&source.base) {
        return target.base == source.base;
    }
    if !is_known_base(&target.base, classes) || !is_known_base(&source.base, classes) {
        return true;
    }
    false
}

fn is_subclass(candidate: &str, ancestor: &str, classes: &HashMap<String, ClassInfo>) -> bool {
    if candidate == ancestor {
        return true;
    }
    let mut current = classes.get(candidate).and_then(|c| c.parent.clone());
    let mut guard = 0;
    while let Some(name) = current {
        if name == ancestor {
            return true;
        }
        guard += 1;
        if guard > 256 {
            return false;
        }
        current = classes.get(&name).and_then(|c| c.parent.clone());
    }
    false
}

const PRIMITIVES: &[&str] = &["int", "float", "double", "char", "bool", "string", "void", "short", "long"];

fn is_known_base(base: &str, classes: &HashMap<String, ClassInfo>) -> bool {
    PRIMITIVES.contains(&base) || classes.contains_key(base) || slc_ast::TypeExpr::is_container_base(base)
}
