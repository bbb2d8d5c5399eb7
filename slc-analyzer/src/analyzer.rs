use crate::class_table::{self, ClassInfo, FunctionInfo, span_of};
use crate::generics;
use crate::infer::{self, TypeInferer};
use crate::scope::{Scope, SymbolInfo, SymbolKind};
use crate::{AnalyzeError, AnalyzedProgram};
use slc_ast::{
    Block, CaseClause, ClassDecl, ClassMember, Declaration, Expression, FunctionDecl, MethodDecl,
    Param, Pos, Program, PropertyDecl, Statement, TypeExpr, TypeMap, VarDeclStmt,
};
use slc_diagnostics::DiagnosticEngine;
use std::collections::{HashMap, HashSet};

/// Arbitrary file name used for every `Span` — this crate analyzes one
/// translation unit at a time and the CLI layer is responsible for
/// multi-file diagnostics aggregation (SPEC_FULL §4.3, §10.1).
const FILE: &str = "<input>";

pub struct Analyzer {
    classes: HashMap<String, ClassInfo>,
    functions: HashMap<String, FunctionInfo>,
    class_names: HashSet<String>,
    generic_instances: HashMap<String, Vec<Vec<TypeExpr>>>,
    node_types: TypeMap,
    diagnostics: DiagnosticEngine,
    scope: Scope,
    current_class: Option<String>,
    current_method_static: bool,
    return_type: Option<TypeExpr>,
    loop_depth: u32,
    switch_depth: u32,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
            functions: HashMap::new(),
            class_names: HashSet::new(),
            generic_instances: HashMap::new(),
            node_types: TypeMap::new(),
            diagnostics: DiagnosticEngine::new(),
            scope: Scope::new(),
            current_class: None,
            current_method_static: false,
            return_type: None,
            loop_depth: 0,
            switch_depth: 0,
        }
    }

    pub fn analyze(mut self, mut program: Program) -> Result<AnalyzedProgram, AnalyzeError> {
        let (classes, functions) = class_table::register_declarations(&program, FILE, &mut self.diagnostics);
        self.classes = classes;
        self.functions = functions;
        self.class_names = self.classes.keys().cloned().collect();

        for class in self.classes.values() {
            for field in class.fields.values() {
                let mut ty = field.ty.clone();
                ty.upgrade_class_pointers(&self.class_names);
                generics::collect(&ty, &mut self.generic_instances);
            }
        }

        for decl in &mut program.declarations {
            self.analyze_declaration(decl);
        }

        Ok(AnalyzedProgram {
            program,
            class_table: self.classes,
            function_table: self.functions,
            generic_instances: self.generic_instances,
            node_types: self.node_types,
            diagnostics: self.diagnostics,
        })
    }

    fn push_scope(&mut self) {
        self.scope = std::mem::take(&mut self.scope).push();
    }

    fn pop_scope(&mut self) {
        self.scope = std::mem::take(&mut self.scope).pop();
    }

    fn define_var(&mut self, name: &str, ty: TypeExpr, kind: SymbolKind) {
        self.scope.define(name, SymbolInfo { name: name.to_string(), ty, kind });
    }

    fn upgrade(&self, ty: &mut TypeExpr) {
        ty.upgrade_class_pointers(&self.class_names);
    }

    fn collect_generics(&mut self, ty: &TypeExpr) {
        generics::collect(ty, &mut self.generic_instances);
    }

    fn check_generic_arity(&mut self, ty: &TypeExpr, pos: Pos) {
        if ty.generic_args.is_empty() {
            return;
        }
        if let Some(expected) = generics::builtin_arity(&ty.base) {
            if ty.generic_args.len() != expected {
                self.diagnostics.generic_arity_mismatch(&ty.base, expected, ty.generic_args.len(), span_of(FILE, pos));
            }
            return;
        }
        if let Some(class) = self.classes.get(&ty.base) {
            let expected = class.generic_params.len();
            if expected > 0 && ty.generic_args.len() != expected {
                self.diagnostics.generic_arity_mismatch(&ty.base, expected, ty.generic_args.len(), span_of(FILE, pos));
            }
        }
        for arg in &ty.generic_args {
            self.check_generic_arity(arg, pos);
        }
    }

    fn prepare_type(&mut self, ty: &mut TypeExpr) {
        self.upgrade(ty);
        self.check_generic_arity(ty, ty.pos);
        self.collect_generics(ty);
    }

    fn infer_expr(&self, expr: &Expression) -> Option<TypeExpr> {
        TypeInferer {
            classes: &self.classes,
            functions: &self.functions,
            scope: &self.scope,
            current_class: self.current_class.as_deref(),
        }
        .infer(expr)
    }

    fn is_compatible(&self, target: &TypeExpr, source: &TypeExpr) -> bool {
        infer::is_compatible(target, source, &self.classes)
    }

    fn suggest(&self, target: &str) -> Vec<String> {
        slc_diagnostics::fuzzy::find_similar_names(target, &self.scope.visible_names(), 0.7, 3)
    }

    // ---- declarations ----

    fn analyze_declaration(&mut self, decl: &mut Declaration) {
        match decl {
            Declaration::Class(class) => self.analyze_class(class),
            Declaration::Function(func) => self.analyze_function(func),
            Declaration::TopLevelVar(var) => self.analyze_top_level_var(var),
            Declaration::Struct(s) => {
                for (ty, _) in &mut s.fields {
                    self.prepare_type(ty);
                }
            }
            Declaration::Typedef(t) => self.prepare_type(&mut t.original),
            Declaration::Enum(_) | Declaration::Preprocessor(_) => {}
        }
    }

    fn analyze_class(&mut self, class: &mut ClassDecl) {
        self.current_class = Some(class.name.clone());
        for member in &mut class.members {
            match member {
                ClassMember::Field(field) => {
                    self.prepare_type(&mut field.ty);
                    if let Some(init) = &mut field.initializer {
                        self.analyze_expr(init);
                        if let Some(init_ty) = self.infer_expr(init) {
                            if !self.is_compatible(&field.ty, &init_ty) {
                                self.diagnostics.type_mismatch(
                                    &type_name(&field.ty),
                                    &type_name(&init_ty),
                                    span_of(FILE, field.pos),
                                );
                            }
                        }
                    }
                }
                ClassMember::Method(method) => self.analyze_method(method, &class.name),
                ClassMember::Property(prop) => self.analyze_property(prop),
            }
        }
        self.current_class = None;
    }

    fn analyze_property(&mut self, prop: &mut PropertyDecl) {
        self.prepare_type(&mut prop.ty);
        if let Some(Some(body)) = &mut prop.getter {
            self.push_scope();
            self.return_type = Some(prop.ty.clone());
            self.analyze_block(body);
            if !block_always_returns(body) {
                self.diagnostics.non_exhaustive_return("get", span_of(FILE, prop.pos));
            }
            self.return_type = None;
            self.pop_scope();
        }
        if let Some(Some(body)) = &mut prop.setter {
            self.push_scope();
            self.define_var("value", prop.ty.clone(), SymbolKind::Param);
            self.analyze_block(body);
            self.pop_scope();
        }
    }

    fn analyze_method(&mut self, method: &mut MethodDecl, class_name: &str) {
        self.push_scope();
        self.current_method_static = method.access == slc_ast::Access::Class;
        let is_ctor = method.is_constructor(class_name);

        if !self.current_method_static {
            let mut self_ty = TypeExpr::simple(class_name, method.pos);
            self_ty.pointer_depth = 1;
            self.define_var("self", self_ty, SymbolKind::Variable);
        }

        for param in &mut method.params {
            self.analyze_param(param);
        }

        self.prepare_type(&mut method.return_type);
        self.return_type = if is_ctor { None } else { Some(method.return_type.clone()) };

        self.analyze_block(&mut method.body);

        if !is_ctor && method.return_type.base != "void" && !block_always_returns(&method.body) {
            self.diagnostics.non_exhaustive_return(&method.name, span_of(FILE, method.pos));
        }
        check_unreachable(&method.body, &mut self.diagnostics);

        self.return_type = None;
        self.current_method_static = false;
        self.pop_scope();
    }

    fn analyze_function(&mut self, func: &mut FunctionDecl) {
        self.push_scope();
        for param in &mut func.params {
            self.analyze_param(param);
        }
        self.prepare_type(&mut func.return_type);
        self.return_type = Some(func.return_type.clone());

        if let Some(body) = &mut func.body {
            self.analyze_block(body);
            if func.return_type.base != "void" && !block_always_returns(body) {
                self.diagnostics.non_exhaustive_return(&func.name, span_of(FILE, func.pos));
            }
            check_unreachable(body, &mut self.diagnostics);
        }

        self.return_type = None;
        self.pop_scope();
    }

    fn analyze_param(&mut self, param: &mut Param) {
        self.prepare_type(&mut param.ty);
        self.define_var(&param.name, param.ty.clone(), SymbolKind::Param);
        if let Some(default) = &mut param.default {
            self.analyze_expr(default);
        }
    }

    fn analyze_top_level_var(&mut self, var: &mut VarDeclStmt) {
        self.analyze_var_decl(var);
    }

    // ---- statements ----

    fn analyze_block(&mut self, block: &mut Block) {
        self.push_scope();
        for stmt in &mut block.statements {
            self.analyze_stmt(stmt);
        }
        self.pop_scope();
    }

    fn analyze_stmt(&mut self, stmt: &mut Statement) {
        match stmt {
            Statement::VarDecl(var) => self.analyze_var_decl(var),
            Statement::Return { value, pos } => {
                if let Some(value) = value {
                    self.analyze_expr(value);
                    if let (Some(ret), Some(val_ty)) = (self.return_type.clone(), self.infer_expr(value)) {
                        if !self.is_compatible(&ret, &val_ty) {
                            self.diagnostics.type_mismatch(&type_name(&ret), &type_name(&val_ty), span_of(FILE, *pos));
                        }
                    }
                }
            }
            Statement::If { condition, then_block, else_block, .. } => {
                self.analyze_expr(condition);
                self.analyze_block(then_block);
                if let Some(else_block) = else_block {
                    self.analyze_stmt(else_block);
                }
            }
            Statement::While { condition, body, .. } => {
                self.analyze_expr(condition);
                self.loop_depth += 1;
                self.analyze_block(body);
                self.loop_depth -= 1;
            }
            Statement::DoWhile { body, condition, .. } => {
                self.loop_depth += 1;
                self.analyze_block(body);
                self.loop_depth -= 1;
                self.analyze_expr(condition);
            }
            Statement::CFor { init, condition, update, body, .. } => {
                self.push_scope();
                if let Some(init) = init {
                    self.analyze_stmt(init);
                }
                if let Some(condition) = condition {
                    self.analyze_expr(condition);
                }
                if let Some(update) = update {
                    self.analyze_stmt(update);
                }
                self.loop_depth += 1;
                self.analyze_block(body);
                self.loop_depth -= 1;
                self.pop_scope();
            }
            Statement::ForIn { var_name, second_var_name, iterable, body, pos } => {
                self.analyze_expr(iterable);
                self.push_scope();
                self.bind_for_in(var_name, second_var_name.as_deref(), iterable, *pos);
                self.loop_depth += 1;
                self.analyze_block(body);
                self.loop_depth -= 1;
                self.pop_scope();
            }
            Statement::ParallelFor { var_name, iterable, body, pos } => {
                self.analyze_expr(iterable);
                self.push_scope();
                self.bind_for_in(var_name, None, iterable, *pos);
                self.loop_depth += 1;
                self.analyze_block(body);
                self.loop_depth -= 1;
                self.pop_scope();
            }
            Statement::Switch { value, cases, .. } => {
                self.analyze_expr(value);
                self.switch_depth += 1;
                for case in cases {
                    self.analyze_case(case);
                }
                self.switch_depth -= 1;
            }
            Statement::Break(pos) => {
                if self.loop_depth == 0 && self.switch_depth == 0 {
                    self.diagnostics.emit(slc_diagnostics::Diagnostic::error(
                        slc_diagnostics::error_codes::BREAK_OUTSIDE_LOOP,
                        "'break' outside a loop or switch".to_string(),
                        span_of(FILE, *pos),
                    ));
                }
            }
            Statement::Continue(pos) => {
                if self.loop_depth == 0 {
                    self.diagnostics.emit(slc_diagnostics::Diagnostic::error(
                        slc_diagnostics::error_codes::CONTINUE_OUTSIDE_LOOP,
                        "'continue' outside a loop".to_string(),
                        span_of(FILE, *pos),
                    ));
                }
            }
            Statement::Expr(expr) => self.analyze_expr(expr),
            Statement::Delete { expr, .. } => self.analyze_expr(expr),
            Statement::TryCatch { try_block, catch_var, catch_block, pos } => {
                self.analyze_block(try_block);
                self.push_scope();
                self.define_var(catch_var, TypeExpr::simple("string", *pos), SymbolKind::Variable);
                self.analyze_block(catch_block);
                self.pop_scope();
            }
            Statement::Throw { expr, .. } => self.analyze_expr(expr),
            Statement::Block(block) => self.analyze_block(block),
        }
    }

    fn bind_for_in(&mut self, var_name: &str, second: Option<&str>, iterable: &Expression, pos: Pos) {
        let inferer = TypeInferer {
            classes: &self.classes,
            functions: &self.functions,
            scope: &self.scope,
            current_class: self.current_class.as_deref(),
        };
        if inferer.is_range_call(iterable) {
            self.define_var(var_name, TypeExpr::simple("int", pos), SymbolKind::Variable);
            return;
        }
        let iter_ty = self.infer_expr(iterable);
        match iter_ty {
            Some(ty) if matches!(ty.base.as_str(), "List" | "Array" | "Set") => {
                let elem = ty.generic_args.first().cloned().unwrap_or_else(|| TypeExpr::simple("int", pos));
                self.define_var(var_name, elem, SymbolKind::Variable);
            }
            Some(ty) if ty.base == "Map" => {
                let key = ty.generic_args.first().cloned().unwrap_or_else(|| TypeExpr::simple("string", pos));
                let value = ty.generic_args.get(1).cloned().unwrap_or_else(|| TypeExpr::simple("int", pos));
                if let Some(second) = second {
                    self.define_var(var_name, key, SymbolKind::Variable);
                    self.define_var(second, value, SymbolKind::Variable);
                } else {
                    self.define_var(var_name, key, SymbolKind::Variable);
                }
            }
            Some(ty) if ty.base == "string" => {
                self.define_var(var_name, TypeExpr::simple("char", pos), SymbolKind::Variable);
            }
            Some(ty) if self.classes.contains_key(&ty.base) => {
                self.diagnostics.emit(slc_diagnostics::Diagnostic::error(
                    slc_diagnostics::error_codes::NOT_ITERABLE,
                    format!("'{}' is not iterable", ty.base),
                    span_of(FILE, pos),
                ));
                self.define_var(var_name, TypeExpr::simple("int", pos), SymbolKind::Variable);
            }
            _ => {
                self.define_var(var_name, TypeExpr::simple("int", pos), SymbolKind::Variable);
            }
        }
    }

    fn analyze_case(&mut self, case: &mut CaseClause) {
        if let Some(value) = &mut case.value {
            self.analyze_expr(value);
        }
        self.push_scope();
        for stmt in &mut case.body {
            self.analyze_stmt(stmt);
        }
        self.pop_scope();
    }

    fn analyze_var_decl(&mut self, var: &mut VarDeclStmt) {
        if let Some(init) = &mut var.initializer {
            self.analyze_expr(init);
        }

        let resolved = if var.is_inferred {
            let inferred = var.initializer.as_ref().and_then(|e| self.infer_expr(e));
            inferred.unwrap_or_else(|| TypeExpr::simple("int", var.pos))
        } else {
            let mut ty = var.ty.clone().unwrap_or_else(|| TypeExpr::simple("int", var.pos));
            self.prepare_type(&mut ty);
            if let Some(init) = &var.initializer {
                if let Some(init_ty) = self.infer_expr(init) {
                    if !self.is_compatible(&ty, &init_ty) {
                        self.diagnostics.type_mismatch(&type_name(&ty), &type_name(&init_ty), span_of(FILE, var.pos));
                    }
                }
            }
            ty
        };

        if var.is_inferred {
            self.collect_generics(&resolved);
        }
        var.ty = Some(resolved.clone());

        self.define_var(&var.name, resolved, SymbolKind::Variable);
    }

    // ---- expressions ----

    fn analyze_expr(&mut self, expr: &mut Expression) {
        match expr {
            Expression::Binary { left, right, .. } => {
                self.analyze_expr(left);
                self.analyze_expr(right);
                self.check_division_by_zero(expr);
            }
            Expression::Unary { operand, .. } => self.analyze_expr(operand),
            Expression::Ternary { condition, then_expr, else_expr, .. } => {
                self.analyze_expr(condition);
                self.analyze_expr(then_expr);
                self.analyze_expr(else_expr);
            }
            Expression::Assign { target, value, .. } => {
                self.analyze_expr(target);
                self.analyze_expr(value);
            }
            Expression::Call { callee, args, id, pos } => {
                self.analyze_expr(callee);
                for arg in args.iter_mut() {
                    self.analyze_expr(arg);
                }
                self.check_call_arity(callee, args.len(), *pos);
                let _ = id;
            }
            Expression::Index { object, index, .. } => {
                self.analyze_expr(object);
                self.analyze_expr(index);
            }
            Expression::FieldAccess { object, field, pos, .. } => {
                self.analyze_expr(object);
                self.check_field_access(object, field, *pos);
            }
            Expression::Cast { expr: inner, target_type, .. } => {
                self.analyze_expr(inner);
                self.upgrade(target_type);
                self.collect_generics(target_type);
            }
            Expression::Sizeof { operand, .. } => match operand {
                slc_ast::SizeofOperand::Type(ty) => {
                    self.upgrade(ty);
                    self.collect_generics(ty);
                }
                slc_ast::SizeofOperand::Expr(e) => self.analyze_expr(e),
            },
            Expression::New { ty, args, pos, .. } => {
                self.prepare_type(ty);
                for arg in args.iter_mut() {
                    self.analyze_expr(arg);
                }
                if let Some(class) = self.classes.get(&ty.base) {
                    if class.constructor.is_none() && !args.is_empty() {
                        self.diagnostics.argument_count_mismatch(&ty.base, 0, args.len(), span_of(FILE, *pos));
                    } else if let Some(ctor) = &class.constructor {
                        check_arity(ctor.params.len(), args.len(), &ty.base, *pos, &mut self.diagnostics);
                    }
                } else if !self.class_names.is_empty() {
                    let suggestions = self.suggest(&ty.base);
                    self.diagnostics.undefined_name("class", &ty.base, span_of(FILE, *pos), suggestions);
                }
            }
            Expression::Delete { expr: inner, .. } => self.analyze_expr(inner),
            Expression::ListLiteral { elements, .. } | Expression::TupleLiteral { elements, .. } | Expression::BraceInitializer { elements, .. } => {
                for e in elements.iter_mut() {
                    self.analyze_expr(e);
                }
            }
            Expression::MapLiteral { entries, .. } => {
                for (k, v) in entries.iter_mut() {
                    self.analyze_expr(k);
                    self.analyze_expr(v);
                }
            }
            Expression::FString { parts, .. } => {
                for part in parts.iter_mut() {
                    if let Some(e) = &mut part.expr {
                        self.analyze_expr(e);
                    }
                }
            }
            Expression::Lambda { lambda, .. } => {
                self.push_scope();
                for param in &mut lambda.params {
                    self.analyze_param(param);
                }
                if let Some(ret) = &mut lambda.return_type {
                    self.prepare_type(ret);
                }
                self.analyze_block(&mut lambda.body);
                self.pop_scope();
            }
            Expression::Identifier { name, pos, .. } => {
                if self.scope.lookup(name).is_none() && !self.functions.contains_key(name) && !self.class_names.contains(name) {
                    let suggestions = self.suggest(name);
                    self.diagnostics.undefined_name("variable", name, span_of(FILE, *pos), suggestions);
                }
            }
            Expression::SelfExpr { pos, .. } => {
                if self.current_class.is_none() {
                    self.diagnostics.emit(slc_diagnostics::Diagnostic::error(
                        slc_diagnostics::error_codes::SELF_OUTSIDE_METHOD,
                        "'self' used outside a class".to_string(),
                        span_of(FILE, *pos),
                    ));
                } else if self.current_method_static {
                    self.diagnostics.emit(slc_diagnostics::Diagnostic::error(
                        slc_diagnostics::error_codes::SELF_OUTSIDE_METHOD,
                        "'self' used inside a static method".to_string(),
                        span_of(FILE, *pos),
                    ));
                }
            }
            Expression::IntLiteral { .. }
            | Expression::FloatLiteral { .. }
            | Expression::StringLiteral { .. }
            | Expression::CharLiteral { .. }
            | Expression::BoolLiteral { .. }
            | Expression::NullLiteral { .. } => {}
        }

        if let Some(ty) = self.infer_expr(expr) {
            self.node_types.record(expr.id(), ty);
        }
    }

    fn check_division_by_zero(&mut self, expr: &Expression) {
        if let Expression::Binary { op, right, pos, .. } = expr {
            if matches!(op, slc_ast::BinaryOp::Div | slc_ast::BinaryOp::Mod) {
                if let Expression::IntLiteral { value: 0, .. } = right.as_ref() {
                    self.diagnostics.division_by_literal_zero(span_of(FILE, *pos));
                }
            }
        }
    }

    fn check_field_access(&mut self, object: &Expression, field: &str, pos: Pos) {
        let Some(obj_ty) = self.infer_expr(object) else { return };
        let Some(class) = self.classes.get(&obj_ty.base) else { return };

        let is_static_call_on_class_name = matches!(object, Expression::Identifier { name, .. } if name == &class.name);

        if let Some(f) = class.fields.get(field) {
            if f.access == slc_ast::Access::Private && !self.is_inside(&class.name) {
                self.diagnostics.private_access("field", field, &class.name, span_of(FILE, pos));
            }
            return;
        }
        if let Some(m) = class.methods.get(field) {
            if m.access == slc_ast::Access::Private && !self.is_inside(&class.name) {
                self.diagnostics.private_access("method", field, &class.name, span_of(FILE, pos));
            }
            if m.access == slc_ast::Access::Class && !is_static_call_on_class_name {
                self.diagnostics.emit(slc_diagnostics::Diagnostic::error(
                    slc_diagnostics::error_codes::STATIC_METHOD_MISUSE,
                    format!("'{}' is a static method and must be called as '{}.{}(...)'", field, class.name, field),
                    span_of(FILE, pos),
                ));
            }
            return;
        }
        if class.properties.contains_key(field) {
            return;
        }

        let suggestions = slc_diagnostics::fuzzy::find_similar_members(
            field,
            &class.fields.keys().chain(class.methods.keys()).chain(class.properties.keys()).cloned().collect::<Vec<_>>(),
        );
        self.diagnostics.no_such_member(&class.name, "member", field, span_of(FILE, pos), suggestions);
    }

    fn is_inside(&self, class_name: &str) -> bool {
        self.current_class.as_deref() == Some(class_name)
    }

    fn check_call_arity(&mut self, callee: &Expression, arg_count: usize, pos: Pos) {
        match callee {
            Expression::Identifier { name, .. } => {
                if let Some(info) = self.functions.get(name) {
                    check_arity(info.decl.params.len(), arg_count, name, pos, &mut self.diagnostics);
                }
            }
            Expression::FieldAccess { object, field, .. } => {
                let Some(obj_ty) = self.infer_expr(object) else { return };
                if let Some(class) = self.classes.get(&obj_ty.base) {
                    if let Some(method) = class.methods.get(field) {
                        check_arity(method.params.len(), arg_count, field, pos, &mut self.diagnostics);
                    }
                }
            }
            _ => {}
        }
    }
}

fn check_arity(expected: usize, found: usize, name: &str, pos: Pos, diagnostics: &mut DiagnosticEngine) {
    let required = expected;
    if found != required {
        diagnostics.argument_count_mismatch(name, required, found, span_of(FILE, pos));
    }
}

fn type_name(ty: &TypeExpr) -> String {
    let mut s = ty.base.clone();
    if !ty.generic_args.is_empty() {
        let args: Vec<String> = ty.generic_args.iter().map(type_name).collect();
        s.push('<');
        s.push_str(&args.join(", "));
        s.push('>');
    }
    for _ in 0..ty.pointer_depth {
        s.push('*');
    }
    s
}

/// Whether every control-flow path through this block ends in `return`/
/// `throw` (SPEC_FULL §4.3 exhaustive-return rules): a block is exhaustive
/// if its last statement is terminal, or an `if` with an else branch where
/// both sides are exhaustive, or a `switch` covering a `default` case where
/// every case is exhaustive, or an unconditional `while (true)`.
fn block_always_returns(block: &Block) -> bool {
    match block.statements.last() {
        Some(stmt) => stmt_always_returns(stmt),
        None => false,
    }
}

fn stmt_always_returns(stmt: &Statement) -> bool {
    match stmt {
        Statement::Return { .. } | Statement::Throw { .. } => true,
        Statement::Block(b) => block_always_returns(b),
        Statement::If { then_block, else_block, .. } => match else_block {
            Some(else_stmt) => block_always_returns(then_block) && stmt_always_returns(else_stmt),
            None => false,
        },
        Statement::Switch { cases, .. } => {
            let has_default = cases.iter().any(|c| c.value.is_none());
            has_default
                && cases.iter().all(|c| match c.body.last() {
                    Some(last) => stmt_always_returns(last) || matches!(last, Statement::Break(_)),
                    None => false,
                })
                && cases.iter().any(|c| c.value.is_none() && c.body.last().is_some_and(stmt_always_returns))
        }
        Statement::While { condition, body, .. } => is_literal_true(condition) && !contains_break(body),
        _ => false,
    }
}

fn is_literal_true(expr: &Expression) -> bool {
    matches!(expr, Expression::BoolLiteral { value: true, .. })
}

fn contains_break(block: &Block) -> bool {
    block.statements.iter().any(stmt_contains_break)
}

fn stmt_contains_break(stmt: &Statement) -> bool {
    match stmt {
        Statement::Break(_) => true,
        Statement::Block(b) => contains_break(b),
        Statement::If { then_block, else_block, .. } => {
            contains_break(then_block) || else_block.as_ref().is_some_and(|e| stmt_contains_break(e))
        }
        Statement::Switch { cases, .. } => cases.iter().any(|c| c.body.iter().any(stmt_contains_break)),
        _ => false,
    }
}

/// Flags statements syntactically unreachable because they follow a
/// terminal statement in the same block (SPEC_FULL §4.3).
fn check_unreachable(block: &Block, diagnostics: &mut DiagnosticEngine) {
    walk_unreachable(block, diagnostics);
}

fn walk_unreachable(block: &Block, diagnostics: &mut DiagnosticEngine) {
    let mut seen_terminal = false;
    for stmt in &block.statements {
        if seen_terminal {
            diagnostics.unreachable_code(span_of(FILE, stmt_pos(stmt)));
            break;
        }
        if stmt.ends_block() {
            seen_terminal = true;
        }
        recurse_unreachable(stmt, diagnostics);
    }
}

fn recurse_unreachable(stmt: &Statement, diagnostics: &mut DiagnosticEngine) {
    match stmt {
        Statement::Block(b) => walk_unreachable(b, diagnostics),
        Statement::If { then_block, else_block, .. } => {
            walk_unreachable(then_block, diagnostics);
            if let Some(e) = else_block {
                recurse_unreachable(e, diagnostics);
            }
        }
        Statement::While { body, .. }
        | Statement::DoWhile { body, .. }
        | Statement::CFor { body, .. }
        | Statement::ForIn { body, .. }
        | Statement::ParallelFor { body, .. } => walk_unreachable(body, diagnostics),
        Statement::Switch { cases, .. } => {
            for case in cases {
                let mut seen_terminal = false;
                for s in &case.body {
                    if seen_terminal {
                        diagnostics.unreachable_code(span_of(FILE, stmt_pos(s)));
                        break;
                    }
                    if s.ends_block() {
                        seen_terminal = true;
                    }
                    recurse_unreachable(s, diagnostics);
                }
            }
        }
        Statement::TryCatch { try_block, catch_block, .. } => {
            walk_unreachable(try_block, diagnostics);
            walk_unreachable(catch_block, diagnostics);
        }
        _ => {}
    }
}

fn stmt_pos(stmt: &Statement) -> Pos {
    match stmt {
        Statement::VarDecl(v) => v.pos,
        Statement::Return { pos, .. }
        | Statement::If { pos, .. }
        | Statement::While { pos, .. }
        | Statement::DoWhile { pos, .. }
        | Statement::CFor { pos, .. }
        | Statement::ForIn { pos, .. }
        | Statement::ParallelFor { pos, .. }
        | Statement::Switch { pos, .. }
        | Statement::Delete { pos, .. }
        | Statement::TryCatch { pos, .. }
        | Statement::Throw { pos, .. } => *pos,
        Statement::Break(pos) | Statement::Continue(pos) => *pos,
        Statement::Expr(e) => e.pos(),
        Statement::Block(b) => b.pos,
    }
}

#[cfg(test)]
mod tests {
    use crate::analyze;
    use slc_diagnostics::error_codes;

    fn codes(source: &str) -> Vec<String> {
        let program = slc_parser::Parser::parse_program(source).unwrap();
        let analyzed = analyze(program).unwrap();
        analyzed.diagnostics.diagnostics().iter().map(|d| d.code.clone()).collect()
    }

    #[test]
    fn clean_program_has_no_diagnostics() {
        assert!(codes("int main() { return 0; }").is_empty());
    }

    #[test]
    fn class_table_registers_fields_methods_and_parent() {
        let program = slc_parser::Parser::parse_program(
            "class A { public int f() { return 1; } } \
             class B extends A { public int g() { return 2; } }",
        )
        .unwrap();
        let analyzed = analyze(program).unwrap();
        let a = &analyzed.class_table["A"];
        assert!(a.methods.contains_key("f"));
        assert!(a.parent.is_none());
        let b = &analyzed.class_table["B"];
        assert!(b.methods.contains_key("g"));
        assert_eq!(b.parent.as_deref(), Some("A"));
    }

    #[test]
    fn var_infers_element_type_from_list_literal() {
        let program = slc_parser::Parser::parse_program(
            "int main() { var nums = [10, 20, 30]; return nums[0]; }",
        )
        .unwrap();
        let analyzed = analyze(program).unwrap();
        assert!(analyzed.generic_instances.contains_key("List"));
    }

    #[test]
    fn class_typed_binding_is_upgraded_to_pointer() {
        let program = slc_parser::Parser::parse_program(
            "class A { } int main() { A a; return 0; }",
        )
        .unwrap();
        let analyzed = analyze(program).unwrap();
        let slc_ast::Declaration::Function(main_fn) = &analyzed.program.declarations[1] else {
            panic!("expected main function");
        };
        let slc_ast::Statement::VarDecl(decl) = &main_fn.body.as_ref().unwrap().statements[0] else {
            panic!("expected var decl");
        };
        assert!(decl.ty.as_ref().unwrap().pointer_depth >= 1);
    }

    #[test]
    fn undefined_name_is_reported() {
        let found = codes("int main() { return missing_name; }");
        assert!(found.contains(&error_codes::UNDEFINED_NAME.to_string()));
    }

    #[test]
    fn duplicate_class_declaration_is_reported() {
        let found = codes("class A { } class A { }");
        assert!(found.contains(&error_codes::DUPLICATE_DECLARATION.to_string()));
    }

    #[test]
    fn non_exhaustive_return_is_reported() {
        let found = codes("int f() { if (true) { return 1; } }");
        assert!(found.contains(&error_codes::NON_EXHAUSTIVE_RETURN.to_string()));
    }

    #[test]
    fn argument_count_mismatch_is_reported() {
        let found = codes("int f(int x) { return x; } int main() { return f(1, 2); }");
        assert!(found.contains(&error_codes::ARGUMENT_COUNT.to_string()));
    }

    #[test]
    fn map_generic_collection_registers_key_and_value_lists() {
        let program = slc_parser::Parser::parse_program(
            "int main() { Map<string,int> m; return 0; }",
        )
        .unwrap();
        let analyzed = analyze(program).unwrap();
        assert!(analyzed.generic_instances.contains_key("Map"));
    }
}
