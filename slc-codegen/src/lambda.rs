use crate::context::CCodeGen;
use slc_ast::{
    Block, ClassMember, Declaration, Expression, LambdaExpr, Param, Program, Statement,
};

impl CCodeGen {
    /// Phase 2: walks the whole program for lambda expressions, assigning each
    /// a synthetic name and eagerly rendering its C function body into
    /// `self.lambda_defs` (the lambda's own body may reference helpers or
    /// other lambdas already scanned, so this must run before anything else
    /// is emitted). Grounded on the original's `_prescan_lambdas`/
    /// `_register_lambda`, which swap the output buffer aside to render each
    /// lambda body in isolation rather than deferring emission.
    pub fn prescan_lambdas(&mut self, program: &mut Program) {
        for decl in &mut program.declarations {
            self.walk_decl(decl);
        }
    }

    fn walk_decl(&mut self, decl: &mut Declaration) {
        match decl {
            Declaration::Class(class) => {
                for member in &mut class.members {
                    match member {
                        ClassMember::Field(f) => {
                            if let Some(init) = &mut f.initializer {
                                self.walk_expr(init);
                            }
                        }
                        ClassMember::Method(m) => {
                            for p in &mut m.params {
                                self.walk_param(p);
                            }
                            self.walk_block(&mut m.body);
                        }
                        ClassMember::Property(p) => {
                            if let Some(Some(b)) = &mut p.getter {
                                self.walk_block(b);
                            }
                            if let Some(Some(b)) = &mut p.setter {
                                self.walk_block(b);
                            }
                        }
                    }
                }
            }
            Declaration::Function(f) => {
                for p in &mut f.params {
                    self.walk_param(p);
                }
                if let Some(body) = &mut f.body {
                    self.walk_block(body);
                }
            }
            Declaration::TopLevelVar(v) => {
                if let Some(init) = &mut v.initializer {
                    self.walk_expr(init);
                }
            }
            Declaration::Struct(_) | Declaration::Enum(_) | Declaration::Typedef(_) | Declaration::Preprocessor(_) => {}
        }
    }

    fn walk_param(&mut self, p: &mut Param) {
        if let Some(d) = &mut p.default {
            self.walk_expr(d);
        }
    }

    fn walk_block(&mut self, block: &mut Block) {
        for stmt in &mut block.statements {
            self.walk_stmt(stmt);
        }
    }

    fn walk_stmt(&mut self, stmt: &mut Statement) {
        match stmt {
            Statement::VarDecl(v) => {
                if let Some(init) = &mut v.initializer {
                    self.walk_expr(init);
                }
            }
            Statement::Return { value, .. } => {
                if let Some(v) = value {
                    self.walk_expr(v);
                }
            }
            Statement::If { condition, then_block, else_block, .. } => {
                self.walk_expr(condition);
                self.walk_block(then_block);
                if let Some(e) = else_block {
                    self.walk_stmt(e);
                }
            }
            Statement::While { condition, body, .. } => {
                self.walk_expr(condition);
                self.walk_block(body);
            }
            Statement::DoWhile { body, condition, .. } => {
                self.walk_block(body);
                self.walk_expr(condition);
            }
            Statement::CFor { init, condition, update, body, .. } => {
                if let Some(i) = init {
                    self.walk_stmt(i);
                }
                if let Some(c) = condition {
                    self.walk_expr(c);
                }
                if let Some(u) = update {
                    self.walk_expr(u);
                }
                self.walk_block(body);
            }
            Statement::ForIn { iterable, body, .. } => {
                self.walk_expr(iterable);
                self.walk_block(body);
            }
            Statement::ParallelFor { iterable, body, .. } => {
                self.walk_expr(iterable);
                self.walk_block(body);
            }
            Statement::Switch { value, cases, .. } => {
                self.walk_expr(value);
                for case in cases {
                    if let Some(v) = &mut case.value {
                        self.walk_expr(v);
                    }
                    for s in &mut case.body {
                        self.walk_stmt(s);
                    }
                }
            }
            Statement::Break(_) | Statement::Continue(_) => {}
            Statement::Expr(e) => self.walk_expr(e),
            Statement::Delete { expr, .. } => self.walk_expr(expr),
            Statement::TryCatch { try_block, catch_block, .. } => {
                self.walk_block(try_block);
                self.walk_block(catch_block);
            }
            Statement::Throw { expr, .. } => self.walk_expr(expr),
            Statement::Block(b) => self.walk_block(b),
        }
    }

    fn walk_expr(&mut self, expr: &mut Expression) {
        match expr {
            Expression::IntLiteral { .. }
            | Expression::FloatLiteral { .. }
            | Expression::StringLiteral { .. }
            | Expression::CharLiteral { .. }
            | Expression::BoolLiteral { .. }
            | Expression::NullLiteral { .. }
            | Expression::Identifier { .. }
            | Expression::SelfExpr { .. } => {}
            Expression::FString { parts, .. } => {
                for part in parts {
                    if let Some(e) = &mut part.expr {
                        self.walk_expr(e);
                    }
                }
            }
            Expression::Binary { left, right, .. } => {
                self.walk_expr(left);
                self.walk_expr(right);
            }
            Expression::Unary { operand, .. } => self.walk_expr(operand),
            Expression::Ternary { condition, then_expr, else_expr, .. } => {
                self.walk_expr(condition);
                self.walk_expr(then_expr);
                self.walk_expr(else_expr);
            }
            Expression::Assign { target, value, .. } => {
                self.walk_expr(target);
                self.walk_expr(value);
            }
            Expression::Call { callee, args, .. } => {
                self.walk_expr(callee);
                for a in args {
                    self.walk_expr(a);
                }
            }
            Expression::Index { object, index, .. } => {
                self.walk_expr(object);
                self.walk_expr(index);
            }
            Expression::FieldAccess { object, .. } => self.walk_expr(object),
            Expression::Cast { expr, .. } => self.walk_expr(expr),
            Expression::Sizeof { operand, .. } => {
                if let slc_ast::SizeofOperand::Expr(e) = operand {
                    self.walk_expr(e);
                }
            }
            Expression::New { args, .. } => {
                for a in args {
                    self.walk_expr(a);
                }
            }
            Expression::Delete { expr, .. } => self.walk_expr(expr),
            Expression::ListLiteral { elements, .. } | Expression::TupleLiteral { elements, .. } => {
                for e in elements {
                    self.walk_expr(e);
                }
            }
            Expression::MapLiteral { entries, .. } => {
                for (k, v) in entries {
                    self.walk_expr(k);
                    self.walk_expr(v);
                }
            }
            Expression::BraceInitializer { elements, .. } => {
                for e in elements {
                    self.walk_expr(e);
                }
            }
            Expression::Lambda { lambda, .. } => {
                self.walk_block_in_place(&mut lambda.body);
                self.register_lambda(lambda);
            }
        }
    }

    /// Recurse into a lambda's own body before rendering it, so nested
    /// lambdas get names (and get emitted) before their enclosing lambda.
    fn walk_block_in_place(&mut self, block: &mut Block) {
        self.walk_block(block);
    }

    fn register_lambda(&mut self, lambda: &mut LambdaExpr) {
        self.lambda_counter += 1;
        let name = format!("__sl_lambda_{}", self.lambda_counter);
        lambda.synthetic_name = Some(name.clone());

        let ret_type = match &lambda.return_type {
            Some(t) => self.c_storage_type(t),
            None => self.infer_lambda_return_type(lambda),
        };
        let params_str = if lambda.params.is_empty() {
            "void".to_string()
        } else {
            lambda
                .params
                .iter()
                .map(|p| format!("{} {}", self.c_storage_type(&p.ty), p.name))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let saved_output = std::mem::take(&mut self.output);
        let saved_indent = self.indent;
        self.output = Vec::new();
        self.indent = 1;
        self.emit_block_contents(&lambda.body);
        let body_lines = std::mem::replace(&mut self.output, saved_output);
        self.indent = saved_indent;

        let mut def = String::new();
        def.push_str(&format!("static {ret_type} {name}({params_str}) {{\n"));
        for line in body_lines {
            def.push_str(&line);
            def.push('\n');
        }
        def.push_str("}\n");
        self.lambda_defs.push(def);
    }

    fn infer_lambda_return_type(&self, lambda: &LambdaExpr) -> String {
        for stmt in &lambda.body.statements {
            if let Statement::Return { value: Some(v), .. } = stmt {
                if let Some(t) = self.node_types.get(v.id()) {
                    return self.c_storage_type(t);
                }
            }
        }
        "int".to_string()
    }
}
