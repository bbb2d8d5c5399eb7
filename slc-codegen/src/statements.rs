use crate::context::CCodeGen;
use slc_ast::{Block, CaseClause, Expression, Statement};

/// Strips a matching pair of outer parens, leaving unbalanced or non-paired
/// parens (e.g. `(a) + (b)`) untouched.
fn strip_outer_parens(s: &str) -> &str {
    if let Some(inner) = s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        let mut depth = 0i32;
        let bytes = inner.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            if b == b'(' {
                depth += 1;
            } else if b == b')' {
                depth -= 1;
            }
            if depth < 0 && i < bytes.len() - 1 {
                return s;
            }
        }
        if depth == 0 {
            return inner;
        }
    }
    s
}

fn is_range_call(expr: &Expression) -> bool {
    matches!(expr, Expression::Call { callee, .. } if matches!(&**callee, Expression::Identifier { name, .. } if name == "range"))
}

fn case_ends_with_exit(body: &[Statement]) -> bool {
    match body.last() {
        None => true,
        Some(Statement::Break(_)) | Some(Statement::Return { .. }) | Some(Statement::Throw { .. }) => true,
        _ => false,
    }
}

impl CCodeGen {
    pub fn emit_block_contents(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.emit_stmt(stmt);
        }
    }

    pub fn emit_braced_block(&mut self, block: &Block) {
        self.emit("{");
        self.indent += 1;
        self.emit_block_contents(block);
        self.indent -= 1;
        self.emit("}");
    }

    pub fn emit_stmt(&mut self, stmt: &Statement) {
        match stmt {
            Statement::VarDecl(decl) => self.emit_var_decl(decl),
            Statement::Return { value, .. } => {
                if let Some(v) = value {
                    let c = self.expr_to_c(v);
                    self.emit(format!("return {c};"));
                } else {
                    self.emit("return;");
                }
            }
            Statement::If { condition, then_block, else_block, .. } => {
                self.emit_if(condition, then_block, else_block.as_deref());
            }
            Statement::While { condition, body, .. } => {
                let cond = self.expr_to_c(condition);
                self.emit(format!("while ({cond}) {{"));
                self.indent += 1;
                self.emit_block_contents(body);
                self.indent -= 1;
                self.emit("}");
            }
            Statement::DoWhile { body, condition, .. } => {
                self.emit("do {");
                self.indent += 1;
                self.emit_block_contents(body);
                self.indent -= 1;
                let cond = self.expr_to_c(condition);
                self.emit(format!("}} while ({cond});"));
            }
            Statement::CFor { init, condition, update, body, .. } => {
                self.emit_c_for(init.as_deref(), condition.as_ref(), update.as_ref(), body);
            }
            Statement::ForIn { var_name, second_var_name, iterable, body, .. } => {
                self.emit_for_in(var_name, second_var_name.as_deref(), iterable, body);
            }
            Statement::ParallelFor { var_name, iterable, body, .. } => {
                self.emit_parallel_for(var_name, iterable, body);
            }
            Statement::Switch { value, cases, .. } => self.emit_switch(value, cases),
            Statement::Break(_) => self.emit("break;"),
            Statement::Continue(_) => self.emit("continue;"),
            Statement::Expr(expr) => {
                let c = self.expr_to_c(expr);
                self.emit(format!("{c};"));
            }
            Statement::Delete { expr, .. } => {
                let c = self.delete_expr_to_c(expr);
                self.emit(format!("{c};"));
            }
            Statement::TryCatch { try_block, catch_var, catch_block, .. } => {
                self.emit_try_catch(try_block, catch_var, catch_block);
            }
            Statement::Throw { expr, .. } => {
                self.emit_helper("__sl_throw");
                let c = self.expr_to_c(expr);
                self.emit(format!("__sl_throw({c});"));
            }
            Statement::Block(block) => self.emit_braced_block(block),
        }
    }

    fn emit_var_decl(&mut self, decl: &slc_ast::VarDeclStmt) {
        let ty = match &decl.ty {
            Some(t) => t.clone(),
            None => slc_ast::TypeExpr::simple("int", decl.pos),
        };
        let c_type = self.type_to_c(&ty);
        let storage_type = self.c_storage_type(&ty);

        match (&decl.initializer, ty.base.as_str()) {
            (Some(Expression::ListLiteral { elements, .. }), _) if matches!(ty.base.as_str(), "List" | "Set") => {
                self.emit(format!("{storage_type} {} = {c_type}_new();", decl.name));
                for el in elements {
                    let ev = self.expr_to_c(el);
                    let method = if ty.base == "Set" { "add" } else { "push" };
                    self.emit(format!("{c_type}_{method}({}, {ev});", decl.name));
                }
                return;
            }
            (Some(Expression::MapLiteral { entries, .. }), "Map") => {
                self.emit(format!("{storage_type} {} = {c_type}_new();", decl.name));
                for (k, v) in entries {
                    let kc = self.expr_to_c(k);
                    let vc = self.expr_to_c(v);
                    self.emit(format!("{c_type}_put({}, {kc}, {vc});", decl.name));
                }
                return;
            }
            (Some(Expression::BraceInitializer { elements, .. }), "Map" | "List" | "Set") if elements.is_empty() => {
                self.emit(format!("{storage_type} {} = {c_type}_new();", decl.name));
                return;
            }
            (Some(Expression::Call { callee, args, .. }), _) => {
                if let Expression::Identifier { name, .. } = &**callee {
                    if self.class_table.contains_key(name) {
                        let arg_strs: Vec<String> = args.iter().map(|a| self.expr_to_c(a)).collect();
                        self.emit(format!(
                            "{storage_type} {} = {name}_new({});",
                            decl.name,
                            arg_strs.join(", ")
                        ));
                        return;
                    }
                }
            }
            _ => {}
        }

        match &decl.initializer {
            Some(init) => {
                let c = self.expr_to_c(init);
                self.emit(format!("{storage_type} {} = {c};", decl.name));
            }
            None => self.emit(format!("{storage_type} {};", decl.name)),
        }
    }

    fn emit_if(&mut self, condition: &Expression, then_block: &Block, else_block: Option<&Statement>) {
        let raw_cond = self.expr_to_c(condition);
        let cond = strip_outer_parens(&raw_cond).to_string();
        self.emit(format!("if ({cond}) {{"));
        self.indent += 1;
        self.emit_block_contents(then_block);
        self.indent -= 1;
        match else_block {
            Some(Statement::If { condition, then_block, else_block, .. }) => {
                self.emit("} else");
                self.emit_if(condition, then_block, else_block.as_deref());
            }
            Some(Statement::Block(block)) => {
                self.emit("} else {");
                self.indent += 1;
                self.emit_block_contents(block);
                self.indent -= 1;
                self.emit("}");
            }
            Some(other) => {
                self.emit("} else {");
                self.indent += 1;
                self.emit_stmt(other);
                self.indent -= 1;
                self.emit("}");
            }
            None => self.emit("}"),
        }
    }

    fn emit_c_for(
        &mut self,
        init: Option<&Statement>,
        condition: Option<&Expression>,
        update: Option<&Expression>,
        body: &Block,
    ) {
        let init_str = match init {
            Some(Statement::VarDecl(decl)) => {
                let ty = decl
                    .ty
                    .clone()
                    .unwrap_or_else(|| slc_ast::TypeExpr::simple("int", decl.pos));
                let c_type = self.c_storage_type(&ty);
                match &decl.initializer {
                    Some(e) => {
                        let c = self.expr_to_c(e);
                        format!("{c_type} {} = {c}", decl.name)
                    }
                    None => format!("{c_type} {}", decl.name),
                }
            }
            Some(Statement::Expr(expr)) => self.expr_to_c(expr),
            Some(other) => {
                let _ = other;
                String::new()
            }
            None => String::new(),
        };
        let cond_str = condition.map(|c| self.expr_to_c(c)).unwrap_or_default();
        let update_str = update.map(|u| self.expr_to_c(u)).unwrap_or_default();

        self.emit(format!("for ({init_str}; {cond_str}; {update_str}) {{"));
        self.indent += 1;
        self.emit_block_contents(body);
        self.indent -= 1;
        self.emit("}");
    }

    fn emit_for_in(&mut self, var_name: &str, var_name2: Option<&str>, iterable: &Expression, body: &Block) {
        if is_range_call(iterable) {
            self.emit_range_for(var_name, iterable, body);
            return;
        }

        let iterable_c = self.expr_to_c(iterable);
        let type_info = self.node_type(iterable.id());
        let acc = match &type_info {
            Some(t) => self.member_sep(t),
            None => ".",
        };
        let idx = format!("__sl_i_{var_name}");

        if let Some(t) = &type_info {
            if t.base == "Map" && t.generic_args.len() == 2 {
                let k_type = self.c_storage_type(&t.generic_args[0]);
                let v_type = self.c_storage_type(&t.generic_args[1]);
                self.emit(format!("for (int {idx} = 0; {idx} < {iterable_c}{acc}cap; {idx}++) {{"));
                self.indent += 1;
                self.emit(format!("if (!{iterable_c}{acc}occupied[{idx}]) continue;"));
                self.emit(format!("{k_type} {var_name} = {iterable_c}{acc}keys[{idx}];"));
                if let Some(v) = var_name2 {
                    self.emit(format!("{v_type} {v} = {iterable_c}{acc}values[{idx}];"));
                }
                self.emit_block_contents(body);
                self.indent -= 1;
                self.emit("}");
                return;
            }
            if t.base == "Set" && !t.generic_args.is_empty() {
                let elem_type = self.c_storage_type(&t.generic_args[0]);
                self.emit(format!("for (int {idx} = 0; {idx} < {iterable_c}{acc}cap; {idx}++) {{"));
                self.indent += 1;
                self.emit(format!("if (!{iterable_c}{acc}occupied[{idx}]) continue;"));
                self.emit(format!("{elem_type} {var_name} = {iterable_c}{acc}keys[{idx}];"));
                self.emit_block_contents(body);
                self.indent -= 1;
                self.emit("}");
                return;
            }
            if t.base == "string" && t.pointer_depth >= 2 {
                self.emit(format!("for (int {idx} = 0; {iterable_c}[{idx}] != NULL; {idx}++) {{"));
                self.indent += 1;
                self.emit(format!("char* {var_name} = {iterable_c}[{idx}];"));
                self.emit_block_contents(body);
                self.indent -= 1;
                self.emit("}");
                return;
            }
            if t.base == "string" || (t.base == "char" && t.pointer_depth >= 1) {
                self.emit(format!("for (int {idx} = 0; {iterable_c}[{idx}] != '\\0'; {idx}++) {{"));
                self.indent += 1;
                self.emit(format!("char {var_name} = {iterable_c}[{idx}];"));
                self.emit_block_contents(body);
                self.indent -= 1;
                self.emit("}");
                return;
            }
        }

        let elem_type = type_info
            .as_ref()
            .and_then(|t| t.generic_args.first())
            .map(|a| self.c_storage_type(a))
            .unwrap_or_else(|| "int".to_string());
        self.emit(format!("for (int {idx} = 0; {idx} < {iterable_c}{acc}len; {idx}++) {{"));
        self.indent += 1;
        self.emit(format!("{elem_type} {var_name} = {iterable_c}{acc}data[{idx}];"));
        self.emit_block_contents(body);
        self.indent -= 1;
        self.emit("}");
    }

    fn emit_range_for(&mut self, var_name: &str, iterable: &Expression, body: &Block) {
        let args = match iterable {
            Expression::Call { args, .. } => args,
            _ => return,
        };
        match args.len() {
            1 => {
                let end = self.expr_to_c(&args[0]);
                self.emit(format!("for (int {var_name} = 0; {var_name} < {end}; {var_name}++) {{"));
            }
            2 => {
                let start = self.expr_to_c(&args[0]);
                let end = self.expr_to_c(&args[1]);
                self.emit(format!(
                    "for (int {var_name} = {start}; {var_name} < {end}; {var_name}++) {{"
                ));
            }
            3 => {
                let start = self.expr_to_c(&args[0]);
                let end = self.expr_to_c(&args[1]);
                let step = self.expr_to_c(&args[2]);
                let step_var = self.next_tmp();
                self.emit(format!("int {step_var} = {step};"));
                self.emit(format!(
                    "for (int {var_name} = {start}; ({step_var} > 0 ? {var_name} < {end} : {var_name} > {end}); {var_name} += {step_var}) {{"
                ));
            }
            _ => {
                self.emit("/* invalid range() call */");
                return;
            }
        }
        self.indent += 1;
        self.emit_block_contents(body);
        self.indent -= 1;
        self.emit("}");
    }

    fn emit_parallel_for(&mut self, var_name: &str, iterable: &Expression, body: &Block) {
        let iterable_c = self.expr_to_c(iterable);
        let type_info = self.node_type(iterable.id());
        let acc = match &type_info {
            Some(t) => self.member_sep(t),
            None => ".",
        };
        let idx = format!("__sl_i_{var_name}");
        let elem_type = type_info
            .as_ref()
            .and_then(|t| t.generic_args.first())
            .map(|a| self.c_storage_type(a))
            .unwrap_or_else(|| "int".to_string());

        self.emit("#pragma omp parallel for");
        self.emit(format!("for (int {idx} = 0; {idx} < {iterable_c}{acc}len; {idx}++) {{"));
        self.indent += 1;
        self.emit(format!("{elem_type} {var_name} = {iterable_c}{acc}data[{idx}];"));
        self.emit_block_contents(body);
        self.indent -= 1;
        self.emit("}");
    }

    fn emit_switch(&mut self, value: &Expression, cases: &[CaseClause]) {
        let v = self.expr_to_c(value);
        self.emit(format!("switch ({v}) {{"));
        self.indent += 1;
        for case in cases {
            match &case.value {
                Some(e) => {
                    let c = self.expr_to_c(e);
                    self.emit(format!("case {c}:"));
                }
                None => self.emit("default:"),
            }
            self.indent += 1;
            for s in &case.body {
                self.emit_stmt(s);
            }
            if !case_ends_with_exit(&case.body) {
                self.emit("break;");
            }
            self.indent -= 1;
        }
        self.indent -= 1;
        self.emit("}");
    }

    fn emit_try_catch(&mut self, try_block: &Block, catch_var: &str, catch_block: &Block) {
        self.emit_helper("__sl_trycatch_globals");
        self.emit(
            "if (__sl_try_top + 1 >= __SL_TRY_STACK_MAX) { fprintf(stderr, \"sl: try stack overflow\\n\"); exit(1); }",
        );
        self.emit("__sl_try_top++;");
        self.emit("if (setjmp(__sl_try_stack[__sl_try_top - 1]) == 0) {");
        self.indent += 1;
        self.emit_block_contents(try_block);
        self.emit_helper("__sl_discard_cleanups");
        self.emit("__sl_discard_cleanups(__sl_try_top);");
        self.emit("__sl_try_top--;");
        self.indent -= 1;
        self.emit("} else {");
        self.indent += 1;
        self.emit("__sl_try_top--;");
        self.emit(format!("const char* {catch_var} = __sl_error_msg;"));
        self.emit_block_contents(catch_block);
        self.indent -= 1;
        self.emit("}");
    }
}
