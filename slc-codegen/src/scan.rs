use slc_ast::{Block, CaseClause, Declaration, Expression, Program, Statement};
use std::collections::HashSet;

/// What one pass over the whole program found, feeding the header/runtime
/// phases (SPEC_FULL §4.4 phases 3-4). A single Rust-typed walk replaces the
/// reference implementation's generic attribute-name traversal.
#[derive(Default)]
pub struct Usage {
    pub libc_headers: HashSet<&'static str>,
    pub needs_string_helpers: bool,
    pub needs_try_catch: bool,
    pub needs_math: bool,
}

const STRING_METHODS: &[&str] =
    &["substring", "trim", "toUpper", "toLower", "indexOf", "split", "charLen", "concat", "equals"];

const MATH_METHODS: &[&str] = &["factorial", "gcd", "lcm", "fibonacci", "isPrime", "sum", "fsum"];

pub fn scan(program: &Program) -> Usage {
    let mut usage = Usage::default();
    for decl in &program.declarations {
        scan_decl(decl, &mut usage);
    }
    usage
}

fn scan_decl(decl: &Declaration, usage: &mut Usage) {
    match decl {
        Declaration::Class(class) => {
            for member in &class.members {
                match member {
                    slc_ast::ClassMember::Method(m) => scan_block(&m.body, usage),
                    slc_ast::ClassMember::Field(f) => {
                        if let Some(init) = &f.initializer {
                            scan_expr(init, usage);
                        }
                    }
                    slc_ast::ClassMember::Property(p) => {
                        if let Some(Some(b)) = &p.getter {
                            scan_block(b, usage);
                        }
                        if let Some(Some(b)) = &p.setter {
                            scan_block(b, usage);
                        }
                    }
                }
            }
        }
        Declaration::Function(f) => {
            if let Some(body) = &f.body {
                scan_block(body, usage);
            }
        }
        Declaration::TopLevelVar(v) => {
            if let Some(init) = &v.initializer {
                scan_expr(init, usage);
            }
        }
        Declaration::Preprocessor(_) | Declaration::Struct(_) | Declaration::Enum(_) | Declaration::Typedef(_) => {}
    }
}

fn scan_block(block: &Block, usage: &mut Usage) {
    for stmt in &block.statements {
        scan_stmt(stmt, usage);
    }
}

fn scan_stmt(stmt: &Statement, usage: &mut Usage) {
    match stmt {
        Statement::VarDecl(v) => {
            if let Some(init) = &v.initializer {
                scan_expr(init, usage);
            }
        }
        Statement::Return { value, .. } => {
            if let Some(v) = value {
                scan_expr(v, usage);
            }
        }
        Statement::If { condition, then_block, else_block, .. } => {
            scan_expr(condition, usage);
            scan_block(then_block, usage);
            if let Some(e) = else_block {
                scan_stmt(e, usage);
            }
        }
        Statement::While { condition, body, .. } => {
            scan_expr(condition, usage);
            scan_block(body, usage);
        }
        Statement::DoWhile { body, condition, .. } => {
            scan_block(body, usage);
            scan_expr(condition, usage);
        }
        Statement::CFor { init, condition, update, body, .. } => {
            if let Some(i) = init {
                scan_stmt(i, usage);
            }
            if let Some(c) = condition {
                scan_expr(c, usage);
            }
            if let Some(u) = update {
                scan_stmt(u, usage);
            }
            scan_block(body, usage);
        }
        Statement::ForIn { iterable, body, .. } | Statement::ParallelFor { iterable, body, .. } => {
            scan_expr(iterable, usage);
            scan_block(body, usage);
        }
        Statement::Switch { value, cases, .. } => {
            scan_expr(value, usage);
            for case in cases {
                scan_case(case, usage);
            }
        }
        Statement::Break(_) | Statement::Continue(_) => {}
        Statement::Expr(e) => scan_expr(e, usage),
        Statement::Delete { expr, .. } => scan_expr(expr, usage),
        Statement::TryCatch { try_block, catch_block, .. } => {
            usage.needs_try_catch = true;
            scan_block(try_block, usage);
            scan_block(catch_block, usage);
        }
        Statement::Throw { expr, .. } => {
            usage.needs_try_catch = true;
            scan_expr(expr, usage);
        }
        Statement::Block(b) => scan_block(b, usage),
    }
}

fn scan_case(case: &CaseClause, usage: &mut Usage) {
    if let Some(v) = &case.value {
        scan_expr(v, usage);
    }
    for stmt in &case.body {
        scan_stmt(stmt, usage);
    }
}

fn scan_expr(expr: &Expression, usage: &mut Usage) {
    match expr {
        Expression::Call { callee, args, .. } => {
            if let Expression::FieldAccess { object, field, .. } = callee.as_ref() {
                if STRING_METHODS.contains(&field.as_str()) {
                    usage.needs_string_helpers = true;
                }
                if MATH_METHODS.contains(&field.as_str()) {
                    usage.needs_math = true;
                }
                scan_expr(object, usage);
            } else if let Expression::Identifier { name, .. } = callee.as_ref() {
                if let Some(header) = libc_header_for(name) {
                    usage.libc_headers.insert(header);
                }
            } else {
                scan_expr(callee, usage);
            }
            for arg in args {
                scan_expr(arg, usage);
            }
        }
        Expression::Binary { left, right, .. } => {
            scan_expr(left, usage);
            scan_expr(right, usage);
        }
        Expression::Unary { operand, .. } => scan_expr(operand, usage),
        Expression::Ternary { condition, then_expr, else_expr, .. } => {
            scan_expr(condition, usage);
            scan_expr(then_expr, usage);
            scan_expr(else_expr, usage);
        }
        Expression::Assign { target, value, .. } => {
            scan_expr(target, usage);
            scan_expr(value, usage);
        }
        Expression::Index { object, index, .. } => {
            scan_expr(object, usage);
            scan_expr(index, usage);
        }
        Expression::FieldAccess { object, .. } => scan_expr(object, usage),
        Expression::Cast { expr, .. } => scan_expr(expr, usage),
        Expression::Sizeof { operand, .. } => {
            if let slc_ast::SizeofOperand::Expr(e) = operand {
                scan_expr(e, usage);
            }
        }
        Expression::New { args, .. } => {
            for arg in args {
                scan_expr(arg, usage);
            }
        }
        Expression::Delete { expr, .. } => scan_expr(expr, usage),
        Expression::ListLiteral { elements, .. } | Expression::TupleLiteral { elements, .. } | Expression::BraceInitializer { elements, .. } => {
            for e in elements {
                scan_expr(e, usage);
            }
        }
        Expression::MapLiteral { entries, .. } => {
            for (k, v) in entries {
                scan_expr(k, usage);
                scan_expr(v, usage);
            }
        }
        Expression::FString { parts, .. } => {
            for part in parts {
                if let Some(e) = &part.expr {
                    scan_expr(e, usage);
                }
            }
        }
        Expression::Lambda { lambda, .. } => scan_block(&lambda.body, usage),
        Expression::IntLiteral { .. }
        | Expression::FloatLiteral { .. }
        | Expression::StringLiteral { .. }
        | Expression::CharLiteral { .. }
        | Expression::BoolLiteral { .. }
        | Expression::NullLiteral { .. }
        | Expression::Identifier { .. }
        | Expression::SelfExpr { .. } => {}
    }
}

fn libc_header_for(name: &str) -> Option<&'static str> {
    Some(match name {
        "printf" | "fprintf" | "sprintf" | "snprintf" | "scanf" | "fopen" | "fclose" | "fread" | "fwrite"
        | "fgets" | "fputs" | "puts" | "perror" | "fflush" => "<stdio.h>",
        "malloc" | "calloc" | "realloc" | "free" | "exit" | "abort" | "atoi" | "atof" | "atol" | "rand"
        | "srand" | "qsort" => "<stdlib.h>",
        "sin" | "cos" | "tan" | "sqrt" | "pow" | "exp" | "log" | "log2" | "log10" | "ceil" | "floor"
        | "round" | "fabs" | "fmod" => "<math.h>",
        "memcmp" | "memmove" | "strtok" | "strdup" => "<string.h>",
        "isprint" | "ispunct" => "<ctype.h>",
        "assert" => "<assert.h>",
        "time" | "clock" | "difftime" | "mktime" | "strftime" => "<time.h>",
        _ => return None,
    })
}
