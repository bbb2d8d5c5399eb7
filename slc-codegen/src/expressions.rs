use crate::context::CCodeGen;
use slc_ast::{AssignOp, BinaryOp, Expression, SizeofOperand, TypeExpr, UnaryOp};

const STRING_METHOD_HELPERS: &[(&str, &str)] = &[
    ("substring", "__sl_substring"),
    ("trim", "__sl_trim"),
    ("toUpper", "__sl_toUpper"),
    ("toLower", "__sl_toLower"),
    ("equals", "__sl_equals"),
    ("charAt", "__sl_charAt"),
    ("indexOf", "__sl_indexOf"),
    ("lastIndexOf", "__sl_lastIndexOf"),
    ("isEmpty", "__sl_isEmpty"),
    ("startsWith", "__sl_startsWith"),
    ("endsWith", "__sl_endsWith"),
    ("contains", "__sl_strContains"),
    ("count", "__sl_count"),
    ("find", "__sl_find"),
    ("charLen", "__sl_charLen"),
    ("concat", "__sl_concat"),
];

const MATH_METHOD_HELPERS: &[(&str, &str)] = &[
    ("factorial", "__sl_math_factorial"),
    ("gcd", "__sl_math_gcd"),
    ("lcm", "__sl_math_lcm"),
    ("fibonacci", "__sl_math_fibonacci"),
    ("isPrime", "__sl_math_isPrime"),
    ("sum", "__sl_math_sum_int"),
    ("fsum", "__sl_math_fsum"),
];

/// Symbol-to-dunder-method mapping for operator overloading (SPEC_FULL §9:
/// "operator overloading is a name-map from operator symbol to dunder
/// method name, codegen-authoritative").
fn dunder_for(op: &BinaryOp) -> Option<&'static str> {
    Some(match op {
        BinaryOp::Add => "__add__",
        BinaryOp::Sub => "__sub__",
        BinaryOp::Mul => "__mul__",
        BinaryOp::Div => "__div__",
        BinaryOp::Mod => "__mod__",
        BinaryOp::Eq => "__eq__",
        BinaryOp::NotEq => "__ne__",
        BinaryOp::Lt => "__lt__",
        BinaryOp::LtEq => "__le__",
        BinaryOp::Gt => "__gt__",
        BinaryOp::GtEq => "__ge__",
        _ => return None,
    })
}

impl CCodeGen {
    pub(crate) fn node_type(&self, id: slc_ast::NodeId) -> Option<TypeExpr> {
        self.node_types.get(id).cloned()
    }

    pub(crate) fn is_string_type(&self, ty: &TypeExpr) -> bool {
        ty.base == "string" || (ty.base == "char" && ty.pointer_depth >= 1)
    }

    pub(crate) fn is_numeric_type(&self, ty: &TypeExpr) -> bool {
        matches!(ty.base.as_str(), "int" | "float" | "double" | "long" | "short")
    }

    pub(crate) fn class_of(&self, ty: &TypeExpr) -> Option<&slc_analyzer::ClassInfo> {
        self.class_table.get(&ty.base)
    }

    pub(crate) fn next_tmp(&mut self) -> String {
        self.tmp_counter += 1;
        format!("__sl_tmp{}", self.tmp_counter)
    }

    pub fn expr_to_c(&mut self, expr: &Expression) -> String {
        match expr {
            Expression::IntLiteral { raw, .. } => raw.clone(),
            Expression::FloatLiteral { raw, .. } => raw.clone(),
            Expression::StringLiteral { value, .. } => format!("\"{}\"", escape_c_string(value)),
            Expression::CharLiteral { value, .. } => format!("'{}'", value),
            Expression::BoolLiteral { value, .. } => if *value { "true".to_string() } else { "false".to_string() },
            Expression::NullLiteral { .. } => "NULL".to_string(),
            Expression::Identifier { name, .. } => name.clone(),
            Expression::SelfExpr { .. } => "self".to_string(),
            Expression::FString { parts, .. } => self.fstring_to_c(parts),
            Expression::Binary { left, op, right, id, .. } => self.binary_to_c(left, op, right, *id),
            Expression::Unary { op, operand, .. } => self.unary_to_c(op, operand),
            Expression::Ternary { condition, then_expr, else_expr, .. } => {
                format!(
                    "({} ? {} : {})",
                    self.expr_to_c(condition),
                    self.expr_to_c(then_expr),
                    self.expr_to_c(else_expr)
                )
            }
            Expression::Assign { target, op, value, .. } => self.assign_to_c(target, op, value),
            Expression::Call { callee, args, id, .. } => self.call_to_c(callee, args, *id),
            Expression::Index { object, index, id, .. } => self.index_to_c(object, index, *id),
            Expression::FieldAccess { object, field, arrow, optional, id, .. } => {
                self.field_access_to_c(object, field, *arrow, *optional, *id)
            }
            Expression::Cast { target_type, expr, .. } => {
                format!("(({}){})", self.c_storage_type(target_type), self.expr_to_c(expr))
            }
            Expression::Sizeof { operand, .. } => match operand {
                SizeofOperand::Type(ty) => format!("sizeof({})", self.type_to_c(ty)),
                SizeofOperand::Expr(e) => format!("sizeof({})", self.expr_to_c(e)),
            },
            Expression::New { ty, args, .. } => self.new_to_c(ty, args),
            Expression::Delete { expr, .. } => self.delete_expr_to_c(expr),
            Expression::ListLiteral { elements, id, .. } => self.list_literal_to_c(elements, *id),
            Expression::MapLiteral { entries, id, .. } => self.map_literal_to_c(entries, *id),
            Expression::TupleLiteral { elements, id, .. } => self.tuple_literal_to_c(elements, *id),
            Expression::BraceInitializer { elements, .. } => {
                let parts: Vec<String> = elements.iter().map(|e| self.expr_to_c(e)).collect();
                format!("{{{}}}", parts.join(", "))
            }
            Expression::Lambda { lambda, .. } => {
                lambda.synthetic_name.clone().unwrap_or_else(|| "NULL".to_string())
            }
        }
    }

    pub(crate) fn binary_to_c(
        &mut self,
        left: &Expression,
        op: &BinaryOp,
        right: &Expression,
        id: slc_ast::NodeId,
    ) -> String {
        let left_ty = self.node_type(left.id());
        let right_ty = self.node_type(right.id());

        if let (Some(lty), true) = (&left_ty, left_ty.as_ref().map(|t| self.is_string_type(t)).unwrap_or(false)) {
            let l = self.expr_to_c(left);
            let r = self.expr_to_c(right);
            let _ = lty;
            match op {
                BinaryOp::Add => {
                    self.emit_helper("__sl_concat");
                    return format!("__sl_concat({l}, {r})");
                }
                BinaryOp::Eq => return format!("(strcmp({l}, {r}) == 0)"),
                BinaryOp::NotEq => return format!("(strcmp({l}, {r}) != 0)"),
                BinaryOp::Lt => return format!("(strcmp({l}, {r}) < 0)"),
                BinaryOp::LtEq => return format!("(strcmp({l}, {r}) <= 0)"),
                BinaryOp::Gt => return format!("(strcmp({l}, {r}) > 0)"),
                BinaryOp::GtEq => return format!("(strcmp({l}, {r}) >= 0)"),
                _ => {}
            }
        }

        if let Some(lty) = &left_ty {
            if let Some(class) = self.class_of(lty) {
                if let Some(dunder) = dunder_for(op) {
                    if class.methods.contains_key(dunder) {
                        let class_name = class.name.clone();
                        let l = self.expr_to_c(left);
                        let r = self.expr_to_c(right);
                        return format!("{class_name}_{dunder}({l}, {r})");
                    }
                }
            }
        }

        match op {
            BinaryOp::Div => {
                let l = self.expr_to_c(left);
                let r = self.expr_to_c(right);
                let is_float = left_ty.as_ref().map(|t| matches!(t.base.as_str(), "float" | "double")).unwrap_or(false)
                    || right_ty.as_ref().map(|t| matches!(t.base.as_str(), "float" | "double")).unwrap_or(false);
                if is_float {
                    self.emit_helper("__sl_div_double");
                    format!("__sl_div_double({l}, {r})")
                } else {
                    self.emit_helper("__sl_div_int");
                    format!("__sl_div_int({l}, {r})")
                }
            }
            BinaryOp::Mod => {
                let l = self.expr_to_c(left);
                let r = self.expr_to_c(right);
                self.emit_helper("__sl_mod_int");
                format!("__sl_mod_int({l}, {r})")
            }
            BinaryOp::NullCoalesce => {
                let tmp = self.next_tmp();
                let l = self.expr_to_c(left);
                let r = self.expr_to_c(right);
                let _ = id;
                format!("({{ __typeof__({l}) {tmp} = {l}; {tmp} != NULL ? {tmp} : ({r}); }})")
            }
            _ => {
                let l = self.expr_to_c(left);
                let r = self.expr_to_c(right);
                format!("({l} {} {r})", binary_op_symbol(op))
            }
        }
    }

    pub(crate) fn unary_to_c(&mut self, op: &UnaryOp, operand: &Expression) -> String {
        let e = self.expr_to_c(operand);
        match op {
            UnaryOp::Neg => format!("(-{e})"),
            UnaryOp::Not => format!("(!{e})"),
            UnaryOp::BitNot => format!("(~{e})"),
            UnaryOp::PreIncrement => format!("(++{e})"),
            UnaryOp::PreDecrement => format!("(--{e})"),
            UnaryOp::PostIncrement => format!("({e}++)"),
            UnaryOp::PostDecrement => format!("({e}--)"),
        }
    }

    pub(crate) fn assign_to_c(&mut self, target: &Expression, op: &AssignOp, value: &Expression) -> String {
        if let Expression::Index { object, index, id, .. } = target {
            let obj_ty = self.node_type(object.id());
            if let Some(ty) = obj_ty {
                if ty.base == "List" || ty.base == "Map" {
                    let name = self.type_to_c(&ty);
                    let obj = self.expr_to_c(object);
                    let idx = self.expr_to_c(index);
                    let val = self.expr_to_c(value);
                    let setter = if ty.base == "List" { "set" } else { "put" };
                    let _ = id;
                    return format!("{name}_{setter}({obj}, {idx}, {val})");
                }
            }
        }
        if let Expression::FieldAccess { object, field, .. } = target {
            if let Some(setter) = self.property_setter(object, field) {
                let val = self.expr_to_c(value);
                return format!("{setter}({val})");
            }
        }

        let t = self.expr_to_c(target);
        let target_ty = self.node_type(target.id());
        if matches!(op, AssignOp::Add) && target_ty.as_ref().map(|t| self.is_string_type(t)).unwrap_or(false) {
            let v = self.expr_to_c(value);
            self.emit_helper("__sl_concat");
            return format!("{t} = __sl_concat({t}, {v})");
        }
        let v = self.expr_to_c(value);
        format!("{t} {} {v}", assign_op_symbol(op))
    }

    /// Returns a call prefix like `Class_set_field(obj` (missing the closing
    /// paren and value argument) when `field` on `object` is a user-class
    /// property, so the caller can append `, value)`.
    pub(crate) fn property_setter(&mut self, object: &Expression, field: &str) -> Option<String> {
        let ty = self.node_type(object.id())?;
        let class = self.class_of(&ty)?;
        if !class.properties.contains_key(field) {
            return None;
        }
        let class_name = class.name.clone();
        let obj = self.expr_to_c(object);
        Some(format!("{class_name}_set_{field}({obj}"))
    }

    pub(crate) fn call_to_c(&mut self, callee: &Expression, args: &[Expression], _id: slc_ast::NodeId) -> String {
        if let Expression::FieldAccess { object, field, .. } = callee {
            return self.method_call_to_c(object, field, args);
        }
        if let Expression::Identifier { name, .. } = callee {
            if name == "print" && !self.function_table.contains_key("print") {
                return self.print_to_c(args);
            }
            let rendered_args: Vec<String> = args.iter().map(|a| self.expr_to_c(a)).collect();
            return format!("{name}({})", rendered_args.join(", "));
        }
        let c = self.expr_to_c(callee);
        let rendered_args: Vec<String> = args.iter().map(|a| self.expr_to_c(a)).collect();
        format!("{c}({})", rendered_args.join(", "))
    }

    pub(crate) fn method_call_to_c(&mut self, object: &Expression, field: &str, args: &[Expression]) -> String {
        if let Expression::Identifier { name, .. } = object {
            if name == "Strings" {
                if let Some((_, helper)) = STRING_METHOD_HELPERS.iter().find(|(m, _)| *m == field) {
                    self.emit_helper(helper);
                    let rendered_args: Vec<String> = args.iter().map(|a| self.expr_to_c(a)).collect();
                    return format!("{helper}({})", rendered_args.join(", "));
                }
            }
            if name == "Math" {
                if let Some((_, helper)) = MATH_METHOD_HELPERS.iter().find(|(m, _)| *m == field) {
                    self.emit_helper(helper);
                    let rendered_args: Vec<String> = args.iter().map(|a| self.expr_to_c(a)).collect();
                    return format!("{helper}({})", rendered_args.join(", "));
                }
            }
            if self.class_table.contains_key(name) && field == "new" {
                // handled via Expression::New in practice; fall through otherwise
            }
        }

        let obj_ty = self.node_type(object.id());
        let obj = self.expr_to_c(object);
        let rendered_args: Vec<String> = args.iter().map(|a| self.expr_to_c(a)).collect();

        if let Some(ty) = &obj_ty {
            if self.is_string_type(ty) {
                if field == "toString" {
                    return obj;
                }
                if let Some((_, helper)) = STRING_METHOD_HELPERS.iter().find(|(m, _)| *m == field) {
                    self.emit_helper(helper);
                    let mut all = vec![obj];
                    all.extend(rendered_args);
                    return format!("{helper}({})", all.join(", "));
                }
            }
            if self.is_numeric_type(ty) && field == "toString" {
                let helper = match ty.base.as_str() {
                    "int" => "__sl_intToString",
                    "long" => "__sl_longToString",
                    "float" => "__sl_floatToString",
                    "double" => "__sl_doubleToString",
                    _ => "__sl_intToString",
                };
                self.emit_helper(helper);
                return format!("{helper}({obj})");
            }
            if TypeExpr::is_container_base(&ty.base) {
                let c_type = self.type_to_c(ty);
                let mut all = vec![obj];
                all.extend(rendered_args);
                return format!("{c_type}_{field}({})", all.join(", "));
            }
            if let Some(class) = self.class_of(ty) {
                if class.properties.contains_key(field) && args.is_empty() {
                    let class_name = class.name.clone();
                    return format!("{class_name}_get_{field}({obj})");
                }
                let class_name = class.name.clone();
                let mut all = vec![obj];
                all.extend(rendered_args);
                return format!("{class_name}_{field}({})", all.join(", "));
            }
        }

        let mut all = vec![obj];
        all.extend(rendered_args);
        format!("{field}({})", all.join(", "))
    }

    pub(crate) fn index_to_c(&mut self, object: &Expression, index: &Expression, _id: slc_ast::NodeId) -> String {
        let obj_ty = self.node_type(object.id());
        let obj = self.expr_to_c(object);
        let idx = self.expr_to_c(index);
        match obj_ty.as_ref().map(|t| t.base.as_str()) {
            Some("List") => {
                let name = self.type_to_c(obj_ty.as_ref().unwrap());
                format!("{name}_get({obj}, {idx})")
            }
            Some("Map") => {
                let name = self.type_to_c(obj_ty.as_ref().unwrap());
                format!("{name}_get({obj}, {idx})")
            }
            Some("Array") => format!("{obj}.data[{idx}]"),
            _ => format!("{obj}[{idx}]"),
        }
    }

    pub(crate) fn field_access_to_c(
        &mut self,
        object: &Expression,
        field: &str,
        arrow: bool,
        optional: bool,
        id: slc_ast::NodeId,
    ) -> String {
        let obj_ty = self.node_type(object.id());
        let obj = self.expr_to_c(object);
        if let Some(ty) = &obj_ty {
            if let Some(class) = self.class_of(ty) {
                if class.properties.contains_key(field) {
                    let class_name = class.name.clone();
                    return format!("{class_name}_get_{field}({obj})");
                }
            }
        }
        if matches!(object, Expression::SelfExpr { .. }) {
            return format!("{obj}->{field}");
        }
        let sep = if arrow { "->" } else { "." };
        if optional {
            let default = self.default_for_field(id);
            format!("({obj} != NULL ? {obj}{sep}{field} : {default})")
        } else {
            format!("{obj}{sep}{field}")
        }
    }

    /// Type-appropriate default for an optional-chained field access whose
    /// receiver is NULL: NULL for pointers/strings, 0.0 for float/double,
    /// false for bool, 0 otherwise.
    fn default_for_field(&mut self, id: slc_ast::NodeId) -> &'static str {
        match self.node_type(id) {
            Some(ty) if ty.pointer_depth > 0 || ty.base == "string" => "NULL",
            Some(ty) if ty.base == "float" || ty.base == "double" => "0.0",
            Some(ty) if ty.base == "bool" => "false",
            _ => "0",
        }
    }

    pub(crate) fn new_to_c(&mut self, ty: &TypeExpr, args: &[Expression]) -> String {
        let c_type = self.type_to_c(ty);
        let rendered_args: Vec<String> = args.iter().map(|a| self.expr_to_c(a)).collect();
        if TypeExpr::is_container_base(&ty.base) {
            return format!("{c_type}_new()");
        }
        format!("{c_type}_new({})", rendered_args.join(", "))
    }

    pub(crate) fn delete_expr_to_c(&mut self, expr: &Expression) -> String {
        let ty = self.node_type(expr.id());
        let e = self.expr_to_c(expr);
        if let Some(ty) = &ty {
            if TypeExpr::is_container_base(&ty.base) {
                let c_type = self.type_to_c(ty);
                return format!("{c_type}_free({e})");
            }
            if let Some(class) = self.class_of(ty) {
                let class_name = class.name.clone();
                return format!("{class_name}_destroy({e})");
            }
        }
        format!("free({e})")
    }

    pub(crate) fn list_literal_to_c(&mut self, elements: &[Expression], id: slc_ast::NodeId) -> String {
        let ty = self.node_type(id).unwrap_or_else(|| TypeExpr::simple("List", Default::default()));
        let name = self.type_to_c(&ty);
        let tmp = self.next_tmp();
        let mut body = format!("{name}* {tmp} = {name}_new();");
        for el in elements {
            let v = self.expr_to_c(el);
            body.push_str(&format!(" {name}_push({tmp}, {v});"));
        }
        format!("({{ {body} {tmp}; }})")
    }

    pub(crate) fn map_literal_to_c(&mut self, entries: &[(Expression, Expression)], id: slc_ast::NodeId) -> String {
        let ty = self.node_type(id).unwrap_or_else(|| TypeExpr::simple("Map", Default::default()));
        let name = self.type_to_c(&ty);
        let tmp = self.next_tmp();
        let mut body = format!("{name}* {tmp} = {name}_new();");
        for (k, v) in entries {
            let kc = self.expr_to_c(k);
            let vc = self.expr_to_c(v);
            body.push_str(&format!(" {name}_put({tmp}, {kc}, {vc});"));
        }
        format!("({{ {body} {tmp}; }})")
    }

    pub(crate) fn tuple_literal_to_c(&mut self, elements: &[Expression], id: slc_ast::NodeId) -> String {
        let ty = self.node_type(id).unwrap_or_else(|| TypeExpr::simple("Tuple", Default::default()));
        let name = self.type_to_c(&ty);
        let parts: Vec<String> = elements.iter().map(|e| self.expr_to_c(e)).collect();
        format!("(({name}){{{}}})", parts.join(", "))
    }

    pub(crate) fn fstring_to_c(&mut self, parts: &[slc_ast::FStringPart]) -> String {
        let (fmt, args) = self.fstring_format_parts(parts);
        let tmp = self.next_tmp();
        let fmt_lit = format!("\"{fmt}\"");
        let args_str = if args.is_empty() { String::new() } else { format!(", {}", args.join(", ")) };
        let size_call = format!("snprintf(NULL, 0, {fmt_lit}{args_str})");
        format!(
            "({{ int {tmp}_n = {size_call}; char* {tmp} = (char*)malloc((size_t){tmp}_n + 1); snprintf({tmp}, (size_t){tmp}_n + 1, {fmt_lit}{args_str}); {tmp}; }})"
        )
    }

    /// Splits an f-string into a printf-style format string and its argument
    /// list, without the `snprintf`-into-heap-buffer wrapper `fstring_to_c`
    /// needs when the f-string is used as a `string` value. Shared by
    /// `fstring_to_c` and `print_to_c`, which inlines the format string
    /// straight into a `printf(...)` call instead.
    fn fstring_format_parts(&mut self, parts: &[slc_ast::FStringPart]) -> (String, Vec<String>) {
        let mut fmt = String::new();
        let mut args = Vec::new();
        for part in parts {
            if let Some(text) = &part.text {
                fmt.push_str(&escape_c_string(text));
            }
            if let Some(expr) = &part.expr {
                let ty = self.node_type(expr.id());
                fmt.push_str(printf_specifier(ty.as_ref()));
                args.push(self.expr_to_c(expr));
            }
        }
        (fmt, args)
    }

    /// Lowers a builtin `print(...)` call to `printf`, space-joining multiple
    /// arguments and appending a trailing newline (SPEC_FULL §8 "hello
    /// world"). String literals and f-strings contribute to the format string
    /// directly; everything else gets a specifier from `printf_specifier`.
    pub(crate) fn print_to_c(&mut self, args: &[Expression]) -> String {
        if args.is_empty() {
            return "printf(\"\\n\")".to_string();
        }
        let mut fmt_parts: Vec<String> = Vec::new();
        let mut c_args: Vec<String> = Vec::new();
        for arg in args {
            match arg {
                Expression::StringLiteral { value, .. } => fmt_parts.push(escape_c_string(value)),
                Expression::FString { parts, .. } => {
                    let (fmt, fargs) = self.fstring_format_parts(parts);
                    fmt_parts.push(fmt);
                    c_args.extend(fargs);
                }
                _ => {
                    let ty = self.node_type(arg.id());
                    fmt_parts.push(printf_specifier(ty.as_ref()).to_string());
                    c_args.push(self.expr_to_c(arg));
                }
            }
        }
        let fmt = format!("{}\\n", fmt_parts.join(" "));
        if c_args.is_empty() {
            format!("printf(\"{fmt}\")")
        } else {
            format!("printf(\"{fmt}\", {})", c_args.join(", "))
        }
    }
}

fn printf_specifier(ty: Option<&TypeExpr>) -> &'static str {
    match ty.map(|t| t.base.as_str()) {
        Some("int") => "%d",
        Some("long") => "%ld",
        Some("float") | Some("double") => "%g",
        Some("bool") => "%d",
        Some("char") if ty.map(|t| t.pointer_depth).unwrap_or(0) == 0 => "%c",
        Some("string") => "%s",
        Some("char") => "%s",
        _ => "%s",
    }
}

fn escape_c_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '%' => out.push_str("%%"),
            other => out.push(other),
        }
    }
    out
}

fn binary_op_symbol(op: &BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Eq => "==",
        BinaryOp::NotEq => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::LtEq => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::GtEq => ">=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
        BinaryOp::BitAnd => "&",
        BinaryOp::BitOr => "|",
        BinaryOp::BitXor => "^",
        BinaryOp::Shl => "<<",
        BinaryOp::Shr => ">>",
        BinaryOp::NullCoalesce => unreachable!("handled before reaching symbol lookup"),
    }
}

fn assign_op_symbol(op: &AssignOp) -> &'static str {
    match op {
        AssignOp::Assign => "=",
        AssignOp::Add => "+=",
        AssignOp::Sub => "-=",
        AssignOp::Mul => "*=",
        AssignOp::Div => "/=",
        AssignOp::Mod => "%=",
        AssignOp::BitAnd => "&=",
        AssignOp::BitOr => "|=",
        AssignOp::BitXor => "^=",
        AssignOp::Shl => "<<=",
        AssignOp::Shr => ">>=",
    }
}
