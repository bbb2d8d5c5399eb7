//! Abstract syntax tree for the source language (SL).
//!
//! The AST is a closed sum of node variants (SPEC_FULL §3). Every node
//! carries `(line, col)` for diagnostics plus a [`NodeId`] that survives the
//! analyzer's in-place mutation of the node it's attached to — it is the key
//! into the node-type map the analyzer builds and codegen reads.

use std::collections::HashMap;

/// Stable identity for an AST expression node, assigned once at parse time.
/// Never reused, never recomputed — the analyzer's node-type map is keyed on
/// this rather than on pointer identity so it survives moves of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Monotonic generator for [`NodeId`]s, owned by the parser for the
/// duration of one parse.
#[derive(Debug, Default)]
pub struct NodeIdGen {
    next: u32,
}

impl NodeIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// `id(expr_node) -> TypeExpr`, written by the analyzer's inference pass and
/// read by codegen for dispatch and printf-specifier selection.
#[derive(Debug, Default, Clone)]
pub struct TypeMap {
    types: HashMap<NodeId, TypeExpr>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: NodeId, ty: TypeExpr) {
        self.types.insert(id, ty);
    }

    pub fn get(&self, id: NodeId) -> Option<&TypeExpr> {
        self.types.get(&id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// A source position, attached to every AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

// ---- Types ----

/// `TypeExpr { base, generic_args, pointer_depth, is_array, array_size }`
/// (SPEC_FULL §3).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub base: String,
    pub generic_args: Vec<TypeExpr>,
    pub pointer_depth: u32,
    pub is_array: bool,
    pub array_size: Option<Box<Expression>>,
    pub pos: Pos,
}

impl TypeExpr {
    pub fn simple(base: impl Into<String>, pos: Pos) -> Self {
        Self {
            base: base.into(),
            generic_args: Vec::new(),
            pointer_depth: 0,
            is_array: false,
            array_size: None,
            pos,
        }
    }

    /// Names recognized as built-in container bases (SPEC_FULL §3, §4.3).
    pub fn is_container_base(base: &str) -> bool {
        matches!(base, "List" | "Map" | "Array" | "Set" | "Tuple")
    }

    /// `pointer_depth` bumped to at least 1; used by the analyzer's
    /// class-type upgrade (SPEC_FULL §4.3). Recurses into generic arguments.
    pub fn upgrade_class_pointers(&mut self, class_names: &std::collections::HashSet<String>) {
        if class_names.contains(&self.base) && self.pointer_depth == 0 {
            self.pointer_depth = 1;
        }
        for arg in &mut self.generic_args {
            arg.upgrade_class_pointers(class_names);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeExpr,
    pub name: String,
    pub default: Option<Expression>,
    pub pos: Pos,
}

// ---- Top-level program ----

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Preprocessor(PreprocessorDirective),
    Class(ClassDecl),
    Function(FunctionDecl),
    Struct(StructDecl),
    Enum(EnumDecl),
    Typedef(TypedefDecl),
    TopLevelVar(VarDeclStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessorDirective {
    pub text: String,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub generic_params: Vec<String>,
    pub parent: Option<String>,
    pub members: Vec<ClassMember>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Field(FieldDecl),
    Method(MethodDecl),
    Property(PropertyDecl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Private,
    /// Static ("class") method: callable only as `ClassName.method(...)`.
    Class,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub access: Access,
    pub ty: TypeExpr,
    pub name: String,
    pub initializer: Option<Expression>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub access: Access,
    pub return_type: TypeExpr,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
    pub is_gpu: bool,
    pub pos: Pos,
}

impl MethodDecl {
    /// A constructor is a method whose name equals its owning class
    /// (SPEC_FULL §4.2 "Constructor detection").
    pub fn is_constructor(&self, class_name: &str) -> bool {
        self.name == class_name
    }
}

/// `access type name { get; set; }`. Absence of a body on either accessor
/// means it is omitted; absence of both block bodies (but presence of the
/// declaration) means an auto-property with a synthesized `_name` backing
/// field (SPEC_FULL §4.2, §9).
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub access: Access,
    pub ty: TypeExpr,
    pub name: String,
    pub getter: Option<Option<Block>>,
    pub setter: Option<Option<Block>>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub return_type: TypeExpr,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Option<Block>,
    pub is_gpu: bool,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<(TypeExpr, String)>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub values: Vec<(String, Option<Expression>)>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedefDecl {
    pub original: TypeExpr,
    pub alias: String,
    pub pos: Pos,
}

// ---- Statements ----

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    /// `None` until the analyzer fills it in (explicit type) or infers it
    /// (`var`); see the node-type/`var`-inference invariant in SPEC_FULL §3.
    pub ty: Option<TypeExpr>,
    pub is_inferred: bool,
    pub name: String,
    pub initializer: Option<Expression>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    /// `None` marks the default case.
    pub value: Option<Expression>,
    pub body: Vec<Statement>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VarDecl(VarDeclStmt),
    Return {
        value: Option<Expression>,
        pos: Pos,
    },
    If {
        condition: Expression,
        then_block: Block,
        else_block: Option<Box<Statement>>,
        pos: Pos,
    },
    While {
        condition: Expression,
        body: Block,
        pos: Pos,
    },
    DoWhile {
        body: Block,
        condition: Expression,
        pos: Pos,
    },
    CFor {
        init: Option<Box<Statement>>,
        condition: Option<Expression>,
        update: Option<Box<Statement>>,
        body: Block,
        pos: Pos,
    },
    ForIn {
        var_name: String,
        /// Second bind variable for `for k, v in map { ... }` (SPEC_FULL §3).
        second_var_name: Option<String>,
        iterable: Expression,
        body: Block,
        pos: Pos,
    },
    ParallelFor {
        var_name: String,
        iterable: Expression,
        body: Block,
        pos: Pos,
    },
    Switch {
        value: Expression,
        cases: Vec<CaseClause>,
        pos: Pos,
    },
    Break(Pos),
    Continue(Pos),
    Expr(Expression),
    Delete {
        expr: Expression,
        pos: Pos,
    },
    TryCatch {
        try_block: Block,
        catch_var: String,
        catch_block: Block,
        pos: Pos,
    },
    Throw {
        expr: Expression,
        pos: Pos,
    },
    Block(Block),
}

impl Statement {
    /// `return`/`throw` are terminal for exhaustive-return analysis
    /// (SPEC_FULL §4.3); `break`/`continue` are terminal for
    /// unreachable-code analysis only.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Statement::Return { .. } | Statement::Throw { .. })
    }

    pub fn ends_block(&self) -> bool {
        matches!(
            self,
            Statement::Return { .. }
                | Statement::Throw { .. }
                | Statement::Break(_)
                | Statement::Continue(_)
        )
    }
}

// ---- Expressions ----

#[derive(Debug, Clone, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    NullCoalesce,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FStringPart {
    pub text: Option<String>,
    pub expr: Option<Expression>,
}

/// A lambda expression. Pre-scanned by codegen (SPEC_FULL §4.4 phase 2, §9)
/// and lifted to a top-level static function; `synthetic_name` is assigned
/// by that pre-scan, not by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpr {
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    pub body: Block,
    pub synthetic_name: Option<String>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    IntLiteral {
        value: i64,
        raw: String,
        id: NodeId,
        pos: Pos,
    },
    FloatLiteral {
        value: f64,
        raw: String,
        id: NodeId,
        pos: Pos,
    },
    StringLiteral {
        value: String,
        id: NodeId,
        pos: Pos,
    },
    CharLiteral {
        value: String,
        id: NodeId,
        pos: Pos,
    },
    BoolLiteral {
        value: bool,
        id: NodeId,
        pos: Pos,
    },
    NullLiteral {
        id: NodeId,
        pos: Pos,
    },
    FString {
        parts: Vec<FStringPart>,
        id: NodeId,
        pos: Pos,
    },
    Identifier {
        name: String,
        id: NodeId,
        pos: Pos,
    },
    SelfExpr {
        id: NodeId,
        pos: Pos,
    },
    Binary {
        left: Box<Expression>,
        op: BinaryOp,
        right: Box<Expression>,
        id: NodeId,
        pos: Pos,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        id: NodeId,
        pos: Pos,
    },
    Ternary {
        condition: Box<Expression>,
        then_expr: Box<Expression>,
        else_expr: Box<Expression>,
        id: NodeId,
        pos: Pos,
    },
    Assign {
        target: Box<Expression>,
        op: AssignOp,
        value: Box<Expression>,
        id: NodeId,
        pos: Pos,
    },
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
        id: NodeId,
        pos: Pos,
    },
    Index {
        object: Box<Expression>,
        index: Box<Expression>,
        id: NodeId,
        pos: Pos,
    },
    FieldAccess {
        object: Box<Expression>,
        field: String,
        arrow: bool,
        optional: bool,
        id: NodeId,
        pos: Pos,
    },
    Cast {
        target_type: TypeExpr,
        expr: Box<Expression>,
        id: NodeId,
        pos: Pos,
    },
    Sizeof {
        operand: SizeofOperand,
        id: NodeId,
        pos: Pos,
    },
    New {
        ty: TypeExpr,
        args: Vec<Expression>,
        id: NodeId,
        pos: Pos,
    },
    Delete {
        expr: Box<Expression>,
        id: NodeId,
        pos: Pos,
    },
    ListLiteral {
        elements: Vec<Expression>,
        id: NodeId,
        pos: Pos,
    },
    MapLiteral {
        entries: Vec<(Expression, Expression)>,
        id: NodeId,
        pos: Pos,
    },
    TupleLiteral {
        elements: Vec<Expression>,
        id: NodeId,
        pos: Pos,
    },
    BraceInitializer {
        elements: Vec<Expression>,
        id: NodeId,
        pos: Pos,
    },
    Lambda {
        lambda: Box<LambdaExpr>,
        id: NodeId,
        pos: Pos,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SizeofOperand {
    Type(TypeExpr),
    Expr(Box<Expression>),
}

impl Expression {
    /// The [`NodeId`] every expression variant carries; the analyzer keys
    /// its node-type map on this.
    pub fn id(&self) -> NodeId {
        match self {
            Expression::IntLiteral { id, .. }
            | Expression::FloatLiteral { id, .. }
            | Expression::StringLiteral { id, .. }
            | Expression::CharLiteral { id, .. }
            | Expression::BoolLiteral { id, .. }
            | Expression::NullLiteral { id, .. }
            | Expression::FString { id, .. }
            | Expression::Identifier { id, .. }
            | Expression::SelfExpr { id, .. }
            | Expression::Binary { id, .. }
            | Expression::Unary { id, .. }
            | Expression::Ternary { id, .. }
            | Expression::Assign { id, .. }
            | Expression::Call { id, .. }
            | Expression::Index { id, .. }
            | Expression::FieldAccess { id, .. }
            | Expression::Cast { id, .. }
            | Expression::Sizeof { id, .. }
            | Expression::New { id, .. }
            | Expression::Delete { id, .. }
            | Expression::ListLiteral { id, .. }
            | Expression::MapLiteral { id, .. }
            | Expression::TupleLiteral { id, .. }
            | Expression::BraceInitializer { id, .. }
            | Expression::Lambda { id, .. } => *id,
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            Expression::IntLiteral { pos, .. }
            | Expression::FloatLiteral { pos, .. }
            | Expression::StringLiteral { pos, .. }
            | Expression::CharLiteral { pos, .. }
            | Expression::BoolLiteral { pos, .. }
            | Expression::NullLiteral { pos, .. }
            | Expression::FString { pos, .. }
            | Expression::Identifier { pos, .. }
            | Expression::SelfExpr { pos, .. }
            | Expression::Binary { pos, .. }
            | Expression::Unary { pos, .. }
            | Expression::Ternary { pos, .. }
            | Expression::Assign { pos, .. }
            | Expression::Call { pos, .. }
            | Expression::Index { pos, .. }
            | Expression::FieldAccess { pos, .. }
            | Expression::Cast { pos, .. }
            | Expression::Sizeof { pos, .. }
            | Expression::New { pos, .. }
            | Expression::Delete { pos, .. }
            | Expression::ListLiteral { pos, .. }
            | Expression::MapLiteral { pos, .. }
            | Expression::TupleLiteral { pos, .. }
            | Expression::BraceInitializer { pos, .. }
            | Expression::Lambda { pos, .. } => *pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ids_are_monotonic_and_unique() {
        let mut gen = NodeIdGen::new();
        let a = gen.next();
        let b = gen.next();
        assert_ne!(a, b);
        assert!(b.0 > a.0);
    }

    #[test]
    fn type_map_round_trips() {
        let mut gen = NodeIdGen::new();
        let id = gen.next();
        let mut map = TypeMap::new();
        map.record(id, TypeExpr::simple("int", Pos::default()));
        assert_eq!(map.get(id).map(|t| t.base.as_str()), Some("int"));
    }

    #[test]
    fn class_pointer_upgrade_recurses_into_generics() {
        let mut classes = std::collections::HashSet::new();
        classes.insert("Vec3".to_string());
        let mut ty = TypeExpr {
            base: "List".to_string(),
            generic_args: vec![TypeExpr::simple("Vec3", Pos::default())],
            pointer_depth: 0,
            is_array: false,
            array_size: None,
            pos: Pos::default(),
        };
        ty.upgrade_class_pointers(&classes);
        assert_eq!(ty.pointer_depth, 0); // List itself isn't a class
        assert_eq!(ty.generic_args[0].pointer_depth, 1);
    }
}
