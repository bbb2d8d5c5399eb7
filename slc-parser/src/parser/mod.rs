use crate::ParseError;
use slc_ast::{NodeIdGen, Pos, Program};
use slc_lexer::{Lexer, Token, TokenKind};

mod expressions;
mod items;
mod statements;
mod types;

/// Owns the flat token stream and a cursor into it. No lifetime parameter is
/// needed: [`Token`] owns its lexeme, so the parser can outlive the source
/// string it was built from (useful for the f-string sub-parse, which hands
/// a freshly allocated `String` to a nested [`Parser`]).
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    ids: NodeIdGen,
    eof: Token,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::tokenize(source)?;
        let eof = tokens.last().cloned().unwrap_or(Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            line: 1,
            column: 1,
        });
        Ok(Self { tokens, current: 0, ids: NodeIdGen::new(), eof })
    }

    pub fn parse_program(source: &str) -> Result<Program, ParseError> {
        log::debug!("parser: parsing {} bytes", source.len());
        let mut parser = Self::new(source)?;
        parser.parse()
    }

    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let mut declarations = Vec::new();
        while !self.is_at_end() {
            declarations.push(self.parse_top_level_item()?);
        }
        log::info!("parser: parsed {} top-level declarations", declarations.len());
        Ok(Program { declarations })
    }

    // ---- token cursor helpers ----

    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&self.eof)
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &Token {
        self.tokens.get(self.current + offset).unwrap_or(&self.eof)
    }

    pub(crate) fn previous(&self) -> &Token {
        self.tokens.get(self.current.saturating_sub(1)).unwrap_or(&self.eof)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn check_at(&self, offset: usize, kind: TokenKind) -> bool {
        self.peek_at(offset).kind == kind
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn match_any(&mut self, kinds: &[TokenKind]) -> Option<TokenKind> {
        let current = self.peek().kind;
        if kinds.contains(&current) {
            self.advance();
            Some(current)
        } else {
            None
        }
    }

    pub(crate) fn consume(&mut self, kind: TokenKind, message: &str) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }

    pub(crate) fn consume_ident(&mut self, message: &str) -> Result<String, ParseError> {
        if self.check(TokenKind::Ident) {
            Ok(self.advance().lexeme.clone())
        } else {
            Err(self.error(message))
        }
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        let tok = self.peek();
        ParseError::Syntax { message: message.into(), line: tok.line, column: tok.column }
    }

    pub(crate) fn pos(&self) -> Pos {
        let tok = self.peek();
        Pos::new(tok.line, tok.column)
    }

    pub(crate) fn next_id(&mut self) -> slc_ast::NodeId {
        self.ids.next()
    }

    /// Expect a `>` closing a generic argument list, splitting a lexed
    /// `>>`/`>>=` in place when the closer is actually two nested generics
    /// ending back to back (e.g. `List<List<int>>`).
    pub(crate) fn expect_gt(&mut self) -> Result<(), ParseError> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Gt => {
                self.advance();
                Ok(())
            }
            TokenKind::GtGt => {
                self.advance();
                let synthetic =
                    Token { kind: TokenKind::Gt, lexeme: ">".to_string(), line: tok.line, column: tok.column + 1 };
                self.tokens.insert(self.current, synthetic);
                Ok(())
            }
            TokenKind::GtGtEq => {
                self.advance();
                let synthetic =
                    Token { kind: TokenKind::GtEq, lexeme: ">=".to_string(), line: tok.line, column: tok.column + 1 };
                self.tokens.insert(self.current, synthetic);
                Ok(())
            }
            _ => Err(self.error("expected '>'")),
        }
    }

    /// Positional, rewindable lookahead: does a `<` starting here close with
    /// a matching `>`/`>>` before hitting `;`, `{`, `}`, or EOF, and is the
    /// token just past the closer one that can legally follow a type?
    pub(crate) fn looks_like_generic_open(&self) -> bool {
        if !self.check(TokenKind::Lt) {
            return false;
        }
        let mut depth: i32 = 0;
        let mut i = 0usize;
        loop {
            let tok = self.peek_at(i);
            match tok.kind {
                TokenKind::Lt => depth += 1,
                TokenKind::Gt => {
                    depth -= 1;
                    if depth == 0 {
                        return self.token_permitted_after_generic_close(i + 1);
                    }
                }
                TokenKind::GtGt => {
                    depth -= 2;
                    if depth <= 0 {
                        return self.token_permitted_after_generic_close(i + 1);
                    }
                }
                TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace | TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
            if i > 4096 {
                return false;
            }
        }
    }

    fn token_permitted_after_generic_close(&self, offset: usize) -> bool {
        matches!(
            self.peek_at(offset).kind,
            TokenKind::Ident
                | TokenKind::Star
                | TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::LBracket
                | TokenKind::Comma
                | TokenKind::Gt
                | TokenKind::GtGt
                | TokenKind::Semicolon
                | TokenKind::LBrace
                | TokenKind::Eq
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slc_ast::{ClassMember, Declaration, Expression, Statement};

    fn parse(source: &str) -> Program {
        Parser::parse_program(source).unwrap()
    }

    #[test]
    fn empty_program_has_no_declarations() {
        let program = parse("");
        assert!(program.declarations.is_empty());
    }

    #[test]
    fn class_with_inheritance_and_override() {
        let program = parse(
            "class A { public int f() { return 1; } } \
             class B extends A { public int f() { return 2; } }",
        );
        assert_eq!(program.declarations.len(), 2);
        let Declaration::Class(a) = &program.declarations[0] else { panic!("expected class A") };
        assert_eq!(a.name, "A");
        assert!(a.parent.is_none());
        let Declaration::Class(b) = &program.declarations[1] else { panic!("expected class B") };
        assert_eq!(b.name, "B");
        assert_eq!(b.parent.as_deref(), Some("A"));
        assert!(matches!(&b.members[0], ClassMember::Method(m) if m.name == "f"));
    }

    #[test]
    fn generic_nested_closer_splits_double_gt() {
        let program = parse("List<List<int>> make() { List<List<int>> x; return x; }");
        let Declaration::Function(f) = &program.declarations[0] else { panic!("expected function") };
        assert_eq!(f.return_type.base, "List");
        assert_eq!(f.return_type.generic_args[0].base, "List");
        assert_eq!(f.return_type.generic_args[0].generic_args[0].base, "int");
    }

    #[test]
    fn for_in_and_parallel_for_parse() {
        let program = parse(
            "int main() { \
                var nums = [10, 20, 30]; \
                for x in nums { print(x); } \
                parallel for y in nums { print(y); } \
                return 0; \
             }",
        );
        let Declaration::Function(f) = &program.declarations[0] else { panic!("expected function") };
        let body = f.body.as_ref().unwrap();
        assert!(matches!(body.statements[1], Statement::ForIn { .. }));
        assert!(matches!(body.statements[2], Statement::ParallelFor { .. }));
    }

    #[test]
    fn try_catch_parses_catch_binding() {
        let program = parse(
            "int main() { \
                try { throw \"boom\"; } catch (e) { print(e); } \
                return 0; \
             }",
        );
        let Declaration::Function(f) = &program.declarations[0] else { panic!("expected function") };
        let body = f.body.as_ref().unwrap();
        let Statement::TryCatch { catch_var, .. } = &body.statements[0] else { panic!("expected try/catch") };
        assert_eq!(catch_var, "e");
    }

    #[test]
    fn fstring_embeds_expression() {
        let program = parse(r#"int main() { string s = f"sum: {1 + 2}"; return 0; }"#);
        let Declaration::Function(f) = &program.declarations[0] else { panic!("expected function") };
        let body = f.body.as_ref().unwrap();
        let Statement::VarDecl(decl) = &body.statements[0] else { panic!("expected var decl") };
        let Some(Expression::FString { parts, .. }) = &decl.initializer else { panic!("expected f-string") };
        assert!(parts.iter().any(|p| p.expr.is_some()));
    }

    #[test]
    fn assignment_binds_looser_than_ternary_and_null_coalesce() {
        // `a = b ?? c ? d : e` parses as `a = ((b ?? c) ? d : e)`, not
        // `(a = b) ?? (c ? d : e)`.
        let program = parse("int main() { a = b ?? c ? d : e; return 0; }");
        let Declaration::Function(f) = &program.declarations[0] else { panic!("expected function") };
        let body = f.body.as_ref().unwrap();
        let Statement::Expr(Expression::Assign { value, .. }) = &body.statements[0] else {
            panic!("expected assignment statement")
        };
        assert!(matches!(&**value, Expression::Ternary { .. }));
    }

    #[test]
    fn duplicate_trailing_comma_in_generic_arg_list_is_rejected() {
        let err = Parser::parse_program("Map<string,> m;").unwrap_err();
        assert!(matches!(err, crate::ParseError::Syntax { .. }));
    }
}
