use super::Parser;
use crate::ParseError;
use slc_ast::{Block, CaseClause, Statement, VarDeclStmt};
use slc_lexer::TokenKind;

impl Parser {
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        let pos = self.pos();
        self.consume(TokenKind::LBrace, "expected '{' to start a block")?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        self.consume(TokenKind::RBrace, "expected '}' closing a block")?;
        Ok(Block { statements, pos })
    }

    pub(crate) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let pos = self.pos();
        match self.peek().kind {
            TokenKind::LBrace => self.parse_block().map(Statement::Block),
            TokenKind::Return => {
                self.advance();
                let value = if self.check(TokenKind::Semicolon) { None } else { Some(self.parse_expression()?) };
                self.consume(TokenKind::Semicolon, "expected ';' after a return statement")?;
                Ok(Statement::Return { value, pos })
            }
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Parallel => self.parse_parallel_for(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Break => {
                self.advance();
                self.consume(TokenKind::Semicolon, "expected ';' after 'break'")?;
                Ok(Statement::Break(pos))
            }
            TokenKind::Continue => {
                self.advance();
                self.consume(TokenKind::Semicolon, "expected ';' after 'continue'")?;
                Ok(Statement::Continue(pos))
            }
            TokenKind::Delete => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(TokenKind::Semicolon, "expected ';' after 'delete'")?;
                Ok(Statement::Delete { expr, pos })
            }
            TokenKind::Try => self.parse_try_catch(),
            TokenKind::Throw => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(TokenKind::Semicolon, "expected ';' after 'throw'")?;
                Ok(Statement::Throw { expr, pos })
            }
            TokenKind::Var => self.parse_var_decl_stmt().map(Statement::VarDecl),
            _ => {
                if self.looks_like_declaration() {
                    self.parse_var_decl_stmt().map(Statement::VarDecl)
                } else {
                    let expr = self.parse_expression()?;
                    self.consume(TokenKind::Semicolon, "expected ';' after an expression statement")?;
                    Ok(Statement::Expr(expr))
                }
            }
        }
    }

    /// Disambiguates a local variable declaration from an expression
    /// statement by scanning past qualifiers, a base type token (including
    /// tuple types and container keywords), generics, `[]`, and stars: if an
    /// identifier follows, this is a declaration.
    fn looks_like_declaration(&self) -> bool {
        if !self.is_type_start(self.peek().kind) {
            return false;
        }
        let mut i = 0usize;
        while matches!(
            self.peek_at(i).kind,
            TokenKind::Const | TokenKind::Static | TokenKind::Extern | TokenKind::Volatile
        ) {
            i += 1;
        }

        match self.peek_at(i).kind {
            TokenKind::Struct | TokenKind::Enum | TokenKind::Union => {
                i += 1;
                if self.peek_at(i).kind == TokenKind::Ident {
                    i += 1;
                }
            }
            TokenKind::LParen => {
                // tuple type: scan to the matching ')'
                let mut depth = 1i32;
                i += 1;
                while depth > 0 {
                    match self.peek_at(i).kind {
                        TokenKind::LParen => depth += 1,
                        TokenKind::RParen => depth -= 1,
                        TokenKind::Semicolon | TokenKind::LBrace | TokenKind::Eof => return false,
                        _ => {}
                    }
                    i += 1;
                }
            }
            TokenKind::Ident
            | TokenKind::List
            | TokenKind::Map
            | TokenKind::Array
            | TokenKind::Set
            | TokenKind::StringKw
            | TokenKind::Bool
            | TokenKind::Void
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::Double
            | TokenKind::Char
            | TokenKind::Short
            | TokenKind::Long
            | TokenKind::Unsigned
            | TokenKind::Signed => {
                i += 1;
                while matches!(
                    self.peek_at(i).kind,
                    TokenKind::Int
                        | TokenKind::Short
                        | TokenKind::Long
                        | TokenKind::Double
                        | TokenKind::Char
                ) && matches!(
                    self.peek_at(i - 1).kind,
                    TokenKind::Unsigned | TokenKind::Signed | TokenKind::Long | TokenKind::Short
                ) {
                    i += 1;
                }
            }
            _ => return false,
        }

        if self.peek_at(i).kind == TokenKind::Lt {
            let mut depth: i32 = 0;
            loop {
                match self.peek_at(i).kind {
                    TokenKind::Lt => depth += 1,
                    TokenKind::Gt => {
                        depth -= 1;
                        i += 1;
                        if depth == 0 {
                            break;
                        }
                        continue;
                    }
                    TokenKind::GtGt => {
                        depth -= 2;
                        i += 1;
                        if depth <= 0 {
                            break;
                        }
                        continue;
                    }
                    TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace | TokenKind::Eof => return false,
                    _ => {}
                }
                i += 1;
            }
        }

        if self.peek_at(i).kind == TokenKind::LBracket && self.peek_at(i + 1).kind == TokenKind::RBracket {
            i += 2;
        }

        while self.peek_at(i).kind == TokenKind::Star {
            i += 1;
        }
        if self.peek_at(i).kind == TokenKind::Question {
            i += 1;
        }

        self.peek_at(i).kind == TokenKind::Ident
    }

    fn parse_var_decl_stmt(&mut self) -> Result<VarDeclStmt, ParseError> {
        let pos = self.pos();
        if self.match_token(TokenKind::Var) {
            let name = self.consume_ident("expected a variable name")?;
            self.consume(TokenKind::Eq, "a 'var' declaration requires an initializer")?;
            let initializer = Some(self.parse_expression()?);
            self.consume(TokenKind::Semicolon, "expected ';' after a variable declaration")?;
            return Ok(VarDeclStmt { ty: None, is_inferred: true, name, initializer, pos });
        }

        let mut ty = self.parse_type_expr()?;
        let name = self.consume_ident("expected a variable name")?;
        self.parse_array_suffix(&mut ty)?;
        let initializer = if self.match_token(TokenKind::Eq) { Some(self.parse_expression()?) } else { None };
        self.consume(TokenKind::Semicolon, "expected ';' after a variable declaration")?;
        Ok(VarDeclStmt { ty: Some(ty), is_inferred: false, name, initializer, pos })
    }

    fn parse_if(&mut self) -> Result<Statement, ParseError> {
        let pos = self.pos();
        self.advance();
        self.consume(TokenKind::LParen, "expected '(' after 'if'")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RParen, "expected ')' after an if condition")?;
        let then_block = self.parse_block()?;
        let else_block = if self.match_token(TokenKind::Else) {
            if self.check(TokenKind::If) {
                Some(Box::new(self.parse_if()?))
            } else {
                Some(Box::new(Statement::Block(self.parse_block()?)))
            }
        } else {
            None
        };
        Ok(Statement::If { condition, then_block, else_block, pos })
    }

    fn parse_while(&mut self) -> Result<Statement, ParseError> {
        let pos = self.pos();
        self.advance();
        self.consume(TokenKind::LParen, "expected '(' after 'while'")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RParen, "expected ')' after a while condition")?;
        let body = self.parse_block()?;
        Ok(Statement::While { condition, body, pos })
    }

    fn parse_do_while(&mut self) -> Result<Statement, ParseError> {
        let pos = self.pos();
        self.advance();
        let body = self.parse_block()?;
        self.consume(TokenKind::While, "expected 'while' after a do-block")?;
        self.consume(TokenKind::LParen, "expected '(' after 'while'")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RParen, "expected ')' after a do-while condition")?;
        self.consume(TokenKind::Semicolon, "expected ';' after a do-while statement")?;
        Ok(Statement::DoWhile { body, condition, pos })
    }

    /// `for (init; cond; update) { }` and `for name in iterable { }` /
    /// `for k, v in map { }` share the `for` keyword; disambiguated by
    /// whether a `(` or a bare name immediately follows.
    fn parse_for(&mut self) -> Result<Statement, ParseError> {
        let pos = self.pos();
        self.advance();
        if self.match_token(TokenKind::LParen) {
            let init = if self.check(TokenKind::Semicolon) {
                self.advance();
                None
            } else {
                let stmt = self.parse_for_init_clause()?;
                Some(Box::new(stmt))
            };
            let condition = if self.check(TokenKind::Semicolon) { None } else { Some(self.parse_expression()?) };
            self.consume(TokenKind::Semicolon, "expected ';' after a for-loop condition")?;
            let update = if self.check(TokenKind::RParen) { None } else { Some(Box::new(self.parse_for_update()?)) };
            self.consume(TokenKind::RParen, "expected ')' after a for-loop header")?;
            let body = self.parse_block()?;
            return Ok(Statement::CFor { init, condition, update, body, pos });
        }

        let var_name = self.consume_ident("expected a loop variable name")?;
        let second_var_name =
            if self.match_token(TokenKind::Comma) { Some(self.consume_ident("expected a second loop variable name")?) } else { None };
        self.consume(TokenKind::In, "expected 'in' in a for-in loop")?;
        let iterable = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Statement::ForIn { var_name, second_var_name, iterable, body, pos })
    }

    fn parse_for_init_clause(&mut self) -> Result<Statement, ParseError> {
        if self.looks_like_declaration() || self.check(TokenKind::Var) {
            let decl = self.parse_var_decl_stmt()?;
            Ok(Statement::VarDecl(decl))
        } else {
            let expr = self.parse_expression()?;
            self.consume(TokenKind::Semicolon, "expected ';' after a for-loop initializer")?;
            Ok(Statement::Expr(expr))
        }
    }

    fn parse_for_update(&mut self) -> Result<Statement, ParseError> {
        Ok(Statement::Expr(self.parse_expression()?))
    }

    fn parse_parallel_for(&mut self) -> Result<Statement, ParseError> {
        let pos = self.pos();
        self.advance();
        self.consume(TokenKind::For, "expected 'for' after 'parallel'")?;
        let var_name = self.consume_ident("expected a loop variable name")?;
        self.consume(TokenKind::In, "expected 'in' in a parallel-for loop")?;
        let iterable = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Statement::ParallelFor { var_name, iterable, body, pos })
    }

    fn parse_switch(&mut self) -> Result<Statement, ParseError> {
        let pos = self.pos();
        self.advance();
        self.consume(TokenKind::LParen, "expected '(' after 'switch'")?;
        let value = self.parse_expression()?;
        self.consume(TokenKind::RParen, "expected ')' after a switch value")?;
        self.consume(TokenKind::LBrace, "expected '{' to start a switch body")?;

        let mut cases = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let case_pos = self.pos();
            let case_value = if self.match_token(TokenKind::Case) {
                let v = self.parse_expression()?;
                self.consume(TokenKind::Colon, "expected ':' after a case value")?;
                Some(v)
            } else {
                self.consume(TokenKind::Default, "expected 'case' or 'default'")?;
                self.consume(TokenKind::Colon, "expected ':' after 'default'")?;
                None
            };
            let mut body = Vec::new();
            while !matches!(self.peek().kind, TokenKind::Case | TokenKind::Default | TokenKind::RBrace)
                && !self.is_at_end()
            {
                body.push(self.parse_statement()?);
            }
            cases.push(CaseClause { value: case_value, body, pos: case_pos });
        }
        self.consume(TokenKind::RBrace, "expected '}' closing a switch body")?;
        Ok(Statement::Switch { value, cases, pos })
    }

    fn parse_try_catch(&mut self) -> Result<Statement, ParseError> {
        let pos = self.pos();
        self.advance();
        let try_block = self.parse_block()?;
        self.consume(TokenKind::Catch, "expected 'catch' after a try-block")?;
        self.consume(TokenKind::LParen, "expected '(' after 'catch'")?;
        let catch_var = self.consume_ident("expected a caught exception variable name")?;
        self.consume(TokenKind::RParen, "expected ')' after a catch variable")?;
        let catch_block = self.parse_block()?;
        Ok(Statement::TryCatch { try_block, catch_var, catch_block, pos })
    }
}
