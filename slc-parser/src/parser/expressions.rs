use super::Parser;
use crate::ParseError;
use slc_ast::{
    AssignOp, BinaryOp, Expression, FStringPart, LambdaExpr, Pos, SizeofOperand, UnaryOp,
};
use slc_lexer::TokenKind;

impl Parser {
    pub(crate) fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expression, ParseError> {
        let target = self.parse_ternary()?;

        let op = match self.peek().kind {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::PlusEq => Some(AssignOp::Add),
            TokenKind::MinusEq => Some(AssignOp::Sub),
            TokenKind::StarEq => Some(AssignOp::Mul),
            TokenKind::SlashEq => Some(AssignOp::Div),
            TokenKind::PercentEq => Some(AssignOp::Mod),
            TokenKind::AmpEq => Some(AssignOp::BitAnd),
            TokenKind::PipeEq => Some(AssignOp::BitOr),
            TokenKind::CaretEq => Some(AssignOp::BitXor),
            TokenKind::LtLtEq => Some(AssignOp::Shl),
            TokenKind::GtGtEq => Some(AssignOp::Shr),
            _ => None,
        };
        let Some(op) = op else {
            return Ok(target);
        };
        let pos = self.pos();
        self.advance();
        let value = self.parse_assignment()?;
        let id = self.next_id();
        Ok(Expression::Assign { target: Box::new(target), op, value: Box::new(value), id, pos })
    }

    fn parse_ternary(&mut self) -> Result<Expression, ParseError> {
        let cond = self.parse_null_coalesce()?;
        if self.match_token(TokenKind::Question) {
            let pos = self.pos();
            let then_expr = self.parse_assignment()?;
            self.consume(TokenKind::Colon, "expected ':' in ternary expression")?;
            let else_expr = self.parse_assignment()?;
            let id = self.next_id();
            return Ok(Expression::Ternary {
                condition: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
                id,
                pos,
            });
        }
        Ok(cond)
    }

    fn parse_null_coalesce(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc_binary(Self::parse_logical_or, &[(TokenKind::QuestionQuestion, BinaryOp::NullCoalesce)])
    }

    fn parse_logical_or(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc_binary(Self::parse_logical_and, &[(TokenKind::PipePipe, BinaryOp::Or)])
    }

    fn parse_logical_and(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc_binary(Self::parse_bit_or, &[(TokenKind::AmpAmp, BinaryOp::And)])
    }

    fn parse_bit_or(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc_binary(Self::parse_bit_xor, &[(TokenKind::Pipe, BinaryOp::BitOr)])
    }

    fn parse_bit_xor(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc_binary(Self::parse_bit_and, &[(TokenKind::Caret, BinaryOp::BitXor)])
    }

    fn parse_bit_and(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc_binary(Self::parse_equality, &[(TokenKind::Amp, BinaryOp::BitAnd)])
    }

    fn parse_equality(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc_binary(
            Self::parse_relational,
            &[(TokenKind::EqEq, BinaryOp::Eq), (TokenKind::BangEq, BinaryOp::NotEq)],
        )
    }

    fn parse_relational(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc_binary(
            Self::parse_shift,
            &[
                (TokenKind::Lt, BinaryOp::Lt),
                (TokenKind::LtEq, BinaryOp::LtEq),
                (TokenKind::Gt, BinaryOp::Gt),
                (TokenKind::GtEq, BinaryOp::GtEq),
            ],
        )
    }

    fn parse_shift(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc_binary(
            Self::parse_additive,
            &[(TokenKind::LtLt, BinaryOp::Shl), (TokenKind::GtGt, BinaryOp::Shr)],
        )
    }

    fn parse_additive(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc_binary(
            Self::parse_multiplicative,
            &[(TokenKind::Plus, BinaryOp::Add), (TokenKind::Minus, BinaryOp::Sub)],
        )
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc_binary(
            Self::parse_cast,
            &[
                (TokenKind::Star, BinaryOp::Mul),
                (TokenKind::Slash, BinaryOp::Div),
                (TokenKind::Percent, BinaryOp::Mod),
            ],
        )
    }

    fn parse_left_assoc_binary(
        &mut self,
        mut next: impl FnMut(&mut Self) -> Result<Expression, ParseError>,
        ops: &[(TokenKind, BinaryOp)],
    ) -> Result<Expression, ParseError> {
        let mut left = next(self)?;
        loop {
            let found = ops.iter().find(|(kind, _)| self.check(*kind));
            let Some((_, op)) = found else { break };
            let op = op.clone();
            let pos = self.pos();
            self.advance();
            let right = next(self)?;
            let id = self.next_id();
            left = Expression::Binary { left: Box::new(left), op, right: Box::new(right), id, pos };
        }
        Ok(left)
    }

    /// C-style cast: `(Type) expr`, disambiguated from a parenthesized
    /// expression by requiring the parenthesized content to parse as a type
    /// immediately followed by `)` and something that can start a unary
    /// expression.
    fn parse_cast(&mut self) -> Result<Expression, ParseError> {
        if self.check(TokenKind::LParen) {
            let checkpoint = self.save();
            self.advance();
            if self.is_type_start(self.peek().kind) {
                if let Ok(ty) = self.parse_type_expr() {
                    if self.check(TokenKind::RParen) {
                        self.advance();
                        if self.starts_unary_expression() {
                            let pos = ty.pos;
                            let expr = self.parse_cast()?;
                            let id = self.next_id();
                            return Ok(Expression::Cast { target_type: ty, expr: Box::new(expr), id, pos });
                        }
                    }
                }
            }
            self.restore(checkpoint);
        }
        self.parse_unary()
    }

    fn starts_unary_expression(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Ident
                | TokenKind::IntLit
                | TokenKind::FloatLit
                | TokenKind::StringLit
                | TokenKind::CharLit
                | TokenKind::FStringLit
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::SelfKw
                | TokenKind::LParen
                | TokenKind::Minus
                | TokenKind::Bang
                | TokenKind::Tilde
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::Star
                | TokenKind::Amp
                | TokenKind::New
                | TokenKind::Sizeof
        )
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        let pos = self.pos();
        let op = match self.peek().kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::PlusPlus => Some(UnaryOp::PreIncrement),
            TokenKind::MinusMinus => Some(UnaryOp::PreDecrement),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            let id = self.next_id();
            return Ok(Expression::Unary { op, operand: Box::new(operand), id, pos });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expression, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let pos = self.pos();
            if self.match_token(TokenKind::LParen) {
                let mut args = Vec::new();
                if !self.check(TokenKind::RParen) {
                    args.push(self.parse_assignment()?);
                    while self.match_token(TokenKind::Comma) {
                        args.push(self.parse_assignment()?);
                    }
                }
                self.consume(TokenKind::RParen, "expected ')' after call arguments")?;
                let id = self.next_id();
                expr = Expression::Call { callee: Box::new(expr), args, id, pos };
            } else if self.match_token(TokenKind::LBracket) {
                let index = self.parse_expression()?;
                self.consume(TokenKind::RBracket, "expected ']'")?;
                let id = self.next_id();
                expr = Expression::Index { object: Box::new(expr), index: Box::new(index), id, pos };
            } else if self.match_token(TokenKind::Dot) {
                let field = self.consume_ident("expected a field or method name after '.'")?;
                let id = self.next_id();
                expr = Expression::FieldAccess { object: Box::new(expr), field, arrow: false, optional: false, id, pos };
            } else if self.match_token(TokenKind::Arrow) {
                let field = self.consume_ident("expected a field or method name after '->'")?;
                let id = self.next_id();
                expr = Expression::FieldAccess { object: Box::new(expr), field, arrow: true, optional: false, id, pos };
            } else if self.match_token(TokenKind::QuestionDot) {
                let field = self.consume_ident("expected a field or method name after '?.'")?;
                let id = self.next_id();
                expr =
                    Expression::FieldAccess { object: Box::new(expr), field, arrow: false, optional: true, id, pos };
            } else if self.check(TokenKind::PlusPlus) {
                self.advance();
                let id = self.next_id();
                expr = Expression::Unary { op: UnaryOp::PostIncrement, operand: Box::new(expr), id, pos };
            } else if self.check(TokenKind::MinusMinus) {
                self.advance();
                let id = self.next_id();
                expr = Expression::Unary { op: UnaryOp::PostDecrement, operand: Box::new(expr), id, pos };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let pos = self.pos();
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::IntLit => {
                self.advance();
                let value = parse_int_literal(&tok.lexeme);
                let id = self.next_id();
                Ok(Expression::IntLiteral { value, raw: tok.lexeme, id, pos })
            }
            TokenKind::FloatLit => {
                self.advance();
                let value = tok.lexeme.trim_end_matches('f').parse::<f64>().unwrap_or(0.0);
                let id = self.next_id();
                Ok(Expression::FloatLiteral { value, raw: tok.lexeme, id, pos })
            }
            TokenKind::StringLit => {
                self.advance();
                let id = self.next_id();
                Ok(Expression::StringLiteral { value: unquote(&tok.lexeme), id, pos })
            }
            TokenKind::CharLit => {
                self.advance();
                let id = self.next_id();
                Ok(Expression::CharLiteral { value: unquote(&tok.lexeme), id, pos })
            }
            TokenKind::FStringLit => {
                self.advance();
                self.parse_fstring_body(&tok.lexeme, pos)
            }
            TokenKind::True => {
                self.advance();
                let id = self.next_id();
                Ok(Expression::BoolLiteral { value: true, id, pos })
            }
            TokenKind::False => {
                self.advance();
                let id = self.next_id();
                Ok(Expression::BoolLiteral { value: false, id, pos })
            }
            TokenKind::Null => {
                self.advance();
                let id = self.next_id();
                Ok(Expression::NullLiteral { id, pos })
            }
            TokenKind::SelfKw => {
                self.advance();
                let id = self.next_id();
                Ok(Expression::SelfExpr { id, pos })
            }
            TokenKind::Ident => {
                self.advance();
                let id = self.next_id();
                Ok(Expression::Identifier { name: tok.lexeme, id, pos })
            }
            TokenKind::LParen => self.parse_paren_or_tuple(pos),
            TokenKind::LBracket => self.parse_list_literal(pos),
            TokenKind::LBrace => self.parse_brace_initializer(pos),
            TokenKind::New => self.parse_new(pos),
            TokenKind::Delete => self.parse_delete_expr(pos),
            TokenKind::Sizeof => self.parse_sizeof(pos),
            TokenKind::Var => self.parse_lambda(pos),
            _ => Err(self.error(format!("unexpected token '{}'", tok.lexeme))),
        }
    }

    fn parse_paren_or_tuple(&mut self, pos: Pos) -> Result<Expression, ParseError> {
        self.advance();
        if self.check(TokenKind::RParen) {
            self.advance();
            let id = self.next_id();
            return Ok(Expression::TupleLiteral { elements: Vec::new(), id, pos });
        }
        let first = self.parse_expression()?;
        if self.match_token(TokenKind::Comma) {
            let mut elements = vec![first];
            if !self.check(TokenKind::RParen) {
                elements.push(self.parse_expression()?);
                while self.match_token(TokenKind::Comma) {
                    elements.push(self.parse_expression()?);
                }
            }
            self.consume(TokenKind::RParen, "expected ')' closing tuple literal")?;
            let id = self.next_id();
            return Ok(Expression::TupleLiteral { elements, id, pos });
        }
        self.consume(TokenKind::RParen, "expected ')'")?;
        Ok(first)
    }

    fn parse_list_literal(&mut self, pos: Pos) -> Result<Expression, ParseError> {
        self.advance();
        let mut elements = Vec::new();
        if !self.check(TokenKind::RBracket) {
            elements.push(self.parse_expression()?);
            while self.match_token(TokenKind::Comma) {
                elements.push(self.parse_expression()?);
            }
        }
        self.consume(TokenKind::RBracket, "expected ']' closing list literal")?;
        let id = self.next_id();
        Ok(Expression::ListLiteral { elements, id, pos })
    }

    /// `{ "a": 1, "b": 2 }` (map literal) vs `{ 1, 2, 3 }` (brace
    /// initializer for a struct/array) are disambiguated by whether the
    /// first element is followed by `:`.
    fn parse_brace_initializer(&mut self, pos: Pos) -> Result<Expression, ParseError> {
        self.advance();
        if self.check(TokenKind::RBrace) {
            self.advance();
            let id = self.next_id();
            return Ok(Expression::BraceInitializer { elements: Vec::new(), id, pos });
        }
        let first = self.parse_expression()?;
        if self.match_token(TokenKind::Colon) {
            let mut entries = vec![(first, self.parse_expression()?)];
            while self.match_token(TokenKind::Comma) {
                let key = self.parse_expression()?;
                self.consume(TokenKind::Colon, "expected ':' in map literal entry")?;
                let value = self.parse_expression()?;
                entries.push((key, value));
            }
            self.consume(TokenKind::RBrace, "expected '}' closing map literal")?;
            let id = self.next_id();
            return Ok(Expression::MapLiteral { entries, id, pos });
        }
        let mut elements = vec![first];
        while self.match_token(TokenKind::Comma) {
            elements.push(self.parse_expression()?);
        }
        self.consume(TokenKind::RBrace, "expected '}' closing brace initializer")?;
        let id = self.next_id();
        Ok(Expression::BraceInitializer { elements, id, pos })
    }

    fn parse_new(&mut self, pos: Pos) -> Result<Expression, ParseError> {
        self.advance();
        let ty = self.parse_type_expr()?;
        let mut args = Vec::new();
        if self.match_token(TokenKind::LParen) {
            if !self.check(TokenKind::RParen) {
                args.push(self.parse_assignment()?);
                while self.match_token(TokenKind::Comma) {
                    args.push(self.parse_assignment()?);
                }
            }
            self.consume(TokenKind::RParen, "expected ')' after constructor arguments")?;
        }
        let id = self.next_id();
        Ok(Expression::New { ty, args, id, pos })
    }

    fn parse_delete_expr(&mut self, pos: Pos) -> Result<Expression, ParseError> {
        self.advance();
        let expr = self.parse_unary()?;
        let id = self.next_id();
        Ok(Expression::Delete { expr: Box::new(expr), id, pos })
    }

    fn parse_sizeof(&mut self, pos: Pos) -> Result<Expression, ParseError> {
        self.advance();
        self.consume(TokenKind::LParen, "expected '(' after 'sizeof'")?;
        let checkpoint = self.save();
        let operand = if self.is_type_start(self.peek().kind) {
            match self.parse_type_expr() {
                Ok(ty) if self.check(TokenKind::RParen) => SizeofOperand::Type(ty),
                _ => {
                    self.restore(checkpoint);
                    SizeofOperand::Expr(Box::new(self.parse_expression()?))
                }
            }
        } else {
            SizeofOperand::Expr(Box::new(self.parse_expression()?))
        };
        self.consume(TokenKind::RParen, "expected ')' after sizeof operand")?;
        let id = self.next_id();
        Ok(Expression::Sizeof { operand, id, pos })
    }

    /// `var (Type name, ...) : Type { body }` — a typed lambda literal,
    /// lifted to a top-level static function by codegen's lambda pre-scan.
    /// There is no surface syntax for this in the source material this
    /// implementation is grounded on; `var` was picked as the leading
    /// keyword because it otherwise never starts an expression, so no
    /// grammar ambiguity is introduced (see DESIGN.md).
    fn parse_lambda(&mut self, pos: Pos) -> Result<Expression, ParseError> {
        self.advance();
        self.consume(TokenKind::LParen, "expected '(' after 'var' lambda introducer")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            params.push(self.parse_param()?);
            while self.match_token(TokenKind::Comma) {
                params.push(self.parse_param()?);
            }
        }
        self.consume(TokenKind::RParen, "expected ')' after lambda parameters")?;
        let return_type =
            if self.match_token(TokenKind::Colon) { Some(self.parse_type_expr()?) } else { None };
        let body = self.parse_block()?;
        let lambda = LambdaExpr { params, return_type, body, synthetic_name: None, pos };
        let id = self.next_id();
        Ok(Expression::Lambda { lambda: Box::new(lambda), id, pos })
    }

    fn parse_fstring_body(&mut self, raw: &str, pos: Pos) -> Result<Expression, ParseError> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '{' {
                if !literal.is_empty() {
                    parts.push(FStringPart { text: Some(std::mem::take(&mut literal)), expr: None });
                }
                let mut depth = 1usize;
                let mut expr_src = String::new();
                for c2 in chars.by_ref() {
                    if c2 == '{' {
                        depth += 1;
                        expr_src.push(c2);
                    } else if c2 == '}' {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                        expr_src.push(c2);
                    } else {
                        expr_src.push(c2);
                    }
                }
                let mut sub = Parser::new(&expr_src)?;
                let expr = sub.parse_expression()?;
                self.ids = sub.ids;
                parts.push(FStringPart { text: None, expr: Some(expr) });
            } else {
                literal.push(c);
            }
        }
        if !literal.is_empty() {
            parts.push(FStringPart { text: Some(literal), expr: None });
        }
        let id = self.next_id();
        Ok(Expression::FString { parts, id, pos })
    }

    pub(crate) fn save(&self) -> usize {
        self.current
    }

    pub(crate) fn restore(&mut self, checkpoint: usize) {
        self.current = checkpoint;
    }
}

fn parse_int_literal(raw: &str) -> i64 {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).unwrap_or(0)
    } else if let Some(bin) = raw.strip_prefix("0b").or_else(|| raw.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2).unwrap_or(0)
    } else if let Some(oct) = raw.strip_prefix("0o").or_else(|| raw.strip_prefix("0O")) {
        i64::from_str_radix(oct, 8).unwrap_or(0)
    } else {
        raw.parse().unwrap_or(0)
    }
}

fn unquote(lexeme: &str) -> String {
    let inner = lexeme.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(lexeme);
    let inner = inner.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')).unwrap_or(inner);
    inner.to_string()
}
