use super::Parser;
use crate::ParseError;
use slc_ast::TypeExpr;
use slc_lexer::TokenKind;

const QUALIFIERS: &[TokenKind] =
    &[TokenKind::Const, TokenKind::Static, TokenKind::Extern, TokenKind::Volatile];

const NUMERIC_WORDS: &[TokenKind] = &[
    TokenKind::Void,
    TokenKind::Int,
    TokenKind::Float,
    TokenKind::Double,
    TokenKind::Char,
    TokenKind::Short,
    TokenKind::Long,
    TokenKind::Unsigned,
    TokenKind::Signed,
];

impl Parser {
    /// Can the token at `offset` start a type expression? Used by the
    /// declaration-vs-statement lookahead (see [`Parser::looks_like_declaration`]).
    pub(crate) fn is_type_start(&self, kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Void
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::Double
                | TokenKind::Char
                | TokenKind::Short
                | TokenKind::Long
                | TokenKind::Unsigned
                | TokenKind::Signed
                | TokenKind::StringKw
                | TokenKind::Bool
                | TokenKind::List
                | TokenKind::Map
                | TokenKind::Array
                | TokenKind::Set
                | TokenKind::Struct
                | TokenKind::Enum
                | TokenKind::Union
                | TokenKind::Const
                | TokenKind::Static
                | TokenKind::Extern
                | TokenKind::Volatile
                | TokenKind::Ident
                | TokenKind::LParen
        )
    }

    pub(crate) fn parse_type_expr(&mut self) -> Result<TypeExpr, ParseError> {
        while self.match_any(QUALIFIERS).is_some() {}

        let pos = self.pos();
        let base = if matches!(self.peek().kind, TokenKind::Struct | TokenKind::Enum | TokenKind::Union) {
            let kw = self.advance().lexeme.clone();
            let name = self.consume_ident("expected a name after struct/enum/union")?;
            format!("{kw} {name}")
        } else if NUMERIC_WORDS.contains(&self.peek().kind) {
            let mut words = vec![self.advance().lexeme.clone()];
            while NUMERIC_WORDS.contains(&self.peek().kind) {
                words.push(self.advance().lexeme.clone());
            }
            words.join(" ")
        } else if matches!(self.peek().kind, TokenKind::StringKw | TokenKind::Bool) {
            self.advance().lexeme.clone()
        } else if matches!(self.peek().kind, TokenKind::List | TokenKind::Map | TokenKind::Array | TokenKind::Set) {
            self.advance().lexeme.clone()
        } else if self.check(TokenKind::Ident) {
            self.advance().lexeme.clone()
        } else if self.check(TokenKind::LParen) {
            return self.parse_tuple_type(pos);
        } else {
            return Err(self.error("expected a type"));
        };

        let mut generic_args = Vec::new();
        if self.looks_like_generic_open() {
            self.advance();
            generic_args.push(self.parse_type_expr()?);
            while self.match_token(TokenKind::Comma) {
                generic_args.push(self.parse_type_expr()?);
            }
            self.expect_gt()?;
        }

        let mut is_array = false;
        if self.check(TokenKind::LBracket) && self.check_at(1, TokenKind::RBracket) {
            self.advance();
            self.advance();
            is_array = true;
        }

        let mut pointer_depth = 0;
        while self.match_token(TokenKind::Star) {
            pointer_depth += 1;
        }
        // `T?` is sugar for `T*`: a nullable reference.
        if self.match_token(TokenKind::Question) {
            pointer_depth += 1;
        }

        Ok(TypeExpr { base, generic_args, pointer_depth, is_array, array_size: None, pos })
    }

    fn parse_tuple_type(&mut self, pos: slc_ast::Pos) -> Result<TypeExpr, ParseError> {
        self.consume(TokenKind::LParen, "expected '('")?;
        let mut generic_args = Vec::new();
        if !self.check(TokenKind::RParen) {
            generic_args.push(self.parse_type_expr()?);
            while self.match_token(TokenKind::Comma) {
                generic_args.push(self.parse_type_expr()?);
            }
        }
        self.consume(TokenKind::RParen, "expected ')' closing tuple type")?;
        let mut pointer_depth = 0;
        while self.match_token(TokenKind::Star) {
            pointer_depth += 1;
        }
        Ok(TypeExpr { base: "Tuple".to_string(), generic_args, pointer_depth, is_array: false, array_size: None, pos })
    }

    /// Fills in `is_array`/`array_size` from a trailing `[` ... `]` that
    /// follows a declared name (SPEC_FULL §3's C-style array declarator).
    pub(crate) fn parse_array_suffix(&mut self, ty: &mut TypeExpr) -> Result<(), ParseError> {
        if self.match_token(TokenKind::LBracket) {
            ty.is_array = true;
            if !self.check(TokenKind::RBracket) {
                ty.array_size = Some(Box::new(self.parse_expression()?));
            }
            self.consume(TokenKind::RBracket, "expected ']'")?;
        }
        Ok(())
    }
}
