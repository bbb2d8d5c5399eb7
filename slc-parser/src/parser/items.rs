use super::Parser;
use crate::ParseError;
use slc_ast::{
    Access, ClassDecl, ClassMember, Declaration, EnumDecl, FieldDecl, FunctionDecl, MethodDecl,
    Param, PreprocessorDirective, PropertyDecl, StructDecl, TypedefDecl, VarDeclStmt,
};
use slc_lexer::TokenKind;

impl Parser {
    pub(crate) fn parse_top_level_item(&mut self) -> Result<Declaration, ParseError> {
        if self.check(TokenKind::Preprocessor) {
            return self.parse_preprocessor();
        }

        let is_gpu = self.match_token(TokenKind::AtGpu);

        if self.check(TokenKind::Class) {
            if is_gpu {
                return Err(self.error("@gpu cannot be applied to a class"));
            }
            return self.parse_class_decl().map(Declaration::Class);
        }
        if self.check(TokenKind::Struct) && self.struct_decl_follows() {
            if is_gpu {
                return Err(self.error("@gpu cannot be applied to a struct"));
            }
            return self.parse_struct_decl().map(Declaration::Struct);
        }
        if self.check(TokenKind::Enum) {
            if is_gpu {
                return Err(self.error("@gpu cannot be applied to an enum"));
            }
            return self.parse_enum_decl().map(Declaration::Enum);
        }
        if self.check(TokenKind::Typedef) {
            if is_gpu {
                return Err(self.error("@gpu cannot be applied to a typedef"));
            }
            return self.parse_typedef_decl().map(Declaration::Typedef);
        }
        if self.is_type_start(self.peek().kind) || self.check(TokenKind::Var) {
            return self.parse_function_or_var_decl(is_gpu);
        }

        Err(self.error(format!("unexpected token '{}' at top level", self.peek().lexeme)))
    }

    fn parse_preprocessor(&mut self) -> Result<Declaration, ParseError> {
        let pos = self.pos();
        let tok = self.advance().clone();
        Ok(Declaration::Preprocessor(PreprocessorDirective { text: tok.lexeme, pos }))
    }

    /// `struct` also introduces a `struct Foo` type-tag in a variable
    /// declaration (`struct Foo x;`); a real struct *declaration* is
    /// distinguished by a following `{` (optionally after a name).
    fn struct_decl_follows(&self) -> bool {
        if self.check_at(1, TokenKind::LBrace) {
            return true;
        }
        self.check_at(1, TokenKind::Ident)
            && (self.check_at(2, TokenKind::LBrace) || self.check_at(2, TokenKind::Semicolon))
    }

    // ---- class ----

    fn parse_class_decl(&mut self) -> Result<ClassDecl, ParseError> {
        let pos = self.pos();
        self.advance();
        let name = self.consume_ident("expected a class name")?;

        let mut generic_params = Vec::new();
        if self.match_token(TokenKind::Lt) {
            generic_params.push(self.consume_ident("expected a generic parameter name")?);
            while self.match_token(TokenKind::Comma) {
                generic_params.push(self.consume_ident("expected a generic parameter name")?);
            }
            self.expect_gt()?;
        }

        let parent = if self.match_token(TokenKind::Extends) {
            Some(self.consume_ident("expected a parent class name after 'extends'")?)
        } else {
            None
        };

        self.consume(TokenKind::LBrace, "expected '{' to start a class body")?;
        let mut members = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            members.push(self.parse_class_member()?);
        }
        self.consume(TokenKind::RBrace, "expected '}' closing a class body")?;

        Ok(ClassDecl { name, generic_params, parent, members, pos })
    }

    fn parse_access(&mut self) -> Access {
        if self.match_token(TokenKind::Public) {
            Access::Public
        } else if self.match_token(TokenKind::Private) {
            Access::Private
        } else if self.match_token(TokenKind::Class) {
            Access::Class
        } else {
            Access::Public
        }
    }

    fn parse_class_member(&mut self) -> Result<ClassMember, ParseError> {
        let access = self.parse_access();
        let is_gpu = self.match_token(TokenKind::AtGpu);
        let pos = self.pos();

        let ty = self.parse_type_expr()?;

        // Constructor: the just-parsed "type" is actually the member name,
        // immediately followed by '(' — `ClassName(...) { ... }`.
        if ty.generic_args.is_empty() && ty.pointer_depth == 0 && self.check(TokenKind::LParen) {
            let ctor_name = ty.base.clone();
            let method = self.parse_method_rest(access, ty, ctor_name, is_gpu, pos)?;
            return Ok(ClassMember::Method(method));
        }

        let name = self.consume_ident("expected a member name")?;

        if self.check(TokenKind::LParen) {
            let method = self.parse_method_rest(access, ty, name, is_gpu, pos)?;
            return Ok(ClassMember::Method(method));
        }

        if self.check(TokenKind::LBrace) {
            return self.parse_property_rest(access, ty, name, pos).map(ClassMember::Property);
        }

        let initializer = if self.match_token(TokenKind::Eq) { Some(self.parse_expression()?) } else { None };
        self.consume(TokenKind::Semicolon, "expected ';' after a field declaration")?;
        Ok(ClassMember::Field(FieldDecl { access, ty, name, initializer, pos }))
    }

    fn parse_method_rest(
        &mut self,
        access: Access,
        return_type: slc_ast::TypeExpr,
        name: String,
        is_gpu: bool,
        pos: slc_ast::Pos,
    ) -> Result<MethodDecl, ParseError> {
        self.consume(TokenKind::LParen, "expected '(' after a method name")?;
        let params = self.parse_param_list()?;
        self.consume(TokenKind::RParen, "expected ')' after method parameters")?;
        let body = self.parse_block()?;
        Ok(MethodDecl { access, return_type, name, params, body, is_gpu, pos })
    }

    /// `access type name { get; set; }` — either accessor may be a bare
    /// `get;`/`set;` (auto-implemented against a synthesized `_name`
    /// backing field) or carry its own block body; omitting one removes it.
    fn parse_property_rest(
        &mut self,
        access: Access,
        ty: slc_ast::TypeExpr,
        name: String,
        pos: slc_ast::Pos,
    ) -> Result<PropertyDecl, ParseError> {
        self.consume(TokenKind::LBrace, "expected '{' to start a property body")?;
        let mut getter = None;
        let mut setter = None;
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if self.check(TokenKind::Ident) && self.peek().lexeme == "get" {
                self.advance();
                if self.check(TokenKind::LBrace) {
                    getter = Some(Some(self.parse_block()?));
                } else {
                    self.consume(TokenKind::Semicolon, "expected ';' after 'get'")?;
                    getter = Some(None);
                }
            } else if self.check(TokenKind::Ident) && self.peek().lexeme == "set" {
                self.advance();
                if self.check(TokenKind::LBrace) {
                    setter = Some(Some(self.parse_block()?));
                } else {
                    self.consume(TokenKind::Semicolon, "expected ';' after 'set'")?;
                    setter = Some(None);
                }
            } else {
                return Err(self.error("expected 'get' or 'set' in a property body"));
            }
        }
        self.consume(TokenKind::RBrace, "expected '}' closing a property body")?;
        Ok(PropertyDecl { access, ty, name, getter, setter, pos })
    }

    // ---- struct ----

    fn parse_struct_decl(&mut self) -> Result<StructDecl, ParseError> {
        let pos = self.pos();
        self.advance();
        let name = if self.check(TokenKind::Ident) { self.advance().lexeme.clone() } else { String::new() };

        if self.match_token(TokenKind::Semicolon) {
            return Ok(StructDecl { name, fields: Vec::new(), pos });
        }

        self.consume(TokenKind::LBrace, "expected '{' to start a struct body")?;
        let mut fields = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let mut field_ty = self.parse_type_expr()?;
            let field_name = self.consume_ident("expected a field name")?;
            self.parse_array_suffix(&mut field_ty)?;
            self.consume(TokenKind::Semicolon, "expected ';' after a struct field")?;
            fields.push((field_ty, field_name));
        }
        self.consume(TokenKind::RBrace, "expected '}' closing a struct body")?;
        self.consume(TokenKind::Semicolon, "expected ';' after a struct declaration")?;
        Ok(StructDecl { name, fields, pos })
    }

    // ---- enum ----

    fn parse_enum_decl(&mut self) -> Result<EnumDecl, ParseError> {
        let pos = self.pos();
        self.advance();
        let name = if self.check(TokenKind::Ident) { self.advance().lexeme.clone() } else { String::new() };

        self.consume(TokenKind::LBrace, "expected '{' to start an enum body")?;
        let mut values = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let vname = self.consume_ident("expected an enum value name")?;
            let vval = if self.match_token(TokenKind::Eq) { Some(self.parse_expression()?) } else { None };
            values.push((vname, vval));
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.consume(TokenKind::RBrace, "expected '}' closing an enum body")?;
        self.consume(TokenKind::Semicolon, "expected ';' after an enum declaration")?;
        Ok(EnumDecl { name, values, pos })
    }

    // ---- typedef ----

    fn parse_typedef_decl(&mut self) -> Result<TypedefDecl, ParseError> {
        let pos = self.pos();
        self.advance();
        let original = self.parse_type_expr()?;
        let alias = self.consume_ident("expected a typedef alias")?;
        self.consume(TokenKind::Semicolon, "expected ';' after a typedef declaration")?;
        Ok(TypedefDecl { original, alias, pos })
    }

    // ---- function or top-level variable ----

    fn parse_function_or_var_decl(&mut self, is_gpu: bool) -> Result<Declaration, ParseError> {
        let pos = self.pos();

        if self.check(TokenKind::Var) {
            if is_gpu {
                return Err(self.error("@gpu cannot be applied to a variable"));
            }
            self.advance();
            let name = self.consume_ident("expected a variable name")?;
            self.consume(TokenKind::Eq, "a 'var' declaration requires an initializer")?;
            let initializer = Some(self.parse_expression()?);
            self.consume(TokenKind::Semicolon, "expected ';' after a variable declaration")?;
            return Ok(Declaration::TopLevelVar(VarDeclStmt {
                ty: None,
                is_inferred: true,
                name,
                initializer,
                pos,
            }));
        }

        let ty = self.parse_type_expr()?;
        let name = self.consume_ident("expected a name")?;

        if self.check(TokenKind::LParen) {
            self.advance();
            let params = self.parse_param_list()?;
            self.consume(TokenKind::RParen, "expected ')' after function parameters")?;
            let body = if self.check(TokenKind::Semicolon) {
                self.advance();
                None
            } else {
                Some(self.parse_block()?)
            };
            return Ok(Declaration::Function(FunctionDecl {
                return_type: ty,
                name,
                params,
                body,
                is_gpu,
                pos,
            }));
        }

        if is_gpu {
            return Err(self.error("@gpu cannot be applied to a variable"));
        }
        let initializer = if self.match_token(TokenKind::Eq) { Some(self.parse_expression()?) } else { None };
        self.consume(TokenKind::Semicolon, "expected ';' after a variable declaration")?;
        Ok(Declaration::TopLevelVar(VarDeclStmt { ty: Some(ty), is_inferred: false, name, initializer, pos }))
    }

    // ---- parameters (shared with lambda literals) ----

    pub(crate) fn parse_param_list(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(params);
        }
        params.push(self.parse_param()?);
        while self.match_token(TokenKind::Comma) {
            params.push(self.parse_param()?);
        }
        Ok(params)
    }

    pub(crate) fn parse_param(&mut self) -> Result<Param, ParseError> {
        let pos = self.pos();
        let mut ty = self.parse_type_expr()?;
        let name = self.consume_ident("expected a parameter name")?;
        self.parse_array_suffix(&mut ty)?;
        let default = if self.match_token(TokenKind::Eq) { Some(self.parse_expression()?) } else { None };
        Ok(Param { ty, name, default, pos })
    }
}
