//! Byte-level lexer turning source text into a flat token stream.
//!
//! Tokenization never splits a trailing `>>`/`>>=` into two tokens: a nested
//! generic closer like `List<List<int>>` lexes as `... INT GT_GT`, and it is
//! the parser's job (not the lexer's) to split that back into two `>` when
//! the surrounding context calls for it.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    IntLit,
    FloatLit,
    StringLit,
    CharLit,
    Ident,

    // C keywords
    Auto,
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extern,
    Float,
    For,
    Goto,
    If,
    Int,
    Long,
    Register,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
    While,

    // language keywords
    Class,
    Public,
    Private,
    SelfKw,
    In,
    Parallel,
    StringKw,
    Bool,
    True,
    False,
    New,
    Delete,
    Null,
    Try,
    Catch,
    Throw,
    Extends,
    Var,

    // built-in container type names
    List,
    Map,
    Array,
    Set,

    // annotation
    AtGpu,

    // operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    EqEq,
    BangEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    AmpAmp,
    PipePipe,
    Bang,
    Amp,
    Pipe,
    Caret,
    Tilde,
    LtLt,
    GtGt,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    LtLtEq,
    GtGtEq,
    PlusPlus,
    MinusMinus,
    Arrow,
    Dot,
    Question,
    QuestionDot,
    QuestionQuestion,
    Colon,
    Comma,
    Semicolon,

    // delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // special
    Preprocessor,
    FStringLit,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    fn new(kind: TokenKind, lexeme: String, line: usize, column: usize) -> Self {
        Self { kind, lexeme, line, column }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated string literal at {line}:{column}")]
    UnterminatedString { line: usize, column: usize },
    #[error("unterminated f-string literal at {line}:{column}")]
    UnterminatedFString { line: usize, column: usize },
    #[error("unterminated character literal at {line}:{column}")]
    UnterminatedChar { line: usize, column: usize },
    #[error("unterminated block comment at {line}:{column}")]
    UnterminatedBlockComment { line: usize, column: usize },
    #[error("unexpected character '{ch}' at {line}:{column}")]
    UnexpectedChar { ch: char, line: usize, column: usize },
    #[error("unknown annotation '@{name}' at {line}:{column}")]
    UnknownAnnotation { name: String, line: usize, column: usize },
}

fn keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "auto" => Auto,
        "break" => Break,
        "case" => Case,
        "char" => Char,
        "const" => Const,
        "continue" => Continue,
        "default" => Default,
        "do" => Do,
        "double" => Double,
        "else" => Else,
        "enum" => Enum,
        "extern" => Extern,
        "float" => Float,
        "for" => For,
        "goto" => Goto,
        "if" => If,
        "int" => Int,
        "long" => Long,
        "register" => Register,
        "return" => Return,
        "short" => Short,
        "signed" => Signed,
        "sizeof" => Sizeof,
        "static" => Static,
        "struct" => Struct,
        "switch" => Switch,
        "typedef" => Typedef,
        "union" => Union,
        "unsigned" => Unsigned,
        "void" => Void,
        "volatile" => Volatile,
        "while" => While,
        "class" => Class,
        "public" => Public,
        "private" => Private,
        "self" => SelfKw,
        "in" => In,
        "parallel" => Parallel,
        "string" => StringKw,
        "bool" => Bool,
        "true" => True,
        "false" => False,
        "new" => New,
        "delete" => Delete,
        "null" => Null,
        "try" => Try,
        "catch" => Catch,
        "throw" => Throw,
        "extends" => Extends,
        "var" => Var,
        "List" => List,
        "Map" => Map,
        "Array" => Array,
        "Set" => Set,
        _ => return None,
    })
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self { chars: source.chars().collect(), pos: 0, line: 1, column: 1 }
    }

    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
        log::debug!("lexer: tokenizing {} bytes", source.len());
        Self::new(source).run()
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            let (line, column) = (self.line, self.column);
            let Some(ch) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, String::new(), line, column));
                break;
            };
            let token = if ch == '#' {
                self.read_preprocessor(line, column)
            } else if ch.is_ascii_digit() {
                self.read_number(line, column)
            } else if ch == '"' {
                self.read_string(line, column)?
            } else if ch == '\'' {
                self.read_char(line, column)?
            } else if ch == '@' {
                self.read_annotation(line, column)?
            } else if is_ident_start(ch) {
                self.read_ident_or_fstring(line, column)?
            } else {
                self.read_operator(line, column)?
            };
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.advance();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let (line, column) = (self.line, self.column);
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            None => {
                                return Err(LexError::UnterminatedBlockComment { line, column })
                            }
                            Some('*') if self.peek_at(1) == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn read_preprocessor(&mut self, line: usize, column: usize) -> Token {
        let mut buf = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => break,
                Some('\\') if self.peek_at(1) == Some('\n') => {
                    self.advance();
                    self.advance();
                    buf.push(' ');
                }
                Some(c) => {
                    buf.push(c);
                    self.advance();
                }
            }
        }
        Token::new(TokenKind::Preprocessor, buf, line, column)
    }

    fn read_number(&mut self, line: usize, column: usize) -> Token {
        let mut buf = String::new();
        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X')) {
            buf.push(self.advance().unwrap());
            buf.push(self.advance().unwrap());
            while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                buf.push(self.advance().unwrap());
            }
            return Token::new(TokenKind::IntLit, buf, line, column);
        }
        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('b' | 'B')) {
            buf.push(self.advance().unwrap());
            buf.push(self.advance().unwrap());
            while matches!(self.peek(), Some('0' | '1')) {
                buf.push(self.advance().unwrap());
            }
            return Token::new(TokenKind::IntLit, buf, line, column);
        }
        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('o' | 'O')) {
            buf.push(self.advance().unwrap());
            buf.push(self.advance().unwrap());
            while matches!(self.peek(), Some(c) if ('0'..='7').contains(&c)) {
                buf.push(self.advance().unwrap());
            }
            return Token::new(TokenKind::IntLit, buf, line, column);
        }

        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            buf.push(self.advance().unwrap());
        }

        let mut is_float = false;
        if self.peek() == Some('.') && matches!(self.peek_at(1), Some(c) if c.is_ascii_digit()) {
            is_float = true;
            buf.push(self.advance().unwrap());
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                buf.push(self.advance().unwrap());
            }
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let sign_offset = if matches!(self.peek_at(1), Some('+' | '-')) { 2 } else { 1 };
            if matches!(self.peek_at(sign_offset), Some(c) if c.is_ascii_digit()) {
                is_float = true;
                buf.push(self.advance().unwrap());
                if matches!(self.peek(), Some('+' | '-')) {
                    buf.push(self.advance().unwrap());
                }
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    buf.push(self.advance().unwrap());
                }
            }
        }

        if is_float && self.peek() == Some('f') {
            buf.push(self.advance().unwrap());
        }

        Token::new(if is_float { TokenKind::FloatLit } else { TokenKind::IntLit }, buf, line, column)
    }

    fn read_escaped_span(&mut self, quote: char) -> Result<String, ()> {
        let mut buf = String::new();
        loop {
            match self.peek() {
                None => return Err(()),
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(buf);
                }
                Some('\\') => {
                    buf.push(self.advance().unwrap());
                    if let Some(c) = self.advance() {
                        buf.push(c);
                    } else {
                        return Err(());
                    }
                }
                Some(c) => {
                    buf.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_string(&mut self, line: usize, column: usize) -> Result<Token, LexError> {
        self.advance();
        let mut body = self
            .read_escaped_span('"')
            .map_err(|_| LexError::UnterminatedString { line, column })?;
        body.insert(0, '"');
        body.push('"');
        Ok(Token::new(TokenKind::StringLit, body, line, column))
    }

    fn read_char(&mut self, line: usize, column: usize) -> Result<Token, LexError> {
        self.advance();
        let mut body = self
            .read_escaped_span('\'')
            .map_err(|_| LexError::UnterminatedChar { line, column })?;
        body.insert(0, '\'');
        body.push('\'');
        Ok(Token::new(TokenKind::CharLit, body, line, column))
    }

    fn read_annotation(&mut self, line: usize, column: usize) -> Result<Token, LexError> {
        self.advance();
        let mut name = String::new();
        while matches!(self.peek(), Some(c) if is_ident_continue(c)) {
            name.push(self.advance().unwrap());
        }
        if name == "gpu" {
            Ok(Token::new(TokenKind::AtGpu, format!("@{name}"), line, column))
        } else {
            Err(LexError::UnknownAnnotation { name, line, column })
        }
    }

    fn read_ident_or_fstring(&mut self, line: usize, column: usize) -> Result<Token, LexError> {
        let mut text = String::new();
        while matches!(self.peek(), Some(c) if is_ident_continue(c)) {
            text.push(self.advance().unwrap());
        }
        if text == "f" && self.peek() == Some('"') {
            self.advance();
            let body = self
                .read_escaped_span('"')
                .map_err(|_| LexError::UnterminatedFString { line, column })?;
            return Ok(Token::new(TokenKind::FStringLit, body, line, column));
        }
        let kind = keyword(&text).unwrap_or(TokenKind::Ident);
        Ok(Token::new(kind, text, line, column))
    }

    fn read_operator(&mut self, line: usize, column: usize) -> Result<Token, LexError> {
        use TokenKind::*;
        let three: Option<(&str, TokenKind)> = match (self.peek(), self.peek_at(1), self.peek_at(2)) {
            (Some('<'), Some('<'), Some('=')) => Some(("<<=", LtLtEq)),
            (Some('>'), Some('>'), Some('=')) => Some((">>=", GtGtEq)),
            _ => None,
        };
        if let Some((text, kind)) = three {
            for _ in 0..3 {
                self.advance();
            }
            return Ok(Token::new(kind, text.to_string(), line, column));
        }

        let two: Option<(&str, TokenKind)> = match (self.peek(), self.peek_at(1)) {
            (Some('='), Some('=')) => Some(("==", EqEq)),
            (Some('!'), Some('=')) => Some(("!=", BangEq)),
            (Some('<'), Some('=')) => Some(("<=", LtEq)),
            (Some('>'), Some('=')) => Some((">=", GtEq)),
            (Some('&'), Some('&')) => Some(("&&", AmpAmp)),
            (Some('|'), Some('|')) => Some(("||", PipePipe)),
            (Some('+'), Some('+')) => Some(("++", PlusPlus)),
            (Some('-'), Some('-')) => Some(("--", MinusMinus)),
            (Some('-'), Some('>')) => Some(("->", Arrow)),
            (Some('<'), Some('<')) => Some(("<<", LtLt)),
            (Some('>'), Some('>')) => Some((">>", GtGt)),
            (Some('+'), Some('=')) => Some(("+=", PlusEq)),
            (Some('-'), Some('=')) => Some(("-=", MinusEq)),
            (Some('*'), Some('=')) => Some(("*=", StarEq)),
            (Some('/'), Some('=')) => Some(("/=", SlashEq)),
            (Some('%'), Some('=')) => Some(("%=", PercentEq)),
            (Some('&'), Some('=')) => Some(("&=", AmpEq)),
            (Some('|'), Some('=')) => Some(("|=", PipeEq)),
            (Some('^'), Some('=')) => Some(("^=", CaretEq)),
            (Some('?'), Some('.')) => Some(("?.", QuestionDot)),
            (Some('?'), Some('?')) => Some(("??", QuestionQuestion)),
            _ => None,
        };
        if let Some((text, kind)) = two {
            self.advance();
            self.advance();
            return Ok(Token::new(kind, text.to_string(), line, column));
        }

        let ch = self.advance().unwrap();
        let kind = match ch {
            '+' => Plus,
            '-' => Minus,
            '*' => Star,
            '/' => Slash,
            '%' => Percent,
            '=' => Eq,
            '<' => Lt,
            '>' => Gt,
            '!' => Bang,
            '&' => Amp,
            '|' => Pipe,
            '^' => Caret,
            '~' => Tilde,
            '.' => Dot,
            '?' => Question,
            ':' => Colon,
            ',' => Comma,
            ';' => Semicolon,
            '(' => LParen,
            ')' => RParen,
            '[' => LBracket,
            ']' => RBracket,
            '{' => LBrace,
            '}' => RBrace,
            other => return Err(LexError::UnexpectedChar { ch: other, line, column }),
        };
        Ok(Token::new(kind, ch.to_string(), line, column))
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn lexemes(source: &str) -> Vec<String> {
        Lexer::tokenize(source).unwrap().into_iter().map(|t| t.lexeme).collect()
    }

    #[test]
    fn empty_input_is_just_eof() {
        let tokens = Lexer::tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn integer_literal_bases() {
        assert_eq!(kinds("42"), vec![TokenKind::IntLit, TokenKind::Eof]);
        assert_eq!(lexemes("0xFF"), vec!["0xFF", ""]);
        assert_eq!(lexemes("0b1010"), vec!["0b1010", ""]);
        assert_eq!(kinds("0xFF"), vec![TokenKind::IntLit, TokenKind::Eof]);
    }

    #[test]
    fn float_literal_forms() {
        assert_eq!(kinds("3.14"), vec![TokenKind::FloatLit, TokenKind::Eof]);
        assert_eq!(lexemes("3.14f"), vec!["3.14f", ""]);
        assert_eq!(kinds("1e10"), vec![TokenKind::FloatLit, TokenKind::Eof]);
        assert_eq!(kinds("2.5e-3"), vec![TokenKind::FloatLit, TokenKind::Eof]);
    }

    #[test]
    fn string_and_char_literals_keep_their_quotes() {
        assert_eq!(lexemes("\"hello\""), vec!["\"hello\"".to_string(), String::new()]);
        assert_eq!(lexemes("'a'"), vec!["'a'".to_string(), String::new()]);
        assert_eq!(lexemes("'\\n'"), vec!["'\\n'".to_string(), String::new()]);
    }

    #[test]
    fn language_keywords() {
        let source = "class public private self in parallel";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Class,
                TokenKind::Public,
                TokenKind::Private,
                TokenKind::SelfKw,
                TokenKind::In,
                TokenKind::Parallel,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn builtin_type_keywords() {
        assert_eq!(
            kinds("List Map Array Set string bool"),
            vec![
                TokenKind::List,
                TokenKind::Map,
                TokenKind::Array,
                TokenKind::Set,
                TokenKind::StringKw,
                TokenKind::Bool,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn identifiers_are_not_keywords() {
        assert_eq!(
            kinds("myVar foo_bar _private"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn multi_char_operators_pick_longest_match() {
        let cases: &[(&str, TokenKind)] = &[
            ("==", TokenKind::EqEq),
            ("!=", TokenKind::BangEq),
            ("&&", TokenKind::AmpAmp),
            ("->", TokenKind::Arrow),
            ("<<=", TokenKind::LtLtEq),
            (">>=", TokenKind::GtGtEq),
        ];
        for (source, kind) in cases {
            let tokens = Lexer::tokenize(source).unwrap();
            assert_eq!(tokens[0].kind, *kind, "{source}");
            assert_eq!(tokens[0].lexeme, *source);
        }
    }

    #[test]
    fn nested_generic_closer_lexes_as_one_shift_token() {
        assert_eq!(
            kinds("Map<string, List<int>>"),
            vec![
                TokenKind::Map,
                TokenKind::Lt,
                TokenKind::StringKw,
                TokenKind::Comma,
                TokenKind::List,
                TokenKind::Lt,
                TokenKind::Int,
                TokenKind::GtGt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn at_gpu_annotation() {
        assert_eq!(kinds("@gpu void foo"), vec![TokenKind::AtGpu, TokenKind::Void, TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn unknown_annotation_is_an_error() {
        assert!(Lexer::tokenize("@foo").is_err());
    }

    #[test]
    fn preprocessor_directive_is_opaque() {
        let tokens = Lexer::tokenize("#include <stdio.h>").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Preprocessor);
        assert_eq!(tokens[0].lexeme, "#include <stdio.h>");
    }

    #[test]
    fn preprocessor_continuation_line_is_merged() {
        let tokens = Lexer::tokenize("#define MACRO \\\nvalue").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Preprocessor);
        assert!(tokens[0].lexeme.contains("MACRO"));
        assert!(tokens[0].lexeme.contains("value"));
    }

    #[test]
    fn preprocessor_followed_by_code() {
        assert_eq!(
            kinds("#include <stdio.h>\nint x;"),
            vec![
                TokenKind::Preprocessor,
                TokenKind::Int,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn line_and_block_comments_are_skipped() {
        assert_eq!(
            kinds("int x; // comment\nint y;"),
            vec![
                TokenKind::Int,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Int,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("int /* line1\nline2 */ x;"),
            vec![TokenKind::Int, TokenKind::Ident, TokenKind::Semicolon, TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        assert!(Lexer::tokenize("/* oops").is_err());
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(Lexer::tokenize("\"hello").is_err());
    }

    #[test]
    fn unexpected_character_is_an_error() {
        assert!(Lexer::tokenize("`").is_err());
    }

    #[test]
    fn position_tracking_across_lines() {
        let tokens = Lexer::tokenize("int\nfloat").unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 1));
    }

    #[test]
    fn column_tracking_within_a_line() {
        let tokens = Lexer::tokenize("int x = 5;").unwrap();
        assert_eq!(tokens[0].column, 1); // int
        assert_eq!(tokens[1].column, 5); // x
        assert_eq!(tokens[2].column, 7); // =
        assert_eq!(tokens[3].column, 9); // 5
    }

    #[test]
    fn fstring_captures_raw_interpolation_payload() {
        let tokens = Lexer::tokenize("f\"hello {name}\"").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::FStringLit);
        assert_eq!(tokens[0].lexeme, "hello {name}");
    }

    #[test]
    fn bare_f_not_followed_by_quote_is_an_identifier() {
        let tokens = Lexer::tokenize("f + 1").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].lexeme, "f");
    }

    #[test]
    fn empty_fstring() {
        let tokens = Lexer::tokenize("f\"\"").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::FStringLit);
        assert_eq!(tokens[0].lexeme, "");
    }

    #[test]
    fn delete_is_a_keyword_not_an_identifier() {
        assert_eq!(
            kinds("delete ptr;"),
            vec![TokenKind::Delete, TokenKind::Ident, TokenKind::Semicolon, TokenKind::Eof]
        );
    }
}
