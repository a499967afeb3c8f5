use vistrace_ast::span::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum TokKind {
    Eof,
    // layout (synthesized by the lexer)
    Newline,
    Indent,
    Dedent,
    // punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    // assignment
    Eq,
    // arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash, // floor division '//'
    // equality
    EqEq,
    BangEq,
    // relational
    Lt,
    Le,
    Gt,
    Ge,
    // idents / keywords
    Ident(String),
    KwIf,
    KwElif,
    KwElse,
    KwFor,
    KwIn,
    KwWhile,
    KwBreak,
    KwPass,
    KwAnd,
    KwOr,
    KwTrue,
    KwFalse,
    // literals
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone)]
pub struct Tok {
    pub kind: TokKind,
    pub span: Span,
    /// 1-based source line the token starts on.
    pub line: u32,
}
