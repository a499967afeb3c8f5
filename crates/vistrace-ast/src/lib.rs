pub mod span {
    use serde::Serialize;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
    pub struct Span {
        pub start: u32,
        pub end: u32,
    }
}

pub mod ast {
    use super::span::Span;
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    pub struct Program {
        pub body: Vec<Stmt>,
        pub span: Span,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Ident {
        pub text: String,
        pub span: Span,
    }

    /// Statement forms of the restricted subset.
    ///
    /// `line` is the 1-based source line of the statement header; every
    /// trace step emitted for a statement shares this line as its identity.
    #[derive(Debug, Clone, Serialize)]
    pub enum Stmt {
        Assign {
            target: Ident,
            value: Expr,
            line: u32,
            span: Span,
        },
        /// Expression statement; only calls are meaningful downstream.
        Expr {
            expr: Expr,
            line: u32,
            span: Span,
        },
        /// Flattened if/elif chain plus optional else body.
        If {
            branches: Vec<IfBranch>,
            orelse: Option<ElseBranch>,
            line: u32,
            span: Span,
        },
        For {
            target: Ident,
            iter: Expr,
            body: Vec<Stmt>,
            line: u32,
            span: Span,
        },
        While {
            cond: Expr,
            body: Vec<Stmt>,
            line: u32,
            span: Span,
        },
        Break {
            line: u32,
            span: Span,
        },
        Pass {
            line: u32,
            span: Span,
        },
    }

    impl Stmt {
        pub fn line(&self) -> u32 {
            match self {
                Stmt::Assign { line, .. }
                | Stmt::Expr { line, .. }
                | Stmt::If { line, .. }
                | Stmt::For { line, .. }
                | Stmt::While { line, .. }
                | Stmt::Break { line, .. }
                | Stmt::Pass { line, .. } => *line,
            }
        }
    }

    /// One `if`/`elif` arm: guard expression plus its body.
    ///
    /// `line` is the line of the `if`/`elif` keyword itself, so each arm's
    /// guard frames carry their own identity.
    #[derive(Debug, Clone, Serialize)]
    pub struct IfBranch {
        pub test: Expr,
        pub body: Vec<Stmt>,
        pub line: u32,
        pub span: Span,
    }

    /// The unconditional `else` arm; `line` is the line of the keyword.
    #[derive(Debug, Clone, Serialize)]
    pub struct ElseBranch {
        pub body: Vec<Stmt>,
        pub line: u32,
    }

    #[derive(Debug, Clone, Serialize)]
    pub enum Expr {
        Lit(Lit, Span),
        Var(Ident),
        Binary {
            lhs: Box<Expr>,
            op: BinOp,
            rhs: Box<Expr>,
            span: Span,
        },
        Compare {
            lhs: Box<Expr>,
            op: CmpOp,
            rhs: Box<Expr>,
            span: Span,
        },
        Bool {
            lhs: Box<Expr>,
            op: BoolOp,
            rhs: Box<Expr>,
            span: Span,
        },
        List {
            elts: Vec<Expr>,
            span: Span,
        },
        Call {
            callee: Ident,
            args: Vec<Expr>,
            span: Span,
        },
    }

    impl Expr {
        pub fn span(&self) -> Span {
            match self {
                Expr::Lit(_, sp) => *sp,
                Expr::Var(id) => id.span,
                Expr::Binary { span, .. }
                | Expr::Compare { span, .. }
                | Expr::Bool { span, .. }
                | Expr::List { span, .. }
                | Expr::Call { span, .. } => *span,
            }
        }
    }

    #[derive(Debug, Clone, Serialize)]
    pub enum Lit {
        Int(i64),
        Float(f64),
        Str(String),
        Bool(bool),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum BinOp {
        Add,
        Sub,
        Mul,
        Div,
        FloorDiv,
    }

    impl BinOp {
        /// Literal operator symbol, used when joining history stages.
        pub fn symbol(self) -> &'static str {
            match self {
                BinOp::Add => "+",
                BinOp::Sub => "-",
                BinOp::Mul => "*",
                BinOp::Div => "/",
                BinOp::FloorDiv => "//",
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum CmpOp {
        Eq,
        Ne,
        Lt,
        Le,
        Gt,
        Ge,
    }

    impl CmpOp {
        pub fn symbol(self) -> &'static str {
            match self {
                CmpOp::Eq => "==",
                CmpOp::Ne => "!=",
                CmpOp::Lt => "<",
                CmpOp::Le => "<=",
                CmpOp::Gt => ">",
                CmpOp::Ge => ">=",
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum BoolOp {
        And,
        Or,
    }

    impl BoolOp {
        pub fn symbol(self) -> &'static str {
            match self {
                BoolOp::And => "and",
                BoolOp::Or => "or",
            }
        }
    }
}
