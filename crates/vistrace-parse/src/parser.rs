use crate::lexer::Lexer;
use crate::token::{Tok, TokKind};
use anyhow::{bail, Result};
use vistrace_ast::ast::{
    BinOp, BoolOp, CmpOp, ElseBranch, Expr, Ident, IfBranch, Lit, Program, Stmt,
};
use vistrace_ast::span::Span;

pub fn parse_str(_file: &str, src: &str) -> Result<Program> {
    let mut p = Parser::new(src);
    p.parse_program()
}

struct Parser<'a> {
    lex: Lexer<'a>,
    cur: Tok,
    nxt: Tok,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        let mut lex = Lexer::new(src);
        let cur = lex.next_tok();
        let nxt = lex.next_tok();
        Self { lex, cur, nxt }
    }

    fn bump(&mut self) {
        self.cur = std::mem::replace(&mut self.nxt, self.lex.next_tok());
    }

    fn at(&self, k: &TokKind) -> bool {
        std::mem::discriminant(&self.cur.kind) == std::mem::discriminant(k)
    }

    fn expect(&mut self, k: TokKind) -> Result<Tok> {
        if self.at(&k) {
            let t = self.cur.clone();
            self.bump();
            Ok(t)
        } else {
            bail!(
                "line {}: expected {:?}, found {:?}",
                self.cur.line,
                k,
                self.cur.kind
            )
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.cur.kind, TokKind::Newline) {
            self.bump();
        }
    }

    /// Consume the newline that terminates a simple statement.
    fn end_stmt(&mut self) -> Result<()> {
        if matches!(self.cur.kind, TokKind::Eof) {
            return Ok(());
        }
        self.expect(TokKind::Newline)?;
        Ok(())
    }

    // ======= program / statements =======

    fn parse_program(&mut self) -> Result<Program> {
        let start = self.cur.span.start;
        let mut body = Vec::new();
        self.skip_newlines();
        while !matches!(self.cur.kind, TokKind::Eof) {
            body.push(self.parse_stmt()?);
            self.skip_newlines();
        }
        Ok(Program {
            body,
            span: Span {
                start,
                end: self.cur.span.end,
            },
        })
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        match self.cur.kind {
            TokKind::KwIf => self.parse_if(),
            TokKind::KwFor => self.parse_for(),
            TokKind::KwWhile => self.parse_while(),
            TokKind::KwBreak => {
                let t = self.cur.clone();
                self.bump();
                self.end_stmt()?;
                Ok(Stmt::Break {
                    line: t.line,
                    span: t.span,
                })
            }
            TokKind::KwPass => {
                let t = self.cur.clone();
                self.bump();
                self.end_stmt()?;
                Ok(Stmt::Pass {
                    line: t.line,
                    span: t.span,
                })
            }
            _ => self.parse_simple_stmt(),
        }
    }

    /// Assignment or expression statement.
    fn parse_simple_stmt(&mut self) -> Result<Stmt> {
        let line = self.cur.line;
        let start = self.cur.span.start;
        let expr = self.parse_expr_bp(0)?;

        if matches!(self.cur.kind, TokKind::Eq) {
            let target = match expr {
                Expr::Var(id) => id,
                _ => bail!("line {}: assignment target must be a variable", line),
            };
            self.bump(); // consume '='
            let value = self.parse_expr_bp(0)?;
            let span = Span {
                start,
                end: value.span().end,
            };
            self.end_stmt()?;
            return Ok(Stmt::Assign {
                target,
                value,
                line,
                span,
            });
        }

        let span = Span {
            start,
            end: expr.span().end,
        };
        self.end_stmt()?;
        Ok(Stmt::Expr { expr, line, span })
    }

    /// Parse a `:` + NEWLINE + INDENT block, closed by DEDENT.
    fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        self.expect(TokKind::Colon)?;
        self.expect(TokKind::Newline)?;
        self.skip_newlines();
        self.expect(TokKind::Indent)?;
        let mut body = Vec::new();
        self.skip_newlines();
        while !matches!(self.cur.kind, TokKind::Dedent | TokKind::Eof) {
            body.push(self.parse_stmt()?);
            self.skip_newlines();
        }
        if matches!(self.cur.kind, TokKind::Dedent) {
            self.bump();
        }
        if body.is_empty() {
            bail!("empty block");
        }
        Ok(body)
    }

    /// `if`/`elif` chain plus optional `else`, flattened into branches.
    fn parse_if(&mut self) -> Result<Stmt> {
        let head = self.cur.clone();
        self.expect(TokKind::KwIf)?;

        let mut branches = Vec::new();
        let test = self.parse_expr_bp(0)?;
        let span = Span {
            start: head.span.start,
            end: test.span().end,
        };
        let body = self.parse_block()?;
        branches.push(IfBranch {
            test,
            body,
            line: head.line,
            span,
        });

        while matches!(self.cur.kind, TokKind::KwElif) {
            let kw = self.cur.clone();
            self.bump();
            let test = self.parse_expr_bp(0)?;
            let span = Span {
                start: kw.span.start,
                end: test.span().end,
            };
            let body = self.parse_block()?;
            branches.push(IfBranch {
                test,
                body,
                line: kw.line,
                span,
            });
        }

        let orelse = if matches!(self.cur.kind, TokKind::KwElse) {
            let kw = self.cur.clone();
            self.bump();
            let body = self.parse_block()?;
            Some(ElseBranch {
                body,
                line: kw.line,
            })
        } else {
            None
        };

        Ok(Stmt::If {
            branches,
            orelse,
            line: head.line,
            span: Span {
                start: head.span.start,
                end: self.cur.span.start,
            },
        })
    }

    /// `for <name> in <iter>:` block
    fn parse_for(&mut self) -> Result<Stmt> {
        let head = self.cur.clone();
        self.expect(TokKind::KwFor)?;
        let target = self.parse_ident()?;
        self.expect(TokKind::KwIn)?;
        let iter = self.parse_expr_bp(0)?;
        let span = Span {
            start: head.span.start,
            end: iter.span().end,
        };
        let body = self.parse_block()?;
        Ok(Stmt::For {
            target,
            iter,
            body,
            line: head.line,
            span,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        let head = self.cur.clone();
        self.expect(TokKind::KwWhile)?;
        let cond = self.parse_expr_bp(0)?;
        let span = Span {
            start: head.span.start,
            end: cond.span().end,
        };
        let body = self.parse_block()?;
        Ok(Stmt::While {
            cond,
            body,
            line: head.line,
            span,
        })
    }

    fn parse_ident(&mut self) -> Result<Ident> {
        match &self.cur.kind {
            TokKind::Ident(s) => {
                let id = Ident {
                    text: s.clone(),
                    span: self.cur.span,
                };
                self.bump();
                Ok(id)
            }
            _ => bail!(
                "line {}: expected identifier, found {:?}",
                self.cur.line,
                self.cur.kind
            ),
        }
    }

    // ======= expressions (Pratt parser) =======
    //
    // Precedence (low -> high):
    //   1:  or
    //   3:  and
    //   5:  == != < <= > >=
    //   10: + -
    //   20: * / //

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            enum Join {
                Bin(BinOp),
                Cmp(CmpOp),
                Bool(BoolOp),
            }
            let (op, lbp, rbp) = match self.cur.kind {
                TokKind::KwOr => (Join::Bool(BoolOp::Or), 1, 2),
                TokKind::KwAnd => (Join::Bool(BoolOp::And), 3, 4),
                TokKind::EqEq => (Join::Cmp(CmpOp::Eq), 5, 6),
                TokKind::BangEq => (Join::Cmp(CmpOp::Ne), 5, 6),
                TokKind::Lt => (Join::Cmp(CmpOp::Lt), 5, 6),
                TokKind::Le => (Join::Cmp(CmpOp::Le), 5, 6),
                TokKind::Gt => (Join::Cmp(CmpOp::Gt), 5, 6),
                TokKind::Ge => (Join::Cmp(CmpOp::Ge), 5, 6),
                TokKind::Plus => (Join::Bin(BinOp::Add), 10, 11),
                TokKind::Minus => (Join::Bin(BinOp::Sub), 10, 11),
                TokKind::Star => (Join::Bin(BinOp::Mul), 20, 21),
                TokKind::Slash => (Join::Bin(BinOp::Div), 20, 21),
                TokKind::SlashSlash => (Join::Bin(BinOp::FloorDiv), 20, 21),
                _ => break,
            };

            if lbp < min_bp {
                break;
            }
            self.bump(); // consume operator
            let rhs = self.parse_expr_bp(rbp)?;
            let span = Span {
                start: lhs.span().start,
                end: rhs.span().end,
            };
            lhs = match op {
                Join::Bin(op) => Expr::Binary {
                    lhs: Box::new(lhs),
                    op,
                    rhs: Box::new(rhs),
                    span,
                },
                Join::Cmp(op) => Expr::Compare {
                    lhs: Box::new(lhs),
                    op,
                    rhs: Box::new(rhs),
                    span,
                },
                Join::Bool(op) => Expr::Bool {
                    lhs: Box::new(lhs),
                    op,
                    rhs: Box::new(rhs),
                    span,
                },
            };
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr> {
        let tok_kind = self.cur.kind.clone();
        let tok_span = self.cur.span;
        let tok_line = self.cur.line;

        match tok_kind {
            // negative numeric literals fold into the literal itself
            TokKind::Minus => {
                self.bump();
                match self.cur.kind.clone() {
                    TokKind::Int(v) => {
                        let span = Span {
                            start: tok_span.start,
                            end: self.cur.span.end,
                        };
                        self.bump();
                        Ok(Expr::Lit(Lit::Int(-v), span))
                    }
                    TokKind::Float(v) => {
                        let span = Span {
                            start: tok_span.start,
                            end: self.cur.span.end,
                        };
                        self.bump();
                        Ok(Expr::Lit(Lit::Float(-v), span))
                    }
                    other => bail!(
                        "line {}: '-' must be followed by a number, found {:?}",
                        tok_line,
                        other
                    ),
                }
            }

            // primaries
            TokKind::Int(v) => {
                self.bump();
                Ok(Expr::Lit(Lit::Int(v), tok_span))
            }
            TokKind::Float(v) => {
                self.bump();
                Ok(Expr::Lit(Lit::Float(v), tok_span))
            }
            TokKind::Str(s) => {
                self.bump();
                Ok(Expr::Lit(Lit::Str(s), tok_span))
            }
            TokKind::KwTrue => {
                self.bump();
                Ok(Expr::Lit(Lit::Bool(true), tok_span))
            }
            TokKind::KwFalse => {
                self.bump();
                Ok(Expr::Lit(Lit::Bool(false), tok_span))
            }

            TokKind::Ident(_) => {
                let id = self.parse_ident()?;
                if matches!(self.cur.kind, TokKind::LParen) {
                    let args = self.parse_call_args()?;
                    let span = Span {
                        start: id.span.start,
                        end: self.cur.span.start,
                    };
                    Ok(Expr::Call {
                        callee: id,
                        args,
                        span,
                    })
                } else {
                    Ok(Expr::Var(id))
                }
            }

            // grouping; the tree keeps no parenthesis node, rendering
            // re-inserts parens from operator precedence
            TokKind::LParen => {
                self.bump();
                let inner = self.parse_expr_bp(0)?;
                self.expect(TokKind::RParen)?;
                Ok(inner)
            }

            // list display
            TokKind::LBracket => {
                let start = tok_span.start;
                self.bump();
                let mut elts = Vec::new();
                if !matches!(self.cur.kind, TokKind::RBracket) {
                    loop {
                        elts.push(self.parse_expr_bp(0)?);
                        if matches!(self.cur.kind, TokKind::Comma) {
                            self.bump();
                            continue;
                        }
                        break;
                    }
                }
                let end_tok = self.expect(TokKind::RBracket)?;
                Ok(Expr::List {
                    elts,
                    span: Span {
                        start,
                        end: end_tok.span.end,
                    },
                })
            }

            _ => bail!(
                "line {}: unexpected token in expression: {:?}",
                tok_line,
                tok_kind
            ),
        }
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>> {
        self.expect(TokKind::LParen)?;
        let mut args = Vec::new();
        if !matches!(self.cur.kind, TokKind::RParen) {
            loop {
                args.push(self.parse_expr_bp(0)?);
                if matches!(self.cur.kind, TokKind::Comma) {
                    self.bump();
                    continue;
                }
                break;
            }
        }
        self.expect(TokKind::RParen)?;
        Ok(args)
    }
}
