use std::collections::VecDeque;

use crate::token::{Tok, TokKind};
use vistrace_ast::span::Span;

pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: u32,
    /// Indentation levels currently open; the bottom entry is always 0.
    indents: Vec<usize>,
    /// Synthetic tokens (Indent/Dedent/Newline runs) waiting to be returned.
    pending: VecDeque<Tok>,
    at_line_start: bool,
    eof_done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            line: 1,
            indents: vec![0],
            pending: VecDeque::new(),
            at_line_start: true,
            eof_done: false,
        }
    }

    fn bump(&mut self) -> Option<u8> {
        if self.pos >= self.src.len() {
            None
        } else {
            let b = self.src[self.pos];
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
            }
            Some(b)
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }
    fn peek2(&self) -> Option<u8> {
        self.src.get(self.pos + 1).copied()
    }

    fn span(&self, start: usize) -> Span {
        Span {
            start: start as u32,
            end: self.pos as u32,
        }
    }

    fn tok(&self, kind: TokKind, start: usize, line: u32) -> Tok {
        Tok {
            kind,
            span: self.span(start),
            line,
        }
    }

    fn here(&self, kind: TokKind) -> Tok {
        Tok {
            kind,
            span: Span {
                start: self.pos as u32,
                end: self.pos as u32,
            },
            line: self.line,
        }
    }

    /// Measure leading whitespace of the current line and queue
    /// Indent/Dedent tokens against the indentation stack. Blank and
    /// comment-only lines produce no layout tokens at all.
    fn handle_line_start(&mut self) {
        loop {
            let mut width = 0usize;
            let line_begin = self.pos;
            while let Some(b) = self.peek() {
                match b {
                    b' ' => {
                        width += 1;
                        self.bump();
                    }
                    b'\t' => {
                        width += 4;
                        self.bump();
                    }
                    _ => break,
                }
            }
            match self.peek() {
                // blank line: swallow and restart on the next one
                Some(b'\n') => {
                    self.bump();
                    continue;
                }
                // comment-only line
                Some(b'#') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                    continue;
                }
                None => return,
                _ => {}
            }

            let current = *self.indents.last().unwrap_or(&0);
            if width > current {
                self.indents.push(width);
                let t = Tok {
                    kind: TokKind::Indent,
                    span: self.span(line_begin),
                    line: self.line,
                };
                self.pending.push_back(t);
            } else if width < current {
                while self.indents.len() > 1 && *self.indents.last().unwrap_or(&0) > width {
                    self.indents.pop();
                    let t = self.here(TokKind::Dedent);
                    self.pending.push_back(t);
                }
            }
            return;
        }
    }

    pub fn next_tok(&mut self) -> Tok {
        if let Some(t) = self.pending.pop_front() {
            return t;
        }

        if self.at_line_start {
            self.at_line_start = false;
            self.handle_line_start();
            if let Some(t) = self.pending.pop_front() {
                return t;
            }
        }

        // intra-line whitespace and trailing comments
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') => {
                    self.bump();
                }
                Some(b'#') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }

        let start = self.pos;
        let line = self.line;
        let Some(b) = self.bump() else {
            // end of input: close any open blocks, then Eof
            if !self.eof_done {
                self.eof_done = true;
                let nl = self.here(TokKind::Newline);
                self.pending.push_back(nl);
                while self.indents.len() > 1 {
                    self.indents.pop();
                    let t = self.here(TokKind::Dedent);
                    self.pending.push_back(t);
                }
                let eof = self.here(TokKind::Eof);
                self.pending.push_back(eof);
                if let Some(t) = self.pending.pop_front() {
                    return t;
                }
            }
            return self.here(TokKind::Eof);
        };
        let c = b as char;

        if c == '\n' {
            self.at_line_start = true;
            return self.tok(TokKind::Newline, start, line);
        }

        // 2-char operators first
        if c == '/' && self.peek() == Some(b'/') {
            self.bump();
            return self.tok(TokKind::SlashSlash, start, line);
        }
        if c == '=' && self.peek() == Some(b'=') {
            self.bump();
            return self.tok(TokKind::EqEq, start, line);
        }
        if c == '!' && self.peek() == Some(b'=') {
            self.bump();
            return self.tok(TokKind::BangEq, start, line);
        }
        if c == '<' && self.peek() == Some(b'=') {
            self.bump();
            return self.tok(TokKind::Le, start, line);
        }
        if c == '>' && self.peek() == Some(b'=') {
            self.bump();
            return self.tok(TokKind::Ge, start, line);
        }

        // 1-char punctuation/operators
        let single = match c {
            '(' => Some(TokKind::LParen),
            ')' => Some(TokKind::RParen),
            '[' => Some(TokKind::LBracket),
            ']' => Some(TokKind::RBracket),
            ',' => Some(TokKind::Comma),
            ':' => Some(TokKind::Colon),
            '+' => Some(TokKind::Plus),
            '-' => Some(TokKind::Minus),
            '*' => Some(TokKind::Star),
            '/' => Some(TokKind::Slash),
            '=' => Some(TokKind::Eq),
            '<' => Some(TokKind::Lt),
            '>' => Some(TokKind::Gt),
            _ => None,
        };
        if let Some(k) = single {
            return self.tok(k, start, line);
        }

        // string, single or double quoted
        if c == '"' || c == '\'' {
            let quote = b;
            let mut s = String::new();
            while let Some(b) = self.peek() {
                self.bump();
                if b == quote {
                    break;
                }
                if b == b'\\' {
                    let Some(esc) = self.bump() else {
                        break;
                    };
                    let real = match esc {
                        b'n' => '\n',
                        b't' => '\t',
                        b'\'' => '\'',
                        b'"' => '"',
                        b'\\' => '\\',
                        other => other as char,
                    };
                    s.push(real);
                } else {
                    s.push(b as char);
                }
            }
            return self.tok(TokKind::Str(s), start, line);
        }

        // number (int/float)
        if c.is_ascii_digit() {
            let mut s = String::from(c);
            let mut dot = false;
            while let Some(p) = self.peek() {
                let ch = p as char;
                if ch.is_ascii_digit() {
                    s.push(ch);
                    self.bump();
                } else if ch == '.' && !dot && self.peek2().is_some_and(|n| n.is_ascii_digit()) {
                    dot = true;
                    s.push('.');
                    self.bump();
                } else {
                    break;
                }
            }
            if dot {
                return self.tok(TokKind::Float(s.parse().unwrap_or(0.0)), start, line);
            } else {
                return self.tok(TokKind::Int(s.parse().unwrap_or(0)), start, line);
            }
        }

        // ident / keywords
        if c.is_ascii_alphabetic() || c == '_' {
            let mut s = String::from(c);
            while let Some(p) = self.peek() {
                let ch = p as char;
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    s.push(ch);
                    self.bump();
                } else {
                    break;
                }
            }
            let kind = match s.as_str() {
                "if" => TokKind::KwIf,
                "elif" => TokKind::KwElif,
                "else" => TokKind::KwElse,
                "for" => TokKind::KwFor,
                "in" => TokKind::KwIn,
                "while" => TokKind::KwWhile,
                "break" => TokKind::KwBreak,
                "pass" => TokKind::KwPass,
                "and" => TokKind::KwAnd,
                "or" => TokKind::KwOr,
                "True" => TokKind::KwTrue,
                "False" => TokKind::KwFalse,
                _ => TokKind::Ident(s),
            };
            return self.tok(kind, start, line);
        }

        // fallback: unknown byte ends the token stream
        self.tok(TokKind::Eof, start, line)
    }
}
