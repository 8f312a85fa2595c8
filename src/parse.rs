//! Recursive descent parser with precedence climbing for binary operators.
//!
//! The parser is total: malformed input degrades to placeholder leaves or
//! partially empty nodes, never an error. Expected-but-absent tokens are
//! consumed optionally, with the miss recorded as a diagnostic. Every path
//! through an expression either consumes a token or returns a placeholder
//! under a terminator, so parsing always terminates.

use crate::ast::{
    AssignmentStatement, BinaryExpr, Block, BlockItem, CallExpr, CallStatement, Chunk, CondClause,
    ElseClause, Expr, ExpressionStatement, FunctionDeclaration, FunctionExpr, Identifier,
    IfClause, IfStatement, IndexExpr, Literal, LocalStatement, MemberExpr, ReturnStatement, Stat,
    TableExpr, TableField, UnaryExpr, WhileStatement,
};
use crate::cursor::Cursor;
use crate::diag::Diagnostic;
use crate::lex::{tokenize, Token, TokenKind};

/// The chunk plus every anomaly recorded along the way. The tree's shape is
/// the same whether or not the caller looks at the diagnostics.
#[derive(Debug, PartialEq)]
pub struct ParseResult<'a> {
    pub chunk: Chunk<'a>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Tokenize and parse `source`. Lexical diagnostics come before syntactic
/// ones in the combined list.
pub fn parse(source: &str) -> ParseResult<'_> {
    let (tokens, mut diagnostics) = tokenize(source);
    let mut result = parse_tokens(source, &tokens);
    diagnostics.append(&mut result.diagnostics);
    result.diagnostics = diagnostics;
    result
}

/// Parse an already tokenized buffer. `tokens` must have been produced from
/// `source` so that spans resolve to the right text.
pub fn parse_tokens<'a>(source: &'a str, tokens: &[Token]) -> ParseResult<'a> {
    let mut parser = Parser {
        source,
        cursor: Cursor::new(tokens),
        diagnostics: Vec::new(),
        depth: 0,
    };
    let chunk = parser.chunk();
    ParseResult {
        chunk,
        diagnostics: parser.diagnostics,
    }
}

const UNARY_PRECEDENCE: u8 = 9;

/// Expression recursion tracks input nesting; anything deeper than this
/// degrades to a placeholder leaf instead of recursing further, keeping
/// stack use bounded on adversarially nested input.
const MAX_EXPRESSION_DEPTH: usize = 200;

fn binary_precedence(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::Or => 1,
        TokenKind::And => 2,
        TokenKind::Less
        | TokenKind::LessEqual
        | TokenKind::Greater
        | TokenKind::GreaterEqual
        | TokenKind::EqualEqual
        | TokenKind::NotEqual => 3,
        TokenKind::DotDot => 4,
        TokenKind::Plus | TokenKind::Minus => 5,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 6,
        TokenKind::Caret => 8,
        _ => 0,
    }
}

fn is_right_associative(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Caret | TokenKind::DotDot)
}

struct Parser<'a, 't> {
    source: &'a str,
    cursor: Cursor<'t>,
    diagnostics: Vec<Diagnostic>,
    depth: usize,
}

impl<'a, 't> Parser<'a, 't> {
    fn text(&self, token: &Token) -> &'a str {
        token.span.text(self.source)
    }

    fn line_hint(&self) -> u32 {
        self.cursor.peek().map_or(0, |token| token.line)
    }

    fn syntactic(&mut self, line: u32, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::syntactic(line, message));
    }

    /// Optionally consume `kind`; a miss is recorded, never fatal.
    fn expect(&mut self, kind: TokenKind, what: &str) -> bool {
        if self.cursor.eat(kind) {
            true
        } else {
            let line = self.line_hint();
            self.syntactic(line, format!("expected {}", what));
            false
        }
    }

    /// chunk ::= {stat}
    fn chunk(&mut self) -> Chunk<'a> {
        let mut chunk = Vec::new();
        while let Some(&token) = self.cursor.peek() {
            match token.kind {
                TokenKind::EndOfInput => break,
                TokenKind::Semicolon => {
                    self.cursor.advance();
                }
                TokenKind::Local => chunk.push(Stat::Local(self.local_statement())),
                TokenKind::Return => chunk.push(Stat::Return(self.return_statement())),
                TokenKind::If => chunk.push(Stat::If(self.if_statement())),
                TokenKind::While => chunk.push(Stat::While(self.while_statement())),
                TokenKind::Function => chunk.push(Stat::Function(self.function_declaration())),
                TokenKind::Identifier => chunk.push(self.identifier_statement()),
                _ => chunk.push(self.expression_statement()),
            }
        }
        chunk
    }

    /// stat ::= local namelist ['=' explist]
    fn local_statement(&mut self) -> LocalStatement<'a> {
        let line = self.line_hint();
        self.cursor.advance();
        let variables = self.identifier_list();
        let values = if self.cursor.eat(TokenKind::Equal) {
            self.expression_list()
        } else {
            Vec::new()
        };
        LocalStatement {
            line,
            variables,
            values,
        }
    }

    /// stat ::= return [explist] [';']
    fn return_statement(&mut self) -> ReturnStatement<'a> {
        let line = self.line_hint();
        self.cursor.advance();
        let values = self.return_values();
        self.cursor.eat(TokenKind::Semicolon);
        ReturnStatement { line, values }
    }

    /// The value list ends at `;` or any token that closes the enclosing
    /// block, so `return end` yields an empty list rather than a placeholder.
    fn return_values(&mut self) -> Vec<Expr<'a>> {
        match self.cursor.peek() {
            None => Vec::new(),
            Some(token) => match token.kind {
                TokenKind::Semicolon
                | TokenKind::End
                | TokenKind::Else
                | TokenKind::ElseIf
                | TokenKind::EndOfInput => Vec::new(),
                _ => self.expression_list(),
            },
        }
    }

    /// stat ::= if exp then block {elseif exp then block} [else block] end
    ///
    /// The clauses end up as one flat ordered list, not nested if/else
    /// nodes.
    fn if_statement(&mut self) -> IfStatement<'a> {
        let line = self.line_hint();
        self.cursor.advance();
        let mut clauses = Vec::new();

        let condition = self.expression();
        self.expect(TokenKind::Then, "`then`");
        let body = self.block(
            &[TokenKind::Else, TokenKind::ElseIf, TokenKind::End],
            "then",
            line,
        );
        clauses.push(IfClause::If(CondClause {
            line,
            condition,
            body,
        }));

        while self.cursor.check(TokenKind::ElseIf) {
            let clause_line = self.line_hint();
            self.cursor.advance();
            let condition = self.expression();
            self.expect(TokenKind::Then, "`then`");
            let body = self.block(
                &[TokenKind::Else, TokenKind::ElseIf, TokenKind::End],
                "elseif",
                clause_line,
            );
            clauses.push(IfClause::ElseIf(CondClause {
                line: clause_line,
                condition,
                body,
            }));
        }

        if self.cursor.check(TokenKind::Else) {
            let clause_line = self.line_hint();
            self.cursor.advance();
            let body = self.block(&[TokenKind::End], "else", clause_line);
            clauses.push(IfClause::Else(ElseClause {
                line: clause_line,
                body,
            }));
        }

        self.expect(TokenKind::End, "`end`");
        IfStatement { line, clauses }
    }

    /// stat ::= while exp [do] block end
    ///
    /// `do` is consumed when present but never required.
    fn while_statement(&mut self) -> WhileStatement<'a> {
        let line = self.line_hint();
        self.cursor.advance();
        let condition = self.expression();
        self.cursor.eat(TokenKind::Do);
        let body = self.block(&[TokenKind::End], "while_body", line);
        self.expect(TokenKind::End, "`end`");
        WhileStatement {
            line,
            condition,
            body,
        }
    }

    /// stat ::= function [Name] '(' [parlist] ')' block end
    fn function_declaration(&mut self) -> FunctionDeclaration<'a> {
        let line = self.line_hint();
        self.cursor.advance();
        let name = match self.cursor.peek() {
            Some(&token) if token.kind == TokenKind::Identifier => {
                self.cursor.advance();
                Identifier {
                    name: self.text(&token),
                    line: token.line,
                }
            }
            _ => Identifier {
                name: "<anon>",
                line,
            },
        };
        let params = if self.expect(TokenKind::LeftParen, "`(`") {
            self.parameters()
        } else {
            Vec::new()
        };
        let body = self.function_body("body", line);
        self.expect(TokenKind::End, "`end`");
        FunctionDeclaration {
            line,
            name,
            params,
            body,
        }
    }

    /// Disambiguate on the token after the leading identifier:
    /// `= | ,` is an assignment, `(` is a call statement, anything else is a
    /// bare expression statement.
    fn identifier_statement(&mut self) -> Stat<'a> {
        let line = self.line_hint();
        match self.cursor.peek_second().map(|token| token.kind) {
            Some(TokenKind::Equal) | Some(TokenKind::Comma) => {
                let variables = self.identifier_list();
                if self.cursor.eat(TokenKind::Equal) {
                    let values = self.expression_list();
                    Stat::Assignment(AssignmentStatement {
                        line,
                        variables,
                        values,
                    })
                } else {
                    // `a, b` with nothing to assign; the name list is
                    // dropped and whatever follows parses as an expression
                    let hint = self.line_hint();
                    self.syntactic(hint, "expected `=` after name list");
                    self.expression_statement()
                }
            }
            Some(TokenKind::LeftParen) => {
                let expression = self.suffixed_expression();
                Stat::Call(CallStatement { line, expression })
            }
            _ => self.expression_statement(),
        }
    }

    fn expression_statement(&mut self) -> Stat<'a> {
        let expression = self.expression();
        Stat::Expr(ExpressionStatement {
            line: expression.line(),
            expression,
        })
    }

    /// namelist ::= Name {',' Name}
    fn identifier_list(&mut self) -> Vec<Identifier<'a>> {
        let mut names = Vec::new();
        while let Some(&token) = self.cursor.peek() {
            if token.kind != TokenKind::Identifier {
                break;
            }
            self.cursor.advance();
            names.push(Identifier {
                name: self.text(&token),
                line: token.line,
            });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        names
    }

    /// explist ::= exp {',' exp}
    fn expression_list(&mut self) -> Vec<Expr<'a>> {
        let mut values = vec![self.expression()];
        while self.cursor.eat(TokenKind::Comma) {
            values.push(self.expression());
        }
        values
    }

    /// Body items between a construct's header and its terminator. Bodies
    /// hold expressions; statement keywords that reach here degrade through
    /// the expression path.
    fn block(&mut self, terminators: &[TokenKind], label: &'static str, line: u32) -> Block<'a> {
        let mut statements = Vec::new();
        while let Some(token) = self.cursor.peek() {
            if token.kind == TokenKind::EndOfInput || terminators.contains(&token.kind) {
                break;
            }
            statements.push(BlockItem::Expr(self.expression()));
            self.cursor.eat(TokenKind::Semicolon);
        }
        Block {
            label,
            line,
            statements,
        }
    }

    /// Like [`Parser::block`] but with `return` recognized, which only
    /// function bodies support.
    fn function_body(&mut self, label: &'static str, line: u32) -> Block<'a> {
        let mut statements = Vec::new();
        while let Some(&token) = self.cursor.peek() {
            match token.kind {
                TokenKind::EndOfInput | TokenKind::End => break,
                TokenKind::Return => {
                    self.cursor.advance();
                    let values = self.return_values();
                    statements.push(BlockItem::Return(ReturnStatement {
                        line: token.line,
                        values,
                    }));
                    self.cursor.eat(TokenKind::Semicolon);
                }
                _ => {
                    statements.push(BlockItem::Expr(self.expression()));
                    self.cursor.eat(TokenKind::Semicolon);
                }
            }
        }
        Block {
            label,
            line,
            statements,
        }
    }

    /// exp ::= exp binop exp | unop exp | suffixedexp
    fn expression(&mut self) -> Expr<'a> {
        self.binary_expression(1)
    }

    /// Depth-guarded entry to the climb. Every recursive step of an
    /// expression passes through here, so the counter bounds total stack
    /// use no matter how deeply parentheses, tables, or unary chains nest.
    fn binary_expression(&mut self, min_prec: u8) -> Expr<'a> {
        if self.depth >= MAX_EXPRESSION_DEPTH {
            let line = self.line_hint();
            self.syntactic(line, "expression nesting too deep");
            if !self.cursor.at_end() {
                self.cursor.advance();
            }
            return Expr::Name(Identifier { name: "?", line });
        }
        self.depth += 1;
        let expr = self.climb(min_prec);
        self.depth -= 1;
        expr
    }

    /// Precedence climbing: consume operators of at least `min_prec`,
    /// parsing each right operand with a threshold bumped past the
    /// operator's own level for left-associative operators only. A unary
    /// prefix binds its operand at a level above every binary operator
    /// except `^`.
    fn climb(&mut self, min_prec: u8) -> Expr<'a> {
        let mut left = match self.cursor.peek() {
            None => return missing_expression(),
            Some(&token)
                if matches!(
                    token.kind,
                    TokenKind::Minus | TokenKind::Not | TokenKind::Hash
                ) =>
            {
                self.cursor.advance();
                let argument = self.binary_expression(UNARY_PRECEDENCE);
                Expr::Unary(Box::new(UnaryExpr {
                    op: self.text(&token),
                    line: token.line,
                    argument,
                }))
            }
            Some(_) => self.suffixed_expression(),
        };

        while let Some(&op) = self.cursor.peek() {
            let prec = binary_precedence(op.kind);
            if prec == 0 || prec < min_prec {
                break;
            }
            self.cursor.advance();
            let next_min = if is_right_associative(op.kind) {
                prec
            } else {
                prec + 1
            };
            let right = self.binary_expression(next_min);
            left = Expr::Binary(Box::new(BinaryExpr {
                op: self.text(&op),
                line: op.line,
                left,
                right,
            }));
        }
        left
    }

    /// suffixedexp ::= primaryexp {'.' Name | '[' exp ']' | '(' [explist] ')'}
    fn suffixed_expression(&mut self) -> Expr<'a> {
        let mut expr = self.primary_expression();
        while let Some(&token) = self.cursor.peek() {
            match token.kind {
                TokenKind::Dot => {
                    self.cursor.advance();
                    match self.cursor.peek() {
                        Some(&name) if name.kind == TokenKind::Identifier => {
                            self.cursor.advance();
                            expr = Expr::Member(Box::new(MemberExpr {
                                line: token.line,
                                object: expr,
                                property: Identifier {
                                    name: self.text(&name),
                                    line: name.line,
                                },
                            }));
                        }
                        _ => {
                            self.syntactic(token.line, "expected name after `.`");
                            break;
                        }
                    }
                }
                TokenKind::LeftBracket => {
                    self.cursor.advance();
                    let index = self.expression();
                    self.expect(TokenKind::RightBracket, "`]`");
                    expr = Expr::Index(Box::new(IndexExpr {
                        line: token.line,
                        object: expr,
                        index,
                    }));
                }
                TokenKind::LeftParen => {
                    self.cursor.advance();
                    let arguments = self.argument_list();
                    expr = Expr::Call(Box::new(CallExpr {
                        line: token.line,
                        callee: expr,
                        arguments,
                    }));
                }
                _ => break,
            }
        }
        expr
    }

    fn argument_list(&mut self) -> Vec<Expr<'a>> {
        let mut arguments = Vec::new();
        while let Some(token) = self.cursor.peek() {
            if token.kind == TokenKind::RightParen || token.kind == TokenKind::EndOfInput {
                break;
            }
            arguments.push(self.expression());
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RightParen, "`)`");
        arguments
    }

    /// primaryexp ::= Number | String | true | false | nil | '...' | Name
    ///              | '(' exp ')' | tableconstructor | functiondef
    fn primary_expression(&mut self) -> Expr<'a> {
        let Some(&token) = self.cursor.peek() else {
            return missing_expression();
        };
        match token.kind {
            TokenKind::Number => {
                self.cursor.advance();
                Expr::Number(self.literal(&token))
            }
            TokenKind::String => {
                self.cursor.advance();
                Expr::Str(self.literal(&token))
            }
            TokenKind::True | TokenKind::False => {
                self.cursor.advance();
                Expr::Bool(self.literal(&token))
            }
            TokenKind::Nil => {
                self.cursor.advance();
                Expr::Nil(self.literal(&token))
            }
            TokenKind::DotDotDot => {
                self.cursor.advance();
                Expr::Vararg(self.literal(&token))
            }
            TokenKind::Identifier => {
                self.cursor.advance();
                Expr::Name(Identifier {
                    name: self.text(&token),
                    line: token.line,
                })
            }
            // parens are transparent; the inner expression is the node
            TokenKind::LeftParen => {
                self.cursor.advance();
                let inner = self.expression();
                self.expect(TokenKind::RightParen, "`)`");
                inner
            }
            TokenKind::LeftBrace => {
                self.cursor.advance();
                self.table_constructor(token.line)
            }
            TokenKind::Function => {
                self.cursor.advance();
                self.function_expression(token.line)
            }
            TokenKind::EndOfInput => {
                self.syntactic(token.line, "expected expression");
                Expr::Name(Identifier {
                    name: "?",
                    line: token.line,
                })
            }
            _ => {
                self.cursor.advance();
                self.syntactic(
                    token.line,
                    format!("expected expression, found `{}`", self.text(&token)),
                );
                Expr::Name(Identifier {
                    name: "?",
                    line: token.line,
                })
            }
        }
    }

    fn literal(&self, token: &Token) -> Literal<'a> {
        Literal {
            text: self.text(token),
            line: token.line,
        }
    }

    /// tableconstructor ::= '{' [exp {',' exp}] '}'
    ///
    /// No distinction between positional and keyed fields is made here;
    /// every field wraps a plain value expression.
    fn table_constructor(&mut self, line: u32) -> Expr<'a> {
        let mut fields = Vec::new();
        while let Some(token) = self.cursor.peek() {
            if token.kind == TokenKind::RightBrace || token.kind == TokenKind::EndOfInput {
                break;
            }
            let value = self.expression();
            fields.push(TableField {
                line: value.line(),
                value,
            });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RightBrace, "`}`");
        Expr::Table(TableExpr { line, fields })
    }

    /// functiondef ::= function '(' [parlist] ')' block end
    fn function_expression(&mut self, line: u32) -> Expr<'a> {
        if !self.cursor.eat(TokenKind::LeftParen) {
            self.syntactic(self.line_hint(), "expected `(` after `function`");
            return Expr::Function(Box::new(FunctionExpr {
                line,
                params: Vec::new(),
                body: None,
            }));
        }
        let params = self.parameters();
        let body = self.function_body("body", line);
        self.expect(TokenKind::End, "`end`");
        Expr::Function(Box::new(FunctionExpr {
            line,
            params,
            body: Some(body),
        }))
    }

    /// parlist ::= Name {',' Name}
    fn parameters(&mut self) -> Vec<Identifier<'a>> {
        let mut params = Vec::new();
        while let Some(&token) = self.cursor.peek() {
            match token.kind {
                TokenKind::RightParen | TokenKind::EndOfInput => break,
                TokenKind::Identifier => {
                    self.cursor.advance();
                    params.push(Identifier {
                        name: self.text(&token),
                        line: token.line,
                    });
                    self.cursor.eat(TokenKind::Comma);
                }
                _ => {
                    self.syntactic(token.line, "unexpected token in parameter list");
                    self.cursor.advance();
                }
            }
        }
        self.expect(TokenKind::RightParen, "`)`");
        params
    }
}

/// Placeholder for an expression requested past the end of the tokens.
fn missing_expression() -> Expr<'static> {
    Expr::Name(Identifier {
        name: "<?>",
        line: 0,
    })
}

#[cfg(test)]
mod test_parse {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunk_of(source: &str) -> Chunk<'_> {
        let result = parse(source);
        assert_eq!(result.diagnostics, vec![], "clean input: {:?}", source);
        result.chunk
    }

    fn name(n: &str, line: u32) -> Expr<'_> {
        Expr::Name(Identifier { name: n, line })
    }

    fn number(text: &str, line: u32) -> Expr<'_> {
        Expr::Number(Literal { text, line })
    }

    fn binary<'a>(op: &'a str, line: u32, left: Expr<'a>, right: Expr<'a>) -> Expr<'a> {
        Expr::Binary(Box::new(BinaryExpr {
            op,
            line,
            left,
            right,
        }))
    }

    #[test]
    fn empty_input() {
        assert_eq!(chunk_of(""), vec![]);
    }

    #[test]
    fn stray_semicolons_are_skipped() {
        assert_eq!(chunk_of(";;;"), vec![]);
    }

    #[test]
    fn local_with_values() {
        assert_eq!(
            chunk_of(r#"local x, y = 1, "two""#),
            vec![Stat::Local(LocalStatement {
                line: 1,
                variables: vec![
                    Identifier { name: "x", line: 1 },
                    Identifier { name: "y", line: 1 },
                ],
                values: vec![
                    number("1", 1),
                    Expr::Str(Literal {
                        text: "two",
                        line: 1,
                    }),
                ],
            })]
        );
    }

    #[test]
    fn local_without_values() {
        assert_eq!(
            chunk_of("local x"),
            vec![Stat::Local(LocalStatement {
                line: 1,
                variables: vec![Identifier { name: "x", line: 1 }],
                values: vec![],
            })]
        );
    }

    #[test]
    fn assignment() {
        assert_eq!(
            chunk_of("x, y = 1, 2"),
            vec![Stat::Assignment(AssignmentStatement {
                line: 1,
                variables: vec![
                    Identifier { name: "x", line: 1 },
                    Identifier { name: "y", line: 1 },
                ],
                values: vec![number("1", 1), number("2", 1)],
            })]
        );
    }

    #[test]
    fn name_list_without_equal_degrades() {
        let result = parse("x, y 1");
        assert_eq!(
            result.chunk,
            vec![Stat::Expr(ExpressionStatement {
                line: 1,
                expression: number("1", 1),
            })]
        );
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::syntactic(1, "expected `=` after name list")]
        );
    }

    #[test]
    fn call_statement() {
        assert_eq!(
            chunk_of("print(1, x)"),
            vec![Stat::Call(CallStatement {
                line: 1,
                expression: Expr::Call(Box::new(CallExpr {
                    line: 1,
                    callee: name("print", 1),
                    arguments: vec![number("1", 1), name("x", 1)],
                })),
            })]
        );
    }

    #[test]
    fn bare_identifier_is_an_expression_statement() {
        assert_eq!(
            chunk_of("x"),
            vec![Stat::Expr(ExpressionStatement {
                line: 1,
                expression: name("x", 1),
            })]
        );
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(
            chunk_of("1 + 2 * 3"),
            vec![Stat::Expr(ExpressionStatement {
                line: 1,
                expression: binary(
                    "+",
                    1,
                    number("1", 1),
                    binary("*", 1, number("2", 1), number("3", 1)),
                ),
            })]
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(
            chunk_of("1 - 2 - 3"),
            vec![Stat::Expr(ExpressionStatement {
                line: 1,
                expression: binary(
                    "-",
                    1,
                    binary("-", 1, number("1", 1), number("2", 1)),
                    number("3", 1),
                ),
            })]
        );
    }

    #[test]
    fn caret_is_right_associative() {
        assert_eq!(
            chunk_of("2 ^ 3 ^ 2"),
            vec![Stat::Expr(ExpressionStatement {
                line: 1,
                expression: binary(
                    "^",
                    1,
                    number("2", 1),
                    binary("^", 1, number("3", 1), number("2", 1)),
                ),
            })]
        );
    }

    #[test]
    fn concat_is_right_associative() {
        assert_eq!(
            chunk_of("a .. b .. c"),
            vec![Stat::Expr(ExpressionStatement {
                line: 1,
                expression: binary(
                    "..",
                    1,
                    name("a", 1),
                    binary("..", 1, name("b", 1), name("c", 1)),
                ),
            })]
        );
    }

    #[test]
    fn comparison_binds_looser_than_concat() {
        assert_eq!(
            chunk_of("a .. b == c"),
            vec![Stat::Expr(ExpressionStatement {
                line: 1,
                expression: binary(
                    "==",
                    1,
                    binary("..", 1, name("a", 1), name("b", 1)),
                    name("c", 1),
                ),
            })]
        );
    }

    #[test]
    fn unary_minus_binds_looser_than_caret_on_its_left() {
        // -x ^ 2 groups as (-x) ^ 2
        assert_eq!(
            chunk_of("-x ^ 2"),
            vec![Stat::Expr(ExpressionStatement {
                line: 1,
                expression: binary(
                    "^",
                    1,
                    Expr::Unary(Box::new(UnaryExpr {
                        op: "-",
                        line: 1,
                        argument: name("x", 1),
                    })),
                    number("2", 1),
                ),
            })]
        );
    }

    #[test]
    fn unary_on_the_right_of_caret() {
        assert_eq!(
            chunk_of("2 ^ -3"),
            vec![Stat::Expr(ExpressionStatement {
                line: 1,
                expression: binary(
                    "^",
                    1,
                    number("2", 1),
                    Expr::Unary(Box::new(UnaryExpr {
                        op: "-",
                        line: 1,
                        argument: number("3", 1),
                    })),
                ),
            })]
        );
    }

    #[test]
    fn not_and_length_operators() {
        assert_eq!(
            chunk_of("not x and #y"),
            vec![Stat::Expr(ExpressionStatement {
                line: 1,
                expression: binary(
                    "and",
                    1,
                    Expr::Unary(Box::new(UnaryExpr {
                        op: "not",
                        line: 1,
                        argument: name("x", 1),
                    })),
                    Expr::Unary(Box::new(UnaryExpr {
                        op: "#",
                        line: 1,
                        argument: name("y", 1),
                    })),
                ),
            })]
        );
    }

    #[test]
    fn suffix_chain_nests_left() {
        assert_eq!(
            chunk_of("a.b[1](2)"),
            vec![Stat::Call(CallStatement {
                line: 1,
                expression: Expr::Call(Box::new(CallExpr {
                    line: 1,
                    callee: Expr::Index(Box::new(IndexExpr {
                        line: 1,
                        object: Expr::Member(Box::new(MemberExpr {
                            line: 1,
                            object: name("a", 1),
                            property: Identifier { name: "b", line: 1 },
                        })),
                        index: number("1", 1),
                    })),
                    arguments: vec![number("2", 1)],
                })),
            })]
        );
    }

    #[test]
    fn parens_are_transparent() {
        assert_eq!(
            chunk_of("(x)"),
            vec![Stat::Expr(ExpressionStatement {
                line: 1,
                expression: name("x", 1),
            })]
        );
    }

    #[test]
    fn table_constructor() {
        assert_eq!(
            chunk_of("local t = {1, x}"),
            vec![Stat::Local(LocalStatement {
                line: 1,
                variables: vec![Identifier { name: "t", line: 1 }],
                values: vec![Expr::Table(TableExpr {
                    line: 1,
                    fields: vec![
                        TableField {
                            line: 1,
                            value: number("1", 1),
                        },
                        TableField {
                            line: 1,
                            value: name("x", 1),
                        },
                    ],
                })],
            })]
        );
    }

    #[test]
    fn function_declaration_with_return() {
        assert_eq!(
            chunk_of("function add(a, b)\n  return a + b\nend"),
            vec![Stat::Function(FunctionDeclaration {
                line: 1,
                name: Identifier {
                    name: "add",
                    line: 1,
                },
                params: vec![
                    Identifier { name: "a", line: 1 },
                    Identifier { name: "b", line: 1 },
                ],
                body: Block {
                    label: "body",
                    line: 1,
                    statements: vec![BlockItem::Return(ReturnStatement {
                        line: 2,
                        values: vec![binary("+", 2, name("a", 2), name("b", 2))],
                    })],
                },
            })]
        );
    }

    #[test]
    fn anonymous_function_declaration() {
        assert_eq!(
            chunk_of("function() end"),
            vec![Stat::Function(FunctionDeclaration {
                line: 1,
                name: Identifier {
                    name: "<anon>",
                    line: 1,
                },
                params: vec![],
                body: Block {
                    label: "body",
                    line: 1,
                    statements: vec![],
                },
            })]
        );
    }

    #[test]
    fn function_expression_in_value_position() {
        assert_eq!(
            chunk_of("local f = function(a) return a end"),
            vec![Stat::Local(LocalStatement {
                line: 1,
                variables: vec![Identifier { name: "f", line: 1 }],
                values: vec![Expr::Function(Box::new(FunctionExpr {
                    line: 1,
                    params: vec![Identifier { name: "a", line: 1 }],
                    body: Some(Block {
                        label: "body",
                        line: 1,
                        statements: vec![BlockItem::Return(ReturnStatement {
                            line: 1,
                            values: vec![name("a", 1)],
                        })],
                    }),
                }))],
            })]
        );
    }

    #[test]
    fn return_value_list_stops_at_end() {
        // `return end` inside a body must not swallow the terminator
        assert_eq!(
            chunk_of("function f() return end"),
            vec![Stat::Function(FunctionDeclaration {
                line: 1,
                name: Identifier { name: "f", line: 1 },
                params: vec![],
                body: Block {
                    label: "body",
                    line: 1,
                    statements: vec![BlockItem::Return(ReturnStatement {
                        line: 1,
                        values: vec![],
                    })],
                },
            })]
        );
    }

    #[test]
    fn return_with_multiple_values() {
        assert_eq!(
            chunk_of("return 1, 2;"),
            vec![Stat::Return(ReturnStatement {
                line: 1,
                values: vec![number("1", 1), number("2", 1)],
            })]
        );
    }

    #[test]
    fn if_elseif_else_clause_list() {
        let source = "if a then\n  x\nelseif b then\n  y\nelse\n  z\nend";
        assert_eq!(
            chunk_of(source),
            vec![Stat::If(IfStatement {
                line: 1,
                clauses: vec![
                    IfClause::If(CondClause {
                        line: 1,
                        condition: name("a", 1),
                        body: Block {
                            label: "then",
                            line: 1,
                            statements: vec![BlockItem::Expr(name("x", 2))],
                        },
                    }),
                    IfClause::ElseIf(CondClause {
                        line: 3,
                        condition: name("b", 3),
                        body: Block {
                            label: "elseif",
                            line: 3,
                            statements: vec![BlockItem::Expr(name("y", 4))],
                        },
                    }),
                    IfClause::Else(ElseClause {
                        line: 5,
                        body: Block {
                            label: "else",
                            line: 5,
                            statements: vec![BlockItem::Expr(name("z", 6))],
                        },
                    }),
                ],
            })]
        );
    }

    #[test]
    fn dangling_if_still_yields_a_statement() {
        let result = parse("if a then");
        assert_eq!(
            result.chunk,
            vec![Stat::If(IfStatement {
                line: 1,
                clauses: vec![IfClause::If(CondClause {
                    line: 1,
                    condition: name("a", 1),
                    body: Block {
                        label: "then",
                        line: 1,
                        statements: vec![],
                    },
                })],
            })]
        );
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::syntactic(1, "expected `end`")]
        );
    }

    #[test]
    fn while_with_do() {
        assert_eq!(
            chunk_of("while x do y end"),
            vec![Stat::While(WhileStatement {
                line: 1,
                condition: name("x", 1),
                body: Block {
                    label: "while_body",
                    line: 1,
                    statements: vec![BlockItem::Expr(name("y", 1))],
                },
            })]
        );
    }

    #[test]
    fn while_without_do() {
        assert_eq!(
            chunk_of("while x y end"),
            vec![Stat::While(WhileStatement {
                line: 1,
                condition: name("x", 1),
                body: Block {
                    label: "while_body",
                    line: 1,
                    statements: vec![BlockItem::Expr(name("y", 1))],
                },
            })]
        );
    }

    #[test]
    fn unsupported_statement_degrades_to_expressions() {
        // `for` has no dispatch arm; its tokens fall through the lenient
        // expression path and the keyword is reported
        let result = parse("for i");
        assert_eq!(
            result.chunk,
            vec![
                Stat::Expr(ExpressionStatement {
                    line: 1,
                    expression: name("?", 1),
                }),
                Stat::Expr(ExpressionStatement {
                    line: 1,
                    expression: name("i", 1),
                }),
            ]
        );
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::syntactic(1, "expected expression, found `for`")]
        );
    }

    #[test]
    fn deeply_nested_parens_terminate() {
        let source = format!("{}x{}", "(".repeat(100_000), ")".repeat(100_000));
        let result = parse(&source);
        assert!(!result.chunk.is_empty());
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.message == "expression nesting too deep"));
    }

    #[test]
    fn deep_unary_chain_terminates() {
        let source = format!("{}x", "not ".repeat(10_000));
        let result = parse(&source);
        assert!(!result.chunk.is_empty());
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.message == "expression nesting too deep"));
    }

    #[test]
    fn moderate_nesting_is_unaffected() {
        let source = format!("{}x{}", "(".repeat(150), ")".repeat(150));
        let result = parse(&source);
        assert_eq!(result.diagnostics, vec![]);
        assert_eq!(
            result.chunk,
            vec![Stat::Expr(ExpressionStatement {
                line: 1,
                expression: name("x", 1),
            })]
        );
    }

    #[test]
    fn terminates_on_garbage() {
        let result = parse("then ) ] = == or");
        assert!(!result.chunk.is_empty());
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn lexical_diagnostics_come_first() {
        let result = parse("local x = @ )");
        assert_eq!(
            result.diagnostics[0],
            Diagnostic::lexical(1, "unexpected byte 0x40")
        );
        assert!(result
            .diagnostics
            .iter()
            .skip(1)
            .all(|d| d.kind == crate::diag::DiagnosticKind::Syntactic));
    }

    #[test]
    fn parse_tokens_matches_parse() {
        let source = "local x = 1 + 2";
        let (tokens, _) = tokenize(source);
        assert_eq!(parse_tokens(source, &tokens), parse(source));
    }
}
