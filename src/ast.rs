//! Syntax tree types.
//!
//! Every node kind is its own struct with strongly-typed fields for its
//! child slots; a slot that can be empty is a `Vec` or an `Option`, so a
//! missing child is a compile-time-checked state rather than a map lookup.
//! Leaf payloads borrow from the source buffer, which therefore has to
//! outlive the tree.

#[derive(Debug, PartialEq)]
pub struct Identifier<'a> {
    pub name: &'a str,
    pub line: u32,
}

/// A literal leaf: the raw lexeme, uninterpreted.
#[derive(Debug, PartialEq)]
pub struct Literal<'a> {
    pub text: &'a str,
    pub line: u32,
}

#[derive(Debug, PartialEq)]
pub enum Expr<'a> {
    Number(Literal<'a>),
    Str(Literal<'a>),
    Bool(Literal<'a>),
    Nil(Literal<'a>),
    Vararg(Literal<'a>),
    Name(Identifier<'a>),
    Unary(Box<UnaryExpr<'a>>),
    Binary(Box<BinaryExpr<'a>>),
    Member(Box<MemberExpr<'a>>),
    Index(Box<IndexExpr<'a>>),
    Call(Box<CallExpr<'a>>),
    Table(TableExpr<'a>),
    Function(Box<FunctionExpr<'a>>),
}

impl<'a> Expr<'a> {
    pub fn line(&self) -> u32 {
        match self {
            Expr::Number(leaf)
            | Expr::Str(leaf)
            | Expr::Bool(leaf)
            | Expr::Nil(leaf)
            | Expr::Vararg(leaf) => leaf.line,
            Expr::Name(identifier) => identifier.line,
            Expr::Unary(e) => e.line,
            Expr::Binary(e) => e.line,
            Expr::Member(e) => e.line,
            Expr::Index(e) => e.line,
            Expr::Call(e) => e.line,
            Expr::Table(e) => e.line,
            Expr::Function(e) => e.line,
        }
    }
}

/// unop exp
#[derive(Debug, PartialEq)]
pub struct UnaryExpr<'a> {
    pub op: &'a str,
    pub line: u32,
    pub argument: Expr<'a>,
}

/// exp binop exp
#[derive(Debug, PartialEq)]
pub struct BinaryExpr<'a> {
    pub op: &'a str,
    pub line: u32,
    pub left: Expr<'a>,
    pub right: Expr<'a>,
}

/// exp '.' Name
#[derive(Debug, PartialEq)]
pub struct MemberExpr<'a> {
    pub line: u32,
    pub object: Expr<'a>,
    pub property: Identifier<'a>,
}

/// exp '[' exp ']'
#[derive(Debug, PartialEq)]
pub struct IndexExpr<'a> {
    pub line: u32,
    pub object: Expr<'a>,
    pub index: Expr<'a>,
}

/// exp '(' [explist] ')'
#[derive(Debug, PartialEq)]
pub struct CallExpr<'a> {
    pub line: u32,
    pub callee: Expr<'a>,
    pub arguments: Vec<Expr<'a>>,
}

/// '{' [exp {',' exp}] '}'
#[derive(Debug, PartialEq)]
pub struct TableExpr<'a> {
    pub line: u32,
    pub fields: Vec<TableField<'a>>,
}

#[derive(Debug, PartialEq)]
pub struct TableField<'a> {
    pub line: u32,
    pub value: Expr<'a>,
}

/// function '(' [parlist] ')' block end
///
/// `body` is `None` for the degenerate form where no parameter list follows
/// the `function` keyword.
#[derive(Debug, PartialEq)]
pub struct FunctionExpr<'a> {
    pub line: u32,
    pub params: Vec<Identifier<'a>>,
    pub body: Option<Block<'a>>,
}

/// An ordered run of body items. `label` records which construct the block
/// belongs to ("then", "else", "body", ...).
#[derive(Debug, PartialEq)]
pub struct Block<'a> {
    pub label: &'static str,
    pub line: u32,
    pub statements: Vec<BlockItem<'a>>,
}

/// Block bodies hold expressions; function bodies additionally recognize an
/// early `return`.
#[derive(Debug, PartialEq)]
pub enum BlockItem<'a> {
    Return(ReturnStatement<'a>),
    Expr(Expr<'a>),
}

/// local namelist ['=' explist]
#[derive(Debug, PartialEq)]
pub struct LocalStatement<'a> {
    pub line: u32,
    pub variables: Vec<Identifier<'a>>,
    pub values: Vec<Expr<'a>>,
}

/// namelist '=' explist
#[derive(Debug, PartialEq)]
pub struct AssignmentStatement<'a> {
    pub line: u32,
    pub variables: Vec<Identifier<'a>>,
    pub values: Vec<Expr<'a>>,
}

/// return [explist] [';']
#[derive(Debug, PartialEq)]
pub struct ReturnStatement<'a> {
    pub line: u32,
    pub values: Vec<Expr<'a>>,
}

/// A condition-guarded clause of an `if` statement.
#[derive(Debug, PartialEq)]
pub struct CondClause<'a> {
    pub line: u32,
    pub condition: Expr<'a>,
    pub body: Block<'a>,
}

#[derive(Debug, PartialEq)]
pub struct ElseClause<'a> {
    pub line: u32,
    pub body: Block<'a>,
}

#[derive(Debug, PartialEq)]
pub enum IfClause<'a> {
    If(CondClause<'a>),
    ElseIf(CondClause<'a>),
    Else(ElseClause<'a>),
}

/// if exp then block {elseif exp then block} [else block] end
///
/// The clause list, not nested if/else nodes, is the canonical shape.
#[derive(Debug, PartialEq)]
pub struct IfStatement<'a> {
    pub line: u32,
    pub clauses: Vec<IfClause<'a>>,
}

/// while exp [do] block end
#[derive(Debug, PartialEq)]
pub struct WhileStatement<'a> {
    pub line: u32,
    pub condition: Expr<'a>,
    pub body: Block<'a>,
}

/// function [Name] '(' [parlist] ')' block end
#[derive(Debug, PartialEq)]
pub struct FunctionDeclaration<'a> {
    pub line: u32,
    pub name: Identifier<'a>,
    pub params: Vec<Identifier<'a>>,
    pub body: Block<'a>,
}

/// A call in statement position.
#[derive(Debug, PartialEq)]
pub struct CallStatement<'a> {
    pub line: u32,
    pub expression: Expr<'a>,
}

/// Any other expression in statement position.
#[derive(Debug, PartialEq)]
pub struct ExpressionStatement<'a> {
    pub line: u32,
    pub expression: Expr<'a>,
}

#[derive(Debug, PartialEq)]
pub enum Stat<'a> {
    Local(LocalStatement<'a>),
    Assignment(AssignmentStatement<'a>),
    Return(ReturnStatement<'a>),
    If(IfStatement<'a>),
    While(WhileStatement<'a>),
    Function(FunctionDeclaration<'a>),
    Call(CallStatement<'a>),
    Expr(ExpressionStatement<'a>),
}

/// The ordered top-level statement sequence of a source unit.
pub type Chunk<'a> = Vec<Stat<'a>>;
