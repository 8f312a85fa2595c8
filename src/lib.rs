//! A lenient Lua tokenizer and parser.
//!
//! Source text is tokenized into spans over the original buffer, then parsed
//! by recursive descent into a strongly typed syntax tree. Malformed input
//! never fails a parse; anomalies are collected as diagnostics next to the
//! tree, and the tree itself degrades to placeholder leaves where needed.
//!
//!  ```
//! use luar::ast::*;
//! use luar::parse::parse;
//! # fn main() {
//!
//! let program = "local x = 1";
//! let result = parse(program);
//!
//! assert_eq!(
//!     result.chunk,
//!     vec![Stat::Local(LocalStatement {
//!         line: 1,
//!         variables: vec![Identifier { name: "x", line: 1 }],
//!         values: vec![Expr::Number(Literal { text: "1", line: 1 })],
//!     })]
//! );
//! assert!(result.diagnostics.is_empty());
//! # }
//!  ```
pub mod ast;
pub mod cursor;
pub mod diag;
pub mod lex;
pub mod parse;
pub mod print;
