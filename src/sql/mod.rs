//! SQL front end
//!
//! Lexer, parser and the parsed [`Command`] type.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{AlterOperation, Assignment, ColumnDef, Command, CompareOp, Predicate, Projection};
pub use lexer::Lexer;
pub use parser::Parser;

use crate::error::Result;

/// Parse one statement into a [`Command`]
pub fn parse(sql: &str) -> Result<Command> {
    Parser::new(sql)?.parse()
}
