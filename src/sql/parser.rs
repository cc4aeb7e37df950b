//! SQL Parser
//!
//! This module parses statement tokens into a [`Command`].

use std::collections::HashSet;

use super::ast::*;
use super::lexer::Lexer;
use super::token::Token;
use crate::catalog::ColumnType;
use crate::error::{Error, Result};
use crate::storage::Value;

/// SQL Parser
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    /// Statement shape being parsed, reported in syntax errors
    statement: &'static str,
}

impl Parser {
    /// Create a new parser from a statement string
    pub fn new(sql: &str) -> Result<Self> {
        let mut lexer = Lexer::new(sql);
        let tokens = lexer.tokenize()?;

        Ok(Self {
            tokens,
            position: 0,
            statement: "statement",
        })
    }

    /// Parse exactly one statement, with an optional trailing semicolon
    pub fn parse(&mut self) -> Result<Command> {
        if self.is_at_end() {
            return Err(self.error("empty statement"));
        }

        let command = self.parse_statement()?;

        // Consume optional semicolon
        if self.check(&Token::Semicolon) {
            self.advance();
        }

        if !self.is_at_end() {
            return Err(self.error(format!(
                "unexpected trailing input '{}'",
                self.current()
            )));
        }

        Ok(command)
    }

    /// Parse a single statement
    fn parse_statement(&mut self) -> Result<Command> {
        match self.current() {
            Token::Create => self.parse_create_table(),
            Token::Insert => self.parse_insert(),
            Token::Select => self.parse_select(),
            Token::Update => self.parse_update(),
            Token::Delete => self.parse_delete(),
            Token::Alter => self.parse_alter(),
            Token::Drop => self.parse_drop_table(),
            Token::Begin => self.parse_begin(),
            Token::Commit => self.parse_commit(),
            Token::Rollback => self.parse_rollback(),
            Token::Identifier(word) => Err(self.error(format!("unknown keyword '{}'", word))),
            other => Err(self.error(format!(
                "expected SELECT, INSERT, UPDATE, DELETE, CREATE, ALTER, DROP, BEGIN, COMMIT, or ROLLBACK, found '{}'",
                other
            ))),
        }
    }

    // ========== CREATE TABLE Statement ==========

    fn parse_create_table(&mut self) -> Result<Command> {
        self.statement = "CREATE TABLE";
        self.expect(&Token::Create)?;
        self.expect(&Token::Table)?;

        let name = self.expect_identifier()?;

        self.expect(&Token::LParen)?;

        let mut columns = Vec::new();
        let mut seen = HashSet::new();
        loop {
            let column = self.expect_identifier()?;
            let column_type = self.parse_column_type()?;

            if !seen.insert(column.clone()) {
                return Err(self.error(format!("duplicate column '{}'", column)));
            }
            columns.push(ColumnDef {
                name: column,
                column_type,
            });

            if !self.check(&Token::Comma) {
                break;
            }
            self.advance();
        }

        self.expect(&Token::RParen)?;

        Ok(Command::CreateTable { name, columns })
    }

    fn parse_column_type(&mut self) -> Result<ColumnType> {
        match self.current().clone() {
            Token::Identifier(name) => {
                self.advance();
                Ok(ColumnType::from_name(&name))
            }
            other => Err(self.error(format!("expected column type, found '{}'", other))),
        }
    }

    // ========== INSERT Statement ==========

    fn parse_insert(&mut self) -> Result<Command> {
        self.statement = "INSERT INTO";
        self.expect(&Token::Insert)?;
        self.expect(&Token::Into)?;

        let table = self.expect_identifier()?;

        // Optional column list
        let columns = if self.check(&Token::LParen) {
            self.advance();
            let cols = self.parse_identifier_list()?;
            self.expect(&Token::RParen)?;

            let mut seen = HashSet::new();
            if let Some(dup) = cols.iter().find(|c| !seen.insert(c.as_str())) {
                return Err(self.error(format!("duplicate column '{}'", dup)));
            }
            Some(cols)
        } else {
            None
        };

        self.expect(&Token::Values)?;
        self.expect(&Token::LParen)?;
        let values = self.parse_value_list()?;
        self.expect(&Token::RParen)?;

        Ok(Command::Insert {
            table,
            columns,
            values,
        })
    }

    // ========== SELECT Statement ==========

    fn parse_select(&mut self) -> Result<Command> {
        self.statement = "SELECT";
        self.expect(&Token::Select)?;

        let projection = if self.check(&Token::Asterisk) {
            self.advance();
            Projection::Wildcard
        } else {
            Projection::Columns(self.parse_identifier_list()?)
        };

        self.expect(&Token::From)?;
        let table = self.expect_identifier()?;
        let predicate = self.parse_where_clause()?;

        Ok(Command::Select {
            table,
            projection,
            predicate,
        })
    }

    // ========== UPDATE Statement ==========

    fn parse_update(&mut self) -> Result<Command> {
        self.statement = "UPDATE";
        self.expect(&Token::Update)?;

        let table = self.expect_identifier()?;

        self.expect(&Token::Set)?;

        let mut assignments = Vec::new();
        loop {
            let column = self.expect_identifier()?;
            self.expect(&Token::Eq)?;
            let value = self.parse_value()?;
            assignments.push(Assignment { column, value });

            if !self.check(&Token::Comma) {
                break;
            }
            self.advance();
        }

        let predicate = self.parse_where_clause()?;

        Ok(Command::Update {
            table,
            assignments,
            predicate,
        })
    }

    // ========== DELETE Statement ==========

    fn parse_delete(&mut self) -> Result<Command> {
        self.statement = "DELETE FROM";
        self.expect(&Token::Delete)?;
        self.expect(&Token::From)?;

        let table = self.expect_identifier()?;
        let predicate = self.parse_where_clause()?;

        Ok(Command::Delete { table, predicate })
    }

    // ========== ALTER TABLE Statement ==========

    fn parse_alter(&mut self) -> Result<Command> {
        self.statement = "ALTER TABLE";
        self.expect(&Token::Alter)?;
        self.expect(&Token::Table)?;

        let table = self.expect_identifier()?;

        let operation = match self.current() {
            Token::Add => {
                self.advance();
                self.expect(&Token::Column)?;
                let name = self.expect_identifier()?;
                let column_type = self.parse_column_type()?;
                AlterOperation::AddColumn { name, column_type }
            }
            Token::Drop => {
                self.advance();
                self.expect(&Token::Column)?;
                let name = self.expect_identifier()?;
                AlterOperation::DropColumn { name }
            }
            Token::Modify => {
                self.advance();
                self.expect(&Token::Column)?;
                let name = self.expect_identifier()?;
                let column_type = self.parse_column_type()?;
                AlterOperation::ModifyColumn { name, column_type }
            }
            other => {
                return Err(self.error(format!(
                    "expected ADD, DROP, or MODIFY, found '{}'",
                    other
                )))
            }
        };

        Ok(Command::Alter { table, operation })
    }

    // ========== DROP TABLE Statement ==========

    fn parse_drop_table(&mut self) -> Result<Command> {
        self.statement = "DROP TABLE";
        self.expect(&Token::Drop)?;
        self.expect(&Token::Table)?;

        let name = self.expect_identifier()?;

        Ok(Command::DropTable { name })
    }

    // ========== Transaction Statements ==========

    fn parse_begin(&mut self) -> Result<Command> {
        self.statement = "BEGIN TRANSACTION";
        self.expect(&Token::Begin)?;
        if self.check(&Token::Transaction) {
            self.advance();
        }
        Ok(Command::Begin)
    }

    fn parse_commit(&mut self) -> Result<Command> {
        self.statement = "COMMIT";
        self.expect(&Token::Commit)?;
        if self.check(&Token::Transaction) {
            self.advance();
        }
        Ok(Command::Commit)
    }

    fn parse_rollback(&mut self) -> Result<Command> {
        self.statement = "ROLLBACK";
        self.expect(&Token::Rollback)?;
        if self.check(&Token::Transaction) {
            self.advance();
        }
        Ok(Command::Rollback)
    }

    // ========== WHERE clause ==========

    fn parse_where_clause(&mut self) -> Result<Option<Predicate>> {
        if !self.check(&Token::Where) {
            return Ok(None);
        }
        self.advance();

        let column = self.expect_identifier()?;

        let op = match self.current() {
            token if token.is_comparison() => token.to_string().parse::<CompareOp>()?,
            other => {
                return Err(self.error(format!(
                    "expected comparison operator, found '{}'",
                    other
                )))
            }
        };
        self.advance();

        let value = self.parse_value()?;

        Ok(Some(Predicate::new(column, op, value)))
    }

    // ========== Helper functions ==========

    fn parse_value(&mut self) -> Result<Value> {
        let value = match self.current().clone() {
            // Bare numbers stay text until coerced against a column
            Token::NumberLiteral(n) => Value::Text(n),
            Token::StringLiteral(s) => Value::Text(s),
            Token::Null => Value::Null,
            other => return Err(self.error(format!("expected value, found '{}'", other))),
        };
        self.advance();
        Ok(value)
    }

    fn parse_value_list(&mut self) -> Result<Vec<Value>> {
        let mut values = Vec::new();

        loop {
            values.push(self.parse_value()?);

            if !self.check(&Token::Comma) {
                break;
            }
            self.advance();
        }

        Ok(values)
    }

    fn parse_identifier_list(&mut self) -> Result<Vec<String>> {
        let mut identifiers = Vec::new();

        loop {
            identifiers.push(self.expect_identifier()?);

            if !self.check(&Token::Comma) {
                break;
            }
            self.advance();
        }

        Ok(identifiers)
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(token)
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::syntax(self.statement, reason)
    }

    fn expect(&mut self, token: &Token) -> Result<()> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!(
                "expected {}, found '{}'",
                token,
                self.current()
            )))
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        match self.current().clone() {
            Token::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(self.error(format!("expected identifier, found '{}'", other))),
        }
    }
}
