/// Typed MT940 message tree.
pub mod ast;
/// Typed captures for dates and comma-decimal amounts.
pub mod capture;
/// Lexical categories of MT9x fields.
pub mod charset;
/// JSON serialization helpers for the message tree.
pub mod dump;
/// Generic declarative grammar engine with bounded lookahead.
pub mod engine;
/// Stateful, stack-based lexer.
pub mod lexer;
/// The MT940 grammar and tree builder.
pub mod mt940;
/// Message parser entry points.
pub mod parser;
/// Human-readable message summary.
pub mod summary;
