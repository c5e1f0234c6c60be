//! # gqlmerge-sdl
//!
//! SDL parser, printer and merge entry point for gqlmerge.
//!
//! This crate provides:
//! - A lexer that tokenizes GraphQL SDL, keeping `#` comments for descriptions
//! - A recursive descent parser for type-system definitions and extensions
//! - A printer that renders definitions back to canonical SDL
//! - `merge`, which parses many documents, resolves them with
//!   `gqlmerge-core`, and prints the merged schema
//!
//! # Example
//!
//! ```
//! use gqlmerge_sdl::{parse, print_all};
//!
//! let source = r#"
//! "A person"
//! type User implements Node {
//!     id: ID!
//!     name: String @deprecated
//! }
//! "#;
//!
//! let definitions = parse(source).expect("parse failed");
//! assert_eq!(definitions.len(), 1);
//!
//! let sdl = print_all(&definitions);
//! assert!(sdl.starts_with("\"A person\"\ntype User implements Node {"));
//! ```

pub mod error;
mod lexer;
pub mod merge;
pub mod parser;
pub mod printer;
mod strings;
pub mod token;

pub use error::{SdlError, Span};
pub use merge::{merge, MergeError, Merger, ParseError};
pub use parser::parse;
pub use printer::{print, print_all, print_with, PrintOptions};
