//! # gqlmerge-core
//!
//! Schema model and merge rules for combining GraphQL SDL documents.
//!
//! This crate provides:
//! - The type-system AST (`Definition` and its parts) with validated names
//! - A `DefinitionIndex` grouping definitions from many documents by identity
//! - The `resolve` fold that reduces each group to one definition, collecting
//!   every `MergeConflict` it finds along the way
//!
//! Parsing and printing live in `gqlmerge-sdl`.
//!
//! # Example
//!
//! ```
//! use gqlmerge_core::{resolve, Definition, DefinitionIndex, MergeOptions, Name, ObjectType};
//!
//! let user = |n: &str| Definition::Object(ObjectType::new(Name::new(n).unwrap()));
//! let index = DefinitionIndex::from_documents([
//!     ("a.graphql", vec![user("User")]),
//!     ("b.graphql", vec![user("User"), user("Post")]),
//! ]);
//!
//! let merged = resolve(&index, &MergeOptions::default()).expect("no conflicts");
//! assert_eq!(merged.len(), 2);
//! ```

pub mod error;
pub mod index;
pub mod resolver;
pub mod types;

pub use error::{MergeConflict, NameError};
pub use index::{Contribution, DefinitionIndex, Origin};
pub use resolver::{resolve, MergeOptions, MergedDefinition, MergedSchema};
pub use types::*;
