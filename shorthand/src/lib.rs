#![deny(missing_docs)]
//! # fanout-shorthand
//!
//! Compiles terse field declarations into JSON Schema fragments and
//! extraction paths.
//!
//! A declaration is a single line naming the one field a generated object
//! should carry:
//!
//! ```
//! use fanout_shorthand::{parse, FieldKind};
//!
//! let decl = parse("age: int")?;
//! assert_eq!(decl.name, "age");
//! assert_eq!(decl.kind, FieldKind::Int);
//! assert_eq!(decl.extract_path(), "age");
//!
//! let schema = decl.schema();
//! assert_eq!(schema["properties"]["age"]["type"], "integer");
//! # Ok::<(), fanout_shorthand::ShorthandError>(())
//! ```
//!
//! Three forms are recognized, in precedence order: an enum declaration
//! (`status: [active, pending]`), a typed scalar (`age: int`), and a bare
//! identifier (`summary`, an implicit string). Anything else is rejected
//! whole; there are no partial results. Compilation is deterministic and
//! performs no I/O.

/// Field declarations and schema generation.
pub mod decl;
/// Error type for declaration parsing.
pub mod error;
/// The declaration parser.
pub mod parse;

pub use decl::{FieldDeclaration, FieldKind};
pub use error::ShorthandError;
pub use parse::parse;
