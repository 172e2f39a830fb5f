//! ZQLZ String Query - Templated query parsing
//!
//! Parses query templates written for a repository layer into the plain form
//! a query executor accepts, together with the parameter bindings the
//! executor has to supply:
//!
//! - Named and positional markers: `:name`, `?1`
//! - `LIKE` wildcards around markers: `like %:name%` binds `name` as a
//!   "contains" pattern and removes the `%` from the query
//! - `IN` collections: `in :ids`, `in (:ids)`
//! - Embedded expressions: `:#{#expr}` and `?#{#expr}` are replaced by
//!   synthetic parameters whose values the caller evaluates
//!
//! # Example
//!
//! ```
//! use zqlz_string_query::{BindingKind, LikeMode, ParsedQuery};
//!
//! let query = ParsedQuery::parse(
//!     "select u from User u where u.firstname like %?1% and u.id in ?2",
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     query.query_string(),
//!     "select u from User u where u.firstname like ?1 and u.id in ?2"
//! );
//! assert_eq!(query.parameter_bindings()[0].kind, BindingKind::like(LikeMode::Contains));
//! assert_eq!(query.parameter_bindings()[1].kind, BindingKind::InCollection);
//! assert_eq!(query.alias(), Some("u"));
//! ```

mod binding;
mod detect;
mod error;
mod extractor;
mod namer;
mod options;
mod query;
mod resolver;
mod rewriter;
mod scanner;

pub use binding::{BindingKind, LikeMode, ParameterBinding, ParameterIdentifier};
pub use error::{StringQueryError, StringQueryResult};
pub use options::{DEFAULT_SYNTHETIC_PREFIX, StringQueryOptions};
pub use query::{ParsedQuery, parse};
