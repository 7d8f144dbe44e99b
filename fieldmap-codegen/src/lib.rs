//! fieldmap-codegen
//!
//! Generates Go statements for gateway scaffolding. Three generators share one
//! line-oriented output model:
//!
//! - [`TypeConverter`] copies and transforms fields from one IDL record into
//!   another, honouring a field map of renames and overrides.
//! - [`HeaderPopulator`] and [`HeaderPropagator`] lift values out of an HTTP
//!   header bag into fields of a client request.
//! - [`EndpointHeaderReader`] reads header-bound fields of an endpoint request
//!   out of the incoming `req.Header`.
//!
//! The emitted lines carry no trailing newline and use one tab per nesting
//! level; callers splice them into a surrounding Go function body.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ schema model │───▶│  generators  │───▶│ LineBuilder  │
//! │  + FieldMap  │    │ (walk, cast) │    │  Vec<String> │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod casing;
pub mod converter;
pub mod error;
pub mod headers;
pub mod line_builder;
pub mod schema;
pub mod types;
pub mod walker;

#[cfg(test)]
mod test_support;

pub use converter::{FieldMap, FieldMapperEntry, TypeConverter};
pub use error::{GeneratorError, Result};
pub use headers::{EndpointHeaderReader, HeaderPopulator, HeaderPropagator};
pub use line_builder::LineBuilder;
pub use schema::{Annotations, EnumSpec, FieldGroup, FieldSpec, SetHint, StructSpec, TypeSpec, TypedefSpec};
pub use types::{PackageNameResolver, ResolveError};
