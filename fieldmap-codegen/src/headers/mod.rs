//! Header-to-field generators
//!
//! The populator and propagator walk a [`FieldMap`](crate::FieldMap) keyed by
//! dotted client request paths whose `qualified_name` is a header name. For
//! every entry they emit a `headers.Get` probe and, inside it, the write into
//! `in.<path>`. The endpoint reader does the inverse lookup, driven by
//! `http.ref` annotations on the endpoint request.

mod populator;
mod propagator;
mod reader;

use std::rc::Rc;

use crate::error::{GeneratorError, Result};
use crate::line_builder::LineBuilder;
use crate::schema::{FieldSpec, TypeSpec};
use crate::types::{self, PackageNameResolver};

pub use populator::HeaderPopulator;
pub use propagator::HeaderPropagator;
pub use reader::EndpointHeaderReader;

/// Resolve a dotted target path against `fields`, case-insensitively
pub(crate) fn find_field(path: &str, fields: &[Rc<FieldSpec>]) -> Result<Rc<FieldSpec>> {
    let missing = || GeneratorError::UnknownTargetPath(path.to_string());
    let mut segments = path.split('.').peekable();
    let mut current = fields;
    while let Some(segment) = segments.next() {
        let field = current
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(segment))
            .ok_or_else(missing)?;
        if segments.peek().is_none() {
            return Ok(Rc::clone(field));
        }
        current = field.ty.as_struct().ok_or_else(missing)?.fields();
    }
    Err(missing())
}

/// Allocate every intermediate struct on `path` that is still nil
///
/// Structs are pointers in the generated Go whatever their presence, so each
/// ancestor gets a guard.
pub(crate) fn init_intermediates(
    lines: &mut LineBuilder,
    resolver: &dyn PackageNameResolver,
    indent: &str,
    path: &str,
    fields: &[Rc<FieldSpec>],
) -> Result<()> {
    let segments: Vec<&str> = path.split('.').collect();
    for depth in 1..segments.len() {
        let prefix = segments[..depth].join(".");
        let field = find_field(&prefix, fields)?;
        let type_name = types::go_custom_type(resolver, field.ty.root())?;
        lines.appendf(format_args!("{indent}if in.{prefix} == nil {{"));
        lines.appendf(format_args!("{indent}\tin.{prefix} = &{type_name}{{}}"));
        lines.appendf(format_args!("{indent}}}"));
    }
    Ok(())
}

/// How a header string becomes the target's Go value
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HeaderParse {
    /// Plain `string`
    Raw,
    /// String-rooted named type, converted with `T(value)`
    Cast(String),
    /// `strconv` parse into a numeric or boolean type
    Parse(ParseKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseKind {
    Bool,
    Int(u8),
    Float,
}

impl HeaderParse {
    /// Parse step for a header-bound field of type `ty`
    ///
    /// Returns `None` for types a header cannot hold.
    ///
    /// # Panics
    ///
    /// Panics on byte-sized integers.
    pub(crate) fn for_type(resolver: &dyn PackageNameResolver, ty: &TypeSpec) -> Result<Option<Self>> {
        Ok(Some(match ty {
            TypeSpec::String => HeaderParse::Raw,
            TypeSpec::Bool => HeaderParse::Parse(ParseKind::Bool),
            TypeSpec::I16 => HeaderParse::Parse(ParseKind::Int(16)),
            TypeSpec::I32 => HeaderParse::Parse(ParseKind::Int(32)),
            TypeSpec::I64 => HeaderParse::Parse(ParseKind::Int(64)),
            TypeSpec::Double => HeaderParse::Parse(ParseKind::Float),
            TypeSpec::I8 => panic!("i8 header fields are not supported"),
            TypeSpec::Enum(_) => HeaderParse::Cast(types::go_type(resolver, ty)?),
            TypeSpec::Typedef(_) if matches!(ty.root(), TypeSpec::String) => {
                HeaderParse::Cast(types::go_type(resolver, ty)?)
            }
            _ => return Ok(None),
        }))
    }
}

/// Emit the write of header value `value` into `target`
///
/// Parse failures skip the write.
pub(crate) fn emit_leaf(
    lines: &mut LineBuilder,
    indent: &str,
    target: &str,
    value: &str,
    parse: &HeaderParse,
    required: bool,
) {
    let reference = if required { "" } else { "&" };
    match parse {
        HeaderParse::Raw => lines.appendf(format_args!("{indent}{target} = {reference}{value}")),
        HeaderParse::Cast(type_name) if required => {
            lines.appendf(format_args!("{indent}{target} = {type_name}({value})"))
        }
        HeaderParse::Cast(type_name) => {
            lines.appendf(format_args!("{indent}val := {type_name}({value})"));
            lines.appendf(format_args!("{indent}{target} = &val"));
        }
        HeaderParse::Parse(kind) => {
            let call = match kind {
                ParseKind::Bool => format!("strconv.ParseBool({value})"),
                ParseKind::Int(bits) => format!("strconv.ParseInt({value}, 10, {bits})"),
                ParseKind::Float => format!("strconv.ParseFloat({value}, 64)"),
            };
            lines.appendf(format_args!("{indent}if v, err := {call}; err == nil {{"));
            match kind {
                ParseKind::Int(bits) if *bits < 64 => {
                    lines.appendf(format_args!("{indent}\tval := int{bits}(v)"));
                    lines.appendf(format_args!("{indent}\t{target} = {reference}val"));
                }
                _ => lines.appendf(format_args!("{indent}\t{target} = {reference}v")),
            }
            lines.appendf(format_args!("{indent}}}"));
        }
    }
}
