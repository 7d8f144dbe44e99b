use std::rc::Rc;

use super::{HeaderParse, emit_leaf, find_field, init_intermediates};
use crate::converter::FieldMap;
use crate::error::{GeneratorError, Result};
use crate::line_builder::LineBuilder;
use crate::schema::{FieldSpec, TypeSpec};
use crate::types::PackageNameResolver;

/// Propagates headers into typed client request fields
///
/// Like [`HeaderPopulator`](super::HeaderPopulator), but numeric and boolean
/// targets are parsed from the header with `strconv`. A header that fails to
/// parse leaves the field untouched.
pub struct HeaderPropagator<'a> {
    lines: LineBuilder,
    resolver: &'a dyn PackageNameResolver,
}

impl<'a> HeaderPropagator<'a> {
    /// Create a propagator resolving Go packages through `resolver`
    pub fn new(resolver: &'a dyn PackageNameResolver) -> Self {
        Self {
            lines: LineBuilder::new(),
            resolver,
        }
    }

    /// Emit one header probe per entry of `field_map`, in key order
    ///
    /// # Panics
    ///
    /// Panics when a mapped target is an `i8`.
    pub fn propagate(&mut self, header_names: &[String], to_fields: &[Rc<FieldSpec>], field_map: &FieldMap) -> Result<()> {
        self.lines.clear();
        let result = self.propagate_entries(header_names, to_fields, field_map);
        if result.is_err() {
            self.lines.clear();
        }
        result
    }

    /// Lines emitted by the last successful [`propagate`](Self::propagate)
    pub fn lines(&self) -> &[String] {
        self.lines.lines()
    }

    /// Consume the propagator, returning its lines
    pub fn into_lines(self) -> Vec<String> {
        self.lines.into()
    }

    fn propagate_entries(
        &mut self,
        header_names: &[String],
        to_fields: &[Rc<FieldSpec>],
        field_map: &FieldMap,
    ) -> Result<()> {
        tracing::debug!(headers = header_names.len(), entries = field_map.len(), "propagating headers");
        for (path, entry) in field_map {
            let header = &entry.qualified_name;
            let field = find_field(path, to_fields)?;
            let Some(parse) = HeaderParse::for_type(self.resolver, &field.ty)? else {
                return Err(GeneratorError::NonStringHeaderTarget {
                    header: header.clone(),
                    field: field.name.clone(),
                });
            };
            tracing::trace!(%header, target = %path, ?parse, "emitting header propagation");

            self.lines.appendf(format_args!(r#"if key, ok := headers.Get("{header}"); ok {{"#));
            init_intermediates(&mut self.lines, self.resolver, "\t", path, to_fields)?;

            let target = format!("in.{path}");
            // Only string-rooted and optional targets have an "unset" value to test.
            let guard = if entry.overrides {
                None
            } else if !field.required {
                Some(format!("\tif {target} == nil {{"))
            } else if matches!(field.ty.root(), TypeSpec::String) {
                Some(format!("\tif {target} != \"\" {{"))
            } else {
                None
            };
            match guard {
                Some(guard) => {
                    self.lines.push(guard);
                    emit_leaf(&mut self.lines, "\t\t", &target, "key", &parse, field.required);
                    self.lines.append(&["\t}"]);
                }
                None => emit_leaf(&mut self.lines, "\t", &target, "key", &parse, field.required),
            }
            self.lines.append(&["}"]);
        }
        Ok(())
    }
}
