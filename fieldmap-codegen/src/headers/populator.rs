use std::rc::Rc;

use super::{HeaderParse, find_field, init_intermediates};
use crate::converter::FieldMap;
use crate::error::{GeneratorError, Result};
use crate::line_builder::LineBuilder;
use crate::schema::{FieldSpec, TypeSpec};
use crate::types::PackageNameResolver;

/// Copies endpoint request headers into string fields of a client request
///
/// A non-override entry only fills a field that is still unset.
pub struct HeaderPopulator<'a> {
    lines: LineBuilder,
    resolver: &'a dyn PackageNameResolver,
}

impl<'a> HeaderPopulator<'a> {
    /// Create a populator resolving Go packages through `resolver`
    pub fn new(resolver: &'a dyn PackageNameResolver) -> Self {
        Self {
            lines: LineBuilder::new(),
            resolver,
        }
    }

    /// Emit one header probe per entry of `field_map`, in key order
    ///
    /// `header_names` are the headers the endpoint declares; mapping an
    /// undeclared one is allowed. On error the emitted lines are discarded.
    pub fn populate(&mut self, header_names: &[String], to_fields: &[Rc<FieldSpec>], field_map: &FieldMap) -> Result<()> {
        self.lines.clear();
        let result = self.populate_entries(header_names, to_fields, field_map);
        if result.is_err() {
            self.lines.clear();
        }
        result
    }

    /// Lines emitted by the last successful [`populate`](Self::populate)
    pub fn lines(&self) -> &[String] {
        self.lines.lines()
    }

    /// Consume the populator, returning its lines
    pub fn into_lines(self) -> Vec<String> {
        self.lines.into()
    }

    fn populate_entries(
        &mut self,
        header_names: &[String],
        to_fields: &[Rc<FieldSpec>],
        field_map: &FieldMap,
    ) -> Result<()> {
        for (path, entry) in field_map {
            let header = &entry.qualified_name;
            if !header_names.iter().any(|name| name.eq_ignore_ascii_case(header)) {
                tracing::debug!(%header, target = %path, "populating from undeclared header");
            }

            let field = find_field(path, to_fields)?;
            let parse = match &field.ty {
                TypeSpec::String => HeaderParse::Raw,
                TypeSpec::Typedef(_) if matches!(field.ty.root(), TypeSpec::String) => {
                    HeaderParse::for_type(self.resolver, &field.ty)?.unwrap_or(HeaderParse::Raw)
                }
                _ => {
                    return Err(GeneratorError::NonStringHeaderTarget {
                        header: header.clone(),
                        field: field.name.clone(),
                    });
                }
            };
            tracing::trace!(%header, target = %path, "emitting header population");

            self.lines.appendf(format_args!(r#"if key, ok := headers.Get("{header}"); ok {{"#));
            init_intermediates(&mut self.lines, self.resolver, "\t", path, to_fields)?;
            let target = format!("in.{path}");
            if entry.overrides {
                super::emit_leaf(&mut self.lines, "\t", &target, "key", &parse, field.required);
            } else {
                if field.required {
                    self.lines.appendf(format_args!("\tif {target} != \"\" {{"));
                } else {
                    self.lines.appendf(format_args!("\tif {target} == nil {{"));
                }
                super::emit_leaf(&mut self.lines, "\t\t", &target, "key", &parse, field.required);
                self.lines.append(&["\t}"]);
            }
            self.lines.append(&["}"]);
        }
        Ok(())
    }
}
