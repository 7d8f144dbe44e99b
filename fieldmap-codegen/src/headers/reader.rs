use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use super::{HeaderParse, emit_leaf};
use crate::casing::{camel_case, pascal_case};
use crate::error::{GeneratorError, Result};
use crate::line_builder::LineBuilder;
use crate::schema::FieldSpec;
use crate::types::{self, PackageNameResolver};
use crate::walker::walk_field_groups;

const DEFAULT_NAMESPACE: &str = "gateway";
const HEADER_REF_PREFIX: &str = "headers.";

/// Reads header-bound fields of an endpoint request from `req.Header`
///
/// Fields annotated `<namespace>.http.ref = "headers.<Name>"` are filled into
/// `requestBody`. Required structs on the way are allocated up front, optional
/// ones just before the first header written beneath them.
pub struct EndpointHeaderReader<'a> {
    lines: LineBuilder,
    resolver: &'a dyn PackageNameResolver,
    namespace: String,
}

impl<'a> EndpointHeaderReader<'a> {
    /// Create a reader using the `gateway` annotation namespace
    pub fn new(resolver: &'a dyn PackageNameResolver) -> Self {
        Self {
            lines: LineBuilder::new(),
            resolver,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    /// Read `<namespace>.http.ref` instead of `gateway.http.ref`
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Emit the statements for every header-bound field of `fields`
    ///
    /// Produces no lines when no field is bound to a header.
    pub fn read(&mut self, fields: &[Rc<FieldSpec>]) -> Result<()> {
        let ref_annotation = format!("{}.http.ref", self.namespace);
        let resolver = self.resolver;

        let mut lines = LineBuilder::new();
        let mut failure = None;
        let mut seen_headers = false;
        let mut header_counts: HashMap<String, usize> = HashMap::new();
        let mut optional_structs: BTreeMap<String, String> = BTreeMap::new();

        walk_field_groups(fields, |go_prefix, _, field| {
            let identifier = format!("{go_prefix}.{}", pascal_case(&field.name));

            if field.ty.as_struct().is_some() {
                let type_name = match types::go_type(resolver, field.ty.root()) {
                    Ok(type_name) => type_name,
                    Err(err) => {
                        failure = Some(err);
                        return true;
                    }
                };
                if field.required {
                    lines.appendf(format_args!("if requestBody{identifier} == nil {{"));
                    lines.appendf(format_args!("\trequestBody{identifier} = &{type_name}{{}}"));
                    lines.append(&["}"]);
                } else {
                    optional_structs.insert(identifier, type_name);
                }
                return false;
            }

            let Some(header) = field
                .annotations
                .get(&ref_annotation)
                .and_then(|reference| reference.strip_prefix(HEADER_REF_PREFIX))
            else {
                return false;
            };
            let parse = match HeaderParse::for_type(resolver, &field.ty) {
                Ok(Some(parse)) => parse,
                Ok(None) => {
                    failure = Some(GeneratorError::NonStringHeaderTarget {
                        header: header.to_string(),
                        field: field.name.clone(),
                    });
                    return true;
                }
                Err(err) => {
                    failure = Some(err);
                    return true;
                }
            };

            let camel = camel_case(header);
            let seen = header_counts.entry(camel.clone()).or_insert(0);
            let variable = if *seen > 0 {
                format!("{camel}No{seen}Value")
            } else {
                format!("{camel}Value")
            };
            *seen += 1;
            tracing::trace!(%header, field = %identifier, %variable, "reading endpoint header");

            let target = format!("requestBody{identifier}");
            let indent = if field.required {
                lines.appendf(format_args!(r#"{variable}, _ := req.Header.Get("{header}")"#));
                ""
            } else {
                lines.appendf(format_args!(r#"{variable}, {variable}Exists := req.Header.Get("{header}")"#));
                lines.appendf(format_args!("if {variable}Exists {{"));
                "\t"
            };
            for (parent, type_name) in &optional_structs {
                let below = identifier
                    .strip_prefix(parent.as_str())
                    .is_some_and(|rest| rest.starts_with('.'));
                if below {
                    lines.appendf(format_args!("{indent}if requestBody{parent} == nil {{"));
                    lines.appendf(format_args!("{indent}\trequestBody{parent} = &{type_name}{{}}"));
                    lines.appendf(format_args!("{indent}}}"));
                }
            }
            emit_leaf(&mut lines, indent, &target, &variable, &parse, field.required);
            if !field.required {
                lines.append(&["}"]);
            }

            seen_headers = true;
            false
        });

        if let Some(err) = failure {
            self.lines.clear();
            return Err(err);
        }
        self.lines = if seen_headers { lines } else { LineBuilder::new() };
        Ok(())
    }

    /// Lines emitted by the last successful [`read`](Self::read)
    pub fn lines(&self) -> &[String] {
        self.lines.lines()
    }

    /// Consume the reader, returning its lines
    pub fn into_lines(self) -> Vec<String> {
        self.lines.into()
    }
}
