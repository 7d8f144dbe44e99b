//! Struct fields, cycle detection and recursive conversion helpers

use std::collections::HashSet;
use std::rc::Rc;

use super::{Cursor, FieldMap, Source, TypeConverter};
use crate::casing::pascal_case;
use crate::error::{GeneratorError, Result};
use crate::schema::{FieldSpec, StructSpec, TypeSpec};
use crate::types;

/// Identity of a (target, source) struct pair
pub(super) type HelperKey = (*const StructSpec, *const StructSpec);

/// Whether any struct reachable from `fields` can reach itself
pub(super) fn has_cycle(fields: &[Rc<FieldSpec>]) -> bool {
    let mut seen = HashSet::new();
    fields.iter().any(|field| reaches_cycle(&field.ty, &mut seen))
}

fn reaches_cycle(ty: &TypeSpec, seen: &mut HashSet<*const StructSpec>) -> bool {
    match ty.root() {
        TypeSpec::Struct(spec) => {
            if !seen.insert(Rc::as_ptr(spec)) {
                return false;
            }
            is_cyclic(spec) || spec.fields().iter().any(|field| reaches_cycle(&field.ty, seen))
        }
        TypeSpec::List(elem) | TypeSpec::Set(elem, _) => reaches_cycle(elem, seen),
        TypeSpec::Map(key, value) => reaches_cycle(key, seen) || reaches_cycle(value, seen),
        _ => false,
    }
}

/// Whether `spec` is reachable from its own fields
pub(super) fn is_cyclic(spec: &Rc<StructSpec>) -> bool {
    let target = Rc::as_ptr(spec);
    let mut visited = HashSet::new();
    spec.fields()
        .iter()
        .any(|field| reaches(target, &field.ty, &mut visited))
}

fn reaches(target: *const StructSpec, ty: &TypeSpec, visited: &mut HashSet<*const StructSpec>) -> bool {
    match ty.root() {
        TypeSpec::Struct(spec) => {
            let ptr = Rc::as_ptr(spec);
            if ptr == target {
                return true;
            }
            visited.insert(ptr) && spec.fields().iter().any(|field| reaches(target, &field.ty, visited))
        }
        TypeSpec::List(elem) | TypeSpec::Set(elem, _) => reaches(target, elem, visited),
        TypeSpec::Map(key, value) => reaches(target, key, visited) || reaches(target, value, visited),
        _ => false,
    }
}

impl TypeConverter<'_> {
    /// Struct conversions go through a helper when either side is recursive
    pub(super) fn needs_helper(&self, to_struct: &Rc<StructSpec>, from_struct: &Rc<StructSpec>) -> bool {
        self.use_recur_gen && (is_cyclic(to_struct) || is_cyclic(from_struct))
    }

    pub(super) fn gen_struct_field(
        &mut self,
        cur: &Cursor,
        to_field: &FieldSpec,
        to_struct: &Rc<StructSpec>,
        to_sub: &str,
        source: &Source,
        field_map: &FieldMap,
    ) -> Result<()> {
        let Some(from_struct) = source.field.ty.as_struct() else {
            return Err(GeneratorError::IncompatibleType {
                field: to_field.name.clone(),
                expected: "struct",
            });
        };

        if self.needs_helper(to_struct, from_struct) {
            let helper = self.struct_helper(cur, to_struct, from_struct, to_sub, field_map)?;
            let to_identifier = format!("out.{to_sub}");
            self.emit_parent_guards(&cur.indent, &to_identifier, &cur.helper_scopes);
            self.lines.appendf(format_args!(
                "{}{to_identifier} = {helper}({})",
                cur.indent, source.identifier
            ));
            return Ok(());
        }

        let type_name = types::go_type(self.resolver, &to_field.ty)?;
        let child_from_prefix = format!("{}.", source.identifier);
        self.gen_struct_body(cur, to_struct, from_struct, &type_name, &source.identifier, to_sub, &child_from_prefix, field_map)
    }

    /// Target struct with no direct source whose descendants are mapped
    pub(super) fn gen_struct_from_mappings(
        &mut self,
        cur: &Cursor,
        to_field: &FieldSpec,
        to_struct: &Rc<StructSpec>,
        to_sub: &str,
        field_map: &FieldMap,
    ) -> Result<()> {
        let type_name = types::go_type(self.resolver, &to_field.ty)?;
        if to_field.required {
            let to_identifier = format!("out.{to_sub}");
            self.emit_parent_guards(&cur.indent, &to_identifier, &cur.helper_scopes);
            self.lines.appendf(format_args!("{}{to_identifier} = &{type_name}{{}}", cur.indent));
        } else {
            self.deferred.insert(cur.complete_identifier(to_sub), type_name);
        }

        let child = cur.nested(format!("{to_sub}."), cur.from_prefix.clone());
        self.gen_struct_fields(&child, None, to_struct.fields(), field_map)
    }

    /// `if src != nil { out.X = &T{}; ...fields... } else { out.X = nil }`
    ///
    /// The `else` branch is left out when `out.X` has deferred ancestors,
    /// which may still be nil at that point.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn gen_struct_body(
        &mut self,
        cur: &Cursor,
        to_struct: &Rc<StructSpec>,
        from_struct: &Rc<StructSpec>,
        type_name: &str,
        nil_subject: &str,
        to_sub: &str,
        child_from_prefix: &str,
        field_map: &FieldMap,
    ) -> Result<()> {
        let to_identifier = format!("out.{to_sub}");
        let inner = cur.indented();
        let guards = self.deferred.guards(&inner.indent, &to_identifier, &cur.helper_scopes);
        let detached = guards.is_empty();

        let mark = self.helpers.len();
        self.lines.appendf(format_args!("{}if {nil_subject} != nil {{", cur.indent));
        self.lines.extend(guards);
        self.lines.appendf(format_args!("{}{to_identifier} = &{type_name}{{}}", inner.indent));
        let child = inner.nested(format!("{to_sub}."), child_from_prefix.to_string());
        self.gen_struct_fields(&child, Some(from_struct.fields()), to_struct.fields(), field_map)?;
        self.helpers.truncate(mark);
        if detached {
            self.lines.appendf(format_args!("{}}} else {{", cur.indent));
            self.lines.appendf(format_args!("{}{to_identifier} = nil", inner.indent));
        }
        self.lines.appendf(format_args!("{}}}", cur.indent));
        Ok(())
    }

    /// Name of the helper converting `from_struct` into `to_struct`, emitting it if needed
    ///
    /// The helper is visible for the rest of the enclosing Go block; helpers
    /// defined inside another helper's body stay local to that body.
    pub(super) fn struct_helper(
        &mut self,
        cur: &Cursor,
        to_struct: &Rc<StructSpec>,
        from_struct: &Rc<StructSpec>,
        to_sub: &str,
        field_map: &FieldMap,
    ) -> Result<String> {
        let key: HelperKey = (Rc::as_ptr(to_struct), Rc::as_ptr(from_struct));
        if let Some((_, name)) = self.helpers.iter().rev().find(|(existing, _)| *existing == key) {
            return Ok(name.clone());
        }

        let to_type = types::go_type(self.resolver, &TypeSpec::structure(to_struct))?;
        let from_type = types::go_type(self.resolver, &TypeSpec::structure(from_struct))?;
        let name = self.unique_identifier(&format!("convert{}Helper", pascal_case(&to_struct.name)));
        tracing::trace!(helper = %name, to = %to_struct.name, from = %from_struct.name, "emitting conversion helper");
        self.helpers.push((key, name.clone()));
        let mark = self.helpers.len();

        let indent = &cur.indent;
        let signature = format!("func(in *{from_type}) (out *{to_type})");
        self.lines.appendf(format_args!("{indent}var {name} {signature}"));
        self.lines.appendf(format_args!("{indent}{name} = {signature} {{"));
        self.lines.appendf(format_args!("{indent}\tif in != nil {{"));
        self.lines.appendf(format_args!("{indent}\t\tout = &{to_type}{{}}"));

        let mut helper_scopes = cur.helper_scopes.clone();
        helper_scopes.push(to_sub.to_string());
        let body = Cursor {
            key_prefix: String::new(),
            from_prefix: "in.".to_string(),
            indent: format!("{indent}\t\t"),
            helper_scopes,
        };
        self.gen_struct_fields(&body, Some(from_struct.fields()), to_struct.fields(), field_map)?;
        self.helpers.truncate(mark);

        self.lines.appendf(format_args!("{indent}\t}} else {{"));
        self.lines.appendf(format_args!("{indent}\t\tout = nil"));
        self.lines.appendf(format_args!("{indent}\t}}"));
        self.lines.appendf(format_args!("{indent}\treturn"));
        self.lines.appendf(format_args!("{indent}}}"));
        Ok(name)
    }
}
