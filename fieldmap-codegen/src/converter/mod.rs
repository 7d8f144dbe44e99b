//! Struct-to-struct field conversion
//!
//! [`TypeConverter`] walks the target fields in declaration order and, for
//! each one, emits the Go statements that fill `out.<Field>` from `in`.
//!
//! A target field's value comes from a same-named source field, from a
//! [`FieldMap`] entry keyed by its dotted target path, or from both:
//!
//! | direct | mapped | override | primary | fallback                   |
//! |--------|--------|----------|---------|----------------------------|
//! | yes    | no     | -        | direct  | -                          |
//! | no     | yes    | -        | mapped  | -                          |
//! | yes    | yes    | true     | mapped  | direct, if mapped optional |
//! | yes    | yes    | false    | direct  | mapped, if direct optional |
//!
//! The fallback assignment is emitted first; the primary follows behind a
//! nil check so it wins whenever its source is set.
//!
//! Optional target structs that only receive mapped descendants are allocated
//! lazily: the first write beneath them emits an `if parent == nil` block.
//! Schemas with recursive structs are converted through local helper
//! functions so the emitted code stays finite.

mod assignment;
mod containers;
mod structs;

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::casing::pascal_case;
use crate::error::{GeneratorError, Result};
use crate::line_builder::LineBuilder;
use crate::schema::{FieldSpec, TypeSpec};
use crate::types::{self, PackageNameResolver};

use assignment::{Cast, DeferredParents, FieldAssignment};
use containers::{MapTarget, Operand, SetTarget};
use structs::HelperKey;

/// Field map keyed by dotted target path (`"NestedTwo.Two"`)
pub type FieldMap = BTreeMap<String, FieldMapperEntry>;

/// One field map entry
#[derive(Debug, Clone, Default)]
pub struct FieldMapperEntry {
    /// Dotted source path, e.g. `"Three.One"`
    pub qualified_name: String,
    /// Whether the entry supersedes a same-named source field
    pub overrides: bool,
    /// Source field the path resolves to, filled in by the converter
    pub field: Option<Rc<FieldSpec>>,
}

impl FieldMapperEntry {
    /// Create an unresolved entry
    pub fn new(qualified_name: impl Into<String>, overrides: bool) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            overrides,
            field: None,
        }
    }
}

/// Position of the walk in the target and source records
#[derive(Debug, Clone, Default)]
struct Cursor {
    /// Target path below the current `out`, with a trailing dot (`"Three."`)
    key_prefix: String,
    /// Source identifier prefix, with a trailing dot (`"in.Three."`)
    from_prefix: String,
    indent: String,
    /// Target sub-paths of the helper functions enclosing this point
    helper_scopes: Vec<String>,
}

impl Cursor {
    fn root() -> Self {
        Self {
            from_prefix: "in.".to_string(),
            ..Self::default()
        }
    }

    /// Dotted path of `sub` from the top-level target record
    fn target_path(&self, sub: &str) -> String {
        let mut parts: Vec<&str> = self.helper_scopes.iter().map(String::as_str).collect();
        parts.push(sub);
        parts.join(".")
    }

    /// `out.`-rooted identifier of `sub` as seen from the top-level record
    fn complete_identifier(&self, sub: &str) -> String {
        format!("out.{}", self.target_path(sub))
    }

    fn nested(&self, key_prefix: String, from_prefix: String) -> Self {
        Self {
            key_prefix,
            from_prefix,
            indent: self.indent.clone(),
            helper_scopes: self.helper_scopes.clone(),
        }
    }

    fn indented(&self) -> Self {
        Self {
            indent: format!("{}\t", self.indent),
            ..self.clone()
        }
    }
}

/// The Go expression a target field is read from
#[derive(Debug, Clone)]
struct Source {
    field: Rc<FieldSpec>,
    identifier: String,
}

/// Generates Go statements converting one record into another
///
/// ```text
/// let mut converter = TypeConverter::new(&resolver);
/// converter.generate(&from_fields, &to_fields, &field_map)?;
/// let body = converter.into_lines();
/// ```
pub struct TypeConverter<'a> {
    lines: LineBuilder,
    resolver: &'a dyn PackageNameResolver,
    deferred: DeferredParents,
    field_counter: usize,
    /// Helpers visible at the current emission point, innermost last
    helpers: Vec<(HelperKey, String)>,
    use_recur_gen: bool,
    optional_entries: FieldMap,
}

impl<'a> TypeConverter<'a> {
    /// Create a converter resolving Go packages through `resolver`
    pub fn new(resolver: &'a dyn PackageNameResolver) -> Self {
        Self {
            lines: LineBuilder::new(),
            resolver,
            deferred: DeferredParents::default(),
            field_counter: 0,
            helpers: Vec::new(),
            use_recur_gen: false,
            optional_entries: FieldMap::new(),
        }
    }

    /// Target paths that may stay unset even when required
    pub fn with_optional_entries(mut self, entries: FieldMap) -> Self {
        self.optional_entries = entries;
        self
    }

    /// Emit the statements filling `to_fields` (as `out`) from `from_fields` (as `in`)
    ///
    /// On error the lines emitted so far are discarded.
    pub fn generate(
        &mut self,
        from_fields: &[Rc<FieldSpec>],
        to_fields: &[Rc<FieldSpec>],
        field_map: &FieldMap,
    ) -> Result<()> {
        self.lines.clear();
        self.deferred.clear();
        self.helpers.clear();
        self.field_counter = 0;

        let result = self.generate_fields(from_fields, to_fields, field_map);
        if result.is_err() {
            self.lines.clear();
        }
        result
    }

    /// Lines emitted by the last successful [`generate`](Self::generate)
    pub fn lines(&self) -> &[String] {
        self.lines.lines()
    }

    /// Consume the converter, returning its lines
    pub fn into_lines(self) -> Vec<String> {
        self.lines.into()
    }

    fn generate_fields(
        &mut self,
        from_fields: &[Rc<FieldSpec>],
        to_fields: &[Rc<FieldSpec>],
        field_map: &FieldMap,
    ) -> Result<()> {
        let field_map = resolve_field_map(field_map, from_fields)?;
        self.use_recur_gen = structs::has_cycle(from_fields) || structs::has_cycle(to_fields);
        tracing::debug!(
            from = from_fields.len(),
            to = to_fields.len(),
            mappings = field_map.len(),
            recursive = self.use_recur_gen,
            "generating struct converter"
        );

        if self.use_recur_gen && !field_map.is_empty() {
            self.lines.append(&["inOriginal := in; _ = inOriginal"]);
            self.lines.append(&["outOriginal := out; _ = outOriginal"]);
        }
        self.gen_struct_fields(&Cursor::root(), Some(from_fields), to_fields, &field_map)
    }

    fn gen_struct_fields(
        &mut self,
        cur: &Cursor,
        from_fields: Option<&[Rc<FieldSpec>]>,
        to_fields: &[Rc<FieldSpec>],
        field_map: &FieldMap,
    ) -> Result<()> {
        for to_field in to_fields {
            let to_sub = format!("{}{}", cur.key_prefix, pascal_case(&to_field.name));
            let target_path = cur.target_path(&to_sub);

            let direct = from_fields
                .and_then(|fields| fields.iter().find(|f| f.name.eq_ignore_ascii_case(&to_field.name)))
                .map(|field| Source {
                    field: Rc::clone(field),
                    identifier: format!("{}{}", cur.from_prefix, pascal_case(&field.name)),
                });
            let (primary, fallback) = self.arbitrate(direct, field_map.get(&target_path));

            match primary {
                Some(primary) => self.gen_field(cur, to_field, &to_sub, &primary, fallback.as_ref(), field_map)?,
                None => self.gen_unsourced(cur, to_field, &to_sub, &target_path, field_map)?,
            }
        }
        Ok(())
    }

    /// Pick the primary source and optional fallback for a target field
    fn arbitrate(&self, direct: Option<Source>, entry: Option<&FieldMapperEntry>) -> (Option<Source>, Option<Source>) {
        let Some((entry, field)) = entry.and_then(|entry| entry.field.clone().map(|field| (entry, field))) else {
            return (direct, None);
        };
        let mapped = Source {
            field,
            identifier: format!("{}.{}", self.source_root(), entry.qualified_name),
        };

        match direct {
            None => (Some(mapped), None),
            Some(direct) if entry.overrides => {
                let fallback = (!mapped.field.required).then_some(direct);
                (Some(mapped), fallback)
            }
            Some(direct) => {
                let fallback = (!direct.field.required).then_some(mapped);
                (Some(direct), fallback)
            }
        }
    }

    /// Root name of mapped sources; helpers shadow `in`
    fn source_root(&self) -> &'static str {
        if self.use_recur_gen { "inOriginal" } else { "in" }
    }

    fn gen_unsourced(
        &mut self,
        cur: &Cursor,
        to_field: &FieldSpec,
        to_sub: &str,
        target_path: &str,
        field_map: &FieldMap,
    ) -> Result<()> {
        if let Some(to_struct) = to_field.ty.as_struct() {
            let descendant = format!("{target_path}.");
            if field_map.keys().any(|key| key.starts_with(&descendant)) {
                return self.gen_struct_from_mappings(cur, to_field, to_struct, to_sub, field_map);
            }
        }
        if to_field.required && !self.is_optional_entry(target_path) {
            return Err(GeneratorError::MissingRequiredTarget(to_field.name.clone()));
        }
        tracing::trace!(field = %target_path, "no source for optional target, skipping");
        Ok(())
    }

    fn is_optional_entry(&self, target_path: &str) -> bool {
        self.optional_entries.keys().any(|key| {
            target_path == key
                || target_path
                    .strip_prefix(key.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    fn gen_field(
        &mut self,
        cur: &Cursor,
        to_field: &FieldSpec,
        to_sub: &str,
        primary: &Source,
        fallback: Option<&Source>,
        field_map: &FieldMap,
    ) -> Result<()> {
        let to_identifier = format!("out.{to_sub}");
        match to_field.ty.root() {
            TypeSpec::Bool
            | TypeSpec::I8
            | TypeSpec::I16
            | TypeSpec::I32
            | TypeSpec::I64
            | TypeSpec::Double
            | TypeSpec::String
            | TypeSpec::Enum(_) => {
                let type_name = types::go_type(self.resolver, &to_field.ty)?;
                self.gen_assignment(cur, to_field, &to_identifier, primary, fallback, |from, to| {
                    Cast::for_presence(&type_name, from.required, to.required)
                });
                Ok(())
            }
            TypeSpec::Binary => {
                let type_name = types::go_type(self.resolver, &to_field.ty)?;
                self.gen_assignment(cur, to_field, &to_identifier, primary, fallback, |_, _| {
                    Cast::Slice(type_name.clone())
                });
                Ok(())
            }
            TypeSpec::Struct(to_struct) => self.gen_struct_field(cur, to_field, to_struct, to_sub, primary, field_map),
            TypeSpec::List(to_elem) => {
                let fallback = fallback.map(Operand::from);
                self.gen_list(cur, &to_field.name, to_elem, to_sub, &Operand::from(primary), fallback.as_ref(), field_map)
            }
            TypeSpec::Set(to_elem, hint) => {
                let fallback = fallback.map(Operand::from);
                let target = SetTarget { elem: to_elem, hint: *hint };
                self.gen_set(cur, &to_field.name, target, to_sub, &Operand::from(primary), fallback.as_ref(), field_map)
            }
            TypeSpec::Map(to_key, to_value) => {
                let fallback = fallback.map(Operand::from);
                let target = MapTarget { key: to_key, value: to_value };
                self.gen_map(cur, &to_field.name, target, to_sub, &Operand::from(primary), fallback.as_ref(), field_map)
            }
            TypeSpec::Typedef(_) => unreachable!("root() strips typedefs"),
        }
    }

    /// Emit the fallback assignment, if any, then the primary one
    fn gen_assignment<F>(
        &mut self,
        cur: &Cursor,
        to_field: &FieldSpec,
        to_identifier: &str,
        primary: &Source,
        fallback: Option<&Source>,
        cast: F,
    ) where
        F: Fn(&FieldSpec, &FieldSpec) -> Cast,
    {
        if let Some(fallback) = fallback {
            self.emit_assignment(cur, fallback, to_field, to_identifier, cast(&fallback.field, to_field), false);
        }
        let cast = cast(&primary.field, to_field);
        self.emit_assignment(cur, primary, to_field, to_identifier, cast, fallback.is_some());
    }

    fn emit_assignment(
        &mut self,
        cur: &Cursor,
        source: &Source,
        to_field: &FieldSpec,
        to_identifier: &str,
        cast: Cast,
        extra_nil_check: bool,
    ) {
        let assignment = FieldAssignment {
            from_identifier: &source.identifier,
            from_required: source.field.required,
            to_identifier,
            to_required: to_field.required,
            cast,
            extra_nil_check,
        };
        let lines = assignment.render(&cur.indent, &self.deferred, &cur.helper_scopes);
        self.lines.extend(lines);
    }

    /// Emit `if parent == nil` blocks for deferred ancestors of `to_identifier`
    fn emit_parent_guards(&mut self, indent: &str, to_identifier: &str, helper_scopes: &[String]) {
        let guards = self.deferred.guards(indent, to_identifier, helper_scopes);
        self.lines.extend(guards);
    }

    fn unique_identifier(&mut self, prefix: &str) -> String {
        self.field_counter += 1;
        format!("{prefix}{}", self.field_counter)
    }
}

/// Resolve every entry's source path against `from_fields`
///
/// Segments match case-insensitively; the resolved entry carries the path
/// spelled with the Go names of the fields it went through.
fn resolve_field_map(field_map: &FieldMap, from_fields: &[Rc<FieldSpec>]) -> Result<FieldMap> {
    field_map
        .iter()
        .map(|(target, entry)| {
            let (path, field) = find_source_field(from_fields, &entry.qualified_name)
                .ok_or_else(|| GeneratorError::UnknownTransformSource(entry.qualified_name.clone()))?;
            let resolved = FieldMapperEntry {
                qualified_name: path,
                overrides: entry.overrides,
                field: Some(field),
            };
            Ok((target.clone(), resolved))
        })
        .collect()
}

/// Follow a dotted path through nested struct fields
fn find_source_field(fields: &[Rc<FieldSpec>], qualified_name: &str) -> Option<(String, Rc<FieldSpec>)> {
    let mut segments = qualified_name.split('.').peekable();
    let mut current = fields;
    let mut path: Vec<String> = Vec::new();
    while let Some(segment) = segments.next() {
        let field = current.iter().find(|field| {
            field.name.eq_ignore_ascii_case(segment) || pascal_case(&field.name).eq_ignore_ascii_case(segment)
        })?;
        path.push(pascal_case(&field.name));
        if segments.peek().is_none() {
            return Some((path.join("."), Rc::clone(field)));
        }
        current = field.ty.as_struct()?.fields();
    }
    None
}
