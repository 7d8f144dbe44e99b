//! Lists, sets and maps
//!
//! Containers are rebuilt element by element: the target is allocated with
//! the source length, then a loop converts each element. Nested containers
//! recurse with the loop variable as their source.

use std::rc::Rc;

use super::{Cursor, FieldMap, Source, TypeConverter};
use crate::error::{GeneratorError, Result};
use crate::schema::{SetHint, StructSpec, TypeSpec};
use crate::types;

/// A Go expression together with its schema type
#[derive(Debug, Clone)]
pub(super) struct Operand<'t> {
    pub ty: &'t TypeSpec,
    pub expr: String,
}

impl<'t> From<&'t Source> for Operand<'t> {
    fn from(source: &'t Source) -> Self {
        Self {
            ty: &source.field.ty,
            expr: source.identifier.clone(),
        }
    }
}

/// Element type and representation of a target set
#[derive(Debug, Clone, Copy)]
pub(super) struct SetTarget<'t> {
    pub elem: &'t TypeSpec,
    pub hint: SetHint,
}

/// Key and value types of a target map
#[derive(Debug, Clone, Copy)]
pub(super) struct MapTarget<'t> {
    pub key: &'t TypeSpec,
    pub value: &'t TypeSpec,
}

fn incompatible(field: &str, expected: &'static str) -> GeneratorError {
    GeneratorError::IncompatibleType {
        field: field.to_string(),
        expected,
    }
}

fn list_elem<'t>(operand: &Operand<'t>, field: &str) -> Result<&'t TypeSpec> {
    match operand.ty.root() {
        TypeSpec::List(elem) => Ok(elem),
        _ => Err(incompatible(field, "list")),
    }
}

fn set_elem<'t>(operand: &Operand<'t>, field: &str) -> Result<(&'t TypeSpec, SetHint)> {
    match operand.ty.root() {
        TypeSpec::Set(elem, hint) => Ok((elem, *hint)),
        _ => Err(incompatible(field, "set")),
    }
}

fn map_value<'t>(operand: &Operand<'t>, field: &str) -> Result<&'t TypeSpec> {
    match operand.ty.root() {
        TypeSpec::Map(_, value) => Ok(value),
        _ => Err(incompatible(field, "map")),
    }
}

fn keyed(elem: &TypeSpec, hint: SetHint) -> bool {
    hint == SetHint::Map && types::is_hashable(elem)
}

impl TypeConverter<'_> {
    pub(super) fn gen_list(
        &mut self,
        cur: &Cursor,
        to_name: &str,
        to_elem: &TypeSpec,
        to_sub: &str,
        primary: &Operand<'_>,
        fallback: Option<&Operand<'_>>,
        field_map: &FieldMap,
    ) -> Result<()> {
        let primary = Operand {
            ty: list_elem(primary, to_name)?,
            expr: primary.expr.clone(),
        };
        let fallback = match fallback {
            Some(fallback) => Some(Operand {
                ty: list_elem(fallback, to_name)?,
                expr: fallback.expr.clone(),
            }),
            None => None,
        };
        self.gen_slice(cur, to_name, to_elem, to_sub, &primary, fallback.as_ref(), field_map)
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn gen_set(
        &mut self,
        cur: &Cursor,
        to_name: &str,
        target: SetTarget<'_>,
        to_sub: &str,
        primary: &Operand<'_>,
        fallback: Option<&Operand<'_>>,
        field_map: &FieldMap,
    ) -> Result<()> {
        let (from_elem, from_hint) = set_elem(primary, to_name)?;
        let fallback = match fallback {
            Some(fallback) => Some(Operand {
                ty: set_elem(fallback, to_name)?.0,
                expr: fallback.expr.clone(),
            }),
            None => None,
        };
        let to_keyed = keyed(target.elem, target.hint);
        let from_keyed = keyed(from_elem, from_hint);

        if !to_keyed && !from_keyed {
            let primary = Operand {
                ty: from_elem,
                expr: primary.expr.clone(),
            };
            return self.gen_slice(cur, to_name, target.elem, to_sub, &primary, fallback.as_ref(), field_map);
        }
        if !types::is_hashable(target.elem) {
            return Err(incompatible(to_name, "set"));
        }

        let to_identifier = format!("out.{to_sub}");
        let elem_type = types::go_type(self.resolver, target.elem)?;
        let (source, _) = self.select_source(cur, &primary.expr, fallback.as_ref().map(|f| f.expr.as_str()), false);
        self.emit_parent_guards(&cur.indent, &to_identifier, &cur.helper_scopes);

        let indent = &cur.indent;
        if to_keyed {
            self.lines.appendf(format_args!(
                "{indent}{to_identifier} = make(map[{elem_type}]struct{{}}, len({source}))"
            ));
        } else {
            self.lines.appendf(format_args!(
                "{indent}{to_identifier} = make([]{elem_type}, 0, len({source}))"
            ));
        }
        let value = self.unique_identifier("value");
        if from_keyed {
            self.lines.appendf(format_args!("{indent}for {value} := range {source} {{"));
        } else {
            self.lines.appendf(format_args!("{indent}for _, {value} := range {source} {{"));
        }
        if to_keyed {
            self.lines.appendf(format_args!("{indent}\t{to_identifier}[{elem_type}({value})] = struct{{}}{{}}"));
        } else {
            self.lines.appendf(format_args!(
                "{indent}\t{to_identifier} = append({to_identifier}, {elem_type}({value}))"
            ));
        }
        self.lines.appendf(format_args!("{indent}}}"));
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn gen_map(
        &mut self,
        cur: &Cursor,
        to_name: &str,
        target: MapTarget<'_>,
        to_sub: &str,
        primary: &Operand<'_>,
        fallback: Option<&Operand<'_>>,
        field_map: &FieldMap,
    ) -> Result<()> {
        let key_type = match target.key {
            TypeSpec::String => "string".to_string(),
            key if matches!(key.root(), TypeSpec::String) => types::go_type(self.resolver, key)?,
            _ => return Err(GeneratorError::NonStringKey(to_name.to_string())),
        };
        let key_cast = !matches!(target.key, TypeSpec::String);

        let from_value = map_value(primary, to_name)?;
        let fallback = match fallback {
            Some(fallback) => Some(Operand {
                ty: map_value(fallback, to_name)?,
                expr: fallback.expr.clone(),
            }),
            None => None,
        };

        let to_identifier = format!("out.{to_sub}");
        let value_type = types::go_reference_type(self.resolver, target.value)?;
        let branch = self.branches_on_source(target.value, from_value);
        let (source, selector) = self.select_source(cur, &primary.expr, fallback.as_ref().map(|f| f.expr.as_str()), branch);
        self.emit_parent_guards(&cur.indent, &to_identifier, &cur.helper_scopes);

        let indent = &cur.indent;
        self.lines.appendf(format_args!(
            "{indent}{to_identifier} = make(map[{key_type}]{value_type}, len({source}))"
        ));
        let key = self.unique_identifier("key");
        let value = self.unique_identifier("value");
        self.lines.appendf(format_args!("{indent}for {key}, {value} := range {source} {{"));

        let slot_key = if key_cast { format!("{key_type}({key})") } else { key.clone() };
        let element = Element {
            to_name,
            to_elem: target.value,
            slot: format!("{to_sub}[{slot_key}]"),
            value,
            primary: Operand {
                ty: from_value,
                expr: format!("{}[{key}]", primary.expr),
            },
            fallback: fallback.map(|fallback| Operand {
                ty: fallback.ty,
                expr: format!("{}[{key}]", fallback.expr),
            }),
            selector,
        };
        let mark = self.helpers.len();
        self.gen_element(&cur.indented(), &element, field_map)?;
        self.helpers.truncate(mark);
        self.lines.appendf(format_args!("{indent}}}"));
        Ok(())
    }

    /// `out.X = make([]T, len(src))` and an indexed loop over `src`
    ///
    /// `primary` and `fallback` carry element types.
    #[allow(clippy::too_many_arguments)]
    fn gen_slice(
        &mut self,
        cur: &Cursor,
        to_name: &str,
        to_elem: &TypeSpec,
        to_sub: &str,
        primary: &Operand<'_>,
        fallback: Option<&Operand<'_>>,
        field_map: &FieldMap,
    ) -> Result<()> {
        let to_identifier = format!("out.{to_sub}");
        let elem_type = types::go_reference_type(self.resolver, to_elem)?;
        let branch = self.branches_on_source(to_elem, primary.ty);
        let (source, selector) = self.select_source(cur, &primary.expr, fallback.map(|f| f.expr.as_str()), branch);
        self.emit_parent_guards(&cur.indent, &to_identifier, &cur.helper_scopes);

        let indent = &cur.indent;
        self.lines.appendf(format_args!("{indent}{to_identifier} = make([]{elem_type}, len({source}))"));
        let index = self.unique_identifier("index");
        let value = self.unique_identifier("value");
        self.lines.appendf(format_args!("{indent}for {index}, {value} := range {source} {{"));

        let element = Element {
            to_name,
            to_elem,
            slot: format!("{to_sub}[{index}]"),
            value,
            primary: Operand {
                ty: primary.ty,
                expr: format!("{}[{index}]", primary.expr),
            },
            fallback: fallback.map(|fallback| Operand {
                ty: fallback.ty,
                expr: format!("{}[{index}]", fallback.expr),
            }),
            selector,
        };
        let mark = self.helpers.len();
        self.gen_element(&cur.indented(), &element, field_map)?;
        self.helpers.truncate(mark);
        self.lines.appendf(format_args!("{indent}}}"));
        Ok(())
    }

    /// Struct elements converted inline pick their source path per element
    fn branches_on_source(&self, to_elem: &TypeSpec, from_elem: &TypeSpec) -> bool {
        match (to_elem.as_struct(), from_elem.as_struct()) {
            (Some(to_struct), Some(from_struct)) => !self.needs_helper(to_struct, from_struct),
            _ => false,
        }
    }

    /// Pick the container to iterate when a fallback source exists
    ///
    /// Returns the expression to range over and, when `with_selector` is set,
    /// the flag recording whether the primary source was taken.
    fn select_source(
        &mut self,
        cur: &Cursor,
        primary: &str,
        fallback: Option<&str>,
        with_selector: bool,
    ) -> (String, Option<String>) {
        let Some(fallback) = fallback else {
            return (primary.to_string(), None);
        };
        let list = self.unique_identifier("sourceList");
        let selector = with_selector.then(|| self.unique_identifier("isOverridden"));

        let indent = &cur.indent;
        self.lines.appendf(format_args!("{indent}{list} := {fallback}"));
        if let Some(selector) = &selector {
            self.lines.appendf(format_args!("{indent}{selector} := false"));
        }
        self.lines.appendf(format_args!("{indent}if {primary} != nil {{"));
        self.lines.appendf(format_args!("{indent}\t{list} = {primary}"));
        if let Some(selector) = &selector {
            self.lines.appendf(format_args!("{indent}\t{selector} = true"));
        }
        self.lines.appendf(format_args!("{indent}}}"));
        (list, selector)
    }

    /// Convert one element inside a container loop; `cur` is the loop body
    fn gen_element(&mut self, cur: &Cursor, element: &Element<'_, '_>, field_map: &FieldMap) -> Result<()> {
        let to_name = element.to_name;
        match element.to_elem.root() {
            TypeSpec::Struct(to_struct) => match (&element.selector, &element.fallback) {
                (Some(selector), Some(fallback)) => {
                    let indent = &cur.indent;
                    let inner = cur.indented();
                    self.lines.appendf(format_args!("{indent}if {selector} {{"));
                    self.gen_struct_element(&inner, element, to_struct, &element.primary, field_map)?;
                    self.lines.appendf(format_args!("{indent}}} else {{"));
                    self.gen_struct_element(&inner, element, to_struct, fallback, field_map)?;
                    self.lines.appendf(format_args!("{indent}}}"));
                    Ok(())
                }
                _ => self.gen_struct_element(cur, element, to_struct, &element.primary, field_map),
            },
            TypeSpec::List(inner) => {
                let source = Operand {
                    ty: element.primary.ty,
                    expr: element.value.clone(),
                };
                self.gen_list(cur, to_name, inner, &element.slot, &source, None, field_map)
            }
            TypeSpec::Set(inner, hint) => {
                let source = Operand {
                    ty: element.primary.ty,
                    expr: element.value.clone(),
                };
                let target = SetTarget { elem: inner, hint: *hint };
                self.gen_set(cur, to_name, target, &element.slot, &source, None, field_map)
            }
            TypeSpec::Map(key, value) => {
                let source = Operand {
                    ty: element.primary.ty,
                    expr: element.value.clone(),
                };
                let target = MapTarget { key, value };
                self.gen_map(cur, to_name, target, &element.slot, &source, None, field_map)
            }
            TypeSpec::Typedef(_) => unreachable!("root() strips typedefs"),
            _ => {
                let type_name = types::go_type(self.resolver, element.to_elem)?;
                self.lines.appendf(format_args!(
                    "{}out.{} = {type_name}({})",
                    cur.indent, element.slot, element.value
                ));
                Ok(())
            }
        }
    }

    fn gen_struct_element(
        &mut self,
        cur: &Cursor,
        element: &Element<'_, '_>,
        to_struct: &Rc<StructSpec>,
        source: &Operand<'_>,
        field_map: &FieldMap,
    ) -> Result<()> {
        let Some(from_struct) = source.ty.as_struct() else {
            return Err(incompatible(element.to_name, "struct"));
        };

        if self.needs_helper(to_struct, from_struct) {
            let helper = self.struct_helper(cur, to_struct, from_struct, &element.slot, field_map)?;
            self.lines.appendf(format_args!(
                "{}out.{} = {helper}({})",
                cur.indent, element.slot, element.value
            ));
            return Ok(());
        }

        let type_name = types::go_type(self.resolver, element.to_elem)?;
        let child_from_prefix = format!("{}.", source.expr);
        self.gen_struct_body(
            cur,
            to_struct,
            from_struct,
            &type_name,
            &element.value,
            &element.slot,
            &child_from_prefix,
            field_map,
        )
    }
}

/// One element slot inside a container loop
struct Element<'n, 't> {
    to_name: &'n str,
    to_elem: &'t TypeSpec,
    /// Target sub-path of the slot, e.g. `One[index1]`
    slot: String,
    /// Loop variable holding the source element
    value: String,
    /// Indexed path of the element in the primary source
    primary: Operand<'t>,
    fallback: Option<Operand<'t>>,
    selector: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use crate::test_support::{NaivePackageNameResolver, expected, field_map, opt, render, req, struct_type, typedef};

    fn convert(from: &[Rc<FieldSpec>], to: &[Rc<FieldSpec>], map: &FieldMap) -> Result<String> {
        let resolver = NaivePackageNameResolver;
        let mut converter = TypeConverter::new(&resolver);
        converter.generate(from, to, map)?;
        Ok(render(converter.lines()))
    }

    #[test]
    fn test_list_of_primitives() {
        let from = vec![req("one", TypeSpec::list(TypeSpec::I32))];
        let to = vec![req("one", TypeSpec::list(TypeSpec::I64))];

        assert_eq!(
            convert(&from, &to, &FieldMap::new()).unwrap(),
            expected(
                r#"
                out.One = make([]int64, len(in.One))
                for index1, value2 := range in.One {
                    out.One[index1] = int64(value2)
                }
                "#
            )
        );
    }

    #[test]
    fn test_list_of_structs() {
        let item = struct_type("Item", vec![req("name", TypeSpec::String)]);
        let from = vec![req("items", TypeSpec::list(item.clone()))];
        let to = vec![req("items", TypeSpec::list(item))];

        assert_eq!(
            convert(&from, &to, &FieldMap::new()).unwrap(),
            expected(
                r#"
                out.Items = make([]*structs.Item, len(in.Items))
                for index1, value2 := range in.Items {
                    if value2 != nil {
                        out.Items[index1] = &structs.Item{}
                        out.Items[index1].Name = string(in.Items[index1].Name)
                    } else {
                        out.Items[index1] = nil
                    }
                }
                "#
            )
        );
    }

    #[test]
    fn test_list_of_structs_with_override() {
        let item = struct_type("Item", vec![req("name", TypeSpec::String)]);
        let from = vec![opt("one", TypeSpec::list(item.clone())), opt("two", TypeSpec::list(item.clone()))];
        let to = vec![opt("one", TypeSpec::list(item.clone())), opt("two", TypeSpec::list(item))];
        let map = field_map(&[("One", "Two", true), ("Two", "One", true)]);

        assert_eq!(
            convert(&from, &to, &map).unwrap(),
            expected(
                r#"
                sourceList1 := in.One
                isOverridden2 := false
                if in.Two != nil {
                    sourceList1 = in.Two
                    isOverridden2 = true
                }
                out.One = make([]*structs.Item, len(sourceList1))
                for index3, value4 := range sourceList1 {
                    if isOverridden2 {
                        if value4 != nil {
                            out.One[index3] = &structs.Item{}
                            out.One[index3].Name = string(in.Two[index3].Name)
                        } else {
                            out.One[index3] = nil
                        }
                    } else {
                        if value4 != nil {
                            out.One[index3] = &structs.Item{}
                            out.One[index3].Name = string(in.One[index3].Name)
                        } else {
                            out.One[index3] = nil
                        }
                    }
                }
                sourceList5 := in.Two
                isOverridden6 := false
                if in.One != nil {
                    sourceList5 = in.One
                    isOverridden6 = true
                }
                out.Two = make([]*structs.Item, len(sourceList5))
                for index7, value8 := range sourceList5 {
                    if isOverridden6 {
                        if value8 != nil {
                            out.Two[index7] = &structs.Item{}
                            out.Two[index7].Name = string(in.One[index7].Name)
                        } else {
                            out.Two[index7] = nil
                        }
                    } else {
                        if value8 != nil {
                            out.Two[index7] = &structs.Item{}
                            out.Two[index7].Name = string(in.Two[index7].Name)
                        } else {
                            out.Two[index7] = nil
                        }
                    }
                }
                "#
            )
        );
    }

    #[test]
    fn test_nested_lists() {
        let from = vec![req("grid", TypeSpec::list(TypeSpec::list(TypeSpec::String)))];
        let to = vec![req("grid", TypeSpec::list(TypeSpec::list(TypeSpec::String)))];

        assert_eq!(
            convert(&from, &to, &FieldMap::new()).unwrap(),
            expected(
                r#"
                out.Grid = make([][]string, len(in.Grid))
                for index1, value2 := range in.Grid {
                    out.Grid[index1] = make([]string, len(value2))
                    for index3, value4 := range value2 {
                        out.Grid[index1][index3] = string(value4)
                    }
                }
                "#
            )
        );
    }

    #[test]
    fn test_sets() {
        let from = vec![
            req("tags", TypeSpec::set(TypeSpec::String)),
            req("names", TypeSpec::set(TypeSpec::String)),
            req("ids", TypeSpec::Set(Box::new(TypeSpec::I64), SetHint::Slice)),
        ];
        let to = vec![
            req("tags", TypeSpec::set(TypeSpec::String)),
            req("names", TypeSpec::Set(Box::new(TypeSpec::String), SetHint::Slice)),
            req("ids", TypeSpec::Set(Box::new(TypeSpec::I64), SetHint::Slice)),
        ];

        assert_eq!(
            convert(&from, &to, &FieldMap::new()).unwrap(),
            expected(
                r#"
                out.Tags = make(map[string]struct{}, len(in.Tags))
                for value1 := range in.Tags {
                    out.Tags[string(value1)] = struct{}{}
                }
                out.Names = make([]string, 0, len(in.Names))
                for value2 := range in.Names {
                    out.Names = append(out.Names, string(value2))
                }
                out.Ids = make([]int64, len(in.Ids))
                for index3, value4 := range in.Ids {
                    out.Ids[index3] = int64(value4)
                }
                "#
            )
        );
    }

    #[test]
    fn test_keyed_set_with_override() {
        let from = vec![opt("tags", TypeSpec::set(TypeSpec::String)), opt("labels", TypeSpec::set(TypeSpec::String))];
        let to = vec![opt("tags", TypeSpec::set(TypeSpec::String))];
        let map = field_map(&[("Tags", "Labels", true)]);

        assert_eq!(
            convert(&from, &to, &map).unwrap(),
            expected(
                r#"
                sourceList1 := in.Tags
                if in.Labels != nil {
                    sourceList1 = in.Labels
                }
                out.Tags = make(map[string]struct{}, len(sourceList1))
                for value2 := range sourceList1 {
                    out.Tags[string(value2)] = struct{}{}
                }
                "#
            )
        );
    }

    #[test]
    fn test_map_with_typedef_key() {
        let uuid = typedef("UUID", TypeSpec::String);
        let from = vec![req("owners", TypeSpec::map(TypeSpec::String, TypeSpec::String))];
        let to = vec![req("owners", TypeSpec::map(uuid, TypeSpec::String))];

        assert_eq!(
            convert(&from, &to, &FieldMap::new()).unwrap(),
            expected(
                r#"
                out.Owners = make(map[structs.UUID]string, len(in.Owners))
                for key1, value2 := range in.Owners {
                    out.Owners[structs.UUID(key1)] = string(value2)
                }
                "#
            )
        );
    }

    #[test]
    fn test_map_of_structs() {
        let item = struct_type("Item", vec![opt("name", TypeSpec::String)]);
        let from = vec![req("byName", TypeSpec::map(TypeSpec::String, item.clone()))];
        let to = vec![req("byName", TypeSpec::map(TypeSpec::String, item))];

        assert_eq!(
            convert(&from, &to, &FieldMap::new()).unwrap(),
            expected(
                r#"
                out.ByName = make(map[string]*structs.Item, len(in.ByName))
                for key1, value2 := range in.ByName {
                    if value2 != nil {
                        out.ByName[key1] = &structs.Item{}
                        out.ByName[key1].Name = (*string)(in.ByName[key1].Name)
                    } else {
                        out.ByName[key1] = nil
                    }
                }
                "#
            )
        );
    }

    #[test]
    fn test_map_of_structs_with_override() {
        let item = struct_type("Item", vec![req("name", TypeSpec::String)]);
        let from = vec![
            opt("byName", TypeSpec::map(TypeSpec::String, item.clone())),
            opt("primary", TypeSpec::map(TypeSpec::String, item.clone())),
        ];
        let to = vec![opt("byName", TypeSpec::map(TypeSpec::String, item))];
        let map = field_map(&[("ByName", "Primary", true)]);

        assert_eq!(
            convert(&from, &to, &map).unwrap(),
            expected(
                r#"
                sourceList1 := in.ByName
                isOverridden2 := false
                if in.Primary != nil {
                    sourceList1 = in.Primary
                    isOverridden2 = true
                }
                out.ByName = make(map[string]*structs.Item, len(sourceList1))
                for key3, value4 := range sourceList1 {
                    if isOverridden2 {
                        if value4 != nil {
                            out.ByName[key3] = &structs.Item{}
                            out.ByName[key3].Name = string(in.Primary[key3].Name)
                        } else {
                            out.ByName[key3] = nil
                        }
                    } else {
                        if value4 != nil {
                            out.ByName[key3] = &structs.Item{}
                            out.ByName[key3].Name = string(in.ByName[key3].Name)
                        } else {
                            out.ByName[key3] = nil
                        }
                    }
                }
                "#
            )
        );
    }

    #[test]
    fn test_non_string_map_key() {
        let from = vec![req("counts", TypeSpec::map(TypeSpec::I32, TypeSpec::String))];
        let to = vec![req("counts", TypeSpec::map(TypeSpec::I32, TypeSpec::String))];

        let err = convert(&from, &to, &FieldMap::new()).unwrap_err();
        assert!(matches!(err, GeneratorError::NonStringKey(ref name) if name == "counts"));
    }

    #[test]
    fn test_list_from_non_list() {
        let from = vec![req("one", TypeSpec::String)];
        let to = vec![req("one", TypeSpec::list(TypeSpec::String))];

        let err = convert(&from, &to, &FieldMap::new()).unwrap_err();
        assert!(matches!(err, GeneratorError::IncompatibleType { expected: "list", .. }));
    }

    #[test]
    fn test_list_under_deferred_parent() {
        let inner = struct_type("Inner", vec![opt("tags", TypeSpec::list(TypeSpec::String))]);
        let from = vec![opt("labels", TypeSpec::list(TypeSpec::String))];
        let to = vec![opt("inner", inner)];
        let map = field_map(&[("Inner.Tags", "Labels", false)]);

        assert_eq!(
            convert(&from, &to, &map).unwrap(),
            expected(
                r#"
                if out.Inner == nil {
                    out.Inner = &structs.Inner{}
                }
                out.Inner.Tags = make([]string, len(in.Labels))
                for index1, value2 := range in.Labels {
                    out.Inner.Tags[index1] = string(value2)
                }
                "#
            )
        );
    }
}
