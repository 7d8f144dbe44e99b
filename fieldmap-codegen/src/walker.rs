//! Depth-first traversal of nested field groups

use std::rc::Rc;

use crate::casing::pascal_case;
use crate::schema::FieldSpec;

/// Visit every field of `fields`, descending into struct-typed fields
///
/// The visitor receives the Go-side prefix (`""`, then `".Outer"`, ...), the
/// IDL-side prefix (`""`, then `".outer"`, ...) and the field. Returning
/// `true` stops the walk, and the walk itself then returns `true`.
///
/// A field is not entered again while it is already on the current path, so
/// recursive structs terminate.
pub fn walk_field_groups<F>(fields: &[Rc<FieldSpec>], mut visit: F) -> bool
where
    F: FnMut(&str, &str, &Rc<FieldSpec>) -> bool,
{
    let mut path = Vec::new();
    walk(fields, "", "", &mut path, &mut visit)
}

fn walk<F>(
    fields: &[Rc<FieldSpec>],
    go_prefix: &str,
    idl_prefix: &str,
    path: &mut Vec<*const FieldSpec>,
    visit: &mut F,
) -> bool
where
    F: FnMut(&str, &str, &Rc<FieldSpec>) -> bool,
{
    for field in fields {
        let key = Rc::as_ptr(field);
        if path.contains(&key) {
            continue;
        }
        if visit(go_prefix, idl_prefix, field) {
            return true;
        }
        if let Some(nested) = field.ty.as_struct() {
            path.push(key);
            let go = format!("{go_prefix}.{}", pascal_case(&field.name));
            let idl = format!("{idl_prefix}.{}", field.name);
            let bail = walk(nested.fields(), &go, &idl, path, visit);
            path.pop();
            if bail {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{StructSpec, TypeSpec};
    use crate::test_support::{opt, req, struct_type};

    #[test]
    fn test_walk_nested_prefixes() {
        let inner = struct_type("Inner", vec![req("user_id", TypeSpec::String)]);
        let fields = vec![req("one", TypeSpec::Bool), opt("nested_two", inner)];

        let mut visited = Vec::new();
        let bailed = walk_field_groups(&fields, |go, idl, field| {
            visited.push(format!("{go}|{idl}|{}", field.name));
            false
        });

        assert!(!bailed);
        assert_eq!(visited, ["||one", "||nested_two", ".NestedTwo|.nested_two|user_id"]);
    }

    #[test]
    fn test_walk_stops_when_visitor_bails() {
        let fields = vec![req("one", TypeSpec::Bool), req("two", TypeSpec::Bool)];

        let mut count = 0;
        let bailed = walk_field_groups(&fields, |_, _, _| {
            count += 1;
            true
        });

        assert!(bailed);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_walk_terminates_on_recursive_struct() {
        let foo = StructSpec::new("Foo", "structs.thrift");
        let recur = opt("recur", TypeSpec::structure(&foo));
        let _ = foo.set_fields(vec![req("name", TypeSpec::String), Rc::clone(&recur)]);

        let mut visited = Vec::new();
        walk_field_groups(&[recur], |go, _, field| {
            visited.push(format!("{go}.{}", field.name));
            false
        });

        assert_eq!(visited, [".recur", ".Recur.name"]);
    }
}
