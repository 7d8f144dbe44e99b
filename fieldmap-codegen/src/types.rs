//! Go type names for schema types
//!
//! Named types live in the Go package generated for their IDL file; the
//! package name comes from an injected [`PackageNameResolver`].

use crate::casing::pascal_case;
use crate::error::{GeneratorError, Result};
use crate::schema::{SetHint, TypeSpec};

/// Error returned by a [`PackageNameResolver`]
pub type ResolveError = Box<dyn std::error::Error + Send + Sync>;

/// Maps an IDL file to the Go package its types are generated into
pub trait PackageNameResolver {
    /// Package name for types declared in `idl_file`
    fn type_package_name(&self, idl_file: &str) -> std::result::Result<String, ResolveError>;
}

/// Go type for `spec`
///
/// Maps with a non-hashable key become a slice of key/value pairs, and sets
/// become `map[E]struct{}` unless the element is not hashable or the field
/// asked for a slice.
pub fn go_type(resolver: &dyn PackageNameResolver, spec: &TypeSpec) -> Result<String> {
    Ok(match spec {
        TypeSpec::Bool => "bool".to_string(),
        TypeSpec::I8 => "int8".to_string(),
        TypeSpec::I16 => "int16".to_string(),
        TypeSpec::I32 => "int32".to_string(),
        TypeSpec::I64 => "int64".to_string(),
        TypeSpec::Double => "float64".to_string(),
        TypeSpec::String => "string".to_string(),
        TypeSpec::Binary => "[]byte".to_string(),
        TypeSpec::Enum(_) | TypeSpec::Struct(_) | TypeSpec::Typedef(_) => go_custom_type(resolver, spec)?,
        TypeSpec::List(elem) => format!("[]{}", go_reference_type(resolver, elem)?),
        TypeSpec::Set(elem, hint) => {
            let elem_type = go_reference_type(resolver, elem)?;
            if *hint == SetHint::Map && is_hashable(elem) {
                format!("map[{elem_type}]struct{{}}")
            } else {
                format!("[]{elem_type}")
            }
        }
        TypeSpec::Map(key, value) => {
            let key_type = go_reference_type(resolver, key)?;
            let value_type = go_reference_type(resolver, value)?;
            if is_hashable(key) {
                format!("map[{key_type}]{value_type}")
            } else {
                format!("[]struct{{Key {key_type}; Value {value_type}}}")
            }
        }
    })
}

/// Go type for `spec` as stored in a field or container: structs are pointers
pub fn go_reference_type(resolver: &dyn PackageNameResolver, spec: &TypeSpec) -> Result<String> {
    let name = go_type(resolver, spec)?;
    Ok(match spec {
        TypeSpec::Struct(_) => format!("*{name}"),
        _ => name,
    })
}

/// Package-qualified name of an enum, struct or typedef
///
/// # Panics
///
/// Panics when called with a built-in type.
pub fn go_custom_type(resolver: &dyn PackageNameResolver, spec: &TypeSpec) -> Result<String> {
    let (name, file) = match spec {
        TypeSpec::Enum(spec) => (&spec.name, &spec.file),
        TypeSpec::Struct(spec) => (&spec.name, &spec.file),
        TypeSpec::Typedef(spec) => (&spec.name, &spec.file),
        other => panic!("{} is not a named type", other.name()),
    };
    let package = resolver
        .type_package_name(file)
        .map_err(|source| GeneratorError::PackageResolution {
            type_name: name.clone(),
            source,
        })?;
    Ok(format!("{package}.{}", pascal_case(name)))
}

/// Whether values of `spec` can be map keys or set buckets
pub fn is_hashable(spec: &TypeSpec) -> bool {
    matches!(
        spec.root(),
        TypeSpec::Bool
            | TypeSpec::I8
            | TypeSpec::I16
            | TypeSpec::I32
            | TypeSpec::I64
            | TypeSpec::Double
            | TypeSpec::String
            | TypeSpec::Enum(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EnumSpec, StructSpec, TypedefSpec};
    use crate::test_support::{FailingPackageNameResolver, NaivePackageNameResolver};

    #[test]
    fn test_primitive_types() {
        let resolver = NaivePackageNameResolver;
        assert_eq!(go_type(&resolver, &TypeSpec::Bool).unwrap(), "bool");
        assert_eq!(go_type(&resolver, &TypeSpec::I8).unwrap(), "int8");
        assert_eq!(go_type(&resolver, &TypeSpec::Double).unwrap(), "float64");
        assert_eq!(go_type(&resolver, &TypeSpec::Binary).unwrap(), "[]byte");
    }

    #[test]
    fn test_named_types() {
        let resolver = NaivePackageNameResolver;
        let foo = TypeSpec::structure(&StructSpec::new("foo_bar", "idl/structs.thrift"));
        let uuid = TypeSpec::Typedef(TypedefSpec::new("UUID", "structs.thrift", TypeSpec::String));

        assert_eq!(go_type(&resolver, &foo).unwrap(), "structs.FooBar");
        assert_eq!(go_reference_type(&resolver, &foo).unwrap(), "*structs.FooBar");
        assert_eq!(go_reference_type(&resolver, &uuid).unwrap(), "structs.UUID");
        assert_eq!(go_type(&resolver, &TypeSpec::list(foo)).unwrap(), "[]*structs.FooBar");
    }

    #[test]
    fn test_container_types() {
        let resolver = NaivePackageNameResolver;
        let color = TypeSpec::Enum(EnumSpec::new("Color", "enums.thrift"));
        let point = TypeSpec::structure(&StructSpec::new("Point", "structs.thrift"));

        assert_eq!(go_type(&resolver, &TypeSpec::set(color.clone())).unwrap(), "map[enums.Color]struct{}");
        assert_eq!(
            go_type(&resolver, &TypeSpec::Set(Box::new(TypeSpec::String), SetHint::Slice)).unwrap(),
            "[]string"
        );
        assert_eq!(go_type(&resolver, &TypeSpec::set(point.clone())).unwrap(), "[]*structs.Point");
        assert_eq!(
            go_type(&resolver, &TypeSpec::map(TypeSpec::String, TypeSpec::I32)).unwrap(),
            "map[string]int32"
        );
        assert_eq!(
            go_type(&resolver, &TypeSpec::map(point, TypeSpec::String)).unwrap(),
            "[]struct{Key *structs.Point; Value string}"
        );
    }

    #[test]
    fn test_hashable() {
        let uuid = TypeSpec::Typedef(TypedefSpec::new("UUID", "structs.thrift", TypeSpec::String));
        let blob = TypeSpec::Typedef(TypedefSpec::new("Blob", "structs.thrift", TypeSpec::Binary));

        assert!(is_hashable(&TypeSpec::I64));
        assert!(is_hashable(&uuid));
        assert!(!is_hashable(&blob));
        assert!(!is_hashable(&TypeSpec::list(TypeSpec::String)));
    }

    #[test]
    fn test_resolver_failure_is_wrapped() {
        let foo = TypeSpec::structure(&StructSpec::new("Foo", "structs.thrift"));
        let err = go_type(&FailingPackageNameResolver, &foo).unwrap_err();

        assert!(matches!(err, GeneratorError::PackageResolution { ref type_name, .. } if type_name == "Foo"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    #[should_panic(expected = "is not a named type")]
    fn test_custom_type_rejects_builtins() {
        let _ = go_custom_type(&NaivePackageNameResolver, &TypeSpec::String);
    }
}
