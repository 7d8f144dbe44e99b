//! Fixtures shared by generator tests

use std::rc::Rc;

use crate::converter::{FieldMap, FieldMapperEntry};
use crate::schema::{EnumSpec, FieldSpec, StructSpec, TypeSpec, TypedefSpec};
use crate::types::{PackageNameResolver, ResolveError};

/// IDL file every fixture type is declared in
pub const FIXTURE_FILE: &str = "structs.thrift";

/// Uses the file stem as the package name (`idl/structs.thrift` is `structs`)
pub struct NaivePackageNameResolver;

impl PackageNameResolver for NaivePackageNameResolver {
    fn type_package_name(&self, idl_file: &str) -> Result<String, ResolveError> {
        let base = idl_file.rsplit('/').next().unwrap_or(idl_file);
        let stem = base.strip_suffix(".thrift").unwrap_or(base);
        Ok(stem.to_string())
    }
}

/// Fails every lookup
pub struct FailingPackageNameResolver;

impl PackageNameResolver for FailingPackageNameResolver {
    fn type_package_name(&self, idl_file: &str) -> Result<String, ResolveError> {
        Err(format!("no package for {idl_file}").into())
    }
}

pub fn req(name: &str, ty: TypeSpec) -> Rc<FieldSpec> {
    Rc::new(FieldSpec::new(name, true, ty))
}

pub fn opt(name: &str, ty: TypeSpec) -> Rc<FieldSpec> {
    Rc::new(FieldSpec::new(name, false, ty))
}

pub fn struct_type(name: &str, fields: Vec<Rc<FieldSpec>>) -> TypeSpec {
    TypeSpec::Struct(StructSpec::with_fields(name, FIXTURE_FILE, fields))
}

pub fn typedef(name: &str, target: TypeSpec) -> TypeSpec {
    TypeSpec::Typedef(TypedefSpec::new(name, FIXTURE_FILE, target))
}

pub fn enumeration(name: &str) -> TypeSpec {
    TypeSpec::Enum(EnumSpec::new(name, FIXTURE_FILE))
}

/// Field map from `(target path, qualified source, override)` triples
pub fn field_map(entries: &[(&str, &str, bool)]) -> FieldMap {
    entries
        .iter()
        .map(|(target, source, overrides)| (target.to_string(), FieldMapperEntry::new(*source, *overrides)))
        .collect()
}

/// Render generated lines with four spaces per leading tab
pub fn render(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| {
            let depth = line.chars().take_while(|c| *c == '\t').count();
            format!("{}{}", "    ".repeat(depth), &line[depth..])
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip blank lines and the common indentation from an expected block
pub fn expected(block: &str) -> String {
    let lines: Vec<&str> = block.lines().filter(|line| !line.trim().is_empty()).collect();
    let indent = lines
        .iter()
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|line| line[indent..].trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
