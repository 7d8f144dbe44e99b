//! Lowering protobuf descriptors into the field-mapping schema
//!
//! Messages become [`StructSpec`]s, created before their fields are lowered
//! so recursive messages resolve to the same `Rc`. `map<K, V>` fields are
//! recognised through their synthetic map-entry message.
//!
//! Presence follows the Go code protoc-gen-go emits: proto3 scalars are plain
//! values, while proto3 `optional`, oneof members, messages and proto2
//! `optional` fields are pointers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use fieldmap_codegen::casing;
use fieldmap_codegen::{EnumSpec, FieldSpec, PackageNameResolver, ResolveError, StructSpec, TypeSpec};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto};

use crate::error::PluginError;

struct MessageEntry<'a> {
    file: &'a str,
    go_name: String,
    proto3: bool,
    descriptor: &'a DescriptorProto,
}

struct EnumEntry<'a> {
    file: &'a str,
    go_name: String,
}

/// Every message and enum of a CodeGeneratorRequest, keyed by fully
/// qualified name (`.pkg.Outer.Inner`)
pub struct DescriptorSchema<'a> {
    messages: HashMap<String, MessageEntry<'a>>,
    enums: HashMap<String, EnumEntry<'a>>,
    packages: HashMap<String, String>,
    structs: RefCell<HashMap<String, Rc<StructSpec>>>,
    enum_specs: RefCell<HashMap<String, Rc<EnumSpec>>>,
}

impl<'a> DescriptorSchema<'a> {
    /// Index the messages and enums of `files`
    pub fn new(files: &'a [FileDescriptorProto]) -> Self {
        let mut schema = Self {
            messages: HashMap::new(),
            enums: HashMap::new(),
            packages: HashMap::new(),
            structs: RefCell::new(HashMap::new()),
            enum_specs: RefCell::new(HashMap::new()),
        };
        for file in files {
            let name = file.name();
            let scope = match file.package() {
                "" => String::new(),
                package => format!(".{package}"),
            };
            let proto3 = file.syntax() == "proto3";
            schema.packages.insert(name.to_string(), go_package(file));
            schema.register(name, proto3, &scope, "", &file.message_type, &file.enum_type);
        }
        tracing::debug!(
            files = files.len(),
            messages = schema.messages.len(),
            enums = schema.enums.len(),
            "indexed descriptors"
        );
        schema
    }

    fn register(
        &mut self,
        file: &'a str,
        proto3: bool,
        scope: &str,
        go_prefix: &str,
        messages: &'a [DescriptorProto],
        enums: &'a [EnumDescriptorProto],
    ) {
        for descriptor in enums {
            self.enums.insert(
                format!("{scope}.{}", descriptor.name()),
                EnumEntry {
                    file,
                    go_name: format!("{go_prefix}{}", descriptor.name()),
                },
            );
        }
        for descriptor in messages {
            let full_name = format!("{scope}.{}", descriptor.name());
            let go_name = format!("{go_prefix}{}", descriptor.name());
            self.register(
                file,
                proto3,
                &full_name,
                &format!("{go_name}_"),
                &descriptor.nested_type,
                &descriptor.enum_type,
            );
            self.messages.insert(
                full_name,
                MessageEntry {
                    file,
                    go_name,
                    proto3,
                    descriptor,
                },
            );
        }
    }

    /// The struct for message `name`, with or without the leading dot
    pub fn message(&self, name: &str) -> Result<Rc<StructSpec>, PluginError> {
        let full_name = if name.starts_with('.') {
            name.to_string()
        } else {
            format!(".{name}")
        };
        self.lower_message(&full_name)
    }

    fn lower_message(&self, full_name: &str) -> Result<Rc<StructSpec>, PluginError> {
        if let Some(spec) = self.structs.borrow().get(full_name) {
            return Ok(Rc::clone(spec));
        }
        let entry = self
            .messages
            .get(full_name)
            .ok_or_else(|| PluginError::MessageNotFound(full_name.to_string()))?;

        let spec = StructSpec::new(entry.go_name.as_str(), entry.file);
        self.structs.borrow_mut().insert(full_name.to_string(), Rc::clone(&spec));

        let fields = entry
            .descriptor
            .field
            .iter()
            .map(|field| self.lower_field(entry, full_name, field))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::trace!(message = %full_name, fields = fields.len(), "lowered message");
        if spec.set_fields(fields).is_err() {
            tracing::warn!(message = %full_name, "message lowered twice, keeping the first field set");
        }
        Ok(spec)
    }

    fn lower_field(
        &self,
        entry: &MessageEntry<'_>,
        message: &str,
        field: &FieldDescriptorProto,
    ) -> Result<Rc<FieldSpec>, PluginError> {
        let repeated = field.label() == Label::Repeated;
        let ty = match self.map_entry(field) {
            Some(map_entry) => {
                let key = self.entry_type(message, field, map_entry, 1)?;
                let value = self.entry_type(message, field, map_entry, 2)?;
                TypeSpec::map(key, value)
            }
            None if repeated => TypeSpec::list(self.lower_type(message, field)?),
            None => self.lower_type(message, field)?,
        };

        let required = if repeated {
            true
        } else if field.proto3_optional() || field.oneof_index.is_some() {
            false
        } else if entry.proto3 {
            field.r#type() != Type::Message
        } else {
            field.label() == Label::Required
        };
        Ok(Rc::new(FieldSpec::new(field.name(), required, ty)))
    }

    fn map_entry(&self, field: &FieldDescriptorProto) -> Option<&'a DescriptorProto> {
        if field.label() != Label::Repeated || field.r#type() != Type::Message {
            return None;
        }
        self.messages
            .get(field.type_name())
            .map(|entry| entry.descriptor)
            .filter(|descriptor| descriptor.options.as_ref().is_some_and(|options| options.map_entry()))
    }

    fn entry_type(
        &self,
        message: &str,
        field: &FieldDescriptorProto,
        map_entry: &DescriptorProto,
        number: i32,
    ) -> Result<TypeSpec, PluginError> {
        let entry_field = map_entry
            .field
            .iter()
            .find(|candidate| candidate.number() == number)
            .ok_or_else(|| PluginError::Unsupported {
                field: format!("{message}.{}", field.name()),
                reason: format!("map entry has no field {number}"),
            })?;
        self.lower_type(message, entry_field)
    }

    fn lower_type(&self, message: &str, field: &FieldDescriptorProto) -> Result<TypeSpec, PluginError> {
        Ok(match field.r#type() {
            Type::Double | Type::Float => TypeSpec::Double,
            Type::Int32 | Type::Sint32 | Type::Sfixed32 => TypeSpec::I32,
            Type::Int64 | Type::Sint64 | Type::Sfixed64 | Type::Uint32 | Type::Fixed32 | Type::Uint64 | Type::Fixed64 => {
                TypeSpec::I64
            }
            Type::Bool => TypeSpec::Bool,
            Type::String => TypeSpec::String,
            Type::Bytes => TypeSpec::Binary,
            Type::Enum => TypeSpec::Enum(self.lower_enum(message, field)?),
            Type::Message => TypeSpec::structure(&self.lower_message(field.type_name())?),
            Type::Group => {
                return Err(PluginError::Unsupported {
                    field: format!("{message}.{}", field.name()),
                    reason: "groups have no Go field mapping".to_string(),
                });
            }
        })
    }

    fn lower_enum(&self, message: &str, field: &FieldDescriptorProto) -> Result<Rc<EnumSpec>, PluginError> {
        let full_name = field.type_name();
        if let Some(spec) = self.enum_specs.borrow().get(full_name) {
            return Ok(Rc::clone(spec));
        }
        let entry = self.enums.get(full_name).ok_or_else(|| PluginError::Unsupported {
            field: format!("{message}.{}", field.name()),
            reason: format!("unknown enum {full_name}"),
        })?;
        let spec = EnumSpec::new(entry.go_name.as_str(), entry.file);
        self.enum_specs
            .borrow_mut()
            .insert(full_name.to_string(), Rc::clone(&spec));
        Ok(spec)
    }
}

impl PackageNameResolver for DescriptorSchema<'_> {
    fn type_package_name(&self, idl_file: &str) -> Result<String, ResolveError> {
        self.packages
            .get(idl_file)
            .cloned()
            .ok_or_else(|| format!("no Go package known for {idl_file}").into())
    }
}

/// Go package name of a proto file
///
/// Taken from `go_package` (the part after `;`, else the last path element),
/// falling back to the last segment of the proto package, then the file stem.
fn go_package(file: &FileDescriptorProto) -> String {
    let go_package = file.options.as_ref().map(|options| options.go_package()).unwrap_or("");
    if !go_package.is_empty() {
        let name = match go_package.split_once(';') {
            Some((_, name)) => name,
            None => go_package.rsplit('/').next().unwrap_or(go_package),
        };
        return casing::package_name(name);
    }

    let package = file.package();
    if !package.is_empty() {
        return casing::package_name(package.rsplit('.').next().unwrap_or(package));
    }
    let base = file.name().rsplit('/').next().unwrap_or(file.name());
    casing::package_name(base.strip_suffix(".proto").unwrap_or(base))
}
