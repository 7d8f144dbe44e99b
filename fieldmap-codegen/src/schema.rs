//! IDL schema model
//!
//! A read-only description of the records the generators walk. Struct types
//! are shared through `Rc` so a struct may reference itself, directly or via
//! other structs. Build a recursive struct with [`StructSpec::new`] and attach
//! its fields afterwards with [`StructSpec::set_fields`].
//!
//! A cyclic schema keeps itself alive once built; schemas live for a single
//! generation run.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Key/value annotations attached to a field
pub type Annotations = BTreeMap<String, String>;

/// Ordered fields of a record
pub type FieldGroup = Vec<Rc<FieldSpec>>;

/// A field type
#[derive(Debug, Clone)]
pub enum TypeSpec {
    /// `bool`
    Bool,
    /// `int8`, emitted as Go `int8`
    I8,
    /// `int16`
    I16,
    /// `int32`
    I32,
    /// `int64`
    I64,
    /// `float64`
    Double,
    /// `string`
    String,
    /// `[]byte`
    Binary,
    /// Named enum
    Enum(Rc<EnumSpec>),
    /// Named alias of another type
    Typedef(Rc<TypedefSpec>),
    /// Named record
    Struct(Rc<StructSpec>),
    /// Ordered list
    List(Box<TypeSpec>),
    /// Unordered set with its Go representation hint
    Set(Box<TypeSpec>, SetHint),
    /// Key/value map
    Map(Box<TypeSpec>, Box<TypeSpec>),
}

impl TypeSpec {
    /// Wrap a struct spec
    pub fn structure(spec: &Rc<StructSpec>) -> Self {
        TypeSpec::Struct(Rc::clone(spec))
    }

    /// List of `elem`
    pub fn list(elem: TypeSpec) -> Self {
        TypeSpec::List(Box::new(elem))
    }

    /// Map-backed set of `elem`
    pub fn set(elem: TypeSpec) -> Self {
        TypeSpec::Set(Box::new(elem), SetHint::Map)
    }

    /// Map from `key` to `value`
    pub fn map(key: TypeSpec, value: TypeSpec) -> Self {
        TypeSpec::Map(Box::new(key), Box::new(value))
    }

    /// The underlying type with every typedef layer removed
    pub fn root(&self) -> &TypeSpec {
        let mut current = self;
        while let TypeSpec::Typedef(typedef) = current {
            current = &typedef.target;
        }
        current
    }

    /// The struct behind this type, looking through typedefs
    pub fn as_struct(&self) -> Option<&Rc<StructSpec>> {
        match self.root() {
            TypeSpec::Struct(spec) => Some(spec),
            _ => None,
        }
    }

    /// IDL-level name of the type
    pub fn name(&self) -> String {
        match self {
            TypeSpec::Bool => "bool".to_string(),
            TypeSpec::I8 => "byte".to_string(),
            TypeSpec::I16 => "i16".to_string(),
            TypeSpec::I32 => "i32".to_string(),
            TypeSpec::I64 => "i64".to_string(),
            TypeSpec::Double => "double".to_string(),
            TypeSpec::String => "string".to_string(),
            TypeSpec::Binary => "binary".to_string(),
            TypeSpec::Enum(spec) => spec.name.clone(),
            TypeSpec::Typedef(spec) => spec.name.clone(),
            TypeSpec::Struct(spec) => spec.name.clone(),
            TypeSpec::List(elem) => format!("list<{}>", elem.name()),
            TypeSpec::Set(elem, _) => format!("set<{}>", elem.name()),
            TypeSpec::Map(key, value) => format!("map<{}, {}>", key.name(), value.name()),
        }
    }

    /// IDL file declaring a named type
    pub fn file(&self) -> Option<&str> {
        match self {
            TypeSpec::Enum(spec) => Some(&spec.file),
            TypeSpec::Typedef(spec) => Some(&spec.file),
            TypeSpec::Struct(spec) => Some(&spec.file),
            _ => None,
        }
    }
}

/// Go representation of a set
///
/// Schemas carrying `go.type = "slice"` on a set type are built with
/// [`SetHint::Slice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetHint {
    /// `map[E]struct{}`, used when the element is hashable
    #[default]
    Map,
    /// `[]E`
    Slice,
}

/// A named enum
#[derive(Debug)]
pub struct EnumSpec {
    /// Enum name
    pub name: String,
    /// Declaring IDL file
    pub file: String,
}

impl EnumSpec {
    /// Create an enum declared in `file`
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            file: file.into(),
        })
    }
}

/// A named alias
#[derive(Debug)]
pub struct TypedefSpec {
    /// Alias name
    pub name: String,
    /// Declaring IDL file
    pub file: String,
    /// Aliased type
    pub target: TypeSpec,
}

impl TypedefSpec {
    /// Create a typedef of `target` declared in `file`
    pub fn new(name: impl Into<String>, file: impl Into<String>, target: TypeSpec) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            file: file.into(),
            target,
        })
    }
}

/// A named record
pub struct StructSpec {
    /// Struct name
    pub name: String,
    /// Declaring IDL file
    pub file: String,
    fields: OnceCell<FieldGroup>,
}

impl StructSpec {
    /// Create a struct whose fields are attached later
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            file: file.into(),
            fields: OnceCell::new(),
        })
    }

    /// Create a struct with its fields
    pub fn with_fields(name: impl Into<String>, file: impl Into<String>, fields: FieldGroup) -> Rc<Self> {
        let spec = Self::new(name, file);
        // A freshly created cell is always empty.
        let _ = spec.fields.set(fields);
        spec
    }

    /// Attach fields; returns them back if the struct already has fields
    pub fn set_fields(&self, fields: FieldGroup) -> std::result::Result<(), FieldGroup> {
        self.fields.set(fields)
    }

    /// Fields of the struct, empty until attached
    pub fn fields(&self) -> &[Rc<FieldSpec>] {
        self.fields.get().map(Vec::as_slice).unwrap_or(&[])
    }
}

// Field types may point back at this struct, so only field names are shown.
impl fmt::Debug for StructSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructSpec")
            .field("name", &self.name)
            .field("file", &self.file)
            .field("fields", &self.fields().iter().map(|field| field.name.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

/// A record field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Field name as written in the IDL
    pub name: String,
    /// Whether the field is required
    pub required: bool,
    /// Field type
    pub ty: TypeSpec,
    /// Field annotations
    pub annotations: Annotations,
}

impl FieldSpec {
    /// Create a field without annotations
    pub fn new(name: impl Into<String>, required: bool, ty: TypeSpec) -> Self {
        Self {
            name: name.into(),
            required,
            ty,
            annotations: Annotations::new(),
        }
    }

    /// Add an annotation
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }
}
