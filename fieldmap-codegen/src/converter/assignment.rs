//! Single-field assignments and deferred parent allocation

use std::collections::BTreeMap;

/// Conversion applied to the source expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Cast {
    /// `T(x)`, required to required
    Value(String),
    /// `(*T)(&(x))`, required to optional
    AddressOf(String),
    /// `*(x)`, optional to required
    Deref,
    /// `(*T)(x)`, optional to optional
    Pointer(String),
    /// `T(x)` for slice types, where nil is a usable value
    Slice(String),
}

impl Cast {
    pub(super) fn for_presence(type_name: &str, from_required: bool, to_required: bool) -> Self {
        let type_name = type_name.to_string();
        match (from_required, to_required) {
            (true, true) => Cast::Value(type_name),
            (true, false) => Cast::AddressOf(type_name),
            (false, true) => Cast::Deref,
            (false, false) => Cast::Pointer(type_name),
        }
    }

    pub(super) fn apply(&self, expr: &str) -> String {
        match self {
            Cast::Value(ty) | Cast::Slice(ty) => format!("{ty}({expr})"),
            Cast::AddressOf(ty) => format!("(*{ty})(&({expr}))"),
            Cast::Deref => format!("*({expr})"),
            Cast::Pointer(ty) => format!("(*{ty})({expr})"),
        }
    }

    fn nil_safe(&self) -> bool {
        matches!(self, Cast::Slice(_))
    }
}

/// `out.X = cast(in.Y)` with the nil checks its source path needs
#[derive(Debug)]
pub(super) struct FieldAssignment<'a> {
    pub from_identifier: &'a str,
    pub from_required: bool,
    pub to_identifier: &'a str,
    pub to_required: bool,
    pub cast: Cast,
    /// Guard on the source itself even when presence would not require it
    pub extra_nil_check: bool,
}

impl FieldAssignment<'_> {
    /// A copy between differently named paths, or from outside `in`
    fn is_transform(&self) -> bool {
        match (
            self.from_identifier.strip_prefix("in."),
            self.to_identifier.strip_prefix("out."),
        ) {
            (Some(from), Some(to)) => from != to,
            _ => true,
        }
    }

    pub(super) fn render(&self, indent: &str, parents: &DeferredParents, helper_scopes: &[String]) -> Vec<String> {
        let mut lines = Vec::new();
        let value = self.cast.apply(self.from_identifier);
        let inner = format!("{indent}\t");

        if !self.is_transform() {
            let deref_needs_guard = !self.from_required && self.to_required && !self.cast.nil_safe();
            if self.extra_nil_check || deref_needs_guard {
                lines.push(format!("{indent}if {} != nil {{", self.from_identifier));
                lines.extend(parents.guards(&inner, self.to_identifier, helper_scopes));
                lines.push(format!("{inner}{} = {value}", self.to_identifier));
                lines.push(format!("{indent}}}"));
            } else {
                lines.extend(parents.guards(indent, self.to_identifier, helper_scopes));
                lines.push(format!("{indent}{} = {value}", self.to_identifier));
            }
            return lines;
        }

        let mut checks = nil_checks(self.from_identifier);
        if !self.extra_nil_check {
            // A null leaf is harmless unless it would be dereferenced.
            if self.from_required || !self.to_required || self.cast.nil_safe() {
                checks.pop();
            }
            if checks.is_empty() {
                lines.extend(parents.guards(indent, self.to_identifier, helper_scopes));
                lines.push(format!("{indent}{} = {value}", self.to_identifier));
                return lines;
            }
        }

        lines.push(format!("{indent}if {} {{", checks.join(" && ")));
        lines.extend(parents.guards(&inner, self.to_identifier, helper_scopes));
        lines.push(format!("{inner}{} = {value}", self.to_identifier));
        lines.push(format!("{indent}}}"));
        lines
    }
}

/// Every prefix of a dotted identifier: `a.b.c` gives `a`, `a.b`, `a.b.c`
pub(crate) fn middle_identifiers(identifier: &str) -> Vec<String> {
    let mut middles = Vec::new();
    let mut current = String::new();
    for segment in identifier.split('.') {
        if !current.is_empty() {
            current.push('.');
        }
        current.push_str(segment);
        middles.push(current.clone());
    }
    middles
}

/// `x != nil` for every prefix below the root
///
/// Indexed prefixes (`in.A[index1]`) are container elements the enclosing
/// loop has already checked.
fn nil_checks(identifier: &str) -> Vec<String> {
    middle_identifiers(identifier)
        .into_iter()
        .skip(1)
        .filter(|middle| !middle.ends_with(']'))
        .map(|middle| format!("{middle} != nil"))
        .collect()
}

/// Optional target structs whose allocation waits for the first write below them
///
/// Keys are `out.`-rooted identifiers as seen from the top-level record.
#[derive(Debug, Default)]
pub(super) struct DeferredParents {
    entries: BTreeMap<String, String>,
}

impl DeferredParents {
    pub(super) fn insert(&mut self, identifier: String, type_name: String) {
        tracing::trace!(parent = %identifier, "deferring optional struct allocation");
        self.entries.insert(identifier, type_name);
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Allocation blocks for the deferred ancestors of `to_identifier`
    ///
    /// `to_identifier` is relative to the innermost helper in `helper_scopes`.
    /// Ancestors inside that helper are rendered through its `out`; ancestors
    /// above it through `outOriginal`.
    pub(super) fn guards(&self, indent: &str, to_identifier: &str, helper_scopes: &[String]) -> Vec<String> {
        let relative = to_identifier.strip_prefix("out.").unwrap_or(to_identifier);
        let scope = if helper_scopes.is_empty() {
            "out".to_string()
        } else {
            format!("out.{}", helper_scopes.join("."))
        };
        let complete = format!("{scope}.{relative}");

        let mut lines = Vec::new();
        for (parent, type_name) in &self.entries {
            if !is_ancestor(parent, &complete) {
                continue;
            }
            let rendered = if helper_scopes.is_empty() {
                parent.clone()
            } else if let Some(inside) = parent.strip_prefix(&scope).filter(|rest| rest.starts_with('.')) {
                format!("out{inside}")
            } else {
                format!("outOriginal{}", &parent["out".len()..])
            };
            lines.push(format!("{indent}if {rendered} == nil {{"));
            lines.push(format!("{indent}\t{rendered} = &{type_name}{{}}"));
            lines.push(format!("{indent}}}"));
        }
        lines
    }
}

fn is_ancestor(parent: &str, identifier: &str) -> bool {
    identifier
        .strip_prefix(parent)
        .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('['))
}
