//! Schema object model.
//!
//! Objects and fields arrive in schema order and that order is preserved
//! all the way to the rendered output.

use serde::{Deserialize, Serialize};

/// The object model produced by the schema compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Output object types (Query, Mutation, User, ...).
    #[serde(default)]
    pub objects: Vec<Object>,
    /// Input object types.
    #[serde(default)]
    pub inputs: Vec<Object>,
}

impl Schema {
    /// Objects followed by inputs, in schema order.
    pub fn all_objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter().chain(self.inputs.iter())
    }

    /// Number of fields that need a resolver implementation.
    pub fn resolver_count(&self) -> usize {
        self.all_objects()
            .map(|o| o.resolver_fields().count())
            .sum()
    }
}

/// A schema object type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    /// Schema name of the object (e.g. `Mutation`).
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Object {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Whether the object exposes at least one field needing a resolver,
    /// and so needs a resolver container type.
    pub fn has_resolvers(&self) -> bool {
        self.fields.iter().any(|f| f.is_resolver)
    }

    /// Fields that need a resolver implementation, in schema order.
    pub fn resolver_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_resolver)
    }
}

/// A field of a schema object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Schema name of the field (e.g. `createUser`).
    pub name: String,
    /// Generated member name used for the implementing function.
    pub member_name: String,
    #[serde(default)]
    pub args: Vec<Arg>,
    /// Rust return type of the resolver, if it returns a value.
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub is_resolver: bool,
    #[serde(default)]
    pub position: Position,
}

impl Field {
    /// A resolver field declared in the given schema file.
    pub fn resolver(
        name: impl Into<String>,
        member_name: impl Into<String>,
        src: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            member_name: member_name.into(),
            args: Vec::new(),
            return_type: None,
            is_resolver: true,
            position: Position { src: src.into() },
        }
    }

    pub fn arg(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.args.push(Arg {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    /// Argument names in declaration order.
    pub fn arg_names(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|a| a.name.as_str())
    }
}

/// A resolver argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arg {
    pub name: String,
    /// Rust type of the argument as it appears in the generated signature.
    #[serde(rename = "type")]
    pub ty: String,
}

/// Where in the schema sources a field was declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Path of the schema file, as written in the schema configuration.
    pub src: String,
}
