use serde_derive::{Deserialize, Serialize};

/* A leaf property: a named value of a primitive or previously declared type */
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct LeafProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/* One alternative of an inline union */
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct PropertyCase {
    #[serde(default)]
    pub properties: Vec<Property>,
}

/* An unnamed union nested inside a record or inside another union case */
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct InlineUnion {
    pub cases: Vec<PropertyCase>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(untagged)]
#[serde(expecting = "expected a leaf property {name, type} or an inline union {cases}")]
pub enum Property {
    Leaf(LeafProperty),
    Union(InlineUnion),
}

impl Property {
    pub fn leaf(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Property::Leaf(LeafProperty {
            name: name.into(),
            type_name: type_name.into(),
        })
    }

    pub fn union(cases: Vec<Vec<Property>>) -> Self {
        Property::Union(InlineUnion {
            cases: cases
                .into_iter()
                .map(|properties| PropertyCase { properties })
                .collect(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct RecordType {
    pub name: String,
    pub properties: Vec<Property>,
}

/* A named case of a top-level union type */
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct UnionCase {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct UnionType {
    pub name: String,
    pub cases: Vec<UnionCase>,
}

/// A top-level declaration. Records are tried first, so a declaration
/// carrying `properties` is always a record.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(untagged)]
#[serde(expecting = "expected a record {name, properties} or a union {name, cases}")]
pub enum TypeDef {
    Record(RecordType),
    Union(UnionType),
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Record(record) => &record.name,
            TypeDef::Union(union) => &union.name,
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self, TypeDef::Union(_))
    }
}

/* The whole input: type declarations in dependency order */
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct SchemaDocument {
    pub types: Vec<TypeDef>,
}
