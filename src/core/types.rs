// value types for the system model and the merged result
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::name::QualifiedName;

pub type FieldMap = BTreeMap<Field, Field>;

// insert `value`, re-qualifying it until it no longer equals a member;
// false when `value` went in unchanged
pub(crate) fn insert_distinct<T: Ord>(set: &mut BTreeSet<T>, mut value: T, requalify: impl Fn(&T) -> T) -> bool {
    let mut renamed = false;
    while set.contains(&value) {
        value = requalify(&value);
        renamed = true;
    }
    set.insert(value);
    renamed
}

//carried through merges, never inspected
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub name: String,
    #[serde(default, rename = "stringValue")]
    pub value: String,
    #[serde(default)]
    pub ordinal: u32,
}

impl Annotation {
    pub fn new(name: impl Into<String>, value: impl Into<String>, ordinal: u32) -> Self {
        Self { name: name.into(), value: value.into(), ordinal }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: QualifiedName,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub is_collection: bool,
    //the type token names another entity
    #[serde(default)]
    pub is_reference: bool,
    #[serde(default)]
    pub annotations: BTreeSet<Annotation>,
}

impl Field {
    pub fn new(name: impl Into<QualifiedName>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            is_collection: false,
            is_reference: false,
            annotations: BTreeSet::new(),
        }
    }

    pub fn reference(name: impl Into<QualifiedName>, target: impl Into<String>) -> Self {
        Self { is_reference: true, ..Self::new(name, target) }
    }

    pub fn collection(mut self) -> Self {
        self.is_collection = true;
        self
    }

    pub fn with_annotations(mut self, annotations: impl IntoIterator<Item = Annotation>) -> Self {
        self.annotations.extend(annotations);
        self
    }

    pub fn qualified_by(&self, owner: &QualifiedName) -> Field {
        Field { name: self.name.qualified(owner), ..self.clone() }
    }
}

/// Identity is structural: two entities with the same name and fields are the
/// same entity for matching and set membership.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(rename = "entityName")]
    pub name: QualifiedName,
    #[serde(default)]
    pub fields: BTreeSet<Field>,
}

impl Entity {
    pub fn new(name: impl Into<QualifiedName>, fields: impl IntoIterator<Item = Field>) -> Self {
        Self { name: name.into(), fields: fields.into_iter().collect() }
    }

    pub fn qualified_by(&self, module: &str) -> Entity {
        Entity { name: self.name.qualified_by_str(module), fields: self.fields.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub entities: BTreeSet<Entity>,
}

impl Module {
    pub fn new(name: impl Into<String>, entities: impl IntoIterator<Item = Entity>) -> Self {
        Self { name: name.into(), entities: entities.into_iter().collect() }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemContext {
    pub system_name: String,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl SystemContext {
    pub fn new(system_name: impl Into<String>, modules: impl IntoIterator<Item = Module>) -> Self {
        Self { system_name: system_name.into(), modules: modules.into_iter().collect() }
    }

    pub fn entity_count(&self) -> usize {
        self.modules.iter().map(|m| m.entities.len()).sum()
    }
}

/// Result of a build. An empty entity set stands for "no entities at all".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundedContext {
    pub system_name: String,
    #[serde(default)]
    pub entities: BTreeSet<Entity>,
}

impl BoundedContext {
    pub fn new(system_name: impl Into<String>, entities: BTreeSet<Entity>) -> Self {
        Self { system_name: system_name.into(), entities }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name.to_string() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_copies_leave_the_source_alone() {
        let field = Field::reference("owner", "Person").with_annotations([Annotation::new("ManyToOne", "", 1)]);
        let dog = Entity::new("dog", vec![field.clone()]);

        let copy = dog.qualified_by("pets");
        assert_eq!(copy.name.to_string(), "pets::dog");
        assert_eq!(copy.fields, dog.fields);
        assert_eq!(dog.name.to_string(), "dog");

        let renamed = field.qualified_by(&dog.name);
        assert_eq!(renamed.name.to_string(), "dog::owner");
        assert!(renamed.is_reference);
        assert_eq!(renamed.annotations, field.annotations);
        assert_eq!(field.name.to_string(), "owner");
    }

    #[test]
    fn entities_compare_by_value() {
        let a = Entity::new("Person", vec![Field::new("name", "string")]);
        let b = Entity::new("Person", vec![Field::new("name", "string")]);
        let module = Module::new("people", vec![a.clone(), b]);
        assert_eq!(module.entities.len(), 1);
        assert!(module.entities.contains(&a));
    }

    #[test]
    fn insert_distinct_requalifies_until_unique() {
        let owner = QualifiedName::simple("Person");
        let mut fields = BTreeSet::from([Field::new("Person::id", "int"), Field::new("Person::Person::id", "int")]);

        let renamed = insert_distinct(&mut fields, Field::new("Person::id", "int"), |f| f.qualified_by(&owner));
        assert!(renamed);
        assert_eq!(fields.len(), 3);
        assert!(fields.contains(&Field::new("Person::Person::Person::id", "int")));
        assert!(fields.iter().any(|f| f.name.segments() == ["Person", "Person", "Person", "id"]));

        assert!(!insert_distinct(&mut fields, Field::new("id", "int"), |f| f.qualified_by(&owner)));
        assert_eq!(fields.len(), 4);
    }
}
