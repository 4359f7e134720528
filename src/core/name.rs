// qualified names + the one-shot name normalization pass
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{MergeError, Result};
use crate::core::types::{Entity, Field, Module, SystemContext};

pub const SEPARATOR: &str = "::";

/// Name as segments, outermost owner first: `Person::ethnicity` is
/// `["Person", "ethnicity"]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    pub fn simple(name: impl Into<String>) -> Self {
        Self { segments: vec![name.into()] }
    }

    pub fn qualified(&self, owner: &QualifiedName) -> Self {
        let mut segments = owner.segments.clone();
        segments.extend(self.segments.iter().cloned());
        Self { segments }
    }

    pub fn qualified_by_str(&self, owner: &str) -> Self {
        self.qualified(&QualifiedName::simple(owner))
    }

    //last segment, i.e. the name without any owner
    pub fn base(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_qualified(&self) -> bool {
        self.segments.len() > 1
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(SEPARATOR))
    }
}

impl From<String> for QualifiedName {
    fn from(value: String) -> Self {
        Self { segments: value.split(SEPARATOR).map(str::to_string).collect() }
    }
}

impl From<&str> for QualifiedName {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<QualifiedName> for String {
    fn from(value: QualifiedName) -> Self {
        value.to_string()
    }
}

/// Last run of ASCII alphanumerics in `name`, e.g. `com.acme.Person` -> `Person`.
/// `None` when the name holds no alphanumeric character at all.
pub fn base_token(name: &str) -> Option<&str> {
    name.rsplit(|c: char| !c.is_ascii_alphanumeric()).find(|token| !token.is_empty())
}

fn normalized(name: &str, what: &str) -> Result<String> {
    base_token(name)
        .map(str::to_string)
        .ok_or_else(|| MergeError::validation(format!("{what} name `{name}` has no alphanumeric token")))
}

fn normalize_field(field: &Field) -> Result<Field> {
    Ok(Field {
        name: QualifiedName::simple(normalized(&field.name.to_string(), "field")?),
        ..field.clone()
    })
}

// normalize every item; items whose normalized forms coincide fall back to
// `keep_name` so none of them is lost in the set
fn normalize_set<T: Ord>(
    items: &BTreeSet<T>,
    normalize: impl Fn(&T) -> Result<T>,
    keep_name: impl Fn(&T, T) -> T,
) -> Result<BTreeSet<T>> {
    let pairs = items.iter().map(|item| Ok((item, normalize(item)?))).collect::<Result<Vec<_>>>()?;
    let mut seen: BTreeMap<&T, usize> = BTreeMap::new();
    for (_, norm) in &pairs {
        *seen.entry(norm).or_default() += 1;
    }
    let clashing: BTreeSet<usize> =
        pairs.iter().enumerate().filter(|(_, (_, norm))| seen[norm] > 1).map(|(i, _)| i).collect();

    Ok(pairs
        .into_iter()
        .enumerate()
        .map(|(i, (item, norm))| if clashing.contains(&i) { keep_name(item, norm) } else { norm })
        .collect())
}

fn normalize_entity(entity: &Entity) -> Result<Entity> {
    let fields = normalize_set(&entity.fields, normalize_field, |original, _| original.clone())?;
    if fields.len() < entity.fields.len() {
        return Err(MergeError::validation(format!("fields of entity `{}` collide after normalization", entity.name)));
    }
    Ok(Entity {
        name: QualifiedName::simple(normalized(&entity.name.to_string(), "entity")?),
        fields,
    })
}

fn normalize_module(module: &Module) -> Result<Module> {
    let entities = normalize_set(&module.entities, normalize_entity, |original, norm| Entity {
        name: original.name.clone(),
        ..norm
    })?;
    Ok(Module { name: normalized(&module.name, "module")?, entities })
}

/// Replace every module, entity and field name in `system` with its base token.
///
/// Types, flags and annotations are left alone. Fields (or entities) that would
/// become equal keep their original names. Either every name is rewritten or,
/// on the first name without a token, nothing is.
pub fn normalize_system(system: &mut SystemContext) -> Result<()> {
    let modules = system.modules.iter().map(normalize_module).collect::<Result<Vec<_>>>()?;
    debug!(system = %system.system_name, modules = modules.len(), "normalized names");
    system.modules = modules;
    Ok(())
}
