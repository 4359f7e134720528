// entity merging driven by a field mapping
use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::core::error::{MergeError, Result};
use crate::core::field::merge_fields;
use crate::core::types::{insert_distinct, Entity, Field, FieldMap};

//every key owned by `one`, every target owned by `two`, no target hit twice
fn validate_mapping(one: &Entity, two: &Entity, mapping: &FieldMap) -> Result<()> {
    let mut targets: BTreeSet<&Field> = BTreeSet::new();
    for (key, target) in mapping {
        if !one.fields.contains(key) {
            return Err(MergeError::UnknownMappingKey { entity: one.name.clone(), field: key.name.clone() });
        }
        if !two.fields.contains(target) {
            return Err(MergeError::UnknownMappingTarget { entity: two.name.clone(), field: target.name.clone() });
        }
        if !targets.insert(target) {
            return Err(MergeError::NonInjectiveMapping { target: target.name.clone() });
        }
    }
    Ok(())
}

/// Merge `two` into `one` using `field_mapping` (absent means pure union).
///
/// The mapping is validated in full before anything is built. Unmapped fields
/// of either side are copied as `<owner>::<field>`; mapped pairs collapse into
/// one [`merge_fields`] result, except two divergent references, which are
/// both kept. The result is named after `one`.
pub fn merge_entities(one: &Entity, two: &Entity, field_mapping: Option<&FieldMap>) -> Result<Entity> {
    let empty = FieldMap::new();
    let mapping = field_mapping.unwrap_or(&empty);

    if let Err(err) = validate_mapping(one, two, mapping) {
        warn!(one = %one.name, two = %two.name, %err, "rejected field mapping");
        return Err(err);
    }

    //same-named owners produce equal copies, so every insert goes through
    //insert_distinct and nests the owner again on a clash
    let mut fields = BTreeSet::new();
    let mut consumed: BTreeSet<&Field> = BTreeSet::new();
    let mut renamed = 0usize;
    let own_one = |f: &Field| f.qualified_by(&one.name);
    let own_two = |f: &Field| f.qualified_by(&two.name);

    for f1 in &one.fields {
        match mapping.get(f1) {
            None => renamed += usize::from(insert_distinct(&mut fields, own_one(f1), own_one)),
            Some(f2) => {
                consumed.insert(f2);
                if f1.is_reference && f2.is_reference && f1 != f2 {
                    renamed += usize::from(insert_distinct(&mut fields, f1.clone(), own_one));
                    renamed += usize::from(insert_distinct(&mut fields, own_two(f2), own_two));
                } else {
                    renamed += usize::from(insert_distinct(&mut fields, merge_fields(f1, f2), own_one));
                }
            }
        }
    }

    //leftovers of `two`
    for f2 in two.fields.iter().filter(|f| !consumed.contains(f)) {
        renamed += usize::from(insert_distinct(&mut fields, own_two(f2), own_two));
    }

    if renamed > 0 {
        debug!(one = %one.name, two = %two.name, renamed, "nested owner on clashing field copies");
    }
    Ok(Entity { name: one.name.clone(), fields })
}
