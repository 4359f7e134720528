// entity matching between two modules
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::core::types::{insert_distinct, Entity, FieldMap, Module};
use crate::similarity::{Alignment, SimilarityOracle};

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityRecord<'a> {
    pub entity: &'a Entity,
    pub similar_entity: &'a Entity,
    pub field_map: Option<FieldMap>,
    pub score: f64,
}

/// Partition of the entities of two modules. An entity of the second module is
/// either named by at least one record or present in `distinct`, never both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMatch<'a> {
    pub distinct: BTreeSet<Entity>,
    pub records: Vec<SimilarityRecord<'a>>,
}

impl EntityMatch<'_> {
    pub fn is_merged(&self, entity: &Entity) -> bool {
        self.records.iter().any(|r| r.similar_entity == entity || r.entity == entity)
    }
}

//NaN never wins
fn rank(score: f64) -> f64 {
    if score.is_nan() { f64::NEG_INFINITY } else { score }
}

//first in set order wins ties
fn find_most_similar<'a>(
    entity: &Entity,
    module: &'a Module,
    oracle: &dyn SimilarityOracle,
) -> Option<(&'a Entity, Alignment)> {
    let mut best: Option<(&'a Entity, Alignment)> = None;
    for candidate in &module.entities {
        let alignment = oracle.score_and_align(entity, candidate);
        if best.as_ref().is_none_or(|(_, b)| rank(alignment.score) > rank(b.score)) {
            best = Some((candidate, alignment));
        }
    }
    best
}

/// Match every entity of `module_a` against `module_b`, calling the oracle
/// once per pair. Only scores strictly above `cutoff` produce a record.
pub fn match_entities<'a>(
    module_a: &'a Module,
    module_b: &'a Module,
    cutoff: f64,
    oracle: &dyn SimilarityOracle,
) -> EntityMatch<'a> {
    let mut distinct = BTreeSet::new();
    let mut records = Vec::new();
    let mut claimed: BTreeMap<&'a Entity, usize> = BTreeMap::new();

    for a in &module_a.entities {
        match find_most_similar(a, module_b, oracle) {
            Some((b, alignment)) if alignment.score > cutoff => {
                debug!(a = %a.name, b = %b.name, score = alignment.score, "entities matched");
                *claimed.entry(b).or_default() += 1;
                records.push(SimilarityRecord {
                    entity: a,
                    similar_entity: b,
                    field_map: alignment.field_map,
                    score: alignment.score,
                });
            }
            Some((b, alignment)) => {
                debug!(a = %a.name, best = %b.name, score = alignment.score, cutoff, "below cutoff, kept distinct");
                let own_a = |e: &Entity| e.qualified_by(&module_a.name);
                insert_distinct(&mut distinct, own_a(a), own_a);
            }
            None => {
                distinct.insert(a.clone());
            }
        }
    }

    for (b, count) in claimed.iter().filter(|(_, count)| **count > 1) {
        warn!(entity = %b.name, module = %module_b.name, count, "entity is the best match of several entities");
    }

    //same-named modules qualify alike, nest the owner again on a clash
    let own_b = |e: &Entity| e.qualified_by(&module_b.name);
    for b in module_b.entities.iter().filter(|b| !claimed.contains_key(b)) {
        insert_distinct(&mut distinct, own_b(b), own_b);
    }

    EntityMatch { distinct, records }
}
