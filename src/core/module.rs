// merging two modules into one
use tracing::debug;

use crate::core::entity::merge_entities;
use crate::core::error::Result;
use crate::core::matcher::{match_entities, EntityMatch};
use crate::core::merger::ContextMerger;
use crate::core::types::{insert_distinct, Entity, Module};

impl ContextMerger {
    pub fn match_modules<'a>(&self, one: &'a Module, two: &'a Module) -> EntityMatch<'a> {
        match_entities(one, two, self.config.cutoff, self.oracle.as_ref())
    }

    /// Merge `two` into a fresh module named after `one`. A bad field mapping
    /// from the oracle fails the whole merge.
    pub fn merge_modules(&self, one: &Module, two: &Module) -> Result<Module> {
        let EntityMatch { distinct, records } = self.match_modules(one, two);
        let matched = records.len();

        let mut entities = distinct;
        let own = |e: &Entity| e.qualified_by(&one.name);
        for record in records {
            let merged = merge_entities(record.entity, record.similar_entity, record.field_map.as_ref())?;
            insert_distinct(&mut entities, merged, own);
        }

        debug!(
            one = %one.name,
            two = %two.name,
            matched,
            entities = entities.len(),
            "merged modules"
        );
        Ok(Module { name: one.name.clone(), entities })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MergeConfig;
    use crate::core::error::MergeError;
    use crate::core::types::{Field, FieldMap};
    use crate::similarity::Alignment;

    fn mk_entity(name: &str, fields: &[(&str, &str)]) -> Entity {
        Entity::new(name, fields.iter().map(|(ty, n)| Field::new(*n, *ty)))
    }

    //every pair matches with a by-name field alignment
    fn by_field_name(a: &Entity, b: &Entity) -> Alignment {
        let mapping: FieldMap = a
            .fields
            .iter()
            .filter_map(|fa| b.fields.iter().find(|fb| fb.name == fa.name).map(|fb| (fa.clone(), fb.clone())))
            .collect();
        Alignment::new(0.95, Some(mapping))
    }

    #[test]
    fn merged_module_is_named_after_the_first() {
        let merger = ContextMerger::with_oracle(MergeConfig::default(), by_field_name).unwrap();
        let one = Module::new("pets", vec![mk_entity("dog", &[("string", "breed")])]);
        let two = Module::new("animals", vec![mk_entity("cat", &[("string", "breed")])]);

        let merged = merger.merge_modules(&one, &two).unwrap();

        assert_eq!(merged.name, "pets");
        assert_eq!(merged.entities.len(), 1);
        assert_eq!(merged.entities.iter().next().unwrap(), &mk_entity("dog", &[("string", "breed")]));
        assert_eq!(one.entities.len(), 1);
        assert_eq!(two.entities.len(), 1);
    }

    #[test]
    fn bad_oracle_mapping_fails_the_merge() {
        let liar = |a: &Entity, _: &Entity| {
            let ghost = Field::new("ghost", "int");
            let mapping = a.fields.iter().map(|f| (f.clone(), ghost.clone())).collect();
            Alignment::new(0.99, Some(mapping))
        };
        let merger = ContextMerger::with_oracle(MergeConfig::default(), liar).unwrap();
        let one = Module::new("a", vec![mk_entity("x", &[("int", "id")])]);
        let two = Module::new("b", vec![mk_entity("y", &[("int", "id")])]);

        let err = merger.merge_modules(&one, &two).unwrap_err();
        assert!(matches!(err, MergeError::UnknownMappingTarget { .. }));
    }

    #[test]
    fn unmatched_entities_are_qualified_by_module() {
        let merger = ContextMerger::new(MergeConfig::default()).unwrap();
        let one = Module::new("one", vec![mk_entity("car", &[])]);
        let two = Module::new("two", vec![mk_entity("dog", &[])]);

        let merged = merger.merge_modules(&one, &two).unwrap();
        let names: Vec<String> = merged.entities.iter().map(|e| e.name.to_string()).collect();
        assert_eq!(names, vec!["one::car", "two::dog"]);
    }
}
