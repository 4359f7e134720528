// whole-system reduction into one bounded context
use tracing::{debug, info};

use crate::core::error::{MergeError, Result};
use crate::core::merger::ContextMerger;
use crate::core::name::normalize_system;
use crate::core::types::{BoundedContext, Module, SystemContext};

impl ContextMerger {
    /// Fold every module of `system` into one bounded context.
    ///
    /// Steps:
    /// 1) normalize all names in `system` (this rewrites the caller's value)
    /// 2) push a copy of every module, ordered by name, onto a stack
    /// 3) while more than one module is left: pop two, merge them (the first
    ///    popped names the result) and push the result back unless it is empty
    /// 4) the last module's entities become the bounded context
    ///
    /// The pop order is part of the result: merging is neither associative nor
    /// commutative, so the loop is strictly sequential.
    pub fn build(&self, system: &mut SystemContext) -> Result<BoundedContext> {
        normalize_system(system)?;

        let input_entities = system.entity_count();
        info!(
            system = %system.system_name,
            modules = system.modules.len(),
            entities = input_entities,
            "building bounded context"
        );

        let mut stack: Vec<Module> = system.modules.clone();
        stack.sort_by(|a, b| a.name.cmp(&b.name));

        while stack.len() > 1 {
            let (Some(one), Some(two)) = (stack.pop(), stack.pop()) else {
                return Err(MergeError::Convergence { modules_left: stack.len(), input_entities });
            };
            let merged = self.merge_modules(&one, &two)?;
            if merged.is_empty() {
                debug!(one = %one.name, two = %two.name, "dropping empty merge result");
                continue;
            }
            stack.push(merged);
        }

        let entities = match stack.pop() {
            Some(module) if !module.is_empty() => module.entities,
            _ if input_entities > 0 => {
                return Err(MergeError::Convergence { modules_left: 0, input_entities });
            }
            _ => Default::default(),
        };

        info!(system = %system.system_name, entities = entities.len(), "bounded context built");
        Ok(BoundedContext::new(system.system_name.clone(), entities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MergeConfig;
    use crate::core::types::{Entity, Field};
    use crate::similarity::Alignment;

    fn never(_: &Entity, _: &Entity) -> Alignment {
        Alignment::unaligned(0.0)
    }

    fn mk_module(name: &str, entities: &[&str]) -> Module {
        Module::new(name, entities.iter().map(|e| Entity::new(*e, vec![Field::new("id", "long")])))
    }

    fn names(context: &BoundedContext) -> Vec<String> {
        context.entities.iter().map(|e| e.name.to_string()).collect()
    }

    #[test]
    fn empty_modules_build_an_empty_context() {
        let merger = ContextMerger::with_oracle(MergeConfig::default(), never).unwrap();
        let mut system = SystemContext::new("sys", vec![mk_module("a", &[]), mk_module("b", &[]), mk_module("c", &[])]);

        let context = merger.build(&mut system).unwrap();
        assert_eq!(context.system_name, "sys");
        assert!(context.is_empty());
    }

    #[test]
    fn system_without_modules_builds_an_empty_context() {
        let merger = ContextMerger::new(MergeConfig::default()).unwrap();
        let mut system = SystemContext::new("sys", vec![]);
        assert!(merger.build(&mut system).unwrap().is_empty());
    }

    #[test]
    fn single_module_passes_through() {
        let merger = ContextMerger::with_oracle(MergeConfig::default(), never).unwrap();
        let mut system = SystemContext::new("sys", vec![mk_module("com.acme.orders", &["Order", "Line"])]);

        let context = merger.build(&mut system).unwrap();
        assert_eq!(names(&context), vec!["Line", "Order"]);
        assert_eq!(system.modules[0].name, "orders");
    }

    #[test]
    fn reduction_pops_in_reverse_name_order() {
        let merger = ContextMerger::with_oracle(MergeConfig::default(), never).unwrap();
        let mut system = SystemContext::new(
            "sys",
            vec![mk_module("b", &["y"]), mk_module("c", &["z"]), mk_module("a", &["x"])],
        );

        //stack [a, b, c]: c+b -> "c" {c::z, b::y}; then c+a -> "c"
        let context = merger.build(&mut system).unwrap();
        assert_eq!(names(&context), vec!["a::x", "c::b::y", "c::c::z"]);
    }

    #[test]
    fn empty_modules_do_not_disturb_the_fold() {
        let merger = ContextMerger::with_oracle(MergeConfig::default(), never).unwrap();
        let mut system = SystemContext::new(
            "sys",
            vec![mk_module("a", &["x"]), mk_module("b", &[]), mk_module("c", &[])],
        );

        //c+b is empty and dropped, leaving only a
        let context = merger.build(&mut system).unwrap();
        assert_eq!(names(&context), vec!["x"]);
    }
}
