use crate::alloc::ALLOC;
use crate::core::HelperDef;
use crate::cycles::CYCLES;
use crate::divmod::DIVMOD;
use crate::hash::HASH;
use crate::math::MATH;
use crate::string_pool::STRING_POOL;
use crate::strings;
use crate::threads::THREADS;
use crate::trycatch::TRYCATCH;
use dashmap::DashMap;

/// Lookup table over every statically-known helper (everything except the
/// per-type [`crate::collections`] templates, which are rendered on
/// demand). Mirrors the aggregate `HELPERS` dict of the reference
/// implementation's helper registry.
pub struct HelperRegistry {
    helpers: DashMap<&'static str, HelperDef>,
}

impl HelperRegistry {
    pub fn new() -> Self {
        let helpers = DashMap::new();
        for (name, def) in ALLOC
            .iter()
            .chain(DIVMOD.iter())
            .chain(HASH.iter())
            .chain(MATH.iter())
            .chain(TRYCATCH.iter())
            .chain(CYCLES.iter())
            .chain(STRING_POOL.iter())
            .chain(THREADS.iter())
            .copied()
            .chain(strings::all())
        {
            helpers.insert(name, def);
        }
        log::debug!("runtime: registered {} helper definitions", helpers.len());
        HelperRegistry { helpers }
    }

    pub fn get(&self, name: &str) -> Option<HelperDef> {
        self.helpers.get(name).map(|entry| *entry.value())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Resolves `names` plus their transitive `depends_on` closure into
    /// emission order (dependencies before dependents), deduplicated.
    pub fn resolve(&self, names: &[&str]) -> Vec<&'static str> {
        let mut order = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for name in names {
            self.resolve_one(name, &mut order, &mut seen);
        }
        log::debug!("runtime: resolved {} requested helpers to {} in emission order", names.len(), order.len());
        order
    }

    fn resolve_one(
        &self,
        name: &str,
        order: &mut Vec<&'static str>,
        seen: &mut std::collections::HashSet<&'static str>,
    ) {
        let Some(entry) = self.helpers.get(name) else { return };
        let key: &'static str = *entry.key();
        let deps = entry.value().depends_on;
        drop(entry);
        if seen.contains(key) {
            return;
        }
        seen.insert(key);
        for dep in deps {
            self.resolve_one(dep, order, seen);
        }
        order.push(key);
    }
}

impl Default for HelperRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_dependencies_before_dependents() {
        let reg = HelperRegistry::new();
        let order = reg.resolve(&["__sl_math_lcm"]);
        let gcd_pos = order.iter().position(|n| *n == "__sl_math_gcd").unwrap();
        let lcm_pos = order.iter().position(|n| *n == "__sl_math_lcm").unwrap();
        assert!(gcd_pos < lcm_pos);
    }

    #[test]
    fn resolve_dedupes_shared_dependencies() {
        let reg = HelperRegistry::new();
        let order = reg.resolve(&["__sl_mutex_val_get", "__sl_mutex_val_set"]);
        let count = order.iter().filter(|n| **n == "__sl_mutex_val_create").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn unknown_name_resolves_to_nothing() {
        let reg = HelperRegistry::new();
        assert!(reg.resolve(&["__sl_does_not_exist"]).is_empty());
        assert!(!reg.contains("__sl_does_not_exist"));
    }

    #[test]
    fn every_helper_source_uses_sl_prefix_not_the_original() {
        let reg = HelperRegistry::new();
        for name in reg.resolve(&[
            "__sl_safe_realloc",
            "__sl_div_int",
            "__sl_hash_str",
            "__sl_math_fibonacci",
            "__sl_throw",
            "__sl_collect_cycles",
            "__sl_str_track",
            "__sl_thread_join",
            "__sl_mutex_val_destroy",
        ]) {
            let def = reg.get(name).unwrap();
            assert!(!def.c_source.contains("btrc"));
        }
    }
}
