//! Detection of expect candidates coming from several modules.

use crate::compatibility::CompatibilityMap;
use mpp_model::{DeclId, DeclarationStore, ModuleId};
use smallvec::SmallVec;

/// Compatible or weakly incompatible candidates spread over more than one
/// module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmbiguousExpects {
    /// Distinct owning modules, sorted by module name.
    pub modules: SmallVec<[ModuleId; 2]>,
    /// The candidates that contributed, in verdict-map order.
    pub candidates: Vec<DeclId>,
}

impl AmbiguousExpects {
    pub fn module_names(&self, store: &DeclarationStore) -> Vec<String> {
        self.modules
            .iter()
            .map(|&module| store.module_name(module).to_string())
            .collect()
    }
}

/// `Some` when the compatible-or-weak candidates in `map` are owned by two or
/// more distinct modules.
pub fn find_ambiguous_expects(
    store: &DeclarationStore,
    map: &CompatibilityMap,
) -> Option<AmbiguousExpects> {
    let candidates: Vec<DeclId> = map
        .iter()
        .filter(|(verdict, _)| verdict.is_compatible_or_weak())
        .flat_map(|(_, decls)| decls.iter().copied())
        .collect();

    let mut modules: SmallVec<[ModuleId; 2]> = candidates
        .iter()
        .map(|&candidate| store.decl(candidate).module)
        .collect();
    modules.sort_by(|&a, &b| {
        store
            .module_name(a)
            .cmp(store.module_name(b))
            .then(a.cmp(&b))
    });
    modules.dedup();

    (modules.len() > 1).then_some(AmbiguousExpects {
        modules,
        candidates,
    })
}
