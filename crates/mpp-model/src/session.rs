//! Per-module view of the store.
//!
//! A `Session` answers the symbol lookups the matcher needs from the point of
//! view of one module: its own declarations plus everything reachable through
//! its transitive dependencies.

use crate::declarations::{Declaration, DeclarationCategory, DeclarationKind};
use crate::ids::{DeclId, ModuleId};
use crate::store::DeclarationStore;
use crate::types::{TypeData, TypeId};
use mpp_common::Atom;
use mpp_common::limits::MAX_ALIAS_EXPANSION_DEPTH;
use smallvec::SmallVec;
use tracing::trace;

#[derive(Copy, Clone)]
pub struct Session<'a> {
    store: &'a DeclarationStore,
    module: ModuleId,
}

impl<'a> Session<'a> {
    pub const fn new(store: &'a DeclarationStore, module: ModuleId) -> Self {
        Session { store, module }
    }

    #[inline]
    pub const fn store(&self) -> &'a DeclarationStore {
        self.store
    }

    #[inline]
    pub const fn module(&self) -> ModuleId {
        self.module
    }

    pub fn module_name(&self) -> &'a str {
        self.store.module_name(self.module)
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &'a Declaration {
        self.store.decl(id)
    }

    /// Session of the module that owns `id`.
    pub fn session_of(&self, id: DeclId) -> Session<'a> {
        Session::new(self.store, self.store.decl(id).module)
    }

    fn dependencies(&self) -> &'a [ModuleId] {
        &self.store.module(self.module).closure
    }

    /// Classifier visible from this module: own declarations first, then the
    /// dependency closure in breadth-first order.
    pub fn lookup_classifier(&self, fq_name: Atom) -> Option<DeclId> {
        self.store
            .classifier_in(self.module, fq_name)
            .or_else(|| self.lookup_dependency_classifier(fq_name))
    }

    /// Classifier declared in one of this module's dependencies.
    pub fn lookup_dependency_classifier(&self, fq_name: Atom) -> Option<DeclId> {
        self.dependencies()
            .iter()
            .find_map(|&dep| self.store.classifier_in(dep, fq_name))
    }

    /// Top-level callables named `name` in `package` across the dependency
    /// closure.
    pub fn dependency_package_members(&self, package: Atom, name: Atom) -> Vec<DeclId> {
        self.dependencies()
            .iter()
            .flat_map(|&dep| self.store.top_level_in(dep, package, name).iter().copied())
            .collect()
    }

    /// Declared members of `class` named `name`, constructors excluded.
    pub fn members_named(&self, class: DeclId, name: Atom) -> SmallVec<[DeclId; 4]> {
        let Some(data) = self.store.decl(class).as_class() else {
            return SmallVec::new();
        };
        data.members
            .iter()
            .copied()
            .filter(|&member| {
                let decl = self.store.decl(member);
                decl.name == name && decl.category() != DeclarationCategory::Constructor
            })
            .collect()
    }

    pub fn constructors(&self, class: DeclId) -> SmallVec<[DeclId; 4]> {
        let Some(data) = self.store.decl(class).as_class() else {
            return SmallVec::new();
        };
        data.members
            .iter()
            .copied()
            .filter(|&member| self.store.decl(member).category() == DeclarationCategory::Constructor)
            .collect()
    }

    /// Follow type aliases until a class declaration.
    ///
    /// Returns `None` for an alias whose expansion is not a class visible
    /// from this session, or when the chain exceeds the expansion limit.
    pub fn expand_to_class(&self, id: DeclId) -> Option<DeclId> {
        let mut current = id;
        for _ in 0..MAX_ALIAS_EXPANSION_DEPTH {
            let decl = self.store.decl(current);
            match &decl.kind {
                DeclarationKind::Class(_) => return Some(current),
                DeclarationKind::TypeAlias(alias) => {
                    let target = self.class_name_of(alias.expanded)?;
                    current = self.lookup_classifier(target)?;
                }
                DeclarationKind::Callable(_) => return None,
            }
        }
        trace!(decl = %id, "type alias expansion limit reached");
        None
    }

    fn class_name_of(&self, ty: TypeId) -> Option<Atom> {
        match &*self.store.types().lookup(ty) {
            TypeData::Class { fq_name, .. } => Some(*fq_name),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("module", &self.module_name())
            .finish()
    }
}
