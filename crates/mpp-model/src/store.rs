//! Declaration arena.
//!
//! The store owns every module, declaration and type parameter of a
//! project. It is built mutably by the host, then shared immutably with the
//! checker; only the type interner keeps growing afterwards.

use crate::builder::DeclBuilder;
use crate::declarations::{
    ClassData, Declaration, DeclarationCategory, DeclarationKind, TypeParameter,
};
use crate::ids::{DeclId, ModuleId, TypeParamId};
use crate::intern::{TypeInterner, arguments_of};
use crate::session::Session;
use crate::types::TypeId;
use mpp_common::{Atom, Interner};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::collections::VecDeque;
use tracing::trace;

/// Names the store relies on.
pub mod well_known {
    pub const ANY: &str = "kotlin.Any";
    pub const UNIT: &str = "kotlin.Unit";
    pub const CONSTRUCTOR_NAME: &str = "<init>";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleInfo {
    pub id: ModuleId,
    pub name: Atom,
    /// Direct dependencies as declared.
    pub dependencies: Vec<ModuleId>,
    /// Transitive dependencies, breadth-first, without duplicates and
    /// without the module itself.
    pub closure: Vec<ModuleId>,
}

pub struct DeclarationStore {
    names: Interner,
    types: TypeInterner,
    modules: Vec<ModuleInfo>,
    module_by_name: FxHashMap<Atom, ModuleId>,
    decls: Vec<Declaration>,
    type_params: Vec<TypeParameter>,
    /// `(module, fq name)` -> classifier.
    classifiers: FxHashMap<(ModuleId, Atom), DeclId>,
    /// `(module, package, simple name)` -> top-level callables.
    top_level: FxHashMap<(ModuleId, Atom, Atom), SmallVec<[DeclId; 2]>>,
    any_name: Atom,
    unit_type: TypeId,
    init_name: Atom,
}

impl DeclarationStore {
    pub fn new() -> Self {
        let mut names = Interner::new();
        names.intern_common();
        let any_name = names.intern(well_known::ANY);
        let unit_name = names.intern(well_known::UNIT);
        let init_name = names.intern(well_known::CONSTRUCTOR_NAME);
        let types = TypeInterner::new();
        let unit_type = types.simple_class(unit_name);
        DeclarationStore {
            names,
            types,
            modules: Vec::new(),
            module_by_name: FxHashMap::default(),
            decls: Vec::new(),
            type_params: Vec::new(),
            classifiers: FxHashMap::default(),
            top_level: FxHashMap::default(),
            any_name,
            unit_type,
            init_name,
        }
    }

    // =========================================================================
    // Names and types
    // =========================================================================

    pub fn intern(&mut self, s: &str) -> Atom {
        self.names.intern(s)
    }

    /// Look up an already-interned name.
    pub fn name(&self, s: &str) -> Option<Atom> {
        self.names.get(s)
    }

    pub fn resolve(&self, atom: Atom) -> &str {
        self.names.resolve(atom)
    }

    pub fn names(&self) -> &Interner {
        &self.names
    }

    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    pub const fn any_name(&self) -> Atom {
        self.any_name
    }

    pub const fn unit_type(&self) -> TypeId {
        self.unit_type
    }

    pub const fn constructor_name(&self) -> Atom {
        self.init_name
    }

    // =========================================================================
    // Modules
    // =========================================================================

    /// Register a module. Dependencies must already be registered.
    pub fn add_module(&mut self, name: &str, dependencies: &[ModuleId]) -> ModuleId {
        assert!(
            dependencies.iter().all(|dep| dep.index() < self.modules.len()),
            "module '{name}' depends on an unregistered module"
        );
        let id = ModuleId(self.modules.len() as u32);
        let name = self.names.intern(name);

        let mut closure = Vec::new();
        let mut seen = FxHashSet::default();
        let mut queue: VecDeque<ModuleId> = dependencies.iter().copied().collect();
        while let Some(dep) = queue.pop_front() {
            if !seen.insert(dep) {
                continue;
            }
            closure.push(dep);
            queue.extend(self.modules[dep.index()].dependencies.iter().copied());
        }

        self.modules.push(ModuleInfo {
            id,
            name,
            dependencies: dependencies.to_vec(),
            closure,
        });
        self.module_by_name.insert(name, id);
        id
    }

    pub fn module(&self, id: ModuleId) -> &ModuleInfo {
        &self.modules[id.index()]
    }

    pub fn module_name(&self, id: ModuleId) -> &str {
        self.resolve(self.module(id).name)
    }

    pub fn module_named(&self, name: &str) -> Option<ModuleId> {
        let atom = self.names.get(name)?;
        self.module_by_name.get(&atom).copied()
    }

    pub fn modules(&self) -> &[ModuleInfo] {
        &self.modules
    }

    pub fn session(&self, module: ModuleId) -> Session<'_> {
        Session::new(self, module)
    }

    // =========================================================================
    // Type parameters
    // =========================================================================

    pub fn add_type_param(&mut self, param: TypeParameter) -> TypeParamId {
        let id = TypeParamId(self.type_params.len() as u32);
        self.type_params.push(param);
        id
    }

    /// Replace the bounds of an already-allocated parameter (bounds may
    /// mention the parameter itself, e.g. `T : Comparable<T>`).
    pub fn set_upper_bounds(&mut self, id: TypeParamId, bounds: impl IntoIterator<Item = TypeId>) {
        if let Some(param) = self.type_params.get_mut(id.index()) {
            param.upper_bounds = bounds.into_iter().collect();
        }
    }

    pub fn type_param(&self, id: TypeParamId) -> &TypeParameter {
        &self.type_params[id.index()]
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Register a declaration.
    ///
    /// `package` is the dotted package name (empty for the root package).
    /// Members pass their containing class; nested classifiers are indexed
    /// under `Outer.Inner`.
    pub fn register(
        &mut self,
        module: ModuleId,
        package: &str,
        container: Option<DeclId>,
        builder: DeclBuilder,
    ) -> DeclId {
        assert!(module.index() < self.modules.len(), "unknown module {module}");
        let id = DeclId(self.decls.len() as u32);
        let package_atom = self.names.intern(package);
        let simple_name = self.names.resolve(builder.name).to_string();

        let fq_name = match container {
            Some(owner) => {
                let owner_fq = self.resolve(self.decl(owner).fq_name).to_string();
                self.names.intern(&format!("{owner_fq}.{simple_name}"))
            }
            None if package.is_empty() => builder.name,
            None => self.names.intern(&format!("{package}.{simple_name}")),
        };

        let default_return = if builder.is_constructor() {
            let owner = container.map(|owner| self.decl(owner));
            assert!(
                owner.is_some_and(|owner| owner.as_class().is_some()),
                "constructor '{simple_name}' registered outside a class"
            );
            self.class_type_of(container)
        } else {
            self.unit_type
        };

        let is_classifier = builder.is_classifier();
        let name = builder.name;
        let visibility = builder.visibility;
        let modality = builder.modality;
        let flags = builder.flags;
        let type_params = builder.type_params.clone();
        let source = builder.source;
        let kind = builder.into_kind(default_return);

        self.decls.push(Declaration {
            id,
            name,
            fq_name,
            package: package_atom,
            module,
            container,
            visibility,
            modality,
            flags,
            type_params,
            source,
            kind,
        });

        if is_classifier {
            self.classifiers.insert((module, fq_name), id);
        } else if container.is_none() {
            self.top_level
                .entry((module, package_atom, name))
                .or_default()
                .push(id);
        }
        if let Some(owner) = container {
            if let Some(class) = self.class_data_mut(owner) {
                class.members.push(id);
            }
        }

        trace!(
            decl = %id,
            fq_name = self.resolve(fq_name),
            module = self.module_name(module),
            "registered declaration"
        );
        id
    }

    /// The class type applied to its own type parameters.
    fn class_type_of(&self, class: Option<DeclId>) -> TypeId {
        let Some(class) = class else {
            return TypeId::ERROR;
        };
        let decl = self.decl(class);
        let args = arguments_of(
            decl.type_params
                .iter()
                .map(|&param| self.types.type_param(param, false)),
        );
        self.types.class(decl.fq_name, args, false)
    }

    fn class_data_mut(&mut self, id: DeclId) -> Option<&mut ClassData> {
        match &mut self.decls.get_mut(id.index())?.kind {
            DeclarationKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    pub fn decls(&self) -> impl Iterator<Item = &Declaration> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub(crate) fn classifier_in(&self, module: ModuleId, fq_name: Atom) -> Option<DeclId> {
        self.classifiers.get(&(module, fq_name)).copied()
    }

    pub(crate) fn top_level_in(&self, module: ModuleId, package: Atom, name: Atom) -> &[DeclId] {
        self.top_level
            .get(&(module, package, name))
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Display name used in diagnostics: `kind 'fq.Name'`.
    pub fn describe(&self, id: DeclId) -> String {
        let decl = self.decl(id);
        let kind = match decl.category() {
            DeclarationCategory::Class => decl
                .class_kind()
                .map(|kind| kind.keyword())
                .unwrap_or("class"),
            DeclarationCategory::TypeAlias => "typealias",
            DeclarationCategory::Function => "function",
            DeclarationCategory::Constructor => "constructor",
            DeclarationCategory::Property => "property",
        };
        let name = match (decl.category(), decl.container) {
            (DeclarationCategory::Constructor, Some(owner)) => self.decl(owner).fq_name,
            _ => decl.fq_name,
        };
        format!("{kind} '{}'", self.resolve(name))
    }
}

impl Default for DeclarationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DeclarationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeclarationStore")
            .field("modules", &self.modules.len())
            .field("decls", &self.decls.len())
            .field("types", &self.types)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
