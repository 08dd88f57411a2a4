//! Two-module project (`common` <- `jvm`) for checker unit tests.
#![allow(dead_code)]

use mpp_common::Atom;
use mpp_model::{
    ClassKind, DeclBuilder, DeclId, DeclarationStore, ModuleId, TypeId, TypeParamId,
    TypeParameter, ValueParameter,
};

pub(crate) const PACKAGE: &str = "app";

pub(crate) struct Project {
    pub store: DeclarationStore,
    pub common: ModuleId,
    pub jvm: ModuleId,
}

impl Project {
    pub fn new() -> Self {
        let mut store = DeclarationStore::new();
        let common = store.add_module("common", &[]);
        let jvm = store.add_module("jvm", &[common]);
        Project { store, common, jvm }
    }

    pub fn name(&mut self, s: &str) -> Atom {
        self.store.intern(s)
    }

    pub fn ty(&mut self, fq_name: &str) -> TypeId {
        let name = self.store.intern(fq_name);
        self.store.types().simple_class(name)
    }

    pub fn type_param(&mut self, name: &str) -> TypeParamId {
        let name = self.store.intern(name);
        self.store.add_type_param(TypeParameter::new(name))
    }

    pub fn param(&mut self, name: &str, ty: TypeId) -> ValueParameter {
        ValueParameter::new(self.store.intern(name), ty)
    }

    pub fn function(&mut self, name: &str) -> DeclBuilder {
        DeclBuilder::function(self.store.intern(name))
    }

    pub fn property(&mut self, name: &str, ty: TypeId) -> DeclBuilder {
        DeclBuilder::property(self.store.intern(name), ty)
    }

    pub fn class(&mut self, name: &str, kind: ClassKind) -> DeclBuilder {
        DeclBuilder::class(self.store.intern(name), kind)
    }

    pub fn constructor(&self) -> DeclBuilder {
        DeclBuilder::constructor(self.store.constructor_name())
    }

    pub fn add(&mut self, module: ModuleId, builder: DeclBuilder) -> DeclId {
        self.store.register(module, PACKAGE, None, builder)
    }

    pub fn add_member(&mut self, module: ModuleId, owner: DeclId, builder: DeclBuilder) -> DeclId {
        self.store.register(module, PACKAGE, Some(owner), builder)
    }
}
