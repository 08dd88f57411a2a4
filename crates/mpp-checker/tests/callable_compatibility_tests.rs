//! Callable expect/actual resolution through `ExpectActualResolver`.

use mpp_checker::{
    CheckerOptions, Compatibility, ExpectActualResolver, Incompatibility, find_ambiguous_expects,
};
use mpp_model::{
    ClassKind, ConstValue, DeclBuilder, DeclId, DeclarationStore, ModuleId, TypeId, ValueParameter,
    Visibility,
};
use mpp_solver::ErrorTypePolicy;

struct Modules {
    store: DeclarationStore,
    common: ModuleId,
    jvm: ModuleId,
}

impl Modules {
    fn new() -> Self {
        let mut store = DeclarationStore::new();
        let common = store.add_module("common", &[]);
        let jvm = store.add_module("jvm", &[common]);
        Modules { store, common, jvm }
    }

    fn ty(&mut self, fq_name: &str) -> TypeId {
        let name = self.store.intern(fq_name);
        self.store.types().simple_class(name)
    }

    fn param(&mut self, name: &str, ty: &str) -> ValueParameter {
        let ty = self.ty(ty);
        ValueParameter::new(self.store.intern(name), ty)
    }

    /// `fun name(params...): ret`
    fn function(&mut self, name: &str, params: &[(&str, &str)], ret: &str) -> DeclBuilder {
        let ret = self.ty(ret);
        let mut builder = DeclBuilder::function(self.store.intern(name)).returns(ret);
        for &(param, ty) in params {
            builder = builder.with_value_param(self.param(param, ty));
        }
        builder
    }

    fn add(&mut self, module: ModuleId, builder: DeclBuilder) -> DeclId {
        self.store.register(module, "app", None, builder)
    }

    fn verdict(&self, expected: DeclId, actual: DeclId) -> Compatibility {
        let resolver = ExpectActualResolver::new(&self.store, &CheckerOptions::default());
        let map = resolver
            .find_expect_for_actual(actual)
            .expect("callables always resolve");
        map.iter()
            .find(|(_, decls)| decls.contains(&expected))
            .map(|(verdict, _)| verdict.clone())
            .expect("expected declaration is a candidate")
    }
}

#[test]
fn test_identical_signature_is_compatible() {
    let mut m = Modules::new();
    let e = m.function("f", &[("x", "kotlin.Int")], "kotlin.String").expect();
    let a = m.function("f", &[("x", "kotlin.Int")], "kotlin.String").actual();
    let e = m.add(m.common, e);
    let a = m.add(m.jvm, a);

    assert_eq!(m.verdict(e, a), Compatibility::Compatible);
}

#[test]
fn test_changed_parameter_type_reports_parameter_types_only() {
    let mut m = Modules::new();
    let e = m.function("f", &[("x", "kotlin.Int")], "kotlin.String").expect();
    let a = m.function("f", &[("x", "kotlin.Long")], "kotlin.String").actual();
    let e = m.add(m.common, e);
    let a = m.add(m.jvm, a);

    let verdict = m.verdict(e, a);
    assert_eq!(
        verdict,
        Compatibility::Incompatible(Incompatibility::ParameterTypes)
    );
    assert!(verdict.incompatibility().is_some_and(Incompatibility::is_strong));
}

#[test]
fn test_added_parameter_masks_return_type_mismatch() {
    let mut m = Modules::new();
    let e = m.function("f", &[("x", "kotlin.Int")], "kotlin.String").expect();
    let a = m
        .function("f", &[("x", "kotlin.Int"), ("y", "kotlin.Int")], "kotlin.Boolean")
        .actual();
    let e = m.add(m.common, e);
    let a = m.add(m.jvm, a);

    assert_eq!(
        m.verdict(e, a),
        Compatibility::Incompatible(Incompatibility::ParameterCount)
    );
}

#[test]
fn test_visibility_is_asymmetric() {
    let mut m = Modules::new();
    let e = m.function("narrowed", &[], "kotlin.Unit").expect();
    let a = m
        .function("narrowed", &[], "kotlin.Unit")
        .actual()
        .with_visibility(Visibility::Internal);
    let e = m.add(m.common, e);
    let a = m.add(m.jvm, a);
    assert_eq!(
        m.verdict(e, a),
        Compatibility::Incompatible(Incompatibility::Visibility)
    );

    let e = m
        .function("widened", &[], "kotlin.Unit")
        .expect()
        .with_visibility(Visibility::Internal);
    let a = m.function("widened", &[], "kotlin.Unit").actual();
    let e = m.add(m.common, e);
    let a = m.add(m.jvm, a);
    assert_eq!(m.verdict(e, a), Compatibility::Compatible);
}

#[test]
fn test_same_package_candidates_are_keyed_separately() {
    let mut m = Modules::new();
    let compatible = m.function("f", &[("x", "kotlin.Int")], "kotlin.Unit").expect();
    let incompatible = m.function("f", &[("x", "kotlin.Long")], "kotlin.Unit").expect();
    let actual = m.function("f", &[("x", "kotlin.Int")], "kotlin.Unit").actual();
    let compatible = m.add(m.common, compatible);
    let incompatible = m.add(m.common, incompatible);
    let actual = m.add(m.jvm, actual);

    let resolver = ExpectActualResolver::new(&m.store, &CheckerOptions::default());
    let map = resolver.find_expect_for_actual(actual).expect("resolution");
    assert_eq!(map.len(), 2);
    assert_eq!(map[&Compatibility::Compatible], vec![compatible]);
    assert_eq!(
        map[&Compatibility::Incompatible(Incompatibility::ParameterTypes)],
        vec![incompatible]
    );
    assert!(find_ambiguous_expects(&m.store, &map).is_none());
}

#[test]
fn test_no_candidate_gives_empty_map() {
    let mut m = Modules::new();
    let a = m.function("orphan", &[], "kotlin.Unit").actual();
    let a = m.add(m.jvm, a);

    let resolver = ExpectActualResolver::new(&m.store, &CheckerOptions::default());
    let map = resolver.find_expect_for_actual(a).expect("resolution");
    assert!(map.is_empty());
}

#[test]
fn test_annotation_constructor_with_defaulted_parameters_skips_count_check() {
    let mut m = Modules::new();
    let init = m.store.constructor_name();
    let name = m.store.intern("Marker");
    let ec = m.add(m.common, DeclBuilder::class(name, ClassKind::AnnotationClass).expect());
    let ac = m.add(m.jvm, DeclBuilder::class(name, ClassKind::AnnotationClass).actual());

    let expected_ctor = DeclBuilder::constructor(init).expect().primary();
    let expected_ctor = m.store.register(m.common, "app", Some(ec), expected_ctor);
    let level = m.param("level", "kotlin.Int").with_default(ConstValue::Int(1));
    let tag = m.param("tag", "kotlin.String").with_default(ConstValue::String("x".into()));
    let actual_ctor = DeclBuilder::constructor(init)
        .implicit_actual()
        .primary()
        .with_value_param(level)
        .with_value_param(tag);
    let actual_ctor = m.store.register(m.jvm, "app", Some(ac), actual_ctor);

    assert_eq!(m.verdict(expected_ctor, actual_ctor), Compatibility::Compatible);
}

#[test]
fn test_annotation_bypass_needs_defaults_on_every_extra_parameter() {
    let mut m = Modules::new();
    let init = m.store.constructor_name();
    let name = m.store.intern("Marker");
    let ec = m.add(m.common, DeclBuilder::class(name, ClassKind::AnnotationClass).expect());
    let ac = m.add(m.jvm, DeclBuilder::class(name, ClassKind::AnnotationClass).actual());

    let expected_ctor = DeclBuilder::constructor(init).expect();
    let expected_ctor = m.store.register(m.common, "app", Some(ec), expected_ctor);
    let level = m.param("level", "kotlin.Int");
    let actual_ctor = DeclBuilder::constructor(init).implicit_actual().with_value_param(level);
    let actual_ctor = m.store.register(m.jvm, "app", Some(ac), actual_ctor);

    assert_eq!(
        m.verdict(expected_ctor, actual_ctor),
        Compatibility::Incompatible(Incompatibility::ParameterCount)
    );
}

#[test]
fn test_error_types_follow_policy() {
    let mut m = Modules::new();
    let error = ValueParameter::new(m.store.intern("x"), TypeId::ERROR);
    let e = m.function("f", &[], "kotlin.Unit").expect().with_value_param(error);
    let a = m.function("f", &[("x", "kotlin.Int")], "kotlin.Unit").actual();
    let e = m.add(m.common, e);
    let a = m.add(m.jvm, a);

    assert_eq!(m.verdict(e, a), Compatibility::Compatible);

    let strict = CheckerOptions::default().with_error_types(ErrorTypePolicy::NeverEqual);
    let resolver = ExpectActualResolver::new(&m.store, &strict);
    let map = resolver.find_expect_for_actual(a).expect("resolution");
    assert_eq!(
        map[&Compatibility::Incompatible(Incompatibility::ParameterTypes)],
        vec![e]
    );
}

#[test]
fn test_expected_class_matches_actual_alias_expansion_in_signatures() {
    let mut m = Modules::new();
    let builder_name = m.store.intern("StringBuilder");
    m.add(m.common, DeclBuilder::class(builder_name, ClassKind::Class).expect());
    let java_builder = m.store.intern("StringBuilder");
    m.store.register(
        m.jvm,
        "java.lang",
        None,
        DeclBuilder::class(java_builder, ClassKind::Class),
    );
    let target = m.ty("java.lang.StringBuilder");
    m.add(m.jvm, DeclBuilder::type_alias(builder_name, target).actual());

    let e = m.function("f", &[("sb", "app.StringBuilder")], "kotlin.Unit").expect();
    let a = m
        .function("f", &[("sb", "java.lang.StringBuilder")], "kotlin.Unit")
        .actual();
    let e = m.add(m.common, e);
    let a = m.add(m.jvm, a);

    assert_eq!(m.verdict(e, a), Compatibility::Compatible);
}
