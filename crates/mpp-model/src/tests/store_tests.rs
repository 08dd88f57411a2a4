use super::*;
use crate::builder::DeclBuilder;
use crate::declarations::{
    CallableKind, ClassKind, DeclarationCategory, TypeParameter, ValueParameter, Visibility,
};
use crate::types::{TypeArgument, TypeData};

#[test]
fn test_module_closure_is_breadth_first_without_duplicates() {
    let mut store = DeclarationStore::new();
    let common = store.add_module("common", &[]);
    let concurrent = store.add_module("concurrent", &[common]);
    let native = store.add_module("native", &[common]);
    let ios = store.add_module("ios", &[concurrent, native]);

    let closure = &store.module(ios).closure;
    assert_eq!(closure, &vec![concurrent, native, common]);
    assert!(store.module(common).closure.is_empty());
    assert_eq!(store.module_named("native"), Some(native));
    assert_eq!(store.module_named("missing"), None);
}

#[test]
#[should_panic(expected = "unregistered module")]
fn test_unknown_dependency_is_contract_violation() {
    let mut store = DeclarationStore::new();
    store.add_module("jvm", &[ModuleId(7)]);
}

#[test]
fn test_fq_names_for_top_level_nested_and_root_package() {
    let mut store = DeclarationStore::new();
    let module = store.add_module("common", &[]);
    let outer_name = store.intern("Outer");
    let inner_name = store.intern("Inner");
    let f_name = store.intern("f");

    let outer = store.register(module, "a.b", None, DeclBuilder::class(outer_name, ClassKind::Class));
    let inner = store.register(
        module,
        "a.b",
        Some(outer),
        DeclBuilder::class(inner_name, ClassKind::Class),
    );
    let root_fn = store.register(module, "", None, DeclBuilder::function(f_name));

    assert_eq!(store.resolve(store.decl(outer).fq_name), "a.b.Outer");
    assert_eq!(store.resolve(store.decl(inner).fq_name), "a.b.Outer.Inner");
    assert_eq!(store.resolve(store.decl(root_fn).fq_name), "f");
    assert_eq!(store.decl(outer).as_class().map(|c| c.members.clone()), Some(vec![inner]));
}

#[test]
fn test_function_defaults_to_unit_return() {
    let mut store = DeclarationStore::new();
    let module = store.add_module("common", &[]);
    let name = store.intern("f");
    let id = store.register(module, "p", None, DeclBuilder::function(name));

    let callable = store.decl(id).as_callable().expect("callable");
    assert_eq!(callable.return_type, store.unit_type());
    assert_eq!(store.decl(id).category(), DeclarationCategory::Function);
}

#[test]
fn test_constructor_returns_class_applied_to_own_parameters() {
    let mut store = DeclarationStore::new();
    let module = store.add_module("common", &[]);
    let t_name = store.intern("T");
    let t = store.add_type_param(TypeParameter::new(t_name));
    let box_name = store.intern("Box");
    let class = store.register(
        module,
        "p",
        None,
        DeclBuilder::class(box_name, ClassKind::Class).with_type_params([t]),
    );
    let init = store.constructor_name();
    let ctor = store.register(
        module,
        "p",
        Some(class),
        DeclBuilder::constructor(init).primary(),
    );

    let callable = store.decl(ctor).as_callable().expect("callable");
    assert!(matches!(
        callable.kind,
        CallableKind::Constructor {
            is_primary: true,
            ..
        }
    ));
    match &*store.types().lookup(callable.return_type) {
        TypeData::Class { fq_name, args, nullable } => {
            assert_eq!(store.resolve(*fq_name), "p.Box");
            assert!(!nullable);
            let param_ty = store.types().type_param(t, false);
            assert_eq!(args.as_slice(), &[TypeArgument::Invariant(param_ty)]);
        }
        other => panic!("expected class type, got {other:?}"),
    }
}

#[test]
fn test_type_interner_deduplicates_and_toggles_nullability() {
    let mut store = DeclarationStore::new();
    let int_name = store.intern("kotlin.Int");
    let types = store.types();

    let a = types.simple_class(int_name);
    let b = types.simple_class(int_name);
    assert_eq!(a, b, "same structure must intern to the same id");

    let nullable = types.with_nullability(a, true);
    assert_ne!(a, nullable);
    assert!(types.lookup(nullable).is_nullable());
    assert_eq!(types.with_nullability(nullable, false), a);
    assert_eq!(types.with_nullability(TypeId::ERROR, true), TypeId::ERROR);
}

#[test]
fn test_value_parameter_builders() {
    let mut store = DeclarationStore::new();
    let module = store.add_module("common", &[]);
    let name = store.intern("log");
    let arg = store.intern("args");
    let string = store.intern("kotlin.String");
    let string_ty = store.types().simple_class(string);

    let id = store.register(
        module,
        "p",
        None,
        DeclBuilder::function(name)
            .with_visibility(Visibility::Internal)
            .with_value_param(ValueParameter::new(arg, string_ty).vararg()),
    );
    let decl = store.decl(id);
    assert_eq!(decl.visibility, Visibility::Internal);
    let params = &decl.as_callable().expect("callable").value_params;
    assert_eq!(params.len(), 1);
    assert!(params[0].is_vararg);
    assert!(!params[0].has_default());
}

#[test]
fn test_visibility_partial_order() {
    use std::cmp::Ordering;
    assert!(Visibility::Private < Visibility::Internal);
    assert!(Visibility::Protected < Visibility::Public);
    assert!(Visibility::Internal < Visibility::Public);
    assert_eq!(
        Visibility::Protected.partial_cmp(&Visibility::Internal),
        None,
        "protected and internal are incomparable"
    );
    assert_eq!(
        Visibility::Public.partial_cmp(&Visibility::Public),
        Some(Ordering::Equal)
    );
}

#[test]
fn test_describe_uses_kind_and_fq_name() {
    let mut store = DeclarationStore::new();
    let module = store.add_module("common", &[]);
    let name = store.intern("Color");
    let class = store.register(module, "ui", None, DeclBuilder::class(name, ClassKind::EnumClass));
    let init = store.constructor_name();
    let ctor = store.register(module, "ui", Some(class), DeclBuilder::constructor(init));

    assert_eq!(store.describe(class), "enum class 'ui.Color'");
    assert_eq!(store.describe(ctor), "constructor 'ui.Color'");
}
