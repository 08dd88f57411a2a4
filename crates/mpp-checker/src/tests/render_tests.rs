use super::*;
use crate::test_fixture::Project;
use mpp_model::{ConstValue, TypeArgument, TypeParameter, Visibility};

#[test]
fn test_render_function() {
    let mut p = Project::new();
    let int = p.ty("kotlin.Int");
    let string = p.ty("kotlin.String");
    let x = p.param("x", int);
    let f = p.function("f").expect().with_value_param(x).returns(string);
    let f = p.add(p.common, f);

    assert_eq!(
        DeclarationRenderer::new(&p.store).render(f),
        "public expect fun app.f(x: kotlin.Int): kotlin.String"
    );
}

#[test]
fn test_render_generic_function_with_bound() {
    let mut p = Project::new();
    let t = p.name("T");
    let comparable = p.name("kotlin.Comparable");
    let param = p.store.add_type_param(TypeParameter::new(t));
    let t_ty = p.store.types().type_param(param, false);
    let bound = p.store.types().class(
        comparable,
        [TypeArgument::Invariant(t_ty)].into_iter().collect(),
        false,
    );
    p.store.set_upper_bounds(param, [bound]);

    let a = p.param("a", t_ty);
    let b = p.param("b", t_ty);
    let max = p
        .function("max")
        .expect()
        .with_type_params([param])
        .with_value_param(a)
        .with_value_param(b)
        .returns(t_ty);
    let max = p.add(p.common, max);

    assert_eq!(
        DeclarationRenderer::new(&p.store).render(max),
        "public expect fun <T : kotlin.Comparable<T>> app.max(a: T, b: T): T"
    );
}

#[test]
fn test_render_function_modifiers_and_parameters() {
    let mut p = Project::new();
    let block = p.ty("kotlin.Function0");
    let int = p.ty("kotlin.Int");
    let body = p.param("body", block).crossinline();
    let times = p.param("times", int).with_default(ConstValue::Int(1));
    let run = p
        .function("run")
        .actual()
        .with_function_modifiers(FunctionModifiers::INLINE)
        .with_value_param(times)
        .with_value_param(body);
    let run = p.add(p.jvm, run);

    assert_eq!(
        DeclarationRenderer::new(&p.store).render(run),
        "public actual inline fun app.run(times: kotlin.Int = ..., crossinline body: kotlin.Function0): kotlin.Unit"
    );
}

#[test]
fn test_render_class_header() {
    let mut p = Project::new();
    let t = p.name("T");
    let container = p.name("app.Container");
    let param = p
        .store
        .add_type_param(TypeParameter::new(t).with_variance(Variance::Out));
    let t_ty = p.store.types().type_param(param, false);
    let supertype = p.store.types().class(
        container,
        [TypeArgument::Invariant(t_ty)].into_iter().collect(),
        false,
    );
    let class = p
        .class("Box", ClassKind::Class)
        .actual()
        .with_type_params([param])
        .with_supertype(supertype);
    let class = p.add(p.jvm, class);

    assert_eq!(
        DeclarationRenderer::new(&p.store).render(class),
        "public final actual class app.Box<out T> : app.Container<T>"
    );
}

#[test]
fn test_render_interface_omits_abstract() {
    let mut p = Project::new();
    let shape = p.class("Shape", ClassKind::Interface).expect();
    let shape = p.add(p.common, shape);
    let holder = p
        .class("Holder", ClassKind::Class)
        .expect()
        .with_modality(Modality::Abstract)
        .with_visibility(Visibility::Internal);
    let holder = p.add(p.common, holder);

    let renderer = DeclarationRenderer::new(&p.store);
    assert_eq!(renderer.render(shape), "public expect interface app.Shape");
    assert_eq!(renderer.render(holder), "internal abstract expect class app.Holder");
}

#[test]
fn test_render_constructor_uses_class_name() {
    let mut p = Project::new();
    let int = p.ty("kotlin.Int");
    let class = p.class("Box", ClassKind::Class).expect();
    let class = p.add(p.common, class);
    let x = p.param("x", int);
    let ctor = p.constructor().expect().with_value_param(x);
    let ctor = p.add_member(p.common, class, ctor);

    assert_eq!(
        DeclarationRenderer::new(&p.store).render(ctor),
        "public expect constructor Box(x: kotlin.Int): app.Box"
    );
}

#[test]
fn test_render_properties() {
    let mut p = Project::new();
    let int = p.ty("kotlin.Int");
    let string = p.ty("kotlin.String");
    let count = p.property("count", int).actual().var();
    let count = p.add(p.jvm, count);
    let name = p
        .property("NAME", string)
        .expect()
        .with_property_modifiers(PropertyModifiers::CONST);
    let name = p.add(p.common, name);
    let length = p.property("length", int).expect().with_receiver(string);
    let length = p.add(p.common, length);

    let renderer = DeclarationRenderer::new(&p.store);
    assert_eq!(renderer.render(count), "public actual var app.count: kotlin.Int");
    assert_eq!(
        renderer.render(name),
        "public expect const val app.NAME: kotlin.String"
    );
    assert_eq!(
        renderer.render(length),
        "public expect val kotlin.String.app.length: kotlin.Int"
    );
}

#[test]
fn test_render_open_member_shows_modality() {
    let mut p = Project::new();
    let class = p.class("Base", ClassKind::Class).expect().with_modality(Modality::Open);
    let class = p.add(p.common, class);
    let f = p.function("f").expect().with_modality(Modality::Open);
    let f = p.add_member(p.common, class, f);

    assert_eq!(
        DeclarationRenderer::new(&p.store).render(f),
        "public open expect fun app.Base.f(): kotlin.Unit"
    );
}

#[test]
fn test_render_type_alias() {
    let mut p = Project::new();
    let target = p.ty("java.lang.StringBuilder");
    let name = p.name("StringBuilder");
    let alias = p.add(
        p.jvm,
        mpp_model::DeclBuilder::type_alias(name, target).actual(),
    );

    assert_eq!(
        DeclarationRenderer::new(&p.store).render(alias),
        "public actual typealias app.StringBuilder = java.lang.StringBuilder"
    );
}
