use super::*;
use mpp_model::{ClassKind, DeclBuilder, DeclarationStore, TypeParameter};
use smallvec::smallvec;

#[test]
fn test_expand_generic_alias_substitutes_arguments() {
    let mut store = DeclarationStore::new();
    let module = store.add_module("jvm", &[]);
    let list = store.intern("kotlin.collections.List");
    let string = store.intern("kotlin.String");
    let t_name = store.intern("T");
    let t = store.add_type_param(TypeParameter::new(t_name));
    let t_ty = store.types().type_param(t, false);
    let body_args: TypeArguments = smallvec![TypeArgument::Out(t_ty)];
    let body = store.types().class(list, body_args, false);

    let alias_name = store.intern("Items");
    let alias = store.register(
        module,
        "app",
        None,
        DeclBuilder::type_alias(alias_name, body).with_type_params([t]),
    );
    let alias_fq = store.decl(alias).fq_name;

    let types = store.types();
    let string_ty = types.simple_class(string);
    let use_args: TypeArguments = smallvec![TypeArgument::Invariant(string_ty)];
    let use_site = types.class(alias_fq, use_args, true);

    let session = store.session(module);
    let want_args: TypeArguments = smallvec![TypeArgument::Out(string_ty)];
    assert_eq!(
        expand_type(&session, use_site),
        types.class(list, want_args, true),
        "nullable alias use expands to the nullable body"
    );
}

#[test]
fn test_expand_leaves_plain_classes_untouched() {
    let mut store = DeclarationStore::new();
    let module = store.add_module("jvm", &[]);
    let name = store.intern("Foo");
    let class = store.register(module, "app", None, DeclBuilder::class(name, ClassKind::Class));
    let fq = store.decl(class).fq_name;
    let ty = store.types().simple_class(fq);

    assert_eq!(expand_type(&store.session(module), ty), ty);
}

#[test]
fn test_cyclic_alias_expands_to_error() {
    let mut store = DeclarationStore::new();
    let module = store.add_module("jvm", &[]);
    let loop_fq = store.intern("app.Loop");
    let loop_ty = store.types().simple_class(loop_fq);
    let name = store.intern("Loop");
    store.register(module, "app", None, DeclBuilder::type_alias(name, loop_ty));

    assert_eq!(expand_type(&store.session(module), loop_ty), TypeId::ERROR);
}
