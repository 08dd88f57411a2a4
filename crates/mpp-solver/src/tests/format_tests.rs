use super::*;
use mpp_model::{TypeArguments, TypeParameter};
use smallvec::smallvec;

#[test]
fn test_format_nested_projections() {
    let mut store = DeclarationStore::new();
    let map = store.intern("kotlin.collections.Map");
    let string = store.intern("kotlin.String");
    let t_name = store.intern("T");
    let t = store.add_type_param(TypeParameter::new(t_name));
    let types = store.types();

    let string_ty = types.simple_class(string);
    let t_ty = types.type_param(t, true);
    let args: TypeArguments = smallvec![
        TypeArgument::In(string_ty),
        TypeArgument::Out(t_ty),
    ];
    let map_ty = types.class(map, args, true);

    let formatter = TypeFormatter::new(&store);
    assert_eq!(formatter.format(map_ty), "kotlin.collections.Map<in kotlin.String, out T?>?");
    assert_eq!(
        TypeFormatter::new(&store).with_short_names(true).format(map_ty),
        "Map<in String, out T?>?"
    );
}

#[test]
fn test_format_star_error_and_list() {
    let mut store = DeclarationStore::new();
    let list = store.intern("kotlin.collections.List");
    let int = store.intern("kotlin.Int");
    let types = store.types();
    let args: TypeArguments = smallvec![TypeArgument::Star];
    let star_list = types.class(list, args, false);
    let int_ty = types.simple_class(int);

    let formatter = TypeFormatter::new(&store).with_short_names(true);
    assert_eq!(formatter.format(star_list), "List<*>");
    assert_eq!(formatter.format(TypeId::ERROR), "<error>");
    assert_eq!(formatter.format_list(&[int_ty, TypeId::ERROR]), "(Int, <error>)");
    assert_eq!(formatter.format_list(&[]), "()");
}
