use super::*;
use crate::test_fixture::Project;
use mpp_common::diagnostic_codes;
use mpp_model::{ClassKind, ClassModifiers, Visibility};
use mpp_solver::CacheStorage;

fn codes(diagnostics: &[Diagnostic]) -> Vec<u32> {
    diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn test_top_level_declarations_require_actual_modifier() {
    let mut p = Project::new();
    let f = p.function("f").implicit_actual();
    let f = p.add(p.jvm, f);

    let checker = ExpectActualChecker::new(&p.store, CheckerOptions::default());
    assert!(checker.requires_actual_modifier(p.store.decl(f)));
}

#[test]
fn test_annotation_constructor_may_omit_actual() {
    let mut p = Project::new();
    let class = p.class("Marker", ClassKind::AnnotationClass).actual();
    let class = p.add(p.jvm, class);
    let ctor = p.constructor().implicit_actual().primary();
    let ctor = p.add_member(p.jvm, class, ctor);

    let checker = ExpectActualChecker::new(&p.store, CheckerOptions::default());
    assert!(!checker.requires_actual_modifier(p.store.decl(ctor)));
}

#[test]
fn test_inline_class_primary_constructor_and_underlying_property() {
    let mut p = Project::new();
    let int = p.ty("kotlin.Int");
    let class = p
        .class("Meters", ClassKind::Class)
        .actual()
        .with_class_modifiers(ClassModifiers::INLINE);
    let class = p.add(p.jvm, class);

    let value = p.param("value", int);
    let primary = p.constructor().implicit_actual().primary().with_value_param(value);
    let primary = p.add_member(p.jvm, class, primary);
    let secondary = p.constructor().implicit_actual();
    let secondary = p.add_member(p.jvm, class, secondary);
    let underlying = p.property("value", int).implicit_actual();
    let underlying = p.add_member(p.jvm, class, underlying);
    let other = p.property("half", int).implicit_actual();
    let other = p.add_member(p.jvm, class, other);

    let checker = ExpectActualChecker::new(&p.store, CheckerOptions::default());
    let requires = |id| checker.requires_actual_modifier(p.store.decl(id));
    assert!(!requires(primary));
    assert!(requires(secondary));
    assert!(!requires(underlying));
    assert!(requires(other));
}

#[test]
fn test_missing_actual_keyword_is_reported() {
    let mut p = Project::new();
    let e = p.function("f").expect();
    let a = p.function("f").implicit_actual();
    let e = p.add(p.common, e);
    let a = p.add(p.jvm, a);

    let checker = ExpectActualChecker::new(&p.store, CheckerOptions::default());
    let diagnostics = checker.check_declaration(a);
    assert_eq!(codes(&diagnostics), vec![diagnostic_codes::ACTUAL_MISSING]);
    assert_eq!(diagnostics[0].related_information.len(), 1);
    assert_eq!(
        diagnostics[0].related_information[0].message_text,
        format!("Expected {} is declared here", p.store.describe(e))
    );
}

#[test]
fn test_unrelated_declaration_without_keyword_is_silent() {
    let mut p = Project::new();
    let int = p.ty("kotlin.Int");
    let x = p.param("x", int);
    let e = p.function("f").expect();
    let a = p.function("f").implicit_actual().with_value_param(x);
    p.add(p.common, e);
    let a = p.add(p.jvm, a);

    let checker = ExpectActualChecker::new(&p.store, CheckerOptions::default());
    assert!(checker.check_declaration(a).is_empty());
}

#[test]
fn test_single_weak_suspect_defers_to_the_member() {
    let mut p = Project::new();
    let ec = p.class("Foo", ClassKind::Class).expect();
    let ac = p.class("Foo", ClassKind::Class).actual();
    let (ec, ac) = (p.add(p.common, ec), p.add(p.jvm, ac));
    let expected_f = p.function("f").expect();
    let actual_f = p.function("f").actual().with_visibility(Visibility::Internal);
    let expected_f = p.add_member(p.common, ec, expected_f);
    let actual_f = p.add_member(p.jvm, ac, actual_f);

    let checker = ExpectActualChecker::new(&p.store, CheckerOptions::default());
    let member = UnfulfilledMember {
        expected: expected_f,
        incompatibilities: [(Incompatibility::Visibility, vec![actual_f])]
            .into_iter()
            .collect(),
    };
    assert!(checker.has_single_actual_suspect(&member));

    assert!(checker.check_declaration(ac).is_empty());
    assert_eq!(
        codes(&checker.check_declaration(actual_f)),
        vec![diagnostic_codes::ACTUAL_WITHOUT_EXPECT]
    );
}

#[test]
fn test_strong_suspect_is_reported_on_the_class() {
    let mut p = Project::new();
    let int = p.ty("kotlin.Int");
    let long = p.ty("kotlin.Long");
    let ec = p.class("Foo", ClassKind::Class).expect();
    let ac = p.class("Foo", ClassKind::Class).actual();
    let (ec, ac) = (p.add(p.common, ec), p.add(p.jvm, ac));
    let ex = p.param("x", int);
    let ax = p.param("x", long);
    let expected_f = p.function("f").expect().with_value_param(ex);
    let actual_f = p.function("f").actual().with_value_param(ax);
    let expected_f = p.add_member(p.common, ec, expected_f);
    p.add_member(p.jvm, ac, actual_f);

    let checker = ExpectActualChecker::new(&p.store, CheckerOptions::default());
    let diagnostics = checker.check_declaration(ac);
    assert_eq!(
        codes(&diagnostics),
        vec![diagnostic_codes::NO_ACTUAL_CLASS_MEMBER_FOR_EXPECTED_CLASS]
    );
    let message = &diagnostics[0].message_text;
    assert!(message.starts_with("Actual class 'app.Foo' has no corresponding members"));
    assert!(message.contains("public expect fun app.Foo.f(x: kotlin.Int): kotlin.Unit"));
    assert!(message.contains("parameter types are different"), "{message}");
    assert_eq!(
        diagnostics[0].related_information[0].message_text,
        format!("Expected {} is declared here", p.store.describe(expected_f))
    );
}

#[test]
fn test_multiplatform_off_reports_nothing() {
    let mut p = Project::new();
    let a = p.function("f").actual();
    let a = p.add(p.jvm, a);

    let options = CheckerOptions::default().with_multiplatform(false);
    let checker = ExpectActualChecker::new(&p.store, options);
    assert!(checker.check_all().is_empty());
    assert!(!checker.options().multiplatform);
    assert!(checker.resolver().cache().is_empty());

    let checker = ExpectActualChecker::new(&p.store, CheckerOptions::default());
    assert_eq!(
        codes(&checker.check_declaration(a)),
        vec![diagnostic_codes::ACTUAL_WITHOUT_EXPECT]
    );
}
