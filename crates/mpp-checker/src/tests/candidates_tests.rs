use super::*;
use crate::test_fixture::Project;
use mpp_model::{ClassKind, DeclFlags};

#[test]
fn test_top_level_candidates_are_expect_only() {
    let mut p = Project::new();
    let e = p.function("f").expect();
    let plain = p.function("f");
    let a = p.function("f").actual();
    let e = p.add(p.common, e);
    p.add(p.common, plain);
    let a = p.add(p.jvm, a);

    let pool = CandidateCollector::new(&p.store).collect(a).expect("pool");
    assert_eq!(pool.candidates.as_slice(), &[e]);
    assert_eq!(pool.expected_container, None);
    assert_eq!(pool.actual_container, None);
}

#[test]
fn test_declaration_is_not_its_own_candidate() {
    let mut p = Project::new();
    let both = p.function("f").expect().actual();
    let both = p.add(p.common, both);
    let pool = CandidateCollector::new(&p.store).collect(both).expect("pool");
    assert!(pool.candidates.is_empty());

    let a = p.function("f").actual();
    let a = p.add(p.jvm, a);
    let pool = CandidateCollector::new(&p.store).collect(a).expect("pool");
    assert_eq!(pool.candidates.as_slice(), &[both]);
}

#[test]
fn test_local_declarations_are_not_resolvable() {
    let mut p = Project::new();
    let e = p.function("f").expect();
    p.add(p.common, e);
    let local = p.function("f").actual().with_flags(DeclFlags::LOCAL);
    let local = p.add(p.jvm, local);

    assert_eq!(CandidateCollector::new(&p.store).collect(local), None);
}

#[test]
fn test_member_candidates_come_from_expected_container() {
    let mut p = Project::new();
    let int = p.ty("kotlin.Int");
    let ec = p.class("Foo", ClassKind::Class).expect();
    let ac = p.class("Foo", ClassKind::Class).actual();
    let (ec, ac) = (p.add(p.common, ec), p.add(p.jvm, ac));

    let f = p.function("size").expect().returns(int);
    let prop = p.property("size", int).expect();
    let ctor = p.constructor().expect();
    let f = p.add_member(p.common, ec, f);
    let prop = p.add_member(p.common, ec, prop);
    let ctor = p.add_member(p.common, ec, ctor);

    let actual_prop = p.property("size", int).actual();
    let actual_ctor = p.constructor().actual();
    let actual_prop = p.add_member(p.jvm, ac, actual_prop);
    let actual_ctor = p.add_member(p.jvm, ac, actual_ctor);

    let collector = CandidateCollector::new(&p.store);
    let pool = collector.collect(actual_prop).expect("pool");
    assert_eq!(pool.candidates.as_slice(), &[f, prop]);
    assert_eq!(pool.expected_container, Some(ec));
    assert_eq!(pool.actual_container, Some(ac));

    let pool = collector.collect(actual_ctor).expect("pool");
    assert_eq!(pool.candidates.as_slice(), &[ctor]);
}

#[test]
fn test_member_without_expected_container_has_empty_pool() {
    let mut p = Project::new();
    let ac = p.class("Foo", ClassKind::Class).actual();
    let ac = p.add(p.jvm, ac);
    let member = p.function("f").actual();
    let member = p.add_member(p.jvm, ac, member);

    let pool = CandidateCollector::new(&p.store).collect(member).expect("pool");
    assert!(pool.candidates.is_empty());
    assert_eq!(pool.expected_container, None);
}

#[test]
fn test_classifier_needs_expected_class() {
    let mut p = Project::new();
    let e = p.class("Foo", ClassKind::Class).expect();
    let e = p.add(p.common, e);
    let a = p.class("Foo", ClassKind::Class).actual();
    let a = p.add(p.jvm, a);
    let collector = CandidateCollector::new(&p.store);
    assert_eq!(collector.collect(a).expect("pool").candidates.as_slice(), &[e]);

    let plain = p.class("Bar", ClassKind::Class);
    p.add(p.common, plain);
    let bar = p.class("Bar", ClassKind::Class).actual();
    let bar = p.add(p.jvm, bar);
    assert_eq!(CandidateCollector::new(&p.store).collect(bar), None);

    let orphan = p.class("Baz", ClassKind::Class).actual();
    let orphan = p.add(p.jvm, orphan);
    assert_eq!(CandidateCollector::new(&p.store).collect(orphan), None);
}
