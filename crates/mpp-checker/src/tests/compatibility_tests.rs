use super::*;

fn unfulfilled(ids: &[u32]) -> Incompatibility {
    Incompatibility::ClassScopes(
        ids.iter()
            .map(|&id| UnfulfilledMember {
                expected: DeclId(id),
                incompatibilities: IncompatibilityMap::default(),
            })
            .collect(),
    )
}

#[test]
fn test_strong_reasons() {
    let strong = [
        Incompatibility::CallableKind,
        Incompatibility::ParameterShape,
        Incompatibility::ParameterCount,
        Incompatibility::TypeParameterCount,
        Incompatibility::ParameterTypes,
        Incompatibility::ReturnType,
    ];
    for reason in &strong {
        assert_eq!(reason.kind(), IncompatibilityKind::Strong, "{}", reason.name());
    }

    let weak = [
        Incompatibility::ClassKind,
        Incompatibility::Modality,
        Incompatibility::Visibility,
        Incompatibility::EnumEntries,
        Incompatibility::TypeParameterNames,
        Incompatibility::PropertyKind,
        unfulfilled(&[1]),
    ];
    for reason in &weak {
        assert_eq!(reason.kind(), IncompatibilityKind::Weak, "{}", reason.name());
    }
}

#[test]
fn test_reasons_group_by_tag() {
    let mut map = CompatibilityMap::default();
    map.entry(Incompatibility::ReturnType.into())
        .or_default()
        .push(DeclId(1));
    map.entry(Compatibility::Compatible).or_default().push(DeclId(2));
    map.entry(Incompatibility::ReturnType.into())
        .or_default()
        .push(DeclId(3));

    assert_eq!(map.len(), 2);
    let keys: Vec<_> = map.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            Compatibility::Incompatible(Incompatibility::ReturnType),
            Compatibility::Compatible
        ],
        "insertion order is kept"
    );
    assert_eq!(
        map[&Compatibility::Incompatible(Incompatibility::ReturnType)],
        vec![DeclId(1), DeclId(3)]
    );
}

#[test]
fn test_class_scopes_keys_compare_unfulfilled_members() {
    assert_eq!(unfulfilled(&[1, 2]), unfulfilled(&[1, 2]));
    assert_ne!(unfulfilled(&[1, 2]), unfulfilled(&[1]));
    assert_ne!(unfulfilled(&[1]), Incompatibility::EnumEntries);
}

#[test]
fn test_all_strong() {
    let mut map = CompatibilityMap::default();
    assert!(map.all_strong(), "vacuously true for an empty map");

    map.insert(Incompatibility::ParameterCount.into(), vec![DeclId(1)]);
    assert!(map.all_strong());

    map.insert(Incompatibility::Visibility.into(), vec![DeclId(2)]);
    assert!(!map.all_strong());

    let mut members = IncompatibilityMap::default();
    members.insert(Incompatibility::ReturnType, vec![DeclId(3)]);
    assert!(members.all_strong());
    members.insert(Incompatibility::Modality, vec![DeclId(4)]);
    assert!(!members.all_strong());
}

#[test]
fn test_compatible_or_weak() {
    assert!(Compatibility::Compatible.is_compatible_or_weak());
    assert!(Compatibility::Incompatible(Incompatibility::Modality).is_compatible_or_weak());
    assert!(!Compatibility::Incompatible(Incompatibility::ReturnType).is_compatible_or_weak());
    assert_eq!(Compatibility::Compatible.kind(), None);
}
