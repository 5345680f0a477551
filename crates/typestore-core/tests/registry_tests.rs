use super::*;
use crate::accessor::Accessor;
use crate::descriptor::TypeLink;
use crate::flags::TypeFlags;
use typestore_common::{FieldKey, PropertyKey};

fn person() -> TypeDescriptor {
    TypeDescriptor::new(TypeKey(1), "Person")
        .with_full_name("Demo.Person")
        .reference_type()
}

// =============================================================================
// TypeRegistry
// =============================================================================

#[test]
fn test_type_register_and_get() {
    let mut registry = TypeRegistry::new();
    assert_eq!(registry.register(person()), Ok(Registration::Inserted));

    assert_eq!(registry.len(), 1);
    assert!(registry.contains(TypeKey(1)));
    assert_eq!(&*registry.get(TypeKey(1)).name, "Person");
    assert!(registry.try_get(TypeKey(2)).is_none());
}

#[test]
fn test_unknown_type_key_yields_zero_value() {
    let registry = TypeRegistry::new();
    let first = registry.get(TypeKey(99));
    let second = registry.get(TypeKey(99));
    assert!(!first.is_valid());
    assert_eq!(&*first.name, "");
    assert!(std::ptr::eq(first, second));
}

#[test]
fn test_type_reserved_key_rejected() {
    let mut registry = TypeRegistry::new();
    let err = registry
        .register(TypeDescriptor::new(TypeKey::INVALID, "Broken"))
        .unwrap_err();
    assert!(matches!(
        err,
        PopulationError::ReservedKey {
            kind: EntityKind::Type,
            ..
        }
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_type_ambiguous_kind_rejected() {
    let mut registry = TypeRegistry::new();
    let ty = TypeDescriptor::new(TypeKey(1), "Both")
        .with_flags(TypeFlags::VALUE_TYPE | TypeFlags::REFERENCE_TYPE);
    assert!(matches!(
        registry.register(ty),
        Err(PopulationError::AmbiguousTypeKind { .. })
    ));
}

#[test]
fn test_underlying_requires_nullable() {
    let mut registry = TypeRegistry::new();
    let mut ty = TypeDescriptor::new(TypeKey(1), "Wrapper").value_type();
    ty.underlying_type = Some(TypeLink::Key(TypeKey(2)));
    assert!(matches!(
        registry.register(ty),
        Err(PopulationError::UnderlyingWithoutNullable { .. })
    ));
}

#[test]
fn test_type_reregistration_same_shape_overwrites() {
    let mut registry = TypeRegistry::new();
    registry.register(person()).unwrap();
    let updated = person().with_properties([PropertyKey(10)]);
    assert_eq!(registry.register(updated), Ok(Registration::Overwritten));
    assert_eq!(registry.get(TypeKey(1)).property_keys, vec![PropertyKey(10)]);
}

#[test]
fn test_type_reregistration_different_shape_conflicts() {
    let mut registry = TypeRegistry::new();
    registry.register(person()).unwrap();
    let err = registry
        .register(TypeDescriptor::new(TypeKey(1), "Animal"))
        .unwrap_err();
    assert!(matches!(
        err,
        PopulationError::ConflictingDescriptor { key: 1, .. }
    ));
    assert_eq!(&*registry.get(TypeKey(1)).name, "Person");
}

#[test]
fn test_type_lookup_by_name() {
    let mut registry = TypeRegistry::new();
    registry.register(person()).unwrap();

    assert_eq!(registry.get_by_name("Demo.Person").map(|t| t.key), Some(TypeKey(1)));
    assert_eq!(registry.get_by_name("Person").map(|t| t.key), Some(TypeKey(1)));
    assert!(registry.get_by_name("person").is_none());
}

#[test]
fn test_type_simple_name_last_write_wins() {
    let mut registry = TypeRegistry::new();
    registry.register(person()).unwrap();
    let other = TypeDescriptor::new(TypeKey(2), "Person").with_full_name("Other.Person");
    assert_eq!(
        registry.register(other),
        Ok(Registration::DisplacedName(TypeKey(1)))
    );

    assert_eq!(registry.get_by_name("Person").map(|t| t.key), Some(TypeKey(2)));
    assert_eq!(registry.get_by_name("Demo.Person").map(|t| t.key), Some(TypeKey(1)));
}

#[test]
fn test_type_snapshot_is_independent() {
    let mut registry = TypeRegistry::new();
    registry.register(person()).unwrap();
    let snapshot = registry.all();
    registry
        .register(TypeDescriptor::new(TypeKey(2), "Address"))
        .unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(registry.all().len(), 2);
    let keys: Vec<_> = registry.keys().collect();
    assert_eq!(keys, vec![TypeKey(1), TypeKey(2)]);
}

// =============================================================================
// MemberRegistry
// =============================================================================

#[test]
fn test_member_register_and_lookup() {
    let mut fields = FieldRegistry::new();
    let name = FieldDescriptor::new(FieldKey(10), "name", "String");
    assert_eq!(fields.register(name, TypeKey(1)), Ok(Registration::Inserted));

    assert_eq!(fields.owner_of(FieldKey(10)), Some(TypeKey(1)));
    assert_eq!(
        fields.get_by_name(TypeKey(1), "name").map(|f| f.key),
        Some(FieldKey(10))
    );
    assert!(fields.get_by_name(TypeKey(1), "Name").is_none());
    assert!(fields.get_by_name(TypeKey(2), "name").is_none());
}

#[test]
fn test_unknown_member_key_yields_zero_value() {
    let properties = PropertyRegistry::new();
    let zero = properties.get(PropertyKey(5));
    assert!(!zero.is_valid());
    assert!(!zero.accessor.is_bound());
    assert!(std::ptr::eq(zero, properties.get(PropertyKey(6))));
}

#[test]
fn test_member_reserved_key_rejected() {
    let mut methods = MethodRegistry::new();
    let method = MethodDescriptor::new(typestore_common::MethodKey::INVALID, "Run", "Void");
    assert!(matches!(
        methods.register(method, TypeKey(1)),
        Err(PopulationError::ReservedKey {
            kind: EntityKind::Method,
            ..
        })
    ));
}

#[test]
fn test_member_name_validation() {
    let mut fields = FieldRegistry::new();
    let empty = FieldDescriptor::new(FieldKey(1), "", "Int32");
    assert!(matches!(
        fields.register(empty, TypeKey(1)),
        Err(PopulationError::InvalidMemberName { key: 1, .. })
    ));

    let long = "x".repeat(MAX_MEMBER_NAME_LEN + 1);
    let too_long = FieldDescriptor::new(FieldKey(2), long, "Int32");
    assert!(matches!(
        fields.register(too_long, TypeKey(1)),
        Err(PopulationError::InvalidMemberName { key: 2, .. })
    ));
    assert!(fields.is_empty());
}

#[test]
fn test_member_without_owner_rejected() {
    let mut fields = FieldRegistry::new();
    let field = FieldDescriptor::new(FieldKey(1), "x", "Int32");
    assert!(matches!(
        fields.register(field, TypeKey::INVALID),
        Err(PopulationError::OrphanMember { key: 1, .. })
    ));
}

#[test]
fn test_member_name_index_last_write_wins() {
    let mut fields = FieldRegistry::new();
    fields
        .register(FieldDescriptor::new(FieldKey(1), "x", "Int32"), TypeKey(1))
        .unwrap();
    let outcome = fields
        .register(FieldDescriptor::new(FieldKey(2), "x", "Int64"), TypeKey(1))
        .unwrap();

    assert_eq!(outcome, Registration::DisplacedName(FieldKey(1)));
    assert_eq!(
        fields.get_by_name(TypeKey(1), "x").map(|f| f.key),
        Some(FieldKey(2))
    );
    // Both keys stay addressable directly.
    assert!(fields.contains(FieldKey(1)));
    assert!(fields.contains(FieldKey(2)));
}

#[test]
fn test_same_name_on_different_owners_is_independent() {
    let mut fields = FieldRegistry::new();
    fields
        .register(FieldDescriptor::new(FieldKey(1), "id", "Int32"), TypeKey(1))
        .unwrap();
    let outcome = fields
        .register(FieldDescriptor::new(FieldKey(2), "id", "Int32"), TypeKey(2))
        .unwrap();
    assert_eq!(outcome, Registration::Inserted);
}

#[test]
fn test_member_reregistration_rules() {
    let mut fields = FieldRegistry::new();
    fields
        .register(FieldDescriptor::new(FieldKey(1), "x", "Int32"), TypeKey(1))
        .unwrap();

    let same = FieldDescriptor::new(FieldKey(1), "x", "Int32")
        .with_accessor(Accessor::read_only(|v: &i64| *v));
    assert_eq!(fields.register(same, TypeKey(1)), Ok(Registration::Overwritten));
    assert!(fields.get(FieldKey(1)).accessor.can_get());

    let read_only = FieldDescriptor::new(FieldKey(1), "x", "Int32").read_only(true);
    assert!(matches!(
        fields.register(read_only, TypeKey(1)),
        Err(PopulationError::ConflictingDescriptor { key: 1, .. })
    ));
    assert!(!fields.get(FieldKey(1)).is_read_only);

    let moved = FieldDescriptor::new(FieldKey(1), "x", "Int32");
    assert!(matches!(
        fields.register(moved, TypeKey(2)),
        Err(PopulationError::ConflictingDescriptor { key: 1, .. })
    ));
}

#[test]
fn test_all_for_type_snapshot() {
    let mut properties = PropertyRegistry::new();
    for (key, name) in [(10, "Name"), (11, "Age"), (12, "Email")] {
        properties
            .register(
                PropertyDescriptor::new(PropertyKey(key), name, "String"),
                TypeKey(1),
            )
            .unwrap();
    }

    let snapshot = properties.all_for_type(TypeKey(1));
    let names: Vec<&str> = snapshot.iter().map(|p| &*p.name).collect();
    assert_eq!(names, ["Name", "Age", "Email"]);
    assert!(properties.all_for_type(TypeKey(2)).is_empty());

    properties
        .register(
            PropertyDescriptor::new(PropertyKey(13), "Phone", "String"),
            TypeKey(1),
        )
        .unwrap();
    assert_eq!(snapshot.len(), 3);
    assert_eq!(properties.keys_for_type(TypeKey(1)).len(), 4);
}

#[test]
fn test_member_iteration_reports_owners() {
    let mut fields = FieldRegistry::new();
    fields
        .register(FieldDescriptor::new(FieldKey(1), "a", "Int32"), TypeKey(1))
        .unwrap();
    fields
        .register(FieldDescriptor::new(FieldKey(2), "b", "Int32"), TypeKey(2))
        .unwrap();

    let pairs: Vec<_> = fields.iter().map(|(owner, f)| (owner, f.key)).collect();
    assert_eq!(pairs, vec![(TypeKey(1), FieldKey(1)), (TypeKey(2), FieldKey(2))]);

    let mut owners: Vec<_> = fields.owners().collect();
    owners.sort();
    assert_eq!(owners, vec![TypeKey(1), TypeKey(2)]);
}
