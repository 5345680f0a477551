//! Integration tests through the `typestore` facade.
//!
//! These cover the full lifecycle: populate with accessors, freeze, query
//! from several threads, and install as the process-wide store.

use std::thread;
use typestore::{
    Accessor, FieldDescriptor, FieldKey, Manifest, MetadataStore, MethodDescriptor, MethodKey,
    PropertyDescriptor, PropertyKey, TypeDescriptor, TypeKey, global,
};

const PEOPLE: &str = include_str!("fixtures/people.json");

const PERSON: TypeKey = TypeKey(1);
const INT32: TypeKey = TypeKey(2);
const STRING: TypeKey = TypeKey(3);
const DEPARTMENT: TypeKey = TypeKey(10);
const EMPLOYEE: TypeKey = TypeKey(11);

#[derive(Debug, Default)]
struct Person {
    name: String,
    age: i32,
    id: u64,
}

/// Manifest metadata plus accessors bound in code.
fn person_store() -> MetadataStore {
    // Accessors cannot come from data: swap the manifest's Name/Age/_id
    // records for accessor-carrying ones.
    let mut metadata = Manifest::from_json(PEOPLE).expect("fixture parses");
    metadata
        .properties
        .retain(|p| p.id != PropertyKey(10) && p.id != PropertyKey(11));
    metadata.fields.clear();

    let mut builder = MetadataStore::builder();
    builder.load_manifest(&metadata).unwrap();
    builder
        .register_property(
            PERSON,
            PropertyDescriptor::new(PropertyKey(10), "Name", STRING).with_accessor(
                Accessor::read_write(
                    |p: &Person| p.name.clone(),
                    |p: &mut Person, v: String| p.name = v,
                ),
            ),
        )
        .unwrap();
    builder
        .register_property(
            PERSON,
            PropertyDescriptor::new(PropertyKey(11), "Age", INT32).with_accessor(
                Accessor::read_write(|p: &Person| p.age, |p: &mut Person, v: i32| p.age = v),
            ),
        )
        .unwrap();
    builder
        .register_field(
            PERSON,
            FieldDescriptor::new(FieldKey(30), "_id", INT32)
                .read_only(true)
                .with_accessor(Accessor::read_only(|p: &Person| p.id)),
        )
        .unwrap();
    builder.bind_host_type::<Person>(PERSON);
    builder.build().unwrap()
}

#[test]
fn test_person_scenario() {
    let store = person_store();
    let person = store.type_of(&Person::default());
    assert_eq!(person.key, PERSON);

    let name = person.get_property("Name").unwrap();
    assert_eq!(name.property_type().key, STRING);
    let age = person.get_property("Age").unwrap();
    assert_eq!(&*age.property_type().full_name, "System.Int32");
    assert!(person.get_property("Missing").is_none());

    let mut bob = Person {
        id: 7,
        ..Person::default()
    };
    assert!(name.set_value(&mut bob, String::from("Bob")));
    assert!(age.set_value(&mut bob, 40i32));
    assert_eq!(name.get_value_as::<String>(&bob).as_deref(), Some("Bob"));
    assert_eq!(age.get_value_as::<i32>(&bob), Some(40));

    // Read-only field: getter bound, setter absent.
    let id = person.get_field("_id").unwrap();
    assert_eq!(id.get_value_as::<u64>(&bob), Some(7));
    assert!(!id.set_value(&mut bob, 8u64));
    assert_eq!(bob.id, 7);
}

#[test]
fn test_declaration_order_survives_reregistration() {
    let store = person_store();
    let names: Vec<String> = store
        .get_type(PERSON)
        .properties()
        .iter()
        .map(|p| p.name.to_string())
        .collect();
    assert_eq!(names, ["Name", "Age", "Alias", "Score", "Alive"]);
}

#[test]
fn test_mutually_recursive_types() {
    let mut builder = MetadataStore::builder();
    builder
        .register_type(TypeDescriptor::new(DEPARTMENT, "Department").reference_type())
        .unwrap();
    builder
        .register_type(TypeDescriptor::new(EMPLOYEE, "Employee").reference_type())
        .unwrap();
    builder
        .register_property(
            DEPARTMENT,
            PropertyDescriptor::new(PropertyKey(1), "Head", EMPLOYEE),
        )
        .unwrap();
    builder
        .register_property(
            EMPLOYEE,
            PropertyDescriptor::new(PropertyKey(2), "Department", DEPARTMENT),
        )
        .unwrap();
    builder
        .register_method(
            EMPLOYEE,
            MethodDescriptor::new(MethodKey(1), "Transfer", "Void").with_parameters([DEPARTMENT]),
        )
        .unwrap();
    let store = builder.build().unwrap();

    let department = store.get_type(DEPARTMENT);
    let employee = department.get_property("Head").unwrap().property_type();
    assert_eq!(employee.key, EMPLOYEE);
    let back = employee.get_property("Department").unwrap().property_type();
    assert_eq!(back.key, DEPARTMENT);
    assert_eq!(
        employee.get_method("Transfer").unwrap().parameter_types()[0].key,
        DEPARTMENT
    );
}

#[test]
fn test_readers_on_many_threads() {
    let store = person_store();
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..1000 {
                    let person = store.get_type(PERSON);
                    assert_eq!(
                        person.get_property("Score").map(|p| p.key),
                        Some(PropertyKey(13))
                    );
                    assert!(store.get_type(TypeKey(999)).name.is_empty());
                }
            });
        }
    });
}

#[test]
fn test_global_store_install_once() {
    let installed = global::install(person_store());
    assert!(installed.is_ok());
    assert!(global::is_installed());
    assert_eq!(&*global::store().get_type(PERSON).name, "Person");

    let second = global::install(MetadataStore::empty());
    assert!(second.is_err());
    assert_eq!(global::store().len(), 4);
}
