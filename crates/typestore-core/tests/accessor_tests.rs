use super::*;

#[derive(Debug, Default)]
struct Counter {
    label: String,
    hits: u32,
}

fn label_accessor() -> Accessor {
    Accessor::read_write(
        |c: &Counter| c.label.clone(),
        |c: &mut Counter, v: String| c.label = v,
    )
}

#[test]
fn test_none_is_unbound() {
    let accessor = Accessor::none();
    assert!(!accessor.can_get());
    assert!(!accessor.can_set());
    assert!(!accessor.is_bound());

    let mut counter = Counter::default();
    assert!(accessor.get(&counter).is_none());
    assert!(!accessor.set(&mut counter, Box::new(5u32)));
    assert_eq!(counter.hits, 0);
}

#[test]
fn test_read_write_round_trip() {
    let accessor = label_accessor();
    let mut counter = Counter::default();

    assert!(accessor.set(&mut counter, Box::new(String::from("north"))));
    let value = accessor.get(&counter).expect("getter bound");
    let value = value.downcast::<String>().expect("getter yields String");
    assert_eq!(*value, "north");
}

#[test]
fn test_wrong_instance_type_is_ignored() {
    let accessor = label_accessor();
    let mut not_a_counter = 17u64;

    assert!(accessor.get(&not_a_counter).is_none());
    assert!(!accessor.set(&mut not_a_counter, Box::new(String::from("x"))));
    assert_eq!(not_a_counter, 17);
}

#[test]
fn test_wrong_value_type_leaves_instance_untouched() {
    let accessor = label_accessor();
    let mut counter = Counter {
        label: "kept".into(),
        hits: 0,
    };

    assert!(!accessor.set(&mut counter, Box::new(99i32)));
    assert_eq!(counter.label, "kept");
}

#[test]
fn test_read_only_and_write_only() {
    let read = Accessor::read_only(|c: &Counter| c.hits);
    let write = Accessor::write_only(|c: &mut Counter, v: u32| c.hits = v);

    assert!(read.can_get() && !read.can_set());
    assert!(!write.can_get() && write.can_set());

    let mut counter = Counter::default();
    assert!(!read.set(&mut counter, Box::new(3u32)));
    assert!(write.set(&mut counter, Box::new(3u32)));
    let hits = read.get(&counter).and_then(|v| v.downcast::<u32>().ok());
    assert_eq!(hits.map(|b| *b), Some(3));
}

#[test]
fn test_debug_reports_bound_halves() {
    let rendered = format!("{:?}", Accessor::read_only(|c: &Counter| c.hits));
    assert_eq!(rendered, "Accessor { getter: true, setter: false }");
}
