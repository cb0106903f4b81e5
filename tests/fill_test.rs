//! Typed filling through the global facade.

use chrono::{DateTime, Utc};
use feign::{FillError, Fillable, Overrides, Shape, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc::Sender;
use uuid::Uuid;

feign::fillable! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Address {
        pub city: String,
        pub zip: u32,
    }
}

feign::fillable! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Person {
        pub name: String,
        pub age: i64,
        pub email: String,
        pub address: Address,
        pub nickname: Option<String>,
        pub scores: BTreeMap<String, f64>,
        pub active: bool,
        password_hash: String,
    }
}

feign::fillable! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Item {
        pub sku: String,
        pub quantity: u16,
        pub price: f32,
    }
}

feign::fillable! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Order {
        pub id: Uuid,
        pub placed_at: DateTime<Utc>,
        pub items: Vec<Item>,
        pub notes: Option<String>,
        pub checksum: [u8; 4],
        pub labels: HashMap<String, bool>,
    }
}

feign::fillable! {
    pub struct Handle {
        pub label: String,
        pub events: Sender<u8>,
        pub replies: Option<Sender<u8>>,
        pub callback: Option<fn(u8) -> bool>,
        pub workers: Vec<Sender<u8>>,
        pub lanes: [Sender<u8>; 2],
        pub port: u16,
    }
}

feign::fillable! {
    pub struct Listener {
        pub name: String,
        pub handle: Option<Handle>,
    }
}

fn handle(events: &Sender<u8>) -> Handle {
    Handle {
        label: String::new(),
        events: events.clone(),
        replies: None,
        callback: None,
        workers: vec![events.clone()],
        lanes: [events.clone(), events.clone()],
        port: 0,
    }
}

fn empty_order() -> Order {
    Order {
        id: Uuid::nil(),
        placed_at: DateTime::<Utc>::default(),
        items: Vec::new(),
        notes: None,
        checksum: [0; 4],
        labels: HashMap::new(),
    }
}

fn is_letters(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_alphabetic() || b == b' ')
}

#[test]
fn test_fill_person() {
    let mut person = Person::default();
    feign::fill(&mut person, &[]).unwrap();

    assert!((1..64).contains(&person.name.len()));
    assert!(is_letters(&person.name));
    assert!((0..65536).contains(&person.age));
    assert!(!person.address.city.is_empty());
    assert!(person.address.zip < 65536);
    assert!(person.nickname.as_deref().is_some_and(|n| !n.is_empty()));
    assert!((1..64).contains(&person.scores.len()));
    assert!(person.scores.values().all(|s| (0.0..1.0).contains(s)));
    assert!(person.password_hash.is_empty());
}

#[test]
fn test_fill_with_overrides() {
    let table = Overrides::new()
        .set(".email", "someone@example.com")
        .set(".address.city", "Berlin");
    let age = |path: &str| -> Option<Value> { (path == ".age").then_some(Value::I64(30)) };

    let mut person = Person::default();
    feign::fill(&mut person, &[&table, &age]).unwrap();

    assert_eq!(person.email, "someone@example.com");
    assert_eq!(person.address.city, "Berlin");
    assert_eq!(person.age, 30);
    assert!(!person.name.is_empty());
}

#[test]
fn test_first_override_wins() {
    let first = Overrides::new().set(".name", "first");
    let second = Overrides::new().set(".name", "second");

    let mut person = Person::default();
    feign::fill(&mut person, &[&first, &second]).unwrap();

    assert_eq!(person.name, "first");
}

#[test]
fn test_null_override_clears_optional() {
    let overrides = Overrides::new().null(".nickname").null(".scores");

    let mut person = Person::default();
    feign::fill(&mut person, &[&overrides]).unwrap();

    assert_eq!(person.nickname, None);
    assert!(person.scores.is_empty());
}

#[test]
fn test_fill_order() {
    let mut order = empty_order();
    feign::fill(&mut order, &[]).unwrap();

    assert_ne!(order.id, Uuid::nil());
    assert_ne!(order.placed_at, DateTime::<Utc>::default());
    assert!((1..64).contains(&order.items.len()));
    for item in &order.items {
        assert!(!item.sku.is_empty());
        assert!((0.0..1.0).contains(&item.price));
    }
    assert!(order.notes.is_some());
    assert!(!order.labels.is_empty());
}

#[test]
fn test_opaque_fields_are_skipped() {
    let (tx, rx) = std::sync::mpsc::channel::<u8>();
    let mut handle = handle(&tx);

    feign::fill(&mut handle, &[]).unwrap();

    assert!(!handle.label.is_empty());
    assert!(handle.replies.is_none());
    assert!(handle.callback.is_none());
    assert_eq!(handle.workers.len(), 1);

    handle.events.send(1).unwrap();
    handle.workers[0].send(2).unwrap();
    handle.lanes[1].send(3).unwrap();
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![1, 2, 3]);

    let mut senders: Vec<Sender<u8>> = Vec::new();
    feign::fill(&mut senders, &[]).unwrap();
    assert!(senders.is_empty());
}

#[test]
fn test_struct_with_handles_behind_option() {
    let (tx, _rx) = std::sync::mpsc::channel::<u8>();

    let mut listener = Listener {
        name: String::new(),
        handle: None,
    };
    feign::fill(&mut listener, &[]).unwrap();
    assert!(!listener.name.is_empty());
    assert!(listener.handle.is_none());

    let overrides = Overrides::new().set(".handle.port", 8080i64);
    listener.handle = Some(handle(&tx));
    feign::fill(&mut listener, &[&overrides]).unwrap();
    let filled = listener.handle.unwrap();
    assert_eq!(filled.port, 8080);
    assert!(!filled.label.is_empty());
}

#[test]
fn test_fill_held_value() {
    let mut any = Value::from("hello");
    feign::fill(&mut any, &[]).unwrap();
    let filled = any.as_str().unwrap();
    assert_ne!(filled, "hello");
    assert!(is_letters(filled));

    let mut boxed = Some(Value::Seq(vec![Value::U8(0)]));
    feign::fill(&mut boxed, &[]).unwrap();
    match boxed {
        Some(Value::Seq(items)) => {
            assert!((1..64).contains(&items.len()));
            assert!(items.iter().all(|v| matches!(v, Value::U8(_))));
        }
        other => panic!("Expected a byte slice, got {other:?}"),
    }
}

#[test]
fn test_unsupported_root() {
    let (mut tx, _rx) = std::sync::mpsc::channel::<u8>();

    let result = feign::fill(&mut tx, &[]);

    assert!(matches!(
        result,
        Err(FillError::UnsupportedShape { kind: "channel" })
    ));
}

#[test]
fn test_unsupported_dynamic_root() {
    let mut any = Value::Null;

    let result = feign::fill(&mut any, &[]);

    assert!(matches!(result, Err(FillError::UnsupportedShape { kind: "any" })));
    assert_eq!(any, Value::Null);
}

#[test]
#[should_panic(expected = "Unsupported shape")]
fn test_must_fill_panics() {
    let (mut tx, _rx) = std::sync::mpsc::channel::<u8>();
    feign::must_fill(&mut tx, &[]);
}

#[test]
fn test_failed_fill_leaves_target() {
    let overrides = Overrides::new().set(".age", "not a number");
    let original = Person {
        name: "kept".to_string(),
        ..Person::default()
    };

    let mut person = original.clone();
    let result = feign::fill(&mut person, &[&overrides]);

    assert!(matches!(result, Err(FillError::Conversion { .. })));
    assert_eq!(person, original);
}

#[test]
fn test_existing_option_is_refilled() {
    let mut address = Some(Address {
        city: "old".to_string(),
        zip: 1,
    });
    feign::fill(&mut address, &[]).unwrap();

    let address = address.unwrap();
    assert!(is_letters(&address.city));

    let mut missing: Option<Address> = None;
    feign::fill(&mut missing, &[]).unwrap();
    assert!(missing.is_some());
}

#[test]
fn test_fill_value_dynamic() {
    let shape = Shape::pointer(Person::shape());
    let mut target = Value::pointer(Value::Null);
    let overrides = Overrides::new().set(".address.zip", 10115i64);

    feign::fill_value(&mut target, &shape, &[&overrides]).unwrap();

    assert_eq!(target.at_path(".address.zip"), Some(&Value::U32(10115)));
    let person = Person::from_value(target.as_pointee().cloned().unwrap()).unwrap();
    assert_eq!(person.address.zip, 10115);

    let mut null = Value::Null;
    assert!(matches!(
        feign::fill_value(&mut null, &shape, &[]),
        Err(FillError::InvalidTarget(_))
    ));
}
