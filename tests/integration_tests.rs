use serde::{Deserialize, Serialize};
use variant_codec::{
    from_bcon_slice, from_bson_slice, from_json_str, from_variant, to_bcon_vec, to_bson_vec,
    to_json_string, to_json_string_pretty, to_variant, CloneOptions, Error, Kind, Variant,
    VariantList, VariantMap,
};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
    note: Option<String>,
}

fn sample_order() -> Order {
    Order {
        order_id: 12345,
        customer: User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["vip".to_string(), "beta \"tester\"".to_string()],
        },
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.5,
                quantity: 1,
            },
        ],
        total: 109.48,
        note: None,
    }
}

#[test]
fn test_simple_struct_json() {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    };

    let json = to_json_string(&user).unwrap();
    assert_eq!(
        json,
        r#"{"id": 123, "name": "Alice", "active": true, "tags": ["admin", "developer"]}"#
    );

    let user_back: User = from_json_str(&json).unwrap();
    assert_eq!(user, user_back);
}

#[test]
fn test_nested_struct_all_formats() {
    let order = sample_order();

    let json = to_json_string_pretty(&order).unwrap();
    let from_json: Order = from_json_str(&json).unwrap();
    assert_eq!(from_json, order);

    let bson = to_bson_vec(&order).unwrap();
    let from_bson: Order = from_bson_slice(&bson).unwrap();
    assert_eq!(from_bson, order);

    let bcon = to_bcon_vec(&order).unwrap();
    let from_bcon: Order = from_bcon_slice(&bcon).unwrap();
    assert_eq!(from_bcon, order);
}

#[test]
fn test_bcon_is_smaller_than_bson() {
    let order = sample_order();
    let bson = to_bson_vec(&order).unwrap();
    let bcon = to_bcon_vec(&order).unwrap();
    assert!(bcon.len() < bson.len(), "bcon={} bson={}", bcon.len(), bson.len());
}

#[test]
fn test_scalar_root_rejected_by_document_formats() {
    assert!(matches!(to_json_string(&5), Err(Error::InvalidRoot(_))));
    assert!(matches!(to_bson_vec(&"text"), Err(Error::InvalidRoot(_))));
    // BCON encodes any value
    let bytes = to_bcon_vec(&5i64).unwrap();
    assert_eq!(from_bcon_slice::<i64>(&bytes).unwrap(), 5);
}

#[test]
fn test_to_variant_and_back() {
    let user = sample_order().customer;
    let value = to_variant(&user).unwrap();
    assert_eq!(value.kind(), Kind::Map);
    assert_eq!(value.get("name").unwrap().as_str(), Some("Alice"));
    assert_eq!(value.get("tags").unwrap().len(), 2);

    let back: User = from_variant(value).unwrap();
    assert_eq!(back, user);
}

#[test]
fn test_conversion_table() {
    let text = Variant::from(" 1234 ");
    assert_eq!(text.int_value().unwrap(), 1234);
    assert_eq!(text.long_value().unwrap(), 1234);
    assert_eq!(text.double_value().unwrap(), 1234.0);
    assert!(text.boolean_value().unwrap());

    assert_eq!(Variant::Double(2.75).long_value().unwrap(), 2);
    assert_eq!(Variant::Bool(true).double_value().unwrap(), 1.0);
    assert_eq!(Variant::ULong(300).byte_value().unwrap(), 44);
    assert_eq!(Variant::DateTime(86_400_000).long_value().unwrap(), 86_400_000);

    let list = Variant::from(vec![Variant::Int(1)]);
    assert!(matches!(list.double_value(), Err(Error::TypeMismatch { .. })));
    assert!(matches!(list.to_map(), Err(Error::TypeMismatch { .. })));
    assert!(matches!(
        Variant::from("nope").double_value(),
        Err(Error::Format { .. })
    ));
}

#[test]
fn test_effective_equality() {
    assert_eq!(Variant::Bool(true), Variant::Int(1));
    assert_eq!(Variant::Bool(false), Variant::Double(0.0));
    assert_eq!(Variant::from("1234"), Variant::DateTime(1234));
    assert_eq!(Variant::from("2.5"), Variant::Double(2.5));
    assert_eq!(Variant::Long(-1), Variant::Int(-1));
    assert_ne!(Variant::ULong(u64::MAX), Variant::Long(-1));
    assert_ne!(Variant::from("x"), Variant::from("y"));
    assert_ne!(Variant::Null, Variant::from(""));
}

#[test]
fn test_container_equality_is_structural() {
    let mut a = VariantMap::new();
    a.put("x", 1).unwrap().put("y", vec![Variant::Bool(true)]).unwrap();
    let mut b = VariantMap::new();
    b.put("y", vec![Variant::Int(1)]).unwrap().put("x", 1u8).unwrap();
    assert_eq!(Variant::from(a.clone()), Variant::from(b));

    let mut c = a.clone();
    c.put("z", ()).unwrap();
    assert_ne!(Variant::from(a), Variant::from(c));
}

#[test]
fn test_ordering() {
    assert!(Variant::Null < Variant::Int(-5));
    assert!(Variant::Int(2) < Variant::Double(2.5));
    assert!(Variant::from("abc") < Variant::from("abd"));
    assert!(Variant::ByteArray(vec![1, 2]) < Variant::ByteArray(vec![1, 3]));
    assert!(Variant::Double(f64::NAN).compare(&Variant::Int(1)).is_err());
    assert!(Variant::from(VariantList::new())
        .compare(&Variant::Null)
        .is_err());
}

#[test]
fn test_null_defaults() {
    let null = Variant::Null;
    assert_eq!(null.int_value().unwrap(), 0);
    assert!(null.to_list().unwrap().is_read_only());
    assert!(null.to_map().unwrap().is_empty());
    assert!(null.is_empty());
    assert!(matches!(null.get("k"), Err(Error::KeyNotFound(_))));
}

#[test]
fn test_deep_read_only_clone() {
    let mut inner = VariantMap::new();
    inner.put("n", 1).unwrap();
    let mut outer = VariantMap::new();
    outer.put("inner", inner).unwrap();
    let tree = Variant::from(outer);

    let mut frozen = tree.clone_with(CloneOptions::deep().read_only());
    assert!(matches!(
        frozen.to_map_mut().unwrap().put("k", 1),
        Err(Error::ReadOnly)
    ));
    let nested = frozen.to_map_mut().unwrap();
    assert!(nested.get("inner").unwrap().to_map().unwrap().is_read_only());

    let mut shallow = tree.clone_with(CloneOptions::shallow().read_only());
    assert!(shallow.to_map().unwrap().is_read_only());
    assert!(!shallow.get("inner").unwrap().to_map().unwrap().is_read_only());
    assert!(shallow.to_map_mut().unwrap().insert("k".into(), Variant::Null).is_err());
}

#[test]
fn test_path_helpers() {
    let mut map = VariantMap::new();
    map.update_path("db.primary.port", Some(Variant::from(5432)))
        .unwrap();
    map.update_path("db.primary.host", Some(Variant::from("localhost")))
        .unwrap();
    assert_eq!(
        map.resolve_path("db/primary/port", '/')
            .and_then(|v| v.int_value().ok()),
        Some(5432)
    );
    map.update_path("db.primary", None).unwrap();
    assert!(map.resolve_path("db.primary.host", '.').is_none());
    assert!(map.resolve_path("db", '.').unwrap().is_empty());
}

#[test]
fn test_hex_and_bytes() {
    assert_eq!(Variant::UInt(0xBEEF).to_hex_string().unwrap(), "0000BEEF");
    assert_eq!(Variant::Bool(true).to_hex_string().unwrap(), "1");
    assert_eq!(Variant::Null.to_hex_string().unwrap(), "0");
    assert!(Variant::from("x").to_hex_string().is_err());
    assert_eq!(Variant::Bool(true).to_byte_array().unwrap(), vec![1]);
    assert_eq!(
        Variant::Double(1.0).to_byte_array().unwrap(),
        1.0f64.to_le_bytes().to_vec()
    );
}

#[test]
fn test_display_of_containers() {
    let mut map = VariantMap::new();
    map.put("a", vec![Variant::Int(1), Variant::Null]).unwrap();
    assert_eq!(
        Variant::from(map).to_string(),
        "{\n    \"a\": [\n        1,\n        null\n    ]\n}"
    );
}
