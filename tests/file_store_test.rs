use serde_json::json;

use fundraiser_tracker::application::order_store::{OrderStore, ORDERS_KEY};
use fundraiser_tracker::domain::order::{DeliveryStatus, OrderInput, PaymentStatus};
use fundraiser_tracker::domain::ports::KeyValueStore;
use fundraiser_tracker::infrastructure::json_file_store::JsonFileStore;

#[test]
fn orders_survive_a_restart() {
    let dir = tempfile::tempdir().expect("tempdir");

    let created = {
        let mut store = OrderStore::open(JsonFileStore::new(dir.path()));
        store.toggle_payment("3").expect("toggle");
        store
            .create(OrderInput {
                customer_name: "Priya".to_string(),
                phone_number: "555-2020".to_string(),
                items: "1x Lemon Loaf".to_string(),
                total_price: json!("6.50"),
                payment_status: PaymentStatus::Paid,
                delivery_status: DeliveryStatus::Pending,
                notes: "Gym entrance".to_string(),
            })
            .expect("create")
    };

    let reopened = OrderStore::open(JsonFileStore::new(dir.path()));

    assert_eq!(reopened.orders().len(), 4);
    assert_eq!(reopened.get(&created.id), Some(&created));
    assert_eq!(
        reopened.get("3").expect("seed order").payment_status,
        PaymentStatus::Paid
    );
}

#[test]
fn unreadable_file_falls_back_to_seed_and_is_repaired() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = JsonFileStore::new(dir.path());
    files.set(ORDERS_KEY, "[{\"id\": 1,").expect("write corrupt data");

    let store = OrderStore::open(JsonFileStore::new(dir.path()));
    assert_eq!(store.orders().len(), 3);

    let raw = files.get(ORDERS_KEY).expect("read").expect("present");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json after startup");
    assert_eq!(value.as_array().map(Vec::len), Some(3));
    assert_eq!(value[0]["orderNumber"], "ORD-001");
}
