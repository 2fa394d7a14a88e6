//! Snapshotting object state, inspecting it, and replaying it.
//!
//! Run with: cargo run --example snapshot

use serde::{Deserialize, Serialize};
use serde_spytext::{from_str, to_string, Registry, Value};
use std::error::Error;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename = "shop.Customer")]
struct Customer {
    id: u32,
    name: String,
    email: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename = "shop.Order")]
struct Order {
    id: u64,
    customer: Customer,
    lines: Vec<String>,
    note: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let order = Order {
        id: 1001,
        customer: Customer {
            id: 7,
            name: "Ada; Countess of Lovelace".to_string(),
            email: None,
        },
        lines: vec!["<engine>".to_string(), "punch cards & ink".to_string()],
        note: Some(String::new()),
    };

    // Snapshot: one line, every object named
    let text = to_string(&order)?;
    println!("Snapshot:\n  {}\n", text);

    // Replay into the same type
    let replayed: Order = from_str(&text)?;
    println!("Replayed equals original: {}\n", replayed == order);

    // Inspect without the Rust type
    let value: Value = text.parse()?;
    println!("Root type: {:?}", value.type_name());
    if let Some(customer) = value.get("customer") {
        println!("Customer type: {:?}", customer.type_name());
        println!("Customer name: {:?}", customer.get("name").and_then(Value::as_str));
        println!("Customer email is null: {}", customer.get("email").map_or(false, Value::is_null));
    }
    if let Some(lines) = value.get("lines").and_then(Value::as_array) {
        println!("Order lines: {}\n", lines.len());
    }

    // Decode by the encoded type name alone
    let mut registry = Registry::new();
    registry
        .register::<Order>("shop.Order")
        .register::<Customer>("shop.Customer");

    let customer_text = to_string(&order.customer)?;
    if let Some(decoded) = registry.decode(&customer_text)? {
        if let Ok(customer) = decoded.downcast::<Customer>() {
            println!("Registry decoded {} into {:?}", customer_text, customer);
        }
    }

    Ok(())
}
