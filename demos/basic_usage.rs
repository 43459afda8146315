// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the hexvalues crate.
//!
//! This example demonstrates:
//! - Loading INI properties from a string
//! - Reading typed values with defaults
//! - Password keys stored as secrets
//! - Adding a custom recognition to a type parser
//! - Value checks and optional values
//!
//! To run this example:
//! ```bash
//! RUST_LOG=debug cargo run --example basic_usage
//! ```

use hexvalues::prelude::*;
use std::sync::Arc;

const SETTINGS: &str = r#"
[server]
host = example.com
port = 8080
secure = on
mirrors = [eu.example.com|us.example.com]
workers = 1..4

[db]
user = admin
password = "hunter2"
"#;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== hexvalues: Basic Usage ===\n");

    let properties = Properties::from_string(SETTINGS)?;
    println!("Loaded sections: {:?}\n", properties.section_names());

    // Example 1: Typed accessors
    println!("--- Example 1: Typed Values ---");
    let port = properties.parse("server", "port")?.as_int()?;
    let secure = properties.parse("server", "secure")?.as_bool()?;
    let mirrors = properties.parse("server", "mirrors")?.as_list()?;
    println!("port = {:?}, secure = {:?}", port, secure);
    println!("mirrors = {:?}", mirrors.unwrap_or_default());

    // Example 2: Defaults for missing keys
    println!("\n--- Example 2: Defaults ---");
    let timeout = properties
        .parse("server", "timeout")?
        .defaulting_to(30)
        .as_int()?;
    println!("timeout = {:?} (default)", timeout);

    // Example 3: Recognized types
    println!("\n--- Example 3: Recognized Types ---");
    for key in properties.keys_for_section("server") {
        if let Some(ParsedProperty::Value(value)) = properties.parse_value("server", key)? {
            println!("{:<8} {:<6} {}", key, value.type_name(), value);
        }
    }

    // Example 4: Secrets
    println!("\n--- Example 4: Secrets ---");
    if let Some(password) = properties.value("db", "password").and_then(PropertyValue::as_secret) {
        println!("password prints as {}", password);
        println!("password has {} characters", password.length());
    }
    if let Err(e) = properties.parse("db", "password") {
        println!("parsing a password fails: {}", e);
    }

    // Example 5: Custom recognition
    println!("\n--- Example 5: Custom Recognition ---");
    let parser = Arc::new(TypeParser::new());
    parser.add_recognition("binford", |input| {
        (input == "Binford 6100").then(|| TypedValue::from("More power!"))
    });
    println!("Binford 6100 -> {}", parser.to_type(Some("Binford 6100"))?);

    // Example 6: Checks and optional values
    println!("\n--- Example 6: Checks ---");
    let host = Value::of("example.com");
    println!("host ends in .com: {}", host.is_matched_by("/\\.com$/")?);
    println!("host is a string: {}", host.check("is_string", &[])?);

    let fallback = Outcome::of(None::<String>).when_null("localhost".to_string());
    println!("fallback host = {:?}", fallback.value());

    // Example 7: Modifiable properties
    println!("\n--- Example 7: Modifiable Properties ---");
    let mut modifiable = ModifiableProperties::new();
    modifiable
        .set_value("net", "host", "example.com")
        .set_boolean_value("net", "secure", true)
        .set_range_value("net", "ports", &[8080, 8081, 8082]);
    let ports = modifiable
        .value("net", "ports")
        .map(ToString::to_string)
        .unwrap_or_default();
    println!("net.ports = {}", ports);

    let frozen = modifiable.unmodifiable()?;
    println!("frozen sections: {}", frozen.len());

    println!("\n=== Example Complete ===");
    Ok(())
}
