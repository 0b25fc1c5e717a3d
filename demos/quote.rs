//! Quote demo
//!
//! Loads a fixture set, prices an order for one restaurant and prints the
//! rendered quote table. Run with `RUST_LOG=debug` to see the engine's
//! fail-open and viability diagnostics.

use std::fs;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use provender::{fixtures::Fixture, render::order_table, utils::DemoQuoteArgs};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = DemoQuoteArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let restaurant = fixture.restaurant_key(&args.restaurant)?;
    let currency = fixture.currency()?;

    let lines = [
        (fixture.product_key("tomato-crate")?, 25),
        (fixture.product_key("imereti-cheese")?, 35),
        (fixture.product_key("sunflower-oil")?, 8),
    ];

    let engine = fixture.into_engine();
    let order = engine.quote_order(restaurant, currency, &lines, Utc::now())?;

    let rendered = order_table(&order);
    println!("{rendered}");

    for &index in order.non_viable_lines() {
        let line = order.line(index)?;
        println!("line {} not viable: {}", index + 1, line.reason());
    }

    if let Some(out) = args.out {
        fs::write(out, rendered)?;
    }

    Ok(())
}
