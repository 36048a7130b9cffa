//! Herodraft demo runner.
//!
//! This crate is the *composition root*: it wires the in-memory catalogs to
//! the ports, drives one creation session end to end, and prints the emitted
//! creation record.

mod run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run::run().await
}
