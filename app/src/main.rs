//! FILENAME: app/src/main.rs
// PURPOSE: Console entry point.

use clap::Parser;

#[tokio::main]
async fn main() {
    app_lib::run(app_lib::Cli::parse()).await;
}
