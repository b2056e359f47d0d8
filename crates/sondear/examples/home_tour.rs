//! Walk the sandbox home page end to end against the live site.
//!
//! Requires a local chromium:
//!
//! ```sh
//! cargo run --example home_tour --features browser
//! ```

use sondear::pages::HomePage;
use sondear::{Harness, HarnessConfig, SondearResult};
use std::time::Instant;

#[tokio::main]
async fn main() -> SondearResult<()> {
    sondear::logging::init();

    let config = HarnessConfig::builder()
        .fixtures_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"))
        .build();
    let mut harness = Harness::launch(config).await?;
    let run_config = harness.config().clone();

    let home = HomePage::new();
    let mut page = harness.new_page().await?;

    let started = Instant::now();
    home.visit(&mut page, &run_config).await?;
    let verification = home.verify_page_elements(&page, harness.fixtures()).await?;
    harness
        .record_verification(
            "specs/home",
            "verifies home page elements",
            started,
            &verification,
            &page,
        )
        .await?;

    let started = Instant::now();
    let outcome = home.click_toggle_theme(&mut page).await;
    harness
        .record_outcome("specs/home", "toggles the theme", started, outcome, &page)
        .await?;

    let artifacts = harness.finish().await?;
    if let Some(path) = artifacts.html {
        println!("report: {}", path.display());
    }
    if let Some(path) = artifacts.json {
        println!("report: {}", path.display());
    }
    Ok(())
}
