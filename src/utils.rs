//! Utils

use clap::Parser;

/// Arguments for the quote demo
#[derive(Debug, Parser)]
pub struct DemoQuoteArgs {
    /// Fixture set to use for the catalog & negotiated rates
    #[clap(short, long, default_value = "wholesale")]
    pub fixture: String,

    /// Restaurant fixture key to quote for
    #[clap(short, long, default_value = "old-town-bistro")]
    pub restaurant: String,

    /// Output file path
    #[clap(short, long)]
    pub out: Option<String>,
}
