//! Browse the live catalogs from the terminal
//!
//! ```bash
//! cargo run --example browse -- electronics "earbuds"
//! ```
//!
//! Loads the first page of a catalog, applies an optional search term
//! through the debounced input, adds the first visible product to the
//! cart and prints the cart summary.

use std::sync::Arc;
use storefront_client::logger::init_logger_with_file;
use storefront_client::{
    CatalogKind, Collaborators, DebouncedSearchInput, FetchState, NetworkCatalogClient, Storefront,
    StorefrontConfig,
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = StorefrontConfig::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    let mut args = std::env::args().skip(1);
    let kind: CatalogKind = args
        .next()
        .as_deref()
        .unwrap_or("men")
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let search = args.next();

    let source = Arc::new(NetworkCatalogClient::new(&config)?);
    let shop = Storefront::new(&config, source, &Collaborators::default());
    let page = shop.page(kind).clone();

    let shutdown = CancellationToken::new();
    let (input, searches) = DebouncedSearchInput::spawn(config.search_debounce(), shutdown.clone());
    let runner = tokio::spawn(page.clone().run(searches, shutdown.clone()));

    let mut states = page.subscribe_fetch();
    let mut wanted = 1;
    if let Some(term) = search {
        input.input(term);
        wanted = 2;
    }

    let state = states
        .wait_for(|s| s.request_seq() >= Some(wanted) && !s.is_loading())
        .await?
        .clone();

    match &state {
        FetchState::Success { total_pages, .. } => {
            println!("{} (page 1 of {total_pages})", kind.display_name());
            for product in state.visible_items() {
                println!(
                    "  {:<40} {:>8.2}  (was {:.2})",
                    product.title, product.price_discounted, product.price_original
                );
            }
            if let Some(first) = state.visible_items().next() {
                page.add_to_cart(first)?;
            }
        }
        FetchState::Error { message, .. } => println!("Could not load {kind}: {message}"),
        _ => {}
    }

    let summary = shop.cart.summary();
    println!(
        "Cart: {} item(s), total {} (saved {})",
        summary.item_count, summary.discounted_total, summary.savings
    );

    shutdown.cancel();
    runner.await?;
    Ok(())
}
