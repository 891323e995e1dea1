pub mod api;
pub mod config;
pub mod html;
pub mod models;
pub mod render;
pub mod scan;
pub mod terminal;

use api::Fetcher;
use models::Listing;
use render::{ build_prefixed_links, Container };

/// Fetches the listing at `url` once and renders it into `container`, links
/// placed below `link_prefix`. Returns whether anything was attached;
/// failures are logged by the fetcher.
pub async fn load_solution_links(
    fetcher: &Fetcher,
    url: &str,
    link_prefix: &str,
    container: &mut Container
) -> bool {
    fetcher.load_json(url, |listing: Listing| build_prefixed_links(listing, link_prefix, container)).await
}
