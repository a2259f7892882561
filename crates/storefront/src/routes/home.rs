//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use ecomgo_core::CatalogQuery;
use tracing::{instrument, warn};

use crate::components::{Layout, ProductCardView};
use crate::filters;
use crate::middleware::OptionalAccount;
use crate::state::AppState;

/// Products skipped before the "Discover" strip starts.
const DISCOVER_OFFSET: usize = 10;
/// Products in the "Discover" strip.
const DISCOVER_COUNT: usize = 10;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    /// Only set when someone is logged in.
    pub recommended: Option<Vec<ProductCardView>>,
    pub top_rated: Vec<ProductCardView>,
    pub discover: Vec<ProductCardView>,
}

/// Display the home page.
///
/// Each strip is fetched independently; a strip whose fetch fails is
/// shown empty.
#[instrument(skip(state, account, layout))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAccount(account): OptionalAccount,
    layout: Layout,
) -> impl IntoResponse {
    let client = state.marketplace();

    let recommended = match &account {
        Some(account) => {
            let products = client
                .get_recommended_products(account.username(), state.config().recommended_count)
                .await
                .unwrap_or_else(|e| {
                    warn!(error = %e, "Failed to load recommendations");
                    Vec::new()
                });
            Some(ProductCardView::list(&products, client, Some(account)))
        }
        None => None,
    };

    let top_rated = state.top_rated().await;

    let listing = state.catalog().resolve(&CatalogQuery::default(), None).await;
    let discover: Vec<_> = listing
        .products
        .iter()
        .skip(DISCOVER_OFFSET)
        .take(DISCOVER_COUNT)
        .cloned()
        .collect();

    HomeTemplate {
        recommended,
        top_rated: ProductCardView::list(&top_rated, client, account.as_ref()),
        discover: ProductCardView::list(&discover, client, account.as_ref()),
        layout,
    }
}
