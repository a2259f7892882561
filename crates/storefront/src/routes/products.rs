//! Product route handlers.
//!
//! The catalog page resolves the visitor's category and search inputs,
//! then shows one page of the result. The detail page shows a product with
//! its reviews, grouped into sentiment tabs.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use ecomgo_core::{
    CatalogQuery, CategoryFilter, Pagination, ProductId, Review, ReviewIndex, SentimentCounts,
    SentimentTab,
    review::{empty_message, visible_reviews},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};

use crate::components::{Layout, PaginationView, ProductCardView, user_href};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{OptionalAccount, RequireAccount};
use crate::models::session_keys;
use crate::routes::parse_page;
use crate::state::AppState;

/// Message shown when an empty review is submitted.
const EMPTY_REVIEW_MESSAGE: &str = "Please write something before submitting your review.";

// =============================================================================
// Query Types
// =============================================================================

/// Catalog query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub category: Option<String>,
    pub search_query: Option<String>,
    pub page: Option<String>,
    /// Reload-factor token of the link that was followed.
    pub rf: Option<String>,
}

/// Product detail query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductParams {
    pub sentiment: Option<String>,
    /// Present when the add-review form is open.
    pub add_review: Option<String>,
    /// Index of the review being edited.
    pub edit_review: Option<String>,
    /// Present when the last review submission was empty.
    pub empty_review: Option<String>,
}

// =============================================================================
// View Types
// =============================================================================

/// One option of the category selector.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub label: &'static str,
    pub selected: bool,
}

/// One sentiment tab.
#[derive(Debug, Clone)]
pub struct SentimentTabView {
    pub label: &'static str,
    pub href: String,
    pub count: usize,
    pub active: bool,
}

/// Review display data for templates.
#[derive(Debug, Clone)]
pub struct ReviewView {
    pub index: i64,
    pub username: String,
    pub user_href: String,
    pub text: String,
    pub sentiment: &'static str,
    /// Written by the visitor, so editable.
    pub own: bool,
    pub editing: bool,
}

impl ReviewView {
    fn new(review: &Review, viewer: Option<&str>, editing: Option<ReviewIndex>) -> Self {
        let own = viewer.is_some_and(|username| review.is_by(username));
        Self {
            index: review.index.get(),
            username: review.username.clone(),
            user_href: user_href(&review.username),
            text: review.text.clone(),
            sentiment: review.sentiment.label(),
            own,
            editing: own && editing == Some(review.index),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub categories: Vec<CategoryOption>,
    pub search_query: String,
    pub products: Vec<ProductCardView>,
    pub pagination: PaginationView,
    /// The marketplace could not be reached; an older listing is shown.
    pub stale: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductCardView,
    pub rated: bool,
    pub rating_count: usize,
    pub tabs: Vec<SentimentTabView>,
    pub reviews: Vec<ReviewView>,
    pub empty_message: Option<String>,
    pub adding_review: bool,
    pub review_error: Option<&'static str>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Parse a product id path segment; anything else is a missing product.
pub(crate) fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("product {raw}")))
}

/// Display the catalog.
///
/// A failed fetch keeps the listing the visitor was last shown, so the
/// query that listing came from is remembered in the session.
#[instrument(skip(state, session, account, layout))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalAccount(account): OptionalAccount,
    layout: Layout,
    Query(params): Query<CatalogParams>,
) -> impl IntoResponse {
    let query = CatalogQuery::new(
        CategoryFilter::parse_lenient(params.category.as_deref()),
        params.search_query.as_deref().unwrap_or_default(),
    );
    let shown = session
        .get::<CatalogQuery>(session_keys::SHOWN_CATALOG)
        .await
        .ok()
        .flatten();
    let listing = state.catalog().resolve(&query, shown.as_ref()).await;
    if !listing.stale && shown.as_ref() != Some(&query) {
        if let Err(e) = session.insert(session_keys::SHOWN_CATALOG, &query).await {
            warn!(error = %e, "Failed to remember catalog query");
        }
    }

    let factors = query.reload_factors();
    let pagination = Pagination::for_request(
        listing.products.len(),
        parse_page(params.page.as_deref()),
        &factors,
        params.rf.as_deref(),
    );
    let page = pagination.slice(&listing.products);

    let categories = CategoryFilter::options()
        .into_iter()
        .map(|option| CategoryOption {
            label: option.label(),
            selected: option == query.category(),
        })
        .collect();

    ProductsIndexTemplate {
        categories,
        search_query: query.search_query().to_string(),
        products: ProductCardView::list(page, state.marketplace(), account.as_ref()),
        pagination: PaginationView::new(
            &pagination,
            "/products",
            &[
                ("category", query.category().label()),
                ("search_query", query.search_query()),
            ],
            &factors,
        ),
        stale: listing.stale,
        layout,
    }
}

/// Display a product with its reviews.
#[instrument(skip(state, account, layout, params))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAccount(account): OptionalAccount,
    layout: Layout,
    Path(raw_id): Path<String>,
    Query(params): Query<ProductParams>,
) -> Result<impl IntoResponse> {
    let id = parse_product_id(&raw_id)?;
    let client = state.marketplace();

    let product = client
        .get_product(id)
        .await
        .map_err(|e| AppError::not_found_or(e, format!("product {id}")))?;

    let reviews = client.get_reviews(id).await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load reviews");
        Vec::new()
    });
    let raters = client.get_raters(id).await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load raters");
        Vec::new()
    });

    let viewer = account.as_ref().map(|a| a.username());
    let rated = viewer.is_some_and(|username| raters.iter().any(|r| r == username));

    let tab = SentimentTab::parse_lenient(params.sentiment.as_deref());
    let counts = SentimentCounts::tally(&reviews);
    let tabs = SentimentTab::tabs()
        .into_iter()
        .map(|t| SentimentTabView {
            label: t.label(),
            href: format!("/products/{id}?sentiment={}", t.as_str()),
            count: counts.for_tab(t),
            active: t == tab,
        })
        .collect();

    let editing = params
        .edit_review
        .as_deref()
        .and_then(|idx| idx.parse::<ReviewIndex>().ok());
    let visible = visible_reviews(&reviews, tab);
    let empty = visible.is_empty().then(|| empty_message(tab));
    let reviews = visible
        .into_iter()
        .map(|review| ReviewView::new(review, viewer, editing))
        .collect();

    let logged_in = account.is_some();

    Ok(ProductShowTemplate {
        product: ProductCardView::new(&product, client, account.as_ref()),
        rated,
        rating_count: raters.len(),
        tabs,
        reviews,
        empty_message: empty,
        adding_review: logged_in && params.add_review.is_some(),
        review_error: params.empty_review.is_some().then_some(EMPTY_REVIEW_MESSAGE),
        layout,
    })
}

/// Rate the product, or withdraw the rating if there is one.
#[instrument(skip(state, account), fields(username = %account.username()))]
pub async fn toggle_rating(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    Path(raw_id): Path<String>,
) -> Result<Redirect> {
    let id = parse_product_id(&raw_id)?;
    let client = state.marketplace();
    let back = format!("/products/{id}");

    let raters = match client.get_raters(id).await {
        Ok(raters) => raters,
        Err(e) => {
            warn!(error = %e, "Failed to load raters, rating unchanged");
            return Ok(Redirect::to(&back));
        }
    };

    let id_str = id.to_string();
    let result = if raters.iter().any(|r| r == account.username()) {
        add_breadcrumb("rating", "Unrated product", Some(&[("product_id", id_str.as_str())]));
        client.unrate_product(&account.credentials, id).await
    } else {
        add_breadcrumb("rating", "Rated product", Some(&[("product_id", id_str.as_str())]));
        client.rate_product(&account.credentials, id).await
    };

    if let Err(e) = result {
        warn!(error = %e, "Rating update failed");
    }

    Ok(Redirect::to(&back))
}
