//! Product (plant catalog) route handlers.

use std::collections::HashSet;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Plant display data for templates.
#[derive(Clone)]
pub struct PlantView {
    pub name: String,
    pub image: String,
    pub description: String,
    pub price: String,
    /// Already in this session's cart; the add button renders disabled.
    pub in_cart: bool,
}

/// Category display data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub name: String,
    pub plants: Vec<PlantView>,
}

/// Build category views, marking plants whose names are in `in_cart`.
fn category_views(catalog: &Catalog, in_cart: &HashSet<String>) -> Vec<CategoryView> {
    catalog
        .categories()
        .iter()
        .map(|category| CategoryView {
            name: category.name.clone(),
            plants: category
                .plants
                .iter()
                .map(|plant| PlantView {
                    name: plant.name.clone(),
                    image: plant.image.clone(),
                    description: plant.description.clone(),
                    price: plant.price.display(),
                    in_cart: in_cart.contains(&plant.name),
                })
                .collect(),
        })
        .collect()
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub categories: Vec<CategoryView>,
    pub cart_count: u64,
}

/// Display the plant catalog.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<ProductsIndexTemplate> {
    let (in_cart, cart_count) = match state.carts().find(&session).await? {
        Some(cart) => {
            let store = cart.store().lock().await;
            let names = store
                .cart()
                .items()
                .iter()
                .map(|item| item.name.clone())
                .collect::<HashSet<_>>();
            (names, store.cart().total_quantity())
        }
        None => (HashSet::new(), 0),
    };

    Ok(ProductsIndexTemplate {
        categories: category_views(state.catalog(), &in_cart),
        cart_count,
    })
}
