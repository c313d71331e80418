//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Each session's cart ID is stored in the session and mapped to an in-memory
//! store by the [`CartRegistry`](crate::carts::CartRegistry). Only adding an
//! item creates a cart; every other handler renders an empty cart for a
//! session that has none.
//!
//! Handlers never edit cart lines themselves: every button is turned into a
//! [`CartAction`] (or an add) and dispatched to the store, and the response is
//! rendered from the store's state afterwards.

use std::convert::Infallible;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{
        AppendHeaders, IntoResponse, Redirect, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use paradise_nursery_core::{CartAction, CartError};
use serde::Deserialize;
use tokio::sync::watch;
use tokio_stream::{Stream, StreamExt, wrappers::WatchStream};
use tower_sessions::Session;
use tracing::{debug, instrument};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;
use crate::view::CartView;

/// HTMX event fired whenever the cart changes.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Notice shown in place of a real checkout.
pub const CHECKOUT_NOTICE: &str = "Functionality to be added for future reference";

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub name: String,
}

/// Quantity buttons on a cart line.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineAction {
    Increment,
    Decrement,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub name: String,
    pub action: LineAction,
}

impl From<UpdateCartForm> for CartAction {
    fn from(form: UpdateCartForm) -> Self {
        match form.action {
            LineAction::Increment => Self::Increment { name: form.name },
            LineAction::Decrement => Self::Decrement { name: form.name },
        }
    }
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub name: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u64,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Checkout notice fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_notice.html")]
pub struct CheckoutNoticeTemplate {
    pub message: &'static str,
}

/// Render the cart items fragment with the cart-updated trigger.
fn cart_items_response(cart: CartView) -> Response {
    (
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

/// The session's cart as a view, or an empty one if it has no cart.
async fn current_view(state: &AppState, session: &Session) -> Result<CartView> {
    match state.carts().find(session).await? {
        Some(cart) => {
            let store = cart.store().lock().await;
            Ok(CartView::from_cart(store.cart())?)
        }
        None => Ok(CartView::empty(state.config().currency)),
    }
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    let view = current_view(&state, &session).await?;

    Ok(CartShowTemplate {
        cart_count: view.item_count,
        cart: view,
    })
}

/// Add a plant to the cart (HTMX).
///
/// A plant already in the cart gets one more unit. Returns the cart count
/// badge with an HTMX trigger so other fragments refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let plant = state
        .catalog()
        .find(&form.name)
        .ok_or_else(|| AppError::NotFound(form.name.clone()))?;

    let cart = state.carts().for_session(&session).await?;
    let count = {
        let mut store = cart.store().lock().await;
        let quantity = store.add_item(plant.to_cart_item())?;
        debug!(cart_id = %cart.id(), item = %plant.name, %quantity, "Added to cart");
        store.cart().total_quantity()
    };

    add_breadcrumb("cart", "Added item to cart", Some(&[("item", plant.name.as_str())][..]));

    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        CartCountTemplate { count },
    )
        .into_response())
}

/// Increment or decrement a cart line (HTMX).
///
/// Decrementing a line at quantity 1 removes it.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let Some(cart) = state.carts().find(&session).await? else {
        return Err(CartError::ItemNotFound(form.name).into());
    };
    let view = {
        let mut store = cart.store().lock().await;
        let outcome = CartAction::from(form).apply(&mut store)?;
        debug!(cart_id = %cart.id(), ?outcome, "Cart line updated");
        CartView::from_cart(store.cart())?
    };

    Ok(cart_items_response(view))
}

/// Remove a cart line regardless of quantity (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let Some(cart) = state.carts().find(&session).await? else {
        return Ok(cart_items_response(CartView::empty(state.config().currency)));
    };
    let view = {
        let mut store = cart.store().lock().await;
        let outcome = CartAction::Remove { name: form.name }.apply(&mut store)?;
        debug!(cart_id = %cart.id(), ?outcome, "Cart line removed");
        CartView::from_cart(store.cart())?
    };

    Ok(cart_items_response(view))
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let count = match state.carts().find(&session).await? {
        Some(cart) => cart.store().lock().await.cart().total_quantity(),
        None => 0,
    };

    Ok(CartCountTemplate { count })
}

/// Leave the cart for the configured shopping destination.
#[instrument(skip(state))]
pub async fn continue_shopping(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.config().continue_shopping_url)
}

/// Checkout placeholder.
///
/// There is no checkout yet; a non-empty cart gets a notice saying so. An
/// empty cart is rejected, matching the disabled button on the page.
#[instrument(skip(state, session))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
) -> Result<CheckoutNoticeTemplate> {
    let is_empty = match state.carts().find(&session).await? {
        Some(cart) => cart.store().lock().await.cart().is_empty(),
        None => true,
    };
    if is_empty {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    add_breadcrumb("cart", "Checkout requested", None);

    Ok(CheckoutNoticeTemplate {
        message: CHECKOUT_NOTICE,
    })
}

/// Stream re-rendered cart items whenever this session's cart changes.
///
/// Each event is named `cart-updated` and carries the `cart_items` fragment,
/// so an `hx-ext="sse"` container can swap it in directly.
///
/// A session without a cart gets a stream that ends at once; the browser's
/// `EventSource` reconnects later and picks up the cart once one exists.
#[instrument(skip(state, session))]
pub async fn events(
    State(state): State<AppState>,
    session: Session,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let (cart_id, updates) = match state.carts().find(&session).await? {
        Some(cart) => (Some(cart.id()), cart.subscribe()),
        None => {
            let (_, updates) = watch::channel(CartView::empty(state.config().currency));
            (None, updates)
        }
    };

    let stream = WatchStream::from_changes(updates).filter_map(move |view| {
        match (CartItemsTemplate { cart: view }).render() {
            Ok(html) => Some(Ok(Event::default().event(CART_UPDATED_EVENT).data(html))),
            Err(e) => {
                tracing::error!(?cart_id, "Failed to render cart event: {e}");
                None
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
