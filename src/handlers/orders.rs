use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_service::{OrderMutationResult, OrderService};
use crate::domain::order::{CheckoutDraft, OrderChanges, OrderStatus, OrderView};
use crate::errors::AppError;
use crate::infrastructure::order_repo::DieselOrderRepository;

/// The service wired into the HTTP layer.
pub type AppOrderService = OrderService<DieselOrderRepository>;

/// Actor recorded on history rows when the client names none.
const DEFAULT_ACTOR: &str = "system";

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub user_id: Uuid,
    pub notes: Option<String>,
    pub shipping_address_id: Option<Uuid>,
    pub billing_address_id: Option<Uuid>,
    /// Identity recorded as `changed_by` on the status history.
    pub actor: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    /// Target status, e.g. "CONFIRMED". Validated against the transition table.
    pub status: Option<String>,
    pub notes: Option<String>,
    pub shipping_address_id: Option<Uuid>,
    pub billing_address_id: Option<Uuid>,
    /// Free-form note attached to the history row for a status change.
    pub status_notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub actor: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelOrderParams {
    pub reason: Option<String>,
    pub actor: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub product_name: String,
    pub product_sku: String,
    pub variant_name: Option<String>,
    pub quantity: i32,
    /// Decimal amount as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    pub total_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusHistoryResponse {
    pub id: Uuid,
    pub status: String,
    pub notes: Option<String>,
    pub changed_by: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub status: String,
    pub subtotal: String,
    pub tax_amount: String,
    pub shipping_amount: String,
    pub discount_amount: String,
    pub total_amount: String,
    pub currency: String,
    pub notes: Option<String>,
    pub shipping_address_id: Option<Uuid>,
    pub billing_address_id: Option<Uuid>,
    pub shipped_at: Option<String>,
    pub delivered_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
    pub history: Vec<StatusHistoryResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        OrderResponse {
            id: view.id,
            order_number: view.order_number,
            user_id: view.user_id,
            status: view.status.as_str().to_string(),
            subtotal: view.subtotal.to_string(),
            tax_amount: view.tax_amount.to_string(),
            shipping_amount: view.shipping_amount.to_string(),
            discount_amount: view.discount_amount.to_string(),
            total_amount: view.total_amount.to_string(),
            currency: view.currency,
            notes: view.notes,
            shipping_address_id: view.shipping_address_id,
            billing_address_id: view.billing_address_id,
            shipped_at: view.shipped_at.map(|t| t.to_rfc3339()),
            delivered_at: view.delivered_at.map(|t| t.to_rfc3339()),
            cancelled_at: view.cancelled_at.map(|t| t.to_rfc3339()),
            cancellation_reason: view.cancellation_reason,
            created_at: view.created_at.to_rfc3339(),
            items: view
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    id: i.id,
                    product_id: i.product_id,
                    variant_id: i.variant_id,
                    product_name: i.product_name,
                    product_sku: i.product_sku,
                    variant_name: i.variant_name,
                    quantity: i.quantity,
                    unit_price: i.unit_price.to_string(),
                    total_price: i.total_price.to_string(),
                })
                .collect(),
            history: view
                .history
                .into_iter()
                .map(|h| StatusHistoryResponse {
                    id: h.id,
                    status: h.status.as_str().to_string(),
                    notes: h.notes,
                    changed_by: h.changed_by,
                    created_at: h.created_at.to_rfc3339(),
                })
                .collect(),
        }
    }
}

/// Uniform body for every lifecycle mutation, success or business failure.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderMutationResponse {
    pub success: bool,
    pub message: String,
    pub order: Option<OrderResponse>,
}

impl From<OrderMutationResult> for OrderMutationResponse {
    fn from(result: OrderMutationResult) -> Self {
        OrderMutationResponse {
            success: result.success,
            message: result.message,
            order: result.order.map(OrderResponse::from),
        }
    }
}

fn mutation_response(result: OrderMutationResult, success_status: u16) -> HttpResponse {
    let body = OrderMutationResponse::from(result);
    if body.success {
        match success_status {
            201 => HttpResponse::Created().json(body),
            _ => HttpResponse::Ok().json(body),
        }
    } else {
        HttpResponse::UnprocessableEntity().json(body)
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Checks out the user's active cart into an order. Order header, item
/// snapshots, the initial history row, the cart deactivation, and the
/// `OrderCreated` outbox event are all written in a single database
/// transaction; subscribers are notified only after commit.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderMutationResponse),
        (status = 422, description = "Business rule violated (missing user, empty cart)", body = OrderMutationResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<AppOrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let result = web::block(move || {
        let actor = body.actor.as_deref().unwrap_or(DEFAULT_ACTOR);
        service.create_order(
            body.user_id,
            actor,
            CheckoutDraft {
                notes: body.notes,
                shipping_address_id: body.shipping_address_id,
                billing_address_id: body.billing_address_id,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(mutation_response(result, 201))
}

/// PUT /orders/{id}
///
/// Applies field updates and an optional status transition. Transitions are
/// validated against the lifecycle table; rejected transitions leave the
/// order untouched and report the offending from/to pair.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderMutationResponse),
        (status = 400, description = "Unparseable status value"),
        (status = 422, description = "Business rule violated (invalid transition, not found)", body = OrderMutationResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    service: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let body = body.into_inner();

    let new_status = body
        .status
        .as_deref()
        .map(|s| s.parse::<OrderStatus>())
        .transpose()
        .map_err(AppError::BadRequest)?;

    let result = web::block(move || {
        let actor = body.actor.as_deref().unwrap_or(DEFAULT_ACTOR);
        service.update_order(
            order_id,
            actor,
            OrderChanges {
                new_status,
                notes: body.notes,
                shipping_address_id: body.shipping_address_id,
                billing_address_id: body.billing_address_id,
                status_notes: body.status_notes,
                cancellation_reason: body.cancellation_reason,
            },
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(mutation_response(result, 200))
}

/// DELETE /orders/{id}
///
/// Cancels the order; no row is ever deleted. Rejected for orders already
/// shipped, delivered, or cancelled.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
        ("reason" = Option<String>, Query, description = "Cancellation reason"),
        ("actor" = Option<String>, Query, description = "Identity recorded on the history row"),
    ),
    responses(
        (status = 200, description = "Order cancelled", body = OrderMutationResponse),
        (status = 422, description = "Cancellation not allowed", body = OrderMutationResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    service: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
    query: web::Query<CancelOrderParams>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let params = query.into_inner();

    let result = web::block(move || {
        let actor = params.actor.as_deref().unwrap_or(DEFAULT_ACTOR);
        service.cancel_order(order_id, actor, params.reason)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(mutation_response(result, 200))
}

/// GET /orders/{id}
///
/// Returns the order together with its item snapshots and status history.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<AppOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let result = web::block(move || service.get_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match result {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// GET /orders
///
/// Returns a paginated list of orders (headers only, newest first).
/// Use `page` (1-based) and `limit` to control pagination.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<AppOrderService>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let result = web::block(move || service.list_orders(page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}
