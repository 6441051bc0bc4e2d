//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to application use cases.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::application::dto::{CancelPaymentDto, ConfirmPaymentDto, CreateOrderDto, OrderItemDto};
use crate::application::ports::{PaymentGatewayPort, StockAdjusterPort};
use crate::application::use_cases::{
    CancelPaymentUseCase, ConfirmPaymentUseCase, CreatePendingOrderUseCase, LookupPaymentUseCase,
};
use crate::domain::orders::repository::OrderRepository;
use crate::error::SettlementError;

use super::request::{CancelPaymentRequest, ConfirmPaymentRequest, CreateOrderRequest};
use super::response::{CreateOrderResponse, HealthResponse};

/// Application state shared across handlers.
pub struct AppState<G, O, S>
where
    G: PaymentGatewayPort,
    O: OrderRepository,
    S: StockAdjusterPort,
{
    /// Use case for creating pending orders.
    pub create_order: Arc<CreatePendingOrderUseCase<O>>,
    /// Use case for confirming payments.
    pub confirm_payment: Arc<ConfirmPaymentUseCase<G, O, S>>,
    /// Use case for cancelling payments.
    pub cancel_payment: Arc<CancelPaymentUseCase<G, O>>,
    /// Use case for querying payments.
    pub lookup_payment: Arc<LookupPaymentUseCase<G>>,
    /// Application version.
    pub version: String,
}

impl<G, O, S> Clone for AppState<G, O, S>
where
    G: PaymentGatewayPort,
    O: OrderRepository,
    S: StockAdjusterPort,
{
    fn clone(&self) -> Self {
        Self {
            create_order: Arc::clone(&self.create_order),
            confirm_payment: Arc::clone(&self.confirm_payment),
            cancel_payment: Arc::clone(&self.cancel_payment),
            lookup_payment: Arc::clone(&self.lookup_payment),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<G, O, S>(state: AppState<G, O, S>) -> Router
where
    G: PaymentGatewayPort + 'static,
    O: OrderRepository + 'static,
    S: StockAdjusterPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/orders", post(create_order))
        .route("/api/v1/payments/confirm", post(confirm_payment))
        .route("/api/v1/payments/cancel", post(cancel_payment))
        .route("/api/v1/payments/{payment_key}", get(get_payment))
        .with_state(state)
}

/// Render a settlement error with its mapped HTTP status.
fn error_response(error: &SettlementError) -> Response {
    (error.code().http_status(), Json(error.to_http_response())).into_response()
}

/// Health check endpoint.
async fn health_check<G, O, S>(State(state): State<AppState<G, O, S>>) -> impl IntoResponse
where
    G: PaymentGatewayPort,
    O: OrderRepository,
    S: StockAdjusterPort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Create a pending order.
async fn create_order<G, O, S>(
    State(state): State<AppState<G, O, S>>,
    Json(request): Json<CreateOrderRequest>,
) -> Response
where
    G: PaymentGatewayPort,
    O: OrderRepository,
    S: StockAdjusterPort,
{
    let dto = CreateOrderDto {
        order_number: request.order_number,
        total_amount: request.total_amount,
        customer_name: request.customer_name,
        customer_phone: request.customer_phone,
        customer_email: request.customer_email,
        shipping_address: request.shipping_address,
        shipping_postcode: request.shipping_postcode,
        shipping_note: request.shipping_note,
        items: request
            .items
            .into_iter()
            .map(|item| OrderItemDto {
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
            })
            .collect(),
    };

    match state.create_order.execute(dto).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(CreateOrderResponse {
                order_id: created.order_id,
            }),
        )
            .into_response(),
        Err(error) => error_response(&error),
    }
}

/// Confirm a payment against the gateway.
async fn confirm_payment<G, O, S>(
    State(state): State<AppState<G, O, S>>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Response
where
    G: PaymentGatewayPort,
    O: OrderRepository,
    S: StockAdjusterPort,
{
    let dto = ConfirmPaymentDto {
        payment_key: request.payment_key,
        order_number: request.order_id,
        amount: request.amount,
    };

    match state.confirm_payment.execute(dto).await {
        // The gateway's payload is the success body.
        Ok(payment) => (StatusCode::OK, Json(payment.raw)).into_response(),
        Err(error) => error_response(&error),
    }
}

/// Cancel a payment.
async fn cancel_payment<G, O, S>(
    State(state): State<AppState<G, O, S>>,
    Json(request): Json<CancelPaymentRequest>,
) -> Response
where
    G: PaymentGatewayPort,
    O: OrderRepository,
    S: StockAdjusterPort,
{
    let dto = CancelPaymentDto {
        payment_key: request.payment_key,
        cancel_reason: request.cancel_reason,
        cancel_amount: request.cancel_amount,
    };

    match state.cancel_payment.execute(dto).await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(error) => error_response(&error),
    }
}

/// Query a payment by its key.
async fn get_payment<G, O, S>(
    State(state): State<AppState<G, O, S>>,
    Path(payment_key): Path<String>,
) -> Response
where
    G: PaymentGatewayPort,
    O: OrderRepository,
    S: StockAdjusterPort,
{
    match state.lookup_payment.execute(&payment_key).await {
        Ok(payment) => (StatusCode::OK, Json(payment.raw)).into_response(),
        Err(error) => error_response(&error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        ConfirmPaymentRequest as PortConfirmRequest, GatewayError, GatewayPayment,
    };
    use crate::domain::shared::PaymentKey;
    use crate::infrastructure::persistence::{InMemoryOrderRepository, InMemoryStockAdjuster};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::Utc;
    use tower::util::ServiceExt;

    struct EchoGateway;

    #[async_trait]
    impl PaymentGatewayPort for EchoGateway {
        async fn confirm_payment(
            &self,
            request: &PortConfirmRequest,
        ) -> Result<GatewayPayment, GatewayError> {
            Ok(GatewayPayment {
                payment_key: request.payment_key.clone(),
                order_number: request.order_number.clone(),
                status: "DONE".to_string(),
                total_amount: request.amount,
                method: "card".to_string(),
                approved_at: Some(Utc::now()),
                raw: serde_json::json!({
                    "paymentKey": request.payment_key.as_str(),
                    "orderId": request.order_number.as_str(),
                    "status": "DONE",
                    "totalAmount": request.amount.amount(),
                }),
            })
        }

        async fn get_payment(
            &self,
            payment_key: &PaymentKey,
        ) -> Result<GatewayPayment, GatewayError> {
            Err(GatewayError::Rejected {
                status: 404,
                code: Some("NOT_FOUND_PAYMENT".to_string()),
                message: format!("unknown payment {payment_key}"),
            })
        }

        async fn cancel_payment(
            &self,
            _request: &crate::application::ports::CancelPaymentRequest,
        ) -> Result<serde_json::Value, GatewayError> {
            Ok(serde_json::json!({"status": "CANCELED"}))
        }
    }

    fn router() -> Router {
        let orders = Arc::new(InMemoryOrderRepository::new());
        let stock = Arc::new(InMemoryStockAdjuster::new());
        let gateway = Arc::new(EchoGateway);

        let state = AppState {
            create_order: Arc::new(CreatePendingOrderUseCase::new(Arc::clone(&orders))),
            confirm_payment: Arc::new(ConfirmPaymentUseCase::new(
                Arc::clone(&gateway),
                Arc::clone(&orders),
                stock,
            )),
            cancel_payment: Arc::new(CancelPaymentUseCase::new(
                Arc::clone(&gateway),
                Arc::clone(&orders),
            )),
            lookup_payment: Arc::new(LookupPaymentUseCase::new(gateway)),
            version: "0.1.0-test".to_string(),
        };
        create_router(state)
    }

    fn create_order_body() -> serde_json::Value {
        serde_json::json!({
            "orderNumber": "A-1001",
            "totalAmount": 50_000,
            "customerName": "Hong Gildong",
            "customerPhone": "010-1234-5678",
            "customerEmail": "hong@example.com",
            "shippingAddress": "12 Teheran-ro, Seoul",
            "shippingPostcode": "06234",
            "items": [
                {"productId": "prod-1", "quantity": 2, "price": 15_000},
                {"productId": "prod-2", "quantity": 1, "price": 20_000}
            ]
        })
    }

    fn json_request(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_version() {
        let response = router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], "0.1.0-test");
    }

    #[tokio::test]
    async fn create_order_returns_created_with_id() {
        let response = router()
            .oneshot(json_request("/api/v1/orders", &create_order_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert!(body["orderId"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn create_order_validation_failure_maps_to_bad_request() {
        let mut body = create_order_body();
        body["customerEmail"] = serde_json::json!("not-an-email");

        let response = router()
            .oneshot(json_request("/api/v1/orders", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn confirm_after_create_returns_gateway_payload() {
        let app = router();

        let response = app
            .clone()
            .oneshot(json_request("/api/v1/orders", &create_order_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let confirm = serde_json::json!({
            "paymentKey": "pay_abc123",
            "orderId": "A-1001",
            "amount": 50_000
        });
        let response = app
            .oneshot(json_request("/api/v1/payments/confirm", &confirm))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "DONE");
        assert_eq!(body["orderId"], "A-1001");
    }

    #[tokio::test]
    async fn confirm_unknown_order_maps_to_not_found() {
        let confirm = serde_json::json!({
            "paymentKey": "pay_abc123",
            "orderId": "missing",
            "amount": 50_000
        });
        let response = router()
            .oneshot(json_request("/api/v1/payments/confirm", &confirm))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "ORDER_NOT_FOUND");
    }

    #[tokio::test]
    async fn confirm_amount_mismatch_maps_to_unprocessable() {
        let app = router();
        app.clone()
            .oneshot(json_request("/api/v1/orders", &create_order_body()))
            .await
            .unwrap();

        let confirm = serde_json::json!({
            "paymentKey": "pay_abc123",
            "orderId": "A-1001",
            "amount": 49_999
        });
        let response = app
            .oneshot(json_request("/api/v1/payments/confirm", &confirm))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["code"], "AMOUNT_MISMATCH");
    }

    #[tokio::test]
    async fn cancel_returns_processor_payload() {
        let cancel = serde_json::json!({
            "paymentKey": "pay_abc123",
            "cancelReason": "customer request"
        });
        let response = router()
            .oneshot(json_request("/api/v1/payments/cancel", &cancel))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "CANCELED");
    }

    #[tokio::test]
    async fn lookup_unknown_payment_surfaces_gateway_rejection() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/payments/pay_unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["code"], "GATEWAY_REJECTED");
    }
}
