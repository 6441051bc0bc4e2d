//! Confirm Payment Use Case
//!
//! The security-critical settlement path. Guards run strictly before the
//! gateway call (amount, idempotency, state), the gateway response is
//! re-validated against the request, and the store transition is a guarded
//! compare-and-swap. A lost CAS after a settled charge is the one outcome
//! that must never be retried; it is surfaced as a distinguished
//! reconciliation error carrying the payment key.

use std::sync::Arc;

use crate::application::dto::ConfirmPaymentDto;
use crate::application::ports::{
    ConfirmPaymentRequest, GatewayPayment, PaymentGatewayPort, StockAdjusterPort,
};
use crate::domain::orders::aggregate::Order;
use crate::domain::orders::repository::OrderRepository;
use crate::domain::orders::value_objects::{OrderStatus, PaymentRecord};
use crate::domain::shared::{Money, OrderNumber, PaymentKey};
use crate::error::SettlementError;

/// Use case for confirming a payment against the gateway.
pub struct ConfirmPaymentUseCase<G, O, S>
where
    G: PaymentGatewayPort,
    O: OrderRepository,
    S: StockAdjusterPort,
{
    gateway: Arc<G>,
    orders: Arc<O>,
    stock: Arc<S>,
}

impl<G, O, S> ConfirmPaymentUseCase<G, O, S>
where
    G: PaymentGatewayPort,
    O: OrderRepository,
    S: StockAdjusterPort,
{
    /// Create a new ConfirmPaymentUseCase.
    pub fn new(gateway: Arc<G>, orders: Arc<O>, stock: Arc<S>) -> Self {
        Self {
            gateway,
            orders,
            stock,
        }
    }

    /// Execute the use case. Returns the gateway's confirmation payload.
    pub async fn execute(&self, dto: ConfirmPaymentDto) -> Result<GatewayPayment, SettlementError> {
        // 1. Shape validation, before touching store or gateway.
        if dto.payment_key.trim().is_empty() {
            return Err(SettlementError::invalid_request("paymentKey is required"));
        }
        if dto.order_number.trim().is_empty() {
            return Err(SettlementError::invalid_request("orderId is required"));
        }
        if dto.amount <= 0 {
            return Err(SettlementError::invalid_request("amount must be positive"));
        }

        let order_number = OrderNumber::new(&dto.order_number);
        let amount = Money::new(dto.amount);

        // 2. The order must exist before we spend a gateway round-trip.
        let order = self
            .orders
            .find_by_order_number(&order_number)
            .await?
            .ok_or_else(|| SettlementError::order_not_found(order_number.as_str()))?;

        // 3. Amount guard. A mismatched amount must never reach the gateway.
        if order.total_amount() != amount {
            tracing::warn!(
                order_number = %order_number,
                stored_amount = %order.total_amount(),
                requested_amount = %amount,
                "Confirmation amount does not match stored order total"
            );
            return Err(SettlementError::amount_mismatch(
                order_number.as_str(),
                order.total_amount().amount(),
                amount.amount(),
            ));
        }

        // 4. Idempotency / state guard against duplicate submission,
        // retried client requests, and webhook replay.
        match order.status() {
            OrderStatus::Confirmed => {
                tracing::warn!(
                    order_number = %order_number,
                    existing_payment_key = order.payment().map_or("", |p| p.payment_key.as_str()),
                    "Duplicate confirmation attempt for confirmed order"
                );
                return Err(SettlementError::already_confirmed(order_number.as_str()));
            }
            OrderStatus::Cancelled => {
                return Err(SettlementError::invalid_order_state(
                    order_number.as_str(),
                    order.status().as_str(),
                ));
            }
            OrderStatus::Pending => {}
        }

        // 5. Gateway confirm. No order mutation has happened yet, so every
        // failure on this path is safely retriable by the caller.
        let request = ConfirmPaymentRequest {
            payment_key: PaymentKey::new(dto.payment_key.trim()),
            order_number: order_number.clone(),
            amount,
        };
        let payment = self.gateway.confirm_payment(&request).await?;

        // 6. Response integrity.
        let approved_at = Self::verify_response(&request, &payment)?;

        // 7. Guarded transition. "Not applied" here means the charge is
        // settled gateway-side while the order moved out of pending.
        let record = PaymentRecord::new(
            payment.payment_key.clone(),
            payment.method.clone(),
            approved_at,
        );
        let confirmed = match self.orders.confirm_if_pending(&order_number, &record).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                tracing::error!(
                    order_number = %order_number,
                    payment_key = %payment.payment_key,
                    "Charge settled but order left pending state concurrently; manual reconciliation required"
                );
                return Err(SettlementError::reconciliation_required(
                    order_number.as_str(),
                    payment.payment_key.as_str(),
                ));
            }
            Err(store_error) => {
                tracing::error!(
                    order_number = %order_number,
                    payment_key = %payment.payment_key,
                    error = %store_error,
                    "Charge settled but store update failed; manual reconciliation required"
                );
                return Err(SettlementError::reconciliation_required(
                    order_number.as_str(),
                    payment.payment_key.as_str(),
                )
                .with_context("store_message", store_error.to_string()));
            }
        };

        // 8. Inventory fan-out. The payment is irreversibly settled, so
        // stock failures are logged and alerted, never escalated.
        self.adjust_stock(&confirmed).await;

        tracing::info!(
            order_number = %order_number,
            payment_key = %payment.payment_key,
            amount = %payment.total_amount,
            method = %payment.method,
            "Payment confirmed"
        );

        // 9. The gateway payload is the success result.
        Ok(payment)
    }

    /// Check the gateway's echo against the request.
    ///
    /// Any mismatch indicates gateway-side or transport-layer
    /// tampering/corruption and must never be silently accepted.
    fn verify_response(
        request: &ConfirmPaymentRequest,
        payment: &GatewayPayment,
    ) -> Result<chrono::DateTime<chrono::Utc>, SettlementError> {
        if !payment.is_done() {
            tracing::error!(
                order_number = %request.order_number,
                payment_key = %request.payment_key,
                gateway_status = %payment.status,
                "Gateway returned a non-settled payment status"
            );
            return Err(SettlementError::response_integrity(
                format!("Unexpected gateway payment status: {}", payment.status),
                request.order_number.as_str(),
            ));
        }

        if payment.total_amount != request.amount {
            tracing::error!(
                order_number = %request.order_number,
                requested_amount = %request.amount,
                response_amount = %payment.total_amount,
                "Gateway response amount does not match the request"
            );
            return Err(SettlementError::response_integrity(
                "Gateway response amount does not match the request",
                request.order_number.as_str(),
            )
            .with_context("response_amount", payment.total_amount.to_string()));
        }

        if payment.order_number != request.order_number {
            tracing::error!(
                requested_order_number = %request.order_number,
                response_order_number = %payment.order_number,
                "Gateway response order number does not match the request"
            );
            return Err(SettlementError::response_integrity(
                "Gateway response order number does not match the request",
                request.order_number.as_str(),
            )
            .with_context("response_order_number", payment.order_number.as_str()));
        }

        payment.approved_at.ok_or_else(|| {
            SettlementError::response_integrity(
                "Gateway response is missing the approval timestamp",
                request.order_number.as_str(),
            )
        })
    }

    /// Decrement stock once per line item, concurrently and independently.
    async fn adjust_stock(&self, order: &Order) {
        let items = match self.orders.items_for_order(order.id()).await {
            Ok(items) => items,
            Err(error) => {
                tracing::error!(
                    order_number = %order.order_number(),
                    error = %error,
                    "Could not load order items for stock adjustment"
                );
                return;
            }
        };

        let outcomes = futures::future::join_all(items.iter().map(|item| async move {
            let result = self
                .stock
                .decrement_stock(item.product_id(), item.quantity())
                .await;
            (item, result)
        }))
        .await;

        for (item, outcome) in outcomes {
            if let Err(error) = outcome {
                tracing::error!(
                    order_number = %order.order_number(),
                    product_id = %item.product_id(),
                    quantity = item.quantity(),
                    error = %error,
                    "Stock decrement failed after settlement"
                );
            }
        }
    }
}
