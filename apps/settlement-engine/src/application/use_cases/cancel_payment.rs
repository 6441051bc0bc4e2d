//! Cancel Payment Use Case

use std::sync::Arc;

use crate::application::dto::CancelPaymentDto;
use crate::application::ports::{CancelPaymentRequest, PaymentGatewayPort};
use crate::domain::orders::repository::OrderRepository;
use crate::domain::shared::{Money, PaymentKey};
use crate::error::SettlementError;

/// Use case for cancelling a settled payment.
///
/// The gateway is the source of truth: its failure surfaces to the caller
/// with no store mutation, while after gateway success the matching order is
/// set to `cancelled` best-effort. Cancellation does not race against replay
/// the way confirmation does, so no CAS guard is needed on the store update.
pub struct CancelPaymentUseCase<G, O>
where
    G: PaymentGatewayPort,
    O: OrderRepository,
{
    gateway: Arc<G>,
    orders: Arc<O>,
}

impl<G, O> CancelPaymentUseCase<G, O>
where
    G: PaymentGatewayPort,
    O: OrderRepository,
{
    /// Create a new CancelPaymentUseCase.
    pub fn new(gateway: Arc<G>, orders: Arc<O>) -> Self {
        Self { gateway, orders }
    }

    /// Execute the use case. Returns the processor's cancel payload.
    pub async fn execute(
        &self,
        dto: CancelPaymentDto,
    ) -> Result<serde_json::Value, SettlementError> {
        if dto.payment_key.trim().is_empty() {
            return Err(SettlementError::invalid_request("paymentKey is required"));
        }
        if dto.cancel_reason.trim().is_empty() {
            return Err(SettlementError::invalid_request(
                "cancelReason is required",
            ));
        }
        if let Some(amount) = dto.cancel_amount
            && amount <= 0
        {
            return Err(SettlementError::invalid_request(
                "cancelAmount must be positive",
            ));
        }

        let payment_key = PaymentKey::new(dto.payment_key.trim());
        let request = CancelPaymentRequest {
            payment_key: payment_key.clone(),
            cancel_reason: dto.cancel_reason,
            cancel_amount: dto.cancel_amount.map(Money::new),
        };

        // Gateway failure surfaces verbatim; order state is untouched.
        let payload = self.gateway.cancel_payment(&request).await?;

        match self.orders.cancel_by_payment_key(&payment_key).await {
            Ok(0) => {
                tracing::warn!(
                    payment_key = %payment_key,
                    "Cancelled payment matched no stored order"
                );
            }
            Ok(rows) => {
                tracing::info!(
                    payment_key = %payment_key,
                    rows,
                    "Order marked cancelled"
                );
            }
            Err(error) => {
                // The gateway-side cancellation already happened; the store
                // update is best-effort and its failure is only logged.
                tracing::error!(
                    payment_key = %payment_key,
                    error = %error,
                    "Gateway cancel succeeded but order status update failed"
                );
            }
        }

        Ok(payload)
    }
}
