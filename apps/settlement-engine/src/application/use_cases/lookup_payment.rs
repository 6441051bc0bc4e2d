//! Lookup Payment Use Case
//!
//! Queries the gateway for a payment by its key. Operators use this to
//! inspect gateway-side state when a confirmation was flagged for manual
//! reconciliation.

use std::sync::Arc;

use crate::application::ports::{GatewayPayment, PaymentGatewayPort};
use crate::domain::shared::PaymentKey;
use crate::error::SettlementError;

/// Use case for querying a payment by key.
pub struct LookupPaymentUseCase<G>
where
    G: PaymentGatewayPort,
{
    gateway: Arc<G>,
}

impl<G> LookupPaymentUseCase<G>
where
    G: PaymentGatewayPort,
{
    /// Create a new LookupPaymentUseCase.
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Execute the use case. Returns the gateway's payment payload.
    pub async fn execute(&self, payment_key: &str) -> Result<GatewayPayment, SettlementError> {
        if payment_key.trim().is_empty() {
            return Err(SettlementError::invalid_request("paymentKey is required"));
        }

        let key = PaymentKey::new(payment_key.trim());
        let payment = self.gateway.get_payment(&key).await?;
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        CancelPaymentRequest, ConfirmPaymentRequest, GatewayError,
    };
    use crate::domain::shared::{Money, OrderNumber};
    use crate::error::ErrorCode;
    use async_trait::async_trait;

    struct MockGateway {
        known_key: &'static str,
    }

    #[async_trait]
    impl PaymentGatewayPort for MockGateway {
        async fn confirm_payment(
            &self,
            _request: &ConfirmPaymentRequest,
        ) -> Result<GatewayPayment, GatewayError> {
            unreachable!()
        }

        async fn get_payment(
            &self,
            payment_key: &PaymentKey,
        ) -> Result<GatewayPayment, GatewayError> {
            if payment_key.as_str() != self.known_key {
                return Err(GatewayError::Rejected {
                    status: 404,
                    code: Some("NOT_FOUND_PAYMENT".to_string()),
                    message: "payment not found".to_string(),
                });
            }
            Ok(GatewayPayment {
                payment_key: payment_key.clone(),
                order_number: OrderNumber::new("A-1001"),
                status: "DONE".to_string(),
                total_amount: Money::new(50_000),
                method: "card".to_string(),
                approved_at: Some(chrono::Utc::now()),
                raw: serde_json::json!({"status": "DONE"}),
            })
        }

        async fn cancel_payment(
            &self,
            _request: &CancelPaymentRequest,
        ) -> Result<serde_json::Value, GatewayError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn lookup_returns_gateway_payload() {
        let use_case = LookupPaymentUseCase::new(Arc::new(MockGateway {
            known_key: "pay_abc123",
        }));

        let payment = use_case.execute("pay_abc123").await.unwrap();
        assert_eq!(payment.status, "DONE");
        assert_eq!(payment.order_number.as_str(), "A-1001");
    }

    #[tokio::test]
    async fn lookup_unknown_key_surfaces_rejection() {
        let use_case = LookupPaymentUseCase::new(Arc::new(MockGateway {
            known_key: "pay_abc123",
        }));

        let error = use_case.execute("pay_unknown").await.unwrap_err();
        assert_eq!(error.code(), ErrorCode::GatewayRejected);
    }

    #[tokio::test]
    async fn empty_key_is_rejected() {
        let use_case = LookupPaymentUseCase::new(Arc::new(MockGateway {
            known_key: "pay_abc123",
        }));

        let error = use_case.execute("  ").await.unwrap_err();
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}
