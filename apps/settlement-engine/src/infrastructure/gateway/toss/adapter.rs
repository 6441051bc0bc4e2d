//! Toss gateway adapter implementing PaymentGatewayPort.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::ports::{
    CancelPaymentRequest, ConfirmPaymentRequest, GatewayError, GatewayPayment, PaymentGatewayPort,
};
use crate::domain::shared::{Money, OrderNumber, PaymentKey};

use super::api_types::{TossCancelRequest, TossConfirmRequest, TossPaymentResponse};
use super::config::TossConfig;
use super::error::TossError;
use super::http_client::TossHttpClient;

/// Toss Payments gateway adapter.
///
/// Implements `PaymentGatewayPort` for the Toss Payments REST API.
#[derive(Debug, Clone)]
pub struct TossGatewayAdapter {
    client: TossHttpClient,
}

impl TossGatewayAdapter {
    /// Create a new Toss gateway adapter.
    pub fn new(config: TossConfig) -> Result<Self, TossError> {
        let client = TossHttpClient::new(&config)?;
        Ok(Self { client })
    }

    /// Map a raw gateway payload onto the port's payment type.
    fn parse_payment(raw: serde_json::Value) -> Result<GatewayPayment, TossError> {
        let parsed: TossPaymentResponse = serde_json::from_value(raw.clone())
            .map_err(|e| TossError::JsonParse(e.to_string()))?;

        let approved_at = parsed
            .approved_at
            .as_deref()
            .map(parse_rfc3339)
            .transpose()?;

        Ok(GatewayPayment {
            payment_key: PaymentKey::new(parsed.payment_key),
            order_number: OrderNumber::new(parsed.order_id),
            status: parsed.status,
            total_amount: Money::new(parsed.total_amount),
            method: parsed.method.unwrap_or_default(),
            approved_at,
            raw,
        })
    }
}

fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>, TossError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TossError::JsonParse(format!("bad approvedAt timestamp '{value}': {e}")))
}

#[async_trait]
impl PaymentGatewayPort for TossGatewayAdapter {
    async fn confirm_payment(
        &self,
        request: &ConfirmPaymentRequest,
    ) -> Result<GatewayPayment, GatewayError> {
        tracing::info!(
            order_number = %request.order_number,
            amount = %request.amount,
            "Requesting payment confirmation from gateway"
        );

        let body = TossConfirmRequest {
            payment_key: request.payment_key.as_str().to_string(),
            order_id: request.order_number.as_str().to_string(),
            amount: request.amount.amount(),
        };

        let raw: serde_json::Value = self
            .client
            .post("/v1/payments/confirm", &body)
            .await
            .map_err(GatewayError::from)?;

        let payment = Self::parse_payment(raw).map_err(GatewayError::from)?;

        tracing::info!(
            order_number = %payment.order_number,
            payment_key = %payment.payment_key,
            gateway_status = %payment.status,
            "Gateway answered confirmation request"
        );

        Ok(payment)
    }

    async fn get_payment(&self, payment_key: &PaymentKey) -> Result<GatewayPayment, GatewayError> {
        let raw: serde_json::Value = self
            .client
            .get(&format!("/v1/payments/{}", payment_key.as_str()))
            .await
            .map_err(GatewayError::from)?;

        Self::parse_payment(raw).map_err(GatewayError::from)
    }

    async fn cancel_payment(
        &self,
        request: &CancelPaymentRequest,
    ) -> Result<serde_json::Value, GatewayError> {
        tracing::info!(
            payment_key = %request.payment_key,
            partial = request.cancel_amount.is_some(),
            "Requesting payment cancellation from gateway"
        );

        let body = TossCancelRequest {
            cancel_reason: request.cancel_reason.clone(),
            cancel_amount: request.cancel_amount.map(|m| m.amount()),
        };

        self.client
            .post(
                &format!("/v1/payments/{}/cancel", request.payment_key.as_str()),
                &body,
            )
            .await
            .map_err(GatewayError::from)
    }
}
