//! Create Pending Order Use Case

use std::sync::Arc;

use crate::application::dto::{CreateOrderDto, CreatedOrderDto};
use crate::domain::orders::aggregate::{NewOrder, OrderItem};
use crate::domain::orders::repository::OrderRepository;
use crate::domain::orders::value_objects::{CustomerDetails, ShippingDetails};
use crate::domain::shared::{Money, OrderNumber, ProductId};
use crate::error::SettlementError;

/// Use case for creating a pending order ahead of payment.
///
/// The store exposes no cross-table transaction here, so a failed item
/// insert is compensated by deleting the order row: the caller never sees a
/// half-created order.
pub struct CreatePendingOrderUseCase<O>
where
    O: OrderRepository,
{
    orders: Arc<O>,
}

impl<O> CreatePendingOrderUseCase<O>
where
    O: OrderRepository,
{
    /// Create a new CreatePendingOrderUseCase.
    pub fn new(orders: Arc<O>) -> Self {
        Self { orders }
    }

    /// Execute the use case. Returns the new order's internal id.
    pub async fn execute(&self, dto: CreateOrderDto) -> Result<CreatedOrderDto, SettlementError> {
        let new_order = Self::to_domain(&dto)?;

        let order = self.orders.insert_order(&new_order).await?;

        if let Err(items_error) = self
            .orders
            .insert_items(order.id(), new_order.items())
            .await
        {
            tracing::error!(
                order_number = %order.order_number(),
                error = %items_error,
                "Order item insert failed, rolling back order row"
            );

            if let Err(rollback_error) = self.orders.delete_order(order.id()).await {
                tracing::error!(
                    order_id = %order.id(),
                    error = %rollback_error,
                    "Compensating delete failed; orphaned order row remains"
                );
            }

            return Err(SettlementError::storage(format!(
                "Failed to save order items: {items_error}"
            ))
            .with_context("kind", "order_items_insert")
            .with_context("order_number", order.order_number().as_str()));
        }

        tracing::info!(
            order_id = %order.id(),
            order_number = %order.order_number(),
            total_amount = %order.total_amount(),
            item_count = new_order.items().len(),
            "Pending order created"
        );

        Ok(CreatedOrderDto {
            order_id: order.id().as_str().to_string(),
        })
    }

    /// Build the validated domain input from the DTO.
    fn to_domain(dto: &CreateOrderDto) -> Result<NewOrder, SettlementError> {
        let customer = CustomerDetails::new(
            dto.customer_name.clone(),
            dto.customer_phone.clone(),
            dto.customer_email.clone(),
        )
        .map_err(|e| SettlementError::invalid_request(e.to_string()))?;

        let shipping = ShippingDetails::new(
            dto.shipping_address.clone(),
            dto.shipping_postcode.clone(),
            dto.shipping_note.clone(),
        )
        .map_err(|e| SettlementError::invalid_request(e.to_string()))?;

        let items = dto
            .items
            .iter()
            .map(|item| {
                OrderItem::new(
                    ProductId::new(&item.product_id),
                    item.quantity,
                    Money::new(item.price),
                )
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SettlementError::invalid_request(e.to_string()))?;

        let new_order = NewOrder::new(
            OrderNumber::new(&dto.order_number),
            Money::new(dto.total_amount),
            customer,
            shipping,
            items,
        )?;

        Ok(new_order)
    }
}
