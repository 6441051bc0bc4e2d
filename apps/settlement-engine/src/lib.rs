// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Settlement Engine - Rust Core Library
//!
//! Order and payment settlement for the storefront: create a pending order,
//! confirm it against the Toss Payments gateway, and reconcile inventory,
//! while keeping money, gateway state, and stock counts consistent under
//! concurrent access.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside -> outside)
//!
//! - **Domain**: Core business logic with no external dependencies
//!   - `orders`: Order aggregate, line items, status lifecycle, repository
//!     trait
//!   - `shared`: identifiers, money, validation errors
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for external systems (`PaymentGatewayPort`,
//!     `StockAdjusterPort`)
//!   - `use_cases`: `CreatePendingOrder`, `ConfirmPayment`, `CancelPayment`,
//!     `LookupPayment`
//!   - `dto`: Data transfer objects for API boundaries
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `gateway`: Toss Payments adapter with retry/backoff
//!   - `persistence`: Order repository and stock adjuster (SQLite,
//!     in-memory)
//!   - `http`: Axum REST controller
//!
//! # Invariants
//!
//! - An order's `total_amount` is immutable after creation and every
//!   confirmation is checked against it before the gateway is called.
//! - The `pending -> confirmed` transition is a storage-level
//!   compare-and-swap; concurrent confirmations settle exactly once.
//! - Stock counters only move through single conditional decrements.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Engine configuration from environment variables.
pub mod config;

/// Rich error handling with stable codes and HTTP mapping.
pub mod error;

/// Tracing and OpenTelemetry setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::orders::{
    aggregate::{NewOrder, Order, OrderItem},
    value_objects::{OrderStatus, PaymentRecord},
};
pub use domain::shared::{Money, OrderNumber, OrderRecordId, PaymentKey, ProductId};

// Application re-exports
pub use application::use_cases::{
    CancelPaymentUseCase, ConfirmPaymentUseCase, CreatePendingOrderUseCase, LookupPaymentUseCase,
};

// Error re-exports
pub use error::{ErrorCode, SettlementError};
