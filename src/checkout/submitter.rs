//! Order Submission
//!
//! The order store is an external collaborator. Checkout only needs it to
//! record guest customers, accept orders and attach invoice numbers.

use std::{
    error::Error as StdError,
    sync::{Mutex, PoisonError},
};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use uuid::Uuid;

use super::{
    customer::CustomerRecord,
    order::{InvoiceNumber, OrderDraft, OrderId},
};

/// Failure reported by the order store.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SubmissionError {
    message: String,

    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl SubmissionError {
    /// Create an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error wrapping the underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The store's description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Order store used by checkout.
#[automock]
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Create or update a guest customer record.
    async fn upsert_customer(&self, customer: &CustomerRecord) -> Result<(), SubmissionError>;

    /// Persist an order and return its identifier.
    async fn insert_order(&self, order: &OrderDraft) -> Result<OrderId, SubmissionError>;

    /// Attach an invoice number to an existing order.
    async fn assign_invoice_number(
        &self,
        order: OrderId,
        invoice: &InvoiceNumber,
    ) -> Result<(), SubmissionError>;
}

/// An order recorded by [`InMemoryOrderStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredOrder {
    /// Assigned identifier
    pub id: OrderId,

    /// The submitted order
    pub order: OrderDraft,

    /// Invoice number, once assigned
    pub invoice_number: Option<InvoiceNumber>,
}

#[derive(Debug, Default)]
struct StoreState {
    customers: Vec<CustomerRecord>,
    orders: Vec<StoredOrder>,
}

/// Order store that keeps everything in memory.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    state: Mutex<StoreState>,
}

impl InMemoryOrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders recorded so far.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmissionError`] if the store's lock is poisoned.
    pub fn orders(&self) -> Result<Vec<StoredOrder>, SubmissionError> {
        Ok(self.lock()?.orders.clone())
    }

    /// Customer records written so far.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmissionError`] if the store's lock is poisoned.
    pub fn customers(&self) -> Result<Vec<CustomerRecord>, SubmissionError> {
        Ok(self.lock()?.customers.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreState>, SubmissionError> {
        self.state
            .lock()
            .map_err(|err: PoisonError<_>| SubmissionError::new(err.to_string()))
    }
}

#[async_trait]
impl OrderSubmitter for InMemoryOrderStore {
    async fn upsert_customer(&self, customer: &CustomerRecord) -> Result<(), SubmissionError> {
        let mut state = self.lock()?;

        match state
            .customers
            .iter_mut()
            .find(|existing| existing.id == customer.id)
        {
            Some(existing) => *existing = customer.clone(),
            None => state.customers.push(customer.clone()),
        }

        Ok(())
    }

    async fn insert_order(&self, order: &OrderDraft) -> Result<OrderId, SubmissionError> {
        let id = OrderId::new(Uuid::new_v4());

        self.lock()?.orders.push(StoredOrder {
            id,
            order: order.clone(),
            invoice_number: None,
        });

        Ok(id)
    }

    async fn assign_invoice_number(
        &self,
        order: OrderId,
        invoice: &InvoiceNumber,
    ) -> Result<(), SubmissionError> {
        let mut state = self.lock()?;

        let stored = state
            .orders
            .iter_mut()
            .find(|stored| stored.id == order)
            .ok_or_else(|| SubmissionError::new(format!("order {order} not found")))?;

        stored.invoice_number = Some(*invoice);

        Ok(())
    }
}
