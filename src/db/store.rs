//! Customer storage
//!
//! `CustomerStore` is the seam handlers talk to; `PgCustomerStore` is the
//! PostgreSQL implementation backed by the shared connection pool.

use crate::db::queries::{
    DELETE_CUSTOMER, GET_CUSTOMER, INSERT_CUSTOMER, LIST_CUSTOMERS, UPDATE_CUSTOMER,
};
use crate::error::AppError;
use crate::models::Customer;
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use tracing::debug;

/// Storage operations for customers. Each call is one round-trip.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Customer>, AppError>;

    /// `None` when no row has this id
    async fn get(&self, id: i32) -> Result<Option<Customer>, AppError>;

    async fn create(&self, name: &str) -> Result<Customer, AppError>;

    /// `None` when no row has this id
    async fn update(&self, id: i32, name: &str) -> Result<Option<Customer>, AppError>;

    /// Returns whether a row was removed
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

/// PostgreSQL-backed customer store
pub struct PgCustomerStore {
    pool: Pool,
}

impl PgCustomerStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn customer_from_row(row: &Row) -> Customer {
    Customer {
        customer_id: row.get("customerid"),
        customer_name: row.get("customername"),
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn list(&self) -> Result<Vec<Customer>, AppError> {
        let client = self.pool.get().await?;
        let rows = client.query(LIST_CUSTOMERS, &[]).await?;

        debug!("Fetched {} customers", rows.len());
        Ok(rows.iter().map(customer_from_row).collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Customer>, AppError> {
        let client = self.pool.get().await?;
        let row = client.query_opt(GET_CUSTOMER, &[&id]).await?;

        Ok(row.as_ref().map(customer_from_row))
    }

    async fn create(&self, name: &str) -> Result<Customer, AppError> {
        let client = self.pool.get().await?;
        let row = client.query_one(INSERT_CUSTOMER, &[&name]).await?;

        Ok(customer_from_row(&row))
    }

    async fn update(&self, id: i32, name: &str) -> Result<Option<Customer>, AppError> {
        let client = self.pool.get().await?;
        let row = client.query_opt(UPDATE_CUSTOMER, &[&name, &id]).await?;

        Ok(row.as_ref().map(customer_from_row))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let client = self.pool.get().await?;
        let affected = client.execute(DELETE_CUSTOMER, &[&id]).await?;

        Ok(affected > 0)
    }
}

/// In-memory store used by handler tests
#[cfg(test)]
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct MemoryCustomerStore {
        inner: RwLock<Inner>,
    }

    #[derive(Default)]
    struct Inner {
        next_id: i32,
        rows: BTreeMap<i32, String>,
    }

    impl MemoryCustomerStore {
        pub async fn len(&self) -> usize {
            self.inner.read().await.rows.len()
        }
    }

    #[async_trait]
    impl CustomerStore for MemoryCustomerStore {
        async fn list(&self) -> Result<Vec<Customer>, AppError> {
            let inner = self.inner.read().await;
            Ok(inner
                .rows
                .iter()
                .map(|(id, name)| Customer {
                    customer_id: *id,
                    customer_name: name.clone(),
                })
                .collect())
        }

        async fn get(&self, id: i32) -> Result<Option<Customer>, AppError> {
            let inner = self.inner.read().await;
            Ok(inner.rows.get(&id).map(|name| Customer {
                customer_id: id,
                customer_name: name.clone(),
            }))
        }

        async fn create(&self, name: &str) -> Result<Customer, AppError> {
            let mut inner = self.inner.write().await;
            inner.next_id += 1;
            let id = inner.next_id;
            inner.rows.insert(id, name.to_string());
            Ok(Customer {
                customer_id: id,
                customer_name: name.to_string(),
            })
        }

        async fn update(&self, id: i32, name: &str) -> Result<Option<Customer>, AppError> {
            let mut inner = self.inner.write().await;
            Ok(inner.rows.get_mut(&id).map(|stored| {
                *stored = name.to_string();
                Customer {
                    customer_id: id,
                    customer_name: name.to_string(),
                }
            }))
        }

        async fn delete(&self, id: i32) -> Result<bool, AppError> {
            Ok(self.inner.write().await.rows.remove(&id).is_some())
        }
    }

    /// Store whose pool is closed, so every call fails before reaching SQL
    pub struct FailingCustomerStore;

    fn closed() -> AppError {
        AppError::Pool(deadpool_postgres::PoolError::Closed)
    }

    #[async_trait]
    impl CustomerStore for FailingCustomerStore {
        async fn list(&self) -> Result<Vec<Customer>, AppError> {
            Err(closed())
        }

        async fn get(&self, _id: i32) -> Result<Option<Customer>, AppError> {
            Err(closed())
        }

        async fn create(&self, _name: &str) -> Result<Customer, AppError> {
            Err(closed())
        }

        async fn update(&self, _id: i32, _name: &str) -> Result<Option<Customer>, AppError> {
            Err(closed())
        }

        async fn delete(&self, _id: i32) -> Result<bool, AppError> {
            Err(closed())
        }
    }
}
