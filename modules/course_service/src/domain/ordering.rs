//! Per-scope order assignment for sibling records
//!
//! Modules are ordered within their course and contents within their module.
//! A new record without an explicit order gets `max(order) + 1` of its scope,
//! or 0 when the scope is empty. The read and the write are two storage
//! operations, so [`OrderAssigner::insert`] serializes them per scope and
//! retries when storage reports the pair as taken by another writer.

use super::repository::OrderTaken;
use super::storage_error;
use crate::contract::{CourseError, NewContent, NewModule, OrderScope};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Record carrying an order value unique within its scope
pub trait Ordered {
    fn scope(&self) -> OrderScope;

    /// Order to store; `None` asks for assignment
    fn order_mut(&mut self) -> &mut Option<u32>;
}

impl Ordered for NewModule {
    fn scope(&self) -> OrderScope {
        OrderScope::Course(self.course_id)
    }

    fn order_mut(&mut self) -> &mut Option<u32> {
        &mut self.order
    }
}

impl Ordered for NewContent {
    fn scope(&self) -> OrderScope {
        OrderScope::Module(self.module_id)
    }

    fn order_mut(&mut self) -> &mut Option<u32> {
        &mut self.order
    }
}

/// Highest order the order columns can hold
pub const MAX_ORDER: u32 = i32::MAX as u32;

/// Order following the highest one in a scope
pub fn next_order(max: Option<u32>) -> u32 {
    max.map_or(0, |max| max.saturating_add(1))
}

/// Fill in the record's order unless it already holds one.
///
/// `max_order` looks up the highest order among the siblings; a lookup that
/// finds nothing means an empty scope.
pub async fn assign_order<R, F, Fut>(record: &mut R, max_order: F) -> anyhow::Result<u32>
where
    R: Ordered,
    F: FnOnce(OrderScope) -> Fut,
    Fut: Future<Output = anyhow::Result<Option<u32>>>,
{
    if let Some(order) = *record.order_mut() {
        return Ok(order);
    }
    let order = next_order(max_order(record.scope()).await?);
    *record.order_mut() = Some(order);
    Ok(order)
}

/// Serializes order assignment per scope and retries lost races.
///
/// A scope's lock entry lives only while some task holds or awaits it.
pub struct OrderAssigner {
    locks: Mutex<HashMap<OrderScope, Arc<AsyncMutex<()>>>>,
    retry_limit: u32,
}

impl OrderAssigner {
    pub fn new(retry_limit: u32) -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            retry_limit,
        }
    }

    /// Hold the scope's lock until the guard is dropped
    pub async fn lock(&self, scope: OrderScope) -> ScopeGuard<'_> {
        let lock = self.locks.lock().entry(scope).or_default().clone();
        let guard = lock.clone().lock_owned().await;
        ScopeGuard {
            guard: Some(guard),
            lock,
            scope,
            registry: &self.locks,
        }
    }

    /// Number of scopes with a live lock entry
    pub fn locked_scopes(&self) -> usize {
        self.locks.lock().len()
    }

    /// Assign the record's order and insert it under the scope lock.
    ///
    /// A collision reported by `insert` as [`OrderTaken`] is retried with a
    /// fresh lookup up to the retry limit. Explicit orders are never
    /// recomputed, so their collisions fail immediately.
    pub async fn insert<R, T, M, MF, I, IF>(
        &self,
        mut record: R,
        max_order: M,
        insert: I,
    ) -> Result<T, CourseError>
    where
        R: Ordered + Clone,
        M: Fn(OrderScope) -> MF,
        MF: Future<Output = anyhow::Result<Option<u32>>>,
        I: Fn(R) -> IF,
        IF: Future<Output = anyhow::Result<T>>,
    {
        let scope = record.scope();
        let explicit = record.order_mut().is_some();
        let _guard = self.lock(scope).await;

        let mut retries = 0;
        loop {
            let order = assign_order(&mut record, &max_order)
                .await
                .map_err(storage_error)?;
            if order > MAX_ORDER {
                tracing::warn!(%scope, order, "order out of range");
                return Err(CourseError::validation(format!(
                    "{} has no order left after {}",
                    scope, MAX_ORDER
                )));
            }

            let err = match insert(record.clone()).await {
                Ok(stored) => {
                    tracing::debug!(%scope, order, retries, explicit, "order assigned");
                    return Ok(stored);
                }
                Err(err) => err,
            };

            let Some(taken) = err.downcast_ref::<OrderTaken>() else {
                return Err(storage_error(err));
            };
            if explicit || retries >= self.retry_limit {
                tracing::warn!(%scope, order = taken.order, retries, explicit, "order conflict");
                return Err(CourseError::OrderConflict {
                    scope,
                    order: taken.order,
                });
            }
            retries += 1;
            tracing::warn!(%scope, order = taken.order, retries, "order taken, recomputing");
            *record.order_mut() = None;
        }
    }
}

/// Lock on one scope; the registry entry goes away with the last holder
pub struct ScopeGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    lock: Arc<AsyncMutex<()>>,
    scope: OrderScope,
    registry: &'a Mutex<HashMap<OrderScope, Arc<AsyncMutex<()>>>>,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.registry.lock();
        // clones are only taken under the registry lock: ours plus the map's means no waiters
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.scope);
        }
    }
}
