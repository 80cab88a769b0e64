//! Outbox service: resolves a datacenter to a live store, then runs
//! the requested operation against it.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Datacenter, DbConfig, PoolRegistry};
use crate::error::GatewayError;
use crate::etcd::EtcdResolver;
use crate::persistence::{OutboxStore, ResetOutcome};

/// Orchestration layer for all outbox operations.
///
/// Stateless coordinator: owns the [`EtcdResolver`] for credential
/// lookups and a shared [`PoolRegistry`] for pool reuse. Every
/// operation follows the same pattern: resolve config (a fresh store
/// read on every call), get or create the datacenter's pool, run the
/// SQL, return the result.
#[derive(Debug, Clone)]
pub struct OutboxService {
    resolver: EtcdResolver,
    registry: Arc<PoolRegistry>,
}

impl OutboxService {
    /// Creates a new `OutboxService`.
    #[must_use]
    pub fn new(resolver: EtcdResolver, registry: Arc<PoolRegistry>) -> Self {
        Self { resolver, registry }
    }

    /// Returns a reference to the inner [`PoolRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<PoolRegistry> {
        &self.registry
    }

    /// Validates connectivity to a datacenter's database.
    ///
    /// Resolves the config, obtains the pool, and issues a probe
    /// query. Returns the resolved config so the caller can echo which
    /// host and schema it landed on.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] from config resolution, pool
    /// creation, or the probe query.
    pub async fn connect(&self, datacenter: Datacenter) -> Result<DbConfig, GatewayError> {
        let (store, config) = self.store_for(datacenter).await?;
        store.ping().await?;
        tracing::info!(%datacenter, host = %config.host, db = %config.name, "connectivity verified");
        Ok(config)
    }

    /// Reads the delivery status of an outbox record.
    ///
    /// Returns `None` when no row matches the aggregate identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] from config resolution, pool
    /// creation, or the read query.
    pub async fn check_status(
        &self,
        datacenter: Datacenter,
        aggregate_id: Uuid,
    ) -> Result<Option<String>, GatewayError> {
        let (store, _) = self.store_for(datacenter).await?;
        store.fetch_status(aggregate_id).await
    }

    /// Resets an outbox record to `PENDING`, deleting its delivery
    /// receipts, as one atomic transaction.
    ///
    /// The transaction runs on a detached task: once begun it always
    /// reaches commit or rollback even if the caller disconnects
    /// mid-flight. The resolve and pool steps before it remain
    /// cancellable.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] from config resolution, pool
    /// creation, or the transaction itself (rolled back before the
    /// error surfaces).
    pub async fn reset(
        &self,
        datacenter: Datacenter,
        aggregate_id: Uuid,
    ) -> Result<ResetOutcome, GatewayError> {
        let (store, _) = self.store_for(datacenter).await?;

        let handle = tokio::spawn(async move { store.reset_to_pending(aggregate_id).await });
        let outcome = handle
            .await
            .map_err(|e| GatewayError::Internal(format!("reset task failed: {e}")))??;

        if outcome.is_noop() {
            tracing::warn!(%datacenter, %aggregate_id, "reset matched no outbox record");
        } else {
            tracing::info!(
                %datacenter,
                %aggregate_id,
                deleted = outcome.deleted_count,
                updated = outcome.updated_rows,
                "outbox record reset to PENDING"
            );
        }
        Ok(outcome)
    }

    /// Resolves the datacenter's config and yields a store over its
    /// cached (or newly created) pool.
    async fn store_for(
        &self,
        datacenter: Datacenter,
    ) -> Result<(OutboxStore, DbConfig), GatewayError> {
        let config = self.resolver.resolve(datacenter).await?;
        let pool = self
            .registry
            .get_or_create(datacenter.config_path(), &config)
            .await?;
        Ok((OutboxStore::new(pool), config))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::etcd::{ApiVersion, EtcdSettings};

    fn service_without_endpoint() -> OutboxService {
        let resolver = EtcdResolver::new(EtcdSettings {
            endpoint: None,
            api_version: ApiVersion::V2,
            basic_auth: None,
        });
        OutboxService::new(resolver, Arc::new(PoolRegistry::new()))
    }

    #[tokio::test]
    async fn operations_surface_missing_endpoint() {
        let service = service_without_endpoint();
        let id = Uuid::new_v4();

        let connect = service.connect(Datacenter::Tece01).await;
        assert!(matches!(connect, Err(GatewayError::MissingEndpoint)));

        let status = service.check_status(Datacenter::Tece01, id).await;
        assert!(matches!(status, Err(GatewayError::MissingEndpoint)));

        let reset = service.reset(Datacenter::Tece01, id).await;
        assert!(matches!(reset, Err(GatewayError::MissingEndpoint)));
    }

    #[tokio::test]
    async fn failed_resolve_creates_no_pool() {
        let service = service_without_endpoint();
        let _ = service.connect(Datacenter::Tesp02).await;
        assert!(service.registry().is_empty().await);
    }
}
