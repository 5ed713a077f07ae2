use std::{collections::HashMap, sync::Arc};

use sea_orm::DatabaseConnection;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{PartyId, ResultEngine};

mod expenses;
mod knowledge;
mod obligations;
mod parties;
mod reports;
mod settlement;

pub use obligations::ObligationDetail;
pub use reports::{
    BalanceRow, CategorySpend, HealthStatus, HistoryEntry, HistoryKind, LedgerQuery,
    MonthlySummary, current_month, parse_month,
};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result: $crate::ResultEngine<_> = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Name of the ledger owner when none is configured.
pub const DEFAULT_OWNER_NAME: &str = "Me";

/// Per payer→payee mutual exclusion for the settlement read-then-write.
///
/// An entry only lives while some payment holds or waits for it: the map's
/// own `Arc` is the last reference of an idle pair, and idle pairs are
/// dropped on the next acquire.
#[derive(Debug, Default)]
struct PairLocks {
    locks: Mutex<HashMap<(PartyId, PartyId), Arc<Mutex<()>>>>,
}

impl PairLocks {
    async fn acquire(&self, payer: PartyId, payee: PartyId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry((payer, payee)).or_default())
        };
        lock.lock_owned().await
    }
}

/// The ledger engine.
///
/// Holds the storage handle every operation runs against; each public method
/// opens (and commits or rolls back) its own transaction.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    owner_name: String,
    allow_self_obligations: bool,
    settlement_locks: PairLocks,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Display name of the ledger owner.
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    owner_name: String,
    allow_self_obligations: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            owner_name: DEFAULT_OWNER_NAME.to_string(),
            allow_self_obligations: true,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Name of the party the owner aliases ("me", "i", ...) resolve to.
    pub fn owner_name(mut self, name: impl Into<String>) -> EngineBuilder {
        self.owner_name = name.into();
        self
    }

    /// Whether a party may owe itself. Enabled by default.
    pub fn allow_self_obligations(mut self, allow: bool) -> EngineBuilder {
        self.allow_self_obligations = allow;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let owner_name = crate::util::normalize_display(&self.owner_name, "owner")?;
        Ok(Engine {
            database: self.database,
            owner_name,
            allow_self_obligations: self.allow_self_obligations,
            settlement_locks: PairLocks::default(),
        })
    }
}
