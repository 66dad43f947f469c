//! Shared application state

use tokio::sync::watch;

use tutorhub_core::stats::DashboardStats;
use tutorhub_core::token::TokenSigner;

use crate::error::AdminError;
use crate::store::MarketStore;

/// Shared state for the admin API
pub struct AppState<S> {
    /// Market data storage
    pub store: S,

    /// Session token signer
    pub signer: TokenSigner,

    /// Latest dashboard aggregates, broadcast to live subscribers
    stats_tx: watch::Sender<DashboardStats>,
}

impl<S: MarketStore> AppState<S> {
    /// Create state with aggregates computed from the store
    pub fn new(store: S, signer: TokenSigner) -> Result<Self, AdminError> {
        let accounts = store.accounts_snapshot()?;
        let bookings = store.bookings_snapshot()?;
        let stats = DashboardStats::compute(&accounts, &bookings);
        let (stats_tx, _) = watch::channel(stats);

        Ok(Self {
            store,
            signer,
            stats_tx,
        })
    }

    /// Recompute aggregates from the store, notifying live subscribers
    /// when they changed
    pub fn refresh_stats(&self) -> Result<DashboardStats, AdminError> {
        let accounts = self.store.accounts_snapshot()?;
        let bookings = self.store.bookings_snapshot()?;
        let stats = DashboardStats::compute(&accounts, &bookings);

        self.stats_tx.send_if_modified(|current| {
            if *current == stats {
                false
            } else {
                *current = stats.clone();
                true
            }
        });

        Ok(stats)
    }

    /// Subscribe to dashboard aggregate updates
    pub fn subscribe_stats(&self) -> watch::Receiver<DashboardStats> {
        self.stats_tx.subscribe()
    }
}
