//! Async shell around the core: startup bulk load and fire-and-forget
//! remote writes.
//!
//! The UI must never block on network latency. Every send/pay mutates the
//! local ledger synchronously (local state is the source of truth for the
//! screen) and then enqueues the remote write as a background task. Write
//! failures are logged and surfaced on the banner — there is no rollback
//! path and no retry loop; the idempotency key lets the service dedupe a
//! client-initiated retry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::core::{PosCore, SendOutcome};
use crate::error::PosError;
use crate::types::{Check, PaymentMethod};

/// Shared handle over the core state and the order-service client.
///
/// The core itself is single-writer: every mutation runs to completion
/// under the lock, in response to one discrete event. Background tasks
/// only touch the lock again to surface a write failure on the banner.
pub struct PosService {
    core: Arc<Mutex<PosCore>>,
    api: Arc<ApiClient>,
    /// Monotonic per-order write revisions for idempotency keys.
    revisions: Arc<Mutex<HashMap<i64, u64>>>,
}

impl PosService {
    pub fn new(config: &ApiConfig) -> Result<Self, PosError> {
        let api = ApiClient::new(config).map_err(PosError::Api)?;
        Ok(Self {
            core: Arc::new(Mutex::new(PosCore::new())),
            api: Arc::new(api),
            revisions: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// The shared core handle, for the presentation layer's read access
    /// and direct (non-networked) commands.
    pub fn core(&self) -> Arc<Mutex<PosCore>> {
        Arc::clone(&self.core)
    }

    fn lock_core(&self) -> std::sync::MutexGuard<'_, PosCore> {
        // a poisoned lock means a panic mid-mutation; nothing to salvage
        self.core.lock().expect("core state lock poisoned")
    }

    // -- startup ------------------------------------------------------------

    /// Bulk-load the menu catalog and both check ledgers. On failure the
    /// app stays usable with empty collections; the failure is surfaced
    /// as a persistent banner.
    pub async fn load_initial_data(&self) {
        match self.api.fetch_catalog().await {
            Ok(menu) => self.lock_core().set_menu(menu),
            Err(err) => {
                error!(error = %err, "menu catalog load failed");
                let mut core = self.lock_core();
                core.set_menu(Vec::new());
                core.messages_mut()
                    .set_persistent("Failed to load menu. Please check the network.");
            }
        }

        match self.api.fetch_all_checks().await {
            Ok(checks) => self.lock_core().load_checks(checks),
            Err(err) => {
                error!(error = %err, "check ledger load failed");
                let mut core = self.lock_core();
                core.load_checks(Vec::new());
                core.messages_mut()
                    .set_persistent("Failed to load open checks. Please check the network.");
            }
        }
    }

    // -- commits ------------------------------------------------------------

    /// Send the active session to the kitchen: commit locally, then post
    /// the check in the background. Validation failures set a transient
    /// banner and leave all state untouched.
    pub fn send(&self) -> Result<SendOutcome, PosError> {
        let outcome = {
            let mut core = self.lock_core();
            core.begin_dispatch()?;
            match core.commit_send() {
                Ok(outcome) => {
                    let action_text = if outcome.is_update {
                        "Updated"
                    } else {
                        "Sent & Opened"
                    };
                    let text = format!(
                        "Order {action_text} for Table {} totalling {}{:.2}",
                        outcome.check.table_number,
                        crate::print::CURRENCY_SYMBOL,
                        crate::money::round2(outcome.check.grand_total),
                    );
                    core.messages_mut().set_transient(text);
                    outcome
                }
                Err(err) => {
                    core.end_dispatch();
                    if err.is_transient() {
                        core.messages_mut().set_transient(err.to_string());
                    } else {
                        core.messages_mut().set_persistent(err.to_string());
                    }
                    return Err(err);
                }
            }
        };

        self.spawn_post(outcome.check.clone());
        Ok(outcome)
    }

    /// Pay the active session: commit-send it first (a check must exist
    /// to be closed), then close it. One background write per step, as
    /// the original posts both the open and the closed snapshot.
    pub fn pay_session(&self, method: PaymentMethod) -> Result<Check, PosError> {
        let outcome = self.send()?;
        self.pay_check(outcome.check.order_id, method)
    }

    /// Close an already-open check selected from the open-checks ledger.
    pub fn pay_check(&self, order_id: i64, method: PaymentMethod) -> Result<Check, PosError> {
        let closed = {
            let mut core = self.lock_core();
            match core.commit_pay(order_id, method) {
                Ok(closed) => {
                    let text = format!(
                        "Check {} closed for {}{:.2} via {}",
                        closed.order_id,
                        crate::print::CURRENCY_SYMBOL,
                        crate::money::round2(closed.grand_total),
                        method.label(),
                    );
                    core.messages_mut().set_transient(text);
                    closed
                }
                Err(err) => {
                    core.messages_mut().set_transient(err.to_string());
                    return Err(err);
                }
            }
        };

        self.spawn_post(closed.clone());
        Ok(closed)
    }

    // -- background writes --------------------------------------------------

    fn next_revision(&self, order_id: i64) -> u64 {
        let mut revisions = self.revisions.lock().expect("revision map lock poisoned");
        let revision = revisions.entry(order_id).or_insert(0);
        *revision += 1;
        *revision
    }

    /// Fire-and-forget post of a check snapshot. The local ledger is
    /// already updated; a remote failure only logs and raises a banner.
    fn spawn_post(&self, check: Check) {
        let revision = self.next_revision(check.order_id);
        let api = Arc::clone(&self.api);
        let core = Arc::clone(&self.core);
        tokio::spawn(async move {
            match api.post_check(&check, revision).await {
                Ok(()) => {
                    info!(order_id = check.order_id, revision, "check persisted");
                }
                Err(err) => {
                    warn!(
                        order_id = check.order_id,
                        revision,
                        error = %err,
                        "check persistence failed, local ledger kept"
                    );
                    if let Ok(mut core) = core.lock() {
                        core.messages_mut().set_persistent(err);
                    }
                }
            }
        });
    }
}

// ===========================================================================
// Tests
// ===========================================================================
