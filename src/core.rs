//! Check lifecycle state machine and the command surface exposed to the
//! presentation layer.
//!
//! All ledger mutation funnels through the commands here: start/edit/
//! cancel session, item edits, commit-send, commit-pay. Presentation code
//! reads state through the accessors and never writes fields directly.

use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};

use crate::error::PosError;
use crate::ledger::CheckLedger;
use crate::message::MessageChannel;
use crate::money::Totals;
use crate::session::Session;
use crate::types::{self, Check, CheckStatus, LineItem, MenuItem, PaymentMethod};

/// Order ids are uniform 8-digit draws, re-drawn on ledger collision.
const ORDER_ID_MIN: i64 = 10_000_000;
const ORDER_ID_MAX: i64 = 99_999_999;

/// Which slip the dispatch collaborator should produce after a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchAction {
    /// Brand-new order: full kitchen slip, markers as section dividers.
    KitchenFull,
    /// Edited order with additions: incremental kitchen slip, no markers.
    KitchenNewItems,
    /// Edited order with nothing new: customer receipt reprint.
    ReceiptReprint,
}

/// Result of a successful commit-send.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    /// The check as persisted and upserted into the open ledger
    /// (markers stripped, totals recomputed).
    pub check: Check,
    /// Items for the kitchen slip; empty for a receipt reprint.
    pub kitchen_items: Vec<LineItem>,
    pub action: DispatchAction,
    pub is_update: bool,
}

/// Draw an order id that collides with nothing in the ledger.
pub(crate) fn fresh_order_id<R: Rng>(rng: &mut R, ledger: &CheckLedger) -> i64 {
    loop {
        let candidate = rng.gen_range(ORDER_ID_MIN..=ORDER_ID_MAX);
        if !ledger.contains(candidate) {
            return candidate;
        }
        warn!(order_id = candidate, "order id collision, re-drawing");
    }
}

/// The single-terminal application state: catalog, ledgers, the active
/// session (at most one), and the banner channel.
#[derive(Debug, Default)]
pub struct PosCore {
    menu: Vec<MenuItem>,
    ledger: CheckLedger,
    session: Option<Session>,
    messages: MessageChannel,
}

impl PosCore {
    pub fn new() -> Self {
        Self::default()
    }

    // -- catalog ------------------------------------------------------------

    pub fn set_menu(&mut self, menu: Vec<MenuItem>) {
        info!(dishes = menu.len(), "menu catalog loaded");
        self.menu = menu;
    }

    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    pub fn categories(&self) -> Vec<String> {
        types::distinct_categories(&self.menu)
    }

    // -- ledgers ------------------------------------------------------------

    pub fn load_checks(&mut self, checks: Vec<Check>) {
        self.ledger.load_from_fetch(checks);
    }

    pub fn open_checks(&self) -> &[Check] {
        self.ledger.open()
    }

    pub fn closed_checks(&self) -> &[Check] {
        self.ledger.closed()
    }

    // -- banner -------------------------------------------------------------

    pub fn messages(&self) -> &MessageChannel {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut MessageChannel {
        &mut self.messages
    }

    // -- session lifecycle --------------------------------------------------

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Totals for the active session, recomputed on demand.
    pub fn session_totals(&self) -> Result<Totals, PosError> {
        self.session
            .as_ref()
            .map(Session::totals)
            .ok_or(PosError::NoActiveSession)
    }

    /// Start composing a brand-new check. Table and covers are validated
    /// upstream by the number-pad collaborator; this guard is defensive.
    pub fn start_new_session(&mut self, table_number: u32, covers: u32) -> Result<(), PosError> {
        if table_number == 0 || covers == 0 {
            return Err(PosError::InvalidTableCovers);
        }
        if self.session.is_some() {
            return Err(PosError::SessionAlreadyActive);
        }
        let session = Session::new_order(table_number, covers);
        info!(
            session_id = %session.session_id,
            table = table_number,
            covers,
            "new order session started"
        );
        self.session = Some(session);
        Ok(())
    }

    /// Start editing an open check, seeded with a deep copy of its items.
    pub fn start_edit_session(&mut self, order_id: i64) -> Result<(), PosError> {
        if self.session.is_some() {
            return Err(PosError::SessionAlreadyActive);
        }
        let check = self
            .ledger
            .find_open(order_id)
            .cloned()
            .ok_or(PosError::CheckNotFound(order_id))?;
        let session = Session::edit_check(check);
        info!(session_id = %session.session_id, order_id, "edit session started");
        self.session = Some(session);
        Ok(())
    }

    /// Correct the table assignment mid-session; items and baseline are
    /// untouched.
    pub fn update_session_table_covers(
        &mut self,
        table_number: u32,
        covers: u32,
    ) -> Result<(), PosError> {
        self.active_session_mut()?
            .set_table_covers(table_number, covers)
    }

    /// Discard the session without touching either ledger. A no-op when no
    /// session is active (closing an already-dismissed modal); rejected
    /// mid-dispatch.
    pub fn cancel_session(&mut self) -> Result<(), PosError> {
        if let Some(session) = &self.session {
            if session.phase() == crate::session::SessionPhase::Dispatching {
                return Err(PosError::DispatchInProgress);
            }
            info!(session_id = %session.session_id, "order session cancelled");
            self.session = None;
        }
        Ok(())
    }

    fn active_session_mut(&mut self) -> Result<&mut Session, PosError> {
        self.session.as_mut().ok_or(PosError::NoActiveSession)
    }

    // -- item commands ------------------------------------------------------

    /// Add one unit of a catalog dish to the active session.
    pub fn add_item(&mut self, dish_id: i64) -> Result<(), PosError> {
        let dish = self
            .menu
            .iter()
            .find(|dish| dish.dish_id == dish_id)
            .cloned()
            .ok_or(PosError::DishNotFound(dish_id))?;
        self.active_session_mut()?.add_item(&dish)
    }

    pub fn add_course_break(&mut self) -> Result<(), PosError> {
        self.active_session_mut()?.add_course_break()
    }

    pub fn remove_item(&mut self, dish_id: i64, index: usize) -> Result<(), PosError> {
        self.active_session_mut()?.remove_item(dish_id, index)
    }

    pub fn toggle_service_charge(&mut self) -> Result<bool, PosError> {
        self.active_session_mut()?.toggle_service_charge()
    }

    // -- commits ------------------------------------------------------------

    /// Mark the session as dispatching. Rejects a second dispatch until
    /// the first completes, which is the no-double-send guarantee.
    pub fn begin_dispatch(&mut self) -> Result<(), PosError> {
        self.active_session_mut()?.begin_dispatch()
    }

    /// Unlock the session after a rejected commit.
    pub fn end_dispatch(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.end_dispatch();
        }
    }

    /// Finalize the session into an open check: assign the order id,
    /// recompute totals, route the kitchen payload through the diff
    /// engine, strip markers from the persisted item list, and upsert
    /// into the open ledger. The session is destroyed on success.
    pub fn commit_send(&mut self) -> Result<SendOutcome, PosError> {
        let session = self.session.take().ok_or(PosError::NoActiveSession)?;
        if session.priced_item_count() == 0 {
            self.session = Some(session);
            return Err(PosError::EmptyOrder);
        }

        let is_update = session.is_editing();
        let order_id = match session.baseline() {
            Some(baseline) => baseline.order_id,
            None => fresh_order_id(&mut rand::thread_rng(), &self.ledger),
        };

        let totals = session.totals();
        let new_items = session.new_items();
        let (action, kitchen_items) = if !is_update {
            // full slip keeps markers as course dividers
            (DispatchAction::KitchenFull, session.items().to_vec())
        } else if new_items.is_empty() {
            (DispatchAction::ReceiptReprint, Vec::new())
        } else {
            (DispatchAction::KitchenNewItems, new_items)
        };

        // markers are session-local presentation; the persisted list
        // excludes them
        let persisted_items: Vec<LineItem> = session
            .items()
            .iter()
            .filter(|item| !item.is_course_break())
            .cloned()
            .collect();

        let check = Check {
            order_id,
            timestamp: Utc::now(),
            table_number: session.table_number,
            covers: session.covers,
            sub_total: totals.sub_total,
            service_charge: totals.service_charge,
            is_service_charge_applied: session.is_service_charge_applied,
            grand_total: totals.grand_total,
            status: CheckStatus::Open,
            payment_method: None,
            items: persisted_items,
        };

        if is_update {
            if let Err(err) = self.ledger.replace_open(check.clone()) {
                // ledger/session drift; keep the draft so nothing is lost
                self.session = Some(session);
                return Err(err);
            }
        } else {
            self.ledger.add_open(check.clone());
        }

        info!(
            session_id = %session.session_id,
            order_id,
            table = check.table_number,
            grand_total = check.grand_total,
            is_update,
            action = ?action,
            "order committed"
        );

        Ok(SendOutcome {
            check,
            kitchen_items,
            action,
            is_update,
        })
    }

    /// Close an open check: set the payment method, move it from the open
    /// to the closed ledger (exactly once), and end any session that was
    /// editing it. Re-paying a closed check is an explicit error.
    pub fn commit_pay(
        &mut self,
        order_id: i64,
        method: PaymentMethod,
    ) -> Result<Check, PosError> {
        if self.ledger.find_closed(order_id).is_some() {
            return Err(PosError::AlreadyClosed(order_id));
        }
        let mut check = self.ledger.remove_open(order_id)?;
        check.status = CheckStatus::Closed;
        check.payment_method = Some(method);
        self.ledger.add_closed(check.clone());

        let editing_this_check = self
            .session
            .as_ref()
            .and_then(Session::baseline)
            .is_some_and(|baseline| baseline.order_id == order_id);
        if editing_this_check {
            self.session = None;
        }

        info!(order_id, method = method.label(), "check paid and closed");
        Ok(check)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
