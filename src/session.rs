//! The ephemeral working draft for composing or editing one check.
//!
//! A session is created on "start new order" or "edit open check" and
//! destroyed on finalize or cancel; at most one exists at a time (single
//! terminal). While the session is in the `Dispatching` phase every
//! ledger-mutating entry point rejects, which is what guarantees no
//! double-send — an explicit sub-state, not a wall-clock delay.

use uuid::Uuid;

use crate::cart;
use crate::diff;
use crate::error::PosError;
use crate::money::{self, Totals};
use crate::types::{Check, LineItem, MenuItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Items may be added/removed and the session may be committed.
    Composing,
    /// A kitchen dispatch is underway; mutation and re-commit reject.
    Dispatching,
}

#[derive(Debug)]
pub struct Session {
    /// Correlation id for logs only; not part of any wire payload.
    pub session_id: Uuid,
    pub table_number: u32,
    pub covers: u32,
    pub is_service_charge_applied: bool,
    items: Vec<LineItem>,
    baseline: Option<Check>,
    phase: SessionPhase,
}

impl Session {
    /// Session for a brand-new check. Service charge defaults to on.
    pub fn new_order(table_number: u32, covers: u32) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            table_number,
            covers,
            is_service_charge_applied: true,
            items: Vec::new(),
            baseline: None,
            phase: SessionPhase::Composing,
        }
    }

    /// Session editing a previously-sent check, seeded with a deep copy of
    /// its items so session edits never leak into the ledger.
    pub fn edit_check(check: Check) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            table_number: check.table_number,
            covers: check.covers,
            is_service_charge_applied: check.is_service_charge_applied,
            items: check.items.clone(),
            baseline: Some(check),
            phase: SessionPhase::Composing,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn baseline(&self) -> Option<&Check> {
        self.baseline.as_ref()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    fn reject_while_dispatching(&self) -> Result<(), PosError> {
        if self.phase == SessionPhase::Dispatching {
            return Err(PosError::DispatchInProgress);
        }
        Ok(())
    }

    // -- phase transitions --------------------------------------------------

    /// Enter the dispatching phase. Rejects if a dispatch is already
    /// underway, which is the double-send guard.
    pub fn begin_dispatch(&mut self) -> Result<(), PosError> {
        self.reject_while_dispatching()?;
        self.phase = SessionPhase::Dispatching;
        Ok(())
    }

    /// Return to composing after a rejected commit, so the draft can be
    /// edited again instead of staying locked.
    pub fn end_dispatch(&mut self) {
        self.phase = SessionPhase::Composing;
    }

    // -- item mutation ------------------------------------------------------

    pub fn add_item(&mut self, dish: &MenuItem) -> Result<(), PosError> {
        self.reject_while_dispatching()?;
        cart::add_item(&mut self.items, dish);
        Ok(())
    }

    pub fn add_course_break(&mut self) -> Result<(), PosError> {
        self.reject_while_dispatching()?;
        cart::add_course_break(&mut self.items);
        Ok(())
    }

    pub fn remove_item(&mut self, dish_id: i64, index: usize) -> Result<(), PosError> {
        self.reject_while_dispatching()?;
        cart::remove_item(&mut self.items, dish_id, index);
        Ok(())
    }

    pub fn toggle_service_charge(&mut self) -> Result<bool, PosError> {
        self.reject_while_dispatching()?;
        self.is_service_charge_applied = !self.is_service_charge_applied;
        Ok(self.is_service_charge_applied)
    }

    pub fn set_table_covers(&mut self, table_number: u32, covers: u32) -> Result<(), PosError> {
        if table_number == 0 || covers == 0 {
            return Err(PosError::InvalidTableCovers);
        }
        self.table_number = table_number;
        self.covers = covers;
        Ok(())
    }

    // -- derived state ------------------------------------------------------

    pub fn totals(&self) -> Totals {
        money::compute_totals(&self.items, self.is_service_charge_applied)
    }

    /// Items net-new since the baseline (everything, for a new check).
    pub fn new_items(&self) -> Vec<LineItem> {
        diff::new_items_since(&self.items, self.baseline.as_ref())
    }

    pub fn has_new_items(&self) -> bool {
        diff::has_new_items(&self.items, self.baseline.as_ref())
    }

    /// Count of priced (non-marker) lines; the empty-order guard.
    pub fn priced_item_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| !item.is_course_break())
            .count()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
