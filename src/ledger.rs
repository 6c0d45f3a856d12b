//! Authoritative in-memory collections of open and closed checks.
//!
//! Populated once at startup from the persistence service and thereafter
//! mutated only by the lifecycle commands in `core` — never directly by
//! presentation code. A check moves from open to closed exactly once and
//! never back.

use tracing::debug;

use crate::error::PosError;
use crate::types::{Check, CheckStatus};

#[derive(Debug, Default)]
pub struct CheckLedger {
    open: Vec<Check>,
    closed: Vec<Check>,
}

impl CheckLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // -- bulk load ----------------------------------------------------------

    /// Replace the open collection wholesale (startup bulk load).
    pub fn set_open(&mut self, checks: Vec<Check>) {
        self.open = checks;
    }

    /// Replace the closed collection wholesale (startup bulk load).
    pub fn set_closed(&mut self, checks: Vec<Check>) {
        self.closed = checks;
    }

    /// Partition a raw fetch result by status into the two collections.
    pub fn load_from_fetch(&mut self, checks: Vec<Check>) {
        let (open, closed): (Vec<Check>, Vec<Check>) =
            checks.into_iter().partition(Check::is_open);
        debug!(open = open.len(), closed = closed.len(), "check ledger loaded");
        self.open = open;
        self.closed = closed;
    }

    // -- mutation -----------------------------------------------------------

    pub fn add_open(&mut self, check: Check) {
        debug!(order_id = check.order_id, "check opened");
        self.open.push(check);
    }

    /// Replace an open check by order id. A missing id is an error, not a
    /// silent no-op: it would mask ledger/session drift.
    pub fn replace_open(&mut self, check: Check) -> Result<(), PosError> {
        let slot = self
            .open
            .iter_mut()
            .find(|existing| existing.order_id == check.order_id)
            .ok_or(PosError::CheckNotFound(check.order_id))?;
        debug!(order_id = check.order_id, "check replaced");
        *slot = check;
        Ok(())
    }

    /// Remove and return an open check by order id; errors if absent.
    pub fn remove_open(&mut self, order_id: i64) -> Result<Check, PosError> {
        let pos = self
            .open
            .iter()
            .position(|check| check.order_id == order_id)
            .ok_or(PosError::CheckNotFound(order_id))?;
        Ok(self.open.remove(pos))
    }

    pub fn add_closed(&mut self, check: Check) {
        debug!(order_id = check.order_id, "check closed");
        self.closed.push(check);
    }

    // -- read access --------------------------------------------------------

    pub fn open(&self) -> &[Check] {
        &self.open
    }

    pub fn closed(&self) -> &[Check] {
        &self.closed
    }

    pub fn find_open(&self, order_id: i64) -> Option<&Check> {
        self.open.iter().find(|check| check.order_id == order_id)
    }

    pub fn find_closed(&self, order_id: i64) -> Option<&Check> {
        self.closed.iter().find(|check| check.order_id == order_id)
    }

    /// Whether any check, open or closed, carries this order id. Used to
    /// reject freshly-drawn ids that would collide.
    pub fn contains(&self, order_id: i64) -> bool {
        self.find_open(order_id).is_some() || self.find_closed(order_id).is_some()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;
    use chrono::Utc;

    fn check(order_id: i64, status: CheckStatus) -> Check {
        Check {
            order_id,
            timestamp: Utc::now(),
            table_number: 1,
            covers: 2,
            sub_total: 10.0,
            service_charge: 1.0,
            is_service_charge_applied: true,
            grand_total: 11.0,
            status,
            payment_method: (status == CheckStatus::Closed).then_some(PaymentMethod::Cash),
            items: Vec::new(),
        }
    }

    #[test]
    fn test_load_from_fetch_partitions_by_status() {
        let mut ledger = CheckLedger::new();
        ledger.load_from_fetch(vec![
            check(11111111, CheckStatus::Open),
            check(22222222, CheckStatus::Closed),
            check(33333333, CheckStatus::Open),
        ]);
        assert_eq!(ledger.open().len(), 2);
        assert_eq!(ledger.closed().len(), 1);
        assert!(ledger.find_open(11111111).is_some());
        assert!(ledger.find_closed(22222222).is_some());
    }

    #[test]
    fn test_replace_open_updates_in_place() {
        let mut ledger = CheckLedger::new();
        ledger.add_open(check(11111111, CheckStatus::Open));
        ledger.add_open(check(22222222, CheckStatus::Open));

        let mut updated = check(11111111, CheckStatus::Open);
        updated.covers = 6;
        ledger.replace_open(updated).expect("replace");

        assert_eq!(ledger.open().len(), 2);
        assert_eq!(ledger.find_open(11111111).unwrap().covers, 6);
        // order preserved
        assert_eq!(ledger.open()[0].order_id, 11111111);
    }

    #[test]
    fn test_replace_open_missing_id_is_error() {
        let mut ledger = CheckLedger::new();
        let err = ledger
            .replace_open(check(99999999, CheckStatus::Open))
            .unwrap_err();
        assert_eq!(err, PosError::CheckNotFound(99999999));
    }

    #[test]
    fn test_remove_open_missing_id_is_error() {
        let mut ledger = CheckLedger::new();
        assert_eq!(
            ledger.remove_open(12345678).unwrap_err(),
            PosError::CheckNotFound(12345678)
        );
    }

    #[test]
    fn test_check_never_in_both_collections() {
        let mut ledger = CheckLedger::new();
        ledger.add_open(check(11111111, CheckStatus::Open));

        let mut paid = ledger.remove_open(11111111).expect("remove");
        paid.status = CheckStatus::Closed;
        paid.payment_method = Some(PaymentMethod::Card);
        ledger.add_closed(paid);

        assert!(ledger.find_open(11111111).is_none());
        assert_eq!(ledger.closed().len(), 1);
        assert_eq!(ledger.find_closed(11111111).unwrap().status, CheckStatus::Closed);
        assert!(ledger.contains(11111111));
    }

    #[test]
    fn test_contains_covers_both_collections() {
        let mut ledger = CheckLedger::new();
        ledger.add_open(check(11111111, CheckStatus::Open));
        ledger.add_closed(check(22222222, CheckStatus::Closed));
        assert!(ledger.contains(11111111));
        assert!(ledger.contains(22222222));
        assert!(!ledger.contains(33333333));
    }
}
