//! Money calculations for checks.
//!
//! Pure functions, safe to call on every item mutation. Internal
//! accumulation is unrounded; `round2` is applied only at presentation
//! and persistence boundaries.

use serde::Serialize;

use crate::types::LineItem;

/// Flat service-charge rate. Fixed for the single-location deployment.
pub const SERVICE_CHARGE_RATE: f64 = 0.10;

/// Derived money fields for a set of line items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub sub_total: f64,
    pub service_charge: f64,
    pub grand_total: f64,
}

/// Round a money value to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derive subtotal, service charge, and grand total from a line-item list.
///
/// Course-break markers are skipped regardless of their stored price and
/// quantity; they are presentation-only rows.
pub fn compute_totals(items: &[LineItem], service_charge_applied: bool) -> Totals {
    let sub_total: f64 = items
        .iter()
        .filter(|item| !item.is_course_break())
        .map(LineItem::line_total)
        .sum();

    let service_charge = if service_charge_applied {
        sub_total * SERVICE_CHARGE_RATE
    } else {
        0.0
    };

    Totals {
        sub_total,
        service_charge,
        grand_total: sub_total + service_charge,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
