//! Core data model for the Kande-Pohe POS.
//!
//! Field names serialize in camelCase to match the persistence service's
//! JSON contract (`orderId`, `dishName`, `isServiceChargeApplied`, ...).
//! Deserialization is tolerant of snake_case aliases where the admin API
//! has historically sent both shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reserved dish id for course-break markers.
///
/// Markers are non-priced separators in the ordering sequence. They are
/// never merged by id — two markers are distinct entries identified by
/// their position, not by `dish_id`.
pub const COURSE_BREAK_ID: i64 = -1;

/// Label printed for course-break markers on kitchen slips.
pub const COURSE_BREAK_LABEL: &str = "**************";

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// One dish in the menu catalog. Immutable reference data, owned by the
/// persistence service and loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(alias = "dish_id")]
    pub dish_id: i64,
    #[serde(alias = "dish_name")]
    pub dish_name: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
}

/// Distinct categories in first-seen catalog order, used to drive the
/// menu-tab collaborator. Empty categories are skipped.
pub fn distinct_categories(menu: &[MenuItem]) -> Vec<String> {
    let mut seen = Vec::new();
    for dish in menu {
        let category = dish.category.trim();
        if category.is_empty() {
            continue;
        }
        if !seen.iter().any(|c| c == category) {
            seen.push(category.to_string());
        }
    }
    seen
}

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

/// One line on a check: a dish with a quantity, or a course-break marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(alias = "dish_id")]
    pub dish_id: i64,
    #[serde(alias = "dish_name")]
    pub dish_name: String,
    pub price: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl LineItem {
    /// A single unit of a catalog dish.
    pub fn from_dish(dish: &MenuItem) -> Self {
        Self {
            dish_id: dish.dish_id,
            dish_name: dish.dish_name.clone(),
            price: dish.price,
            quantity: 1,
        }
    }

    /// A course-break marker: price forced to 0, quantity forced to 1.
    pub fn course_break() -> Self {
        Self {
            dish_id: COURSE_BREAK_ID,
            dish_name: COURSE_BREAK_LABEL.to_string(),
            price: 0.0,
            quantity: 1,
        }
    }

    pub fn is_course_break(&self) -> bool {
        self.dish_id == COURSE_BREAK_ID
    }

    /// Extended price for this line. Markers contribute zero regardless of
    /// their stored price and quantity.
    pub fn line_total(&self) -> f64 {
        if self.is_course_break() {
            0.0
        } else {
            self.price * f64::from(self.quantity)
        }
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Whether a check is still open or has been paid and closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Open,
    Closed,
}

/// How a closed check was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }
}

/// A single table's bill. `order_id` is assigned at first send and stable
/// thereafter. `payment_method` is present iff `status` is `Closed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Check {
    #[serde(alias = "order_id")]
    pub order_id: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "table_number")]
    pub table_number: u32,
    pub covers: u32,
    #[serde(alias = "sub_total")]
    pub sub_total: f64,
    #[serde(alias = "service_charge")]
    pub service_charge: f64,
    #[serde(alias = "is_service_charge_applied")]
    pub is_service_charge_applied: bool,
    #[serde(alias = "grand_total")]
    pub grand_total: f64,
    pub status: CheckStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "payment_method"
    )]
    pub payment_method: Option<PaymentMethod>,
    pub items: Vec<LineItem>,
}

impl Check {
    pub fn is_open(&self) -> bool {
        self.status == CheckStatus::Open
    }

    /// Find a line item by dish id. Never matches course-break markers.
    pub fn find_item(&self, dish_id: i64) -> Option<&LineItem> {
        if dish_id == COURSE_BREAK_ID {
            return None;
        }
        self.items.iter().find(|item| item.dish_id == dish_id)
    }

    /// Copy of this check with money fields rounded to 2 decimals, for
    /// persistence and slip payloads. Internal state stays unrounded to
    /// avoid compounding rounding error across recomputation.
    pub fn rounded(&self) -> Check {
        let mut check = self.clone();
        check.sub_total = crate::money::round2(check.sub_total);
        check.service_charge = crate::money::round2(check.service_charge);
        check.grand_total = crate::money::round2(check.grand_total);
        check
    }
}

// ===========================================================================
// Tests
// ===========================================================================
