//! Slip payloads for the receipt/kitchen-print collaborator.
//!
//! Two payload shapes leave the core: the full line-item list including
//! course-break markers (rendered as `*** ... ***` section dividers) for
//! brand-new orders and full reprints, and the new-items-only list (no
//! markers) for incremental dispatch. Money is pre-rounded to 2 decimals
//! and displayed with a fixed currency symbol.

use chrono::{DateTime, Utc};

use crate::money::round2;
use crate::types::{Check, LineItem};

/// Fixed currency symbol; display is not locale-negotiated.
pub const CURRENCY_SYMBOL: &str = "£";

const STORE_NAME: &str = "Kande-Pohe";
const STORE_ADDRESS: &str = "123 Business Street, London";
const STORE_VAT: &str = "VAT NO: GB123456789";

/// Render a kitchen slip: big uppercase dish lines for the chefs, with
/// markers passed through as course dividers. Used with the full item
/// list for new orders, or the diffed new-items list (which carries no
/// markers) for incremental sends.
pub fn kitchen_slip(items: &[LineItem], table_number: u32, at: DateTime<Utc>) -> String {
    let mut slip = String::new();
    slip.push_str("KITCHEN ORDER\n");
    slip.push_str("=============\n");
    slip.push_str(&format!("TABLE: {table_number}\n"));
    slip.push_str(&format!("{}\n", at.format("%H:%M | %d/%m/%Y")));
    slip.push('\n');

    for item in items {
        if item.is_course_break() {
            slip.push_str(&format!("*** {} ***\n", item.dish_name));
        } else {
            slip.push_str(&format!(
                "{}x {}\n",
                item.quantity,
                item.dish_name.to_uppercase()
            ));
        }
    }

    slip.push_str("\n--- END OF ORDER ---\n");
    slip
}

/// Render a customer receipt for a check. Markers never appear here (the
/// persisted item list excludes them). `reprint` adds the reprint banner.
pub fn customer_receipt(check: &Check, reprint: bool) -> String {
    let check = check.rounded();

    let mut receipt = String::new();
    receipt.push_str(&format!("{STORE_NAME}\n"));
    receipt.push_str(&format!("{STORE_ADDRESS}\n"));
    receipt.push_str(&format!("{STORE_VAT}\n"));
    receipt.push_str("--------------------------------\n");
    if reprint {
        receipt.push_str("****** Reprinted *******\n");
    }
    receipt.push_str(&format!(
        "Table: {} | Date: {}\n",
        check.table_number,
        check.timestamp.format("%d/%m/%Y")
    ));
    receipt.push_str("--------------------------------\n");

    for item in check.items.iter().filter(|item| !item.is_course_break()) {
        receipt.push_str(&format!(
            "{}x {:<20} {CURRENCY_SYMBOL}{:.2}\n",
            item.quantity,
            item.dish_name.to_uppercase(),
            round2(item.line_total())
        ));
    }

    receipt.push_str("--------------------------------\n");
    receipt.push_str(&format!(
        "Subtotal:        {CURRENCY_SYMBOL}{:.2}\n",
        check.sub_total
    ));
    if check.is_service_charge_applied {
        receipt.push_str(&format!(
            "Service Charge (10%): {CURRENCY_SYMBOL}{:.2}\n",
            check.service_charge
        ));
    }
    receipt.push_str(&format!(
        "TOTAL:           {CURRENCY_SYMBOL}{:.2}\n",
        check.grand_total
    ));
    receipt.push_str("--------------------------------\n");
    receipt.push_str("THANK YOU FOR YOUR VISIT!\n");
    receipt
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CheckStatus, MenuItem};

    fn item(dish_id: i64, name: &str, price: f64, quantity: u32) -> LineItem {
        let mut line = LineItem::from_dish(&MenuItem {
            dish_id,
            dish_name: name.to_string(),
            category: String::new(),
            price,
        });
        line.quantity = quantity;
        line
    }

    fn check(items: Vec<LineItem>, service_charge: bool) -> Check {
        let totals = crate::money::compute_totals(&items, service_charge);
        Check {
            order_id: 12345678,
            timestamp: Utc::now(),
            table_number: 5,
            covers: 2,
            sub_total: totals.sub_total,
            service_charge: totals.service_charge,
            is_service_charge_applied: service_charge,
            grand_total: totals.grand_total,
            status: CheckStatus::Open,
            payment_method: None,
            items,
        }
    }

    #[test]
    fn test_kitchen_slip_renders_markers_as_dividers() {
        let items = vec![
            item(1, "Poha", 4.5, 2),
            LineItem::course_break(),
            item(2, "Chai", 1.5, 1),
        ];
        let slip = kitchen_slip(&items, 7, Utc::now());
        assert!(slip.contains("KITCHEN ORDER"));
        assert!(slip.contains("TABLE: 7"));
        assert!(slip.contains("2x POHA"));
        assert!(slip.contains("*** ************** ***"));
        assert!(slip.contains("1x CHAI"));
        assert!(slip.contains("--- END OF ORDER ---"));
        // no prices on kitchen slips
        assert!(!slip.contains(CURRENCY_SYMBOL));
    }

    #[test]
    fn test_receipt_totals_and_service_charge_line() {
        let receipt = customer_receipt(
            &check(vec![item(1, "Poha", 10.0, 2), item(2, "Chai", 5.5, 1)], true),
            false,
        );
        assert!(receipt.contains("Kande-Pohe"));
        assert!(receipt.contains("2x POHA"));
        assert!(receipt.contains("£20.00"));
        assert!(receipt.contains("Subtotal:        £25.50"));
        assert!(receipt.contains("Service Charge (10%): £2.55"));
        assert!(receipt.contains("TOTAL:           £28.05"));
        assert!(!receipt.contains("Reprinted"));
    }

    #[test]
    fn test_receipt_without_service_charge_omits_line() {
        let receipt = customer_receipt(&check(vec![item(1, "Poha", 10.0, 1)], false), false);
        assert!(!receipt.contains("Service Charge"));
        assert!(receipt.contains("TOTAL:           £10.00"));
    }

    #[test]
    fn test_reprint_banner() {
        let receipt = customer_receipt(&check(vec![item(1, "Poha", 10.0, 1)], true), true);
        assert!(receipt.contains("****** Reprinted *******"));
    }
}
