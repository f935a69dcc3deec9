use crate::models::{Item, RemoteSummary};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub purchased_items: usize,
    pub total_items: usize,
    pub grand_total: f64,
    pub purchased_total: f64,
    pub percent: f64,
}

impl Summary {
    /// Percentage rounded for display, as shown next to the progress bar.
    pub fn rounded_percent(&self) -> u32 {
        self.percent.round() as u32
    }
}

impl From<RemoteSummary> for Summary {
    fn from(remote: RemoteSummary) -> Self {
        Self {
            purchased_items: remote.purchased_items,
            total_items: remote.total_items,
            grand_total: remote.grand_total,
            purchased_total: remote.purchased_total,
            percent: remote.percent_purchased,
        }
    }
}

pub fn compute_summary(items: &[Item]) -> Summary {
    let total_items = items.len();
    let mut purchased_items = 0usize;
    let mut grand_total = 0.0;
    let mut purchased_total = 0.0;

    for item in items {
        grand_total += item.total();
        if item.purchased {
            purchased_items += 1;
            purchased_total += item.total();
        }
    }

    let percent = if total_items == 0 {
        0.0
    } else {
        purchased_items as f64 / total_items as f64 * 100.0
    };

    Summary {
        purchased_items,
        total_items,
        grand_total,
        purchased_total,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, purchased: bool, total: Option<f64>) -> Item {
        Item {
            id,
            name: format!("item {id}"),
            category: "Outros".to_string(),
            purchased,
            quantity: None,
            unit_price: None,
            total_value: total,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn summary_of_empty_list_is_zero() {
        let summary = compute_summary(&[]);
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.percent, 0.0);
    }

    #[test]
    fn summary_counts_and_totals() {
        let items = vec![
            item(1, true, Some(10.0)),
            item(2, false, Some(4.5)),
            item(3, true, None),
            item(4, false, Some(0.5)),
        ];
        let summary = compute_summary(&items);
        assert_eq!(summary.total_items, 4);
        assert_eq!(summary.purchased_items, 2);
        assert!(summary.purchased_items <= summary.total_items);
        assert!((summary.grand_total - 15.0).abs() < 1e-9);
        assert!((summary.purchased_total - 10.0).abs() < 1e-9);
        assert_eq!(summary.percent, 50.0);
    }

    #[test]
    fn summary_follows_purchase_of_single_item() {
        let mut milk = item(1, false, Some(10.0));
        milk.name = "Leite".to_string();
        milk.category = "Laticínios".to_string();
        milk.quantity = Some(2.0);
        milk.unit_price = Some(5.0);

        let before = compute_summary(std::slice::from_ref(&milk));
        assert_eq!(before.purchased_items, 0);
        assert_eq!(before.total_items, 1);
        assert_eq!(before.grand_total, 10.0);
        assert_eq!(before.percent, 0.0);

        milk.purchased = true;
        let after = compute_summary(&[milk]);
        assert_eq!(after.purchased_items, 1);
        assert_eq!(after.grand_total, 10.0);
        assert_eq!(after.percent, 100.0);
        assert_eq!(after.rounded_percent(), 100);
    }

    #[test]
    fn rounded_percent_rounds_half_up() {
        let items = vec![item(1, true, None), item(2, false, None), item(3, false, None)];
        assert_eq!(compute_summary(&items).rounded_percent(), 33);
        let items = vec![item(1, true, None), item(2, true, None), item(3, false, None)];
        assert_eq!(compute_summary(&items).rounded_percent(), 67);
    }
}
