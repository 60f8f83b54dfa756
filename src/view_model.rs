//! Drawer View Model
//!
//! Typed sections derived from the cart snapshot. The drawer reconciles
//! these declaratively instead of splicing server-rendered HTML fragments:
//! the items list, the footer and the header count each follow the model.

use std::collections::HashSet;

use crate::models::CartSnapshot;

/// One rendered cart row
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub key: String,
    pub variant_id: u64,
    pub title: String,
    pub quantity: u32,
    /// Minor currency units
    pub line_price: i64,
    pub image: Option<String>,
    pub url: Option<String>,
    /// Line is mid removal transition
    pub removing: bool,
}

/// Everything the drawer renders
#[derive(Debug, Clone, PartialEq)]
pub struct DrawerSections {
    pub header_count: u32,
    pub rows: Vec<RowView>,
    /// Minor currency units
    pub subtotal: i64,
    pub currency: String,
    pub is_empty: bool,
}

pub fn derive_sections(
    snapshot: Option<&CartSnapshot>,
    removing: &HashSet<String>,
) -> DrawerSections {
    let Some(snapshot) = snapshot else {
        return DrawerSections {
            header_count: 0,
            rows: Vec::new(),
            subtotal: 0,
            currency: String::new(),
            is_empty: true,
        };
    };
    let rows: Vec<RowView> = snapshot
        .items
        .iter()
        .filter(|item| item.quantity > 0)
        .map(|item| RowView {
            key: item.key.clone(),
            variant_id: item.id,
            title: item.title.clone(),
            quantity: item.quantity,
            line_price: item.line_price,
            image: item.image.clone(),
            url: item.url.clone(),
            removing: removing.contains(&item.key),
        })
        .collect();
    DrawerSections {
        header_count: snapshot.item_count,
        is_empty: rows.is_empty(),
        subtotal: snapshot.total_price,
        currency: snapshot.currency.clone(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;

    fn line(key: &str, quantity: u32) -> LineItem {
        LineItem {
            key: key.to_string(),
            id: 41,
            quantity,
            title: format!("Item {key}"),
            line_price: 500 * quantity as i64,
            image: None,
            url: None,
        }
    }

    fn snapshot(items: Vec<LineItem>) -> CartSnapshot {
        CartSnapshot {
            item_count: items.iter().map(|i| i.quantity).sum(),
            total_price: items.iter().map(|i| i.line_price).sum(),
            currency: "USD".to_string(),
            items,
        }
    }

    #[test]
    fn test_no_snapshot_is_empty() {
        let sections = derive_sections(None, &HashSet::new());
        assert!(sections.is_empty);
        assert_eq!(sections.header_count, 0);
        assert!(sections.rows.is_empty());
    }

    #[test]
    fn test_emptied_cart_drops_all_sections_content() {
        let sections = derive_sections(Some(&snapshot(vec![])), &HashSet::new());
        assert!(sections.is_empty);
        assert_eq!(sections.subtotal, 0);
    }

    #[test]
    fn test_sections_follow_snapshot() {
        let snap = snapshot(vec![line("a:1", 2), line("b:2", 1)]);
        let sections = derive_sections(Some(&snap), &HashSet::new());
        assert!(!sections.is_empty);
        assert_eq!(sections.header_count, 3);
        assert_eq!(sections.subtotal, 1500);
        assert_eq!(sections.currency, "USD");
        assert_eq!(sections.rows.len(), 2);
        assert!(!sections.rows[0].removing);
    }

    #[test]
    fn test_quantity_zero_line_never_renders() {
        let snap = snapshot(vec![line("a:1", 0), line("b:2", 1)]);
        let sections = derive_sections(Some(&snap), &HashSet::new());
        assert_eq!(sections.rows.len(), 1);
        assert_eq!(sections.rows[0].key, "b:2");
    }

    #[test]
    fn test_removal_mark_carries_into_rows() {
        let snap = snapshot(vec![line("a:1", 1)]);
        let removing: HashSet<String> = ["a:1".to_string()].into();
        let sections = derive_sections(Some(&snap), &removing);
        assert!(sections.rows[0].removing);
    }
}
