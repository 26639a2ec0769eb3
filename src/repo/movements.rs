//! Domain queries over the stock-movement audit trail. Read-only, over
//! active movements.

use crate::model::{MovementType, StockMovement};
use crate::repo::Repository;
use chrono::NaiveDateTime;
use std::collections::HashMap;

impl Repository<StockMovement> {
    /// Movements for one product, newest first.
    pub fn by_product(&self, product_id: u32) -> Vec<&StockMovement> {
        let mut found: Vec<&StockMovement> = self
            .active()
            .filter(|m| m.product_id() == product_id)
            .collect();
        found.sort_by(|a, b| b.date().cmp(&a.date()));
        found
    }

    /// Movements within the inclusive date range, oldest first.
    pub fn by_date_range(&self, from: NaiveDateTime, to: NaiveDateTime) -> Vec<&StockMovement> {
        let mut found: Vec<&StockMovement> = self
            .active()
            .filter(|m| m.date() >= from && m.date() <= to)
            .collect();
        found.sort_by_key(|m| m.date());
        found
    }

    /// Movements of one type, newest first.
    pub fn by_movement_type(&self, movement_type: MovementType) -> Vec<&StockMovement> {
        let mut found: Vec<&StockMovement> = self
            .active()
            .filter(|m| m.movement_type() == movement_type)
            .collect();
        found.sort_by(|a, b| b.date().cmp(&a.date()));
        found
    }

    /// Signed net quantity change recorded for a product.
    pub fn net_change(&self, product_id: u32) -> i64 {
        self.active()
            .filter(|m| m.product_id() == product_id)
            .map(StockMovement::quantity_change)
            .sum()
    }

    /// Active movement count per movement type.
    pub fn count_by_type(&self) -> HashMap<MovementType, usize> {
        let mut counts = HashMap::new();
        for m in self.active() {
            *counts.entry(m.movement_type()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CsvStore;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn movement(product_id: u32, change: i64, t: MovementType, d: u32) -> StockMovement {
        let mut m = StockMovement::new(product_id, change, t, "").unwrap();
        m.set_date(day(d));
        m
    }

    fn repo_with(movements: Vec<StockMovement>) -> (TempDir, Repository<StockMovement>) {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::open(dir.path().join("movements.csv")).unwrap();
        let mut repo = Repository::open(store).unwrap();
        for m in movements {
            repo.add(m).unwrap();
        }
        (dir, repo)
    }

    #[test]
    fn by_product_is_newest_first() {
        let (_dir, repo) = repo_with(vec![
            movement(1, 5, MovementType::Created, 1),
            movement(2, 3, MovementType::Created, 2),
            movement(1, -2, MovementType::Decreased, 9),
            movement(1, 4, MovementType::Increased, 4),
        ]);
        let changes: Vec<i64> = repo.by_product(1).iter().map(|m| m.quantity_change()).collect();
        assert_eq!(changes, vec![-2, 4, 5]);
    }

    #[test]
    fn by_date_range_is_inclusive_and_oldest_first() {
        let (_dir, repo) = repo_with(vec![
            movement(1, 1, MovementType::Increased, 9),
            movement(1, 2, MovementType::Increased, 3),
            movement(1, 3, MovementType::Increased, 6),
            movement(1, 4, MovementType::Increased, 12),
        ]);
        let changes: Vec<i64> = repo
            .by_date_range(day(3), day(9))
            .iter()
            .map(|m| m.quantity_change())
            .collect();
        assert_eq!(changes, vec![2, 3, 1]);
    }

    #[test]
    fn by_movement_type_filters_and_orders() {
        let (_dir, repo) = repo_with(vec![
            movement(1, 5, MovementType::Increased, 1),
            movement(1, 0, MovementType::Edited, 2),
            movement(2, 7, MovementType::Increased, 5),
        ]);
        let changes: Vec<i64> = repo
            .by_movement_type(MovementType::Increased)
            .iter()
            .map(|m| m.quantity_change())
            .collect();
        assert_eq!(changes, vec![7, 5]);
    }

    #[test]
    fn net_change_sums_signed_changes_per_product() {
        let (_dir, repo) = repo_with(vec![
            movement(1, 10, MovementType::Created, 1),
            movement(1, -4, MovementType::Decreased, 2),
            movement(2, 99, MovementType::Created, 3),
        ]);
        assert_eq!(repo.net_change(1), 6);
        assert_eq!(repo.net_change(2), 99);
        assert_eq!(repo.net_change(3), 0);
    }

    #[test]
    fn count_by_type_ignores_inactive() {
        let (_dir, mut repo) = repo_with(vec![
            movement(1, 5, MovementType::Increased, 1),
            movement(1, 3, MovementType::Increased, 2),
        ]);
        repo.delete(2).unwrap();
        let counts = repo.count_by_type();
        assert_eq!(counts.get(&MovementType::Increased), Some(&1));
    }
}
