//! Domain queries over the product collection. Read-only, and always
//! filtered to active products.

use crate::model::{Category, Product};
use crate::repo::Repository;
use std::collections::HashMap;

impl Repository<Product> {
    /// Active products in the given category, name ascending.
    pub fn by_category(&self, category: Category) -> Vec<&Product> {
        let mut found: Vec<&Product> = self
            .active()
            .filter(|p| p.category() == category)
            .collect();
        found.sort_by(|a, b| a.name().cmp(b.name()));
        found
    }

    /// Active products with quantity below `threshold`, quantity ascending.
    pub fn low_stock(&self, threshold: u32) -> Vec<&Product> {
        let mut found: Vec<&Product> = self
            .all()
            .iter()
            .filter(|p| p.is_low_stock(threshold))
            .collect();
        found.sort_by_key(|p| p.quantity());
        found
    }

    /// Case-insensitive substring match on the name, name ascending. A
    /// blank term matches nothing, not everything.
    pub fn search_by_name(&self, term: &str) -> Vec<&Product> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        let mut found: Vec<&Product> = self
            .active()
            .filter(|p| p.name().to_lowercase().contains(&term))
            .collect();
        found.sort_by(|a, b| a.name().cmp(b.name()));
        found
    }

    /// Sum of `price * quantity` over active products.
    pub fn total_inventory_value(&self) -> f64 {
        self.active().map(Product::total_value).sum()
    }

    /// Active product count per category.
    pub fn count_by_category(&self) -> HashMap<Category, usize> {
        let mut counts = HashMap::new();
        for p in self.active() {
            *counts.entry(p.category()).or_insert(0) += 1;
        }
        counts
    }

    /// The `n` most expensive active products, price descending.
    pub fn top_by_price(&self, n: usize) -> Vec<&Product> {
        let mut found: Vec<&Product> = self.active().collect();
        found.sort_by(|a, b| b.price().total_cmp(&a.price()));
        found.truncate(n);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CsvStore;
    use tempfile::TempDir;

    fn repo_with(products: &[(&str, f64, Category, u32)]) -> (TempDir, Repository<Product>) {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::open(dir.path().join("products.csv")).unwrap();
        let mut repo = Repository::open(store).unwrap();
        for &(name, price, category, quantity) in products {
            repo.add(Product::new(name, price, category, quantity).unwrap())
                .unwrap();
        }
        (dir, repo)
    }

    #[test]
    fn by_category_is_active_only_and_name_ordered() {
        let (_dir, mut repo) = repo_with(&[
            ("Zither", 50.0, Category::Other, 1),
            ("Banjo", 80.0, Category::Other, 1),
            ("Socks", 3.0, Category::Clothing, 9),
        ]);
        repo.delete(2).unwrap(); // Banjo

        let names: Vec<&str> = repo
            .by_category(Category::Other)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(names, vec!["Zither"]);
    }

    #[test]
    fn low_stock_orders_by_quantity_ascending() {
        let (_dir, repo) = repo_with(&[
            ("A", 1.0, Category::Food, 8),
            ("B", 1.0, Category::Food, 2),
            ("C", 1.0, Category::Food, 15),
        ]);
        let quantities: Vec<u32> = repo.low_stock(10).iter().map(|p| p.quantity()).collect();
        assert_eq!(quantities, vec![2, 8]);
    }

    #[test]
    fn low_stock_excludes_inactive() {
        let (_dir, mut repo) = repo_with(&[("A", 1.0, Category::Food, 1)]);
        repo.delete(1).unwrap();
        assert!(repo.low_stock(10).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let (_dir, repo) = repo_with(&[
            ("USB Cable", 4.0, Category::Electronics, 3),
            ("HDMI Cable", 7.0, Category::Electronics, 3),
            ("Mouse", 12.0, Category::Electronics, 3),
        ]);
        let names: Vec<&str> = repo.search_by_name("cAbLe").iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["HDMI Cable", "USB Cable"]);
    }

    #[test]
    fn blank_search_returns_nothing() {
        let (_dir, repo) = repo_with(&[("Mouse", 12.0, Category::Electronics, 3)]);
        assert!(repo.search_by_name("").is_empty());
        assert!(repo.search_by_name("   ").is_empty());
    }

    #[test]
    fn total_value_sums_active_products() {
        let (_dir, mut repo) = repo_with(&[
            ("A", 2.0, Category::Food, 3),  // 6
            ("B", 10.0, Category::Food, 1), // 10
        ]);
        assert_eq!(repo.total_inventory_value(), 16.0);
        repo.delete(2).unwrap();
        assert_eq!(repo.total_inventory_value(), 6.0);
    }

    #[test]
    fn count_by_category_groups_active_products() {
        let (_dir, repo) = repo_with(&[
            ("A", 1.0, Category::Food, 1),
            ("B", 1.0, Category::Food, 1),
            ("C", 1.0, Category::Toys, 1),
        ]);
        let counts = repo.count_by_category();
        assert_eq!(counts.get(&Category::Food), Some(&2));
        assert_eq!(counts.get(&Category::Toys), Some(&1));
        assert_eq!(counts.get(&Category::Clothing), None);
    }

    #[test]
    fn top_by_price_descends_and_truncates() {
        let (_dir, repo) = repo_with(&[
            ("A", 5.0, Category::Food, 1),
            ("B", 20.0, Category::Food, 1),
            ("C", 10.0, Category::Food, 1),
        ]);
        let names: Vec<&str> = repo.top_by_price(2).iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["B", "C"]);
    }
}
