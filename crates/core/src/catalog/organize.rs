//! Category organizer.

use std::collections::HashMap;

use crate::html::slugify;
use crate::types::{CategoryOrder, ProductRecord, UNCATEGORIZED};

/// Products sharing one category, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket<'a> {
    pub name: &'a str,
    pub products: Vec<&'a ProductRecord>,
}

impl CategoryBucket<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Section anchor id, e.g. `cat-mietmoebel`.
    #[must_use]
    pub fn anchor(&self) -> String {
        format!("cat-{}", slugify(self.name))
    }
}

/// Group products into category buckets.
///
/// Buckets named in `order` come first, in that sequence. Remaining buckets
/// follow sorted by name, and the [`UNCATEGORIZED`] bucket goes last unless
/// `order` names it. Only non-empty buckets are produced, and members keep
/// their input order. Empty input gives an empty result.
pub fn organize<'a, I>(products: I, order: &CategoryOrder) -> Vec<CategoryBucket<'a>>
where
    I: IntoIterator<Item = &'a ProductRecord>,
{
    let mut buckets: Vec<CategoryBucket<'a>> = Vec::new();
    let mut slots: HashMap<&'a str, usize> = HashMap::new();

    for product in products {
        let name = product.category_name();
        let slot = *slots.entry(name).or_insert_with(|| {
            buckets.push(CategoryBucket {
                name,
                products: Vec::new(),
            });
            buckets.len() - 1
        });
        if let Some(bucket) = buckets.get_mut(slot) {
            bucket.products.push(product);
        }
    }

    // sort_by is stable, and bucket names are unique, so ties never occur
    buckets.sort_by(|a, b| rank(a.name, order).cmp(&rank(b.name, order)));
    buckets
}

/// Sort key: configured position, then name, then the sentinel.
fn rank<'n>(name: &'n str, order: &CategoryOrder) -> (u8, usize, &'n str) {
    match order.position(name) {
        Some(position) => (0, position, ""),
        None if name == UNCATEGORIZED => (2, 0, ""),
        None => (1, 0, name),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(title: &str, category: Option<&str>) -> ProductRecord {
        ProductRecord {
            title: Some(title.to_string()),
            category: category.map(str::to_string),
            ..ProductRecord::default()
        }
    }

    fn names<'a>(buckets: &'a [CategoryBucket<'_>]) -> Vec<&'a str> {
        buckets.iter().map(|b| b.name).collect()
    }

    #[test]
    fn test_empty_input() {
        let products: Vec<ProductRecord> = Vec::new();
        let buckets = organize(&products, &CategoryOrder::default());
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_configured_order_first() {
        let products = vec![
            product("Zelt", Some("Zelte und Pavillons")),
            product("Tisch", Some("Mietmöbel")),
            product("Stuhl", Some("Mietmöbel")),
        ];
        let order = CategoryOrder::new(["Mietmöbel", "Zelte und Pavillons"]);
        let buckets = organize(&products, &order);

        assert_eq!(names(&buckets), ["Mietmöbel", "Zelte und Pavillons"]);
        assert_eq!(buckets[0].len(), 2);
        assert_eq!(buckets[0].products[0].display_title(), "Tisch");
        assert_eq!(buckets[0].products[1].display_title(), "Stuhl");
    }

    #[test]
    fn test_unlisted_sorted_then_sentinel_last() {
        let products = vec![
            product("Husse", None),
            product("Beamer", Some("Technik")),
            product("Girlande", Some("Dekoration und Verkleidung")),
            product("Bierbank", Some("Ausstattung")),
            product("Kerze", Some("")),
            product("Tisch", Some("Mietmöbel")),
        ];
        let buckets = organize(&products, &CategoryOrder::default());

        assert_eq!(
            names(&buckets),
            [
                "Mietmöbel",
                "Dekoration und Verkleidung",
                "Ausstattung",
                "Technik",
                UNCATEGORIZED
            ]
        );
        let sentinel = buckets.last().unwrap();
        assert_eq!(sentinel.len(), 2);
        assert_eq!(sentinel.products[0].display_title(), "Husse");
        assert_eq!(sentinel.products[1].display_title(), "Kerze");
    }

    #[test]
    fn test_configured_sentinel_keeps_position() {
        let products = vec![
            product("Tisch", Some("Mietmöbel")),
            product("Husse", None),
            product("Beamer", Some("Technik")),
        ];
        let order = CategoryOrder::new([UNCATEGORIZED, "Mietmöbel"]);
        let buckets = organize(&products, &order);
        assert_eq!(names(&buckets), [UNCATEGORIZED, "Mietmöbel", "Technik"]);
    }

    #[test]
    fn test_every_category_exactly_once_and_non_empty() {
        let products = vec![
            product("a", Some("Zubehör")),
            product("b", Some("Personal")),
            product("c", Some("Zubehör")),
            product("d", Some("Licht")),
            product("e", Some("Personal")),
            product("f", None),
        ];
        let buckets = organize(&products, &CategoryOrder::default());

        let mut seen = names(&buckets);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), buckets.len());
        assert!(buckets.iter().all(|b| !b.is_empty()));
        assert_eq!(buckets.iter().map(CategoryBucket::len).sum::<usize>(), products.len());
    }

    #[test]
    fn test_accepts_filtered_references() {
        let products = vec![
            product("Tisch", Some("Mietmöbel")),
            product("Zelt", Some("Zelte und Pavillons")),
        ];
        let subset: Vec<&ProductRecord> = products.iter().skip(1).collect();
        let buckets = organize(subset, &CategoryOrder::default());
        assert_eq!(names(&buckets), ["Zelte und Pavillons"]);
    }

    #[test]
    fn test_anchor() {
        let products = vec![product("Tisch", Some("Mietmöbel"))];
        let buckets = organize(&products, &CategoryOrder::default());
        assert_eq!(buckets[0].anchor(), "cat-mietmoebel");
    }
}
