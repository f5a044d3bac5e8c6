use std::collections::HashSet;

use common::error::{AppError, Res};
use serde::Serialize;
use uuid::Uuid;

use crate::row::Product;

pub const MIN_PRODUCTS: usize = 2;
pub const MAX_PRODUCTS: usize = 4;

/// Ordered, de-duplicated ids of the products being compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComparisonSet(Vec<Uuid>);

impl ComparisonSet {
    pub fn new(ids: Vec<Uuid>) -> Res<Self> {
        if ids.len() < MIN_PRODUCTS || ids.len() > MAX_PRODUCTS {
            return Err(AppError::BadRequest(format!(
                "A comparison needs between {} and {} products, got {}",
                MIN_PRODUCTS,
                MAX_PRODUCTS,
                ids.len()
            )));
        }

        let mut seen = HashSet::with_capacity(ids.len());
        if let Some(duplicate) = ids.iter().find(|id| !seen.insert(**id)) {
            return Err(AppError::BadRequest(format!(
                "Product {} appears more than once in the comparison",
                duplicate
            )));
        }

        Ok(Self(ids))
    }

    pub fn ids(&self) -> &[Uuid] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Puts loaded products into set order. Fails if any id wasn't loaded.
    pub fn order(&self, mut products: Vec<Product>) -> Res<Vec<Product>> {
        let mut ordered = Vec::with_capacity(self.0.len());
        for id in &self.0 {
            let pos = products
                .iter()
                .position(|p| p.id == *id)
                .ok_or_else(|| AppError::NotFound(format!("Product {}", id)))?;
            ordered.push(products.swap_remove(pos));
        }
        Ok(ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    fn product(id: Uuid) -> Product {
        Product {
            id,
            name: id.to_string(),
            price_cents: 100,
            attributes: vec![],
        }
    }

    #[test]
    fn accepts_two_to_four() {
        for n in MIN_PRODUCTS..=MAX_PRODUCTS {
            assert_eq!(ComparisonSet::new(ids(n)).unwrap().len(), n);
        }
    }

    #[test]
    fn rejects_out_of_range() {
        for n in [0, 1, 5, 8] {
            assert!(matches!(ComparisonSet::new(ids(n)), Err(AppError::BadRequest(_))));
        }
    }

    #[test]
    fn rejects_duplicates() {
        let id = Uuid::new_v4();
        assert!(matches!(
            ComparisonSet::new(vec![id, Uuid::new_v4(), id]),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn orders_products_like_the_set() {
        let set = ComparisonSet::new(ids(3)).unwrap();
        let loaded = set.ids().iter().rev().copied().map(product).collect();
        let ordered = set.order(loaded).unwrap();
        let ordered_ids: Vec<Uuid> = ordered.iter().map(|p| p.id).collect();
        assert_eq!(ordered_ids, set.ids());
    }

    #[test]
    fn missing_product_is_not_found() {
        let set = ComparisonSet::new(ids(2)).unwrap();
        let loaded = vec![product(set.ids()[0])];
        assert!(matches!(set.order(loaded), Err(AppError::NotFound(_))));
    }
}
