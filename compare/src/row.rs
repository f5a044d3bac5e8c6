use entitlement::Priced;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const PRICE_KEY: &str = "price";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Boolean,
    Price,
    Rating,
    Number,
    #[serde(other)]
    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
    #[serde(default)]
    pub attributes: Vec<ProductAttribute>,
}

impl Priced for Product {
    fn price_cents(&self) -> i64 {
        self.price_cents
    }
}

/// One attribute across every compared product, in product order.
/// Products lacking the attribute contribute `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRow {
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub values: Vec<Value>,
}

/// Normalizes an attribute name into a row key: "Battery Life" -> "battery_life".
pub fn attribute_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            key.extend(c.to_lowercase());
        } else if !key.ends_with('_') {
            key.push('_');
        }
    }
    key.trim_end_matches('_').to_string()
}

/// Flattens products into rows: price first, then every attribute in order
/// of first appearance.
pub fn build_rows(products: &[Product]) -> Vec<AttributeRow> {
    let mut rows = vec![AttributeRow {
        key: PRICE_KEY.to_string(),
        name: "Price".to_string(),
        attr_type: AttributeType::Price,
        values: products
            .iter()
            .map(|p| Value::from(p.price_cents as f64 / 100.0))
            .collect(),
    }];

    for (index, product) in products.iter().enumerate() {
        for attr in &product.attributes {
            let key = attribute_key(&attr.name);
            if key.is_empty() || key == PRICE_KEY {
                continue;
            }
            let row = match rows.iter_mut().position(|r| r.key == key) {
                Some(pos) => &mut rows[pos],
                None => {
                    rows.push(AttributeRow {
                        key,
                        name: attr.name.trim().to_string(),
                        attr_type: attr.attr_type,
                        values: vec![Value::Null; products.len()],
                    });
                    let last = rows.len() - 1;
                    &mut rows[last]
                }
            };
            // first value wins when a product repeats an attribute
            if row.values[index].is_null() {
                row.values[index] = attr.value.clone();
            }
        }
    }

    rows
}
