use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::row::{AttributeRow, AttributeType, Product, build_rows};

/// A row annotated with the index of its best value, if the type has one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparedRow {
    #[serde(flatten)]
    pub row: AttributeRow,
    pub best_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    pub product_ids: Vec<Uuid>,
    pub rows: Vec<ComparedRow>,
}

fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('$').replace(',', "").parse().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Index of the best value in the row: lowest price, highest rating or number.
///
/// Non-numeric cells are skipped. On ties the first occurrence wins.
pub fn best_index(row: &AttributeRow) -> Option<usize> {
    let lower_is_better = match row.attr_type {
        AttributeType::Price => true,
        AttributeType::Rating | AttributeType::Number => false,
        AttributeType::Boolean | AttributeType::String => return None,
    };

    let mut best: Option<(usize, f64)> = None;
    for (index, value) in row.values.iter().enumerate() {
        let Some(v) = numeric(value) else { continue };
        let better = match best {
            None => true,
            Some((_, current)) if lower_is_better => v < current,
            Some((_, current)) => v > current,
        };
        if better {
            best = Some((index, v));
        }
    }
    best.map(|(index, _)| index)
}

fn all_identical(values: &[Value]) -> bool {
    let mut serialized = values.iter().map(Value::to_string);
    match serialized.next() {
        Some(first) => serialized.all(|v| v == first),
        None => true,
    }
}

/// Drops rows whose values are all the same.
pub fn differences_only(rows: Vec<AttributeRow>) -> Vec<AttributeRow> {
    rows.into_iter()
        .filter(|row| !all_identical(&row.values))
        .collect()
}

/// Builds the full comparison table for products already in display order.
pub fn compare(products: &[Product], only_differences: bool) -> ComparisonTable {
    let mut rows = build_rows(products);
    if only_differences {
        rows = differences_only(rows);
    }

    ComparisonTable {
        product_ids: products.iter().map(|p| p.id).collect(),
        rows: rows
            .into_iter()
            .map(|row| ComparedRow {
                best_index: best_index(&row),
                row,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(attr_type: AttributeType, values: Vec<Value>) -> AttributeRow {
        AttributeRow {
            key: "k".to_string(),
            name: "K".to_string(),
            attr_type,
            values,
        }
    }

    #[test]
    fn price_picks_cheapest() {
        let r = row(
            AttributeType::Price,
            vec![json!(29.99), json!(19.99), json!(39.99)],
        );
        assert_eq!(best_index(&r), Some(1));
    }

    #[test]
    fn rating_and_number_pick_highest() {
        let r = row(AttributeType::Rating, vec![json!(3.5), json!(4.8), json!(4.1)]);
        assert_eq!(best_index(&r), Some(1));
        let r = row(AttributeType::Number, vec![json!(16), json!(8), json!(32), json!(4)]);
        assert_eq!(best_index(&r), Some(2));
    }

    #[test]
    fn other_types_have_no_best() {
        assert_eq!(best_index(&row(AttributeType::Boolean, vec![json!(true), json!(false)])), None);
        assert_eq!(best_index(&row(AttributeType::String, vec![json!("a"), json!("b")])), None);
    }

    #[test]
    fn first_occurrence_wins_ties() {
        let r = row(AttributeType::Price, vec![json!(10), json!(5), json!(5)]);
        assert_eq!(best_index(&r), Some(1));
        let r = row(AttributeType::Rating, vec![json!(5), json!(5)]);
        assert_eq!(best_index(&r), Some(0));
    }

    #[test]
    fn non_numeric_cells_are_skipped() {
        let r = row(
            AttributeType::Price,
            vec![Value::Null, json!("$1,250.00"), json!(999.0), json!("n/a")],
        );
        assert_eq!(best_index(&r), Some(2));
        let r = row(AttributeType::Number, vec![Value::Null, json!("n/a")]);
        assert_eq!(best_index(&r), None);
    }

    #[test]
    fn differences_only_keeps_differing_rows() {
        let rows = vec![
            row(AttributeType::Number, vec![json!(1), json!(1), json!(1)]),
            row(AttributeType::Number, vec![json!(1), json!(1), json!(2)]),
            row(AttributeType::Boolean, vec![Value::Null, json!(false)]),
            row(AttributeType::String, vec![json!("x"), json!("x")]),
        ];
        let kept = differences_only(rows);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].values, vec![json!(1), json!(1), json!(2)]);
        assert_eq!(kept[1].attr_type, AttributeType::Boolean);
    }

    #[test]
    fn differences_only_never_drops_a_differing_row() {
        let samples = [json!(1), json!(1.0), json!("1"), Value::Null, json!(true)];
        for a in &samples {
            for b in &samples {
                let r = row(AttributeType::String, vec![a.clone(), b.clone()]);
                let kept = differences_only(vec![r]);
                if a.to_string() != b.to_string() {
                    assert_eq!(kept.len(), 1, "{a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn compare_annotates_rows() {
        let products: Vec<Product> = [29_99, 19_99, 39_99]
            .into_iter()
            .map(|price_cents| Product {
                id: Uuid::new_v4(),
                name: "p".to_string(),
                price_cents,
                attributes: serde_json::from_value(json!([
                    { "name": "Warranty", "type": "string", "value": "1 year" }
                ]))
                .unwrap(),
            })
            .collect();

        let table = compare(&products, false);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].best_index, Some(1));
        assert_eq!(table.rows[1].best_index, None);

        let table = compare(&products, true);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.product_ids, products.iter().map(|p| p.id).collect::<Vec<_>>());
    }

    #[test]
    fn compared_row_serializes_flat() {
        let compared = ComparedRow {
            row: row(AttributeType::Rating, vec![json!(4)]),
            best_index: Some(0),
        };
        let value = serde_json::to_value(&compared).unwrap();
        assert_eq!(value["type"], "rating");
        assert_eq!(value["best_index"], 0);
        assert_eq!(value["key"], "k");
    }
}
