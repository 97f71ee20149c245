//! Gateway en memoria
//!
//! Implementación local de la interfaz de almacenamiento para desarrollo y
//! tests. Los ids son secuenciales por tabla y `created_at` se asigna al
//! insertar.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{Changes, DataGateway, Filter, GatewayError, Row, SelectQuery, SelectResult, Table};

#[derive(Debug, Default)]
struct MemoryTable {
    last_id: i64,
    rows: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    tables: Arc<RwLock<HashMap<Table, MemoryTable>>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

fn row_id(row: &Map<String, Value>) -> i64 {
    row.get("id").and_then(Value::as_i64).unwrap_or_default()
}

fn matches(row: &Map<String, Value>, filter: &Filter) -> bool {
    match row.get(filter.column) {
        Some(Value::String(s)) => *s == filter.value,
        Some(Value::Number(n)) => n.to_string() == filter.value,
        Some(Value::Bool(b)) => b.to_string() == filter.value,
        _ => false,
    }
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Orden ascendente con los `null` al principio (al final tras invertir).
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => {
            if let (Some(x), Some(y)) = (as_timestamp(a), as_timestamp(b)) {
                return x.cmp(&y);
            }
            if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
                return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            }
            a.to_string().cmp(&b.to_string())
        }
    }
}

#[async_trait]
impl DataGateway for MemoryGateway {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn select(&self, table: Table, query: &SelectQuery) -> Result<SelectResult, GatewayError> {
        table.check_columns(query.filters.iter().map(|f| f.column))?;
        table.check_columns([query.order_by])?;

        let tables = self.tables.read().await;
        let mut rows: Vec<&Map<String, Value>> = tables
            .get(&table)
            .map(|t| t.rows.iter().collect())
            .unwrap_or_default();

        rows.retain(|row| query.filters.iter().all(|f| matches(row, f)));
        rows.sort_by(|a, b| {
            let ord = compare_values(a.get(query.order_by), b.get(query.order_by))
                .then_with(|| row_id(a).cmp(&row_id(b)));
            if query.descending {
                ord.reverse()
            } else {
                ord
            }
        });

        let total = rows.len() as u64;
        let rows = rows
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .map(|row| Value::Object(row.clone()))
            .collect();

        Ok(SelectResult { rows, total })
    }

    async fn fetch(&self, table: Table, id: i64) -> Result<Option<Row>, GatewayError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(&table)
            .and_then(|t| t.rows.iter().find(|row| row_id(row) == id))
            .map(|row| Value::Object(row.clone())))
    }

    async fn insert(&self, table: Table, row: Changes) -> Result<Row, GatewayError> {
        table.check_columns(row.keys().map(String::as_str))?;

        let mut tables = self.tables.write().await;
        let entry = tables.entry(table).or_default();
        entry.last_id += 1;

        let mut record = Map::new();
        record.insert("id".into(), Value::from(entry.last_id));
        for column in table.writable_columns() {
            record.insert((*column).to_string(), Value::Null);
        }
        record.extend(row);
        record.insert("created_at".into(), Value::String(Utc::now().to_rfc3339()));

        entry.rows.push(record.clone());
        Ok(Value::Object(record))
    }

    async fn update(&self, table: Table, id: i64, changes: Changes) -> Result<Option<Row>, GatewayError> {
        table.check_columns(changes.keys().map(String::as_str))?;

        let mut tables = self.tables.write().await;
        let Some(row) = tables
            .get_mut(&table)
            .and_then(|t| t.rows.iter_mut().find(|row| row_id(row) == id))
        else {
            return Ok(None);
        };

        row.extend(changes);
        Ok(Some(Value::Object(row.clone())))
    }

    async fn delete(&self, table: Table, id: i64) -> Result<(), GatewayError> {
        let mut tables = self.tables.write().await;
        if let Some(t) = tables.get_mut(&table) {
            t.rows.retain(|row| row_id(row) != id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn changes(value: Value) -> Changes {
        value.as_object().cloned().unwrap()
    }

    fn sessions_for(vehicle: &str, offset: u64, limit: u64) -> SelectQuery {
        SelectQuery {
            filters: vec![Filter::eq("vehicle_id", vehicle)],
            order_by: "start_time",
            descending: true,
            offset,
            limit,
        }
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_nulls() {
        let gw = MemoryGateway::new();
        let first = gw.insert(Table::Fleets, changes(json!({ "name": "North" }))).await.unwrap();
        let second = gw.insert(Table::Fleets, changes(json!({ "name": "South" }))).await.unwrap();

        assert_eq!(first["id"], 1);
        assert_eq!(second["id"], 2);
        assert_eq!(first["location"], Value::Null);
        assert!(first["created_at"].is_string());
    }

    #[tokio::test]
    async fn select_filters_orders_and_counts() {
        let gw = MemoryGateway::new();
        for hour in 0..7 {
            gw.insert(
                Table::ChargingSessions,
                changes(json!({
                    "vehicle_id": 42,
                    "start_time": format!("2024-05-01T{:02}:00:00Z", hour + 10),
                })),
            )
            .await
            .unwrap();
        }
        gw.insert(
            Table::ChargingSessions,
            changes(json!({ "vehicle_id": 7, "start_time": "2024-05-02T10:00:00Z" })),
        )
        .await
        .unwrap();

        let page = gw.select(Table::ChargingSessions, &sessions_for("42", 5, 5)).await.unwrap();
        assert_eq!(page.total, 7);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0]["start_time"], "2024-05-01T11:00:00Z");
        assert_eq!(page.rows[1]["start_time"], "2024-05-01T10:00:00Z");
    }

    #[tokio::test]
    async fn update_touches_only_given_columns() {
        let gw = MemoryGateway::new();
        gw.insert(Table::Fleets, changes(json!({ "name": "North", "location": "Oslo" })))
            .await
            .unwrap();

        let updated = gw
            .update(Table::Fleets, 1, changes(json!({ "name": "Nord" })))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["name"], "Nord");
        assert_eq!(updated["location"], "Oslo");

        assert!(gw.update(Table::Fleets, 99, Changes::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let gw = MemoryGateway::new();
        gw.insert(Table::Fleets, changes(json!({ "name": "North" }))).await.unwrap();
        gw.delete(Table::Fleets, 1).await.unwrap();
        gw.delete(Table::Fleets, 1).await.unwrap();
        assert!(gw.fetch(Table::Fleets, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_columns_are_rejected() {
        let gw = MemoryGateway::new();
        let err = gw
            .insert(Table::Fleets, changes(json!({ "name": "x", "owner": "y" })))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput(_)));
    }
}
