//! Gateway PostgreSQL
//!
//! Las filas se leen con `to_jsonb(t.*)` y se escriben a través de
//! `jsonb_populate_record`, de modo que el casting a los tipos de columna
//! lo hace Postgres. Los nombres de columna vienen siempre de la lista
//! blanca de [`Table`].

use async_trait::async_trait;
use sqlx::{postgres::PgDatabaseError, types::Json, PgPool, Postgres, QueryBuilder};
use serde_json::Value;

use super::{Changes, DataGateway, GatewayError, Row, SelectQuery, SelectResult, Table};

#[derive(Debug, Clone)]
pub struct PostgresGateway {
    pool: PgPool,
}

impl PostgresGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Clasifica errores SQL por SQLSTATE
fn classify(err: sqlx::Error) -> GatewayError {
    if let Some(db) = err.as_database_error() {
        if let Some(pg) = db.try_downcast_ref::<PgDatabaseError>() {
            let message = match pg.detail() {
                Some(detail) => format!("{} ({})", pg.message(), detail),
                None => pg.message().to_string(),
            };
            if let Some(classified) = classify_code(pg.code(), message) {
                return classified;
            }
        }
    }
    GatewayError::Sql(err)
}

/// Violaciones de integridad → conflicto; valores mal formados → entrada inválida.
fn classify_code(code: &str, message: String) -> Option<GatewayError> {
    match code {
        "23505" | "23503" => Some(GatewayError::Conflict(message)),
        "23502" | "22P02" | "22003" | "22007" | "22008" => Some(GatewayError::InvalidInput(message)),
        _ => None,
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &SelectQuery) {
    for (i, filter) in query.filters.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder.push(filter.column);
        builder.push("::text = ");
        builder.push_bind(filter.value.clone());
    }
}

fn count_query(table: Table, query: &SelectQuery) -> QueryBuilder<'static, Postgres> {
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ");
    count.push(table.name());
    push_filters(&mut count, query);
    count
}

fn page_query(table: Table, query: &SelectQuery) -> QueryBuilder<'static, Postgres> {
    let mut select = QueryBuilder::<Postgres>::new("SELECT to_jsonb(t.*) FROM ");
    select.push(table.name());
    select.push(" t");
    push_filters(&mut select, query);
    select.push(" ORDER BY ");
    select.push(query.order_by);
    select.push(if query.descending { " DESC" } else { " ASC" });
    select.push(", id DESC LIMIT ");
    select.push_bind(query.limit as i64);
    select.push(" OFFSET ");
    select.push_bind(query.offset as i64);
    select
}

/// Columnas en orden alfabético, independiente del orden del mapa
fn column_list(changes: &Changes) -> String {
    let mut columns: Vec<&str> = changes.keys().map(String::as_str).collect();
    columns.sort_unstable();
    columns.join(", ")
}

fn insert_sql(table: Table, row: &Changes) -> String {
    if row.is_empty() {
        format!("INSERT INTO {0} DEFAULT VALUES RETURNING to_jsonb({0}.*)", table.name())
    } else {
        format!(
            "INSERT INTO {0} ({1}) SELECT {1} FROM jsonb_populate_record(NULL::{0}, $1) \
             RETURNING to_jsonb({0}.*)",
            table.name(),
            column_list(row)
        )
    }
}

/// `SET (a, b) = (SELECT a, b ...)`; una sola columna usa la asignación simple.
fn update_sql(table: Table, changes: &Changes) -> String {
    let columns = column_list(changes);
    let target = if changes.len() == 1 {
        columns.clone()
    } else {
        format!("({})", columns)
    };
    format!(
        "UPDATE {0} SET {1} = (SELECT {2} FROM jsonb_populate_record(NULL::{0}, $2)) \
         WHERE id = $1 RETURNING to_jsonb({0}.*)",
        table.name(),
        target,
        columns
    )
}

#[async_trait]
impl DataGateway for PostgresGateway {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn select(&self, table: Table, query: &SelectQuery) -> Result<SelectResult, GatewayError> {
        table.check_columns(query.filters.iter().map(|f| f.column))?;
        table.check_columns([query.order_by])?;

        let total: i64 = count_query(table, query)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;

        let mut select = page_query(table, query);
        let rows: Vec<Json<Value>> = select
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        Ok(SelectResult {
            rows: rows.into_iter().map(|Json(row)| row).collect(),
            total: total.max(0) as u64,
        })
    }

    async fn fetch(&self, table: Table, id: i64) -> Result<Option<Row>, GatewayError> {
        let sql = format!("SELECT to_jsonb(t.*) FROM {} t WHERE id = $1", table.name());
        let row: Option<Json<Value>> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(|Json(row)| row))
    }

    async fn insert(&self, table: Table, row: Changes) -> Result<Row, GatewayError> {
        table.check_columns(row.keys().map(String::as_str))?;

        let sql = insert_sql(table, &row);
        let mut insert = sqlx::query_scalar::<Postgres, Json<Value>>(&sql);
        if !row.is_empty() {
            insert = insert.bind(Json(Value::Object(row)));
        }

        let Json(created): Json<Value> = insert
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        Ok(created)
    }

    async fn update(&self, table: Table, id: i64, changes: Changes) -> Result<Option<Row>, GatewayError> {
        if changes.is_empty() {
            return self.fetch(table, id).await;
        }
        table.check_columns(changes.keys().map(String::as_str))?;

        let sql = update_sql(table, &changes);

        let row: Option<Json<Value>> = sqlx::query_scalar(&sql)
            .bind(id)
            .bind(Json(Value::Object(changes)))
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(|Json(row)| row))
    }

    async fn delete(&self, table: Table, id: i64) -> Result<(), GatewayError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table.name());
        sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(())
    }
}
