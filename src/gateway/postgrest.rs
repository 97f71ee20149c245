//! Gateway PostgREST (Supabase `/rest/v1`)
//!
//! Cliente HTTP contra la API REST autogenerada del proyecto Supabase.
//! El conteo de filas se obtiene con `Prefer: count=exact` y se lee de la
//! cabecera `Content-Range` (`0-4/42`, `*/0`).

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{Changes, DataGateway, GatewayError, Row, SelectQuery, SelectResult, Table};

#[derive(Debug, Clone)]
pub struct PostgrestGateway {
    client: Client,
    rest_url: String,
    api_key: String,
}

/// Cuerpo de error de PostgREST
#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

impl PostgrestGateway {
    pub fn new(client: Client, supabase_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            rest_url: format!("{}/rest/v1", supabase_url.trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }

    fn request(&self, method: reqwest::Method, table: Table) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.rest_url, table.name()))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn rows(response: Response) -> Result<Vec<Row>, GatewayError> {
        let response = Self::check(response).await?;
        response.json::<Vec<Row>>().await.map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn check(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: Option<PostgrestError> = serde_json::from_str(&body).ok();
        let message = parsed
            .as_ref()
            .and_then(|e| e.message.clone())
            .map(|m| match parsed.as_ref().and_then(|e| e.details.as_deref()) {
                Some(details) => format!("{} ({})", m, details),
                None => m,
            })
            .unwrap_or_else(|| format!("PostgREST responded {}", status));

        debug!(
            "PostgREST error {} code={:?}: {}",
            status,
            parsed.as_ref().and_then(|e| e.code.as_deref()),
            message
        );

        Err(match status {
            StatusCode::CONFLICT => GatewayError::Conflict(message),
            StatusCode::BAD_REQUEST => GatewayError::InvalidInput(message),
            _ => GatewayError::Upstream { status: Some(status.as_u16()), message },
        })
    }
}

/// Extrae el total de `Content-Range: 0-9/42`
pub(crate) fn parse_content_range(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}

#[async_trait]
impl DataGateway for PostgrestGateway {
    fn backend(&self) -> &'static str {
        "postgrest"
    }

    async fn select(&self, table: Table, query: &SelectQuery) -> Result<SelectResult, GatewayError> {
        table.check_columns(query.filters.iter().map(|f| f.column))?;
        table.check_columns([query.order_by])?;

        let direction = if query.descending { "desc" } else { "asc" };
        let mut params: Vec<(String, String)> = vec![("select".into(), "*".into())];
        for filter in &query.filters {
            params.push((filter.column.to_string(), format!("eq.{}", filter.value)));
        }
        params.push(("order".into(), format!("{}.{},id.desc", query.order_by, direction)));
        params.push(("offset".into(), query.offset.to_string()));
        params.push(("limit".into(), query.limit.to_string()));

        let response = self
            .request(reqwest::Method::GET, table)
            .query(&params)
            .header("Prefer", "count=exact")
            .send()
            .await?;

        let total = response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range);

        // Offset fuera de rango: PostgREST responde 416 pero informa el total
        if response.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok(SelectResult { rows: Vec::new(), total: total.unwrap_or(0) });
        }

        let rows = Self::rows(response).await?;
        let total = total.unwrap_or(query.offset + rows.len() as u64);
        Ok(SelectResult { rows, total })
    }

    async fn fetch(&self, table: Table, id: i64) -> Result<Option<Row>, GatewayError> {
        let response = self
            .request(reqwest::Method::GET, table)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))])
            .send()
            .await?;
        Ok(Self::rows(response).await?.into_iter().next())
    }

    async fn insert(&self, table: Table, row: Changes) -> Result<Row, GatewayError> {
        table.check_columns(row.keys().map(String::as_str))?;

        let response = self
            .request(reqwest::Method::POST, table)
            .query(&[("select", "*")])
            .header("Prefer", "return=representation")
            .json(&Value::Object(row))
            .send()
            .await?;

        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Decode("insert returned no rows".into()))
    }

    async fn update(&self, table: Table, id: i64, changes: Changes) -> Result<Option<Row>, GatewayError> {
        if changes.is_empty() {
            return self.fetch(table, id).await;
        }
        table.check_columns(changes.keys().map(String::as_str))?;

        let response = self
            .request(reqwest::Method::PATCH, table)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&Value::Object(changes))
            .send()
            .await?;
        Ok(Self::rows(response).await?.into_iter().next())
    }

    async fn delete(&self, table: Table, id: i64) -> Result<(), GatewayError> {
        let response = self
            .request(reqwest::Method::DELETE, table)
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Filter;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> PostgrestGateway {
        PostgrestGateway::new(Client::new(), &server.uri(), "anon-key")
    }

    #[test]
    fn content_range_total() {
        assert_eq!(parse_content_range("0-4/42"), Some(42));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-4/*"), None);
    }

    #[tokio::test]
    async fn select_sends_filters_order_and_window() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/charging_sessions"))
            .and(query_param("vehicle_id", "eq.42"))
            .and(query_param("order", "start_time.desc,id.desc"))
            .and(query_param("offset", "5"))
            .and(query_param("limit", "5"))
            .and(header("apikey", "anon-key"))
            .and(header("Prefer", "count=exact"))
            .respond_with(
                ResponseTemplate::new(206)
                    .insert_header("Content-Range", "5-5/6")
                    .set_body_json(json!([{ "id": 1, "vehicle_id": 42 }])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = gateway(&server)
            .select(
                Table::ChargingSessions,
                &SelectQuery {
                    filters: vec![Filter::eq("vehicle_id", "42")],
                    order_by: "start_time",
                    descending: true,
                    offset: 5,
                    limit: 5,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.total, 6);
        assert_eq!(result.rows.len(), 1);
    }

    #[tokio::test]
    async fn select_past_the_end_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/fleets"))
            .respond_with(ResponseTemplate::new(416).insert_header("Content-Range", "*/3"))
            .mount(&server)
            .await;

        let result = gateway(&server)
            .select(
                Table::Fleets,
                &SelectQuery {
                    filters: vec![],
                    order_by: "created_at",
                    descending: true,
                    offset: 50,
                    limit: 10,
                },
            )
            .await
            .unwrap();
        assert_eq!(result.total, 3);
        assert!(result.rows.is_empty());
    }

    #[tokio::test]
    async fn insert_returns_representation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/fleets"))
            .and(header("Prefer", "return=representation"))
            .and(body_json(json!({ "name": "North", "location": null })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([
                { "id": 3, "name": "North", "location": null, "created_at": "2024-05-01T10:00:00+00:00" }
            ])))
            .mount(&server)
            .await;

        let row = gateway(&server)
            .insert(
                Table::Fleets,
                json!({ "name": "North", "location": null }).as_object().cloned().unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(row["id"], 3);
    }

    #[tokio::test]
    async fn update_of_missing_row_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/vehicles"))
            .and(query_param("id", "eq.9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let row = gateway(&server)
            .update(Table::Vehicles, 9, json!({ "model": "Y" }).as_object().cloned().unwrap())
            .await
            .unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn foreign_key_violation_is_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/vehicles"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23503",
                "message": "insert or update on table \"vehicles\" violates foreign key constraint",
                "details": "Key (fleet_id)=(77) is not present in table \"fleets\"."
            })))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .insert(
                Table::Vehicles,
                json!({ "owner": "A", "model": "X", "registration_number": "R", "fleet_id": 77 })
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .await
            .unwrap_err();
        match err {
            GatewayError::Conflict(msg) => assert!(msg.contains("fleet_id")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_errors_keep_status() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/fleets"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = gateway(&server).delete(Table::Fleets, 1).await.unwrap_err();
        assert!(matches!(err, GatewayError::Upstream { status: Some(503), .. }));
    }
}
