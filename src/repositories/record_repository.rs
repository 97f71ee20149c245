use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::gateway::{Changes, DataGateway, Filter, SelectQuery};
use crate::models::Record;
use crate::utils::errors::AppError;
use crate::utils::pagination::Pagination;

pub struct RecordRepository<T> {
    gateway: Arc<dyn DataGateway>,
    _record: PhantomData<fn() -> T>,
}

fn decode<T: Record>(row: Value) -> Result<T, AppError> {
    serde_json::from_value(row)
        .map_err(|e| AppError::Internal(format!("Error decoding {} row: {}", T::NAME, e)))
}

impl<T: Record> RecordRepository<T> {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            gateway,
            _record: PhantomData,
        }
    }

    /// Página filtrada, más reciente primero, junto con el total
    pub async fn list(
        &self,
        filters: Vec<Filter>,
        pagination: &Pagination,
    ) -> Result<(Vec<T>, u64), AppError> {
        let query = SelectQuery {
            filters,
            order_by: T::ORDER_BY,
            descending: true,
            offset: pagination.offset(),
            limit: pagination.limit(),
        };

        let result = self.gateway.select(T::TABLE, &query).await?;
        let records = result
            .rows
            .into_iter()
            .map(decode::<T>)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((records, result.total))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<T>, AppError> {
        self.gateway
            .fetch(T::TABLE, id)
            .await?
            .map(decode::<T>)
            .transpose()
    }

    pub async fn create(&self, row: Changes) -> Result<T, AppError> {
        let created = self.gateway.insert(T::TABLE, row).await?;
        decode(created)
    }

    pub async fn update(&self, id: i64, changes: Changes) -> Result<Option<T>, AppError> {
        self.gateway
            .update(T::TABLE, id, changes)
            .await?
            .map(decode::<T>)
            .transpose()
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.gateway.delete(T::TABLE, id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use crate::models::{Fleet, Vehicle};
    use serde_json::json;

    fn changes(value: Value) -> Changes {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn create_and_find_vehicle() {
        let repo = RecordRepository::<Vehicle>::new(Arc::new(MemoryGateway::new()));
        let created = repo
            .create(changes(json!({
                "owner": "Alice",
                "model": "X",
                "registration_number": "AB-123",
                "fleet_id": null
            })))
            .await
            .unwrap();

        assert_eq!(created.owner, "Alice");
        assert_eq!(created.fleet_id, None);
        assert_eq!(repo.find_by_id(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn list_pages_newest_first() {
        let repo = RecordRepository::<Fleet>::new(Arc::new(MemoryGateway::new()));
        for name in ["a", "b", "c"] {
            repo.create(changes(json!({ "name": name, "location": null })))
                .await
                .unwrap();
        }

        let (page, total) = repo.list(vec![], &Pagination::new(Some(1), Some(2))).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(), ["c", "b"]);
    }

    #[tokio::test]
    async fn undecodable_rows_are_internal_errors() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway
            .insert(crate::gateway::Table::Fleets, changes(json!({ "location": "Oslo" })))
            .await
            .unwrap();

        let repo = RecordRepository::<Fleet>::new(gateway);
        assert!(matches!(repo.find_by_id(1).await, Err(AppError::Internal(_))));
    }
}
