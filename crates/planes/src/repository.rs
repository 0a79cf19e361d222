use super::*;
use hangar_database::*;
use tokio_postgres::Client;

/// Storage collaborator for flight records.
/// Each method issues exactly one parameterized statement.
#[async_trait::async_trait]
pub trait Hangar: Send + Sync {
    /// Round-trips a trivial expression to prove the connection is alive.
    async fn solution(&self) -> Result<i32, StorageError>;
    async fn list(&self) -> Result<Vec<FlightRecord>, StorageError>;
    async fn find(&self, id: i32) -> Result<Vec<FlightRecord>, StorageError>;
    /// Returns the generated id.
    async fn create(&self, draft: &Draft) -> Result<i32, StorageError>;
    /// Returns the number of affected rows.
    async fn update(&self, id: i32, draft: &Draft) -> Result<u64, StorageError>;
    /// Returns the number of affected rows.
    async fn delete(&self, id: i32) -> Result<u64, StorageError>;
    async fn total(&self) -> Result<i64, StorageError>;
    async fn total_late(&self) -> Result<i64, StorageError>;
}

fn records(rows: Vec<tokio_postgres::Row>) -> Result<Vec<FlightRecord>, StorageError> {
    rows.iter()
        .map(FlightRecord::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(StorageError::from)
}

#[async_trait::async_trait]
impl Hangar for Client {
    async fn solution(&self) -> Result<i32, StorageError> {
        Ok(self
            .query_one("SELECT 1 + 1 AS solution", &[])
            .await?
            .try_get("solution")?)
    }

    async fn list(&self) -> Result<Vec<FlightRecord>, StorageError> {
        records(
            self.query(const_format::concatcp!("SELECT * FROM ", PLANES), &[])
                .await?,
        )
    }

    async fn find(&self, id: i32) -> Result<Vec<FlightRecord>, StorageError> {
        records(
            self.query(
                const_format::concatcp!("SELECT * FROM ", PLANES, " WHERE id = $1"),
                &[&id],
            )
            .await?,
        )
    }

    async fn create(&self, draft: &Draft) -> Result<i32, StorageError> {
        Ok(self
            .query_one(
                const_format::concatcp!(
                    "INSERT INTO ",
                    PLANES,
                    " (from_town, airline, arrival_time, is_late) VALUES ($1, $2, $3, $4) RETURNING id"
                ),
                &[
                    &draft.from_town(),
                    &draft.airline(),
                    &draft.arrival_time(),
                    &draft.is_late(),
                ],
            )
            .await?
            .try_get("id")?)
    }

    async fn update(&self, id: i32, draft: &Draft) -> Result<u64, StorageError> {
        Ok(self
            .execute(
                const_format::concatcp!(
                    "UPDATE ",
                    PLANES,
                    " SET from_town = $1, airline = $2, arrival_time = $3, is_late = $4 WHERE id = $5"
                ),
                &[
                    &draft.from_town(),
                    &draft.airline(),
                    &draft.arrival_time(),
                    &draft.is_late(),
                    &id,
                ],
            )
            .await?)
    }

    async fn delete(&self, id: i32) -> Result<u64, StorageError> {
        Ok(self
            .execute(
                const_format::concatcp!("DELETE FROM ", PLANES, " WHERE id = $1"),
                &[&id],
            )
            .await?)
    }

    async fn total(&self) -> Result<i64, StorageError> {
        Ok(self
            .query_one(
                const_format::concatcp!("SELECT count(*) AS total_planes FROM ", PLANES),
                &[],
            )
            .await?
            .try_get("total_planes")?)
    }

    async fn total_late(&self) -> Result<i64, StorageError> {
        Ok(self
            .query_one(
                const_format::concatcp!(
                    "SELECT count(is_late) AS total_is_late FROM ",
                    PLANES,
                    " WHERE is_late = 1"
                ),
                &[],
            )
            .await?
            .try_get("total_is_late")?)
    }
}
