//! In-process storage collaborators for exercising the HTTP surface.
use super::*;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::AtomicI32;
use std::sync::atomic::Ordering;

/// Keeps rows in a map and hands out sequential ids starting at 1.
#[derive(Default)]
pub struct Memory {
    sequence: AtomicI32,
    rows: Mutex<BTreeMap<i32, FlightRecord>>,
}

impl Memory {
    fn record(id: i32, draft: &Draft) -> FlightRecord {
        FlightRecord::new(
            id,
            draft.from_town().to_string(),
            draft.airline().to_string(),
            draft.arrival_time(),
            draft.is_late(),
        )
    }
}

#[async_trait::async_trait]
impl Hangar for Memory {
    async fn solution(&self) -> Result<i32, StorageError> {
        Ok(1 + 1)
    }
    async fn list(&self) -> Result<Vec<FlightRecord>, StorageError> {
        Ok(self.rows.lock().expect("rows").values().cloned().collect())
    }
    async fn find(&self, id: i32) -> Result<Vec<FlightRecord>, StorageError> {
        Ok(self.rows.lock().expect("rows").get(&id).cloned().into_iter().collect())
    }
    async fn create(&self, draft: &Draft) -> Result<i32, StorageError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        self.rows
            .lock()
            .expect("rows")
            .insert(id, Self::record(id, draft));
        Ok(id)
    }
    async fn update(&self, id: i32, draft: &Draft) -> Result<u64, StorageError> {
        match self.rows.lock().expect("rows").get_mut(&id) {
            Some(row) => {
                *row = Self::record(id, draft);
                Ok(1)
            }
            None => Ok(0),
        }
    }
    async fn delete(&self, id: i32) -> Result<u64, StorageError> {
        Ok(self.rows.lock().expect("rows").remove(&id).map_or(0, |_| 1))
    }
    async fn total(&self) -> Result<i64, StorageError> {
        Ok(self.rows.lock().expect("rows").len() as i64)
    }
    async fn total_late(&self) -> Result<i64, StorageError> {
        Ok(self
            .rows
            .lock()
            .expect("rows")
            .values()
            .filter(|row| row.is_late() == 1)
            .count() as i64)
    }
}

/// Fails every statement the way an unreachable server would.
pub struct Broken;

impl Broken {
    pub const CODE: &'static str = "08006";
    pub const MESSAGE: &'static str = "connection to server was lost";
    fn fail<T>() -> Result<T, StorageError> {
        Err(StorageError::new(Self::CODE, Self::MESSAGE))
    }
}

#[async_trait::async_trait]
impl Hangar for Broken {
    async fn solution(&self) -> Result<i32, StorageError> {
        Self::fail()
    }
    async fn list(&self) -> Result<Vec<FlightRecord>, StorageError> {
        Self::fail()
    }
    async fn find(&self, _: i32) -> Result<Vec<FlightRecord>, StorageError> {
        Self::fail()
    }
    async fn create(&self, _: &Draft) -> Result<i32, StorageError> {
        Self::fail()
    }
    async fn update(&self, _: i32, _: &Draft) -> Result<u64, StorageError> {
        Self::fail()
    }
    async fn delete(&self, _: i32) -> Result<u64, StorageError> {
        Self::fail()
    }
    async fn total(&self) -> Result<i64, StorageError> {
        Self::fail()
    }
    async fn total_late(&self) -> Result<i64, StorageError> {
        Self::fail()
    }
}
