use chrono::NaiveDateTime;
use serde::Serialize;

/// One row of the `planes` table: a single flight arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightRecord {
    id: i32,
    from_town: String,
    airline: String,
    arrival_time: NaiveDateTime,
    is_late: i16,
}

impl FlightRecord {
    pub fn new(
        id: i32,
        from_town: String,
        airline: String,
        arrival_time: NaiveDateTime,
        is_late: i16,
    ) -> Self {
        Self {
            id,
            from_town,
            airline,
            arrival_time,
            is_late,
        }
    }
    pub fn id(&self) -> i32 {
        self.id
    }
    pub fn from_town(&self) -> &str {
        &self.from_town
    }
    pub fn airline(&self) -> &str {
        &self.airline
    }
    pub fn arrival_time(&self) -> NaiveDateTime {
        self.arrival_time
    }
    pub fn is_late(&self) -> i16 {
        self.is_late
    }
}

impl TryFrom<&tokio_postgres::Row> for FlightRecord {
    type Error = tokio_postgres::Error;
    fn try_from(row: &tokio_postgres::Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            from_town: row.try_get("from_town")?,
            airline: row.try_get("airline")?,
            arrival_time: row.try_get("arrival_time")?,
            is_late: row.try_get("is_late")?,
        })
    }
}
