use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::forecast_snapshot;
use crate::models::Snapshot;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = forecast_snapshot)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // slot and updated_at are only used by the database
pub struct SnapshotRow {
    pub slot: i32,
    pub raw_table: String,
    pub ingested_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SnapshotRow> for Snapshot {
    fn from(row: SnapshotRow) -> Self {
        Snapshot::new(row.raw_table, row.ingested_at)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = forecast_snapshot)]
pub struct NewSnapshotRow {
    pub slot: i32,
    pub raw_table: String,
    pub ingested_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
