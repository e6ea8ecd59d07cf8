use crate::entities::{events, prelude::*};
use crate::models::{Cached, Event};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

pub struct EventRepository {
    conn: DatabaseConnection,
}

impl EventRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_location(&self, location_id: i32) -> Result<Vec<Cached<Event>>> {
        let rows = Events::find()
            .filter(events::Column::LocationId.eq(location_id))
            .order_by_asc(events::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(from_model).collect())
    }

    pub async fn delete_by_location(&self, location_id: i32) -> Result<u64> {
        let result = Events::delete_many()
            .filter(events::Column::LocationId.eq(location_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn insert_batch(
        &self,
        location_id: i32,
        created_at: i64,
        records: &[Event],
    ) -> Result<Vec<Cached<Event>>> {
        let txn = self.conn.begin().await?;
        let mut saved = Vec::with_capacity(records.len());

        for record in records {
            let model = events::ActiveModel {
                link: Set(record.link.clone()),
                name: Set(record.name.clone()),
                event_date: Set(record.event_date.clone()),
                summary: Set(record.summary.clone()),
                created_at: Set(created_at),
                location_id: Set(location_id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            saved.push(from_model(model));
        }

        txn.commit().await?;
        Ok(saved)
    }
}

fn from_model(model: events::Model) -> Cached<Event> {
    Cached {
        id: model.id,
        location_id: model.location_id,
        created_at: model.created_at,
        record: Event {
            link: model.link,
            name: model.name,
            event_date: model.event_date,
            summary: model.summary,
        },
    }
}
