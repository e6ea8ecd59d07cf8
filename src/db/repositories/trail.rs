use crate::entities::{prelude::*, trails};
use crate::models::{Cached, Trail};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

pub struct TrailRepository {
    conn: DatabaseConnection,
}

impl TrailRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_location(&self, location_id: i32) -> Result<Vec<Cached<Trail>>> {
        let rows = Trails::find()
            .filter(trails::Column::LocationId.eq(location_id))
            .order_by_asc(trails::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(from_model).collect())
    }

    pub async fn delete_by_location(&self, location_id: i32) -> Result<u64> {
        let result = Trails::delete_many()
            .filter(trails::Column::LocationId.eq(location_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn insert_batch(
        &self,
        location_id: i32,
        created_at: i64,
        records: &[Trail],
    ) -> Result<Vec<Cached<Trail>>> {
        let txn = self.conn.begin().await?;
        let mut saved = Vec::with_capacity(records.len());

        for record in records {
            let model = trails::ActiveModel {
                name: Set(record.name.clone()),
                location: Set(record.location.clone()),
                length: Set(record.length),
                stars: Set(record.stars),
                star_votes: Set(record.star_votes),
                summary: Set(record.summary.clone()),
                trail_url: Set(record.trail_url.clone()),
                conditions: Set(record.conditions.clone()),
                condition_date: Set(record.condition_date.clone()),
                condition_time: Set(record.condition_time.clone()),
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

fn from_model(model: trails::Model) -> Cached<Trail> {
    Cached {
        id: model.id,
        location_id: model.location_id,
        created_at: model.created_at,
        record: Trail {
            name: model.name,
            location: model.location,
            length: model.length,
            stars: model.stars,
            star_votes: model.star_votes,
            summary: model.summary,
            trail_url: model.trail_url,
            conditions: model.conditions,
            condition_date: model.condition_date,
            condition_time: model.condition_time,
        },
    }
}
