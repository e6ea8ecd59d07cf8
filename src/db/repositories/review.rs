use crate::entities::{prelude::*, reviews};
use crate::models::{Cached, Review};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

pub struct ReviewRepository {
    conn: DatabaseConnection,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_location(&self, location_id: i32) -> Result<Vec<Cached<Review>>> {
        let rows = Reviews::find()
            .filter(reviews::Column::LocationId.eq(location_id))
            .order_by_asc(reviews::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(from_model).collect())
    }

    pub async fn delete_by_location(&self, location_id: i32) -> Result<u64> {
        let result = Reviews::delete_many()
            .filter(reviews::Column::LocationId.eq(location_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn insert_batch(
        &self,
        location_id: i32,
        created_at: i64,
        records: &[Review],
    ) -> Result<Vec<Cached<Review>>> {
        let txn = self.conn.begin().await?;
        let mut saved = Vec::with_capacity(records.len());

        for record in records {
            let model = reviews::ActiveModel {
                name: Set(record.name.clone()),
                image_url: Set(record.image_url.clone()),
                price: Set(record.price.clone()),
                rating: Set(record.rating),
                url: Set(record.url.clone()),
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

fn from_model(model: reviews::Model) -> Cached<Review> {
    Cached {
        id: model.id,
        location_id: model.location_id,
        created_at: model.created_at,
        record: Review {
            name: model.name,
            image_url: model.image_url,
            price: model.price,
            rating: model.rating,
            url: model.url,
        },
    }
}
