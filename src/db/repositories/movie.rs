use crate::entities::{movies, prelude::*};
use crate::models::{Cached, Movie};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_location(&self, location_id: i32) -> Result<Vec<Cached<Movie>>> {
        let rows = Movies::find()
            .filter(movies::Column::LocationId.eq(location_id))
            .order_by_asc(movies::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(from_model).collect())
    }

    pub async fn delete_by_location(&self, location_id: i32) -> Result<u64> {
        let result = Movies::delete_many()
            .filter(movies::Column::LocationId.eq(location_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn insert_batch(
        &self,
        location_id: i32,
        created_at: i64,
        records: &[Movie],
    ) -> Result<Vec<Cached<Movie>>> {
        let txn = self.conn.begin().await?;
        let mut saved = Vec::with_capacity(records.len());

        for record in records {
            let model = movies::ActiveModel {
                title: Set(record.title.clone()),
                overview: Set(record.overview.clone()),
                average_votes: Set(record.average_votes),
                total_votes: Set(record.total_votes),
                image_url: Set(record.image_url.clone()),
                popularity: Set(record.popularity),
                released_on: Set(record.released_on.clone()),
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

fn from_model(model: movies::Model) -> Cached<Movie> {
    Cached {
        id: model.id,
        location_id: model.location_id,
        created_at: model.created_at,
        record: Movie {
            title: model.title,
            overview: model.overview,
            average_votes: model.average_votes,
            total_votes: model.total_votes,
            image_url: model.image_url,
            popularity: model.popularity,
            released_on: model.released_on,
        },
    }
}
