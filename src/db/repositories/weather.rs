use crate::entities::{prelude::*, weathers};
use crate::models::{Cached, Weather};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

pub struct WeatherRepository {
    conn: DatabaseConnection,
}

impl WeatherRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_location(&self, location_id: i32) -> Result<Vec<Cached<Weather>>> {
        let rows = Weathers::find()
            .filter(weathers::Column::LocationId.eq(location_id))
            .order_by_asc(weathers::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(from_model).collect())
    }

    pub async fn delete_by_location(&self, location_id: i32) -> Result<u64> {
        let result = Weathers::delete_many()
            .filter(weathers::Column::LocationId.eq(location_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn insert_batch(
        &self,
        location_id: i32,
        created_at: i64,
        records: &[Weather],
    ) -> Result<Vec<Cached<Weather>>> {
        let txn = self.conn.begin().await?;
        let mut saved = Vec::with_capacity(records.len());

        for record in records {
            let model = weathers::ActiveModel {
                forecast: Set(record.forecast.clone()),
                time: Set(record.time.clone()),
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

fn from_model(model: weathers::Model) -> Cached<Weather> {
    Cached {
        id: model.id,
        location_id: model.location_id,
        created_at: model.created_at,
        record: Weather {
            forecast: model.forecast,
            time: model.time,
        },
    }
}
