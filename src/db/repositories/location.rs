use crate::entities::{locations, prelude::*};
use crate::models::{Location, NewLocation};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

pub struct LocationRepository {
    conn: DatabaseConnection,
}

impl LocationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// The oldest row wins if the same query was ever stored twice.
    pub async fn find_by_query(&self, search_query: &str) -> Result<Option<Location>> {
        let row = Locations::find()
            .filter(locations::Column::SearchQuery.eq(search_query))
            .order_by_asc(locations::Column::Id)
            .one(&self.conn)
            .await?;

        Ok(row.map(from_model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Location>> {
        let row = Locations::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(from_model))
    }

    pub async fn insert(&self, location: NewLocation) -> Result<Location> {
        let active_model = locations::ActiveModel {
            search_query: Set(location.search_query),
            formatted_query: Set(location.formatted_query),
            latitude: Set(location.latitude),
            longitude: Set(location.longitude),
            ..Default::default()
        };

        let model = active_model.insert(&self.conn).await?;
        Ok(from_model(model))
    }
}

fn from_model(model: locations::Model) -> Location {
    Location {
        id: model.id,
        search_query: model.search_query,
        formatted_query: model.formatted_query,
        latitude: model.latitude,
        longitude: model.longitude,
    }
}
