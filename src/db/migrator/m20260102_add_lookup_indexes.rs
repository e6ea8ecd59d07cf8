use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Every category table is read and invalidated by `location_id`.
const CATEGORY_TABLES: [(CategoryTable, &str); 5] = [
    (CategoryTable::Weathers, "idx_weathers_location_id"),
    (CategoryTable::Events, "idx_events_location_id"),
    (CategoryTable::Reviews, "idx_reviews_location_id"),
    (CategoryTable::Movies, "idx_movies_location_id"),
    (CategoryTable::Trails, "idx_trails_location_id"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_locations_search_query")
                    .table(Locations::Table)
                    .col(Locations::SearchQuery)
                    .to_owned(),
            )
            .await?;

        for (table, name) in CATEGORY_TABLES {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(table)
                        .col(CategoryColumn::LocationId)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, name) in CATEGORY_TABLES {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }

        manager
            .drop_index(
                Index::drop()
                    .name("idx_locations_search_query")
                    .table(Locations::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Locations {
    Table,
    SearchQuery,
}

#[derive(DeriveIden, Clone, Copy)]
enum CategoryTable {
    Weathers,
    Events,
    Reviews,
    Movies,
    Trails,
}

#[derive(DeriveIden)]
enum CategoryColumn {
    LocationId,
}
