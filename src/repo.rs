use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryOrder, Set, Statement,
};
use tracing::debug;

use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::{MoviePatch, NewMovie},
};

/// Store access for the `movies` table.
pub struct MovieRepo {
    db: DatabaseConnection,
}

impl MovieRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn into_db(self) -> DatabaseConnection {
        self.db
    }

    /// Liveness probe. Returns whether the store answered `1`.
    pub async fn ping(&self) -> Result<bool, DbErr> {
        let row = self
            .db
            .query_one(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1 AS ok".to_string(),
            ))
            .await?;

        match row {
            Some(row) => Ok(row.try_get::<i64>("", "ok")? == 1),
            None => Ok(false),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<movie::Model>> {
        let movies = movie::Entity::find()
            .order_by_desc(movie::Column::CreatedAt)
            .order_by_desc(movie::Column::Id)
            .all(&self.db)
            .await?;
        Ok(movies)
    }

    pub async fn get(&self, id: i32) -> AppResult<movie::Model> {
        movie::Entity::find_by_id(id).one(&self.db).await?.ok_or(AppError::NotFound)
    }

    pub async fn create(&self, new: NewMovie) -> AppResult<movie::Model> {
        let now = now_micros();
        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(new.title),
            year: Set(new.year),
            genre: Set(new.genre),
            poster_url: Set(new.poster_url),
            rating: Set(new.rating),
            watched: Set(new.watched),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(&self.db).await?;
        debug!(id = created.id, title = %created.title, "movie created");
        Ok(created)
    }

    pub async fn update(&self, id: i32, patch: MoviePatch) -> AppResult<movie::Model> {
        let current = self.get(id).await?;
        let merged = patch.merge(current, now_micros());

        match merged.into_active_model().reset_all().update(&self.db).await {
            Ok(updated) => {
                debug!(id, "movie updated");
                Ok(updated)
            }
            // Deleted between the read and the write.
            Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        debug!(id, "movie deleted");
        Ok(())
    }
}

fn now_micros() -> i64 {
    jiff::Timestamp::now().as_microsecond()
}
