//! User repository: translates domain operations into queries on `users`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set, Unchanged},
    DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Each method maps onto exactly one statement. Store errors are returned
/// unchanged (wrapped as [`AppError::Database`]); there is no retry.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user; the store assigns id and timestamps
    async fn create(&self, name: String, dob: NaiveDate) -> AppResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Replace name and date of birth; `NotFound` if no row has this ID
    async fn update(&self, id: i32, name: String, dob: NaiveDate) -> AppResult<User>;

    /// Hard delete user by ID; `NotFound` if no row has this ID
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// One page of users ordered by ID. `page` is 1-based; no clamping is done here.
    async fn list(&self, page: u64, page_size: u64) -> AppResult<Vec<User>>;

    /// Total number of users
    async fn count(&self) -> AppResult<u64>;
}

/// Concrete implementation of UserRepository backed by SeaORM
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Largest offset Postgres accepts as a bound `BIGINT` parameter.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Row offset for a 1-based page, capped at [`MAX_OFFSET`].
pub(crate) fn page_offset(page: u64, page_size: u64) -> u64 {
    page.saturating_sub(1)
        .checked_mul(page_size)
        .map_or(MAX_OFFSET, |offset| offset.min(MAX_OFFSET))
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, name: String, dob: NaiveDate) -> AppResult<User> {
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(name),
            dob: Set(dob),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let model = active_model.insert(self.db.as_ref()).await?;
        Ok(User::from(model))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(User::from))
    }

    async fn update(&self, id: i32, name: String, dob: NaiveDate) -> AppResult<User> {
        let active_model = ActiveModel {
            id: Unchanged(id),
            name: Set(name),
            dob: Set(dob),
            created_at: NotSet,
            updated_at: Set(Utc::now()),
        };

        match active_model.update(self.db.as_ref()).await {
            Ok(model) => Ok(User::from(model)),
            Err(DbErr::RecordNotUpdated) => Err(AppError::not_found("User")),
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(self.db.as_ref()).await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("User"));
        }

        Ok(())
    }

    async fn list(&self, page: u64, page_size: u64) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .offset(page_offset(page, page_size))
            .limit(page_size)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        let total = UserEntity::find().count(self.db.as_ref()).await?;
        Ok(total)
    }
}
