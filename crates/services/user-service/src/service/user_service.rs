//! User service - Handles user-related business logic.
//!
//! Parses dates of birth, delegates persistence to the repository and
//! attaches a freshly derived age to every user it returns.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use common::{AppResult, OptionExt};
use domain::{parse_dob, validate_name, Clock, DomainError, SystemClock, UserWithAge};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user from a name and a `YYYY-MM-DD` date of birth
    async fn create_user(&self, name: String, dob: &str) -> AppResult<UserWithAge>;

    /// Get user by ID
    async fn get_user(&self, id: i32) -> AppResult<UserWithAge>;

    /// Replace name and date of birth of an existing user
    async fn update_user(&self, id: i32, name: String, dob: &str) -> AppResult<UserWithAge>;

    /// Permanently delete a user
    async fn delete_user(&self, id: i32) -> AppResult<()>;

    /// One page of users plus the total number of users
    async fn list_users(&self, page: u64, page_size: u64) -> AppResult<(Vec<UserWithAge>, u64)>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl UserManager {
    /// Create new user service instance with repository, using the wall clock
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self::with_clock(repo, Arc::new(SystemClock))
    }

    /// Create new user service instance with an explicit reference-date source
    pub fn with_clock(repo: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Validate caller input before anything reaches the store.
    fn check_input(&self, name: &str, dob: &str, today: NaiveDate) -> AppResult<NaiveDate> {
        validate_name(name)?;
        let dob = parse_dob(dob)?;
        if dob > today {
            return Err(DomainError::FutureDateOfBirth.into());
        }
        Ok(dob)
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, name: String, dob: &str) -> AppResult<UserWithAge> {
        let today = self.clock.today();
        let dob = self.check_input(&name, dob, today)?;

        let user = self.repo.create(name, dob).await?;
        tracing::info!(user_id = user.id, "User created");

        Ok(user.with_age(today))
    }

    async fn get_user(&self, id: i32) -> AppResult<UserWithAge> {
        let user = self.repo.find_by_id(id).await?.ok_or_not_found("User")?;
        Ok(user.with_age(self.clock.today()))
    }

    async fn update_user(&self, id: i32, name: String, dob: &str) -> AppResult<UserWithAge> {
        let today = self.clock.today();
        let dob = self.check_input(&name, dob, today)?;

        let user = self.repo.update(id, name, dob).await?;
        tracing::info!(user_id = user.id, "User updated");

        Ok(user.with_age(today))
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn list_users(&self, page: u64, page_size: u64) -> AppResult<(Vec<UserWithAge>, u64)> {
        let users = self.repo.list(page, page_size).await?;
        let total = self.repo.count().await?;

        let today = self.clock.today();
        let users = users.into_iter().map(|user| user.with_age(today)).collect();

        Ok((users, total))
    }
}
