use sea_orm::ConnectionTrait;

use crate::adapters::users_sea::{self, UserCreate};
use crate::entities::users;
use crate::errors::domain::DomainError;

/// User domain model
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: time::OffsetDateTime,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password,
            role: model.role,
            created_at: model.created_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<User>, DomainError> {
    Ok(users_sea::find_by_id(conn, id).await?.map(User::from))
}

pub async fn find_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<User>, DomainError> {
    Ok(users_sea::find_by_email(conn, email).await?.map(User::from))
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
    email: &str,
    password_hash: String,
    role: &str,
) -> Result<User, DomainError> {
    let dto = UserCreate {
        name: name.to_owned(),
        email: email.to_owned(),
        password_hash,
        role: role.to_owned(),
    };
    Ok(users_sea::create_user(conn, dto).await?.into())
}

/// Replace the stored hash. `None` when the user no longer exists.
pub async fn update_password<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    password_hash: String,
) -> Result<Option<User>, DomainError> {
    let Some(model) = users_sea::find_by_id(conn, user_id).await? else {
        return Ok(None);
    };
    Ok(Some(
        users_sea::update_password(conn, model, password_hash)
            .await?
            .into(),
    ))
}
