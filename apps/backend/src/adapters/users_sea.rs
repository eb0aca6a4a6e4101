use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, Set,
};
use time::OffsetDateTime;

use crate::entities::users;

/// Insert payload for a self-registered account.
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, sea_orm::DbErr> {
    users::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        email: Set(dto.email),
        password: Set(dto.password_hash),
        age: Set(None),
        gender: Set(None),
        weight: Set(None),
        height: Set(None),
        goal: Set(None),
        activity_level: Set(None),
        role: Set(dto.role),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

pub async fn update_password<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user: users::Model,
    password_hash: String,
) -> Result<users::Model, sea_orm::DbErr> {
    let mut active = user.into_active_model();
    active.password = Set(password_hash);
    active.update(conn).await
}
