use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::db::entities::{prelude::Tag, tag};
use crate::web::error::AppError;

pub async fn list_tags(db: &DatabaseConnection) -> Result<Vec<tag::Model>, AppError> {
    Ok(Tag::find().order_by_asc(tag::Column::Name).all(db).await?)
}

pub async fn get_tag(db: &DatabaseConnection, tag_id: i32) -> Result<tag::Model, AppError> {
    Tag::find_by_id(tag_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {tag_id} not found")))
}
