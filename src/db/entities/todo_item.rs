use sea_orm::Set;
use sea_orm::entity::prelude::*;

use crate::db::store::TodoItem;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    #[sea_orm(indexed)]
    pub status: String,
    pub created: DateTimeUtc,
    pub updated: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TodoItem {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            status: model.status,
            created: model.created,
            updated: model.updated,
        }
    }
}

impl From<&TodoItem> for ActiveModel {
    fn from(item: &TodoItem) -> Self {
        Self {
            id: Set(item.id),
            user_id: Set(item.user_id),
            title: Set(item.title.clone()),
            description: Set(item.description.clone()),
            status: Set(item.status.clone()),
            created: Set(item.created),
            updated: Set(item.updated),
        }
    }
}
