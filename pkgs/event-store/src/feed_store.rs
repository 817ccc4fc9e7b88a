//! Feed store, lists the feed items posted against an event

use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entities::feeds;

/// A single feed item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: i32,
    pub event_id: i32,
    pub content: String,
    pub created_at: String,
}

impl From<feeds::Model> for FeedItem {
    fn from(model: feeds::Model) -> Self {
        Self {
            id: model.id,
            event_id: model.event_id,
            content: model.content,
            created_at: model.created_at,
        }
    }
}

/// Feed store
#[derive(Debug, Clone)]
pub struct FeedStore {
    db: DatabaseConnection,
}

impl FeedStore {
    /// Create a new feed store
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Post a feed item against an event, returning its new id
    pub async fn add(&self, event_id: i32, content: &str) -> Result<i32, DbErr> {
        let item = feeds::ActiveModel {
            id: NotSet,
            event_id: Set(event_id),
            content: Set(content.to_string()),
            created_at: NotSet,
        };

        let result = feeds::Entity::insert(item).exec(&self.db).await?;

        info!("Feed item {} added to event {}", result.last_insert_id, event_id);
        Ok(result.last_insert_id)
    }

    /// Get every feed item of an event, oldest first
    pub async fn find_all_by_event_id(&self, event_id: i32) -> Result<Vec<FeedItem>, DbErr> {
        debug!("Getting feed for event: {}", event_id);

        let items = feeds::Entity::find()
            .filter(feeds::Column::EventId.eq(event_id))
            .order_by_asc(feeds::Column::Id)
            .all(&self.db)
            .await?;

        Ok(items.into_iter().map(FeedItem::from).collect())
    }
}
