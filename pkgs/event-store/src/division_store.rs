//! Division store, resolves the group that owns an event

use sea_orm::{ActiveValue::NotSet, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entities::divisions;

/// Division information attached to an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionInfo {
    pub id: i32,
    pub name: String,
    pub created_at: String,
}

impl From<divisions::Model> for DivisionInfo {
    fn from(model: divisions::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
        }
    }
}

/// Division store
#[derive(Debug, Clone)]
pub struct DivisionStore {
    db: DatabaseConnection,
}

impl DivisionStore {
    /// Create a new division store
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Add a division, returning its new id
    pub async fn add(&self, name: &str) -> Result<i32, DbErr> {
        let division = divisions::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            created_at: NotSet,
        };

        let result = divisions::Entity::insert(division).exec(&self.db).await?;

        info!("Division '{}' created with id {}", name, result.last_insert_id);
        Ok(result.last_insert_id)
    }

    /// Get a division by id
    pub async fn find(&self, id: i32) -> Result<Option<DivisionInfo>, DbErr> {
        debug!("Getting division: {}", id);

        let result = divisions::Entity::find_by_id(id).one(&self.db).await?;

        Ok(result.map(DivisionInfo::from))
    }

    /// Get all divisions
    pub async fn get_all(&self) -> Result<Vec<DivisionInfo>, DbErr> {
        let divisions = divisions::Entity::find()
            .order_by_asc(divisions::Column::Id)
            .all(&self.db)
            .await?;

        Ok(divisions.into_iter().map(DivisionInfo::from).collect())
    }
}
