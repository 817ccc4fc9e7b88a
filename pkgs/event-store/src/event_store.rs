//! Event store - lookup, insert-or-update and soft deletion of events

use sea_orm::{
    prelude::Expr, ActiveValue::NotSet, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Select, Set,
};
use tracing::{debug, info, warn};

use crate::division_store::{DivisionInfo, DivisionStore};
use crate::entities::events;
use crate::error::{Result, StoreError};
use crate::event::{Event, EventInput};
use crate::feed_store::{FeedItem, FeedStore};
use crate::{open_database, StoreConfig, STORE_NOW};

/// Event store
///
/// Every event handed out carries its division (when `division_id` is set)
/// and its feed (when the event has an id). After any write the instance is
/// read back from the store so it matches the persisted row exactly.
#[derive(Debug, Clone)]
pub struct EventStore {
    db: DatabaseConnection,
    divisions: DivisionStore,
    feeds: FeedStore,
}

impl EventStore {
    /// Create an event store over an existing database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            divisions: DivisionStore::new(db.clone()),
            feeds: FeedStore::new(db.clone()),
            db,
        }
    }

    /// Open the configured database, run migrations and create the store
    pub async fn with_config(config: StoreConfig) -> Result<Self> {
        let db = open_database(&config).await?;
        Ok(Self::new(db))
    }

    /// The connection shared by this store and its lookups
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Build an unpersisted event from caller input.
    ///
    /// The division is resolved right away when `division_id` is given; the
    /// feed stays unloaded until the event has an id.
    pub async fn from_input(&self, input: EventInput) -> Result<Event> {
        let mut event = Event::from(input);
        self.attach_associations(&mut event).await?;
        Ok(event)
    }

    /// Get an event by id
    pub async fn find_by_id(&self, id: i32, include_inactive: bool) -> Result<Option<Event>> {
        debug!("Getting event: {} (include_inactive: {})", id, include_inactive);

        let model = scoped(events::Entity::find_by_id(id), include_inactive)
            .one(&self.db)
            .await?;

        match model {
            Some(model) => Ok(Some(self.hydrate(model).await?)),
            None => Ok(None),
        }
    }

    /// Get all events, ordered by id
    pub async fn find_all(&self, include_inactive: bool) -> Result<Vec<Event>> {
        debug!("Getting all events (include_inactive: {})", include_inactive);

        let models = scoped(events::Entity::find(), include_inactive)
            .order_by_asc(events::Column::Id)
            .all(&self.db)
            .await?;

        self.hydrate_all(models).await
    }

    /// Get all events owned by a division, ordered by id
    pub async fn find_all_by_division(
        &self,
        division_id: i32,
        include_inactive: bool,
    ) -> Result<Vec<Event>> {
        debug!(
            "Getting events of division: {} (include_inactive: {})",
            division_id, include_inactive
        );

        let query = events::Entity::find().filter(events::Column::DivisionId.eq(division_id));
        let models = scoped(query, include_inactive)
            .order_by_asc(events::Column::Id)
            .all(&self.db)
            .await?;

        self.hydrate_all(models).await
    }

    /// Insert the event if it has no id, otherwise update its row, then read
    /// the row back into `event`
    pub async fn save(&self, event: &mut Event) -> Result<()> {
        let id = match event.id {
            Some(id) => {
                self.update(id, event).await?;
                id
            }
            None => {
                let id = self.insert(event).await?;
                event.id = Some(id);
                id
            }
        };

        if !self.resynchronize(event).await? {
            return Err(StoreError::StaleReference(id));
        }

        Ok(())
    }

    /// Soft-delete the event by clearing its active flag.
    ///
    /// Returns `false` without touching the store when the event was never
    /// saved, or when its row has disappeared.
    pub async fn delete(&self, event: &mut Event) -> Result<bool> {
        let Some(id) = event.id else {
            debug!("Skipping delete of an unpersisted event");
            return Ok(false);
        };

        events::Entity::update_many()
            .col_expr(events::Column::IsActive, Expr::value(0))
            .filter(events::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        info!("Event {} marked inactive", id);

        self.resynchronize(event).await
    }

    /// Re-read the event's row and associations, whatever its active flag.
    ///
    /// Returns `false` and leaves `event` untouched when it has no id or its
    /// row no longer exists.
    pub async fn resynchronize(&self, event: &mut Event) -> Result<bool> {
        let Some(id) = event.id else {
            return Ok(false);
        };

        let Some(model) = events::Entity::find_by_id(id).one(&self.db).await? else {
            warn!("Event {} is gone from the store, keeping stale fields", id);
            return Ok(false);
        };

        let (division, feed) = self.load_associations(Some(id), model.division_id).await?;

        event.apply_row(model);
        event.division = division;
        event.feed = feed;

        Ok(true)
    }

    async fn insert(&self, event: &Event) -> Result<i32> {
        let model = events::ActiveModel {
            id: NotSet,
            title: Set(event.title.clone()),
            description: Set(event.description.clone()),
            division_id: Set(event.division_id),
            image_url: Set(event.image_url.clone()),
            start_date: Set(event.start_date.clone()),
            end_date: Set(event.end_date.clone()),
            is_public: Set(event.is_public),
            // left to the column default when the caller gave none
            is_active: match event.is_active {
                Some(flag) => Set(Some(flag)),
                None => NotSet,
            },
            created_at: NotSet,
            updated_at: NotSet,
        };

        let result = events::Entity::insert(model).exec(&self.db).await?;

        info!("Event '{}' created with id {}", event.title, result.last_insert_id);
        Ok(result.last_insert_id)
    }

    async fn update(&self, id: i32, event: &Event) -> Result<()> {
        let result = events::Entity::update_many()
            .col_expr(events::Column::Title, Expr::value(event.title.clone()))
            .col_expr(
                events::Column::Description,
                Expr::value(event.description.clone()),
            )
            .col_expr(events::Column::DivisionId, Expr::value(event.division_id))
            .col_expr(events::Column::ImageUrl, Expr::value(event.image_url.clone()))
            .col_expr(events::Column::StartDate, Expr::value(event.start_date.clone()))
            .col_expr(events::Column::EndDate, Expr::value(event.end_date.clone()))
            .col_expr(events::Column::IsPublic, Expr::value(event.is_public))
            .col_expr(events::Column::IsActive, Expr::value(event.is_active))
            .col_expr(events::Column::UpdatedAt, Expr::cust(STORE_NOW))
            .filter(events::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        info!("Event {} updated ({} row(s))", id, result.rows_affected);
        Ok(())
    }

    async fn attach_associations(&self, event: &mut Event) -> Result<()> {
        let (division, feed) = self.load_associations(event.id, event.division_id).await?;
        event.division = division;
        event.feed = feed;
        Ok(())
    }

    async fn load_associations(
        &self,
        id: Option<i32>,
        division_id: Option<i32>,
    ) -> Result<(Option<DivisionInfo>, Option<Vec<FeedItem>>)> {
        let division = match division_id {
            Some(division_id) => self.divisions.find(division_id).await?,
            None => None,
        };

        let feed = match id {
            Some(id) => Some(self.feeds.find_all_by_event_id(id).await?),
            None => None,
        };

        Ok((division, feed))
    }

    async fn hydrate(&self, model: events::Model) -> Result<Event> {
        let mut event = Event::from(model);
        self.attach_associations(&mut event).await?;
        Ok(event)
    }

    async fn hydrate_all(&self, models: Vec<events::Model>) -> Result<Vec<Event>> {
        let mut events = Vec::with_capacity(models.len());
        for model in models {
            events.push(self.hydrate(model).await?);
        }
        Ok(events)
    }
}

/// Rows count as live unless their active flag is explicitly 0
fn live_condition() -> Condition {
    Condition::any()
        .add(events::Column::IsActive.is_null())
        .add(events::Column::IsActive.ne(0))
}

fn scoped(query: Select<events::Entity>, include_inactive: bool) -> Select<events::Entity> {
    if include_inactive {
        query
    } else {
        query.filter(live_condition())
    }
}
