//! Event record and the caller-supplied input it is built from

use serde::{Deserialize, Serialize};

use crate::division_store::DivisionInfo;
use crate::entities::events;
use crate::error::{Result, StoreError};
use crate::feed_store::FeedItem;

/// Field mapping supplied by the caller to create an event.
///
/// Only presence and shape are checked; content rules are up to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub division_id: Option<i32>,
    pub image_url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_public: Option<i32>,
    pub is_active: Option<i32>,
}

impl EventInput {
    /// Input with the two required fields and every optional field null
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Read an input from an untrusted JSON object
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| StoreError::Validation(e.to_string()))
    }
}

/// One row of the `events` table plus its attached division and feed.
///
/// `id` is `None` until the event is first saved. `division` and `feed` are
/// snapshots taken when the event was loaded or last resynchronized; they do
/// not follow later changes to the division or feed rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<i32>,
    pub title: String,
    pub description: String,
    pub division_id: Option<i32>,
    pub image_url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_public: Option<i32>,
    pub is_active: Option<i32>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub division: Option<DivisionInfo>,
    pub feed: Option<Vec<FeedItem>>,
}

impl From<EventInput> for Event {
    fn from(input: EventInput) -> Self {
        Self {
            id: None,
            title: input.title,
            description: input.description,
            division_id: input.division_id,
            image_url: input.image_url,
            start_date: input.start_date,
            end_date: input.end_date,
            is_public: input.is_public,
            is_active: input.is_active,
            created_at: None,
            updated_at: None,
            division: None,
            feed: None,
        }
    }
}

impl From<events::Model> for Event {
    fn from(model: events::Model) -> Self {
        let mut event = Event::from(EventInput::default());
        event.apply_row(model);
        event
    }
}

impl Event {
    /// Whether the event has been written to the store
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Whether the event is visible to filtered lookups
    pub fn is_live(&self) -> bool {
        self.is_active != Some(0)
    }

    /// Overwrite every column-backed field with the row's content
    pub(crate) fn apply_row(&mut self, model: events::Model) {
        self.id = Some(model.id);
        self.title = model.title;
        self.description = model.description;
        self.division_id = model.division_id;
        self.image_url = model.image_url;
        self.start_date = model.start_date;
        self.end_date = model.end_date;
        self.is_public = model.is_public;
        self.is_active = model.is_active;
        self.created_at = Some(model.created_at);
        self.updated_at = Some(model.updated_at);
    }
}
