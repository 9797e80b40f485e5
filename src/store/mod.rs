//! # In-Memory Store
//!
//! Keyed tables for topics, subscriptions and messages.
//!
//! All tables live behind one coarse [`RwLock`], so a compound operation such
//! as [`MemoryStore::find_or_create`] runs inside a single critical section and
//! two concurrent CreateTopic calls for the same name can never mint two
//! records. Reads hand out clones; no lock is ever held across an `.await`.

use crate::models::{Message, Subscription, Topic};
use parking_lot::RwLock;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Backing storage for every table
#[derive(Debug, Default)]
pub struct Tables {
    topics: Vec<Topic>,
    subscriptions: Vec<Subscription>,
    messages: Vec<Message>,
}

/// A row type that lives in one of the store's tables
pub trait Record: Clone + Send + Sync + 'static {
    /// Table name used in log output
    const TABLE: &'static str;

    fn key(&self) -> Cow<'_, str>;

    fn rows(tables: &Tables) -> &Vec<Self>;

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self>;
}

impl Record for Topic {
    const TABLE: &'static str = "topics";

    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.arn)
    }

    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.topics
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.topics
    }
}

impl Record for Subscription {
    const TABLE: &'static str = "subscriptions";

    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.arn)
    }

    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.subscriptions
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.subscriptions
    }
}

impl Record for Message {
    const TABLE: &'static str = "messages";

    fn key(&self) -> Cow<'_, str> {
        Cow::Owned(self.id.to_string())
    }

    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.messages
    }

    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.messages
    }
}

/// Shared handle to the emulator's tables. Cloning shares the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record and return it
    pub fn create<R: Record>(&self, record: R) -> R {
        let mut tables = self.tables.write();
        debug!(table = R::TABLE, key = %record.key(), "Creating record");
        R::rows_mut(&mut tables).push(record.clone());
        record
    }

    /// First record matching `predicate`, in insertion order
    pub fn find<R: Record>(&self, predicate: impl Fn(&R) -> bool) -> Option<R> {
        let tables = self.tables.read();
        R::rows(&tables).iter().find(|row| predicate(*row)).cloned()
    }

    /// Record stored under `key`
    pub fn fetch<R: Record>(&self, key: &str) -> Option<R> {
        self.find(|row: &R| row.key() == key)
    }

    /// Record stored under `key`, or whatever `fallback` decides when it is
    /// missing. The fallback may reject the lookup with an error.
    pub fn fetch_or_else<R, E, F>(&self, key: &str, fallback: F) -> Result<Option<R>, E>
    where
        R: Record,
        F: FnOnce() -> Result<Option<R>, E>,
    {
        match self.fetch(key) {
            Some(record) => Ok(Some(record)),
            None => fallback(),
        }
    }

    /// Return the first record matching `predicate`, creating one with `build`
    /// when there is none. The boolean is `true` when a record was created.
    ///
    /// Lookup and insert happen under one write lock.
    pub fn find_or_create<R, P, B, E>(&self, predicate: P, build: B) -> Result<(R, bool), E>
    where
        R: Record,
        P: Fn(&R) -> bool,
        B: FnOnce() -> Result<R, E>,
    {
        let mut tables = self.tables.write();
        let rows = R::rows_mut(&mut tables);

        if let Some(existing) = rows.iter().find(|row| predicate(*row)) {
            return Ok((existing.clone(), false));
        }

        let record = build()?;
        debug!(table = R::TABLE, key = %record.key(), "Creating record");
        rows.push(record.clone());
        Ok((record, true))
    }

    /// Apply `update` to the record under `key` and return the new version
    pub fn update<R: Record>(&self, key: &str, update: impl FnOnce(&mut R)) -> Option<R> {
        let mut tables = self.tables.write();
        let row = R::rows_mut(&mut tables)
            .iter_mut()
            .find(|row| row.key() == key)?;
        update(row);
        Some(row.clone())
    }

    /// Remove and return the record under `key`
    pub fn delete<R: Record>(&self, key: &str) -> Option<R> {
        let mut tables = self.tables.write();
        let rows = R::rows_mut(&mut tables);
        let index = rows.iter().position(|row| row.key() == key)?;
        debug!(table = R::TABLE, key = %key, "Deleting record");
        Some(rows.remove(index))
    }

    /// Every record in a table, in insertion order
    pub fn all<R: Record>(&self) -> Vec<R> {
        R::rows(&self.tables.read()).clone()
    }

    /// Records matching `predicate`, in insertion order
    pub fn filter<R: Record>(&self, predicate: impl Fn(&R) -> bool) -> Vec<R> {
        let tables = self.tables.read();
        R::rows(&tables)
            .iter()
            .filter(|row| predicate(*row))
            .cloned()
            .collect()
    }

    pub fn count<R: Record>(&self) -> usize {
        R::rows(&self.tables.read()).len()
    }

    /// Every (subscription, message) pair eligible for delivery: the
    /// subscription's topic is the topic the message was published to.
    ///
    /// Target-only messages carry no topic and never appear here.
    pub fn each_deliverable(&self) -> Vec<(Subscription, Message)> {
        let tables = self.tables.read();
        tables
            .subscriptions
            .iter()
            .flat_map(|subscription| {
                tables
                    .messages
                    .iter()
                    .filter(move |message| {
                        message.topic_arn.as_deref() == Some(subscription.topic_arn.as_str())
                    })
                    .map(move |message| (subscription.clone(), message.clone()))
            })
            .collect()
    }

    /// Pairs of the message with id `message_id` and each subscription of its
    /// topic. Filtering happens under the read lock, so only the one message
    /// is cloned.
    pub fn deliverable_for(&self, message_id: Uuid) -> Vec<(Subscription, Message)> {
        let tables = self.tables.read();
        let Some(message) = tables.messages.iter().rev().find(|m| m.id == message_id) else {
            return Vec::new();
        };
        let Some(topic_arn) = message.topic_arn.as_deref() else {
            return Vec::new();
        };

        tables
            .subscriptions
            .iter()
            .filter(|subscription| subscription.topic_arn == topic_arn)
            .map(|subscription| (subscription.clone(), message.clone()))
            .collect()
    }

    /// Drop every record from every table
    pub fn reset(&self) {
        let mut tables = self.tables.write();
        *tables = Tables::default();
        debug!("Store reset");
    }
}
