//! Sled-based local storage: summarisation history and the todo list.
//!
//! The default tree holds one record per processed result; a separate
//! `todos` tree holds the todo items. Keys are big-endian sled-generated
//! ids so iteration order follows insertion order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    DbError(#[from] sled::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// A locally stored summarisation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResult {
    /// "text" or "url", matching the input source
    pub input_kind: String,
    /// The raw input (or the video URL for url inputs)
    pub original_content: String,
    /// The concatenated sectioned result
    pub processed_content: String,
    /// When the result was created
    pub created_at: DateTime<Utc>,
}

impl StoredResult {
    pub fn new(input_kind: &str, original_content: &str, processed_content: &str) -> Self {
        Self {
            input_kind: input_kind.to_string(),
            original_content: original_content.to_string(),
            processed_content: processed_content.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// One todo list entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Sled-based storage for results and todos.
pub struct Storage {
    db: sled::Db,
    todos: sled::Tree,
}

impl Storage {
    /// Open or create storage at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        let todos = db.open_tree("todos")?;
        Ok(Self { db, todos })
    }

    /// Append a result to the history
    pub fn record_result(&self, result: &StoredResult) -> Result<(), StorageError> {
        let id = self.db.generate_id()?;
        let value = serde_json::to_vec(result)?;
        self.db.insert(id.to_be_bytes(), value)?;
        self.db.flush()?;
        Ok(())
    }

    /// List all stored results, newest first
    pub fn list_results(&self) -> Result<Vec<StoredResult>, StorageError> {
        let mut results = Vec::new();
        for item in self.db.iter() {
            let (_key, value) = item?;
            let stored: StoredResult = serde_json::from_slice(&value)?;
            results.push(stored);
        }
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(results)
    }

    /// Add a todo item
    pub fn add_todo(&self, text: &str) -> Result<TodoItem, StorageError> {
        let item = TodoItem {
            id: self.db.generate_id()?,
            text: text.to_string(),
            completed: false,
            created_at: Utc::now(),
        };
        let value = serde_json::to_vec(&item)?;
        self.todos.insert(item.id.to_be_bytes(), value)?;
        self.db.flush()?;
        Ok(item)
    }

    /// List todo items in insertion order
    pub fn list_todos(&self) -> Result<Vec<TodoItem>, StorageError> {
        let mut items = Vec::new();
        for entry in self.todos.iter() {
            let (_key, value) = entry?;
            let item: TodoItem = serde_json::from_slice(&value)?;
            items.push(item);
        }
        Ok(items)
    }

    /// Flip a todo's completed flag, returning its new state, or `None` if
    /// no todo has that id
    pub fn toggle_todo(&self, id: u64) -> Result<Option<bool>, StorageError> {
        let key = id.to_be_bytes();
        let Some(value) = self.todos.get(key)? else {
            return Ok(None);
        };
        let mut item: TodoItem = serde_json::from_slice(&value)?;
        item.completed = !item.completed;
        self.todos.insert(key, serde_json::to_vec(&item)?)?;
        self.db.flush()?;
        Ok(Some(item.completed))
    }

    /// Remove a todo item; returns whether it existed
    pub fn remove_todo(&self, id: u64) -> Result<bool, StorageError> {
        let existed = self.todos.remove(id.to_be_bytes())?.is_some();
        self.db.flush()?;
        Ok(existed)
    }

    /// Number of stored results
    pub fn result_count(&self) -> usize {
        self.db.len()
    }
}
