//! Per-exchange side channel for binary attachments.
//!
//! The model transport is a text/JSON channel, so raw attachment bytes never
//! travel through it; the model only sees an id string. The dispatcher
//! resolves that id against this store before invoking a handler. The store
//! is exchange-local: it is created when a message arrives and dropped when
//! the exchange completes, so concurrent exchanges never share bytes.

use std::collections::HashMap;

/// Exchange-scoped mapping from attachment id to opaque bytes.
#[derive(Debug, Default)]
pub struct AttachmentStore {
    entries: HashMap<String, Vec<u8>>,
}

impl AttachmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(id.into(), bytes);
    }

    pub fn get(&self, id: &str) -> Option<&[u8]> {
        self.entries.get(id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut store = AttachmentStore::new();
        store.insert("42", vec![1, 2, 3]);
        assert_eq!(store.get("42"), Some([1, 2, 3].as_slice()));
        assert!(store.get("43").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_stores_are_isolated() {
        let mut store_a = AttachmentStore::new();
        let mut store_b = AttachmentStore::new();
        store_a.insert("42", b"exchange-a".to_vec());
        store_b.insert("42", b"exchange-b".to_vec());

        assert_eq!(store_a.get("42"), Some(b"exchange-a".as_slice()));
        assert_eq!(store_b.get("42"), Some(b"exchange-b".as_slice()));
    }
}
