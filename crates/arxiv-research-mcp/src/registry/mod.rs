//! Topic-indexed paper registry.
//!
//! Durable state is one catalog document per topic under an injected storage
//! root (`<root>/<topic slug>/papers_info.json`). The registry keeps two
//! pieces of derived, in-memory state:
//!
//! - the topic list in creation order, and
//! - a secondary index `paper_id → topic` pointing at the catalog that most
//!   recently received each paper.
//!
//! Both are rebuilt from disk on [`Registry::open`] and re-synced whenever
//! topics are enumerated, so the catalogs stay the sole source of truth.

mod catalog;

pub use catalog::TopicCatalog;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::SystemTime;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::config::storage::CATALOG_FILE;
use crate::error::{RegistryError, RegistryResult};
use crate::models::{PaperRecord, Topic};

/// Paper counts per topic, in topic creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaperCounts(Vec<(String, usize)>);

impl PaperCounts {
    /// Count for a topic display name.
    #[must_use]
    pub fn get(&self, topic: &str) -> Option<usize> {
        self.0.iter().find(|(t, _)| t == topic).map(|(_, n)| *n)
    }

    /// Number of topics counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no topic was counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Papers across all counted topics.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, n)| n).sum()
    }

    /// `(topic, count)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(t, n)| (t.as_str(), *n))
    }
}

impl FromIterator<(String, usize)> for PaperCounts {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for PaperCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (topic, count) in &self.0 {
            map.serialize_entry(topic, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    /// Topics whose catalog exists, in creation order.
    topics: Vec<Topic>,
    /// `paper_id → topic` of the latest write.
    index: HashMap<String, Topic>,
}

/// A catalog found while enumerating the storage root.
struct DiskTopic {
    topic: Topic,
    created: SystemTime,
    modified: SystemTime,
}

/// The set of topic catalogs plus cross-topic lookup.
pub struct Registry {
    root: PathBuf,
    state: RwLock<RegistryState>,
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Registry {
    /// Open (creating if needed) the registry stored under `root`.
    ///
    /// Existing catalogs are enumerated in directory creation order and the
    /// paper index is rebuilt from them. Corrupt catalogs are logged and
    /// still listed as topics.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Storage`] if the root cannot be created or read.
    pub fn open(root: impl Into<PathBuf>) -> RegistryResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| RegistryError::storage(&root, e))?;

        let registry = Self {
            root,
            state: RwLock::new(RegistryState::default()),
            write_locks: Mutex::new(HashMap::new()),
        };

        let disk = registry.scan()?;
        let mut index = HashMap::new();

        // Oldest-modified first, so the newest copy of a shared id wins.
        let mut by_modified: Vec<&DiskTopic> = disk.iter().collect();
        by_modified.sort_by_key(|d| d.modified);
        for d in by_modified {
            if let Some(catalog) = registry.read_logged(&d.topic) {
                for id in catalog.paper_ids() {
                    index.insert(id.to_string(), d.topic.clone());
                }
            }
        }

        tracing::info!(
            root = %registry.root.display(),
            topics = disk.len(),
            papers = index.len(),
            "Paper registry opened"
        );

        {
            let mut state = registry.state_mut();
            state.topics = disk.into_iter().map(|d| d.topic).collect();
            state.index = index;
        }

        Ok(registry)
    }

    /// Storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Insert or overwrite `records` in `topic`'s catalog, creating it if absent.
    ///
    /// The whole batch lands in one atomic replace of the catalog file. An
    /// empty batch still creates an (empty) catalog, recording that the
    /// topic was searched.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Storage`] on I/O failure, or
    /// [`RegistryError::CorruptCatalog`] if the existing catalog cannot be
    /// read; the file on disk is left untouched in both cases.
    pub fn upsert(&self, topic: &Topic, records: &[PaperRecord]) -> RegistryResult<()> {
        let lock = self.write_lock(topic);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let dir = self.root.join(topic.slug());
        fs::create_dir_all(&dir).map_err(|e| RegistryError::storage(&dir, e))?;

        let path = dir.join(CATALOG_FILE);
        let existing = catalog::read(&path, topic)?;
        let created = existing.is_none();

        let mut catalog = existing.unwrap_or_default();
        let added = records.iter().filter(|r| catalog.upsert((*r).clone())).count();

        {
            // Held across the replace so index updates land in the same
            // order as catalog writes, even for different topics.
            let mut state = self.state_mut();
            catalog::write_atomic(&path, &catalog)?;

            if !state.topics.contains(topic) {
                state.topics.push(topic.clone());
            }
            for record in records {
                state.index.insert(record.paper_id.clone(), topic.clone());
            }
        }

        tracing::info!(
            topic = %topic,
            created,
            added,
            updated = records.len() - added,
            total = catalog.len(),
            path = %path.display(),
            "Catalog saved"
        );

        Ok(())
    }

    /// Find a paper in any topic.
    ///
    /// Served from the paper index; the indexed catalog is re-read from disk
    /// so the answer reflects the persisted state. Falls back to scanning
    /// every catalog only when the indexed one no longer holds the id.
    /// Unknown or malformed ids return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Storage`] if the storage root cannot be listed.
    pub fn lookup(&self, paper_id: &str) -> RegistryResult<Option<PaperRecord>> {
        if paper_id.is_empty() {
            return Ok(None);
        }

        let mut indexed = self.state().index.get(paper_id).cloned();
        if indexed.is_none() {
            // Catalogs written by another process since the last sync.
            self.refresh()?;
            indexed = self.state().index.get(paper_id).cloned();
        }

        let Some(topic) = indexed else {
            return Ok(None);
        };

        if let Some(paper) = self.read_logged(&topic).and_then(|c| c.get(paper_id).cloned()) {
            return Ok(Some(paper));
        }

        tracing::debug!(paper_id, topic = %topic, "Stale index entry, scanning catalogs");

        for candidate in self.refresh()? {
            if candidate == topic {
                continue;
            }
            if let Some(paper) = self.read_logged(&candidate).and_then(|c| c.get(paper_id).cloned())
            {
                self.state_mut().index.insert(paper_id.to_string(), candidate);
                return Ok(Some(paper));
            }
        }

        self.state_mut().index.remove(paper_id);
        Ok(None)
    }

    /// Topics whose catalog exists, in creation order.
    ///
    /// Never fails: if the storage root cannot be listed, the last known
    /// topic list is returned and the error is logged.
    #[must_use]
    pub fn list_topics(&self) -> Vec<String> {
        self.topics().iter().map(Topic::display_name).collect()
    }

    /// Like [`Registry::list_topics`], returning the topics themselves.
    #[must_use]
    pub fn topics(&self) -> Vec<Topic> {
        self.refresh().unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to list storage root, using cached topics");
            self.state().topics.clone()
        })
    }

    /// Paper counts for one topic, or for every known topic.
    ///
    /// A topic without a catalog counts 0. When counting every topic,
    /// corrupt catalogs are logged and left out so the rest stay servable.
    ///
    /// # Errors
    ///
    /// [`RegistryError::CorruptCatalog`] for a corrupt single topic,
    /// [`RegistryError::Storage`] on I/O failure.
    pub fn count(&self, topic: Option<&Topic>) -> RegistryResult<PaperCounts> {
        if let Some(topic) = topic {
            let n = self.catalog(topic)?.map_or(0, |c| c.len());
            return Ok(PaperCounts(vec![(topic.display_name(), n)]));
        }

        let mut counts = Vec::new();
        for topic in self.refresh()? {
            match self.catalog(&topic) {
                Ok(Some(c)) => counts.push((topic.display_name(), c.len())),
                Ok(None) => {}
                Err(e @ RegistryError::CorruptCatalog { .. }) => {
                    tracing::warn!(topic = %topic, error = %e, "Skipping corrupt catalog");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(PaperCounts(counts))
    }

    /// Read one topic's catalog; `Ok(None)` if it was never created.
    ///
    /// # Errors
    ///
    /// [`RegistryError::CorruptCatalog`] or [`RegistryError::Storage`].
    pub fn catalog(&self, topic: &Topic) -> RegistryResult<Option<TopicCatalog>> {
        catalog::read(&self.catalog_path(topic), topic)
    }

    fn catalog_path(&self, topic: &Topic) -> PathBuf {
        self.root.join(topic.slug()).join(CATALOG_FILE)
    }

    /// Read a catalog for indexing or scanning, logging instead of failing.
    fn read_logged(&self, topic: &Topic) -> Option<TopicCatalog> {
        match self.catalog(topic) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(topic = %topic, error = %e, "Catalog unreadable");
                None
            }
        }
    }

    /// Enumerate catalogs under the root, ordered by directory creation time.
    fn scan(&self) -> RegistryResult<Vec<DiskTopic>> {
        let entries = fs::read_dir(&self.root).map_err(|e| RegistryError::storage(&self.root, e))?;

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RegistryError::storage(&self.root, e))?;
            let Ok(dir_meta) = entry.metadata() else { continue };
            if !dir_meta.is_dir() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 topic directory");
                continue;
            };
            let Ok(topic) = Topic::from_slug(name) else { continue };

            let Ok(file_meta) = fs::metadata(entry.path().join(CATALOG_FILE)) else {
                continue;
            };

            let modified = file_meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            let created = dir_meta.created().or_else(|_| dir_meta.modified()).unwrap_or(modified);
            found.push(DiskTopic { topic, created, modified });
        }

        found.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.topic.cmp(&b.topic)));
        Ok(found)
    }

    /// Re-sync the topic list and paper index with the storage root.
    ///
    /// Topics whose catalog disappeared are dropped; catalogs created by
    /// other processes are appended and their papers indexed without
    /// displacing existing entries.
    fn refresh(&self) -> RegistryResult<Vec<Topic>> {
        let disk = self.scan()?;

        let known: HashSet<Topic> = self.state().topics.iter().cloned().collect();
        let discovered: Vec<Topic> =
            disk.into_iter().map(|d| d.topic).filter(|t| !known.contains(t)).collect();

        let mut new_entries = Vec::new();
        for topic in &discovered {
            if let Some(catalog) = self.read_logged(topic) {
                new_entries.extend(catalog.paper_ids().map(|id| (id.to_string(), topic.clone())));
            }
        }

        let mut state = self.state_mut();

        let before = state.topics.len();
        state.topics.retain(|t| self.catalog_path(t).is_file());
        if state.topics.len() != before {
            let live: HashSet<Topic> = state.topics.iter().cloned().collect();
            state.index.retain(|_, t| live.contains(t));
        }

        for topic in discovered {
            if !state.topics.contains(&topic) {
                tracing::debug!(topic = %topic, "Discovered catalog on disk");
                state.topics.push(topic);
            }
        }
        for (id, topic) in new_entries {
            state.index.entry(id).or_insert(topic);
        }

        Ok(state.topics.clone())
    }

    fn write_lock(&self, topic: &Topic) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(topic.slug().to_string()).or_default())
    }

    fn state(&self) -> std::sync::RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> std::sync::RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("Registry")
            .field("root", &self.root)
            .field("topics", &state.topics.len())
            .field("papers", &state.index.len())
            .finish()
    }
}
