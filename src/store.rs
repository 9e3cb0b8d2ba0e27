//! Company store
//!
//! In-memory map of company name to profile, mirrored to a single
//! pretty-printed JSON file. The whole snapshot is read at startup and
//! rewritten after every mutation. Insertion order is preserved, both in
//! memory and on disk.

use crate::error::ChatError;
use crate::models::CompanyProfile;
use crate::Result;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// What happened when the snapshot was read at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded(usize),
    Missing,
    Failed(String),
}

#[derive(Debug)]
pub struct CompanyStore {
    path: PathBuf,
    companies: IndexMap<String, CompanyProfile>,
}

impl CompanyStore {
    /// Empty store backed by `path`; nothing is read
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            companies: IndexMap::new(),
        }
    }

    /// Read the snapshot. Never fails: unreadable or malformed files are
    /// logged and yield an empty store.
    pub fn load(path: impl Into<PathBuf>) -> (Self, LoadStatus) {
        let mut store = Self::empty(path);

        if !store.path.exists() {
            info!(path = %store.path.display(), "No data file found, starting empty");
            return (store, LoadStatus::Missing);
        }

        match read_snapshot(&store.path) {
            Ok(companies) => {
                info!(path = %store.path.display(), count = companies.len(), "Loaded companies");
                let count = companies.len();
                store.companies = companies;
                (store, LoadStatus::Loaded(count))
            }
            Err(e) => {
                error!(path = %store.path.display(), "Failed to load data file: {}", e);
                (store, LoadStatus::Failed(e.to_string()))
            }
        }
    }

    /// Rewrite the whole snapshot
    pub fn save(&self) -> Result<()> {
        let json = to_pretty_json(&self.companies)?;

        fs::write(&self.path, json).map_err(|e| {
            error!(path = %self.path.display(), "Failed to save data file: {}", e);
            ChatError::StoreError(format!("cannot write {}: {}", self.path.display(), e))
        })?;

        info!(path = %self.path.display(), count = self.companies.len(), "Saved companies");
        Ok(())
    }

    /// Insert or overwrite by name, then persist.
    ///
    /// The in-memory map is updated even when the save fails.
    pub fn upsert(&mut self, profile: CompanyProfile) -> Result<()> {
        self.companies.insert(profile.name.clone(), profile);
        self.save()
    }

    pub fn get(&self, name: &str) -> Option<&CompanyProfile> {
        self.companies.get(name)
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    /// Profiles in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &CompanyProfile> {
        self.companies.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.companies.keys().map(String::as_str)
    }

    /// Case-insensitive substring match on name or sector
    pub fn search(&self, term: &str) -> Vec<&CompanyProfile> {
        let term = term.to_lowercase();
        self.iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&term) || p.sector.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Names containing `query`, case-insensitively
    pub fn suggestions(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.names()
            .filter(|name| name.to_lowercase().contains(&query))
            .collect()
    }

    /// Highest score; ties go to the earliest registered
    pub fn best(&self) -> Option<&CompanyProfile> {
        self.iter().fold(None, |best: Option<&CompanyProfile>, p| match best {
            Some(b) if b.analysis.score >= p.analysis.score => Some(b),
            _ => Some(p),
        })
    }

    /// Lowest score; ties go to the earliest registered
    pub fn worst(&self) -> Option<&CompanyProfile> {
        self.iter().fold(None, |worst: Option<&CompanyProfile>, p| match worst {
            Some(w) if w.analysis.score <= p.analysis.score => Some(w),
            _ => Some(p),
        })
    }

    /// Company count per sector, in first-seen order
    pub fn sector_counts(&self) -> IndexMap<&str, usize> {
        let mut counts = IndexMap::new();
        for profile in self.iter() {
            *counts.entry(profile.sector.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

/// Fail early when the snapshot location can never be written
pub fn check_location(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let metadata = fs::metadata(parent).map_err(|e| {
        ChatError::StoreError(format!("data directory {} is not accessible: {}", parent.display(), e))
    })?;

    if !metadata.is_dir() {
        return Err(ChatError::StoreError(format!(
            "{} is not a directory",
            parent.display()
        )));
    }

    if metadata.permissions().readonly() {
        warn!(path = %parent.display(), "Data directory is read-only");
        return Err(ChatError::StoreError(format!(
            "data directory {} is read-only",
            parent.display()
        )));
    }

    Ok(())
}

fn read_snapshot(path: &Path) -> Result<IndexMap<String, CompanyProfile>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Four-space indented JSON, UTF-8 kept as-is
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}
