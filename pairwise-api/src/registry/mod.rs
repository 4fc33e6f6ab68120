//! File registry: uploaded file records and their invariants
//!
//! The registry owns every `FileRecord` and is the single writer to the
//! backing store. Invariants enforced at insertion:
//! - at most one voter file
//! - external files carry a recognized subtype
//! - no duplicate (category, subtype, file name) triple
//!
//! Mutations persist before the in-memory set is updated, so a storage
//! failure leaves memory and disk consistent.

use pairwise_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

use crate::validate::ContentValidator;

pub mod store;

pub use store::JsonStore;

/// Upload category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Voter,
    External,
}

impl FileCategory {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "voter" => Ok(FileCategory::Voter),
            "external" => Ok(FileCategory::External),
            other => Err(Error::InvalidInput(format!(
                "Unknown file type: {}",
                other
            ))),
        }
    }
}

/// Recognized external comparison list types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExternalSubtype {
    #[serde(rename = "state-dept-corrections-felons-list")]
    FelonsList,
    #[serde(rename = "dept-of-vital-stats-deceased-list")]
    DeceasedList,
    #[serde(rename = "change-of-address-record")]
    ChangeOfAddress,
    #[serde(rename = "other-voter-file")]
    OtherVoterFile,
}

impl ExternalSubtype {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "state-dept-corrections-felons-list" => Some(ExternalSubtype::FelonsList),
            "dept-of-vital-stats-deceased-list" => Some(ExternalSubtype::DeceasedList),
            "change-of-address-record" => Some(ExternalSubtype::ChangeOfAddress),
            "other-voter-file" => Some(ExternalSubtype::OtherVoterFile),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExternalSubtype::FelonsList => "state-dept-corrections-felons-list",
            ExternalSubtype::DeceasedList => "dept-of-vital-stats-deceased-list",
            ExternalSubtype::ChangeOfAddress => "change-of-address-record",
            ExternalSubtype::OtherVoterFile => "other-voter-file",
        }
    }
}

/// A tracked uploaded file and its matching/download status
///
/// Serialized shape doubles as the persisted record and the wire record
/// (`fileType`, `externalFileType`, `fileName`, `matchStatus`,
/// `downloadStatus`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: Uuid,
    pub file_type: FileCategory,
    pub external_file_type: Option<ExternalSubtype>,
    pub file_name: String,
    pub match_status: bool,
    pub download_status: bool,
}

impl FileRecord {
    pub fn is_voter(&self) -> bool {
        self.file_type == FileCategory::Voter
    }
}

/// Durable store of uploaded file records
pub struct FileRegistry {
    store: JsonStore,
    records: Vec<FileRecord>,
}

impl FileRegistry {
    /// Open a registry backed by `path`, loading any existing records
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = JsonStore::new(path);
        let records = store.load()?;
        Ok(Self { store, records })
    }

    /// All records in insertion order
    pub fn list(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&FileRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Register an uploaded file after invariant and content checks.
    ///
    /// Voter records are created with matching and download already
    /// complete (they require no per-file step); external records start
    /// with both pending.
    pub fn add_file(
        &mut self,
        file_type: FileCategory,
        external_file_type: Option<&str>,
        file_name: &str,
        content: &[u8],
        validator: &dyn ContentValidator,
    ) -> Result<FileRecord> {
        let subtype = match file_type {
            FileCategory::Voter => {
                if self.records.iter().any(FileRecord::is_voter) {
                    return Err(Error::DuplicateVoterFile);
                }
                None
            }
            FileCategory::External => {
                let raw = external_file_type.ok_or_else(|| {
                    Error::InvalidInput("External file type is required".to_string())
                })?;
                let subtype = ExternalSubtype::parse(raw)
                    .ok_or_else(|| Error::UnrecognizedSubtype(raw.to_string()))?;
                Some(subtype)
            }
        };

        let duplicate = self.records.iter().any(|r| {
            r.file_type == file_type
                && r.external_file_type == subtype
                && r.file_name == file_name
        });
        if duplicate {
            return Err(Error::DuplicateFileEntry);
        }

        validator.validate(file_name, content)?;

        let record = FileRecord {
            id: Uuid::new_v4(),
            file_type,
            external_file_type: subtype,
            file_name: file_name.to_string(),
            match_status: file_type == FileCategory::Voter,
            download_status: file_type == FileCategory::Voter,
        };

        let mut next = self.records.clone();
        next.push(record.clone());
        self.store.save(&next)?;
        self.records = next;

        info!(id = %record.id, file_name, "file registered");
        Ok(record)
    }

    /// Set `matchStatus` for the given id. Marking an already matched
    /// file is a no-op success.
    pub fn mark_matched(&mut self, id: Uuid) -> Result<()> {
        self.set_flag(id, CompletionFlag::Match)
    }

    /// Symmetric to `mark_matched` for `downloadStatus`
    pub fn mark_downloaded(&mut self, id: Uuid) -> Result<()> {
        self.set_flag(id, CompletionFlag::Download)
    }

    /// Empty the registry and persist the empty set. Irreversible.
    pub fn clear_all(&mut self) -> Result<()> {
        if self.records.is_empty() {
            return Ok(());
        }
        self.store.save(&[])?;
        self.records.clear();
        info!("registry cleared");
        Ok(())
    }

    fn set_flag(&mut self, id: Uuid, flag: CompletionFlag) -> Result<()> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("no file with id {}", id)))?;

        let already_set = match flag {
            CompletionFlag::Match => self.records[index].match_status,
            CompletionFlag::Download => self.records[index].download_status,
        };
        if already_set {
            // Idempotent no-op
            return Ok(());
        }

        let mut next = self.records.clone();
        match flag {
            CompletionFlag::Match => next[index].match_status = true,
            CompletionFlag::Download => next[index].download_status = true,
        }
        self.store.save(&next)?;
        self.records = next;
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum CompletionFlag {
    Match,
    Download,
}
