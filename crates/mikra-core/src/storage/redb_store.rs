//! # redb-backed Verse Storage
//!
//! Stores transformed verses per edition in a redb embedded database:
//! - ACID transactions (a whole import commits or nothing does)
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//!
//! ## Tables
//!
//! - `verses`: `(edition, book, chapter, verse)` -> `VerseData` as JSON
//! - `strongs_index`: `(code, edition, book, chapter, verse, position)` -> `()`
//!
//! Tuple keys sort component-wise, so a chapter is one contiguous range
//! of `verses` and every occurrence of a code is one contiguous range of
//! `strongs_index`.

use crate::primitives::MAX_OCCURRENCE_RESULTS;
use crate::strongs::StrongsNumber;
use crate::types::{MikraError, VerseData, VerseRef, validate_edition};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Table for verses: (edition, book, chapter, verse) -> JSON bytes
const VERSES: TableDefinition<(&str, &str, u32, u32), &[u8]> = TableDefinition::new("verses");

/// Table for the Strong's index: (code, edition, book, chapter, verse, position) -> ()
const STRONGS_INDEX: TableDefinition<(&str, &str, &str, u32, u32, u32), ()> =
    TableDefinition::new("strongs_index");

/// One occurrence of a Strong's code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub edition: String,
    pub reference: VerseRef,
    /// 1-based word position inside the verse.
    pub position: u32,
}

/// Row counts of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub verses: u64,
    pub index_rows: u64,
}

/// A disk-backed verse store using redb.
pub struct VerseStore {
    db: Database,
}

impl std::fmt::Debug for VerseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerseStore").finish_non_exhaustive()
    }
}

fn io_error(e: impl std::fmt::Display) -> MikraError {
    MikraError::IoError(e.to_string())
}

impl VerseStore {
    /// Open or create a verse database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MikraError> {
        let db = Database::create(path.as_ref()).map_err(io_error)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(io_error)?;
            let _ = write_txn.open_table(VERSES).map_err(io_error)?;
            let _ = write_txn.open_table(STRONGS_INDEX).map_err(io_error)?;
            write_txn.commit().map_err(io_error)?;
        }

        Ok(Self { db })
    }

    /// Store verses of one edition in a single write transaction.
    ///
    /// A verse already present is replaced together with its index rows.
    /// Returns the number of verses written.
    pub fn put_verses(
        &self,
        edition: &str,
        verses: &[(VerseRef, VerseData)],
    ) -> Result<usize, MikraError> {
        validate_edition(edition)?;

        // Encode everything before the transaction opens.
        let encoded = verses
            .iter()
            .map(|(reference, data)| {
                serde_json::to_vec(data).map_err(|e| {
                    MikraError::SerializationError(format!("{reference} ({edition}): {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let write_txn = self.db.begin_write().map_err(io_error)?;
        {
            let mut verse_table = write_txn.open_table(VERSES).map_err(io_error)?;
            let mut index_table = write_txn.open_table(STRONGS_INDEX).map_err(io_error)?;

            for ((reference, data), bytes) in verses.iter().zip(&encoded) {
                let book = reference.book.as_str();
                let (chapter, verse) = (reference.chapter, reference.verse);

                let previous = verse_table
                    .insert((edition, book, chapter, verse), bytes.as_slice())
                    .map_err(io_error)?
                    .map(|old| old.value().to_vec());

                if let Some(previous) = previous {
                    match serde_json::from_slice::<VerseData>(&previous) {
                        Ok(old) => {
                            for (code, position) in index_rows(&old) {
                                index_table
                                    .remove((code.as_str(), edition, book, chapter, verse, position))
                                    .map_err(io_error)?;
                            }
                        }
                        // Undecodable old value: sweep the index for this verse.
                        Err(_) => {
                            index_table
                                .retain(|(_, e, b, c, v, _), ()| {
                                    !(e == edition && b == book && c == chapter && v == verse)
                                })
                                .map_err(io_error)?;
                        }
                    }
                }

                for (code, position) in index_rows(data) {
                    index_table
                        .insert((code.as_str(), edition, book, chapter, verse, position), ())
                        .map_err(io_error)?;
                }
            }
        }
        write_txn.commit().map_err(io_error)?;

        Ok(verses.len())
    }

    /// Fetch one verse.
    ///
    /// # Errors
    ///
    /// `VerseNotFound` when absent, `DeserializationError` when the stored
    /// value cannot be decoded.
    pub fn get_verse(&self, edition: &str, reference: &VerseRef) -> Result<VerseData, MikraError> {
        let read_txn = self.db.begin_read().map_err(io_error)?;
        let table = read_txn.open_table(VERSES).map_err(io_error)?;

        let value = table
            .get((
                edition,
                reference.book.as_str(),
                reference.chapter,
                reference.verse,
            ))
            .map_err(io_error)?
            .ok_or_else(|| MikraError::VerseNotFound {
                edition: edition.to_string(),
                book: reference.book.clone(),
                chapter: reference.chapter,
                verse: reference.verse,
            })?;

        decode(edition, reference, value.value())
    }

    /// Fetch every stored verse of a chapter, in verse order.
    pub fn get_chapter(
        &self,
        edition: &str,
        book: &str,
        chapter: u32,
    ) -> Result<Vec<(VerseRef, VerseData)>, MikraError> {
        let read_txn = self.db.begin_read().map_err(io_error)?;
        let table = read_txn.open_table(VERSES).map_err(io_error)?;

        let mut verses = Vec::new();
        let range = (edition, book, chapter, 0u32)..=(edition, book, chapter, u32::MAX);
        for entry in table.range(range).map_err(io_error)? {
            let (key, value) = entry.map_err(io_error)?;
            let (_, _, _, verse) = key.value();
            let reference = VerseRef::new(book, chapter, verse);
            let data = decode(edition, &reference, value.value())?;
            verses.push((reference, data));
        }

        if verses.is_empty() {
            return Err(MikraError::ChapterNotFound {
                edition: edition.to_string(),
                book: book.to_string(),
                chapter,
            });
        }
        Ok(verses)
    }

    /// Occurrences of a Strong's code across all editions, in index order.
    ///
    /// At most `limit` results, never more than `MAX_OCCURRENCE_RESULTS`.
    pub fn find_strongs(
        &self,
        code: &StrongsNumber,
        limit: usize,
    ) -> Result<Vec<Occurrence>, MikraError> {
        let code = code.to_string();
        let limit = limit.min(MAX_OCCURRENCE_RESULTS);

        let read_txn = self.db.begin_read().map_err(io_error)?;
        let table = read_txn.open_table(STRONGS_INDEX).map_err(io_error)?;

        let mut occurrences = Vec::new();
        let start = (code.as_str(), "", "", 0u32, 0u32, 0u32);
        for entry in table.range(start..).map_err(io_error)? {
            if occurrences.len() >= limit {
                break;
            }
            let (key, _) = entry.map_err(io_error)?;
            let (row_code, edition, book, chapter, verse, position) = key.value();
            if row_code != code {
                break;
            }
            occurrences.push(Occurrence {
                edition: edition.to_string(),
                reference: VerseRef::new(book, chapter, verse),
                position,
            });
        }

        Ok(occurrences)
    }

    /// Row counts.
    pub fn stats(&self) -> Result<StoreStats, MikraError> {
        let read_txn = self.db.begin_read().map_err(io_error)?;
        let verses = read_txn
            .open_table(VERSES)
            .map_err(io_error)?
            .len()
            .map_err(io_error)?;
        let index_rows = read_txn
            .open_table(STRONGS_INDEX)
            .map_err(io_error)?
            .len()
            .map_err(io_error)?;
        Ok(StoreStats { verses, index_rows })
    }

    /// Distinct edition names, sorted.
    ///
    /// Jumps from one edition to the next instead of scanning every verse.
    pub fn editions(&self) -> Result<Vec<String>, MikraError> {
        let read_txn = self.db.begin_read().map_err(io_error)?;
        let table = read_txn.open_table(VERSES).map_err(io_error)?;

        let mut editions = BTreeSet::new();
        let mut floor = String::new();
        loop {
            let next = {
                let mut range = table
                    .range((floor.as_str(), "", 0u32, 0u32)..)
                    .map_err(io_error)?;
                match range.next() {
                    Some(entry) => {
                        let (key, _) = entry.map_err(io_error)?;
                        Some(key.value().0.to_string())
                    }
                    None => None,
                }
            };
            let Some(edition) = next else { break };
            // Smallest string sorting after every key of this edition.
            floor = format!("{edition}\u{0}");
            editions.insert(edition);
        }

        Ok(editions.into_iter().collect())
    }
}

/// Index rows of a verse: every (code, position) pair.
fn index_rows(verse: &VerseData) -> Vec<(String, u32)> {
    verse
        .words
        .iter()
        .flat_map(|word| {
            word.strongs
                .iter()
                .flatten()
                .map(move |code| (code.to_string(), word.position))
        })
        .collect()
}

fn decode(edition: &str, reference: &VerseRef, bytes: &[u8]) -> Result<VerseData, MikraError> {
    serde_json::from_slice(bytes)
        .map_err(|e| MikraError::DeserializationError(format!("{reference} ({edition}): {e}")))
}

// =============================================================================
// TESTS
// =============================================================================
