//! # Importer Module
//!
//! Drives whole OSIS documents through the verse transform.
//!
//! - Read every verse of the document
//! - Transform each verse with fresh walk state
//! - Optionally write the result into a `VerseStore` in one transaction

use crate::formats::read_verses;
use crate::storage::VerseStore;
use crate::transform::{TransformOptions, transform_verse};
use crate::types::{MikraError, Variant, VerseData, VerseRef, validate_edition};
use serde::{Deserialize, Serialize};

/// One transformed verse of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedVerse {
    pub reference: VerseRef,
    pub verse: VerseData,
}

/// Counts over an imported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportReport {
    pub verses: usize,
    pub words: usize,
    pub ketiv: usize,
    pub qere: usize,
    pub prefix_only: usize,
}

impl ImportReport {
    /// Tally a set of imported verses.
    #[must_use]
    pub fn from_verses(verses: &[ImportedVerse]) -> Self {
        let mut report = Self {
            verses: verses.len(),
            ..Self::default()
        };
        for word in verses.iter().flat_map(|v| &v.verse.words) {
            report.words += 1;
            match word.variant {
                Some(Variant::Ketiv) => report.ketiv += 1,
                Some(Variant::Qere) => report.qere += 1,
                None => {}
            }
            if word.metadata.is_prefix_only {
                report.prefix_only += 1;
            }
        }
        report
    }
}

/// Document-level driver for the verse transform.
pub struct Importer;

impl Importer {
    /// Transform every verse of an OSIS document, in document order.
    ///
    /// Fails only when the document itself cannot be parsed.
    pub fn import_document(
        bytes: &[u8],
        options: &TransformOptions,
    ) -> Result<Vec<ImportedVerse>, MikraError> {
        let verses = read_verses(bytes)?
            .into_iter()
            .map(|osis| ImportedVerse {
                verse: transform_verse(&osis.element, options),
                reference: osis.reference,
            })
            .collect();
        Ok(verses)
    }

    /// Transform a document and store it under `edition`.
    ///
    /// The edition is validated before any parsing; the store write is
    /// a single transaction.
    pub fn import_into(
        store: &VerseStore,
        edition: &str,
        bytes: &[u8],
        options: &TransformOptions,
    ) -> Result<ImportReport, MikraError> {
        validate_edition(edition)?;

        let imported = Self::import_document(bytes, options)?;
        let report = ImportReport::from_verses(&imported);

        let rows: Vec<(VerseRef, VerseData)> = imported
            .into_iter()
            .map(|v| (v.reference, v.verse))
            .collect();
        store.put_verses(edition, &rows)?;

        Ok(report)
    }
}

// =============================================================================
// TESTS
// =============================================================================
