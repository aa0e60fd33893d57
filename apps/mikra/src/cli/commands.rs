//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use mikra::api::{self, AppState};
use mikra_core::{
    Importer, MikraError, StrongsNumber, TransformOptions, VerseData, VerseRef, VerseStore,
    extract_strongs, is_prefix_only, validate_edition, word_gematria,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE LIMITS AND VALIDATION
// =============================================================================

/// Maximum OSIS file size for import (100 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_IMPORT_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), MikraError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| MikraError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(MikraError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path to an existing regular file.
///
/// Canonicalization resolves `..` and symlinks before anything is read.
fn validate_file_path(path: &Path) -> Result<PathBuf, MikraError> {
    let canonical = path.canonicalize().map_err(|e| {
        MikraError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(MikraError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Open a database that must already exist.
fn open_existing_store(db_path: &Path) -> Result<VerseStore, MikraError> {
    if !db_path.exists() {
        return Err(MikraError::IoError(format!(
            "No database at {:?}. Run `mikra init` or `mikra import` first.",
            db_path
        )));
    }
    VerseStore::open(db_path)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), MikraError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| MikraError::SerializationError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

/// One line per word: position, text, codes, lemma, morph, tag.
fn print_words(verse: &VerseData) {
    for word in &verse.words {
        let codes = word
            .strongs
            .iter()
            .flatten()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let mut tags = Vec::new();
        if let Some(variant) = word.variant {
            tags.push(format!("{:?}", variant).to_lowercase());
        }
        if word.metadata.is_prefix_only {
            tags.push("prefix".to_string());
        }
        if let Some(value) = word.metadata.gematria {
            tags.push(format!("={}", value.standard));
        }
        println!(
            "  {:>3}  {:<16} {:<14} {:<14} {:<14} {}",
            word.position,
            word.text,
            codes,
            word.lemma.as_deref().unwrap_or("-"),
            word.morph.as_deref().unwrap_or("-"),
            tags.join(" ")
        );
    }
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize new database.
pub fn cmd_init(db_path: &Path, force: bool) -> Result<(), MikraError> {
    if db_path.exists() {
        if !force {
            return Err(MikraError::IoError(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(db_path)
            .map_err(|e| MikraError::IoError(format!("Cannot remove old database: {}", e)))?;
    }

    let _store = VerseStore::open(db_path)?;
    println!("Initialized new verse database at {:?}", db_path);
    Ok(())
}

// =============================================================================
// IMPORT COMMAND
// =============================================================================

/// Transform every verse of an OSIS file and store it.
pub fn cmd_import(
    db_path: &Path,
    json_mode: bool,
    file: &Path,
    edition: &str,
    options: &TransformOptions,
) -> Result<(), MikraError> {
    validate_edition(edition)?;
    let file = validate_file_path(file)?;
    validate_file_size(&file, MAX_IMPORT_FILE_SIZE)?;

    let bytes = std::fs::read(&file)
        .map_err(|e| MikraError::IoError(format!("Cannot read {:?}: {}", file, e)))?;

    tracing::info!(
        file = %file.display(),
        edition,
        bytes = bytes.len(),
        strip_cantillation = options.strip_cantillation,
        gematria = options.gematria,
        "Importing OSIS document"
    );

    let store = VerseStore::open(db_path)?;
    let report = Importer::import_into(&store, edition, &bytes, options)?;

    tracing::info!(
        edition,
        verses = report.verses,
        words = report.words,
        "Import complete"
    );

    if json_mode {
        return print_json(&serde_json::json!({
            "file": file.to_string_lossy(),
            "edition": edition,
            "report": report,
        }));
    }

    println!("Imported {:?} as edition '{}'", file, edition);
    println!("  Verses:       {}", report.verses);
    println!("  Words:        {}", report.words);
    println!("  Ketiv:        {}", report.ketiv);
    println!("  Qere:         {}", report.qere);
    println!("  Prefix-only:  {}", report.prefix_only);
    Ok(())
}

// =============================================================================
// VERSE / CHAPTER COMMANDS
// =============================================================================

/// Show one stored verse.
pub fn cmd_verse(
    db_path: &Path,
    json_mode: bool,
    edition: &str,
    reference: &str,
) -> Result<(), MikraError> {
    let reference: VerseRef = reference.parse()?;
    let store = open_existing_store(db_path)?;
    let verse = store.get_verse(edition, &reference)?;

    if json_mode {
        return print_json(&verse);
    }

    println!("{} ({})", reference, edition);
    println!("{}", verse.text);
    if let Some(total) = verse.gematria {
        println!("Gematria: {} (ordinal {})", total.standard, total.ordinal);
    }
    println!();
    print_words(&verse);
    Ok(())
}

/// Show every stored verse of a chapter.
pub fn cmd_chapter(
    db_path: &Path,
    json_mode: bool,
    edition: &str,
    book: &str,
    chapter: u32,
) -> Result<(), MikraError> {
    let store = open_existing_store(db_path)?;
    let verses = store.get_chapter(edition, book, chapter)?;

    if json_mode {
        let output: Vec<_> = verses
            .iter()
            .map(|(reference, data)| serde_json::json!({ "verse": reference.verse, "data": data }))
            .collect();
        return print_json(&output);
    }

    println!("{} {} ({})", book, chapter, edition);
    println!();
    for (reference, data) in &verses {
        println!("{:>3}  {}", reference.verse, data.text);
    }
    Ok(())
}

// =============================================================================
// STRONG'S COMMAND
// =============================================================================

/// List occurrences of a Strong's number.
pub fn cmd_strongs(
    db_path: &Path,
    json_mode: bool,
    code: &str,
    limit: usize,
) -> Result<(), MikraError> {
    let code: StrongsNumber = code.parse()?;
    let store = open_existing_store(db_path)?;
    let occurrences = store.find_strongs(&code, limit)?;

    if json_mode {
        return print_json(&serde_json::json!({
            "code": code,
            "occurrences": occurrences,
        }));
    }

    println!("{}: {} occurrence(s)", code, occurrences.len());
    for occurrence in &occurrences {
        println!(
            "  {:<12} {:<14} word {}",
            occurrence.edition,
            occurrence.reference.to_string(),
            occurrence.position
        );
    }
    Ok(())
}

// =============================================================================
// LEMMA / GEMATRIA COMMANDS
// =============================================================================

/// Show the Strong's codes in a raw lemma string.
pub fn cmd_lemma(json_mode: bool, lemma: &str) -> Result<(), MikraError> {
    let codes = extract_strongs(Some(lemma));
    let prefix_only = is_prefix_only(lemma);

    if json_mode {
        return print_json(&serde_json::json!({
            "lemma": lemma,
            "strongs": codes,
            "is_prefix_only": prefix_only,
        }));
    }

    let rendered: Vec<String> = codes.iter().map(ToString::to_string).collect();
    println!("Lemma:       {}", lemma);
    println!(
        "Strong's:    {}",
        if rendered.is_empty() {
            "-".to_string()
        } else {
            rendered.join(", ")
        }
    );
    println!("Prefix-only: {}", prefix_only);
    Ok(())
}

/// Compute standard and ordinal gematria of a word.
pub fn cmd_gematria(json_mode: bool, word: &str) -> Result<(), MikraError> {
    let value = word_gematria(word);

    if json_mode {
        return print_json(&serde_json::json!({
            "word": word,
            "standard": value.standard,
            "ordinal": value.ordinal,
        }));
    }

    println!("Word:     {}", word);
    println!("Standard: {}", value.standard);
    println!("Ordinal:  {}", value.ordinal);
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show store statistics.
pub fn cmd_status(db_path: &Path, json_mode: bool) -> Result<(), MikraError> {
    let store = open_existing_store(db_path)?;
    let stats = store.stats()?;
    let editions = store.editions()?;

    if json_mode {
        return print_json(&serde_json::json!({
            "database": db_path.to_string_lossy(),
            "verses": stats.verses,
            "index_rows": stats.index_rows,
            "editions": editions,
        }));
    }

    println!("Mikra Store Status");
    println!("==================");
    println!("Database:   {:?}", db_path);
    println!();
    println!("Verses:     {}", stats.verses);
    println!("Index rows: {}", stats.index_rows);
    println!(
        "Editions:   {}",
        if editions.is_empty() {
            "-".to_string()
        } else {
            editions.join(", ")
        }
    );
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    db_path: &Path,
    host: &str,
    port: u16,
    transform: TransformOptions,
) -> Result<(), MikraError> {
    let store = VerseStore::open(db_path)?;

    println!("Mikra Verse Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Database: {:?}", db_path);
    println!();
    println!("Endpoints:");
    println!("  GET  /health                                  - Health check");
    println!("  GET  /status                                  - Store statistics");
    println!("  GET  /verse/{{edition}}/{{book}}/{{chapter}}/{{verse}} - One verse");
    println!("  GET  /chapter/{{edition}}/{{book}}/{{chapter}}         - One chapter");
    println!("  GET  /strongs/{{code}}?limit=N                  - Strong's occurrences");
    println!("  POST /gematria                                - Word gematria");
    println!("  POST /lemma                                   - Lemma analysis");
    println!("  POST /transform                               - Transform a verse tree");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, AppState::new(store, transform)).await
}

// =============================================================================
// TESTS
// =============================================================================
