//! SQLite persistence for documents, chunks, sessions, and messages
//!
//! A single connection behind a mutex; callers see plain record types, not
//! SQL. Batch chunk insertion and message+citation insertion run inside
//! transactions so readers never observe a partial write.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{
    document::{Chunk, Document, DocumentStatus, FileType},
    session::{ChatMessage, ChatSession, MessageRole, SourceCitation},
};

/// SQLite-backed record store
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Create or open the database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::Storage(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Storage(format!("Failed to open in-memory database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA foreign_keys=ON;
        "#,
        )
        .map_err(|e| Error::Storage(format!("Failed to set pragmas: {}", e)))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                file_type TEXT NOT NULL,
                file_size INTEGER NOT NULL,
                stored_path TEXT NOT NULL,
                status TEXT NOT NULL,
                processing_progress INTEGER NOT NULL DEFAULT 0,
                error_message TEXT,
                chunk_count INTEGER,
                content TEXT,
                content_hash TEXT,
                uploaded_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_documents_status ON documents(status);

            CREATE TABLE IF NOT EXISTS chunks (
                id TEXT PRIMARY KEY,
                document_id TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                content TEXT NOT NULL,
                page_number INTEGER,
                section TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (document_id) REFERENCES documents(id) ON DELETE CASCADE,
                UNIQUE (document_id, chunk_index)
            );

            CREATE INDEX IF NOT EXISTS idx_chunks_document_id ON chunks(document_id);

            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                last_message TEXT NOT NULL DEFAULT '',
                last_message_at TEXT NOT NULL,
                message_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            -- Document set a session is scoped to. No foreign key on
            -- document_id: a document may be deleted while sessions still
            -- reference it, and queries simply find no chunks for it.
            CREATE TABLE IF NOT EXISTS session_documents (
                session_id TEXT NOT NULL,
                document_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                PRIMARY KEY (session_id, document_id),
                FOREIGN KEY (session_id) REFERENCES sessions(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                response_time_ms INTEGER,
                created_at TEXT NOT NULL,
                FOREIGN KEY (session_id) REFERENCES sessions(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_messages_session_id ON messages(session_id);

            CREATE TABLE IF NOT EXISTS message_sources (
                message_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                document_name TEXT NOT NULL,
                page_number INTEGER,
                excerpt TEXT NOT NULL,
                relevance REAL NOT NULL,
                PRIMARY KEY (message_id, position),
                FOREIGN KEY (message_id) REFERENCES messages(id) ON DELETE CASCADE
            );
        "#,
        )
        .map_err(|e| Error::Storage(format!("Failed to run migrations: {}", e)))?;

        Ok(())
    }

    // ---- documents ----

    /// Insert a new document record
    pub fn insert_document(&self, doc: &Document) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO documents
             (id, name, file_type, file_size, stored_path, status, processing_progress,
              error_message, chunk_count, content, content_hash, uploaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                doc.id.to_string(),
                doc.name,
                doc.file_type.as_str(),
                doc.file_size,
                doc.stored_path,
                doc.status.as_str(),
                doc.processing_progress,
                doc.error_message,
                doc.chunk_count,
                doc.content,
                doc.content_hash,
                doc.uploaded_at,
            ],
        )?;
        Ok(())
    }

    /// Persist a document snapshot produced by a status transition
    pub fn update_document(&self, doc: &Document) -> Result<()> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE documents
             SET status = ?1, processing_progress = ?2, error_message = ?3,
                 chunk_count = ?4, content = ?5, content_hash = ?6
             WHERE id = ?7",
            params![
                doc.status.as_str(),
                doc.processing_progress,
                doc.error_message,
                doc.chunk_count,
                doc.content,
                doc.content_hash,
                doc.id.to_string(),
            ],
        )?;

        if updated == 0 {
            return Err(Error::not_found(format!("document {}", doc.id)));
        }
        Ok(())
    }

    /// Fetch a document by id
    pub fn get_document(&self, id: &Uuid) -> Result<Option<Document>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, name, file_type, file_size, stored_path, status, processing_progress,
                    error_message, chunk_count, content, content_hash, uploaded_at
             FROM documents WHERE id = ?1",
            params![id.to_string()],
            row_to_document,
        )
        .optional()
        .map_err(Error::from)
    }

    /// List all documents, newest first
    pub fn list_documents(&self) -> Result<Vec<Document>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, file_type, file_size, stored_path, status, processing_progress,
                    error_message, chunk_count, content, content_hash, uploaded_at
             FROM documents ORDER BY uploaded_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], row_to_document)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Delete a document record. Chunks go with it (cascade).
    pub fn delete_document(&self, id: &Uuid) -> Result<bool> {
        let conn = self.conn.lock();
        let deleted = conn.execute("DELETE FROM documents WHERE id = ?1", params![id.to_string()])?;
        Ok(deleted > 0)
    }

    /// Count how many of the given ids refer to existing documents
    pub fn count_existing_documents(&self, ids: &[Uuid]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let conn = self.conn.lock();
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT COUNT(*) FROM documents WHERE id IN ({})", placeholders);
        let count: i64 = conn.query_row(
            &sql,
            params_from_iter(ids.iter().map(|id| id.to_string())),
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    // ---- chunks ----

    /// Insert a document's chunks in one transaction
    pub fn insert_chunks(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO chunks (id, document_id, chunk_index, content, page_number, section, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for chunk in chunks {
                stmt.execute(params![
                    chunk.id.to_string(),
                    chunk.document_id.to_string(),
                    chunk.chunk_index,
                    chunk.content,
                    chunk.page_number,
                    chunk.section,
                    chunk.created_at,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Fetch a document's chunks ordered by index
    pub fn chunks_for_document(&self, document_id: &Uuid) -> Result<Vec<Chunk>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, document_id, chunk_index, content, page_number, section, created_at
             FROM chunks WHERE document_id = ?1 ORDER BY chunk_index",
        )?;
        let rows = stmt.query_map(params![document_id.to_string()], row_to_chunk)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Fetch all chunks belonging to the given document set, each paired
    /// with its document's name. Ordered by document then chunk index so
    /// retrieval tie-breaks are stable.
    pub fn chunks_for_documents(&self, document_ids: &[Uuid]) -> Result<Vec<(Chunk, String)>> {
        if document_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.conn.lock();
        let placeholders = vec!["?"; document_ids.len()].join(", ");
        let sql = format!(
            "SELECT c.id, c.document_id, c.chunk_index, c.content, c.page_number, c.section, c.created_at,
                    d.name
             FROM chunks c
             JOIN documents d ON d.id = c.document_id
             WHERE c.document_id IN ({})
             ORDER BY c.document_id, c.chunk_index",
            placeholders
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params_from_iter(document_ids.iter().map(|id| id.to_string())),
            |row| {
                let chunk = row_to_chunk(row)?;
                let name: String = row.get(7)?;
                Ok((chunk, name))
            },
        )?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Delete all chunks for a document, returning how many were removed
    pub fn delete_chunks_for_document(&self, document_id: &Uuid) -> Result<usize> {
        let conn = self.conn.lock();
        let deleted = conn.execute(
            "DELETE FROM chunks WHERE document_id = ?1",
            params![document_id.to_string()],
        )?;
        Ok(deleted)
    }

    // ---- sessions ----

    /// Insert a new session and its document set in one transaction
    pub fn insert_session(&self, session: &ChatSession) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO sessions (id, name, last_message, last_message_at, message_count, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.id.to_string(),
                session.name,
                session.last_message,
                session.last_message_at,
                session.message_count,
                session.created_at,
            ],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO session_documents (session_id, document_id, position) VALUES (?1, ?2, ?3)",
            )?;
            for (position, document_id) in session.document_ids.iter().enumerate() {
                stmt.execute(params![
                    session.id.to_string(),
                    document_id.to_string(),
                    position as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Fetch a session by id, with its document set
    pub fn get_session(&self, id: &Uuid) -> Result<Option<ChatSession>> {
        let conn = self.conn.lock();
        let session = conn
            .query_row(
                "SELECT id, name, last_message, last_message_at, message_count, created_at
                 FROM sessions WHERE id = ?1",
                params![id.to_string()],
                row_to_session,
            )
            .optional()?;

        match session {
            Some(mut session) => {
                session.document_ids = session_document_ids(&conn, &session.id)?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// List all sessions, most recent activity first
    pub fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        let conn = self.conn.lock();
        let mut sessions = {
            let mut stmt = conn.prepare(
                "SELECT id, name, last_message, last_message_at, message_count, created_at
                 FROM sessions ORDER BY last_message_at DESC, rowid DESC",
            )?;
            let rows = stmt.query_map([], row_to_session)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        for session in &mut sessions {
            session.document_ids = session_document_ids(&conn, &session.id)?;
        }
        Ok(sessions)
    }

    /// Delete a session. Messages and their citations go with it (cascade).
    pub fn delete_session(&self, id: &Uuid) -> Result<bool> {
        let conn = self.conn.lock();
        let deleted = conn.execute("DELETE FROM sessions WHERE id = ?1", params![id.to_string()])?;
        Ok(deleted > 0)
    }

    /// Record the latest exchange on a session's denormalized fields
    pub fn touch_session(
        &self,
        id: &Uuid,
        last_message: &str,
        at: DateTime<Utc>,
        added_messages: u32,
    ) -> Result<()> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE sessions
             SET last_message = ?1, last_message_at = ?2, message_count = message_count + ?3
             WHERE id = ?4",
            params![last_message, at, added_messages, id.to_string()],
        )?;

        if updated == 0 {
            return Err(Error::not_found(format!("session {}", id)));
        }
        Ok(())
    }

    // ---- messages ----

    /// Insert a message and its citations in one transaction
    pub fn insert_message(&self, message: &ChatMessage) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO messages (id, session_id, role, content, response_time_ms, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                message.id.to_string(),
                message.session_id.to_string(),
                message.role.as_str(),
                message.content,
                message.response_time_ms,
                message.created_at,
            ],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO message_sources (message_id, position, document_name, page_number, excerpt, relevance)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (position, source) in message.sources.iter().enumerate() {
                stmt.execute(params![
                    message.id.to_string(),
                    position as i64,
                    source.document,
                    source.page,
                    source.excerpt,
                    source.relevance as f64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Fetch a session's messages oldest first, each with its citations
    pub fn messages_for_session(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>> {
        let conn = self.conn.lock();
        let mut messages = {
            let mut stmt = conn.prepare(
                "SELECT id, session_id, role, content, response_time_ms, created_at
                 FROM messages WHERE session_id = ?1 ORDER BY created_at, rowid",
            )?;
            let rows = stmt.query_map(params![session_id.to_string()], row_to_message)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        let mut stmt = conn.prepare(
            "SELECT document_name, page_number, excerpt, relevance
             FROM message_sources WHERE message_id = ?1 ORDER BY position",
        )?;
        for message in &mut messages {
            let rows = stmt.query_map(params![message.id.to_string()], |row| {
                Ok(SourceCitation {
                    document: row.get(0)?,
                    page: row.get(1)?,
                    excerpt: row.get(2)?,
                    relevance: row.get::<_, f64>(3)? as f32,
                })
            })?;
            message.sources = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        }

        Ok(messages)
    }
}

// ---- row mapping ----

fn parse_uuid(idx: usize, value: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn bad_column(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, message.into())
}

fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<Document> {
    let status_raw: String = row.get(5)?;
    let status = DocumentStatus::parse(&status_raw)
        .ok_or_else(|| bad_column(5, format!("unknown document status '{}'", status_raw)))?;

    Ok(Document {
        id: parse_uuid(0, row.get(0)?)?,
        name: row.get(1)?,
        file_type: FileType::parse(&row.get::<_, String>(2)?),
        file_size: row.get(3)?,
        stored_path: row.get(4)?,
        status,
        processing_progress: row.get(6)?,
        error_message: row.get(7)?,
        chunk_count: row.get(8)?,
        content: row.get(9)?,
        content_hash: row.get(10)?,
        uploaded_at: row.get(11)?,
    })
}

fn row_to_chunk(row: &rusqlite::Row<'_>) -> rusqlite::Result<Chunk> {
    Ok(Chunk {
        id: parse_uuid(0, row.get(0)?)?,
        document_id: parse_uuid(1, row.get(1)?)?,
        chunk_index: row.get(2)?,
        content: row.get(3)?,
        page_number: row.get(4)?,
        section: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatSession> {
    Ok(ChatSession {
        id: parse_uuid(0, row.get(0)?)?,
        name: row.get(1)?,
        document_ids: Vec::new(), // filled in by the caller
        last_message: row.get(2)?,
        last_message_at: row.get(3)?,
        message_count: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatMessage> {
    let role_raw: String = row.get(2)?;
    let role = MessageRole::parse(&role_raw)
        .ok_or_else(|| bad_column(2, format!("unknown message role '{}'", role_raw)))?;

    Ok(ChatMessage {
        id: parse_uuid(0, row.get(0)?)?,
        session_id: parse_uuid(1, row.get(1)?)?,
        role,
        content: row.get(3)?,
        sources: Vec::new(), // filled in by the caller
        response_time_ms: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn session_document_ids(conn: &Connection, session_id: &Uuid) -> rusqlite::Result<Vec<Uuid>> {
    let mut stmt = conn.prepare(
        "SELECT document_id FROM session_documents WHERE session_id = ?1 ORDER BY position",
    )?;
    let rows = stmt.query_map(params![session_id.to_string()], |row| {
        parse_uuid(0, row.get(0)?)
    })?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document(name: &str) -> Document {
        Document::new(
            name.to_string(),
            FileType::Txt,
            42,
            format!("document-{}.txt", Uuid::new_v4()),
        )
    }

    #[test]
    fn document_roundtrip_and_snapshot_update() {
        let db = Database::in_memory().unwrap();
        let doc = sample_document("a.txt");
        db.insert_document(&doc).unwrap();

        let loaded = db.get_document(&doc.id).unwrap().unwrap();
        assert_eq!(loaded.name, "a.txt");
        assert_eq!(loaded.status, DocumentStatus::Processing);
        assert_eq!(loaded.processing_progress, 0);

        let doc = doc
            .begin_processing()
            .with_extracted("Some text.".into(), "h".into())
            .into_processed(1);
        db.update_document(&doc).unwrap();

        let loaded = db.get_document(&doc.id).unwrap().unwrap();
        assert_eq!(loaded.status, DocumentStatus::Processed);
        assert_eq!(loaded.processing_progress, 100);
        assert_eq!(loaded.chunk_count, Some(1));
        assert_eq!(loaded.content.as_deref(), Some("Some text."));
    }

    #[test]
    fn update_of_missing_document_is_not_found() {
        let db = Database::in_memory().unwrap();
        let doc = sample_document("ghost.txt");
        assert!(matches!(
            db.update_document(&doc),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn chunks_are_batch_inserted_and_scoped_to_parents() {
        let db = Database::in_memory().unwrap();
        let doc_a = sample_document("a.txt");
        let doc_b = sample_document("b.txt");
        db.insert_document(&doc_a).unwrap();
        db.insert_document(&doc_b).unwrap();

        let chunks: Vec<Chunk> = (0..3)
            .map(|i| Chunk::new(doc_a.id, format!("chunk {}.", i), i))
            .collect();
        db.insert_chunks(&chunks).unwrap();
        db.insert_chunks(&[Chunk::new(doc_b.id, "other.".into(), 0)])
            .unwrap();

        let loaded = db.chunks_for_document(&doc_a.id).unwrap();
        assert_eq!(loaded.len(), 3);
        let indices: Vec<u32> = loaded.iter().map(|c| c.chunk_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        // Parent-set lookup sees only the requested documents.
        let scoped = db.chunks_for_documents(&[doc_a.id]).unwrap();
        assert_eq!(scoped.len(), 3);
        assert!(scoped.iter().all(|(c, name)| {
            c.document_id == doc_a.id && name == "a.txt"
        }));

        let both = db.chunks_for_documents(&[doc_a.id, doc_b.id]).unwrap();
        assert_eq!(both.len(), 4);

        assert_eq!(db.chunks_for_documents(&[]).unwrap().len(), 0);
    }

    #[test]
    fn duplicate_chunk_index_is_rejected() {
        let db = Database::in_memory().unwrap();
        let doc = sample_document("a.txt");
        db.insert_document(&doc).unwrap();

        db.insert_chunks(&[Chunk::new(doc.id, "first.".into(), 0)]).unwrap();
        let err = db.insert_chunks(&[Chunk::new(doc.id, "again.".into(), 0)]);
        assert!(matches!(err, Err(Error::Storage(_))));
    }

    #[test]
    fn deleting_a_document_removes_its_chunks() {
        let db = Database::in_memory().unwrap();
        let doc = sample_document("a.txt");
        db.insert_document(&doc).unwrap();
        db.insert_chunks(&[
            Chunk::new(doc.id, "one.".into(), 0),
            Chunk::new(doc.id, "two.".into(), 1),
        ])
        .unwrap();

        assert_eq!(db.delete_chunks_for_document(&doc.id).unwrap(), 2);
        assert!(db.delete_document(&doc.id).unwrap());
        assert!(db.get_document(&doc.id).unwrap().is_none());
        assert!(db.chunks_for_document(&doc.id).unwrap().is_empty());
    }

    #[test]
    fn count_existing_documents_matches() {
        let db = Database::in_memory().unwrap();
        let doc = sample_document("a.txt");
        db.insert_document(&doc).unwrap();

        assert_eq!(db.count_existing_documents(&[doc.id]).unwrap(), 1);
        assert_eq!(
            db.count_existing_documents(&[doc.id, Uuid::new_v4()]).unwrap(),
            1
        );
        assert_eq!(db.count_existing_documents(&[]).unwrap(), 0);
    }

    #[test]
    fn session_roundtrip_preserves_document_order() {
        let db = Database::in_memory().unwrap();
        let ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let session = ChatSession::new("research".into(), ids.clone());
        db.insert_session(&session).unwrap();

        let loaded = db.get_session(&session.id).unwrap().unwrap();
        assert_eq!(loaded.name, "research");
        assert_eq!(loaded.document_ids, ids);
        assert_eq!(loaded.message_count, 0);
    }

    #[test]
    fn messages_and_citations_roundtrip_in_order() {
        let db = Database::in_memory().unwrap();
        let session = ChatSession::new("notes".into(), vec![Uuid::new_v4()]);
        db.insert_session(&session).unwrap();

        let user = ChatMessage::user(session.id, "What is up?".into());
        db.insert_message(&user).unwrap();

        let sources = vec![
            SourceCitation {
                document: "a.txt".into(),
                page: None,
                excerpt: "Up is a direction.".into(),
                relevance: 0.5,
            },
            SourceCitation {
                document: "b.txt".into(),
                page: Some(2),
                excerpt: "Also a movie.".into(),
                relevance: 0.3,
            },
        ];
        let assistant = ChatMessage::assistant(session.id, "An answer.".into(), sources.clone(), 7);
        db.insert_message(&assistant).unwrap();

        db.touch_session(&session.id, "What is up?", Utc::now(), 2).unwrap();

        let messages = db.messages_for_session(&session.id).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].sources, sources);
        assert_eq!(messages[1].response_time_ms, Some(7));

        let loaded = db.get_session(&session.id).unwrap().unwrap();
        assert_eq!(loaded.message_count, 2);
        assert_eq!(loaded.last_message, "What is up?");
    }

    #[test]
    fn deleting_a_session_cascades_to_messages() {
        let db = Database::in_memory().unwrap();
        let session = ChatSession::new("gone".into(), vec![Uuid::new_v4()]);
        db.insert_session(&session).unwrap();
        db.insert_message(&ChatMessage::user(session.id, "hi".into())).unwrap();

        assert!(db.delete_session(&session.id).unwrap());
        assert!(db.get_session(&session.id).unwrap().is_none());
        assert!(db.messages_for_session(&session.id).unwrap().is_empty());
    }

    #[test]
    fn sessions_list_most_recent_first() {
        let db = Database::in_memory().unwrap();
        let older = ChatSession::new("older".into(), vec![Uuid::new_v4()]);
        let newer = ChatSession::new("newer".into(), vec![Uuid::new_v4()]);
        db.insert_session(&older).unwrap();
        db.insert_session(&newer).unwrap();

        db.touch_session(&newer.id, "bump", Utc::now() + chrono::Duration::seconds(5), 2)
            .unwrap();

        let sessions = db.list_sessions().unwrap();
        assert_eq!(sessions[0].name, "newer");
    }
}
