//! Chat session repository.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use tracing::instrument;
use uuid::Uuid;

use ton_content::{ChatMessage, ChatSession};
use ton_error::{StoreError, StoreErrorKind, TonResult};
use ton_interface::ChatStore;

use super::{map_diesel_error, run_blocking};
use crate::PgPool;
use crate::rows::ChatSessionRow;
use crate::schema::chat_sessions;

/// Database-backed chat session store.
///
/// Sessions are append-only: `append` reads the stored message list, extends
/// it, and writes it back. Concurrent appends to the same session follow
/// last-write-wins, which matches single-user chat traffic.
#[derive(Clone)]
pub struct PostgresChatStore {
    pool: PgPool,
}

impl PostgresChatStore {
    /// Create a new chat store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatStore for PostgresChatStore {
    #[instrument(skip(self))]
    async fn latest_for_user(&self, user_id: &str) -> TonResult<Option<ChatSession>> {
        let user_id = user_id.to_string();
        let row: Option<ChatSessionRow> = run_blocking(&self.pool, move |conn| {
            chat_sessions::table
                .filter(chat_sessions::user_id.eq(user_id))
                .order(chat_sessions::created_at.desc())
                .select(ChatSessionRow::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)
        })
        .await?;
        Ok(row.map(ChatSession::try_from).transpose()?)
    }

    async fn create(&self, session: &ChatSession) -> TonResult<()> {
        let row = ChatSessionRow::try_from(session)?;
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(chat_sessions::table)
                .values(&row)
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    #[instrument(skip(self, messages), fields(count = messages.len()))]
    async fn append(&self, session_id: Uuid, messages: &[ChatMessage]) -> TonResult<()> {
        let new_messages = messages.to_vec();
        run_blocking(&self.pool, move |conn| {
            let row: ChatSessionRow = chat_sessions::table
                .find(session_id)
                .select(ChatSessionRow::as_select())
                .first(conn)
                .map_err(map_diesel_error)?;
            let mut session = ChatSession::try_from(row)?;
            session.messages.extend(new_messages);
            session.updated_at = Utc::now().naive_utc();

            let messages = serde_json::to_value(&session.messages)
                .map_err(|e| StoreError::new(StoreErrorKind::Serialization(e.to_string())))?;
            diesel::update(chat_sessions::table.find(session_id))
                .set((
                    chat_sessions::messages.eq(messages),
                    chat_sessions::updated_at.eq(session.updated_at),
                ))
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await?;
        Ok(())
    }
}
