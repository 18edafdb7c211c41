//! Singleton settings documents, keyed rows in `site_settings`.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use ton_content::{ElectionCountdown, PartialAiFlags};
use ton_error::{StoreError, StoreErrorKind, TonResult};
use ton_interface::SettingsStore;

use super::{map_diesel_error, run_blocking};
use crate::PgPool;
use crate::rows::SettingRow;
use crate::schema::site_settings;

const AI_FLAGS_KEY: &str = "ai_feature_flags";
const ELECTION_KEY: &str = "election_countdown";

fn serialization(e: impl std::fmt::Display) -> StoreError {
    StoreError::new(StoreErrorKind::Serialization(e.to_string()))
}

/// Database-backed settings store.
#[derive(Clone)]
pub struct PostgresSettingsStore {
    pool: PgPool,
}

impl PostgresSettingsStore {
    /// Create a new settings store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn read_doc<T: DeserializeOwned>(&self, key: &'static str) -> TonResult<Option<T>> {
        let row: Option<SettingRow> = run_blocking(&self.pool, move |conn| {
            site_settings::table
                .find(key)
                .select(SettingRow::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)
        })
        .await?;
        Ok(row
            .map(|r| serde_json::from_value(r.value).map_err(serialization))
            .transpose()?)
    }

    async fn write_doc<T: Serialize>(&self, key: &'static str, doc: &T) -> TonResult<()> {
        let row = SettingRow {
            key: key.to_string(),
            value: serde_json::to_value(doc).map_err(serialization)?,
            updated_at: Utc::now().naive_utc(),
        };
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(site_settings::table)
                .values(&row)
                .on_conflict(site_settings::key)
                .do_update()
                .set((
                    site_settings::value.eq(&row.value),
                    site_settings::updated_at.eq(row.updated_at),
                ))
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for PostgresSettingsStore {
    #[instrument(skip(self))]
    async fn ai_flags(&self) -> TonResult<PartialAiFlags> {
        Ok(self.read_doc(AI_FLAGS_KEY).await?.unwrap_or_default())
    }

    /// Merge-write: keys omitted from `flags` keep their stored value, so a
    /// toggle of one feature never clobbers the rest of the document.
    #[instrument(skip(self, flags))]
    async fn set_ai_flags(&self, flags: &PartialAiFlags) -> TonResult<()> {
        let stored: PartialAiFlags = self.read_doc(AI_FLAGS_KEY).await?.unwrap_or_default();
        let merged = PartialAiFlags {
            url_slug_generation: flags.url_slug_generation.or(stored.url_slug_generation),
            weather_forecast: flags.weather_forecast.or(stored.weather_forecast),
            post_generation: flags.post_generation.or(stored.post_generation),
            topic_suggestion: flags.topic_suggestion.or(stored.topic_suggestion),
            magazine_generation: flags.magazine_generation.or(stored.magazine_generation),
            cover_image_generation: flags
                .cover_image_generation
                .or(stored.cover_image_generation),
            ask_diano: flags.ask_diano.or(stored.ask_diano),
        };
        self.write_doc(AI_FLAGS_KEY, &merged).await
    }

    #[instrument(skip(self))]
    async fn election_countdown(&self) -> TonResult<ElectionCountdown> {
        Ok(self.read_doc(ELECTION_KEY).await?.unwrap_or_default())
    }

    #[instrument(skip(self, config))]
    async fn set_election_countdown(&self, config: &ElectionCountdown) -> TonResult<()> {
        self.write_doc(ELECTION_KEY, config).await
    }
}
