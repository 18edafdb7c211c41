//! Advertisement, video embed, and magazine repositories.

use async_trait::async_trait;
use diesel::prelude::*;
use tracing::instrument;
use uuid::Uuid;

use ton_content::{Advertisement, Magazine, VideoEmbed};
use ton_error::{StoreError, TonResult};
use ton_interface::{AdStore, MagazineStore, VideoStore};

use super::{map_diesel_error, run_blocking};
use crate::rows::{AdRow, MagazineRow, VideoRow};
use crate::schema::{advertisements, magazines, videos};
use crate::{PgPool, fixtures};

/// Database-backed advertisement store with fixture fallback.
#[derive(Clone)]
pub struct PostgresAdStore {
    pool: PgPool,
}

impl PostgresAdStore {
    /// Create a new advertisement store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_inner(&self) -> Result<Vec<Advertisement>, StoreError> {
        let rows: Vec<AdRow> = run_blocking(&self.pool, |conn| {
            advertisements::table
                .select(AdRow::as_select())
                .order(advertisements::created_at.desc())
                .load(conn)
                .map_err(map_diesel_error)
        })
        .await?;
        Ok(rows.into_iter().map(Advertisement::from).collect())
    }
}

#[async_trait]
impl AdStore for PostgresAdStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Vec<Advertisement> {
        match self.list_inner().await {
            Ok(ads) => ads,
            Err(e) if e.kind.is_degradable() => {
                tracing::warn!(error = %e, "Ad store unavailable, serving fixture content");
                fixtures::advertisements()
            }
            Err(e) => {
                tracing::error!(error = %e, "Ad query failed");
                Vec::new()
            }
        }
    }

    async fn create(&self, ad: &Advertisement) -> TonResult<()> {
        let row = AdRow::from(ad);
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(advertisements::table)
                .values(&row)
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    async fn update(&self, ad: &Advertisement) -> TonResult<()> {
        let row = AdRow::from(ad);
        let id = ad.id;
        run_blocking(&self.pool, move |conn| {
            diesel::update(advertisements::table.find(id))
                .set(&row)
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> TonResult<()> {
        run_blocking(&self.pool, move |conn| {
            diesel::delete(advertisements::table.find(id))
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await?;
        Ok(())
    }
}

/// Database-backed video embed store with fixture fallback.
#[derive(Clone)]
pub struct PostgresVideoStore {
    pool: PgPool,
}

impl PostgresVideoStore {
    /// Create a new video store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_inner(&self) -> Result<Vec<VideoEmbed>, StoreError> {
        let rows: Vec<VideoRow> = run_blocking(&self.pool, |conn| {
            videos::table
                .select(VideoRow::as_select())
                .order(videos::created_at.desc())
                .load(conn)
                .map_err(map_diesel_error)
        })
        .await?;
        Ok(rows.into_iter().map(VideoEmbed::from).collect())
    }
}

#[async_trait]
impl VideoStore for PostgresVideoStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Vec<VideoEmbed> {
        match self.list_inner().await {
            Ok(videos) => videos,
            Err(e) if e.kind.is_degradable() => {
                tracing::warn!(error = %e, "Video store unavailable, serving fixture content");
                fixtures::videos()
            }
            Err(e) => {
                tracing::error!(error = %e, "Video query failed");
                Vec::new()
            }
        }
    }

    async fn create(&self, video: &VideoEmbed) -> TonResult<()> {
        let row = VideoRow::from(video);
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(videos::table)
                .values(&row)
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> TonResult<()> {
        run_blocking(&self.pool, move |conn| {
            diesel::delete(videos::table.find(id))
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await?;
        Ok(())
    }
}

/// Database-backed magazine store. Magazines are immutable once created.
#[derive(Clone)]
pub struct PostgresMagazineStore {
    pool: PgPool,
}

impl PostgresMagazineStore {
    /// Create a new magazine store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_inner(&self) -> Result<Vec<Magazine>, StoreError> {
        let rows: Vec<MagazineRow> = run_blocking(&self.pool, |conn| {
            magazines::table
                .select(MagazineRow::as_select())
                .order(magazines::created_at.desc())
                .load(conn)
                .map_err(map_diesel_error)
        })
        .await?;
        rows.into_iter().map(Magazine::try_from).collect()
    }
}

#[async_trait]
impl MagazineStore for PostgresMagazineStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Vec<Magazine> {
        match self.list_inner().await {
            Ok(magazines) => magazines,
            Err(e) => {
                // No magazine fixtures exist; degrade to an empty shelf.
                tracing::warn!(error = %e, "Magazine query failed");
                Vec::new()
            }
        }
    }

    async fn create(&self, magazine: &Magazine) -> TonResult<()> {
        let row = MagazineRow::try_from(magazine)?;
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(magazines::table)
                .values(&row)
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(())
        })
        .await?;
        Ok(())
    }
}
