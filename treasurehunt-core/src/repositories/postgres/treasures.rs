// File: treasurehunt-core/src/repositories/postgres/treasures.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Pool, Postgres, Row};
use tracing::warn;
use uuid::Uuid;
use treasurehunt_common::models::{BlockLocation, RedemptionRecord, TreasureDefinition};
use treasurehunt_common::traits::TreasureRepository;
use crate::repositories::is_unique_violation;
use crate::Error;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS th_treasures (
        treasure_id VARCHAR(128) PRIMARY KEY,
        world       TEXT NOT NULL,
        x           INTEGER NOT NULL,
        y           INTEGER NOT NULL,
        z           INTEGER NOT NULL,
        command     TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS th_treasures_location_idx ON th_treasures (world, x, y, z)",
    r#"
    CREATE TABLE IF NOT EXISTS th_redeemed (
        id          BIGSERIAL PRIMARY KEY,
        player_uuid CHAR(36) NOT NULL,
        treasure_id VARCHAR(128) NOT NULL,
        redeemed_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT th_redeemed_player_treasure_unique UNIQUE (player_uuid, treasure_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS th_redeemed_player_idx ON th_redeemed (player_uuid)",
];

#[derive(Clone)]
pub struct PostgresTreasureRepository {
    pool: Pool<Postgres>,
}

impl PostgresTreasureRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn delete_in_tx(conn: &mut PgConnection, treasure_id: &str) -> Result<(u64, u64), Error> {
        // Blocks add_redemption's FOR SHARE check until this transaction ends.
        sqlx::query("SELECT 1 FROM th_treasures WHERE treasure_id = $1 FOR UPDATE")
            .bind(treasure_id)
            .fetch_optional(&mut *conn)
            .await?;

        let redemptions = sqlx::query("DELETE FROM th_redeemed WHERE treasure_id = $1")
            .bind(treasure_id)
            .execute(&mut *conn)
            .await?
            .rows_affected();

        let treasures = sqlx::query("DELETE FROM th_treasures WHERE treasure_id = $1")
            .bind(treasure_id)
            .execute(&mut *conn)
            .await?
            .rows_affected();

        Ok((treasures, redemptions))
    }
}

fn treasure_from_row(row: &PgRow) -> Result<TreasureDefinition, Error> {
    Ok(TreasureDefinition {
        treasure_id: row.try_get("treasure_id")?,
        location: BlockLocation {
            world: row.try_get("world")?,
            x: row.try_get("x")?,
            y: row.try_get("y")?,
            z: row.try_get("z")?,
        },
        command: row.try_get("command")?,
    })
}

#[async_trait]
impl TreasureRepository for PostgresTreasureRepository {
    async fn ensure_schema(&self) -> Result<(), Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn upsert_treasure(&self, treasure: &TreasureDefinition) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO th_treasures (treasure_id, world, x, y, z, command)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (treasure_id) DO UPDATE SET
                world = EXCLUDED.world,
                x = EXCLUDED.x,
                y = EXCLUDED.y,
                z = EXCLUDED.z,
                command = EXCLUDED.command
            "#,
        )
            .bind(&treasure.treasure_id)
            .bind(&treasure.location.world)
            .bind(treasure.location.x)
            .bind(treasure.location.y)
            .bind(treasure.location.z)
            .bind(&treasure.command)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_treasure(&self, treasure_id: &str) -> Result<(u64, u64), Error> {
        let mut tx = self.pool.begin().await?;

        match Self::delete_in_tx(&mut tx, treasure_id).await {
            Ok(counts) => {
                tx.commit().await?;
                Ok(counts)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback of delete for '{}' failed: {}", treasure_id, rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn list_all_treasures(&self) -> Result<Vec<TreasureDefinition>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT treasure_id, world, x, y, z, command
            FROM th_treasures
            ORDER BY treasure_id ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(treasure_from_row).collect()
    }

    async fn add_redemption(&self, player: Uuid, treasure_id: &str) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO th_redeemed (player_uuid, treasure_id, redeemed_at)
            SELECT $1, $2, $3
            WHERE EXISTS (SELECT 1 FROM th_treasures WHERE treasure_id = $2 FOR SHARE)
            "#,
        )
            .bind(player.to_string())
            .bind(treasure_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_redemption(&self, player: Uuid, treasure_id: &str) -> Result<bool, Error> {
        let done = sqlx::query("DELETE FROM th_redeemed WHERE player_uuid = $1 AND treasure_id = $2")
            .bind(player.to_string())
            .bind(treasure_id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn is_redeemed(&self, player: Uuid, treasure_id: &str) -> Result<bool, Error> {
        let row = sqlx::query("SELECT 1 FROM th_redeemed WHERE player_uuid = $1 AND treasure_id = $2 LIMIT 1")
            .bind(player.to_string())
            .bind(treasure_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn list_redeemed_for_player(&self, player: Uuid) -> Result<Vec<String>, Error> {
        let rows = sqlx::query("SELECT treasure_id FROM th_redeemed WHERE player_uuid = $1 ORDER BY id ASC")
            .bind(player.to_string())
            .fetch_all(&self.pool)
            .await?;

        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(row.try_get("treasure_id")?);
        }
        Ok(ids)
    }

    async fn list_redemptions_for_treasure(&self, treasure_id: &str) -> Result<Vec<RedemptionRecord>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT player_uuid, treasure_id, redeemed_at
            FROM th_redeemed
            WHERE treasure_id = $1
            ORDER BY redeemed_at ASC, id ASC
            "#,
        )
            .bind(treasure_id)
            .fetch_all(&self.pool)
            .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let player: String = row.try_get("player_uuid")?;
            let redeemed_at: DateTime<Utc> = row.try_get("redeemed_at")?;
            result.push(RedemptionRecord {
                player_uuid: Uuid::parse_str(player.trim())?,
                treasure_id: row.try_get("treasure_id")?,
                redeemed_at,
            });
        }
        Ok(result)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
