use futures::stream::{self, BoxStream, StreamExt};
use tracing::error;

use crate::Database;

/// One row of the `guilds` table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GuildPrefix {
    pub guild_id: u64,
    pub prefix: Option<String>,
}

// Snowflakes stay below 2^63, so the signed column holds them unchanged.
fn to_db_id(id: u64) -> i64 {
    id as i64
}

fn from_db_id(id: i64) -> u64 {
    id as u64
}

impl Database {
    /// Make sure the guild has a row and return its stored prefix.
    pub async fn ensure_guild_prefix(&self, guild_id: u64) -> sqlx::Result<Option<String>> {
        sqlx::query_scalar::<_, Option<String>>(
            "INSERT INTO guilds (id) VALUES ($1)
             ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id
             RETURNING prefix",
        )
        .bind(to_db_id(guild_id))
        .fetch_one(self.pool())
        .await
    }

    /// Stored prefix of a guild, if it has one.
    pub async fn guild_prefix(&self, guild_id: u64) -> sqlx::Result<Option<String>> {
        let prefix = sqlx::query_scalar::<_, Option<String>>(
            "SELECT prefix FROM guilds WHERE id = $1",
        )
        .bind(to_db_id(guild_id))
        .fetch_optional(self.pool())
        .await?;

        Ok(prefix.flatten())
    }

    /// Store a guild prefix. `None` resets it to the default.
    pub async fn set_guild_prefix(&self, guild_id: u64, prefix: Option<&str>) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO guilds (id, prefix) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET prefix = EXCLUDED.prefix",
        )
        .bind(to_db_id(guild_id))
        .bind(prefix)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Keyset batch of guild rows ordered by id, starting after `last_id`.
    pub async fn guild_prefixes_after(
        &self,
        last_id: Option<u64>,
        limit: usize,
    ) -> sqlx::Result<Vec<GuildPrefix>> {
        let rows = sqlx::query_as::<_, (i64, Option<String>)>(
            "SELECT id, prefix FROM guilds WHERE id > $1 ORDER BY id LIMIT $2",
        )
        .bind(last_id.map_or(i64::MIN, to_db_id))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, prefix)| GuildPrefix {
                guild_id: from_db_id(id),
                prefix,
            })
            .collect())
    }

    /// Every guild row, fetched lazily in batches of `batch_size`.
    ///
    /// A failed batch ends the stream early.
    pub fn stream_guild_prefixes(&self, batch_size: usize) -> BoxStream<'static, GuildPrefix> {
        let db = self.clone();
        let batch_size = batch_size.max(1);

        stream::unfold(Some(None), move |cursor: Option<Option<u64>>| {
            let db = db.clone();
            async move {
                let last_id = cursor?;
                match db.guild_prefixes_after(last_id, batch_size).await {
                    Ok(batch) if batch.is_empty() => None,
                    Ok(batch) => {
                        let next = if batch.len() < batch_size {
                            None
                        } else {
                            batch.last().map(|row| Some(row.guild_id))
                        };
                        Some((stream::iter(batch), next))
                    }
                    Err(source) => {
                        error!(?source, "failed to fetch guild prefix batch");
                        None
                    }
                }
            }
        })
        .flatten()
        .boxed()
    }
}
