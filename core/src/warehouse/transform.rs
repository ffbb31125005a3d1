use std::time::Instant;

use tracing::{debug, info};

use crate::{
    database::postgres::{
        client::{PostgresClient, PostgresError},
        statement::SqlStatement,
    },
    helpers::format_duration,
    warehouse::tables::Table,
};

// A user's row comes from their most recent play that carries a level, so `level` is their latest
// known subscription level. Plays without a level only win when the user has no other.
const USERS_INSERT: &str = "INSERT INTO users (user_id, first_name, last_name, gender, level)
SELECT user_id, first_name, last_name, gender, level
FROM (
    SELECT user_id, first_name, last_name, gender, level,
           ROW_NUMBER() OVER (
               PARTITION BY user_id
               ORDER BY level IS NULL, ts DESC NULLS LAST, item_in_session DESC NULLS LAST, session_id DESC NULLS LAST
           ) AS event_rank
    FROM staging_events
    WHERE page = 'NextSong'
      AND user_id IS NOT NULL
) AS latest_events
WHERE event_rank = 1";

const ARTIST_INSERT: &str = "INSERT INTO artist (artist_id, name, location, latitude, longitude)
SELECT artist_id, artist_name, artist_location, artist_latitude, artist_longitude
FROM (
    SELECT artist_id, artist_name, artist_location, artist_latitude, artist_longitude,
           ROW_NUMBER() OVER (PARTITION BY artist_id ORDER BY song_id) AS artist_rank
    FROM staging_songs
    WHERE artist_id IS NOT NULL
      AND artist_name IS NOT NULL
) AS ranked_artists
WHERE artist_rank = 1";

const SONG_INSERT: &str = "INSERT INTO song (song_id, title, artist_id, year, duration)
SELECT song_id, title, artist_id, year, duration
FROM (
    SELECT song_id, title, artist_id, year, duration,
           ROW_NUMBER() OVER (PARTITION BY song_id ORDER BY artist_id) AS song_rank
    FROM staging_songs
    WHERE song_id IS NOT NULL
      AND title IS NOT NULL
      AND duration IS NOT NULL
      AND artist_id IS NOT NULL
      AND artist_name IS NOT NULL
) AS ranked_songs
WHERE song_rank = 1";

const TIME_INSERT: &str = "INSERT INTO time (start_time, hour, day, week, month, year, weekday)
SELECT DISTINCT ts,
       EXTRACT(hour FROM ts),
       EXTRACT(day FROM ts),
       EXTRACT(week FROM ts),
       EXTRACT(month FROM ts),
       EXTRACT(year FROM ts),
       EXTRACT(dow FROM ts)
FROM staging_events
WHERE page = 'NextSong'
  AND ts IS NOT NULL";

// Exact equality on (artist, title, duration). Songs sharing the same triple are collapsed to one
// so every matching play yields exactly one row; plays with no match are dropped.
const SONGPLAY_INSERT: &str = "INSERT INTO songplay (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
SELECT e.ts, e.user_id, e.level, s.song_id, s.artist_id, e.session_id, e.location, e.user_agent
FROM staging_events AS e
JOIN (
    SELECT song_id, artist_id, artist_name, title, duration,
           ROW_NUMBER() OVER (PARTITION BY artist_name, title, duration ORDER BY song_id) AS match_rank
    FROM staging_songs
    WHERE song_id IS NOT NULL
      AND title IS NOT NULL
      AND duration IS NOT NULL
      AND artist_id IS NOT NULL
      AND artist_name IS NOT NULL
) AS s
  ON e.artist = s.artist_name
 AND e.song = s.title
 AND e.length = s.duration
WHERE e.page = 'NextSong'
  AND e.user_id IS NOT NULL
  AND e.ts IS NOT NULL
  AND s.match_rank = 1";

/// The five inserts, dimensions before the fact table that references them.
pub fn insert_table_statements() -> Vec<(Table, SqlStatement)> {
    [
        (Table::Users, USERS_INSERT),
        (Table::Artist, ARTIST_INSERT),
        (Table::Song, SONG_INSERT),
        (Table::Time, TIME_INSERT),
        (Table::Songplay, SONGPLAY_INSERT),
    ]
    .into_iter()
    .map(|(table, sql)| (table, SqlStatement::new(format!("insert {}", table.name()), sql)))
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedRows {
    pub table: Table,
    pub rows: u64,
}

#[derive(thiserror::Error, Debug)]
pub enum TransformError {
    #[error("Could not insert into {0}: {1}")]
    CouldNotInsert(Table, PostgresError),
}

/// Runs every insert, each committed as soon as it completes.
pub async fn insert_tables(client: &PostgresClient) -> Result<Vec<InsertedRows>, TransformError> {
    let mut inserted = Vec::new();

    for (table, statement) in insert_table_statements() {
        let started = Instant::now();
        debug!("{}", statement.sql);

        let rows = client
            .execute(statement.sql.as_str(), &[])
            .await
            .map_err(|e| TransformError::CouldNotInsert(table, e))?;

        info!(
            "{} - {} rows - took {}",
            statement.label,
            rows,
            format_duration(started.elapsed())
        );
        inserted.push(InsertedRows { table, rows });
    }

    Ok(inserted)
}
