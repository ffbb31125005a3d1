use std::fmt::{Display, Formatter};

use crate::{database::postgres::statement::SqlStatement, manifest::core::Dialect};

/// The seven tables of the star schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    StagingEvents,
    StagingSongs,
    Users,
    Artist,
    Song,
    Time,
    Songplay,
}

impl Table {
    /// Every table appears after all the tables it references.
    pub const CREATE_ORDER: [Table; 7] = [
        Table::StagingEvents,
        Table::StagingSongs,
        Table::Users,
        Table::Artist,
        Table::Song,
        Table::Time,
        Table::Songplay,
    ];

    /// Referencing tables go before the tables they reference.
    pub const DROP_ORDER: [Table; 7] = [
        Table::Songplay,
        Table::Time,
        Table::Song,
        Table::Artist,
        Table::Users,
        Table::StagingSongs,
        Table::StagingEvents,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::StagingEvents => "staging_events",
            Table::StagingSongs => "staging_songs",
            Table::Users => "users",
            Table::Artist => "artist",
            Table::Song => "song",
            Table::Time => "time",
            Table::Songplay => "songplay",
        }
    }

    #[cfg(test)]
    pub fn is_staging(&self) -> bool {
        matches!(self, Table::StagingEvents | Table::StagingSongs)
    }

    /// Tables this table holds foreign keys into.
    pub fn references(&self) -> &'static [Table] {
        match self {
            Table::Song => &[Table::Artist],
            Table::Songplay => &[Table::Time, Table::Users, Table::Song, Table::Artist],
            _ => &[],
        }
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name())
    }

    pub fn create_sql(&self, dialect: Dialect) -> String {
        let columns = match self {
            Table::StagingEvents => STAGING_EVENTS_COLUMNS.to_string(),
            Table::StagingSongs => STAGING_SONGS_COLUMNS.to_string(),
            Table::Users => USERS_COLUMNS.to_string(),
            Table::Artist => ARTIST_COLUMNS.to_string(),
            Table::Song => SONG_COLUMNS.to_string(),
            Table::Time => TIME_COLUMNS.to_string(),
            Table::Songplay => format!(
                "    songplay_id {},\n{}",
                songplay_identity_column(dialect),
                SONGPLAY_COLUMNS
            ),
        };

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n){}",
            self.name(),
            columns,
            self.distribution(dialect)
        )
    }

    pub fn drop_statement(&self) -> SqlStatement {
        SqlStatement::new(format!("drop {}", self.name()), self.drop_sql())
    }

    pub fn create_statement(&self, dialect: Dialect) -> SqlStatement {
        SqlStatement::new(format!("create {}", self.name()), self.create_sql(dialect))
    }

    /// Redshift distribution and sort keys. Dimensions are small enough to copy to every node;
    /// song and songplay are co-located on `song_id`, the songplay join key.
    fn distribution(&self, dialect: Dialect) -> &'static str {
        if dialect != Dialect::Redshift {
            return "";
        }

        match self {
            Table::StagingEvents | Table::StagingSongs => "",
            Table::Users | Table::Artist | Table::Time => "\nDISTSTYLE ALL",
            Table::Song => "\nDISTKEY (song_id)\nSORTKEY (song_id)",
            Table::Songplay => "\nDISTKEY (song_id)\nSORTKEY (start_time)",
        }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn songplay_identity_column(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Redshift => "BIGINT IDENTITY(0, 1) PRIMARY KEY",
        Dialect::Postgres => "BIGINT GENERATED BY DEFAULT AS IDENTITY (MINVALUE 0 START WITH 0) PRIMARY KEY",
    }
}

// Column order matches the event log JSON-paths file, the COPY maps keys by position.
const STAGING_EVENTS_COLUMNS: &str = "    artist VARCHAR(512),
    auth VARCHAR(32),
    first_name VARCHAR(256),
    gender CHAR(1),
    item_in_session INTEGER,
    last_name VARCHAR(256),
    length DOUBLE PRECISION,
    level VARCHAR(16),
    location VARCHAR(512),
    method VARCHAR(8),
    page VARCHAR(64),
    registration DOUBLE PRECISION,
    session_id INTEGER,
    song VARCHAR(512),
    status INTEGER,
    ts TIMESTAMP,
    user_agent VARCHAR(512),
    user_id INTEGER";

const STAGING_SONGS_COLUMNS: &str = "    num_songs INTEGER,
    artist_id VARCHAR(32),
    artist_latitude DOUBLE PRECISION,
    artist_longitude DOUBLE PRECISION,
    artist_location VARCHAR(512),
    artist_name VARCHAR(512),
    song_id VARCHAR(32),
    title VARCHAR(512),
    duration DOUBLE PRECISION,
    year INTEGER";

const USERS_COLUMNS: &str = "    user_id INTEGER NOT NULL PRIMARY KEY,
    first_name VARCHAR(256),
    last_name VARCHAR(256),
    gender CHAR(1),
    level VARCHAR(16)";

const ARTIST_COLUMNS: &str = "    artist_id VARCHAR(32) NOT NULL PRIMARY KEY,
    name VARCHAR(512) NOT NULL,
    location VARCHAR(512),
    latitude DOUBLE PRECISION,
    longitude DOUBLE PRECISION";

const SONG_COLUMNS: &str = "    song_id VARCHAR(32) NOT NULL PRIMARY KEY,
    title VARCHAR(512) NOT NULL,
    artist_id VARCHAR(32) NOT NULL REFERENCES artist (artist_id),
    year INTEGER,
    duration DOUBLE PRECISION NOT NULL";

const TIME_COLUMNS: &str = "    start_time TIMESTAMP NOT NULL PRIMARY KEY,
    hour SMALLINT NOT NULL,
    day SMALLINT NOT NULL,
    week SMALLINT NOT NULL,
    month SMALLINT NOT NULL,
    year SMALLINT NOT NULL,
    weekday SMALLINT NOT NULL";

const SONGPLAY_COLUMNS: &str = "    start_time TIMESTAMP NOT NULL REFERENCES time (start_time),
    user_id INTEGER NOT NULL REFERENCES users (user_id),
    level VARCHAR(16),
    song_id VARCHAR(32) NOT NULL REFERENCES song (song_id),
    artist_id VARCHAR(32) NOT NULL REFERENCES artist (artist_id),
    session_id INTEGER,
    location VARCHAR(512),
    user_agent VARCHAR(512)";

pub fn create_table_statements(dialect: Dialect) -> Vec<SqlStatement> {
    Table::CREATE_ORDER.iter().map(|table| table.create_statement(dialect)).collect()
}

pub fn drop_table_statements() -> Vec<SqlStatement> {
    Table::DROP_ORDER.iter().map(|table| table.drop_statement()).collect()
}
