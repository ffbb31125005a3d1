use clap::{Parser, Subcommand};

#[allow(clippy::upper_case_acronyms)]
#[derive(Parser, Debug)]
#[clap(name = "sparkify", about, version)]
pub struct CLI {
    #[clap(subcommand)]
    pub command: Commands,

    /// Log every statement's SQL as well as its label.
    #[clap(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[clap(version = "0.1", about = "Loads the sparkify event and song logs into a Redshift star schema", long_about = None)]
pub enum Commands {
    /// Writes a template sparkify.yaml and .env.example to start from.
    ///
    /// Example:
    /// `sparkify init`
    #[clap(name = "init")]
    Init {
        /// optional - The path to create the project in, default will be where the command is run.
        #[clap(long, short)]
        path: Option<String>,
    },

    /// Drops every table and creates them again, empty.
    ///
    /// This can not be reverted, all warehouse data is lost.
    ///
    /// Example:
    /// `sparkify create-tables`
    #[clap(name = "create-tables")]
    CreateTables {
        /// optional - The path to run the command in, default will be where the command is run.
        #[clap(long, short)]
        path: Option<String>,
    },

    /// Copies the logs from S3 into the staging tables then populates the star schema.
    ///
    /// Example:
    /// `sparkify etl` or `sparkify etl --skip-staging-load`
    #[clap(name = "etl")]
    Etl {
        /// Populate the star schema from the rows already staged.
        #[clap(long)]
        skip_staging_load: bool,

        /// Do not count the rows of every table once finished.
        #[clap(long)]
        no_report: bool,

        /// optional - The path to run the command in, default will be where the command is run.
        #[clap(long, short)]
        path: Option<String>,
    },

    /// Prints the statements a command would run without connecting to the cluster.
    ///
    /// Example:
    /// `sparkify sql create-tables` or `sparkify sql etl`
    #[clap(name = "sql")]
    Sql {
        #[clap(subcommand)]
        subcommand: SqlSubcommands,

        /// optional - The path to run the command in, default will be where the command is run.
        #[clap(long, short)]
        path: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SqlSubcommands {
    /// The drop and create statements of `sparkify create-tables`.
    #[clap(name = "create-tables")]
    CreateTables,

    /// The copy and insert statements of `sparkify etl`.
    #[clap(name = "etl")]
    Etl {
        #[clap(long)]
        skip_staging_load: bool,
    },
}
