// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Developer task runner for the SiteSafe workspace.
//!
//! Day-to-day commands (`build`, `lint`, `fmt`, `test`) shell out to
//! cargo. Two commands need infrastructure:
//!
//! - `test-mariadb` provisions a disposable MariaDB 11 container, runs
//!   the `#[ignore]`d backend validation tests in `sitesafe-persistence`
//!   with `DATABASE_URL` and `SITESAFE_TEST_BACKEND=mysql` set, and
//!   removes the container afterwards, pass or fail.
//! - `verify-migrations` applies the `SQLite` and `MySQL` migration sets
//!   to fresh databases, introspects both schemas into a normalized
//!   structural model, and fails on any difference.
//!
//! Plain `cargo test` stays fast and infrastructure-free; external
//! databases are opt-in only.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::{io, process::Output, thread::sleep, time::Duration};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use diesel::sql_types::{BigInt, Integer, Text};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");
const MYSQL_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations_mysql");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (formatting, clippy, docs, tests)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Run clippy on the project
    #[command(visible_alias = "l")]
    Lint,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "lf")]
    LintFix,

    /// Fix formatting issues in the project
    #[command(visible_alias = "f")]
    Fmt,

    /// Check for formatting issues in the project
    #[command(visible_alias = "fc")]
    FmtCheck,

    /// Build documentation
    #[command(visible_alias = "d")]
    Doc,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "dc")]
    DocCheck,

    /// Run all tests
    #[command(visible_alias = "t")]
    Test,

    /// Run unit tests only (skips doc tests)
    #[command(visible_alias = "tu")]
    TestUnit,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintFix => lint_fix(),
            Self::Fmt => fmt(),
            Self::FmtCheck => fmt_check(),
            Self::Doc => doc(),
            Self::DocCheck => doc_check(),
            Self::Test => test(),
            Self::TestUnit => test_unit(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (formatting, clippy, docs, tests)
fn ci() -> Result<()> {
    fmt_check()?;
    lint()?;
    doc_check()?;
    test()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Run clippy on the project
fn lint() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn lint_fix() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix formatting issues in the project
fn fmt() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Check for formatting issues in the project
fn fmt_check() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Build documentation for the workspace
fn doc() -> Result<()> {
    run_cargo(vec!["doc", "--no-deps", "--all-features"])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn doc_check() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        let package_name: String = package.name.to_string();
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                package_name.as_str(),
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Run unit and doc tests
fn test() -> Result<()> {
    test_unit()?;
    // doc tests last because they are the slow part
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run unit tests for the workspace's default packages
fn test_unit() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Connection details for a disposable `MariaDB` container.
struct MariadbContainer {
    name: &'static str,
    database: &'static str,
    user: &'static str,
    password: &'static str,
    /// Host port, off the standard 3306 to avoid clobbering a local server.
    port: &'static str,
}

impl MariadbContainer {
    fn database_url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            self.user, self.password, self.port, self.database
        )
    }

    /// Starts the container and blocks until it accepts connections.
    fn start(&self) -> Result<()> {
        tracing::info!("Checking Docker availability");
        cmd!("docker", "--version")
            .run_with_trace()
            .wrap_err("Docker is not available. Please install Docker.")?;

        self.remove();

        tracing::info!("Starting MariaDB container: {}", self.name);
        cmd!(
            "docker",
            "run",
            "--name",
            self.name,
            "-e",
            format!("MARIADB_DATABASE={}", self.database),
            "-e",
            format!("MARIADB_USER={}", self.user),
            "-e",
            format!("MARIADB_PASSWORD={}", self.password),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{}:3306", self.port),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        self.wait_until_ready()
    }

    fn wait_until_ready(&self) -> Result<()> {
        tracing::info!("Waiting for MariaDB to be ready...");
        for attempt in 1..=30 {
            sleep(Duration::from_secs(1));
            tracing::debug!("Connection attempt {}/30", attempt);

            let probe = cmd!(
                "docker",
                "exec",
                self.name,
                "mariadb",
                "-u",
                self.user,
                format!("-p{}", self.password),
                "-e",
                "SELECT 1"
            )
            .run();

            if probe.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }

        self.remove();
        Err(eyre!("MariaDB did not become ready within timeout"))
    }

    /// Stops and removes the container. Failures are ignored; the
    /// container may simply not exist.
    fn remove(&self) {
        let _ = cmd!("docker", "stop", self.name).run();
        let _ = cmd!("docker", "rm", self.name).run();
    }
}

/// Run `MariaDB` backend validation tests
///
/// Provisions a `MariaDB` 11 container, runs the `#[ignore]`d tests in
/// `sitesafe-persistence` against it, and removes the container whether
/// the tests pass or fail.
fn test_mariadb() -> Result<()> {
    tracing::info!("Starting MariaDB backend validation");

    let container = MariadbContainer {
        name: "sitesafe-test-mariadb",
        database: "sitesafe_test",
        user: "sitesafe",
        password: "test_password",
        port: "3307",
    };
    container.start()?;

    // Filter to the backend_validation_tests module so only the opted-in
    // tests run against the container.
    tracing::info!("Running MariaDB backend validation tests");
    let test_result = cmd!(
        "cargo",
        "test",
        "--package",
        "sitesafe-persistence",
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", container.database_url())
    .env("SITESAFE_TEST_BACKEND", "mysql")
    .run_with_trace();

    container.remove();
    test_result.wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// Verify schema parity between `SQLite` and `MySQL` migrations
///
/// Applies each backend's migration set to a fresh database, introspects
/// the resulting schemas into a normalized structural model, and fails
/// on any mismatch. The `SQLite` side uses an in-memory database; the
/// `MySQL` side uses a disposable `MariaDB` container.
fn verify_migrations() -> Result<()> {
    tracing::info!("Starting schema parity verification");

    let container = MariadbContainer {
        name: "sitesafe-verify-migrations",
        database: "sitesafe_verify",
        user: "sitesafe",
        password: "verify_password",
        port: "3308",
    };
    container.start()?;

    let outcome = run_parity_check(&container);
    container.remove();
    outcome
}

fn run_parity_check(container: &MariadbContainer) -> Result<()> {
    tracing::info!("Applying SQLite migrations");
    let mut sqlite_conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    sqlite_conn
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply SQLite migrations: {e}"))?;

    tracing::info!("Applying MySQL migrations");
    let mut mysql_conn = MysqlConnection::establish(&container.database_url())
        .wrap_err("Failed to connect to MariaDB")?;
    mysql_conn
        .run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply MySQL migrations: {e}"))?;

    tracing::info!("Introspecting schemas");
    let mut sqlite_tables = introspect_sqlite(&mut sqlite_conn)?;
    let mut mysql_tables = introspect_mysql(&mut mysql_conn, container.database)?;

    strip_foreign_key_indexes(&mut sqlite_tables);
    strip_foreign_key_indexes(&mut mysql_tables);

    tracing::info!("Comparing schemas");
    compare_tables(&sqlite_tables, &mysql_tables)?;

    tracing::info!("Schema parity verification passed");
    Ok(())
}

/// Normalized view of one table, comparable across backends.
#[derive(Debug, Default, PartialEq, Eq)]
struct TableSchema {
    columns: BTreeMap<String, ColumnSchema>,
    primary_key: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKeyRef>,
    unique_keys: BTreeSet<Vec<String>>,
    index_keys: BTreeSet<Vec<String>>,
}

#[derive(Debug, PartialEq, Eq)]
struct ColumnSchema {
    kind: &'static str,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKeyRef {
    column: String,
    references_table: String,
    references_column: String,
}

/// Reads the `SQLite` schema into the normalized model.
fn introspect_sqlite(conn: &mut SqliteConnection) -> Result<BTreeMap<String, TableSchema>> {
    #[derive(QueryableByName)]
    struct TableRow {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnRow {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyRow {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexRow {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnRow {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let table_rows: Vec<TableRow> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    let mut tables: BTreeMap<String, TableSchema> = BTreeMap::new();
    for table_row in table_rows {
        let table_name = table_row.name;
        let mut table = TableSchema::default();

        let columns: Vec<ColumnRow> = diesel::sql_query(format!("PRAGMA table_info({table_name})"))
            .load(conn)
            .wrap_err_with(|| format!("Failed to get columns for table {table_name}"))?;
        for column in columns {
            // table_info reports INTEGER PRIMARY KEY columns as nullable;
            // a primary key column never is.
            let nullable = column.notnull == 0 && column.pk == 0;
            if column.pk > 0 {
                table.primary_key.insert(column.name.clone());
            }
            table.columns.insert(
                column.name,
                ColumnSchema {
                    kind: normalize_sqlite_type(&column.r#type),
                    nullable,
                },
            );
        }

        let foreign_keys: Vec<ForeignKeyRow> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({table_name})"))
                .load(conn)
                .wrap_err_with(|| format!("Failed to get foreign keys for table {table_name}"))?;
        for foreign_key in foreign_keys {
            table.foreign_keys.insert(ForeignKeyRef {
                column: foreign_key.from,
                references_table: foreign_key.table,
                references_column: foreign_key.to,
            });
        }

        // origin: "c" = CREATE INDEX, "u" = UNIQUE constraint, "pk" = primary key
        let indexes: Vec<IndexRow> = diesel::sql_query(format!("PRAGMA index_list({table_name})"))
            .load(conn)
            .wrap_err_with(|| format!("Failed to get indexes for table {table_name}"))?;
        for index in indexes {
            let column_rows: Vec<IndexColumnRow> =
                diesel::sql_query(format!("PRAGMA index_info({})", index.name))
                    .load(conn)
                    .wrap_err_with(|| format!("Failed to get index columns for {}", index.name))?;
            let columns: Vec<String> = column_rows.into_iter().map(|row| row.name).collect();
            match index.origin.as_str() {
                "u" => {
                    table.unique_keys.insert(columns);
                }
                "c" => {
                    table.index_keys.insert(columns);
                }
                _ => {}
            }
        }

        tables.insert(table_name, table);
    }

    Ok(tables)
}

/// Reads the `MySQL` schema into the normalized model.
#[allow(clippy::too_many_lines)]
fn introspect_mysql(
    conn: &mut MysqlConnection,
    database: &str,
) -> Result<BTreeMap<String, TableSchema>> {
    #[derive(QueryableByName)]
    struct TableRow {
        #[diesel(sql_type = Text)]
        table_name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnRow {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        data_type: String,
        #[diesel(sql_type = Text)]
        is_nullable: String,
        #[diesel(sql_type = Text)]
        column_key: String,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyRow {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        referenced_table_name: String,
        #[diesel(sql_type = Text)]
        referenced_column_name: String,
    }

    #[derive(QueryableByName)]
    struct UniqueRow {
        #[diesel(sql_type = Text)]
        constraint_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
    }

    #[derive(QueryableByName)]
    struct IndexRow {
        #[diesel(sql_type = Text)]
        index_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = BigInt)]
        non_unique: i64,
    }

    let table_rows: Vec<TableRow> = diesel::sql_query(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = ? AND table_name != '__diesel_schema_migrations' ORDER BY table_name",
    )
    .bind::<Text, _>(database)
    .load(conn)
    .wrap_err("Failed to query MySQL tables")?;

    let mut tables: BTreeMap<String, TableSchema> = BTreeMap::new();
    for table_row in table_rows {
        let table_name = table_row.table_name;
        let mut table = TableSchema::default();

        let columns: Vec<ColumnRow> = diesel::sql_query(
            "SELECT column_name, data_type, is_nullable, column_key \
             FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&table_name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get columns for table {table_name}"))?;
        for column in columns {
            if column.column_key == "PRI" {
                table.primary_key.insert(column.column_name.clone());
            }
            table.columns.insert(
                column.column_name,
                ColumnSchema {
                    kind: normalize_mysql_type(&column.data_type),
                    nullable: column.is_nullable == "YES",
                },
            );
        }

        let foreign_keys: Vec<ForeignKeyRow> = diesel::sql_query(
            "SELECT column_name, referenced_table_name, referenced_column_name \
             FROM information_schema.key_column_usage \
             WHERE table_schema = ? AND table_name = ? AND referenced_table_name IS NOT NULL \
             ORDER BY column_name",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&table_name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get foreign keys for table {table_name}"))?;
        for foreign_key in foreign_keys {
            table.foreign_keys.insert(ForeignKeyRef {
                column: foreign_key.column_name,
                references_table: foreign_key.referenced_table_name,
                references_column: foreign_key.referenced_column_name,
            });
        }

        let unique_rows: Vec<UniqueRow> = diesel::sql_query(
            "SELECT tc.constraint_name, kcu.column_name \
             FROM information_schema.table_constraints tc \
             JOIN information_schema.key_column_usage kcu \
               ON tc.constraint_name = kcu.constraint_name \
               AND tc.table_schema = kcu.table_schema \
               AND tc.table_name = kcu.table_name \
             WHERE tc.constraint_type = 'UNIQUE' \
               AND tc.table_schema = ? \
               AND tc.table_name = ? \
             ORDER BY tc.constraint_name, kcu.ordinal_position",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&table_name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get unique constraints for table {table_name}"))?;
        let mut unique_groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for row in unique_rows {
            unique_groups
                .entry(row.constraint_name)
                .or_default()
                .push(row.column_name);
        }
        for columns in unique_groups.into_values() {
            table.unique_keys.insert(columns);
        }

        // Unique indexes are captured above as constraints; the PRIMARY
        // index is the primary key.
        let index_rows: Vec<IndexRow> = diesel::sql_query(
            "SELECT index_name, column_name, non_unique FROM information_schema.statistics \
             WHERE table_schema = ? AND table_name = ? AND index_name != 'PRIMARY' \
             ORDER BY index_name, seq_in_index",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&table_name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get indexes for table {table_name}"))?;
        let mut index_groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for row in index_rows {
            if row.non_unique == 0 {
                continue;
            }
            index_groups
                .entry(row.index_name)
                .or_default()
                .push(row.column_name);
        }
        for columns in index_groups.into_values() {
            table.index_keys.insert(columns);
        }

        tables.insert(table_name, table);
    }

    Ok(tables)
}

/// Drops single-column indexes that cover a foreign key column. InnoDB
/// creates these implicitly for every foreign key while the `SQLite`
/// migrations create them explicitly, so neither counts as a schema
/// difference.
fn strip_foreign_key_indexes(tables: &mut BTreeMap<String, TableSchema>) {
    for table in tables.values_mut() {
        let fk_columns: BTreeSet<&String> = table.foreign_keys.iter().map(|fk| &fk.column).collect();
        let kept: BTreeSet<Vec<String>> = table
            .index_keys
            .iter()
            .filter(|columns| !(columns.len() == 1 && fk_columns.contains(&columns[0])))
            .cloned()
            .collect();
        table.index_keys = kept;
    }
}

/// Structural comparison. Collects every difference before failing so a
/// drifted migration pair shows up in one run.
fn compare_tables(
    sqlite: &BTreeMap<String, TableSchema>,
    mysql: &BTreeMap<String, TableSchema>,
) -> Result<()> {
    let mut mismatches: Vec<String> = Vec::new();

    for name in sqlite.keys() {
        if !mysql.contains_key(name) {
            mismatches.push(format!("table '{name}' exists in SQLite but not in MySQL"));
        }
    }
    for name in mysql.keys() {
        if !sqlite.contains_key(name) {
            mismatches.push(format!("table '{name}' exists in MySQL but not in SQLite"));
        }
    }

    for (name, sqlite_table) in sqlite {
        let Some(mysql_table) = mysql.get(name) else {
            continue;
        };

        compare_columns(name, sqlite_table, mysql_table, &mut mismatches);

        if sqlite_table.primary_key != mysql_table.primary_key {
            mismatches.push(format!(
                "table '{name}': primary key differs (SQLite {:?}, MySQL {:?})",
                sqlite_table.primary_key, mysql_table.primary_key
            ));
        }
        if sqlite_table.foreign_keys != mysql_table.foreign_keys {
            mismatches.push(format!(
                "table '{name}': foreign keys differ (SQLite {:?}, MySQL {:?})",
                sqlite_table.foreign_keys, mysql_table.foreign_keys
            ));
        }
        if sqlite_table.unique_keys != mysql_table.unique_keys {
            mismatches.push(format!(
                "table '{name}': unique constraints differ (SQLite {:?}, MySQL {:?})",
                sqlite_table.unique_keys, mysql_table.unique_keys
            ));
        }
        if sqlite_table.index_keys != mysql_table.index_keys {
            mismatches.push(format!(
                "table '{name}': indexes differ (SQLite {:?}, MySQL {:?})",
                sqlite_table.index_keys, mysql_table.index_keys
            ));
        }
    }

    if mismatches.is_empty() {
        return Ok(());
    }
    Err(eyre!(
        "Schema parity check failed:\n  {}",
        mismatches.join("\n  ")
    ))
}

fn compare_columns(
    table_name: &str,
    sqlite_table: &TableSchema,
    mysql_table: &TableSchema,
    mismatches: &mut Vec<String>,
) {
    for (column_name, sqlite_column) in &sqlite_table.columns {
        match mysql_table.columns.get(column_name) {
            None => mismatches.push(format!(
                "table '{table_name}': column '{column_name}' exists in SQLite but not in MySQL"
            )),
            Some(mysql_column) => {
                if sqlite_column.kind != mysql_column.kind {
                    mismatches.push(format!(
                        "table '{table_name}', column '{column_name}': type differs \
                         (SQLite {}, MySQL {})",
                        sqlite_column.kind, mysql_column.kind
                    ));
                }
                if sqlite_column.nullable != mysql_column.nullable {
                    mismatches.push(format!(
                        "table '{table_name}', column '{column_name}': nullability differs \
                         (SQLite {}, MySQL {})",
                        sqlite_column.nullable, mysql_column.nullable
                    ));
                }
            }
        }
    }
    for column_name in mysql_table.columns.keys() {
        if !sqlite_table.columns.contains_key(column_name) {
            mismatches.push(format!(
                "table '{table_name}': column '{column_name}' exists in MySQL but not in SQLite"
            ));
        }
    }
}

/// Collapses a `SQLite` column type to the shared representation.
fn normalize_sqlite_type(column_type: &str) -> &'static str {
    let upper = column_type.to_uppercase();
    if upper.contains("INT") {
        "integer"
    } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
        "text"
    } else if upper.contains("BLOB") {
        "blob"
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        "real"
    } else {
        "text"
    }
}

/// Collapses a `MySQL` column type to the shared representation.
fn normalize_mysql_type(data_type: &str) -> &'static str {
    match data_type.to_lowercase().as_str() {
        "tinyint" | "smallint" | "mediumint" | "int" | "bigint" => "integer",
        "decimal" | "numeric" | "float" | "double" => "real",
        "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" => "blob",
        _ => "text",
    }
}

/// Extension trait for `duct::Expression` that traces commands as they run.
trait ExpressionExt {
    /// Log the command, then run it.
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // Repeat the command on failure; the original line may have
            // scrolled away by now.
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
