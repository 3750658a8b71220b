//! Startup DDL: create the database and the `alunos` table when missing.

use crate::config::TABLE_NAME;
use crate::error::{AppError, ConfigError};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Create the `alunos` table if not exists. Columns follow the catalog; `dataNascimento` keeps its camel-case name.
pub async fn ensure_alunos_table(pool: &PgPool) -> Result<(), AppError> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            "id" BIGSERIAL PRIMARY KEY,
            "nome" TEXT NOT NULL,
            "email" TEXT,
            "telefone" TEXT NOT NULL,
            "sexo" TEXT NOT NULL,
            "dataNascimento" DATE NOT NULL,
            "faixa" TEXT NOT NULL,
            "grau" TEXT NOT NULL,
            "plano" TEXT NOT NULL,
            "foto" TEXT
        )
        "#,
        quote_ident(TABLE_NAME)
    );
    sqlx::query(&ddl).execute(pool).await?;
    let alter_foto = format!("ALTER TABLE {} ADD COLUMN IF NOT EXISTS \"foto\" TEXT", quote_ident(TABLE_NAME));
    sqlx::query(&alter_foto).execute(pool).await?;
    tracing::info!(table = TABLE_NAME, "table ready");
    Ok(())
}

/// Connect to the server's `postgres` database and create the target database if it does not exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url).map_err(|e| ConfigError::InvalidValue {
        key: "DATABASE_URL",
        value: admin_url.clone(),
        reason: e.to_string(),
    })?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| ConfigError::InvalidValue {
            key: "DATABASE_URL",
            value: url.to_string(),
            reason: "no database path".into(),
        })?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((name, query)) => (name.trim(), Some(query)),
        None => (path_and_query.trim(), None),
    };
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = match query {
        Some(query) => format!("{}postgres?{}", base, query),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
