//! Statement text for the catalog operations.
//!
//! Identifiers are interpolated as backtick-quoted MySQL identifiers; MySQL
//! cannot bind identifiers as parameters.

use crate::error::{DbError, DbResult};

pub const SHOW_DATABASES: &str = "SHOW DATABASES";

/// Quote an identifier for MySQL. Embedded backticks are doubled.
///
/// `field` names the caller argument the identifier came from, for the error.
pub fn quote_identifier(field: &str, ident: &str) -> DbResult<String> {
    if ident.contains('\0') {
        return Err(DbError::validation(field, "must not contain NUL characters"));
    }
    Ok(format!("`{}`", ident.replace('`', "``")))
}

/// `SHOW TABLES`, optionally scoped to a database.
pub fn show_tables(database: Option<&str>) -> DbResult<String> {
    match database {
        Some(db) => Ok(format!("SHOW TABLES FROM {}", quote_identifier("database", db)?)),
        None => Ok("SHOW TABLES".to_string()),
    }
}

/// `DESCRIBE`, optionally qualified with a database.
pub fn describe_table(table: &str, database: Option<&str>) -> DbResult<String> {
    let table = quote_identifier("table", table)?;
    match database {
        Some(db) => Ok(format!(
            "DESCRIBE {}.{}",
            quote_identifier("database", db)?,
            table
        )),
        None => Ok(format!("DESCRIBE {}", table)),
    }
}
