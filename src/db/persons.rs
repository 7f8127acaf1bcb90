use rusqlite::{params, Connection, Error as SqlError, ErrorCode};

use crate::error::{StoreError, StoreResult};
use crate::models::Person;

/// Retrieve every person in insertion order. Tables created by other tools
/// may hold NULLs in the data columns; those read as an empty string or 0
/// instead of failing the whole load.
pub fn fetch_persons(conn: &Connection) -> StoreResult<Vec<Person>> {
    let mut stmt = conn
        .prepare("SELECT id, nombre, apellidos, edad FROM Persona ORDER BY id")
        .map_err(query_error("failed to prepare person query"))?;

    let persons = stmt
        .query_map([], |row| {
            Ok(Person {
                id: Some(row.get(0)?),
                first_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                last_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                age: row.get::<_, Option<i64>>(3)?.unwrap_or_default(),
            })
        })
        .map_err(query_error("failed to load persons"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(query_error("failed to collect persons"))?;

    Ok(persons)
}

/// Insert a new row and return the id SQLite generated for it. Any id already
/// set on `person` is ignored.
pub fn insert_person(conn: &Connection, person: &Person) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO Persona (nombre, apellidos, edad) VALUES (?1, ?2, ?3)",
        params![person.first_name, person.last_name, person.age],
    )
    .map_err(write_error("failed to insert person"))?;

    Ok(conn.last_insert_rowid())
}

/// Overwrite the fields of the row with `id`. Touching zero rows is reported
/// as `NotFound` so the UI never claims success for a vanished record.
pub fn update_person(conn: &Connection, id: i64, person: &Person) -> StoreResult<()> {
    let updated = conn
        .execute(
            "UPDATE Persona SET nombre = ?1, apellidos = ?2, edad = ?3 WHERE id = ?4",
            params![person.first_name, person.last_name, person.age, id],
        )
        .map_err(write_error("failed to update person"))?;

    if updated == 0 {
        Err(StoreError::NotFound(id))
    } else {
        Ok(())
    }
}

pub fn delete_person(conn: &Connection, id: i64) -> StoreResult<()> {
    let deleted = conn
        .execute("DELETE FROM Persona WHERE id = ?1", params![id])
        .map_err(query_error("failed to delete person"))?;

    if deleted == 0 {
        Err(StoreError::NotFound(id))
    } else {
        Ok(())
    }
}

fn query_error(context: &'static str) -> impl FnOnce(SqlError) -> StoreError {
    move |source| StoreError::Query { context, source }
}

/// Like `query_error`, but constraint violations get their own variant so the
/// alert can say what was rejected.
fn write_error(context: &'static str) -> impl FnOnce(SqlError) -> StoreError {
    move |source| {
        if matches!(
            source.sqlite_error_code(),
            Some(ErrorCode::ConstraintViolation)
        ) {
            StoreError::Constraint {
                context,
                message: source.to_string(),
            }
        } else {
            StoreError::Query { context, source }
        }
    }
}
