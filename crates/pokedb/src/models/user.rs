// Copyright 2025 Alexandre D. Díaz
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use rusqlite::{params, ToSql};
use serde::Deserialize;

use crate::error::{is_unique_violation, Error, Result};
use crate::models::{non_empty, Connection};
use crate::utils::date::get_sqlite_utc_now;

pub static TABLE_NAME: &str = "users";

/// A stored user. `password` holds an Argon2 PHC string; this struct is
/// never serialized directly.
#[derive(Debug, Clone)]
pub struct Model {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub username: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct NewUser {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

pub fn create_table(conn: &Connection) -> rusqlite::Result<usize> {
    conn.execute(
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
            id integer primary key,
            email text not null,
            password text not null,
            username text not null,
            firstname text,
            lastname text,
            created_at text not null
        )",
            &TABLE_NAME
        )
        .as_str(),
        params![],
    )?;
    conn.execute(
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS uniq_users_email ON {}(email)",
            &TABLE_NAME
        )
        .as_str(),
        params![],
    )?;
    conn.execute(
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS uniq_users_username ON {}(username)",
            &TABLE_NAME
        )
        .as_str(),
        params![],
    )
}

fn query(conn: &Connection, extra_sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Model>> {
    let sql: String = format!(
        "SELECT us.id, us.email, us.password, us.username, us.firstname, us.lastname, us.created_at \
    FROM {} as us \
    {}",
        &TABLE_NAME, &extra_sql
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, |row| {
        Ok(Model {
            id: row.get(0)?,
            email: row.get(1)?,
            password: row.get(2)?,
            username: row.get(3)?,
            firstname: row.get(4)?,
            lastname: row.get(5)?,
            created_at: row.get(6)?,
        })
    })?;
    let records = rows.collect::<rusqlite::Result<Vec<Model>>>()?;
    Ok(records)
}

pub fn get_all(conn: &Connection) -> Result<Vec<Model>> {
    query(conn, "ORDER BY us.id", params![])
}

pub fn get_by_id(conn: &Connection, user_id: &i64) -> Result<Option<Model>> {
    let users = query(conn, "WHERE us.id = ?1 LIMIT 1", params![&user_id])?;
    Ok(users.into_iter().next())
}

pub fn exists(conn: &Connection, user_id: &i64) -> Result<bool> {
    Ok(get_by_id(conn, user_id)?.is_some())
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| Error::Hash(err.to_string()))
}

pub fn create(conn: &Connection, new_user: &NewUser) -> Result<Model> {
    let (email, password, username) = match (
        non_empty(&new_user.email),
        non_empty(&new_user.password),
        non_empty(&new_user.username),
    ) {
        (Some(email), Some(password), Some(username)) => (email, password, username),
        _ => return Err(Error::MissingData),
    };
    let firstname = non_empty(&new_user.firstname).map(str::to_string);
    let lastname = non_empty(&new_user.lastname).map(str::to_string);
    let password_hash = hash_password(password)?;
    let created_at = get_sqlite_utc_now();
    conn.execute(
        format!(
            "INSERT INTO {}(email, password, username, firstname, lastname, created_at) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            &TABLE_NAME
        )
        .as_str(),
        params![&email, &password_hash, &username, &firstname, &lastname, &created_at],
    )
    .map_err(|err| {
        if is_unique_violation(&err) {
            Error::Conflict("User already exists".to_string())
        } else {
            Error::from(err)
        }
    })?;
    log::info!("user '{}' created", &username);
    Ok(Model {
        id: conn.last_insert_rowid(),
        email: email.to_string(),
        password: password_hash,
        username: username.to_string(),
        firstname,
        lastname,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_pool;

    fn ash() -> NewUser {
        NewUser {
            email: Some("ash@pallet.town".to_string()),
            password: Some("pikachu".to_string()),
            username: Some("ash".to_string()),
            firstname: Some("Ash".to_string()),
            lastname: None,
        }
    }

    #[test]
    fn create_and_fetch() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let user = create(&conn, &ash()).unwrap();
        let fetched = get_by_id(&conn, &user.id).unwrap().unwrap();
        assert_eq!(fetched.username, "ash");
        assert_eq!(fetched.firstname.as_deref(), Some("Ash"));
        assert_eq!(fetched.lastname, None);
        assert_eq!(get_all(&conn).unwrap().len(), 1);
    }

    #[test]
    fn password_is_hashed() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let user = create(&conn, &ash()).unwrap();
        assert_ne!(user.password, "pikachu");
        assert!(user.password.starts_with("$argon2"));
    }

    #[test]
    fn missing_required_field() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let mut new_user = ash();
        new_user.email = None;
        assert!(matches!(create(&conn, &new_user), Err(Error::MissingData)));
        new_user.email = Some("   ".to_string());
        assert!(matches!(create(&conn, &new_user), Err(Error::MissingData)));
        assert!(get_all(&conn).unwrap().is_empty());
    }

    #[test]
    fn duplicated_email_or_username() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        create(&conn, &ash()).unwrap();
        assert!(matches!(create(&conn, &ash()), Err(Error::Conflict(_))));

        let mut same_email = ash();
        same_email.username = Some("misty".to_string());
        assert!(matches!(create(&conn, &same_email), Err(Error::Conflict(_))));

        let mut same_username = ash();
        same_username.email = Some("other@pallet.town".to_string());
        assert!(matches!(create(&conn, &same_username), Err(Error::Conflict(_))));
        assert_eq!(get_all(&conn).unwrap().len(), 1);
    }

    #[test]
    fn unknown_id() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        assert!(get_by_id(&conn, &42).unwrap().is_none());
    }
}
