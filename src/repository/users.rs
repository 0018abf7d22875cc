use rusqlite::OptionalExtension;

use super::UserStore;
use crate::db::{is_duplicate, Database};
use crate::error::{Entity, Error, Result, StoreOp};
use crate::models::User;

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

impl UserStore for Database {
    fn get_user(&self, id: i64) -> Result<User> {
        self.run(StoreOp::QueryingUserById, |tx| {
            tx.query_row("SELECT id, name, email FROM users WHERE id = ?1", [id], map_user)
                .optional()
        })?
        .ok_or(Error::NotFound(Entity::User))
    }

    fn get_user_by_email(&self, email: &str) -> Result<User> {
        self.run(StoreOp::QueryingUserByEmail, |tx| {
            tx.query_row(
                "SELECT id, name, email FROM users WHERE email = ?1 ORDER BY id LIMIT 1",
                [email],
                map_user,
            )
            .optional()
        })?
        .ok_or(Error::NotFound(Entity::User))
    }

    fn create_user(&self, user: &User) -> Result<()> {
        self.run(StoreOp::CreatingUser, |tx| {
            tx.execute(
                "INSERT INTO users (id, name, email) VALUES (?1, ?2, ?3)",
                rusqlite::params![user.id, user.name, user.email],
            )
            .map(|_| ())
        })
        .map_err(|e| if is_duplicate(&e) { Error::AlreadyCreated(Entity::User) } else { e })
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let changed = self.run(StoreOp::UpdatingUser, |tx| {
            tx.execute(
                "UPDATE users SET name = ?1, email = ?2 WHERE id = ?3",
                rusqlite::params![user.name, user.email, user.id],
            )
        })?;
        if changed == 0 {
            return Err(Error::NotFound(Entity::User));
        }
        Ok(())
    }
}
