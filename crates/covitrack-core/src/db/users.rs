//! User directory database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Role, User};

impl Database {
    /// Insert a new user.
    pub fn insert_user(&self, user: &User) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO users (id, user_name, role, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![user.id, user.user_name, user.role.as_str(), user.created_at],
        )?;
        Ok(())
    }

    /// Get a user by ID.
    pub fn get_user(&self, id: &str) -> DbResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, user_name, role, created_at FROM users WHERE id = ?",
                [id],
                |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        user_name: row.get(1)?,
                        role: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get a user by login name.
    pub fn get_user_by_name(&self, user_name: &str) -> DbResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, user_name, role, created_at FROM users WHERE user_name = ?",
                [user_name],
                |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        user_name: row.get(1)?,
                        role: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }
}

/// Intermediate row struct for database mapping.
struct UserRow {
    id: String,
    user_name: String,
    role: String,
    created_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| DbError::Constraint(format!("Unknown role: {}", row.role)))?;
        Ok(User {
            id: row.id,
            user_name: row.user_name,
            role,
            created_at: row.created_at,
        })
    }
}
