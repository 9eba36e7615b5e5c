use sqlx::FromRow;

use crate::database::{Connection, ErrorExt, Result};
use crate::types::{UserFlags, UserId};

#[derive(Debug, FromRow, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub flags: UserFlags,
}

impl User {
    /// Sets the given flag bit(s) on the in-memory mask.
    ///
    /// Adding an already-set flag is a no-op.
    pub fn add_flag(&mut self, flag: UserFlags) {
        self.flags |= flag;
    }

    /// Clears the given flag bit(s) from the in-memory mask.
    ///
    /// Removing an unset flag is a no-op.
    pub fn remove_flag(&mut self, flag: UserFlags) {
        self.flags &= !flag;
    }

    /// Whether any of the given bit(s) are currently set.
    #[must_use]
    pub const fn has_flag(&self, flag: UserFlags) -> bool {
        self.flags.intersects(flag)
    }
}

impl User {
    #[tracing::instrument(skip_all, name = "db.query.users.find")]
    pub async fn by_id(conn: &mut Connection, id: UserId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE id = ?"#)
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.query.users.insert")]
    pub async fn insert(conn: &mut Connection, username: &str) -> Result<Self> {
        sqlx::query_as::<_, Self>(r#"INSERT INTO "users" (username) VALUES (?) RETURNING *"#)
            .bind(username)
            .fetch_one(conn)
            .await
            .into_db_error()
    }

    /// ORs the given bits into the stored mask and returns the updated row,
    /// or `None` if no such user exists.
    ///
    /// The update happens in a single statement so two concurrent additions
    /// cannot overwrite each other's bit.
    #[tracing::instrument(skip_all, name = "db.query.users.add_flags")]
    pub async fn add_flags(
        conn: &mut Connection,
        id: UserId,
        flags: UserFlags,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"UPDATE "users" SET flags = flags | ? WHERE id = ? RETURNING *"#)
            .bind(flags)
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    /// Clears the given bits from the stored mask, single-statement
    /// counterpart of [`User::add_flags`].
    #[tracing::instrument(skip_all, name = "db.query.users.remove_flags")]
    pub async fn remove_flags(
        conn: &mut Connection,
        id: UserId,
        flags: UserFlags,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE "users" SET flags = flags & ~? WHERE id = ? RETURNING *"#,
        )
        .bind(flags)
        .bind(id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Pool;

    #[tokio::test]
    async fn should_insert_with_zeroed_flags() {
        let pool = Pool::connect_for_tests().await;
        let mut conn = pool.get().await.unwrap();

        let user = User::insert(&mut conn, "alice").await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.flags, UserFlags::empty());

        let found = User::by_id(&mut conn, user.id).await.unwrap().unwrap();
        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn should_resolve_missing_users_to_none() {
        let pool = Pool::connect_for_tests().await;
        let mut conn = pool.get().await.unwrap();

        let id = UserId(9999);
        assert_eq!(User::by_id(&mut conn, id).await.unwrap(), None);
        assert_eq!(
            User::add_flags(&mut conn, id, UserFlags::IS_ADMIN).await.unwrap(),
            None
        );
        assert_eq!(
            User::remove_flags(&mut conn, id, UserFlags::IS_ADMIN).await.unwrap(),
            None
        );

        // none of the above may create a row as a side effect
        assert_eq!(User::by_id(&mut conn, id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn should_or_and_clear_stored_bits() {
        let pool = Pool::connect_for_tests().await;
        let mut conn = pool.get().await.unwrap();

        let user = User::insert(&mut conn, "alice").await.unwrap();
        assert_eq!(user.flags.bits(), 0);

        let user = User::add_flags(&mut conn, user.id, UserFlags::IS_ADMIN)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.flags.bits(), 2);

        let user = User::add_flags(&mut conn, user.id, UserFlags::IS_VERIFIED)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.flags.bits(), 3);

        let user = User::remove_flags(&mut conn, user.id, UserFlags::IS_ADMIN)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.flags.bits(), 1);
    }

    #[tokio::test]
    async fn stored_flag_updates_should_be_idempotent() {
        let pool = Pool::connect_for_tests().await;
        let mut conn = pool.get().await.unwrap();

        let user = User::insert(&mut conn, "alice").await.unwrap();
        for _ in 0..2 {
            let user = User::add_flags(&mut conn, user.id, UserFlags::IS_BANNED)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(user.flags, UserFlags::IS_BANNED);
        }

        for _ in 0..2 {
            let user = User::remove_flags(&mut conn, user.id, UserFlags::IS_BANNED)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(user.flags, UserFlags::empty());
        }
    }

    fn all_subsets() -> Vec<UserFlags> {
        (0..8).map(UserFlags::from_bits_truncate).collect()
    }

    #[test]
    fn entity_ops_should_keep_bits_independent() {
        for &s in &all_subsets() {
            for &t in &all_subsets() {
                let mut user = User {
                    id: UserId(1),
                    username: "alice".to_string(),
                    flags: t,
                };

                user.add_flag(s);
                assert_eq!(user.flags, t | s);
                for flag in s.iter() {
                    assert!(user.has_flag(flag));
                }

                user.remove_flag(s);
                assert_eq!(user.flags, t & !s);
                for flag in s.iter() {
                    assert!(!user.has_flag(flag));
                }
            }
        }
    }

    #[test]
    fn entity_ops_should_be_idempotent() {
        let mut user = User {
            id: UserId(1),
            username: "alice".to_string(),
            flags: UserFlags::IS_BANNED,
        };

        user.add_flag(UserFlags::IS_ADMIN);
        let once = user.flags;
        user.add_flag(UserFlags::IS_ADMIN);
        assert_eq!(user.flags, once);

        user.remove_flag(UserFlags::IS_ADMIN);
        let once = user.flags;
        user.remove_flag(UserFlags::IS_ADMIN);
        assert_eq!(user.flags, once);
    }

    #[test]
    fn has_flag_should_match_on_any_overlap() {
        let user = User {
            id: UserId(1),
            username: "alice".to_string(),
            flags: UserFlags::IS_VERIFIED,
        };

        assert!(user.has_flag(UserFlags::IS_VERIFIED | UserFlags::IS_ADMIN));
        assert!(!user.has_flag(UserFlags::IS_ADMIN));
        // the empty set never matches
        assert!(!user.has_flag(UserFlags::empty()));
    }
}
