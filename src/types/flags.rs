use bitflags::bitflags;

bitflags! {
    /// Permission flags packed into the `flags` column of a user row.
    ///
    /// Bit positions are frozen once shipped; persisted masks must stay
    /// interpretable across releases.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub struct UserFlags: i64 {
        const IS_VERIFIED = 1 << 0;
        const IS_ADMIN = 1 << 1;
        const IS_BANNED = 1 << 2;
    }
}

impl UserFlags {
    /// Resolves a flag from its canonical name.
    ///
    /// Names are case-sensitive. `"NONE"` belongs to the vocabulary and
    /// resolves to the empty set; anything else unknown resolves to `None`.
    #[must_use]
    pub fn resolve(name: &str) -> Option<Self> {
        if name == "NONE" {
            return Some(Self::empty());
        }
        Self::from_name(name)
    }

    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.contains(Self::IS_VERIFIED)
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.contains(Self::IS_ADMIN)
    }

    #[must_use]
    pub const fn is_banned(&self) -> bool {
        self.contains(Self::IS_BANNED)
    }
}

impl<'de> serde::de::Deserialize<'de> for UserFlags {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor;

        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = UserFlags;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a user flags bitmask")
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(UserFlags::from_bits_truncate(v))
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                i64::try_from(v)
                    .map_err(serde::de::Error::custom)
                    .and_then(|v| self.visit_i64(v))
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse::<i64>()
                    .map_err(serde::de::Error::custom)
                    .and_then(|v| self.visit_i64(v))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

impl serde::Serialize for UserFlags {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl sqlx::Type<sqlx::Sqlite> for UserFlags {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for UserFlags {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> sqlx::encode::IsNull {
        <i64 as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.bits(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for UserFlags {
    fn decode(
        value: sqlx::sqlite::SqliteValueRef<'r>,
    ) -> std::result::Result<Self, sqlx::error::BoxDynError> {
        let bits = <i64 as sqlx::Decode<'r, sqlx::Sqlite>>::decode(value)?;
        Ok(Self::from_bits_truncate(bits))
    }
}
