use sqlx::{postgres::PgRow, Row};

use super::entity::{
    user::{User, UserState},
    EntityData,
};

impl TryFrom<&PgRow> for EntityData {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            created: row.try_get("created")?,
        })
    }
}

impl TryFrom<&PgRow> for UserState {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            name: row.try_get("name")?,
            age: row.try_get("age")?,
            gender: row.try_get("gender")?,
        })
    }
}

impl TryFrom<&PgRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &PgRow) -> Result<Self, Self::Error> {
        Ok(Self::restore(row.try_into()?, row.try_into()?))
    }
}
