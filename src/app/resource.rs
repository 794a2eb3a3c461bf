macro_rules! resource_response {
    (struct $name:ident; $($field:ident: $field_ty:ty),+ ,) => {
        #[derive(core::fmt::Debug, core::clone::Clone, core::cmp::PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            pub id: Uuid,
            #[serde(rename = "createdAt")]
            pub created: DateTime<Utc>,
            $(pub $field: $field_ty),+
        }
    };
}

pub mod user {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    use crate::base::resource_id;

    /// Body of a user creation; every field is required but kept optional so
    /// missing values are reported as validation errors.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CreateUser {
        pub name: Option<String>,
        pub age: Option<i64>,
        pub gender: Option<String>,
    }

    resource_id!(CreateUser, "user::CreateUser");

    /// Update shape. On `PUT` only the present fields overwrite the stored
    /// user; as a patch target every field must be present after patching.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UpdateUser {
        pub name: Option<String>,
        pub age: Option<i64>,
        pub gender: Option<String>,
    }

    resource_id!(UpdateUser, "user::UpdateUser");

    /// Raw `skip`/`take` query parameters of a listing.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PageQuery {
        pub skip: Option<String>,
        pub take: Option<String>,
    }

    resource_id!(PageQuery, "user::PageQuery");

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ReadUserResponse {
        pub id: Uuid,
        pub name: String,
        pub age: i32,
        pub gender: String,
    }

    resource_id!(ReadUserResponse, "user::ReadUser");

    resource_response! {
        struct UserResponse;
        name: String,
        age: i32,
        gender: String,
    }

    resource_id!(UserResponse, "user::User");
}
