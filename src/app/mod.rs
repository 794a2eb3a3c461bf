pub mod patch;
pub mod resource;
pub mod use_case;

pub mod transform {
    pub mod user {
        use crate::{
            app::resource::user::{ReadUserResponse, UpdateUser, UserResponse},
            domain::entity::{user::User, Entity},
        };

        impl From<&User> for ReadUserResponse {
            fn from(user: &User) -> Self {
                Self {
                    id: user.ident(),
                    name: user.name().clone(),
                    age: user.age(),
                    gender: user.gender().clone(),
                }
            }
        }

        impl From<&User> for UserResponse {
            fn from(user: &User) -> Self {
                Self {
                    id: user.ident(),
                    created: user.created(),
                    name: user.name().clone(),
                    age: user.age(),
                    gender: user.gender().clone(),
                }
            }
        }

        impl From<&User> for UpdateUser {
            fn from(user: &User) -> Self {
                Self {
                    name: Some(user.name().clone()),
                    age: Some(user.age().into()),
                    gender: Some(user.gender().clone()),
                }
            }
        }
    }
}
