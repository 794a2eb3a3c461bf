pub mod user {
    use uuid::Uuid;

    use crate::{
        app::{
            patch::PatchDocument,
            resource::user::{CreateUser, PageQuery, ReadUserResponse, UpdateUser, UserResponse},
        },
        domain::{entity::Entity, repository::UserRepository},
        error::{
            app::ApplicationError,
            resource::{NotFoundError, ValidationError},
        },
    };

    pub(crate) mod validation {
        use crate::{
            app::resource::user::PageQuery,
            domain::{datatype::JsonPointer, entity::user::User, repository::Page},
            error::resource::{ValidationErrorKind, ValidationFieldError},
        };

        pub const NAME_MAX_LENGTH: u64 = 50;
        pub const AGE_MINIMUM: i64 = 1;
        pub const AGE_MAXIMUM: i64 = 120;

        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum Presence {
            Required,
            Optional,
        }

        /// Validated values of the user fields that were supplied.
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct UserChanges {
            pub name: Option<String>,
            pub age: Option<i32>,
            pub gender: Option<String>,
        }

        impl UserChanges {
            /// Overwrites the supplied fields, returning whether any stored value changed.
            pub fn apply_to(self, user: &mut User) -> bool {
                let mut changed = false;
                if let Some(name) = self.name {
                    changed |= user.set_name(name);
                }
                if let Some(age) = self.age {
                    changed |= user.set_age(age);
                }
                if let Some(gender) = self.gender {
                    changed |= user.set_gender(gender);
                }
                changed
            }
        }

        fn field_path(field: &str) -> String {
            JsonPointer::root().push(field).to_string()
        }

        fn text(
            field: &str,
            value: Option<&str>,
            max_length: Option<u64>,
            presence: Presence,
        ) -> Result<Option<String>, ValidationFieldError> {
            let value = match value {
                None if presence == Presence::Optional => return Ok(None),
                None => "",
                Some(value) => value,
            };

            let mut kinds = Vec::new();
            if value.trim().is_empty() {
                kinds.push(ValidationErrorKind::Required);
            }
            // the store rejects NUL bytes in text columns
            if value.chars().any(char::is_control) {
                kinds.push(ValidationErrorKind::Invalid);
            }
            if let Some(max) = max_length {
                if value.chars().count() as u64 > max {
                    kinds.push(ValidationErrorKind::MaxLength(max));
                }
            }

            if kinds.is_empty() {
                return Ok(Some(value.into()));
            }
            Err(ValidationFieldError::from_resource::<String>(
                value.into(),
                field_path(field),
                kinds,
            ))
        }

        fn age(value: Option<i64>, presence: Presence) -> Result<Option<i32>, ValidationFieldError> {
            let kinds = match value {
                None if presence == Presence::Optional => return Ok(None),
                None => vec![ValidationErrorKind::Required],
                Some(age) if age < AGE_MINIMUM => {
                    vec![ValidationErrorKind::Minimum(AGE_MINIMUM as u64)]
                }
                Some(age) if age > AGE_MAXIMUM => {
                    vec![ValidationErrorKind::Maximum(AGE_MAXIMUM as u64)]
                }
                Some(age) => match i32::try_from(age) {
                    Ok(age) => return Ok(Some(age)),
                    Err(_) => vec![ValidationErrorKind::InvalidType],
                },
            };

            Err(ValidationFieldError::from_resource::<i64>(
                value.map(|age| age.to_string()).unwrap_or_default(),
                field_path("age"),
                kinds,
            ))
        }

        fn collect<T>(
            result: Result<Option<T>, ValidationFieldError>,
            errors: &mut Vec<ValidationFieldError>,
        ) -> Option<T> {
            result.unwrap_or_else(|err| {
                errors.push(err);
                None
            })
        }

        pub fn user_changes(
            name: Option<&str>,
            age_value: Option<i64>,
            gender: Option<&str>,
            presence: Presence,
        ) -> Result<UserChanges, Vec<ValidationFieldError>> {
            let mut errors = Vec::new();
            let changes = UserChanges {
                name: collect(text("name", name, Some(NAME_MAX_LENGTH), presence), &mut errors),
                age: collect(age(age_value, presence), &mut errors),
                gender: collect(text("gender", gender, None, presence), &mut errors),
            };

            if errors.is_empty() {
                Ok(changes)
            } else {
                Err(errors)
            }
        }

        pub fn new_user(
            name: Option<&str>,
            age: Option<i64>,
            gender: Option<&str>,
        ) -> Result<User, Vec<ValidationFieldError>> {
            match user_changes(name, age, gender, Presence::Required)? {
                UserChanges {
                    name: Some(name),
                    age: Some(age),
                    gender: Some(gender),
                } => Ok(User::new(name, age, gender)),
                _ => Err(Vec::new()),
            }
        }

        fn page_param(
            field: &str,
            value: Option<&str>,
            default: u64,
            minimum: u64,
        ) -> Result<u64, ValidationFieldError> {
            let Some(raw) = value else {
                return Ok(default);
            };
            let kinds = match raw.trim().parse::<u64>() {
                Ok(parsed) if parsed >= minimum => return Ok(parsed),
                Ok(_) => vec![ValidationErrorKind::Minimum(minimum)],
                Err(_) => vec![ValidationErrorKind::InvalidType],
            };
            Err(ValidationFieldError::from_resource::<u64>(
                raw.into(),
                field_path(field),
                kinds,
            ))
        }

        pub fn page(query: &PageQuery) -> Result<Page, Vec<ValidationFieldError>> {
            let skip = page_param("skip", query.skip.as_deref(), Page::DEFAULT_SKIP, 0);
            let take = page_param("take", query.take.as_deref(), Page::DEFAULT_TAKE, 1);
            match (skip, take) {
                (Ok(skip), Ok(take)) => Ok(Page { skip, take }),
                (skip, take) => Err(skip.err().into_iter().chain(take.err()).collect()),
            }
        }
    }

    use validation::{Presence, UserChanges};

    pub async fn list_users<R: UserRepository>(
        repository: &R,
        query: PageQuery,
    ) -> Result<Vec<ReadUserResponse>, ApplicationError<PageQuery>> {
        let page = validation::page(&query).map_err(|fields| {
            ApplicationError::Validation(ValidationError::from_resource(query.clone(), fields))
        })?;

        let users = repository.find_users(page).await?;
        Ok(users.iter().map(ReadUserResponse::from).collect())
    }

    pub async fn get_user<R: UserRepository>(
        repository: &R,
        id: Uuid,
    ) -> Result<ReadUserResponse, ApplicationError<()>> {
        let user = repository
            .find_user(id)
            .await?
            .ok_or_else(|| NotFoundError::user(id))?;
        Ok(ReadUserResponse::from(&user))
    }

    pub async fn create_user<R: UserRepository>(
        repository: &R,
        dto: CreateUser,
    ) -> Result<UserResponse, ApplicationError<CreateUser>> {
        let user = validation::new_user(dto.name.as_deref(), dto.age, dto.gender.as_deref())
            .map_err(|fields| {
                tracing::warn!("rejected user creation with {} invalid fields", fields.len());
                ApplicationError::Validation(ValidationError::from_resource(dto.clone(), fields))
            })?;

        repository.insert_user(&user).await?;
        tracing::info!("created user {}", user.ident());

        Ok(UserResponse::from(&user))
    }

    /// Applies a patch document over the stored user and persists it once the
    /// patched result passes validation.
    pub async fn patch_user<R: UserRepository>(
        repository: &R,
        id: Uuid,
        patch: PatchDocument,
    ) -> Result<(), ApplicationError<UpdateUser>> {
        let mut user = repository
            .find_user(id)
            .await?
            .ok_or_else(|| NotFoundError::user(id))?;

        let mut target = UpdateUser::from(&user);
        let mut fields = patch.apply_to(&mut target);

        let changes = validation::user_changes(
            target.name.as_deref(),
            target.age,
            target.gender.as_deref(),
            Presence::Required,
        );
        let changes = match changes {
            Ok(changes) if fields.is_empty() => changes,
            Ok(_) => UserChanges::default(),
            Err(errors) => {
                fields.extend(errors);
                UserChanges::default()
            }
        };
        if !fields.is_empty() {
            tracing::warn!("rejected patch of user {id} with {} errors", fields.len());
            return Err(ApplicationError::Unprocessable(
                ValidationError::from_resource(target, fields),
            ));
        }

        if changes.apply_to(&mut user) {
            if !repository.update_user(&user).await? {
                return Err(NotFoundError::user(id).into());
            }
            tracing::info!("patched user {id}");
        }

        Ok(())
    }

    /// Overwrites the supplied fields of the stored user, leaving the omitted ones untouched.
    pub async fn replace_user<R: UserRepository>(
        repository: &R,
        id: Uuid,
        dto: UpdateUser,
    ) -> Result<UserResponse, ApplicationError<UpdateUser>> {
        let changes = validation::user_changes(
            dto.name.as_deref(),
            dto.age,
            dto.gender.as_deref(),
            Presence::Optional,
        )
        .map_err(|fields| {
            tracing::warn!("rejected update of user {id} with {} invalid fields", fields.len());
            ApplicationError::Validation(ValidationError::from_resource(dto.clone(), fields))
        })?;

        let mut user = repository
            .find_user(id)
            .await?
            .ok_or_else(|| NotFoundError::user(id))?;

        if changes.apply_to(&mut user) {
            if !repository.update_user(&user).await? {
                return Err(NotFoundError::user(id).into());
            }
            tracing::info!("updated user {id}");
        }

        Ok(UserResponse::from(&user))
    }

    pub async fn delete_user<R: UserRepository>(
        repository: &R,
        id: Uuid,
    ) -> Result<(), ApplicationError<()>> {
        let user = repository
            .find_user(id)
            .await?
            .ok_or_else(|| NotFoundError::user(id))?;

        if !repository.delete_user(&user).await? {
            return Err(NotFoundError::user(id).into());
        }
        tracing::info!("deleted user {id}");

        Ok(())
    }

}
