use derive_more::Display;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Display)]
pub struct UnknownError(BoxedError);

impl std::error::Error for UnknownError {}

impl UnknownError {
    pub fn new(err: BoxedError) -> Self {
        Self(err)
    }
}

impl From<sqlx::error::Error> for UnknownError {
    fn from(err: sqlx::error::Error) -> Self {
        Self::new(err.into())
    }
}

pub mod app {
    use derive_more::Display;
    use salvo::{prelude::StatusError, writer::Json, Piece, Response};
    use serde::Serialize;

    use super::{
        http::ErrorResponse,
        persistence::PersistenceError,
        resource::{NotFoundError, ValidationError},
    };

    pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

    #[derive(Debug, Display, Serialize)]
    pub enum ApplicationError<R> {
        /// Malformed resource, rejected before reaching the store.
        Validation(ValidationError<R>),
        /// Well formed request whose resulting resource is invalid.
        Unprocessable(ValidationError<R>),
        NotFound(NotFoundError),
        Persistence(PersistenceError),
    }

    impl<R> From<NotFoundError> for ApplicationError<R> {
        fn from(err: NotFoundError) -> Self {
            Self::NotFound(err)
        }
    }

    impl<R> From<PersistenceError> for ApplicationError<R> {
        fn from(err: PersistenceError) -> Self {
            Self::Persistence(err)
        }
    }

    impl<R> ApplicationError<R> {
        pub fn status(&self) -> StatusError {
            match self {
                ApplicationError::Validation(_) => StatusError::bad_request(),
                ApplicationError::Unprocessable(_) => StatusError::unprocessable_entity(),
                ApplicationError::NotFound(_) => StatusError::not_found(),
                ApplicationError::Persistence(err) if err.is_constraint_violation() => {
                    StatusError::bad_request()
                }
                ApplicationError::Persistence(_) => StatusError::internal_server_error(),
            }
        }

        /// Short description sent to the client; internal failures never expose their cause.
        pub fn message(&self) -> String {
            match self {
                ApplicationError::Validation(err) | ApplicationError::Unprocessable(err) => {
                    format!("invalid resource {}", err.resource_type)
                }
                ApplicationError::NotFound(err) => err.to_string(),
                ApplicationError::Persistence(err) if err.is_constraint_violation() => {
                    err.to_string()
                }
                ApplicationError::Persistence(_) => INTERNAL_ERROR_MESSAGE.into(),
            }
        }
    }

    impl<R: Serialize + Send> Piece for ApplicationError<R> {
        fn render(self, res: &mut Response) {
            let status = self.status();
            if let ApplicationError::Persistence(err) = &self {
                if !err.is_constraint_violation() {
                    tracing::error!("unexpected persistence failure: {err}");
                }
            }
            let message = self.message();
            res.render(Json(ErrorResponse::new(&status, message, self)));
            res.set_status_error(status);
        }
    }

}

pub mod persistence {
    use std::io;

    use derive_more::Display;
    use serde::Serialize;

    use super::UnknownError;

    pub type SqlState = String;

    /// SQLSTATE class of integrity constraint violations.
    const INTEGRITY_CONSTRAINT_CLASS: &str = "23";

    #[derive(Debug, Display)]
    pub enum PersistenceError {
        #[display(fmt = "database constraint violation: {message}")]
        Constraint { code: SqlState, message: String },
        #[display(fmt = "database persistence error: SQLSTATE {_0:?}")]
        Database(Option<SqlState>),
        #[display(fmt = "persistence layer connection error: {_0}")]
        Connection(io::Error),
        #[display(fmt = "persistence layer timed out")]
        Timeout,
        #[display(fmt = "PersistenceError decoding data")]
        DecodeData,
        #[display(fmt = "PersistenceError data migration")]
        DataMigration,
        #[display(fmt = "unknown persistence error: {_0}")]
        Unknown(UnknownError),
    }

    impl std::error::Error for PersistenceError {}

    impl PersistenceError {
        pub fn from_database(code: Option<SqlState>, message: &str) -> Self {
            match code {
                Some(code) if code.starts_with(INTEGRITY_CONSTRAINT_CLASS) => Self::Constraint {
                    code,
                    message: message.into(),
                },
                code => Self::Database(code),
            }
        }

        pub fn is_constraint_violation(&self) -> bool {
            matches!(self, Self::Constraint { .. })
        }
    }

    impl Serialize for PersistenceError {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_none()
        }
    }

    type SqlxError = sqlx::error::Error;

    impl From<SqlxError> for PersistenceError {
        fn from(err: SqlxError) -> Self {
            match err {
                SqlxError::Configuration(_) => {
                    Self::Connection(io::ErrorKind::InvalidInput.into())
                }
                SqlxError::Database(db) => {
                    Self::from_database(db.code().map(|code| code.into()), db.message())
                }
                SqlxError::Io(io) => Self::Connection(io),
                SqlxError::Tls(_) => Self::Connection(io::ErrorKind::ConnectionRefused.into()),
                SqlxError::Protocol(msg) => {
                    Self::Connection(io::Error::new(io::ErrorKind::InvalidData, msg))
                }
                SqlxError::TypeNotFound { .. } => Self::DecodeData,
                SqlxError::ColumnIndexOutOfBounds { .. } => Self::DecodeData,
                SqlxError::ColumnNotFound(_) => Self::DecodeData,
                SqlxError::ColumnDecode { .. } => Self::DecodeData,
                SqlxError::Decode(_) => Self::DecodeData,
                SqlxError::PoolTimedOut => Self::Timeout,
                SqlxError::PoolClosed => Self::Connection(io::ErrorKind::NotConnected.into()),
                SqlxError::Migrate(_) => Self::DataMigration,
                _ => PersistenceError::Unknown(err.into()),
            }
        }
    }

}

pub mod resource {
    use derive_more::Display;
    use serde::Serialize;
    use uuid::Uuid;

    use crate::base::ResourceID;

    #[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize)]
    pub enum ValidationErrorKind {
        /// Object property names are invalid.
        #[display(fmt = "Validation error kind: property_name {_0}")]
        PropertyName(String),
        /// When a required property is missing.
        Required,

        /// Maximum inclusive string length.
        MaxLength(u64),

        /// Inclusive lower bound exceeded.
        Minimum(u64),
        /// Inclusive higher bound exceeded.
        Maximum(u64),

        /// The input value doesn't match any of specified options.
        #[display(fmt = "Validation error kind: unknown_variant {_0}")]
        UnknownVariant(String),
        /// The input value doesn't match one or multiple required types.
        InvalidType,
        /// Generic kind.
        Invalid,
    }

    impl std::error::Error for ValidationErrorKind {}

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
    pub struct ValidationError<R> {
        /// Resource value
        pub resource: R,
        /// Name of the resource
        pub resource_type: &'static str,
        /// Invalid resource fields
        pub fields: Vec<ValidationFieldError>,
    }

    impl<R> ValidationError<R> {
        pub fn from_resource(resource: R, fields: Vec<ValidationFieldError>) -> Self
        where
            R: ResourceID,
        {
            Self {
                resource,
                resource_type: R::resource_id(),
                fields,
            }
        }
    }

    impl<R> std::fmt::Display for ValidationError<R> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!(
                "Invalid resource {}, fields {:?}",
                self.resource_type, self.fields
            ))
        }
    }

    #[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize)]
    #[display(fmt = "{path}: {value:?}, {kinds:?}")]
    pub struct ValidationFieldError {
        /// Resource field path with invalid value
        pub path: String,
        /// Displayed invalid value
        pub value: String,
        /// Value type id
        pub type_id: &'static str,
        /// Kinds of validation errors
        pub kinds: Vec<ValidationErrorKind>,
    }

    impl std::error::Error for ValidationFieldError {}

    impl ValidationFieldError {
        pub fn from_resource<T>(
            value: String,
            path: String,
            kinds: Vec<ValidationErrorKind>,
        ) -> Self
        where
            T: ResourceID,
        {
            Self {
                path,
                type_id: T::resource_id(),
                value,
                kinds,
            }
        }
    }

    #[derive(Debug, Display, Clone, PartialEq, Eq, Serialize)]
    #[display(fmt = "{resource_name} not found")]
    pub struct NotFoundError {
        /// Resource id
        pub resource_id: Uuid,
        /// Human name of the resource
        pub resource_name: &'static str,
    }

    impl std::error::Error for NotFoundError {}

    impl NotFoundError {
        pub fn user(resource_id: Uuid) -> Self {
            Self {
                resource_id,
                resource_name: "user",
            }
        }
    }
}

pub mod http {
    use derive_more::{Display, Error};
    use salvo::{http::ParseError, prelude::StatusError, writer::Json, Piece, Response};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Display, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
    pub enum BadRequest {
        #[display(fmt = "invalid request content")]
        InvalidContent,
        #[display(fmt = "invalid user id")]
        InvalidId,
    }

    #[derive(Debug, Display, Clone, Serialize, Deserialize)]
    #[display(fmt = "Response error: {title}, {message}")]
    pub struct ErrorResponse<T> {
        pub title: String,
        pub message: String,
        pub error: T,
    }

    impl<T> ErrorResponse<T> {
        pub fn new(status: &StatusError, message: String, err: T) -> Self {
            Self {
                title: status.name.clone(),
                message,
                error: err,
            }
        }
    }

    impl From<ParseError> for BadRequest {
        fn from(_: ParseError) -> Self {
            BadRequest::InvalidContent
        }
    }

    impl Piece for BadRequest {
        fn render(self, res: &mut Response) {
            let status = StatusError::bad_request();
            let message = self.to_string();
            res.render(Json(ErrorResponse::new(&status, message, self)));
            res.set_status_error(status);
        }
    }
}
