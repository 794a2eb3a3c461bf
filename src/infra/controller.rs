use std::sync::Arc;

use async_trait::async_trait;
use salvo::{
    http::{
        header::{HeaderValue, LOCATION},
        StatusCode,
    },
    writer::Json,
    Depot, FlowCtrl, Handler, Request, Response,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    app::{
        patch::PatchDocument,
        resource::user::{CreateUser, PageQuery, UpdateUser},
        use_case,
    },
    domain::repository::UserRepository,
    error::http::BadRequest,
};

macro_rules! map_res_err {
    ($result:ident, $response:ident) => {
        match $result {
            Err(err) => {
                $response.render(err);
                return;
            }
            Ok(ok) => ok,
        }
    };
}

macro_rules! controller {
    ($name:ident) => {
        pub struct $name<R> {
            repository: Arc<R>,
        }

        impl<R> $name<R> {
            pub fn new(repository: Arc<R>) -> Self {
                Self { repository }
            }
        }
    };
}

/// Parses a user id path segment.
///
/// Ids that are not valid uuids never reach the store.
pub fn parse_user_id(raw: &str) -> Result<Uuid, BadRequest> {
    Uuid::parse_str(raw).map_err(|_| BadRequest::InvalidId)
}

/// Extract a user id from the request id param
fn extract_id(req: &Request) -> Result<Uuid, BadRequest> {
    req.params()
        .get("id")
        .ok_or(BadRequest::InvalidId)
        .and_then(|id| parse_user_id(id))
}

/// Parse the request payload as JSON regardless of the declared content type,
/// so `application/json-patch+json` bodies are accepted as well.
async fn parse_json_body<T: DeserializeOwned>(req: &mut Request) -> Result<T, BadRequest> {
    let payload = req.payload().await?;
    serde_json::from_slice(payload).map_err(|_| BadRequest::InvalidContent)
}

fn user_location(id: Uuid) -> String {
    format!("/v1/users/{id}")
}

controller!(ListUsersController);

#[async_trait]
impl<R: UserRepository + 'static> Handler for ListUsersController<R> {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let query = PageQuery {
            skip: req.query("skip"),
            take: req.query("take"),
        };

        let result = use_case::user::list_users(self.repository.as_ref(), query).await;
        let users = map_res_err!(result, res);

        res.render(Json(users));
        res.set_status_code(StatusCode::OK);
    }
}

controller!(GetUserController);

#[async_trait]
impl<R: UserRepository + 'static> Handler for GetUserController<R> {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = extract_id(req);
        let id = map_res_err!(result, res);

        let result = use_case::user::get_user(self.repository.as_ref(), id).await;
        let user = map_res_err!(result, res);

        res.render(Json(user));
        res.set_status_code(StatusCode::OK);
    }
}

controller!(CreateUserController);

#[async_trait]
impl<R: UserRepository + 'static> Handler for CreateUserController<R> {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result: Result<CreateUser, _> = parse_json_body(req).await;
        let dto = map_res_err!(result, res);

        let result = use_case::user::create_user(self.repository.as_ref(), dto).await;
        let user = map_res_err!(result, res);

        if let Ok(location) = HeaderValue::from_str(&user_location(user.id)) {
            res.headers_mut().insert(LOCATION, location);
        }
        res.render(Json(user));
        res.set_status_code(StatusCode::CREATED);
    }
}

controller!(PatchUserController);

#[async_trait]
impl<R: UserRepository + 'static> Handler for PatchUserController<R> {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = extract_id(req);
        let id = map_res_err!(result, res);

        let result: Result<PatchDocument, _> = parse_json_body(req).await;
        let patch = map_res_err!(result, res);

        let result = use_case::user::patch_user(self.repository.as_ref(), id, patch).await;
        map_res_err!(result, res);

        res.set_status_code(StatusCode::NO_CONTENT);
    }
}

controller!(ReplaceUserController);

#[async_trait]
impl<R: UserRepository + 'static> Handler for ReplaceUserController<R> {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = extract_id(req);
        let id = map_res_err!(result, res);

        let result: Result<UpdateUser, _> = parse_json_body(req).await;
        let dto = map_res_err!(result, res);

        let result = use_case::user::replace_user(self.repository.as_ref(), id, dto).await;
        let user = map_res_err!(result, res);

        res.render(Json(user));
        res.set_status_code(StatusCode::OK);
    }
}

controller!(DeleteUserController);

#[async_trait]
impl<R: UserRepository + 'static> Handler for DeleteUserController<R> {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = extract_id(req);
        let id = map_res_err!(result, res);

        let result = use_case::user::delete_user(self.repository.as_ref(), id).await;
        map_res_err!(result, res);

        res.set_status_code(StatusCode::NO_CONTENT);
    }
}
