pub mod controller;
pub mod database;

pub mod router {
    use std::sync::Arc;

    use salvo::{logging::Logger, Router};

    use super::controller::*;
    use crate::domain::repository::UserRepository;

    pub fn app<R: UserRepository + 'static>(repository: Arc<R>) -> Router {
        Router::new()
            .push(
                Router::with_path("v1/users")
                    .get(ListUsersController::new(repository.clone()))
                    .post(CreateUserController::new(repository.clone()))
                    .push(
                        Router::with_path("<id>")
                            .get(GetUserController::new(repository.clone()))
                            .patch(PatchUserController::new(repository.clone()))
                            .put(ReplaceUserController::new(repository.clone()))
                            .delete(DeleteUserController::new(repository)),
                    ),
            )
            .hoop(Logger)
    }
}
