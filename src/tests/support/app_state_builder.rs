use actix_web::web;
use std::sync::Arc;

use crate::tests::support::stubs::*;
use crate::users::application::use_cases::{
    create_user::ICreateUserUseCase, fetch_profile::IFetchProfileUseCase,
    hard_delete_user::IHardDeleteUserUseCase, list_users::IListUsersUseCase,
    restore_user::IRestoreUserUseCase, soft_delete_user::ISoftDeleteUserUseCase,
    update_user::IUpdateUserUseCase,
};
use crate::AppState;

/// Builds an `AppState` where every use case is a panicking stub unless a
/// test swaps in its own mock.
pub struct TestAppStateBuilder {
    create_user: Arc<dyn ICreateUserUseCase + Send + Sync>,
    update_user: Arc<dyn IUpdateUserUseCase + Send + Sync>,
    fetch_profile: Arc<dyn IFetchProfileUseCase + Send + Sync>,
    list_users: Arc<dyn IListUsersUseCase + Send + Sync>,
    soft_delete_user: Arc<dyn ISoftDeleteUserUseCase + Send + Sync>,
    restore_user: Arc<dyn IRestoreUserUseCase + Send + Sync>,
    hard_delete_user: Arc<dyn IHardDeleteUserUseCase + Send + Sync>,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self {
            create_user: Arc::new(StubCreateUserUseCase),
            update_user: Arc::new(StubUpdateUserUseCase),
            fetch_profile: Arc::new(StubFetchProfileUseCase),
            list_users: Arc::new(StubListUsersUseCase),
            soft_delete_user: Arc::new(StubSoftDeleteUserUseCase),
            restore_user: Arc::new(StubRestoreUserUseCase),
            hard_delete_user: Arc::new(StubHardDeleteUserUseCase),
        }
    }
}

impl TestAppStateBuilder {
    pub fn with_create_user(
        mut self,
        use_case: impl ICreateUserUseCase + Send + Sync + 'static,
    ) -> Self {
        self.create_user = Arc::new(use_case);
        self
    }

    pub fn with_update_user(
        mut self,
        use_case: impl IUpdateUserUseCase + Send + Sync + 'static,
    ) -> Self {
        self.update_user = Arc::new(use_case);
        self
    }

    pub fn with_fetch_profile(
        mut self,
        use_case: impl IFetchProfileUseCase + Send + Sync + 'static,
    ) -> Self {
        self.fetch_profile = Arc::new(use_case);
        self
    }

    pub fn with_list_users(
        mut self,
        use_case: impl IListUsersUseCase + Send + Sync + 'static,
    ) -> Self {
        self.list_users = Arc::new(use_case);
        self
    }

    pub fn with_soft_delete_user(
        mut self,
        use_case: impl ISoftDeleteUserUseCase + Send + Sync + 'static,
    ) -> Self {
        self.soft_delete_user = Arc::new(use_case);
        self
    }

    pub fn with_restore_user(
        mut self,
        use_case: impl IRestoreUserUseCase + Send + Sync + 'static,
    ) -> Self {
        self.restore_user = Arc::new(use_case);
        self
    }

    pub fn with_hard_delete_user(
        mut self,
        use_case: impl IHardDeleteUserUseCase + Send + Sync + 'static,
    ) -> Self {
        self.hard_delete_user = Arc::new(use_case);
        self
    }

    pub fn build(self) -> web::Data<AppState> {
        web::Data::new(AppState {
            create_user_use_case: self.create_user,
            update_user_use_case: self.update_user,
            fetch_profile_use_case: self.fetch_profile,
            list_users_use_case: self.list_users,
            soft_delete_user_use_case: self.soft_delete_user,
            restore_user_use_case: self.restore_user,
            hard_delete_user_use_case: self.hard_delete_user,
        })
    }
}
