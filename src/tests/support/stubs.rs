use async_trait::async_trait;
use uuid::Uuid;

use crate::users::application::ports::outgoing::user_query::{
    PageResult, UserListView, UserProfileView,
};
use crate::users::application::ports::outgoing::user_repository::{CreatedUser, RestoredUser};
use crate::users::application::use_cases::{
    create_user::{CreateUserError, CreateUserInput, ICreateUserUseCase},
    fetch_profile::{FetchProfileError, IFetchProfileUseCase},
    hard_delete_user::{HardDeleteUserError, IHardDeleteUserUseCase},
    list_users::{IListUsersUseCase, ListUsersError, ListUsersParams},
    restore_user::{IRestoreUserUseCase, RestoreUserError},
    soft_delete_user::{ISoftDeleteUserUseCase, SoftDeleteUserError},
    update_user::{IUpdateUserUseCase, UpdateUserError, UpdateUserInput},
};

// Stub use cases: every method panics. A test that reaches one of these
// wired a handler to the wrong use case.

pub struct StubCreateUserUseCase;
#[async_trait]
impl ICreateUserUseCase for StubCreateUserUseCase {
    async fn execute(&self, _input: CreateUserInput) -> Result<CreatedUser, CreateUserError> {
        unimplemented!("not used in this test")
    }
}

pub struct StubUpdateUserUseCase;
#[async_trait]
impl IUpdateUserUseCase for StubUpdateUserUseCase {
    async fn execute(&self, _input: UpdateUserInput) -> Result<(), UpdateUserError> {
        unimplemented!("not used in this test")
    }
}

pub struct StubFetchProfileUseCase;
#[async_trait]
impl IFetchProfileUseCase for StubFetchProfileUseCase {
    async fn execute(&self, _user_id: Uuid) -> Result<UserProfileView, FetchProfileError> {
        unimplemented!("not used in this test")
    }
}

pub struct StubListUsersUseCase;
#[async_trait]
impl IListUsersUseCase for StubListUsersUseCase {
    async fn execute(
        &self,
        _params: ListUsersParams,
    ) -> Result<PageResult<UserListView>, ListUsersError> {
        unimplemented!("not used in this test")
    }
}

pub struct StubSoftDeleteUserUseCase;
#[async_trait]
impl ISoftDeleteUserUseCase for StubSoftDeleteUserUseCase {
    async fn execute(&self, _user_id: Uuid) -> Result<(), SoftDeleteUserError> {
        unimplemented!("not used in this test")
    }
}

pub struct StubRestoreUserUseCase;
#[async_trait]
impl IRestoreUserUseCase for StubRestoreUserUseCase {
    async fn execute(&self, _user_id: Uuid) -> Result<RestoredUser, RestoreUserError> {
        unimplemented!("not used in this test")
    }
}

pub struct StubHardDeleteUserUseCase;
#[async_trait]
impl IHardDeleteUserUseCase for StubHardDeleteUserUseCase {
    async fn execute(&self, _user_id: Uuid) -> Result<(), HardDeleteUserError> {
        unimplemented!("not used in this test")
    }
}
