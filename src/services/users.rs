use serde_json::Value;

use crate::domain::types::UserId;
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::dto::user::{CREATE_USER_SCHEMA, CreateUserPayload, UPDATE_USER_SCHEMA, UpdateUserPayload};
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::validation::parse_payload;

pub fn list_users<R>(repo: &R) -> ServiceResult<Vec<User>>
where
    R: UserReader + ?Sized,
{
    Ok(repo.list_users()?)
}

pub fn get_user<R>(repo: &R, user_id: i32) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    repo.get_user_by_id(UserId::new(user_id)?)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a user; the email must not be taken.
pub fn create_user<R>(repo: &R, payload: Value) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    let payload: CreateUserPayload = parse_payload(&CREATE_USER_SCHEMA, payload)?;
    let new_user = NewUser::try_from(payload)?;

    if repo.get_user_by_email(&new_user.email)?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "email {} is already registered",
            new_user.email
        )));
    }
    Ok(repo.create_user(&new_user)?)
}

pub fn update_user<R>(repo: &R, user_id: i32, payload: Value) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    let user_id = UserId::new(user_id)?;
    let payload: UpdateUserPayload = parse_payload(&UPDATE_USER_SCHEMA, payload)?;
    let updates = UpdateUser::try_from(payload)?;

    if updates.is_empty() {
        return repo.get_user_by_id(user_id)?.ok_or(ServiceError::NotFound);
    }
    if let Some(email) = &updates.email {
        if let Some(owner) = repo.get_user_by_email(email)? {
            if owner.id != user_id {
                return Err(ServiceError::Conflict(format!(
                    "email {email} is already registered"
                )));
            }
        }
    }
    Ok(repo.update_user(user_id, &updates)?)
}

pub fn delete_user<R>(repo: &R, user_id: i32) -> ServiceResult<()>
where
    R: UserWriter + ?Sized,
{
    repo.delete_user(UserId::new(user_id)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::types::{Email, Label, PersonName};
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures;

    fn user(id: i32, email: &str) -> User {
        User {
            id: UserId::new(id).unwrap(),
            nome: PersonName::new("Operador").unwrap(),
            email: Email::new(email).unwrap(),
            papel: Label::new("usuario").unwrap(),
            created_at: fixtures::timestamp(),
        }
    }

    #[test]
    fn taken_email_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email()
            .returning(|email| Ok(Some(user(1, email.as_str()))));
        repo.expect_create_user().never();

        let result = create_user(&repo, json!({"nome": "Rita", "email": "rita@example.com"}));
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn keeping_own_email_is_allowed() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email()
            .returning(|email| Ok(Some(user(2, email.as_str()))));
        repo.expect_update_user()
            .times(1)
            .returning(|id, _| Ok(user(id.get(), "rita@example.com")));

        let updated = update_user(&repo, 2, json!({"email": "Rita@Example.com"})).unwrap();
        assert_eq!(updated.id.get(), 2);
    }
}
