use diesel::prelude::*;

use crate::{
    domain::{
        types::{Email, UserId},
        user::{NewUser, UpdateUser, User},
    },
    models::user::{NewUser as DbNewUser, UpdateUser as DbUpdateUser, User as DbUser},
    repository::{
        DieselRepository, UserReader, UserWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::users,
};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let mut conn = self.conn()?;
        let user = users::table
            .find(id.get())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(User::try_from).transpose()?)
    }

    fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(email.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(User::try_from).transpose()?)
    }

    fn list_users(&self) -> RepositoryResult<Vec<User>> {
        let mut conn = self.conn()?;
        let users = users::table
            .order(users::nome.asc())
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        let mut conn = self.conn()?;
        let insertable: DbNewUser = new_user.into();

        let created = diesel::insert_into(users::table)
            .values(&insertable)
            .get_result::<DbUser>(&mut conn)?;

        Ok(User::try_from(created)?)
    }

    fn update_user(&self, id: UserId, updates: &UpdateUser) -> RepositoryResult<User> {
        let mut conn = self.conn()?;
        let changes: DbUpdateUser = updates.into();

        let updated = diesel::update(users::table.find(id.get()))
            .set(&changes)
            .get_result::<DbUser>(&mut conn)?;

        Ok(User::try_from(updated)?)
    }

    fn delete_user(&self, id: UserId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        match diesel::delete(users::table.find(id.get())).execute(&mut conn)? {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }
}
