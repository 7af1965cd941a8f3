use diesel::prelude::*;

use crate::{
    domain::user::{
        NewUser as DomainNewUser, UpdateUser as DomainUpdateUser, User as DomainUser,
        UserCredentials, UserListQuery,
    },
    models::user::{NewUser as DbNewUser, UpdateUser as DbUpdateUser, User as DbUser},
    repository::{
        DieselRepository, RepositoryResult, UserReader, UserWriter, like_pattern, page_window,
    },
};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::id.eq(id))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn get_credentials_by_mobile(
        &self,
        mobile_no: &str,
    ) -> RepositoryResult<Option<UserCredentials>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::mobile_no.eq(mobile_no.trim()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<DomainUser>)> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let search_pattern = query.search.as_deref().map(like_pattern);
        let role_filter: Option<&str> = query.role.map(Into::into);

        let mut count_query = users::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(
                users::full_name
                    .like(pattern.clone())
                    .or(users::mobile_no.like(pattern.clone()))
                    .or(users::email.like(pattern.clone())),
            );
        }
        if let Some(role) = role_filter {
            count_query = count_query.filter(users::role.eq(role));
        }
        if query.active_only {
            count_query = count_query.filter(users::is_active.eq(true));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = users::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ref pattern) = search_pattern {
            items = items.filter(
                users::full_name
                    .like(pattern.clone())
                    .or(users::mobile_no.like(pattern.clone()))
                    .or(users::email.like(pattern.clone())),
            );
        }
        if let Some(role) = role_filter {
            items = items.filter(users::role.eq(role));
        }
        if query.active_only {
            items = items.filter(users::is_active.eq(true));
        }

        items = items.order(users::full_name.asc());

        if let Some((offset, limit)) = page_window(query.pagination.as_ref()) {
            items = items.offset(offset).limit(limit);
        }

        let db_users = items.load::<DbUser>(&mut conn)?;

        Ok((total, db_users.into_iter().map(Into::into).collect()))
    }

    fn count_users(&self) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let total = users::table.count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &DomainNewUser) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_new = DbNewUser::from(new_user);

        let created = diesel::insert_into(users::table)
            .values(&db_new)
            .get_result::<DbUser>(&mut conn)?;

        Ok(created.into())
    }

    fn update_user(
        &self,
        user_id: i32,
        updates: &DomainUpdateUser,
    ) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateUser::from(updates);

        let updated = diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(&db_updates)
            .get_result::<DbUser>(&mut conn)?;

        Ok(updated.into())
    }
}
