use crate::POOL;
use crate::model::User;
use diesel::prelude::*;
use tokio::task::spawn_blocking;

pub async fn get_user_by_id(_user_id: i32) -> QueryResult<User> {
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        use crate::schema::users::dsl::*;
        users.filter(id.eq(&_user_id)).get_result::<User>(&mut pool)
    })
    .await
    .unwrap()
}

pub async fn get_user_by_email(_email: String) -> QueryResult<User> {
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        use crate::schema::users::dsl::*;
        users.filter(email.eq(&_email)).get_result::<User>(&mut pool)
    })
    .await
    .unwrap()
}

/// Admin users, for dispute fan-out.
pub async fn get_admin_ids() -> QueryResult<Vec<i32>> {
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        use crate::schema::users::dsl::*;
        users
            .filter(is_admin.eq(true))
            .select(id)
            .get_results::<i32>(&mut pool)
    })
    .await
    .unwrap()
}
