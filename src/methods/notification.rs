use diesel::prelude::*;
use tokio::task::spawn_blocking;

use crate::model::{NewNotification, NotificationKind};
use crate::{POOL, methods};

/// Fire-and-forget. Runs after the primary mutation has committed; a
/// failure here is logged and never fails the request that caused it.
pub fn notify(_user_id: i32, kind: NotificationKind, message: String) {
    tokio::spawn(async move {
        let row = NewNotification {
            user_id: _user_id,
            kind,
            message,
        };
        let insert_result = spawn_blocking(move || {
            let mut pool = POOL.get().unwrap();
            diesel::insert_into(crate::schema::notifications::table)
                .values(&row)
                .execute(&mut pool)
        })
        .await;
        match insert_result {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => eprintln!("Failed to create notification: {:?}", e),
            Err(e) => eprintln!("Notification task join error: {:?}", e),
        }
    });
}

/// One notification row per admin user.
pub fn notify_admins(kind: NotificationKind, message: String) {
    tokio::spawn(async move {
        match methods::user::get_admin_ids().await {
            Ok(admin_ids) => {
                for admin_id in admin_ids {
                    notify(admin_id, kind, message.clone());
                }
            }
            Err(e) => eprintln!("Failed to load admin list: {:?}", e),
        }
    });
}
