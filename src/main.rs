mod api;
mod db;
mod helper_model;
mod integration;
mod methods;
mod model;
mod scheduled_tasks;
mod schema;

use warp::Filter;

lazy_static::lazy_static! {
    pub static ref POOL: db::PgPool = db::get_connection_pool();
}

#[tokio::main]
async fn main() {
    tokio::spawn(scheduled_tasks::nightly_task());
    // routing for the server
    let httpd = api::api().and(warp::path::end());
    // TODO: tls
    warp::serve(httpd).run(([127, 0, 0, 1], 3030)).await;
}
