mod add;
mod get;

use warp::Filter;

pub fn api_v1_favorite()
-> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    add::main().or(get::main())
}
