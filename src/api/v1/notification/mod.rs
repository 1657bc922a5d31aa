mod get;
mod mark_read;

use warp::Filter;

pub fn api_v1_notification()
-> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    get::main().or(mark_read::main())
}
