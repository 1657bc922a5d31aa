mod open;

use warp::Filter;

pub fn api_v1_dispute()
-> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    open::main()
}
