mod create;
mod get;
mod get_all;
mod message;
mod messages;

use warp::Filter;

pub fn api_v1_listing()
-> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    create::main()
        .or(get_all::main())
        .or(message::main())
        .or(messages::main())
        .or(get::main())
}
