mod create;
mod get;
mod login;
mod update;

use warp::Filter;

pub fn api_v1_user() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    create::main()
        .or(login::main())
        .or(get::main())
        .or(update::main())
}
