mod approve;
mod decline;
mod dispute;
mod export;
mod history;
mod message;
mod new;
mod payment;
mod resolve_dispute;
mod review;
mod status_audit;

use warp::Filter;

pub fn api_v1_rental()
-> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    new::main()
        .or(history::main())
        .or(approve::main())
        .or(decline::main())
        .or(status_audit::main())
        .or(message::main())
        .or(payment::main())
        .or(review::main())
        .or(resolve_dispute::main())
        .or(dispute::main())
        .or(export::main())
}
