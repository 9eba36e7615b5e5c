use actix_web::web;

pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::post().to(users::create))
            .route("/{user_id}", web::get().to(users::get))
            .route("/{user_id}/flags/{flag_name}", web::post().to(users::add_flag)),
    );
}
