use actix_web::web::{self, Json};
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::http::error::Result;
use crate::http::Error;
use crate::schema::User;
use crate::types::Error as ErrorType;
use crate::types::{UserFlags, UserId};
use crate::App;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub flags: UserFlags,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            flags: user.flags,
        }
    }
}

#[tracing::instrument(skip(app))]
pub async fn create(app: web::Data<App>, form: Json<CreateRequest>) -> Result<HttpResponse> {
    if form.username.is_empty() {
        return Err(Error::new(ErrorType::InvalidForm {
            message: "username must not be empty".to_string(),
        }));
    }

    let mut conn = app.db_write().await?;
    let user = User::insert(&mut conn, &form.username).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[tracing::instrument(skip(app))]
pub async fn add_flag(
    app: web::Data<App>,
    path: web::Path<(i64, String)>,
) -> Result<HttpResponse> {
    let (user_id, flag_name) = path.into_inner();
    let mut conn = app.db_write().await?;

    let Some(user) = User::by_id(&mut conn, UserId(user_id)).await? else {
        return Err(Error::new(ErrorType::NotFound));
    };

    let Some(flag) = UserFlags::resolve(&flag_name) else {
        return Err(Error::new(ErrorType::UnknownFlag { name: flag_name }));
    };

    let Some(user) = User::add_flags(&mut conn, user.id, flag).await? else {
        // nothing deletes users, but a vanished row is still not a 500
        return Err(Error::new(ErrorType::NotFound));
    };

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Flag {flag_name} added"),
        "flags": user.flags,
    })))
}

#[tracing::instrument(skip(app))]
pub async fn get(app: web::Data<App>, path: web::Path<i64>) -> Result<HttpResponse> {
    let user_id = UserId(path.into_inner());

    let mut conn = app.db_read().await?;
    let Some(user) = User::by_id(&mut conn, user_id).await? else {
        return Err(Error::new(ErrorType::NotFound));
    };

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
