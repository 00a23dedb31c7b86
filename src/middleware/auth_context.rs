use std::future::{ready, Ready};

use actix_web::{
    dev::Payload, error::ErrorUnauthorized, web, Error, FromRequest, HttpMessage, HttpRequest,
};

use crate::middleware::auth::{bearer_token, Claims, JwtConfig};
use crate::services::access_service::Capabilities;

#[derive(Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub capabilities: Capabilities,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<Claims>() {
            ready(Ok(AuthenticatedUser {
                user_id: claims.user_id.clone(),
                email: claims.sub.clone(),
                capabilities: claims.capabilities(),
            }))
        } else {
            ready(Err(ErrorUnauthorized("User not authenticated")))
        }
    }
}

/// Caller identity on public routes. A missing or invalid token means anonymous.
#[derive(Clone, Default)]
pub struct MaybeUser(pub Option<String>);

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<Claims>() {
            return ready(Ok(MaybeUser(Some(claims.user_id.clone()))));
        }
        let Some(token) = bearer_token(req.headers()) else {
            return ready(Ok(MaybeUser(None)));
        };
        let config = match req.app_data::<web::Data<JwtConfig>>() {
            Some(config) => config.get_ref().clone(),
            None => JwtConfig::from_env(),
        };
        let user_id = config.verify(&token).ok().map(|claims| claims.user_id);
        ready(Ok(MaybeUser(user_id)))
    }
}
