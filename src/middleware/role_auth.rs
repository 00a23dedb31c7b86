use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorForbidden, ErrorUnauthorized},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::middleware::auth::Claims;
use crate::models::account::Permission;

/// Rejects requests whose token role lacks `permission`.
/// Must sit inside `AuthMiddleware`, so wrap it first.
pub struct RequirePermission {
    permission: Permission,
}

impl RequirePermission {
    pub fn new(permission: Permission) -> Self {
        RequirePermission { permission }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequirePermission
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequirePermissionService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequirePermissionService {
            service,
            permission: self.permission,
        }))
    }
}

pub struct RequirePermissionService<S> {
    service: S,
    permission: Permission,
}

impl<S, B> Service<ServiceRequest> for RequirePermissionService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let capabilities = req
            .extensions()
            .get::<Claims>()
            .map(|claims| claims.capabilities());

        match capabilities {
            Some(capabilities) if capabilities.has(self.permission) => {
                Box::pin(self.service.call(req))
            }
            Some(capabilities) => {
                log::info!(
                    "Access denied for {:?} ({}): missing {}",
                    capabilities.user_id(),
                    capabilities.role(),
                    self.permission
                );
                Box::pin(ready(Err(ErrorForbidden("Insufficient permissions"))))
            }
            None => Box::pin(ready(Err(ErrorUnauthorized("No authorization")))),
        }
    }
}
