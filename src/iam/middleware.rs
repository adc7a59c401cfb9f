// This file is part of the product Tido.
// SPDX-License-Identifier: AGPL-3.0-or-later

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::web::Data;
use actix_web::{HttpMessage, HttpRequest};
use std::future::{Ready, ready};
use std::pin::Pin;
use std::rc::Rc; // Services are per-thread

use super::jwt::Claims;
use super::service::IamService;
use super::types::User;

/// Trait to add authentication methods to HttpRequest
pub trait AuthRequest {
    fn user_info(&self) -> Option<User>;
    fn jwt_claims(&self) -> Option<Claims>;

    fn is_authenticated(&self) -> bool;
}

impl AuthRequest for HttpRequest {
    fn user_info(&self) -> Option<User> {
        self.extensions().get::<User>().cloned()
    }

    fn jwt_claims(&self) -> Option<Claims> {
        self.extensions().get::<Claims>().cloned()
    }

    fn is_authenticated(&self) -> bool {
        self.user_info().is_some()
    }
}

// Session cookie authentication middleware
pub struct AuthMiddlewareFactory;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let iam_data = req.app_data::<Data<IamService>>().cloned();
        let service = self.service.clone();

        Box::pin(async move {
            if let Some(iam) = iam_data {
                let cookie_name = iam.get_ref().jwt().cookie_name().to_string();
                if let Some(cookie) = req.cookie(&cookie_name) {
                    // Verify the token and confirm the account still exists;
                    // an invalid cookie just leaves the request anonymous.
                    if let Some((user, claims)) = iam.get_ref().validate_session(cookie.value()) {
                        req.extensions_mut().insert(claims);
                        req.extensions_mut().insert(user);
                    }
                }
            }

            service.call(req).await
        })
    }
}
