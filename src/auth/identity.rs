// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity routes: handlers that receive the decoded token.
//!
//! An identity handler takes [`AuthTokenPayload`] as its first parameter,
//! followed by ordinary axum extractors. Taking that parameter is the whole
//! declaration: [`IdentityRoute`] only accepts such handlers, and
//! [`SecuredRoutes::identity_route`](super::SecuredRoutes::identity_route)
//! registers them with authentication and payload injection.
//!
//! ```rust
//! use axum::extract::Path;
//! use neurotriumph_server::auth::{AuthTokenPayload, IdentityRoute};
//!
//! async fn whoami(payload: AuthTokenPayload, Path(label): Path<String>) -> String {
//!     format!("{label}: {:?}", payload.user_id())
//! }
//!
//! let _: IdentityRoute = IdentityRoute::new().get(whoami);
//! ```
//!
//! A handler has at most one identity sink; a second one does not compile:
//!
//! ```rust,compile_fail
//! use neurotriumph_server::auth::{AuthTokenPayload, IdentityRoute};
//!
//! async fn twice(first: AuthTokenPayload, second: AuthTokenPayload) -> String {
//!     format!("{:?} {:?}", first.user_id(), second.user_id())
//! }
//!
//! let _: IdentityRoute = IdentityRoute::new().get(twice);
//! ```

use std::future::Future;

use axum::{
    extract::{FromRequest, FromRequestParts},
    response::IntoResponse,
    routing::{MethodFilter, MethodRouter},
};

use super::extractor::InjectedPayload;
use super::AuthTokenPayload;

/// A handler whose first parameter is the identity sink.
///
/// `T` lists the remaining parameters the way axum's `Handler` does.
pub trait IdentityHandler<T, S>: Clone + Send + Sync + Sized + 'static {
    /// Add this handler to `router` for `filter`, fed by the injected payload.
    fn attach(self, router: MethodRouter<S>, filter: MethodFilter) -> MethodRouter<S>;
}

impl<F, Fut, Res, S> IdentityHandler<(), S> for F
where
    F: FnOnce(AuthTokenPayload) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send,
    Res: IntoResponse,
    S: Clone + Send + Sync + 'static,
{
    fn attach(self, router: MethodRouter<S>, filter: MethodFilter) -> MethodRouter<S> {
        router.on(filter, move |InjectedPayload(payload): InjectedPayload| {
            (self.clone())(payload)
        })
    }
}

macro_rules! impl_identity_handler {
    ( $($ty:ident),* ; $last:ident ) => {
        #[allow(non_snake_case)]
        impl<F, Fut, Res, S, M, $($ty,)* $last> IdentityHandler<(M, $($ty,)* $last), S> for F
        where
            F: FnOnce(AuthTokenPayload, $($ty,)* $last) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = Res> + Send,
            Res: IntoResponse,
            S: Clone + Send + Sync + 'static,
            M: 'static,
            $($ty: FromRequestParts<S> + Send + 'static,)*
            $last: FromRequest<S, M> + Send + 'static,
        {
            fn attach(self, router: MethodRouter<S>, filter: MethodFilter) -> MethodRouter<S> {
                router.on::<_, (M, InjectedPayload, $($ty,)* $last)>(
                    filter,
                    move |InjectedPayload(payload): InjectedPayload, $($ty: $ty,)* $last: $last| {
                        (self.clone())(payload, $($ty,)* $last)
                    },
                )
            }
        }
    };
}

impl_identity_handler!(; T1);
impl_identity_handler!(T1; T2);
impl_identity_handler!(T1, T2; T3);
impl_identity_handler!(T1, T2, T3; T4);

/// Method router made only of identity handlers.
pub struct IdentityRoute<S = ()> {
    pub(crate) router: MethodRouter<S>,
}

impl<S> Default for IdentityRoute<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> IdentityRoute<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: MethodRouter::new(),
        }
    }

    pub fn on<H, T>(self, filter: MethodFilter, handler: H) -> Self
    where
        H: IdentityHandler<T, S>,
    {
        Self {
            router: handler.attach(self.router, filter),
        }
    }

    pub fn get<H, T>(self, handler: H) -> Self
    where
        H: IdentityHandler<T, S>,
    {
        self.on(MethodFilter::GET, handler)
    }

    pub fn post<H, T>(self, handler: H) -> Self
    where
        H: IdentityHandler<T, S>,
    {
        self.on(MethodFilter::POST, handler)
    }

    pub fn put<H, T>(self, handler: H) -> Self
    where
        H: IdentityHandler<T, S>,
    {
        self.on(MethodFilter::PUT, handler)
    }

    pub fn delete<H, T>(self, handler: H) -> Self
    where
        H: IdentityHandler<T, S>,
    {
        self.on(MethodFilter::DELETE, handler)
    }
}
