//! Per-client request throttling.
//!
//! Every request is charged against its client IP: the first `X-Forwarded-For`
//! entry when a proxy sets one, otherwise the peer address. Over-budget requests
//! get 429 before any other stage runs.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use crate::{error::AppError, state::AppState};

pub type ClientRateLimiter = DefaultKeyedRateLimiter<IpAddr>;

/// Limiter allowing `per_second` requests per client, with bursts of the same size.
pub fn client_rate_limiter(per_second: u32) -> Arc<ClientRateLimiter> {
    let rate = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::keyed(Quota::per_second(rate)))
}

fn client_ip(request: &Request) -> IpAddr {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    forwarded
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

pub async fn limit_by_client(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_ip(&request);
    if state.rate_limiter.check_key(&client).is_err() {
        tracing::debug!(%client, "rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request(forwarded: Option<&str>, peer: Option<SocketAddr>) -> Request {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = forwarded {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        if let Some(addr) = peer {
            request.extensions_mut().insert(ConnectInfo(addr));
        }
        request
    }

    #[test]
    fn forwarded_for_wins_over_peer() {
        let peer: SocketAddr = "10.0.0.1:5000".parse().unwrap();

        let ip = client_ip(&request(Some("203.0.113.7, 10.0.0.2"), Some(peer)));
        assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().unwrap());

        let ip = client_ip(&request(None, Some(peer)));
        assert_eq!(ip, peer.ip());

        let ip = client_ip(&request(Some("not-an-ip"), Some(peer)));
        assert_eq!(ip, peer.ip());
    }

    #[test]
    fn budget_is_per_client() {
        let limiter = client_rate_limiter(2);
        let a: IpAddr = "203.0.113.7".parse().unwrap();
        let b: IpAddr = "203.0.113.8".parse().unwrap();

        assert!(limiter.check_key(&a).is_ok());
        assert!(limiter.check_key(&a).is_ok());
        assert!(limiter.check_key(&a).is_err());
        assert!(limiter.check_key(&b).is_ok());
    }
}
