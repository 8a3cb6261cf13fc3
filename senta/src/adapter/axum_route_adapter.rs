use anyhow::{Context as _, Result};
use axum::{
    body::{Body, to_bytes},
    http::{HeaderMap, HeaderName, HeaderValue, Request, Response, StatusCode, header},
};

use crate::http_helpers::{HttpRequest, HttpResponse};

use super::RouteAdapter;

pub struct AxumRouteAdapter;

impl RouteAdapter for AxumRouteAdapter {
    type Request = Request<Body>;
    type Response = Response<Body>;

    async fn adapt_request(request: Self::Request) -> Result<HttpRequest> {
        let (parts, body) = request.into_parts();
        let body = to_bytes(body, usize::MAX)
            .await
            .context("Failed to read request body")?;

        let headers = parts
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        Ok(HttpRequest {
            method: parts.method.to_string(),
            uri: parts.uri.to_string(),
            headers,
            body: body.to_vec(),
        })
    }

    fn adapt_response(response: HttpResponse) -> Result<Self::Response> {
        if !response.is_finished() {
            tracing::warn!("request finished without a response, answering 404");
            return Response::builder()
                .status(StatusCode::NOT_FOUND)
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("Not Found"))
                .context("Failed to build response");
        }

        let status =
            StatusCode::from_u16(response.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut headers = HeaderMap::new();
        for (k, v) in response.headers() {
            match (HeaderName::from_bytes(k.as_bytes()), HeaderValue::from_str(v)) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => tracing::warn!(header = %k, "dropping invalid response header"),
            }
        }

        let mut res = Response::builder()
            .status(status)
            .body(Body::from(response.body().to_vec()))
            .context("Failed to build response")?;

        res.headers_mut().extend(headers);

        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_adapt_request_copies_parts() {
        let request = Request::builder()
            .method("POST")
            .uri("/users?active=1")
            .header("Host", "localhost:3000")
            .body(Body::from(r#"{"id":1}"#))
            .unwrap();

        let req = AxumRouteAdapter::adapt_request(request).await.unwrap();

        assert_eq!(req.method, "POST");
        assert_eq!(req.uri, "/users?active=1");
        assert_eq!(req.host(), "localhost:3000");
        assert_eq!(req.text(), r#"{"id":1}"#);
    }

    #[test]
    fn test_adapt_response_keeps_status_and_headers() {
        let mut response = HttpResponse::new();
        response.set_status(201);
        response.set_header("Content-Type", "application/json");
        response.end(r#"{"ok":true}"#);

        let res = AxumRouteAdapter::adapt_response(response).unwrap();

        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_unfinished_response_becomes_not_found() {
        let res = AxumRouteAdapter::adapt_response(HttpResponse::new()).unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
