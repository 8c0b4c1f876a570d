//! Static informational page served at `/`.

use axum::http::StatusCode;
use futures_util::future::{self, BoxFuture};

use crate::handlers::{Handler, HandlerRequest, HandlerResult};
use crate::http::response::ApiResponse;

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Content Edge API</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 3rem; background: #f7f7f9; }
    .container { max-width: 600px; margin: auto; padding: 2rem; background: white; border-radius: 12px; box-shadow: 0 2px 10px #0001; }
    h1 { color: #3a49d6; }
  </style>
</head>
<body>
  <div class="container">
    <h1>Content Edge API</h1>
    <p>A read-only, cached view of the upstream content API.</p>
    <h3>API Endpoints:</h3>
    <ul>
      <li><code>/v1/page/:pageId</code></li>
      <li><code>/v1/table/:pageId</code></li>
      <li><code>/v1/user/:userId</code></li>
      <li><code>/v1/search</code></li>
    </ul>
  </div>
</body>
</html>
"#;

#[derive(Debug, Clone, Copy, Default)]
pub struct HomeHandler;

impl Handler for HomeHandler {
    fn call(&self, _request: HandlerRequest) -> BoxFuture<'_, HandlerResult> {
        Box::pin(future::ready(Ok(ApiResponse::raw(
            HOME_PAGE,
            "text/html; charset=utf-8",
            StatusCode::OK,
        ))))
    }
}
