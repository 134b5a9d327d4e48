use tokio::fs::{self, File};
use tracing::{info, warn};

use crate::error::ServeError;
use crate::http::range::{RangeOutcome, negotiate};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::server::ServeContext;

/// Maps one request onto the served tree.
///
/// Only regular files are served; directories answer 404. The shutdown path
/// is handled by the connection, not here.
pub async fn handle_request(ctx: &ServeContext, req: &Request) -> Response {
    if req.method != Method::GET {
        warn!(method = ?req.method, "Method not allowed");
        return Response::method_not_allowed();
    }

    let path = req.target_path();
    info!(path = %path, version = %req.version, "GET");

    let file_path = match ctx.locate(&path).await {
        Ok(file_path) => file_path,
        Err(ServeError::Forbidden) => {
            warn!(path = %path, "403 Forbidden");
            return Response::forbidden(&path);
        }
        Err(e) => {
            warn!(path = %path, error = %e, "404 File not found");
            return Response::not_found();
        }
    };

    let size = match fs::metadata(&file_path).await {
        Ok(meta) if meta.is_file() => meta.len(),
        Ok(_) => {
            warn!(path = %path, "404 Not a file");
            return Response::not_found();
        }
        Err(e) => {
            warn!(path = %path, error = %e, "404 File not found");
            return Response::not_found();
        }
    };

    let outcome = negotiate(req.range(), size);
    if outcome == RangeOutcome::Unsatisfiable {
        warn!(path = %path, range = ?req.range(), size, "416 Range not satisfiable");
        return Response::range_not_satisfiable(size);
    }

    let file = match File::open(&file_path).await {
        Ok(file) => file,
        Err(e) => {
            let e = ServeError::FileRead(e);
            warn!(path = %path, error = %e, "500 Unable to open file");
            return Response::internal_error();
        }
    };

    match outcome {
        RangeOutcome::Partial(range) => {
            info!(path = %path, range = %range, size, "Start partial transfer");
            Response::partial(file, range, size)
        }
        _ => {
            info!(path = %path, size, "Start transfer");
            Response::file(file, size)
        }
    }
}
