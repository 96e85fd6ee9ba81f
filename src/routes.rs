use std::collections::HashMap;

use coord_batch::{DataLimits, HeaderMode};
use serde::Serialize;
use worker::{Context, Env, Request, Response, Result, RouteContext, Router};

use crate::convert_pipeline;
use crate::error::ApiError;
use crate::models::{ConvertRequest, TSV_CONTENT_TYPE};

#[derive(Debug, Clone)]
pub struct AppState {
    pub limits: DataLimits,
}

pub async fn handle(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    let max_rows = env.var("MAX_ROWS").ok().map(|value| value.to_string());
    let limits = match convert_pipeline::limits_from_max_rows(max_rows.as_deref()) {
        Ok(limits) => limits,
        Err(error) => {
            worker::console_error!("{error}, falling back to default limits");
            DataLimits::default()
        }
    };

    Router::with_data(AppState { limits })
        .get("/api/v1/kinds", kinds_route)
        .post_async("/api/v1/convert", convert_route)
        .post_async("/api/v1/clipboard", clipboard_route)
        .run(req, env)
        .await
}

fn kinds_route(_req: Request, _ctx: RouteContext<AppState>) -> Result<Response> {
    json_response(&convert_pipeline::kinds_response())
}

async fn convert_route(mut req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    let result = match read_request(&mut req).await {
        Ok((request, header_mode)) => {
            convert_pipeline::convert_response(&request, header_mode, ctx.data.limits)
        }
        Err(error) => Err(error),
    };
    match result {
        Ok(response) => {
            worker::console_log!(
                "converted {}/{} rows ({})",
                response.valid_rows,
                response.total_rows,
                response.kind
            );
            json_response(&response)
        }
        Err(error) => error.into_response(),
    }
}

async fn clipboard_route(mut req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    let result = match read_request(&mut req).await {
        Ok((request, header_mode)) => {
            convert_pipeline::clipboard_response(&request, header_mode, ctx.data.limits)
        }
        Err(error) => Err(error),
    };
    match result {
        Ok(text) => tsv_response(text),
        Err(error) => error.into_response(),
    }
}

async fn read_request(req: &mut Request) -> Result<(ConvertRequest, HeaderMode), ApiError> {
    let query = parse_query(req)?;
    let header_mode = convert_pipeline::parse_header_mode(query.get("header").map(String::as_str))?;
    let body = req.text().await?;
    let request = serde_json::from_str::<ConvertRequest>(&body)?;
    Ok((request, header_mode))
}

fn json_response<T>(payload: &T) -> Result<Response>
where
    T: Serialize,
{
    let mut response = Response::from_json(payload)?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}

fn tsv_response(text: String) -> Result<Response> {
    let mut response = Response::ok(text)?;
    response.headers_mut().set("Content-Type", TSV_CONTENT_TYPE)?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}

fn parse_query(req: &Request) -> Result<HashMap<String, String>, ApiError> {
    let url = req.url()?;
    let query = url
        .query_pairs()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect::<HashMap<_, _>>();
    Ok(query)
}
