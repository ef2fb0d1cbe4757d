use crate::connectors::{ConnectorError, DatabaseConnector};
use crate::models::Visitor;
use actix_web::{get, web, Responder, Result};
use serde::Serialize;
use std::sync::Arc;

const RECENT_VISITORS: u32 = 10;

#[derive(Debug, Serialize)]
pub struct VisitorList {
    pub success: bool,
    pub count: usize,
    pub visitors: Vec<Visitor>,
}

#[tracing::instrument(name = "List recent visitors.", skip_all)]
#[get("/visitors")]
pub async fn visitors_handler(
    database: web::Data<Arc<dyn DatabaseConnector>>,
) -> Result<impl Responder, ConnectorError> {
    let visitors = database.recent_visitors(RECENT_VISITORS).await?;

    Ok(web::Json(VisitorList {
        success: true,
        count: visitors.len(),
        visitors,
    }))
}
