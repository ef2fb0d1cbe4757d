//! HTML pages rendered with Tera.
//!
//! Templates are compiled into the binary and registered once at startup.

use super::status::probe_message;
use crate::health::{ProbeResult, StatusSnapshot};
use serde::Serialize;
use tera::{Context as TeraContext, Tera};

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const SIMPLE_CHECK_TEMPLATE: &str = include_str!("../../templates/simple_check.html");

pub const ALL_CONNECTED: &str = "ALL SERVICES CONNECTED!";
pub const SOME_FAILED: &str = "SOME SERVICES FAILED";

#[derive(Debug, Serialize)]
struct ServiceLine {
    connected: bool,
    message: String,
}

impl From<&ProbeResult> for ServiceLine {
    fn from(result: &ProbeResult) -> Self {
        Self {
            connected: result.is_connected(),
            message: probe_message(result),
        }
    }
}

pub struct Pages {
    tera: Tera,
}

impl Pages {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        // the .html suffix turns on autoescaping of upstream error text
        tera.add_raw_templates(vec![
            ("index.html", INDEX_TEMPLATE),
            ("simple_check.html", SIMPLE_CHECK_TEMPLATE),
        ])?;

        Ok(Self { tera })
    }

    fn snapshot_context(snapshot: &StatusSnapshot) -> TeraContext {
        let mut context = TeraContext::new();
        context.insert("database", &ServiceLine::from(&snapshot.database));
        context.insert("cache", &ServiceLine::from(&snapshot.cache));
        context.insert(
            "checked_at",
            &snapshot.checked_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
        context
    }

    pub fn index(&self, app_name: &str, snapshot: &StatusSnapshot) -> Result<String, tera::Error> {
        let mut context = Self::snapshot_context(snapshot);
        context.insert("app_name", app_name);
        context.insert("port", &snapshot.process.port);
        context.insert("uptime_seconds", &snapshot.process.uptime_seconds);

        self.tera.render("index.html", &context)
    }

    pub fn simple_check(&self, snapshot: &StatusSnapshot, cached: bool) -> Result<String, tera::Error> {
        let mut context = Self::snapshot_context(snapshot);
        let conclusion = if snapshot.all_connected() {
            ALL_CONNECTED
        } else {
            SOME_FAILED
        };
        context.insert("conclusion", conclusion);
        context.insert("cached", &cached);

        self.tera.render("simple_check.html", &context)
    }
}
