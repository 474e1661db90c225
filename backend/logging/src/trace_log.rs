//! Route trace event logger.
//!
//! One structured record per scoring pass, written through `tracing`
//! under the `route_trace` target so the file layer captures it as
//! NDJSON. Traces are write-only observability data; nothing reads
//! them back.

use serde::Serialize;
use tracing::info;

use atelier_core::RouteTrace;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
struct TraceRecord<'a> {
    session_id: &'a str,
    #[serde(flatten)]
    trace: &'a RouteTrace,
}

pub struct RouteTraceLogger;

impl RouteTraceLogger {
    /// Emit one scoring trace, redacting the query excerpt first.
    pub fn log(session_id: &str, trace: &RouteTrace) {
        let record = TraceRecord { session_id, trace };
        let json = serde_json::to_string(&record)
            .unwrap_or_else(|e| format!("{{\"error\":\"trace serialization: {e}\"}}"));
        info!(target: "route_trace", trace = %redact_sensitive_data(&json), "agent routing trace");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::{AgentId, ScoreMap};
    use serde_json::Value;

    #[test]
    fn trace_record_serializes_flat() {
        let mut keyword_scores = ScoreMap::new();
        keyword_scores.insert(AgentId::from("tta"), 2.8);
        let trace = RouteTrace {
            query: "future trends".into(),
            keyword_scores,
            graph_trace: Value::Null,
            problem_trace: Value::Null,
            final_ranked: vec![(AgentId::from("tta"), 2.8)],
        };
        let record = TraceRecord {
            session_id: "s1",
            trace: &trace,
        };
        let json: Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["session_id"], "s1");
        assert_eq!(json["query"], "future trends");
        assert_eq!(json["keyword_scores"]["tta"], 2.8);
        assert_eq!(json["final_ranked"][0][1], 2.8);
    }
}
