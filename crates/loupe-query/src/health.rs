//! Backend health check.
//!
//! One GET against `/health` under a 5-second deadline. An HTTP-level
//! failure, a body whose `status` is anything but `"healthy"` (even on
//! 200), and a deadline expiry all yield an unhealthy report; the timeout
//! is reported distinctly from other transport failures.

use chrono::Local;

use crate::error::QueryError;
use crate::transport::{DynQuickTransport, HttpTransport, QuickTransport};

/// Outcome of one health probe.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub healthy: bool,
    /// User-facing detail; empty when healthy.
    pub detail: String,
    /// Probe time, epoch seconds.
    pub checked_at: i64,
}

/// Probes the backend's `/health` endpoint.
pub struct HealthChecker {
    transport: Box<dyn DynQuickTransport>,
}

impl HealthChecker {
    pub fn new(transport: impl QuickTransport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    pub fn over_http(base_url: impl Into<String>) -> Self {
        Self::new(HttpTransport::new(base_url))
    }

    /// Run one probe. Never errors; every failure mode becomes an
    /// unhealthy report.
    pub async fn check(&self) -> HealthReport {
        let checked_at = Local::now().timestamp();

        let reply = match self.transport.get_health_boxed().await {
            Ok(reply) => reply,
            Err(QueryError::Timeout(secs)) => {
                return HealthReport {
                    healthy: false,
                    detail: format!("백엔드 서버 응답 시간 초과 ({}초)", secs),
                    checked_at,
                };
            }
            Err(err) => {
                tracing::debug!(error = %err, "health probe transport failure");
                return HealthReport {
                    healthy: false,
                    detail: "백엔드 서버에 연결할 수 없습니다.".to_string(),
                    checked_at,
                };
            }
        };

        if !(200..300).contains(&reply.status) {
            return HealthReport {
                healthy: false,
                detail: format!("백엔드 서버 응답 오류: {}", reply.status),
                checked_at,
            };
        }

        let status = serde_json::from_str::<serde_json::Value>(&reply.body)
            .ok()
            .and_then(|value| {
                value
                    .get("status")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
            });

        match status.as_deref() {
            Some("healthy") => HealthReport {
                healthy: true,
                detail: String::new(),
                checked_at,
            },
            _ => HealthReport {
                healthy: false,
                detail: "백엔드 서버가 정상 상태가 아닙니다.".to_string(),
                checked_at,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportReply;

    struct StubTransport {
        reply: Result<(u16, &'static str), QueryError>,
    }

    impl QuickTransport for StubTransport {
        async fn post_quick(&self, _question: &str) -> Result<TransportReply, QueryError> {
            unreachable!("health checker never posts");
        }

        async fn get_health(&self) -> Result<TransportReply, QueryError> {
            match &self.reply {
                Ok((status, body)) => Ok(TransportReply {
                    status: *status,
                    body: body.to_string(),
                }),
                Err(QueryError::Timeout(secs)) => Err(QueryError::Timeout(*secs)),
                Err(_) => Err(QueryError::Network("connection refused".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_healthy_backend() {
        let checker = HealthChecker::new(StubTransport {
            reply: Ok((200, r#"{"status": "healthy", "timestamp": "t"}"#)),
        });
        let report = checker.check().await;
        assert!(report.healthy);
        assert!(report.detail.is_empty());
        assert!(report.checked_at > 0);
    }

    #[tokio::test]
    async fn test_degraded_status_on_200_is_unhealthy() {
        let checker = HealthChecker::new(StubTransport {
            reply: Ok((200, r#"{"status": "degraded"}"#)),
        });
        let report = checker.check().await;
        assert!(!report.healthy);
        assert_eq!(report.detail, "백엔드 서버가 정상 상태가 아닙니다.");
    }

    #[tokio::test]
    async fn test_missing_status_field_is_unhealthy() {
        let checker = HealthChecker::new(StubTransport {
            reply: Ok((200, r#"{"ok": true}"#)),
        });
        let report = checker.check().await;
        assert!(!report.healthy);
    }

    #[tokio::test]
    async fn test_http_error_is_unhealthy() {
        let checker = HealthChecker::new(StubTransport {
            reply: Ok((503, "Service Unavailable")),
        });
        let report = checker.check().await;
        assert!(!report.healthy);
        assert!(report.detail.contains("503"));
    }

    #[tokio::test]
    async fn test_timeout_reported_distinctly() {
        let checker = HealthChecker::new(StubTransport {
            reply: Err(QueryError::Timeout(5)),
        });
        let report = checker.check().await;
        assert!(!report.healthy);
        assert!(report.detail.contains("시간 초과"));
        assert!(report.detail.contains('5'));
    }

    #[tokio::test]
    async fn test_network_failure_is_unreachable() {
        let checker = HealthChecker::new(StubTransport {
            reply: Err(QueryError::Network("dns".to_string())),
        });
        let report = checker.check().await;
        assert!(!report.healthy);
        assert_eq!(report.detail, "백엔드 서버에 연결할 수 없습니다.");
    }

    #[tokio::test]
    async fn test_non_json_health_body_is_unhealthy() {
        let checker = HealthChecker::new(StubTransport {
            reply: Ok((200, "OK")),
        });
        let report = checker.check().await;
        assert!(!report.healthy);
    }
}
