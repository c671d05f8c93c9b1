//! Problem report supplied by the caller
//!
//! `ProblemContext` is the only input to the analyzer. Everything except
//! `problem_type` and `description` is optional; missing fields simply
//! skip the rules that read them.

use crate::errors::{HealError, Result};
use serde::{Deserialize, Serialize};

/// Broad category of the reported problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    Error,
    Performance,
    Logic,
    UserExperience,
    Integration,
    Other,
}

/// Runtime measurements attached to a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage_pct: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_usage_pct: Option<f64>,
}

/// Conversation snapshot attached to a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_messages: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_topic: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_intent: Option<String>,
}

impl ConversationContext {
    /// Current topic, with blank values treated as unset
    pub fn topic(&self) -> Option<&str> {
        non_blank(self.current_topic.as_deref())
    }

    /// User intent, with blank values treated as unset
    pub fn intent(&self) -> Option<&str> {
        non_blank(self.user_intent.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Structured problem report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemContext {
    pub problem_type: ProblemType,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_feedback: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<PerformanceMetrics>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_context: Option<ConversationContext>,
}

impl ProblemContext {
    /// Create a context with only the required fields set
    pub fn new(problem_type: ProblemType, description: impl Into<String>) -> Self {
        Self {
            problem_type,
            description: description.into(),
            error_message: None,
            stack_trace: None,
            components: None,
            user_feedback: None,
            performance_metrics: None,
            conversation_context: None,
        }
    }

    /// Parse a JSON problem report
    ///
    /// Missing `problemType`/`description` or any malformed field is
    /// reported as `InvalidInput`, never as a serialization error.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| HealError::InvalidInput(e.to_string()))
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_stack_trace(mut self, trace: impl Into<String>) -> Self {
        self.stack_trace = Some(trace.into());
        self
    }

    pub fn with_components(mut self, components: Vec<String>) -> Self {
        self.components = Some(components);
        self
    }

    pub fn with_user_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.user_feedback = Some(feedback.into());
        self
    }

    pub fn with_performance(mut self, metrics: PerformanceMetrics) -> Self {
        self.performance_metrics = Some(metrics);
        self
    }

    pub fn with_conversation(mut self, conversation: ConversationContext) -> Self {
        self.conversation_context = Some(conversation);
        self
    }

    /// Feedback lowered for case-insensitive keyword checks
    pub(crate) fn feedback_lower(&self) -> Option<String> {
        self.user_feedback.as_ref().map(|f| f.to_lowercase())
    }

    pub(crate) fn response_time_ms(&self) -> Option<f64> {
        self.performance_metrics.as_ref().and_then(|m| m.response_time_ms)
    }

    pub(crate) fn recent_messages(&self) -> Option<&[String]> {
        self.conversation_context
            .as_ref()
            .and_then(|c| c.recent_messages.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_camel_case() {
        let ctx = ProblemContext::from_json(
            r#"{
                "problemType": "user_experience",
                "description": "replies feel off",
                "performanceMetrics": {"responseTimeMs": 1200},
                "conversationContext": {"recentMessages": ["hi"], "userIntent": "unknown"}
            }"#,
        )
        .unwrap();

        assert_eq!(ctx.problem_type, ProblemType::UserExperience);
        assert_eq!(ctx.response_time_ms(), Some(1200.0));
        assert_eq!(ctx.recent_messages().map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_missing_description_is_invalid_input() {
        let err = ProblemContext::from_json(r#"{"problemType": "error"}"#).unwrap_err();
        assert!(matches!(err, HealError::InvalidInput(ref m) if m.contains("description")));
    }

    #[test]
    fn test_missing_problem_type_is_invalid_input() {
        let err = ProblemContext::from_json(r#"{"description": "x"}"#).unwrap_err();
        assert!(matches!(err, HealError::InvalidInput(_)));
    }

    #[test]
    fn test_unknown_problem_type_is_invalid_input() {
        let err = ProblemContext::from_json(r#"{"problemType": "cosmic", "description": "x"}"#)
            .unwrap_err();
        assert!(matches!(err, HealError::InvalidInput(_)));
    }

    #[test]
    fn test_builder_sets_optional_fields() {
        let ctx = ProblemContext::new(ProblemType::Error, "crash")
            .with_error_message("TypeError")
            .with_user_feedback("Too SLOW");

        assert_eq!(ctx.error_message.as_deref(), Some("TypeError"));
        assert_eq!(ctx.feedback_lower().as_deref(), Some("too slow"));
    }
}
