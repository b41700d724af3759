use biometrics::{Collector, Counter, Moments};

pub(crate) static FLOW_REQUESTS: Counter = Counter::new("flowchat.client.requests");
pub(crate) static FLOW_TRANSPORT_ERRORS: Counter =
    Counter::new("flowchat.client.transport_errors");
pub(crate) static FLOW_STATUS_ERRORS: Counter = Counter::new("flowchat.client.status_errors");
pub(crate) static FLOW_PARSE_ERRORS: Counter = Counter::new("flowchat.client.parse_errors");
pub(crate) static FLOW_REQUEST_DURATION: Moments =
    Moments::new("flowchat.client.request_duration_seconds");

pub(crate) static SESSION_USER_TURNS: Counter = Counter::new("flowchat.session.user_turns");
pub(crate) static SESSION_ASSISTANT_TURNS: Counter =
    Counter::new("flowchat.session.assistant_turns");
pub(crate) static SESSION_SHAPE_ERRORS: Counter = Counter::new("flowchat.session.shape_errors");
pub(crate) static SESSION_FAILED_SUBMISSIONS: Counter =
    Counter::new("flowchat.session.failed_submissions");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&FLOW_REQUESTS);
    collector.register_counter(&FLOW_TRANSPORT_ERRORS);
    collector.register_counter(&FLOW_STATUS_ERRORS);
    collector.register_counter(&FLOW_PARSE_ERRORS);
    collector.register_moments(&FLOW_REQUEST_DURATION);

    collector.register_counter(&SESSION_USER_TURNS);
    collector.register_counter(&SESSION_ASSISTANT_TURNS);
    collector.register_counter(&SESSION_SHAPE_ERRORS);
    collector.register_counter(&SESSION_FAILED_SUBMISSIONS);
}
