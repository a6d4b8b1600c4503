use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::SessionError;
use crate::http::{HttpRequest, HttpResponse, HttpSession};

/// Replays canned outcomes in order and records every request it sees.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSession {
    outcomes: RefCell<VecDeque<Result<HttpResponse, SessionError>>>,
    pub(crate) requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedSession {
    pub(crate) fn new(outcomes: Vec<Result<HttpResponse, SessionError>>) -> Self {
        Self {
            outcomes: RefCell::new(outcomes.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn replying(body: serde_json::Value) -> Self {
        Self::new(vec![Ok(HttpResponse::ok(body.to_string()))])
    }

    pub(crate) fn attempts(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl HttpSession for ScriptedSession {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, SessionError> {
        self.requests.borrow_mut().push(request.clone());
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::with_status(503, "script exhausted")))
    }
}
