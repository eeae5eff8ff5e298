use super::{IMessenger, OutboundSms};
use anyhow::anyhow;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};
use tracing::info;

/// Keeps every message instead of delivering it. Used when no telephony
/// credentials are configured and in tests.
pub struct InMemoryMessenger {
    sent: Mutex<Vec<OutboundSms>>,
    failing: AtomicBool,
}

impl InMemoryMessenger {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            failing: AtomicBool::new(false),
        }
    }

    /// Every message sent so far, oldest first
    pub fn sent(&self) -> Vec<OutboundSms> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, to: &str) -> Vec<OutboundSms> {
        self.sent().into_iter().filter(|sms| sms.to == to).collect()
    }

    /// Makes all following sends fail, like an unreachable provider would
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Default for InMemoryMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMessenger for InMemoryMessenger {
    async fn send_sms(&self, sms: &OutboundSms) -> anyhow::Result<String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("Unable to deliver message to: {}", sms.to));
        }
        info!("[In memory] text message to: {}: {}", sms.to, sms.body);
        let mut sent = self.sent.lock().unwrap();
        sent.push(sms.clone());
        Ok(format!("SM{}", sent.len()))
    }
}
