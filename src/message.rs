use bytes::Bytes;
use chrono::{DateTime, Utc};

/// The message unit dispatched to the backend.
///
/// One envelope is constructed fresh per send call and never reused. The
/// ordering key and delivery timestamp are only populated by the FIFO and
/// delayed strategies respectively.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub topic: String,
    pub body: Bytes,
    pub tag: Option<String>,
    pub ordering_key: Option<String>,
    pub deliver_at: Option<DateTime<Utc>>,
}

impl Envelope {
    pub fn builder(topic: impl Into<String>, body: impl Into<Bytes>) -> EnvelopeBuilder {
        EnvelopeBuilder {
            envelope: Envelope {
                topic: topic.into(),
                body: body.into(),
                tag: None,
                ordering_key: None,
                deliver_at: None,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    envelope: Envelope,
}

impl EnvelopeBuilder {
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.envelope.tag = Some(tag.into());
        self
    }

    pub fn ordering_key(mut self, key: impl Into<String>) -> Self {
        self.envelope.ordering_key = Some(key.into());
        self
    }

    pub fn deliver_at(mut self, at: DateTime<Utc>) -> Self {
        self.envelope.deliver_at = Some(at);
        self
    }

    pub fn build(self) -> Envelope {
        self.envelope
    }
}

/// Backend acknowledgment of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Identifier assigned by the backend.
    pub message_id: String,
}

impl Receipt {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
        }
    }
}
