use circular_buffer::CircularBuffer;
use serde::{Deserialize, Serialize};

/// One completed exchange call.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RequestRecord {
    pub timestamp: i64,
    pub endpoint: String,
    pub signed: bool,
    pub ok: bool,
}

/// Last `SIZE` calls made by an adapter, oldest first.
#[derive(Debug, Clone)]
pub struct RequestLog<const SIZE: usize> {
    pub buffer: CircularBuffer<SIZE, RequestRecord>,
    pub exchange: String,
}

impl RequestRecord {
    pub fn now(endpoint: &str, signed: bool, ok: bool) -> RequestRecord {
        RequestRecord {
            timestamp: chrono::Utc::now().timestamp_millis(),
            endpoint: endpoint.to_string(),
            signed,
            ok,
        }
    }
}

impl<const SIZE: usize> RequestLog<SIZE> {
    pub fn new(exchange: String) -> RequestLog<SIZE> {
        RequestLog {
            buffer: CircularBuffer::<SIZE, RequestRecord>::new(),
            exchange,
        }
    }

    pub fn add_record(&mut self, record: RequestRecord) {
        self.buffer.push_back(record);
    }

    pub fn last(&self) -> Option<&RequestRecord> {
        self.buffer.back()
    }

    pub fn records(&self) -> Vec<RequestRecord> {
        self.buffer.iter().cloned().collect()
    }

    /// `{"exchange": .., "records": [..]}`, records oldest first.
    pub fn serialize_to_json(&self) -> Result<String, serde_json::Error> {
        let records: Vec<&RequestRecord> = self.buffer.iter().collect();
        serde_json::to_string(&serde_json::json!({
            "exchange": self.exchange,
            "records": records,
        }))
    }
}
