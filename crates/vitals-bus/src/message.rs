/// A single bus record: an opaque key used for partition/ordering
/// decisions, and a JSON-encoded payload.
///
/// The key is picked per topic: `device_id` upstream of patient
/// resolution, `patient_id` from normalization onward. Callers encode that
/// choice by constructing the key themselves; `vitals-bus` only carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    pub key: Vec<u8>,
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(key: impl Into<Vec<u8>>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            payload: payload.into(),
        }
    }
}
