//! Process-wide like counter.

use serde_json::Value;
use tokio::sync::RwLock;

/// Holds the current like value.
///
/// Writes replace the value wholesale. The value is kept as raw JSON:
/// whatever a client sends is stored and echoed back unchanged.
#[derive(Debug)]
pub struct LikeCounter {
    value: RwLock<Value>,
}

impl LikeCounter {
    pub fn new(initial: i64) -> Self {
        Self {
            value: RwLock::new(Value::from(initial)),
        }
    }

    pub async fn get(&self) -> Value {
        self.value.read().await.clone()
    }

    /// Replace the stored value, returning what is now stored.
    pub async fn set(&self, value: Value) -> Value {
        let mut current = self.value.write().await;
        *current = value;
        current.clone()
    }
}
