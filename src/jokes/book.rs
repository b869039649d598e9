//! Append-only joke list.

use serde::Serialize;
use tokio::sync::RwLock;

/// A joke annotated with its position in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Joke {
    pub id: usize,
    pub text: String,
}

/// Ordered, append-only collection of jokes.
#[derive(Debug)]
pub struct JokeBook {
    sentinel: String,
    jokes: RwLock<Vec<String>>,
}

impl JokeBook {
    /// Create a book holding `seed` in order, with `sentinel` as the fixed joke.
    pub fn new(sentinel: impl Into<String>, seed: Vec<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
            jokes: RwLock::new(seed),
        }
    }

    /// The fixed joke served by `GET /joke`. Not drawn from the list.
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// All jokes in append order, each with its positional id.
    pub async fn list_all(&self) -> Vec<Joke> {
        self.jokes
            .read()
            .await
            .iter()
            .enumerate()
            .map(|(id, text)| Joke {
                id,
                text: text.clone(),
            })
            .collect()
    }

    /// Look up a joke by a raw route token.
    ///
    /// Returns `None` when the token is not a non-negative integer or is
    /// outside `[0, len)`.
    pub async fn get(&self, token: &str) -> Option<Joke> {
        let id = token.parse::<usize>().ok()?;
        let jokes = self.jokes.read().await;
        jokes.get(id).map(|text| Joke {
            id,
            text: text.clone(),
        })
    }

    /// Append a joke and return it with its new id (the pre-append length).
    pub async fn append(&self, text: String) -> Joke {
        let mut jokes = self.jokes.write().await;
        let id = jokes.len();
        jokes.push(text.clone());
        Joke { id, text }
    }
}
