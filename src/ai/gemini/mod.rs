pub mod client;
pub mod structured;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::GeminiHttpClient;
pub use structured::GeminiBackend;
