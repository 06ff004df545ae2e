//! Data models for literature discovery.
//!
//! Raw bibliographic records mirror the OpenAlex works schema (`snake_case`);
//! everything the service emits uses `camelCase` to match the caller-facing API.

mod inputs;
mod paper;
mod response;
mod work;

pub use inputs::LiteratureRequest;
pub use paper::{JournalTier, Paper};
pub use response::{LiteratureResponse, SearchMetadata};
pub use work::{Authorship, Concept, Location, Source, Work, WorkAuthor, WorksMeta, WorksResponse};
