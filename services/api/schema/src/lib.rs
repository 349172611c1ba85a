//! sea-orm entities for the Car Doctor document store.

pub mod documents;
