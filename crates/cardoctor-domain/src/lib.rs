//! Document-store domain types shared by Car Doctor crates.

pub mod collection;
pub mod document;
pub mod id;
pub mod outcome;
