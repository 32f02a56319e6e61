//! Content model of a service presentation.
//!
//! - [`ContentPart`]: one semantic unit (song, reading, prayer, ...)
//! - [`Presentation`]: the ordered list of parts
//! - [`PlaceholderSet`] / [`PlaceholderValue`]: styled values for template tokens
//! - [`LayoutKey`]: the template slide a descriptor is rendered with

// Submodule declarations
pub mod layout;
pub mod part;
pub mod presentation;
pub mod value;
pub mod wire;

// Re-exports
pub use layout::LayoutKey;
pub use part::{
    BibleReading, ChildrenMoment, Collection, ContentPart, Prayer, Song, TRUST_AND_GREETING_TITLE,
    TrustAndGreeting, names,
};
pub use presentation::Presentation;
pub use value::{PlaceholderSet, PlaceholderValue};
