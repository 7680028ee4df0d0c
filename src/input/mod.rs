pub mod events;

// Re-export the essential types
pub use events::{pointer_channel, ContainerRect, PointerEvent, PointerEventSender};
