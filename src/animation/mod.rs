pub mod interpolation;

// Re-export commonly used types for convenience
pub use interpolation::Damping;
