pub mod activity;

// Re-export core models for easy access
pub use activity::Activity;
