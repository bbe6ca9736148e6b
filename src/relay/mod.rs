// Public API
pub use router::BroadcastRouter;

// Internal modules
mod router;
