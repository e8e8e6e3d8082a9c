
// Remote studio API transport
pub mod remote;

// Reactive resource cache (style presets, embeddings)
pub mod resources;

// Derived embedding picker view
pub mod picker;
