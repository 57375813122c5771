// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod cloudinary;
pub mod firebase_auth;
pub mod firestore;
pub mod firestore_value;
pub mod memory;
