mod file_preference_store;
mod firestore_document_store;
mod hashmap_document_store;
mod hashmap_preference_store;

pub use file_preference_store::*;
pub use firestore_document_store::*;
pub use hashmap_document_store::*;
pub use hashmap_preference_store::*;
