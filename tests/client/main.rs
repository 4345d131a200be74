mod announcements;
mod firestore;
mod members;
mod roles;
