//! Persistence module split into the storage gateway and the repository.

mod connection;
mod students;

pub use connection::StorageGateway;
pub use students::StudentRepository;
