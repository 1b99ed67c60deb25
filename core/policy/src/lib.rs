//! Role based access policy for network services.
//!
//! Students reach server services through the courses they are enrolled in:
//! a student may access a service if an active course enrolls them and allows
//! the service on the server.
mod dataset;
mod errors;
mod mac;
mod models;
mod report;
mod store;


pub use self::dataset::Dataset;
pub use self::dataset::Error as DatasetError;
pub use self::errors::AlreadyExists;
pub use self::errors::EntityKind;
pub use self::errors::InvalidPort;
pub use self::errors::UnknownEntity;
pub use self::mac::InvalidMacAddress;
pub use self::mac::MacAddress;
pub use self::models::AllowedServer;
pub use self::models::Course;
pub use self::models::CourseState;
pub use self::models::Protocol;
pub use self::models::Server;
pub use self::models::Service;
pub use self::models::Student;
pub use self::report::DanglingReference;
pub use self::report::Grant;
pub use self::store::PolicyStore;
