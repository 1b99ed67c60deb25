//! SDN access control configuration object and helpers.
mod controller;
mod loading;
mod object;

pub use self::controller::ControllerConf;
pub use self::loading::load;
pub use self::loading::load_or_default;
pub use self::loading::Error;
pub use self::object::Conf;
pub use self::object::FlowsConf;
pub use self::object::LogLevel;
pub use self::object::LoggingConf;
pub use self::object::PolicyConf;
