//! Configuration options for HTTP(S) clients.
use std::time::Duration;

use reqwest::Client;
use reqwest::ClientBuilder;

/// Default timeout for requests made by clients.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout for new connections initialised by clients.
pub const DEFAULT_TIMEOUT_CONNECT: Duration = Duration::from_secs(1);

/// Options to initialise clients with.
#[derive(Clone, Debug)]
pub struct ClientOptions {
    /// Address of the API server to connect to, with trailing slash.
    pub address: String,

    /// Timeout for requests made by the client.
    pub timeout: Duration,

    /// Timeout for new connections initialised by the client.
    pub timeout_connect: Duration,
}

impl ClientOptions {
    /// Prepare a [`ClientBuilder`] with timeouts and user agent set.
    pub fn client(&self, user_agent: &str) -> ClientBuilder {
        Client::builder()
            .connect_timeout(self.timeout_connect)
            .timeout(self.timeout)
            .user_agent(user_agent)
    }

    /// Define options for API clients.
    pub fn url<S>(address: S) -> ClientOptionsBuilder
    where
        S: Into<String>,
    {
        ClientOptionsBuilder {
            address: address.into(),
            timeout: DEFAULT_TIMEOUT,
            timeout_connect: DEFAULT_TIMEOUT_CONNECT,
        }
    }
}

/// Incrementally build [`ClientOptions`] objects.
pub struct ClientOptionsBuilder {
    address: String,
    timeout: Duration,
    timeout_connect: Duration,
}

impl ClientOptionsBuilder {
    /// All options are set, get a usable options object.
    pub fn client(self) -> ClientOptions {
        self.into()
    }

    /// Bound the total duration of each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bound the time spent establishing new connections.
    pub fn timeout_connect(mut self, timeout: Duration) -> Self {
        self.timeout_connect = timeout;
        self
    }
}

impl From<ClientOptionsBuilder> for ClientOptions {
    fn from(value: ClientOptionsBuilder) -> Self {
        let mut address = value.address;
        if !address.ends_with('/') {
            address.push('/');
        }
        ClientOptions {
            address,
            timeout: value.timeout,
            timeout_connect: value.timeout_connect,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ClientOptions;

    #[test]
    fn address_gains_trailing_slash() {
        let options = ClientOptions::url("http://localhost:8080").client();
        assert_eq!(options.address, "http://localhost:8080/");
        let options = ClientOptions::url("http://localhost:8080/").client();
        assert_eq!(options.address, "http://localhost:8080/");
    }

    #[test]
    fn timeouts_override_defaults() {
        let options = ClientOptions::url("http://localhost:8080")
            .timeout(Duration::from_secs(2))
            .timeout_connect(Duration::from_millis(250))
            .client();
        assert_eq!(options.timeout, Duration::from_secs(2));
        assert_eq!(options.timeout_connect, Duration::from_millis(250));
    }
}
