//! MongoDB test infrastructure backed by testcontainers.

use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::mongo::Mongo;
use tracing::debug;
use uuid::Uuid;

/// A throwaway MongoDB instance for integration tests.
///
/// The container is stopped and removed when the value is dropped.
pub struct TestMongo {
    /// Client connected to the containerized instance
    pub client: mongodb::Client,
    /// Connection URI of the containerized instance
    pub uri: String,
    _container: ContainerAsync<Mongo>,
}

impl TestMongo {
    /// Start a MongoDB container and connect a client to it.
    ///
    /// # Panics
    /// Panics if the container cannot be started or the client cannot
    /// connect; both indicate a broken test environment.
    pub async fn new() -> Self {
        let container = Mongo::default()
            .start()
            .await
            .expect("failed to start MongoDB container");

        let port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("failed to resolve MongoDB container port");
        let uri = format!("mongodb://127.0.0.1:{}", port);
        debug!(%uri, "Started MongoDB test container");

        let client = mongodb::Client::with_uri_str(&uri)
            .await
            .expect("failed to connect to MongoDB container");

        Self {
            client,
            uri,
            _container: container,
        }
    }

    /// A database with a unique name, isolating tests that share a container.
    pub fn database(&self) -> mongodb::Database {
        let name = format!("test_{}", Uuid::new_v4().simple());
        self.client.database(&name)
    }
}
