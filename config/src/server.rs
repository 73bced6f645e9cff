use serde::{
    Deserialize,
    Serialize,
};

/// One Informix server the exporter polls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInstance {
    /// Value of the `informixserver` label on every series of this instance.
    pub informixserver: String,
    /// ODBC connection string. Defaults to `DSN=<informixserver>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
}

impl ServerInstance {
    pub fn new(informixserver: impl Into<String>) -> Self {
        Self {
            informixserver: informixserver.into(),
            connection_string: None,
        }
    }

    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    pub fn connection_target(&self) -> String {
        match &self.connection_string {
            Some(connection_string) => connection_string.clone(),
            None => format!("DSN={}", self.informixserver),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_target_defaults_to_dsn() {
        let server = ServerInstance::new("ol_informix");
        assert_eq!(server.connection_target(), "DSN=ol_informix");

        let server = server.with_connection_string("DSN=prod;UID=monitor");
        assert_eq!(server.connection_target(), "DSN=prod;UID=monitor");
    }
}
