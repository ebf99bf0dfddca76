use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};

use crate::domain::{
    DedicatedSubnet, OsImage, PrivateNetwork, RaidStatus, Server, ServerPowerStatus, Service,
};

#[derive(Debug)]
pub enum DatasetError {
    Io(io::Error),
    SerdeJson(serde_json::Error),
    SerdeYaml(serde_yaml::Error),
    UnsupportedFormat { extension: String },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::SerdeJson(e) => write!(f, "json error: {e}"),
            Self::SerdeYaml(e) => write!(f, "yaml error: {e}"),
            Self::UnsupportedFormat { extension } => {
                write!(
                    f,
                    "unsupported dataset format: {extension:?} (expected json, yaml or yml)"
                )
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::SerdeJson(e) => Some(e),
            Self::SerdeYaml(e) => Some(e),
            Self::UnsupportedFormat { .. } => None,
        }
    }
}

impl From<io::Error> for DatasetError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(value: serde_json::Error) -> Self {
        Self::SerdeJson(value)
    }
}

impl From<serde_yaml::Error> for DatasetError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::SerdeYaml(value)
    }
}

/// A server together with the auxiliary records only reachable through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub server: Server,
    #[serde(default)]
    pub raid_status: Option<RaidStatus>,
    #[serde(default)]
    pub os_images: Vec<OsImage>,
    #[serde(default)]
    pub power_status: Option<ServerPowerStatus>,
}

/// Seed records an engine is built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub servers: Vec<ServerRecord>,
    #[serde(default)]
    pub dedicated_subnets: Vec<DedicatedSubnet>,
    #[serde(default)]
    pub private_networks: Vec<PrivateNetwork>,
    /// Last ID handed out by the engine's counter.
    #[serde(default)]
    pub generated_id: i64,
}

impl Dataset {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads a dataset, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let bytes = fs::read(path)?;
        match extension.as_str() {
            "json" => Ok(serde_json::from_slice(&bytes)?),
            "yaml" | "yml" => Ok(serde_yaml::from_slice(&bytes)?),
            _ => Err(DatasetError::UnsupportedFormat { extension }),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, DatasetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Largest numeric ID among seeded ports and port channels.
    pub fn max_numeric_id(&self) -> i64 {
        self.servers
            .iter()
            .flat_map(|record| {
                let ports = record.server.ports.iter().map(|p| p.port_id);
                let channels = record
                    .server
                    .port_channels
                    .iter()
                    .map(|pc| pc.port_channel_id);
                ports.chain(channels)
            })
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_dataset;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_round_trip_through_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dataset.json");
        let dataset = sample_dataset();
        fs::write(&path, dataset.to_json_pretty().unwrap()).unwrap();

        let loaded = Dataset::load(&path).unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn yaml_files_are_accepted() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dataset.yml");
        fs::write(
            &path,
            r#"
services:
  - service_id: "100000000001"
    nickname: nickname1
    activated: "2021-06-01T00:00:00Z"
    product_category: server
generated_id: 42
"#,
        )
        .unwrap();

        let loaded = Dataset::load(&path).unwrap();
        assert_eq!(loaded.services.len(), 1);
        assert_eq!(loaded.services[0].nickname, "nickname1");
        assert!(loaded.servers.is_empty());
        assert_eq!(loaded.generated_id, 42);
    }

    #[test]
    fn stored_traffic_graphs_are_ignored() {
        let dataset: Dataset = serde_json::from_value(serde_json::json!({
            "servers": [],
            "traffic_graph": { "receive": [], "transmit": [] }
        }))
        .unwrap();
        assert!(dataset.servers.is_empty());

        let json = sample_dataset().to_json_pretty().unwrap();
        assert!(!json.contains("traffic_graph"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dataset.toml");
        fs::write(&path, "").unwrap();

        let err = Dataset::load(&path).unwrap_err();
        assert!(matches!(err, DatasetError::UnsupportedFormat { ref extension } if extension == "toml"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Dataset::load(&tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }

    #[test]
    fn max_numeric_id_covers_ports_and_channels() {
        let dataset = sample_dataset();
        assert_eq!(dataset.max_numeric_id(), 2002);
        assert_eq!(Dataset::empty().max_numeric_id(), 0);
    }
}
