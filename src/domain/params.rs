use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BondingType, PortMode, PowerState};

/// Paging window of list operations. Other search conditions of the real API
/// are accepted by the HTTP layer and ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateServiceParameter {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInstallParameter {
    pub os_image_id: String,
    #[serde(default)]
    pub manual_partition: bool,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureBondingParameter {
    pub bonding_type: BondingType,
    #[serde(default)]
    pub port_nicknames: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateServerPortParameter {
    pub nickname: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternetType {
    CommonSubnet,
    DedicatedSubnet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignNetworkParameter {
    #[serde(default)]
    pub internet_type: Option<InternetType>,
    #[serde(default)]
    pub dedicated_subnet_id: Option<String>,
    #[serde(default)]
    pub mode: Option<PortMode>,
    #[serde(default)]
    pub private_network_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnableServerPortParameter {
    pub enable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerOperation {
    On,
    Soft,
    Reset,
    Off,
}

impl PowerOperation {
    /// Power state the server settles in once the operation completes.
    pub fn target_state(self) -> PowerState {
        match self {
            Self::On | Self::Reset => PowerState::On,
            Self::Soft | Self::Off => PowerState::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerControlParameter {
    pub operation: PowerOperation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficGraphParams {
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub step: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidStatusParams {
    #[serde(default)]
    pub refresh: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_operations_map_to_target_state() {
        assert_eq!(PowerOperation::On.target_state(), PowerState::On);
        assert_eq!(PowerOperation::Reset.target_state(), PowerState::On);
        assert_eq!(PowerOperation::Soft.target_state(), PowerState::Off);
        assert_eq!(PowerOperation::Off.target_state(), PowerState::Off);
    }

    #[test]
    fn assign_network_fields_are_optional() {
        let params: AssignNetworkParameter = serde_json::from_str("{}").unwrap();
        assert_eq!(params, AssignNetworkParameter::default());
    }

    #[test]
    fn unknown_internet_type_is_rejected() {
        let err = serde_json::from_str::<AssignNetworkParameter>(
            r#"{"internet_type":"satellite"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown variant"));
    }
}
