use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

mod params;

pub use params::{
    AssignNetworkParameter, ConfigureBondingParameter, EnableServerPortParameter, InternetType,
    ListParams, OsInstallParameter, PowerControlParameter, PowerOperation, RaidStatusParams,
    TrafficGraphParams, UpdateServerPortParameter, UpdateServiceParameter,
};

/// Placeholder network handed out for ports attached to the shared internet subnet.
pub const COMMON_SUBNET_NETWORK_ADDRESS: &str = "203.0.113.0";
pub const COMMON_SUBNET_PREFIX_LENGTH: u8 = 24;

pub const COMMON_SUBNET_BANDWIDTH_MBPS: u32 = 100;
pub const DEDICATED_SUBNET_BANDWIDTH_MBPS: u32 = 500;
// The real service also offers 2000; fixed here.
pub const PRIVATE_NETWORK_BANDWIDTH_MBPS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Server,
    DedicatedSubnet,
    PrivateNetwork,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag_id: i64,
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePlan {
    pub plan_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub zone_id: i64,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub service_id: String,
    pub nickname: String,
    #[serde(default)]
    pub description: Option<String>,
    pub activated: DateTime<Utc>,
    #[serde(default)]
    pub plan: Option<ServicePlan>,
    #[serde(default)]
    pub option_plans: Option<Vec<ServicePlan>>,
    pub product_category: ProductCategory,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Reduced view of a [`Service`] embedded in the resources it bills for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceQuiet {
    pub service_id: String,
    pub nickname: String,
    #[serde(default)]
    pub description: Option<String>,
    pub activated: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    On,
    Off,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedPowerStatus {
    pub status: PowerState,
    pub stored: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerPowerStatus {
    pub status: PowerState,
}

/// Names the exclusive operation currently running on a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerLockStatus {
    OsInstall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBusType {
    Sata,
    Sas,
    Nvme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMediaType {
    Ssd,
    Hdd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    pub bus_type: StorageBusType,
    pub media_type: StorageMediaType,
    pub size: u32,
    pub device_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSpec {
    pub cpu_model_name: String,
    pub cpu_count: u32,
    pub cpu_core_count: u32,
    pub cpu_clock_speed: u32,
    pub memory_size: u32,
    pub port_channel_1gbe_count: u32,
    pub port_channel_10gbe_count: u32,
    pub total_storage_device_count: u32,
    #[serde(default)]
    pub storages: Vec<Storage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ipv4GlobalType {
    CommonIpAddress,
    DedicatedSubnet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerIpv4Global {
    #[serde(rename = "type")]
    pub kind: Ipv4GlobalType,
    pub ip_address: String,
    pub network_address: String,
    pub prefix_length: u8,
    pub gateway_address: String,
    #[serde(default)]
    pub name_servers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondingType {
    Lacp,
    Static,
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkSpeedType {
    #[serde(rename = "1gbe")]
    OneGbe,
    #[serde(rename = "10gbe")]
    TenGbe,
}

impl LinkSpeedType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneGbe => "1gbe",
            Self::TenGbe => "10gbe",
        }
    }
}

impl std::fmt::Display for LinkSpeedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortChannel {
    pub port_channel_id: i64,
    pub bonding_type: BondingType,
    pub link_speed_type: LinkSpeedType,
    #[serde(default)]
    pub locked: bool,
    /// Member port IDs, in port order.
    #[serde(default)]
    pub ports: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortMode {
    Access,
    Trunk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetType {
    CommonSubnet,
    DedicatedSubnet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedDedicatedSubnet {
    pub dedicated_subnet_id: String,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedPrivateNetwork {
    pub private_network_id: String,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Internet {
    pub subnet_type: SubnetType,
    pub network_address: String,
    pub prefix_length: u8,
    #[serde(default)]
    pub dedicated_subnet: Option<AttachedDedicatedSubnet>,
}

impl Internet {
    pub fn common_subnet() -> Self {
        Self {
            subnet_type: SubnetType::CommonSubnet,
            network_address: COMMON_SUBNET_NETWORK_ADDRESS.to_string(),
            prefix_length: COMMON_SUBNET_PREFIX_LENGTH,
            dedicated_subnet: None,
        }
    }

    pub fn dedicated_subnet(subnet: &DedicatedSubnet) -> Self {
        Self {
            subnet_type: SubnetType::DedicatedSubnet,
            network_address: subnet.ipv4.network_address.clone(),
            prefix_length: subnet.ipv4.prefix_length,
            dedicated_subnet: Some(AttachedDedicatedSubnet {
                dedicated_subnet_id: subnet.dedicated_subnet_id.clone(),
                nickname: subnet.service.nickname.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfacePort {
    pub port_id: i64,
    /// Owning channel; a back-reference, the channel keeps the member list.
    pub port_channel_id: i64,
    pub enabled: bool,
    pub nickname: String,
    #[serde(default)]
    pub internet: Option<Internet>,
    #[serde(default)]
    pub private_networks: Option<Vec<AttachedPrivateNetwork>>,
    #[serde(default)]
    pub mode: Option<PortMode>,
    #[serde(default)]
    pub global_bandwidth_mbps: Option<u32>,
    #[serde(default)]
    pub local_bandwidth_mbps: Option<u32>,
}

impl InterfacePort {
    /// A freshly provisioned, enabled port with no network attached.
    pub fn new(port_id: i64, port_channel_id: i64, nickname: impl Into<String>) -> Self {
        Self {
            port_id,
            port_channel_id,
            enabled: true,
            nickname: nickname.into(),
            internet: None,
            private_networks: None,
            mode: None,
            global_bandwidth_mbps: None,
            local_bandwidth_mbps: None,
        }
    }

    pub fn detach_networks(&mut self) {
        self.internet = None;
        self.mode = None;
        self.private_networks = None;
        self.global_bandwidth_mbps = None;
        self.local_bandwidth_mbps = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub server_id: String,
    pub service: ServiceQuiet,
    pub zone: Zone,
    pub spec: ServerSpec,
    #[serde(default)]
    pub cached_power_status: Option<CachedPowerStatus>,
    /// `None` while no exclusive operation is in flight.
    #[serde(default)]
    pub lock_status: Option<ServerLockStatus>,
    #[serde(default)]
    pub ipv4: Option<ServerIpv4Global>,
    #[serde(default)]
    pub port_channels: Vec<PortChannel>,
    #[serde(default)]
    pub ports: Vec<InterfacePort>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedicatedSubnetConfigStatus {
    Operational,
    Creating,
    Deleting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv4 {
    pub network_address: String,
    pub gateway_address: String,
    pub broadcast_address: String,
    pub prefix_length: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedicatedSubnet {
    pub dedicated_subnet_id: String,
    pub config_status: DedicatedSubnetConfigStatus,
    pub ipv4: Ipv4,
    #[serde(default)]
    pub server_count: u32,
    pub service: ServiceQuiet,
    pub zone: Zone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateNetwork {
    pub private_network_id: String,
    pub vlan_id: u32,
    #[serde(default)]
    pub server_count: u32,
    pub service: ServiceQuiet,
    pub zone: Zone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaidHealth {
    Ok,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidLogicalVolume {
    pub volume_id: String,
    #[serde(deserialize_with = "deserialize_raid_level")]
    pub raid_level: String,
    #[serde(default)]
    pub physical_device_ids: Vec<String>,
    pub status: RaidHealth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidPhysicalDevice {
    pub device_id: String,
    pub slot: u32,
    pub status: RaidHealth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidStatus {
    pub monitored: DateTime<Utc>,
    #[serde(default)]
    pub overall_status: Option<RaidHealth>,
    #[serde(default)]
    pub logical_volumes: Vec<RaidLogicalVolume>,
    #[serde(default)]
    pub physical_devices: Vec<RaidPhysicalDevice>,
}

// The API documents raid_level as a string but has been seen sending numbers.
fn deserialize_raid_level<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RaidLevel {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RaidLevel::deserialize(deserializer)? {
        RaidLevel::Text(s) => s,
        RaidLevel::Number(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsImage {
    pub os_image_id: String,
    pub name: String,
    #[serde(default)]
    pub manual_partition: bool,
    #[serde(default)]
    pub require_password: bool,
    pub superuser_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficGraphData {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficGraph {
    #[serde(default)]
    pub receive: Vec<TrafficGraphData>,
    #[serde(default)]
    pub transmit: Vec<TrafficGraphData>,
}

/// Pagination block of list responses. `count` is the total number of records,
/// not the size of the returned page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginateMeta {
    pub count: usize,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Services {
    pub meta: PaginateMeta,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Servers {
    pub meta: PaginateMeta,
    pub servers: Vec<Server>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedicatedSubnets {
    pub meta: PaginateMeta,
    pub dedicated_subnets: Vec<DedicatedSubnet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateNetworks {
    pub meta: PaginateMeta,
    pub private_networks: Vec<PrivateNetwork>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn raid_level_accepts_numbers_and_strings() {
        let numeric: RaidLogicalVolume = serde_json::from_value(json!({
            "volume_id": "0",
            "raid_level": 1,
            "physical_device_ids": ["0", "1"],
            "status": "ok",
        }))
        .unwrap();
        assert_eq!(numeric.raid_level, "1");

        let text: RaidLogicalVolume = serde_json::from_value(json!({
            "volume_id": "0",
            "raid_level": "10",
            "status": "ok",
        }))
        .unwrap();
        assert_eq!(text.raid_level, "10");
        assert!(text.physical_device_ids.is_empty());
    }

    #[test]
    fn link_speed_type_uses_wire_names() {
        assert_eq!(
            serde_json::to_value(LinkSpeedType::OneGbe).unwrap(),
            json!("1gbe")
        );
        let parsed: LinkSpeedType = serde_json::from_value(json!("10gbe")).unwrap();
        assert_eq!(parsed, LinkSpeedType::TenGbe);
        assert_eq!(LinkSpeedType::TenGbe.to_string(), "10gbe");
    }

    #[test]
    fn ipv4_global_kind_serializes_as_type() {
        let ipv4 = ServerIpv4Global {
            kind: Ipv4GlobalType::CommonIpAddress,
            ip_address: "192.0.2.11".to_string(),
            network_address: "192.0.2.0".to_string(),
            prefix_length: 24,
            gateway_address: "192.0.2.1".to_string(),
            name_servers: vec![],
        };
        let value = serde_json::to_value(&ipv4).unwrap();
        assert_eq!(value["type"], json!("common_ip_address"));
    }

    #[test]
    fn detach_networks_clears_every_attachment() {
        let mut port = InterfacePort::new(1, 10, "p");
        port.internet = Some(Internet::common_subnet());
        port.mode = Some(PortMode::Trunk);
        port.private_networks = Some(vec![]);
        port.global_bandwidth_mbps = Some(COMMON_SUBNET_BANDWIDTH_MBPS);
        port.local_bandwidth_mbps = Some(PRIVATE_NETWORK_BANDWIDTH_MBPS);

        port.detach_networks();
        assert_eq!(port, InterfacePort::new(1, 10, "p"));
    }
}
