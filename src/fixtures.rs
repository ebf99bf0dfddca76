//! Built-in sample dataset: two servers, one dedicated subnet, one private
//! network and the services billing for them.

use chrono::Utc;

use crate::{
    dataset::{Dataset, ServerRecord},
    domain::{
        BondingType, CachedPowerStatus, DedicatedSubnet, DedicatedSubnetConfigStatus,
        InterfacePort, Ipv4, Ipv4GlobalType, LinkSpeedType, OsImage, PortChannel, PowerState,
        PrivateNetwork, ProductCategory, RaidHealth, RaidLogicalVolume, RaidPhysicalDevice,
        RaidStatus, Server, ServerIpv4Global, ServerPowerStatus, ServerSpec, Service, ServicePlan,
        ServiceQuiet, Storage, StorageBusType, StorageMediaType, Tag, Zone,
    },
};

pub const SAMPLE_SERVER_1: &str = "100000000001";
pub const SAMPLE_SERVER_2: &str = "100000000002";
pub const SAMPLE_DEDICATED_SUBNET: &str = "100000000001";
pub const SAMPLE_PRIVATE_NETWORK: &str = "100000000001";

pub fn sample_dataset() -> Dataset {
    Dataset {
        services: vec![
            sample_service("100000000001", "nickname1", "plan-01"),
            sample_service("100000000002", "nickname2", "plan-02"),
        ],
        servers: vec![
            sample_server(SAMPLE_SERVER_1, "server01", 1001, 2001, true, "usacloud"),
            sample_server(SAMPLE_SERVER_2, "server02", 1002, 2002, false, "usacloud2"),
        ],
        dedicated_subnets: vec![DedicatedSubnet {
            dedicated_subnet_id: SAMPLE_DEDICATED_SUBNET.to_string(),
            config_status: DedicatedSubnetConfigStatus::Operational,
            ipv4: Ipv4 {
                network_address: "192.0.2.224".to_string(),
                gateway_address: "192.0.2.225".to_string(),
                broadcast_address: "192.0.2.239".to_string(),
                prefix_length: 28,
            },
            server_count: 1,
            service: quiet("100000000001", "global-network01"),
            zone: zone(),
        }],
        private_networks: vec![PrivateNetwork {
            private_network_id: SAMPLE_PRIVATE_NETWORK.to_string(),
            vlan_id: 1,
            server_count: 1,
            service: quiet("100000000001", "private-network01"),
            zone: zone(),
        }],
        generated_id: 0,
    }
}

fn zone() -> Zone {
    Zone {
        zone_id: 302,
        region: "is".to_string(),
    }
}

fn quiet(service_id: &str, nickname: &str) -> ServiceQuiet {
    ServiceQuiet {
        service_id: service_id.to_string(),
        nickname: nickname.to_string(),
        description: None,
        activated: Utc::now(),
        tags: vec![],
    }
}

fn sample_service(service_id: &str, nickname: &str, plan: &str) -> Service {
    Service {
        service_id: service_id.to_string(),
        nickname: nickname.to_string(),
        description: Some(format!("description of {nickname}")),
        activated: Utc::now(),
        plan: Some(ServicePlan {
            plan_id: format!("maker-series-spec-region-{plan}"),
            name: plan.to_string(),
        }),
        option_plans: None,
        product_category: ProductCategory::Server,
        tags: vec![Tag {
            tag_id: 1,
            label: "label".to_string(),
            color: Some("ffffff".to_string()),
        }],
    }
}

fn sample_server(
    server_id: &str,
    nickname: &str,
    port_channel_id: i64,
    port_id: i64,
    port_enabled: bool,
    os_image_id: &str,
) -> ServerRecord {
    let now = Utc::now();
    let mut port = InterfacePort::new(port_id, port_channel_id, format!("{nickname}-port01"));
    port.enabled = port_enabled;

    ServerRecord {
        server: Server {
            server_id: server_id.to_string(),
            service: quiet(server_id, nickname),
            zone: zone(),
            spec: ServerSpec {
                cpu_model_name: "E3-1220 v6".to_string(),
                cpu_count: 1,
                cpu_core_count: 4,
                cpu_clock_speed: 3,
                memory_size: 8,
                port_channel_1gbe_count: 1,
                port_channel_10gbe_count: 0,
                total_storage_device_count: 1,
                storages: vec![Storage {
                    bus_type: StorageBusType::Sata,
                    media_type: StorageMediaType::Ssd,
                    size: 1000,
                    device_count: 2,
                }],
            },
            cached_power_status: Some(CachedPowerStatus {
                status: PowerState::On,
                stored: now,
            }),
            lock_status: None,
            ipv4: Some(ServerIpv4Global {
                kind: Ipv4GlobalType::CommonIpAddress,
                ip_address: "192.0.2.11".to_string(),
                network_address: "192.0.2.0".to_string(),
                prefix_length: 24,
                gateway_address: "192.0.2.1".to_string(),
                name_servers: vec!["198.51.100.1".to_string(), "198.51.100.2".to_string()],
            }),
            port_channels: vec![PortChannel {
                port_channel_id,
                bonding_type: BondingType::Lacp,
                link_speed_type: LinkSpeedType::OneGbe,
                locked: false,
                ports: vec![port_id],
            }],
            ports: vec![port],
        },
        raid_status: Some(RaidStatus {
            monitored: now,
            overall_status: Some(RaidHealth::Ok),
            logical_volumes: vec![RaidLogicalVolume {
                volume_id: "0".to_string(),
                raid_level: "1".to_string(),
                physical_device_ids: vec!["0".to_string(), "1".to_string()],
                status: RaidHealth::Ok,
            }],
            physical_devices: vec![
                RaidPhysicalDevice {
                    device_id: "0".to_string(),
                    slot: 0,
                    status: RaidHealth::Ok,
                },
                RaidPhysicalDevice {
                    device_id: "1".to_string(),
                    slot: 1,
                    status: RaidHealth::Ok,
                },
            ],
        }),
        os_images: vec![OsImage {
            os_image_id: os_image_id.to_string(),
            name: format!("Usacloud Linux ({os_image_id})"),
            manual_partition: true,
            require_password: true,
            superuser_name: "root".to_string(),
        }],
        power_status: Some(ServerPowerStatus {
            status: PowerState::On,
        }),
    }
}
