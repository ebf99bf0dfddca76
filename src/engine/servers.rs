use chrono::{Duration, Utc};

use crate::domain::{
    AssignNetworkParameter, AttachedPrivateNetwork, BondingType, COMMON_SUBNET_BANDWIDTH_MBPS,
    CachedPowerStatus, ConfigureBondingParameter, DEDICATED_SUBNET_BANDWIDTH_MBPS,
    EnableServerPortParameter, InterfacePort, Internet, InternetType, ListParams, OsImage,
    OsInstallParameter, PRIVATE_NETWORK_BANDWIDTH_MBPS, PortChannel, PowerControlParameter,
    RaidStatus, RaidStatusParams, Server, ServerLockStatus, ServerPowerStatus, Servers,
    TrafficGraph, TrafficGraphData, TrafficGraphParams, UpdateServerPortParameter,
};

use super::{Engine, EngineError, EngineResult, paginate};

impl Engine {
    pub async fn list_servers(&self, params: ListParams) -> EngineResult<Servers> {
        let store = self.store.read().await;
        let servers: Vec<Server> = store.servers.iter().map(|r| r.server.clone()).collect();
        let (meta, servers) = paginate(&servers, params);
        Ok(Servers { meta, servers })
    }

    pub async fn read_server(&self, server_id: &str) -> EngineResult<Server> {
        let store = self.store.read().await;
        Ok(store.find_server(server_id)?.server.clone())
    }

    pub async fn list_os_images(&self, server_id: &str) -> EngineResult<Vec<OsImage>> {
        let store = self.store.read().await;
        Ok(store.find_server(server_id)?.os_images.clone())
    }

    /// Accepts the install and returns at once. One interval later the server
    /// is locked with `os_install`; one more interval later it is unlocked.
    pub async fn os_install(&self, server_id: &str, params: OsInstallParameter) -> EngineResult<()> {
        let store = self.store.read().await;
        let record = store.find_server(server_id)?;
        if record.server.lock_status.is_some() {
            return Err(EngineError::conflict(
                "server",
                server_id,
                "an exclusive operation is in progress",
            ));
        }
        if !record
            .os_images
            .iter()
            .any(|image| image.os_image_id == params.os_image_id)
        {
            return Err(EngineError::not_found_in(
                "os-image",
                &params.os_image_id,
                format!("server[{server_id}]"),
            ));
        }

        let server_id = server_id.to_string();
        self.scheduler
            .delayed_apply("os_install:lock", move |store, scheduler| {
                let Ok(record) = store.find_server_mut(&server_id) else {
                    return;
                };
                record.server.lock_status = Some(ServerLockStatus::OsInstall);
                scheduler.delayed_apply("os_install:unlock", move |store, _| {
                    if let Ok(record) = store.find_server_mut(&server_id) {
                        record.server.lock_status = None;
                    }
                });
            });
        Ok(())
    }

    pub async fn read_port_channel(
        &self,
        server_id: &str,
        port_channel_id: i64,
    ) -> EngineResult<PortChannel> {
        let store = self.store.read().await;
        store
            .find_server(server_id)?
            .port_channel(port_channel_id)
            .cloned()
    }

    /// Replaces every port of the server with freshly minted ones and makes
    /// them the members of the channel. Applied synchronously, so the
    /// channel's `locked` flag is never raised.
    pub async fn configure_bonding(
        &self,
        server_id: &str,
        port_channel_id: i64,
        params: ConfigureBondingParameter,
    ) -> EngineResult<PortChannel> {
        let mut store = self.store.write().await;
        let speed = store
            .find_server(server_id)?
            .port_channel(port_channel_id)?
            .link_speed_type;

        let nicknames = match params.bonding_type {
            BondingType::Lacp | BondingType::Static => match params.port_nicknames {
                None => vec![speed.to_string()],
                Some(names) if names.len() == 1 => {
                    let name = names.into_iter().next().unwrap_or_default();
                    if name.is_empty() {
                        vec![speed.to_string()]
                    } else {
                        vec![name]
                    }
                }
                Some(_) => {
                    return Err(EngineError::invalid_request(
                        "port-channel",
                        port_channel_id,
                        "lacp and static bonding take exactly one port nickname",
                    ));
                }
            },
            BondingType::Single => match params.port_nicknames {
                None => vec![format!("{speed} 1"), format!("{speed} 2")],
                Some(names) if names.len() == 2 => names,
                Some(_) => {
                    return Err(EngineError::invalid_request(
                        "port-channel",
                        port_channel_id,
                        "single bonding takes exactly two port nicknames",
                    ));
                }
            },
        };

        let mut ports = Vec::with_capacity(nicknames.len());
        for name in nicknames {
            ports.push(InterfacePort::new(store.next_id()?, port_channel_id, name));
        }
        let port_ids = ports.iter().map(|p| p.port_id).collect();

        let record = store.find_server_mut(server_id)?;
        record.server.ports = ports;
        let channel = record.port_channel_mut(port_channel_id)?;
        channel.ports = port_ids;
        channel.bonding_type = params.bonding_type;
        Ok(channel.clone())
    }

    pub async fn read_port(&self, server_id: &str, port_id: i64) -> EngineResult<InterfacePort> {
        let store = self.store.read().await;
        store.find_server(server_id)?.port(port_id).cloned()
    }

    pub async fn update_port(
        &self,
        server_id: &str,
        port_id: i64,
        params: UpdateServerPortParameter,
    ) -> EngineResult<InterfacePort> {
        let mut store = self.store.write().await;
        let port = store.find_server_mut(server_id)?.port_mut(port_id)?;
        port.nickname = params.nickname;
        Ok(port.clone())
    }

    /// Resets every network attachment of the port, then applies `params`.
    ///
    /// Several ports of one server may end up attached to the internet at
    /// the same time; the real service refuses that, the fake does not.
    pub async fn assign_network(
        &self,
        server_id: &str,
        port_id: i64,
        params: AssignNetworkParameter,
    ) -> EngineResult<InterfacePort> {
        let mut store = self.store.write().await;
        store.find_server(server_id)?.port(port_id)?;

        let (internet, global_bandwidth_mbps) = match params.internet_type {
            None => (None, None),
            Some(InternetType::CommonSubnet) => (
                Some(Internet::common_subnet()),
                Some(COMMON_SUBNET_BANDWIDTH_MBPS),
            ),
            Some(InternetType::DedicatedSubnet) => {
                let Some(subnet_id) = params.dedicated_subnet_id.as_deref() else {
                    return Err(EngineError::invalid_request(
                        "port",
                        port_id,
                        "dedicated_subnet_id is required for dedicated_subnet",
                    ));
                };
                let subnet = store.find_dedicated_subnet(subnet_id).map_err(|_| {
                    EngineError::invalid_request(
                        "port",
                        port_id,
                        format!("invalid dedicated subnet id: {subnet_id}"),
                    )
                })?;
                (
                    Some(Internet::dedicated_subnet(subnet)),
                    Some(DEDICATED_SUBNET_BANDWIDTH_MBPS),
                )
            }
        };

        let (private_networks, local_bandwidth_mbps) = match params.private_network_ids {
            None => (None, None),
            Some(ids) => {
                let mut attached = Vec::with_capacity(ids.len());
                for id in &ids {
                    let network = store.find_private_network(id).map_err(|_| {
                        EngineError::invalid_request(
                            "port",
                            port_id,
                            format!("invalid private network id: {id}"),
                        )
                    })?;
                    attached.push(AttachedPrivateNetwork {
                        private_network_id: network.private_network_id.clone(),
                        nickname: network.service.nickname.clone(),
                    });
                }
                let attached = (!attached.is_empty()).then_some(attached);
                (attached, Some(PRIVATE_NETWORK_BANDWIDTH_MBPS))
            }
        };

        let port = store.find_server_mut(server_id)?.port_mut(port_id)?;
        port.detach_networks();
        port.internet = internet;
        port.global_bandwidth_mbps = global_bandwidth_mbps;
        port.mode = params.mode;
        port.private_networks = private_networks;
        port.local_bandwidth_mbps = local_bandwidth_mbps;
        Ok(port.clone())
    }

    pub async fn enable_port(
        &self,
        server_id: &str,
        port_id: i64,
        params: EnableServerPortParameter,
    ) -> EngineResult<InterfacePort> {
        let mut store = self.store.write().await;
        let port = store.find_server_mut(server_id)?.port_mut(port_id)?;
        port.enabled = params.enable;
        Ok(port.clone())
    }

    /// Always the same two samples per direction; the range is ignored.
    pub async fn read_traffic_by_port(
        &self,
        server_id: &str,
        port_id: i64,
        _params: TrafficGraphParams,
    ) -> EngineResult<TrafficGraph> {
        let store = self.store.read().await;
        store.find_server(server_id)?.port(port_id)?;

        let now = Utc::now();
        let series = vec![
            TrafficGraphData {
                timestamp: now,
                value: 1.0,
            },
            TrafficGraphData {
                timestamp: now - Duration::minutes(1),
                value: 2.0,
            },
        ];
        Ok(TrafficGraph {
            receive: series.clone(),
            transmit: series,
        })
    }

    /// `on` and `reset` settle on, `soft` and `off` settle off, one interval
    /// after the call returns.
    pub async fn power_control(
        &self,
        server_id: &str,
        params: PowerControlParameter,
    ) -> EngineResult<()> {
        let store = self.store.read().await;
        let record = store.find_server(server_id)?;
        if record.server.lock_status.is_some() {
            return Err(EngineError::conflict(
                "server",
                server_id,
                "an exclusive operation is in progress",
            ));
        }

        let status = params.operation.target_state();
        let server_id = server_id.to_string();
        self.scheduler.delayed_apply("power_control", move |store, _| {
            if let Ok(record) = store.find_server_mut(&server_id) {
                record.power_status = Some(ServerPowerStatus { status });
                record.server.cached_power_status = Some(CachedPowerStatus {
                    status,
                    stored: Utc::now(),
                });
            }
        });
        Ok(())
    }

    pub async fn read_power_status(&self, server_id: &str) -> EngineResult<ServerPowerStatus> {
        let store = self.store.read().await;
        store
            .find_server(server_id)?
            .power_status
            .clone()
            .ok_or_else(|| {
                EngineError::not_found_in("power-status", server_id, format!("server[{server_id}]"))
            })
    }

    /// `refresh` is ignored.
    pub async fn read_raid_status(
        &self,
        server_id: &str,
        _params: RaidStatusParams,
    ) -> EngineResult<RaidStatus> {
        let store = self.store.read().await;
        store
            .find_server(server_id)?
            .raid_status
            .clone()
            .ok_or_else(|| {
                EngineError::not_found_in("raid-status", server_id, format!("server[{server_id}]"))
            })
    }
}
